// ABOUTME: Data model for the carousel-slides application
// ABOUTME: Defines slides, the user profile and the shared design settings

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One unit of carousel content
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Slide {
    pub id: String,
    pub title: String,
    pub subtitle: String,
    pub content: String,
    pub author: String,
    pub handle: String,
    pub avatar: String,
    pub visible: bool,
}

impl Default for Slide {
    fn default() -> Self {
        Self {
            id: String::new(),
            title: String::new(),
            subtitle: String::new(),
            content: String::new(),
            author: String::new(),
            handle: String::new(),
            avatar: String::new(),
            visible: true,
        }
    }
}

impl Slide {
    /// Create a slide with the profile copied in at creation time.
    /// Later profile edits do not reach slides that already exist.
    pub fn new(
        title: impl Into<String>,
        subtitle: impl Into<String>,
        content: impl Into<String>,
        profile: &UserProfile,
    ) -> Self {
        Self {
            id: String::new(),
            title: title.into(),
            subtitle: subtitle.into(),
            content: content.into(),
            author: profile.name.clone(),
            handle: profile.handle.clone(),
            avatar: profile.avatar.clone(),
            visible: true,
        }
    }

    /// The slide added by the "add slide" action
    pub fn placeholder(profile: &UserProfile) -> Self {
        Self::new(
            "New Slide",
            "Add your subtitle here",
            "Add your content here",
            profile,
        )
    }

    /// Apply every field set in the patch
    pub fn apply(&mut self, patch: &SlidePatch) {
        if let Some(title) = &patch.title {
            self.title = title.clone();
        }
        if let Some(subtitle) = &patch.subtitle {
            self.subtitle = subtitle.clone();
        }
        if let Some(content) = &patch.content {
            self.content = content.clone();
        }
        if let Some(author) = &patch.author {
            self.author = author.clone();
        }
        if let Some(handle) = &patch.handle {
            self.handle = handle.clone();
        }
        if let Some(avatar) = &patch.avatar {
            self.avatar = avatar.clone();
        }
        if let Some(visible) = patch.visible {
            self.visible = visible;
        }
    }
}

/// Generate a fresh slide id
pub fn new_slide_id() -> String {
    format!("slide-{}", Uuid::new_v4())
}

/// Partial update of a slide; `None` leaves the field untouched
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlidePatch {
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub content: Option<String>,
    pub author: Option<String>,
    pub handle: Option<String>,
    pub avatar: Option<String>,
    pub visible: Option<bool>,
}

impl SlidePatch {
    pub fn is_empty(&self) -> bool {
        *self == SlidePatch::default()
    }
}

/// The author shown on every slide
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserProfile {
    pub name: String,
    pub handle: String,
    /// Data URI or URL
    pub avatar: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BackgroundPattern {
    #[default]
    Dots,
    Grid,
    Waves,
    Circles,
    Triangles,
    Blobs,
}

impl BackgroundPattern {
    pub const ALL: [BackgroundPattern; 6] = [
        BackgroundPattern::Dots,
        BackgroundPattern::Grid,
        BackgroundPattern::Waves,
        BackgroundPattern::Circles,
        BackgroundPattern::Triangles,
        BackgroundPattern::Blobs,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BackgroundPattern::Dots => "dots",
            BackgroundPattern::Grid => "grid",
            BackgroundPattern::Waves => "waves",
            BackgroundPattern::Circles => "circles",
            BackgroundPattern::Triangles => "triangles",
            BackgroundPattern::Blobs => "blobs",
        }
    }

    /// Parse a pattern name, ignoring case
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim().to_lowercase();
        Self::ALL.into_iter().find(|p| p.as_str() == value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FontSize {
    #[serde(rename = "text-sm")]
    Small,
    #[serde(rename = "text-base")]
    Medium,
    #[serde(rename = "text-lg")]
    Large,
    #[serde(rename = "text-xl")]
    ExtraLarge,
    #[serde(rename = "text-2xl")]
    Double,
    #[serde(rename = "text-3xl")]
    Triple,
}

impl FontSize {
    /// Pixel size on a 1080px canvas
    pub fn canvas_px(&self) -> u32 {
        match self {
            FontSize::Small => 34,
            FontSize::Medium => 40,
            FontSize::Large => 46,
            FontSize::ExtraLarge => 52,
            FontSize::Double => 62,
            FontSize::Triple => 78,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontSizes {
    pub title: FontSize,
    pub subtitle: FontSize,
    pub content: FontSize,
}

impl Default for FontSizes {
    fn default() -> Self {
        Self {
            title: FontSize::Double,
            subtitle: FontSize::Large,
            content: FontSize::Medium,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FontFamily {
    #[default]
    #[serde(rename = "font-sans")]
    Sans,
    #[serde(rename = "font-serif")]
    Serif,
    #[serde(rename = "font-mono")]
    Mono,
    #[serde(rename = "font-poppins")]
    Poppins,
}

impl FontFamily {
    pub fn css_stack(&self) -> &'static str {
        match self {
            FontFamily::Sans => "ui-sans-serif, system-ui, -apple-system, 'Segoe UI', Roboto, Arial, sans-serif",
            FontFamily::Serif => "ui-serif, Georgia, Cambria, 'Times New Roman', serif",
            FontFamily::Mono => "ui-monospace, SFMono-Regular, Menlo, Consolas, monospace",
            FontFamily::Poppins => "Poppins, ui-sans-serif, system-ui, sans-serif",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().trim_start_matches("font-") {
            "sans" => Some(FontFamily::Sans),
            "serif" => Some(FontFamily::Serif),
            "mono" => Some(FontFamily::Mono),
            "poppins" => Some(FontFamily::Poppins),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SlideLayout {
    #[default]
    Centered,
    Standard,
    LeftAligned,
    RightAligned,
}

impl SlideLayout {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "centered" => Some(SlideLayout::Centered),
            "standard" => Some(SlideLayout::Standard),
            "left-aligned" | "left" => Some(SlideLayout::LeftAligned),
            "right-aligned" | "right" => Some(SlideLayout::RightAligned),
            _ => None,
        }
    }

    /// CSS text alignment for the text block
    pub fn text_align(&self) -> &'static str {
        match self {
            SlideLayout::Centered => "center",
            SlideLayout::Standard | SlideLayout::LeftAligned => "left",
            SlideLayout::RightAligned => "right",
        }
    }
}

/// Built-in three-color palettes: background, accent, surface
pub const PALETTES: [[&str; 3]; 21] = [
    ["#6366F1", "#000000", "#F1F5F9"],
    ["#F43F5E", "#6B21A8", "#F8FAFC"],
    ["#0F172A", "#14B8A6", "#E0F2FE"],
    ["#EF4444", "#FB7185", "#ADD8E6"],
    ["#4B5563", "#9CA3AF", "#FEFCE8"],
    ["#06B6D4", "#000000", "#ECFEFF"],
    ["#0F172A", "#1E3A8A", "#ECFEFF"],
    ["#F43F5E", "#0F172A", "#FEF2F2"],
    ["#6366F1", "#60A5FA", "#DBEAFE"],
    ["#B91C1C", "#991B1B", "#FEE2E2"],
    ["#1E293B", "#3B82F6", "#E0F2FE"],
    ["#F59E0B", "#10B981", "#FEFCE8"],
    ["#10B981", "#F59E0B", "#FEF3C7"],
    ["#7C2D12", "#BE185D", "#FECACA"],
    ["#1E3A8A", "#3B82F6", "#DBEAFE"],
    ["#BE185D", "#F59E0B", "#FEF3C7"],
    ["#B91C1C", "#DC2626", "#FCA5A5"],
    ["#4C1D95", "#7C3AED", "#DDD6FE"],
    ["#78350F", "#92400E", "#FDE68A"],
    ["#B91C1C", "#0F172A", "#E2E8F0"],
    ["#9333EA", "#8B5CF6", "#E9D5FF"],
];

/// Visual configuration shared by all slides
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DesignSettings {
    pub background_element: BackgroundPattern,
    pub background_enabled: bool,
    pub color_palette: usize,
    pub use_custom_colors: bool,
    pub custom_colors: Vec<String>,
    pub font_size: FontSizes,
    pub font_family: FontFamily,
    pub slide_layout: SlideLayout,
}

impl Default for DesignSettings {
    fn default() -> Self {
        Self {
            background_element: BackgroundPattern::Dots,
            background_enabled: true,
            color_palette: 0,
            use_custom_colors: false,
            custom_colors: vec![
                "#3B82F6".to_string(),
                "#8B5CF6".to_string(),
                "#EC4899".to_string(),
            ],
            font_size: FontSizes::default(),
            font_family: FontFamily::Sans,
            slide_layout: SlideLayout::Centered,
        }
    }
}

impl DesignSettings {
    /// The three active colors. Custom colors win when enabled and complete;
    /// an unknown palette index falls back to the first palette.
    pub fn colors(&self) -> [String; 3] {
        if self.use_custom_colors && self.custom_colors.len() >= 3 {
            return [
                self.custom_colors[0].clone(),
                self.custom_colors[1].clone(),
                self.custom_colors[2].clone(),
            ];
        }
        let palette = PALETTES.get(self.color_palette).unwrap_or(&PALETTES[0]);
        palette.map(str::to_string)
    }

    /// Text color that contrasts with the background color
    pub fn text_color(&self) -> &'static str {
        if is_dark_color(&self.colors()[0]) {
            "#FFFFFF"
        } else {
            "#111827"
        }
    }
}

/// Parse `#RRGGBB` (or `RRGGBB`) into its channels
pub fn parse_hex_color(hex: &str) -> Option<(u8, u8, u8)> {
    let digits = hex.trim().trim_start_matches('#');
    if digits.len() != 6 {
        return None;
    }
    let value = u32::from_str_radix(digits, 16).ok()?;
    Some((
        ((value >> 16) & 0xFF) as u8,
        ((value >> 8) & 0xFF) as u8,
        (value & 0xFF) as u8,
    ))
}

/// Perceived-luminance threshold; unparsable colors count as dark
pub fn is_dark_color(hex: &str) -> bool {
    match parse_hex_color(hex) {
        Some((r, g, b)) => {
            let luminance = (0.299 * r as f64 + 0.587 * g as f64 + 0.114 * b as f64) / 255.0;
            luminance < 0.6
        }
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dark_color_threshold() {
        assert!(is_dark_color("#0F172A"));
        assert!(is_dark_color("#6366F1"));
        assert!(!is_dark_color("#F1F5F9"));
        assert!(!is_dark_color("#FFFFFF"));
        assert!(is_dark_color("not-a-color"));
    }

    #[test]
    fn test_colors_fall_back_to_first_palette() {
        let settings = DesignSettings {
            color_palette: 99,
            ..DesignSettings::default()
        };
        assert_eq!(settings.colors()[0], "#6366F1");
    }

    #[test]
    fn test_custom_colors_need_three_entries() {
        let mut settings = DesignSettings {
            use_custom_colors: true,
            custom_colors: vec!["#FFFFFF".to_string()],
            ..DesignSettings::default()
        };
        assert_eq!(settings.colors()[0], PALETTES[0][0]);

        settings.custom_colors = vec!["#FFFFFF".into(), "#000000".into(), "#EEEEEE".into()];
        assert_eq!(settings.colors()[0], "#FFFFFF");
        assert_eq!(settings.text_color(), "#111827");
    }

    #[test]
    fn test_settings_use_camel_case_json_keys() {
        let json = serde_json::to_value(DesignSettings::default()).unwrap();
        assert_eq!(json["backgroundElement"], "dots");
        assert_eq!(json["fontSize"]["title"], "text-2xl");
        assert_eq!(json["fontFamily"], "font-sans");
        assert_eq!(json["slideLayout"], "centered");
    }

    #[test]
    fn test_partial_settings_fill_defaults() {
        let settings: DesignSettings =
            serde_json::from_str(r#"{"slideLayout":"right-aligned","colorPalette":3}"#).unwrap();
        assert_eq!(settings.slide_layout, SlideLayout::RightAligned);
        assert_eq!(settings.color_palette, 3);
        assert!(settings.background_enabled);
    }

    #[test]
    fn test_slide_missing_fields_are_empty_strings() {
        let slide: Slide = serde_json::from_str(r#"{"id":"a","title":"Hello"}"#).unwrap();
        assert_eq!(slide.subtitle, "");
        assert_eq!(slide.avatar, "");
        assert!(slide.visible);
    }

    #[test]
    fn test_patch_only_touches_set_fields() {
        let profile = UserProfile {
            name: "Ada".into(),
            handle: "@ada".into(),
            avatar: String::new(),
        };
        let mut slide = Slide::new("T", "S", "C", &profile);
        slide.apply(&SlidePatch {
            subtitle: Some("New".into()),
            ..SlidePatch::default()
        });
        assert_eq!(slide.title, "T");
        assert_eq!(slide.subtitle, "New");
        assert_eq!(slide.author, "Ada");
    }
}
