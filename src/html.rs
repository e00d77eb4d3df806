// ABOUTME: HTML rendering module for the carousel-slides application
// ABOUTME: Renders one slide with the design settings into a fixed-size HTML page

use crate::errors::Result;
use crate::model::{DesignSettings, Slide, SlideLayout};
use crate::utils::ensure_parent_dir;
use comrak::{markdown_to_html, ComrakOptions};
use log::info;
use std::fs;
use std::path::Path;

/// Escape text for use inside HTML elements and attributes
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Slide body text is markdown; raw HTML in it is dropped
fn content_html(content: &str) -> String {
    if content.trim().is_empty() {
        return String::new();
    }
    markdown_to_html(content, &ComrakOptions::default())
}

fn layout_css(layout: SlideLayout) -> (&'static str, &'static str) {
    // (justify-content, align-items) for the column flex container
    match layout {
        SlideLayout::Centered => ("center", "center"),
        SlideLayout::Standard => ("flex-start", "flex-start"),
        SlideLayout::LeftAligned => ("center", "flex-start"),
        SlideLayout::RightAligned => ("center", "flex-end"),
    }
}

/// Render a slide as a standalone square page of `size` pixels.
///
/// The author block comes from the slide itself, which holds the profile as
/// it was when the slide was created.
pub fn render_slide_html(slide: &Slide, settings: &DesignSettings, size: u32) -> String {
    let [background, accent, surface] = settings.colors();
    let text_color = settings.text_color();
    let (justify, align) = layout_css(settings.slide_layout);
    let scale = size as f64 / 1080.0;
    let px = |base: u32| (base as f64 * scale).round() as u32;

    let pattern = if settings.background_enabled {
        settings.background_element.as_str()
    } else {
        "none"
    };

    let mut html_doc = String::from("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html_doc.push_str("<meta charset=\"UTF-8\">\n");
    html_doc.push_str(&format!("<title>{}</title>\n", escape_html(&slide.title)));
    html_doc.push_str(&format!(
        r#"<style>
html, body {{ margin: 0; padding: 0; }}
.slide {{ box-sizing: border-box; width: {size}px; height: {size}px; padding: {pad}px; display: flex; flex-direction: column; justify-content: {justify}; align-items: {align}; text-align: {text_align}; background: {background}; color: {text_color}; font-family: {font}; position: relative; overflow: hidden; }}
.slide .accent {{ width: {accent_w}px; height: {accent_h}px; background: {accent}; border-radius: {accent_h}px; margin-bottom: {gap}px; }}
.slide h1 {{ font-size: {title_px}px; line-height: 1.15; margin: 0 0 {gap}px 0; }}
.slide h2 {{ font-size: {subtitle_px}px; font-weight: 500; opacity: 0.9; margin: 0 0 {gap}px 0; }}
.slide .content {{ font-size: {content_px}px; line-height: 1.5; }}
.slide .content p {{ margin: 0 0 {gap}px 0; }}
.slide .author {{ position: absolute; left: {pad}px; bottom: {pad}px; display: flex; align-items: center; gap: {gap}px; font-size: {author_px}px; }}
.slide .author img {{ width: {avatar}px; height: {avatar}px; border-radius: 50%; border: 3px solid {surface}; object-fit: cover; }}
.slide .handle {{ opacity: 0.75; }}
</style>
"#,
        size = size,
        pad = px(96),
        justify = justify,
        align = align,
        text_align = settings.slide_layout.text_align(),
        background = background,
        text_color = text_color,
        font = settings.font_family.css_stack(),
        accent_w = px(120),
        accent_h = px(12),
        accent = accent,
        gap = px(24),
        title_px = px(settings.font_size.title.canvas_px()),
        subtitle_px = px(settings.font_size.subtitle.canvas_px()),
        content_px = px(settings.font_size.content.canvas_px()),
        author_px = px(30),
        avatar = px(84),
        surface = surface,
    ));
    html_doc.push_str("</head>\n<body>\n");

    html_doc.push_str(&format!(
        "<div class=\"slide pdf-slide\" data-slide-id=\"{}\" data-pattern=\"{}\">\n",
        escape_html(&slide.id),
        pattern
    ));
    html_doc.push_str("<div class=\"accent\"></div>\n");
    html_doc.push_str(&format!("<h1>{}</h1>\n", escape_html(&slide.title)));
    if !slide.subtitle.trim().is_empty() {
        html_doc.push_str(&format!("<h2>{}</h2>\n", escape_html(&slide.subtitle)));
    }
    let body = content_html(&slide.content);
    if !body.is_empty() {
        html_doc.push_str(&format!("<div class=\"content\">{}</div>\n", body));
    }

    if !slide.author.is_empty() || !slide.handle.is_empty() || !slide.avatar.is_empty() {
        html_doc.push_str("<div class=\"author\">");
        if !slide.avatar.is_empty() {
            html_doc.push_str(&format!(
                "<img src=\"{}\" alt=\"\">",
                escape_html(&slide.avatar)
            ));
        }
        html_doc.push_str(&format!(
            "<div><div class=\"name\">{}</div><div class=\"handle\">{}</div></div>",
            escape_html(&slide.author),
            escape_html(&slide.handle)
        ));
        html_doc.push_str("</div>\n");
    }

    html_doc.push_str("</div>\n</body>\n</html>");
    html_doc
}

/// Utility function to write HTML content to a file
pub fn write_html_to_file(html_content: &str, output_path: &Path) -> Result<()> {
    info!("Writing HTML to file: {:?}", output_path);

    ensure_parent_dir(output_path)?;
    fs::write(output_path, html_content)?;

    Ok(())
}
