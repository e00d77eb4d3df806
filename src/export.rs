// ABOUTME: Export pipeline for the carousel-slides application
// ABOUTME: Rasterizes visible slides one by one and assembles them into a single PDF

use crate::errors::{CarouselError, Result};
use crate::html::render_slide_html;
use crate::model::{DesignSettings, Slide, UserProfile};
use crate::render::{ChromeBackend, RenderConfig};
use crate::utils::ensure_parent_dir;
use chrono::Utc;
use log::info;
use std::fs;
use std::path::PathBuf;
use std::time::Instant;

/// Turns one rendered slide page into PNG bytes
pub trait Rasterizer {
    fn rasterize(&mut self, html: &str) -> Result<Vec<u8>>;
}

/// Builds the final document from page images, in the given order
pub trait DocumentAssembler {
    fn assemble(&mut self, pages: &[Vec<u8>], options: &ExportOptions) -> Result<Vec<u8>>;
}

/// Configuration for one export
#[derive(Debug, Clone)]
pub struct ExportOptions {
    pub output: PathBuf,
    /// Edge of the square page in pixels
    pub canvas_size: u32,
    pub title: String,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            output: PathBuf::from("carousel.pdf"),
            canvas_size: 1080,
            title: "Carousel".to_string(),
        }
    }
}

impl ExportOptions {
    /// Document title naming the author and the export date
    pub fn title_for(profile: &UserProfile) -> String {
        let date = Utc::now().format("%Y-%m-%d");
        if profile.name.trim().is_empty() {
            format!("Carousel {}", date)
        } else {
            format!("Carousel by {} {}", profile.name.trim(), date)
        }
    }
}

/// What an export produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportReport {
    pub output: PathBuf,
    pub pages: usize,
    pub bytes: usize,
}

/// Render, rasterize and assemble the visible slides, then write the document.
///
/// Pages follow slide order and are rasterized strictly one after another.
/// Nothing is written when there is no visible slide.
pub fn export_document<B>(
    slides: &[Slide],
    settings: &DesignSettings,
    options: &ExportOptions,
    backend: &mut B,
) -> Result<ExportReport>
where
    B: Rasterizer + DocumentAssembler,
{
    let visible: Vec<&Slide> = slides.iter().filter(|s| s.visible).collect();
    if visible.is_empty() {
        return Err(CarouselError::NoVisibleSlides);
    }

    info!(
        "Exporting {} of {} slides to {:?}",
        visible.len(),
        slides.len(),
        options.output
    );
    let started = Instant::now();

    let mut pages = Vec::with_capacity(visible.len());
    for (i, slide) in visible.iter().enumerate() {
        info!("Rendering page {} ({})", i + 1, slide.id);
        let html = render_slide_html(slide, settings, options.canvas_size);
        pages.push(backend.rasterize(&html)?);
    }

    let document = backend.assemble(&pages, options)?;
    if document.is_empty() {
        return Err(CarouselError::browser("Assembler produced an empty document"));
    }

    ensure_parent_dir(&options.output)?;
    fs::write(&options.output, &document)?;

    info!(
        "Export complete. Wrote {} pages in {:.2} seconds",
        pages.len(),
        started.elapsed().as_secs_f64()
    );

    Ok(ExportReport {
        output: options.output.clone(),
        pages: pages.len(),
        bytes: document.len(),
    })
}

/// Export through a headless browser
pub fn export_pdf(
    slides: &[Slide],
    settings: &DesignSettings,
    options: &ExportOptions,
    render_config: &RenderConfig,
) -> Result<ExportReport> {
    // Check before paying for a browser launch
    if !slides.iter().any(|s| s.visible) {
        return Err(CarouselError::NoVisibleSlides);
    }

    let config = RenderConfig {
        canvas_size: options.canvas_size,
        ..render_config.clone()
    };
    let mut backend = ChromeBackend::launch(&config)?;
    export_document(slides, settings, options, &mut backend)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[derive(Default)]
    struct RecordingBackend {
        rendered: Vec<String>,
        assembled_pages: usize,
        fail_on: Option<usize>,
    }

    impl Rasterizer for RecordingBackend {
        fn rasterize(&mut self, html: &str) -> Result<Vec<u8>> {
            if self.fail_on == Some(self.rendered.len()) {
                return Err(CarouselError::browser("capture failed"));
            }
            self.rendered.push(html.to_string());
            Ok(vec![self.rendered.len() as u8])
        }
    }

    impl DocumentAssembler for RecordingBackend {
        fn assemble(&mut self, pages: &[Vec<u8>], _options: &ExportOptions) -> Result<Vec<u8>> {
            self.assembled_pages = pages.len();
            let mut doc = b"%PDF".to_vec();
            doc.extend(pages.iter().flatten());
            Ok(doc)
        }
    }

    fn slide(title: &str, visible: bool) -> Slide {
        let mut slide = Slide::new(title, "", "", &UserProfile::default());
        slide.id = format!("id-{}", title);
        slide.visible = visible;
        slide
    }

    fn options(dir: &TempDir) -> ExportOptions {
        ExportOptions {
            output: dir.path().join("out/carousel.pdf"),
            ..ExportOptions::default()
        }
    }

    #[test]
    fn test_only_visible_slides_in_order() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let slides = vec![slide("one", true), slide("two", false), slide("three", true)];
        let mut backend = RecordingBackend::default();

        let report =
            export_document(&slides, &DesignSettings::default(), &options(&dir), &mut backend)
                .unwrap();

        assert_eq!(report.pages, 2);
        assert_eq!(backend.assembled_pages, 2);
        assert!(backend.rendered[0].contains("<h1>one</h1>"));
        assert!(backend.rendered[1].contains("<h1>three</h1>"));
        assert_eq!(fs::read(&report.output).unwrap(), b"%PDF\x01\x02".to_vec());
    }

    #[test]
    fn test_no_visible_slides_aborts_without_output() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let slides = vec![slide("one", false)];
        let mut backend = RecordingBackend::default();
        let opts = options(&dir);

        let result = export_document(&slides, &DesignSettings::default(), &opts, &mut backend);
        assert!(matches!(result, Err(CarouselError::NoVisibleSlides)));
        assert!(backend.rendered.is_empty());
        assert!(!opts.output.exists());
    }

    #[test]
    fn test_export_pdf_checks_before_launching() {
        let result = export_pdf(
            &[],
            &DesignSettings::default(),
            &ExportOptions::default(),
            &RenderConfig::default(),
        );
        assert!(matches!(result, Err(CarouselError::NoVisibleSlides)));
    }

    #[test]
    fn test_raster_failure_writes_nothing() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let slides = vec![slide("one", true), slide("two", true)];
        let mut backend = RecordingBackend {
            fail_on: Some(1),
            ..RecordingBackend::default()
        };
        let opts = options(&dir);

        let result = export_document(&slides, &DesignSettings::default(), &opts, &mut backend);
        assert!(matches!(result, Err(CarouselError::BrowserError { .. })));
        assert_eq!(backend.assembled_pages, 0);
        assert!(!opts.output.exists());
    }

    #[test]
    fn test_title_names_author() {
        let profile = UserProfile {
            name: "Ada".into(),
            ..UserProfile::default()
        };
        assert!(ExportOptions::title_for(&profile).starts_with("Carousel by Ada "));
        assert!(ExportOptions::title_for(&UserProfile::default()).starts_with("Carousel 2"));
    }
}
