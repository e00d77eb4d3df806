// ABOUTME: Browser rendering module for the carousel-slides application
// ABOUTME: Rasterizes slide pages and prints the page images to PDF with a headless browser

use crate::errors::{CarouselError, Result};
use crate::export::{DocumentAssembler, ExportOptions, Rasterizer};
use crate::html::escape_html;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use headless_chrome::protocol::cdp::Page::CaptureScreenshotFormatOption;
use headless_chrome::types::PrintToPdfOptions;
use headless_chrome::{Browser, LaunchOptionsBuilder, Tab};
use log::{debug, info, warn};
use std::env;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use uuid::Uuid;

/// CSS pixels per inch, used to size PDF paper
const CSS_PX_PER_INCH: f64 = 96.0;

/// Configuration for browser rendering
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Edge of the square canvas in pixels
    pub canvas_size: u32,
    pub timeout_ms: u64,
    /// Pause after load so fonts and images settle
    pub settle_ms: u64,
    pub browser_path: Option<String>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            canvas_size: 1080,
            timeout_ms: 30000, // 30 seconds
            settle_ms: 300,
            browser_path: None,
        }
    }
}

/// Headless Chrome session used both to screenshot slides and to print the PDF
pub struct ChromeBackend {
    // Keeps the browser process alive as long as the tab is in use
    _browser: Browser,
    tab: Arc<Tab>,
    config: RenderConfig,
}

impl ChromeBackend {
    pub fn launch(config: &RenderConfig) -> Result<Self> {
        let mut launch_options_builder = LaunchOptionsBuilder::default();
        launch_options_builder.window_size(Some((config.canvas_size, config.canvas_size)));
        launch_options_builder.headless(true);

        // Use custom browser path if specified
        if let Some(browser_path) = &config.browser_path {
            launch_options_builder.path(Some(browser_path.into()));
        } else if let Ok(path) = env::var("BROWSER_PATH") {
            if !path.is_empty() {
                launch_options_builder.path(Some(path.into()));
            }
        }

        let launch_options = launch_options_builder.build().map_err(|e| {
            CarouselError::browser(format!("Failed to build browser options: {:?}", e))
        })?;

        info!("Launching headless browser");
        let browser = Browser::new(launch_options).map_err(|e| {
            let message = format!("Failed to launch browser: {}", e);
            warn!("{}", message);
            CarouselError::browser(message)
        })?;

        let tab = browser
            .new_tab()
            .map_err(|e| CarouselError::browser(format!("Failed to create new tab: {}", e)))?;

        Ok(Self {
            _browser: browser,
            tab,
            config: config.clone(),
        })
    }

    /// Load an HTML document into the tab through a scratch file
    fn load_html(&self, html: &str) -> Result<()> {
        let path = scratch_path();
        fs::write(&path, html)?;
        let url = format!("file://{}", path.to_string_lossy());
        debug!("Opening page at URL: {}", url);

        let loaded = self.navigate(&url);
        if let Err(e) = fs::remove_file(&path) {
            warn!("Failed to clean up scratch file {:?}: {}", path, e);
        }
        loaded
    }

    fn navigate(&self, url: &str) -> Result<()> {
        self.tab
            .navigate_to(url)
            .map_err(|e| CarouselError::browser(format!("Failed to navigate to page: {}", e)))?;

        self.tab
            .wait_until_navigated()
            .map_err(|e| CarouselError::browser(format!("Navigation failed: {}", e)))?;

        self.tab
            .wait_for_element_with_custom_timeout(
                "body",
                Duration::from_millis(self.config.timeout_ms),
            )
            .map_err(|e| {
                CarouselError::browser(format!("Failed to wait for body element: {}", e))
            })?;

        std::thread::sleep(Duration::from_millis(self.config.settle_ms));
        Ok(())
    }
}

fn scratch_path() -> PathBuf {
    env::temp_dir().join(format!("carousel-{}.html", Uuid::new_v4()))
}

impl Rasterizer for ChromeBackend {
    fn rasterize(&mut self, html: &str) -> Result<Vec<u8>> {
        let started = Instant::now();
        self.load_html(html)?;

        let png = self
            .tab
            .capture_screenshot(CaptureScreenshotFormatOption::Png, None, None, true)
            .map_err(|e| CarouselError::browser(format!("Failed to capture screenshot: {}", e)))?;

        debug!(
            "Captured {} bytes in {:.2} seconds",
            png.len(),
            started.elapsed().as_secs_f64()
        );
        Ok(png)
    }
}

impl DocumentAssembler for ChromeBackend {
    fn assemble(&mut self, pages: &[Vec<u8>], options: &ExportOptions) -> Result<Vec<u8>> {
        info!("Printing {} pages to PDF", pages.len());
        self.load_html(&pages_html(pages, options.canvas_size, &options.title))?;

        let paper = options.canvas_size as f64 / CSS_PX_PER_INCH;
        let pdf_options = PrintToPdfOptions {
            landscape: Some(true),
            print_background: Some(true),
            paper_width: Some(paper),
            paper_height: Some(paper),
            margin_top: Some(0.0),
            margin_bottom: Some(0.0),
            margin_left: Some(0.0),
            margin_right: Some(0.0),
            prefer_css_page_size: Some(true),
            ..Default::default()
        };

        self.tab
            .print_to_pdf(Some(pdf_options))
            .map_err(|e| CarouselError::browser(format!("Failed to print PDF: {}", e)))
    }
}

/// One full-bleed image per printed page
pub fn pages_html(pages: &[Vec<u8>], size: u32, title: &str) -> String {
    let mut html_doc = String::from("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html_doc.push_str("<meta charset=\"UTF-8\">\n");
    html_doc.push_str(&format!("<title>{}</title>\n", escape_html(title)));
    html_doc.push_str(&format!(
        r#"<style>
@page {{ size: {size}px {size}px; margin: 0; }}
html, body {{ margin: 0; padding: 0; }}
.page {{ width: {size}px; height: {size}px; overflow: hidden; break-after: page; page-break-after: always; }}
.page:last-child {{ break-after: auto; page-break-after: auto; }}
.page img {{ display: block; width: 100%; height: 100%; }}
</style>
"#,
        size = size
    ));
    html_doc.push_str("</head>\n<body>\n");

    for page in pages {
        html_doc.push_str(&format!(
            "<div class=\"page\"><img src=\"data:image/png;base64,{}\" alt=\"\"></div>\n",
            STANDARD.encode(page)
        ));
    }

    html_doc.push_str("</body>\n</html>");
    html_doc
}
