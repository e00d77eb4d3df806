// ABOUTME: Library module for the carousel-slides program.
// ABOUTME: Contains the slide stores, text splitting, generation and PDF export.

// Reexport modules
pub mod app;
pub mod avatar;
pub mod config;
pub mod errors;
pub mod export;
pub mod generate;
pub mod html;
pub mod model;
pub mod records;
pub mod remote;
pub mod render;
pub mod splitter;
pub mod storage;
pub mod store;
pub mod utils;

// Reexport common types and functions
pub use app::AppContext;
pub use avatar::{ingest_avatar, ingest_avatar_file, AvatarLimits};
pub use config::Config;
pub use errors::{CarouselError, Result};
pub use export::{export_document, export_pdf, ExportOptions, ExportReport};
pub use generate::{Generator, LocalStructurer, TextStructurer};
pub use html::{render_slide_html, write_html_to_file};
pub use model::{DesignSettings, Slide, SlidePatch, UserProfile};
pub use records::{ProfileStore, SettingsStore};
pub use remote::{GeminiClient, RemoteConfig};
pub use render::{ChromeBackend, RenderConfig};
pub use splitter::{outline, restructure, split_prompt, SplitText};
pub use storage::{FileStore, KeyValueStore, MemoryStore};
pub use store::SlideStore;
