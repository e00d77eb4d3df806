// ABOUTME: Application context for the carousel-slides program
// ABOUTME: Owns the stores and the generator and wires them to storage and export

use crate::avatar::{ingest_avatar_file, AvatarLimits};
use crate::config::Config;
use crate::errors::Result;
use crate::export::{export_pdf, ExportOptions, ExportReport};
use crate::generate::Generator;
use crate::model::{Slide, SlidePatch};
use crate::records::{ProfileStore, SettingsStore};
use crate::remote::GeminiClient;
use crate::render::RenderConfig;
use crate::splitter;
use crate::storage::{self, FileStore, KeyValueStore, MemoryStore};
use crate::store::SlideStore;
use log::{debug, info, warn};
use parking_lot::Mutex;
use std::path::Path;
use std::sync::Arc;

/// Key holding the id of the selected slide between command-line runs
pub const SELECTION_KEY: &str = "carouselSelection";

/// Everything one session of the tool works with
pub struct AppContext {
    storage: Arc<dyn KeyValueStore>,
    pub slides: Mutex<SlideStore>,
    pub profile: ProfileStore,
    pub settings: SettingsStore,
    generator: Generator,
}

impl AppContext {
    /// Build a context over any storage backend
    pub fn with_storage(storage: Arc<dyn KeyValueStore>, generator: Generator) -> Self {
        let profile = ProfileStore::load_profile(storage.clone());
        let settings = SettingsStore::load_settings(storage.clone());
        let mut slides = SlideStore::load(storage.clone(), profile.get());

        let remembered: Option<String> = storage::load_or_default(storage.as_ref(), SELECTION_KEY);
        if let Some(index) = remembered.and_then(|id| slides.position(&id)) {
            if let Err(e) = slides.set_cursor(index) {
                warn!("Ignoring remembered selection: {}", e);
            }
        }

        Self {
            storage,
            slides: Mutex::new(slides),
            profile,
            settings,
            generator,
        }
    }

    /// Context persisted under the configured state directory
    pub fn open(config: &Config, remote: bool) -> Result<Self> {
        info!("Using state directory {:?}", config.state_dir);
        let storage: Arc<dyn KeyValueStore> = Arc::new(FileStore::new(&config.state_dir));
        let generator = if remote {
            Generator::new(GeminiClient::new(&config.get_remote_config())?)
        } else {
            Generator::local()
        };
        Ok(Self::with_storage(storage, generator))
    }

    /// Throwaway context, nothing touches the disk
    pub fn in_memory() -> Self {
        Self::with_storage(Arc::new(MemoryStore::new()), Generator::local())
    }

    pub fn is_busy(&self) -> bool {
        self.generator.is_busy()
    }

    /// Generate one slide from a prompt
    pub fn generate(&self, prompt: &str) -> Result<Slide> {
        self.generator.generate(prompt, &self.slides, self.profile.get())
    }

    /// Generate a title slide plus one slide per point
    pub fn generate_outline(&self, text: &str) -> Result<Vec<Slide>> {
        self.generator
            .generate_outline(text, &self.slides, self.profile.get())
    }

    /// Rewrite the selected slide from free text using the line heuristics
    pub fn restructure_selected(&self, text: &str) -> Result<Slide> {
        let split = splitter::restructure(text);
        let patch = SlidePatch {
            title: Some(split.heading),
            subtitle: Some(split.subheading),
            content: Some(split.content),
            ..SlidePatch::default()
        };

        let mut slides = self.slides.lock();
        slides.update_selected(&patch)?;
        Ok(slides.selected().clone())
    }

    /// Ingest an image file as the profile avatar
    pub fn set_avatar_from_file(&mut self, path: &Path) -> Result<()> {
        let avatar = ingest_avatar_file(path, &AvatarLimits::default())?;
        debug!("Avatar data URI is {} bytes", avatar.len());
        self.profile.update(|profile| profile.avatar = avatar)
    }

    /// Export the visible slides to a PDF
    pub fn export(&self, options: &ExportOptions, render: &RenderConfig) -> Result<ExportReport> {
        let slides = self.slides.lock().visible_slides();
        export_pdf(&slides, self.settings.get(), options, render)
    }

    /// Save which slide is selected so the next run starts there
    pub fn remember_selection(&self) -> Result<()> {
        let id = self.slides.lock().selected().id.clone();
        storage::save(self.storage.as_ref(), SELECTION_KEY, &Some(id))
    }
}
