// ABOUTME: Generation orchestrator for the carousel-slides application
// ABOUTME: Turns a prompt into new slides while allowing only one generation at a time

use crate::errors::{CarouselError, Result};
use crate::model::{Slide, UserProfile};
use crate::splitter::{self, SplitText};
use crate::store::SlideStore;
use log::{debug, info};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

/// Something that can split a prompt into slide text
pub trait TextStructurer: Send + Sync {
    fn structure(&self, prompt: &str) -> Result<SplitText>;
}

/// Structures prompts with the word-count heuristic, no network
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalStructurer;

impl TextStructurer for LocalStructurer {
    fn structure(&self, prompt: &str) -> Result<SplitText> {
        Ok(splitter::split_prompt(prompt))
    }
}

/// Clears the busy flag when dropped
struct BusyGuard<'a>(&'a AtomicBool);

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Builds slides from prompts and appends them to a slide store.
///
/// A call made while another is still running fails with
/// [`CarouselError::Busy`] instead of waiting.
pub struct Generator {
    structurer: Box<dyn TextStructurer>,
    busy: AtomicBool,
}

impl Generator {
    pub fn new(structurer: impl TextStructurer + 'static) -> Self {
        Self {
            structurer: Box::new(structurer),
            busy: AtomicBool::new(false),
        }
    }

    /// Generator backed by the local splitter
    pub fn local() -> Self {
        Self::new(LocalStructurer)
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    fn begin(&self) -> Result<BusyGuard<'_>> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| CarouselError::Busy)?;
        Ok(BusyGuard(&self.busy))
    }

    /// Structure the prompt, append the resulting slide and select it.
    /// Nothing is appended when structuring fails.
    pub fn generate(
        &self,
        prompt: &str,
        slides: &Mutex<SlideStore>,
        profile: &UserProfile,
    ) -> Result<Slide> {
        let _guard = self.begin()?;
        validate_prompt(prompt)?;

        info!("Generating slide from a {} character prompt", prompt.len());
        let text = self.structurer.structure(prompt.trim())?;

        let mut slide = Slide::new(text.heading, text.subheading, text.content, profile);
        let mut store = slides.lock();
        slide.id = store.add(slide.clone())?;
        debug!("Generated slide {} at index {}", slide.id, store.cursor());

        Ok(slide)
    }

    /// Append a title slide plus one slide per point found in the text.
    /// The first generated slide is selected afterwards.
    pub fn generate_outline(
        &self,
        text: &str,
        slides: &Mutex<SlideStore>,
        profile: &UserProfile,
    ) -> Result<Vec<Slide>> {
        let _guard = self.begin()?;
        validate_prompt(text)?;

        let parts = splitter::outline(text);
        info!("Generating {} slides from outline", parts.len());

        let mut created: Vec<Slide> = parts
            .into_iter()
            .map(|part| Slide::new(part.heading, part.subheading, part.content, profile))
            .collect();

        let ids = slides.lock().add_all(created.clone())?;
        for (slide, id) in created.iter_mut().zip(ids) {
            slide.id = id;
        }

        Ok(created)
    }
}

fn validate_prompt(prompt: &str) -> Result<()> {
    if prompt.trim().is_empty() {
        return Err(CarouselError::Validation("Prompt is empty".to_string()));
    }
    Ok(())
}
