// ABOUTME: Slide store for the carousel-slides application
// ABOUTME: Ordered slides plus a selection cursor, written through to storage on every change

use crate::errors::{CarouselError, Result};
use crate::model::{new_slide_id, Slide, SlidePatch, UserProfile};
use crate::storage::{self, KeyValueStore, SLIDES_KEY};
use log::{debug, warn};
use std::collections::HashSet;
use std::sync::Arc;

/// Ordered slide collection with a selection cursor.
///
/// Once loaded the store always holds at least one slide and the cursor is
/// always a valid index. Every mutation is applied in memory first and then
/// the whole collection is written under [`SLIDES_KEY`]; a failed write is
/// returned as an error but the in-memory change is kept.
pub struct SlideStore {
    slides: Vec<Slide>,
    cursor: usize,
    storage: Arc<dyn KeyValueStore>,
}

impl SlideStore {
    /// Load saved slides, seeding a placeholder slide when there are none.
    /// A seeded or repaired collection is written back right away.
    pub fn load(storage: Arc<dyn KeyValueStore>, profile: &UserProfile) -> Self {
        let saved: Vec<Slide> = storage::load_or_default(storage.as_ref(), SLIDES_KEY);
        let (mut slides, mut changed) = repair_ids(saved);

        if slides.is_empty() {
            debug!("No saved slides, starting with a placeholder");
            let mut slide = Slide::placeholder(profile);
            slide.id = new_slide_id();
            slides.push(slide);
            changed = true;
        }

        let store = Self {
            slides,
            cursor: 0,
            storage,
        };
        if changed {
            if let Err(e) = store.persist() {
                debug!("Loaded slides not written back: {}", e);
            }
        }
        store
    }

    pub fn slides(&self) -> &[Slide] {
        &self.slides
    }

    pub fn len(&self) -> usize {
        self.slides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn selected(&self) -> &Slide {
        &self.slides[self.cursor]
    }

    pub fn get(&self, id: &str) -> Option<&Slide> {
        self.slides.iter().find(|s| s.id == id)
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.slides.iter().position(|s| s.id == id)
    }

    /// Snapshot of the visible slides in order
    pub fn visible_slides(&self) -> Vec<Slide> {
        self.slides.iter().filter(|s| s.visible).cloned().collect()
    }

    /// Append a slide under a fresh id and select it
    pub fn add(&mut self, mut slide: Slide) -> Result<String> {
        slide.id = new_slide_id();
        let id = slide.id.clone();

        self.slides.push(slide);
        self.cursor = self.slides.len() - 1;
        debug!("Added slide {} at index {}", id, self.cursor);

        self.persist()?;
        Ok(id)
    }

    /// Append several slides under fresh ids and select the first of them.
    /// All slides are in place before the single write.
    pub fn add_all(&mut self, slides: Vec<Slide>) -> Result<Vec<String>> {
        if slides.is_empty() {
            return Ok(Vec::new());
        }

        let first = self.slides.len();
        let mut ids = Vec::with_capacity(slides.len());
        for mut slide in slides {
            slide.id = new_slide_id();
            ids.push(slide.id.clone());
            self.slides.push(slide);
        }
        self.cursor = first;
        debug!("Added {} slides from index {}", ids.len(), first);

        self.persist()?;
        Ok(ids)
    }

    /// Merge the patch into the slide with the given id
    pub fn update(&mut self, id: &str, patch: &SlidePatch) -> Result<()> {
        let slide = self
            .slides
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| CarouselError::SlideNotFound(id.to_string()))?;
        slide.apply(patch);
        debug!("Updated slide {}", id);

        self.persist()
    }

    /// Merge the patch into the selected slide
    pub fn update_selected(&mut self, patch: &SlidePatch) -> Result<()> {
        let id = self.selected().id.clone();
        self.update(&id, patch)
    }

    /// Remove a slide. Returns `false` without touching anything when it is
    /// the only slide left.
    ///
    /// Removing a slide before the cursor shifts the cursor down so the same
    /// slide stays selected; removing the selected slide keeps the index,
    /// clamped to the new end.
    pub fn delete(&mut self, id: &str) -> Result<bool> {
        let index = self
            .position(id)
            .ok_or_else(|| CarouselError::SlideNotFound(id.to_string()))?;

        if self.slides.len() <= 1 {
            debug!("Refusing to delete the last slide {}", id);
            return Ok(false);
        }

        self.slides.remove(index);
        if index < self.cursor {
            self.cursor -= 1;
        } else if self.cursor >= self.slides.len() {
            self.cursor = self.slides.len() - 1;
        }
        debug!("Deleted slide {}, cursor now {}", id, self.cursor);

        self.persist()?;
        Ok(true)
    }

    /// Flip the visibility of the slide at `index`, returning the new value
    pub fn toggle_visible(&mut self, index: usize) -> Result<bool> {
        self.check_index(index)?;
        let slide = &mut self.slides[index];
        slide.visible = !slide.visible;
        let visible = slide.visible;

        self.persist()?;
        Ok(visible)
    }

    /// Move one slide to a new position; the cursor follows the slide it
    /// pointed at
    pub fn move_slide(&mut self, from: usize, to: usize) -> Result<()> {
        self.check_index(from)?;
        self.check_index(to)?;
        if from == to {
            return Ok(());
        }

        let selected_id = self.selected().id.clone();
        let slide = self.slides.remove(from);
        self.slides.insert(to, slide);
        self.cursor = self.position(&selected_id).unwrap_or(0);
        debug!("Moved slide {} -> {}", from, to);

        self.persist()
    }

    pub fn set_cursor(&mut self, index: usize) -> Result<()> {
        self.check_index(index)?;
        self.cursor = index;
        Ok(())
    }

    /// Select the next slide, staying on the last one
    pub fn select_next(&mut self) -> usize {
        if self.cursor + 1 < self.slides.len() {
            self.cursor += 1;
        }
        self.cursor
    }

    /// Select the previous slide, staying on the first one
    pub fn select_previous(&mut self) -> usize {
        self.cursor = self.cursor.saturating_sub(1);
        self.cursor
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index >= self.slides.len() {
            return Err(CarouselError::InvalidIndex {
                index,
                len: self.slides.len(),
            });
        }
        Ok(())
    }

    fn persist(&self) -> Result<()> {
        storage::save(self.storage.as_ref(), SLIDES_KEY, &self.slides).map_err(|e| {
            warn!("Slides kept in memory after failed write: {}", e);
            e
        })
    }
}

/// Give blank or repeated ids a fresh value so ids stay unique.
/// The flag reports whether any id changed.
fn repair_ids(slides: Vec<Slide>) -> (Vec<Slide>, bool) {
    let mut seen = HashSet::new();
    let mut repaired = false;
    let slides = slides
        .into_iter()
        .map(|mut slide| {
            if slide.id.is_empty() || !seen.insert(slide.id.clone()) {
                let id = new_slide_id();
                warn!("Saved slide had a missing or duplicate id, assigned {}", id);
                seen.insert(id.clone());
                slide.id = id;
                repaired = true;
            }
            slide
        })
        .collect();
    (slides, repaired)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn profile() -> UserProfile {
        UserProfile {
            name: "Arjun V R".into(),
            handle: "@arjunvr".into(),
            avatar: String::new(),
        }
    }

    fn store_with(titles: &[&str]) -> (SlideStore, Arc<dyn KeyValueStore>) {
        let storage: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let mut store = SlideStore::load(storage.clone(), &profile());
        let first = store.selected().id.clone();
        for title in titles {
            store.add(Slide::new(*title, "", "", &profile())).unwrap();
        }
        if !titles.is_empty() {
            store.delete(&first).unwrap();
        }
        store.set_cursor(0).unwrap();
        (store, storage)
    }

    fn titles(store: &SlideStore) -> Vec<String> {
        store.slides().iter().map(|s| s.title.clone()).collect()
    }

    #[test]
    fn test_load_seeds_one_slide() {
        let storage: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let store = SlideStore::load(storage, &profile());
        assert_eq!(store.len(), 1);
        assert_eq!(store.cursor(), 0);
        assert_eq!(store.selected().title, "New Slide");
        assert_eq!(store.selected().author, "Arjun V R");
    }

    #[test]
    fn test_add_selects_new_slide_with_unique_id() {
        let (mut store, _) = store_with(&["a", "b"]);
        let id = store.add(Slide::new("c", "", "", &profile())).unwrap();
        assert_eq!(store.cursor(), 2);
        assert_eq!(store.selected().id, id);

        let ids: HashSet<_> = store.slides().iter().map(|s| s.id.clone()).collect();
        assert_eq!(ids.len(), store.len());
    }

    #[test]
    fn test_update_unknown_id() {
        let (mut store, _) = store_with(&["a"]);
        let result = store.update("missing", &SlidePatch::default());
        assert!(matches!(result, Err(CarouselError::SlideNotFound(_))));
    }

    #[test]
    fn test_update_merges_fields() {
        let (mut store, _) = store_with(&["a", "b"]);
        let id = store.slides()[1].id.clone();
        store
            .update(
                &id,
                &SlidePatch {
                    content: Some("body".into()),
                    ..SlidePatch::default()
                },
            )
            .unwrap();
        assert_eq!(store.slides()[1].title, "b");
        assert_eq!(store.slides()[1].content, "body");
    }

    #[test]
    fn test_delete_last_slide_is_noop() {
        let (mut store, _) = store_with(&[]);
        let id = store.selected().id.clone();
        assert!(!store.delete(&id).unwrap());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_delete_before_cursor_keeps_selection() {
        let (mut store, _) = store_with(&["a", "b", "c"]);
        store.set_cursor(2).unwrap();
        let first = store.slides()[0].id.clone();
        assert!(store.delete(&first).unwrap());
        assert_eq!(store.cursor(), 1);
        assert_eq!(store.selected().title, "c");
    }

    #[test]
    fn test_delete_selected_last_clamps() {
        let (mut store, _) = store_with(&["a", "b", "c"]);
        store.set_cursor(2).unwrap();
        let last = store.slides()[2].id.clone();
        store.delete(&last).unwrap();
        assert_eq!(store.cursor(), 1);
        assert_eq!(store.selected().title, "b");
    }

    #[test]
    fn test_delete_selected_middle_selects_next() {
        let (mut store, _) = store_with(&["a", "b", "c"]);
        store.set_cursor(1).unwrap();
        let middle = store.slides()[1].id.clone();
        store.delete(&middle).unwrap();
        assert_eq!(store.cursor(), 1);
        assert_eq!(store.selected().title, "c");
    }

    #[test]
    fn test_cursor_in_range_after_any_delete() {
        for cursor in 0..5 {
            for victim in 0..5 {
                let (mut store, _) = store_with(&["a", "b", "c", "d", "e"]);
                store.set_cursor(cursor).unwrap();
                let id = store.slides()[victim].id.clone();
                store.delete(&id).unwrap();
                assert!(store.cursor() < store.len());
            }
        }
    }

    #[test]
    fn test_toggle_visible() {
        let (mut store, _) = store_with(&["a", "b"]);
        assert!(!store.toggle_visible(1).unwrap());
        assert_eq!(store.visible_slides().len(), 1);
        assert!(store.toggle_visible(1).unwrap());
        assert!(matches!(
            store.toggle_visible(2),
            Err(CarouselError::InvalidIndex { index: 2, len: 2 })
        ));
    }

    #[test]
    fn test_move_then_move_back_restores_order() {
        let names = ["a", "b", "c", "d", "e"];
        for from in 0..names.len() {
            for to in 0..names.len() {
                let (mut store, _) = store_with(&names);
                let before = titles(&store);
                store.move_slide(from, to).unwrap();
                store.move_slide(to, from).unwrap();
                assert_eq!(titles(&store), before, "move {} -> {}", from, to);
            }
        }
    }

    #[test]
    fn test_move_preserves_relative_order() {
        let (mut store, _) = store_with(&["a", "b", "c", "d"]);
        store.move_slide(0, 2).unwrap();
        assert_eq!(titles(&store), vec!["b", "c", "a", "d"]);
        store.move_slide(3, 0).unwrap();
        assert_eq!(titles(&store), vec!["d", "b", "c", "a"]);
    }

    #[test]
    fn test_move_cursor_follows_selected_slide() {
        let (mut store, _) = store_with(&["a", "b", "c", "d"]);
        store.set_cursor(1).unwrap();
        store.move_slide(0, 3).unwrap();
        assert_eq!(store.selected().title, "b");
        store.move_slide(0, 2).unwrap();
        assert_eq!(store.selected().title, "b");
    }

    #[test]
    fn test_move_rejects_out_of_range() {
        let (mut store, _) = store_with(&["a", "b"]);
        assert!(store.move_slide(0, 5).is_err());
        assert_eq!(titles(&store), vec!["a", "b"]);
    }

    #[test]
    fn test_set_cursor_rejects_out_of_range() {
        let (mut store, _) = store_with(&["a", "b"]);
        store.set_cursor(1).unwrap();
        assert!(store.set_cursor(7).is_err());
        assert_eq!(store.cursor(), 1);
    }

    #[test]
    fn test_navigation_clamps_at_ends() {
        let (mut store, _) = store_with(&["a", "b", "c"]);
        assert_eq!(store.select_previous(), 0);
        assert_eq!(store.select_next(), 1);
        assert_eq!(store.select_next(), 2);
        assert_eq!(store.select_next(), 2);
    }

    #[test]
    fn test_reload_reproduces_collection() {
        let (mut store, storage) = store_with(&["a", "b", "c", "d"]);
        let id = store.slides()[2].id.clone();
        store
            .update(
                &id,
                &SlidePatch {
                    subtitle: Some("sub".into()),
                    visible: Some(false),
                    ..SlidePatch::default()
                },
            )
            .unwrap();
        store.move_slide(3, 1).unwrap();
        let first = store.slides()[0].id.clone();
        store.delete(&first).unwrap();

        let reloaded = SlideStore::load(storage, &UserProfile::default());
        assert_eq!(reloaded.slides(), store.slides());
    }

    #[test]
    fn test_repair_ids_deduplicates() {
        let storage: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        storage
            .set(
                SLIDES_KEY,
                r#"[{"id":"x","title":"one"},{"id":"x","title":"two"},{"title":"three"}]"#,
            )
            .unwrap();
        let store = SlideStore::load(storage.clone(), &profile());
        assert_eq!(store.len(), 3);
        assert_eq!(store.slides()[0].id, "x");
        let ids: HashSet<_> = store.slides().iter().map(|s| s.id.clone()).collect();
        assert_eq!(ids.len(), 3);

        // Repaired ids are stable across loads
        let reloaded = SlideStore::load(storage, &profile());
        assert_eq!(reloaded.slides(), store.slides());
    }

    struct ReadOnlyStore;

    impl KeyValueStore for ReadOnlyStore {
        fn get(&self, _key: &str) -> Result<Option<String>> {
            Ok(None)
        }

        fn set(&self, key: &str, _value: &str) -> Result<()> {
            Err(CarouselError::storage(key, "read-only"))
        }
    }

    #[test]
    fn test_failed_write_keeps_mutation() {
        let mut store = SlideStore::load(Arc::new(ReadOnlyStore), &profile());
        assert_eq!(store.len(), 1);

        let result = store.add(Slide::new("kept", "", "", &profile()));
        assert!(matches!(result, Err(CarouselError::Storage { .. })));
        assert_eq!(store.len(), 2);
        assert_eq!(store.cursor(), 1);
        assert_eq!(store.selected().title, "kept");
    }

    #[test]
    fn test_failed_write_keeps_every_added_slide() {
        let mut store = SlideStore::load(Arc::new(ReadOnlyStore), &profile());
        let batch = vec![
            Slide::new("Remote Work", "What we learned", "", &profile()),
            Slide::new("Point 1", "Async communication", "", &profile()),
            Slide::new("Point 2", "Written decisions", "", &profile()),
        ];

        let result = store.add_all(batch);
        assert!(matches!(result, Err(CarouselError::Storage { .. })));
        assert_eq!(
            titles(&store),
            vec!["New Slide", "Remote Work", "Point 1", "Point 2"]
        );
        assert_eq!(store.cursor(), 1);
        let ids: HashSet<_> = store.slides().iter().map(|s| s.id.clone()).collect();
        assert_eq!(ids.len(), 4);
    }

    #[test]
    fn test_add_all_empty_is_noop() {
        let (mut store, _) = store_with(&["a", "b"]);
        store.set_cursor(1).unwrap();
        assert!(store.add_all(Vec::new()).unwrap().is_empty());
        assert_eq!(store.len(), 2);
        assert_eq!(store.cursor(), 1);
    }

    #[test]
    fn test_seeded_placeholder_is_persisted() {
        let storage: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let first = SlideStore::load(storage.clone(), &profile());
        let second = SlideStore::load(storage, &profile());
        assert_eq!(first.selected().id, second.selected().id);
    }
}
