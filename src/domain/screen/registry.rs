//! Screen registry: the single source of truth for the screen set.
//!
//! The registry is an explicit object created at startup and injected into
//! the coordinator; display clients read it through
//! [`ScreenSnapshotSource`](crate::ports::ScreenSnapshotSource).
//!
//! # Consistency
//!
//! All state sits behind one `RwLock`. Content updates build the merged
//! [`ContentAssignment`] and swap it in while holding the write lock, and
//! readers only ever receive clones, so a half-applied assignment is never
//! observable.

use std::collections::HashSet;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::foundation::ScreenId;
use crate::ports::ScreenSnapshotSource;

use super::content::{ContentAssignment, ContentUpdate};
use super::errors::ScreenError;
use super::screen::Screen;

/// Produces candidate identifiers for new screens.
pub type IdGenerator = Box<dyn Fn() -> ScreenId + Send + Sync>;

/// Attempts with the injected generator before falling back to random UUIDs.
const MAX_GENERATOR_ATTEMPTS: usize = 16;

#[derive(Default)]
struct RegistryState {
    /// Screens in insertion order.
    screens: Vec<Screen>,
    /// Every id issued or loaded in this process; never shrinks.
    issued: HashSet<ScreenId>,
    selected: Option<ScreenId>,
}

impl RegistryState {
    fn position(&self, id: &ScreenId) -> Option<usize> {
        self.screens.iter().position(|s| s.id() == id)
    }

    fn screen_mut(&mut self, id: &ScreenId) -> Result<&mut Screen, ScreenError> {
        self.screens
            .iter_mut()
            .find(|s| s.id() == id)
            .ok_or_else(|| ScreenError::not_found(id.clone()))
    }
}

/// In-memory, ordered set of screens with their current content.
pub struct ScreenRegistry {
    state: RwLock<RegistryState>,
    id_generator: IdGenerator,
}

impl ScreenRegistry {
    /// Empty registry issuing UUID v4 identifiers.
    pub fn new() -> Self {
        Self::with_id_generator(Box::new(ScreenId::generate))
    }

    /// Empty registry with a custom identifier source.
    pub fn with_id_generator(id_generator: IdGenerator) -> Self {
        Self {
            state: RwLock::new(RegistryState::default()),
            id_generator,
        }
    }

    /// Registry pre-populated from a persisted snapshot.
    pub fn from_snapshot(screens: Vec<Screen>) -> Self {
        let mut state = RegistryState::default();
        load_into(&mut state, screens);
        Self {
            state: RwLock::new(state),
            id_generator: Box::new(ScreenId::generate),
        }
    }

    /// Appends a new screen. The name defaults to `Tela N`.
    ///
    /// Identifier collisions with anything issued earlier in this process are
    /// retried silently.
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` if an explicit name is blank or too long
    pub async fn add_screen(&self, name: Option<String>) -> Result<Screen, ScreenError> {
        let mut state = self.state.write().await;

        let name = name.unwrap_or_else(|| Screen::default_name(state.screens.len() + 1));
        let id = self.fresh_id(&state.issued);
        let screen = Screen::new(id.clone(), name)?;

        state.issued.insert(id.clone());
        state.screens.push(screen.clone());

        tracing::debug!(screen_id = %id, total = state.screens.len(), "Screen added");
        Ok(screen)
    }

    /// Deletes a screen. Returns `false` if it was already absent.
    pub async fn remove_screen(&self, id: &ScreenId) -> bool {
        let mut state = self.state.write().await;

        let Some(index) = state.position(id) else {
            return false;
        };
        state.screens.remove(index);
        if state.selected.as_ref() == Some(id) {
            state.selected = None;
        }

        tracing::debug!(screen_id = %id, "Screen removed");
        true
    }

    /// Changes a screen's display label.
    pub async fn rename_screen(&self, id: &ScreenId, name: String) -> Result<Screen, ScreenError> {
        let mut state = self.state.write().await;
        let screen = state.screen_mut(id)?;
        screen.rename(name)?;
        Ok(screen.clone())
    }

    /// Marks a screen as the one the controller is editing.
    pub async fn select_screen(&self, id: &ScreenId) -> Result<Screen, ScreenError> {
        let mut state = self.state.write().await;
        let screen = state.screen_mut(id)?.clone();
        state.selected = Some(id.clone());
        Ok(screen)
    }

    /// Currently selected screen, if any.
    pub async fn selected(&self) -> Option<Screen> {
        let state = self.state.read().await;
        let id = state.selected.as_ref()?;
        state.screens.iter().find(|s| s.id() == id).cloned()
    }

    /// Merges `update` onto the screen's assignment (or the default skeleton)
    /// and replaces it.
    ///
    /// # Errors
    ///
    /// - `NotFound` if `id` is not a live screen
    pub async fn update_content(
        &self,
        id: &ScreenId,
        update: &ContentUpdate,
    ) -> Result<ContentAssignment, ScreenError> {
        let mut state = self.state.write().await;
        let screen = state.screen_mut(id)?;

        let merged = match screen.current_content() {
            Some(current) => current.merged(update),
            None => ContentAssignment::skeleton().merged(update),
        };
        screen.replace_content(merged.clone());

        Ok(merged)
    }

    /// A single screen by id.
    pub async fn get(&self, id: &ScreenId) -> Option<Screen> {
        let state = self.state.read().await;
        state.screens.iter().find(|s| s.id() == id).cloned()
    }

    /// All screens in insertion order.
    pub async fn snapshot(&self) -> Vec<Screen> {
        self.state.read().await.screens.clone()
    }

    /// Swaps the entire screen set (session load, new session).
    ///
    /// Clears the selection. Duplicate ids in `screens` keep their first
    /// occurrence.
    pub async fn replace_all(&self, screens: Vec<Screen>) {
        let mut state = self.state.write().await;
        state.screens.clear();
        state.selected = None;
        load_into(&mut state, screens);
    }

    pub async fn len(&self) -> usize {
        self.state.read().await.screens.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    fn fresh_id(&self, issued: &HashSet<ScreenId>) -> ScreenId {
        for _ in 0..MAX_GENERATOR_ATTEMPTS {
            let candidate = (self.id_generator)();
            if !issued.contains(&candidate) {
                return candidate;
            }
            tracing::debug!(screen_id = %candidate, "Screen id collision, retrying");
        }
        loop {
            let candidate = ScreenId::generate();
            if !issued.contains(&candidate) {
                return candidate;
            }
        }
    }
}

impl Default for ScreenRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn load_into(state: &mut RegistryState, screens: Vec<Screen>) {
    for screen in screens {
        if state.position(screen.id()).is_some() {
            tracing::warn!(screen_id = %screen.id(), "Duplicate screen id in snapshot, skipping");
            continue;
        }
        state.issued.insert(screen.id().clone());
        state.screens.push(screen);
    }
}

#[async_trait]
impl ScreenSnapshotSource for ScreenRegistry {
    async fn snapshot(&self) -> Vec<Screen> {
        ScreenRegistry::snapshot(self).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::screen::{BackgroundColor, ContentType, Rotation, Scale};
    use proptest::prelude::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn sid(s: &str) -> ScreenId {
        ScreenId::new(s).unwrap()
    }

    fn media_update(title: &str, url: &str) -> ContentUpdate {
        ContentUpdate::replace_with(&ContentAssignment::new(ContentType::Image, title, url))
    }

    #[tokio::test]
    async fn add_screen_assigns_ordinal_names() {
        let registry = ScreenRegistry::new();
        let first = registry.add_screen(None).await.unwrap();
        let second = registry.add_screen(None).await.unwrap();

        assert_eq!(first.name(), "Tela 1");
        assert_eq!(second.name(), "Tela 2");
        assert_ne!(first.id(), second.id());
    }

    #[tokio::test]
    async fn add_screen_uses_explicit_name() {
        let registry = ScreenRegistry::new();
        let screen = registry.add_screen(Some("Lobby".into())).await.unwrap();
        assert_eq!(screen.name(), "Lobby");
    }

    #[tokio::test]
    async fn add_screen_retries_on_id_collision() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let registry = ScreenRegistry::with_id_generator(Box::new(move || {
            let n = counter.fetch_add(1, Ordering::SeqCst);
            // a, a, b
            if n < 2 { sid("a") } else { sid("b") }
        }));

        let first = registry.add_screen(None).await.unwrap();
        let second = registry.add_screen(None).await.unwrap();

        assert_eq!(first.id().as_str(), "a");
        assert_eq!(second.id().as_str(), "b");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn removed_ids_are_never_reissued() {
        let registry = ScreenRegistry::with_id_generator(Box::new(|| sid("only")));
        let first = registry.add_screen(None).await.unwrap();
        assert!(registry.remove_screen(first.id()).await);

        let second = registry.add_screen(None).await.unwrap();
        assert_ne!(second.id().as_str(), "only");
    }

    #[tokio::test]
    async fn remove_screen_is_idempotent() {
        let registry = ScreenRegistry::new();
        let screen = registry.add_screen(None).await.unwrap();

        assert!(registry.remove_screen(screen.id()).await);
        assert!(!registry.remove_screen(screen.id()).await);
        assert!(registry.is_empty().await);
    }

    #[tokio::test]
    async fn remove_selected_screen_clears_selection() {
        let registry = ScreenRegistry::new();
        let screen = registry.add_screen(None).await.unwrap();
        registry.select_screen(screen.id()).await.unwrap();
        assert!(registry.selected().await.is_some());

        registry.remove_screen(screen.id()).await;
        assert!(registry.selected().await.is_none());
    }

    #[tokio::test]
    async fn remove_other_screen_keeps_selection() {
        let registry = ScreenRegistry::new();
        let a = registry.add_screen(None).await.unwrap();
        let b = registry.add_screen(None).await.unwrap();
        registry.select_screen(a.id()).await.unwrap();

        registry.remove_screen(b.id()).await;
        assert_eq!(registry.selected().await.unwrap().id(), a.id());
    }

    #[tokio::test]
    async fn select_unknown_screen_fails() {
        let registry = ScreenRegistry::new();
        let result = registry.select_screen(&sid("ghost")).await;
        assert!(matches!(result, Err(ScreenError::NotFound(_))));
    }

    #[tokio::test]
    async fn rename_screen_changes_only_name() {
        let registry = ScreenRegistry::new();
        let screen = registry.add_screen(None).await.unwrap();

        let renamed = registry.rename_screen(screen.id(), "Entrance".into()).await.unwrap();
        assert_eq!(renamed.name(), "Entrance");
        assert_eq!(renamed.id(), screen.id());
    }

    #[tokio::test]
    async fn update_content_on_unknown_screen_is_not_found() {
        let registry = ScreenRegistry::new();
        let result = registry
            .update_content(&sid("missing"), &media_update("A", "http://x/a.png"))
            .await;
        assert_eq!(result, Err(ScreenError::NotFound(sid("missing"))));
    }

    #[tokio::test]
    async fn update_content_starts_from_skeleton() {
        let registry = ScreenRegistry::new();
        let screen = registry.add_screen(None).await.unwrap();

        let update = ContentUpdate {
            rotation: Some(Rotation::new(45.0).unwrap()),
            ..ContentUpdate::default()
        };
        let content = registry.update_content(screen.id(), &update).await.unwrap();

        assert_eq!(content.content_type(), ContentType::Image);
        assert_eq!(content.url(), "");
        assert_eq!(content.rotation().degrees(), 45.0);
        assert_eq!(content.scale().value(), 1.0);
    }

    #[tokio::test]
    async fn snapshot_preserves_insertion_order() {
        let registry = ScreenRegistry::new();
        let a = registry.add_screen(Some("A".into())).await.unwrap();
        let b = registry.add_screen(Some("B".into())).await.unwrap();
        let c = registry.add_screen(Some("C".into())).await.unwrap();
        registry.remove_screen(b.id()).await;

        let ids: Vec<_> = registry.snapshot().await.into_iter().map(|s| s.id().clone()).collect();
        assert_eq!(ids, vec![a.id().clone(), c.id().clone()]);
    }

    #[tokio::test]
    async fn replace_all_swaps_set_and_clears_selection() {
        let registry = ScreenRegistry::new();
        let old = registry.add_screen(None).await.unwrap();
        registry.select_screen(old.id()).await.unwrap();

        let loaded = Screen::reconstitute(sid("s1"), "Tela 1".into(), true, None);
        registry.replace_all(vec![loaded.clone(), loaded.clone()]).await;

        assert_eq!(registry.snapshot().await, vec![loaded]);
        assert!(registry.selected().await.is_none());
    }

    #[tokio::test]
    async fn loaded_ids_join_the_issued_set() {
        let registry = ScreenRegistry::with_id_generator(Box::new(|| sid("s1")));
        registry
            .replace_all(vec![Screen::reconstitute(sid("s1"), "Tela 1".into(), true, None)])
            .await;

        let added = registry.add_screen(None).await.unwrap();
        assert_ne!(added.id().as_str(), "s1");
    }

    #[tokio::test]
    async fn from_snapshot_restores_screens() {
        let screens = vec![
            Screen::reconstitute(sid("s1"), "Tela 1".into(), true, None),
            Screen::reconstitute(sid("s2"), "Tela 2".into(), false, None),
        ];
        let registry = ScreenRegistry::from_snapshot(screens.clone());
        assert_eq!(registry.snapshot().await, screens);
    }

    #[derive(Debug, Clone)]
    enum Step {
        Media(String, String),
        Rotate(f64),
        Scale(f64),
        Background(String),
    }

    fn step_strategy() -> impl Strategy<Value = Step> {
        prop_oneof![
            ("[a-z]{1,8}", "[a-z]{1,8}").prop_map(|(t, u)| Step::Media(t, format!("http://x/{u}.png"))),
            (-720.0f64..720.0).prop_map(Step::Rotate),
            (0.5f64..=2.0).prop_map(Step::Scale),
            "[0-9a-f]{6}".prop_map(|c| Step::Background(format!("#{c}"))),
        ]
    }

    fn to_update(step: &Step) -> ContentUpdate {
        match step {
            Step::Media(t, u) => media_update(t, u),
            Step::Rotate(d) => ContentUpdate {
                rotation: Some(Rotation::new(*d).unwrap()),
                ..ContentUpdate::default()
            },
            Step::Scale(s) => ContentUpdate {
                scale: Some(Scale::new(*s).unwrap()),
                ..ContentUpdate::default()
            },
            Step::Background(c) => ContentUpdate {
                background_color: Some(BackgroundColor::new(c.clone()).unwrap()),
                ..ContentUpdate::default()
            },
        }
    }

    proptest! {
        #[test]
        fn stored_content_equals_last_merged_result(steps in prop::collection::vec(step_strategy(), 1..20)) {
            futures::executor::block_on(async {
                let registry = ScreenRegistry::new();
                let screen = registry.add_screen(None).await.unwrap();

                let mut expected = ContentAssignment::skeleton();
                let mut last = None;
                for step in &steps {
                    let update = to_update(step);
                    expected = expected.merged(&update);
                    last = Some(registry.update_content(screen.id(), &update).await.unwrap());
                }

                let stored = registry.get(screen.id()).await.unwrap();
                prop_assert_eq!(stored.current_content(), last.as_ref());
                prop_assert_eq!(stored.current_content(), Some(&expected));
                Ok(())
            })?;
        }

        #[test]
        fn rotation_always_lands_in_range(degrees in -1.0e6f64..1.0e6) {
            let r = Rotation::new(degrees).unwrap();
            prop_assert!(r.degrees() >= 0.0 && r.degrees() < 360.0);
        }
    }
}
