//! Scene-state controller — the mode state machine.
//!
//! There is no transition table.  Each detection tick the current gesture
//! simply *is* the request, so holding a pose keeps asserting its mode:
//!
//! | Gesture | Effect |
//! |---|---|
//! | Pinch | `Focus`; picks a random photo if no target is held yet |
//! | Fist | `Tree`, target dropped |
//! | Open | `Scatter`, target dropped |
//! | Ambiguous | nothing |
//!
//! New content also goes through here: registering a photo forces `Tree` so
//! the new object is seen taking its place.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use hand_gesture::Gesture;
use tree_scene::{Category, InteractionState, Mode, ObjectId, Scene, TextureId};

pub struct SceneController {
    rng: StdRng,
}

impl SceneController {
    pub fn new(rng: StdRng) -> Self {
        SceneController { rng }
    }

    /// Seeded when `seed` is given, from OS entropy otherwise.
    pub fn from_seed(seed: Option<u64>) -> Self {
        match seed {
            Some(s) => Self::new(StdRng::seed_from_u64(s)),
            None    => Self::new(StdRng::from_entropy()),
        }
    }

    /// Apply one gesture reading.  Returns true if mode or target changed.
    pub fn apply(&mut self, gesture: Gesture, state: &mut InteractionState, scene: &Scene) -> bool {
        let before = (state.mode(), state.focus_target());

        match gesture {
            Gesture::Pinch => {
                if state.focus_target().is_none() {
                    let pick = self.pick_photo(scene);
                    match pick {
                        Some(id) => log::debug!("focus target: object {}", id.0),
                        None     => log::debug!("focus requested but there are no photos"),
                    }
                    state.enter_focus(pick);
                } else {
                    state.enter_focus(None);
                }
            }
            Gesture::Fist      => state.set_mode(Mode::Tree),
            Gesture::Open      => state.set_mode(Mode::Scatter),
            Gesture::Ambiguous => {}
        }

        let changed = before != (state.mode(), state.focus_target());
        if changed && before.0 != state.mode() {
            log::info!("{} -> {} ({})", before.0.name(), state.mode().name(), gesture.name());
        }
        changed
    }

    /// Register a new photo, give it its layout once, and switch to `Tree`.
    pub fn ingest_photo(
        &mut self,
        state:   &mut InteractionState,
        scene:   &mut Scene,
        texture: TextureId,
    ) -> ObjectId {
        let id = scene.spawn(Category::Photo, Some(texture), &mut self.rng);
        let previous = state.mode();
        state.set_mode(Mode::Tree);
        log::info!(
            "photo registered as object {} (texture {}); {} -> TREE",
            id.0, texture.0, previous.name()
        );
        id
    }

    fn pick_photo(&mut self, scene: &Scene) -> Option<ObjectId> {
        scene.photo_ids().choose(&mut self.rng).copied()
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
