//! # tree_scene
//!
//! Scene model and animation engine for a gesture-driven tree of floating
//! objects (ornaments, candy canes, photos) plus an ambient dust cloud.
//!
//! ## Arrangements
//!
//! | Mode | What the objects do |
//! |---|---|
//! | `Tree` | gather onto a tapering spiral, facing outward; the group idles round |
//! | `Scatter` | drift to points on a shell of radius 8–20 and spin freely |
//! | `Focus` | one photo comes up to the camera at 4.5× size; the rest back off |
//!
//! The crate knows nothing about cameras, hands or windows: it is driven by an
//! [`InteractionState`] written elsewhere and it exposes plain transforms for
//! whoever draws them.
//!
//! ## Quick start
//!
//! ```rust
//! use rand::SeedableRng;
//! use tree_scene::{InteractionState, Mode, MotionIntegrator, Scene, SceneConfig};
//!
//! let mut rng   = rand::rngs::StdRng::seed_from_u64(1);
//! let mut scene = Scene::build(&SceneConfig::default(), &mut rng);
//! let mut state = InteractionState::new();
//! let motion    = MotionIntegrator::default();
//!
//! state.set_mode(Mode::Scatter);
//! for _ in 0..60 {
//!     motion.tick(&mut scene, &state, 1.0 / 60.0);
//! }
//! ```

pub mod layout;
pub mod object;
pub mod interaction;
pub mod motion;
pub mod scene;

pub use interaction::{InteractionState, Mode};
pub use layout::TreeTarget;
pub use motion::{DustCloud, GroupRotation, MotionConfig, MotionIntegrator, Smoothing};
pub use object::{Category, ManagedObject, ObjectId, TextureId, Transform};
pub use scene::{Scene, SceneConfig};
