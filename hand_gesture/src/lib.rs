//! # hand_gesture
//!
//! Turns single-hand landmark frames into discrete gestures and a continuous
//! pointer signal.
//!
//! | Gesture | Hand shape | Measured by |
//! |---|---|---|
//! | Pinch | thumb tip on index tip | thumb ↔ index < 0.05 |
//! | Fist | fingers curled | mean wrist ↔ fingertip < 0.25 |
//! | Open | fingers spread | mean wrist ↔ fingertip > 0.4 |
//! | Ambiguous | anything in between | — |
//!
//! The tracker itself is not part of this crate: anything that can produce a
//! [`LandmarkFrame`] (camera model, LeapMotion, keyboard simulator) feeds it.

pub mod landmark;
pub mod classifier;
pub mod frame;
pub mod pose;

pub use classifier::{Gesture, GestureClassifier, GestureReading, GestureThresholds};
pub use frame::{FrameGate, LandmarkFrame};
pub use landmark::{HandLandmarks, LandmarkError, LANDMARK_COUNT};
pub use pose::HandPose;
