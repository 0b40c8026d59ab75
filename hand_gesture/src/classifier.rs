//! Gesture classifier — one landmark frame in, one [`GestureReading`] out.
//!
//! # Algorithm
//!
//! All distances are measured in the image plane (x, y only):
//!
//! * **pinch distance**: thumb tip ↔ index tip.
//! * **spread**: mean of wrist ↔ {index, middle, ring, pinky} tip.
//!
//! Classification, first match wins:
//!
//! | Test | Gesture |
//! |---|---|
//! | pinch < 0.05 | [`Gesture::Pinch`] |
//! | spread < 0.25 | [`Gesture::Fist`] |
//! | spread > 0.4 | [`Gesture::Open`] |
//! | otherwise | [`Gesture::Ambiguous`] |
//!
//! The pointer signal comes from the palm centre regardless of the gesture:
//! `((x − 0.5)·2, (y − 0.5)·1)` — horizontal spans ±1, vertical only ±0.5.
//!
//! The thresholds are tuned for normalized camera coordinates; changing them
//! changes how the scene feels, so they live in [`GestureThresholds`] with the
//! tuned values as the default.

use glam::Vec2;

use crate::landmark::{HandLandmarks, FINGERTIPS, INDEX_TIP, PALM_CENTER, THUMB_TIP, WRIST};

// ════════════════════════════════════════════════════════════════════════════
// Gesture
// ════════════════════════════════════════════════════════════════════════════

/// Discrete reading of the hand shape.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Gesture {
    /// Thumb and index tips touching.
    Pinch,
    /// Fingertips curled in toward the wrist.
    Fist,
    /// Fingers spread wide.
    Open,
    /// Between fist and open: no decision.
    Ambiguous,
}

impl Gesture {
    pub fn name(self) -> &'static str {
        match self {
            Gesture::Pinch     => "pinch",
            Gesture::Fist      => "fist",
            Gesture::Open      => "open",
            Gesture::Ambiguous => "ambiguous",
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Thresholds
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GestureThresholds {
    /// Pinch when thumb–index distance is below this.
    pub pinch:       f32,
    /// Fist when mean fingertip spread is below this.
    pub fist:        f32,
    /// Open when mean fingertip spread is above this.
    pub open:        f32,
    pub pointer_gain: Vec2,
}

impl Default for GestureThresholds {
    fn default() -> Self {
        GestureThresholds {
            pinch:        0.05,
            fist:         0.25,
            open:         0.4,
            pointer_gain: Vec2::new(2.0, 1.0),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// GestureReading
// ════════════════════════════════════════════════════════════════════════════

/// Everything the classifier derives from one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GestureReading {
    pub gesture:          Gesture,
    pub pointer:          Vec2,
    pub pinch_distance:   f32,
    pub avg_tip_distance: f32,
}

// ════════════════════════════════════════════════════════════════════════════
// GestureClassifier
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug, Default)]
pub struct GestureClassifier {
    thresholds: GestureThresholds,
}

impl GestureClassifier {
    pub fn new(thresholds: GestureThresholds) -> Self {
        GestureClassifier { thresholds }
    }

    pub fn thresholds(&self) -> &GestureThresholds { &self.thresholds }

    pub fn classify(&self, hand: &HandLandmarks) -> GestureReading {
        let pinch_distance   = pinch_distance(hand);
        let avg_tip_distance = avg_tip_distance(hand);
        let gesture          = self.bucket(pinch_distance, avg_tip_distance);

        log::trace!(
            "classified {} (pinch={:.3} spread={:.3})",
            gesture.name(), pinch_distance, avg_tip_distance
        );

        GestureReading {
            gesture,
            pointer: self.pointer(hand),
            pinch_distance,
            avg_tip_distance,
        }
    }

    /// Threshold ladder on the two measured distances.
    pub fn bucket(&self, pinch_distance: f32, avg_tip_distance: f32) -> Gesture {
        let t = &self.thresholds;
        if pinch_distance < t.pinch {
            Gesture::Pinch
        } else if avg_tip_distance < t.fist {
            Gesture::Fist
        } else if avg_tip_distance > t.open {
            Gesture::Open
        } else {
            Gesture::Ambiguous
        }
    }

    fn pointer(&self, hand: &HandLandmarks) -> Vec2 {
        (hand.xy(PALM_CENTER) - Vec2::splat(0.5)) * self.thresholds.pointer_gain
    }
}

/// Thumb tip ↔ index tip, image plane.
pub fn pinch_distance(hand: &HandLandmarks) -> f32 {
    hand.planar_distance(THUMB_TIP, INDEX_TIP)
}

/// Mean wrist ↔ fingertip distance over the four non-thumb fingers.
pub fn avg_tip_distance(hand: &HandLandmarks) -> f32 {
    let sum: f32 = FINGERTIPS.iter().map(|&tip| hand.planar_distance(WRIST, tip)).sum();
    sum / FINGERTIPS.len() as f32
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
