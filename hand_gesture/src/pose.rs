//! Synthetic hand poses.
//!
//! Builds plausible 21-point landmark sets for a handful of canonical hand
//! shapes, centred on a chosen palm position.  The keyboard simulator uses
//! them in place of a camera, and the tests use them as fixtures.  Each shape
//! is laid out so the classifier reads it unambiguously:
//!
//! | Pose | Fingertip spread | Thumb ↔ index |
//! |---|---|---|
//! | `Fist` | 0.15 | ≈ 0.14 |
//! | `Relaxed` | 0.32 | ≈ 0.23 |
//! | `Open` | 0.48 | > 0.3 |
//! | `Pinch` | 0.32 | 0.015 |

use glam::{Vec2, Vec3};

use crate::landmark::{
    HandLandmarks, LandmarkError, FINGERTIPS, INDEX_MCP, LANDMARK_COUNT, MIDDLE_MCP,
    PINKY_MCP, RING_MCP, THUMB_TIP, WRIST,
};

/// Wrist sits this far below the palm centre.
const WRIST_DROP:   f32 = 0.15;
/// Knuckle (MCP) distance from the wrist.
const KNUCKLE_REACH: f32 = 0.15;
const THUMB_REACH:  f32 = 0.2;
const THUMB_ANGLE:  f32 = -160.0;
/// Fingertip directions from the wrist, degrees (image y grows downward, so
/// negative angles point up).
const FINGER_ANGLES: [f32; 4] = [-115.0, -97.0, -83.0, -65.0];
const FINGER_MCPS:   [usize; 4] = [INDEX_MCP, MIDDLE_MCP, RING_MCP, PINKY_MCP];
const PINCH_GAP:    Vec2 = Vec2::new(0.015, 0.0);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HandPose {
    Fist,
    Relaxed,
    Open,
    Pinch,
}

impl HandPose {
    pub fn name(self) -> &'static str {
        match self {
            HandPose::Fist    => "fist",
            HandPose::Relaxed => "relaxed",
            HandPose::Open    => "open",
            HandPose::Pinch   => "pinch",
        }
    }

    /// Wrist-to-fingertip distance for this pose.
    pub fn reach(self) -> f32 {
        match self {
            HandPose::Fist                       => 0.15,
            HandPose::Relaxed | HandPose::Pinch  => 0.32,
            HandPose::Open                       => 0.48,
        }
    }

    /// Landmarks for this pose with the palm centre at `palm`.
    pub fn synthesize(self, palm: Vec2) -> Result<HandLandmarks, LandmarkError> {
        let wrist = palm + Vec2::new(0.0, WRIST_DROP);
        let mut pts = [Vec2::ZERO; LANDMARK_COUNT];
        pts[WRIST] = wrist;

        for ((&angle, &mcp), &tip) in FINGER_ANGLES.iter().zip(&FINGER_MCPS).zip(&FINGERTIPS) {
            let dir = direction(angle);
            let knuckle = if mcp == MIDDLE_MCP { palm } else { wrist + dir * KNUCKLE_REACH };
            let end = wrist + dir * self.reach();
            pts[mcp]     = knuckle;
            pts[mcp + 1] = knuckle.lerp(end, 1.0 / 3.0);
            pts[mcp + 2] = knuckle.lerp(end, 2.0 / 3.0);
            pts[tip]     = end;
        }

        let thumb_tip = match self {
            HandPose::Pinch => pts[FINGERTIPS[0]] + PINCH_GAP,
            _               => wrist + direction(THUMB_ANGLE) * THUMB_REACH,
        };
        for (k, idx) in (1..THUMB_TIP).enumerate() {
            pts[idx] = wrist.lerp(thumb_tip, (k + 1) as f32 / 4.0);
        }
        pts[THUMB_TIP] = thumb_tip;

        let lifted: Vec<Vec3> = pts.iter().map(|p| p.extend(0.0)).collect();
        HandLandmarks::new(&lifted)
    }
}

fn direction(degrees: f32) -> Vec2 {
    let (s, c) = degrees.to_radians().sin_cos();
    Vec2::new(c, s)
}
