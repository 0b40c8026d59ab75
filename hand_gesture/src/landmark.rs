//! Hand landmarks — the 21 normalized points a hand tracker reports.
//!
//! Ordering follows the common 21-point hand topology:
//!
//! ```text
//!  0 wrist
//!  1–4   thumb   (CMC, MCP, IP, tip)
//!  5–8   index   (MCP, PIP, DIP, tip)
//!  9–12  middle  (MCP, PIP, DIP, tip)     9 doubles as the palm centre
//! 13–16  ring
//! 17–20  pinky
//! ```
//!
//! Coordinates are camera-normalized: `x, y ∈ [0, 1]`, `y` growing downward,
//! `z` relative depth (ignored by the classifier).

use glam::{Vec2, Vec3};
use thiserror::Error;

pub const LANDMARK_COUNT: usize = 21;

pub const WRIST:       usize = 0;
pub const THUMB_TIP:   usize = 4;
pub const INDEX_MCP:   usize = 5;
pub const INDEX_TIP:   usize = 8;
pub const MIDDLE_MCP:  usize = 9;
pub const MIDDLE_TIP:  usize = 12;
pub const RING_MCP:    usize = 13;
pub const RING_TIP:    usize = 16;
pub const PINKY_MCP:   usize = 17;
pub const PINKY_TIP:   usize = 20;
pub const PALM_CENTER: usize = MIDDLE_MCP;

/// The four non-thumb fingertips.
pub const FINGERTIPS: [usize; 4] = [INDEX_TIP, MIDDLE_TIP, RING_TIP, PINKY_TIP];

#[derive(Debug, Error, Clone, PartialEq)]
pub enum LandmarkError {
    #[error("expected 21 landmarks, got {0}")]
    Count(usize),

    #[error("landmark {index} is not finite: {point:?}")]
    NonFinite { index: usize, point: Vec3 },
}

/// One detected hand: exactly [`LANDMARK_COUNT`] finite points.
#[derive(Clone, Debug, PartialEq)]
pub struct HandLandmarks {
    points: [Vec3; LANDMARK_COUNT],
}

impl HandLandmarks {
    /// Validate and wrap a tracker's output.
    pub fn new(points: &[Vec3]) -> Result<Self, LandmarkError> {
        let points: [Vec3; LANDMARK_COUNT] = points
            .try_into()
            .map_err(|_| LandmarkError::Count(points.len()))?;

        if let Some((index, &point)) = points.iter().enumerate().find(|(_, p)| !p.is_finite()) {
            return Err(LandmarkError::NonFinite { index, point });
        }
        Ok(HandLandmarks { points })
    }

    /// Same as [`new`](Self::new) for trackers that only report `x, y`.
    pub fn from_xy(points: &[Vec2]) -> Result<Self, LandmarkError> {
        let lifted: Vec<Vec3> = points.iter().map(|p| p.extend(0.0)).collect();
        Self::new(&lifted)
    }

    /// Landmark `index`, or `None` past the last one.
    pub fn get(&self, index: usize) -> Option<Vec3> { self.points.get(index).copied() }

    pub fn points(&self) -> &[Vec3; LANDMARK_COUNT] { &self.points }

    /// Image-plane position of landmark `index`.  Callers pass the named
    /// index constants, which are all in range.
    pub(crate) fn xy(&self, index: usize) -> Vec2 { self.points[index].truncate() }

    /// Image-plane distance between two landmarks (depth ignored).
    pub(crate) fn planar_distance(&self, a: usize, b: usize) -> f32 {
        self.xy(a).distance(self.xy(b))
    }
}
