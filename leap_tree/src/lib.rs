//! # leap_tree
//!
//! Hand-gesture controller for a tree of floating ornaments, candy canes and
//! photos, with a software-rendered window.
//!
//! ## Gesture → Mode mapping
//!
//! | Gesture | Mode | What happens |
//! |---|---|---|
//! | Fist | `TREE` | objects gather onto the spiral; the tree idles round |
//! | Open hand | `SCATTER` | objects drift out to a shell and tumble |
//! | Pinch | `FOCUS` | one photo comes up to the camera; the rest back off |
//! | anything else | — | mode unchanged |
//!
//! The palm position steers the whole group in every mode.  Holding a pinch
//! keeps the same photo; a fist or open hand releases it.
//!
//! ## Feature flags
//!
//! * (default) — **Simulation mode**: keyboard poses, mouse palm.
//! * `leap` — **Hardware mode**: polls a real LeapMotion controller via LeapC.
//!
//! ### Simulation keyboard shortcuts
//!
//! | Key | Action |
//! |---|---|
//! | `F` | Fist |
//! | `O` | Open hand |
//! | `P` | Pinch |
//! | `R` | Relaxed hand (no gesture) |
//! | `H` | Hide / show the hand |
//! | mouse | Palm position |
//! | `U` | Add a photo |
//! | `Q` / `Escape` | Quit |

pub mod error;
pub mod controller;
pub mod source;
pub mod scheduler;
pub mod visualizer;
pub mod app;

pub use error::AppError;
