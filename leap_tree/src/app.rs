//! Application wiring.
//!
//! `run` builds the scene, starts the landmark source on its own thread, and
//! hands everything to the [`FrameScheduler`] with either the window or the
//! headless log presenter.

use std::sync::mpsc::{self, Receiver, Sender};
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use hand_gesture::{GestureClassifier, GestureThresholds, LandmarkFrame};
use tree_scene::{InteractionState, MotionConfig, MotionIntegrator, Scene, SceneConfig, Smoothing};

use crate::controller::SceneController;
use crate::error::AppError;
use crate::scheduler::{DetectionLoop, FrameScheduler, LogPresenter, RenderLoop};
use crate::source::{spawn_landmark_source, ScriptedLandmarkSource, SimInput, SimLandmarkSource};
use crate::visualizer::Visualizer;

// ════════════════════════════════════════════════════════════════════════════
// AppConfig
// ════════════════════════════════════════════════════════════════════════════

/// Where landmark frames come from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum SourceKind {
    /// Keyboard poses and mouse palm, in the window.
    Sim,
    /// Canned demo script.
    Script,
    /// LeapMotion controller (needs the `leap` feature).
    Leap,
}

/// Configuration for the full application.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub scene:      SceneConfig,
    pub motion:     MotionConfig,
    pub thresholds: GestureThresholds,
    /// `None` picks the simulator in a window and the script when headless.
    pub source:     Option<SourceKind>,
    pub headless:   bool,
    /// Stop after this many render ticks.
    pub ticks:      Option<u64>,
    /// Seeds layout and focus selection; entropy when unset.
    pub seed:       Option<u64>,
    /// Headless frame pacing.
    pub refresh:    Duration,
    /// Headless: log a status line every this many ticks.
    pub log_every:  u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            scene:      SceneConfig::default(),
            motion:     MotionConfig::default(),
            thresholds: GestureThresholds::default(),
            source:     None,
            headless:   false,
            ticks:      None,
            seed:       None,
            refresh:    Duration::from_millis(16),
            log_every:  60,
        }
    }
}

impl AppConfig {
    pub fn source_kind(&self) -> SourceKind {
        match (self.source, self.headless) {
            (Some(kind), _) => kind,
            (None, false)   => SourceKind::Sim,
            (None, true)    => SourceKind::Script,
        }
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if self.headless && self.source_kind() == SourceKind::Sim {
            return Err(AppError::Config("the keyboard simulator needs a window".into()));
        }
        if self.source_kind() == SourceKind::Leap && !cfg!(feature = "leap") {
            return Err(AppError::Config("built without the `leap` feature".into()));
        }
        let t = &self.thresholds;
        if !(t.pinch > 0.0 && t.fist < t.open) {
            return Err(AppError::Config(format!(
                "gesture thresholds out of order (pinch {}, fist {}, open {})",
                t.pinch, t.fist, t.open
            )));
        }
        // `contains` is false for NaN, so this also rejects non-finite values.
        if !(0.0..=1.0).contains(&self.motion.smoothing)
            || !(0.0..=1.0).contains(&self.motion.pointer_smoothing)
        {
            return Err(AppError::Config("smoothing factors must lie in [0, 1]".into()));
        }
        if let Smoothing::FrameRateIndependent { reference_hz } = self.motion.smoothing_mode {
            if !reference_hz.is_finite() || reference_hz <= 0.0 {
                return Err(AppError::Config(format!("reference rate {reference_hz} Hz must be positive and finite")));
            }
        }
        Ok(())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Wiring
// ════════════════════════════════════════════════════════════════════════════

/// Start the landmark source.  The simulator also hands back the sender the
/// window feeds it through.
fn start_source(kind: SourceKind) -> Result<(Receiver<LandmarkFrame>, Option<Sender<SimInput>>), AppError> {
    match kind {
        SourceKind::Sim => {
            let (sim_tx, sim_rx) = mpsc::channel::<SimInput>();
            Ok((spawn_landmark_source(SimLandmarkSource::new(sim_rx)), Some(sim_tx)))
        }
        SourceKind::Script => Ok((spawn_landmark_source(ScriptedLandmarkSource::demo()), None)),
        #[cfg(feature = "leap")]
        SourceKind::Leap => {
            Ok((spawn_landmark_source(crate::source::LeapLandmarkSource), None))
        }
        #[cfg(not(feature = "leap"))]
        SourceKind::Leap => Err(AppError::Config("built without the `leap` feature".into())),
    }
}

/// Scene plus scheduler, ready to run.
pub struct App {
    pub scene:     Scene,
    pub state:     InteractionState,
    pub scheduler: FrameScheduler,
}

impl App {
    pub fn new(cfg: &AppConfig, frames: Receiver<LandmarkFrame>) -> Self {
        let mut rng = match cfg.seed {
            Some(s) => StdRng::seed_from_u64(s),
            None    => StdRng::from_entropy(),
        };
        let scene = Scene::build(&cfg.scene, &mut rng);
        let controller = SceneController::new(StdRng::seed_from_u64(rng.gen()));

        let detection = DetectionLoop::new(frames, GestureClassifier::new(cfg.thresholds), controller);
        let render    = RenderLoop::new(MotionIntegrator::new(cfg.motion.clone()));
        let mut scheduler = FrameScheduler::new(detection, render);
        scheduler.max_ticks = cfg.ticks;

        App { scene, state: InteractionState::new(), scheduler }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// run() — the main application loop
// ════════════════════════════════════════════════════════════════════════════

/// Run the full application.
///
/// This is the entry point called from `main.rs`.  Errors are only possible
/// before the loop starts; once frames are flowing nothing stops it but the
/// user, the window closing, or the tick limit.
pub fn run(cfg: AppConfig) -> Result<(), AppError> {
    cfg.validate()?;
    let kind = cfg.source_kind();
    let (frames, sim_tx) = start_source(kind)?;
    let mut app = App::new(&cfg, frames);

    log::info!(
        "{} objects, {} photos, {} dust points; source {:?}",
        app.scene.len(), app.scene.photo_ids().len(),
        app.scene.dust.points().len(), kind,
    );

    let App { scene, state, scheduler } = &mut app;
    if cfg.headless {
        let mut presenter = LogPresenter::new(cfg.refresh, cfg.log_every);
        scheduler.run(scene, state, &mut presenter);
    } else {
        let mut presenter = Visualizer::new(sim_tx)?;
        scheduler.run(scene, state, &mut presenter);
    }

    log::info!("finished in {} mode", app.state.mode().name());
    Ok(())
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
