//! Frame scheduler — the detection loop and the render loop, interleaved on
//! one thread.
//!
//! ```text
//!   source thread ──LandmarkFrame──▶ DetectionLoop ──&mut──▶ InteractionState
//!                                                               │ &
//!                          FramePresenter ◀── SceneView ◀── RenderLoop
//! ```
//!
//! The landmark source is the only other thread and it never sees the
//! interaction state; it just sends frames.  Detection writes the state,
//! rendering reads it, and both run from [`FrameScheduler::run`], so the
//! borrow checker is the lock.

use std::sync::mpsc::{Receiver, TryRecvError};
use std::thread;
use std::time::{Duration, Instant};

use hand_gesture::{FrameGate, GestureClassifier, GestureReading, LandmarkFrame};
use tree_scene::{InteractionState, MotionIntegrator, ObjectId, Scene};

use crate::controller::SceneController;

// ════════════════════════════════════════════════════════════════════════════
// Detection loop
// ════════════════════════════════════════════════════════════════════════════

/// Whether the landmark source is still sending.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrackingStatus {
    Connected,
    Lost,
}

impl TrackingStatus {
    pub fn name(self) -> &'static str {
        match self {
            TrackingStatus::Connected => "tracking",
            TrackingStatus::Lost      => "tracking lost",
        }
    }
}

/// What one detection tick did.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Detection {
    /// No frame was waiting.
    Idle,
    /// The newest frame carried a timestamp already seen.
    Duplicate,
    /// New frame, no hand in it.
    NoHand,
    Classified(GestureReading),
}

pub struct DetectionLoop {
    frames:     Receiver<LandmarkFrame>,
    gate:       FrameGate,
    classifier: GestureClassifier,
    controller: SceneController,
    status:     TrackingStatus,
    last:       Option<GestureReading>,
}

impl DetectionLoop {
    pub fn new(
        frames:     Receiver<LandmarkFrame>,
        classifier: GestureClassifier,
        controller: SceneController,
    ) -> Self {
        DetectionLoop {
            frames,
            gate: FrameGate::new(),
            classifier,
            controller,
            status: TrackingStatus::Connected,
            last:   None,
        }
    }

    pub fn status(&self)       -> TrackingStatus          { self.status }
    pub fn last_reading(&self) -> Option<GestureReading>  { self.last }

    /// Drain the channel and process the newest frame, if any.
    pub fn poll(&mut self, state: &mut InteractionState, scene: &Scene) -> Detection {
        if self.status == TrackingStatus::Lost {
            return Detection::Idle;
        }

        let mut newest = None;
        loop {
            match self.frames.try_recv() {
                Ok(frame) => newest = Some(frame),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    log::warn!("landmark source disconnected; scene keeps its last mode");
                    self.status = TrackingStatus::Lost;
                    break;
                }
            }
        }

        match newest {
            Some(frame) => self.process(&frame, state, scene),
            None        => Detection::Idle,
        }
    }

    /// One frame through gate → classifier → controller.
    pub fn process(
        &mut self,
        frame: &LandmarkFrame,
        state: &mut InteractionState,
        scene: &Scene,
    ) -> Detection {
        if !self.gate.admit(frame.timestamp) {
            return Detection::Duplicate;
        }
        let Some(hand) = &frame.hand else {
            return Detection::NoHand;
        };

        let reading = self.classifier.classify(hand);
        state.set_pointer(reading.pointer);
        self.controller.apply(reading.gesture, state, scene);
        self.last = Some(reading);
        Detection::Classified(reading)
    }

    pub fn controller_mut(&mut self) -> &mut SceneController { &mut self.controller }
}

// ════════════════════════════════════════════════════════════════════════════
// Render loop
// ════════════════════════════════════════════════════════════════════════════

/// Longest step handed to the integrator; covers stalls such as a dragged
/// window.
const MAX_DT: f32 = 0.1;

pub struct RenderLoop {
    integrator: MotionIntegrator,
    last_tick:  Option<Instant>,
    ticks:      u64,
}

impl RenderLoop {
    pub fn new(integrator: MotionIntegrator) -> Self {
        RenderLoop { integrator, last_tick: None, ticks: 0 }
    }

    pub fn ticks(&self) -> u64 { self.ticks }

    /// Seconds since the previous call, clamped; the first call reports 0.
    pub fn elapsed(&mut self) -> f32 {
        let now = Instant::now();
        let dt = match self.last_tick {
            Some(prev) => now.duration_since(prev).as_secs_f32(),
            None       => 0.0,
        };
        self.last_tick = Some(now);
        dt.min(MAX_DT)
    }

    pub fn tick(&mut self, scene: &mut Scene, state: &InteractionState, dt: f32) {
        self.integrator.tick(scene, state, dt);
        self.ticks += 1;
    }

    /// Mean distance from each object to the position it is heading for.
    pub fn settle_distance(&self, scene: &Scene, state: &InteractionState) -> f32 {
        if scene.is_empty() {
            return 0.0;
        }
        let focus = state.focus_target();
        let total: f32 = scene.objects().iter().enumerate()
            .map(|(i, o)| {
                let goal = self.integrator.target_for(o, state.mode(), focus == Some(ObjectId(i)));
                o.transform.position.distance(goal.position)
            })
            .sum();
        total / scene.len() as f32
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Presenter seam
// ════════════════════════════════════════════════════════════════════════════

/// Read-only snapshot of everything a renderer needs for one frame.
#[derive(Clone, Copy)]
pub struct SceneView<'a> {
    pub scene:    &'a Scene,
    pub state:    &'a InteractionState,
    pub reading:  Option<GestureReading>,
    pub tracking: TrackingStatus,
    pub tick:     u64,
    /// See [`RenderLoop::settle_distance`].
    pub settle:   f32,
}

/// Anything that can show the scene.
pub trait FramePresenter {
    /// Draw one frame.  Returning false stops the scheduler.
    fn present(&mut self, view: SceneView<'_>) -> bool;

    /// Photo uploads requested since the last call.
    fn take_uploads(&mut self) -> usize { 0 }
}

/// Headless presenter: paces to a fixed refresh and logs a summary line
/// every `every` frames.
pub struct LogPresenter {
    refresh: Duration,
    every:   u64,
}

impl LogPresenter {
    pub fn new(refresh: Duration, every: u64) -> Self {
        LogPresenter { refresh, every: every.max(1) }
    }
}

impl FramePresenter for LogPresenter {
    fn present(&mut self, view: SceneView<'_>) -> bool {
        if view.tick % self.every == 0 {
            let gesture = view.reading.map_or("-", |r| r.gesture.name());
            log::info!(
                "tick {:>5}  {:<7} target={:<5} gesture={:<9} pointer=({:+.2}, {:+.2})  settle={:.3}  {}",
                view.tick,
                view.state.mode().name(),
                view.state.focus_target().map_or("-".to_string(), |id| id.0.to_string()),
                gesture,
                view.state.pointer().x,
                view.state.pointer().y,
                view.settle,
                view.tracking.name(),
            );
        }
        if !self.refresh.is_zero() {
            thread::sleep(self.refresh);
        }
        true
    }
}

// ════════════════════════════════════════════════════════════════════════════
// FrameScheduler
// ════════════════════════════════════════════════════════════════════════════

pub struct FrameScheduler {
    pub detection: DetectionLoop,
    pub render:    RenderLoop,
    /// Stop after this many render ticks; `None` runs until the presenter
    /// says stop.
    pub max_ticks: Option<u64>,
}

impl FrameScheduler {
    pub fn new(detection: DetectionLoop, render: RenderLoop) -> Self {
        FrameScheduler { detection, render, max_ticks: None }
    }

    /// One detection tick, one render tick, one present.  Returns false
    /// when the presenter asks to stop.
    pub fn step<P: FramePresenter + ?Sized>(
        &mut self,
        scene:     &mut Scene,
        state:     &mut InteractionState,
        presenter: &mut P,
        dt:        f32,
    ) -> bool {
        for _ in 0..presenter.take_uploads() {
            let texture = scene.next_texture_id();
            self.detection.controller_mut().ingest_photo(state, scene, texture);
        }

        self.detection.poll(state, scene);
        self.render.tick(scene, state, dt);

        let settle = self.render.settle_distance(scene, state);
        presenter.present(SceneView {
            scene:    &*scene,
            state:    &*state,
            reading:  self.detection.last_reading(),
            tracking: self.detection.status(),
            tick:     self.render.ticks(),
            settle,
        })
    }

    /// Run until the presenter stops or `max_ticks` is reached, timing each
    /// render tick off the wall clock.
    pub fn run<P: FramePresenter + ?Sized>(
        &mut self,
        scene:     &mut Scene,
        state:     &mut InteractionState,
        presenter: &mut P,
    ) {
        loop {
            if self.max_ticks.is_some_and(|max| self.render.ticks() >= max) {
                log::info!("stopping after {} ticks", self.render.ticks());
                return;
            }
            let dt = self.render.elapsed();
            if !self.step(scene, state, presenter, dt) {
                return;
            }
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
