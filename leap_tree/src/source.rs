//! Landmark sources — real hardware, keyboard/mouse simulation, or a script.
//!
//! Every source runs on its own thread and delivers [`LandmarkFrame`]s over a
//! `mpsc` channel.  The detection loop doesn't know or care which one it is
//! talking to.  A source that cannot start simply returns, which drops the
//! sender; the detection loop sees the disconnect and the scene carries on in
//! whatever mode it was in.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::time::{Duration, Instant};

use glam::Vec2;
use hand_gesture::{HandPose, LandmarkFrame};

/// Typical camera frame interval (30 fps).
pub const FRAME_INTERVAL: Duration = Duration::from_millis(33);

// ════════════════════════════════════════════════════════════════════════════
// LandmarkSource trait
// ════════════════════════════════════════════════════════════════════════════

/// Anything that can deliver [`LandmarkFrame`]s over a channel.
pub trait LandmarkSource: Send + 'static {
    fn run(self: Box<Self>, tx: Sender<LandmarkFrame>);
}

/// Spawn a landmark source on its own thread and return the receiving end.
pub fn spawn_landmark_source<S: LandmarkSource>(source: S) -> Receiver<LandmarkFrame> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || Box::new(source).run(tx));
    rx
}

/// Synthesize one frame; a bad palm position is logged and reported as "no
/// hand" rather than taking the source down.
fn synth_frame(timestamp: Duration, pose: Option<HandPose>, palm: Vec2) -> LandmarkFrame {
    let hand = pose.and_then(|p| match p.synthesize(palm) {
        Ok(hand) => Some(hand),
        Err(e) => {
            log::warn!("could not synthesize {} hand: {}", p.name(), e);
            None
        }
    });
    LandmarkFrame::new(timestamp, hand)
}

// ════════════════════════════════════════════════════════════════════════════
// SimLandmarkSource — keyboard/mouse simulation (always available)
// ════════════════════════════════════════════════════════════════════════════

/// Raw input from the simulation window.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SimInput {
    Pose(HandPose),
    /// Palm centre in normalized image coordinates.
    Palm(Vec2),
    /// Show or hide the hand (simulates the tracker losing it).
    ToggleHand,
    Quit,
}

/// Landmark source driven by [`SimInput`] events from the visualizer's
/// window.  Emits a synthetic frame every `frame_interval`, like a camera
/// would, whether or not the input changed.
pub struct SimLandmarkSource {
    pub rx:             Receiver<SimInput>,
    pub frame_interval: Duration,
}

impl SimLandmarkSource {
    pub fn new(rx: Receiver<SimInput>) -> Self {
        SimLandmarkSource { rx, frame_interval: FRAME_INTERVAL }
    }
}

impl LandmarkSource for SimLandmarkSource {
    fn run(self: Box<Self>, tx: Sender<LandmarkFrame>) {
        let start = Instant::now();
        let mut pose    = HandPose::Relaxed;
        let mut palm    = Vec2::splat(0.5);
        let mut visible = true;
        let mut next    = start;

        loop {
            let wait = next.saturating_duration_since(Instant::now());
            match self.rx.recv_timeout(wait) {
                Ok(SimInput::Pose(p))    => { pose = p; continue; }
                Ok(SimInput::Palm(p))    => { palm = p; continue; }
                Ok(SimInput::ToggleHand) => {
                    visible = !visible;
                    log::debug!("simulated hand {}", if visible { "shown" } else { "hidden" });
                    continue;
                }
                Ok(SimInput::Quit) | Err(RecvTimeoutError::Disconnected) => return,
                Err(RecvTimeoutError::Timeout) => {}
            }

            let frame = synth_frame(start.elapsed(), visible.then_some(pose), palm);
            if tx.send(frame).is_err() { return; }
            next += self.frame_interval;
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// ScriptedLandmarkSource — canned pose sequence (headless runs, tests)
// ════════════════════════════════════════════════════════════════════════════

/// `frames` frames of `pose` (or no hand), palm sliding from `from` to `to`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScriptStep {
    pub pose:   Option<HandPose>,
    pub from:   Vec2,
    pub to:     Vec2,
    pub frames: u32,
}

impl ScriptStep {
    pub fn hold(pose: HandPose, frames: u32) -> Self {
        ScriptStep { pose: Some(pose), from: Vec2::splat(0.5), to: Vec2::splat(0.5), frames }
    }

    pub fn sweep(pose: HandPose, from: Vec2, to: Vec2, frames: u32) -> Self {
        ScriptStep { pose: Some(pose), from, to, frames }
    }

    pub fn no_hand(frames: u32) -> Self {
        ScriptStep { pose: None, from: Vec2::splat(0.5), to: Vec2::splat(0.5), frames }
    }
}

/// Replays a list of [`ScriptStep`]s, then hangs up.
pub struct ScriptedLandmarkSource {
    pub steps:          Vec<ScriptStep>,
    pub frame_interval: Duration,
    /// Sleep `frame_interval` between frames; off for tests.
    pub realtime:       bool,
}

impl ScriptedLandmarkSource {
    pub fn new(steps: Vec<ScriptStep>) -> Self {
        ScriptedLandmarkSource { steps, frame_interval: FRAME_INTERVAL, realtime: true }
    }

    /// Gather the tree, scatter it while panning, focus a photo, lose the
    /// hand, gather again.
    pub fn demo() -> Self {
        let left  = Vec2::new(0.2, 0.5);
        let right = Vec2::new(0.8, 0.5);
        Self::new(vec![
            ScriptStep::hold(HandPose::Relaxed, 30),
            ScriptStep::hold(HandPose::Fist, 60),
            ScriptStep::sweep(HandPose::Open, left, right, 90),
            ScriptStep::sweep(HandPose::Relaxed, right, Vec2::splat(0.5), 30),
            ScriptStep::hold(HandPose::Pinch, 90),
            ScriptStep::no_hand(30),
            ScriptStep::hold(HandPose::Fist, 60),
        ])
    }

    /// Every frame the script produces, timestamped `frame_interval` apart.
    pub fn frames(&self) -> Vec<LandmarkFrame> {
        let mut out = Vec::new();
        for step in &self.steps {
            for k in 0..step.frames {
                let t = if step.frames > 1 { k as f32 / (step.frames - 1) as f32 } else { 0.0 };
                let timestamp = self.frame_interval * out.len() as u32;
                out.push(synth_frame(timestamp, step.pose, step.from.lerp(step.to, t)));
            }
        }
        out
    }
}

impl LandmarkSource for ScriptedLandmarkSource {
    fn run(self: Box<Self>, tx: Sender<LandmarkFrame>) {
        let frames = self.frames();
        log::info!("replaying {} scripted landmark frames", frames.len());
        for frame in frames {
            if tx.send(frame).is_err() { return; }
            if self.realtime {
                thread::sleep(self.frame_interval);
            }
        }
        log::info!("landmark script finished");
    }
}

// ════════════════════════════════════════════════════════════════════════════
// LeapLandmarkSource — real hardware (feature = "leap")
// ════════════════════════════════════════════════════════════════════════════

/// Landmark source backed by a real LeapMotion controller.
///
/// Requires the `leap` feature flag and the LeapC shared library installed.
///
/// Leap reports joints in millimetres above the device.  They are mapped
/// into the same normalized image plane a camera tracker would give: a
/// 400 mm wide box centred on the device for x, 100–400 mm height for y
/// (flipped, image y grows downward).  At that scale the classifier
/// thresholds land on real hand sizes: a pinch is ~20 mm, a fist ~100 mm of
/// wrist-to-fingertip reach, an open hand ~160 mm or more.
#[cfg(feature = "leap")]
pub struct LeapLandmarkSource;

#[cfg(feature = "leap")]
impl LandmarkSource for LeapLandmarkSource {
    fn run(self: Box<Self>, tx: Sender<LandmarkFrame>) {
        use hand_gesture::HandLandmarks;
        use leaprs::*;

        let mut connection = match Connection::create(ConnectionConfig::default()) {
            Ok(c)  => c,
            Err(e) => {
                log::error!("could not create LeapC connection: {:?}", e);
                return;
            }
        };
        if let Err(e) = connection.open() {
            log::error!("could not open LeapMotion device: {:?}", e);
            return;
        }
        log::info!("LeapMotion connection open");

        let start = Instant::now();
        loop {
            let msg = match connection.poll(100) {
                Ok(m)  => m,
                Err(_) => continue,
            };

            if let Event::Tracking(frame) = msg.event() {
                let hands: Vec<_> = frame.hands().collect();
                let landmarks = hands.first().and_then(|hand| {
                    let points = leap_landmarks(hand);
                    match HandLandmarks::new(&points) {
                        Ok(l)  => Some(l),
                        Err(e) => {
                            log::debug!("dropping leap hand: {}", e);
                            None
                        }
                    }
                });
                if tx.send(LandmarkFrame::new(start.elapsed(), landmarks)).is_err() {
                    return;
                }
            }
        }
    }
}

/// The 21 landmarks in camera-tracker order: wrist, then four joints per
/// digit from the thumb outward.
#[cfg(feature = "leap")]
fn leap_landmarks(hand: &leaprs::Hand) -> Vec<glam::Vec3> {
    const BOX_HALF_WIDTH: f32 = 200.0;
    const Y_LOW:          f32 = 100.0;
    const Y_SPAN:         f32 = 300.0;

    macro_rules! joint {
        ($j:expr) => {{
            let p = $j;
            glam::Vec3::new(
                (p.x + BOX_HALF_WIDTH) / (2.0 * BOX_HALF_WIDTH),
                1.0 - (p.y - Y_LOW) / Y_SPAN,
                p.z / (2.0 * BOX_HALF_WIDTH),
            )
        }};
    }

    let digits: Vec<_> = hand.digits().collect();
    let mut points = Vec::with_capacity(hand_gesture::LANDMARK_COUNT);
    if let Some(middle) = digits.get(2) {
        points.push(joint!(middle.metacarpal().prev_joint()));
    }
    for digit in &digits {
        points.push(joint!(digit.proximal().prev_joint()));
        points.push(joint!(digit.intermediate().prev_joint()));
        points.push(joint!(digit.distal().prev_joint()));
        points.push(joint!(digit.distal().next_joint()));
    }
    points
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use hand_gesture::{Gesture, GestureClassifier};

    fn gestures(frames: &[LandmarkFrame]) -> Vec<Option<Gesture>> {
        let c = GestureClassifier::default();
        frames.iter().map(|f| f.hand.as_ref().map(|h| c.classify(h).gesture)).collect()
    }

    #[test]
    fn script_expands_to_timed_frames() {
        let script = ScriptedLandmarkSource {
            steps: vec![ScriptStep::hold(HandPose::Fist, 3), ScriptStep::no_hand(2)],
            frame_interval: Duration::from_millis(10),
            realtime: false,
        };
        let frames = script.frames();
        assert_eq!(frames.len(), 5);
        for (i, f) in frames.iter().enumerate() {
            assert_eq!(f.timestamp, Duration::from_millis(10 * i as u64));
        }
        assert_eq!(
            gestures(&frames),
            vec![Some(Gesture::Fist), Some(Gesture::Fist), Some(Gesture::Fist), None, None]
        );
    }

    #[test]
    fn sweep_moves_the_palm_end_to_end() {
        let script = ScriptedLandmarkSource {
            steps: vec![ScriptStep::sweep(HandPose::Open, Vec2::new(0.0, 0.5), Vec2::new(1.0, 0.5), 11)],
            frame_interval: FRAME_INTERVAL,
            realtime: false,
        };
        let frames = script.frames();
        let c = GestureClassifier::default();
        let first = c.classify(frames[0].hand.as_ref().unwrap()).pointer;
        let last  = c.classify(frames[10].hand.as_ref().unwrap()).pointer;
        assert!((first.x + 1.0).abs() < 1e-5);
        assert!((last.x - 1.0).abs() < 1e-5);
    }

    #[test]
    fn demo_covers_every_gesture() {
        let frames = ScriptedLandmarkSource::demo().frames();
        let seen = gestures(&frames);
        for g in [Gesture::Fist, Gesture::Open, Gesture::Pinch, Gesture::Ambiguous] {
            assert!(seen.contains(&Some(g)), "{:?} missing", g);
        }
        assert!(seen.contains(&None));
    }

    #[test]
    fn scripted_source_hangs_up_when_done() {
        let script = ScriptedLandmarkSource {
            steps: vec![ScriptStep::hold(HandPose::Open, 4)],
            frame_interval: Duration::from_millis(1),
            realtime: false,
        };
        let rx = spawn_landmark_source(script);
        let received: Vec<_> = rx.iter().collect();
        assert_eq!(received.len(), 4);
    }

    #[test]
    fn sim_source_follows_input() {
        let (sim_tx, sim_rx) = mpsc::channel();
        let source = SimLandmarkSource { rx: sim_rx, frame_interval: Duration::from_millis(2) };
        let rx = spawn_landmark_source(source);

        sim_tx.send(SimInput::Pose(HandPose::Pinch)).unwrap();
        let c = GestureClassifier::default();
        let deadline = Instant::now() + Duration::from_secs(5);
        let mut saw_pinch = false;
        while Instant::now() < deadline {
            let frame = rx.recv_timeout(Duration::from_secs(1)).unwrap();
            if frame.hand.as_ref().map(|h| c.classify(h).gesture) == Some(Gesture::Pinch) {
                saw_pinch = true;
                break;
            }
        }
        assert!(saw_pinch);

        sim_tx.send(SimInput::ToggleHand).unwrap();
        let mut saw_empty = false;
        let deadline = Instant::now() + Duration::from_secs(5);
        while Instant::now() < deadline {
            if rx.recv_timeout(Duration::from_secs(1)).unwrap().hand.is_none() {
                saw_empty = true;
                break;
            }
        }
        assert!(saw_empty);

        sim_tx.send(SimInput::Quit).unwrap();
        while rx.recv_timeout(Duration::from_secs(1)).is_ok() {}
    }

    #[test]
    fn bad_palm_becomes_an_empty_frame() {
        let f = synth_frame(Duration::ZERO, Some(HandPose::Fist), Vec2::new(f32::NAN, 0.5));
        assert!(f.hand.is_none());
    }
}
