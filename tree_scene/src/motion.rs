//! Motion integrator — moves every object a step toward the transform its
//! mode asks for, once per render tick.
//!
//! # Smoothing
//!
//! Each tick, position, scale and orientation close a fixed fraction
//! ([`MotionConfig::smoothing`], 0.05) of the remaining gap:
//!
//! ```text
//! current += (target − current) × 0.05
//! ```
//!
//! That fraction is applied **per tick**, not per second, so the apparent speed
//! depends on the refresh rate.  [`Smoothing::FrameRateIndependent`] converts
//! it to a time-scaled decay that matches the per-tick behaviour at a chosen
//! reference rate; it is opt-in.
//!
//! # Per-mode targets
//!
//! | Mode | Position | Scale | Orientation |
//! |---|---|---|---|
//! | Tree | tree target | base | tree orientation (slerp) |
//! | Scatter | scatter target | base | free spin, `+= scatter_spin` per tick |
//! | Focus, focused object | [`MotionConfig::focus_position`] | base × 4.5 | identity |
//! | Focus, everything else | scatter target × 1.5 | base | identity |

use glam::{Quat, Vec2, Vec3};

use crate::interaction::{InteractionState, Mode};
use crate::object::{ManagedObject, ObjectId};
use crate::scene::Scene;

// ════════════════════════════════════════════════════════════════════════════
// MotionConfig
// ════════════════════════════════════════════════════════════════════════════

/// How the per-tick blend factor relates to elapsed time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Smoothing {
    /// Fixed fraction every tick, independent of `dt`.
    PerTick,
    /// `1 − (1 − α)^(dt · reference_hz)`: identical to `PerTick` when ticks
    /// arrive at `reference_hz`, and rate-independent otherwise.
    FrameRateIndependent { reference_hz: f32 },
}

#[derive(Clone, Debug, PartialEq)]
pub struct MotionConfig {
    /// Fraction of the remaining gap closed per tick.
    pub smoothing:         f32,
    pub smoothing_mode:    Smoothing,
    /// Fraction per tick by which the group rotation follows the pointer.
    pub pointer_smoothing: f32,
    /// Where the focused photo is brought, in front of the camera.
    pub focus_position:    Vec3,
    pub focus_scale:       f32,
    /// Multiplier applied to scatter targets of everything not in focus.
    pub focus_pushback:    f32,
    /// Dust cloud yaw rate, radians per second.
    pub dust_spin_rate:    f32,
    /// Extra group yaw while in tree mode, radians per second.
    pub idle_spin_rate:    f32,
}

impl Default for MotionConfig {
    fn default() -> Self {
        MotionConfig {
            smoothing:         0.05,
            smoothing_mode:    Smoothing::PerTick,
            pointer_smoothing: 0.05,
            focus_position:    Vec3::new(0.0, 2.0, 35.0),
            focus_scale:       4.5,
            focus_pushback:    1.5,
            dust_spin_rate:    0.05,
            idle_spin_rate:    0.3,
        }
    }
}

impl MotionConfig {
    /// Blend factor to use this tick for a nominal per-tick fraction `alpha`.
    pub fn blend(&self, alpha: f32, dt: f32) -> f32 {
        match self.smoothing_mode {
            Smoothing::PerTick => alpha,
            Smoothing::FrameRateIndependent { reference_hz } => {
                1.0 - (1.0 - alpha).powf(dt.max(0.0) * reference_hz)
            }
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Aggregates
// ════════════════════════════════════════════════════════════════════════════

/// The ambient dust: one point cloud rotating about the vertical axis.
#[derive(Clone, Debug, Default)]
pub struct DustCloud {
    points:         Vec<Vec3>,
    pub rotation_y: f32,
}

impl DustCloud {
    pub fn new(points: Vec<Vec3>) -> Self {
        DustCloud { points, rotation_y: 0.0 }
    }

    pub fn points(&self) -> &[Vec3] { &self.points }

    pub fn advance(&mut self, delta: f32) {
        self.rotation_y += delta;
    }
}

/// Bulk rotation applied to the whole object group (pitch about X, yaw
/// about Y).  `yaw` eases toward the pointer; `idle` accumulates the Tree
/// idle spin on its own so the easing never pulls it back.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GroupRotation {
    pub pitch: f32,
    pub yaw:   f32,
    pub idle:  f32,
}

impl GroupRotation {
    /// Ease toward the pointer: x drives yaw, y drives pitch.
    pub fn follow(&mut self, pointer: Vec2, blend: f32) {
        self.yaw   += (pointer.x - self.yaw)   * blend;
        self.pitch += (pointer.y - self.pitch) * blend;
    }

    pub fn spin(&mut self, delta: f32) {
        self.idle += delta;
    }

    /// Pointer yaw plus idle spin.
    pub fn total_yaw(&self) -> f32 { self.yaw + self.idle }

    pub fn as_quat(&self) -> Quat {
        Quat::from_rotation_x(self.pitch) * Quat::from_rotation_y(self.total_yaw())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Targets
// ════════════════════════════════════════════════════════════════════════════

/// Where one object is headed this tick.  `orientation` is `None` in scatter
/// mode, where the free spin replaces orientation smoothing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ObjectTarget {
    pub position:    Vec3,
    pub scale:       Vec3,
    pub orientation: Option<Quat>,
}

// ════════════════════════════════════════════════════════════════════════════
// MotionIntegrator
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug, Default)]
pub struct MotionIntegrator {
    config: MotionConfig,
}

impl MotionIntegrator {
    pub fn new(config: MotionConfig) -> Self {
        MotionIntegrator { config }
    }

    pub fn config(&self) -> &MotionConfig { &self.config }

    /// Target for `object` under `mode`; `focused` says whether it is the
    /// current focus target.
    pub fn target_for(&self, object: &ManagedObject, mode: Mode, focused: bool) -> ObjectTarget {
        let base = object.base_scale();
        match mode {
            Mode::Tree => ObjectTarget {
                position:    object.tree_target().position,
                scale:       base,
                orientation: Some(object.tree_target().orientation),
            },
            Mode::Scatter => ObjectTarget {
                position:    object.scatter_target(),
                scale:       base,
                orientation: None,
            },
            Mode::Focus if focused => ObjectTarget {
                position:    self.config.focus_position,
                scale:       base * self.config.focus_scale,
                orientation: Some(Quat::IDENTITY),
            },
            Mode::Focus => ObjectTarget {
                position:    object.scatter_target() * self.config.focus_pushback,
                scale:       base,
                orientation: Some(Quat::IDENTITY),
            },
        }
    }

    /// Advance one object by one tick toward `target`.
    pub fn step(&self, object: &mut ManagedObject, target: &ObjectTarget, blend: f32) {
        let spin = object.scatter_spin();
        let t = &mut object.transform;

        t.position = t.position.lerp(target.position, blend);
        t.scale    = t.scale.lerp(target.scale, blend);

        match target.orientation {
            Some(goal) => {
                let q = t.orientation().slerp(goal, blend);
                t.set_orientation(q);
            }
            None => t.rotate_by(spin),
        }
    }

    /// One render tick: every object, then the dust and the group.
    pub fn tick(&self, scene: &mut Scene, state: &InteractionState, dt: f32) {
        let mode  = state.mode();
        let focus = state.focus_target();
        let blend = self.config.blend(self.config.smoothing, dt);

        for (i, object) in scene.objects_mut().iter_mut().enumerate() {
            let target = self.target_for(object, mode, focus == Some(ObjectId(i)));
            self.step(object, &target, blend);
        }

        scene.dust.advance(self.config.dust_spin_rate * dt);

        let pointer_blend = self.config.blend(self.config.pointer_smoothing, dt);
        scene.group.follow(state.pointer(), pointer_blend);
        if mode == Mode::Tree {
            scene.group.spin(self.config.idle_spin_rate * dt);
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::{Category, TextureId};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const DT: f32 = 0.016;

    fn scene_with(categories: &[Category]) -> Scene {
        let mut rng = StdRng::seed_from_u64(42);
        let mut scene = Scene::empty();
        for (i, &c) in categories.iter().enumerate() {
            let tex = if c == Category::Photo { Some(TextureId(i as u32)) } else { None };
            scene.spawn(c, tex, &mut rng);
        }
        scene
    }

    fn angle_between(a: Quat, b: Quat) -> f32 {
        a.angle_between(b)
    }

    #[test]
    fn tree_distance_decays_geometrically() {
        let mut scene = scene_with(&[Category::Ornament, Category::Candy, Category::Photo]);
        let state = InteractionState::new();
        let integrator = MotionIntegrator::default();

        let dist = |s: &Scene| -> Vec<f32> {
            s.objects().iter()
                .map(|o| o.transform.position.distance(o.tree_target().position))
                .collect()
        };

        let mut before = dist(&scene);
        for _ in 0..60 {
            integrator.tick(&mut scene, &state, DT);
            let after = dist(&scene);
            for (b, a) in before.iter().zip(&after) {
                assert!(a < b, "distance did not shrink: {} -> {}", b, a);
                assert!((a / b - 0.95).abs() < 1e-3, "ratio {}", a / b);
            }
            before = after;
        }
    }

    #[test]
    fn tree_never_overshoots_on_any_axis() {
        let mut scene = scene_with(&[Category::Ornament]);
        let state = InteractionState::new();
        let integrator = MotionIntegrator::default();
        let target = scene.objects()[0].tree_target().position;
        let start  = scene.objects()[0].transform.position;
        let sign0  = (target - start).signum();

        for _ in 0..500 {
            integrator.tick(&mut scene, &state, DT);
            let gap = target - scene.objects()[0].transform.position;
            for axis in 0..3 {
                assert!(gap[axis] == 0.0 || gap[axis].signum() == sign0[axis]);
            }
        }
        assert!(scene.objects()[0].transform.position.distance(target) < 1e-3);
    }

    #[test]
    fn tree_orientation_converges() {
        let mut scene = scene_with(&[Category::Candy]);
        let state = InteractionState::new();
        let integrator = MotionIntegrator::default();
        let goal = scene.objects()[0].tree_target().orientation;

        let mut prev = angle_between(scene.objects()[0].transform.orientation(), goal);
        for _ in 0..200 {
            integrator.tick(&mut scene, &state, DT);
            let now = angle_between(scene.objects()[0].transform.orientation(), goal);
            // `angle_between` is acos-based, so allow its noise near zero.
            assert!(now <= prev + 2e-3);
            prev = now;
        }
        assert!(prev < 5e-3, "still {} rad away", prev);
    }

    #[test]
    fn orientation_converges_near_gimbal_lock() {
        let integrator = MotionIntegrator::default();
        let mut rng = StdRng::seed_from_u64(9);
        for i in 0..40 {
            let mut obj = ManagedObject::spawn(Category::Candy, Vec3::ONE, None, &mut rng);
            let yaw  = -std::f32::consts::FRAC_PI_2 + (i as f32 - 20.0) * 5e-4;
            let goal = crate::layout::euler_to_quat(Vec3::new(0.3 * i as f32, yaw, -0.2 * i as f32));
            let target = ObjectTarget { position: Vec3::ZERO, scale: Vec3::ONE, orientation: Some(goal) };
            for _ in 0..400 {
                integrator.step(&mut obj, &target, 0.05);
            }
            let err = angle_between(obj.transform.orientation(), goal);
            assert!(err < 5e-3, "yaw {yaw}: still {err} rad away");
        }
    }

    #[test]
    fn scatter_spins_by_exactly_one_step_per_tick() {
        let mut scene = scene_with(&[Category::Ornament, Category::Candy]);
        let mut state = InteractionState::new();
        state.set_mode(Mode::Scatter);
        let integrator = MotionIntegrator::default();

        let before: Vec<ManagedObject> = scene.objects().to_vec();
        integrator.tick(&mut scene, &state, DT);

        for (old, new) in before.iter().zip(scene.objects()) {
            assert_eq!(new.transform.rotation(), old.transform.rotation() + old.scatter_spin());

            let gap_before = old.scatter_target() - old.transform.position;
            let gap_after  = new.scatter_target() - new.transform.position;
            assert!((gap_after - gap_before * 0.95).length() < 1e-4);
        }
    }

    #[test]
    fn scatter_spin_ignores_dt() {
        let mut a = scene_with(&[Category::Ornament]);
        let mut b = scene_with(&[Category::Ornament]);
        let mut state = InteractionState::new();
        state.set_mode(Mode::Scatter);
        let integrator = MotionIntegrator::default();

        integrator.tick(&mut a, &state, 0.001);
        integrator.tick(&mut b, &state, 0.5);
        assert_eq!(a.objects()[0].transform.rotation(), b.objects()[0].transform.rotation());
        assert_eq!(a.objects()[0].transform.position, b.objects()[0].transform.position);
    }

    #[test]
    fn focus_brings_target_forward_and_pushes_others_back() {
        let mut scene = scene_with(&[Category::Ornament, Category::Photo]);
        let mut state = InteractionState::new();
        state.enter_focus(Some(ObjectId(1)));
        let integrator = MotionIntegrator::default();
        let cfg = integrator.config().clone();

        for _ in 0..400 {
            integrator.tick(&mut scene, &state, DT);
        }

        let photo = &scene.objects()[1];
        assert!(photo.transform.position.distance(cfg.focus_position) < 1e-2);
        assert!((photo.transform.scale - photo.base_scale() * 4.5).length() < 1e-2);
        assert!(angle_between(photo.transform.orientation(), Quat::IDENTITY) < 1e-2);

        let other = &scene.objects()[0];
        assert!(other.transform.position.distance(other.scatter_target() * 1.5) < 1e-2);
        assert!((other.transform.scale - other.base_scale()).length() < 1e-3);
        assert!(angle_between(other.transform.orientation(), Quat::IDENTITY) < 1e-2);
    }

    #[test]
    fn focus_without_target_pushes_everything_back() {
        let mut scene = scene_with(&[Category::Photo, Category::Ornament]);
        let mut state = InteractionState::new();
        state.enter_focus(None);
        let integrator = MotionIntegrator::default();

        for _ in 0..400 {
            integrator.tick(&mut scene, &state, DT);
        }
        for o in scene.objects() {
            assert!(o.transform.position.distance(o.scatter_target() * 1.5) < 1e-2);
        }
    }

    #[test]
    fn targets_never_change_across_ticks() {
        let mut scene = scene_with(&[Category::Ornament, Category::Candy, Category::Photo]);
        let integrator = MotionIntegrator::default();
        let snapshot: Vec<_> = scene.objects().iter()
            .map(|o| (*o.tree_target(), o.scatter_target(), o.scatter_spin()))
            .collect();

        let mut state = InteractionState::new();
        for mode in [Mode::Tree, Mode::Scatter, Mode::Focus, Mode::Tree] {
            if mode == Mode::Focus {
                state.enter_focus(Some(ObjectId(2)));
            } else {
                state.set_mode(mode);
            }
            for _ in 0..3 {
                integrator.tick(&mut scene, &state, DT);
                let now: Vec<_> = scene.objects().iter()
                    .map(|o| (*o.tree_target(), o.scatter_target(), o.scatter_spin()))
                    .collect();
                assert_eq!(now, snapshot);
            }
        }
    }

    #[test]
    fn dust_rotation_scales_with_dt() {
        let mut scene = scene_with(&[]);
        let state = InteractionState::new();
        let integrator = MotionIntegrator::default();
        integrator.tick(&mut scene, &state, 0.5);
        integrator.tick(&mut scene, &state, 0.5);
        assert!((scene.dust.rotation_y - 0.05).abs() < 1e-6);
    }

    #[test]
    fn group_follows_pointer_and_idles_only_in_tree() {
        let integrator = MotionIntegrator::default();

        let mut scatter = scene_with(&[]);
        let mut state = InteractionState::new();
        state.set_mode(Mode::Scatter);
        state.set_pointer(Vec2::new(1.0, -0.5));
        integrator.tick(&mut scatter, &state, DT);
        assert!((scatter.group.yaw - 0.05).abs() < 1e-6);
        assert!((scatter.group.pitch + 0.025).abs() < 1e-6);

        let mut tree = scene_with(&[]);
        state.set_mode(Mode::Tree);
        integrator.tick(&mut tree, &state, DT);
        assert!((tree.group.yaw - 0.05).abs() < 1e-6);
        assert!((tree.group.idle - 0.3 * DT).abs() < 1e-6);
        assert!((tree.group.total_yaw() - (0.05 + 0.3 * DT)).abs() < 1e-6);
        assert_eq!(scatter.group.idle, 0.0);
    }

    #[test]
    fn tree_idle_spin_keeps_turning() {
        let integrator = MotionIntegrator::default();
        let mut scene = scene_with(&[]);
        let state = InteractionState::new();
        let dt = 1.0 / 60.0;

        let mut previous = scene.group.total_yaw();
        for _ in 0..6000 {
            integrator.tick(&mut scene, &state, dt);
            let now = scene.group.total_yaw();
            assert!(now > previous);
            previous = now;
        }
        // 100 s at 0.3 rad/s, pointer at rest.
        assert!((scene.group.total_yaw() - 30.0).abs() < 0.05, "{}", scene.group.total_yaw());
        assert!(scene.group.yaw.abs() < 1e-6);
    }

    #[test]
    fn frame_rate_independent_blend_matches_per_tick_at_reference() {
        let cfg = MotionConfig {
            smoothing_mode: Smoothing::FrameRateIndependent { reference_hz: 60.0 },
            ..MotionConfig::default()
        };
        assert!((cfg.blend(0.05, 1.0 / 60.0) - 0.05).abs() < 1e-5);
        // Two half-length ticks close the same gap as one full tick.
        let half = cfg.blend(0.05, 1.0 / 120.0);
        let two_halves = 1.0 - (1.0 - half) * (1.0 - half);
        assert!((two_halves - 0.05).abs() < 1e-5);
        assert_eq!(MotionConfig::default().blend(0.05, 3.0), 0.05);
    }
}
