//! Placement generator — where every object lives in each arrangement.
//!
//! Two independent targets are drawn per object:
//!
//! * a **scatter** point on a spherical shell around the origin, and
//! * a **tree** point on a tapering spiral, plus the orientation that faces
//!   outward along the spiral.
//!
//! Every function takes the random source as a parameter.  Production code
//! passes `rand::thread_rng()`; tests pass a seeded `StdRng`.

use std::f32::consts::PI;

use glam::{EulerRot, Quat, Vec3};
use rand::Rng;

use crate::object::Category;

// ════════════════════════════════════════════════════════════════════════════
// Layout constants
// ════════════════════════════════════════════════════════════════════════════

pub const SCATTER_INNER_RADIUS: f32 = 8.0;
pub const SCATTER_OUTER_RADIUS: f32 = 20.0;

pub const TREE_HEIGHT:          f32 = 30.0;
pub const TREE_BASE_RADIUS:     f32 = 12.0;
pub const TREE_TIP_RADIUS:      f32 = 0.5;
/// Radians of spiral per unit of height fraction (≈ 8 wraps bottom to top).
pub const TREE_SPIRAL_RATE:     f32 = 50.0;
pub const TREE_JITTER:          f32 = 0.5;
/// Upper bound (exclusive) of the random roll given to candy canes.
pub const CANDY_ROLL_MAX:       f32 = 0.5;

/// Per-axis bound of the free spin used while scattered (radians per tick).
pub const SCATTER_SPIN_MAX:     f32 = 0.025;
/// Half-extent of the cube the dust cloud is sampled from.
pub const DUST_EXTENT:          f32 = 25.0;

// ════════════════════════════════════════════════════════════════════════════
// TreeTarget
// ════════════════════════════════════════════════════════════════════════════

/// Resting transform of an object in the tree arrangement.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TreeTarget {
    pub position:    Vec3,
    pub orientation: Quat,
}

// ════════════════════════════════════════════════════════════════════════════
// Scatter
// ════════════════════════════════════════════════════════════════════════════

/// Sample a point on the shell between the inner and outer scatter radii.
///
/// Direction is uniform on the sphere (azimuth linear, polar angle through
/// the inverse CDF).  The radius is interpolated *linearly* between the two
/// bounds, which puts more points near the outer shell than a volume-uniform
/// draw would.  That density is what the scene has always looked like, so it
/// stays.
pub fn scatter_position<R: Rng + ?Sized>(rng: &mut R) -> Vec3 {
    let theta = rng.gen::<f32>() * 2.0 * PI;
    let phi   = (2.0 * rng.gen::<f32>() - 1.0).acos();
    let r     = SCATTER_INNER_RADIUS
        + (SCATTER_OUTER_RADIUS - SCATTER_INNER_RADIUS) * rng.gen::<f32>();

    Vec3::new(
        r * phi.sin() * theta.cos(),
        r * phi.sin() * theta.sin(),
        r * phi.cos(),
    )
}

/// Fixed angular velocity for the free spin in scatter mode.
pub fn scatter_spin<R: Rng + ?Sized>(rng: &mut R) -> Vec3 {
    let mut axis = || rng.gen_range(-SCATTER_SPIN_MAX..=SCATTER_SPIN_MAX);
    Vec3::new(axis(), axis(), axis())
}

// ════════════════════════════════════════════════════════════════════════════
// Tree
// ════════════════════════════════════════════════════════════════════════════

/// Deterministic part of the spiral: `(y, radius, angle)` for height
/// fraction `h ∈ [0, 1)`.
pub fn tree_spiral(h: f32) -> (f32, f32, f32) {
    let y      = h * TREE_HEIGHT - TREE_HEIGHT / 2.0;
    let radius = TREE_BASE_RADIUS * (1.0 - h) + TREE_TIP_RADIUS;
    let angle  = h * TREE_SPIRAL_RATE;
    (y, radius, angle)
}

/// Sample a resting place on the tree for an object of `category`.
///
/// Objects face outward along the spiral (yaw = −angle).  Candy canes are
/// additionally flipped half a turn about X and given a small random roll;
/// nothing else distinguishes categories here.
pub fn tree_placement<R: Rng + ?Sized>(category: Category, rng: &mut R) -> TreeTarget {
    let h = rng.gen::<f32>();
    let (y, radius, angle) = tree_spiral(h);

    let jx = rng.gen_range(-TREE_JITTER..=TREE_JITTER);
    let jz = rng.gen_range(-TREE_JITTER..=TREE_JITTER);
    let position = Vec3::new(angle.cos() * radius + jx, y, angle.sin() * radius + jz);

    let euler = match category {
        Category::Candy => Vec3::new(PI, -angle, rng.gen::<f32>() * CANDY_ROLL_MAX),
        _               => Vec3::new(0.0, -angle, 0.0),
    };

    TreeTarget { position, orientation: euler_to_quat(euler) }
}

// ════════════════════════════════════════════════════════════════════════════
// Dust
// ════════════════════════════════════════════════════════════════════════════

/// One point of the ambient dust cloud.
pub fn dust_point<R: Rng + ?Sized>(rng: &mut R) -> Vec3 {
    let mut axis = || rng.gen_range(-DUST_EXTENT..=DUST_EXTENT);
    Vec3::new(axis(), axis(), axis())
}

// ════════════════════════════════════════════════════════════════════════════
// Euler helpers
// ════════════════════════════════════════════════════════════════════════════

/// Intrinsic X→Y→Z Euler angles (radians) to a quaternion.
pub fn euler_to_quat(euler: Vec3) -> Quat {
    Quat::from_euler(EulerRot::XYZ, euler.x, euler.y, euler.z)
}

/// Inverse of [`euler_to_quat`].
pub fn quat_to_euler(q: Quat) -> Vec3 {
    let (x, y, z) = q.to_euler(EulerRot::XYZ);
    Vec3::new(x, y, z)
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const EPS: f32 = 1e-3;

    fn rng() -> StdRng { StdRng::seed_from_u64(0x7EE5) }

    #[test]
    fn scatter_radius_within_shell() {
        let mut rng = rng();
        for _ in 0..5_000 {
            let r = scatter_position(&mut rng).length();
            assert!(r >= SCATTER_INNER_RADIUS - EPS && r <= SCATTER_OUTER_RADIUS + EPS,
                    "radius {} outside shell", r);
        }
    }

    #[test]
    fn scatter_radius_is_linear_not_volume_uniform() {
        // Linear interpolation puts the median radius at the shell midpoint (14);
        // a volume-uniform draw would push it out past 16.
        let mut rng = rng();
        let mut radii: Vec<f32> = (0..4_001).map(|_| scatter_position(&mut rng).length()).collect();
        radii.sort_by(|a, b| a.partial_cmp(b).unwrap());
        let median = radii[radii.len() / 2];
        assert!((median - 14.0).abs() < 0.6, "median radius {}", median);
    }

    #[test]
    fn scatter_directions_cover_both_hemispheres() {
        let mut rng = rng();
        let pts: Vec<Vec3> = (0..2_000).map(|_| scatter_position(&mut rng)).collect();
        let up   = pts.iter().filter(|p| p.z > 0.0).count();
        let down = pts.len() - up;
        assert!(up > 800 && down > 800, "up={} down={}", up, down);
    }

    #[test]
    fn spiral_ranges() {
        for i in 0..=1_000 {
            let h = i as f32 / 1_000.0 * 0.9999;
            let (y, radius, _) = tree_spiral(h);
            assert!((-15.0..=15.0).contains(&y), "y {}", y);
            assert!((0.5..=12.5).contains(&radius), "radius {}", radius);
        }
    }

    #[test]
    fn spiral_tapers_toward_the_top() {
        let (_, bottom, _) = tree_spiral(0.0);
        let (_, top, _)    = tree_spiral(0.99);
        assert!((bottom - 12.5).abs() < EPS);
        assert!(top < 1.0);
    }

    #[test]
    fn tree_positions_stay_near_the_spiral() {
        let mut rng = rng();
        let max_jitter = TREE_JITTER * 2f32.sqrt();
        for _ in 0..5_000 {
            let t = tree_placement(Category::Ornament, &mut rng);
            let p = t.position;
            assert!(p.y >= -15.0 - EPS && p.y <= 15.0 + EPS);
            let h = (p.y + 15.0) / TREE_HEIGHT;
            let (_, radius, _) = tree_spiral(h);
            let horizontal = (p.x * p.x + p.z * p.z).sqrt();
            assert!((horizontal - radius).abs() <= max_jitter + EPS,
                    "horizontal {} vs spiral radius {}", horizontal, radius);
        }
    }

    #[test]
    fn ornament_faces_outward_along_spiral() {
        let mut rng = rng();
        for _ in 0..200 {
            let t = tree_placement(Category::Ornament, &mut rng);
            // Pure yaw: the local up axis is untouched.
            let up = t.orientation * Vec3::Y;
            assert!((up - Vec3::Y).length() < EPS, "ornament tilted: up = {:?}", up);

            // Local +X points along the outward radial direction at the spiral angle.
            let h = (t.position.y + 15.0) / TREE_HEIGHT;
            let (_, _, angle) = tree_spiral(h);
            let x_axis = t.orientation * Vec3::X;
            let radial = Vec3::new(angle.cos(), 0.0, angle.sin());
            assert!(x_axis.dot(radial) > 0.99, "x axis {:?} vs radial {:?}", x_axis, radial);
        }
    }

    #[test]
    fn candy_is_flipped_and_rolled() {
        let mut rng = rng();
        for _ in 0..200 {
            let t = tree_placement(Category::Candy, &mut rng);
            // A half turn about X sends local +Y to −Y, whatever the yaw/roll.
            let up = t.orientation * Vec3::Y;
            assert!(up.y < 0.0, "candy not flipped: up = {:?}", up);
        }
    }

    #[test]
    fn scatter_spin_bounded() {
        let mut rng = rng();
        for _ in 0..1_000 {
            let s = scatter_spin(&mut rng);
            assert!(s.abs().max_element() <= SCATTER_SPIN_MAX);
        }
    }

    #[test]
    fn dust_point_stays_in_cube() {
        let mut rng = rng();
        let (mut lo, mut hi) = (Vec3::splat(f32::MAX), Vec3::splat(f32::MIN));
        for _ in 0..5_000 {
            let p = dust_point(&mut rng);
            assert!(p.abs().max_element() <= DUST_EXTENT, "{p} outside the dust cube");
            lo = lo.min(p);
            hi = hi.max(p);
        }
        // Fills the cube rather than a corner of it.
        assert!(lo.max_element() < -0.9 * DUST_EXTENT);
        assert!(hi.min_element() >  0.9 * DUST_EXTENT);
    }

    #[test]
    fn seeded_generation_is_reproducible() {
        let a = scatter_position(&mut StdRng::seed_from_u64(9));
        let b = scatter_position(&mut StdRng::seed_from_u64(9));
        assert_eq!(a, b);
    }

    #[test]
    fn euler_round_trip_is_stable() {
        let e = Vec3::new(0.3, -1.1, 0.2);
        let back = quat_to_euler(euler_to_quat(e));
        assert!((back - e).abs().max_element() < EPS);
    }
}
