//! Managed objects — one independently animated visual entity each.
//!
//! A `ManagedObject` owns its two layout targets, computed exactly once in
//! [`ManagedObject::spawn`].  They are private and only readable through
//! accessors, so nothing can re-randomise an object's layout mid-session.
//! The only state that changes per tick is [`Transform`].

use glam::{Quat, Vec3};
use rand::Rng;

use crate::layout::{self, TreeTarget};

// ════════════════════════════════════════════════════════════════════════════
// Identifiers
// ════════════════════════════════════════════════════════════════════════════

/// Stable index into the scene population.  Objects are never removed, so an
/// id handed out once stays valid for the whole session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(pub usize);

/// Opaque handle to a drawable owned by the renderer (photo images).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TextureId(pub u32);

/// What kind of entity an object is.  Dust is not listed: it is one aggregate
/// point cloud, see [`crate::motion::DustCloud`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Category {
    Ornament,
    Photo,
    Candy,
}

impl Category {
    pub fn name(self) -> &'static str {
        match self {
            Category::Ornament => "ornament",
            Category::Photo    => "photo",
            Category::Candy    => "candy",
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Transform
// ════════════════════════════════════════════════════════════════════════════

/// Current placement of an object.
///
/// Rotation is held twice: intrinsic X→Y→Z Euler angles, so the scatter spin
/// adds exact per-tick increments, and a quaternion, so smoothing never
/// passes through Euler angles near gimbal lock.  Each mutator writes the
/// authoritative form and derives the other from it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub position:    Vec3,
    pub scale:       Vec3,
    rotation:        Vec3,
    orientation:     Quat,
}

impl Transform {
    pub fn new(position: Vec3, rotation: Vec3, scale: Vec3) -> Self {
        Transform { position, scale, rotation, orientation: layout::euler_to_quat(rotation) }
    }

    pub fn rotation(&self)    -> Vec3 { self.rotation }
    pub fn orientation(&self) -> Quat { self.orientation }

    pub fn set_orientation(&mut self, q: Quat) {
        self.orientation = q.normalize();
        self.rotation    = layout::quat_to_euler(self.orientation);
    }

    /// Add Euler increments; the quaternion follows.
    pub fn rotate_by(&mut self, delta: Vec3) {
        self.rotation   += delta;
        self.orientation = layout::euler_to_quat(self.rotation);
    }
}

// ════════════════════════════════════════════════════════════════════════════
// ManagedObject
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug)]
pub struct ManagedObject {
    category:       Category,
    base_scale:     Vec3,
    tree_target:    TreeTarget,
    scatter_target: Vec3,
    scatter_spin:   Vec3,
    texture:        Option<TextureId>,
    pub transform:  Transform,
}

impl ManagedObject {
    /// Create an object and draw its layout targets.
    ///
    /// It starts at its scatter point with identity rotation, so a freshly
    /// built scene visibly gathers into the tree.
    pub fn spawn<R: Rng + ?Sized>(
        category:   Category,
        base_scale: Vec3,
        texture:    Option<TextureId>,
        rng:        &mut R,
    ) -> Self {
        let tree_target    = layout::tree_placement(category, rng);
        let scatter_target = layout::scatter_position(rng);
        let scatter_spin   = layout::scatter_spin(rng);

        ManagedObject {
            category,
            base_scale,
            tree_target,
            scatter_target,
            scatter_spin,
            texture,
            transform: Transform::new(scatter_target, Vec3::ZERO, base_scale),
        }
    }

    pub fn category(&self)       -> Category          { self.category }
    pub fn base_scale(&self)     -> Vec3              { self.base_scale }
    pub fn tree_target(&self)    -> &TreeTarget       { &self.tree_target }
    pub fn scatter_target(&self) -> Vec3              { self.scatter_target }
    pub fn scatter_spin(&self)   -> Vec3              { self.scatter_spin }
    pub fn texture(&self)        -> Option<TextureId> { self.texture }
    pub fn is_photo(&self)       -> bool              { self.category == Category::Photo }
}

// ════════════════════════════════════════════════════════════════════════════
// Default base scales per category
// ════════════════════════════════════════════════════════════════════════════

pub const ORNAMENT_SCALE_MIN: f32 = 0.35;
pub const ORNAMENT_SCALE_MAX: f32 = 0.75;
pub const CANDY_SCALE:        Vec3 = Vec3::new(0.4, 0.9, 0.4);
pub const PHOTO_SCALE:        Vec3 = Vec3::new(1.2, 1.2, 0.05);

/// Base scale for a new object of `category`.  Ornaments vary in size.
pub fn default_base_scale<R: Rng + ?Sized>(category: Category, rng: &mut R) -> Vec3 {
    match category {
        Category::Ornament => Vec3::splat(rng.gen_range(ORNAMENT_SCALE_MIN..=ORNAMENT_SCALE_MAX)),
        Category::Candy    => CANDY_SCALE,
        Category::Photo    => PHOTO_SCALE,
    }
}
