//! The object population plus the aggregates drawn alongside it.
//!
//! `Scene` is append-only: objects are added when content arrives and never
//! removed, which is what keeps [`ObjectId`] indices stable.

use glam::Vec3;
use rand::Rng;

use crate::layout;
use crate::motion::{DustCloud, GroupRotation};
use crate::object::{default_base_scale, Category, ManagedObject, ObjectId, TextureId};

// ════════════════════════════════════════════════════════════════════════════
// SceneConfig
// ════════════════════════════════════════════════════════════════════════════

/// How many of each thing the initial scene is built with.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SceneConfig {
    pub ornaments:   usize,
    pub candies:     usize,
    /// Placeholder photos present from the start (texture ids `0..photos`).
    pub photos:      usize,
    pub dust_points: usize,
}

impl Default for SceneConfig {
    fn default() -> Self {
        SceneConfig {
            ornaments:   360,
            candies:     80,
            photos:      3,
            dust_points: 1_200,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Scene
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Default)]
pub struct Scene {
    objects:   Vec<ManagedObject>,
    pub dust:  DustCloud,
    pub group: GroupRotation,
}

impl Scene {
    /// An empty scene: no objects, no dust.
    pub fn empty() -> Self { Self::default() }

    /// Build the initial population described by `cfg`.
    pub fn build<R: Rng + ?Sized>(cfg: &SceneConfig, rng: &mut R) -> Self {
        let mut scene = Scene::empty();

        for _ in 0..cfg.ornaments {
            scene.spawn(Category::Ornament, None, rng);
        }
        for _ in 0..cfg.candies {
            scene.spawn(Category::Candy, None, rng);
        }
        for i in 0..cfg.photos {
            scene.spawn(Category::Photo, Some(TextureId(i as u32)), rng);
        }

        let points: Vec<Vec3> = (0..cfg.dust_points).map(|_| layout::dust_point(rng)).collect();
        scene.dust = DustCloud::new(points);

        log::info!(
            "scene built: {} ornaments, {} candies, {} photos, {} dust points",
            cfg.ornaments, cfg.candies, cfg.photos, cfg.dust_points
        );
        scene
    }

    /// Append a new object with freshly drawn targets and return its id.
    pub fn spawn<R: Rng + ?Sized>(
        &mut self,
        category: Category,
        texture:  Option<TextureId>,
        rng:      &mut R,
    ) -> ObjectId {
        let base_scale = default_base_scale(category, rng);
        self.push(ManagedObject::spawn(category, base_scale, texture, rng))
    }

    /// Append an already-built object.
    pub fn push(&mut self, object: ManagedObject) -> ObjectId {
        let id = ObjectId(self.objects.len());
        self.objects.push(object);
        id
    }

    pub fn objects(&self)          -> &[ManagedObject]         { &self.objects }
    pub fn objects_mut(&mut self)  -> &mut [ManagedObject]     { &mut self.objects }
    pub fn get(&self, id: ObjectId) -> Option<&ManagedObject>  { self.objects.get(id.0) }
    pub fn len(&self)              -> usize                    { self.objects.len() }
    pub fn is_empty(&self)         -> bool                     { self.objects.is_empty() }

    /// Ids of every photo, in insertion order.
    pub fn photo_ids(&self) -> Vec<ObjectId> {
        self.objects.iter().enumerate()
            .filter(|(_, o)| o.is_photo())
            .map(|(i, _)| ObjectId(i))
            .collect()
    }

    /// One past the highest texture id in use; the next upload takes it.
    pub fn next_texture_id(&self) -> TextureId {
        let next = self.objects.iter()
            .filter_map(|o| o.texture())
            .map(|t| t.0 + 1)
            .max()
            .unwrap_or(0);
        TextureId(next)
    }
}
