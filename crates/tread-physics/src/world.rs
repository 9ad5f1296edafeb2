//! Physics world wrapping Rapier 3D

use rapier3d::prelude::*;
use std::collections::HashMap;
use tread_core::Vec3;

/// Half width of the floor slab. Rapier's broad phase wants finite bounds,
/// so the "infinite" floor is a very wide box.
const FLOOR_HALF_SIZE: f32 = 10_000.0;

/// Solid ray casts report a zero distance for colliders enclosing the origin
const INSIDE_EPSILON: f32 = 1e-5;

/// Result of a downward ray query
#[derive(Debug, Clone, PartialEq)]
pub struct RayHit {
    /// Height of the surface that was hit
    pub height: f32,
    /// Distance travelled along the ray
    pub distance: f32,
    /// Name given to the collider when it was added
    pub collider: String,
}

/// Static level geometry with the query structures needed for ray and shape casts.
///
/// The level never simulates, so there is no pipeline step: queries are
/// refreshed whenever the collider set changes.
pub struct PhysicsWorld {
    pub rigid_body_set: RigidBodySet,
    pub collider_set: ColliderSet,
    pub island_manager: IslandManager,
    pub query_pipeline: QueryPipeline,
    names: HashMap<ColliderHandle, String>,
}

impl PhysicsWorld {
    /// Create an empty world
    pub fn new() -> Self {
        Self {
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            island_manager: IslandManager::new(),
            query_pipeline: QueryPipeline::new(),
            names: HashMap::new(),
        }
    }

    /// Insert a static axis-aligned box and return its handle
    pub fn add_box(
        &mut self,
        name: impl Into<String>,
        center: Vec3,
        half_extents: Vec3,
    ) -> ColliderHandle {
        let collider = ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z)
            .translation(vector![center.x, center.y, center.z])
            .build();
        self.insert_named(name.into(), collider)
    }

    /// Insert a floor slab whose top surface sits at the given height
    pub fn add_ground_plane(&mut self, height: f32) -> ColliderHandle {
        let collider = ColliderBuilder::cuboid(FLOOR_HALF_SIZE, 0.5, FLOOR_HALF_SIZE)
            .translation(vector![0.0, height - 0.5, 0.0])
            .build();
        self.insert_named("floor".to_string(), collider)
    }

    fn insert_named(&mut self, name: String, collider: Collider) -> ColliderHandle {
        let handle = self.collider_set.insert(collider);
        tracing::debug!(collider = %name, "added static collider");
        self.names.insert(handle, name);
        self.refresh();
        handle
    }

    /// Remove a collider. Returns false if the handle was unknown.
    pub fn remove_collider(&mut self, handle: ColliderHandle) -> bool {
        let removed = self
            .collider_set
            .remove(
                handle,
                &mut self.island_manager,
                &mut self.rigid_body_set,
                false,
            )
            .is_some();
        if removed {
            self.names.remove(&handle);
            self.refresh();
        }
        removed
    }

    /// Rebuild the query acceleration structure from the collider set
    pub fn refresh(&mut self) {
        self.query_pipeline.update(&self.collider_set);
    }

    /// Number of colliders in the world
    pub fn collider_count(&self) -> usize {
        self.collider_set.len()
    }

    pub fn collider_name(&self, handle: ColliderHandle) -> Option<&str> {
        self.names.get(&handle).map(|s| s.as_str())
    }

    /// Cast a ray straight down from `origin`, at most `max_distance` long.
    ///
    /// Colliders that already contain the origin are skipped, so a ray
    /// starting inside a ceiling still finds the floor beneath it.
    pub fn cast_ray_down(&self, origin: Vec3, max_distance: f32) -> Option<RayHit> {
        let ray = Ray::new(
            point![origin.x, origin.y, origin.z],
            vector![0.0, -1.0, 0.0],
        );
        let mut nearest: Option<(ColliderHandle, f32)> = None;
        self.query_pipeline.intersections_with_ray(
            &self.rigid_body_set,
            &self.collider_set,
            &ray,
            max_distance,
            true,
            QueryFilter::default(),
            |handle, intersection| {
                let toi = intersection.time_of_impact;
                if toi > INSIDE_EPSILON && !matches!(nearest, Some((_, best)) if best <= toi) {
                    nearest = Some((handle, toi));
                }
                true
            },
        );
        let (handle, toi) = nearest?;

        Some(RayHit {
            height: origin.y - toi,
            distance: toi,
            collider: self.collider_name(handle).unwrap_or_default().to_string(),
        })
    }
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}
