// Copyright 2025 the Tether Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Ray-cast hit testing for scene nodes.
//!
//! This crate defines the contract between a 3D engine and the Tether
//! interaction layer. The engine owns the geometry; Tether only asks a node
//! "which surfaces does this ray cross?" and keeps the nearest answer.
//!
//! # Typical usage
//!
//! - Build a [`Ray`] per pointer from your camera and screen coordinates.
//! - Implement [`Raycast`] for your node type. The implementation appends
//!   every [`Intersection`] of the ray with *that node's own* geometry;
//!   descendants are not searched here.
//! - Call [`HitTest::raycast_test`] to obtain the nearest intersection, or
//!   `None` when nothing was hit.
//!
//! ```
//! use glam::Vec3;
//! use tether_hit::shapes::{RayHit, Sphere};
//! use tether_hit::{HitTest, Intersection, Ray, Raycast};
//!
//! struct Ball {
//!     id: u32,
//!     sphere: Sphere,
//! }
//!
//! impl Raycast for Ball {
//!     type Key = u32;
//!     fn raycast(&self, ray: &Ray, out: &mut Vec<Intersection<u32>>) {
//!         if let Some(score) = self.sphere.ray_hit(ray) {
//!             out.push(Intersection::from_score(ray, score, self.id));
//!         }
//!     }
//! }
//!
//! let ball = Ball { id: 7, sphere: Sphere::new(Vec3::new(0.0, 0.0, -5.0), 1.0) };
//! let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
//! let hit = ball.raycast_test(&ray).expect("ray points at the ball");
//! assert_eq!(hit.object, 7);
//! assert!((hit.distance - 4.0).abs() < 1e-5);
//!
//! let away = Ray::new(Vec3::ZERO, Vec3::Z);
//! assert!(ball.raycast_test(&away).is_none());
//! ```
//!
//! # Key types
//!
//! - [`Ray`] – origin, unit direction and an accepted `[near, far]` range.
//! - [`Intersection`] – distance along the ray, world point, optional
//!   surface normal, and the key of the object that was hit.
//! - [`Raycast`] – the engine-side contract, one call per node.
//! - [`HitTest`] – blanket extension giving every [`Raycast`] a
//!   `raycast_test` that keeps only the nearest hit.
//!
//! The [`shapes`] module provides [`shapes::RayHit`] implementations for a
//! few primitives (sphere, box, triangle, plane). They are small building
//! blocks for tests and simple hosts, not a mesh intersection engine.

#![no_std]

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

use alloc::vec::Vec;
use core::cmp::Ordering;

use glam::Vec3;

mod math;
/// Primitive shapes with ray intersection routines.
pub mod shapes;

/// A half-line in world space with an accepted distance range.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    /// Start of the ray.
    pub origin: Vec3,
    /// Unit-length direction.
    pub direction: Vec3,
    /// Hits closer than this are ignored.
    pub near: f32,
    /// Hits farther than this are ignored.
    pub far: f32,
}

impl Ray {
    /// Create a ray accepting any non-negative distance.
    ///
    /// `direction` is normalized; a zero direction yields a ray that hits
    /// nothing.
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
            near: 0.0,
            far: f32::INFINITY,
        }
    }

    /// Restrict the accepted distance range to `[near, far]`.
    pub fn with_range(mut self, near: f32, far: f32) -> Self {
        self.near = near;
        self.far = far;
        self
    }

    /// Point at distance `t` along the ray.
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Whether a hit at distance `t` lies inside the accepted range.
    ///
    /// A ray with a zero direction accepts nothing.
    pub fn accepts(&self, t: f32) -> bool {
        self.direction != Vec3::ZERO && t >= self.near && t <= self.far
    }
}

/// One surface crossing of a ray.
///
/// `object` is a back-reference to whatever was hit, usually a node key.
#[derive(Clone, Debug, PartialEq)]
pub struct Intersection<K> {
    /// Distance from the ray origin.
    pub distance: f32,
    /// World-space point of the crossing.
    pub point: Vec3,
    /// Surface normal at the crossing, when the geometry provides one.
    pub normal: Option<Vec3>,
    /// The object that was hit.
    pub object: K,
}

impl<K> Intersection<K> {
    /// Build an intersection from a primitive [`shapes::RayScore`].
    pub fn from_score(ray: &Ray, score: shapes::RayScore, object: K) -> Self {
        Self {
            distance: score.distance,
            point: ray.at(score.distance),
            normal: Some(score.normal),
            object,
        }
    }

    /// Compare by distance, nearer first. NaN distances sort after every
    /// other distance and equal to each other.
    pub fn cmp_distance(&self, other: &Self) -> Ordering {
        match (self.distance.is_nan(), other.distance.is_nan()) {
            (false, false) => self
                .distance
                .partial_cmp(&other.distance)
                .unwrap_or(Ordering::Equal),
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            (true, true) => Ordering::Equal,
        }
    }

    /// Replace the back-reference, keeping the geometry.
    pub fn map_object<U>(self, f: impl FnOnce(K) -> U) -> Intersection<U> {
        Intersection {
            distance: self.distance,
            point: self.point,
            normal: self.normal,
            object: f(self.object),
        }
    }
}

/// Engine-side ray cast for a single scene node.
///
/// Implementations append every intersection between `ray` and the node's
/// own geometry to `out`, in any order. They must not clear `out` and must
/// not descend into child nodes.
pub trait Raycast {
    /// Back-reference stored in each [`Intersection`].
    type Key;

    /// Append the intersections of `ray` with this node to `out`.
    fn raycast(&self, ray: &Ray, out: &mut Vec<Intersection<Self::Key>>);
}

/// Nearest-hit query, available on every [`Raycast`] implementation.
pub trait HitTest: Raycast {
    /// Ray cast this node and return the nearest intersection.
    ///
    /// Returns `None` when the ray misses. On equal distances the first
    /// reported intersection wins.
    fn raycast_test(&self, ray: &Ray) -> Option<Intersection<Self::Key>> {
        let mut out = Vec::new();
        self.raycast(ray, &mut out);
        take_nearest(out)
    }
}

impl<T: Raycast + ?Sized> HitTest for T {}

/// The nearest intersection in `hits`, first on ties.
pub fn nearest<K>(hits: &[Intersection<K>]) -> Option<&Intersection<K>> {
    hits.iter().min_by(|a, b| a.cmp_distance(b))
}

/// Consume `hits` and return the nearest one, first on ties.
pub fn take_nearest<K>(mut hits: Vec<Intersection<K>>) -> Option<Intersection<K>> {
    let idx = hits
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| a.cmp_distance(b))
        .map(|(i, _)| i)?;
    Some(hits.swap_remove(idx))
}
