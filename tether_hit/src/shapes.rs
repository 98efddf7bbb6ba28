// Copyright 2025 the Tether Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Ray intersection for a few primitive shapes.
//!
//! All shapes are expressed in world space. Engines that keep geometry in a
//! local frame should transform the ray into that frame first (and the
//! resulting point and normal back out).
//!
//! Hits outside the ray's `[near, far]` range are rejected. When the ray
//! starts inside a closed shape the exit crossing is reported.

use glam::Vec3;

use crate::Ray;
use crate::math::sqrt;

/// Determinants smaller than this are treated as a ray parallel to the surface.
const PARALLEL_EPSILON: f32 = 1e-7;

/// Distance and surface normal of a primitive hit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayScore {
    /// Distance along the ray.
    pub distance: f32,
    /// Geometric surface normal at the hit, unit length when defined.
    pub normal: Vec3,
}

/// A shape that can be intersected with a [`Ray`].
pub trait RayHit {
    /// Nearest accepted crossing of `ray` with this shape.
    fn ray_hit(&self, ray: &Ray) -> Option<RayScore>;
}

/// A solid sphere.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sphere {
    /// Center point.
    pub center: Vec3,
    /// Radius.
    pub radius: f32,
}

impl Sphere {
    /// Create a sphere from center and radius.
    pub const fn new(center: Vec3, radius: f32) -> Self {
        Self { center, radius }
    }
}

impl RayHit for Sphere {
    fn ray_hit(&self, ray: &Ray) -> Option<RayScore> {
        let oc = ray.origin - self.center;
        let b = oc.dot(ray.direction);
        let c = oc.length_squared() - self.radius * self.radius;
        let disc = b * b - c;
        if disc < 0.0 {
            return None;
        }
        let s = sqrt(disc);
        let t = [-b - s, -b + s].into_iter().find(|&t| ray.accepts(t))?;
        Some(RayScore {
            distance: t,
            normal: (ray.at(t) - self.center).normalize_or_zero(),
        })
    }
}

/// An axis-aligned box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    /// Minimum corner.
    pub min: Vec3,
    /// Maximum corner.
    pub max: Vec3,
}

impl Aabb {
    /// Create a box from two opposite corners in any order.
    pub fn from_corners(a: Vec3, b: Vec3) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Create a box from its center and half extents.
    pub fn from_center_half_extents(center: Vec3, half: Vec3) -> Self {
        Self::from_corners(center - half, center + half)
    }

    /// Whether `p` lies inside or on the box.
    pub fn contains(&self, p: Vec3) -> bool {
        p.cmpge(self.min).all() && p.cmple(self.max).all()
    }
}

impl RayHit for Aabb {
    fn ray_hit(&self, ray: &Ray) -> Option<RayScore> {
        // Slab test.
        let inv = ray.direction.recip();
        let t1 = (self.min - ray.origin) * inv;
        let t2 = (self.max - ray.origin) * inv;
        let lo = t1.min(t2);
        let hi = t1.max(t2);
        let enter = lo.max_element();
        let exit = hi.min_element();
        if enter > exit {
            return None;
        }
        if ray.accepts(enter) {
            Some(RayScore {
                distance: enter,
                normal: slab_normal(lo, enter, ray.direction, -1.0),
            })
        } else if ray.accepts(exit) {
            Some(RayScore {
                distance: exit,
                normal: slab_normal(hi, exit, ray.direction, 1.0),
            })
        } else {
            None
        }
    }
}

/// Outward normal of the slab face crossed at `t`.
///
/// `side` is `-1.0` for the entry face and `1.0` for the exit face.
fn slab_normal(ts: Vec3, t: f32, dir: Vec3, side: f32) -> Vec3 {
    let axis = if ts.x == t {
        0
    } else if ts.y == t {
        1
    } else {
        2
    };
    let mut n = Vec3::ZERO;
    n[axis] = if dir[axis] >= 0.0 { side } else { -side };
    n
}

/// A two-sided triangle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Triangle {
    /// First vertex.
    pub a: Vec3,
    /// Second vertex.
    pub b: Vec3,
    /// Third vertex.
    pub c: Vec3,
}

impl Triangle {
    /// Create a triangle; the normal follows counter-clockwise winding.
    pub const fn new(a: Vec3, b: Vec3, c: Vec3) -> Self {
        Self { a, b, c }
    }
}

impl RayHit for Triangle {
    fn ray_hit(&self, ray: &Ray) -> Option<RayScore> {
        // Moller-Trumbore.
        let e1 = self.b - self.a;
        let e2 = self.c - self.a;
        let p = ray.direction.cross(e2);
        let det = e1.dot(p);
        if det > -PARALLEL_EPSILON && det < PARALLEL_EPSILON {
            return None;
        }
        let inv = 1.0 / det;
        let s = ray.origin - self.a;
        let u = s.dot(p) * inv;
        if !(0.0..=1.0).contains(&u) {
            return None;
        }
        let q = s.cross(e1);
        let v = ray.direction.dot(q) * inv;
        if v < 0.0 || u + v > 1.0 {
            return None;
        }
        let t = e2.dot(q) * inv;
        ray.accepts(t).then(|| RayScore {
            distance: t,
            normal: e1.cross(e2).normalize_or_zero(),
        })
    }
}

/// An infinite plane `normal . p + constant = 0`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Plane {
    /// Unit normal.
    pub normal: Vec3,
    /// Signed distance of the plane from the origin along `-normal`.
    pub constant: f32,
}

impl Plane {
    /// Plane through `point` with the given normal.
    pub fn from_point_normal(point: Vec3, normal: Vec3) -> Self {
        let normal = normal.normalize_or_zero();
        Self {
            normal,
            constant: -normal.dot(point),
        }
    }
}

impl RayHit for Plane {
    fn ray_hit(&self, ray: &Ray) -> Option<RayScore> {
        let denom = self.normal.dot(ray.direction);
        if denom > -PARALLEL_EPSILON && denom < PARALLEL_EPSILON {
            return None;
        }
        let t = -(ray.origin.dot(self.normal) + self.constant) / denom;
        ray.accepts(t).then_some(RayScore {
            distance: t,
            normal: self.normal,
        })
    }
}

/// Any of the primitives in this module.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Shape {
    /// A sphere.
    Sphere(Sphere),
    /// An axis-aligned box.
    Aabb(Aabb),
    /// A triangle.
    Triangle(Triangle),
    /// An infinite plane.
    Plane(Plane),
}

impl RayHit for Shape {
    fn ray_hit(&self, ray: &Ray) -> Option<RayScore> {
        match self {
            Self::Sphere(s) => s.ray_hit(ray),
            Self::Aabb(b) => b.ray_hit(ray),
            Self::Triangle(t) => t.ray_hit(ray),
            Self::Plane(p) => p.ray_hit(ray),
        }
    }
}
