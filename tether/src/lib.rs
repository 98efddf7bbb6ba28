// Copyright 2025 the Tether Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tether: per-node event listeners and pointer interaction for 3D scene graphs.
//!
//! ## Overview
//!
//! Tether attaches an event interface to scene nodes and turns raw pointer
//! samples into node-level events such as enter, leave, press, release and
//! click. It is split in three layers:
//!
//! - [`tether_hit`] answers "what does this ray hit on this node?".
//! - [`tether_pointer`] remembers, per node and per pointer, whether the
//!   pointer is over the node and whether a press is outstanding.
//! - This crate owns listener registration and emission ([`Interactive`]),
//!   the interactivity flags read by picking ([`InteractFlags`]), and a
//!   reference frame driver ([`pick::process_pointer`]).
//!
//! ## Nodes
//!
//! A node type opts in by owning an [`Interaction`] component and
//! implementing [`Interactive`]. Every operation is a provided method:
//!
//! - [`on`](Interactive::on), [`off`](Interactive::off),
//!   [`once`](Interactive::once) and [`emit`](Interactive::emit) manage
//!   listeners keyed by event type string.
//! - [`set_interactive`](Interactive::set_interactive) and
//!   [`set_interactive_children`](Interactive::set_interactive_children)
//!   control whether picking tests the node and descends into it.
//! - [`track`](Interactive::track) feeds a pointer signal into the node's
//!   tracker and returns the resulting transitions.
//!
//! Registering a listener marks the node interactive. Listeners receive the
//! node and a borrowed payload. Emission works on a copy of the listener
//! list, so listeners may add or remove listeners on the same node.
//!
//! ## Picking
//!
//! Add [`Raycast`] and [`pick::SceneNode`] to make a tree pickable:
//!
//! ```
//! use glam::Vec3;
//! use kurbo::Point;
//! use tether::dispatch::{PointerEvent, Signal};
//! use tether::pick::{SceneNode, process_pointer};
//! use tether::{EventNames, Interaction, Interactive, Intersection, Listener, Ray, Raycast};
//! use tether_hit::shapes::{RayHit, Sphere};
//! use std::cell::Cell;
//! use std::rc::Rc;
//!
//! struct Node {
//!     id: u32,
//!     sphere: Option<Sphere>,
//!     children: Vec<Node>,
//!     interaction: Interaction<Node, PointerEvent<u32>>,
//! }
//!
//! impl Interactive for Node {
//!     type Event = PointerEvent<u32>;
//!     fn interaction(&self) -> &Interaction<Self, Self::Event> {
//!         &self.interaction
//!     }
//! }
//!
//! impl Raycast for Node {
//!     type Key = u32;
//!     fn raycast(&self, ray: &Ray, out: &mut Vec<Intersection<u32>>) {
//!         if let Some(score) = self.sphere.and_then(|s| s.ray_hit(ray)) {
//!             out.push(Intersection::from_score(ray, score, self.id));
//!         }
//!     }
//! }
//!
//! impl SceneNode for Node {
//!     fn children(&self) -> &[Self] {
//!         &self.children
//!     }
//! }
//!
//! let ball = Node {
//!     id: 1,
//!     sphere: Some(Sphere::new(Vec3::ZERO, 1.0)),
//!     children: Vec::new(),
//!     interaction: Interaction::new(),
//! };
//! let clicks = Rc::new(Cell::new(0));
//! let c = clicks.clone();
//! ball.on("click", Listener::new(move |_: &Node, _: &PointerEvent<u32>| c.set(c.get() + 1)));
//!
//! let root = Node { id: 0, sphere: None, children: vec![ball], interaction: Interaction::new() };
//! let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::NEG_Z);
//!
//! for signal in [Signal::Move, Signal::Down, Signal::Up] {
//!     process_pointer(&root, &ray, signal, None, Point::ZERO, &EventNames::MOUSE);
//! }
//! assert_eq!(clicks.get(), 1);
//! ```
//!
//! Hosts with their own traversal can skip [`pick`] entirely: call
//! [`Interactive::track`] for each node with its own hit result and pass the
//! transitions to [`dispatch::dispatch`].
//!
//! ## Threading
//!
//! Listener lists and pointer state use `Rc` and interior mutability. A
//! scene is driven from one thread; none of the node-level types are `Send`.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;
#[cfg(test)]
extern crate std;

pub mod dispatch;
pub mod emitter;
pub mod flags;
mod interactive;
pub mod pick;

pub use emitter::{Interaction, Listener};
pub use flags::InteractFlags;
pub use interactive::Interactive;

pub use tether_hit::{HitTest, Intersection, Ray, Raycast};
pub use tether_pointer::{
    EventNames, PRIMARY_POINTER, PointerId, PointerState, PointerTracker, Transition, Transitions,
};

pub use tether_hit;
pub use tether_pointer;
