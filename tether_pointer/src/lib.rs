// Copyright 2025 the Tether Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tether Pointer: per-node pointer state for enter/leave and press/release pairing.
//!
//! ## Overview
//!
//! A picking loop samples each pointer once per frame and asks, for every
//! interactive node, "does this pointer hit you now?". Answering that question
//! alone is not enough to produce correct events: a pointer resting on a node
//! must not re-enter it every frame, and a press must always be paired with a
//! release even if the pointer slid off the node in between.
//!
//! [`PointerTracker`] holds that memory for one node. It is keyed by
//! [`PointerId`] and stores a [`PointerState`] only for pointers that have
//! interacted with the node. Each signal returns the [`Transition`]s the loop
//! should turn into events; [`EventNames`] maps them to pointer, mouse or
//! touch event types.
//!
//! ## Example
//!
//! ```
//! use kurbo::Point;
//! use tether_pointer::{PointerTracker, Transition};
//!
//! let mut tracker = PointerTracker::new();
//! let p = Point::new(10.0, 10.0);
//!
//! // First frame over the node: enter.
//! assert_eq!(
//!     tracker.on_move(None, true, p).as_slice(),
//!     &[Transition::Over, Transition::Move]
//! );
//! // Stationary on the node: no second enter.
//! assert_eq!(tracker.on_move(None, true, p).as_slice(), &[Transition::Move]);
//!
//! // Press, slide off, release outside.
//! assert_eq!(tracker.on_down(None, true, p).as_slice(), &[Transition::Down]);
//! assert_eq!(tracker.on_move(None, false, p).as_slice(), &[Transition::Out]);
//! assert!(tracker.is_pressed(None));
//! assert_eq!(
//!     tracker.on_up(None, false, p).as_slice(),
//!     &[Transition::Up { inside: false }]
//! );
//! assert!(tracker.is_empty());
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod names;
pub mod tracker;

pub use names::EventNames;
pub use tracker::{
    PRIMARY_POINTER, PointerId, PointerState, PointerTracker, Transition, Transitions,
};
