// Copyright 2025 the Tether Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pointer state machine for a single node.
//!
//! ## States
//!
//! Per pointer the tracker is either absent (idle) or holds a
//! [`PointerState`] with two orthogonal bits:
//!
//! - `over`: the pointer hit the node on its latest sample.
//! - `pressed`: a primary press started on the node and has not been released.
//!
//! ## Transition rules
//!
//! Every signal first applies the *crossing* for its `hit` flag:
//!
//! 1. **Enter**: not over (or untracked) and `hit` → [`Transition::Over`].
//! 2. **Leave**: over and not `hit` → [`Transition::Out`].
//! 3. **Stay**: over and `hit` → nothing; a resting pointer never re-enters.
//!
//! Then the signal-specific part:
//!
//! - [`PointerTracker::on_move`]: [`Transition::Move`] while over.
//! - [`PointerTracker::on_down`]: [`Transition::Down`] when over and not already pressed.
//! - [`PointerTracker::on_up`]: when pressed, [`Transition::Up`] whether or not the
//!   pointer is still over (so drags that end outside are still paired), followed by
//!   [`Transition::Click`] when it is.
//! - [`PointerTracker::on_cancel`]: [`Transition::Cancel`] when pressed, then
//!   [`Transition::Out`] when over; the entry is always dropped.
//!
//! An entry is removed as soon as it is neither over nor pressed.
//!
//! ## Multi-pointer support
//!
//! Each pointer is tracked independently:
//!
//! ```
//! # use tether_pointer::{PointerTracker, Transition};
//! # use core::num::NonZeroU64;
//! # use kurbo::Point;
//! let mut tracker = PointerTracker::new();
//! let finger1 = NonZeroU64::new(1).unwrap();
//! let finger2 = NonZeroU64::new(2).unwrap();
//!
//! tracker.on_down(Some(finger1), true, Point::new(1.0, 1.0));
//! tracker.on_down(Some(finger2), true, Point::new(9.0, 9.0));
//! assert_eq!(tracker.len(), 2);
//!
//! let out = tracker.on_up(Some(finger1), true, Point::new(1.0, 1.0));
//! assert_eq!(out.as_slice(), &[Transition::Up { inside: true }, Transition::Click]);
//! assert!(tracker.is_pressed(Some(finger2)));
//! ```

use alloc::collections::BTreeMap;
use core::num::NonZeroU64;

use kurbo::Point;
use smallvec::SmallVec;

/// Pointer identifier, stable across frames for one mouse, touch contact or pen.
pub type PointerId = NonZeroU64;

/// Identifier used when a signal does not name its pointer.
pub const PRIMARY_POINTER: PointerId = NonZeroU64::MIN;

/// Logical change produced by a pointer signal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Transition {
    /// The pointer started hitting the node.
    Over,
    /// The pointer stopped hitting the node.
    Out,
    /// The pointer moved while hitting the node.
    Move,
    /// A primary press started on the node.
    Down,
    /// The press that started on the node was released.
    Up {
        /// Whether the pointer was over the node at release time.
        inside: bool,
    },
    /// The press was released over the node.
    Click,
    /// The press was aborted by the platform.
    Cancel,
}

/// Transitions from a single signal, in emission order.
pub type Transitions = SmallVec<[Transition; 3]>;

/// Tracked state for one pointer on one node.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerState {
    /// Pointer hit the node on its latest sample.
    pub over: bool,
    /// A press on the node is waiting for its release.
    pub pressed: bool,
    /// Latest sampled screen position.
    pub position: Point,
    /// Screen position of the outstanding press.
    pub down_position: Option<Point>,
}

/// Per-node map from pointer to interaction state.
///
/// Only pointers that have entered or pressed this node have an entry.
#[derive(Clone, Debug, Default)]
pub struct PointerTracker {
    pointers: BTreeMap<PointerId, PointerState>,
}

impl PointerTracker {
    /// Create an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a position sample.
    ///
    /// # Arguments
    /// * `pointer_id` - Pointer identifier, defaults to [`PRIMARY_POINTER`] if None
    /// * `hit` - Whether the pointer hits this node on this sample
    /// * `position` - Screen position of the sample
    pub fn on_move(
        &mut self,
        pointer_id: Option<PointerId>,
        hit: bool,
        position: Point,
    ) -> Transitions {
        let id = pointer_id.unwrap_or(PRIMARY_POINTER);
        let mut out = Transitions::new();
        if self.cross(id, hit, position, &mut out) {
            out.push(Transition::Move);
        }
        self.prune(id);
        out
    }

    /// Record a primary press.
    ///
    /// Presses that land outside the node, or repeat an outstanding press,
    /// produce no [`Transition::Down`].
    pub fn on_down(
        &mut self,
        pointer_id: Option<PointerId>,
        hit: bool,
        position: Point,
    ) -> Transitions {
        let id = pointer_id.unwrap_or(PRIMARY_POINTER);
        let mut out = Transitions::new();
        self.cross(id, hit, position, &mut out);
        if let Some(state) = self.pointers.get_mut(&id)
            && state.over
            && !state.pressed
        {
            state.pressed = true;
            state.down_position = Some(position);
            out.push(Transition::Down);
        }
        self.prune(id);
        out
    }

    /// Record a primary release.
    ///
    /// Produces [`Transition::Up`] only when a press on this node is
    /// outstanding, and [`Transition::Click`] when the release also lands on
    /// the node.
    pub fn on_up(
        &mut self,
        pointer_id: Option<PointerId>,
        hit: bool,
        position: Point,
    ) -> Transitions {
        let id = pointer_id.unwrap_or(PRIMARY_POINTER);
        let mut out = Transitions::new();
        self.cross(id, hit, position, &mut out);
        if let Some(state) = self.pointers.get_mut(&id)
            && state.pressed
        {
            state.pressed = false;
            state.down_position = None;
            out.push(Transition::Up { inside: state.over });
            if state.over {
                out.push(Transition::Click);
            }
        }
        self.prune(id);
        out
    }

    /// Drop all state for a pointer the platform has canceled.
    pub fn on_cancel(&mut self, pointer_id: Option<PointerId>) -> Transitions {
        let id = pointer_id.unwrap_or(PRIMARY_POINTER);
        let mut out = Transitions::new();
        if let Some(state) = self.pointers.remove(&id) {
            tracing::debug!(pointer = id.get(), "pointer canceled");
            if state.pressed {
                out.push(Transition::Cancel);
            }
            if state.over {
                out.push(Transition::Out);
            }
        }
        out
    }

    /// State of a pointer, if it is tracked.
    pub fn state(&self, pointer_id: Option<PointerId>) -> Option<&PointerState> {
        self.pointers.get(&pointer_id.unwrap_or(PRIMARY_POINTER))
    }

    /// Check if a pointer is currently over the node.
    pub fn is_over(&self, pointer_id: Option<PointerId>) -> bool {
        self.state(pointer_id).is_some_and(|s| s.over)
    }

    /// Check if a pointer has an outstanding press on the node.
    pub fn is_pressed(&self, pointer_id: Option<PointerId>) -> bool {
        self.state(pointer_id).is_some_and(|s| s.pressed)
    }

    /// Iterate over tracked pointers and their state.
    pub fn pointers(&self) -> impl Iterator<Item = (PointerId, &PointerState)> {
        self.pointers.iter().map(|(id, s)| (*id, s))
    }

    /// Number of tracked pointers.
    pub fn len(&self) -> usize {
        self.pointers.len()
    }

    /// True if no pointer is tracked.
    pub fn is_empty(&self) -> bool {
        self.pointers.is_empty()
    }

    /// Forget every pointer without producing transitions.
    pub fn clear(&mut self) {
        self.pointers.clear();
    }

    /// Apply the enter/leave crossing for `hit`. Returns whether the pointer is over afterwards.
    fn cross(
        &mut self,
        id: PointerId,
        hit: bool,
        position: Point,
        out: &mut Transitions,
    ) -> bool {
        match self.pointers.get_mut(&id) {
            Some(state) => {
                state.position = position;
                if hit != state.over {
                    state.over = hit;
                    out.push(if hit { Transition::Over } else { Transition::Out });
                }
                state.over
            }
            None if hit => {
                tracing::debug!(pointer = id.get(), "pointer entered, tracking");
                self.pointers.insert(
                    id,
                    PointerState {
                        over: true,
                        pressed: false,
                        position,
                        down_position: None,
                    },
                );
                out.push(Transition::Over);
                true
            }
            None => false,
        }
    }

    fn prune(&mut self, id: PointerId) {
        if self
            .pointers
            .get(&id)
            .is_some_and(|s| !s.over && !s.pressed)
        {
            self.pointers.remove(&id);
            tracing::debug!(pointer = id.get(), "pointer disengaged, untracked");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pt() -> Point {
        Point::new(5.0, 5.0)
    }

    fn id(n: u64) -> Option<PointerId> {
        NonZeroU64::new(n)
    }

    #[test]
    fn stationary_pointer_enters_once() {
        let mut t = PointerTracker::new();
        assert!(t.is_empty());

        let first = t.on_move(None, true, pt());
        assert_eq!(first.as_slice(), &[Transition::Over, Transition::Move]);
        assert!(t.is_over(None));

        let second = t.on_move(None, true, pt());
        assert!(!second.contains(&Transition::Over));

        let third = t.on_move(None, false, pt());
        assert_eq!(third.as_slice(), &[Transition::Out]);
        assert!(t.state(None).is_none());
    }

    #[test]
    fn miss_without_prior_state_is_silent() {
        let mut t = PointerTracker::new();
        assert!(t.on_move(None, false, pt()).is_empty());
        assert!(t.on_down(None, false, pt()).is_empty());
        assert!(t.on_up(None, false, pt()).is_empty());
        assert!(t.is_empty());
    }

    #[test]
    fn press_drag_out_release_outside() {
        let mut t = PointerTracker::new();
        t.on_move(None, true, pt());

        let down = t.on_down(None, true, Point::new(1.0, 2.0));
        assert_eq!(down.as_slice(), &[Transition::Down]);
        assert!(t.is_pressed(None));
        assert_eq!(
            t.state(None).unwrap().down_position,
            Some(Point::new(1.0, 2.0))
        );

        let left = t.on_move(None, false, pt());
        assert_eq!(left.as_slice(), &[Transition::Out]);
        // Retained while pressed.
        let state = t.state(None).expect("entry kept while pressed");
        assert!(!state.over);
        assert!(state.pressed);

        let up = t.on_up(None, false, pt());
        assert_eq!(up.as_slice(), &[Transition::Up { inside: false }]);
        assert!(t.is_empty());
    }

    #[test]
    fn release_over_node_clicks_and_keeps_hover() {
        let mut t = PointerTracker::new();
        t.on_move(None, true, pt());
        t.on_down(None, true, pt());
        let up = t.on_up(None, true, pt());
        assert_eq!(
            up.as_slice(),
            &[Transition::Up { inside: true }, Transition::Click]
        );
        assert!(t.is_over(None));
        assert!(!t.is_pressed(None));
        assert_eq!(t.state(None).unwrap().down_position, None);
    }

    #[test]
    fn down_without_prior_move_enters_first() {
        let mut t = PointerTracker::new();
        let down = t.on_down(id(3), true, pt());
        assert_eq!(down.as_slice(), &[Transition::Over, Transition::Down]);
    }

    #[test]
    fn re_entering_while_pressed_then_release_clicks() {
        let mut t = PointerTracker::new();
        t.on_down(None, true, pt());
        t.on_move(None, false, pt());
        let up = t.on_up(None, true, pt());
        assert_eq!(
            up.as_slice(),
            &[
                Transition::Over,
                Transition::Up { inside: true },
                Transition::Click
            ]
        );
    }

    #[test]
    fn repeated_press_is_ignored_until_release() {
        let mut t = PointerTracker::new();
        t.on_down(None, true, pt());
        assert!(t.on_down(None, true, pt()).is_empty());
        assert_eq!(t.on_up(None, true, pt()).len(), 2);
        // Second release has nothing to pair with.
        assert!(t.on_up(None, true, pt()).is_empty());
    }

    #[test]
    fn release_without_press_is_silent() {
        let mut t = PointerTracker::new();
        t.on_move(None, true, pt());
        assert!(t.on_up(None, true, pt()).is_empty());
        assert!(t.is_over(None));
    }

    #[test]
    fn cancel_reports_and_drops() {
        let mut t = PointerTracker::new();
        t.on_down(None, true, pt());
        let out = t.on_cancel(None);
        assert_eq!(out.as_slice(), &[Transition::Cancel, Transition::Out]);
        assert!(t.is_empty());
        assert!(t.on_cancel(None).is_empty());
    }

    #[test]
    fn pointers_are_independent() {
        let mut t = PointerTracker::new();
        t.on_move(id(1), true, pt());
        t.on_down(id(2), true, pt());
        assert_eq!(t.len(), 2);

        t.on_move(id(1), false, pt());
        assert!(t.state(id(1)).is_none());
        assert!(t.is_pressed(id(2)));

        let ids: alloc::vec::Vec<u64> = t.pointers().map(|(p, _)| p.get()).collect();
        assert_eq!(ids, alloc::vec![2]);

        t.clear();
        assert!(t.is_empty());
    }

    #[test]
    fn position_follows_latest_sample() {
        let mut t = PointerTracker::new();
        t.on_move(None, true, Point::new(1.0, 1.0));
        t.on_move(None, true, Point::new(2.0, 3.0));
        assert_eq!(t.state(None).unwrap().position, Point::new(2.0, 3.0));
    }
}
