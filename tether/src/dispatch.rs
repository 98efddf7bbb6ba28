// Copyright 2025 the Tether Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Turning pointer transitions into emitted events.
//!
//! [`Interactive::track`] yields the [`Transition`]s for one node; [`dispatch`]
//! names them with an [`EventNames`] table and emits each one on that node.
//! Transitions without a name in the table, or without listeners, are
//! skipped and no payload is built for them.
//!
//! ```
//! use kurbo::Point;
//! use tether::dispatch::{Signal, dispatch};
//! use tether::{EventNames, Interaction, Interactive, Listener};
//! use std::cell::Cell;
//! use std::rc::Rc;
//!
//! #[derive(Default)]
//! struct Node {
//!     interaction: Interaction<Node, u8>,
//! }
//! impl Interactive for Node {
//!     type Event = u8;
//!     fn interaction(&self) -> &Interaction<Self, u8> {
//!         &self.interaction
//!     }
//! }
//!
//! let node = Node::default();
//! let entered = Rc::new(Cell::new(0));
//! let e = entered.clone();
//! node.on("mouseover", Listener::new(move |_: &Node, _: &u8| e.set(e.get() + 1)));
//!
//! for _ in 0..3 {
//!     let t = node.track(Signal::Move, None, true, Point::ZERO);
//!     dispatch(&node, &t, &EventNames::MOUSE, |_, _| 0);
//! }
//! // Resting on the node enters it once.
//! assert_eq!(entered.get(), 1);
//! ```

use kurbo::Point;
use tether_hit::Intersection;
use tether_pointer::{EventNames, PointerId, Transition};

use crate::Interactive;

/// Raw pointer signal from the platform.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Signal {
    /// Position sample.
    Move,
    /// Primary button pressed or contact started.
    Down,
    /// Primary button released or contact ended.
    Up,
    /// The platform aborted the pointer.
    Cancel,
}

/// Payload built by the frame driver for each emitted transition.
#[derive(Clone, Debug, PartialEq)]
pub struct PointerEvent<K> {
    /// Event type the payload was emitted under.
    pub event_type: &'static str,
    /// Transition that produced the event.
    pub transition: Transition,
    /// Pointer that caused it.
    pub pointer: PointerId,
    /// Screen position of the sample.
    pub position: Point,
    /// Intersection with the receiving node, when it is the current target.
    pub intersection: Option<Intersection<K>>,
}

/// Emit each named transition on `node`.
///
/// `build` creates the payload from the transition and its event type; it is
/// only called for transitions that will actually reach a listener. Returns
/// the number of events emitted.
pub fn dispatch<N: Interactive>(
    node: &N,
    transitions: &[Transition],
    names: &EventNames,
    mut build: impl FnMut(Transition, &'static str) -> N::Event,
) -> usize {
    let mut emitted = 0;
    for &transition in transitions {
        let Some(event_type) = names.name(transition) else {
            continue;
        };
        if !node.has_listeners(event_type) {
            continue;
        }
        let event = build(transition, event_type);
        node.emit(event_type, &event);
        emitted += 1;
    }
    emitted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Interaction, Listener};
    use alloc::rc::Rc;
    use alloc::vec;
    use alloc::vec::Vec;
    use core::cell::RefCell;

    #[derive(Default)]
    struct Node {
        interaction: Interaction<Node, (Transition, &'static str)>,
    }

    impl Interactive for Node {
        type Event = (Transition, &'static str);
        fn interaction(&self) -> &Interaction<Self, Self::Event> {
            &self.interaction
        }
    }

    type Seen = Rc<RefCell<Vec<&'static str>>>;

    fn listen_all(node: &Node, names: &EventNames) -> Seen {
        let seen = Seen::default();
        let all = [
            names.over,
            names.out,
            names.moved,
            names.down,
            names.up,
            names.up_outside,
            names.click,
            names.cancel,
        ];
        for ty in all.into_iter().flatten() {
            let s = Rc::clone(&seen);
            node.on(
                ty,
                Listener::new(move |_: &Node, (_, name): &(Transition, &'static str)| {
                    s.borrow_mut().push(*name);
                }),
            );
        }
        seen
    }

    fn step(node: &Node, names: &EventNames, signal: Signal, hit: bool) {
        let t = node.track(signal, None, hit, Point::ZERO);
        dispatch(node, &t, names, |tr, ty| (tr, ty));
    }

    #[test]
    fn hover_lifecycle_over_stay_out() {
        let node = Node::default();
        let names = EventNames {
            moved: None,
            ..EventNames::POINTER
        };
        let seen = listen_all(&node, &names);

        step(&node, &names, Signal::Move, true);
        assert_eq!(*seen.borrow(), vec!["pointerover"]);
        assert!(node.interaction().pointers().is_over(None));

        step(&node, &names, Signal::Move, true);
        assert_eq!(seen.borrow().len(), 1);

        step(&node, &names, Signal::Move, false);
        assert_eq!(*seen.borrow(), vec!["pointerover", "pointerout"]);
        assert!(node.interaction().pointers().is_empty());
    }

    #[test]
    fn press_leave_release_pairs_up_outside() {
        let node = Node::default();
        let names = EventNames {
            moved: None,
            ..EventNames::MOUSE
        };
        let seen = listen_all(&node, &names);

        step(&node, &names, Signal::Move, true);
        step(&node, &names, Signal::Down, true);
        assert!(node.interaction().pointers().is_pressed(None));

        step(&node, &names, Signal::Move, false);
        assert_eq!(node.interaction().pointers().len(), 1);

        step(&node, &names, Signal::Up, false);
        assert_eq!(
            *seen.borrow(),
            vec!["mouseover", "mousedown", "mouseout", "mouseupoutside"]
        );
        assert!(node.interaction().pointers().is_empty());
    }

    #[test]
    fn release_inside_emits_up_then_click() {
        let node = Node::default();
        let names = EventNames::TOUCH;
        let seen = listen_all(&node, &names);

        step(&node, &names, Signal::Down, true);
        step(&node, &names, Signal::Up, true);
        assert_eq!(*seen.borrow(), vec!["touchstart", "touchend", "tap"]);
    }

    #[test]
    fn unnamed_or_unheard_transitions_are_skipped() {
        let node = Node::default();
        let mut built = 0;
        let t = node.track(Signal::Move, None, true, Point::ZERO);
        let emitted = dispatch(&node, &t, &EventNames::TOUCH, |tr, ty| {
            built += 1;
            (tr, ty)
        });
        assert_eq!(emitted, 0);
        assert_eq!(built, 0);
    }

    #[test]
    fn listener_can_query_tracker_during_dispatch() {
        let node = Node::default();
        let pressed = Rc::new(RefCell::new(None));
        let p = Rc::clone(&pressed);
        node.on(
            "pointerdown",
            Listener::new(move |n: &Node, _: &(Transition, &'static str)| {
                *p.borrow_mut() = Some(n.interaction().pointers().is_pressed(None));
            }),
        );
        step(&node, &EventNames::POINTER, Signal::Down, true);
        assert_eq!(*pressed.borrow(), Some(true));
    }

    #[test]
    fn cancel_while_pressed() {
        let node = Node::default();
        let names = EventNames::POINTER;
        let seen = listen_all(&node, &names);
        step(&node, &names, Signal::Down, true);
        step(&node, &names, Signal::Cancel, false);
        assert_eq!(
            *seen.borrow(),
            vec!["pointerover", "pointerdown", "pointercancel", "pointerout"]
        );
    }
}
