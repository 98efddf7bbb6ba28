// Copyright 2025 the Tether Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The node-level interaction capability.

use alloc::borrow::Cow;

use kurbo::Point;
use tether_pointer::{PointerId, Transitions};

use crate::dispatch::Signal;
use crate::emitter::{Interaction, Listener, once_listener};
use crate::flags::InteractFlags;

/// Event registration, dispatch and pointer state for a scene node.
///
/// Implementors only provide access to an [`Interaction`] component they
/// own; every operation has a default implementation on top of it.
///
/// ```
/// use tether::{Interaction, Interactive, Listener};
///
/// #[derive(Default)]
/// struct Mesh {
///     interaction: Interaction<Mesh, &'static str>,
/// }
///
/// impl Interactive for Mesh {
///     type Event = &'static str;
///     fn interaction(&self) -> &Interaction<Self, Self::Event> {
///         &self.interaction
///     }
/// }
///
/// let mesh = Mesh::default();
/// assert!(!mesh.is_interactive());
///
/// let hello = Listener::new(|_: &Mesh, msg: &&'static str| assert_eq!(*msg, "hi"));
/// mesh.on("greet", hello.clone());
/// assert!(mesh.is_interactive());
///
/// mesh.emit("greet", &"hi");
/// mesh.off("greet", &hello);
/// assert!(!mesh.has_listeners("greet"));
/// ```
pub trait Interactive: Sized {
    /// Payload passed to listeners.
    type Event;

    /// The component holding this node's interaction state.
    fn interaction(&self) -> &Interaction<Self, Self::Event>;

    /// Register `listener` for `event_type` and mark the node interactive.
    fn on(
        &self,
        event_type: impl Into<Cow<'static, str>>,
        listener: Listener<Self, Self::Event>,
    ) -> &Self {
        self.interaction().add_listener(event_type.into(), listener);
        self
    }

    /// Remove one registration of `listener` for `event_type`.
    ///
    /// Unknown listeners are ignored. The node stays interactive.
    fn off(&self, event_type: &str, listener: &Listener<Self, Self::Event>) -> &Self {
        if !self.interaction().remove_listener(event_type, listener) {
            tracing::trace!(event_type, "off: listener not registered");
        }
        self
    }

    /// Register `f` to run on the next `event_type` only.
    ///
    /// Returns the registered wrapper, which can be passed to [`off`](Self::off)
    /// to cancel it before it fires.
    fn once(
        &self,
        event_type: impl Into<Cow<'static, str>>,
        f: impl Fn(&Self, &Self::Event) + 'static,
    ) -> Listener<Self, Self::Event>
    where
        Self: 'static,
        Self::Event: 'static,
    {
        let event_type = event_type.into();
        let listener = once_listener(event_type.clone(), f);
        self.on(event_type, listener.clone());
        listener
    }

    /// Call every listener registered for `event_type`, in registration order.
    ///
    /// The listener list is copied first, so listeners added or removed while
    /// this runs only take effect on the next emit. A panicking listener stops
    /// the remaining ones of this call.
    fn emit(&self, event_type: &str, event: &Self::Event) -> &Self {
        let Some(listeners) = self.interaction().snapshot(event_type) else {
            tracing::trace!(event_type, "emit: no listeners");
            return self;
        };
        tracing::trace!(event_type, count = listeners.len(), "emit");
        for listener in &listeners {
            listener.call(self, event);
        }
        self
    }

    /// True if any listener is registered for `event_type`.
    fn has_listeners(&self, event_type: &str) -> bool {
        self.interaction().has_listeners(event_type)
    }

    /// Number of registrations for `event_type`.
    fn listener_count(&self, event_type: &str) -> usize {
        self.interaction().listener_count(event_type)
    }

    /// Drop listeners for one type, or all of them. Does not clear interactivity.
    fn remove_all_listeners(&self, event_type: Option<&str>) -> &Self {
        self.interaction().remove_all_listeners(event_type);
        self
    }

    /// Whether the node is hit-tested and receives pointer events.
    fn is_interactive(&self) -> bool {
        self.interaction()
            .flags()
            .contains(InteractFlags::INTERACTIVE)
    }

    /// Opt the node in or out of picking.
    fn set_interactive(&self, value: bool) -> &Self {
        self.interaction()
            .set_flag(InteractFlags::INTERACTIVE, value);
        self
    }

    /// Whether picking descends into this node's children.
    fn interactive_children(&self) -> bool {
        self.interaction()
            .flags()
            .contains(InteractFlags::INTERACTIVE_CHILDREN)
    }

    /// Allow or prune picking of this node's subtree.
    fn set_interactive_children(&self, value: bool) -> &Self {
        self.interaction()
            .set_flag(InteractFlags::INTERACTIVE_CHILDREN, value);
        self
    }

    /// Feed one pointer signal into this node's tracker.
    ///
    /// `hit` is whether the pointer hits this node on this sample; it is
    /// ignored for [`Signal::Cancel`]. The tracker is released before
    /// returning, so the transitions can be dispatched to listeners that
    /// inspect pointer state.
    fn track(
        &self,
        signal: Signal,
        pointer: Option<PointerId>,
        hit: bool,
        position: Point,
    ) -> Transitions {
        let mut tracker = self.interaction().pointers_mut();
        match signal {
            Signal::Move => tracker.on_move(pointer, hit, position),
            Signal::Down => tracker.on_down(pointer, hit, position),
            Signal::Up => tracker.on_up(pointer, hit, position),
            Signal::Cancel => tracker.on_cancel(pointer),
        }
    }
}
