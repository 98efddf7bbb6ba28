// Copyright 2025 the Tether Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Listener registry owned by each interactive node.
//!
//! ## Semantics
//!
//! - Listeners are kept per event type in registration order, which is also
//!   dispatch order. The same [`Listener`] may be registered several times and
//!   then fires once per registration.
//! - Identity is the listener *handle*: clones of a [`Listener`] are equal,
//!   two handles built from identical closures are not.
//! - Emitting copies the listener list for the type before calling anything
//!   and holds no borrow of the registry while listeners run. A listener may
//!   therefore add, remove or emit on the same node; changes show up on the
//!   next emit, never in the current one.
//!
//! The node-level API lives on [`Interactive`](crate::Interactive); this
//! module holds the storage it delegates to.

use alloc::borrow::Cow;
use alloc::rc::{Rc, Weak};
use core::cell::{Cell, OnceCell, Ref, RefCell, RefMut};
use core::fmt;

use hashbrown::HashMap;
use smallvec::SmallVec;
use tether_pointer::PointerTracker;

use crate::Interactive;
use crate::flags::InteractFlags;

type Callback<N, E> = dyn Fn(&N, &E);

/// Shared handle to an event callback.
///
/// The callback receives the node the event was emitted on and the event
/// payload.
pub struct Listener<N, E>(Rc<Callback<N, E>>);

impl<N, E> Listener<N, E> {
    /// Wrap a closure.
    pub fn new(f: impl Fn(&N, &E) + 'static) -> Self {
        Self(Rc::new(f))
    }

    /// True if both handles refer to the same registration target.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Invoke the callback directly.
    pub fn call(&self, node: &N, event: &E) {
        (self.0)(node, event);
    }
}

impl<N, E> Clone for Listener<N, E> {
    fn clone(&self) -> Self {
        Self(Rc::clone(&self.0))
    }
}

impl<N, E> fmt::Debug for Listener<N, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Listener")
            .field(&Rc::as_ptr(&self.0).cast::<()>())
            .finish()
    }
}

/// Listener snapshot taken at the start of an emit.
pub(crate) type Snapshot<N, E> = SmallVec<[Listener<N, E>; 4]>;

/// Interaction component composed into a scene node.
///
/// Holds the node's [`InteractFlags`], its listener registry and its
/// [`PointerTracker`]. All state uses interior mutability so listeners can
/// reach back into the node while an event is being dispatched.
pub struct Interaction<N, E> {
    flags: Cell<InteractFlags>,
    listeners: RefCell<HashMap<Cow<'static, str>, SmallVec<[Listener<N, E>; 2]>>>,
    pointers: RefCell<PointerTracker>,
}

impl<N, E> Interaction<N, E> {
    /// Create a component with default flags and no listeners.
    pub fn new() -> Self {
        Self {
            flags: Cell::new(InteractFlags::default()),
            listeners: RefCell::new(HashMap::new()),
            pointers: RefCell::new(PointerTracker::new()),
        }
    }

    /// Current flags.
    pub fn flags(&self) -> InteractFlags {
        self.flags.get()
    }

    /// Replace the flags.
    pub fn set_flags(&self, flags: InteractFlags) {
        self.flags.set(flags);
    }

    pub(crate) fn set_flag(&self, flag: InteractFlags, value: bool) {
        let mut flags = self.flags.get();
        flags.set(flag, value);
        self.flags.set(flags);
    }

    /// Append `listener` under `event_type` and mark the node interactive.
    pub fn add_listener(&self, event_type: Cow<'static, str>, listener: Listener<N, E>) {
        self.set_flag(InteractFlags::INTERACTIVE, true);
        self.listeners
            .borrow_mut()
            .entry(event_type)
            .or_default()
            .push(listener);
    }

    /// Remove the first registration of `listener` under `event_type`.
    ///
    /// Returns `false` if it was not registered.
    pub fn remove_listener(&self, event_type: &str, listener: &Listener<N, E>) -> bool {
        let mut listeners = self.listeners.borrow_mut();
        let Some(list) = listeners.get_mut(event_type) else {
            return false;
        };
        let Some(pos) = list.iter().position(|l| l.ptr_eq(listener)) else {
            return false;
        };
        list.remove(pos);
        if list.is_empty() {
            listeners.remove(event_type);
        }
        true
    }

    /// Remove every listener for `event_type`, or for all types when `None`.
    pub fn remove_all_listeners(&self, event_type: Option<&str>) {
        let mut listeners = self.listeners.borrow_mut();
        match event_type {
            Some(t) => {
                listeners.remove(t);
            }
            None => listeners.clear(),
        }
    }

    /// Number of registrations under `event_type`.
    pub fn listener_count(&self, event_type: &str) -> usize {
        self.listeners
            .borrow()
            .get(event_type)
            .map_or(0, |list| list.len())
    }

    /// True if at least one listener is registered under `event_type`.
    pub fn has_listeners(&self, event_type: &str) -> bool {
        self.listener_count(event_type) > 0
    }

    /// Copy of the listeners for `event_type`, or `None` if there are none.
    pub(crate) fn snapshot(&self, event_type: &str) -> Option<Snapshot<N, E>> {
        let listeners = self.listeners.borrow();
        let list = listeners.get(event_type)?;
        Some(list.iter().cloned().collect())
    }

    /// Read access to the pointer tracker.
    ///
    /// Do not hold the returned guard across a call that updates pointer state.
    pub fn pointers(&self) -> Ref<'_, PointerTracker> {
        self.pointers.borrow()
    }

    pub(crate) fn pointers_mut(&self) -> RefMut<'_, PointerTracker> {
        self.pointers.borrow_mut()
    }
}

impl<N, E> Default for Interaction<N, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N, E> fmt::Debug for Interaction<N, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let types = self.listeners.borrow().len();
        f.debug_struct("Interaction")
            .field("flags", &self.flags.get())
            .field("listener_types", &types)
            .field("pointers", &self.pointers.borrow().len())
            .finish_non_exhaustive()
    }
}

/// Build a listener that runs `f` at most once and then unregisters itself.
pub(crate) fn once_listener<N, F>(
    event_type: Cow<'static, str>,
    f: F,
) -> Listener<N, N::Event>
where
    N: Interactive + 'static,
    N::Event: 'static,
    F: Fn(&N, &N::Event) + 'static,
{
    let slot: Rc<OnceCell<Weak<Callback<N, N::Event>>>> = Rc::new(OnceCell::new());
    let this = Rc::clone(&slot);
    let fired = Cell::new(false);
    let listener = Listener::new(move |node: &N, event: &N::Event| {
        // A re-entrant emit can reach us again before the removal below.
        if fired.replace(true) {
            return;
        }
        f(node, event);
        if let Some(me) = this.get().and_then(Weak::upgrade) {
            node.off(&event_type, &Listener(me));
        }
    });
    // The slot is fresh, so this cannot fail.
    let _ = slot.set(Rc::downgrade(&listener.0));
    listener
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Interactive;
    use alloc::string::String;
    use alloc::vec;
    use alloc::vec::Vec;

    #[derive(Default)]
    struct Node {
        name: &'static str,
        interaction: Interaction<Node, u32>,
    }

    impl Interactive for Node {
        type Event = u32;
        fn interaction(&self) -> &Interaction<Self, u32> {
            &self.interaction
        }
    }

    type Log = Rc<RefCell<Vec<String>>>;

    fn recorder(log: &Log, tag: &'static str) -> Listener<Node, u32> {
        let log = Rc::clone(log);
        Listener::new(move |node: &Node, ev: &u32| {
            log.borrow_mut()
                .push(alloc::format!("{tag}:{}:{ev}", node.name));
        })
    }

    #[test]
    fn on_then_emit_invokes_once_with_payload() {
        let log = Log::default();
        let node = Node {
            name: "a",
            ..Node::default()
        };
        node.on("tap", recorder(&log, "f"));
        node.emit("tap", &7);
        assert_eq!(*log.borrow(), vec!["f:a:7"]);
    }

    #[test]
    fn off_stops_delivery() {
        let log = Log::default();
        let node = Node::default();
        let f = recorder(&log, "f");
        node.on("tap", f.clone());
        node.off("tap", &f);
        node.emit("tap", &1);
        assert!(log.borrow().is_empty());
        assert!(!node.has_listeners("tap"));
    }

    #[test]
    fn off_unknown_listener_is_noop() {
        let log = Log::default();
        let node = Node::default();
        let registered = recorder(&log, "f");
        let stranger = recorder(&log, "g");
        node.on("tap", registered);
        node.off("tap", &stranger);
        node.off("missing", &stranger);
        assert_eq!(node.listener_count("tap"), 1);
    }

    #[test]
    fn emit_without_listeners_is_noop() {
        let node = Node::default();
        node.emit("nothing", &0);
        assert!(!node.is_interactive());
    }

    #[test]
    fn duplicate_registration_fires_twice() {
        let log = Log::default();
        let node = Node::default();
        let f = recorder(&log, "f");
        node.on("tap", f.clone()).on("tap", f.clone());
        node.emit("tap", &1);
        assert_eq!(log.borrow().len(), 2);

        // One off removes one registration.
        node.off("tap", &f);
        node.emit("tap", &2);
        assert_eq!(log.borrow().len(), 3);
    }

    #[test]
    fn dispatch_follows_registration_order() {
        let log = Log::default();
        let node = Node::default();
        node.on("tap", recorder(&log, "1"))
            .on("tap", recorder(&log, "2"))
            .on("tap", recorder(&log, "3"));
        node.emit("tap", &0);
        assert_eq!(*log.borrow(), vec!["1::0", "2::0", "3::0"]);
    }

    #[test]
    fn once_fires_a_single_time() {
        let log = Log::default();
        let node = Node::default();
        let inner = recorder(&log, "once");
        node.once("tap", move |n: &Node, e: &u32| inner.call(n, e));
        node.emit("tap", &1);
        node.emit("tap", &2);
        assert_eq!(*log.borrow(), vec!["once::1"]);
        assert!(!node.has_listeners("tap"));
    }

    #[test]
    fn once_survives_reentrant_emit() {
        let count = Rc::new(Cell::new(0));
        let node = Node::default();
        let c = Rc::clone(&count);
        node.once("tap", move |n: &Node, _: &u32| {
            c.set(c.get() + 1);
            n.emit("tap", &0);
        });
        node.emit("tap", &0);
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn once_can_be_cancelled_before_firing() {
        let log = Log::default();
        let node = Node::default();
        let inner = recorder(&log, "once");
        let handle = node.once("tap", move |n: &Node, e: &u32| inner.call(n, e));
        node.off("tap", &handle);
        node.emit("tap", &1);
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn self_removal_does_not_skip_siblings() {
        let log = Log::default();
        let node = Node::default();
        let slot: Rc<RefCell<Option<Listener<Node, u32>>>> = Rc::default();
        let me = Rc::clone(&slot);
        let log1 = Rc::clone(&log);
        let first = Listener::new(move |n: &Node, _: &u32| {
            log1.borrow_mut().push("first".into());
            if let Some(l) = me.borrow().as_ref() {
                n.off("tap", l);
            }
        });
        *slot.borrow_mut() = Some(first.clone());
        node.on("tap", first).on("tap", recorder(&log, "second"));

        node.emit("tap", &0);
        assert_eq!(*log.borrow(), vec!["first", "second::0"]);

        node.emit("tap", &1);
        assert_eq!(*log.borrow(), vec!["first", "second::0", "second::1"]);
    }

    #[test]
    fn listener_added_during_emit_waits_for_next_cycle() {
        let log = Log::default();
        let node = Node::default();
        let late = recorder(&log, "late");
        let added = Cell::new(false);
        node.on(
            "tap",
            Listener::new(move |n: &Node, _: &u32| {
                if !added.replace(true) {
                    n.on("tap", late.clone());
                }
            }),
        );
        node.emit("tap", &1);
        assert!(log.borrow().is_empty());
        node.emit("tap", &2);
        assert_eq!(*log.borrow(), vec!["late::2"]);
    }

    #[test]
    fn on_sets_interactive_and_off_keeps_it() {
        let log = Log::default();
        let node = Node::default();
        assert!(!node.is_interactive());
        let f = recorder(&log, "f");
        node.on("tap", f.clone());
        assert!(node.is_interactive());
        node.off("tap", &f);
        assert!(node.is_interactive());
        node.remove_all_listeners(None);
        assert!(node.is_interactive());
    }

    #[test]
    fn remove_all_for_one_type() {
        let log = Log::default();
        let node = Node::default();
        node.on("a", recorder(&log, "a")).on("b", recorder(&log, "b"));
        node.remove_all_listeners(Some("a"));
        assert!(!node.has_listeners("a"));
        assert!(node.has_listeners("b"));
    }

    #[test]
    fn listeners_accept_owned_event_types() {
        let log = Log::default();
        let node = Node::default();
        let ty = String::from("custom:event");
        node.on(ty.clone(), recorder(&log, "f"));
        node.emit(&ty, &3);
        assert_eq!(log.borrow().len(), 1);
    }

    #[test]
    fn set_flags_replaces_both_bits() {
        let node = Node::default();
        node.interaction().set_flags(InteractFlags::INTERACTIVE);
        assert!(node.is_interactive());
        assert!(!node.interactive_children());

        node.interaction().set_flags(InteractFlags::empty());
        assert!(!node.is_interactive());
        assert!(!node.interactive_children());
    }

    fn failing() -> Listener<Node, u32> {
        Listener::new(|_: &Node, _: &u32| panic!("listener failed"))
    }

    #[test]
    #[should_panic(expected = "listener failed")]
    fn listener_panic_propagates_out_of_emit() {
        let node = Node::default();
        node.on("tap", failing());
        node.emit("tap", &1);
    }

    #[test]
    fn listener_panic_stops_the_emit_but_not_the_registry() {
        use std::panic::{AssertUnwindSafe, catch_unwind};

        let log = Log::default();
        let node = Node {
            name: "n",
            ..Node::default()
        };
        node.on("tap", failing()).on("tap", recorder(&log, "after"));

        let result = catch_unwind(AssertUnwindSafe(|| {
            node.emit("tap", &1);
        }));
        assert!(result.is_err());
        assert!(log.borrow().is_empty());
        assert_eq!(node.listener_count("tap"), 2);

        node.on("other", recorder(&log, "other"));
        node.emit("other", &2);
        assert_eq!(*log.borrow(), vec!["other:n:2"]);
    }
}
