// Copyright 2025 the Tether Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Reference picking pass over a node tree.
//!
//! ## Traversal
//!
//! Nodes are visited depth-first, parents before children, children in
//! slice order:
//!
//! - a node is ray-tested only if it is interactive;
//! - a node's children are visited only if `interactive_children` is set,
//!   whether or not the node itself is interactive.
//!
//! ## Ordering
//!
//! [`pick`] keeps the nearest intersection; on equal distance the node
//! visited first wins. [`hits`] returns every interactive hit, nearest first,
//! with the same stable tie order.
//!
//! ## Frame driver
//!
//! [`process_pointer`] runs one pointer sample through the whole tree: it
//! picks the target, then feeds *every* interactive node its `hit` flag so
//! that nodes the pointer previously entered receive their leave, and
//! dispatches the resulting transitions.
//!
//! Enter/leave and press/release pairing only hold while a node stays in the
//! walk. A node that stops being interactive, or is pruned by an ancestor,
//! is no longer fed samples: it keeps its tracked state, including an
//! outstanding press, and never sees the matching release. Hosts that remove
//! a node from the walk should call
//! [`track(Signal::Cancel, ..)`](Interactive::track) on it and dispatch the
//! result, which drops the state and reports the pending cancel and leave.

use alloc::vec::Vec;
use core::fmt;

use kurbo::Point;
use tether_hit::{HitTest, Intersection, Ray, Raycast};
use tether_pointer::{EventNames, PRIMARY_POINTER, PointerId};

use crate::Interactive;
use crate::dispatch::{PointerEvent, Signal, dispatch};

/// A node in a tree that can be picked.
pub trait SceneNode: Interactive + Raycast {
    /// Child nodes, in traversal order.
    fn children(&self) -> &[Self];
}

/// A node together with its nearest intersection.
pub struct Picked<'a, N: Raycast> {
    /// The node that was hit.
    pub node: &'a N,
    /// Its nearest intersection with the ray.
    pub hit: Intersection<N::Key>,
}

impl<N: Raycast> fmt::Debug for Picked<'_, N>
where
    N::Key: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Picked")
            .field("hit", &self.hit)
            .finish_non_exhaustive()
    }
}

/// Visit every interactive node reachable under the pruning rules.
pub fn for_each_interactive<'a, N: SceneNode>(root: &'a N, f: &mut impl FnMut(&'a N)) {
    if root.is_interactive() {
        f(root);
    }
    if root.interactive_children() {
        for child in root.children() {
            for_each_interactive(child, f);
        }
    }
}

/// Nearest interactive node hit by `ray`.
pub fn pick<'a, N: SceneNode>(root: &'a N, ray: &Ray) -> Option<Picked<'a, N>> {
    let mut best: Option<Picked<'a, N>> = None;
    for_each_interactive(root, &mut |node| {
        let Some(hit) = node.raycast_test(ray) else {
            return;
        };
        if best.as_ref().is_none_or(|b| hit.cmp_distance(&b.hit).is_lt()) {
            best = Some(Picked { node, hit });
        }
    });
    best
}

/// Every interactive node hit by `ray`, nearest first.
pub fn hits<'a, N: SceneNode>(root: &'a N, ray: &Ray) -> Vec<Picked<'a, N>> {
    let mut out = Vec::new();
    for_each_interactive(root, &mut |node| {
        if let Some(hit) = node.raycast_test(ray) {
            out.push(Picked { node, hit });
        }
    });
    out.sort_by(|a, b| a.hit.cmp_distance(&b.hit));
    out
}

/// Run one pointer sample through the tree and dispatch the resulting events.
///
/// The nearest interactive hit is the target: it is the only node that sees
/// `hit = true`. Every other interactive node sees `hit = false`, which
/// produces the leave (and any outside release) for nodes the pointer was on
/// before. Payloads carry the target's intersection on the target only.
///
/// The set of nodes is collected before any listener runs, so listeners that
/// change flags affect the next sample, not this one.
///
/// Returns the target.
pub fn process_pointer<'a, N>(
    root: &'a N,
    ray: &Ray,
    signal: Signal,
    pointer: Option<PointerId>,
    position: Point,
    names: &EventNames,
) -> Option<Picked<'a, N>>
where
    N: SceneNode,
    N::Key: Clone,
    N::Event: From<PointerEvent<N::Key>>,
{
    let target = pick(root, ray);
    let pointer_id = pointer.unwrap_or(PRIMARY_POINTER);
    tracing::debug!(
        pointer = pointer_id.get(),
        ?signal,
        distance = target.as_ref().map(|t| t.hit.distance),
        "pointer sample"
    );

    let mut nodes = Vec::new();
    for_each_interactive(root, &mut |node| nodes.push(node));

    for node in nodes {
        let target_hit = target
            .as_ref()
            .filter(|t| core::ptr::eq(t.node, node))
            .map(|t| &t.hit);
        let transitions = node.track(signal, Some(pointer_id), target_hit.is_some(), position);
        if transitions.is_empty() {
            continue;
        }
        dispatch(node, &transitions, names, |transition, event_type| {
            PointerEvent {
                event_type,
                transition,
                pointer: pointer_id,
                position,
                intersection: target_hit.cloned(),
            }
            .into()
        });
    }
    target
}
