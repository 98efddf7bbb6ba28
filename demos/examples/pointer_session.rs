// Copyright 2025 the Tether Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A scripted pointer session over a small 3D scene.
//!
//! This example shows how to combine:
//! - `tether_hit` shapes for per-node ray tests,
//! - `tether::pick` to find the nearest interactive node,
//! - `tether::pick::process_pointer` to turn samples into node events.
//!
//! Run:
//! - `cargo run -p tether_demos --example pointer_session`
//! - `RUST_LOG=tether=debug cargo run -p tether_demos --example pointer_session`

use glam::Vec3;
use kurbo::Point;
use tether::dispatch::{PointerEvent, Signal};
use tether::pick::{SceneNode, hits, process_pointer};
use tether::tether_hit::shapes::{Aabb, RayHit, Shape, Sphere};
use tether::{EventNames, Interaction, Interactive, Intersection, Listener, PointerId, Ray, Raycast};

type Event = PointerEvent<&'static str>;

struct Node {
    name: &'static str,
    shape: Option<Shape>,
    children: Vec<Node>,
    interaction: Interaction<Node, Event>,
}

impl Node {
    fn new(name: &'static str, shape: Option<Shape>, children: Vec<Node>) -> Self {
        Self {
            name,
            shape,
            children,
            interaction: Interaction::new(),
        }
    }

    fn find(&self, name: &str) -> Option<&Node> {
        if self.name == name {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(name))
    }
}

impl Interactive for Node {
    type Event = Event;
    fn interaction(&self) -> &Interaction<Self, Event> {
        &self.interaction
    }
}

impl Raycast for Node {
    type Key = &'static str;
    fn raycast(&self, ray: &Ray, out: &mut Vec<Intersection<&'static str>>) {
        if let Some(score) = self.shape.and_then(|s| s.ray_hit(ray)) {
            out.push(Intersection::from_score(ray, score, self.name));
        }
    }
}

impl SceneNode for Node {
    fn children(&self) -> &[Self] {
        &self.children
    }
}

/// Orthographic camera looking down -Z: 100 screen pixels per world unit,
/// screen origin at the top-left of an 800x600 viewport.
fn camera_ray(pt: Point) -> Ray {
    let x = ((pt.x - 400.0) / 100.0) as f32;
    let y = ((300.0 - pt.y) / 100.0) as f32;
    Ray::new(Vec3::new(x, y, 10.0), Vec3::NEG_Z)
}

fn log_events(node: &Node, names: &EventNames) {
    let types = [
        names.over,
        names.out,
        names.down,
        names.up,
        names.up_outside,
        names.click,
        names.cancel,
    ];
    for ty in types.into_iter().flatten() {
        node.on(
            ty,
            Listener::new(|n: &Node, ev: &Event| {
                let at = ev
                    .intersection
                    .as_ref()
                    .map(|hit| format!(" at distance {:.2}", hit.distance))
                    .unwrap_or_default();
                println!(
                    "  {:<8} <- {} (pointer {}){at}",
                    n.name,
                    ev.event_type,
                    ev.pointer.get()
                );
            }),
        );
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let panel = Shape::Aabb(Aabb::from_center_half_extents(
        Vec3::new(0.0, 0.0, -2.0),
        Vec3::new(3.0, 2.0, 0.1),
    ));
    let button = Shape::Aabb(Aabb::from_center_half_extents(
        Vec3::new(-1.0, 0.0, 0.0),
        Vec3::new(0.5, 0.25, 0.25),
    ));
    let orb = Shape::Sphere(Sphere::new(Vec3::new(1.5, 0.0, 0.0), 0.5));
    let hidden = Shape::Sphere(Sphere::new(Vec3::new(-1.0, 1.5, 1.0), 0.4));

    let root = Node::new(
        "root",
        None,
        vec![
            Node::new(
                "panel",
                Some(panel),
                vec![Node::new("button", Some(button), vec![])],
            ),
            Node::new("orb", Some(orb), vec![]),
            Node::new(
                "locked",
                None,
                vec![Node::new("hidden", Some(hidden), vec![])],
            ),
        ],
    );

    let names = EventNames::POINTER;
    for name in ["panel", "button", "orb", "hidden"] {
        if let Some(node) = root.find(name) {
            log_events(node, &names);
        }
    }
    if let Some(locked) = root.find("locked") {
        locked.set_interactive_children(false);
    }
    if let Some(orb) = root.find("orb") {
        orb.once("pointertap", |n: &Node, _: &Event| {
            println!("  {:<8} <- first tap only", n.name);
        });
    }

    let mouse = PointerId::new(1);
    let finger = PointerId::new(7);
    let button_pt = Point::new(300.0, 300.0);
    let orb_pt = Point::new(550.0, 300.0);
    let panel_pt = Point::new(150.0, 400.0);
    let hidden_pt = Point::new(300.0, 150.0);
    let void_pt = Point::new(790.0, 10.0);

    let script = [
        ("hover the panel", Signal::Move, mouse, panel_pt),
        ("slide onto the button", Signal::Move, mouse, button_pt),
        ("press the button", Signal::Down, mouse, button_pt),
        ("drag into empty space", Signal::Move, mouse, void_pt),
        ("release outside", Signal::Up, mouse, void_pt),
        ("tap the orb", Signal::Down, finger, orb_pt),
        ("lift on the orb", Signal::Up, finger, orb_pt),
        ("tap the orb again", Signal::Down, finger, orb_pt),
        ("lift again", Signal::Up, finger, orb_pt),
        ("hover a pruned node", Signal::Move, mouse, hidden_pt),
        ("finger lands on the panel", Signal::Down, finger, panel_pt),
        ("platform cancels the finger", Signal::Cancel, finger, panel_pt),
    ];

    for (label, signal, pointer, pt) in script {
        let ray = camera_ray(pt);
        println!("\n== {label}: {signal:?} @ ({:.0}, {:.0}) ==", pt.x, pt.y);
        let stack: Vec<_> = hits(&root, &ray).iter().map(|p| p.node.name).collect();
        println!("  hits nearest first: {stack:?}");
        let target = process_pointer(&root, &ray, signal, pointer, pt, &names);
        if target.is_none() {
            println!("  no target");
        }
    }
}
