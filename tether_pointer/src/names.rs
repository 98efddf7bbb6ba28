// Copyright 2025 the Tether Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::tracker::Transition;

/// Event type names for one pointer family.
///
/// A `None` entry means the family has no event for that transition and
/// nothing is emitted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EventNames {
    /// Name for [`Transition::Over`].
    pub over: Option<&'static str>,
    /// Name for [`Transition::Out`].
    pub out: Option<&'static str>,
    /// Name for [`Transition::Move`].
    pub moved: Option<&'static str>,
    /// Name for [`Transition::Down`].
    pub down: Option<&'static str>,
    /// Name for [`Transition::Up`] released over the node.
    pub up: Option<&'static str>,
    /// Name for [`Transition::Up`] released elsewhere. Falls back to `up`.
    pub up_outside: Option<&'static str>,
    /// Name for [`Transition::Click`].
    pub click: Option<&'static str>,
    /// Name for [`Transition::Cancel`].
    pub cancel: Option<&'static str>,
}

impl EventNames {
    /// Unified pointer events.
    pub const POINTER: Self = Self {
        over: Some("pointerover"),
        out: Some("pointerout"),
        moved: Some("pointermove"),
        down: Some("pointerdown"),
        up: Some("pointerup"),
        up_outside: Some("pointerupoutside"),
        click: Some("pointertap"),
        cancel: Some("pointercancel"),
    };

    /// Mouse events.
    pub const MOUSE: Self = Self {
        over: Some("mouseover"),
        out: Some("mouseout"),
        moved: Some("mousemove"),
        down: Some("mousedown"),
        up: Some("mouseup"),
        up_outside: Some("mouseupoutside"),
        click: Some("click"),
        cancel: None,
    };

    /// Touch events. Touches have no hover, so enter/leave are silent.
    pub const TOUCH: Self = Self {
        over: None,
        out: None,
        moved: Some("touchmove"),
        down: Some("touchstart"),
        up: Some("touchend"),
        up_outside: Some("touchendoutside"),
        click: Some("tap"),
        cancel: Some("touchcancel"),
    };

    /// Event type for `transition`, if this family has one.
    pub fn name(&self, transition: Transition) -> Option<&'static str> {
        match transition {
            Transition::Over => self.over,
            Transition::Out => self.out,
            Transition::Move => self.moved,
            Transition::Down => self.down,
            Transition::Up { inside: true } => self.up,
            Transition::Up { inside: false } => self.up_outside.or(self.up),
            Transition::Click => self.click,
            Transition::Cancel => self.cancel,
        }
    }
}

impl Default for EventNames {
    fn default() -> Self {
        Self::POINTER
    }
}
