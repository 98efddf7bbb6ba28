// Copyright 2025 the Tether Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-node interactivity flags.

bitflags::bitflags! {
    /// Flags controlling whether a node takes part in picking.
    ///
    /// These are read by the picking pass, never by dispatch itself.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct InteractFlags: u8 {
        /// The node is hit-tested and receives pointer events.
        ///
        /// Registering any listener sets this flag; removing listeners does not clear it.
        const INTERACTIVE          = 0b0000_0001;
        /// The node's descendants are visited during picking.
        const INTERACTIVE_CHILDREN = 0b0000_0010;
    }
}

impl Default for InteractFlags {
    fn default() -> Self {
        Self::INTERACTIVE_CHILDREN
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_opt_out_of_events_but_not_children() {
        let flags = InteractFlags::default();
        assert!(!flags.contains(InteractFlags::INTERACTIVE));
        assert!(flags.contains(InteractFlags::INTERACTIVE_CHILDREN));
    }
}
