//! Simulation components.
//!
//! This module provides the closed set of component kinds a diagram can
//! contain:
//! - Electrical: Source (battery), Ground, Switch, Relay
//! - Digital: Button, Gate, BitDisplay
//! - Pass-through: Light, Joint, Wire
//!
//! Every component stores a boolean output; the relay additionally
//! stores its `triggered` flag and three conducting flags for display.
//! The kind set is fixed, so dispatch is a plain `match` over the
//! [`Component`] enum rather than trait objects.

mod controls;
mod display;
mod gates;
mod relay;
mod sources;
mod wiring;

pub use controls::{Button, Switch};
pub use display::{BitDisplay, Light};
pub use gates::{Gate, GateKind};
pub use relay::{Relay, CONDUCT_BRANCH0, CONDUCT_BRANCH1, CONDUCT_COIL};
pub use sources::{Ground, Source};
pub use wiring::{Joint, WireSegment};

use std::fmt;

use crate::diagram::ComponentId;

/// A push-propagation destination: a target component and the input
/// slot on it that receives the forwarded value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Destination {
    pub target: ComponentId,
    pub slot: usize,
}

impl Destination {
    pub fn new(target: ComponentId, slot: usize) -> Self {
        Self { target, slot }
    }
}

/// The kind of a component. Closed set; see the module docs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentKind {
    Source,
    Ground,
    Switch,
    Button,
    Relay,
    Gate,
    Light,
    BitDisplay,
    Joint,
    Wire,
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ComponentKind::Source => "battery",
            ComponentKind::Ground => "ground",
            ComponentKind::Switch => "switch",
            ComponentKind::Button => "button",
            ComponentKind::Relay => "relay",
            ComponentKind::Gate => "gate",
            ComponentKind::Light => "light",
            ComponentKind::BitDisplay => "bit display",
            ComponentKind::Joint => "joint",
            ComponentKind::Wire => "wire",
        };
        write!(f, "{name}")
    }
}

/// A diagram component.
#[derive(Debug, Clone)]
pub enum Component {
    Source(Source),
    Ground(Ground),
    Switch(Switch),
    Button(Button),
    Relay(Relay),
    Gate(Gate),
    Light(Light),
    BitDisplay(BitDisplay),
    Joint(Joint),
    Wire(WireSegment),
}

impl Component {
    /// Get the component kind.
    pub fn kind(&self) -> ComponentKind {
        match self {
            Component::Source(_) => ComponentKind::Source,
            Component::Ground(_) => ComponentKind::Ground,
            Component::Switch(_) => ComponentKind::Switch,
            Component::Button(_) => ComponentKind::Button,
            Component::Relay(_) => ComponentKind::Relay,
            Component::Gate(_) => ComponentKind::Gate,
            Component::Light(_) => ComponentKind::Light,
            Component::BitDisplay(_) => ComponentKind::BitDisplay,
            Component::Joint(_) => ComponentKind::Joint,
            Component::Wire(_) => ComponentKind::Wire,
        }
    }

    /// Get the component's flattened name.
    pub fn name(&self) -> &str {
        match self {
            Component::Source(c) => &c.name,
            Component::Ground(c) => &c.name,
            Component::Switch(c) => &c.name,
            Component::Button(c) => &c.name,
            Component::Relay(c) => &c.name,
            Component::Gate(c) => &c.name,
            Component::Light(c) => &c.name,
            Component::BitDisplay(c) => &c.name,
            Component::Joint(c) => &c.name,
            Component::Wire(c) => &c.name,
        }
    }

    /// Current boolean display state. For a relay this is true when any
    /// of its three electrical paths is conducting.
    pub fn output(&self) -> bool {
        match self {
            Component::Source(c) => c.output,
            Component::Ground(c) => c.output,
            Component::Switch(c) => c.output,
            Component::Button(c) => c.output,
            Component::Relay(c) => c.is_conducting(),
            Component::Gate(c) => c.output,
            Component::Light(c) => c.output,
            Component::BitDisplay(c) => c.output,
            Component::Joint(c) => c.output,
            Component::Wire(c) => c.output,
        }
    }

    /// Overwrite the stored display state without propagating.
    /// Used by the closed-circuit solver when coloring verdicts; relays
    /// are colored through their conducting flags instead.
    pub fn set_display_state(&mut self, value: bool) {
        match self {
            Component::Source(c) => c.output = value,
            Component::Ground(c) => c.output = value,
            Component::Switch(c) => c.output = value,
            Component::Button(c) => c.output = value,
            Component::Relay(_) => {}
            Component::Gate(c) => c.output = value,
            Component::Light(c) => c.output = value,
            Component::BitDisplay(c) => c.output = value,
            Component::Joint(c) => c.output = value,
            Component::Wire(c) => c.output = value,
        }
    }

    /// Whether state changes are stored locally without forwarding.
    /// Set on every component of a diagram built in solver mode.
    pub fn do_not_propagate(&self) -> bool {
        match self {
            Component::Source(c) => c.do_not_propagate,
            Component::Ground(_) => false,
            Component::Switch(c) => c.do_not_propagate,
            Component::Button(c) => c.do_not_propagate,
            Component::Relay(c) => c.do_not_propagate,
            Component::Gate(c) => c.do_not_propagate,
            Component::Light(c) => c.do_not_propagate,
            Component::BitDisplay(c) => c.do_not_propagate,
            Component::Joint(c) => c.do_not_propagate,
            Component::Wire(c) => c.do_not_propagate,
        }
    }

    /// Mark the component as store-only (static inspection mode).
    pub fn suppress_propagation(&mut self) {
        match self {
            Component::Source(c) => c.do_not_propagate = true,
            Component::Ground(_) => {}
            Component::Switch(c) => c.do_not_propagate = true,
            Component::Button(c) => c.do_not_propagate = true,
            Component::Relay(c) => c.do_not_propagate = true,
            Component::Gate(c) => c.do_not_propagate = true,
            Component::Light(c) => c.do_not_propagate = true,
            Component::BitDisplay(c) => c.do_not_propagate = true,
            Component::Joint(c) => c.do_not_propagate = true,
            Component::Wire(c) => c.do_not_propagate = true,
        }
    }
}
