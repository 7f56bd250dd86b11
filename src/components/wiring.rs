//! Pass-through wiring: joints and wire segments.

use super::Destination;

/// A junction dot from which several wires fan out.
#[derive(Debug, Clone)]
pub struct Joint {
    pub name: String,
    pub output: bool,
    pub destinations: Vec<Destination>,
    pub do_not_propagate: bool,
}

impl Joint {
    pub fn new(name: String) -> Self {
        Self {
            name,
            output: false,
            destinations: Vec::new(),
            do_not_propagate: false,
        }
    }
}

/// A wire. In the push model it stores and forwards a boolean to the
/// component at its far end; in the closed-circuit model it is also an
/// edge in the wire index. Visual bend points have no simulation
/// meaning and are not represented here.
#[derive(Debug, Clone)]
pub struct WireSegment {
    pub name: String,
    pub output: bool,
    pub destination: Option<Destination>,
    pub do_not_propagate: bool,
}

impl WireSegment {
    pub fn new(name: String) -> Self {
        Self {
            name,
            output: false,
            destination: None,
            do_not_propagate: false,
        }
    }
}
