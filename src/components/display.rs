//! Display components: Light and BitDisplay.

use super::Destination;

/// A light bulb. Lit when its input is high. The input passes through
/// to the other terminal so a bulb can sit in the middle of a chain.
#[derive(Debug, Clone)]
pub struct Light {
    pub name: String,
    pub output: bool,
    pub destination: Option<Destination>,
    pub do_not_propagate: bool,
}

impl Light {
    pub fn new(name: String) -> Self {
        Self {
            name,
            output: false,
            destination: None,
            do_not_propagate: false,
        }
    }
}

/// A single-bit readout (a "0"/"1" box). Behaves like a light but is
/// also the usual subscription point for numeric value taps.
#[derive(Debug, Clone)]
pub struct BitDisplay {
    pub name: String,
    pub output: bool,
    pub destination: Option<Destination>,
    pub do_not_propagate: bool,
}

impl BitDisplay {
    pub fn new(name: String) -> Self {
        Self {
            name,
            output: false,
            destination: None,
            do_not_propagate: false,
        }
    }
}
