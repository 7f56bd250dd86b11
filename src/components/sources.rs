//! Source (battery) and ground terminals.

use super::Destination;

/// A voltage source. In the push model it drives a constant logic
/// high into its destinations; in the closed-circuit model it is the
/// starting point of every loop trace.
#[derive(Debug, Clone)]
pub struct Source {
    pub name: String,
    pub output: bool,
    pub destinations: Vec<Destination>,
    pub do_not_propagate: bool,
}

impl Source {
    pub fn new(name: String) -> Self {
        Self {
            name,
            output: true,
            destinations: Vec::new(),
            do_not_propagate: false,
        }
    }
}

/// A ground terminal. Accepts a value for display but forwards nothing;
/// in the closed-circuit model it terminates a loop.
#[derive(Debug, Clone)]
pub struct Ground {
    pub name: String,
    pub output: bool,
}

impl Ground {
    pub fn new(name: String) -> Self {
        Self {
            name,
            output: false,
        }
    }
}
