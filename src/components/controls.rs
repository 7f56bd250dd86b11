//! User-operated components: Switch and Button.

use super::Destination;

/// A two-terminal switch.
///
/// The `closed` flag is the user-visible lever position; `output` is
/// the propagated state. The two only differ transiently inside
/// `set_output`, or permanently when the diagram is in static
/// inspection mode and a consistency rule or solver owns the display.
#[derive(Debug, Clone)]
pub struct Switch {
    pub name: String,
    pub closed: bool,
    pub output: bool,
    pub destinations: Vec<Destination>,
    pub do_not_propagate: bool,
}

impl Switch {
    /// Create a new switch with an initial lever position.
    pub fn new(name: String, closed: bool) -> Self {
        Self {
            name,
            closed,
            output: closed,
            destinations: Vec::new(),
            do_not_propagate: false,
        }
    }

    /// Flip the lever.
    pub fn toggle(&mut self) {
        self.closed = !self.closed;
    }
}

/// A push button, either momentary (press/release) or latching
/// (each press toggles).
#[derive(Debug, Clone)]
pub struct Button {
    pub name: String,
    pub latching: bool,
    pub output: bool,
    pub destinations: Vec<Destination>,
    pub do_not_propagate: bool,
}

impl Button {
    /// Create a momentary button.
    pub fn momentary(name: String) -> Self {
        Self {
            name,
            latching: false,
            output: false,
            destinations: Vec::new(),
            do_not_propagate: false,
        }
    }

    /// Create a latching button with an initial state.
    pub fn latching(name: String, initial: bool) -> Self {
        Self {
            name,
            latching: true,
            output: initial,
            destinations: Vec::new(),
            do_not_propagate: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_switch_toggle() {
        let mut sw = Switch::new("sw".to_string(), false);
        assert!(!sw.closed);
        sw.toggle();
        assert!(sw.closed);
        sw.toggle();
        assert!(!sw.closed);
    }
}
