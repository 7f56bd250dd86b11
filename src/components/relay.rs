//! The relay state machine.

use super::Destination;

/// Index of the coil path in [`Relay::conducting`].
pub const CONDUCT_COIL: usize = 0;
/// Index of the idle branch (`out0`) in [`Relay::conducting`].
pub const CONDUCT_BRANCH0: usize = 1;
/// Index of the triggered branch (`out1`) in [`Relay::conducting`].
pub const CONDUCT_BRANCH1: usize = 2;

/// A five-port electromagnetic relay.
///
/// Ports: `coilIn`, `coilOut`, `pivot`, `out0`, `out1`. The coil input
/// drives the `triggered` flag; the pivot is electrically continuous
/// with `out0` while idle and with `out1` while triggered. The two
/// branches are mutually exclusive: the inactive branch is open no
/// matter what is wired downstream of it.
///
/// The three `conducting` flags are display state, set by the
/// closed-circuit solver from loop membership at `coilOut`, `out0` and
/// `out1` respectively.
#[derive(Debug, Clone)]
pub struct Relay {
    pub name: String,
    pub triggered: bool,
    pub conducting: [bool; 3],
    /// Push destination wired at `out0`.
    pub branch0: Option<Destination>,
    /// Push destination wired at `out1`.
    pub branch1: Option<Destination>,
    pub do_not_propagate: bool,
}

impl Relay {
    pub fn new(name: String) -> Self {
        Self {
            name,
            triggered: false,
            conducting: [false; 3],
            branch0: None,
            branch1: None,
            do_not_propagate: false,
        }
    }

    /// True when any of the coil path or the two branches conducts.
    pub fn is_conducting(&self) -> bool {
        self.conducting.iter().any(|&c| c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relay_starts_idle() {
        let relay = Relay::new("r".to_string());
        assert!(!relay.triggered);
        assert!(!relay.is_conducting());
    }
}
