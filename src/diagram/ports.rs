//! The port resolver.
//!
//! Maps a `(component kind, port label)` pair to a semantic [`Port`]
//! plus the input slot a push destination at that port occupies. Only
//! relay ports carry gating semantics; gate labels select an input
//! slot; every other label, or no label at all, is a plain terminal.

use super::types::Port;
use crate::components::ComponentKind;
use crate::error::{CircuitError, Result};

/// A resolved port: semantic identity plus the push-model input slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedPort {
    pub port: Port,
    pub slot: usize,
}

impl ResolvedPort {
    const fn plain(slot: usize) -> Self {
        Self {
            port: Port::Plain,
            slot,
        }
    }
}

/// Resolve a port label for a component kind.
///
/// Relay and gate labels are validated; anything else accepts any
/// label, since drawing labels like `left`, `pos` or `middle` carry no
/// simulation meaning beyond graph identity.
pub fn resolve(kind: ComponentKind, component: &str, label: &str) -> Result<ResolvedPort> {
    match kind {
        ComponentKind::Relay => {
            let port = match label {
                "coilIn" => Port::CoilIn,
                "coilOut" => Port::CoilOut,
                "pivot" | "pivotSide" => Port::Pivot,
                "out0" => Port::Out0,
                "out1" => Port::Out1,
                _ => return Err(CircuitError::unknown_port(component, kind, label)),
            };
            Ok(ResolvedPort { port, slot: 0 })
        }
        ComponentKind::Gate => match label {
            "" | "out" | "in0" | "a" | "inp" => Ok(ResolvedPort::plain(0)),
            "in1" | "b" => Ok(ResolvedPort::plain(1)),
            _ => Err(CircuitError::unknown_port(component, kind, label)),
        },
        _ => Ok(ResolvedPort::plain(0)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relay_labels() {
        let r = resolve(ComponentKind::Relay, "r", "pivotSide").unwrap();
        assert_eq!(r.port, Port::Pivot);
        assert_eq!(
            resolve(ComponentKind::Relay, "r", "out1").unwrap().port,
            Port::Out1
        );
        assert!(resolve(ComponentKind::Relay, "r", "left").is_err());
    }

    #[test]
    fn test_gate_slots() {
        assert_eq!(resolve(ComponentKind::Gate, "g", "in0").unwrap().slot, 0);
        assert_eq!(resolve(ComponentKind::Gate, "g", "b").unwrap().slot, 1);
        assert!(resolve(ComponentKind::Gate, "g", "in7").is_err());
    }

    #[test]
    fn test_plain_labels_collapse() {
        let r = resolve(ComponentKind::Switch, "sw", "out").unwrap();
        assert_eq!(r.port, Port::Plain);
        let r = resolve(ComponentKind::Source, "bat", "neg").unwrap();
        assert_eq!(r.port, Port::Plain);
        // An absent label is fine outside relays and gates
        assert!(resolve(ComponentKind::Joint, "j", "").is_ok());
    }
}
