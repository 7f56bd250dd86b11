//! Core types for diagram representation.

use std::fmt;

/// A unique identifier for a component in the diagram registry.
/// Components live in an arena indexed by this id; graph edges store
/// id pairs rather than references, so cyclic wiring needs no special
/// ownership handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentId(pub usize);

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "C{}", self.0)
    }
}

/// A unique identifier for a wire in the wire index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WireId(pub usize);

impl fmt::Display for WireId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "W{}", self.0)
    }
}

/// A semantic attachment point on a component.
///
/// Ports are graph identity, not pixel locations. Only relay ports gate
/// traversal in the closed-circuit solver, so every other label
/// (battery `pos`/`neg`, switch `left`/`out`, gate inputs, or no label
/// at all) collapses to [`Port::Plain`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Port {
    /// A terminal with no gating semantics.
    Plain,
    /// Relay coil input.
    CoilIn,
    /// Relay coil output.
    CoilOut,
    /// Relay pivot (common) contact.
    Pivot,
    /// Relay branch contact, connected while idle.
    Out0,
    /// Relay branch contact, connected while triggered.
    Out1,
}

impl fmt::Display for Port {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Port::Plain => "-",
            Port::CoilIn => "coilIn",
            Port::CoilOut => "coilOut",
            Port::Pivot => "pivot",
            Port::Out0 => "out0",
            Port::Out1 => "out1",
        };
        write!(f, "{label}")
    }
}

/// A resolved `(component, port)` endpoint reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortRef {
    pub component: ComponentId,
    pub port: Port,
}

impl PortRef {
    pub fn new(component: ComponentId, port: Port) -> Self {
        Self { component, port }
    }
}

/// Join a scope prefix onto a component name, `parent.child` style.
/// Nested sub-diagrams flatten into a single namespace this way.
pub fn flatten_name(prefix: &[String], name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        let mut full = prefix.join(".");
        full.push('.');
        full.push_str(name);
        full
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flatten_name_no_prefix() {
        assert_eq!(flatten_name(&[], "switch1"), "switch1");
    }

    #[test]
    fn test_flatten_name_nested() {
        let scopes = vec!["adder".to_string(), "bit3".to_string()];
        assert_eq!(flatten_name(&scopes, "carry"), "adder.bit3.carry");
    }
}
