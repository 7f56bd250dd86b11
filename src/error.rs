//! Error types for the Circuitry simulation core.
//!
//! This module provides a unified error type [`CircuitError`] that covers
//! all error conditions that can occur during diagram construction and
//! simulation.
//!
//! Errors fall into two classes: construction errors, which are fatal to
//! the diagram build and leave no partial diagram running, and runtime
//! errors raised by the entry points of a built [`crate::Simulation`].
//! Consistency-rule lookups that miss are deliberately *not* errors; they
//! are no-ops so partially specified rules stay tolerant.

use thiserror::Error;

use crate::components::ComponentKind;

/// Result type alias using [`CircuitError`].
pub type Result<T> = std::result::Result<T, CircuitError>;

/// Unified error type for all Circuitry operations.
#[derive(Error, Debug)]
pub enum CircuitError {
    // ============ Construction Errors ============
    /// Two components resolved to the same flattened name
    #[error("Duplicate component name '{name}'")]
    DuplicateComponent { name: String },

    /// A reference to a component that does not exist in the registry
    #[error("Component '{name}' not found")]
    UnknownComponent { name: String },

    /// A port label that the component kind does not declare
    #[error("Component '{component}' ({kind}) has no port '{label}'")]
    UnknownPort {
        component: String,
        kind: ComponentKind,
        label: String,
    },

    /// A wire endpoint with no component reference
    #[error("Wire '{wire}' has a dangling endpoint")]
    DanglingWire { wire: String },

    /// A wire whose two endpoints resolve to the same port of the same
    /// component. Distinct ports of one component (a relay wired
    /// through its own contact) are legal.
    #[error("Wire '{wire}' connects component '{component}' to itself")]
    SelfLoopWire { wire: String, component: String },

    /// A tap bit index beyond the width of the assembled value
    #[error("Tap '{tap}' bit index {bit} exceeds 31")]
    TapBitOutOfRange { tap: String, bit: u32 },

    // ============ Simulation Errors ============
    /// An entry point named a component of the wrong kind
    #[error("Component '{name}' is a {found}, expected a {expected}")]
    WrongKind {
        name: String,
        expected: &'static str,
        found: ComponentKind,
    },

    /// Push propagation exceeded the configured depth limit.
    /// Indicates a feedback topology the immediate-mode engine cannot settle.
    #[error("Propagation from '{name}' exceeded the depth limit of {limit}")]
    PropagationOverflow { name: String, limit: usize },

    /// The closed-circuit search exceeded the configured path-length limit.
    /// Indicates a wire loop not broken by any open switch.
    #[error("Closed-circuit search exceeded the path limit of {limit}")]
    SolverOverflow { limit: usize },
}

impl CircuitError {
    /// Create a duplicate-name error
    pub fn duplicate(name: impl Into<String>) -> Self {
        Self::DuplicateComponent { name: name.into() }
    }

    /// Create an unknown-component error
    pub fn unknown(name: impl Into<String>) -> Self {
        Self::UnknownComponent { name: name.into() }
    }

    /// Create an unknown-port error
    pub fn unknown_port(
        component: impl Into<String>,
        kind: ComponentKind,
        label: impl Into<String>,
    ) -> Self {
        Self::UnknownPort {
            component: component.into(),
            kind,
            label: label.into(),
        }
    }

    /// Create a wrong-kind error
    pub fn wrong_kind(
        name: impl Into<String>,
        expected: &'static str,
        found: ComponentKind,
    ) -> Self {
        Self::WrongKind {
            name: name.into(),
            expected,
            found,
        }
    }
}
