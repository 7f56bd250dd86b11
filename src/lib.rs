//! # Circuitry Core
//!
//! An interactive circuit-diagram simulation core.
//!
//! This library provides:
//! - A declarative builder for wiring diagrams out of a closed set of
//!   component kinds (batteries, switches, relays, gates, lights, ...)
//! - Push propagation for digital diagrams: value changes forward
//!   synchronously along the wiring
//! - A closed-circuit solver for electrical diagrams: every event
//!   re-derives the energized set from complete source-to-ground loops
//! - Consistency rules coupling switches drawn as one control, and
//!   value taps assembling bits into displayable numbers
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`diagram`] - Component arena, wire index, port resolution and the
//!   [`DiagramBuilder`]
//! - [`components`] - The component kinds and their state
//! - [`engine`] - The [`Simulation`], push propagation, the solver,
//!   consistency rules and value taps
//!
//! ## Usage
//!
//! ```
//! use circuitry_core::{DiagramBuilder, SimConfig};
//!
//! let mut builder = DiagramBuilder::new();
//! builder
//!     .battery("battery")
//!     .switch("switch", false)
//!     .light("light")
//!     .wire("w1", ("battery", "neg"), ("switch", "left"))
//!     .wire("w2", ("switch", "out"), ("light", "left"))
//!     .wire("w3", ("light", "right"), ("battery", "pos"));
//! let mut sim = builder.build(SimConfig::default()).unwrap();
//!
//! assert!(!sim.is_energized("light").unwrap());
//! sim.toggle("switch").unwrap();
//! assert!(sim.is_energized("light").unwrap());
//! ```
//!
//! ## Simulation Method
//!
//! Diagrams run in one of two modes, inferred from their contents:
//! digital diagrams (no battery or ground) push value changes from
//! component to component until a fixed point; electrical diagrams
//! freeze their components and instead re-run a depth-first search for
//! closed loops after every user event, coloring exactly the components
//! on a complete path. Relay contacts gate that search according to the
//! relay's triggered state, which is itself derived from the coil loop,
//! so relay logic (inverters, oscillating bells, latches built from
//! contacts) falls out of the same search.

pub mod components;
pub mod diagram;
pub mod engine;
pub mod error;

// Re-export main types for convenience
pub use components::GateKind;
pub use diagram::DiagramBuilder;
pub use engine::{ConsistencyRule, RenderSink, SimConfig, SimMode, Simulation};
pub use error::{CircuitError, Result};
