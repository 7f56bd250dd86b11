//! Diagram representation.
//!
//! A diagram is a component arena ([`Registry`]) plus a directionless
//! wire index ([`WireIndex`]) over it, both addressed by plain ids.
//! [`DiagramBuilder`] is the only way to construct one; the [`ports`]
//! module resolves endpoint labels to semantic ports during that
//! construction.

mod builder;
mod index;
pub mod ports;
mod registry;
mod types;

pub use builder::DiagramBuilder;
pub use index::{Edge, WireEntry, WireIndex};
pub use registry::Registry;
pub use types::{flatten_name, ComponentId, Port, PortRef, WireId};
