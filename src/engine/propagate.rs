//! The push propagation engine.
//!
//! Implements the notify protocol for digital diagrams: a value change
//! at one component's output is forwarded to its registered
//! destinations, each of which may recompute and re-forward within the
//! same synchronous call stack. There is no event queue and no delta
//! cycle; this is depth-first immediate-mode push.
//!
//! Two forwarding shapes exist, mirroring the component structs: a
//! single `(target, slot)` destination (wires, lights, gates) and an
//! ordered destination list (switches, buttons, joints, sources).
//! Attaching a destination to a component that already holds state
//! immediately re-propagates the current value to the new destination,
//! so late wiring never leaves a stale display.
//!
//! A component only forwards when its new output differs from its
//! previous output; identical re-assignment is a no-op. That fixed
//! point rule is not a cycle breaker, so recursion is additionally
//! bounded by [`SimConfig::max_depth`] and feedback topologies that
//! never settle surface as [`CircuitError::PropagationOverflow`]
//! instead of blowing the stack.

use log::trace;

use super::{DirtySet, SimConfig};
use crate::components::{Component, Destination};
use crate::diagram::ports::ResolvedPort;
use crate::diagram::{ComponentId, Port, Registry};
use crate::error::{CircuitError, Result};

/// Set a user-driven component's output and forward on change.
///
/// Entry point for switches and buttons (and, during construction,
/// sources). Components with `do_not_propagate` store the value and
/// suppress forwarding.
pub(crate) fn set_output(
    reg: &mut Registry,
    id: ComponentId,
    value: bool,
    config: &SimConfig,
    dirty: &mut DirtySet,
) -> Result<()> {
    let forwards = match reg.get_mut(id) {
        Component::Switch(c) => {
            if value == c.output {
                return Ok(());
            }
            c.output = value;
            if c.do_not_propagate {
                None
            } else {
                Some(c.destinations.clone())
            }
        }
        Component::Button(c) => {
            if value == c.output {
                return Ok(());
            }
            c.output = value;
            if c.do_not_propagate {
                None
            } else {
                Some(c.destinations.clone())
            }
        }
        Component::Source(c) => {
            if value == c.output {
                return Ok(());
            }
            c.output = value;
            if c.do_not_propagate {
                None
            } else {
                Some(c.destinations.clone())
            }
        }
        other => {
            trace!("set_output ignored for {} '{}'", other.kind(), other.name());
            return Ok(());
        }
    };
    dirty.mark(id);
    if let Some(dests) = forwards {
        for dest in dests {
            deliver(reg, dest.target, dest.slot, value, 1, config, dirty)?;
        }
    }
    Ok(())
}

/// Deliver a value to a component's input slot, recursively forwarding
/// while outputs keep changing.
pub(crate) fn deliver(
    reg: &mut Registry,
    id: ComponentId,
    slot: usize,
    value: bool,
    depth: usize,
    config: &SimConfig,
    dirty: &mut DirtySet,
) -> Result<()> {
    if depth > config.max_depth {
        return Err(CircuitError::PropagationOverflow {
            name: reg.get(id).name().to_string(),
            limit: config.max_depth,
        });
    }

    // Compute the local state change and collect what to forward while
    // the mutable borrow is live, then recurse.
    enum Forward {
        None,
        Single(Destination, bool),
        Multi(Vec<Destination>, bool),
        Branches(Option<Destination>, Option<Destination>, bool),
    }

    let forward = match reg.get_mut(id) {
        Component::Ground(c) => {
            if value == c.output {
                return Ok(());
            }
            c.output = value;
            Forward::None
        }
        Component::Light(c) => {
            if value == c.output {
                return Ok(());
            }
            c.output = value;
            match (c.do_not_propagate, c.destination) {
                (false, Some(d)) => Forward::Single(d, value),
                _ => Forward::None,
            }
        }
        Component::BitDisplay(c) => {
            if value == c.output {
                return Ok(());
            }
            c.output = value;
            match (c.do_not_propagate, c.destination) {
                (false, Some(d)) => Forward::Single(d, value),
                _ => Forward::None,
            }
        }
        Component::Wire(c) => {
            if value == c.output {
                return Ok(());
            }
            c.output = value;
            match (c.do_not_propagate, c.destination) {
                (false, Some(d)) => Forward::Single(d, value),
                _ => Forward::None,
            }
        }
        Component::Joint(c) => {
            if value == c.output {
                return Ok(());
            }
            c.output = value;
            if c.do_not_propagate {
                Forward::None
            } else {
                Forward::Multi(c.destinations.clone(), value)
            }
        }
        Component::Gate(c) => {
            c.inputs[slot.min(1)] = value;
            let new_output = c.eval();
            if new_output == c.output {
                return Ok(());
            }
            c.output = new_output;
            match (c.do_not_propagate, c.destination) {
                (false, Some(d)) => Forward::Single(d, new_output),
                _ => Forward::None,
            }
        }
        Component::Relay(c) => {
            // The coil is the relay's only push input. A coil edge
            // re-propagates both branches' enabled status, not a
            // logical value.
            if value == c.triggered {
                return Ok(());
            }
            c.triggered = value;
            if c.do_not_propagate {
                Forward::None
            } else {
                Forward::Branches(c.branch0, c.branch1, value)
            }
        }
        other => {
            // Switches, buttons and sources have no input ports in the
            // push model.
            trace!(
                "deliver ignored for {} '{}' slot {}",
                other.kind(),
                other.name(),
                slot
            );
            return Ok(());
        }
    };

    dirty.mark(id);

    match forward {
        Forward::None => {}
        Forward::Single(d, v) => deliver(reg, d.target, d.slot, v, depth + 1, config, dirty)?,
        Forward::Multi(dests, v) => {
            for d in dests {
                deliver(reg, d.target, d.slot, v, depth + 1, config, dirty)?;
            }
        }
        Forward::Branches(b0, b1, triggered) => {
            if let Some(d) = b0 {
                deliver(reg, d.target, d.slot, !triggered, depth + 1, config, dirty)?;
            }
            if let Some(d) = b1 {
                deliver(reg, d.target, d.slot, triggered, depth + 1, config, dirty)?;
            }
        }
    }
    Ok(())
}

/// Register a push destination on `src` and immediately propagate the
/// current state to the newly attached destination only.
///
/// For single-destination components a later attachment replaces the
/// earlier one. Relay branch ports attach to the matching branch; coil
/// and pivot ports carry no push link, and neither does ground. A
/// source marked `do_not_propagate` registers the link but delivers
/// nothing.
pub(crate) fn attach_destination(
    reg: &mut Registry,
    src: ComponentId,
    src_port: ResolvedPort,
    dest: Destination,
    config: &SimConfig,
    dirty: &mut DirtySet,
) -> Result<()> {
    let suppressed = reg.get(src).do_not_propagate();
    let initial = match reg.get_mut(src) {
        Component::Switch(c) => {
            c.destinations.push(dest);
            Some(c.output)
        }
        Component::Button(c) => {
            c.destinations.push(dest);
            Some(c.output)
        }
        Component::Source(c) => {
            c.destinations.push(dest);
            Some(c.output)
        }
        Component::Joint(c) => {
            c.destinations.push(dest);
            Some(c.output)
        }
        Component::Light(c) => {
            c.destination = Some(dest);
            Some(c.output)
        }
        Component::BitDisplay(c) => {
            c.destination = Some(dest);
            Some(c.output)
        }
        Component::Wire(c) => {
            c.destination = Some(dest);
            Some(c.output)
        }
        Component::Gate(c) => {
            c.destination = Some(dest);
            Some(c.output)
        }
        Component::Relay(c) => match src_port.port {
            Port::Out0 => {
                c.branch0 = Some(dest);
                Some(!c.triggered)
            }
            Port::Out1 => {
                c.branch1 = Some(dest);
                Some(c.triggered)
            }
            _ => {
                trace!("relay '{}' port {} carries no push link", c.name, src_port.port);
                None
            }
        },
        Component::Ground(c) => {
            trace!("ground '{}' forwards nothing", c.name);
            None
        }
    };

    if let (false, Some(value)) = (suppressed, initial) {
        deliver(reg, dest.target, dest.slot, value, 1, config, dirty)?;
    }
    Ok(())
}
