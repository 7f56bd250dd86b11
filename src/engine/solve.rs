//! The closed-circuit solver.
//!
//! For battery/switch-style diagrams the push protocol is not enough:
//! whether a wire is energized depends on whether it lies on a complete
//! electrical path. This module runs a depth-first search from every
//! source component over the wire index, collects every closed loop
//! (source to ground, or source to a second source), and colors every
//! component and wire touched by at least one loop.
//!
//! Traversal follows each wire's declaration orientation (the edge's
//! first endpoint must match the current component), the way diagram
//! authors orient wires around a loop. Relay gating is consulted at
//! traversal time, never precomputed, because the relay's state can
//! change between solves.
//!
//! The search keeps no visited set; what bounds it on well-formed
//! diagrams is that every loop ends at a terminal and every dead end
//! runs out of forward edges. A wire loop not broken by an open switch
//! would recurse without bound, so the accumulated path length is
//! capped by [`SimConfig::max_path_len`] and overrunning it aborts the
//! solve with [`CircuitError::SolverOverflow`].

use std::collections::HashSet;

use log::{debug, warn};

use super::{DirtySet, SimConfig};
use crate::components::{
    Component, ComponentKind, CONDUCT_BRANCH0, CONDUCT_BRANCH1, CONDUCT_COIL,
};
use crate::diagram::{ComponentId, Port, Registry, WireId, WireIndex};
use crate::error::{CircuitError, Result};

/// Passes allowed for relays to settle. A relay whose wired coil loop
/// closes flips `triggered`, which can open or close further loops, so
/// the solve repeats until no relay changes. A relay wired through its
/// own contacts (a buzzer) never settles; after this many passes the
/// last state is kept.
const RELAY_SETTLE_PASSES: usize = 16;

/// One step of a traced loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopNode {
    /// A component, with the port it was touched at. Plain for every
    /// kind except relays, which record entry and exit ports.
    Component { id: ComponentId, port: Port },
    /// A wire crossed between two components.
    Wire(WireId),
}

/// An ordered trace of one complete path from a source to a terminal.
#[derive(Debug, Clone, Default)]
pub struct ClosedLoop {
    pub nodes: Vec<LoopNode>,
}

impl ClosedLoop {
    fn contains_component(&self, id: ComponentId, port: Port) -> bool {
        self.nodes
            .iter()
            .any(|n| matches!(n, LoopNode::Component { id: i, port: p } if *i == id && *p == port))
    }

    fn contains_wire(&self, wire: WireId) -> bool {
        self.nodes.iter().any(|n| *n == LoopNode::Wire(wire))
    }
}

/// Run a full solve: trace every source, color the registry from the
/// union of the recorded loops, and repeat while coil verdicts keep
/// flipping relays. Components and wires whose display state changed
/// are added to `dirty`.
pub(crate) fn solve(
    reg: &mut Registry,
    index: &WireIndex,
    config: &SimConfig,
    dirty: &mut DirtySet,
) -> Result<()> {
    // Relays whose coil is wired into the graph take `triggered` from
    // the coil loop verdict; relays driven directly through the coil
    // entry point keep their externally set flag.
    let mut coil_wired = HashSet::new();
    for (_, entry) in index.iter() {
        for endpoint in [entry.a, entry.b] {
            if matches!(endpoint.port, Port::CoilIn | Port::CoilOut) {
                coil_wired.insert(endpoint.component);
            }
        }
    }

    for pass in 0.. {
        let mut loops = Vec::new();
        for (id, component) in reg.iter() {
            if component.kind() == ComponentKind::Source {
                trace(reg, index, id, Port::Plain, Vec::new(), &mut loops, config)?;
            }
        }
        debug!("solve pass {pass}: {} loop(s)", loops.len());

        if !color(reg, index, &loops, &coil_wired, dirty) {
            break;
        }
        if pass + 1 >= RELAY_SETTLE_PASSES {
            warn!("relays did not settle after {RELAY_SETTLE_PASSES} passes; keeping last state");
            break;
        }
    }
    Ok(())
}

/// Extend one trace at `(component, port)`. `path` is owned by this
/// branch of the search; sibling edges get their own clone.
fn trace(
    reg: &Registry,
    index: &WireIndex,
    id: ComponentId,
    port: Port,
    mut path: Vec<LoopNode>,
    loops: &mut Vec<ClosedLoop>,
    config: &SimConfig,
) -> Result<()> {
    if path.len() >= config.max_path_len {
        return Err(CircuitError::SolverOverflow {
            limit: config.max_path_len,
        });
    }

    let component = reg.get(id);
    match component {
        // An open switch is a dead end; nothing on this branch is
        // recorded.
        Component::Switch(sw) if !sw.closed => return Ok(()),
        // A ground, or a source reached over a non-empty path, closes
        // the loop.
        Component::Ground(_) => {
            path.push(LoopNode::Component { id, port: Port::Plain });
            loops.push(ClosedLoop { nodes: path });
            return Ok(());
        }
        Component::Source(_) if !path.is_empty() => {
            path.push(LoopNode::Component { id, port: Port::Plain });
            loops.push(ClosedLoop { nodes: path });
            return Ok(());
        }
        _ => {}
    }

    let relay = match component {
        Component::Relay(r) => Some(r),
        _ => None,
    };
    path.push(LoopNode::Component {
        id,
        port: if relay.is_some() { port } else { Port::Plain },
    });

    for edge in index.edges_from(id).iter().filter(|e| e.forward) {
        let mut branch = path.clone();
        if let Some(r) = relay {
            if !relay_passes(port, edge.near, r.triggered) {
                continue;
            }
            // Record the exit port too; coloring looks the relay up at
            // coilOut/out0/out1.
            branch.push(LoopNode::Component {
                id,
                port: edge.near,
            });
        }
        branch.push(LoopNode::Wire(edge.wire));
        trace(
            reg,
            index,
            edge.far.component,
            edge.far.port,
            branch,
            loops,
            config,
        )?;
    }
    Ok(())
}

/// The relay gating rule: which entry/exit port pairings are
/// electrically continuous given the triggered flag. The coil side
/// always passes; the pivot passes only to the branch the flag
/// selects, and symmetrically when entering from a branch port.
fn relay_passes(entry: Port, exit: Port, triggered: bool) -> bool {
    match (entry, exit) {
        (Port::Pivot, Port::Out0) | (Port::Out0, Port::Pivot) => !triggered,
        (Port::Pivot, Port::Out1) | (Port::Out1, Port::Pivot) => triggered,
        (Port::CoilIn, Port::CoilOut) | (Port::CoilOut, Port::CoilIn) => true,
        _ => false,
    }
}

/// Color every wire and component from loop membership. The union is
/// idempotent: discovery order never changes the energized set.
/// Returns true when a wired coil verdict flipped a relay, in which
/// case the caller must re-solve.
fn color(
    reg: &mut Registry,
    index: &WireIndex,
    loops: &[ClosedLoop],
    coil_wired: &HashSet<ComponentId>,
    dirty: &mut DirtySet,
) -> bool {
    for (wire_id, entry) in index.iter() {
        let energized = loops.iter().any(|l| l.contains_wire(wire_id));
        let component = reg.get_mut(entry.component);
        if component.output() != energized {
            component.set_display_state(energized);
            dirty.mark(entry.component);
        }
    }

    let mut relay_flipped = false;
    for i in 0..reg.len() {
        let id = ComponentId(i);
        // Wire components were colored from the index above.
        if reg.get(id).kind() == ComponentKind::Wire {
            continue;
        }

        if let Component::Relay(r) = reg.get_mut(id) {
            let mut next = [false; 3];
            next[CONDUCT_COIL] = loops.iter().any(|l| l.contains_component(id, Port::CoilOut));
            next[CONDUCT_BRANCH0] = loops.iter().any(|l| l.contains_component(id, Port::Out0));
            next[CONDUCT_BRANCH1] = loops.iter().any(|l| l.contains_component(id, Port::Out1));
            if r.conducting != next {
                r.conducting = next;
                dirty.mark(id);
            }
            if coil_wired.contains(&id) && r.triggered != next[CONDUCT_COIL] {
                r.triggered = next[CONDUCT_COIL];
                dirty.mark(id);
                relay_flipped = true;
            }
        } else {
            let energized = loops
                .iter()
                .any(|l| l.contains_component(id, Port::Plain));
            let component = reg.get_mut(id);
            if component.output() != energized {
                component.set_display_state(energized);
                dirty.mark(id);
            }
        }
    }
    relay_flipped
}
