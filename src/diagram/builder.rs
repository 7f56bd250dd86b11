//! Declarative diagram construction.
//!
//! [`DiagramBuilder`] collects components, wires, consistency rules
//! and value taps by name, then [`DiagramBuilder::build`] resolves
//! every reference, registers the wiring in both graph views (the
//! push destinations and the traversal index) and returns a runnable
//! [`Simulation`]. All construction errors surface at build time;
//! nothing partial ever runs.
//!
//! Nested sub-diagrams are expressed with [`DiagramBuilder::scope`],
//! which prefixes every name declared inside it, so a sub-diagram's
//! wiring recipe can be reused without name collisions.

use log::debug;

use super::index::{WireEntry, WireIndex};
use super::ports;
use super::registry::Registry;
use super::types::{flatten_name, Port, PortRef};
use crate::components::{
    BitDisplay, Button, Component, ComponentKind, Destination, Gate, GateKind, Ground, Joint,
    Light, Relay, Source, Switch, WireSegment,
};
use crate::engine::taps::ValueTap;
use crate::engine::{propagate, ConsistencyRule, DirtySet, SimConfig, SimMode, Simulation};
use crate::error::{CircuitError, Result};

struct WireDef {
    name: String,
    a: (String, String),
    b: (String, String),
}

struct TapDef {
    name: String,
    bits: Vec<(String, u32)>,
}

/// Collects a diagram declaratively; see the module docs.
#[derive(Default)]
pub struct DiagramBuilder {
    components: Vec<Component>,
    wires: Vec<WireDef>,
    rules: Vec<ConsistencyRule>,
    taps: Vec<TapDef>,
    scope: Vec<String>,
    mode: Option<SimMode>,
}

impl DiagramBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    fn full(&self, name: &str) -> String {
        flatten_name(&self.scope, name)
    }

    fn add(&mut self, component: Component) -> &mut Self {
        self.components.push(component);
        self
    }

    pub fn battery(&mut self, name: &str) -> &mut Self {
        let name = self.full(name);
        self.add(Component::Source(Source::new(name)))
    }

    pub fn ground(&mut self, name: &str) -> &mut Self {
        let name = self.full(name);
        self.add(Component::Ground(Ground::new(name)))
    }

    pub fn switch(&mut self, name: &str, closed: bool) -> &mut Self {
        let name = self.full(name);
        self.add(Component::Switch(Switch::new(name, closed)))
    }

    /// A momentary push button.
    pub fn button(&mut self, name: &str) -> &mut Self {
        let name = self.full(name);
        self.add(Component::Button(Button::momentary(name)))
    }

    pub fn latching_button(&mut self, name: &str, initial: bool) -> &mut Self {
        let name = self.full(name);
        self.add(Component::Button(Button::latching(name, initial)))
    }

    pub fn relay(&mut self, name: &str) -> &mut Self {
        let name = self.full(name);
        self.add(Component::Relay(Relay::new(name)))
    }

    pub fn gate(&mut self, name: &str, kind: GateKind) -> &mut Self {
        let name = self.full(name);
        self.add(Component::Gate(Gate::new(name, kind)))
    }

    pub fn light(&mut self, name: &str) -> &mut Self {
        let name = self.full(name);
        self.add(Component::Light(Light::new(name)))
    }

    pub fn bit_display(&mut self, name: &str) -> &mut Self {
        let name = self.full(name);
        self.add(Component::BitDisplay(BitDisplay::new(name)))
    }

    pub fn joint(&mut self, name: &str) -> &mut Self {
        let name = self.full(name);
        self.add(Component::Joint(Joint::new(name)))
    }

    /// Declare a wire between two `(component, port)` endpoints. The
    /// wire becomes a component itself, sharing the name namespace.
    pub fn wire(&mut self, name: &str, a: (&str, &str), b: (&str, &str)) -> &mut Self {
        let scoped = |builder: &Self, endpoint: &str| {
            // An empty endpoint is dangling; keep it empty so build
            // reports it rather than scoping it into a real-looking name.
            if endpoint.is_empty() {
                String::new()
            } else {
                builder.full(endpoint)
            }
        };
        let def = WireDef {
            name: self.full(name),
            a: (scoped(self, a.0), a.1.to_string()),
            b: (scoped(self, b.0), b.1.to_string()),
        };
        self.wires.push(def);
        self
    }

    /// Declare a consistency rule. Switch names inside the rule are
    /// scoped like any other reference.
    pub fn rule(&mut self, mut rule: ConsistencyRule) -> &mut Self {
        rule.switch = self.full(&rule.switch);
        for name in &mut rule.accordance {
            let full = self.full(name);
            *name = full;
        }
        for name in &mut rule.contrary {
            let full = self.full(name);
            *name = full;
        }
        self.rules.push(rule);
        self
    }

    /// Declare a named multi-bit value tap over bit-carrying
    /// components, least significant bit first.
    pub fn tap(&mut self, name: &str, bits: &[(&str, u32)]) -> &mut Self {
        let def = TapDef {
            name: self.full(name),
            bits: bits.iter().map(|(c, bit)| (self.full(c), *bit)).collect(),
        };
        self.taps.push(def);
        self
    }

    /// Run `f` with `prefix` pushed onto the name scope.
    pub fn scope(&mut self, prefix: &str, f: impl FnOnce(&mut Self)) -> &mut Self {
        self.scope.push(prefix.to_string());
        f(self);
        self.scope.pop();
        self
    }

    /// Force the propagation mode instead of inferring it from the
    /// component kinds.
    pub fn mode(&mut self, mode: SimMode) -> &mut Self {
        self.mode = Some(mode);
        self
    }

    /// Resolve every reference and produce a settled [`Simulation`].
    ///
    /// Unless forced, the mode is inferred: any battery or ground makes
    /// the diagram electrical (solver mode), otherwise it is digital
    /// (push mode). Solver-mode diagrams get an initial solve here, so
    /// the returned simulation is already colored.
    pub fn build(self, config: SimConfig) -> Result<Simulation> {
        let mode = self.mode.unwrap_or_else(|| {
            let electrical = self
                .components
                .iter()
                .any(|c| matches!(c.kind(), ComponentKind::Source | ComponentKind::Ground));
            if electrical {
                SimMode::Solver
            } else {
                SimMode::Push
            }
        });

        let mut registry = Registry::new();
        let mut index = WireIndex::new();
        let mut dirty = DirtySet::default();

        for mut component in self.components {
            if mode == SimMode::Solver {
                component.suppress_propagation();
            }
            registry.insert(component)?;
        }

        for def in &self.wires {
            if def.a.0.is_empty() || def.b.0.is_empty() {
                return Err(CircuitError::DanglingWire {
                    wire: def.name.clone(),
                });
            }
            let a_id = registry.resolve(&def.a.0)?;
            let b_id = registry.resolve(&def.b.0)?;
            let a_port = ports::resolve(registry.get(a_id).kind(), &def.a.0, &def.a.1)?;
            let b_port = ports::resolve(registry.get(b_id).kind(), &def.b.0, &def.b.1)?;
            // Only a wire from a port back to that same port is
            // degenerate; distinct ports of one component are real
            // wiring (a relay's contact feeding its own coil).
            if a_id == b_id && a_port == b_port {
                return Err(CircuitError::SelfLoopWire {
                    wire: def.name.clone(),
                    component: def.a.0.clone(),
                });
            }

            let mut segment = Component::Wire(WireSegment::new(def.name.clone()));
            if mode == SimMode::Solver {
                segment.suppress_propagation();
            }
            let wire_comp = registry.insert(segment)?;
            index.push(WireEntry {
                name: def.name.clone(),
                component: wire_comp,
                a: PortRef::new(a_id, a_port.port),
                b: PortRef::new(b_id, b_port.port),
            });

            propagate::attach_destination(
                &mut registry,
                a_id,
                a_port,
                Destination::new(wire_comp, 0),
                &config,
                &mut dirty,
            )?;
            // A relay takes push input at its coil alone; wires ending
            // at its contact ports exist only for the solver.
            let pushes_into_b =
                registry.get(b_id).kind() != ComponentKind::Relay || b_port.port == Port::CoilIn;
            if pushes_into_b {
                let from_wire = ports::resolve(ComponentKind::Wire, &def.name, "")?;
                propagate::attach_destination(
                    &mut registry,
                    wire_comp,
                    from_wire,
                    Destination::new(b_id, b_port.slot),
                    &config,
                    &mut dirty,
                )?;
            }
            debug!("wired {}: {} -> {}", def.name, def.a.0, def.b.0);
        }

        let mut taps = Vec::with_capacity(self.taps.len());
        for def in &self.taps {
            let mut bits = Vec::with_capacity(def.bits.len());
            for (component, bit) in &def.bits {
                if *bit >= u32::BITS {
                    return Err(CircuitError::TapBitOutOfRange {
                        tap: def.name.clone(),
                        bit: *bit,
                    });
                }
                bits.push((registry.resolve(component)?, *bit));
            }
            taps.push(ValueTap::new(def.name.clone(), bits));
        }

        let mut sim = Simulation::from_parts(registry, index, self.rules, taps, mode, config);
        if mode == SimMode::Solver {
            sim.solve()?;
        }
        sim.refresh();
        Ok(sim)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_prefixes_names() {
        let mut b = DiagramBuilder::new();
        b.latching_button("carryIn", false);
        b.scope("adder", |b| {
            b.scope("bit0", |b| {
                b.gate("sum", GateKind::Xor)
                    .bit_display("out")
                    .wire("wSum", ("sum", "out"), ("out", ""));
            });
            // Sibling scopes resolve their own names
            b.scope("bit1", |b| {
                b.bit_display("out");
            });
        });
        b.wire("wIn", ("carryIn", ""), ("adder.bit0.sum", "in0"));
        let mut sim = b.build(SimConfig::default()).unwrap();

        assert!(sim.is_energized("adder.bit0.out").is_ok());
        assert!(sim.is_energized("adder.bit1.out").is_ok());
        sim.toggle("carryIn").unwrap();
        assert!(sim.is_energized("adder.bit0.out").unwrap());
    }

    #[test]
    fn test_dangling_wire_rejected() {
        let mut b = DiagramBuilder::new();
        b.light("light").wire("w", ("light", "left"), ("", ""));
        let err = b.build(SimConfig::default()).unwrap_err();
        assert!(matches!(err, CircuitError::DanglingWire { .. }));
    }

    #[test]
    fn test_self_loop_wire_rejected() {
        let mut b = DiagramBuilder::new();
        b.joint("j").wire("w", ("j", ""), ("j", ""));
        let err = b.build(SimConfig::default()).unwrap_err();
        assert!(matches!(err, CircuitError::SelfLoopWire { .. }));
    }

    #[test]
    fn test_relay_self_wire_between_distinct_ports_allowed() {
        // A relay's contact may feed its own coil; only a wire from a
        // port back to the very same port is degenerate.
        let mut b = DiagramBuilder::new();
        b.battery("battery")
            .ground("ground")
            .relay("relay")
            .wire("wPivot", ("battery", "pos"), ("relay", "pivot"))
            .wire("wBack", ("relay", "out0"), ("relay", "coilIn"))
            .wire("wCoil", ("relay", "coilOut"), ("ground", ""));
        assert!(b.build(SimConfig::default()).is_ok());

        let mut b = DiagramBuilder::new();
        b.relay("relay").wire("w", ("relay", "out0"), ("relay", "out0"));
        let err = b.build(SimConfig::default()).unwrap_err();
        assert!(matches!(err, CircuitError::SelfLoopWire { .. }));
    }

    #[test]
    fn test_tap_bit_beyond_value_width_rejected() {
        let mut b = DiagramBuilder::new();
        b.bit_display("bit").tap("value", &[("bit", 32)]);
        let err = b.build(SimConfig::default()).unwrap_err();
        assert!(matches!(err, CircuitError::TapBitOutOfRange { bit: 32, .. }));
    }

    #[test]
    fn test_unknown_endpoint_rejected() {
        let mut b = DiagramBuilder::new();
        b.light("light").wire("w", ("light", ""), ("nowhere", ""));
        let err = b.build(SimConfig::default()).unwrap_err();
        assert!(matches!(err, CircuitError::UnknownComponent { .. }));
    }

    #[test]
    fn test_unknown_relay_port_rejected() {
        let mut b = DiagramBuilder::new();
        b.relay("r").joint("j").wire("w", ("r", "side"), ("j", ""));
        let err = b.build(SimConfig::default()).unwrap_err();
        assert!(matches!(err, CircuitError::UnknownPort { .. }));
    }

    #[test]
    fn test_wire_name_shares_component_namespace() {
        let mut b = DiagramBuilder::new();
        b.joint("a").joint("clash").wire("clash", ("a", ""), ("clash", ""));
        let err = b.build(SimConfig::default()).unwrap_err();
        assert!(matches!(err, CircuitError::DuplicateComponent { .. }));
    }
}
