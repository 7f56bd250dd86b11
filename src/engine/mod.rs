//! The simulation engine.
//!
//! A built diagram lives inside a [`Simulation`], which owns the
//! component registry, the wire index, the consistency rules and the
//! value taps, and is the sole mutation point after construction.
//! User events enter through [`Simulation::toggle`], `press`,
//! `release` and `set_coil`; everything downstream of an event runs
//! synchronously inside that call, and a registered [`RenderSink`] is
//! notified once per changed component after the state has settled.
//!
//! Two propagation styles are supported, selected at build time:
//! - [`SimMode::Push`]: digital diagrams forward value changes from
//!   component to component (see [`propagate`]).
//! - [`SimMode::Solver`]: electrical diagrams re-derive the energized
//!   set from closed loops after every event (see `solve`).

use std::collections::HashSet;

use crate::components::{Component, ComponentKind};
use crate::diagram::{ComponentId, Registry, WireIndex};
use crate::error::{CircuitError, Result};

pub(crate) mod propagate;
mod rules;
mod solve;
pub(crate) mod taps;

pub use rules::ConsistencyRule;

use taps::ValueTap;

/// Default bound on push recursion depth.
pub const DEFAULT_MAX_DEPTH: usize = 1024;
/// Default bound on a single solver trace's path length.
pub const DEFAULT_MAX_PATH_LEN: usize = 4096;

/// How a built diagram derives component state from events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimMode {
    /// Value changes are forwarded along wiring as they happen.
    Push,
    /// The energized set is recomputed from closed loops per event.
    Solver,
}

/// Engine tuning knobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimConfig {
    /// Push recursion deeper than this aborts with
    /// [`CircuitError::PropagationOverflow`].
    pub max_depth: usize,
    /// A solver trace longer than this aborts with
    /// [`CircuitError::SolverOverflow`].
    pub max_path_len: usize,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            max_path_len: DEFAULT_MAX_PATH_LEN,
        }
    }
}

impl SimConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_max_path_len(mut self, max_path_len: usize) -> Self {
        self.max_path_len = max_path_len;
        self
    }
}

/// Receiver for display updates.
///
/// Both methods default to no-ops, so a sink implements only what it
/// renders. `component_changed` fires once per component whose display
/// state changed since the last settle; `value_changed` fires for taps
/// whose assembled value changed.
pub trait RenderSink {
    fn component_changed(&mut self, _name: &str, _energized: bool) {}
    fn value_changed(&mut self, _name: &str, _value: u32) {}
}

/// Components touched since the last flush, deduplicated, in first-touch
/// order.
#[derive(Debug, Default)]
pub(crate) struct DirtySet {
    order: Vec<ComponentId>,
    seen: HashSet<ComponentId>,
}

impl DirtySet {
    pub(crate) fn mark(&mut self, id: ComponentId) {
        if self.seen.insert(id) {
            self.order.push(id);
        }
    }

    pub(crate) fn take(&mut self) -> Vec<ComponentId> {
        self.seen.clear();
        std::mem::take(&mut self.order)
    }
}

/// A built, runnable diagram.
pub struct Simulation {
    registry: Registry,
    index: WireIndex,
    rules: Vec<ConsistencyRule>,
    taps: Vec<ValueTap>,
    mode: SimMode,
    config: SimConfig,
    sink: Option<Box<dyn RenderSink>>,
    dirty: DirtySet,
}

impl std::fmt::Debug for Simulation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Simulation")
            .field("registry", &self.registry)
            .field("index", &self.index)
            .field("rules", &self.rules)
            .field("taps", &self.taps)
            .field("mode", &self.mode)
            .field("config", &self.config)
            .field("sink", &self.sink.as_ref().map(|_| "dyn RenderSink"))
            .field("dirty", &self.dirty)
            .finish()
    }
}

enum ToggleOp {
    Switch(bool),
    Button(bool),
}

impl Simulation {
    pub(crate) fn from_parts(
        registry: Registry,
        index: WireIndex,
        rules: Vec<ConsistencyRule>,
        taps: Vec<ValueTap>,
        mode: SimMode,
        config: SimConfig,
    ) -> Self {
        Self {
            registry,
            index,
            rules,
            taps,
            mode,
            config,
            sink: None,
            dirty: DirtySet::default(),
        }
    }

    pub fn mode(&self) -> SimMode {
        self.mode
    }

    /// Register the sink notified after each settle. Call
    /// [`Simulation::refresh`] afterwards for an initial full paint.
    pub fn set_render_sink(&mut self, sink: Box<dyn RenderSink>) {
        self.sink = Some(sink);
    }

    /// Flip a switch or a latching button and settle the diagram.
    pub fn toggle(&mut self, name: &str) -> Result<()> {
        let id = self.registry.resolve(name)?;
        let op = match self.registry.get_mut(id) {
            Component::Switch(sw) => {
                sw.toggle();
                ToggleOp::Switch(sw.closed)
            }
            Component::Button(b) if b.latching => ToggleOp::Button(!b.output),
            other => {
                return Err(CircuitError::wrong_kind(name, "switch", other.kind()));
            }
        };
        self.dirty.mark(id);
        match op {
            ToggleOp::Switch(closed) => {
                if self.mode == SimMode::Push {
                    propagate::set_output(&mut self.registry, id, closed, &self.config, &mut self.dirty)?;
                }
                rules::apply(&mut self.registry, &self.rules, name, &self.config, &mut self.dirty)?;
            }
            ToggleOp::Button(value) => {
                propagate::set_output(&mut self.registry, id, value, &self.config, &mut self.dirty)?;
            }
        }
        if self.mode == SimMode::Solver {
            self.solve_internal()?;
        }
        self.flush();
        Ok(())
    }

    /// Press a momentary button.
    pub fn press(&mut self, name: &str) -> Result<()> {
        self.button_event(name, true)
    }

    /// Release a momentary button.
    pub fn release(&mut self, name: &str) -> Result<()> {
        self.button_event(name, false)
    }

    fn button_event(&mut self, name: &str, pressed: bool) -> Result<()> {
        let id = self.registry.resolve(name)?;
        match self.registry.get(id) {
            Component::Button(b) if !b.latching => {}
            other => {
                return Err(CircuitError::wrong_kind(name, "momentary button", other.kind()));
            }
        }
        propagate::set_output(&mut self.registry, id, pressed, &self.config, &mut self.dirty)?;
        if self.mode == SimMode::Solver {
            self.solve_internal()?;
        }
        self.flush();
        Ok(())
    }

    /// Drive a relay's coil directly, without coil wiring.
    pub fn set_coil(&mut self, name: &str, energized: bool) -> Result<()> {
        let id = self.registry.resolve(name)?;
        if !matches!(self.registry.get(id), Component::Relay(_)) {
            return Err(CircuitError::wrong_kind(
                name,
                "relay",
                self.registry.get(id).kind(),
            ));
        }
        match self.mode {
            SimMode::Push => {
                propagate::deliver(&mut self.registry, id, 0, energized, 1, &self.config, &mut self.dirty)?;
            }
            SimMode::Solver => {
                if let Component::Relay(r) = self.registry.get_mut(id) {
                    if r.triggered != energized {
                        r.triggered = energized;
                        self.dirty.mark(id);
                    }
                }
                self.solve_internal()?;
            }
        }
        self.flush();
        Ok(())
    }

    /// Re-derive the energized set from closed loops.
    pub fn solve(&mut self) -> Result<()> {
        self.solve_internal()?;
        self.flush();
        Ok(())
    }

    fn solve_internal(&mut self) -> Result<()> {
        solve::solve(&mut self.registry, &self.index, &self.config, &mut self.dirty)
    }

    /// Current display state of any component.
    pub fn is_energized(&self, name: &str) -> Result<bool> {
        let id = self.registry.resolve(name)?;
        Ok(self.registry.get(id).output())
    }

    /// Lever position of a switch, or latched state of a button.
    pub fn is_closed(&self, name: &str) -> Result<bool> {
        let id = self.registry.resolve(name)?;
        match self.registry.get(id) {
            Component::Switch(sw) => Ok(sw.closed),
            Component::Button(b) => Ok(b.output),
            other => Err(CircuitError::wrong_kind(name, "switch", other.kind())),
        }
    }

    pub fn is_triggered(&self, name: &str) -> Result<bool> {
        Ok(self.relay(name)?.triggered)
    }

    /// The relay's three conducting flags: coil, idle branch, triggered
    /// branch.
    pub fn relay_conducting(&self, name: &str) -> Result<[bool; 3]> {
        Ok(self.relay(name)?.conducting)
    }

    fn relay(&self, name: &str) -> Result<&crate::components::Relay> {
        let id = self.registry.resolve(name)?;
        match self.registry.get(id) {
            Component::Relay(r) => Ok(r),
            other => Err(CircuitError::wrong_kind(name, "relay", other.kind())),
        }
    }

    /// Assembled value of a named tap.
    pub fn display_value(&self, name: &str) -> Result<u32> {
        self.taps
            .iter()
            .find(|t| t.name == name)
            .map(|t| t.value)
            .ok_or_else(|| CircuitError::unknown(name))
    }

    /// Every component's name, kind and display state, in registration
    /// order.
    pub fn states(&self) -> impl Iterator<Item = (&str, ComponentKind, bool)> {
        self.registry
            .iter()
            .map(|(_, c)| (c.name(), c.kind(), c.output()))
    }

    /// Mark everything dirty and notify the sink, for an initial paint
    /// or after attaching a new sink.
    pub fn refresh(&mut self) {
        for (id, _) in self.registry.iter() {
            self.dirty.mark(id);
        }
        self.flush();
    }

    /// Recompute affected taps, drain the dirty set and notify the
    /// sink. Idempotent when nothing changed.
    pub(crate) fn flush(&mut self) {
        let changed = self.dirty.take();
        if changed.is_empty() {
            return;
        }
        let mut tap_updates = Vec::new();
        for tap in &mut self.taps {
            if changed.iter().any(|id| tap.watches(*id)) && tap.recompute(&self.registry) {
                tap_updates.push((tap.name.clone(), tap.value));
            }
        }
        if let Some(sink) = self.sink.as_mut() {
            for id in &changed {
                let component = self.registry.get(*id);
                sink.component_changed(component.name(), component.output());
            }
            for (name, value) in &tap_updates {
                sink.value_changed(name, *value);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::diagram::DiagramBuilder;

    #[test]
    fn test_mode_selection() {
        let mut push = DiagramBuilder::new();
        push.latching_button("btn", false)
            .light("light")
            .wire("w", ("btn", ""), ("light", ""));
        assert_eq!(push.build(SimConfig::default()).unwrap().mode(), SimMode::Push);

        let mut solver = DiagramBuilder::new();
        solver
            .battery("battery")
            .light("light")
            .wire("w1", ("battery", "pos"), ("light", "left"))
            .wire("w2", ("light", "right"), ("battery", "neg"));
        assert_eq!(
            solver.build(SimConfig::default()).unwrap().mode(),
            SimMode::Solver
        );
    }

    #[test]
    fn test_duplicate_name_fails_build() {
        let mut b = DiagramBuilder::new();
        b.latching_button("x", false).light("x");
        let err = b.build(SimConfig::default()).unwrap_err();
        assert!(matches!(err, CircuitError::DuplicateComponent { .. }));
    }

    #[test]
    fn test_toggle_wrong_kind() {
        let mut b = DiagramBuilder::new();
        b.latching_button("btn", false).light("light");
        let mut sim = b.build(SimConfig::default()).unwrap();
        let err = sim.toggle("light").unwrap_err();
        assert!(matches!(err, CircuitError::WrongKind { .. }));
        let err = sim.toggle("missing").unwrap_err();
        assert!(matches!(err, CircuitError::UnknownComponent { .. }));
    }

    #[test]
    fn test_consistency_rule_couples_switches() {
        // Two independent loops whose switches are drawn as one lever.
        let mut b = DiagramBuilder::new();
        b.battery("battery")
            .switch("swA", false)
            .switch("swB", false)
            .light("lightA")
            .light("lightB")
            .wire("wA1", ("battery", "neg"), ("swA", "left"))
            .wire("wA2", ("swA", "out"), ("lightA", "left"))
            .wire("wA3", ("lightA", "right"), ("battery", "pos"))
            .wire("wB1", ("battery", "neg"), ("swB", "left"))
            .wire("wB2", ("swB", "out"), ("lightB", "left"))
            .wire("wB3", ("lightB", "right"), ("battery", "pos"))
            .rule(ConsistencyRule::new("swA").accordance("swB"));
        let mut sim = b.build(SimConfig::default()).unwrap();

        sim.toggle("swA").unwrap();
        assert!(sim.is_closed("swB").unwrap());
        assert!(sim.is_energized("lightA").unwrap());
        assert!(sim.is_energized("lightB").unwrap());

        sim.toggle("swA").unwrap();
        assert!(!sim.is_closed("swB").unwrap());
        assert!(!sim.is_energized("lightB").unwrap());
    }

    #[test]
    fn test_tap_assembles_display_value() {
        let mut b = DiagramBuilder::new();
        b.latching_button("b0", false)
            .latching_button("b1", false)
            .bit_display("bit0")
            .bit_display("bit1")
            .wire("w0", ("b0", ""), ("bit0", ""))
            .wire("w1", ("b1", ""), ("bit1", ""))
            .tap("value", &[("bit0", 0), ("bit1", 1)]);
        let mut sim = b.build(SimConfig::default()).unwrap();

        assert_eq!(sim.display_value("value").unwrap(), 0);
        sim.toggle("b1").unwrap();
        assert_eq!(sim.display_value("value").unwrap(), 2);
        sim.toggle("b0").unwrap();
        assert_eq!(sim.display_value("value").unwrap(), 3);
        sim.toggle("b1").unwrap();
        assert_eq!(sim.display_value("value").unwrap(), 1);
    }

    #[derive(Default)]
    struct Recorder {
        components: Rc<RefCell<Vec<(String, bool)>>>,
        values: Rc<RefCell<Vec<(String, u32)>>>,
    }

    impl RenderSink for Recorder {
        fn component_changed(&mut self, name: &str, energized: bool) {
            self.components.borrow_mut().push((name.to_string(), energized));
        }

        fn value_changed(&mut self, name: &str, value: u32) {
            self.values.borrow_mut().push((name.to_string(), value));
        }
    }

    #[test]
    fn test_sink_notified_after_settle() {
        let mut b = DiagramBuilder::new();
        b.button("btn")
            .bit_display("bit")
            .wire("w", ("btn", ""), ("bit", ""))
            .tap("value", &[("bit", 0)]);
        let mut sim = b.build(SimConfig::default()).unwrap();

        let recorder = Recorder::default();
        let components = Rc::clone(&recorder.components);
        let values = Rc::clone(&recorder.values);
        sim.set_render_sink(Box::new(recorder));

        sim.press("btn").unwrap();
        let seen = components.borrow();
        assert!(seen.contains(&("btn".to_string(), true)));
        assert!(seen.contains(&("bit".to_string(), true)));
        assert_eq!(values.borrow().as_slice(), &[("value".to_string(), 1)]);
        drop(seen);

        // Releasing settles back and reports the new states once
        sim.release("btn").unwrap();
        assert!(components.borrow().contains(&("bit".to_string(), false)));
        assert_eq!(values.borrow().last(), Some(&("value".to_string(), 0)));
    }

    #[test]
    fn test_press_requires_momentary_button() {
        let mut b = DiagramBuilder::new();
        b.latching_button("latch", false).button("btn");
        let mut sim = b.build(SimConfig::default()).unwrap();
        assert!(sim.press("btn").is_ok());
        let err = sim.press("latch").unwrap_err();
        assert!(matches!(err, CircuitError::WrongKind { .. }));
    }
}
