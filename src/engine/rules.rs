//! Consistency rules between switches.
//!
//! Some diagrams promise things a lone switch cannot: two switches
//! drawn as one physical lever, or a selector where closing one
//! position opens the others. A rule watches one switch and, when it
//! reaches a given state, forces other switches into agreement
//! (accordance) or opposition (contrary). Rules run after the watched
//! switch changes and before the next solve, so the diagram never
//! settles in a state the rules forbid.

use log::trace;

use super::{DirtySet, SimConfig};
use crate::components::Component;
use crate::diagram::Registry;
use crate::engine::propagate;
use crate::error::Result;

/// One declarative rule on a named switch.
#[derive(Debug, Clone)]
pub struct ConsistencyRule {
    /// The switch whose changes the rule watches.
    pub(crate) switch: String,
    /// Fire only when the watched switch lands in this state; `None`
    /// fires on every change.
    pub(crate) value: Option<bool>,
    /// Switches forced to the watched switch's state.
    pub(crate) accordance: Vec<String>,
    /// Switches forced to the opposite state.
    pub(crate) contrary: Vec<String>,
}

impl ConsistencyRule {
    pub fn new(switch: impl Into<String>) -> Self {
        ConsistencyRule {
            switch: switch.into(),
            value: None,
            accordance: Vec::new(),
            contrary: Vec::new(),
        }
    }

    /// Restrict the rule to fire only when the watched switch reaches
    /// `value`.
    pub fn when(mut self, value: bool) -> Self {
        self.value = Some(value);
        self
    }

    pub fn accordance(mut self, switch: impl Into<String>) -> Self {
        self.accordance.push(switch.into());
        self
    }

    pub fn contrary(mut self, switch: impl Into<String>) -> Self {
        self.contrary.push(switch.into());
        self
    }
}

/// Apply every rule watching `switch_name`. Referenced names that
/// resolve to nothing, or to a component that is not a switch, are
/// skipped; rules are hints about the drawing, not wiring, and must
/// not fail the simulation.
pub(crate) fn apply(
    reg: &mut Registry,
    rules: &[ConsistencyRule],
    switch_name: &str,
    config: &SimConfig,
    dirty: &mut DirtySet,
) -> Result<()> {
    for rule in rules.iter().filter(|r| r.switch == switch_name) {
        let closed = match reg.id(switch_name).map(|id| reg.get(id)) {
            Some(Component::Switch(sw)) => sw.closed,
            _ => continue,
        };
        if rule.value.is_some_and(|v| v != closed) {
            continue;
        }
        trace!("rule on {switch_name} fires (closed = {closed})");
        for name in &rule.accordance {
            force(reg, name, closed, config, dirty)?;
        }
        for name in &rule.contrary {
            force(reg, name, !closed, config, dirty)?;
        }
    }
    Ok(())
}

fn force(
    reg: &mut Registry,
    name: &str,
    closed: bool,
    config: &SimConfig,
    dirty: &mut DirtySet,
) -> Result<()> {
    let id = match reg.id(name) {
        Some(id) => id,
        None => return Ok(()),
    };
    let changed = match reg.get_mut(id) {
        Component::Switch(sw) if sw.closed != closed => {
            sw.closed = closed;
            true
        }
        _ => false,
    };
    if changed {
        dirty.mark(id);
        propagate::set_output(reg, id, closed, config, dirty)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{Component, Switch};
    use crate::engine::SimConfig;

    fn registry_with_switches(names: &[&str]) -> Registry {
        let mut reg = Registry::new();
        for name in names {
            reg.insert(Component::Switch(Switch::new(name.to_string(), false)))
                .unwrap();
        }
        reg
    }

    fn closed(reg: &Registry, name: &str) -> bool {
        match reg.get(reg.id(name).unwrap()) {
            Component::Switch(sw) => sw.closed,
            _ => panic!("not a switch"),
        }
    }

    #[test]
    fn test_accordance_follows_watched_switch() {
        let mut reg = registry_with_switches(&["a", "b"]);
        let rules = vec![ConsistencyRule::new("a").accordance("b")];
        let config = SimConfig::default();
        let mut dirty = DirtySet::default();

        let id = reg.id("a").unwrap();
        if let Component::Switch(sw) = reg.get_mut(id) {
            sw.closed = true;
        }
        apply(&mut reg, &rules, "a", &config, &mut dirty).unwrap();
        assert!(closed(&reg, "b"));
    }

    #[test]
    fn test_contrary_opposes_watched_switch() {
        let mut reg = registry_with_switches(&["a", "b"]);
        let rules = vec![ConsistencyRule::new("a").contrary("b")];
        let config = SimConfig::default();
        let mut dirty = DirtySet::default();

        // a stays open, so contrary forces b closed
        apply(&mut reg, &rules, "a", &config, &mut dirty).unwrap();
        assert!(closed(&reg, "b"));
    }

    #[test]
    fn test_guarded_rule_fires_only_on_matching_state() {
        let mut reg = registry_with_switches(&["a", "b"]);
        let rules = vec![ConsistencyRule::new("a").when(true).accordance("b")];
        let config = SimConfig::default();
        let mut dirty = DirtySet::default();

        apply(&mut reg, &rules, "a", &config, &mut dirty).unwrap();
        assert!(!closed(&reg, "b"));

        let id = reg.id("a").unwrap();
        if let Component::Switch(sw) = reg.get_mut(id) {
            sw.closed = true;
        }
        apply(&mut reg, &rules, "a", &config, &mut dirty).unwrap();
        assert!(closed(&reg, "b"));
    }

    #[test]
    fn test_unknown_names_are_skipped() {
        let mut reg = registry_with_switches(&["a"]);
        let rules = vec![ConsistencyRule::new("a").accordance("missing")];
        let config = SimConfig::default();
        let mut dirty = DirtySet::default();

        apply(&mut reg, &rules, "a", &config, &mut dirty).unwrap();
    }
}
