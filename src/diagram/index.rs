//! The wire/edge index.
//!
//! A derived adjacency structure over declared wires, each recording
//! the flattened name and the two semantic endpoints of the wire.
//! Intermediate bend points never reach the index. Used exclusively by
//! the closed-circuit solver; the push engine has its own destination
//! links.

use std::collections::HashMap;

use super::types::{ComponentId, Port, PortRef, WireId};

/// One declared wire: its name, its own registry entry (a wire is also
/// a component in the push model), and its two endpoints.
#[derive(Debug, Clone)]
pub struct WireEntry {
    pub name: String,
    pub component: ComponentId,
    pub a: PortRef,
    pub b: PortRef,
}

/// An edge incident to a component, as seen from that component.
#[derive(Debug, Clone, Copy)]
pub struct Edge {
    pub wire: WireId,
    /// Port on the component the edge is viewed from.
    pub near: Port,
    /// The wire's other endpoint.
    pub far: PortRef,
    /// True when the viewed component is the wire's declared first
    /// endpoint. The solver follows declaration orientation; see
    /// [`crate::engine`] for why.
    pub forward: bool,
}

/// Adjacency index over all wires of a diagram.
#[derive(Debug, Default)]
pub struct WireIndex {
    wires: Vec<WireEntry>,
    adjacency: HashMap<ComponentId, Vec<Edge>>,
}

impl WireIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a wire. Both directions are indexed so a wire is
    /// traversable from either endpoint toward the other.
    pub fn push(&mut self, entry: WireEntry) -> WireId {
        let id = WireId(self.wires.len());
        self.adjacency
            .entry(entry.a.component)
            .or_default()
            .push(Edge {
                wire: id,
                near: entry.a.port,
                far: entry.b,
                forward: true,
            });
        self.adjacency
            .entry(entry.b.component)
            .or_default()
            .push(Edge {
                wire: id,
                near: entry.b.port,
                far: entry.a,
                forward: false,
            });
        self.wires.push(entry);
        id
    }

    /// All edges incident to a component, in wire declaration order.
    pub fn edges_from(&self, component: ComponentId) -> &[Edge] {
        self.adjacency
            .get(&component)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Iterate wires in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (WireId, &WireEntry)> {
        self.wires
            .iter()
            .enumerate()
            .map(|(i, w)| (WireId(i), w))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, comp: usize, a: usize, b: usize) -> WireEntry {
        WireEntry {
            name: name.to_string(),
            component: ComponentId(comp),
            a: PortRef::new(ComponentId(a), Port::Plain),
            b: PortRef::new(ComponentId(b), Port::Plain),
        }
    }

    #[test]
    fn test_directionless_lookup() {
        let mut index = WireIndex::new();
        let w = index.push(entry("w1", 10, 0, 1));

        let from_a = index.edges_from(ComponentId(0));
        assert_eq!(from_a.len(), 1);
        assert_eq!(from_a[0].wire, w);
        assert_eq!(from_a[0].far.component, ComponentId(1));
        assert!(from_a[0].forward);

        let from_b = index.edges_from(ComponentId(1));
        assert_eq!(from_b.len(), 1);
        assert_eq!(from_b[0].far.component, ComponentId(0));
        assert!(!from_b[0].forward);
    }

    #[test]
    fn test_declaration_order_preserved() {
        let mut index = WireIndex::new();
        let w1 = index.push(entry("w1", 10, 0, 1));
        let w2 = index.push(entry("w2", 11, 0, 2));
        let edges = index.edges_from(ComponentId(0));
        assert_eq!(edges[0].wire, w1);
        assert_eq!(edges[1].wire, w2);

        let names: Vec<&str> = index.iter().map(|(_, w)| w.name.as_str()).collect();
        assert_eq!(names, ["w1", "w2"]);
    }
}
