//! Numeric value taps.
//!
//! A tap assembles the outputs of a set of bit-carrying components
//! into one unsigned value, least significant bit first. Multi-bit
//! readouts (a decimal display over a nibble of lights, say) subscribe
//! to a tap instead of tracking individual components.

use crate::diagram::{ComponentId, Registry};

#[derive(Debug, Clone)]
pub(crate) struct ValueTap {
    pub(crate) name: String,
    /// Watched components and the bit position each one drives.
    pub(crate) bits: Vec<(ComponentId, u32)>,
    pub(crate) value: u32,
}

impl ValueTap {
    pub(crate) fn new(name: impl Into<String>, bits: Vec<(ComponentId, u32)>) -> Self {
        ValueTap {
            name: name.into(),
            bits,
            value: 0,
        }
    }

    /// Reassemble the value from the registry. Returns true when it
    /// changed.
    pub(crate) fn recompute(&mut self, reg: &Registry) -> bool {
        let mut value = 0u32;
        for (id, bit) in &self.bits {
            if reg.get(*id).output() {
                value |= 1 << bit;
            }
        }
        if value == self.value {
            false
        } else {
            self.value = value;
            true
        }
    }

    pub(crate) fn watches(&self, id: ComponentId) -> bool {
        self.bits.iter().any(|(watched, _)| *watched == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{BitDisplay, Component};

    fn bit_registry(count: usize) -> Registry {
        let mut reg = Registry::new();
        for i in 0..count {
            reg.insert(Component::BitDisplay(BitDisplay::new(format!("bit{i}"))))
                .unwrap();
        }
        reg
    }

    #[test]
    fn test_recompute_assembles_bits() {
        let mut reg = bit_registry(4);
        let bits = (0..4).map(|i| (ComponentId(i), i as u32)).collect();
        let mut tap = ValueTap::new("nibble", bits);

        assert!(!tap.recompute(&reg));
        assert_eq!(tap.value, 0);

        reg.get_mut(ComponentId(0)).set_display_state(true);
        reg.get_mut(ComponentId(2)).set_display_state(true);
        assert!(tap.recompute(&reg));
        assert_eq!(tap.value, 0b0101);

        // Unchanged registry means unchanged value
        assert!(!tap.recompute(&reg));
    }

    #[test]
    fn test_watches_only_listed_components() {
        let tap = ValueTap::new("pair", vec![(ComponentId(1), 0)]);
        assert!(tap.watches(ComponentId(1)));
        assert!(!tap.watches(ComponentId(0)));
    }
}
