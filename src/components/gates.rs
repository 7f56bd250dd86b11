//! Logic gates.

use super::Destination;

/// The logic function a gate computes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateKind {
    And,
    Or,
    Nand,
    Nor,
    Xor,
    Not,
    Buffer,
}

impl GateKind {
    /// Number of input slots the gate exposes.
    pub fn arity(&self) -> usize {
        match self {
            GateKind::Not | GateKind::Buffer => 1,
            _ => 2,
        }
    }

    /// Evaluate the gate function. Single-input kinds ignore `b`.
    pub fn eval(&self, a: bool, b: bool) -> bool {
        match self {
            GateKind::And => a && b,
            GateKind::Or => a || b,
            GateKind::Nand => !(a && b),
            GateKind::Nor => !(a || b),
            GateKind::Xor => a != b,
            GateKind::Not => !a,
            GateKind::Buffer => a,
        }
    }
}

/// A one- or two-input logic gate with a single output destination.
///
/// Inputs default to logic low; the stored output starts low as well
/// and is corrected by the first propagation to reach the gate, which
/// mirrors how diagrams settle while wires are attached during build.
#[derive(Debug, Clone)]
pub struct Gate {
    pub name: String,
    pub kind: GateKind,
    pub inputs: [bool; 2],
    pub output: bool,
    pub destination: Option<Destination>,
    pub do_not_propagate: bool,
}

impl Gate {
    pub fn new(name: String, kind: GateKind) -> Self {
        Self {
            name,
            kind,
            inputs: [false; 2],
            output: false,
            destination: None,
            do_not_propagate: false,
        }
    }

    /// Recompute the output from the stored inputs.
    pub fn eval(&self) -> bool {
        self.kind.eval(self.inputs[0], self.inputs[1])
    }
}
