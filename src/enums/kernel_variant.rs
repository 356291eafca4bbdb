//! # Kernel Variant Module
//!
//! The three microkernel variants an elementwise binary plan can select, and the
//! operand order normalisation that goes with them.

use std::fmt;

/// Microkernel variant chosen from the innermost compressed dimension.
///
/// Every variant expects a broadcast operand, if any, in the *second* position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KernelVariant {
    /// Both inputs advance along the innermost run (`op`).
    NoBroadcast,
    /// Input #1 is a single element along the innermost run (`ropc`).
    /// The operands are swapped so that it arrives second.
    BroadcastFirst,
    /// Input #2 is a single element along the innermost run (`opc`).
    BroadcastSecond,
}

impl KernelVariant {
    /// Operand order the variant needs.
    #[inline]
    pub fn operand_order(&self) -> OperandOrder {
        match self {
            KernelVariant::BroadcastFirst => OperandOrder::Swapped,
            KernelVariant::NoBroadcast | KernelVariant::BroadcastSecond => OperandOrder::AsGiven,
        }
    }
}

impl fmt::Display for KernelVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KernelVariant::NoBroadcast => write!(f, "op"),
            KernelVariant::BroadcastFirst => write!(f, "ropc"),
            KernelVariant::BroadcastSecond => write!(f, "opc"),
        }
    }
}

/// Position of the caller's operands as seen by the microkernel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OperandOrder {
    #[default]
    AsGiven,
    Swapped,
}

impl OperandOrder {
    /// Reorders a pair of per-input values into `(first, second)` kernel operands.
    #[inline]
    pub fn normalize<T>(&self, input1: T, input2: T) -> (T, T) {
        match self {
            OperandOrder::AsGiven => (input1, input2),
            OperandOrder::Swapped => (input2, input1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_broadcast_first_swaps() {
        assert_eq!(KernelVariant::BroadcastFirst.operand_order(), OperandOrder::Swapped);
        assert_eq!(KernelVariant::BroadcastSecond.operand_order(), OperandOrder::AsGiven);
        assert_eq!(KernelVariant::NoBroadcast.operand_order(), OperandOrder::AsGiven);
    }

    #[test]
    fn test_normalize_pairs() {
        assert_eq!(OperandOrder::AsGiven.normalize("a", "b"), ("a", "b"));
        assert_eq!(OperandOrder::Swapped.normalize("a", "b"), ("b", "a"));
    }
}
