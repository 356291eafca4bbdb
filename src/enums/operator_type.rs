//! # Operator Type Module
//!
//! Tags an [`Operator`](crate::Operator) with the kind it was created as, so a
//! setup routine can reject an operator of the wrong kind.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperatorType {
    AddNdF32,
    MultiplyNdF32,
}

impl OperatorType {
    /// Short human-readable operation name used in log lines.
    pub fn op_name(&self) -> &'static str {
        match self {
            OperatorType::AddNdF32 => "Add",
            OperatorType::MultiplyNdF32 => "Multiply",
        }
    }
}

impl fmt::Display for OperatorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperatorType::AddNdF32 => write!(f, "Add (ND, F32)"),
            OperatorType::MultiplyNdF32 => write!(f, "Multiply (ND, F32)"),
        }
    }
}
