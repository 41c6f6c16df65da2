//! Constant variants.
//!
//! Constants live directly in the symbol table. Scalar constants carry
//! their raw encoding (floats keep the bit pattern the stream delivered);
//! constant expressions hold operand handles resolved through the same
//! forward-reference machinery as instruction operands.

use crate::ops::{BinaryOperator, CastOperator, CompareOperator};
use crate::symbols::SymbolId;
use crate::types::TypeRef;
use crate::BlockId;

/// A constant value or constant expression.
#[derive(Clone, Debug, PartialEq)]
pub enum Constant {
    Integer {
        ty: TypeRef,
        value: i64,
    },
    /// Floating-point constant as a raw bit pattern; the width is
    /// whatever `ty` says it is.
    FloatingPoint {
        ty: TypeRef,
        bits: u64,
    },
    Null {
        ty: TypeRef,
    },
    Undefined {
        ty: TypeRef,
    },
    /// String data. `c_string` marks the NUL-terminated form.
    String {
        ty: TypeRef,
        value: String,
        c_string: bool,
    },
    /// Aggregate built from a raw scalar array (typed element data
    /// delivered as one record).
    AggregateData {
        ty: TypeRef,
        data: Vec<i64>,
    },
    /// Array/struct/vector built over previously defined constants.
    Aggregate {
        ty: TypeRef,
        elements: Vec<SymbolId>,
    },
    BinaryExpression {
        ty: TypeRef,
        operator: BinaryOperator,
        lhs: SymbolId,
        rhs: SymbolId,
    },
    CompareExpression {
        ty: TypeRef,
        operator: CompareOperator,
        lhs: SymbolId,
        rhs: SymbolId,
    },
    CastExpression {
        ty: TypeRef,
        operator: CastOperator,
        value: SymbolId,
    },
    GetElementPointer {
        ty: TypeRef,
        base: SymbolId,
        indices: Vec<SymbolId>,
        inbounds: bool,
    },
    /// Address of a block inside `function`.
    BlockAddress {
        ty: TypeRef,
        function: SymbolId,
        block: BlockId,
    },
}

impl Constant {
    /// The constant's type.
    pub fn ty(&self) -> &TypeRef {
        match self {
            Constant::Integer { ty, .. }
            | Constant::FloatingPoint { ty, .. }
            | Constant::Null { ty }
            | Constant::Undefined { ty }
            | Constant::String { ty, .. }
            | Constant::AggregateData { ty, .. }
            | Constant::Aggregate { ty, .. }
            | Constant::BinaryExpression { ty, .. }
            | Constant::CompareExpression { ty, .. }
            | Constant::CastExpression { ty, .. }
            | Constant::GetElementPointer { ty, .. }
            | Constant::BlockAddress { ty, .. } => ty,
        }
    }

    /// Rewrite operand slots holding `original` to `replacement`.
    ///
    /// Scalar constants hold no operands and are untouched.
    pub(crate) fn replace(&mut self, original: SymbolId, replacement: SymbolId) {
        fn patch(slot: &mut SymbolId, original: SymbolId, replacement: SymbolId) {
            if *slot == original {
                *slot = replacement;
            }
        }

        match self {
            Constant::Integer { .. }
            | Constant::FloatingPoint { .. }
            | Constant::Null { .. }
            | Constant::Undefined { .. }
            | Constant::String { .. }
            | Constant::AggregateData { .. } => {}
            Constant::Aggregate { elements, .. } => {
                for element in elements {
                    patch(element, original, replacement);
                }
            }
            Constant::BinaryExpression { lhs, rhs, .. }
            | Constant::CompareExpression { lhs, rhs, .. } => {
                patch(lhs, original, replacement);
                patch(rhs, original, replacement);
            }
            Constant::CastExpression { value, .. } => {
                patch(value, original, replacement);
            }
            Constant::GetElementPointer { base, indices, .. } => {
                patch(base, original, replacement);
                for index in indices {
                    patch(index, original, replacement);
                }
            }
            Constant::BlockAddress { function, .. } => {
                patch(function, original, replacement);
            }
        }
    }
}
