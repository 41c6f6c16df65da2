//! Instruction variants.
//!
//! One payload struct per IR opcode, wrapped by [`Instruction`]. Operand
//! symbols are held by handle ([`SymbolId`]); branch targets are held by
//! block handle ([`BlockId`]) — neither is an owning reference, so phi
//! nodes and block addresses may form reference cycles without an
//! ownership cycle.
//!
//! Value-producing instructions additionally occupy a symbol-table slot
//! and carry a [`Name`]; void instructions (store, branches, returns,
//! void calls, unreachable) appear only in their block.

use smallvec::SmallVec;

use crate::name::Name;
use crate::ops::{BinaryOperator, CastOperator, CompareOperator, Flag};
use crate::symbols::SymbolId;
use crate::types::TypeRef;
use crate::visitor::InstructionVisitor;
use crate::BlockId;

/// `alloca`: stack allocation of `count` elements.
#[derive(Clone, Debug, PartialEq)]
pub struct Allocate {
    pub ty: TypeRef,
    pub count: SymbolId,
    pub align: u32,
    pub name: Name,
}

/// Binary arithmetic or logic operation.
#[derive(Clone, Debug, PartialEq)]
pub struct BinaryOperation {
    pub ty: TypeRef,
    pub operator: BinaryOperator,
    pub flags: Vec<Flag>,
    pub lhs: SymbolId,
    pub rhs: SymbolId,
    pub name: Name,
}

/// Unconditional branch.
#[derive(Clone, Debug, PartialEq)]
pub struct Branch {
    pub target: BlockId,
}

/// Value-producing call.
#[derive(Clone, Debug, PartialEq)]
pub struct Call {
    pub ty: TypeRef,
    pub target: SymbolId,
    pub arguments: Vec<SymbolId>,
    pub name: Name,
}

/// Call of a void-returning target; occupies no symbol-table slot.
#[derive(Clone, Debug, PartialEq)]
pub struct VoidCall {
    pub target: SymbolId,
    pub arguments: Vec<SymbolId>,
}

/// Type conversion.
#[derive(Clone, Debug, PartialEq)]
pub struct Cast {
    pub ty: TypeRef,
    pub operator: CastOperator,
    pub value: SymbolId,
    pub name: Name,
}

/// `icmp`/`fcmp`.
#[derive(Clone, Debug, PartialEq)]
pub struct Compare {
    pub ty: TypeRef,
    pub operator: CompareOperator,
    pub lhs: SymbolId,
    pub rhs: SymbolId,
    pub name: Name,
}

/// Two-way conditional branch.
#[derive(Clone, Debug, PartialEq)]
pub struct ConditionalBranch {
    pub condition: SymbolId,
    pub true_target: BlockId,
    pub false_target: BlockId,
}

/// Extract one element of a vector at a symbolic index.
#[derive(Clone, Debug, PartialEq)]
pub struct ExtractElement {
    pub ty: TypeRef,
    pub vector: SymbolId,
    pub index: SymbolId,
    pub name: Name,
}

/// Extract a member of an aggregate at a literal index.
///
/// The literal-vs-symbolic index asymmetry against [`ExtractElement`]
/// is LLVM semantics, not an accident.
#[derive(Clone, Debug, PartialEq)]
pub struct ExtractValue {
    pub ty: TypeRef,
    pub aggregate: SymbolId,
    pub index: u32,
    pub name: Name,
}

/// Address computation.
#[derive(Clone, Debug, PartialEq)]
pub struct GetElementPointer {
    pub ty: TypeRef,
    pub base: SymbolId,
    pub indices: Vec<SymbolId>,
    pub inbounds: bool,
    pub name: Name,
}

/// Computed branch to one of a set of possible successors.
#[derive(Clone, Debug, PartialEq)]
pub struct IndirectBranch {
    pub address: SymbolId,
    pub successors: Vec<BlockId>,
}

/// Insert an element into a vector at a symbolic index.
#[derive(Clone, Debug, PartialEq)]
pub struct InsertElement {
    pub ty: TypeRef,
    pub vector: SymbolId,
    pub index: SymbolId,
    pub value: SymbolId,
    pub name: Name,
}

/// Insert a member into an aggregate at a literal index.
#[derive(Clone, Debug, PartialEq)]
pub struct InsertValue {
    pub ty: TypeRef,
    pub aggregate: SymbolId,
    pub index: u32,
    pub value: SymbolId,
    pub name: Name,
}

/// Memory load.
#[derive(Clone, Debug, PartialEq)]
pub struct Load {
    pub ty: TypeRef,
    pub source: SymbolId,
    pub align: u32,
    pub volatile: bool,
    pub name: Name,
}

/// One incoming edge of a phi node.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct PhiCase {
    pub value: SymbolId,
    pub block: BlockId,
}

/// SSA merge of per-predecessor values.
#[derive(Clone, Debug, PartialEq)]
pub struct Phi {
    pub ty: TypeRef,
    pub cases: Vec<PhiCase>,
    pub name: Name,
}

/// Function return, with or without a value.
#[derive(Clone, Debug, PartialEq)]
pub struct Return {
    pub value: Option<SymbolId>,
}

/// Conditional value selection.
#[derive(Clone, Debug, PartialEq)]
pub struct Select {
    pub ty: TypeRef,
    pub condition: SymbolId,
    pub true_value: SymbolId,
    pub false_value: SymbolId,
    pub name: Name,
}

/// Vector shuffle through a mask vector.
#[derive(Clone, Debug, PartialEq)]
pub struct ShuffleVector {
    pub ty: TypeRef,
    pub vector1: SymbolId,
    pub vector2: SymbolId,
    pub mask: SymbolId,
    pub name: Name,
}

/// Memory store.
#[derive(Clone, Debug, PartialEq)]
pub struct Store {
    pub destination: SymbolId,
    pub source: SymbolId,
    pub align: u32,
    pub volatile: bool,
}

/// One case of a `switch`: a constant symbol paired with its target.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct SwitchCase {
    pub value: SymbolId,
    pub target: BlockId,
}

/// Multi-way branch over constant symbols.
#[derive(Clone, Debug, PartialEq)]
pub struct Switch {
    pub condition: SymbolId,
    pub default: BlockId,
    pub cases: Vec<SwitchCase>,
}

/// One case of the legacy `switch` encoding: a raw 64-bit constant.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct SwitchOldCase {
    pub value: u64,
    pub target: BlockId,
}

/// Legacy `switch` encoding. Case constants stay raw 64-bit integers;
/// this form is never rewritten into [`Switch`].
#[derive(Clone, Debug, PartialEq)]
pub struct SwitchOld {
    pub condition: SymbolId,
    pub default: BlockId,
    pub cases: Vec<SwitchOldCase>,
}

/// A single instruction.
#[derive(Clone, Debug, PartialEq)]
pub enum Instruction {
    Allocate(Allocate),
    Binary(BinaryOperation),
    Branch(Branch),
    Call(Call),
    Cast(Cast),
    Compare(Compare),
    ConditionalBranch(ConditionalBranch),
    ExtractElement(ExtractElement),
    ExtractValue(ExtractValue),
    GetElementPointer(GetElementPointer),
    IndirectBranch(IndirectBranch),
    InsertElement(InsertElement),
    InsertValue(InsertValue),
    Load(Load),
    Phi(Phi),
    Return(Return),
    Select(Select),
    ShuffleVector(ShuffleVector),
    Store(Store),
    Switch(Switch),
    SwitchOld(SwitchOld),
    Unreachable,
    VoidCall(VoidCall),
}

impl Instruction {
    /// The type of the produced value, or `None` for void instructions.
    pub fn value_type(&self) -> Option<&TypeRef> {
        match self {
            Instruction::Allocate(i) => Some(&i.ty),
            Instruction::Binary(i) => Some(&i.ty),
            Instruction::Call(i) => Some(&i.ty),
            Instruction::Cast(i) => Some(&i.ty),
            Instruction::Compare(i) => Some(&i.ty),
            Instruction::ExtractElement(i) => Some(&i.ty),
            Instruction::ExtractValue(i) => Some(&i.ty),
            Instruction::GetElementPointer(i) => Some(&i.ty),
            Instruction::InsertElement(i) => Some(&i.ty),
            Instruction::InsertValue(i) => Some(&i.ty),
            Instruction::Load(i) => Some(&i.ty),
            Instruction::Phi(i) => Some(&i.ty),
            Instruction::Select(i) => Some(&i.ty),
            Instruction::ShuffleVector(i) => Some(&i.ty),
            Instruction::Branch(_)
            | Instruction::ConditionalBranch(_)
            | Instruction::IndirectBranch(_)
            | Instruction::Return(_)
            | Instruction::Store(_)
            | Instruction::Switch(_)
            | Instruction::SwitchOld(_)
            | Instruction::Unreachable
            | Instruction::VoidCall(_) => None,
        }
    }

    /// Whether this instruction produces a value (and therefore occupies
    /// a symbol-table slot).
    #[inline]
    pub fn is_value(&self) -> bool {
        self.value_type().is_some()
    }

    /// The instruction's name; `None` for void instructions, which are
    /// never named.
    pub fn name(&self) -> Option<&Name> {
        match self {
            Instruction::Allocate(i) => Some(&i.name),
            Instruction::Binary(i) => Some(&i.name),
            Instruction::Call(i) => Some(&i.name),
            Instruction::Cast(i) => Some(&i.name),
            Instruction::Compare(i) => Some(&i.name),
            Instruction::ExtractElement(i) => Some(&i.name),
            Instruction::ExtractValue(i) => Some(&i.name),
            Instruction::GetElementPointer(i) => Some(&i.name),
            Instruction::InsertElement(i) => Some(&i.name),
            Instruction::InsertValue(i) => Some(&i.name),
            Instruction::Load(i) => Some(&i.name),
            Instruction::Phi(i) => Some(&i.name),
            Instruction::Select(i) => Some(&i.name),
            Instruction::ShuffleVector(i) => Some(&i.name),
            _ => None,
        }
    }

    /// Assign a name. Ignored for void instructions.
    pub(crate) fn set_name(&mut self, name: impl Into<String>) {
        let slot = match self {
            Instruction::Allocate(i) => &mut i.name,
            Instruction::Binary(i) => &mut i.name,
            Instruction::Call(i) => &mut i.name,
            Instruction::Cast(i) => &mut i.name,
            Instruction::Compare(i) => &mut i.name,
            Instruction::ExtractElement(i) => &mut i.name,
            Instruction::ExtractValue(i) => &mut i.name,
            Instruction::GetElementPointer(i) => &mut i.name,
            Instruction::InsertElement(i) => &mut i.name,
            Instruction::InsertValue(i) => &mut i.name,
            Instruction::Load(i) => &mut i.name,
            Instruction::Phi(i) => &mut i.name,
            Instruction::Select(i) => &mut i.name,
            Instruction::ShuffleVector(i) => &mut i.name,
            _ => return,
        };
        slot.set(name);
    }

    /// All symbol operands read by this instruction, in operand order.
    ///
    /// Returns a `SmallVec` since most instructions use 0-3 operands.
    /// Block targets and literal indices are not symbols and are not
    /// included.
    pub fn operands(&self) -> SmallVec<[SymbolId; 4]> {
        let mut operands = SmallVec::new();
        match self {
            Instruction::Allocate(i) => operands.push(i.count),
            Instruction::Binary(i) => operands.extend([i.lhs, i.rhs]),
            Instruction::Branch(_) | Instruction::Unreachable => {}
            Instruction::Call(i) => {
                operands.push(i.target);
                operands.extend_from_slice(&i.arguments);
            }
            Instruction::Cast(i) => operands.push(i.value),
            Instruction::Compare(i) => operands.extend([i.lhs, i.rhs]),
            Instruction::ConditionalBranch(i) => operands.push(i.condition),
            Instruction::ExtractElement(i) => operands.extend([i.vector, i.index]),
            Instruction::ExtractValue(i) => operands.push(i.aggregate),
            Instruction::GetElementPointer(i) => {
                operands.push(i.base);
                operands.extend_from_slice(&i.indices);
            }
            Instruction::IndirectBranch(i) => operands.push(i.address),
            Instruction::InsertElement(i) => operands.extend([i.vector, i.index, i.value]),
            Instruction::InsertValue(i) => operands.extend([i.aggregate, i.value]),
            Instruction::Load(i) => operands.push(i.source),
            Instruction::Phi(i) => operands.extend(i.cases.iter().map(|case| case.value)),
            Instruction::Return(i) => operands.extend(i.value),
            Instruction::Select(i) => {
                operands.extend([i.condition, i.true_value, i.false_value]);
            }
            Instruction::ShuffleVector(i) => operands.extend([i.vector1, i.vector2, i.mask]),
            Instruction::Store(i) => operands.extend([i.destination, i.source]),
            Instruction::Switch(i) => {
                operands.push(i.condition);
                operands.extend(i.cases.iter().map(|case| case.value));
            }
            Instruction::SwitchOld(i) => operands.push(i.condition),
            Instruction::VoidCall(i) => {
                operands.push(i.target);
                operands.extend_from_slice(&i.arguments);
            }
        }
        operands
    }

    /// Rewrite operand slots holding `original` to `replacement`.
    ///
    /// Called during forward-reference resolution. Variants without
    /// symbol operands (unconditional branch, unreachable) are no-ops.
    pub(crate) fn replace(&mut self, original: SymbolId, replacement: SymbolId) {
        fn patch(slot: &mut SymbolId, original: SymbolId, replacement: SymbolId) {
            if *slot == original {
                *slot = replacement;
            }
        }
        fn patch_all(slots: &mut [SymbolId], original: SymbolId, replacement: SymbolId) {
            for slot in slots {
                patch(slot, original, replacement);
            }
        }

        match self {
            Instruction::Branch(_) | Instruction::Unreachable => {}
            Instruction::Allocate(i) => patch(&mut i.count, original, replacement),
            Instruction::Binary(i) => {
                patch(&mut i.lhs, original, replacement);
                patch(&mut i.rhs, original, replacement);
            }
            Instruction::Call(i) => {
                patch(&mut i.target, original, replacement);
                patch_all(&mut i.arguments, original, replacement);
            }
            Instruction::Cast(i) => patch(&mut i.value, original, replacement),
            Instruction::Compare(i) => {
                patch(&mut i.lhs, original, replacement);
                patch(&mut i.rhs, original, replacement);
            }
            Instruction::ConditionalBranch(i) => patch(&mut i.condition, original, replacement),
            Instruction::ExtractElement(i) => {
                patch(&mut i.vector, original, replacement);
                patch(&mut i.index, original, replacement);
            }
            Instruction::ExtractValue(i) => patch(&mut i.aggregate, original, replacement),
            Instruction::GetElementPointer(i) => {
                patch(&mut i.base, original, replacement);
                patch_all(&mut i.indices, original, replacement);
            }
            Instruction::IndirectBranch(i) => patch(&mut i.address, original, replacement),
            Instruction::InsertElement(i) => {
                patch(&mut i.vector, original, replacement);
                patch(&mut i.index, original, replacement);
                patch(&mut i.value, original, replacement);
            }
            Instruction::InsertValue(i) => {
                patch(&mut i.aggregate, original, replacement);
                patch(&mut i.value, original, replacement);
            }
            Instruction::Load(i) => patch(&mut i.source, original, replacement),
            Instruction::Phi(i) => {
                for case in &mut i.cases {
                    patch(&mut case.value, original, replacement);
                }
            }
            Instruction::Return(i) => {
                if let Some(value) = &mut i.value {
                    patch(value, original, replacement);
                }
            }
            Instruction::Select(i) => {
                patch(&mut i.condition, original, replacement);
                patch(&mut i.true_value, original, replacement);
                patch(&mut i.false_value, original, replacement);
            }
            Instruction::ShuffleVector(i) => {
                patch(&mut i.vector1, original, replacement);
                patch(&mut i.vector2, original, replacement);
                patch(&mut i.mask, original, replacement);
            }
            Instruction::Store(i) => {
                patch(&mut i.destination, original, replacement);
                patch(&mut i.source, original, replacement);
            }
            Instruction::Switch(i) => {
                patch(&mut i.condition, original, replacement);
                for case in &mut i.cases {
                    patch(&mut case.value, original, replacement);
                }
            }
            Instruction::SwitchOld(i) => patch(&mut i.condition, original, replacement),
            Instruction::VoidCall(i) => {
                patch(&mut i.target, original, replacement);
                patch_all(&mut i.arguments, original, replacement);
            }
        }
    }

    /// Double dispatch to the matching `visit_*` method.
    pub fn accept(&self, visitor: &mut dyn InstructionVisitor) {
        match self {
            Instruction::Allocate(i) => visitor.visit_allocate(i),
            Instruction::Binary(i) => visitor.visit_binary(i),
            Instruction::Branch(i) => visitor.visit_branch(i),
            Instruction::Call(i) => visitor.visit_call(i),
            Instruction::Cast(i) => visitor.visit_cast(i),
            Instruction::Compare(i) => visitor.visit_compare(i),
            Instruction::ConditionalBranch(i) => visitor.visit_conditional_branch(i),
            Instruction::ExtractElement(i) => visitor.visit_extract_element(i),
            Instruction::ExtractValue(i) => visitor.visit_extract_value(i),
            Instruction::GetElementPointer(i) => visitor.visit_get_element_pointer(i),
            Instruction::IndirectBranch(i) => visitor.visit_indirect_branch(i),
            Instruction::InsertElement(i) => visitor.visit_insert_element(i),
            Instruction::InsertValue(i) => visitor.visit_insert_value(i),
            Instruction::Load(i) => visitor.visit_load(i),
            Instruction::Phi(i) => visitor.visit_phi(i),
            Instruction::Return(i) => visitor.visit_return(i),
            Instruction::Select(i) => visitor.visit_select(i),
            Instruction::ShuffleVector(i) => visitor.visit_shuffle_vector(i),
            Instruction::Store(i) => visitor.visit_store(i),
            Instruction::Switch(i) => visitor.visit_switch(i),
            Instruction::SwitchOld(i) => visitor.visit_switch_old(i),
            Instruction::Unreachable => visitor.visit_unreachable(),
            Instruction::VoidCall(i) => visitor.visit_void_call(i),
        }
    }
}

#[cfg(test)]
mod tests;
