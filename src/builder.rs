//! Instruction emission into an open block.
//!
//! [`InstructionBuilder`] is the sink handed out by
//! [`FunctionDefinition::generate_block`]: it borrows the function so
//! every operation can reach both the open block and the symbol table.
//!
//! Value-producing operations claim their symbol-table slot *before*
//! resolving operands — by the time a phi's incoming values are looked
//! up, the phi's own index is already stable, so a later block can
//! reference it and resolution never chases its own tail.

use crate::error::ModelError;
use crate::function::FunctionDefinition;
use crate::instruction::{
    Allocate, BinaryOperation, Branch, Call, Cast, Compare, ConditionalBranch, ExtractElement,
    ExtractValue, GetElementPointer, IndirectBranch, InsertElement, InsertValue, Instruction,
    Load, Phi, PhiCase, Return, Select, ShuffleVector, Store, Switch, SwitchCase, SwitchOld,
    SwitchOldCase, VoidCall,
};
use crate::name::Name;
use crate::ops::{BinaryOperator, CastOperator, CompareOperator, Flag};
use crate::symbols::{Holder, Symbol, SymbolId};
use crate::types::TypeRef;
use crate::BlockId;

/// Builder appending instructions to one open block.
pub struct InstructionBuilder<'f> {
    function: &'f mut FunctionDefinition,
    block: BlockId,
}

impl<'f> InstructionBuilder<'f> {
    pub(crate) fn new(function: &'f mut FunctionDefinition, block: BlockId) -> Self {
        InstructionBuilder { function, block }
    }

    /// The block this builder appends to.
    pub fn block(&self) -> BlockId {
        self.block
    }

    /// Stream marker; the open block is tracked by the function's block
    /// cursor, so this changes no state.
    pub fn enter_block(&mut self, _id: u64) {}

    /// Stream marker; see [`enter_block`](Self::enter_block).
    pub fn exit_block(&mut self) {}

    // -- Internals --

    /// The index the next pushed instruction will occupy.
    fn next_slot(&self) -> u32 {
        self.function.block_by_id(self.block).instruction_count()
    }

    /// Holder identity of the instruction under construction.
    fn holder(&self) -> Holder {
        Holder::Instruction {
            block: self.block,
            index: self.next_slot(),
        }
    }

    /// Claim the symbol-table slot for the value instruction under
    /// construction. Must precede its operand lookups.
    fn register_value(&mut self) {
        let symbol = Symbol::Instruction {
            block: self.block,
            index: self.next_slot(),
        };
        self.function.define_symbol(symbol);
    }

    /// Resolve an operand reference on behalf of the instruction under
    /// construction.
    fn operand(&mut self, index: u32) -> SymbolId {
        let holder = self.holder();
        self.function.symbols_mut().lookup_for(index, holder)
    }

    fn push(&mut self, instruction: Instruction) {
        self.function.block_by_id_mut(self.block).push(instruction);
    }

    // -- Instruction creation --

    /// `alloca`. `count` is a symbol reference (typically a constant).
    pub fn create_allocation(&mut self, ty: TypeRef, count: u32, align: u32) {
        self.register_value();
        let count = self.operand(count);
        self.push(Instruction::Allocate(Allocate {
            ty,
            count,
            align,
            name: Name::Unknown,
        }));
    }

    /// Binary operation. The operator table is selected from the result
    /// type (floating for a scalar float or a vector of floats); the
    /// flag word is interpreted per decoded operator.
    pub fn create_binary_operation(
        &mut self,
        ty: TypeRef,
        opcode: u32,
        flags: u32,
        lhs: u32,
        rhs: u32,
    ) -> Result<(), ModelError> {
        let operator = BinaryOperator::decode(opcode, ty.is_float_or_float_vector())
            .ok_or_else(|| ModelError::protocol(format!("unknown binary opcode {opcode}")))?;
        let flags = Flag::decode(operator, flags);
        self.register_value();
        let lhs = self.operand(lhs);
        let rhs = self.operand(rhs);
        self.push(Instruction::Binary(BinaryOperation {
            ty,
            operator,
            flags,
            lhs,
            rhs,
            name: Name::Unknown,
        }));
        Ok(())
    }

    /// Unconditional branch.
    pub fn create_branch(&mut self, block: u32) -> Result<(), ModelError> {
        let target = self.function.block_id(block)?;
        self.push(Instruction::Branch(Branch { target }));
        Ok(())
    }

    /// Conditional branch.
    pub fn create_conditional_branch(
        &mut self,
        condition: u32,
        true_block: u32,
        false_block: u32,
    ) -> Result<(), ModelError> {
        let true_target = self.function.block_id(true_block)?;
        let false_target = self.function.block_id(false_block)?;
        let condition = self.operand(condition);
        self.push(Instruction::ConditionalBranch(ConditionalBranch {
            condition,
            true_target,
            false_target,
        }));
        Ok(())
    }

    /// Call. A void result type produces a void call, which occupies no
    /// symbol-table slot; any other type produces a value call.
    pub fn create_call(&mut self, ty: TypeRef, target: u32, arguments: &[u32]) {
        if ty.is_void() {
            let target = self.operand(target);
            let arguments = arguments.iter().map(|&a| self.operand(a)).collect();
            self.push(Instruction::VoidCall(VoidCall { target, arguments }));
        } else {
            self.register_value();
            let target = self.operand(target);
            let arguments = arguments.iter().map(|&a| self.operand(a)).collect();
            self.push(Instruction::Call(Call {
                ty,
                target,
                arguments,
                name: Name::Unknown,
            }));
        }
    }

    /// Cast.
    pub fn create_cast(&mut self, ty: TypeRef, opcode: u32, value: u32) -> Result<(), ModelError> {
        let operator = CastOperator::decode(opcode)
            .ok_or_else(|| ModelError::protocol(format!("unknown cast opcode {opcode}")))?;
        self.register_value();
        let value = self.operand(value);
        self.push(Instruction::Cast(Cast {
            ty,
            operator,
            value,
            name: Name::Unknown,
        }));
        Ok(())
    }

    /// Comparison.
    pub fn create_compare(
        &mut self,
        ty: TypeRef,
        opcode: u32,
        lhs: u32,
        rhs: u32,
    ) -> Result<(), ModelError> {
        let operator = CompareOperator::decode(opcode)
            .ok_or_else(|| ModelError::protocol(format!("unknown compare opcode {opcode}")))?;
        self.register_value();
        let lhs = self.operand(lhs);
        let rhs = self.operand(rhs);
        self.push(Instruction::Compare(Compare {
            ty,
            operator,
            lhs,
            rhs,
            name: Name::Unknown,
        }));
        Ok(())
    }

    /// Extract a vector element at a symbolic index.
    pub fn create_extract_element(&mut self, ty: TypeRef, vector: u32, index: u32) {
        self.register_value();
        let vector = self.operand(vector);
        let index = self.operand(index);
        self.push(Instruction::ExtractElement(ExtractElement {
            ty,
            vector,
            index,
            name: Name::Unknown,
        }));
    }

    /// Extract an aggregate member at a literal index.
    pub fn create_extract_value(&mut self, ty: TypeRef, aggregate: u32, index: u32) {
        self.register_value();
        let aggregate = self.operand(aggregate);
        self.push(Instruction::ExtractValue(ExtractValue {
            ty,
            aggregate,
            index,
            name: Name::Unknown,
        }));
    }

    /// Address computation.
    pub fn create_get_element_pointer(
        &mut self,
        ty: TypeRef,
        pointer: u32,
        indices: &[u32],
        inbounds: bool,
    ) {
        self.register_value();
        let base = self.operand(pointer);
        let indices = indices.iter().map(|&i| self.operand(i)).collect();
        self.push(Instruction::GetElementPointer(GetElementPointer {
            ty,
            base,
            indices,
            inbounds,
            name: Name::Unknown,
        }));
    }

    /// Computed branch over a successor set.
    pub fn create_indirect_branch(
        &mut self,
        address: u32,
        successors: &[u32],
    ) -> Result<(), ModelError> {
        let successors = successors
            .iter()
            .map(|&block| self.function.block_id(block))
            .collect::<Result<_, _>>()?;
        let address = self.operand(address);
        self.push(Instruction::IndirectBranch(IndirectBranch {
            address,
            successors,
        }));
        Ok(())
    }

    /// Insert a vector element at a symbolic index.
    pub fn create_insert_element(&mut self, ty: TypeRef, vector: u32, index: u32, value: u32) {
        self.register_value();
        let vector = self.operand(vector);
        let index = self.operand(index);
        let value = self.operand(value);
        self.push(Instruction::InsertElement(InsertElement {
            ty,
            vector,
            index,
            value,
            name: Name::Unknown,
        }));
    }

    /// Insert an aggregate member at a literal index.
    pub fn create_insert_value(&mut self, ty: TypeRef, aggregate: u32, index: u32, value: u32) {
        self.register_value();
        let aggregate = self.operand(aggregate);
        let value = self.operand(value);
        self.push(Instruction::InsertValue(InsertValue {
            ty,
            aggregate,
            index,
            value,
            name: Name::Unknown,
        }));
    }

    /// Memory load.
    pub fn create_load(&mut self, ty: TypeRef, source: u32, align: u32, volatile: bool) {
        self.register_value();
        let source = self.operand(source);
        self.push(Instruction::Load(Load {
            ty,
            source,
            align,
            volatile,
            name: Name::Unknown,
        }));
    }

    /// Phi node. `values` and `blocks` pair up by position and must have
    /// the same length.
    pub fn create_phi(
        &mut self,
        ty: TypeRef,
        values: &[u32],
        blocks: &[u32],
    ) -> Result<(), ModelError> {
        if values.len() != blocks.len() {
            return Err(ModelError::protocol(format!(
                "phi has {} values but {} predecessor blocks",
                values.len(),
                blocks.len()
            )));
        }
        let targets: Vec<BlockId> = blocks
            .iter()
            .map(|&block| self.function.block_id(block))
            .collect::<Result<_, _>>()?;
        self.register_value();
        let cases = values
            .iter()
            .zip(targets)
            .map(|(&value, block)| PhiCase {
                value: self.operand(value),
                block,
            })
            .collect();
        self.push(Instruction::Phi(Phi {
            ty,
            cases,
            name: Name::Unknown,
        }));
        Ok(())
    }

    /// Return without a value.
    pub fn create_return(&mut self) {
        self.push(Instruction::Return(Return { value: None }));
    }

    /// Return a value.
    pub fn create_return_value(&mut self, value: u32) {
        let value = self.operand(value);
        self.push(Instruction::Return(Return { value: Some(value) }));
    }

    /// Conditional value selection.
    pub fn create_select(&mut self, ty: TypeRef, condition: u32, true_value: u32, false_value: u32) {
        self.register_value();
        let condition = self.operand(condition);
        let true_value = self.operand(true_value);
        let false_value = self.operand(false_value);
        self.push(Instruction::Select(Select {
            ty,
            condition,
            true_value,
            false_value,
            name: Name::Unknown,
        }));
    }

    /// Vector shuffle.
    pub fn create_shuffle_vector(&mut self, ty: TypeRef, vector1: u32, vector2: u32, mask: u32) {
        self.register_value();
        let vector1 = self.operand(vector1);
        let vector2 = self.operand(vector2);
        let mask = self.operand(mask);
        self.push(Instruction::ShuffleVector(ShuffleVector {
            ty,
            vector1,
            vector2,
            mask,
            name: Name::Unknown,
        }));
    }

    /// Memory store.
    pub fn create_store(&mut self, destination: u32, source: u32, align: u32, volatile: bool) {
        let destination = self.operand(destination);
        let source = self.operand(source);
        self.push(Instruction::Store(Store {
            destination,
            source,
            align,
            volatile,
        }));
    }

    /// Multi-way branch over constant symbols. Case values and case
    /// blocks pair up by position; a case target may well be the default
    /// block, and the pair is stored unchanged.
    pub fn create_switch(
        &mut self,
        condition: u32,
        default_block: u32,
        case_values: &[u32],
        case_blocks: &[u32],
    ) -> Result<(), ModelError> {
        if case_values.len() != case_blocks.len() {
            return Err(ModelError::protocol(format!(
                "switch has {} case values but {} case blocks",
                case_values.len(),
                case_blocks.len()
            )));
        }
        let default = self.function.block_id(default_block)?;
        let targets: Vec<BlockId> = case_blocks
            .iter()
            .map(|&block| self.function.block_id(block))
            .collect::<Result<_, _>>()?;
        let condition = self.operand(condition);
        let cases = case_values
            .iter()
            .zip(targets)
            .map(|(&value, target)| SwitchCase {
                value: self.operand(value),
                target,
            })
            .collect();
        self.push(Instruction::Switch(Switch {
            condition,
            default,
            cases,
        }));
        Ok(())
    }

    /// Legacy switch encoding: case constants arrive as raw 64-bit
    /// integers and stay that way.
    pub fn create_switch_old(
        &mut self,
        condition: u32,
        default_block: u32,
        case_constants: &[u64],
        case_blocks: &[u32],
    ) -> Result<(), ModelError> {
        if case_constants.len() != case_blocks.len() {
            return Err(ModelError::protocol(format!(
                "switch has {} case constants but {} case blocks",
                case_constants.len(),
                case_blocks.len()
            )));
        }
        let default = self.function.block_id(default_block)?;
        let targets: Vec<BlockId> = case_blocks
            .iter()
            .map(|&block| self.function.block_id(block))
            .collect::<Result<_, _>>()?;
        let condition = self.operand(condition);
        let cases = case_constants
            .iter()
            .zip(targets)
            .map(|(&value, target)| SwitchOldCase { value, target })
            .collect();
        self.push(Instruction::SwitchOld(SwitchOld {
            condition,
            default,
            cases,
        }));
        Ok(())
    }

    /// `unreachable`.
    pub fn create_unreachable(&mut self) {
        self.push(Instruction::Unreachable);
    }
}

#[cfg(test)]
mod tests;
