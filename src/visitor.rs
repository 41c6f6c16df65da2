//! Visitor traversal over finished functions.
//!
//! Two capabilities, matching the two levels of the structure:
//!
//! - [`FunctionVisitor`] receives each block of a function in index
//!   order (`FunctionDefinition::accept`).
//! - [`InstructionVisitor`] is double-dispatched per instruction variant
//!   (`Block::accept` / `Instruction::accept`).
//!
//! All `visit_*` methods default to doing nothing, so a visitor
//! implements only the variants it cares about. Visitors may mutate
//! their own state; the model stays immutable during traversal.

use crate::block::Block;
use crate::instruction::{
    Allocate, BinaryOperation, Branch, Call, Cast, Compare, ConditionalBranch, ExtractElement,
    ExtractValue, GetElementPointer, IndirectBranch, InsertElement, InsertValue, Load, Phi,
    Return, Select, ShuffleVector, Store, Switch, SwitchOld, VoidCall,
};

/// Visitor over a function's blocks.
pub trait FunctionVisitor {
    fn visit_block(&mut self, block: &Block);
}

/// Visitor over instructions, dispatched per variant.
pub trait InstructionVisitor {
    fn visit_allocate(&mut self, allocate: &Allocate) {
        let _ = allocate;
    }

    fn visit_binary(&mut self, binary: &BinaryOperation) {
        let _ = binary;
    }

    fn visit_branch(&mut self, branch: &Branch) {
        let _ = branch;
    }

    fn visit_call(&mut self, call: &Call) {
        let _ = call;
    }

    fn visit_cast(&mut self, cast: &Cast) {
        let _ = cast;
    }

    fn visit_compare(&mut self, compare: &Compare) {
        let _ = compare;
    }

    fn visit_conditional_branch(&mut self, branch: &ConditionalBranch) {
        let _ = branch;
    }

    fn visit_extract_element(&mut self, extract: &ExtractElement) {
        let _ = extract;
    }

    fn visit_extract_value(&mut self, extract: &ExtractValue) {
        let _ = extract;
    }

    fn visit_get_element_pointer(&mut self, gep: &GetElementPointer) {
        let _ = gep;
    }

    fn visit_indirect_branch(&mut self, branch: &IndirectBranch) {
        let _ = branch;
    }

    fn visit_insert_element(&mut self, insert: &InsertElement) {
        let _ = insert;
    }

    fn visit_insert_value(&mut self, insert: &InsertValue) {
        let _ = insert;
    }

    fn visit_load(&mut self, load: &Load) {
        let _ = load;
    }

    fn visit_phi(&mut self, phi: &Phi) {
        let _ = phi;
    }

    fn visit_return(&mut self, ret: &Return) {
        let _ = ret;
    }

    fn visit_select(&mut self, select: &Select) {
        let _ = select;
    }

    fn visit_shuffle_vector(&mut self, shuffle: &ShuffleVector) {
        let _ = shuffle;
    }

    fn visit_store(&mut self, store: &Store) {
        let _ = store;
    }

    fn visit_switch(&mut self, switch: &Switch) {
        let _ = switch;
    }

    fn visit_switch_old(&mut self, switch: &SwitchOld) {
        let _ = switch;
    }

    fn visit_unreachable(&mut self) {}

    fn visit_void_call(&mut self, call: &VoidCall) {
        let _ = call;
    }
}
