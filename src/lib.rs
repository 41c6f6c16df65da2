//! In-memory model of LLVM IR function bodies.
//!
//! This crate contains the data structures a bitcode reader assembles a
//! function from, and the builder protocol that does the assembling:
//!
//! - `TypeRef` type descriptors (supplied by the reader's type table)
//! - Operator enums with bitcode opcode decoding
//! - The `Symbol` hierarchy: constants, parameters, value instructions,
//!   blocks, functions — uniformly addressable as operands
//! - A per-function `SymbolTable` with forward-reference support
//! - `Block` and the full `Instruction` variant set
//! - `FunctionDefinition`, which owns everything and implements the
//!   builder protocol
//! - A read-only visitor surface for downstream consumers
//!
//! # Design Philosophy
//!
//! - **Flatten everything**: operands are `SymbolId(u32)` handles into a
//!   per-function arena, branch targets are `BlockId(u32)` handles into
//!   the block array. No owning references between symbols, so phi nodes
//!   and block addresses may form reference cycles freely.
//! - **Forward references are first-class**: the stream may reference a
//!   symbol defined later in the same function; the table hands out a
//!   placeholder and patches every holder when the slot fills. No
//!   placeholder survives a successful `exit_function`.
//! - **The stream is trusted but checked**: protocol violations and
//!   malformed references surface as `ModelError`, and all of them abort
//!   the build.
//!
//! Construction is strictly single-threaded per function; finished
//! functions are independent of each other.

mod block;
mod builder;
mod constant;
mod error;
mod function;
mod instruction;
mod name;
mod ops;
mod symbols;
mod types;
pub mod visitor;

pub use block::{Block, BlockId};
pub use builder::InstructionBuilder;
pub use constant::Constant;
pub use error::ModelError;
pub use function::{FunctionDefinition, FunctionParameter, FunctionReference};
pub use instruction::{
    Allocate, BinaryOperation, Branch, Call, Cast, Compare, ConditionalBranch, ExtractElement,
    ExtractValue, GetElementPointer, IndirectBranch, InsertElement, InsertValue, Instruction,
    Load, Phi, PhiCase, Return, Select, ShuffleVector, Store, Switch, SwitchCase, SwitchOld,
    SwitchOldCase, VoidCall,
};
pub use name::Name;
pub use ops::{BinaryOperator, CastOperator, CompareOperator, Flag};
pub use symbols::{Holder, Symbol, SymbolId, SymbolTable};
pub use types::{FloatKind, TypeKind, TypeRef};
pub use visitor::{FunctionVisitor, InstructionVisitor};
