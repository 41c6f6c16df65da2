//! Function definitions.
//!
//! A [`FunctionDefinition`] owns its parameters, its block array, and its
//! symbol table, and implements the builder protocol a bitcode reader
//! drives: parameters first, then block allocation, then one
//! [`generate_block`](FunctionDefinition::generate_block) per block in
//! index order, with constant-expression creation allowed between block
//! emissions, then naming, then
//! [`exit_function`](FunctionDefinition::exit_function).

use tracing::{instrument, warn};

use crate::block::{Block, BlockId};
use crate::builder::InstructionBuilder;
use crate::constant::Constant;
use crate::error::ModelError;
use crate::name::Name;
use crate::ops::{BinaryOperator, CastOperator, CompareOperator};
use crate::symbols::{to_u32, Holder, Symbol, SymbolId, SymbolTable};
use crate::types::TypeRef;
use crate::visitor::FunctionVisitor;

/// A typed, positional function parameter.
///
/// Parameters occupy the first slots of the symbol table, in declaration
/// order.
#[derive(Clone, Debug, PartialEq)]
pub struct FunctionParameter {
    ty: TypeRef,
    index: u32,
    name: Name,
}

impl FunctionParameter {
    pub fn ty(&self) -> &TypeRef {
        &self.ty
    }

    /// Position in the parameter list (and the symbol table).
    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn name(&self) -> &Name {
        &self.name
    }

    pub(crate) fn set_name(&mut self, name: impl Into<String>) {
        self.name.set(name);
    }
}

/// A callable function symbol in the symbol table.
///
/// Stands in for a module-level function (or the enclosing definition
/// itself, for block-address constants): the module model proper is
/// outside this crate, so the driver seeds these through
/// [`FunctionDefinition::define_symbol`].
#[derive(Clone, Debug, PartialEq)]
pub struct FunctionReference {
    ty: TypeRef,
    name: Name,
}

impl FunctionReference {
    /// Create a reference to a callable of the given function type.
    ///
    /// # Panics
    /// Panics if `function_type` is not a function type.
    pub fn new(function_type: TypeRef) -> Self {
        assert!(
            function_type.is_function(),
            "function reference requires a function type, got {function_type}"
        );
        FunctionReference {
            ty: TypeRef::pointer(function_type),
            name: Name::Unknown,
        }
    }

    /// The value type: pointer to the function type.
    pub fn ty(&self) -> &TypeRef {
        &self.ty
    }

    pub fn name(&self) -> &Name {
        &self.name
    }

    /// Set the function's name, decorated with the `@` prefix.
    pub fn set_name(&mut self, name: &str) {
        self.name.set(format!("@{name}"));
    }

    pub(crate) fn set_raw_name(&mut self, name: impl Into<String>) {
        self.name.set(name);
    }
}

/// Where a `set_symbol_name` call has to deliver the name; computed
/// before mutating so the table borrow is released.
enum NameTarget {
    Parameter(u32),
    Instruction(BlockId, u32),
    Function,
}

/// A function body under construction or finished.
#[derive(Debug)]
pub struct FunctionDefinition {
    function_type: TypeRef,
    value_type: TypeRef,
    name: Name,
    parameters: Vec<FunctionParameter>,
    blocks: Vec<Block>,
    symbols: SymbolTable,
    current_block: u32,
}

impl FunctionDefinition {
    /// Create an empty definition for the given function type.
    ///
    /// # Panics
    /// Panics if `function_type` is not a function type.
    pub fn new(function_type: TypeRef) -> Self {
        assert!(
            function_type.is_function(),
            "function definition requires a function type, got {function_type}"
        );
        let value_type = TypeRef::pointer(function_type.clone());
        FunctionDefinition {
            function_type,
            value_type,
            name: Name::Unknown,
            parameters: Vec::new(),
            blocks: Vec::new(),
            symbols: SymbolTable::new(),
            current_block: 0,
        }
    }

    // -- Builder protocol --

    /// Append a parameter of the given type.
    ///
    /// The parameter's position defines its index in both the parameter
    /// list and the symbol table.
    pub fn create_parameter(&mut self, ty: TypeRef) {
        let index = to_u32(self.parameters.len(), "parameters");
        self.parameters.push(FunctionParameter {
            ty,
            index,
            name: Name::Unknown,
        });
        self.define_symbol(Symbol::Parameter { index });
    }

    /// Allocate the block array up front. Block 0 becomes the entry
    /// block and is named to the empty string.
    #[instrument(level = "trace", skip(self))]
    pub fn allocate_blocks(&mut self, count: u32) -> Result<(), ModelError> {
        if count == 0 {
            return Err(ModelError::protocol(
                "allocate-blocks requires at least an entry block",
            ));
        }
        self.blocks = (0..count).map(|i| Block::new(BlockId::new(i))).collect();
        self.blocks[0].set_name("");
        self.current_block = 0;
        Ok(())
    }

    /// Open the next unopened block for instruction emission.
    ///
    /// Blocks are emitted strictly in index order; calling more often
    /// than blocks were allocated is a protocol violation.
    pub fn generate_block(&mut self) -> Result<InstructionBuilder<'_>, ModelError> {
        if self.blocks.is_empty() {
            return Err(ModelError::protocol("generate-block before allocate-blocks"));
        }
        if (self.current_block as usize) >= self.blocks.len() {
            return Err(ModelError::protocol(format!(
                "all {} allocated blocks have already been generated",
                self.blocks.len()
            )));
        }
        let block = BlockId::new(self.current_block);
        self.current_block += 1;
        Ok(InstructionBuilder::new(self, block))
    }

    /// Finish construction: verify every forward reference resolved,
    /// then assign numeric names to every still-anonymous block and
    /// value instruction.
    ///
    /// One counter serves both, starting at 1 (zero would collide with
    /// the entry block's implicit name in downstream consumers) and
    /// advancing in traversal order: blocks by index, instructions in
    /// insertion order within each block.
    #[instrument(level = "trace", skip(self))]
    pub fn exit_function(&mut self) -> Result<(), ModelError> {
        if let Some(index) = self.symbols.first_unresolved() {
            return Err(ModelError::UnresolvedForwardReference { index });
        }

        let mut identifier: u32 = 1;
        for block in &mut self.blocks {
            if block.name().is_unknown() {
                block.set_name(identifier.to_string());
                identifier += 1;
            }
            for instruction in block.instructions_mut() {
                if instruction.name().is_some_and(Name::is_unknown) {
                    instruction.set_name(identifier.to_string());
                    identifier += 1;
                }
            }
        }
        Ok(())
    }

    /// Set the function's own name, decorated with the `@` prefix.
    pub fn set_name(&mut self, name: &str) {
        self.name.set(format!("@{name}"));
    }

    /// Name a block from the value symbol table.
    pub fn name_block(&mut self, index: u32, name: &str) -> Result<(), ModelError> {
        let id = self.block_id(index)?;
        self.blocks[id.index()].set_name(name);
        Ok(())
    }

    /// Name a symbol-table entry from the value symbol table.
    pub fn name_entry(&mut self, index: u32, name: &str) {
        self.set_symbol_name(index, name);
    }

    /// Name a symbol-table entry from a function-level symbol table
    /// record. `offset` is part of the record layout and plays no role
    /// here.
    pub fn name_function(&mut self, index: u32, offset: u32, name: &str) {
        let _ = offset;
        self.set_symbol_name(index, name);
    }

    fn set_symbol_name(&mut self, index: u32, name: &str) {
        let target = match self.symbols.entry(index) {
            Some(Symbol::Parameter { index }) => NameTarget::Parameter(*index),
            Some(Symbol::Instruction { block, index }) => {
                NameTarget::Instruction(*block, *index)
            }
            Some(Symbol::Function(_)) => NameTarget::Function,
            // Constants carry no name.
            Some(Symbol::Constant(_)) => return,
            None => {
                warn!(index, "naming a symbol slot that was never filled");
                return;
            }
        };
        match target {
            NameTarget::Parameter(p) => self.parameters[p as usize].set_name(name),
            NameTarget::Instruction(block, i) => {
                if let Some(instruction) = self.blocks[block.index()].instruction_mut(i) {
                    instruction.set_name(name);
                }
            }
            NameTarget::Function => {
                if let Some(Symbol::Function(function)) =
                    self.symbols.entry_mut(SymbolId::table(index))
                {
                    function.set_raw_name(name);
                }
            }
        }
    }

    // -- Constant expressions --
    //
    // These land in the symbol table only; they may arrive between block
    // emissions. Operand lookups register the constant's own (not yet
    // appended) slot as holder: lookups never advance the fill cursor,
    // so the reserved index is the one the append below lands on.

    pub fn create_integer(&mut self, ty: TypeRef, value: i64) {
        self.define_symbol(Symbol::Constant(Constant::Integer { ty, value }));
    }

    /// Floating-point constant from its raw bit pattern.
    pub fn create_floating_point(&mut self, ty: TypeRef, bits: u64) {
        self.define_symbol(Symbol::Constant(Constant::FloatingPoint { ty, bits }));
    }

    pub fn create_null(&mut self, ty: TypeRef) {
        self.define_symbol(Symbol::Constant(Constant::Null { ty }));
    }

    pub fn create_undefined(&mut self, ty: TypeRef) {
        self.define_symbol(Symbol::Constant(Constant::Undefined { ty }));
    }

    /// String constant; `c_string` marks the NUL-terminated form.
    pub fn create_from_string(&mut self, ty: TypeRef, value: &str, c_string: bool) {
        self.define_symbol(Symbol::Constant(Constant::String {
            ty,
            value: value.to_owned(),
            c_string,
        }));
    }

    /// Aggregate constant from a raw scalar data record.
    pub fn create_from_data(&mut self, ty: TypeRef, data: &[i64]) {
        self.define_symbol(Symbol::Constant(Constant::AggregateData {
            ty,
            data: data.to_vec(),
        }));
    }

    /// Aggregate constant over previously defined constants.
    ///
    /// Every index must already resolve to a constant; anything else is
    /// a [`ModelError::TypeMismatch`].
    pub fn create_from_values(&mut self, ty: TypeRef, values: &[u32]) -> Result<(), ModelError> {
        let elements = self.symbols.constants(values)?;
        self.define_symbol(Symbol::Constant(Constant::Aggregate { ty, elements }));
        Ok(())
    }

    /// Binary constant expression.
    ///
    /// The operator table is selected from the result type, exactly as
    /// for the instruction form.
    pub fn create_binary_expression(
        &mut self,
        ty: TypeRef,
        opcode: u32,
        lhs: u32,
        rhs: u32,
    ) -> Result<(), ModelError> {
        let operator = BinaryOperator::decode(opcode, ty.is_float_or_float_vector())
            .ok_or_else(|| ModelError::protocol(format!("unknown binary opcode {opcode}")))?;
        let holder = self.expression_holder();
        let lhs = self.symbols.lookup_for(lhs, holder);
        let rhs = self.symbols.lookup_for(rhs, holder);
        self.define_symbol(Symbol::Constant(Constant::BinaryExpression {
            ty,
            operator,
            lhs,
            rhs,
        }));
        Ok(())
    }

    /// Compare constant expression.
    pub fn create_compare_expression(
        &mut self,
        ty: TypeRef,
        opcode: u32,
        lhs: u32,
        rhs: u32,
    ) -> Result<(), ModelError> {
        let operator = CompareOperator::decode(opcode)
            .ok_or_else(|| ModelError::protocol(format!("unknown compare opcode {opcode}")))?;
        let holder = self.expression_holder();
        let lhs = self.symbols.lookup_for(lhs, holder);
        let rhs = self.symbols.lookup_for(rhs, holder);
        self.define_symbol(Symbol::Constant(Constant::CompareExpression {
            ty,
            operator,
            lhs,
            rhs,
        }));
        Ok(())
    }

    /// Cast constant expression. Cast opcodes decode from a single,
    /// type-agnostic table.
    pub fn create_cast_expression(
        &mut self,
        ty: TypeRef,
        opcode: u32,
        value: u32,
    ) -> Result<(), ModelError> {
        let operator = CastOperator::decode(opcode)
            .ok_or_else(|| ModelError::protocol(format!("unknown cast opcode {opcode}")))?;
        let holder = self.expression_holder();
        let value = self.symbols.lookup_for(value, holder);
        self.define_symbol(Symbol::Constant(Constant::CastExpression {
            ty,
            operator,
            value,
        }));
        Ok(())
    }

    /// Get-element-pointer constant expression.
    pub fn create_get_element_pointer_expression(
        &mut self,
        ty: TypeRef,
        pointer: u32,
        indices: &[u32],
        inbounds: bool,
    ) {
        let holder = self.expression_holder();
        let base = self.symbols.lookup_for(pointer, holder);
        let indices = indices
            .iter()
            .map(|&index| self.symbols.lookup_for(index, holder))
            .collect();
        self.define_symbol(Symbol::Constant(Constant::GetElementPointer {
            ty,
            base,
            indices,
            inbounds,
        }));
    }

    /// Block-address constant: the function symbol at `function` paired
    /// with the block at `block`.
    pub fn create_block_address(
        &mut self,
        ty: TypeRef,
        function: u32,
        block: u32,
    ) -> Result<(), ModelError> {
        let block = self.block_id(block)?;
        let holder = self.expression_holder();
        let function = self.symbols.lookup_for(function, holder);
        self.define_symbol(Symbol::Constant(Constant::BlockAddress {
            ty,
            function,
            block,
        }));
        Ok(())
    }

    /// Holder id for the constant expression about to be appended.
    fn expression_holder(&self) -> Holder {
        Holder::Symbol(SymbolId::table(self.symbols.next_index()))
    }

    // -- Symbol plumbing --

    /// Append a symbol to the table, resolving any forward reference
    /// registered against its slot.
    ///
    /// This is also the seeding point for module-level symbols (function
    /// references for calls and block addresses) that the enclosing
    /// module model hands into the per-function index space.
    pub fn define_symbol(&mut self, symbol: Symbol) -> SymbolId {
        let (id, resolved) = self.symbols.append(symbol);
        if let Some((placeholder, holders)) = resolved {
            self.patch_holders(placeholder, id, holders);
        }
        id
    }

    /// Rewrite the placeholder in every registered holder, in
    /// registration order.
    fn patch_holders(&mut self, original: SymbolId, replacement: SymbolId, holders: Vec<Holder>) {
        for holder in holders {
            match holder {
                Holder::Symbol(id) => {
                    if let Some(entry) = self.symbols.entry_mut(id) {
                        entry.replace(original, replacement);
                    }
                }
                Holder::Instruction { block, index } => {
                    if let Some(instruction) =
                        self.blocks[block.index()].instruction_mut(index)
                    {
                        instruction.replace(original, replacement);
                    }
                }
            }
        }
    }

    // -- Consumers --

    /// The function's name (with its `@` prefix once set).
    pub fn name(&self) -> &Name {
        &self.name
    }

    /// The function's value type: pointer to its function type.
    ///
    /// Calls and block-address constants that reference the function see
    /// this type, per the usual convention that a function symbol is a
    /// pointer to code.
    pub fn ty(&self) -> &TypeRef {
        &self.value_type
    }

    /// The underlying function type (return, parameters, varargs).
    pub fn function_type(&self) -> &TypeRef {
        &self.function_type
    }

    pub fn parameters(&self) -> &[FunctionParameter] {
        &self.parameters
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    /// The block at `index`.
    pub fn block(&self, index: u32) -> Result<&Block, ModelError> {
        let id = self.block_id(index)?;
        Ok(&self.blocks[id.index()])
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn block_count(&self) -> u32 {
        to_u32(self.blocks.len(), "blocks")
    }

    /// A function reference naming this definition, for seeding the
    /// symbol table of a function that takes this one's block address or
    /// calls it.
    pub fn reference(&self) -> FunctionReference {
        FunctionReference {
            ty: self.value_type.clone(),
            name: self.name.clone(),
        }
    }

    /// Resolve a symbol handle to the type of its value.
    ///
    /// Placeholders have no type until resolution; void instructions
    /// have none at all.
    pub fn symbol_type(&self, id: SymbolId) -> Option<&TypeRef> {
        match self.symbols.symbol(id)? {
            Symbol::Parameter { index } => {
                self.parameters.get(*index as usize).map(FunctionParameter::ty)
            }
            Symbol::Instruction { block, index } => self
                .blocks
                .get(block.index())?
                .instruction(*index)?
                .value_type(),
            Symbol::Constant(constant) => Some(constant.ty()),
            Symbol::Function(function) => Some(function.ty()),
        }
    }

    /// Visit each block in index order.
    pub fn accept(&self, visitor: &mut dyn FunctionVisitor) {
        for block in &self.blocks {
            visitor.visit_block(block);
        }
    }

    // -- Internal access for the instruction builder --

    pub(crate) fn block_id(&self, index: u32) -> Result<BlockId, ModelError> {
        if (index as usize) < self.blocks.len() {
            Ok(BlockId::new(index))
        } else {
            Err(ModelError::IndexOutOfRange {
                index,
                count: to_u32(self.blocks.len(), "blocks"),
            })
        }
    }

    pub(crate) fn block_by_id(&self, id: BlockId) -> &Block {
        &self.blocks[id.index()]
    }

    pub(crate) fn block_by_id_mut(&mut self, id: BlockId) -> &mut Block {
        &mut self.blocks[id.index()]
    }

    pub(crate) fn symbols_mut(&mut self) -> &mut SymbolTable {
        &mut self.symbols
    }
}
