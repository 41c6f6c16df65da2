use super::*;
use crate::function::FunctionReference;

fn i32t() -> TypeRef {
    TypeRef::integer(32)
}

/// Function with `params` i32 parameters, `constants` small integer
/// constants after them, and `blocks` allocated blocks.
fn build_function(params: usize, constants: usize, blocks: u32) -> FunctionDefinition {
    let param_types = (0..params).map(|_| i32t()).collect();
    let mut function = FunctionDefinition::new(TypeRef::function(i32t(), param_types, false));
    for _ in 0..params {
        function.create_parameter(i32t());
    }
    for value in 0..constants {
        function.create_integer(i32t(), value as i64);
    }
    function.allocate_blocks(blocks).unwrap();
    function
}

#[test]
fn test_binary_operation_decodes_operator_and_flags() {
    let mut function = build_function(2, 0, 1);
    {
        let mut builder = function.generate_block().unwrap();
        builder.create_binary_operation(i32t(), 0, 0b11, 0, 1).unwrap();
        builder.create_return();
    }

    let block = function.block(0).unwrap();
    let Instruction::Binary(binary) = block.instruction(0).unwrap() else {
        panic!("expected binary operation");
    };
    assert_eq!(binary.operator, BinaryOperator::Add);
    assert_eq!(binary.flags, vec![Flag::NoUnsignedWrap, Flag::NoSignedWrap]);
    assert_eq!(binary.lhs, SymbolId::table(0));
    assert_eq!(binary.rhs, SymbolId::table(1));
}

#[test]
fn test_failed_decode_leaves_no_symbol_behind() {
    let mut function = build_function(1, 0, 1);
    let before = function.symbols().len();
    {
        let mut builder = function.generate_block().unwrap();
        assert!(builder.create_binary_operation(i32t(), 40, 0, 0, 0).is_err());
        assert!(builder.create_cast(i32t(), 13, 0).is_err());
        assert!(builder.create_compare(TypeRef::integer(1), 50, 0, 0).is_err());
        builder.create_return();
    }
    assert_eq!(function.symbols().len(), before);
    assert_eq!(function.block(0).unwrap().instruction_count(), 1);
}

#[test]
fn test_store_is_void() {
    let mut function = build_function(2, 0, 1);
    let before = function.symbols().len();
    {
        let mut builder = function.generate_block().unwrap();
        builder.create_store(0, 1, 8, true);
        builder.create_return();
    }

    assert_eq!(function.symbols().len(), before);
    let block = function.block(0).unwrap();
    let Instruction::Store(store) = block.instruction(0).unwrap() else {
        panic!("expected store");
    };
    assert_eq!(store.destination, SymbolId::table(0));
    assert_eq!(store.source, SymbolId::table(1));
    assert_eq!(store.align, 8);
    assert!(store.volatile);
}

#[test]
fn test_load_registers_a_value_symbol() {
    let mut function = build_function(1, 0, 1);
    {
        let mut builder = function.generate_block().unwrap();
        builder.create_load(i32t(), 0, 4, false);
        builder.create_return_value(1);
    }

    assert_eq!(
        function.symbols().entry(1),
        Some(&Symbol::Instruction {
            block: BlockId::new(0),
            index: 0
        })
    );
    let block = function.block(0).unwrap();
    let Instruction::Return(ret) = block.instruction(1).unwrap() else {
        panic!("expected return");
    };
    assert_eq!(ret.value, Some(SymbolId::table(1)));
}

#[test]
fn test_allocation_resolves_count_through_symbols() {
    let mut function = build_function(0, 1, 1);
    {
        let mut builder = function.generate_block().unwrap();
        builder.create_allocation(TypeRef::pointer(i32t()), 0, 16);
        builder.create_return();
    }

    let block = function.block(0).unwrap();
    let Instruction::Allocate(allocate) = block.instruction(0).unwrap() else {
        panic!("expected allocation");
    };
    assert_eq!(allocate.count, SymbolId::table(0));
    assert_eq!(allocate.align, 16);
}

#[test]
fn test_get_element_pointer_operands() {
    let mut function = build_function(1, 2, 1);
    {
        let mut builder = function.generate_block().unwrap();
        builder.create_get_element_pointer(TypeRef::pointer(i32t()), 0, &[1, 2], true);
        builder.create_return();
    }

    let block = function.block(0).unwrap();
    let Instruction::GetElementPointer(gep) = block.instruction(0).unwrap() else {
        panic!("expected gep");
    };
    assert_eq!(gep.base, SymbolId::table(0));
    assert_eq!(gep.indices, vec![SymbolId::table(1), SymbolId::table(2)]);
    assert!(gep.inbounds);
}

#[test]
fn test_extract_forms_keep_index_asymmetry() {
    let vec4 = TypeRef::vector(i32t(), 4);
    let mut function = build_function(1, 1, 1);
    {
        let mut builder = function.generate_block().unwrap();
        // Element index is a symbol reference...
        builder.create_extract_element(i32t(), 0, 1);
        // ...while the aggregate member index is a literal.
        builder.create_extract_value(i32t(), 0, 1);
        builder.create_insert_element(vec4.clone(), 0, 1, 0);
        builder.create_insert_value(vec4, 0, 1, 0);
        builder.create_return();
    }

    let block = function.block(0).unwrap();
    let Instruction::ExtractElement(element) = block.instruction(0).unwrap() else {
        panic!("expected extractelement");
    };
    assert_eq!(element.index, SymbolId::table(1));

    let Instruction::ExtractValue(value) = block.instruction(1).unwrap() else {
        panic!("expected extractvalue");
    };
    assert_eq!(value.index, 1);

    let Instruction::InsertValue(insert) = block.instruction(3).unwrap() else {
        panic!("expected insertvalue");
    };
    assert_eq!(insert.index, 1);
    assert_eq!(insert.value, SymbolId::table(0));
}

#[test]
fn test_conditional_branch_targets() {
    let mut function = build_function(1, 0, 3);
    {
        let mut builder = function.generate_block().unwrap();
        builder.create_conditional_branch(0, 1, 2).unwrap();
    }

    let block = function.block(0).unwrap();
    let Instruction::ConditionalBranch(branch) = block.instruction(0).unwrap() else {
        panic!("expected conditional branch");
    };
    assert_eq!(branch.condition, SymbolId::table(0));
    assert_eq!(branch.true_target, BlockId::new(1));
    assert_eq!(branch.false_target, BlockId::new(2));
}

#[test]
fn test_branch_target_out_of_range() {
    let mut function = build_function(0, 0, 1);
    let mut builder = function.generate_block().unwrap();
    assert_eq!(
        builder.create_branch(4),
        Err(ModelError::IndexOutOfRange { index: 4, count: 1 })
    );
}

#[test]
fn test_indirect_branch_successors() {
    let mut function = build_function(1, 0, 3);
    {
        let mut builder = function.generate_block().unwrap();
        builder.create_indirect_branch(0, &[1, 2]).unwrap();
    }

    let block = function.block(0).unwrap();
    let Instruction::IndirectBranch(branch) = block.instruction(0).unwrap() else {
        panic!("expected indirect branch");
    };
    assert_eq!(branch.address, SymbolId::table(0));
    assert_eq!(branch.successors, vec![BlockId::new(1), BlockId::new(2)]);
}

#[test]
fn test_indirect_branch_rejects_bad_successor() {
    let mut function = build_function(1, 0, 2);
    let mut builder = function.generate_block().unwrap();
    assert_eq!(
        builder.create_indirect_branch(0, &[1, 7]),
        Err(ModelError::IndexOutOfRange { index: 7, count: 2 })
    );
}

#[test]
fn test_phi_arity_mismatch_is_rejected() {
    let mut function = build_function(1, 0, 2);
    let mut builder = function.generate_block().unwrap();
    assert!(matches!(
        builder.create_phi(i32t(), &[0, 0], &[0]),
        Err(ModelError::ProtocolViolation { .. })
    ));
}

#[test]
fn test_switch_keeps_cases_aimed_at_default() {
    let mut function = build_function(1, 2, 2);
    {
        let mut builder = function.generate_block().unwrap();
        // Both cases target the default block; stored unchanged.
        builder.create_switch(0, 1, &[1, 2], &[1, 1]).unwrap();
    }

    let block = function.block(0).unwrap();
    let Instruction::Switch(switch) = block.instruction(0).unwrap() else {
        panic!("expected switch");
    };
    assert_eq!(switch.condition, SymbolId::table(0));
    assert_eq!(switch.default, BlockId::new(1));
    assert_eq!(switch.cases.len(), 2);
    assert_eq!(switch.cases[0].value, SymbolId::table(1));
    assert_eq!(switch.cases[0].target, BlockId::new(1));
    assert_eq!(switch.cases[1].value, SymbolId::table(2));
    assert_eq!(switch.cases[1].target, BlockId::new(1));
}

#[test]
fn test_switch_old_keeps_raw_constants() {
    let mut function = build_function(1, 0, 2);
    {
        let mut builder = function.generate_block().unwrap();
        builder
            .create_switch_old(0, 1, &[10, u64::MAX], &[1, 1])
            .unwrap();
    }

    let block = function.block(0).unwrap();
    let Instruction::SwitchOld(switch) = block.instruction(0).unwrap() else {
        panic!("expected legacy switch");
    };
    assert_eq!(switch.cases[0].value, 10);
    assert_eq!(switch.cases[1].value, u64::MAX);
    // No constant symbols were minted for the raw case values.
    assert_eq!(function.symbols().len(), 1);
}

#[test]
fn test_select_and_shuffle_operands() {
    let mut function = build_function(3, 0, 1);
    {
        let mut builder = function.generate_block().unwrap();
        builder.create_select(i32t(), 0, 1, 2);
        builder.create_shuffle_vector(TypeRef::vector(i32t(), 4), 0, 1, 2);
        builder.create_return();
    }

    let block = function.block(0).unwrap();
    let Instruction::Select(select) = block.instruction(0).unwrap() else {
        panic!("expected select");
    };
    assert_eq!(
        (select.condition, select.true_value, select.false_value),
        (SymbolId::table(0), SymbolId::table(1), SymbolId::table(2))
    );

    let Instruction::ShuffleVector(shuffle) = block.instruction(1).unwrap() else {
        panic!("expected shufflevector");
    };
    assert_eq!(shuffle.mask, SymbolId::table(2));
}

#[test]
fn test_call_with_arguments() {
    let callee_type = TypeRef::function(i32t(), vec![i32t(), i32t()], false);
    let mut function = build_function(2, 0, 1);
    function.define_symbol(Symbol::Function(FunctionReference::new(callee_type))); // symbol 2
    {
        let mut builder = function.generate_block().unwrap();
        builder.create_call(i32t(), 2, &[0, 1]); // symbol 3
        builder.create_return_value(3);
    }

    let block = function.block(0).unwrap();
    let Instruction::Call(call) = block.instruction(0).unwrap() else {
        panic!("expected call");
    };
    assert_eq!(call.target, SymbolId::table(2));
    assert_eq!(call.arguments, vec![SymbolId::table(0), SymbolId::table(1)]);
    assert_eq!(
        function.symbols().entry(3),
        Some(&Symbol::Instruction {
            block: BlockId::new(0),
            index: 0
        })
    );
}

#[test]
fn test_forward_operand_patched_in_void_instruction() {
    let mut function = build_function(1, 0, 1);
    {
        let mut builder = function.generate_block().unwrap();
        // Store a value that only exists later.
        builder.create_store(0, 1, 4, false);
        builder.create_load(i32t(), 0, 4, false); // symbol 1
        builder.create_return();
    }
    function.exit_function().unwrap();

    let block = function.block(0).unwrap();
    let Instruction::Store(store) = block.instruction(0).unwrap() else {
        panic!("expected store");
    };
    assert!(!store.source.is_forward());
    assert_eq!(store.source, SymbolId::table(1));
}

#[test]
fn test_stream_markers_change_nothing() {
    let mut function = build_function(0, 0, 1);
    {
        let mut builder = function.generate_block().unwrap();
        builder.enter_block(0);
        builder.create_unreachable();
        builder.exit_block();
    }
    let block = function.block(0).unwrap();
    assert_eq!(block.instruction_count(), 1);
    assert!(matches!(
        block.instruction(0),
        Some(Instruction::Unreachable)
    ));
}
