use super::*;
use crate::ops::BinaryOperator;

fn sample_store() -> Instruction {
    Instruction::Store(Store {
        destination: SymbolId::table(0),
        source: SymbolId::table(1),
        align: 4,
        volatile: false,
    })
}

fn sample_binary() -> Instruction {
    Instruction::Binary(BinaryOperation {
        ty: TypeRef::integer(32),
        operator: BinaryOperator::Add,
        flags: vec![],
        lhs: SymbolId::table(0),
        rhs: SymbolId::table(1),
        name: Name::Unknown,
    })
}

#[test]
fn test_value_classification() {
    assert!(sample_binary().is_value());
    assert!(!sample_store().is_value());
    assert!(!Instruction::Unreachable.is_value());
    assert!(!Instruction::Return(Return { value: None }).is_value());

    let void_call = Instruction::VoidCall(VoidCall {
        target: SymbolId::table(0),
        arguments: vec![],
    });
    assert!(!void_call.is_value());
}

#[test]
fn test_value_type() {
    let ty = TypeRef::integer(32);
    let load = Instruction::Load(Load {
        ty: ty.clone(),
        source: SymbolId::table(0),
        align: 4,
        volatile: false,
        name: Name::Unknown,
    });
    assert_eq!(load.value_type(), Some(&ty));
    assert_eq!(sample_store().value_type(), None);
}

#[test]
fn test_void_instructions_are_nameless() {
    let mut store = sample_store();
    assert_eq!(store.name(), None);
    // Naming a void instruction is ignored.
    store.set_name("7");
    assert_eq!(store.name(), None);
}

#[test]
fn test_set_name_on_value_instruction() {
    let mut binary = sample_binary();
    assert!(binary.name().is_some_and(Name::is_unknown));
    binary.set_name("3");
    assert_eq!(binary.name().and_then(Name::as_str), Some("3"));
}

#[test]
fn test_operands_of_call() {
    let call = Instruction::Call(Call {
        ty: TypeRef::integer(32),
        target: SymbolId::table(5),
        arguments: vec![SymbolId::table(0), SymbolId::table(1)],
        name: Name::Unknown,
    });
    assert_eq!(
        call.operands().as_slice(),
        &[SymbolId::table(5), SymbolId::table(0), SymbolId::table(1)]
    );
}

#[test]
fn test_operands_exclude_block_targets_and_literals() {
    let branch = Instruction::Branch(Branch {
        target: BlockId::new(1),
    });
    assert!(branch.operands().is_empty());

    let extract = Instruction::ExtractValue(ExtractValue {
        ty: TypeRef::integer(32),
        aggregate: SymbolId::table(2),
        index: 1,
        name: Name::Unknown,
    });
    assert_eq!(extract.operands().as_slice(), &[SymbolId::table(2)]);
}

#[test]
fn test_operands_of_switch() {
    let switch = Instruction::Switch(Switch {
        condition: SymbolId::table(0),
        default: BlockId::new(1),
        cases: vec![
            SwitchCase {
                value: SymbolId::table(1),
                target: BlockId::new(2),
            },
            SwitchCase {
                value: SymbolId::table(2),
                target: BlockId::new(1),
            },
        ],
    });
    assert_eq!(
        switch.operands().as_slice(),
        &[SymbolId::table(0), SymbolId::table(1), SymbolId::table(2)]
    );
}

#[test]
fn test_replace_patches_phi_cases() {
    let old = SymbolId::forward(0);
    let new = SymbolId::table(3);
    let mut phi = Instruction::Phi(Phi {
        ty: TypeRef::integer(32),
        cases: vec![
            PhiCase {
                value: SymbolId::table(0),
                block: BlockId::new(0),
            },
            PhiCase {
                value: old,
                block: BlockId::new(1),
            },
        ],
        name: Name::Unknown,
    });

    phi.replace(old, new);

    let Instruction::Phi(phi) = &phi else {
        unreachable!()
    };
    assert_eq!(phi.cases[0].value, SymbolId::table(0));
    assert_eq!(phi.cases[1].value, new);
}

#[test]
fn test_replace_is_noop_without_matching_operand() {
    let mut store = sample_store();
    let before = store.clone();
    store.replace(SymbolId::forward(9), SymbolId::table(9));
    assert_eq!(store, before);
}

#[test]
fn test_replace_patches_return_value() {
    let old = SymbolId::forward(1);
    let new = SymbolId::table(2);
    let mut ret = Instruction::Return(Return { value: Some(old) });
    ret.replace(old, new);
    assert_eq!(ret, Instruction::Return(Return { value: Some(new) }));
}
