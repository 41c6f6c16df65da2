use super::*;

#[test]
fn test_binary_decode_integer_table() {
    assert_eq!(BinaryOperator::decode(0, false), Some(BinaryOperator::Add));
    assert_eq!(BinaryOperator::decode(4, false), Some(BinaryOperator::SDiv));
    assert_eq!(BinaryOperator::decode(9, false), Some(BinaryOperator::AShr));
    assert_eq!(BinaryOperator::decode(12, false), Some(BinaryOperator::Xor));
    assert_eq!(BinaryOperator::decode(13, false), None);
}

#[test]
fn test_binary_decode_floating_table() {
    assert_eq!(BinaryOperator::decode(0, true), Some(BinaryOperator::FAdd));
    assert_eq!(BinaryOperator::decode(2, true), Some(BinaryOperator::FMul));
    assert_eq!(BinaryOperator::decode(4, true), Some(BinaryOperator::FDiv));
    assert_eq!(BinaryOperator::decode(6, true), Some(BinaryOperator::FRem));
    // Division and remainder signedness slots have no floating form.
    assert_eq!(BinaryOperator::decode(3, true), None);
    assert_eq!(BinaryOperator::decode(5, true), None);
    assert_eq!(BinaryOperator::decode(7, true), None);
}

#[test]
fn test_binary_floating_classification() {
    assert!(BinaryOperator::FAdd.is_floating_point());
    assert!(!BinaryOperator::Add.is_floating_point());
    assert!(!BinaryOperator::Xor.is_floating_point());
}

#[test]
fn test_compare_decode_boundaries() {
    assert_eq!(CompareOperator::decode(0), Some(CompareOperator::FpFalse));
    assert_eq!(CompareOperator::decode(1), Some(CompareOperator::FpOrderedEqual));
    assert_eq!(CompareOperator::decode(15), Some(CompareOperator::FpTrue));
    assert_eq!(CompareOperator::decode(16), None);
    assert_eq!(CompareOperator::decode(31), None);
    assert_eq!(CompareOperator::decode(32), Some(CompareOperator::IntEqual));
    assert_eq!(CompareOperator::decode(41), Some(CompareOperator::IntSignedLessOrEqual));
    assert_eq!(CompareOperator::decode(42), None);
}

#[test]
fn test_compare_floating_classification() {
    assert!(CompareOperator::FpOrderedLessThan.is_floating_point());
    assert!(CompareOperator::FpTrue.is_floating_point());
    assert!(!CompareOperator::IntEqual.is_floating_point());
    assert!(!CompareOperator::IntSignedLessOrEqual.is_floating_point());
}

#[test]
fn test_cast_decode() {
    assert_eq!(CastOperator::decode(0), Some(CastOperator::Trunc));
    assert_eq!(CastOperator::decode(1), Some(CastOperator::ZeroExtend));
    assert_eq!(CastOperator::decode(11), Some(CastOperator::Bitcast));
    assert_eq!(CastOperator::decode(12), Some(CastOperator::AddressSpaceCast));
    assert_eq!(CastOperator::decode(13), None);
}

#[test]
fn test_flag_decode_wrap_group() {
    assert_eq!(
        Flag::decode(BinaryOperator::Add, 0b11),
        vec![Flag::NoUnsignedWrap, Flag::NoSignedWrap]
    );
    assert_eq!(Flag::decode(BinaryOperator::Mul, 0b10), vec![Flag::NoSignedWrap]);
    assert_eq!(Flag::decode(BinaryOperator::Shl, 0), Vec::<Flag>::new());
}

#[test]
fn test_flag_decode_exact_group() {
    assert_eq!(Flag::decode(BinaryOperator::SDiv, 0b1), vec![Flag::Exact]);
    assert_eq!(Flag::decode(BinaryOperator::LShr, 0b1), vec![Flag::Exact]);
    // Only bit 0 counts for this group.
    assert_eq!(Flag::decode(BinaryOperator::AShr, 0b10), Vec::<Flag>::new());
}

#[test]
fn test_flag_decode_fast_math_group() {
    assert_eq!(
        Flag::decode(BinaryOperator::FMul, 0b11111),
        vec![
            Flag::Fast,
            Flag::NoNaNs,
            Flag::NoInfs,
            Flag::NoSignedZeros,
            Flag::AllowReciprocal,
        ]
    );
    assert_eq!(Flag::decode(BinaryOperator::FAdd, 0b100), vec![Flag::NoInfs]);
}

#[test]
fn test_flag_decode_flagless_operators() {
    assert_eq!(Flag::decode(BinaryOperator::And, u32::MAX), Vec::<Flag>::new());
    assert_eq!(Flag::decode(BinaryOperator::URem, u32::MAX), Vec::<Flag>::new());
}

#[test]
fn test_mnemonics() {
    assert_eq!(BinaryOperator::LShr.mnemonic(), "lshr");
    assert_eq!(BinaryOperator::FRem.mnemonic(), "frem");
    assert_eq!(CompareOperator::FpOrderedEqual.mnemonic(), "oeq");
    assert_eq!(CompareOperator::IntSignedGreaterThan.mnemonic(), "sgt");
    assert_eq!(CastOperator::ZeroExtend.mnemonic(), "zext");
    assert_eq!(Flag::NoSignedWrap.keyword(), "nsw");
    assert_eq!(Flag::AllowReciprocal.keyword(), "arcp");
}
