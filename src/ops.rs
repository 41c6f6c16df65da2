//! Operator enums and bitcode opcode decoding.
//!
//! The bitcode stream encodes operators as small integers. Binary
//! operators share one opcode space between the integer and floating
//! tables; the caller selects the table from the result type. Compare
//! and cast operators each decode from a single table.
//!
//! `decode` returns `None` for opcodes outside the table; the builder
//! surfaces that as a protocol violation (the stream is malformed).

/// Binary arithmetic and logic operators.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum BinaryOperator {
    // Integer table (opcodes 0-12)
    Add,
    Sub,
    Mul,
    UDiv,
    SDiv,
    URem,
    SRem,
    Shl,
    LShr,
    AShr,
    And,
    Or,
    Xor,
    // Floating table (opcodes 0, 1, 2, 4, 6)
    FAdd,
    FSub,
    FMul,
    FDiv,
    FRem,
}

impl BinaryOperator {
    /// Decode a bitcode binary opcode.
    ///
    /// `floating_point` selects the floating table; it is derived from
    /// the operation's result type (scalar float or vector of floats).
    pub fn decode(opcode: u32, floating_point: bool) -> Option<Self> {
        let operator = if floating_point {
            match opcode {
                0 => BinaryOperator::FAdd,
                1 => BinaryOperator::FSub,
                2 => BinaryOperator::FMul,
                4 => BinaryOperator::FDiv,
                6 => BinaryOperator::FRem,
                _ => return None,
            }
        } else {
            match opcode {
                0 => BinaryOperator::Add,
                1 => BinaryOperator::Sub,
                2 => BinaryOperator::Mul,
                3 => BinaryOperator::UDiv,
                4 => BinaryOperator::SDiv,
                5 => BinaryOperator::URem,
                6 => BinaryOperator::SRem,
                7 => BinaryOperator::Shl,
                8 => BinaryOperator::LShr,
                9 => BinaryOperator::AShr,
                10 => BinaryOperator::And,
                11 => BinaryOperator::Or,
                12 => BinaryOperator::Xor,
                _ => return None,
            }
        };
        Some(operator)
    }

    /// Whether this operator comes from the floating table.
    pub const fn is_floating_point(self) -> bool {
        matches!(
            self,
            BinaryOperator::FAdd
                | BinaryOperator::FSub
                | BinaryOperator::FMul
                | BinaryOperator::FDiv
                | BinaryOperator::FRem
        )
    }

    /// LLVM assembly mnemonic.
    pub const fn mnemonic(self) -> &'static str {
        match self {
            BinaryOperator::Add => "add",
            BinaryOperator::Sub => "sub",
            BinaryOperator::Mul => "mul",
            BinaryOperator::UDiv => "udiv",
            BinaryOperator::SDiv => "sdiv",
            BinaryOperator::URem => "urem",
            BinaryOperator::SRem => "srem",
            BinaryOperator::Shl => "shl",
            BinaryOperator::LShr => "lshr",
            BinaryOperator::AShr => "ashr",
            BinaryOperator::And => "and",
            BinaryOperator::Or => "or",
            BinaryOperator::Xor => "xor",
            BinaryOperator::FAdd => "fadd",
            BinaryOperator::FSub => "fsub",
            BinaryOperator::FMul => "fmul",
            BinaryOperator::FDiv => "fdiv",
            BinaryOperator::FRem => "frem",
        }
    }
}

/// Comparison predicates for `icmp`/`fcmp` (one opcode space:
/// floating predicates at 0-15, integer predicates at 32-41).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum CompareOperator {
    FpFalse,
    FpOrderedEqual,
    FpOrderedGreaterThan,
    FpOrderedGreaterOrEqual,
    FpOrderedLessThan,
    FpOrderedLessOrEqual,
    FpOrderedNotEqual,
    FpOrdered,
    FpUnordered,
    FpUnorderedEqual,
    FpUnorderedGreaterThan,
    FpUnorderedGreaterOrEqual,
    FpUnorderedLessThan,
    FpUnorderedLessOrEqual,
    FpUnorderedNotEqual,
    FpTrue,
    IntEqual,
    IntNotEqual,
    IntUnsignedGreaterThan,
    IntUnsignedGreaterOrEqual,
    IntUnsignedLessThan,
    IntUnsignedLessOrEqual,
    IntSignedGreaterThan,
    IntSignedGreaterOrEqual,
    IntSignedLessThan,
    IntSignedLessOrEqual,
}

impl CompareOperator {
    /// Decode a bitcode comparison predicate.
    pub fn decode(opcode: u32) -> Option<Self> {
        let operator = match opcode {
            0 => CompareOperator::FpFalse,
            1 => CompareOperator::FpOrderedEqual,
            2 => CompareOperator::FpOrderedGreaterThan,
            3 => CompareOperator::FpOrderedGreaterOrEqual,
            4 => CompareOperator::FpOrderedLessThan,
            5 => CompareOperator::FpOrderedLessOrEqual,
            6 => CompareOperator::FpOrderedNotEqual,
            7 => CompareOperator::FpOrdered,
            8 => CompareOperator::FpUnordered,
            9 => CompareOperator::FpUnorderedEqual,
            10 => CompareOperator::FpUnorderedGreaterThan,
            11 => CompareOperator::FpUnorderedGreaterOrEqual,
            12 => CompareOperator::FpUnorderedLessThan,
            13 => CompareOperator::FpUnorderedLessOrEqual,
            14 => CompareOperator::FpUnorderedNotEqual,
            15 => CompareOperator::FpTrue,
            32 => CompareOperator::IntEqual,
            33 => CompareOperator::IntNotEqual,
            34 => CompareOperator::IntUnsignedGreaterThan,
            35 => CompareOperator::IntUnsignedGreaterOrEqual,
            36 => CompareOperator::IntUnsignedLessThan,
            37 => CompareOperator::IntUnsignedLessOrEqual,
            38 => CompareOperator::IntSignedGreaterThan,
            39 => CompareOperator::IntSignedGreaterOrEqual,
            40 => CompareOperator::IntSignedLessThan,
            41 => CompareOperator::IntSignedLessOrEqual,
            _ => return None,
        };
        Some(operator)
    }

    /// Whether this is a floating predicate (`fcmp`).
    pub const fn is_floating_point(self) -> bool {
        // Integer predicates start at IntEqual; everything before is fcmp.
        (self as u32) < (CompareOperator::IntEqual as u32)
    }

    /// LLVM assembly predicate mnemonic.
    pub const fn mnemonic(self) -> &'static str {
        match self {
            CompareOperator::FpFalse => "false",
            CompareOperator::FpOrderedEqual => "oeq",
            CompareOperator::FpOrderedGreaterThan => "ogt",
            CompareOperator::FpOrderedGreaterOrEqual => "oge",
            CompareOperator::FpOrderedLessThan => "olt",
            CompareOperator::FpOrderedLessOrEqual => "ole",
            CompareOperator::FpOrderedNotEqual => "one",
            CompareOperator::FpOrdered => "ord",
            CompareOperator::FpUnordered => "uno",
            CompareOperator::FpUnorderedEqual => "ueq",
            CompareOperator::FpUnorderedGreaterThan => "ugt",
            CompareOperator::FpUnorderedGreaterOrEqual => "uge",
            CompareOperator::FpUnorderedLessThan => "ult",
            CompareOperator::FpUnorderedLessOrEqual => "ule",
            CompareOperator::FpUnorderedNotEqual => "une",
            CompareOperator::FpTrue => "true",
            CompareOperator::IntEqual => "eq",
            CompareOperator::IntNotEqual => "ne",
            CompareOperator::IntUnsignedGreaterThan => "ugt",
            CompareOperator::IntUnsignedGreaterOrEqual => "uge",
            CompareOperator::IntUnsignedLessThan => "ult",
            CompareOperator::IntUnsignedLessOrEqual => "ule",
            CompareOperator::IntSignedGreaterThan => "sgt",
            CompareOperator::IntSignedGreaterOrEqual => "sge",
            CompareOperator::IntSignedLessThan => "slt",
            CompareOperator::IntSignedLessOrEqual => "sle",
        }
    }
}

/// Cast operators (opcodes 0-12).
///
/// Cast opcodes are type-agnostic: there is no integer/floating table
/// split, so the operand type plays no part in decoding.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum CastOperator {
    Trunc,
    ZeroExtend,
    SignExtend,
    FpToUInt,
    FpToSInt,
    UIntToFp,
    SIntToFp,
    FpTrunc,
    FpExtend,
    PtrToInt,
    IntToPtr,
    Bitcast,
    AddressSpaceCast,
}

impl CastOperator {
    /// Decode a bitcode cast opcode.
    pub fn decode(opcode: u32) -> Option<Self> {
        let operator = match opcode {
            0 => CastOperator::Trunc,
            1 => CastOperator::ZeroExtend,
            2 => CastOperator::SignExtend,
            3 => CastOperator::FpToUInt,
            4 => CastOperator::FpToSInt,
            5 => CastOperator::UIntToFp,
            6 => CastOperator::SIntToFp,
            7 => CastOperator::FpTrunc,
            8 => CastOperator::FpExtend,
            9 => CastOperator::PtrToInt,
            10 => CastOperator::IntToPtr,
            11 => CastOperator::Bitcast,
            12 => CastOperator::AddressSpaceCast,
            _ => return None,
        };
        Some(operator)
    }

    /// LLVM assembly mnemonic.
    pub const fn mnemonic(self) -> &'static str {
        match self {
            CastOperator::Trunc => "trunc",
            CastOperator::ZeroExtend => "zext",
            CastOperator::SignExtend => "sext",
            CastOperator::FpToUInt => "fptoui",
            CastOperator::FpToSInt => "fptosi",
            CastOperator::UIntToFp => "uitofp",
            CastOperator::SIntToFp => "sitofp",
            CastOperator::FpTrunc => "fptrunc",
            CastOperator::FpExtend => "fpext",
            CastOperator::PtrToInt => "ptrtoint",
            CastOperator::IntToPtr => "inttoptr",
            CastOperator::Bitcast => "bitcast",
            CastOperator::AddressSpaceCast => "addrspacecast",
        }
    }
}

/// Arithmetic flags attached to binary operations.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Flag {
    /// `nuw`: no unsigned wrap.
    NoUnsignedWrap,
    /// `nsw`: no signed wrap.
    NoSignedWrap,
    /// `exact`: division/shift loses no bits.
    Exact,
    /// `fast`: all fast-math transformations permitted.
    Fast,
    /// `nnan`: assume no NaNs.
    NoNaNs,
    /// `ninf`: assume no infinities.
    NoInfs,
    /// `nsz`: ignore the sign of zero.
    NoSignedZeros,
    /// `arcp`: allow reciprocal instead of division.
    AllowReciprocal,
}

impl Flag {
    /// Extract the flags relevant to `operator` from a raw flag word.
    ///
    /// Each operator group interprets the word differently: wrap flags
    /// for `add`/`sub`/`mul`/`shl`, `exact` for the exact divisions and
    /// right shifts, the fast-math set for floating operators. Operators
    /// outside these groups carry no flags and the word is ignored.
    pub fn decode(operator: BinaryOperator, flags: u32) -> Vec<Flag> {
        use BinaryOperator::*;

        let mut decoded = Vec::new();
        match operator {
            Add | Sub | Mul | Shl => {
                if flags & (1 << 0) != 0 {
                    decoded.push(Flag::NoUnsignedWrap);
                }
                if flags & (1 << 1) != 0 {
                    decoded.push(Flag::NoSignedWrap);
                }
            }
            UDiv | SDiv | LShr | AShr => {
                if flags & (1 << 0) != 0 {
                    decoded.push(Flag::Exact);
                }
            }
            FAdd | FSub | FMul | FDiv | FRem => {
                if flags & (1 << 0) != 0 {
                    decoded.push(Flag::Fast);
                }
                if flags & (1 << 1) != 0 {
                    decoded.push(Flag::NoNaNs);
                }
                if flags & (1 << 2) != 0 {
                    decoded.push(Flag::NoInfs);
                }
                if flags & (1 << 3) != 0 {
                    decoded.push(Flag::NoSignedZeros);
                }
                if flags & (1 << 4) != 0 {
                    decoded.push(Flag::AllowReciprocal);
                }
            }
            URem | SRem | And | Or | Xor => {}
        }
        decoded
    }

    /// LLVM assembly keyword.
    pub const fn keyword(self) -> &'static str {
        match self {
            Flag::NoUnsignedWrap => "nuw",
            Flag::NoSignedWrap => "nsw",
            Flag::Exact => "exact",
            Flag::Fast => "fast",
            Flag::NoNaNs => "nnan",
            Flag::NoInfs => "ninf",
            Flag::NoSignedZeros => "nsz",
            Flag::AllowReciprocal => "arcp",
        }
    }
}

#[cfg(test)]
mod tests;
