//! Type descriptors.
//!
//! The type system proper lives upstream in the bitcode reader's type
//! table; this module is the boundary representation the model consumes.
//! A [`TypeRef`] is a cheap-clone handle compared by *identity*: two
//! descriptors are equal only if they are the same table entry, never by
//! structure. The model itself only classifies types (integer, floating
//! point, vector, pointer, function, void) — it never checks them.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Deref;
use std::sync::Arc;

/// Floating-point type width.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum FloatKind {
    Half,
    Float,
    Double,
    X86Fp80,
    Fp128,
    PpcFp128,
}

impl FloatKind {
    /// LLVM assembly spelling of this floating-point type.
    pub const fn mnemonic(self) -> &'static str {
        match self {
            FloatKind::Half => "half",
            FloatKind::Float => "float",
            FloatKind::Double => "double",
            FloatKind::X86Fp80 => "x86_fp80",
            FloatKind::Fp128 => "fp128",
            FloatKind::PpcFp128 => "ppc_fp128",
        }
    }
}

/// Structure of a type descriptor.
#[derive(Clone, Debug)]
pub enum TypeKind {
    Void,
    Integer {
        bits: u32,
    },
    Float(FloatKind),
    Pointer {
        pointee: TypeRef,
    },
    Vector {
        element: TypeRef,
        len: u32,
    },
    Array {
        element: TypeRef,
        len: u64,
    },
    Struct {
        fields: Vec<TypeRef>,
        packed: bool,
    },
    Function {
        return_type: TypeRef,
        params: Vec<TypeRef>,
        vararg: bool,
    },
}

impl TypeKind {
    #[inline]
    pub fn is_void(&self) -> bool {
        matches!(self, TypeKind::Void)
    }

    #[inline]
    pub fn is_integer(&self) -> bool {
        matches!(self, TypeKind::Integer { .. })
    }

    #[inline]
    pub fn is_floating_point(&self) -> bool {
        matches!(self, TypeKind::Float(_))
    }

    #[inline]
    pub fn is_vector(&self) -> bool {
        matches!(self, TypeKind::Vector { .. })
    }

    #[inline]
    pub fn is_pointer(&self) -> bool {
        matches!(self, TypeKind::Pointer { .. })
    }

    #[inline]
    pub fn is_function(&self) -> bool {
        matches!(self, TypeKind::Function { .. })
    }

    /// Element type of a vector or array.
    pub fn element_type(&self) -> Option<&TypeRef> {
        match self {
            TypeKind::Vector { element, .. } | TypeKind::Array { element, .. } => Some(element),
            _ => None,
        }
    }

    /// Whether binary operators on this type decode from the
    /// floating-point table: a scalar float, or a vector of floats.
    pub fn is_float_or_float_vector(&self) -> bool {
        match self {
            TypeKind::Float(_) => true,
            TypeKind::Vector { element, .. } => element.is_floating_point(),
            _ => false,
        }
    }
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeKind::Void => f.write_str("void"),
            TypeKind::Integer { bits } => write!(f, "i{bits}"),
            TypeKind::Float(kind) => f.write_str(kind.mnemonic()),
            TypeKind::Pointer { pointee } => write!(f, "{pointee}*"),
            TypeKind::Vector { element, len } => write!(f, "<{len} x {element}>"),
            TypeKind::Array { element, len } => write!(f, "[{len} x {element}]"),
            TypeKind::Struct { fields, packed } => {
                if *packed {
                    f.write_str("<")?;
                }
                f.write_str("{")?;
                for (i, field) in fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{field}")?;
                }
                f.write_str("}")?;
                if *packed {
                    f.write_str(">")?;
                }
                Ok(())
            }
            TypeKind::Function {
                return_type,
                params,
                vararg,
            } => {
                write!(f, "{return_type} (")?;
                for (i, param) in params.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{param}")?;
                }
                if *vararg {
                    if !params.is_empty() {
                        f.write_str(", ")?;
                    }
                    f.write_str("...")?;
                }
                f.write_str(")")
            }
        }
    }
}

/// Shared handle to a type descriptor.
///
/// Equality and hashing go by identity (the same descriptor allocation),
/// matching the upstream type table where each distinct type is created
/// once. Cloning is an `Arc` bump.
#[derive(Clone)]
pub struct TypeRef(Arc<TypeKind>);

impl TypeRef {
    /// Wrap a type descriptor into a new, distinct handle.
    pub fn new(kind: TypeKind) -> Self {
        TypeRef(Arc::new(kind))
    }

    pub fn void() -> Self {
        Self::new(TypeKind::Void)
    }

    pub fn integer(bits: u32) -> Self {
        Self::new(TypeKind::Integer { bits })
    }

    pub fn float(kind: FloatKind) -> Self {
        Self::new(TypeKind::Float(kind))
    }

    pub fn pointer(pointee: TypeRef) -> Self {
        Self::new(TypeKind::Pointer { pointee })
    }

    pub fn vector(element: TypeRef, len: u32) -> Self {
        Self::new(TypeKind::Vector { element, len })
    }

    pub fn array(element: TypeRef, len: u64) -> Self {
        Self::new(TypeKind::Array { element, len })
    }

    pub fn structure(fields: Vec<TypeRef>, packed: bool) -> Self {
        Self::new(TypeKind::Struct { fields, packed })
    }

    pub fn function(return_type: TypeRef, params: Vec<TypeRef>, vararg: bool) -> Self {
        Self::new(TypeKind::Function {
            return_type,
            params,
            vararg,
        })
    }

    /// The descriptor structure behind this handle.
    #[inline]
    pub fn kind(&self) -> &TypeKind {
        &self.0
    }
}

impl Deref for TypeRef {
    type Target = TypeKind;

    fn deref(&self) -> &TypeKind {
        &self.0
    }
}

impl PartialEq for TypeRef {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for TypeRef {}

impl Hash for TypeRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (Arc::as_ptr(&self.0) as usize).hash(state);
    }
}

impl fmt::Debug for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeRef({})", self.0)
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}
