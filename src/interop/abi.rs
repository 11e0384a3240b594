//! ABI (Application Binary Interface) declarations
//!
//! A `Signature` records the argument and return layout a slot was declared
//! with. It is fixed where the slot is defined and never negotiated with the
//! native side.

use core::fmt;

use super::types::{FfiType, NativeSignature};

/// Calling convention specification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum CallingConvention {
    /// C calling convention (platform default, `Cdecl` on x86)
    C,
}

impl CallingConvention {
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::C => "extern \"C\"",
        }
    }
}

impl Default for CallingConvention {
    #[inline]
    fn default() -> Self {
        Self::C
    }
}

/// Declared layout of one native callable
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Signature {
    pub convention: CallingConvention,
    pub args: &'static [FfiType],
    pub ret: FfiType,
}

impl Signature {
    #[inline]
    pub const fn cdecl(args: &'static [FfiType], ret: FfiType) -> Self {
        Self {
            convention: CallingConvention::C,
            args,
            ret,
        }
    }

    /// Check a call-site function pointer type against this declaration
    pub fn matches<F: NativeSignature>(&self) -> bool {
        self.convention == CallingConvention::C
            && F::arg_types() == self.args
            && F::return_type() == self.ret
    }

    /// Total bytes of argument data passed by value
    pub fn arg_bytes(&self) -> usize {
        self.args.iter().map(|ty| ty.size()).sum()
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} fn(", self.convention.keyword())?;
        for (i, arg) in self.args.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", arg.name())?;
        }
        write!(f, ") -> {}", self.ret.name())
    }
}
