//! Type definitions for the native boundary
//!
//! Native handles are opaque, pointer-sized values owned by the engine. The
//! managed side never dereferences them; it only threads them back into
//! further native calls.

use core::ffi::{c_char, c_void};
use core::ptr::NonNull;

/// Layout vocabulary used to declare slot signatures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiType {
    Void,
    Bool,
    I32,
    U32,
    I64,
    U64,
    Pointer,
    /// NUL-terminated character buffer
    String,
    /// Fixed-layout value passed or returned by value
    Aggregate(usize),
}

impl FfiType {
    /// Get size of type in bytes
    #[inline]
    pub const fn size(self) -> usize {
        match self {
            Self::Void => 0,
            Self::Bool => 1,
            Self::I32 | Self::U32 => 4,
            Self::I64 | Self::U64 => 8,
            Self::Pointer | Self::String => core::mem::size_of::<usize>(),
            Self::Aggregate(size) => size,
        }
    }

    #[inline]
    pub const fn is_integral(self) -> bool {
        matches!(self, Self::I32 | Self::U32 | Self::I64 | Self::U64)
    }

    /// Short name used in signature listings
    pub fn name(self) -> String {
        match self {
            Self::Void => "void".into(),
            Self::Bool => "bool".into(),
            Self::I32 => "i32".into(),
            Self::U32 => "u32".into(),
            Self::I64 => "i64".into(),
            Self::U64 => "u64".into(),
            Self::Pointer => "ptr".into(),
            Self::String => "str".into(),
            Self::Aggregate(size) => format!("[u8; {}]", size),
        }
    }
}

/// Maps a Rust type crossing the boundary onto its declared layout
pub trait FfiLayout {
    const TYPE: FfiType;
}

macro_rules! impl_ffi_layout {
    ($($ty:ty => $ffi:expr),* $(,)?) => {
        $(impl FfiLayout for $ty {
            const TYPE: FfiType = $ffi;
        })*
    };
}

impl_ffi_layout! {
    () => FfiType::Void,
    bool => FfiType::Bool,
    i32 => FfiType::I32,
    u32 => FfiType::U32,
    i64 => FfiType::I64,
    u64 => FfiType::U64,
}

impl<T> FfiLayout for *const T {
    const TYPE: FfiType = FfiType::Pointer;
}

impl<T> FfiLayout for *mut T {
    const TYPE: FfiType = FfiType::Pointer;
}

/// Resolved address of a native callable
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NativeFn(NonNull<c_void>);

// Addresses are immutable once resolved and never dereferenced as data
unsafe impl Send for NativeFn {}
unsafe impl Sync for NativeFn {}

impl NativeFn {
    #[inline]
    pub fn new(ptr: *const c_void) -> Option<Self> {
        NonNull::new(ptr as *mut c_void).map(Self)
    }

    /// Address of a function defined in this process
    #[inline]
    pub fn from_fn<F: NativeSignature>(f: F) -> Self {
        // SAFETY: NativeSignature is only implemented for function pointers,
        // which are non-null and pointer-sized.
        let raw: *mut c_void = unsafe { core::mem::transmute_copy(&f) };
        Self(unsafe { NonNull::new_unchecked(raw) })
    }

    #[inline]
    pub fn as_ptr(self) -> *const c_void {
        self.0.as_ptr()
    }

    /// Reinterpret the address as a typed function pointer.
    ///
    /// Nothing checks that `F` matches the native function; calling the result
    /// with the wrong signature is undefined behavior.
    #[inline]
    pub fn cast<F: NativeSignature>(self) -> F {
        // SAFETY: F is a pointer-sized function pointer type and the address
        // is non-null.
        unsafe { core::mem::transmute_copy(&self.0) }
    }
}

/// Function pointer types that can be produced from a resolved address.
///
/// # Safety
/// Implementors must be non-null, pointer-sized `extern` function pointers.
pub unsafe trait NativeSignature: Copy {
    fn arg_types() -> Vec<FfiType>;
    fn return_type() -> FfiType;
}

macro_rules! impl_native_signature {
    ($($arg:ident),*) => {
        unsafe impl<R: FfiLayout, $($arg: FfiLayout),*> NativeSignature
            for unsafe extern "C" fn($($arg),*) -> R
        {
            fn arg_types() -> Vec<FfiType> {
                vec![$($arg::TYPE),*]
            }

            fn return_type() -> FfiType {
                R::TYPE
            }
        }
    };
}

impl_native_signature!();
impl_native_signature!(A);
impl_native_signature!(A, B);
impl_native_signature!(A, B, C);
impl_native_signature!(A, B, C, D);

macro_rules! native_handle {
    ($(#[$meta:meta])* $name:ident, $raw:ty, $ffi:expr) => {
        $(#[$meta])*
        #[repr(transparent)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub struct $name($raw);

        // Non-owning handle; the engine owns the memory behind it
        unsafe impl Send for $name {}
        unsafe impl Sync for $name {}

        impl $name {
            #[inline]
            pub const fn from_raw(raw: $raw) -> Self {
                Self(raw)
            }

            #[inline]
            pub const fn null() -> Self {
                Self(core::ptr::null_mut())
            }

            #[inline]
            pub fn as_raw(self) -> $raw {
                self.0
            }

            #[inline]
            pub fn is_null(self) -> bool {
                self.0.is_null()
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::null()
            }
        }

        impl FfiLayout for $name {
            const TYPE: FfiType = $ffi;
        }
    };
}

native_handle!(
    /// Address of a native container instance (set, array, map)
    ContainerAddress,
    *mut c_void,
    FfiType::Pointer
);

native_handle!(
    /// Native property metadata describing a value's layout
    PropertyDescriptor,
    *mut c_void,
    FfiType::Pointer
);

native_handle!(
    /// In-place address of one element inside a native container
    ElementAddress,
    *mut c_void,
    FfiType::Pointer
);

native_handle!(
    /// NUL-terminated character buffer handed across the boundary
    NativeChars,
    *mut c_char,
    FfiType::String
);
