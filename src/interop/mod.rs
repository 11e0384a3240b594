//! Interoperability - typed bindings to native engine entry points
//!
//! Design: every native entry point is a named slot in a binding table that
//! is resolved once, then called through a function pointer whose layout is
//! fixed at the call site.
//!
//! Architecture:
//! - `types.rs` - native handles and the layout vocabulary (FfiType)
//! - `abi.rs` - calling convention and declared slot signatures
//! - `resolver.rs` - resolver contract, function registry, global resolver
//! - `library.rs` - dynamic library resolver (dlopen/LoadLibrary)
//! - `binding.rs` - resolve-once, all-or-nothing binding tables
//! - `strings.rs` - text buffers crossing the boundary
//! - `name.rs` - name <-> text subsystem
//! - `set.rs` - set container accessor subsystem

mod abi;
mod binding;
mod library;
mod resolver;
mod strings;
mod types;

pub mod name;
pub mod set;

use std::sync::atomic::{AtomicUsize, Ordering};

pub use abi::{CallingConvention, Signature};
pub use binding::{BindingTable, ResolvedTable, SlotDecl};
pub use library::{Library, PrefixedLibrary};
pub use name::FName;
pub use resolver::{global_resolver, has_global_resolver, install_resolver, FunctionRegistry, Resolver};
pub use set::NativeSet;
pub use strings::{decode_native_chars, ManagedText};
pub use types::{
    ContainerAddress, ElementAddress, FfiLayout, FfiType, NativeChars, NativeFn, NativeSignature,
    PropertyDescriptor,
};

static TABLES_RESOLVED: AtomicUsize = AtomicUsize::new(0);
static RESOLUTION_FAILURES: AtomicUsize = AtomicUsize::new(0);
static NATIVE_CALLS: AtomicUsize = AtomicUsize::new(0);

pub(crate) fn record_resolution(success: bool) {
    let counter = if success {
        &TABLES_RESOLVED
    } else {
        &RESOLUTION_FAILURES
    };
    counter.fetch_add(1, Ordering::Relaxed);
}

#[inline]
pub(crate) fn record_native_call() {
    NATIVE_CALLS.fetch_add(1, Ordering::Relaxed);
}

/// Get interop statistics
pub fn stats() -> InteropStats {
    InteropStats {
        tables_resolved: TABLES_RESOLVED.load(Ordering::Relaxed),
        resolution_failures: RESOLUTION_FAILURES.load(Ordering::Relaxed),
        native_calls: NATIVE_CALLS.load(Ordering::Relaxed),
    }
}

/// Interop statistics for monitoring
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InteropStats {
    pub tables_resolved: usize,
    pub resolution_failures: usize,
    pub native_calls: usize,
}
