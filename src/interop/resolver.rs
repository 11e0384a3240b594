//! Symbol resolution - maps slot names to native addresses
//!
//! A resolver answers one question: "given a declared slot name, which
//! address implements it?". Binding tables ask once per slot per process.

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use once_cell::sync::OnceCell;
use std::sync::Arc;

use super::types::NativeFn;
use crate::error::{InteropError, InteropResult};

/// Lookup contract every resolver must fulfill
pub trait Resolver: Send + Sync {
    fn lookup(&self, name: &str) -> Option<NativeFn>;
}

impl<R: Resolver + ?Sized> Resolver for Arc<R> {
    fn lookup(&self, name: &str) -> Option<NativeFn> {
        (**self).lookup(name)
    }
}

impl<R: Resolver + ?Sized> Resolver for Box<R> {
    fn lookup(&self, name: &str) -> Option<NativeFn> {
        (**self).lookup(name)
    }
}

/// Name-keyed table of native functions (concurrent)
#[derive(Default)]
pub struct FunctionRegistry {
    functions: DashMap<String, NativeFn>,
    allow_override: bool,
}

impl FunctionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry whose `register` replaces existing entries
    pub fn allowing_override() -> Self {
        Self {
            allow_override: true,
            ..Self::default()
        }
    }

    /// `add` with the registry's own override policy
    pub fn register(&self, name: &str, function: NativeFn) -> InteropResult<()> {
        self.add(name, function, self.allow_override)
    }

    /// Register `function` under `name`.
    ///
    /// Re-registering the same address is accepted. A different address
    /// replaces the old one only when `allow_override` is set.
    pub fn add(&self, name: &str, function: NativeFn, allow_override: bool) -> InteropResult<()> {
        if name.is_empty() || name.contains('\0') {
            return Err(InteropError::InvalidSymbolName(name.to_string()));
        }

        match self.functions.entry(name.to_string()) {
            Entry::Occupied(mut entry) => {
                if allow_override {
                    entry.insert(function);
                } else if *entry.get() != function {
                    return Err(InteropError::DuplicateFunction(name.to_string()));
                }
            }
            Entry::Vacant(entry) => {
                entry.insert(function);
            }
        }

        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<NativeFn> {
        self.functions.get(name).map(|entry| *entry.value())
    }

    pub fn remove(&self, name: &str) -> Option<NativeFn> {
        self.functions.remove(name).map(|(_, function)| function)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}

impl Resolver for FunctionRegistry {
    fn lookup(&self, name: &str) -> Option<NativeFn> {
        self.get(name)
    }
}

/// Process-wide resolver used by statically declared binding tables
static GLOBAL_RESOLVER: OnceCell<Box<dyn Resolver>> = OnceCell::new();

/// Install the process-wide resolver. The first installation wins.
pub fn install_resolver(resolver: Box<dyn Resolver>) -> InteropResult<()> {
    GLOBAL_RESOLVER
        .set(resolver)
        .map_err(|_| InteropError::ResolverAlreadyInstalled)?;
    tracing::debug!(target: "interop", "native resolver installed");
    Ok(())
}

pub fn global_resolver() -> Option<&'static dyn Resolver> {
    GLOBAL_RESOLVER.get().map(|resolver| resolver.as_ref())
}

pub fn has_global_resolver() -> bool {
    GLOBAL_RESOLVER.get().is_some()
}
