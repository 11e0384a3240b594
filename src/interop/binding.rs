//! Binding tables - named native entry points resolved once per process
//!
//! A table owns a fixed list of slots. The first access asks a resolver for
//! every slot; either all of them resolve and the table is published, or the
//! failure is cached and every later access reports it. Tables are never
//! rebuilt.

use once_cell::sync::OnceCell;

use super::abi::Signature;
use super::resolver::{global_resolver, Resolver};
use super::types::{NativeFn, NativeSignature};
use super::{record_native_call, record_resolution};
use crate::error::{InteropError, InteropResult};
use crate::logging;

/// Named placeholder for one native callable
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotDecl {
    pub name: &'static str,
    pub signature: Signature,
}

impl SlotDecl {
    pub const fn new(name: &'static str, signature: Signature) -> Self {
        Self { name, signature }
    }
}

/// Fully resolved table; every slot has an address
#[derive(Debug)]
pub struct ResolvedTable {
    name: &'static str,
    slots: &'static [SlotDecl],
    addresses: Box<[NativeFn]>,
}

impl ResolvedTable {
    /// Resolve all `slots` through `resolver`. No partial table is ever
    /// returned: the first missing slot fails the whole table.
    pub fn resolve(
        name: &'static str,
        slots: &'static [SlotDecl],
        resolver: &dyn Resolver,
    ) -> InteropResult<Self> {
        logging::log_table_resolving(name, slots.len());

        let addresses = slots
            .iter()
            .map(|slot| {
                resolver.lookup(slot.name).ok_or_else(|| {
                    logging::log_slot_missing(name, slot.name);
                    InteropError::missing_binding(name, slot.name)
                })
            })
            .collect::<InteropResult<Box<[NativeFn]>>>();

        match addresses {
            Ok(addresses) => {
                record_resolution(true);
                logging::log_table_resolved(name, slots.len());
                Ok(Self {
                    name,
                    slots,
                    addresses,
                })
            }
            Err(err) => {
                record_resolution(false);
                logging::log_table_failed(name, &err.to_string());
                Err(err)
            }
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn slots(&self) -> &'static [SlotDecl] {
        self.slots
    }

    pub fn len(&self) -> usize {
        self.addresses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.addresses.is_empty()
    }

    /// Resolved address of `slot`
    #[inline]
    pub fn address(&self, slot: usize) -> NativeFn {
        self.addresses[slot]
    }

    /// Resolved address of `slot` as the call-site function pointer type.
    ///
    /// Debug builds check `F` against the declared signature; release builds
    /// trust the call site.
    #[inline]
    pub fn function<F: NativeSignature>(&self, slot: usize) -> F {
        let decl = &self.slots[slot];
        debug_assert!(
            decl.signature.matches::<F>(),
            "call site for {}::{} does not match declared signature {}",
            self.name,
            decl.name,
            decl.signature
        );
        record_native_call();
        logging::log_native_call(self.name, decl.name);
        self.addresses[slot].cast::<F>()
    }
}

/// Lazily resolved binding table for one native subsystem
pub struct BindingTable {
    name: &'static str,
    slots: &'static [SlotDecl],
    state: OnceCell<InteropResult<ResolvedTable>>,
}

impl BindingTable {
    pub const fn new(name: &'static str, slots: &'static [SlotDecl]) -> Self {
        Self {
            name,
            slots,
            state: OnceCell::new(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn slots(&self) -> &'static [SlotDecl] {
        self.slots
    }

    /// Resolve through the process-wide resolver.
    ///
    /// Without an installed resolver no attempt is made and nothing is
    /// cached, so a later call can still resolve.
    pub fn resolve(&self) -> InteropResult<&ResolvedTable> {
        if let Some(state) = self.state.get() {
            return state.as_ref().map_err(Clone::clone);
        }
        let resolver = global_resolver().ok_or(InteropError::ResolverNotInstalled)?;
        self.resolve_with(resolver)
    }

    /// Resolve through `resolver` unless the table already has a result.
    ///
    /// Concurrent first callers block until the single resolution attempt
    /// finishes and all observe its outcome.
    pub fn resolve_with(&self, resolver: &dyn Resolver) -> InteropResult<&ResolvedTable> {
        self.state
            .get_or_init(|| ResolvedTable::resolve(self.name, self.slots, resolver))
            .as_ref()
            .map_err(Clone::clone)
    }

    /// True once resolution has succeeded
    pub fn is_resolved(&self) -> bool {
        matches!(self.state.get(), Some(Ok(_)))
    }

    /// True once resolution has been attempted and failed
    pub fn is_failed(&self) -> bool {
        matches!(self.state.get(), Some(Err(_)))
    }
}
