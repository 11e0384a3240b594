//! Set subsystem - native sets accessed in place
//!
//! Every accessor takes the container address together with the element
//! property descriptor; the address alone carries no layout information.
//! Nothing here validates handles: the engine owns the storage and is
//! authoritative, so stale or mismatched handles are undefined behavior on
//! the native side.

use super::abi::Signature;
use super::binding::{BindingTable, ResolvedTable, SlotDecl};
use super::types::{ContainerAddress, ElementAddress, FfiType, PropertyDescriptor};
use crate::error::InteropResult;

pub mod slot {
    pub const GET_ELEMENT_PROPERTY_OF_SET: usize = 0;
    pub const GET_LENGTH_OF_SET: usize = 1;
    pub const GET_ELEMENT_ADDRESS_OF_SET: usize = 2;
    pub const IS_SET_CONTAINS_ELEMENT: usize = 3;
    pub const ADD_SET_ELEMENT: usize = 4;
    pub const REMOVE_SET_ELEMENT: usize = 5;
    pub const CLEAR_SET: usize = 6;
}

const PTR: FfiType = FfiType::Pointer;

static SLOTS: [SlotDecl; 7] = [
    SlotDecl::new("GetElementPropertyOfSet", Signature::cdecl(&[PTR], PTR)),
    SlotDecl::new("GetLengthOfSet", Signature::cdecl(&[PTR, PTR], FfiType::I32)),
    SlotDecl::new(
        "GetElementAddressOfSet",
        Signature::cdecl(&[PTR, PTR, FfiType::I32], PTR),
    ),
    SlotDecl::new("IsSetContainsElement", Signature::cdecl(&[PTR, PTR, PTR], FfiType::Bool)),
    SlotDecl::new("AddSetElement", Signature::cdecl(&[PTR, PTR, PTR], FfiType::Bool)),
    SlotDecl::new("RemoveSetElement", Signature::cdecl(&[PTR, PTR, PTR], FfiType::Bool)),
    SlotDecl::new("ClearSet", Signature::cdecl(&[PTR, PTR], FfiType::Void)),
];

pub static BINDINGS: BindingTable = BindingTable::new("SetInteropUtils", &SLOTS);

type GetElementPropertyOfSet = unsafe extern "C" fn(PropertyDescriptor) -> PropertyDescriptor;
type GetLengthOfSet = unsafe extern "C" fn(ContainerAddress, PropertyDescriptor) -> i32;
type GetElementAddressOfSet =
    unsafe extern "C" fn(ContainerAddress, PropertyDescriptor, i32) -> ElementAddress;
type ElementQuery =
    unsafe extern "C" fn(ContainerAddress, PropertyDescriptor, ElementAddress) -> bool;
type ClearSet = unsafe extern "C" fn(ContainerAddress, PropertyDescriptor);

/// Element property descriptor of a set property
pub fn element_property_of(set_property: PropertyDescriptor) -> InteropResult<PropertyDescriptor> {
    let table = BINDINGS.resolve()?;
    Ok(raw::element_property_of(table, set_property))
}

/// Current element count
pub fn length(address: ContainerAddress, element: PropertyDescriptor) -> InteropResult<i32> {
    let table = BINDINGS.resolve()?;
    Ok(raw::length(table, address, element))
}

/// In-place address of the element at `index`. Out-of-range indices are
/// handled (or not) by the native side.
pub fn element_address_at(
    address: ContainerAddress,
    element: PropertyDescriptor,
    index: i32,
) -> InteropResult<ElementAddress> {
    let table = BINDINGS.resolve()?;
    Ok(raw::element_address_at(table, address, element, index))
}

/// Membership test against the value stored at `target`
pub fn contains(
    address: ContainerAddress,
    element: PropertyDescriptor,
    target: ElementAddress,
) -> InteropResult<bool> {
    let table = BINDINGS.resolve()?;
    Ok(raw::query(table, slot::IS_SET_CONTAINS_ELEMENT, address, element, target))
}

/// Insert the value stored at `target`; true when the set changed
pub fn add(
    address: ContainerAddress,
    element: PropertyDescriptor,
    target: ElementAddress,
) -> InteropResult<bool> {
    let table = BINDINGS.resolve()?;
    Ok(raw::query(table, slot::ADD_SET_ELEMENT, address, element, target))
}

/// Remove the value stored at `target`; true when it was present
pub fn remove(
    address: ContainerAddress,
    element: PropertyDescriptor,
    target: ElementAddress,
) -> InteropResult<bool> {
    let table = BINDINGS.resolve()?;
    Ok(raw::query(table, slot::REMOVE_SET_ELEMENT, address, element, target))
}

pub fn clear(address: ContainerAddress, element: PropertyDescriptor) -> InteropResult<()> {
    let table = BINDINGS.resolve()?;
    raw::clear(table, address, element);
    Ok(())
}

/// Calls against an already resolved table
mod raw {
    use super::*;

    // SAFETY (all functions): the slot layouts are declared in `SLOTS` and
    // the handles are passed through untouched. Their validity is the
    // caller's contract with the engine.

    pub(super) fn element_property_of(
        table: &ResolvedTable,
        set_property: PropertyDescriptor,
    ) -> PropertyDescriptor {
        let f = table.function::<GetElementPropertyOfSet>(slot::GET_ELEMENT_PROPERTY_OF_SET);
        unsafe { f(set_property) }
    }

    pub(super) fn length(
        table: &ResolvedTable,
        address: ContainerAddress,
        element: PropertyDescriptor,
    ) -> i32 {
        let f = table.function::<GetLengthOfSet>(slot::GET_LENGTH_OF_SET);
        unsafe { f(address, element) }
    }

    pub(super) fn element_address_at(
        table: &ResolvedTable,
        address: ContainerAddress,
        element: PropertyDescriptor,
        index: i32,
    ) -> ElementAddress {
        let f = table.function::<GetElementAddressOfSet>(slot::GET_ELEMENT_ADDRESS_OF_SET);
        unsafe { f(address, element, index) }
    }

    pub(super) fn query(
        table: &ResolvedTable,
        slot: usize,
        address: ContainerAddress,
        element: PropertyDescriptor,
        target: ElementAddress,
    ) -> bool {
        let f = table.function::<ElementQuery>(slot);
        unsafe { f(address, element, target) }
    }

    pub(super) fn clear(table: &ResolvedTable, address: ContainerAddress, element: PropertyDescriptor) {
        let f = table.function::<ClearSet>(slot::CLEAR_SET);
        unsafe { f(address, element) }
    }
}

/// Non-owning view of a native set.
///
/// Resolves the binding table once on construction, after which every
/// operation is a direct native call.
#[derive(Debug, Clone, Copy)]
pub struct NativeSet {
    address: ContainerAddress,
    element: PropertyDescriptor,
    table: &'static ResolvedTable,
}

impl NativeSet {
    pub fn new(address: ContainerAddress, element: PropertyDescriptor) -> InteropResult<Self> {
        Ok(Self {
            address,
            element,
            table: BINDINGS.resolve()?,
        })
    }

    /// View built from the set's own property descriptor
    pub fn from_property(
        address: ContainerAddress,
        set_property: PropertyDescriptor,
    ) -> InteropResult<Self> {
        let table = BINDINGS.resolve()?;
        Ok(Self {
            address,
            element: raw::element_property_of(table, set_property),
            table,
        })
    }

    pub fn address(&self) -> ContainerAddress {
        self.address
    }

    pub fn element_property(&self) -> PropertyDescriptor {
        self.element
    }

    /// Element count; a negative native count reads as empty
    pub fn len(&self) -> usize {
        usize::try_from(raw::length(self.table, self.address, self.element)).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn element_address_at(&self, index: i32) -> ElementAddress {
        raw::element_address_at(self.table, self.address, self.element, index)
    }

    pub fn contains(&self, target: ElementAddress) -> bool {
        raw::query(self.table, slot::IS_SET_CONTAINS_ELEMENT, self.address, self.element, target)
    }

    pub fn add(&self, target: ElementAddress) -> bool {
        raw::query(self.table, slot::ADD_SET_ELEMENT, self.address, self.element, target)
    }

    pub fn remove(&self, target: ElementAddress) -> bool {
        raw::query(self.table, slot::REMOVE_SET_ELEMENT, self.address, self.element, target)
    }

    pub fn clear(&self) {
        raw::clear(self.table, self.address, self.element)
    }

    /// Addresses of elements `0..len`, with `len` read once up front.
    /// Mutating the set while iterating is undefined on the native side.
    pub fn element_addresses(&self) -> ElementAddresses {
        let len = i32::try_from(self.len()).unwrap_or(i32::MAX);
        ElementAddresses {
            set: *self,
            next: 0,
            len,
        }
    }
}

/// Iterator over element addresses of a `NativeSet`
#[derive(Debug, Clone)]
pub struct ElementAddresses {
    set: NativeSet,
    next: i32,
    len: i32,
}

impl Iterator for ElementAddresses {
    type Item = ElementAddress;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.len {
            return None;
        }
        let address = self.set.element_address_at(self.next);
        self.next += 1;
        Some(address)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = usize::try_from(self.len - self.next).unwrap_or(0);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for ElementAddresses {}
