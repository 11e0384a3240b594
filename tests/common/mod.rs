//! In-process mock engine exporting every native entry point the bridge binds
#![allow(dead_code)]

use core::ffi::{c_char, c_void};
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use std::ffi::{CStr, CString};
use std::sync::Once;

use unreal_interop::host::BuildInfo;
use unreal_interop::interop::NativeChars;
use unreal_interop::{
    install_resolver, ContainerAddress, ElementAddress, FName, FunctionRegistry, NativeFn,
    PropertyDescriptor,
};

// ============================================================================
// Properties
// ============================================================================

/// Element property: a plain 32-bit integer
#[repr(C)]
pub struct MockProperty {
    pub size: i32,
}

/// Set property pointing at its element property
#[repr(C)]
pub struct MockSetProperty {
    pub element: &'static MockProperty,
}

pub static INT_PROPERTY: MockProperty = MockProperty { size: 4 };
pub static INT_SET_PROPERTY: MockSetProperty = MockSetProperty {
    element: &INT_PROPERTY,
};

pub fn int_property() -> PropertyDescriptor {
    PropertyDescriptor::from_raw(&INT_PROPERTY as *const MockProperty as *mut c_void)
}

pub fn int_set_property() -> PropertyDescriptor {
    PropertyDescriptor::from_raw(&INT_SET_PROPERTY as *const MockSetProperty as *mut c_void)
}

// ============================================================================
// Sets
// ============================================================================

/// Native set of integers, kept in insertion order
#[derive(Default)]
pub struct MockSet {
    items: Mutex<Vec<i32>>,
}

impl MockSet {
    /// Leak a fresh set and return its container address
    pub fn create() -> ContainerAddress {
        let set: &'static MockSet = Box::leak(Box::default());
        ContainerAddress::from_raw(set as *const MockSet as *mut c_void)
    }

    pub fn items(address: ContainerAddress) -> Vec<i32> {
        unsafe { mock_set(address) }.items.lock().clone()
    }
}

/// Address of a value the engine reads an element from
pub fn element(value: &i32) -> ElementAddress {
    ElementAddress::from_raw(value as *const i32 as *mut c_void)
}

/// Read the integer behind an element address
pub fn read(address: ElementAddress) -> i32 {
    unsafe { *(address.as_raw() as *const i32) }
}

unsafe fn mock_set<'a>(address: ContainerAddress) -> &'a MockSet {
    &*(address.as_raw() as *const MockSet)
}

unsafe fn element_value(property: PropertyDescriptor, target: ElementAddress) -> i32 {
    assert_eq!(property, int_property(), "element property mismatch");
    *(target.as_raw() as *const i32)
}

unsafe extern "C" fn get_element_property_of_set(property: PropertyDescriptor) -> PropertyDescriptor {
    let set_property = &*(property.as_raw() as *const MockSetProperty);
    PropertyDescriptor::from_raw(set_property.element as *const MockProperty as *mut c_void)
}

unsafe extern "C" fn get_length_of_set(address: ContainerAddress, _property: PropertyDescriptor) -> i32 {
    mock_set(address).items.lock().len() as i32
}

unsafe extern "C" fn get_element_address_of_set(
    address: ContainerAddress,
    _property: PropertyDescriptor,
    index: i32,
) -> ElementAddress {
    let mut items = mock_set(address).items.lock();
    match usize::try_from(index).ok().filter(|&i| i < items.len()) {
        Some(i) => ElementAddress::from_raw(items.as_mut_ptr().add(i) as *mut c_void),
        None => ElementAddress::null(),
    }
}

unsafe extern "C" fn is_set_contains_element(
    address: ContainerAddress,
    property: PropertyDescriptor,
    target: ElementAddress,
) -> bool {
    let value = element_value(property, target);
    mock_set(address).items.lock().contains(&value)
}

unsafe extern "C" fn add_set_element(
    address: ContainerAddress,
    property: PropertyDescriptor,
    target: ElementAddress,
) -> bool {
    let value = element_value(property, target);
    let mut items = mock_set(address).items.lock();
    if items.contains(&value) {
        return false;
    }
    items.push(value);
    true
}

unsafe extern "C" fn remove_set_element(
    address: ContainerAddress,
    property: PropertyDescriptor,
    target: ElementAddress,
) -> bool {
    let value = element_value(property, target);
    let mut items = mock_set(address).items.lock();
    match items.iter().position(|&item| item == value) {
        Some(i) => {
            items.remove(i);
            true
        }
        None => false,
    }
}

unsafe extern "C" fn clear_set(address: ContainerAddress, _property: PropertyDescriptor) {
    mock_set(address).items.lock().clear();
}

// ============================================================================
// Names
// ============================================================================

/// Interned names; index 0 is the empty "None" name
static NAMES: Lazy<Mutex<Vec<CString>>> = Lazy::new(|| Mutex::new(vec![CString::default()]));

unsafe extern "C" fn get_string_of_name(name: *const FName) -> NativeChars {
    let names = NAMES.lock();
    match names.get((*name).comparison_index as usize) {
        // CString buffers stay put when the Vec grows
        Some(text) => NativeChars::from_raw(text.as_ptr() as *mut c_char),
        None => NativeChars::null(),
    }
}

unsafe extern "C" fn get_name_of_string(text: NativeChars) -> FName {
    if text.is_null() {
        return FName::NONE;
    }
    let text = CStr::from_ptr(text.as_raw());
    let mut names = NAMES.lock();
    let index = match names.iter().position(|name| name.as_c_str() == text) {
        Some(index) => index,
        None => {
            names.push(text.to_owned());
            names.len() - 1
        }
    };
    FName::new(index as u32, 0)
}

// ============================================================================
// Host functions
// ============================================================================

pub static VALIDATED_BUILD: Mutex<Option<BuildInfo>> = parking_lot::const_mutex(None);

unsafe extern "C" fn validate_build_info(info: *const BuildInfo) {
    *VALIDATED_BUILD.lock() = Some(*info);
}

// ============================================================================
// Registration
// ============================================================================

type SetQuery = unsafe extern "C" fn(ContainerAddress, PropertyDescriptor, ElementAddress) -> bool;

/// Every export of the mock engine, by slot name
pub fn exports() -> Vec<(&'static str, NativeFn)> {
    vec![
        (
            "GetElementPropertyOfSet",
            NativeFn::from_fn(
                get_element_property_of_set
                    as unsafe extern "C" fn(PropertyDescriptor) -> PropertyDescriptor,
            ),
        ),
        (
            "GetLengthOfSet",
            NativeFn::from_fn(
                get_length_of_set as unsafe extern "C" fn(ContainerAddress, PropertyDescriptor) -> i32,
            ),
        ),
        (
            "GetElementAddressOfSet",
            NativeFn::from_fn(
                get_element_address_of_set
                    as unsafe extern "C" fn(ContainerAddress, PropertyDescriptor, i32) -> ElementAddress,
            ),
        ),
        ("IsSetContainsElement", NativeFn::from_fn(is_set_contains_element as SetQuery)),
        ("AddSetElement", NativeFn::from_fn(add_set_element as SetQuery)),
        ("RemoveSetElement", NativeFn::from_fn(remove_set_element as SetQuery)),
        (
            "ClearSet",
            NativeFn::from_fn(clear_set as unsafe extern "C" fn(ContainerAddress, PropertyDescriptor)),
        ),
        (
            "GetStringOfName",
            NativeFn::from_fn(get_string_of_name as unsafe extern "C" fn(*const FName) -> NativeChars),
        ),
        (
            "GetNameOfString",
            NativeFn::from_fn(get_name_of_string as unsafe extern "C" fn(NativeChars) -> FName),
        ),
        (
            "ValidateUnrealSharpBuildInfo",
            NativeFn::from_fn(validate_build_info as unsafe extern "C" fn(*const BuildInfo)),
        ),
    ]
}

/// Registry holding every export except those named in `without`
pub fn registry_without(without: &[&str]) -> FunctionRegistry {
    let registry = FunctionRegistry::new();
    for (name, function) in exports() {
        if !without.contains(&name) {
            registry.register(name, function).unwrap();
        }
    }
    registry
}

pub fn registry() -> FunctionRegistry {
    registry_without(&[])
}

static INSTALL: Once = Once::new();

/// Install the mock engine as the process-wide resolver
pub fn install() {
    INSTALL.call_once(|| {
        install_resolver(Box::new(registry())).unwrap();
    });
}
