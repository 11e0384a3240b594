//! Name subsystem - conversion between engine names and text
//!
//! `FName` is a fixed 8-byte value. It is passed by address into the native
//! call and returned by value; text goes out as a NUL-terminated buffer.

use core::fmt;

use super::abi::Signature;
use super::binding::{BindingTable, SlotDecl};
use super::strings::{decode_native_chars, ManagedText};
use super::types::{FfiLayout, FfiType, NativeChars};
use crate::error::InteropResult;

/// Engine name value (comparison index + instance number)
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct FName {
    pub comparison_index: u32,
    pub number: u32,
}

impl FName {
    /// The engine's "no name" sentinel
    pub const NONE: FName = FName {
        comparison_index: 0,
        number: 0,
    };

    pub const fn new(comparison_index: u32, number: u32) -> Self {
        Self {
            comparison_index,
            number,
        }
    }

    pub const fn is_none(&self) -> bool {
        self.comparison_index == 0 && self.number == 0
    }
}

impl FfiLayout for FName {
    const TYPE: FfiType = FfiType::Aggregate(core::mem::size_of::<FName>());
}

/// Raw indices only; use `text_of` for the engine's text
impl fmt::Display for FName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FName({}, {})", self.comparison_index, self.number)
    }
}

pub mod slot {
    pub const GET_STRING_OF_NAME: usize = 0;
    pub const GET_NAME_OF_STRING: usize = 1;
}

static SLOTS: [SlotDecl; 2] = [
    SlotDecl::new(
        "GetStringOfName",
        Signature::cdecl(&[FfiType::Pointer], FfiType::String),
    ),
    SlotDecl::new(
        "GetNameOfString",
        Signature::cdecl(&[FfiType::String], FfiType::Aggregate(8)),
    ),
];

pub static BINDINGS: BindingTable = BindingTable::new("NameInteropUtils", &SLOTS);

type GetStringOfName = unsafe extern "C" fn(*const FName) -> NativeChars;
type GetNameOfString = unsafe extern "C" fn(NativeChars) -> FName;

/// Text of `name`. `None` when the native side returns no text.
pub fn text_of(name: FName) -> InteropResult<Option<String>> {
    let table = BINDINGS.resolve()?;
    let get_string_of_name = table.function::<GetStringOfName>(slot::GET_STRING_OF_NAME);

    // SAFETY: the slot is declared with this exact layout and `name` outlives
    // the call. The returned buffer is decoded before any other native call.
    unsafe {
        let chars = get_string_of_name(&name);
        Ok(decode_native_chars(chars))
    }
}

/// Name for `text`; `None` maps to whatever the native side returns for a
/// null buffer (the `NONE` sentinel on a conforming engine).
pub fn name_of(text: Option<&str>) -> InteropResult<FName> {
    let table = BINDINGS.resolve()?;
    let get_name_of_string = table.function::<GetNameOfString>(slot::GET_NAME_OF_STRING);
    let text = ManagedText::new(text)?;

    // SAFETY: `text` keeps the buffer alive until the call returns
    Ok(unsafe { get_name_of_string(text.as_native()) })
}
