//! Host hand-shake - the function table the native engine gives us at start
//!
//! The engine passes a `HostInfo` to `unreal_interop_initialize`. Its
//! `get_function_pointer` entry backs the global resolver and `log_message`
//! forwards managed log lines into the engine log.

use core::ffi::{c_char, c_void};
use once_cell::sync::OnceCell;
use std::ffi::CString;
use tracing::Level;

use crate::error::{InteropError, InteropResult};
use crate::interop::{
    install_resolver, BindingTable, FfiType, NativeFn, Resolver, Signature, SlotDecl,
};
use crate::logging;

pub type GetFunctionPointer = unsafe extern "C" fn(*const c_void, *const c_char) -> *mut c_void;
pub type LogMessage = unsafe extern "C" fn(i32, *const c_char);

/// Function table filled in by the native side
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct HostInfo {
    /// Must equal `size_of::<HostInfo>()`
    pub size: i32,
    /// Opaque registry instance passed back into `get_function_pointer`
    pub instance: *const c_void,
    pub get_function_pointer: Option<GetFunctionPointer>,
    pub log_message: Option<LogMessage>,
}

// The host guarantees its function table outlives the managed runtime
unsafe impl Send for HostInfo {}
unsafe impl Sync for HostInfo {}

impl HostInfo {
    /// Copy and validate the structure behind `info`.
    ///
    /// # Safety
    /// `info` must be null or point to a readable `HostInfo`.
    pub unsafe fn from_raw(info: *const HostInfo) -> InteropResult<Self> {
        if info.is_null() {
            return Err(InteropError::HostInfo("null pointer".into()));
        }

        // Only `size` is read until it proves the whole structure is there
        let size = core::ptr::addr_of!((*info).size).read_unaligned();
        let expected = core::mem::size_of::<HostInfo>();
        if usize::try_from(size).ok() != Some(expected) {
            return Err(InteropError::HostInfo(format!(
                "size {} does not match expected {}",
                size, expected
            )));
        }

        let info = info.read_unaligned();
        if info.get_function_pointer.is_none() {
            return Err(InteropError::HostInfo("null get_function_pointer".into()));
        }
        if info.log_message.is_none() {
            return Err(InteropError::HostInfo("null log_message".into()));
        }
        Ok(info)
    }

    /// Ask the host for the address registered under `name`
    pub fn function_pointer(&self, name: &str) -> InteropResult<Option<NativeFn>> {
        let get_function_pointer = self
            .get_function_pointer
            .ok_or_else(|| InteropError::HostInfo("null get_function_pointer".into()))?;
        let name = CString::new(name).map_err(|_| InteropError::InvalidSymbolName(name.into()))?;
        // SAFETY: validated host table; `name` outlives the call
        let address = unsafe { get_function_pointer(self.instance, name.as_ptr()) };
        Ok(NativeFn::new(address))
    }

    /// Write `message` to the host log
    pub fn log(&self, level: NativeLogLevel, message: &str) -> InteropResult<()> {
        let log_message = self
            .log_message
            .ok_or_else(|| InteropError::HostInfo("null log_message".into()))?;
        let text = CString::new(message).map_err(|_| InteropError::InvalidText)?;
        logging::log_host_message(level.tracing_level(), message);
        // SAFETY: validated host table; `text` outlives the call
        unsafe { log_message(level as i32, text.as_ptr()) };
        Ok(())
    }
}

/// Resolver backed by the host's function-pointer lookup
pub struct HostResolver {
    info: HostInfo,
}

impl HostResolver {
    pub fn new(info: HostInfo) -> Self {
        Self { info }
    }
}

impl Resolver for HostResolver {
    fn lookup(&self, name: &str) -> Option<NativeFn> {
        self.info.function_pointer(name).ok().flatten()
    }
}

/// Log levels understood by the host's `log_message`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum NativeLogLevel {
    Verbose = -10,
    Information = -9,
    Warning = -8,
    Error = -7,
}

impl NativeLogLevel {
    pub fn from_raw(level: i32) -> Self {
        match level {
            -10 => Self::Verbose,
            -8 => Self::Warning,
            -7 => Self::Error,
            _ => Self::Information,
        }
    }

    pub fn tracing_level(self) -> Level {
        match self {
            Self::Verbose => Level::TRACE,
            Self::Information => Level::INFO,
            Self::Warning => Level::WARN,
            Self::Error => Level::ERROR,
        }
    }
}

static HOST: OnceCell<HostInfo> = OnceCell::new();

/// Make the host table the global resolver, then record it. Nothing is
/// recorded when another resolver is already installed.
pub fn attach(info: HostInfo) -> InteropResult<()> {
    install_resolver(Box::new(HostResolver::new(info)))?;
    HOST.set(info)
        .map_err(|_| InteropError::ResolverAlreadyInstalled)
}

pub fn host() -> Option<&'static HostInfo> {
    HOST.get()
}

/// Forward to the host log when attached, otherwise only to tracing
pub fn log(level: NativeLogLevel, message: &str) -> InteropResult<()> {
    match host() {
        Some(info) => info.log(level, message),
        None => {
            logging::log_host_message(level.tracing_level(), message);
            Ok(())
        }
    }
}

// ============================================================================
// Build info validation
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum Platform {
    Windows = 0,
    Mac = 1,
    Linux = 2,
    Android = 3,
    Ios = 4,
    Unknown = 255,
}

impl Platform {
    pub const fn current() -> Self {
        if cfg!(target_os = "windows") {
            Self::Windows
        } else if cfg!(target_os = "macos") {
            Self::Mac
        } else if cfg!(target_os = "android") {
            Self::Android
        } else if cfg!(target_os = "ios") {
            Self::Ios
        } else if cfg!(target_os = "linux") {
            Self::Linux
        } else {
            Self::Unknown
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum BuildConfiguration {
    Debug = 0,
    Release = 1,
}

/// Build description the host compares with its own
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildInfo {
    pub platform: Platform,
    pub configuration: BuildConfiguration,
    pub with_editor: bool,
}

impl BuildInfo {
    pub const fn current() -> Self {
        Self {
            platform: Platform::current(),
            configuration: if cfg!(debug_assertions) {
                BuildConfiguration::Debug
            } else {
                BuildConfiguration::Release
            },
            with_editor: cfg!(feature = "editor"),
        }
    }
}

pub mod slot {
    pub const VALIDATE_BUILD_INFO: usize = 0;
}

static SLOTS: [SlotDecl; 1] = [SlotDecl::new(
    "ValidateUnrealSharpBuildInfo",
    Signature::cdecl(&[FfiType::Pointer], FfiType::Void),
)];

pub static BINDINGS: BindingTable = BindingTable::new("UnrealInteropFunctions", &SLOTS);

type ValidateBuildInfo = unsafe extern "C" fn(*const BuildInfo);

/// Send this build's description to the host for validation. A mismatch is
/// reported (and usually made fatal) by the host.
pub fn validate_build_info() -> InteropResult<()> {
    let table = BINDINGS.resolve()?;
    let validate = table.function::<ValidateBuildInfo>(slot::VALIDATE_BUILD_INFO);
    let info = BuildInfo::current();
    tracing::debug!(target: "interop", build = ?info, "validating build info with host");
    // SAFETY: `info` outlives the call; the host only reads it
    unsafe { validate(&info) };
    Ok(())
}
