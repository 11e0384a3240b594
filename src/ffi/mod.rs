//! C FFI - entry points the native host calls
//!
//! Design: stable C API with integer status codes:
//! 1. Hand-shake (`unreal_interop_initialize`) installs the host resolver
//! 2. Eager binding of every built-in table so version mismatches show up
//!    at start rather than on first use
//! 3. Build-info validation against the host
//! 4. Statistics export for host-side diagnostics

use crate::error::InteropError;
use crate::host::{self, HostInfo};
use crate::interop::{self, InteropStats};
use crate::logging::{self, debug, error, info};

/// Status codes returned across the C ABI
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteropStatus {
    Ok = 0,
    MissingBinding = 1,
    ResolverNotInstalled = 2,
    InvalidHostInfo = 3,
    AlreadyInitialized = 4,
    Internal = 5,
}

impl From<&InteropError> for InteropStatus {
    fn from(err: &InteropError) -> Self {
        match err {
            InteropError::MissingBinding { .. } => Self::MissingBinding,
            InteropError::ResolverNotInstalled => Self::ResolverNotInstalled,
            InteropError::HostInfo(_) => Self::InvalidHostInfo,
            InteropError::ResolverAlreadyInstalled => Self::AlreadyInitialized,
            _ => Self::Internal,
        }
    }
}

/// Attach to the host and bind all built-in tables.
///
/// # Safety
/// `info` must be null or point to a `HostInfo` whose function pointers stay
/// valid for the rest of the process.
#[no_mangle]
pub unsafe extern "C" fn unreal_interop_initialize(info: *const HostInfo) -> i32 {
    logging::init();
    info!("interop bridge initializing");

    let result = HostInfo::from_raw(info)
        .and_then(host::attach)
        .and_then(|()| bind_all())
        .and_then(|()| host::validate_build_info());

    match result {
        Ok(()) => {
            debug!("interop bridge ready");
            InteropStatus::Ok as i32
        }
        Err(err) => {
            error!(error = %err, "interop bridge initialization failed");
            InteropStatus::from(&err) as i32
        }
    }
}

/// Resolve every built-in binding table now
pub fn bind_all() -> Result<(), InteropError> {
    host::BINDINGS.resolve()?;
    interop::name::BINDINGS.resolve()?;
    interop::set::BINDINGS.resolve()?;
    Ok(())
}

#[no_mangle]
pub extern "C" fn unreal_interop_shutdown() {
    let stats = interop::stats();
    info!(
        tables_resolved = stats.tables_resolved,
        native_calls = stats.native_calls,
        "interop bridge shutting down"
    );
}

/// Copy the current statistics into `out`.
///
/// # Safety
/// `out` must be null or valid for writes.
#[no_mangle]
pub unsafe extern "C" fn unreal_interop_stats(out: *mut InteropStats) -> i32 {
    if out.is_null() {
        return InteropStatus::Internal as i32;
    }
    out.write(interop::stats());
    InteropStatus::Ok as i32
}
