//! Error taxonomy for the interop layer.
//!
//! Only resolution and hand-shake problems are reported here. Invalid native
//! handles and mismatched call signatures are never detected at runtime.

use thiserror::Error;

/// Result alias used throughout the crate
pub type InteropResult<T> = Result<T, InteropError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InteropError {
    /// A declared slot has no native address. Usually an engine/binding
    /// version mismatch.
    #[error("missing native symbol: {slot} (binding table {table})")]
    MissingBinding { table: String, slot: String },

    #[error("no native resolver installed")]
    ResolverNotInstalled,

    #[error("a native resolver is already installed")]
    ResolverAlreadyInstalled,

    #[error("invalid symbol name: {0:?}")]
    InvalidSymbolName(String),

    #[error("failed to load library '{path}': {reason}")]
    LibraryLoad { path: String, reason: String },

    #[error("interop function '{0}' is already registered with a different address")]
    DuplicateFunction(String),

    #[error("text contains an interior NUL and cannot cross the native boundary")]
    InvalidText,

    #[error("configuration error: {0}")]
    Config(String),

    #[error("invalid host info: {0}")]
    HostInfo(String),
}

impl InteropError {
    pub fn missing_binding(table: &str, slot: &str) -> Self {
        Self::MissingBinding {
            table: table.to_string(),
            slot: slot.to_string(),
        }
    }

    /// True for failures that indicate the native side does not export what
    /// this build expects
    pub fn is_version_mismatch(&self) -> bool {
        matches!(self, Self::MissingBinding { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_binding_message_names_symbol() {
        let err = InteropError::missing_binding("SetInteropUtils", "ClearSet");
        assert_eq!(
            err.to_string(),
            "missing native symbol: ClearSet (binding table SetInteropUtils)"
        );
        assert!(err.is_version_mismatch());
        assert!(!InteropError::ResolverNotInstalled.is_version_mismatch());
    }
}
