//! Unreal Interop - function-pointer bindings and native container access
//!
//! This crate sits between a managed scripting runtime and the native engine.
//! Native entry points are resolved once per subsystem into binding tables;
//! typed wrappers marshal arguments into the exact layout each entry point
//! expects. Native containers are reached in place through opaque handles.

pub mod config;
pub mod error;
pub mod ffi;
pub mod host;
pub mod interop;
pub mod logging;

// Re-export commonly used items
pub use config::InteropConfig;
pub use error::{InteropError, InteropResult};
pub use interop::{
    install_resolver, BindingTable, ContainerAddress, ElementAddress, FName, FunctionRegistry,
    NativeFn, NativeSet, PropertyDescriptor, Resolver,
};

use interop::{Library, PrefixedLibrary};

/// Initialize with configuration discovered from the working directory and
/// the environment
pub fn init() -> InteropResult<()> {
    let config = match std::env::current_dir()
        .ok()
        .and_then(|dir| InteropConfig::discover(&dir))
    {
        Some(path) => InteropConfig::load(&path)?,
        None => InteropConfig::default(),
    };
    init_with_config(&config.with_env_overrides())
}

/// Start logging and, when a library is configured, install it as the global
/// resolver
pub fn init_with_config(config: &InteropConfig) -> InteropResult<()> {
    logging::init_with_config(&config.logging.to_log_config());

    if let Some(path) = &config.resolver.library {
        let library = Library::load_path(path)?;
        logging::info!(library = library.path(), "using library resolver");
        install_resolver(Box::new(PrefixedLibrary::new(
            library,
            config.resolver.symbol_prefix.clone(),
        )))?;
    }

    Ok(())
}
