//! Dynamic library loading and symbol resolution
//!
//! Platform-agnostic wrapper around dlopen/LoadLibrary. A loaded library is a
//! `Resolver`: slot names are looked up as exported symbols.

use core::ffi::c_void;
use core::ptr::NonNull;
use std::ffi::CString;

use super::resolver::Resolver;
use super::types::NativeFn;
use crate::error::{InteropError, InteropResult};

/// Handle to dynamically loaded library
pub struct Library {
    handle: NonNull<c_void>,
    path: String,
}

impl Library {
    /// Load library by name
    ///
    /// Searches standard library paths. Use `load_path` for absolute paths.
    pub fn load(name: &str) -> InteropResult<Self> {
        Self::load_impl(name)
    }

    /// Load library from a filesystem path
    pub fn load_path(path: &std::path::Path) -> InteropResult<Self> {
        Self::load_impl(&path.to_string_lossy())
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    #[cfg(unix)]
    fn load_impl(name: &str) -> InteropResult<Self> {
        let cname = CString::new(name).map_err(|_| InteropError::InvalidSymbolName(name.into()))?;

        unsafe {
            let handle = libc::dlopen(cname.as_ptr(), libc::RTLD_NOW);
            match NonNull::new(handle) {
                Some(handle) => {
                    tracing::debug!(target: "interop", library = name, "library loaded");
                    Ok(Self {
                        handle,
                        path: name.to_string(),
                    })
                }
                None => {
                    let err = libc::dlerror();
                    let reason = if !err.is_null() {
                        std::ffi::CStr::from_ptr(err).to_string_lossy().into_owned()
                    } else {
                        "Unknown error".into()
                    };
                    Err(InteropError::LibraryLoad {
                        path: name.to_string(),
                        reason,
                    })
                }
            }
        }
    }

    #[cfg(windows)]
    fn load_impl(name: &str) -> InteropResult<Self> {
        use std::ffi::OsStr;
        use std::os::windows::ffi::OsStrExt;
        use winapi::um::errhandlingapi::GetLastError;
        use winapi::um::libloaderapi::LoadLibraryW;

        let wide: Vec<u16> = OsStr::new(name).encode_wide().chain(Some(0)).collect();

        unsafe {
            let handle = LoadLibraryW(wide.as_ptr()) as *mut c_void;
            match NonNull::new(handle) {
                Some(handle) => Ok(Self {
                    handle,
                    path: name.to_string(),
                }),
                None => Err(InteropError::LibraryLoad {
                    path: name.to_string(),
                    reason: format!("Error code: {}", GetLastError()),
                }),
            }
        }
    }

    /// Get function address by symbol name
    pub fn symbol(&self, name: &str) -> InteropResult<Option<NativeFn>> {
        let cname = CString::new(name).map_err(|_| InteropError::InvalidSymbolName(name.into()))?;
        Ok(NativeFn::new(self.symbol_impl(&cname)))
    }

    #[cfg(unix)]
    fn symbol_impl(&self, name: &CString) -> *const c_void {
        unsafe { libc::dlsym(self.handle.as_ptr(), name.as_ptr()) as *const c_void }
    }

    #[cfg(windows)]
    fn symbol_impl(&self, name: &CString) -> *const c_void {
        use winapi::shared::minwindef::HMODULE;
        use winapi::um::libloaderapi::GetProcAddress;

        unsafe { GetProcAddress(self.handle.as_ptr() as HMODULE, name.as_ptr()) as *const c_void }
    }
}

impl Resolver for Library {
    fn lookup(&self, name: &str) -> Option<NativeFn> {
        self.symbol(name).ok().flatten()
    }
}

impl Drop for Library {
    #[cfg(unix)]
    fn drop(&mut self) {
        unsafe {
            libc::dlclose(self.handle.as_ptr());
        }
    }

    #[cfg(windows)]
    fn drop(&mut self) {
        use winapi::shared::minwindef::HMODULE;
        use winapi::um::libloaderapi::FreeLibrary;

        unsafe {
            FreeLibrary(self.handle.as_ptr() as HMODULE);
        }
    }
}

unsafe impl Send for Library {}
unsafe impl Sync for Library {}

/// Library resolver that prepends a fixed prefix to every slot name
pub struct PrefixedLibrary {
    library: Library,
    prefix: String,
}

impl PrefixedLibrary {
    pub fn new(library: Library, prefix: impl Into<String>) -> Self {
        Self {
            library,
            prefix: prefix.into(),
        }
    }

    pub fn library(&self) -> &Library {
        &self.library
    }
}

impl Resolver for PrefixedLibrary {
    fn lookup(&self, name: &str) -> Option<NativeFn> {
        self.library.lookup(&format!("{}{}", self.prefix, name))
    }
}
