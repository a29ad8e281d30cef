//! Symbol table for the engine's C ABI.
//!
//! The engine ships as a platform dynamic library; the typed function
//! pointers are resolved once at load time and kept alongside the library
//! handle so they stay valid for the bridge's lifetime.

use std::ffi::c_char;
use std::path::Path;

use libloading::Library;

use super::EngineError;

/// `train_network(dataset_path, &accuracies, &losses, &final_accuracy,
/// &length, epochs) -> success`.
///
/// On `true` the engine hands over two freshly allocated buffers of
/// `length` elements each; on `false` nothing was allocated.
pub(crate) type TrainFn = unsafe extern "C" fn(
    *const c_char,
    *mut *mut f64,
    *mut *mut f64,
    *mut f64,
    *mut usize,
    usize,
) -> bool;

/// `predict(weight, size, width, height) -> owned label`.
pub(crate) type PredictFn = unsafe extern "C" fn(f64, f64, f64, f64) -> *mut c_char;

/// Releases one buffer previously returned by `train_network`.
pub(crate) type FreeArrayFn = unsafe extern "C" fn(*mut f64);

/// Releases one string previously returned by `predict`.
pub(crate) type FreeStringFn = unsafe extern "C" fn(*mut c_char);

/// The resolved boundary functions.
#[derive(Clone, Copy)]
pub(crate) struct EngineFns {
    pub(crate) train: TrainFn,
    pub(crate) predict: PredictFn,
    pub(crate) free_array: FreeArrayFn,
    pub(crate) free_string: FreeStringFn,
}

/// Loaded engine library plus its resolved symbols.
pub(crate) struct EngineApi {
    // Keeps the resolved function pointers valid; never used directly.
    _library: Option<Library>,
    pub(crate) fns: EngineFns,
}

impl EngineApi {
    /// Load the engine library and resolve all boundary symbols.
    pub(crate) fn load(path: &Path) -> Result<Self, EngineError> {
        let library = unsafe { Library::new(path) }.map_err(|source| EngineError::Library {
            path: path.to_path_buf(),
            source,
        })?;
        let fns = unsafe {
            EngineFns {
                train: *resolve(&library, b"train_network\0")?,
                predict: *resolve(&library, b"predict\0")?,
                free_array: *resolve(&library, b"free_array\0")?,
                free_string: *resolve(&library, b"free_string\0")?,
            }
        };
        Ok(Self {
            _library: Some(library),
            fns,
        })
    }

    /// Wrap an already-resolved function table (test engines).
    #[cfg(test)]
    pub(crate) fn from_fns(fns: EngineFns) -> Self {
        Self {
            _library: None,
            fns,
        }
    }
}

unsafe fn resolve<'a, T>(
    library: &'a Library,
    name: &'static [u8],
) -> Result<libloading::Symbol<'a, T>, EngineError> {
    unsafe { library.get(name) }.map_err(|source| EngineError::Symbol {
        name: symbol_name(name),
        source,
    })
}

fn symbol_name(raw: &'static [u8]) -> &'static str {
    std::str::from_utf8(raw)
        .unwrap_or("?")
        .trim_end_matches('\0')
}
