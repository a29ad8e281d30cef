//! Boundary to the native training/inference engine.
//!
//! The engine performs all actual training and inference; this module owns
//! the single blocking call into it per operation, the copy of its results
//! into locally owned memory, and the release of every foreign allocation
//! exactly once. Foreign pointers never escape this module.

pub(crate) mod api;
mod guard;

use std::ffi::CString;
use std::path::{Path, PathBuf};
use std::ptr;

use thiserror::Error;

use api::EngineApi;
use guard::{ForeignBuffer, ForeignString};

/// Base name of the engine dynamic library.
pub const ENGINE_LIBRARY_STEM: &str = "trainer_engine";

/// Sentinel label the engine returns when no class is confident.
pub const UNKNOWN_LABEL: &str = "unknown";

/// Epoch counts the engine accepts; requests outside are clamped.
pub const EPOCH_RANGE: std::ops::RangeInclusive<u32> = 100..=100_000;

/// Everything a successful training call hands back, copied into local
/// memory. Populated atomically; replaced wholesale on the next run.
#[derive(Clone, Debug)]
pub struct TrainingRun {
    /// Per-epoch accuracy, in epoch order.
    pub accuracy: Vec<f64>,
    /// Per-epoch loss, in epoch order, same length as `accuracy`.
    pub loss: Vec<f64>,
    /// Accuracy of the final model; may differ from the last epoch sample.
    pub final_accuracy: f64,
}

/// Four positive features describing one fruit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PredictionInput {
    /// Weight in grams.
    pub weight: f64,
    /// Size in centimeters.
    pub size: f64,
    /// Width in centimeters.
    pub width: f64,
    /// Height in centimeters.
    pub height: f64,
}

/// Failures local to the boundary itself.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The engine library could not be loaded.
    #[error("Failed to load engine library at {path}: {source}")]
    Library {
        /// Library path attempted.
        path: PathBuf,
        /// Loader error.
        source: libloading::Error,
    },
    /// The library is missing one of the boundary symbols.
    #[error("Engine library is missing symbol `{name}`: {source}")]
    Symbol {
        /// Symbol that failed to resolve.
        name: &'static str,
        /// Loader error.
        source: libloading::Error,
    },
    /// The dataset path cannot be represented as a C string.
    #[error("Dataset path contains an interior nul byte")]
    NulInPath,
    /// The engine reported success but returned a null buffer.
    #[error("Engine returned a null metrics buffer for a successful run")]
    NullTrainingBuffer,
    /// The engine returned a null prediction string.
    #[error("Engine returned a null prediction")]
    NullPrediction,
}

/// Failures of one training request.
#[derive(Debug, Error)]
pub enum TrainingError {
    /// The dataset file does not exist; raised before crossing the boundary.
    #[error("Dataset file not found at {path}")]
    DatasetNotFound {
        /// Path that was checked.
        path: PathBuf,
    },
    /// The engine reported failure. No buffers were allocated.
    #[error("Engine training failed; see the engine log output")]
    EngineFailure,
    /// A boundary-local failure.
    #[error(transparent)]
    Engine(#[from] EngineError),
}

/// Handle to the loaded engine; the only component allowed to hold foreign
/// memory, and only transiently between receipt and copy.
pub struct EngineBridge {
    api: EngineApi,
}

impl EngineBridge {
    /// Load the engine from an explicit library path.
    pub fn load(path: &Path) -> Result<Self, EngineError> {
        let api = EngineApi::load(path)?;
        tracing::info!("Engine library loaded from {}", path.display());
        Ok(Self { api })
    }

    /// Load the engine from the configured override or the default search
    /// locations (next to the executable, then the working directory, then
    /// the system loader path).
    pub fn locate_and_load(override_path: Option<&Path>) -> Result<Self, EngineError> {
        if let Some(path) = override_path {
            return Self::load(path);
        }
        let file_name = default_library_name();
        for dir in search_dirs() {
            let candidate = dir.join(&file_name);
            if candidate.exists() {
                return Self::load(&candidate);
            }
        }
        Self::load(Path::new(&file_name))
    }

    #[cfg(test)]
    pub(crate) fn from_fns(fns: api::EngineFns) -> Self {
        Self {
            api: EngineApi::from_fns(fns),
        }
    }

    /// Run one blocking training call and copy its metrics.
    ///
    /// Verifies the dataset exists before crossing the boundary and clamps
    /// the epoch count to [`EPOCH_RANGE`]. On engine failure nothing was
    /// allocated and nothing is freed; on success both metric buffers are
    /// copied in full and then released, accuracy first, exactly once each,
    /// even when validation of the results fails afterwards.
    ///
    /// May block the calling thread for the full duration of training.
    pub fn run_training(
        &self,
        dataset_path: &Path,
        epochs: u32,
    ) -> Result<TrainingRun, TrainingError> {
        if !dataset_path.exists() {
            return Err(TrainingError::DatasetNotFound {
                path: dataset_path.to_path_buf(),
            });
        }
        let epochs = epochs.clamp(*EPOCH_RANGE.start(), *EPOCH_RANGE.end());
        let c_path = CString::new(dataset_path.to_string_lossy().as_bytes())
            .map_err(|_| EngineError::NulInPath)?;

        let mut accuracy_ptr: *mut f64 = ptr::null_mut();
        let mut loss_ptr: *mut f64 = ptr::null_mut();
        let mut final_accuracy = 0.0_f64;
        let mut length = 0_usize;

        let success = unsafe {
            (self.api.fns.train)(
                c_path.as_ptr(),
                &mut accuracy_ptr,
                &mut loss_ptr,
                &mut final_accuracy,
                &mut length,
                epochs as usize,
            )
        };
        if !success {
            // A failed call allocated nothing; freeing here would be invalid.
            return Err(TrainingError::EngineFailure);
        }

        // Adopt both allocations before any validation so every exit path
        // below releases them.
        let accuracy_buf =
            unsafe { ForeignBuffer::adopt(accuracy_ptr, length, self.api.fns.free_array) };
        let loss_buf = unsafe { ForeignBuffer::adopt(loss_ptr, length, self.api.fns.free_array) };

        if length > 0 && (accuracy_buf.is_none() || loss_buf.is_none()) {
            return Err(EngineError::NullTrainingBuffer.into());
        }

        let accuracy = accuracy_buf.as_ref().map(ForeignBuffer::to_vec).unwrap_or_default();
        let loss = loss_buf.as_ref().map(ForeignBuffer::to_vec).unwrap_or_default();
        drop(accuracy_buf);
        drop(loss_buf);

        tracing::debug!(epochs, samples = length, "Training call returned");
        Ok(TrainingRun {
            accuracy,
            loss,
            final_accuracy,
        })
    }

    /// Run one synchronous prediction and copy the returned label.
    ///
    /// The foreign string is released exactly once, immediately after the
    /// copy, before this returns.
    pub fn run_prediction(&self, input: &PredictionInput) -> Result<String, EngineError> {
        let raw = unsafe {
            (self.api.fns.predict)(input.weight, input.size, input.width, input.height)
        };
        let label = unsafe { ForeignString::adopt(raw, self.api.fns.free_string) }
            .ok_or(EngineError::NullPrediction)?;
        Ok(label.to_string_copy())
    }
}

/// Platform file name of the engine library.
pub fn default_library_name() -> String {
    format!(
        "{}{}{}",
        std::env::consts::DLL_PREFIX,
        ENGINE_LIBRARY_STEM,
        std::env::consts::DLL_SUFFIX
    )
}

fn search_dirs() -> Vec<PathBuf> {
    let mut dirs = Vec::new();
    if let Ok(exe) = std::env::current_exe() {
        if let Some(dir) = exe.parent() {
            dirs.push(dir.to_path_buf());
        }
    }
    if let Ok(cwd) = std::env::current_dir() {
        dirs.push(cwd);
    }
    dirs
}

#[cfg(test)]
mod tests {
    use super::api::EngineFns;
    use super::*;
    use std::ffi::{CStr, CString, c_char};
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    // The mock engine records its traffic in globals, so tests touching it
    // serialize on this lock.
    static ENGINE_LOCK: Mutex<()> = Mutex::new(());

    static TRAIN_CALLS: AtomicUsize = AtomicUsize::new(0);
    static PREDICT_CALLS: AtomicUsize = AtomicUsize::new(0);
    static ARRAY_RELEASES: AtomicUsize = AtomicUsize::new(0);
    static STRING_RELEASES: AtomicUsize = AtomicUsize::new(0);
    static LAST_EPOCHS: AtomicUsize = AtomicUsize::new(0);

    const SAMPLES: usize = 3;

    fn reset_counters() {
        TRAIN_CALLS.store(0, Ordering::SeqCst);
        PREDICT_CALLS.store(0, Ordering::SeqCst);
        ARRAY_RELEASES.store(0, Ordering::SeqCst);
        STRING_RELEASES.store(0, Ordering::SeqCst);
        LAST_EPOCHS.store(0, Ordering::SeqCst);
    }

    unsafe extern "C" fn train_ok(
        _dataset: *const c_char,
        accuracies: *mut *mut f64,
        losses: *mut *mut f64,
        final_accuracy: *mut f64,
        length: *mut usize,
        epochs: usize,
    ) -> bool {
        TRAIN_CALLS.fetch_add(1, Ordering::SeqCst);
        LAST_EPOCHS.store(epochs, Ordering::SeqCst);
        let accuracy = vec![0.5, 0.8, 0.9].into_boxed_slice();
        let loss = vec![1.2, 0.6, 0.3].into_boxed_slice();
        unsafe {
            *accuracies = Box::into_raw(accuracy) as *mut f64;
            *losses = Box::into_raw(loss) as *mut f64;
            *final_accuracy = 0.97;
            *length = SAMPLES;
        }
        true
    }

    unsafe extern "C" fn train_fail(
        _dataset: *const c_char,
        _accuracies: *mut *mut f64,
        _losses: *mut *mut f64,
        _final_accuracy: *mut f64,
        _length: *mut usize,
        _epochs: usize,
    ) -> bool {
        TRAIN_CALLS.fetch_add(1, Ordering::SeqCst);
        false
    }

    unsafe extern "C" fn predict_apple(
        _weight: f64,
        _size: f64,
        _width: f64,
        _height: f64,
    ) -> *mut c_char {
        PREDICT_CALLS.fetch_add(1, Ordering::SeqCst);
        CString::new("apple").unwrap().into_raw()
    }

    unsafe extern "C" fn predict_from_features(
        weight: f64,
        size: f64,
        _width: f64,
        _height: f64,
    ) -> *mut c_char {
        PREDICT_CALLS.fetch_add(1, Ordering::SeqCst);
        let label = if weight > 100.0 && size > 6.0 { "apple" } else { "unknown" };
        CString::new(label).unwrap().into_raw()
    }

    unsafe extern "C" fn free_array(ptr: *mut f64) {
        if !ptr.is_null() {
            ARRAY_RELEASES.fetch_add(1, Ordering::SeqCst);
            drop(unsafe { Box::from_raw(std::slice::from_raw_parts_mut(ptr, SAMPLES)) });
        }
    }

    unsafe extern "C" fn free_string(ptr: *mut c_char) {
        if !ptr.is_null() {
            assert!(!unsafe { CStr::from_ptr(ptr) }.to_bytes().is_empty());
            STRING_RELEASES.fetch_add(1, Ordering::SeqCst);
            drop(unsafe { CString::from_raw(ptr) });
        }
    }

    fn bridge(train: api::TrainFn, predict: api::PredictFn) -> EngineBridge {
        EngineBridge::from_fns(EngineFns {
            train,
            predict,
            free_array,
            free_string,
        })
    }

    fn dataset_file() -> tempfile::NamedTempFile {
        tempfile::NamedTempFile::new().unwrap()
    }

    #[test]
    fn successful_training_copies_then_releases_both_buffers() {
        let _lock = ENGINE_LOCK.lock().unwrap();
        reset_counters();
        let dataset = dataset_file();

        let run = bridge(train_ok, predict_apple)
            .run_training(dataset.path(), 5000)
            .unwrap();

        assert_eq!(run.accuracy, vec![0.5, 0.8, 0.9]);
        assert_eq!(run.loss, vec![1.2, 0.6, 0.3]);
        assert_eq!(run.final_accuracy, 0.97);
        assert_eq!(TRAIN_CALLS.load(Ordering::SeqCst), 1);
        assert_eq!(ARRAY_RELEASES.load(Ordering::SeqCst), 2);
        assert_eq!(LAST_EPOCHS.load(Ordering::SeqCst), 5000);
    }

    #[test]
    fn failed_training_releases_nothing() {
        let _lock = ENGINE_LOCK.lock().unwrap();
        reset_counters();
        let dataset = dataset_file();

        let err = bridge(train_fail, predict_apple)
            .run_training(dataset.path(), 5000)
            .unwrap_err();

        assert!(matches!(err, TrainingError::EngineFailure));
        assert_eq!(TRAIN_CALLS.load(Ordering::SeqCst), 1);
        assert_eq!(ARRAY_RELEASES.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn missing_dataset_never_crosses_the_boundary() {
        let _lock = ENGINE_LOCK.lock().unwrap();
        reset_counters();

        let err = bridge(train_ok, predict_apple)
            .run_training(Path::new("/nonexistent/fruit.csv"), 5000)
            .unwrap_err();

        assert!(matches!(err, TrainingError::DatasetNotFound { .. }));
        assert_eq!(TRAIN_CALLS.load(Ordering::SeqCst), 0);
        assert_eq!(ARRAY_RELEASES.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn epoch_count_is_clamped_to_the_engine_range() {
        let _lock = ENGINE_LOCK.lock().unwrap();
        reset_counters();
        let dataset = dataset_file();
        let bridge = bridge(train_ok, predict_apple);

        bridge.run_training(dataset.path(), 5).unwrap();
        assert_eq!(LAST_EPOCHS.load(Ordering::SeqCst), 100);

        bridge.run_training(dataset.path(), 2_000_000).unwrap();
        assert_eq!(LAST_EPOCHS.load(Ordering::SeqCst), 100_000);
    }

    #[test]
    fn prediction_copies_then_releases_the_label() {
        let _lock = ENGINE_LOCK.lock().unwrap();
        reset_counters();

        let input = PredictionInput {
            weight: 150.0,
            size: 7.5,
            width: 6.0,
            height: 6.0,
        };
        let label = bridge(train_ok, predict_from_features)
            .run_prediction(&input)
            .unwrap();

        assert_eq!(label, "apple");
        assert_eq!(PREDICT_CALLS.load(Ordering::SeqCst), 1);
        assert_eq!(STRING_RELEASES.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn low_confidence_features_yield_the_unknown_sentinel() {
        let _lock = ENGINE_LOCK.lock().unwrap();
        reset_counters();

        let input = PredictionInput {
            weight: 10.0,
            size: 1.0,
            width: 1.0,
            height: 1.0,
        };
        let label = bridge(train_ok, predict_from_features)
            .run_prediction(&input)
            .unwrap();

        assert_eq!(label, UNKNOWN_LABEL);
        assert_eq!(STRING_RELEASES.load(Ordering::SeqCst), 1);
    }
}
