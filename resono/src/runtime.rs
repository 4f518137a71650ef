//! Process-wide state shared by all engines.
//!
//! [`init`] probes the CPU once and picks the DSP backend and the default worker
//! count. Engines hold on to the [`Runtime`] they were initialized with, so a
//! [`finish`] followed by a new [`init`] never changes the backend under a
//! running `process()`.

use std::sync::{Arc, RwLock};

use crate::dsp::{self, Backend};

#[derive(Debug)]
pub struct Runtime {
    backend: &'static Backend,
    hardware_threads: usize,
}

impl Runtime {
    fn probe() -> Self {
        let features = dsp::detect();
        let backend = dsp::select(features);
        let hardware_threads = num_cpus::get().max(1);
        log::debug!(
            "Runtime: features {:?}, backend '{}', {} hardware threads",
            features,
            backend.name,
            hardware_threads
        );
        Self {
            backend,
            hardware_threads,
        }
    }

    /// Returns the selected kernel table.
    pub fn backend(&self) -> &'static Backend {
        self.backend
    }

    /// Returns the worker count used when a caller asks for automatic sizing.
    pub fn hardware_threads(&self) -> usize {
        self.hardware_threads
    }
}

static RUNTIME: RwLock<Option<Arc<Runtime>>> = RwLock::new(None);

/// Initializes the runtime if it isn't already and returns it.
pub fn init() -> Arc<Runtime> {
    if let Some(runtime) = current() {
        return runtime;
    }

    let mut slot = RUNTIME.write().unwrap_or_else(|poisoned| poisoned.into_inner());
    // Another thread might have won the race between the read and write locks
    if let Some(runtime) = slot.as_ref() {
        return Arc::clone(runtime);
    }
    let runtime = Arc::new(Runtime::probe());
    *slot = Some(Arc::clone(&runtime));
    runtime
}

/// Returns the runtime if [`init`] has been called since the last [`finish`].
pub fn current() -> Option<Arc<Runtime>> {
    RUNTIME
        .read()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
        .as_ref()
        .map(Arc::clone)
}

/// Releases the process-wide runtime. Engines that already hold it keep their copy.
pub fn finish() {
    let mut slot = RUNTIME.write().unwrap_or_else(|poisoned| poisoned.into_inner());
    if slot.take().is_some() {
        log::debug!("Runtime: finished");
    }
}
