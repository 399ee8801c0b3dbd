use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use once_cell::sync::OnceCell;
use tracing::{info, warn};

use crate::error::{DashboardError, DashboardResult};

/// One-shot load gate in front of a rendering engine.
///
/// The engine is loaded lazily by the first render that needs it. Concurrent
/// callers block on that single load instead of starting their own, and no
/// render runs before the engine is ready. A failed load leaves the gate
/// empty: the failing render reports the error and the next render attempts
/// the load again.
#[derive(Debug)]
pub struct EngineGate<E> {
    name: &'static str,
    engine: OnceCell<Mutex<E>>,
    load_attempts: AtomicUsize,
}

impl<E> EngineGate<E> {
    #[must_use]
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            engine: OnceCell::new(),
            load_attempts: AtomicUsize::new(0),
        }
    }

    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.engine.get().is_some()
    }

    /// Number of times a load was started, successful or not.
    #[must_use]
    pub fn load_attempts(&self) -> usize {
        self.load_attempts.load(Ordering::SeqCst)
    }

    /// Returns the loaded engine, running `load` first if needed.
    fn get_or_load<F>(&self, load: F) -> DashboardResult<&Mutex<E>>
    where
        F: FnOnce() -> DashboardResult<E>,
    {
        self.engine.get_or_try_init(|| {
            let attempt = self.load_attempts.fetch_add(1, Ordering::SeqCst) + 1;
            match load() {
                Ok(engine) => {
                    info!(engine = self.name, attempt, "rendering engine loaded");
                    Ok(Mutex::new(engine))
                }
                Err(err) => {
                    warn!(
                        engine = self.name,
                        attempt,
                        error = %err,
                        "rendering engine failed to load"
                    );
                    Err(match err {
                        DashboardError::EngineLoad(_) => err,
                        other => DashboardError::EngineLoad(format!("{}: {other}", self.name)),
                    })
                }
            }
        })
    }

    /// Runs `draw` with exclusive access to the engine once it is loaded.
    pub fn with_engine<F, D, T>(&self, load: F, draw: D) -> DashboardResult<T>
    where
        F: FnOnce() -> DashboardResult<E>,
        D: FnOnce(&mut E) -> DashboardResult<T>,
    {
        let engine = self.get_or_load(load)?;
        let mut guard = engine
            .lock()
            .map_err(|_| DashboardError::Render(format!("{} engine lock poisoned", self.name)))?;
        draw(&mut guard)
    }
}
