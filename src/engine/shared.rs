use std::path::Path;
use std::sync::{Arc, RwLock};

use tracing::info;

use crate::engine::registry::RuleRegistry;
use crate::rules::loader::RuleLoadError;

/// Process-wide registry handle. Readers take an immutable snapshot; reloads
/// replace the whole snapshot and never mutate a published one.
#[derive(Debug)]
pub struct SharedRegistry {
    current: RwLock<Arc<RuleRegistry>>,
}

impl SharedRegistry {
    pub fn new(registry: RuleRegistry) -> Self {
        Self {
            current: RwLock::new(Arc::new(registry)),
        }
    }

    pub fn snapshot(&self) -> Arc<RuleRegistry> {
        // snapshots are replaced whole; a poisoned lock still holds a complete one
        match self.current.read() {
            Ok(guard) => Arc::clone(&guard),
            Err(poisoned) => Arc::clone(&poisoned.into_inner()),
        }
    }

    /// Publishes `next` and returns the snapshot it replaced.
    pub fn swap(&self, next: RuleRegistry) -> Arc<RuleRegistry> {
        let next = Arc::new(next);
        let mut guard = match self.current.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        std::mem::replace(&mut *guard, next)
    }

    /// Loads and validates `dir` before publishing; on error the current set stays live.
    pub fn reload_from_dir(&self, dir: &Path) -> Result<Arc<RuleRegistry>, RuleLoadError> {
        let next = RuleRegistry::from_dir(dir)?;
        let version = next.version();
        let previous = self.swap(next);
        info!(
            previous = %previous.version(),
            current = %version,
            "rule tables reloaded"
        );
        Ok(previous)
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/engine/shared.rs"]
mod tests;
