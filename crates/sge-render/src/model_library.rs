//! Path-addressed model handles.

use rustc_hash::FxHashMap;

/// Opaque reference to a loaded model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModelHandle(pub u32);

/// Interns model paths into [`ModelHandle`]s.
///
/// Asset loading is out of scope; a handle only remembers the path it came
/// from so scenes can be saved and reloaded.
#[derive(Debug, Clone, Default)]
pub struct ModelLibrary {
    paths: Vec<String>,
    by_path: FxHashMap<String, ModelHandle>,
}

impl ModelLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle for `path`, registering it on first use.
    pub fn load(&mut self, path: &str) -> ModelHandle {
        if let Some(&handle) = self.by_path.get(path) {
            return handle;
        }
        let handle = ModelHandle(self.paths.len() as u32);
        self.paths.push(path.to_string());
        self.by_path.insert(path.to_string(), handle);
        log::debug!("Registered model {} as {:?}", path, handle);
        handle
    }

    pub fn get(&self, path: &str) -> Option<ModelHandle> {
        self.by_path.get(path).copied()
    }

    pub fn path(&self, handle: ModelHandle) -> Option<&str> {
        self.paths.get(handle.0 as usize).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}
