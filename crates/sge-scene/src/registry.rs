//! Script factories keyed by kind name.

use std::collections::BTreeMap;

use bevy_ecs::prelude::*;

use crate::{NativeScript, ScriptableEntity};

pub type ScriptFactory = Box<dyn Fn() -> Box<dyn ScriptableEntity> + Send + Sync>;

/// Builds script instances by name, for scene loading and entity
/// duplication. Lives as a resource in every scene world.
#[derive(Resource, Default)]
pub struct ScriptRegistry {
    factories: BTreeMap<String, ScriptFactory>,
}

impl ScriptRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a factory under `kind`, replacing any previous one.
    pub fn register(
        &mut self,
        kind: impl Into<String>,
        factory: impl Fn() -> Box<dyn ScriptableEntity> + Send + Sync + 'static,
    ) {
        let kind = kind.into();
        tracing::debug!("Registered script kind {}", kind);
        self.factories.insert(kind, Box::new(factory));
    }

    /// Register `T` under its own [`kind`](ScriptableEntity::kind).
    pub fn register_default<T: ScriptableEntity + Default>(&mut self) {
        let kind = T::default().kind();
        self.register(kind, || Box::new(T::default()));
    }

    pub fn contains(&self, kind: &str) -> bool {
        self.factories.contains_key(kind)
    }

    pub fn create(&self, kind: &str) -> Option<Box<dyn ScriptableEntity>> {
        self.factories.get(kind).map(|factory| factory())
    }

    /// A fresh, not-yet-created [`NativeScript`] of the given kind.
    pub fn instantiate(&self, kind: &str) -> Option<NativeScript> {
        self.create(kind).map(NativeScript::from_boxed)
    }

    pub fn kinds(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Wanderer;

    impl ScriptableEntity for Wanderer {
        fn kind(&self) -> &'static str {
            "Wanderer"
        }
    }

    #[test]
    fn test_register_default_uses_kind() {
        let mut registry = ScriptRegistry::new();
        registry.register_default::<Wanderer>();
        assert!(registry.contains("Wanderer"));
        assert_eq!(registry.kinds().collect::<Vec<_>>(), vec!["Wanderer"]);

        let script = registry.instantiate("Wanderer").expect("registered");
        assert_eq!(script.kind(), "Wanderer");
        assert!(!script.is_created());
        assert!(script.get::<Wanderer>().is_some());
    }

    #[test]
    fn test_unknown_kind() {
        let registry = ScriptRegistry::new();
        assert!(registry.create("Ghost").is_none());
    }
}
