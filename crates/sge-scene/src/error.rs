//! Scene error types.

/// Errors that can occur when loading or saving a scene file.
#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    #[error("failed to read scene: {0}")]
    ReadError(#[source] std::io::Error),

    #[error("failed to write scene: {0}")]
    WriteError(#[source] std::io::Error),

    #[error("failed to parse scene: {0}")]
    ParseError(#[source] ron::error::SpannedError),

    #[error("failed to serialize scene: {0}")]
    SerializeError(#[source] ron::Error),

    /// An entity names a script kind the registry cannot build.
    #[error("unknown script kind '{0}'")]
    UnknownScript(String),

    /// A rigid body record whose mass is zero or not finite.
    #[error("entity '{entity}' has unusable mass {mass}")]
    InvalidMass { entity: String, mass: f32 },

    #[error("scene file has no scene name")]
    MissingSceneName,
}
