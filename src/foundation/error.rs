/// Convenience result type used throughout the crate.
pub type BoltzResult<T> = Result<T, BoltzError>;

/// Error taxonomy for simulation, rendering and animation assembly.
///
/// Every failure is fatal to the run that produced it; nothing in the crate retries.
#[derive(thiserror::Error, Debug)]
pub enum BoltzError {
    /// Invalid configuration (unit counts, temperature, frame count, canvas).
    #[error("precondition violation: {0}")]
    Precondition(String),

    /// The rendering backend could not produce a pixel buffer for a snapshot.
    #[error("render failure: {0}")]
    Render(String),

    /// The encoding backend could not combine the frames into one artifact.
    #[error("assembly failure: {0}")]
    Assembly(String),

    /// Any other fault.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl BoltzError {
    /// Build a [`BoltzError::Precondition`].
    pub fn precondition(msg: impl Into<String>) -> Self {
        Self::Precondition(msg.into())
    }

    /// Build a [`BoltzError::Render`].
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`BoltzError::Assembly`].
    pub fn assembly(msg: impl Into<String>) -> Self {
        Self::Assembly(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
