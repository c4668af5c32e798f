use thiserror::Error;

use crate::platform::Platform;

pub type AdapterResult<T> = Result<T, AdapterError>;

/// Failure classes surfaced by the adapter layer.
///
/// Transient conditions (a drawing surface that does not exist yet, an
/// export capability a platform lacks) are deliberately *not* errors; they
/// surface as `InitStatus::Unavailable` or `None` at the call site.
#[derive(Debug, Error)]
pub enum AdapterError {
    #[error("missing canvas id in chart configuration")]
    MissingCanvasId,

    #[error("no adapter available for platform `{0}`")]
    UnsupportedPlatform(Platform),

    #[error("chart engine failure: {0}")]
    Engine(String),
}
