use qoe_io::IoError;
use qoe_models::ModelError;

/// Errors that abort a single check. The runner records them as failures.
#[derive(Debug, thiserror::Error)]
pub enum CheckError {
    /// Returned when a dataset cannot be read or parsed.
    #[error("dataset error")]
    Io(#[from] IoError),

    /// Returned when the model registry rejects a request.
    #[error("model error")]
    Model(#[from] ModelError),

    /// Returned when a check panics.
    #[error("check panicked: {message}")]
    Panicked {
        /// Panic payload rendered as text.
        message: String,
    },
}
