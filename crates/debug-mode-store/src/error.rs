//! Error types for the debug mode store
//!
//! Store operations themselves are total. The only fallible surface is turning
//! text into a [`DebugModeKey`](crate::DebugModeKey).

/// Key parsing errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum KeyError {
    /// Name is not part of the fixed key set
    #[error("unknown debug mode key: {name}")]
    Unknown {
        /// The rejected name
        name: String,
    },
}
