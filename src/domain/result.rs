//! Result type aliases for clinsync

use super::errors::{ClinsyncError, CodecError};

/// Result type alias for crate-boundary operations
///
/// # Examples
///
/// ```
/// use clinsync::domain::result::Result;
/// use clinsync::domain::errors::ClinsyncError;
///
/// fn failing_function() -> Result<()> {
///     Err(ClinsyncError::Validation("Invalid input".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, ClinsyncError>;

/// Result type alias for decode/encode operations
pub type CodecResult<T> = std::result::Result<T, CodecError>;
