//! Validation functions for canonical paths.

use crate::types::Path;
use crate::PathParseError;

/// Maximum allowed encoded path length, in bytes.
pub const MAX_ENCODED_LENGTH: usize = 16 * 1024;

/// Maximum allowed path depth.
pub const MAX_PATH_DEPTH: usize = 256;

/// Validate a path received from outside the engine (clipboard, CLI, API).
///
/// # Errors
///
/// Returns [`PathParseError::TooDeep`] if the path has more than
/// [`MAX_PATH_DEPTH`] segments.
///
/// # Example
///
/// ```
/// use json_nav_path::{validate_path, Path, Segment};
///
/// validate_path(&Path::root()).unwrap();
/// let deep: Path = (0..300usize).map(Segment::Index).collect();
/// validate_path(&deep).unwrap_err();
/// ```
pub fn validate_path(path: &Path) -> Result<(), PathParseError> {
    if path.depth() > MAX_PATH_DEPTH {
        return Err(PathParseError::TooDeep { depth: path.depth() });
    }
    Ok(())
}

/// Parse and validate an encoded path in one step.
///
/// # Errors
///
/// Returns [`PathParseError::TooLong`] before parsing when the text exceeds
/// [`MAX_ENCODED_LENGTH`], otherwise any parse or depth error.
pub fn parse_validated(text: &str) -> Result<Path, PathParseError> {
    if text.len() > MAX_ENCODED_LENGTH {
        return Err(PathParseError::TooLong { len: text.len() });
    }
    let path = crate::util::parse_path(text)?;
    validate_path(&path)?;
    Ok(path)
}
