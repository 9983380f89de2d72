//! Path helpers: `~` expansion and absolute-path checks for output files.

use crate::errors::{AppError, AppResult};
use std::path::PathBuf;

pub fn expand_tilde(path: &str) -> PathBuf {
    if path.starts_with("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(path.trim_start_matches("~/"));
    }
    PathBuf::from(path)
}

/// Expand `~` and insist on an absolute result.
pub fn require_absolute(path: &str, what: &str) -> AppResult<PathBuf> {
    let p = expand_tilde(path.trim());
    if !p.is_absolute() {
        return Err(AppError::Validation(format!(
            "{what} must be an absolute path: {path}"
        )));
    }
    Ok(p)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_paths_are_refused() {
        assert!(require_absolute("out.csv", "Export file").is_err());
        assert!(require_absolute("/tmp/out.csv", "Export file").is_ok());
    }
}
