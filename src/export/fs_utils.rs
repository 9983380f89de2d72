use crate::errors::{AppError, AppResult};
use std::path::Path;

/// An existing output file is only replaced with `force`; exports never
/// prompt, since they may run unattended.
pub(crate) fn ensure_writable(path: &Path, force: bool) -> AppResult<()> {
    if path.exists() && !force {
        return Err(AppError::Export(format!(
            "'{}' already exists (use --force to overwrite)",
            path.display()
        )));
    }
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        return Err(AppError::Export(format!(
            "directory '{}' does not exist",
            parent.display()
        )));
    }
    Ok(())
}
