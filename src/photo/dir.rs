use super::PhotoStore;
use crate::errors::{AppError, AppResult};
use std::fs;
use std::path::{Path, PathBuf};

/// Writes photos into a directory; URLs are `<base_url>/<filename>`, or
/// `file://` paths when no base URL is configured.
pub struct DirPhotoStore {
    dir: PathBuf,
    base_url: String,
}

impl DirPhotoStore {
    pub fn new(dir: impl Into<PathBuf>, base_url: &str) -> Self {
        Self {
            dir: dir.into(),
            base_url: base_url.trim().trim_end_matches('/').to_string(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

fn safe_name(filename: &str) -> String {
    filename
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

impl PhotoStore for DirPhotoStore {
    fn store(&self, bytes: &[u8], filename: &str) -> AppResult<String> {
        let name = safe_name(filename);

        fs::create_dir_all(&self.dir)
            .and_then(|_| fs::write(self.dir.join(&name), bytes))
            .map_err(|e| {
                AppError::Dependency(format!(
                    "Photo storage failed ({}): {}",
                    self.dir.display(),
                    e
                ))
            })?;

        if self.base_url.is_empty() {
            let abs = fs::canonicalize(self.dir.join(&name))?;
            Ok(format!("file://{}", abs.display()))
        } else {
            Ok(format!("{}/{}", self.base_url, name))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    #[test]
    fn stores_file_and_builds_url() {
        let dir = env::temp_dir().join("drivershift_photo_store_test");
        let _ = fs::remove_dir_all(&dir);

        let store = DirPhotoStore::new(&dir, "https://photos.example.com/");
        let url = store.store(b"img", "SHIFT-1-D/1_start.jpg").unwrap();

        assert_eq!(url, "https://photos.example.com/SHIFT-1-D_1_start.jpg");
        assert_eq!(fs::read(dir.join("SHIFT-1-D_1_start.jpg")).unwrap(), b"img");
    }
}
