//! Photo side-channel: odometer and last-drop pictures are decoded from the
//! form payload, handed to a `PhotoStore` and referenced by URL.

mod dir;
mod payload;

pub use dir::DirPhotoStore;
pub use payload::decode_payload;

use crate::errors::{AppError, AppResult};

pub trait PhotoStore {
    /// Persist `bytes` under `filename` and return a publicly viewable URL.
    fn store(&self, bytes: &[u8], filename: &str) -> AppResult<String>;
}

/// Decode a form payload and persist it; the only latency-bearing step of
/// a shift transition.
pub fn persist_photo(
    store: &dyn PhotoStore,
    payload: Option<&str>,
    filename: &str,
    label: &str,
) -> AppResult<String> {
    let payload = payload
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .ok_or_else(|| AppError::Validation(format!("{label} photo is required.")))?;

    let bytes = decode_payload(payload)
        .map_err(|e| AppError::Dependency(format!("Could not read {label} photo: {e}")))?;

    store.store(&bytes, filename).map_err(|e| match e {
        AppError::Dependency(_) => e,
        other => AppError::Dependency(format!("Could not save {label} photo: {other}")),
    })
}
