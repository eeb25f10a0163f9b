//! Check-in Photo Store
//!
//! Persists raw check-in photo bytes under the work directory and hands
//! back a reference string. Absence of a photo is always valid; this
//! service is only invoked when the operator attached one.

use std::path::PathBuf;

use crate::utils::{AppError, AppResult};

#[derive(Debug, Clone)]
pub struct PhotoStoreService {
    dir: PathBuf,
}

impl PhotoStoreService {
    /// `work_dir/photos` is the storage root
    pub fn new(work_dir: PathBuf) -> Self {
        Self {
            dir: work_dir.join("photos"),
        }
    }

    /// Store raw image bytes, returning the reference recorded on the
    /// reservation.
    pub fn save(&self, bytes: &[u8]) -> AppResult<String> {
        if bytes.is_empty() {
            return Err(AppError::validation("Photo payload is empty"));
        }

        std::fs::create_dir_all(&self.dir)
            .map_err(|e| AppError::internal(format!("Failed to create photo dir: {e}")))?;

        let name = format!("{}.jpg", uuid::Uuid::new_v4());
        let path = self.dir.join(&name);
        std::fs::write(&path, bytes)
            .map_err(|e| AppError::internal(format!("Failed to store photo: {e}")))?;

        Ok(format!("photos/{name}"))
    }
}
