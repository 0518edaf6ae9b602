//! On-disk storage for profile images.
//!
//! Case documents do not pass through here; they are stored inline in the
//! `documents` table.

use std::io;
use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::config::AppConfig;

/// URL prefix the upload directory is served under.
pub const UPLOADS_ROUTE: &str = "/static/uploads";

#[derive(Debug, Clone)]
pub struct UploadStore {
    dir: PathBuf,
    public_base_url: String,
    default_profile_image: String,
}

impl UploadStore {
    pub fn new(
        dir: impl Into<PathBuf>,
        public_base_url: impl Into<String>,
        default_profile_image: impl Into<String>,
    ) -> Self {
        Self {
            dir: dir.into(),
            public_base_url: public_base_url.into(),
            default_profile_image: default_profile_image.into(),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            config.upload_dir.clone(),
            config.public_base_url.clone(),
            config.default_profile_image.clone(),
        )
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub async fn ensure_dir(&self) -> io::Result<()> {
        tokio::fs::create_dir_all(&self.dir).await
    }

    /// Absolute URL of a stored image, or the default image when none is set.
    pub fn image_url(&self, stored: Option<&str>) -> String {
        match stored {
            Some(name) if !name.is_empty() && name != self.default_profile_image => format!(
                "{}{}/{}",
                self.public_base_url.trim_end_matches('/'),
                UPLOADS_ROUTE,
                name
            ),
            _ => self.default_profile_image.clone(),
        }
    }

    /// Write a new profile image without touching the previous one.
    ///
    /// Returns the stored file name to persist on the user row.
    pub async fn store_profile_image(
        &self,
        user_id: Uuid,
        original_name: &str,
        bytes: &[u8],
    ) -> io::Result<String> {
        let mut file_name = sanitize_file_name(&format!("profile_{user_id}_{original_name}"));
        if file_name.is_empty() {
            file_name = format!("profile_{user_id}");
        }

        self.ensure_dir().await?;
        tokio::fs::write(self.dir.join(&file_name), bytes).await?;

        Ok(file_name)
    }

    /// Delete a stored profile image once the user row no longer points at it.
    ///
    /// `current` is the name still in use and is never removed, nor is the
    /// default image. A file that is already gone is not an error.
    pub async fn remove_profile_image(&self, stale: Option<&str>, current: Option<&str>) {
        let Some(stale) = stale else {
            return;
        };
        if Some(stale) == current || stale == self.default_profile_image {
            return;
        }

        let path = self.dir.join(sanitize_file_name(stale));
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Could not remove profile image");
            }
        }
    }
}

/// Image types accepted as profile pictures.
pub const IMAGE_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "gif", "webp"];

/// Whether a (sanitized) file name carries an image extension.
pub fn is_allowed_image(file_name: &str) -> bool {
    match file_name.rsplit_once('.') {
        Some((_, ext)) => IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()),
        None => false,
    }
}

/// Reduce a client-supplied file name to a single safe path component.
///
/// Path separators become word breaks, whitespace runs become `_`, anything
/// outside `[A-Za-z0-9._-]` is dropped, and leading/trailing dots and
/// underscores are trimmed. May return an empty string.
pub fn sanitize_file_name(raw: &str) -> String {
    let spaced: String = raw
        .chars()
        .map(|c| if c == '/' || c == '\\' { ' ' } else { c })
        .collect();

    let joined = spaced.split_whitespace().collect::<Vec<_>>().join("_");

    joined
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
        .collect::<String>()
        .trim_matches(|c| c == '.' || c == '_')
        .to_string()
}
