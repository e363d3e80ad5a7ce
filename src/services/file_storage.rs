use std::path::{Path, PathBuf};

use axum::extract::Multipart;
use bytes::Bytes;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

use crate::error::{AppError, AppResult};

pub const UPLOADS_URL_PREFIX: &str = "/uploads";

const ALLOWED_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "gif", "webp"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadKind {
    EventPoster,
    FestImage,
}

impl UploadKind {
    fn dir(&self) -> &'static str {
        match self {
            UploadKind::EventPoster => "events",
            UploadKind::FestImage => "fests",
        }
    }

    fn prefix(&self) -> &'static str {
        match self {
            UploadKind::EventPoster => "event_",
            UploadKind::FestImage => "fest_",
        }
    }
}

#[derive(Debug)]
pub struct UploadedFile {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub data: Bytes,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    /// Public path under `/uploads`.
    pub url: String,
    pub path: PathBuf,
}

/// Local disk storage for posters and banners, served statically under `/uploads`.
#[derive(Debug, Clone)]
pub struct FileStorage {
    root: PathBuf,
}

impl FileStorage {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub async fn ensure_dirs(&self) -> anyhow::Result<()> {
        for kind in [UploadKind::EventPoster, UploadKind::FestImage] {
            fs::create_dir_all(self.root.join(kind.dir())).await?;
        }
        Ok(())
    }

    pub async fn save_image(&self, kind: UploadKind, file: UploadedFile) -> AppResult<StoredFile> {
        if file.data.is_empty() {
            return Err(AppError::validation("Uploaded file is empty"));
        }

        let is_image = file
            .content_type
            .as_deref()
            .map(|ct| ct.starts_with("image/"))
            .unwrap_or(false);
        if !is_image {
            return Err(AppError::validation("Only image files are allowed"));
        }

        let extension = image_extension(file.file_name.as_deref(), file.content_type.as_deref())
            .ok_or_else(|| AppError::validation("Unsupported image type"))?;

        let file_name = format!("{}{}.{}", kind.prefix(), Uuid::new_v4(), extension);
        let dir = self.root.join(kind.dir());
        fs::create_dir_all(&dir)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to create upload directory: {}", e))?;

        let path = dir.join(&file_name);
        let mut out = fs::File::create(&path)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to create file: {}", e))?;
        out.write_all(&file.data)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to write file: {}", e))?;
        out.flush()
            .await
            .map_err(|e| anyhow::anyhow!("Failed to flush file: {}", e))?;

        tracing::info!(path = %path.display(), bytes = file.data.len(), "Stored upload");

        Ok(StoredFile {
            url: format!("{UPLOADS_URL_PREFIX}/{}/{file_name}", kind.dir()),
            path,
        })
    }

    /// Deletes a file previously returned by [`FileStorage::save_image`]. Missing files are ignored.
    pub async fn remove(&self, url: &str) -> anyhow::Result<()> {
        let Some(relative) = url.strip_prefix(UPLOADS_URL_PREFIX) else {
            return Ok(());
        };
        let relative = sanitize_relative(relative.trim_start_matches('/'));
        if relative.as_os_str().is_empty() {
            return Ok(());
        }

        match fs::remove_file(self.root.join(relative)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Reads the single file part named `field_name` from a multipart body.
pub async fn read_file_field(mut multipart: Multipart, field_name: &str) -> AppResult<UploadedFile> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(field_name) {
            continue;
        }

        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let data = field.bytes().await?;

        return Ok(UploadedFile {
            file_name,
            content_type,
            data,
        });
    }

    Err(AppError::validation(format!(
        "Missing file upload field '{field_name}'"
    )))
}

fn image_extension(file_name: Option<&str>, content_type: Option<&str>) -> Option<String> {
    let from_name = file_name
        .map(|name| sanitize_filename::sanitize(name))
        .and_then(|name| {
            Path::new(&*name)
                .extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| ext.to_ascii_lowercase())
        })
        .filter(|ext| ALLOWED_EXTENSIONS.contains(&ext.as_str()));

    from_name.or_else(|| {
        let subtype = content_type?.strip_prefix("image/")?.to_ascii_lowercase();
        ALLOWED_EXTENSIONS
            .contains(&subtype.as_str())
            .then_some(subtype)
    })
}

fn sanitize_relative(relative: &str) -> PathBuf {
    relative
        .split('/')
        .filter(|part| !part.is_empty() && *part != "..")
        .map(|part| sanitize_filename::sanitize(part).into_owned())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_extension() {
        assert_eq!(
            image_extension(Some("poster.PNG"), Some("image/png")),
            Some("png".to_string())
        );
        assert_eq!(
            image_extension(Some("poster"), Some("image/jpeg")),
            Some("jpeg".to_string())
        );
        assert_eq!(image_extension(Some("run.exe"), Some("image/svg+xml")), None);
    }

    #[test]
    fn test_sanitize_relative_drops_traversal() {
        assert_eq!(
            sanitize_relative("events/../../etc/event_1.png"),
            PathBuf::from("events/etc/event_1.png")
        );
        assert_eq!(
            image_extension(Some("../poster.Jpg"), None),
            Some("jpg".to_string())
        );
    }

    #[tokio::test]
    async fn test_save_and_remove_image() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path());

        let stored = storage
            .save_image(
                UploadKind::EventPoster,
                UploadedFile {
                    file_name: Some("banner.png".to_string()),
                    content_type: Some("image/png".to_string()),
                    data: Bytes::from_static(b"\x89PNG fake"),
                },
            )
            .await
            .unwrap();

        assert!(stored.url.starts_with("/uploads/events/event_"));
        assert!(stored.url.ends_with(".png"));
        assert!(stored.path.exists());

        storage.remove(&stored.url).await.unwrap();
        assert!(!stored.path.exists());
        // second removal is a no-op
        storage.remove(&stored.url).await.unwrap();
    }

    #[tokio::test]
    async fn test_rejects_non_images() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path());

        let err = storage
            .save_image(
                UploadKind::FestImage,
                UploadedFile {
                    file_name: Some("notes.txt".to_string()),
                    content_type: Some("text/plain".to_string()),
                    data: Bytes::from_static(b"hello"),
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Validation(_)));
    }
}
