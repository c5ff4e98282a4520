//! Uploaded files on local disk, served back under `/uploads`.

use std::path::{Path, PathBuf};

use eyre::{Result, WrapErr};
use studio_core::models::location::StoredFile;
use tracing::{debug, warn};
use uuid::Uuid;

pub const UPLOAD_ROUTE: &str = "/uploads";

#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
    public_base_url: String,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>, public_base_url: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            public_base_url: public_base_url.into(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Writes `bytes` under a fresh name that keeps the original extension.
    pub async fn save(&self, original_name: &str, bytes: &[u8]) -> Result<StoredFile> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .wrap_err_with(|| format!("Failed to create {}", self.dir.display()))?;

        let file_name = match extension(original_name) {
            Some(ext) => format!("{}.{}", Uuid::new_v4(), ext),
            None => Uuid::new_v4().to_string(),
        };
        let path = self.dir.join(&file_name);
        tokio::fs::write(&path, bytes)
            .await
            .wrap_err_with(|| format!("Failed to write {}", path.display()))?;

        debug!("Stored upload {} as {}", original_name, file_name);
        Ok(StoredFile {
            url: format!("{}{}/{}", self.public_base_url, UPLOAD_ROUTE, file_name),
            name: display_name(original_name),
        })
    }

    /// Removes the file behind a URL handed out by [`FileStore::save`]. URLs
    /// pointing elsewhere and files already gone are ignored.
    pub async fn remove(&self, url: &str) -> Result<()> {
        let Some(file_name) = self.file_name_of(url) else {
            warn!("Not removing {}: not an uploaded file", url);
            return Ok(());
        };
        match tokio::fs::remove_file(self.dir.join(file_name)).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err).wrap_err_with(|| format!("Failed to remove {}", url)),
        }
    }

    fn file_name_of<'a>(&self, url: &'a str) -> Option<&'a str> {
        let prefix = format!("{}{}/", self.public_base_url, UPLOAD_ROUTE);
        url.strip_prefix(&prefix).filter(|name| {
            !name.is_empty() && !name.contains('/') && !name.contains('\\') && !name.contains("..")
        })
    }
}

fn extension(name: &str) -> Option<String> {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty() && ext.len() <= 8 && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(str::to_lowercase)
}

/// The client-side file name without any directory part.
fn display_name(name: &str) -> String {
    name.rsplit(['/', '\\'])
        .next()
        .filter(|n| !n.is_empty())
        .unwrap_or("upload")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn saved_files_can_be_removed() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path(), "https://cdn.test");

        let stored = store.save("C:\\photos\\Front Desk.JPG", b"jpeg").await.unwrap();

        assert_eq!(stored.name, "Front Desk.JPG");
        assert!(stored.url.starts_with("https://cdn.test/uploads/"));
        assert!(stored.url.ends_with(".jpg"));
        let file_name = stored.url.rsplit('/').next().unwrap();
        assert_eq!(std::fs::read(dir.path().join(file_name)).unwrap(), b"jpeg");

        store.remove(&stored.url).await.unwrap();
        assert!(!dir.path().join(file_name).exists());
        store.remove(&stored.url).await.unwrap();
    }

    #[tokio::test]
    async fn foreign_urls_are_left_alone() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path(), "");
        store.remove("https://elsewhere.test/uploads/x.png").await.unwrap();
        store.remove("/uploads/../secret").await.unwrap();
    }

    #[test]
    fn odd_extensions_are_dropped() {
        assert_eq!(extension("a.png"), Some("png".to_string()));
        assert_eq!(extension("archive.tar.gz"), Some("gz".to_string()));
        assert_eq!(extension("noext"), None);
        assert_eq!(extension("x.p h p"), None);
    }
}
