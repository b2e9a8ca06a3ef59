use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

/// Filesystem store for user photos.
///
/// Stored names are the local time as `%Y%m%d%H%M%S`, a random tag, and the
/// upload's base name, e.g. `20240131093000-1f0c9a2e-avatar.png`. Every
/// upload gets its own file, even for equal names within one second.
#[derive(Debug, Clone)]
pub struct PhotoStore {
    dir: PathBuf,
}

impl PhotoStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_of(&self, stored_name: &str) -> PathBuf {
        self.dir.join(stored_name)
    }

    /// Write an upload to a new file and return its stored name.
    pub async fn save(&self, original_name: &str, bytes: &[u8]) -> io::Result<String> {
        tokio::fs::create_dir_all(&self.dir).await?;

        let mut attempts = 0;
        loop {
            let stored_name = stored_name(original_name, Local::now(), &unique_tag());
            match self.write_new(&stored_name, bytes).await {
                Ok(()) => {
                    tracing::debug!("Stored photo {} ({} bytes)", stored_name, bytes.len());
                    return Ok(stored_name);
                }
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists && attempts < 3 => {
                    attempts += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Fails with `AlreadyExists` rather than overwriting another user's photo.
    async fn write_new(&self, stored_name: &str, bytes: &[u8]) -> io::Result<()> {
        let mut file = tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(self.path_of(stored_name))
            .await?;
        file.write_all(bytes).await?;
        file.flush().await
    }

    /// Best-effort removal. A file that is already gone is not an error.
    pub async fn remove(&self, stored_name: &str) {
        if stored_name.is_empty() {
            return;
        }

        match tokio::fs::remove_file(self.path_of(stored_name)).await {
            Ok(()) => tracing::debug!("Removed photo {}", stored_name),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!("Photo {} was already gone", stored_name)
            }
            Err(e) => tracing::warn!("Failed to remove photo {}: {}", stored_name, e),
        }
    }
}

fn unique_tag() -> String {
    Uuid::new_v4().simple().to_string()[..8].to_string()
}

/// Timestamp prefix, `tag`, and the sanitized base name of the upload.
/// Directory components are dropped so a client cannot write outside the
/// photo dir.
pub fn stored_name(original_name: &str, now: DateTime<Local>, tag: &str) -> String {
    let base = Path::new(original_name)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("");

    let sanitized: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();

    let base = if sanitized.trim_matches('.').is_empty() {
        "photo".to_string()
    } else {
        sanitized
    };

    format!("{}-{}-{}", now.format("%Y%m%d%H%M%S"), tag, base)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 1, 31, 9, 30, 0).unwrap()
    }

    #[test]
    fn prefixes_timestamp() {
        assert_eq!(stored_name("avatar.png", at(), "1f0c9a2e"), "20240131093000-1f0c9a2e-avatar.png");
    }

    #[test]
    fn strips_directories_and_odd_characters() {
        assert_eq!(stored_name("../../etc/passwd", at(), "t"), "20240131093000-t-passwd");
        assert_eq!(stored_name("my photo (1).jpg", at(), "t"),
            "20240131093000-t-my_photo__1_.jpg");
    }

    #[test]
    fn falls_back_for_empty_names() {
        assert_eq!(stored_name("", at(), "t"), "20240131093000-t-photo");
        assert_eq!(stored_name("..", at(), "t"), "20240131093000-t-photo");
    }

    #[tokio::test]
    async fn save_then_remove() {
        let dir = std::env::temp_dir().join(format!("collapp-photos-{}", uuid::Uuid::new_v4()));
        let store = PhotoStore::new(&dir);

        let name = store.save("face.png", b"png-bytes").await.unwrap();
        assert!(name.ends_with("face.png"));
        assert_eq!(tokio::fs::read(store.path_of(&name)).await.unwrap(), b"png-bytes");

        store.remove(&name).await;
        assert!(!store.path_of(&name).exists());

        // Removing twice is fine
        store.remove(&name).await;
        let _ = tokio::fs::remove_dir_all(&dir).await;
    }

    #[tokio::test]
    async fn equal_names_never_share_a_file() {
        let dir = std::env::temp_dir().join(format!("collapp-photos-{}", uuid::Uuid::new_v4()));
        let store = PhotoStore::new(&dir);

        let alice = store.save("avatar.png", b"alice").await.unwrap();
        let bob = store.save("avatar.png", b"bob").await.unwrap();
        assert_ne!(alice, bob);
        assert!(alice.ends_with("-avatar.png") && bob.ends_with("-avatar.png"));

        assert_eq!(tokio::fs::read(store.path_of(&alice)).await.unwrap(), b"alice");
        assert_eq!(tokio::fs::read(store.path_of(&bob)).await.unwrap(), b"bob");

        // Removing one leaves the other in place
        store.remove(&bob).await;
        assert!(store.path_of(&alice).exists());
        let _ = tokio::fs::remove_dir_all(&dir).await;
    }

    #[tokio::test]
    async fn existing_files_are_not_overwritten() {
        let dir = std::env::temp_dir().join(format!("collapp-photos-{}", uuid::Uuid::new_v4()));
        let store = PhotoStore::new(&dir);
        tokio::fs::create_dir_all(&dir).await.unwrap();

        tokio::fs::write(store.path_of("taken.png"), b"first").await.unwrap();
        let err = store.write_new("taken.png", b"second").await.unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::AlreadyExists);
        assert_eq!(tokio::fs::read(store.path_of("taken.png")).await.unwrap(), b"first");
        let _ = tokio::fs::remove_dir_all(&dir).await;
    }
}
