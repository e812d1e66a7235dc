//! Per-listing upload directories on the local filesystem.
//!
//! Layout: `{root}/{listing_id}/photos/*` and `{root}/{listing_id}/attachments/*`.
//! Nothing here is transactional; callers order these calls around their
//! database transactions.

use std::io;
use std::path::PathBuf;

use serde::Serialize;
use tokio::io::AsyncWriteExt;

use crate::types::DbId;
use crate::upload::{classify, FileKind};

/// A listing's files, split by kind. Each list is sorted by filename.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ListingFiles {
    pub photos: Vec<String>,
    pub attachments: Vec<String>,
}

impl ListingFiles {
    pub fn into_kind(self, kind: FileKind) -> Vec<String> {
        match kind {
            FileKind::Photo => self.photos,
            FileKind::Attachment => self.attachments,
        }
    }
}

/// Handle on the upload root. Cheap to clone.
#[derive(Debug, Clone)]
pub struct UploadTree {
    root: PathBuf,
}

impl UploadTree {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// `{root}/{id}`
    pub fn listing_dir(&self, listing_id: DbId) -> PathBuf {
        self.root.join(listing_id.to_string())
    }

    /// `{root}/{id}/photos` or `{root}/{id}/attachments`
    pub fn kind_dir(&self, listing_id: DbId, kind: FileKind) -> PathBuf {
        self.listing_dir(listing_id).join(kind.dir_name())
    }

    /// Create both subdirectories of a listing. Idempotent.
    pub async fn ensure_listing_dirs(&self, listing_id: DbId) -> io::Result<()> {
        for kind in FileKind::ALL {
            tokio::fs::create_dir_all(self.kind_dir(listing_id, kind)).await?;
        }
        Ok(())
    }

    /// Enumerate a listing's files and split them by extension.
    ///
    /// Both subdirectories are read; subdirectories found inside them are
    /// skipped. A missing listing directory yields empty lists.
    pub async fn list_files(&self, listing_id: DbId) -> io::Result<ListingFiles> {
        let mut files = ListingFiles::default();

        for kind in FileKind::ALL {
            let dir = self.kind_dir(listing_id, kind);
            let mut entries = match tokio::fs::read_dir(&dir).await {
                Ok(entries) => entries,
                Err(e) if e.kind() == io::ErrorKind::NotFound => continue,
                Err(e) => return Err(e),
            };

            while let Some(entry) = entries.next_entry().await? {
                if entry.file_type().await?.is_dir() {
                    continue;
                }
                let name = entry.file_name().to_string_lossy().into_owned();
                match classify(&name) {
                    FileKind::Photo => files.photos.push(name),
                    FileKind::Attachment => files.attachments.push(name),
                }
            }
        }

        files.photos.sort();
        files.attachments.sort();
        Ok(files)
    }

    /// Find an existing file of a listing by name, whichever subdirectory
    /// holds it. `name` must already be a validated plain file name.
    pub async fn locate(&self, listing_id: DbId, name: &str) -> io::Result<Option<PathBuf>> {
        for kind in FileKind::ALL {
            let path = self.kind_dir(listing_id, kind).join(name);
            match tokio::fs::metadata(&path).await {
                Ok(meta) if meta.is_file() => return Ok(Some(path)),
                Ok(_) => {}
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => return Err(e),
            }
        }
        Ok(None)
    }

    /// Write a new file into the subdirectory matching its extension.
    ///
    /// Never overwrites: an existing file with the same name fails with
    /// [`io::ErrorKind::AlreadyExists`].
    pub async fn write_new(
        &self,
        listing_id: DbId,
        name: &str,
        contents: &[u8],
    ) -> io::Result<PathBuf> {
        let dir = self.kind_dir(listing_id, classify(name));
        tokio::fs::create_dir_all(&dir).await?;

        let path = dir.join(name);
        let mut file = tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await?;
        file.write_all(contents).await?;
        file.flush().await?;
        Ok(path)
    }

    /// Remove one file. Returns `false` if it did not exist.
    pub async fn remove_file(&self, listing_id: DbId, name: &str) -> io::Result<bool> {
        match self.locate(listing_id, name).await? {
            Some(path) => {
                tokio::fs::remove_file(&path).await?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Recursively remove a listing's whole subtree. A missing subtree is not
    /// an error.
    pub async fn remove_listing(&self, listing_id: DbId) -> io::Result<()> {
        match tokio::fs::remove_dir_all(self.listing_dir(listing_id)).await {
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            other => other,
        }
    }
}
