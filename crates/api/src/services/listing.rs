//! Listing lifecycle manager.
//!
//! Keeps three things consistent: the listing row, its publication set, and
//! its upload subtree. Database work runs in one transaction per operation;
//! filesystem work runs only after that transaction committed and its
//! failure is reported through [`Outcome`] instead of undoing the commit.

use std::io;
use std::path::PathBuf;

use serde::Serialize;

use maison_core::error::CoreError;
use maison_core::listing::{validate_title, Created, Outcome};
use maison_core::naming::{stored_filename, validate_plain_filename};
use maison_core::publication::{self, PublicationEntry, PublicationSubmission};
use maison_core::types::DbId;
use maison_core::upload::{classify, is_photo, FileKind};
use maison_core::upload_tree::{ListingFiles, UploadTree};
use maison_db::models::listing::{Listing, ListingFields};
use maison_db::models::publication::PublicationUrl;
use maison_db::repositories::{ListingRepo, PublicationRepo};
use maison_db::{classify_error, DbPool};

use crate::config::UploadConfig;

/// How many timestamp slots an upload tries before giving up on a free name.
const MAX_NAME_ATTEMPTS: i64 = 16;

/// A listing with everything the presentation layer shows alongside it.
#[derive(Debug, Clone, Serialize)]
pub struct ListingDetails {
    #[serde(flatten)]
    pub listing: Listing,
    pub publications: Vec<PublicationUrl>,
    pub photos: Vec<String>,
    pub attachments: Vec<String>,
}

/// A file accepted by [`ListingManager::upload_file`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoredFile {
    /// Name the file is stored and addressed under.
    pub name: String,
    pub kind: FileKind,
    /// Whether this upload became the listing's main photo.
    pub is_main_photo: bool,
}

/// Owns listing create / update / delete and the per-listing upload tree.
pub struct ListingManager {
    pool: DbPool,
    uploads: UploadTree,
}

impl ListingManager {
    pub fn new(pool: DbPool, config: &UploadConfig) -> Self {
        Self {
            pool,
            uploads: UploadTree::new(config.root.clone()),
        }
    }

    pub fn uploads(&self) -> &UploadTree {
        &self.uploads
    }

    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    pub async fn get_listing(&self, id: DbId) -> Result<Listing, CoreError> {
        ListingRepo::find_by_id(&self.pool, id)
            .await
            .map_err(classify_error)?
            .ok_or(CoreError::NotFound {
                entity: "Listing",
                id,
            })
    }

    pub async fn list_listings(&self) -> Result<Vec<Listing>, CoreError> {
        ListingRepo::list(&self.pool).await.map_err(classify_error)
    }

    /// The listing plus its publications and classified files.
    pub async fn listing_details(&self, id: DbId) -> Result<ListingDetails, CoreError> {
        let listing = self.get_listing(id).await?;
        let publications = self.publications(id).await?;
        let ListingFiles {
            photos,
            attachments,
        } = self.files(id).await?;

        Ok(ListingDetails {
            listing,
            publications,
            photos,
            attachments,
        })
    }

    // -----------------------------------------------------------------------
    // Lifecycle
    // -----------------------------------------------------------------------

    /// Create a listing with its publication set, then provision its upload
    /// subtree.
    ///
    /// Invalid publication pairs are skipped; zero usable pairs rejects the
    /// request before anything is written. The row and the publications
    /// commit together. A directory failure after the commit yields
    /// [`Outcome::PartiallyFailed`]: the row stays.
    pub async fn create_listing(
        &self,
        input: &ListingFields,
        publications: &[PublicationSubmission],
    ) -> Result<Created, CoreError> {
        let fields = normalized(input)?;
        let entries = publication::require_valid(publications)?;

        let mut tx = self.pool.begin().await.map_err(classify_error)?;

        let id = ListingRepo::create(&mut *tx, &fields)
            .await
            .map_err(|e| city_reference_error(e, fields.city_id))?;
        for entry in &entries {
            PublicationRepo::create(&mut *tx, id, entry)
                .await
                .map_err(classify_error)?;
        }

        tx.commit().await.map_err(classify_error)?;
        tracing::info!(listing_id = id, publications = entries.len(), "Listing created");

        let outcome = match self.uploads.ensure_listing_dirs(id).await {
            Ok(()) => Outcome::Committed,
            Err(e) => {
                tracing::error!(
                    listing_id = id,
                    path = %self.uploads.listing_dir(id).display(),
                    error = %e,
                    "Listing row committed but upload directories could not be created"
                );
                Outcome::PartiallyFailed {
                    cause: e.to_string(),
                }
            }
        };

        Ok(Created { id, outcome })
    }

    /// Replace a listing's mutable fields and its whole publication set in
    /// one transaction. The main photo is preserved. The upload subtree is
    /// not touched.
    pub async fn update_listing(
        &self,
        id: DbId,
        input: &ListingFields,
        publications: &[PublicationSubmission],
    ) -> Result<(), CoreError> {
        let fields = normalized(input)?;
        let entries = publication::require_valid(publications)?;

        let mut tx = self.pool.begin().await.map_err(classify_error)?;

        let updated = ListingRepo::update(&mut *tx, id, &fields)
            .await
            .map_err(|e| city_reference_error(e, fields.city_id))?;
        if !updated {
            return Err(CoreError::NotFound {
                entity: "Listing",
                id,
            });
        }
        PublicationRepo::replace_all(&mut tx, id, &entries)
            .await
            .map_err(classify_error)?;

        tx.commit().await.map_err(classify_error)?;
        tracing::info!(listing_id = id, publications = entries.len(), "Listing updated");
        Ok(())
    }

    /// Delete the publications and the row in one transaction, then remove
    /// the upload subtree.
    ///
    /// A removal failure is logged and reported as
    /// [`Outcome::PartiallyFailed`]; the database state is already final.
    pub async fn delete_listing(&self, id: DbId) -> Result<Outcome, CoreError> {
        let mut tx = self.pool.begin().await.map_err(classify_error)?;

        PublicationRepo::delete_all_for_listing(&mut *tx, id)
            .await
            .map_err(classify_error)?;
        let deleted = ListingRepo::delete(&mut *tx, id)
            .await
            .map_err(classify_error)?;
        if !deleted {
            return Err(CoreError::NotFound {
                entity: "Listing",
                id,
            });
        }

        tx.commit().await.map_err(classify_error)?;
        tracing::info!(listing_id = id, "Listing deleted");

        match self.uploads.remove_listing(id).await {
            Ok(()) => Ok(Outcome::Committed),
            Err(e) => {
                tracing::warn!(
                    listing_id = id,
                    path = %self.uploads.listing_dir(id).display(),
                    error = %e,
                    "Failed to remove upload directory of deleted listing"
                );
                Ok(Outcome::PartiallyFailed {
                    cause: e.to_string(),
                })
            }
        }
    }

    // -----------------------------------------------------------------------
    // Publications
    // -----------------------------------------------------------------------

    /// A listing's publication set. Empty for unknown listings.
    pub async fn publications(&self, listing_id: DbId) -> Result<Vec<PublicationUrl>, CoreError> {
        PublicationRepo::list_for_listing(&self.pool, listing_id)
            .await
            .map_err(classify_error)
    }

    /// Replace a listing's whole publication set atomically.
    pub async fn replace_publications(
        &self,
        listing_id: DbId,
        publications: &[PublicationSubmission],
    ) -> Result<Vec<PublicationUrl>, CoreError> {
        let entries = publication::require_valid(publications)?;

        let mut tx = self.pool.begin().await.map_err(classify_error)?;
        if !ListingRepo::exists(&mut *tx, listing_id)
            .await
            .map_err(classify_error)?
        {
            return Err(CoreError::NotFound {
                entity: "Listing",
                id: listing_id,
            });
        }
        let created = PublicationRepo::replace_all(&mut tx, listing_id, &entries)
            .await
            .map_err(classify_error)?;
        tx.commit().await.map_err(classify_error)?;

        tracing::info!(listing_id, publications = created.len(), "Publication set replaced");
        Ok(created)
    }

    /// Add one publication. Unlike bulk submission, an invalid pair is an
    /// error here.
    pub async fn add_publication(
        &self,
        listing_id: DbId,
        submission: &PublicationSubmission,
    ) -> Result<PublicationUrl, CoreError> {
        let entry = single_entry(submission)?;
        PublicationRepo::create(&self.pool, listing_id, &entry)
            .await
            .map_err(|e| {
                if maison_db::error::is_foreign_key_violation(&e) {
                    CoreError::NotFound {
                        entity: "Listing",
                        id: listing_id,
                    }
                } else {
                    classify_error(e)
                }
            })
    }

    pub async fn update_publication(
        &self,
        id: DbId,
        submission: &PublicationSubmission,
    ) -> Result<PublicationUrl, CoreError> {
        let entry = single_entry(submission)?;
        PublicationRepo::update(&self.pool, id, &entry)
            .await
            .map_err(classify_error)?
            .ok_or(CoreError::NotFound {
                entity: "PublicationUrl",
                id,
            })
    }

    pub async fn delete_publication(&self, id: DbId) -> Result<(), CoreError> {
        let deleted = PublicationRepo::delete(&self.pool, id)
            .await
            .map_err(classify_error)?;
        if !deleted {
            return Err(CoreError::NotFound {
                entity: "PublicationUrl",
                id,
            });
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Files
    // -----------------------------------------------------------------------

    /// All files of a listing, split by kind. A missing directory is empty.
    pub async fn files(&self, listing_id: DbId) -> Result<ListingFiles, CoreError> {
        Ok(self.uploads.list_files(listing_id).await?)
    }

    pub async fn photos(&self, listing_id: DbId) -> Result<Vec<String>, CoreError> {
        Ok(self.files(listing_id).await?.into_kind(FileKind::Photo))
    }

    pub async fn attachments(&self, listing_id: DbId) -> Result<Vec<String>, CoreError> {
        Ok(self.files(listing_id).await?.into_kind(FileKind::Attachment))
    }

    /// Store an uploaded file under a fresh timestamp-prefixed name.
    ///
    /// The first photo of a listing without a main photo becomes its main
    /// photo.
    pub async fn upload_file(
        &self,
        listing_id: DbId,
        original_name: &str,
        contents: &[u8],
    ) -> Result<StoredFile, CoreError> {
        self.require_listing(listing_id).await?;

        let name = self.write_unique(listing_id, original_name, contents).await?;
        if self.reclaim_orphaned_uploads(listing_id).await? {
            return Err(CoreError::NotFound {
                entity: "Listing",
                id: listing_id,
            });
        }
        let kind = classify(&name);

        let is_main_photo = match kind {
            FileKind::Photo => ListingRepo::set_main_photo_if_unset(&self.pool, listing_id, &name)
                .await
                .map_err(classify_error)?,
            FileKind::Attachment => false,
        };

        tracing::info!(listing_id, file = %name, ?kind, is_main_photo, "File uploaded");
        Ok(StoredFile {
            name,
            kind,
            is_main_photo,
        })
    }

    /// Delete one file. Clears the main photo if it named this file.
    pub async fn delete_file(&self, listing_id: DbId, name: &str) -> Result<(), CoreError> {
        validate_plain_filename(name)?;

        if !self.uploads.remove_file(listing_id, name).await? {
            return Err(CoreError::FileNotFound {
                listing_id,
                name: name.to_string(),
            });
        }

        let cleared = ListingRepo::clear_main_photo_if(&self.pool, listing_id, name)
            .await
            .map_err(classify_error)?;
        tracing::info!(listing_id, file = %name, main_photo_cleared = cleared, "File deleted");
        Ok(())
    }

    /// Point the main photo at one of the listing's existing photos.
    pub async fn set_main_photo(&self, listing_id: DbId, name: &str) -> Result<(), CoreError> {
        validate_plain_filename(name)?;
        self.require_listing(listing_id).await?;

        let photos = self.photos(listing_id).await?;
        if !is_photo(name) || !photos.iter().any(|p| p == name) {
            return Err(CoreError::ConstraintViolation(format!(
                "'{name}' is not a photo of listing {listing_id}"
            )));
        }

        ListingRepo::set_main_photo(&self.pool, listing_id, Some(name))
            .await
            .map_err(classify_error)?;
        Ok(())
    }

    /// Resolve an existing file of the given kind for download.
    pub async fn file_path(
        &self,
        listing_id: DbId,
        kind: FileKind,
        name: &str,
    ) -> Result<PathBuf, CoreError> {
        validate_plain_filename(name)?;

        let not_found = || CoreError::FileNotFound {
            listing_id,
            name: name.to_string(),
        };
        if classify(name) != kind {
            return Err(not_found());
        }
        self.uploads
            .locate(listing_id, name)
            .await?
            .ok_or_else(not_found)
    }

    /// Remove the upload subtree of a listing whose row no longer exists.
    ///
    /// A delete that commits between an upload's existence check and its
    /// write leaves a freshly created directory behind. Returns `true` when
    /// the row was gone and the subtree was removed.
    pub async fn reclaim_orphaned_uploads(&self, listing_id: DbId) -> Result<bool, CoreError> {
        let exists = ListingRepo::exists(&self.pool, listing_id)
            .await
            .map_err(classify_error)?;
        if exists {
            return Ok(false);
        }

        tracing::warn!(listing_id, "Listing deleted during upload, removing its directory");
        if let Err(e) = self.uploads.remove_listing(listing_id).await {
            tracing::warn!(
                listing_id,
                error = %e,
                path = %self.uploads.listing_dir(listing_id).display(),
                "Failed to remove orphaned upload directory"
            );
        }
        Ok(true)
    }

    // -----------------------------------------------------------------------
    // Internal helpers
    // -----------------------------------------------------------------------

    async fn require_listing(&self, listing_id: DbId) -> Result<(), CoreError> {
        let exists = ListingRepo::exists(&self.pool, listing_id)
            .await
            .map_err(classify_error)?;
        if !exists {
            return Err(CoreError::NotFound {
                entity: "Listing",
                id: listing_id,
            });
        }
        Ok(())
    }

    /// Write under `{millis}_{name}`, moving to the next millisecond while the
    /// name is taken.
    async fn write_unique(
        &self,
        listing_id: DbId,
        original_name: &str,
        contents: &[u8],
    ) -> Result<String, CoreError> {
        let now = chrono::Utc::now().timestamp_millis();

        for offset in 0..MAX_NAME_ATTEMPTS {
            let name = stored_filename(original_name, now + offset);
            match self.uploads.write_new(listing_id, &name, contents).await {
                Ok(_) => return Ok(name),
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(e.into()),
            }
        }

        Err(CoreError::Filesystem(format!(
            "no free file name for '{original_name}' in listing {listing_id}"
        )))
    }
}

/// Validate the fields and return them with a trimmed title.
fn normalized(input: &ListingFields) -> Result<ListingFields, CoreError> {
    let title = validate_title(&input.title)?.to_string();
    Ok(ListingFields {
        title,
        ..input.clone()
    })
}

/// A single publication pair must be complete and well-formed.
fn single_entry(submission: &PublicationSubmission) -> Result<PublicationEntry, CoreError> {
    let url = submission.url.trim();
    if url.is_empty() {
        return Err(CoreError::ConstraintViolation(
            "Publication URL is required".into(),
        ));
    }
    let date = publication::parse_publication_date(&submission.date)?;
    Ok(PublicationEntry {
        url: url.to_string(),
        date,
    })
}

/// A foreign-key failure on a listing write can only mean the city is unknown.
fn city_reference_error(err: sqlx::Error, city_id: DbId) -> CoreError {
    if maison_db::error::is_foreign_key_violation(&err) {
        CoreError::ConstraintViolation(format!("City {city_id} does not exist"))
    } else {
        classify_error(err)
    }
}
