//! Ledger store - owns the student list and its persistence.
//!
//! The whole ledger is one JSON array stored under a single blob key. It is
//! read once by [`LedgerStore::load`] and written back in full after every
//! mutation.

use crate::{
    core::{
        blob::BlobStore,
        normalize::decode_ledger,
        status::Status,
        student::StudentRecord,
    },
    errors::{Error, Result},
};
use tracing::{error, info, instrument, warn};

/// Key the raw ledger blob is copied to when load has to skip entries.
#[must_use]
pub fn backup_key(key: &str) -> String {
    format!("{key}.backup")
}

/// The in-memory ledger and the blob store it is saved to.
#[derive(Debug)]
pub struct LedgerStore<S> {
    pub(crate) blobs: S,
    pub(crate) key: String,
    pub(crate) records: Vec<StudentRecord>,
}

impl<S: BlobStore> LedgerStore<S> {
    /// Loads the ledger stored under `key`.
    ///
    /// Never fails: a missing blob starts an empty ledger, and an unreadable
    /// or corrupt blob is discarded in favor of an empty one. Entries that
    /// cannot be kept are skipped; the blob as read is then copied to
    /// [`backup_key`] before anything overwrites it.
    ///
    /// # Arguments
    /// * `blobs` - Blob store the ledger is read from and later saved to
    /// * `key` - Blob key holding the ledger
    ///
    /// # Returns
    /// The store and a status saying how the load went
    #[instrument(skip(blobs))]
    pub async fn load(mut blobs: S, key: &str) -> (Self, Status) {
        let key = key.to_string();

        let read = blobs.get(&key).await;
        let (records, status) = match read {
            Ok(None) => {
                info!("No ledger blob found, starting with an empty ledger");
                (
                    Vec::new(),
                    Status::info("No data found. Starting fresh."),
                )
            }
            Ok(Some(blob)) => match decode_ledger(&blob) {
                Ok(decoded) if decoded.skipped > 0 => {
                    let backup = backup_key(&key);
                    warn!(
                        "Loaded {} student records, skipped {} entries",
                        decoded.records.len(),
                        decoded.skipped
                    );
                    let kept = match blobs.put(&backup, &blob).await {
                        Ok(()) => format!("The original data was kept under '{backup}'."),
                        Err(e) => {
                            error!("Failed to back up ledger blob to {}: {}", backup, e);
                            "The original data could not be backed up.".to_string()
                        }
                    };
                    (
                        decoded.records,
                        Status::warning(format!(
                            "Data loaded; {} invalid or duplicate entries were skipped. {kept}",
                            decoded.skipped
                        )),
                    )
                }
                Ok(decoded) => {
                    info!("Loaded {} student records", decoded.records.len());
                    (decoded.records, Status::success("Data loaded."))
                }
                Err(e) => {
                    error!("Discarding corrupt ledger blob: {}", e);
                    (
                        Vec::new(),
                        Status::error("Error loading data. Starting fresh."),
                    )
                }
            },
            Err(e) => {
                error!("Failed to read ledger blob: {}", e);
                (
                    Vec::new(),
                    Status::error(format!("Error reading stored data ({e}). Starting fresh.")),
                )
            }
        };

        (
            Self {
                blobs,
                key,
                records,
            },
            status,
        )
    }

    /// Writes the whole ledger to the blob store, replacing what was there.
    ///
    /// # Returns
    /// `Ok(())` once the blob store holds the current ledger
    ///
    /// # Errors
    /// Returns `Error::Persistence` if the ledger cannot be encoded or
    /// written. The in-memory ledger is left as it is.
    #[instrument(skip(self), fields(key = %self.key, students = self.records.len()))]
    pub async fn save(&mut self) -> Result<()> {
        let blob = serde_json::to_string(&self.records).map_err(|e| Error::Persistence {
            message: format!("Failed to encode ledger: {e}"),
        })?;

        self.blobs
            .put(&self.key, &blob)
            .await
            .map_err(|e| Error::Persistence {
                message: e.to_string(),
            })
            .inspect_err(|e| warn!("Ledger not saved: {}", e))
    }
}

impl<S> LedgerStore<S> {
    /// All records in insertion order.
    #[must_use]
    pub fn records(&self) -> &[StudentRecord] {
        &self.records
    }

    /// Number of students in the ledger.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the ledger has no students.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Blob key the ledger is saved under.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Gives back the blob store, dropping the in-memory ledger.
    pub fn into_blob_store(self) -> S {
        self.blobs
    }

    /// Finds a student by roll number, ignoring case and surrounding whitespace.
    #[must_use]
    pub fn find_by_roll_no(&self, roll_no: &str) -> Option<&StudentRecord> {
        self.position(roll_no).map(|index| &self.records[index])
    }

    pub(crate) fn position(&self, roll_no: &str) -> Option<usize> {
        let roll_no = roll_no.trim();
        self.records
            .iter()
            .position(|record| record.matches_roll_no(roll_no))
    }

    /// Index of the student an operation targets.
    ///
    /// # Errors
    /// `Error::Validation` for a blank roll number, `Error::StudentNotFound`
    /// if nobody matches.
    pub(crate) fn require_index(&self, roll_no: &str) -> Result<usize> {
        let roll_no = roll_no.trim();
        if roll_no.is_empty() {
            return Err(Error::validation("Please enter a Roll Number."));
        }
        self.position(roll_no).ok_or_else(|| Error::StudentNotFound {
            roll_no: roll_no.to_string(),
        })
    }
}
