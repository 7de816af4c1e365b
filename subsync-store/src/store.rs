//! The sync-state store: read once at startup, write once on success.

use chrono::Utc;

use subsync_core::{SyncRecord, SyncTag};

use crate::client::{Gist, GistClient, GistFile};
use crate::document::{find_record, upsert_record, RECORD_FILENAME};
use crate::error::StoreError;

/// Read/write access to the persisted last-synced-commit records.
pub trait SyncStateStore {
    /// The record stored under `tag`, or `None` on a first-ever sync.
    fn read(&self, tag: &SyncTag) -> Result<Option<SyncRecord>, StoreError>;

    /// Overwrite the record for `tag` with `sha` and a fresh timestamp,
    /// preserving every other tag's record.
    fn write(&mut self, tag: &SyncTag, sha: &str) -> Result<(), StoreError>;
}

/// Gist-backed implementation.
///
/// [`GistStore::open`] fetches the gist eagerly, so a bad gist id surfaces as
/// a configuration failure before any repository work starts. A gist without
/// the record file yet reads as an empty document.
pub struct GistStore {
    client: GistClient,
    gist_id: String,
    gist: Gist,
}

impl GistStore {
    pub fn open(client: GistClient, gist_id: &str) -> Result<Self, StoreError> {
        let gist = client.get(gist_id)?;
        tracing::debug!(
            "opened gist {gist_id}: {} file(s), record file {}",
            gist.files.len(),
            if gist.files.contains_key(RECORD_FILENAME) {
                "present"
            } else {
                "absent"
            }
        );
        Ok(Self {
            client,
            gist_id: gist_id.to_owned(),
            gist,
        })
    }

    fn record_content(&self) -> &str {
        self.gist
            .files
            .get(RECORD_FILENAME)
            .map(|file| file.content.as_str())
            .unwrap_or_default()
    }
}

impl SyncStateStore for GistStore {
    fn read(&self, tag: &SyncTag) -> Result<Option<SyncRecord>, StoreError> {
        Ok(find_record(self.record_content(), tag))
    }

    fn write(&mut self, tag: &SyncTag, sha: &str) -> Result<(), StoreError> {
        let now = Utc::now().to_rfc2822();
        let content = upsert_record(self.record_content(), tag, sha, &now);

        // The update API replaces the whole file set, so every other file is
        // re-submitted with unchanged content.
        let mut files = self.gist.files.clone();
        files.insert(RECORD_FILENAME.to_owned(), GistFile { content });

        let description = format!("Updated by subsync on {now}");
        self.client.update(&self.gist_id, &description, &files)?;

        self.gist.files = files;
        self.gist.description = Some(description);
        Ok(())
    }
}
