//! Record-document format: newline-separated tagged entries.
//!
//! Each line is `{tag}{sha} *DATE {timestamp}`. At most one line per tag; an
//! upsert replaces the tag's line and leaves every other line untouched.

use subsync_core::{SyncRecord, SyncTag};

/// Fixed filename of the record document inside the gist.
pub const RECORD_FILENAME: &str = "subsync-last-sync.txt";

/// Literal separator between the commit SHA and the timestamp.
pub const DATE_SEPARATOR: &str = " *DATE ";

/// Find the record stored under `tag`, if any.
///
/// A line that starts with the tag but lacks the date separator is treated
/// as absent rather than an error.
pub fn find_record(content: &str, tag: &SyncTag) -> Option<SyncRecord> {
    content.lines().find_map(|line| {
        let value = line.strip_prefix(tag.as_str())?;
        let (sha, synced_at) = value.split_once(DATE_SEPARATOR)?;
        Some(SyncRecord {
            sha: sha.to_owned(),
            synced_at: synced_at.to_owned(),
        })
    })
}

/// Replace (or insert) the record for `tag`, preserving all other lines.
///
/// The fresh record is prepended so the most recently synced relationship
/// sits at the top of the document.
pub fn upsert_record(content: &str, tag: &SyncTag, sha: &str, date: &str) -> String {
    let mut lines = vec![format!("{}{sha}{DATE_SEPARATOR}{date}", tag.as_str())];
    lines.extend(
        content
            .lines()
            .filter(|line| !line.starts_with(tag.as_str()))
            .map(str::to_owned),
    );
    lines.join("\n")
}
