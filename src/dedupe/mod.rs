//! Record deduplication.

use std::collections::HashSet;

use tracing::debug;

use crate::records::CompanyRecord;

/// Collapse a record list into a unique set keyed by normalized identity.
///
/// First-seen order is preserved; later records with the same identity key
/// are discarded whole, with no field merging. Records with no identity
/// (neither name nor website) are dropped: they can neither be
/// deduplicated meaningfully nor named in output.
#[must_use]
pub fn dedupe_records(records: Vec<CompanyRecord>) -> Vec<CompanyRecord> {
    let mut seen = HashSet::new();
    let mut unique = Vec::new();

    for record in records {
        let Some(key) = record.identity_key() else {
            debug!("Dropping identity-less record");
            continue;
        };

        if seen.insert(key) {
            unique.push(record);
        }
    }

    unique
}
