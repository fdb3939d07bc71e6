//! Record types flowing through the harvest pipeline.

use serde::{Deserialize, Serialize};

/// Raw markup of one harvested page, handed from discovery to extraction.
pub type PageSource = String;

/// A structured company record.
///
/// `website_url` is never set by extraction; the coordinator assigns it
/// exactly once when the record's redirect resolves, and nothing mutates a
/// record after deduplication.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyRecord {
    #[serde(rename = "Company Name")]
    pub name: Option<String>,

    #[serde(rename = "Website URL")]
    pub website_url: Option<String>,

    #[serde(rename = "Location")]
    pub location: Option<String>,

    #[serde(rename = "Founded Year")]
    pub founded_year: Option<String>,

    /// Service lines in document order, as `"{name} ({percentage})"`.
    #[serde(rename = "Services")]
    pub services: Vec<String>,
}

/// A freshly extracted record paired with its unresolved "visit website"
/// redirect link.
///
/// Pairing the two in one entry keeps record and redirect attached through
/// every intermediate step; a website URL can only ever be merged into the
/// record it was extracted alongside.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PendingRecord {
    pub record: CompanyRecord,
    pub redirect: Option<String>,
}

impl CompanyRecord {
    /// Normalized identity used for deduplication: the lowercased, trimmed
    /// name when present, else the lowercased, trimmed website URL.
    /// Records with neither have no identity.
    #[must_use]
    pub fn identity_key(&self) -> Option<String> {
        let candidate = |field: &Option<String>| {
            field
                .as_deref()
                .map(|v| v.trim().to_lowercase())
                .filter(|v| !v.is_empty())
        };

        candidate(&self.name).or_else(|| candidate(&self.website_url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_prefers_name_over_website() {
        let record = CompanyRecord {
            name: Some("  Acme Inc ".to_string()),
            website_url: Some("https://acme.com".to_string()),
            ..Default::default()
        };
        assert_eq!(record.identity_key().as_deref(), Some("acme inc"));
    }

    #[test]
    fn identity_falls_back_to_website() {
        let record = CompanyRecord {
            website_url: Some("https://Acme.com".to_string()),
            ..Default::default()
        };
        assert_eq!(record.identity_key().as_deref(), Some("https://acme.com"));
    }

    #[test]
    fn blank_name_does_not_shadow_website() {
        let record = CompanyRecord {
            name: Some("   ".to_string()),
            website_url: Some("https://acme.com".to_string()),
            ..Default::default()
        };
        assert_eq!(record.identity_key().as_deref(), Some("https://acme.com"));
    }

    #[test]
    fn no_fields_means_no_identity() {
        assert_eq!(CompanyRecord::default().identity_key(), None);
    }
}
