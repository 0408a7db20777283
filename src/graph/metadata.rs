use chrono::format::{Item, StrftimeItems};

use crate::git::{parse_ref_names, GraphError};
use crate::graph::builder::CommitNode;
use crate::models::CommitMetadata;

pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d %H:%M";
pub const DEFAULT_SHORT_HASH_LENGTH: usize = 7;

/// Check a strftime pattern before it reaches `DateTime::format`, which
/// panics on unknown specifiers when rendered with `to_string`.
pub fn validate_date_format(pattern: &str) -> Result<(), GraphError> {
    if StrftimeItems::new(pattern).any(|item| matches!(item, Item::Error)) {
        return Err(GraphError::configuration(
            "date_format",
            format!("unsupported strftime pattern {:?}", pattern),
        ));
    }
    Ok(())
}

/// Turns graph nodes into display rows.
#[derive(Debug, Clone)]
pub struct MetadataFormatter {
    short_hash_length: usize,
    date_format: String,
    remote_names: Vec<String>,
}

impl Default for MetadataFormatter {
    fn default() -> Self {
        Self {
            short_hash_length: DEFAULT_SHORT_HASH_LENGTH,
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            remote_names: Vec::new(),
        }
    }
}

impl MetadataFormatter {
    pub fn new(
        short_hash_length: usize,
        date_format: impl Into<String>,
        remote_names: Vec<String>,
    ) -> Result<Self, GraphError> {
        let date_format = date_format.into();
        validate_date_format(&date_format)?;
        Ok(Self {
            short_hash_length,
            date_format,
            remote_names,
        })
    }

    pub fn describe(&self, node: &CommitNode) -> CommitMetadata {
        let record = node.record();
        let date = record
            .committed_at()
            .map(|when| when.format(&self.date_format).to_string())
            .unwrap_or_else(|| record.timestamp.to_string());

        CommitMetadata {
            hash: record.hash.clone(),
            short_hash: record.short_hash(self.short_hash_length).to_string(),
            author: record.author.clone(),
            date,
            subject: record.message.clone(),
            refs: parse_ref_names(&record.ref_names, &self.remote_names),
            dangling_parents: node.dangling_parents().iter().cloned().collect(),
            is_merge: record.is_merge(),
        }
    }
}
