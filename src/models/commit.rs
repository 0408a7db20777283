use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One parsed line of history metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitRecord {
    pub hash: String,
    /// First parent first.
    pub parent_hashes: Vec<String>,
    pub author: String,
    /// Seconds since the Unix epoch.
    pub timestamp: i64,
    /// Subject line only.
    pub message: String,
    /// Raw decoration text (`HEAD -> main, origin/main, tag: v1.0`), possibly empty.
    pub ref_names: String,
}

impl CommitRecord {
    pub fn new(
        hash: impl Into<String>,
        parent_hashes: Vec<String>,
        author: impl Into<String>,
        timestamp: i64,
        message: impl Into<String>,
        ref_names: impl Into<String>,
    ) -> Self {
        Self {
            hash: hash.into(),
            parent_hashes,
            author: author.into(),
            timestamp,
            message: message.into(),
            ref_names: ref_names.into(),
        }
    }

    /// Abbreviated hash for display. Never longer than the hash itself.
    pub fn short_hash(&self, len: usize) -> &str {
        self.hash.get(..len).unwrap_or(&self.hash)
    }

    pub fn committed_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.timestamp, 0)
    }

    pub fn is_merge(&self) -> bool {
        self.parent_hashes.len() > 1
    }

    pub fn is_root(&self) -> bool {
        self.parent_hashes.is_empty()
    }

    pub fn has_refs(&self) -> bool {
        !self.ref_names.trim().is_empty()
    }
}

/// Kind of reference decorating a commit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RefType {
    LocalBranch,
    RemoteBranch,
    Tag,
    Head,
    Other,
}

/// A single reference label attached to a commit row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefLabel {
    /// Display name, e.g. `main`, `origin/main`, `v1.0`.
    pub name: String,
    pub ref_type: RefType,
    /// Set on the branch that HEAD points at.
    pub is_head: bool,
}

impl RefLabel {
    pub fn new(name: impl Into<String>, ref_type: RefType) -> Self {
        Self {
            name: name.into(),
            ref_type,
            is_head: false,
        }
    }

    /// Branch identity with any remote prefix stripped.
    ///
    /// `origin/feature/x` yields `feature/x`. Tags, HEAD markers and symbolic
    /// remote heads (`origin/HEAD`) have no branch identity.
    pub fn branch_name(&self) -> Option<&str> {
        match self.ref_type {
            RefType::LocalBranch => Some(self.name.as_str()),
            RefType::RemoteBranch => match self.name.split_once('/') {
                Some((_, "HEAD")) => None,
                Some((_, branch)) if !branch.is_empty() => Some(branch),
                _ => None,
            },
            RefType::Tag | RefType::Head | RefType::Other => None,
        }
    }
}

/// Everything a renderer needs to label a row without re-reading the log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitMetadata {
    pub hash: String,
    pub short_hash: String,
    pub author: String,
    pub date: String,
    pub subject: String,
    pub refs: Vec<RefLabel>,
    /// Parents referenced by the commit but missing from the loaded batch.
    pub dangling_parents: Vec<String>,
    pub is_merge: bool,
}
