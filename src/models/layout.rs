use serde::{Deserialize, Serialize};
use std::fmt;

use crate::git::ParseWarning;
use crate::models::CommitMetadata;

/// 24-bit color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Parse `#rrggbb` (leading `#` optional).
    pub fn from_hex(value: &str) -> Option<Self> {
        let digits = value.trim().trim_start_matches('#');
        if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&digits[range], 16).ok();
        Some(Self::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// A point in layout units: rows down, lanes across.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub row: f32,
    pub column: f32,
}

impl Point {
    pub fn new(row: f32, column: f32) -> Self {
        Self { row, column }
    }
}

/// Position and color of one laid-out commit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodePosition {
    pub hash: String,
    /// 0-based index in the order the history was supplied.
    pub row: usize,
    /// Lane allocated from the commit's lane key.
    pub lane: usize,
    /// Horizontal coordinate in lane units. Equals `lane` except for merge
    /// commits, which sit at the mean lane of their parents.
    pub column: f32,
    pub color: Rgb,
}

impl NodePosition {
    pub fn point(&self) -> Point {
        Point::new(self.row as f32, self.column)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ConnectorKind {
    /// Straight segment between start and end.
    Direct,
    /// Path through the waypoints, in order, between start and end.
    Routed { waypoints: Vec<Point> },
}

/// Edge from a child commit to one of its parents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connector {
    pub from_hash: String,
    pub to_hash: String,
    pub start: Point,
    pub end: Point,
    pub kind: ConnectorKind,
    pub color: Rgb,
}

impl Connector {
    pub fn is_routed(&self) -> bool {
        matches!(self.kind, ConnectorKind::Routed { .. })
    }

    pub fn connects(&self, child: &str, parent: &str) -> bool {
        self.from_hash == child && self.to_hash == parent
    }
}

/// Complete layout for one history snapshot
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphLayout {
    pub nodes: Vec<NodePosition>,
    pub connectors: Vec<Connector>,
    /// Number of distinct lanes allocated.
    pub lane_count: usize,
}

impl GraphLayout {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn position(&self, hash: &str) -> Option<&NodePosition> {
        self.nodes.iter().find(|node| node.hash == hash)
    }

    pub fn connector(&self, child: &str, parent: &str) -> Option<&Connector> {
        self.connectors.iter().find(|c| c.connects(child, parent))
    }

    pub fn connectors_from<'a>(&'a self, child: &'a str) -> impl Iterator<Item = &'a Connector> + 'a {
        self.connectors.iter().filter(move |c| c.from_hash == child)
    }
}

/// A published history: layout plus per-row metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HistoryView {
    /// Rebuild request that produced this view.
    pub generation: u64,
    pub layout: GraphLayout,
    /// Index-aligned with `layout.nodes`.
    pub commits: Vec<CommitMetadata>,
    pub warnings: Vec<ParseWarning>,
    /// True when at least one commit references a parent outside the batch.
    pub partial_history: bool,
}

impl HistoryView {
    pub fn rows(&self) -> impl Iterator<Item = (&NodePosition, &CommitMetadata)> {
        self.layout.nodes.iter().zip(self.commits.iter())
    }
}
