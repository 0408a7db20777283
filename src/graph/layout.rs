//! Row/lane assignment and connector geometry.
//!
//! Rows follow the order the history was supplied in (row 0 is the first
//! commit read). Lanes come from [`LaneKey`]s, allocated in first-seen order,
//! so identical input always yields identical output. Merge commits are then
//! centered between the lanes they join.

use std::collections::HashMap;
use tracing::debug;

use crate::git::GraphError;
use crate::graph::builder::{CommitGraph, CommitNode};
use crate::graph::colors::Palette;
use crate::graph::lanes::{BranchKeyResolver, BranchRules, LaneKey};
use crate::models::{Connector, ConnectorKind, GraphLayout, NodePosition, Point, Rgb};
use crate::state::GraphConfig;

/// Detour offset, in lanes, for straight edges blocked by another commit.
const DETOUR_OFFSET: f32 = 0.5;

#[derive(Debug, Clone)]
pub struct LayoutEngine {
    rules: BranchRules,
    palette: Palette,
}

impl LayoutEngine {
    pub fn new(config: &GraphConfig) -> Result<Self, GraphError> {
        Ok(Self::with_parts(config.branch_rules()?, config.palette()?))
    }

    pub fn with_parts(rules: BranchRules, palette: Palette) -> Self {
        Self { rules, palette }
    }

    pub fn rules(&self) -> &BranchRules {
        &self.rules
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Lay out every node of `graph`. An empty graph gives an empty layout.
    pub fn layout(&self, graph: &CommitGraph) -> GraphLayout {
        if graph.is_empty() {
            return GraphLayout::default();
        }

        let (lanes, colors, lane_count) = self.assign_lanes(graph);
        let columns = center_merges(graph, &lanes);

        let nodes: Vec<NodePosition> = graph
            .iter()
            .map(|(id, node)| NodePosition {
                hash: node.hash().to_string(),
                row: id.index(),
                lane: lanes[id.index()],
                column: columns[id.index()],
                color: colors[id.index()],
            })
            .collect();

        let connectors = build_connectors(graph, &nodes);

        debug!(
            "Laid out {} commits in {} lanes with {} connectors",
            nodes.len(),
            lane_count,
            connectors.len()
        );

        GraphLayout {
            nodes,
            connectors,
            lane_count,
        }
    }

    /// First pass: one lane per distinct key, in first-seen row order.
    fn assign_lanes(&self, graph: &CommitGraph) -> (Vec<usize>, Vec<Rgb>, usize) {
        let mut resolver = BranchKeyResolver::new(graph, &self.rules);
        let mut lane_of_key: HashMap<LaneKey, usize> = HashMap::new();
        let mut next_lane = 0;
        let mut lanes = Vec::with_capacity(graph.len());
        let mut colors = Vec::with_capacity(graph.len());

        for (id, _) in graph.iter() {
            let key = resolver.key_for(id);
            let lane = match lane_of_key.get(&key) {
                Some(&lane) => lane,
                None => {
                    let lane = next_lane;
                    next_lane += 1;
                    lane_of_key.insert(key.clone(), lane);
                    lane
                }
            };
            lanes.push(lane);
            colors.push(self.palette.color_for(&key));
        }

        (lanes, colors, next_lane)
    }
}

/// Second pass: merge commits move to the mean lane of their resolved parents.
fn center_merges(graph: &CommitGraph, lanes: &[usize]) -> Vec<f32> {
    graph
        .iter()
        .map(|(id, node)| {
            let parents = node.parents();
            if parents.len() > 1 {
                let total: usize = parents.iter().map(|p| lanes[p.index()]).sum();
                total as f32 / parents.len() as f32
            } else {
                lanes[id.index()] as f32
            }
        })
        .collect()
}

/// Rows occupied by each column, ascending.
struct ColumnOccupancy {
    rows: HashMap<u32, Vec<usize>>,
}

impl ColumnOccupancy {
    fn new(nodes: &[NodePosition]) -> Self {
        let mut rows: HashMap<u32, Vec<usize>> = HashMap::new();
        for node in nodes {
            rows.entry(node.column.to_bits()).or_default().push(node.row);
        }
        Self { rows }
    }

    /// Is any node in `column` strictly between rows `a` and `b`?
    fn blocked(&self, column: f32, a: usize, b: usize) -> bool {
        let (low, high) = if a < b { (a, b) } else { (b, a) };
        match self.rows.get(&column.to_bits()) {
            Some(rows) => {
                let next = rows.partition_point(|&row| row <= low);
                rows.get(next).is_some_and(|&row| row < high)
            }
            None => false,
        }
    }
}

fn build_connectors(graph: &CommitGraph, nodes: &[NodePosition]) -> Vec<Connector> {
    let occupancy = ColumnOccupancy::new(nodes);
    let mut connectors = Vec::new();

    for (id, node) in graph.iter() {
        let child = &nodes[id.index()];
        for (parent_index, parent_id) in node.parents().iter().enumerate() {
            let parent = &nodes[parent_id.index()];
            let kind = connector_kind(node, child, parent, &occupancy);
            let color = if parent_index == 0 { child.color } else { parent.color };

            connectors.push(Connector {
                from_hash: child.hash.clone(),
                to_hash: parent.hash.clone(),
                start: child.point(),
                end: parent.point(),
                kind,
                color,
            });
        }
    }

    connectors
}

fn connector_kind(
    node: &CommitNode,
    child: &NodePosition,
    parent: &NodePosition,
    occupancy: &ColumnOccupancy,
) -> ConnectorKind {
    let start = child.point();
    let end = parent.point();
    let step = if end.row >= start.row { 0.5 } else { -0.5 };

    if child.column == parent.column {
        if !occupancy.blocked(child.column, child.row, parent.row) {
            return ConnectorKind::Direct;
        }
        let detour = child.column + DETOUR_OFFSET;
        return ConnectorKind::Routed {
            waypoints: vec![
                Point::new(start.row + step, detour),
                Point::new(end.row - step, detour),
            ],
        };
    }

    let waypoint = if node.is_merge() {
        // leave the merge sideways, then run down the parent's column
        Point::new(start.row + step, end.column)
    } else {
        // run down the child's column, then turn into the parent
        Point::new(end.row - step, start.column)
    };
    ConnectorKind::Routed {
        waypoints: vec![waypoint],
    }
}
