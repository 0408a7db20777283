use std::collections::{BTreeSet, HashMap};
use tracing::debug;

use crate::git::GraphError;
use crate::models::CommitRecord;

/// Index of a node in the graph arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// A commit together with its resolved relations.
///
/// Parent and child links are arena indices; the graph owns every node.
#[derive(Debug, Clone)]
pub struct CommitNode {
    record: CommitRecord,
    parents: Vec<NodeId>,
    children: Vec<NodeId>,
    dangling_parents: BTreeSet<String>,
}

impl CommitNode {
    fn new(record: CommitRecord) -> Self {
        Self {
            record,
            parents: Vec::new(),
            children: Vec::new(),
            dangling_parents: BTreeSet::new(),
        }
    }

    pub fn record(&self) -> &CommitRecord {
        &self.record
    }

    pub fn hash(&self) -> &str {
        &self.record.hash
    }

    /// Resolved parents, first parent first.
    pub fn parents(&self) -> &[NodeId] {
        &self.parents
    }

    /// Resolved children in the order they were linked.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Parent hashes that are not part of the loaded batch.
    pub fn dangling_parents(&self) -> &BTreeSet<String> {
        &self.dangling_parents
    }

    pub fn is_merge(&self) -> bool {
        self.parents.len() > 1
    }
}

/// Commit DAG built from one log batch
#[derive(Debug, Clone, Default)]
pub struct CommitGraph {
    nodes: Vec<CommitNode>,
    index: HashMap<String, NodeId>,
}

impl CommitGraph {
    /// Build the graph, preserving record order.
    ///
    /// Fails on a repeated hash or on cyclic parent declarations. Parents
    /// missing from the batch are kept as dangling hashes on the child.
    pub fn build(records: Vec<CommitRecord>) -> Result<Self, GraphError> {
        let mut graph = Self {
            nodes: Vec::with_capacity(records.len()),
            index: HashMap::with_capacity(records.len()),
        };

        for record in records {
            let id = NodeId(graph.nodes.len());
            if graph.index.contains_key(&record.hash) {
                return Err(GraphError::duplicate_hash(record.hash));
            }
            graph.index.insert(record.hash.clone(), id);
            graph.nodes.push(CommitNode::new(record));
        }

        graph.link_parents();
        graph.check_acyclic()?;

        debug!(
            "Built commit graph: {} nodes, {} dangling parent references",
            graph.nodes.len(),
            graph.dangling_parent_count()
        );
        Ok(graph)
    }

    fn link_parents(&mut self) {
        for child_index in 0..self.nodes.len() {
            let child = NodeId(child_index);
            let parent_hashes = self.nodes[child_index].record.parent_hashes.clone();

            for parent_hash in parent_hashes {
                match self.index.get(&parent_hash).copied() {
                    Some(parent) => {
                        if self.nodes[child_index].parents.contains(&parent) {
                            debug!("Commit {} lists parent {} twice", self.nodes[child_index].hash(), parent_hash);
                            continue;
                        }
                        self.nodes[child_index].parents.push(parent);
                        self.nodes[parent.0].children.push(child);
                    }
                    None => {
                        debug!(
                            "Parent {} of {} is outside the loaded history",
                            parent_hash,
                            self.nodes[child_index].hash()
                        );
                        self.nodes[child_index].dangling_parents.insert(parent_hash);
                    }
                }
            }
        }
    }

    /// Iterative depth-first walk over parent links; a link back into the
    /// current path is a cycle.
    fn check_acyclic(&self) -> Result<(), GraphError> {
        #[derive(Clone, Copy, PartialEq)]
        enum Mark {
            Unvisited,
            OnPath,
            Done,
        }

        let mut marks = vec![Mark::Unvisited; self.nodes.len()];
        let mut stack: Vec<(NodeId, usize)> = Vec::new();

        for start in 0..self.nodes.len() {
            if marks[start] != Mark::Unvisited {
                continue;
            }
            marks[start] = Mark::OnPath;
            stack.push((NodeId(start), 0));

            while let Some(frame) = stack.last_mut() {
                let (id, cursor) = *frame;
                match self.nodes[id.0].parents.get(cursor) {
                    Some(&parent) => {
                        frame.1 += 1;
                        match marks[parent.0] {
                            Mark::Unvisited => {
                                marks[parent.0] = Mark::OnPath;
                                stack.push((parent, 0));
                            }
                            Mark::OnPath => {
                                return Err(GraphError::cycle(
                                    self.nodes[id.0].hash(),
                                    self.nodes[parent.0].hash(),
                                ));
                            }
                            Mark::Done => {}
                        }
                    }
                    None => {
                        marks[id.0] = Mark::Done;
                        stack.pop();
                    }
                }
            }
        }

        Ok(())
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, hash: &str) -> bool {
        self.index.contains_key(hash)
    }

    pub fn id_of(&self, hash: &str) -> Option<NodeId> {
        self.index.get(hash).copied()
    }

    pub fn get(&self, hash: &str) -> Option<&CommitNode> {
        self.id_of(hash).map(|id| self.node(id))
    }

    /// Panics if `id` did not come from this graph.
    pub fn node(&self, id: NodeId) -> &CommitNode {
        &self.nodes[id.0]
    }

    /// Nodes in input order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &CommitNode)> {
        self.nodes.iter().enumerate().map(|(i, node)| (NodeId(i), node))
    }

    pub fn parents_of(&self, id: NodeId) -> impl Iterator<Item = &CommitNode> {
        self.nodes[id.0].parents.iter().map(move |p| &self.nodes[p.0])
    }

    pub fn children_of(&self, id: NodeId) -> impl Iterator<Item = &CommitNode> {
        self.nodes[id.0].children.iter().map(move |c| &self.nodes[c.0])
    }

    /// Commits without any parent hash at all.
    pub fn roots(&self) -> impl Iterator<Item = &CommitNode> {
        self.nodes.iter().filter(|node| node.record.is_root())
    }

    pub fn dangling_parent_count(&self) -> usize {
        self.nodes.iter().map(|node| node.dangling_parents.len()).sum()
    }

    /// True when the batch is a truncated view of a longer history.
    pub fn has_partial_history(&self) -> bool {
        self.nodes.iter().any(|node| !node.dangling_parents.is_empty())
    }
}
