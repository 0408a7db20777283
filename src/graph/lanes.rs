//! Lane identity: which commits are drawn in the same lane.

use regex::Regex;
use std::fmt;

use crate::git::{parse_ref_names, GraphError};
use crate::graph::builder::{CommitGraph, NodeId};
use crate::models::{RefLabel, RefType};

/// Grouping key for lane allocation, recomputed on every layout pass.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LaneKey(String);

impl LaneKey {
    pub fn branch(name: &str) -> Self {
        Self(format!("branch:{}", name))
    }

    pub fn commit(hash: &str) -> Self {
        Self(format!("commit:{}", hash))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_branch(&self) -> bool {
        self.0.starts_with("branch:")
    }
}

impl fmt::Display for LaneKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// How branch names are read out of ref decorations.
#[derive(Debug, Clone)]
pub struct BranchRules {
    primary: Regex,
    remote_names: Vec<String>,
}

impl BranchRules {
    pub fn new(primary_pattern: &str, remote_names: Vec<String>) -> Result<Self, GraphError> {
        Ok(Self {
            primary: Regex::new(primary_pattern)?,
            remote_names,
        })
    }

    pub fn remote_names(&self) -> &[String] {
        &self.remote_names
    }

    pub fn is_primary(&self, branch: &str) -> bool {
        self.primary.is_match(branch)
    }

    pub fn labels(&self, ref_names: &str) -> Vec<RefLabel> {
        parse_ref_names(ref_names, &self.remote_names)
    }

    /// Normalized branch name for a decoration string.
    ///
    /// Preference: a primary branch, then the branch HEAD points at, then the
    /// first local branch, then the first remote-tracking branch. Returns
    /// `None` when the decorations name no branch (tags, detached HEAD).
    pub fn branch_identity(&self, ref_names: &str) -> Option<String> {
        let labels = self.labels(ref_names);
        let branches: Vec<(&RefLabel, &str)> = labels
            .iter()
            .filter_map(|label| label.branch_name().map(|name| (label, name)))
            .collect();

        let chosen = branches
            .iter()
            .find(|(_, name)| self.is_primary(name))
            .or_else(|| branches.iter().find(|(label, _)| label.is_head))
            .or_else(|| branches.iter().find(|(label, _)| label.ref_type == RefType::LocalBranch))
            .or_else(|| branches.first());

        chosen.map(|(_, name)| name.to_string())
    }
}

/// Resolves and memoizes lane keys for one graph.
pub struct BranchKeyResolver<'a> {
    graph: &'a CommitGraph,
    rules: &'a BranchRules,
    keys: Vec<Option<LaneKey>>,
}

impl<'a> BranchKeyResolver<'a> {
    pub fn new(graph: &'a CommitGraph, rules: &'a BranchRules) -> Self {
        Self {
            graph,
            rules,
            keys: vec![None; graph.len()],
        }
    }

    /// Lane key of `id`:
    /// 1. the branch named by its refs, else
    /// 2. its parent's key when it is the parent's only child and its only
    ///    resolved parent, else
    /// 3. a key unique to the commit.
    pub fn key_for(&mut self, id: NodeId) -> LaneKey {
        if let Some(key) = &self.keys[id.index()] {
            return key.clone();
        }

        // Walk toward the ancestors until a commit decides its own key.
        // The graph is acyclic, so the walk terminates.
        let mut chain = Vec::new();
        let mut current = id;
        let key = loop {
            if let Some(key) = &self.keys[current.index()] {
                break key.clone();
            }
            chain.push(current);

            let node = self.graph.node(current);
            if let Some(branch) = self.rules.branch_identity(&node.record().ref_names) {
                break LaneKey::branch(&branch);
            }
            match self.linear_parent(current) {
                Some(parent) => current = parent,
                None => break LaneKey::commit(node.hash()),
            }
        };

        for id in chain {
            self.keys[id.index()] = Some(key.clone());
        }
        key
    }

    fn linear_parent(&self, id: NodeId) -> Option<NodeId> {
        match self.graph.node(id).parents() {
            [parent] if self.graph.node(*parent).children().len() == 1 => Some(*parent),
            _ => None,
        }
    }
}
