//! Arena-indexed search tree.
//!
//! Nodes are stored in a flat `Vec<Node>` inside [`Tree`] and referenced by
//! [`NodeId`], a plain copyable index. This sidesteps the ownership problems
//! of an `Rc`/`RefCell` tree entirely: the arena owns every node, and a
//! node's `parent` field is just another `NodeId` — a diagnostic pointer,
//! never an ownership edge.

use std::collections::HashMap;

use wh_config::{Action, Catalog};

use crate::belief::{Belief, Observation};

/// Index into a [`Tree`]'s node arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(u32);

impl NodeId {
    fn new(index: usize) -> Self {
        NodeId(index as u32)
    }

    fn index(self) -> usize {
        self.0 as usize
    }
}

/// Two-level child slot: one entry per [`Observation`] variant.
type ChildRow = [Option<NodeId>; 4];

/// A single vertex in the search tree.
#[derive(Debug, Clone)]
pub struct Node {
    pub total_belief: Belief,
    pub mass_used: f64,
    pub depth: u32,

    pub incoming_action_key: Option<String>,
    pub incoming_observation: Option<Observation>,
    pub parent: Option<NodeId>,

    children: HashMap<String, ChildRow>,

    pub visits: u64,
    pub wins: f64,
    pub successes: u64,
    pub terminal_trips: HashMap<u32, u64>,
}

impl Node {
    fn root(total_belief: Belief, mass_used: f64) -> Self {
        Node {
            total_belief,
            mass_used,
            depth: 0,
            incoming_action_key: None,
            incoming_observation: None,
            parent: None,
            children: HashMap::new(),
            visits: 0,
            wins: 0.0,
            successes: 0,
            terminal_trips: HashMap::new(),
        }
    }

    fn child(
        parent: NodeId,
        total_belief: Belief,
        mass_used: f64,
        depth: u32,
        action_key: String,
        obs: Observation,
    ) -> Self {
        Node {
            total_belief,
            mass_used,
            depth,
            incoming_action_key: Some(action_key),
            incoming_observation: Some(obs),
            parent: Some(parent),
            children: HashMap::new(),
            visits: 0,
            wins: 0.0,
            successes: 0,
            terminal_trips: HashMap::new(),
        }
    }

    /// Remaining-mass belief derived from `total_belief` and `mass_used`.
    pub fn remaining_belief(&self) -> Belief {
        self.total_belief.remaining(self.mass_used)
    }

    /// True iff no possible world in the remaining belief has mass left.
    pub fn is_terminal(&self) -> bool {
        self.remaining_belief().max <= 0.0
    }

    /// Actions whose outbound mass is survivable in at least one possible
    /// world of the remaining belief (`remaining.max > out`).
    pub fn valid_actions<'a>(&self, catalog: &'a Catalog) -> Vec<(&'a str, &'a Action)> {
        let remaining = self.remaining_belief();
        catalog
            .usable_actions()
            .filter(|a| remaining.max > a.mass_out)
            .map(|a| (a.key.as_str(), a))
            .collect()
    }

    pub fn has_child(&self, action_key: &str, obs: Observation) -> bool {
        self.children
            .get(action_key)
            .map(|row| row[obs.index()].is_some())
            .unwrap_or(false)
    }

    pub fn get_child(&self, action_key: &str, obs: Observation) -> Option<NodeId> {
        self.children.get(action_key).and_then(|row| row[obs.index()])
    }

    fn set_child(&mut self, action_key: &str, obs: Observation, id: NodeId) {
        let row = self.children.entry(action_key.to_string()).or_insert([None; 4]);
        row[obs.index()] = Some(id);
    }

    /// Aggregated `(visits, wins, successes)` across every observation child
    /// expanded under `action_key`.
    pub fn action_stats(&self, tree: &Tree, action_key: &str) -> ActionStats {
        let mut stats = ActionStats::default();
        if let Some(row) = self.children.get(action_key) {
            for slot in row.iter().flatten() {
                let child = tree.get(*slot);
                stats.visits += child.visits;
                stats.wins += child.wins;
                stats.successes += child.successes;
            }
        }
        stats
    }

    /// UCB1 score for `action_key`, aggregated across its observation
    /// children. Returns `+inf` for an unvisited action.
    pub fn ucb1(&self, tree: &Tree, action_key: &str, exploration: f64) -> f64 {
        let stats = self.action_stats(tree, action_key);
        if stats.visits == 0 {
            return f64::INFINITY;
        }
        let exploitation = stats.wins / stats.visits as f64;
        let exploration_term =
            exploration * ((self.visits as f64).ln() / stats.visits as f64).sqrt();
        exploitation + exploration_term
    }

    /// All action keys with at least one expanded observation child.
    pub fn explored_action_keys(&self) -> impl Iterator<Item = &str> {
        self.children.keys().map(|s| s.as_str())
    }
}

/// Aggregated statistics for one action across its observation children.
#[derive(Debug, Clone, Copy, Default)]
pub struct ActionStats {
    pub visits: u64,
    pub wins: f64,
    pub successes: u64,
}

/// Owns the arena of [`Node`]s created during one `plan` call.
#[derive(Debug)]
pub struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    /// Create a tree with only a root node.
    pub fn new(total_belief: Belief, mass_used: f64) -> Self {
        Tree {
            nodes: vec![Node::root(total_belief, mass_used)],
        }
    }

    pub fn root_id(&self) -> NodeId {
        NodeId::new(0)
    }

    pub fn get(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    pub fn get_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.index()]
    }

    /// Fetch the existing `(action_key, obs)` child of `parent`, or create
    /// and return a new one.
    #[allow(clippy::too_many_arguments)]
    pub fn get_or_insert_child(
        &mut self,
        parent: NodeId,
        action_key: &str,
        obs: Observation,
        total_belief: Belief,
        mass_used: f64,
        depth: u32,
    ) -> NodeId {
        if let Some(existing) = self.get(parent).get_child(action_key, obs) {
            return existing;
        }
        let node = Node::child(parent, total_belief, mass_used, depth, action_key.to_string(), obs);
        let id = NodeId::new(self.nodes.len());
        self.nodes.push(node);
        self.get_mut(parent).set_child(action_key, obs, id);
        id
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterate every node in the arena (no particular tree order).
    pub fn iter(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wh_config::default_catalog;

    fn belief(min: f64, max: f64) -> Belief {
        Belief::new(min, max).unwrap()
    }

    #[test]
    fn root_is_not_terminal_with_positive_remaining() {
        let tree = Tree::new(belief(100.0, 200.0), 0.0);
        assert!(!tree.get(tree.root_id()).is_terminal());
    }

    #[test]
    fn node_is_terminal_when_remaining_exhausted() {
        let tree = Tree::new(belief(100.0, 200.0), 200.0);
        assert!(tree.get(tree.root_id()).is_terminal());
    }

    #[test]
    fn valid_actions_filters_by_remaining_max() {
        let catalog = default_catalog();
        let tree = Tree::new(belief(0.0, 50.0), 0.0);
        let root = tree.get(tree.root_id());
        let valid = root.valid_actions(&catalog);
        // Only actions with mass_out < 50 survive.
        assert!(valid.iter().all(|(_, a)| a.mass_out < 50.0));
        assert!(!valid.is_empty());
    }

    #[test]
    fn get_or_insert_child_is_idempotent() {
        let mut tree = Tree::new(belief(0.0, 1000.0), 0.0);
        let root = tree.root_id();
        let b = belief(0.0, 500.0);
        let first = tree.get_or_insert_child(root, "INTY_HOT", Observation::Fresh, b, 10.0, 1);
        let second = tree.get_or_insert_child(root, "INTY_HOT", Observation::Fresh, b, 10.0, 1);
        assert_eq!(first.0, second.0);
        assert!(tree.get(root).has_child("INTY_HOT", Observation::Fresh));
        assert!(!tree.get(root).has_child("INTY_HOT", Observation::Crit));
    }

    #[test]
    fn ucb1_unvisited_action_is_infinite() {
        let tree = Tree::new(belief(0.0, 1000.0), 0.0);
        let root = tree.get(tree.root_id());
        assert_eq!(root.ucb1(&tree, "INTY_HOT", std::f64::consts::SQRT_2), f64::INFINITY);
    }

    #[test]
    fn action_stats_aggregate_across_observations() {
        let mut tree = Tree::new(belief(0.0, 1000.0), 0.0);
        let root = tree.root_id();
        let b = belief(0.0, 500.0);
        let fresh_id = tree.get_or_insert_child(root, "INTY_HOT", Observation::Fresh, b, 10.0, 1);
        let crit_id = tree.get_or_insert_child(root, "INTY_HOT", Observation::Crit, b, 10.0, 1);
        tree.get_mut(fresh_id).visits = 5;
        tree.get_mut(fresh_id).wins = 2.0;
        tree.get_mut(fresh_id).successes = 2;
        tree.get_mut(crit_id).visits = 3;
        tree.get_mut(crit_id).wins = 1.0;
        tree.get_mut(crit_id).successes = 1;

        let stats = tree.get(root).action_stats(&tree, "INTY_HOT");
        assert_eq!(stats.visits, 8);
        assert_eq!(stats.wins, 3.0);
        assert_eq!(stats.successes, 3);
    }
}
