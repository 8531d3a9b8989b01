use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::constants::EPSILON;
use crate::error::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Source,
    Sink,
    Transit,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: String,
    pub balance: f64,
}

impl Node {
    pub fn kind(&self) -> NodeKind {
        if self.balance > EPSILON {
            NodeKind::Source
        } else if self.balance < -EPSILON {
            NodeKind::Sink
        } else {
            NodeKind::Transit
        }
    }
}

// derived Ord gives lexicographic tie-break for free
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EdgeId {
    pub from: String,
    pub to: String,
}

impl EdgeId {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self { from: from.into(), to: to.into() }
    }

    pub fn other(&self, node: &str) -> &str {
        if self.from == node {
            &self.to
        } else {
            &self.from
        }
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}->{}", self.from, self.to)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub from: String,
    pub to: String,
    pub cost: f64,
    pub capacity: f64,
}

impl Edge {
    pub fn id(&self) -> EdgeId {
        EdgeId::new(self.from.clone(), self.to.clone())
    }
}

#[derive(Debug, Clone, Default)]
pub struct Graph {
    nodes: BTreeMap<String, Node>,
    edges: BTreeMap<EdgeId, Edge>,
    out_adj: BTreeMap<String, Vec<EdgeId>>,
    in_adj: BTreeMap<String, Vec<EdgeId>>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(&mut self, id: impl Into<String>, balance: f64) -> Result<(), Error> {
        let id = id.into();
        if self.nodes.contains_key(&id) {
            return Err(Error::InvalidInput(format!("duplicate node id {id}")));
        }
        self.out_adj.insert(id.clone(), Vec::new());
        self.in_adj.insert(id.clone(), Vec::new());
        self.nodes.insert(id.clone(), Node { id, balance });
        Ok(())
    }

    pub fn add_edge(
        &mut self,
        from: impl Into<String>,
        to: impl Into<String>,
        cost: f64,
        capacity: f64,
    ) -> Result<(), Error> {
        let from = from.into();
        let to = to.into();
        if !self.nodes.contains_key(&from) {
            return Err(Error::InvalidInput(format!("unknown edge endpoint {from}")));
        }
        if !self.nodes.contains_key(&to) {
            return Err(Error::InvalidInput(format!("unknown edge endpoint {to}")));
        }
        let id = EdgeId::new(from.clone(), to.clone());
        if self.edges.contains_key(&id) {
            return Err(Error::InvalidInput(format!("duplicate edge {id}")));
        }
        if capacity < 0.0 {
            return Err(Error::InvalidInput(format!("negative capacity on edge {id}")));
        }
        self.out_adj.get_mut(&from).unwrap().push(id.clone());
        self.in_adj.get_mut(&to).unwrap().push(id.clone());
        self.edges.insert(id, Edge { from, to, cost, capacity });
        Ok(())
    }

    pub fn check_balance_feasibility(&self) -> bool {
        let sum: f64 = self.nodes.values().map(|n| n.balance).sum();
        sum.abs() <= EPSILON
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn edge(&self, id: &EdgeId) -> Option<&Edge> {
        self.edges.get(id)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    pub fn node_ids(&self) -> impl Iterator<Item = &String> {
        self.nodes.keys()
    }

    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.values()
    }

    pub fn edge_ids(&self) -> BTreeSet<EdgeId> {
        self.edges.keys().cloned().collect()
    }

    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    pub fn out_edges(&self, node: &str) -> &[EdgeId] {
        self.out_adj.get(node).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn in_edges(&self, node: &str) -> &[EdgeId] {
        self.in_adj.get(node).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn root_candidate(&self) -> Option<&str> {
        self.nodes.keys().next().map(String::as_str)
    }

    pub fn objective(&self, flows: &BTreeMap<EdgeId, f64>) -> f64 {
        self.edges
            .values()
            .map(|e| e.cost * flows.get(&e.id()).copied().unwrap_or(0.0))
            .sum()
    }
}
