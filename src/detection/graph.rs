// Resource-Allocation Graph
//
// Data-only: nodes and edges for a renderer. Layout is not our concern.
use super::types::*;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Process,
    Resource,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeColor {
    Satisfied,
    Blocked,
    Resource,
}

impl NodeColor {
    pub fn hex(&self) -> &'static str {
        match self {
            NodeColor::Satisfied => "#2ecc71",
            NodeColor::Blocked => "#e74c3c",
            NodeColor::Resource => "#3498db",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    pub label: String,
    pub kind: NodeKind,
    pub color: NodeColor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeKind {
    /// Resource -> process.
    Allocation,
    /// Process -> resource.
    Request,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub from: String,
    pub to: String,
    pub weight: Units,
    pub kind: EdgeKind,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceAllocationGraph {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

pub fn process_id(i: usize) -> String {
    format!("P{}", i)
}

pub fn resource_id(j: usize) -> String {
    format!("R{}", j)
}

impl ResourceAllocationGraph {
    /// Build the graph from the input matrices of a single-instance state.
    /// `finish[i]` only picks the color of process `i`.
    pub fn from_state(state: &SystemState, finish: &[bool]) -> Self {
        let mut nodes = Vec::with_capacity(state.processes() + state.resources());
        for (i, &done) in finish.iter().enumerate().take(state.processes()) {
            let id = process_id(i);
            nodes.push(Node {
                label: id.clone(),
                id,
                kind: NodeKind::Process,
                color: if done { NodeColor::Satisfied } else { NodeColor::Blocked },
            });
        }
        for j in 0..state.resources() {
            let id = resource_id(j);
            nodes.push(Node {
                label: id.clone(),
                id,
                kind: NodeKind::Resource,
                color: NodeColor::Resource,
            });
        }

        let mut edges = Vec::new();
        for (i, row) in state.allocation().iter().enumerate() {
            for (j, &units) in row.iter().enumerate() {
                if units > 0 {
                    edges.push(Edge {
                        from: resource_id(j),
                        to: process_id(i),
                        weight: units,
                        kind: EdgeKind::Allocation,
                    });
                }
            }
        }
        for (i, row) in state.demand().matrix().iter().enumerate() {
            for (j, &units) in row.iter().enumerate() {
                if units > 0 {
                    edges.push(Edge {
                        from: process_id(i),
                        to: resource_id(j),
                        weight: units,
                        kind: EdgeKind::Request,
                    });
                }
            }
        }

        ResourceAllocationGraph { nodes, edges }
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn edges_of_kind(&self, kind: EdgeKind) -> impl Iterator<Item = &Edge> {
        self.edges.iter().filter(move |e| e.kind == kind)
    }

    /// Find one directed cycle, returned as the node ids along it.
    pub fn find_cycle(&self) -> Option<Vec<String>> {
        let mut adjacency: HashMap<&str, Vec<&str>> = HashMap::new();
        for edge in &self.edges {
            adjacency.entry(edge.from.as_str()).or_default().push(edge.to.as_str());
        }

        let mut visited = HashSet::new();
        for node in &self.nodes {
            if visited.contains(node.id.as_str()) {
                continue;
            }
            let mut rec_stack = Vec::new();
            if let Some(start) = Self::dfs(node.id.as_str(), &adjacency, &mut visited, &mut rec_stack) {
                let from = rec_stack.iter().position(|n| *n == start).unwrap_or(0);
                return Some(rec_stack[from..].iter().map(|n| n.to_string()).collect());
            }
        }
        None
    }

    /// Returns the node that closes the cycle; `rec_stack` then holds the path to it.
    fn dfs<'a>(
        node: &'a str,
        graph: &HashMap<&'a str, Vec<&'a str>>,
        visited: &mut HashSet<&'a str>,
        rec_stack: &mut Vec<&'a str>,
    ) -> Option<&'a str> {
        visited.insert(node);
        rec_stack.push(node);

        if let Some(neighbors) = graph.get(node) {
            for &neighbor in neighbors {
                if !visited.contains(neighbor) {
                    if let Some(start) = Self::dfs(neighbor, graph, visited, rec_stack) {
                        return Some(start);
                    }
                } else if rec_stack.contains(&neighbor) {
                    return Some(neighbor);
                }
            }
        }

        rec_stack.pop();
        None
    }
}
