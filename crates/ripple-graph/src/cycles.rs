//! Elementary cycle detection over the `dependencies` relation.
//!
//! Three-color depth-first search, written as an explicit stack machine so
//! deep dependency chains cannot overflow the call stack:
//!
//! - **White**: not yet visited
//! - **Gray**: on the current search path (stores its path position)
//! - **Black**: fully explored, never revisited
//!
//! Meeting a gray neighbor closes a cycle: the path slice from that neighbor
//! to the current node, with the neighbor repeated at the end. Roots and
//! neighbors are visited in class-name order so the output is reproducible.
//!
//! Excluded classes are never used as roots, and edges into them are pruned
//! before descending. Pruned edges are reported alongside the cycles.

use std::collections::HashSet;
use std::fmt;

use petgraph::graph::NodeIndex;
use petgraph::Direction;
use serde::Serialize;
use tracing::debug;

use crate::graph::DependencyGraph;

/// A closed dependency cycle, first and last names equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Cycle(Vec<String>);

impl Cycle {
    /// Class names along the cycle, closing name included.
    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.0
    }

    /// Number of distinct classes in the cycle.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len().saturating_sub(1)
    }

    /// Always `false`; a cycle has at least one class.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The same cycle rotated to start at its smallest class name.
    ///
    /// Two searches that enter the same ring at different nodes produce equal
    /// canonical forms.
    #[must_use]
    pub fn canonical(&self) -> Self {
        let ring = &self.0[..self.len()];
        let Some(start) = ring
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| a.cmp(b))
            .map(|(position, _)| position)
        else {
            return self.clone();
        };

        let mut rotated: Vec<String> = ring[start..].iter().chain(&ring[..start]).cloned().collect();
        rotated.push(rotated[0].clone());
        Self(rotated)
    }

    /// Consume the cycle and return its names.
    #[must_use]
    pub fn into_names(self) -> Vec<String> {
        self.0
    }
}

impl fmt::Display for Cycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join(" -> "))
    }
}

/// A dependency edge skipped because its target was excluded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PrunedEdge {
    /// The dependent class
    pub from: String,
    /// The excluded dependency
    pub to: String,
}

/// Result of cycle detection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CycleReport {
    /// Cycles in discovery order
    pub cycles: Vec<Cycle>,
    /// Edges into excluded classes that were never followed
    pub pruned_edges: Vec<PrunedEdge>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Color {
    White,
    /// On the current path at this position.
    Gray(usize),
    Black,
}

/// One level of the explicit DFS stack.
struct Frame {
    node: NodeIndex,
    neighbors: Vec<NodeIndex>,
    next: usize,
}

/// Enumerate dependency cycles, skipping `excluded` classes.
#[must_use]
pub fn detect_cycles(graph: &DependencyGraph, excluded: &HashSet<String>) -> CycleReport {
    let mut report = CycleReport::default();
    let mut colors = vec![Color::White; graph.node_count()];

    for root_name in graph.names() {
        if excluded.contains(root_name) {
            continue;
        }
        let Some(root) = graph.index_of(root_name) else {
            continue;
        };
        if colors[root.index()] != Color::White {
            continue;
        }
        search_from(graph, root, excluded, &mut colors, &mut report);
    }

    debug!(
        cycles = report.cycles.len(),
        pruned_edges = report.pruned_edges.len(),
        excluded = excluded.len(),
        "Cycle detection completed"
    );
    report
}

fn search_from(
    graph: &DependencyGraph,
    root: NodeIndex,
    excluded: &HashSet<String>,
    colors: &mut [Color],
    report: &mut CycleReport,
) {
    let mut path: Vec<NodeIndex> = Vec::new();
    let mut stack: Vec<Frame> = Vec::new();

    enter(graph, root, colors, &mut path, &mut stack);

    while let Some(frame) = stack.last_mut() {
        let Some(&neighbor) = frame.neighbors.get(frame.next) else {
            // All neighbors explored.
            colors[frame.node.index()] = Color::Black;
            path.pop();
            stack.pop();
            continue;
        };
        frame.next += 1;
        let current = frame.node;

        let neighbor_name = graph.name_of(neighbor);
        if excluded.contains(neighbor_name) {
            report.pruned_edges.push(PrunedEdge {
                from: graph.name_of(current).to_string(),
                to: neighbor_name.to_string(),
            });
            continue;
        }

        match colors[neighbor.index()] {
            Color::White => enter(graph, neighbor, colors, &mut path, &mut stack),
            Color::Gray(position) => {
                let mut names: Vec<String> = path[position..]
                    .iter()
                    .map(|&node| graph.name_of(node).to_string())
                    .collect();
                names.push(neighbor_name.to_string());
                report.cycles.push(Cycle(names));
            }
            Color::Black => {}
        }
    }
}

fn enter(
    graph: &DependencyGraph,
    node: NodeIndex,
    colors: &mut [Color],
    path: &mut Vec<NodeIndex>,
    stack: &mut Vec<Frame>,
) {
    colors[node.index()] = Color::Gray(path.len());
    path.push(node);
    stack.push(Frame {
        node,
        neighbors: graph.sorted_neighbors(node, Direction::Outgoing),
        next: 0,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{ClassNode, ClassSignals};

    fn graph_from_edges(names: &[&str], edges: &[(&str, &str)]) -> DependencyGraph {
        let mut graph = DependencyGraph::new();
        for name in names {
            graph
                .add_node(ClassNode::new(*name, format!("{name}.java"), "", ClassSignals::default()))
                .unwrap();
        }
        for (from, to) in edges {
            graph.add_dependency(from, to);
        }
        graph
    }

    fn names(cycle: &Cycle) -> Vec<&str> {
        cycle.names().iter().map(String::as_str).collect()
    }

    #[test]
    fn ring_yields_single_cycle() {
        let graph = graph_from_edges(&["A", "B", "C"], &[("A", "B"), ("B", "C"), ("C", "A")]);

        let report = detect_cycles(&graph, &HashSet::new());

        assert_eq!(report.cycles.len(), 1);
        assert_eq!(names(&report.cycles[0].canonical()), vec!["A", "B", "C", "A"]);
        assert!(report.pruned_edges.is_empty());
    }

    #[test]
    fn excluding_ring_member_removes_cycle() {
        let graph = graph_from_edges(&["A", "B", "C"], &[("A", "B"), ("B", "C"), ("C", "A")]);
        let excluded = HashSet::from(["B".to_string()]);

        let report = detect_cycles(&graph, &excluded);

        assert!(report.cycles.is_empty());
        assert_eq!(
            report.pruned_edges,
            vec![PrunedEdge {
                from: "A".to_string(),
                to: "B".to_string()
            }]
        );
    }

    #[test]
    fn self_loop_yields_two_element_cycle() {
        let graph = graph_from_edges(&["A"], &[("A", "A")]);

        let report = detect_cycles(&graph, &HashSet::new());

        assert_eq!(report.cycles.len(), 1);
        assert_eq!(names(&report.cycles[0]), vec!["A", "A"]);
        assert_eq!(report.cycles[0].len(), 1);
    }

    #[test]
    fn acyclic_graph_has_no_cycles() {
        let graph = graph_from_edges(
            &["Controller", "Service", "Repository"],
            &[("Controller", "Service"), ("Service", "Repository")],
        );

        assert!(detect_cycles(&graph, &HashSet::new()).cycles.is_empty());
    }

    #[test]
    fn one_node_can_close_several_cycles() {
        // A -> B -> A and A -> B -> C -> A: B closes one, C closes the other.
        let graph = graph_from_edges(
            &["A", "B", "C"],
            &[("A", "B"), ("B", "A"), ("B", "C"), ("C", "A")],
        );

        let report = detect_cycles(&graph, &HashSet::new());
        let found: HashSet<Vec<String>> = report
            .cycles
            .iter()
            .map(|cycle| cycle.canonical().into_names())
            .collect();

        assert_eq!(report.cycles.len(), 2);
        assert!(found.contains(&vec!["A".into(), "B".into(), "A".into()]));
        assert!(found.contains(&vec!["A".into(), "B".into(), "C".into(), "A".into()]));
    }

    #[test]
    fn exclusion_leaves_unrelated_cycles_intact() {
        let graph = graph_from_edges(
            &["A", "B", "C", "X", "Y"],
            &[("A", "B"), ("B", "C"), ("C", "A"), ("X", "Y"), ("Y", "X"), ("B", "X")],
        );
        let excluded = HashSet::from(["C".to_string()]);

        let report = detect_cycles(&graph, &excluded);

        assert_eq!(report.cycles.len(), 1);
        assert_eq!(names(&report.cycles[0].canonical()), vec!["X", "Y", "X"]);
    }

    #[test]
    fn output_is_stable_across_edge_insertion_order() {
        let forward = graph_from_edges(
            &["A", "B", "C", "D"],
            &[("A", "B"), ("A", "C"), ("B", "A"), ("C", "D"), ("D", "C")],
        );
        let reversed = graph_from_edges(
            &["D", "C", "B", "A"],
            &[("D", "C"), ("C", "D"), ("B", "A"), ("A", "C"), ("A", "B")],
        );

        assert_eq!(
            detect_cycles(&forward, &HashSet::new()),
            detect_cycles(&reversed, &HashSet::new())
        );
    }

    #[test]
    fn long_chain_does_not_overflow() {
        let names: Vec<String> = (0..20_000).map(|i| format!("C{i:05}")).collect();
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();
        let mut edges: Vec<(&str, &str)> = refs.windows(2).map(|w| (w[0], w[1])).collect();
        edges.push((refs[refs.len() - 1], refs[0]));
        let graph = graph_from_edges(&refs, &edges);

        let report = detect_cycles(&graph, &HashSet::new());

        assert_eq!(report.cycles.len(), 1);
        assert_eq!(report.cycles[0].len(), 20_000);
    }

    #[test]
    fn display_joins_with_arrows() {
        let cycle = Cycle(vec!["A".into(), "B".into(), "A".into()]);
        assert_eq!(cycle.to_string(), "A -> B -> A");
    }
}
