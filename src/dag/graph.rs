// src/dag/graph.rs

use std::collections::HashMap;

use petgraph::Direction;
use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};

use crate::dag::event::{EventHandle, EventSlot};
use crate::dag::task_info::{TaskHandle, TaskInfo};
use crate::errors::{ReduceError, Result};

/// Producer → consumer view of the submitted tasks.
///
/// A task produces an event when the event appears in its parameters, and
/// consumes every event in its join. Edges are labelled with the event that
/// links the two tasks.
#[derive(Debug, Clone)]
pub struct TaskGraph {
    graph: DiGraph<TaskHandle, EventHandle>,
    order: Vec<NodeIndex>,
}

impl TaskGraph {
    /// Build and validate the graph.
    ///
    /// Rejects:
    /// - an event produced by more than one task,
    /// - a dependency on a pending event that no task produces,
    /// - cycles.
    pub(crate) fn build<'a>(
        tasks: impl IntoIterator<Item = &'a TaskInfo>,
        events: &[EventSlot],
    ) -> Result<Self> {
        let tasks: Vec<&TaskInfo> = tasks.into_iter().collect();

        let mut graph: DiGraph<TaskHandle, EventHandle> = DiGraph::new();
        let mut nodes: HashMap<TaskHandle, NodeIndex> = HashMap::new();
        let mut producers: HashMap<EventHandle, TaskHandle> = HashMap::new();

        for info in &tasks {
            nodes.insert(info.handle, graph.add_node(info.handle));
            for event in info.produced_events() {
                if let Some(first) = producers.insert(event, info.handle) {
                    return Err(ReduceError::MultipleProducers {
                        event,
                        first,
                        second: info.handle,
                    });
                }
            }
        }

        for info in &tasks {
            for &dep in &info.deps {
                match producers.get(&dep) {
                    Some(producer) => {
                        graph.add_edge(nodes[producer], nodes[&info.handle], dep);
                    }
                    None => {
                        let satisfied = events
                            .get(dep.0)
                            .is_some_and(|slot| slot.payload.is_some());
                        if !satisfied {
                            return Err(ReduceError::DanglingDependency {
                                task: info.handle,
                                event: dep,
                            });
                        }
                    }
                }
            }
        }

        let order = toposort(&graph, None)
            .map_err(|cycle| ReduceError::GraphCycle(graph[cycle.node_id()]))?;

        Ok(Self { graph, order })
    }

    pub fn task_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Tasks in a valid execution order.
    pub fn topological_order(&self) -> impl Iterator<Item = TaskHandle> + '_ {
        self.order.iter().map(|&n| self.graph[n])
    }

    /// Tasks with no producer upstream.
    pub fn roots(&self) -> Vec<TaskHandle> {
        self.graph
            .externals(Direction::Incoming)
            .map(|n| self.graph[n])
            .collect()
    }

    /// Number of tasks on the longest dependency chain.
    pub fn depth(&self) -> usize {
        let mut depth: HashMap<NodeIndex, usize> = HashMap::new();
        for &node in &self.order {
            let d = self
                .graph
                .neighbors_directed(node, Direction::Incoming)
                .filter_map(|pred| depth.get(&pred))
                .max()
                .map_or(1, |d| d + 1);
            depth.insert(node, d);
        }
        depth.values().copied().max().unwrap_or(0)
    }
}
