// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 ene-copilot contributors

//! Task dependency graph
//!
//! An edge runs from each context entry to the task that consumes it. The
//! graph is checked for unknown references and cycles when it is built.

use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::{depth_first_search, Control, DfsEvent};
use std::collections::HashMap;

use crate::errors::CopilotError;
use crate::pipeline::Pipeline;

/// Dependency graph over the tasks of one pipeline.
///
/// Node weights are positions in `Pipeline::tasks`.
pub struct DagBuilder {
    graph: DiGraph<usize, ()>,
    name_to_index: HashMap<String, NodeIndex>,
    /// Task names in declaration order
    names: Vec<String>,
    /// Agent of each task, parallel to `names`
    agents: Vec<String>,
}

impl DagBuilder {
    pub fn new() -> Self {
        Self {
            graph: DiGraph::new(),
            name_to_index: HashMap::new(),
            names: Vec::new(),
            agents: Vec::new(),
        }
    }

    /// Build and check the graph of a pipeline
    pub fn build(pipeline: &Pipeline) -> Result<Self, CopilotError> {
        let mut dag = Self::new();

        for (position, task) in pipeline.tasks.iter().enumerate() {
            let node = dag.graph.add_node(position);
            dag.name_to_index.insert(task.name.clone(), node);
            dag.names.push(task.name.clone());
            dag.agents.push(task.agent.clone());
        }

        for task in &pipeline.tasks {
            let consumer = dag.name_to_index[&task.name];

            for upstream in &task.context {
                let producer = *dag.name_to_index.get(upstream).ok_or_else(|| {
                    CopilotError::UnknownDependency {
                        task: task.name.clone(),
                        dependency: upstream.clone(),
                    }
                })?;

                // Listing the same upstream twice still means one edge
                if !dag.graph.contains_edge(producer, consumer) {
                    dag.graph.add_edge(producer, consumer, ());
                }
            }
        }

        dag.sorted()?;
        Ok(dag)
    }

    fn name(&self, node: NodeIndex) -> &str {
        &self.names[self.graph[node]]
    }

    /// Nodes in dependency order, or the tasks of a cycle
    fn sorted(&self) -> Result<Vec<NodeIndex>, CopilotError> {
        toposort(&self.graph, None).map_err(|cycle| CopilotError::CircularDependency {
            tasks: self.cycle_through(cycle.node_id()),
        })
    }

    /// Names of the tasks on one cycle through `start`, in dependency order
    fn cycle_through(&self, start: NodeIndex) -> Vec<String> {
        let mut parent: HashMap<NodeIndex, NodeIndex> = HashMap::new();

        let closing = depth_first_search(&self.graph, Some(start), |event| match event {
            DfsEvent::TreeEdge(from, to) => {
                parent.insert(to, from);
                Control::Continue
            }
            DfsEvent::BackEdge(from, to) if to == start => Control::Break(from),
            _ => Control::Continue,
        });

        let mut path = Vec::new();
        let mut node = closing.break_value();
        while let Some(current) = node {
            path.push(self.name(current).to_string());
            node = if current == start {
                None
            } else {
                parent.get(&current).copied()
            };
        }
        if path.is_empty() {
            path.push(self.name(start).to_string());
        }

        path.reverse();
        path
    }

    /// Task positions in execution order
    pub fn topological_order(&self) -> Result<Vec<usize>, CopilotError> {
        Ok(self.sorted()?.into_iter().map(|n| self.graph[n]).collect())
    }

    /// Edges as (producer, consumer) positions, ordered by consumer then producer
    fn edges(&self) -> Vec<(usize, usize)> {
        let mut edges: Vec<(usize, usize)> = self
            .graph
            .edge_indices()
            .filter_map(|e| self.graph.edge_endpoints(e))
            .map(|(from, to)| (self.graph[from], self.graph[to]))
            .collect();
        edges.sort_unstable_by_key(|&(from, to)| (to, from));
        edges
    }

    /// Mermaid flowchart, one node per task labelled with its agent
    pub fn to_mermaid(&self) -> String {
        let mut out = String::from("graph TD\n");

        for (name, agent) in self.names.iter().zip(&self.agents) {
            out.push_str(&format!("    {}[\"{}<br/>{}\"]\n", name, name, agent));
        }
        for (from, to) in self.edges() {
            out.push_str(&format!("    {} --> {}\n", self.names[from], self.names[to]));
        }

        out
    }

    /// Graphviz digraph, one node per task labelled with its agent
    pub fn to_dot(&self) -> String {
        let mut out = String::from("digraph pipeline {\n    rankdir=TB;\n    node [shape=box, style=rounded];\n\n");

        for (name, agent) in self.names.iter().zip(&self.agents) {
            out.push_str(&format!("    \"{}\" [label=\"{}\\n{}\"];\n", name, name, agent));
        }
        out.push('\n');
        for (from, to) in self.edges() {
            out.push_str(&format!(
                "    \"{}\" -> \"{}\";\n",
                self.names[from], self.names[to]
            ));
        }

        out.push_str("}\n");
        out
    }

    /// Numbered execution order with agents and context lists
    pub fn to_text(&self, pipeline: &Pipeline) -> Result<String, CopilotError> {
        let mut out = String::new();

        for (step, position) in self.topological_order()?.into_iter().enumerate() {
            let task = &pipeline.tasks[position];
            out.push_str(&format!("{}. {} ({})", step + 1, task.name, task.agent));
            if !task.context.is_empty() {
                out.push_str(&format!(" [context: {}]", task.context.join(", ")));
            }
            out.push('\n');
        }

        Ok(out)
    }
}

impl Default for DagBuilder {
    fn default() -> Self {
        Self::new()
    }
}
