// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Immutable task graph: leaf detection, downstream lookup, quantifiers,
//! and restriction to a requested subset (§4.1).

use crate::error::GraphError;
use crate::task::Task;
use indexmap::IndexMap;
use std::collections::HashSet;

/// The default root task name when no task names are requested on the
/// command line (§4.1: "typically `up`").
pub const DEFAULT_ROOT: &str = "up";

/// An immutable view over a set of [`Task`]s and the dependency edges
/// derived from their `dependencies` lists.
///
/// Iteration order is the declaration order from the YAML (backed by
/// [`IndexMap`]) so the renderer and log output are deterministic, per the
/// tie-break rule in §4.1.
#[derive(Debug, Clone)]
pub struct TaskGraph {
    tasks: IndexMap<String, Task>,
}

impl TaskGraph {
    /// Build a graph from a declaration-ordered list of tasks, validating
    /// that every dependency resolves and that the graph is acyclic.
    pub fn new(tasks: Vec<Task>) -> Result<Self, GraphError> {
        let mut map = IndexMap::with_capacity(tasks.len());
        for task in tasks {
            if map.contains_key(&task.name) {
                return Err(GraphError::DuplicateTask(task.name));
            }
            map.insert(task.name.clone(), task);
        }
        for task in map.values() {
            for dep in &task.dependencies {
                if !map.contains_key(dep) {
                    return Err(GraphError::UnknownDependency {
                        task: task.name.clone(),
                        dependency: dep.clone(),
                    });
                }
            }
        }
        let graph = Self { tasks: map };
        graph.check_acyclic()?;
        Ok(graph)
    }

    fn check_acyclic(&self) -> Result<(), GraphError> {
        #[derive(PartialEq)]
        enum Mark {
            Visiting,
            Done,
        }
        let mut marks: std::collections::HashMap<&str, Mark> = std::collections::HashMap::new();

        fn visit<'a>(
            graph: &'a TaskGraph,
            name: &'a str,
            marks: &mut std::collections::HashMap<&'a str, Mark>,
        ) -> Result<(), GraphError> {
            match marks.get(name) {
                Some(Mark::Done) => return Ok(()),
                Some(Mark::Visiting) => return Err(GraphError::Cycle(name.to_string())),
                None => {}
            }
            marks.insert(name, Mark::Visiting);
            if let Some(task) = graph.tasks.get(name) {
                for dep in &task.dependencies {
                    visit(graph, dep, marks)?;
                }
            }
            marks.insert(name, Mark::Done);
            Ok(())
        }

        for name in self.tasks.keys() {
            visit(self, name, &mut marks)?;
        }
        Ok(())
    }

    /// Direct lookup by name.
    pub fn get(&self, name: &str) -> Option<&Task> {
        self.tasks.get(name)
    }

    /// All tasks, in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &Task> {
        self.tasks.values()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Tasks with no in-graph dependencies. Used to seed execution.
    pub fn leaves(&self) -> Vec<&Task> {
        self.tasks.values().filter(|t| t.dependencies.is_empty()).collect()
    }

    /// Tasks whose `dependencies` include `name`, in declaration order.
    pub fn downstream(&self, name: &str) -> Vec<&Task> {
        self.tasks
            .values()
            .filter(|t| t.dependencies.iter().any(|d| d == name))
            .collect()
    }

    /// Universal quantifier over the graph's tasks.
    pub fn all(&self, pred: impl Fn(&Task) -> bool) -> bool {
        self.tasks.values().all(pred)
    }

    /// Existential quantifier over the graph's tasks.
    pub fn any(&self, pred: impl Fn(&Task) -> bool) -> bool {
        self.tasks.values().any(pred)
    }

    /// The transitive-closure subgraph reachable from `requested` by
    /// following `dependencies`. An empty `requested` defaults to
    /// [`DEFAULT_ROOT`]. Preserves declaration order and task identity.
    pub fn needed_for(&self, requested: &[String]) -> Result<TaskGraph, GraphError> {
        let roots: Vec<String> = if requested.is_empty() {
            vec![DEFAULT_ROOT.to_string()]
        } else {
            requested.to_vec()
        };

        let mut needed: HashSet<String> = HashSet::new();
        let mut stack: Vec<String> = Vec::new();
        for root in &roots {
            if !self.tasks.contains_key(root) {
                return Err(GraphError::UnknownRequested(root.clone()));
            }
            stack.push(root.clone());
        }
        while let Some(name) = stack.pop() {
            if !needed.insert(name.clone()) {
                continue;
            }
            if let Some(task) = self.tasks.get(&name) {
                for dep in &task.dependencies {
                    if !needed.contains(dep) {
                        stack.push(dep.clone());
                    }
                }
            }
        }

        let restricted: Vec<Task> = self
            .tasks
            .values()
            .filter(|t| needed.contains(&t.name))
            .cloned()
            .collect();
        // Restriction can't introduce a cycle or dangling dependency, so this
        // can't fail, but route through `new` to keep one construction path.
        TaskGraph::new(restricted)
    }
}
