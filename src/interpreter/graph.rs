//! Dependency graph between declarations.

use indexmap::{IndexMap, IndexSet};

use crate::ast::Declaration;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DependencyGraph {
    edges: IndexMap<String, IndexSet<String>>,
}

impl DependencyGraph {
    pub fn from_declarations<'a>(declarations: impl IntoIterator<Item = &'a Declaration>) -> Self {
        let edges = declarations
            .into_iter()
            .map(|decl| (decl.name.clone(), decl.references.clone()))
            .collect();
        Self { edges }
    }

    /// First variable that mentions itself.
    pub fn self_reference(&self) -> Option<&str> {
        self.edges
            .iter()
            .find(|(name, refs)| refs.contains(*name))
            .map(|(name, _)| name.as_str())
    }

    /// First `(referenced, referencing)` pair whose target was never declared.
    pub fn undefined_reference(&self) -> Option<(&str, &str)> {
        self.edges.iter().find_map(|(name, refs)| {
            refs.iter()
                .find(|target| !self.edges.contains_key(*target))
                .map(|target| (target.as_str(), name.as_str()))
        })
    }

    /// Depth-first search for a cycle. Returns the path with the repeated
    /// name at both ends, e.g. `[A, B, A]`.
    pub fn find_cycle(&self) -> Option<Vec<String>> {
        let mut visited = IndexSet::new();
        let mut stack = Vec::new();
        self.edges
            .keys()
            .find_map(|name| self.visit(name, &mut visited, &mut stack))
    }

    fn visit<'g>(
        &'g self,
        name: &'g str,
        visited: &mut IndexSet<&'g str>,
        stack: &mut Vec<&'g str>,
    ) -> Option<Vec<String>> {
        if let Some(start) = stack.iter().position(|on_stack| *on_stack == name) {
            let mut cycle: Vec<String> = stack[start..].iter().map(|n| n.to_string()).collect();
            cycle.push(name.to_string());
            return Some(cycle);
        }
        if !visited.insert(name) {
            return None;
        }

        stack.push(name);
        if let Some(refs) = self.edges.get(name) {
            for target in refs {
                if let Some(cycle) = self.visit(target, visited, stack) {
                    return Some(cycle);
                }
            }
        }
        stack.pop();
        None
    }
}
