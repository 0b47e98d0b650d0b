//! Type hierarchy built from scanned class descriptors.
//!
//! Edges point from a type to each of its direct supertypes. Supertypes that were
//! never scanned themselves (e.g. `javax.servlet.http.HttpServlet` excluded by the
//! input filter) still become nodes, so they can be queried as base types.

use crate::model::TypeDescriptor;
use petgraph::Direction;
use petgraph::stable_graph::{NodeIndex, StableDiGraph};
use std::collections::{BTreeSet, HashMap, VecDeque};

#[derive(Debug, Default)]
pub struct TypeGraphIndex {
    topology: StableDiGraph<String, ()>,
    nodes: HashMap<String, NodeIndex>,
}

impl TypeGraphIndex {
    pub fn build<'a>(descriptors: impl IntoIterator<Item = &'a TypeDescriptor>) -> Self {
        let mut index = Self::default();
        for descriptor in descriptors {
            let sub = index.node(&descriptor.name);
            for supertype in &descriptor.supertypes {
                let sup = index.node(supertype);
                if !index.topology.contains_edge(sub, sup) {
                    index.topology.add_edge(sub, sup, ());
                }
            }
        }
        index
    }

    fn node(&mut self, name: &str) -> NodeIndex {
        if let Some(idx) = self.nodes.get(name) {
            return *idx;
        }
        let idx = self.topology.add_node(name.to_string());
        self.nodes.insert(name.to_string(), idx);
        idx
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All known types assignable to `base`, excluding `base` itself.
    ///
    /// An unknown base name yields an empty set.
    pub fn subtypes_of(&self, base: &str) -> BTreeSet<String> {
        let mut found = BTreeSet::new();
        let Some(&start) = self.nodes.get(base) else {
            return found;
        };

        let mut visited = BTreeSet::from([start]);
        let mut queue = VecDeque::from([start]);
        while let Some(idx) = queue.pop_front() {
            for sub in self.topology.neighbors_directed(idx, Direction::Incoming) {
                if visited.insert(sub) {
                    found.insert(self.topology[sub].clone());
                    queue.push_back(sub);
                }
            }
        }
        found
    }
}
