//! Per-node expand/collapse state

use crate::render::{NodePath, COLLAPSED_GLYPH, EXPANDED_GLYPH};
use std::collections::BTreeMap;

/// State of one collapsible node. Nodes start collapsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Expansion {
    #[default]
    Collapsed,
    Expanded,
}

impl Expansion {
    pub fn toggled(self) -> Self {
        match self {
            Expansion::Collapsed => Expansion::Expanded,
            Expansion::Expanded => Expansion::Collapsed,
        }
    }

    /// Direction glyph shown in the header
    pub fn indicator(self) -> char {
        match self {
            Expansion::Collapsed => COLLAPSED_GLYPH,
            Expansion::Expanded => EXPANDED_GLYPH,
        }
    }

    /// Whether the body carries the `active` (visible) style
    pub fn is_expanded(self) -> bool {
        self == Expansion::Expanded
    }
}

/// Expansion state for the nodes currently in the details container
#[derive(Debug, Default)]
pub struct Controller {
    nodes: BTreeMap<NodePath, Expansion>,
}

impl Controller {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget every previously attached node and register `nodes` as collapsed
    pub fn attach(&mut self, nodes: &[NodePath]) {
        self.nodes.clear();
        for path in nodes {
            self.nodes.insert(*path, Expansion::Collapsed);
        }
        log::debug!("attached {} collapsible nodes", self.nodes.len());
    }

    /// Header click. Returns the new state, or `None` if the node is not attached.
    pub fn toggle(&mut self, path: &NodePath) -> Option<Expansion> {
        let state = self.nodes.get_mut(path)?;
        *state = state.toggled();
        Some(*state)
    }

    pub fn state(&self, path: &NodePath) -> Option<Expansion> {
        self.nodes.get(path).copied()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Nodes currently expanded, in path order
    pub fn expanded(&self) -> impl Iterator<Item = &NodePath> {
        self.nodes
            .iter()
            .filter(|(_, s)| s.is_expanded())
            .map(|(p, _)| p)
    }
}
