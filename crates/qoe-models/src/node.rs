//! Arena-allocated binary tree nodes shared by classification and
//! regression trees.

/// Index into a node arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) struct NodeIndex(usize);

impl NodeIndex {
    pub(crate) fn index(self) -> usize {
        self.0
    }
}

/// A node whose leaves carry a payload `L` (class distribution or score).
#[derive(Debug, Clone)]
pub(crate) enum Node<L> {
    /// Samples with `row[feature] <= threshold` go left.
    Split {
        feature: usize,
        threshold: f64,
        left: NodeIndex,
        right: NodeIndex,
    },
    Leaf(L),
}

/// Flat node storage; the root is always at index 0.
#[derive(Debug, Clone)]
pub(crate) struct NodeArena<L> {
    nodes: Vec<Node<L>>,
}

impl<L> NodeArena<L> {
    pub(crate) fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    pub(crate) fn push_leaf(&mut self, payload: L) -> NodeIndex {
        self.nodes.push(Node::Leaf(payload));
        NodeIndex(self.nodes.len() - 1)
    }

    /// Reserve a slot for a split whose children are not built yet.
    pub(crate) fn reserve(&mut self, placeholder: L) -> NodeIndex {
        self.push_leaf(placeholder)
    }

    /// Turn a reserved slot into a split node.
    pub(crate) fn set_split(
        &mut self,
        at: NodeIndex,
        feature: usize,
        threshold: f64,
        left: NodeIndex,
        right: NodeIndex,
    ) {
        self.nodes[at.index()] = Node::Split {
            feature,
            threshold,
            left,
            right,
        };
    }

    /// Walk from the root to the leaf reached by `row`.
    pub(crate) fn leaf_for(&self, row: &[f64]) -> &L {
        let mut idx = 0;
        loop {
            match &self.nodes[idx] {
                Node::Leaf(payload) => return payload,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    idx = if row[*feature] <= *threshold {
                        left.index()
                    } else {
                        right.index()
                    };
                }
            }
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Depth of the deepest leaf; a lone root leaf has depth 0.
    pub(crate) fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack = vec![(0usize, 0usize)];
        while let Some((idx, depth)) = stack.pop() {
            match self.nodes.get(idx) {
                Some(Node::Split { left, right, .. }) => {
                    stack.push((left.index(), depth + 1));
                    stack.push((right.index(), depth + 1));
                }
                Some(Node::Leaf(_)) => deepest = deepest.max(depth),
                None => {}
            }
        }
        deepest
    }
}
