use tracing::debug;

use super::hash::{hash_pair, Hash};
use super::substance::Substance;
use super::{MerkleError, Result};

/// Position of a node in the tree's arena.
pub type NodeIndex = usize;

/// A vertex of the tree. Leaves carry the substance they were hashed from;
/// branches carry the indices of their two children.
#[derive(Debug, Clone)]
pub struct Node<S> {
    hash: Hash,
    children: Option<(NodeIndex, NodeIndex)>,
    parent: Option<NodeIndex>,
    substance: Option<S>,
}

impl<S> Node<S> {
    fn leaf(hash: Hash, substance: Option<S>) -> Self {
        Self {
            hash,
            children: None,
            parent: None,
            substance,
        }
    }

    fn branch(hash: Hash, left: NodeIndex, right: NodeIndex) -> Self {
        Self {
            hash,
            children: Some((left, right)),
            parent: None,
            substance: None,
        }
    }

    pub fn hash(&self) -> &Hash {
        &self.hash
    }

    /// `(left, right)` for branches, `None` for leaves. Both may be the same
    /// index when an odd layer paired its last node with itself.
    pub fn children(&self) -> Option<(NodeIndex, NodeIndex)> {
        self.children
    }

    pub fn parent(&self) -> Option<NodeIndex> {
        self.parent
    }

    pub fn substance(&self) -> Option<&S> {
        self.substance.as_ref()
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }
}

/// A binary SHA-256 Merkle tree built once from an ordered list of substances.
///
/// All nodes live in one arena; parent and child links are indices into it.
#[derive(Debug, Clone)]
pub struct MerkleTree<S> {
    nodes: Vec<Node<S>>,
    leaves: Vec<NodeIndex>,
    root: NodeIndex,
    root_hash: Hash,
}

impl<S: Substance> MerkleTree<S> {
    /// Build the tree over `items` in the order given.
    ///
    /// Every item is hashed into a leaf. An odd leaf count is evened out by
    /// appending a clone of the last leaf, then layers are reduced pairwise,
    /// left to right, until a single root remains.
    pub fn build<I>(items: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
    {
        let items = items.into_iter();
        let mut nodes: Vec<Node<S>> = Vec::with_capacity(2 * items.size_hint().0 + 2);
        let mut layer: Vec<NodeIndex> = Vec::with_capacity(items.size_hint().0 + 1);

        for item in items {
            let hash = item.content_hash()?;
            layer.push(push_node(&mut nodes, Node::leaf(hash, Some(item))));
        }

        let last = match layer.last() {
            Some(&last) => last,
            None => return Err(MerkleError::EmptyInput),
        };

        if layer.len() % 2 == 1 {
            let duplicate = Node::leaf(nodes[last].hash, nodes[last].substance.clone());
            layer.push(push_node(&mut nodes, duplicate));
        }

        let leaves = layer.clone();

        while layer.len() > 1 {
            layer = reduce_layer(&mut nodes, &layer);
        }

        let root = layer[0];
        let root_hash = nodes[root].hash;

        debug!(
            leaves = leaves.len(),
            nodes = nodes.len(),
            root = %hex::encode(root_hash),
            "merkle tree built"
        );

        Ok(Self {
            nodes,
            leaves,
            root,
            root_hash,
        })
    }
}

impl<S> MerkleTree<S> {
    /// The committed root hash.
    pub fn root_hash(&self) -> Hash {
        self.root_hash
    }

    pub fn root(&self) -> &Node<S> {
        &self.nodes[self.root]
    }

    pub fn root_index(&self) -> NodeIndex {
        self.root
    }

    /// Leaves in input order, including the padding duplicate if one was added.
    pub fn leaves(&self) -> impl Iterator<Item = &Node<S>> + '_ {
        self.leaves.iter().map(move |&index| &self.nodes[index])
    }

    pub fn leaf_indices(&self) -> &[NodeIndex] {
        &self.leaves
    }

    pub fn leaf_count(&self) -> usize {
        self.leaves.len()
    }

    pub fn node(&self, index: NodeIndex) -> Option<&Node<S>> {
        self.nodes.get(index)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }
}

fn push_node<S>(nodes: &mut Vec<Node<S>>, node: Node<S>) -> NodeIndex {
    nodes.push(node);
    nodes.len() - 1
}

/// Combine a layer into its parents. An odd trailing node is paired with itself.
fn reduce_layer<S>(nodes: &mut Vec<Node<S>>, layer: &[NodeIndex]) -> Vec<NodeIndex> {
    let mut parents = Vec::with_capacity((layer.len() + 1) / 2);

    for pair in layer.chunks(2) {
        let left = pair[0];
        let right = pair.get(1).copied().unwrap_or(left);

        let hash = hash_pair(&nodes[left].hash, &nodes[right].hash);
        let parent = push_node(nodes, Node::branch(hash, left, right));
        nodes[left].parent = Some(parent);
        nodes[right].parent = Some(parent);

        parents.push(parent);
    }

    parents
}
