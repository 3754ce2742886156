//! Node storage shared by every balancing strategy.

use generational_arena::{Arena, Index};
use serde::Serialize;

use crate::error::TreeError;
use crate::event::{Direction, Event, Recorder};

#[derive(PartialEq, Eq, Copy, Clone, Debug, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Red,
    Black,
}

#[derive(PartialEq, Copy, Clone, Debug)]
pub(crate) enum NodeType {
    LeftChild,
    RightChild,
    Orphan,
}

#[derive(Debug)]
struct Node<K> {
    parent: Option<Index>,
    left: Option<Index>,
    right: Option<Index>,

    key: K,

    // Balancing metadata, each strategy only reads its own field
    height: usize,
    color: Color,
}

impl<K> Node<K> {
    fn new(key: K) -> Self {
        Node {
            // Tree structure
            parent: None,
            left: None,
            right: None,

            // Data
            key,

            height: 1,
            color: Color::Red,
        }
    }
}

/// Owns every node of a tree. Child links are the ownership edges; the parent
/// link is a plain index that is only ever followed upwards during fix-up.
#[derive(Debug)]
pub(crate) struct NodeStore<K> {
    nodes: Arena<Node<K>>,
    pub(crate) root: Option<Index>,
}

impl<K> NodeStore<K> {
    pub(crate) fn new() -> Self {
        NodeStore {
            nodes: Arena::new(),
            root: None,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.nodes.len()
    }

    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
        self.root = None;
    }

    /// Allocates a detached node. Only insertion calls this.
    pub(crate) fn alloc(&mut self, key: K) -> Index {
        self.nodes.insert(Node::new(key))
    }

    /// Frees a node that has already been unlinked from the tree.
    pub(crate) fn free(&mut self, node: Index) -> Option<K> {
        self.nodes.remove(node).map(|node| node.key)
    }

    // Rotates the nodes to the left
    //    p              q
    //   / \            / \
    //  a   q   -->    p   c
    //     / \        / \
    //    b   c      a   b
    //
    // Returns the pivot, which now sits where `rotation_root` was.
    pub(crate) fn left_rotate(
        &mut self,
        rotation_root: Index,
        rec: &mut Recorder<K>,
    ) -> Result<Index, TreeError>
    where
        K: Clone,
    {
        // Left rotation so pivot is to the right
        let pivot = self
            .get_right(rotation_root)
            .ok_or_else(|| TreeError::invariant("left rotation without a right child"))?;
        rec.record(|| Event::Rotate {
            axis: self.key(rotation_root).clone(),
            direction: Direction::Left,
        });
        let pivot_left = self.get_left(pivot);
        let parent = self.get_parent(rotation_root);
        let node_type = self.get_node_type(rotation_root);

        // The left child of the pivot becomes the right child of the rotation root
        self.set_right(rotation_root, pivot_left);
        if let Some(pivot_left) = pivot_left {
            self.set_parent(pivot_left, Some(rotation_root));
        }

        // The pivot replaces the rotation root in the tree
        self.set_parent(pivot, parent);
        self.attach(parent, node_type, Some(pivot));

        // Set the left child of the pivot to be the rotation root
        self.set_left(pivot, Some(rotation_root));
        self.set_parent(rotation_root, Some(pivot));
        Ok(pivot)
    }

    // Rotates the nodes to the right
    //     q             p
    //    / \           / \
    //   p   c  -->    a   q
    //  / \               / \
    // a   b             b   c
    pub(crate) fn right_rotate(
        &mut self,
        rotation_root: Index,
        rec: &mut Recorder<K>,
    ) -> Result<Index, TreeError>
    where
        K: Clone,
    {
        // Right rotation so pivot is to the left
        let pivot = self
            .get_left(rotation_root)
            .ok_or_else(|| TreeError::invariant("right rotation without a left child"))?;
        rec.record(|| Event::Rotate {
            axis: self.key(rotation_root).clone(),
            direction: Direction::Right,
        });
        let pivot_right = self.get_right(pivot);
        let parent = self.get_parent(rotation_root);
        let node_type = self.get_node_type(rotation_root);

        // The right child of the pivot becomes the left child of the rotation root
        self.set_left(rotation_root, pivot_right);
        if let Some(pivot_right) = pivot_right {
            self.set_parent(pivot_right, Some(rotation_root));
        }

        // The pivot replaces the rotation root in the tree
        self.set_parent(pivot, parent);
        self.attach(parent, node_type, Some(pivot));

        // Set the right child of the pivot to be the rotation root
        self.set_right(pivot, Some(rotation_root));
        self.set_parent(rotation_root, Some(pivot));
        Ok(pivot)
    }

    /// Rotates `node` down towards `direction`.
    pub(crate) fn rotate(
        &mut self,
        node: Index,
        direction: Direction,
        rec: &mut Recorder<K>,
    ) -> Result<Index, TreeError>
    where
        K: Clone,
    {
        match direction {
            Direction::Left => self.left_rotate(node, rec),
            Direction::Right => self.right_rotate(node, rec),
        }
    }

    /// Puts `child` into the slot described by `node_type` under `parent`. An
    /// orphan slot is the root.
    pub(crate) fn attach(
        &mut self,
        parent: Option<Index>,
        node_type: NodeType,
        child: Option<Index>,
    ) {
        match (parent, node_type) {
            (Some(parent), NodeType::LeftChild) => self.set_left(parent, child),
            (Some(parent), NodeType::RightChild) => self.set_right(parent, child),
            _ => self.root = child,
        }
    }

    // Returns a NodeType enum indicating if the given node is a left child, right child in
    // relation to it's parent or an orphan
    pub(crate) fn get_node_type(&self, node: Index) -> NodeType {
        match self.get_parent(node) {
            Some(parent) if self.get_left(parent) == Some(node) => NodeType::LeftChild,
            Some(_) => NodeType::RightChild,
            None => NodeType::Orphan,
        }
    }

    pub(crate) fn get_child(&self, node: Index, direction: Direction) -> Option<Index> {
        match direction {
            Direction::Left => self.get_left(node),
            Direction::Right => self.get_right(node),
        }
    }

    // Getter and setters
    pub(crate) fn set_right(&mut self, node: Index, right: Option<Index>) {
        self.nodes[node].right = right;
    }

    pub(crate) fn get_right(&self, node: Index) -> Option<Index> {
        self.nodes[node].right
    }

    pub(crate) fn set_left(&mut self, node: Index, left: Option<Index>) {
        self.nodes[node].left = left;
    }

    pub(crate) fn get_left(&self, node: Index) -> Option<Index> {
        self.nodes[node].left
    }

    pub(crate) fn set_parent(&mut self, node: Index, parent: Option<Index>) {
        self.nodes[node].parent = parent;
    }

    pub(crate) fn get_parent(&self, node: Index) -> Option<Index> {
        self.nodes[node].parent
    }

    pub(crate) fn key(&self, node: Index) -> &K {
        &self.nodes[node].key
    }

    /// Overwrites the key held by `node` and hands back the previous one.
    pub(crate) fn replace_key(&mut self, node: Index, key: K) -> K {
        std::mem::replace(&mut self.nodes[node].key, key)
    }

    pub(crate) fn set_color(&mut self, node: Index, color: Color) {
        self.nodes[node].color = color;
    }

    /// Absent nodes count as black.
    pub(crate) fn get_color(&self, node: Option<Index>) -> Color {
        match node.and_then(|node| self.nodes.get(node)) {
            Some(node) => node.color,
            None => Color::Black,
        }
    }

    pub(crate) fn set_height(&mut self, node: Index, height: usize) {
        self.nodes[node].height = height;
    }

    /// Absent nodes have height 0.
    pub(crate) fn get_height(&self, node: Option<Index>) -> usize {
        node.and_then(|node| self.nodes.get(node))
            .map_or(0, |node| node.height)
    }
}
