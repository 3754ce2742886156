//! Strategy-agnostic binary search tree primitives.
//!
//! Nothing in here reads or writes balancing metadata; the strategies repair
//! their own invariants from the locations these functions hand back.

use std::cmp::Ordering;

use generational_arena::Index;

use crate::error::TreeError;
use crate::event::{Direction, Event, Recorder};
use crate::node::{Color, NodeStore, NodeType};

/// Where a node was physically unlinked, for the strategies to fix up from.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Removal {
    /// Former parent of the unlinked node, `None` if it was the root.
    pub(crate) parent: Option<Index>,
    /// The child that took its place, if any.
    pub(crate) child: Option<Index>,
    /// Which slot under `parent` the node occupied.
    pub(crate) node_type: NodeType,
    /// Color of the unlinked node.
    pub(crate) color: Color,
}

/// Walks down from the root comparing `key` and attaches a new leaf where the
/// walk falls off the tree. Returns `None` without touching the tree if the key
/// is already present.
pub(crate) fn insert_placement<K: Ord + Clone>(
    store: &mut NodeStore<K>,
    key: K,
    rec: &mut Recorder<K>,
) -> Option<Index> {
    let mut parent = None;
    let mut node_type = NodeType::Orphan;
    let mut current = store.root;
    while let Some(node) = current {
        let direction = step(store, node, &key, rec)?;
        parent = Some(node);
        node_type = match direction {
            Direction::Left => NodeType::LeftChild,
            Direction::Right => NodeType::RightChild,
        };
        current = store.get_child(node, direction);
    }

    let new_node = store.alloc(key);
    store.set_parent(new_node, parent);
    store.attach(parent, node_type, Some(new_node));
    rec.record(|| Event::Relink {
        node: store.key(new_node).clone(),
    });
    Some(new_node)
}

pub(crate) fn search<K: Ord + Clone>(
    store: &NodeStore<K>,
    key: &K,
    rec: &mut Recorder<K>,
) -> Option<Index> {
    let mut current = store.root;
    while let Some(node) = current {
        match step(store, node, key, rec) {
            Some(direction) => current = store.get_child(node, direction),
            None => return Some(node),
        }
    }
    None
}

// One comparison of the walk. `None` means the key sits at `node`.
fn step<K: Ord + Clone>(
    store: &NodeStore<K>,
    node: Index,
    key: &K,
    rec: &mut Recorder<K>,
) -> Option<Direction> {
    rec.record(|| Event::Compare {
        node: store.key(node).clone(),
        other: key.clone(),
    });
    let direction = match key.cmp(store.key(node)) {
        Ordering::Equal => return None,
        Ordering::Less => Direction::Left,
        Ordering::Greater => Direction::Right,
    };
    rec.record(|| Event::Descend { direction });
    Some(direction)
}

pub(crate) fn find_min<K>(store: &NodeStore<K>, mut node: Index) -> Index {
    while let Some(left) = store.get_left(node) {
        node = left;
    }
    node
}

pub(crate) fn find_max<K>(store: &NodeStore<K>, mut node: Index) -> Index {
    while let Some(right) = store.get_right(node) {
        node = right;
    }
    node
}

/// The node holding the next larger key.
pub(crate) fn successor<K>(store: &NodeStore<K>, node: Index) -> Option<Index> {
    if let Some(right) = store.get_right(node) {
        return Some(find_min(store, right));
    }
    let mut node = node;
    while store.get_node_type(node) == NodeType::RightChild {
        node = store.get_parent(node)?;
    }
    store.get_parent(node)
}

/// The node holding the next smaller key.
pub(crate) fn predecessor<K>(store: &NodeStore<K>, node: Index) -> Option<Index> {
    if let Some(left) = store.get_left(node) {
        return Some(find_max(store, left));
    }
    let mut node = node;
    while store.get_node_type(node) == NodeType::LeftChild {
        node = store.get_parent(node)?;
    }
    store.get_parent(node)
}

/// Locates `key` and removes it. Returns the removed key together with the
/// location of the node that was physically unlinked, or `None` on a miss.
pub(crate) fn delete_by_key<K: Ord + Clone>(
    store: &mut NodeStore<K>,
    key: &K,
    rec: &mut Recorder<K>,
) -> Result<Option<(K, Removal)>, TreeError> {
    match search(store, key, rec) {
        Some(node) => remove_node(store, node, rec).map(Some),
        None => Ok(None),
    }
}

// A node with two children takes over its successor's key, then the successor
// (which has no left child) is removed in its place.
fn remove_node<K: Clone>(
    store: &mut NodeStore<K>,
    node: Index,
    rec: &mut Recorder<K>,
) -> Result<(K, Removal), TreeError> {
    if let (Some(_), Some(right)) = (store.get_left(node), store.get_right(node)) {
        let successor = find_min(store, right);
        let successor_key = store.key(successor).clone();
        rec.record(|| Event::Relink {
            node: successor_key.clone(),
        });
        let removed_key = store.replace_key(node, successor_key);
        let (_, removal) = remove_node(store, successor, rec)?;
        return Ok((removed_key, removal));
    }

    let child = store.get_left(node).or(store.get_right(node));
    let parent = store.get_parent(node);
    let node_type = store.get_node_type(node);
    let color = store.get_color(Some(node));

    store.attach(parent, node_type, child);
    if let Some(child) = child {
        store.set_parent(child, parent);
        rec.record(|| Event::Relink {
            node: store.key(child).clone(),
        });
    }
    let removed_key = store
        .free(node)
        .ok_or_else(|| TreeError::invariant("unlinked node missing from the arena"))?;

    Ok((
        removed_key,
        Removal {
            parent,
            child,
            node_type,
            color,
        },
    ))
}
