//! Full invariant checks.
//!
//! These walk the whole tree, so the facade only runs them after a mutation
//! when `TreeConfig::verify` is set. Tests lean on them heavily.

use std::fmt::Debug;

use generational_arena::Index;

use crate::avl;
use crate::error::TreeError;
use crate::node::{Color, NodeStore};
use crate::traversal::{Order, Traversal};

/// Checks key ordering, parent back-references and that every node in the
/// arena is reachable from the root. Returns the node count.
pub(crate) fn check_bst<K: Ord + Debug>(store: &NodeStore<K>) -> Result<usize, TreeError> {
    if let Some(root) = store.root {
        if store.get_parent(root).is_some() {
            return Err(TreeError::invariant("root has a parent"));
        }
    }

    let mut reachable = 0;
    let mut stack: Vec<Index> = store.root.into_iter().collect();
    while let Some(node) = stack.pop() {
        reachable += 1;
        for child in store.get_left(node).into_iter().chain(store.get_right(node)) {
            if store.get_parent(child) != Some(node) {
                return Err(TreeError::invariant(format!(
                    "{:?} does not point back at its parent {:?}",
                    store.key(child),
                    store.key(node)
                )));
            }
            stack.push(child);
        }
    }
    if reachable != store.len() {
        return Err(TreeError::invariant(format!(
            "{} nodes reachable but {} allocated",
            reachable,
            store.len()
        )));
    }

    let mut keys = Traversal::new(store, Order::In);
    if let Some(mut prev) = keys.next() {
        for key in keys {
            if prev >= key {
                return Err(TreeError::invariant(format!(
                    "keys out of order: {:?} before {:?}",
                    prev, key
                )));
            }
            prev = key;
        }
    }
    Ok(reachable)
}

/// Checks stored heights and balance factors. Returns the tree height.
pub(crate) fn check_avl<K: Debug>(store: &NodeStore<K>) -> Result<usize, TreeError> {
    avl_height(store, store.root)
}

fn avl_height<K: Debug>(store: &NodeStore<K>, node: Option<Index>) -> Result<usize, TreeError> {
    let Some(node) = node else {
        return Ok(0);
    };
    let left = avl_height(store, store.get_left(node))?;
    let right = avl_height(store, store.get_right(node))?;
    let height = 1 + left.max(right);
    if store.get_height(Some(node)) != height {
        return Err(TreeError::invariant(format!(
            "{:?} stores height {} but has height {}",
            store.key(node),
            store.get_height(Some(node)),
            height
        )));
    }
    if avl::balance_factor(store, node).abs() > 1 {
        return Err(TreeError::invariant(format!(
            "{:?} has balance factor {}",
            store.key(node),
            avl::balance_factor(store, node)
        )));
    }
    Ok(height)
}

/// Checks colors and black heights. Returns the black height of the root,
/// counting the absent leaves.
pub(crate) fn check_red_black<K: Debug>(store: &NodeStore<K>) -> Result<usize, TreeError> {
    if store.get_color(store.root) != Color::Black {
        return Err(TreeError::invariant("root is red"));
    }
    black_height(store, store.root)
}

fn black_height<K: Debug>(store: &NodeStore<K>, node: Option<Index>) -> Result<usize, TreeError> {
    let Some(node) = node else {
        return Ok(1);
    };
    let left = store.get_left(node);
    let right = store.get_right(node);
    let color = store.get_color(Some(node));
    if color == Color::Red
        && (store.get_color(left) == Color::Red || store.get_color(right) == Color::Red)
    {
        return Err(TreeError::invariant(format!(
            "red node {:?} has a red child",
            store.key(node)
        )));
    }
    let left_height = black_height(store, left)?;
    let right_height = black_height(store, right)?;
    if left_height != right_height {
        return Err(TreeError::invariant(format!(
            "Invalid black height for node at {:?}",
            store.key(node)
        )));
    }
    match color {
        Color::Red => Ok(left_height),
        Color::Black => Ok(left_height + 1),
    }
}

/// Longest root-to-leaf path counted in nodes, without trusting stored heights.
pub(crate) fn depth<K>(store: &NodeStore<K>) -> usize {
    let mut deepest = 0;
    let mut stack: Vec<(Index, usize)> = store.root.map(|root| (root, 1)).into_iter().collect();
    while let Some((node, level)) = stack.pop() {
        deepest = deepest.max(level);
        stack.extend(store.get_left(node).map(|left| (left, level + 1)));
        stack.extend(store.get_right(node).map(|right| (right, level + 1)));
    }
    deepest
}
