//! AVL balancing: every node keeps its height and no node's subtrees may differ
//! in height by more than one.

use std::fmt::Debug;

use generational_arena::Index;
use tracing::debug;

use crate::bst::Removal;
use crate::error::TreeError;
use crate::event::{Direction, Recorder};
use crate::node::NodeStore;
use crate::strategy::Balance;
use crate::validate;

pub(crate) struct Avl;

fn update_height<K>(store: &mut NodeStore<K>, node: Index) {
    let left = store.get_height(store.get_left(node));
    let right = store.get_height(store.get_right(node));
    store.set_height(node, 1 + left.max(right));
}

/// height(left) - height(right)
pub(crate) fn balance_factor<K>(store: &NodeStore<K>, node: Index) -> isize {
    store.get_height(store.get_left(node)) as isize - store.get_height(store.get_right(node)) as isize
}

// The rotation root moves down first, so its height is recomputed before the pivot's.
fn rotate<K: Clone>(
    store: &mut NodeStore<K>,
    node: Index,
    direction: Direction,
    rec: &mut Recorder<K>,
) -> Result<Index, TreeError> {
    let pivot = store.rotate(node, direction, rec)?;
    update_height(store, node);
    update_height(store, pivot);
    Ok(pivot)
}

/// Restores the balance factor at `node` with a single or double rotation and
/// returns whichever node now roots that subtree.
fn rebalance<K: Clone>(
    store: &mut NodeStore<K>,
    node: Index,
    rec: &mut Recorder<K>,
) -> Result<Index, TreeError> {
    let balance = balance_factor(store, node);
    if balance > 1 {
        let left = store
            .get_left(node)
            .ok_or_else(|| TreeError::invariant("left-heavy node without a left child"))?;
        if balance_factor(store, left) < 0 {
            debug!("avl left-right case");
            rotate(store, left, Direction::Left, rec)?;
        }
        rotate(store, node, Direction::Right, rec)
    } else if balance < -1 {
        let right = store
            .get_right(node)
            .ok_or_else(|| TreeError::invariant("right-heavy node without a right child"))?;
        if balance_factor(store, right) > 0 {
            debug!("avl right-left case");
            rotate(store, right, Direction::Right, rec)?;
        }
        rotate(store, node, Direction::Left, rec)
    } else {
        Ok(node)
    }
}

impl<K: Clone + Debug> Balance<K> for Avl {
    // A single (or double) rotation absorbs the height gain, and once an
    // ancestor's height is unchanged nothing above it can change either.
    fn after_insert(
        store: &mut NodeStore<K>,
        node: Index,
        rec: &mut Recorder<K>,
    ) -> Result<(), TreeError> {
        let mut current = store.get_parent(node);
        while let Some(node) = current {
            let before = store.get_height(Some(node));
            update_height(store, node);
            if balance_factor(store, node).abs() > 1 {
                rebalance(store, node, rec)?;
                return Ok(());
            }
            if store.get_height(Some(node)) == before {
                return Ok(());
            }
            current = store.get_parent(node);
        }
        Ok(())
    }

    // Removal can unbalance every ancestor in turn, so the walk always reaches the root.
    fn after_remove(
        store: &mut NodeStore<K>,
        removal: Removal,
        rec: &mut Recorder<K>,
    ) -> Result<(), TreeError> {
        let mut current = removal.parent;
        while let Some(node) = current {
            update_height(store, node);
            let subtree = rebalance(store, node, rec)?;
            current = store.get_parent(subtree);
        }
        Ok(())
    }

    fn verify(store: &NodeStore<K>) -> Result<(), TreeError> {
        validate::check_avl(store).map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bst;
    use crate::event::Event;

    fn insert(store: &mut NodeStore<u32>, key: u32, rec: &mut Recorder<u32>) {
        if let Some(node) = bst::insert_placement(store, key, rec) {
            Avl::after_insert(store, node, rec).unwrap();
        }
    }

    fn delete(store: &mut NodeStore<u32>, key: u32, rec: &mut Recorder<u32>) {
        if let Some((_, removal)) = bst::delete_by_key(store, &key, rec).unwrap() {
            Avl::after_remove(store, removal, rec).unwrap();
        }
    }

    fn rotations(rec: Recorder<u32>) -> Vec<(u32, Direction)> {
        rec.into_events()
            .into_iter()
            .filter_map(|event| match event {
                Event::Rotate { axis, direction } => Some((axis, direction)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn right_right_case_rotates_left_once() {
        let mut store = NodeStore::new();
        let mut rec = Recorder::new(false);
        insert(&mut store, 10, &mut rec);
        insert(&mut store, 20, &mut rec);
        let mut rec = Recorder::new(true);
        insert(&mut store, 30, &mut rec);

        assert_eq!(rotations(rec), vec![(10, Direction::Left)]);
        assert_eq!(store.root.map(|root| *store.key(root)), Some(20));
        assert_eq!(store.get_height(store.root), 2);
        validate::check_avl(&store).unwrap();
    }

    #[test]
    fn left_right_case_rotates_twice() {
        let mut store = NodeStore::new();
        let mut rec = Recorder::new(false);
        insert(&mut store, 30, &mut rec);
        insert(&mut store, 10, &mut rec);
        let mut rec = Recorder::new(true);
        insert(&mut store, 20, &mut rec);

        assert_eq!(
            rotations(rec),
            vec![(10, Direction::Left), (30, Direction::Right)]
        );
        assert_eq!(store.root.map(|root| *store.key(root)), Some(20));
        validate::check_avl(&store).unwrap();
    }

    #[test]
    fn right_left_case_rotates_twice() {
        let mut store = NodeStore::new();
        let mut rec = Recorder::new(false);
        insert(&mut store, 10, &mut rec);
        insert(&mut store, 30, &mut rec);
        let mut rec = Recorder::new(true);
        insert(&mut store, 20, &mut rec);

        assert_eq!(
            rotations(rec),
            vec![(30, Direction::Right), (10, Direction::Left)]
        );
        assert_eq!(store.root.map(|root| *store.key(root)), Some(20));
    }

    #[test]
    fn deletion_cascades_to_the_root() {
        // Fibonacci-shaped tree: removing 12 unbalances 11, and fixing it
        // leaves the root unbalanced as well.
        let mut store = NodeStore::new();
        let mut rec = Recorder::new(false);
        for key in [8, 5, 11, 3, 7, 10, 12, 2, 4, 6, 9, 1] {
            insert(&mut store, key, &mut rec);
        }
        validate::check_avl(&store).unwrap();

        let mut rec = Recorder::new(true);
        delete(&mut store, 12, &mut rec);
        assert_eq!(rotations(rec).len(), 2);
        assert_eq!(store.root.map(|root| *store.key(root)), Some(5));
        validate::check_avl(&store).unwrap();
    }

    #[test]
    fn heights_stay_exact_through_mixed_operations() {
        let mut store = NodeStore::new();
        let mut rec = Recorder::new(false);
        for key in 1..=64 {
            insert(&mut store, key, &mut rec);
            validate::check_avl(&store).unwrap();
        }
        assert_eq!(store.get_height(store.root), 7);
        for key in (1..=64).step_by(3) {
            delete(&mut store, key, &mut rec);
            validate::check_avl(&store).unwrap();
        }
    }
}
