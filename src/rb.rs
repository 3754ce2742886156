//! Red-black balancing.
//!
//! The root and every absent child are black, a red node never has a red child,
//! and every path from a node down to an absent child passes the same number of
//! black nodes. Insertion repairs a red-red conflict by recoloring or rotating
//! around the grandparent; removal of a black node leaves a "double black"
//! deficiency which is pushed up or resolved by looking at the sibling.

use std::fmt::Debug;

use generational_arena::Index;
use tracing::debug;

use crate::bst::Removal;
use crate::error::TreeError;
use crate::event::{Direction, Event, Recorder};
use crate::node::{Color, NodeStore, NodeType};
use crate::strategy::Balance;
use crate::validate;

pub(crate) struct RedBlack;

// Recolors a node, recording the change only when the color actually flips.
fn paint<K: Clone>(store: &mut NodeStore<K>, node: Index, color: Color, rec: &mut Recorder<K>) {
    if store.get_color(Some(node)) != color {
        store.set_color(node, color);
        rec.record(|| Event::Recolor {
            node: store.key(node).clone(),
            color,
        });
    }
}

// Which side of its parent a node hangs from.
fn side<K>(store: &NodeStore<K>, node: Index) -> Result<Direction, TreeError> {
    match store.get_node_type(node) {
        NodeType::LeftChild => Ok(Direction::Left),
        NodeType::RightChild => Ok(Direction::Right),
        NodeType::Orphan => Err(TreeError::invariant("expected a child node, found the root")),
    }
}

fn missing_sibling() -> TreeError {
    TreeError::invariant("double black node has no sibling")
}

// Rebalances the tree after inserting a new (red) node
fn insert_fixup<K: Clone>(
    store: &mut NodeStore<K>,
    mut node: Index,
    rec: &mut Recorder<K>,
) -> Result<(), TreeError> {
    while store.get_color(store.get_parent(node)) == Color::Red {
        // Parent is RED so it exists, and as it is red it isn't the root
        let mut parent = store
            .get_parent(node)
            .ok_or_else(|| TreeError::invariant("red parent vanished"))?;
        let grandparent = store
            .get_parent(parent)
            .ok_or_else(|| TreeError::invariant("red node at the root"))?;
        let parent_side = side(store, parent)?;
        let uncle = store.get_child(grandparent, parent_side.opposite());

        if let Some(uncle) = uncle.filter(|&uncle| store.get_color(Some(uncle)) == Color::Red) {
            // Uncle is red so we can push the conflict up to the grandparent
            debug!("red-black insert: red uncle, recoloring");
            paint(store, parent, Color::Black, rec);
            paint(store, uncle, Color::Black, rec);
            paint(store, grandparent, Color::Red, rec);
            node = grandparent;
            continue;
        }

        // Uncle is black we will need to do some rotations
        if store.get_child(parent, parent_side.opposite()) == Some(node) {
            // Triangle: rotate the parent so node and parent form a line
            debug!("red-black insert: triangle case");
            store.rotate(parent, parent_side, rec)?;
            node = parent;
            parent = store
                .get_parent(node)
                .ok_or_else(|| TreeError::invariant("rotated node lost its parent"))?;
        }

        // Line: rotate the grandparent away from the conflict
        debug!("red-black insert: line case");
        paint(store, parent, Color::Black, rec);
        paint(store, grandparent, Color::Red, rec);
        store.rotate(grandparent, parent_side.opposite(), rec)?;
    }

    if let Some(root) = store.root {
        paint(store, root, Color::Black, rec);
    }
    Ok(())
}

// Fix the double black left behind by unlinking a black node. `node` is the
// replacement child (possibly absent), `parent` is where it hangs.
fn delete_fixup<K: Clone>(
    store: &mut NodeStore<K>,
    removal: Removal,
    rec: &mut Recorder<K>,
) -> Result<(), TreeError> {
    if removal.color == Color::Red {
        return Ok(());
    }

    let mut node = removal.child;
    let mut parent = removal.parent;
    let mut node_side = match removal.node_type {
        NodeType::RightChild => Direction::Right,
        _ => Direction::Left,
    };

    while let Some(p) = parent {
        if store.get_color(node) == Color::Red {
            break;
        }

        let mut sibling = store
            .get_child(p, node_side.opposite())
            .ok_or_else(missing_sibling)?;

        if store.get_color(Some(sibling)) == Color::Red {
            // Case 1: red sibling, turn it into one of the black sibling cases
            debug!("red-black delete: case 1");
            paint(store, sibling, Color::Black, rec);
            paint(store, p, Color::Red, rec);
            store.rotate(p, node_side, rec)?;
            sibling = store
                .get_child(p, node_side.opposite())
                .ok_or_else(missing_sibling)?;
        }

        let near = store.get_child(sibling, node_side);
        let far = store.get_child(sibling, node_side.opposite());

        if store.get_color(near) == Color::Black && store.get_color(far) == Color::Black {
            // Case 2: both nephews black, move the deficiency up
            debug!("red-black delete: case 2");
            paint(store, sibling, Color::Red, rec);
            node = Some(p);
            parent = store.get_parent(p);
            if parent.is_some() {
                node_side = side(store, p)?;
            }
            continue;
        }

        if store.get_color(far) == Color::Black {
            // Case 3: near nephew red, rotate it into the far position
            debug!("red-black delete: case 3");
            let near = near.ok_or_else(|| TreeError::invariant("red nephew vanished"))?;
            paint(store, near, Color::Black, rec);
            paint(store, sibling, Color::Red, rec);
            store.rotate(sibling, node_side.opposite(), rec)?;
            sibling = store
                .get_child(p, node_side.opposite())
                .ok_or_else(missing_sibling)?;
        }

        // Case 4: far nephew red, one rotation at the parent resolves it
        debug!("red-black delete: case 4");
        let far = store
            .get_child(sibling, node_side.opposite())
            .ok_or_else(|| TreeError::invariant("far nephew missing in case 4"))?;
        let parent_color = store.get_color(Some(p));
        paint(store, sibling, parent_color, rec);
        paint(store, p, Color::Black, rec);
        paint(store, far, Color::Black, rec);
        store.rotate(p, node_side, rec)?;
        node = store.root;
        break;
    }

    if let Some(node) = node {
        paint(store, node, Color::Black, rec);
    }
    Ok(())
}

impl<K: Clone + Debug> Balance<K> for RedBlack {
    fn after_insert(
        store: &mut NodeStore<K>,
        node: Index,
        rec: &mut Recorder<K>,
    ) -> Result<(), TreeError> {
        insert_fixup(store, node, rec)
    }

    fn after_remove(
        store: &mut NodeStore<K>,
        removal: Removal,
        rec: &mut Recorder<K>,
    ) -> Result<(), TreeError> {
        delete_fixup(store, removal, rec)
    }

    fn verify(store: &NodeStore<K>) -> Result<(), TreeError> {
        validate::check_red_black(store).map(|_| ())
    }
}
