//! Balancing strategy selection.

use std::fmt;

use generational_arena::Index;
use serde::{Deserialize, Serialize};

use crate::bst::Removal;
use crate::error::TreeError;
use crate::event::Recorder;
use crate::node::NodeStore;

/// Which invariant a tree maintains on top of plain BST ordering.
#[derive(PartialEq, Eq, Copy, Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Unbalanced binary search tree.
    None,
    Avl,
    #[default]
    #[serde(alias = "rb")]
    RedBlack,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Strategy::None => "bst",
            Strategy::Avl => "avl",
            Strategy::RedBlack => "red-black",
        };
        f.write_str(name)
    }
}

/// Post-mutation repair hooks. The BST core does the ordered placement or
/// removal and hands the touched location to one of these implementations.
pub(crate) trait Balance<K> {
    /// Called with the freshly attached leaf.
    fn after_insert(
        store: &mut NodeStore<K>,
        node: Index,
        rec: &mut Recorder<K>,
    ) -> Result<(), TreeError>;

    /// Called once the removed node has been unlinked and freed.
    fn after_remove(
        store: &mut NodeStore<K>,
        removal: Removal,
        rec: &mut Recorder<K>,
    ) -> Result<(), TreeError>;

    /// Full check of the invariants this strategy is responsible for. BST
    /// ordering is checked separately for every strategy.
    fn verify(store: &NodeStore<K>) -> Result<(), TreeError>;
}

/// No rebalancing at all.
pub(crate) struct Plain;

impl<K> Balance<K> for Plain {
    fn after_insert(
        _store: &mut NodeStore<K>,
        _node: Index,
        _rec: &mut Recorder<K>,
    ) -> Result<(), TreeError> {
        Ok(())
    }

    fn after_remove(
        _store: &mut NodeStore<K>,
        _removal: Removal,
        _rec: &mut Recorder<K>,
    ) -> Result<(), TreeError> {
        Ok(())
    }

    fn verify(_store: &NodeStore<K>) -> Result<(), TreeError> {
        Ok(())
    }
}
