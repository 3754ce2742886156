//! The tree facade.

use std::fmt::{self, Debug};

use generational_arena::Index;
use tracing::{debug, trace};

use crate::avl::Avl;
use crate::bst::{self, Removal};
use crate::config::TreeConfig;
use crate::error::TreeError;
use crate::event::{Event, Recorder};
use crate::node::{Color, NodeStore};
use crate::rb::RedBlack;
use crate::strategy::{Balance, Plain, Strategy};
use crate::traversal::{Order, Traversal};
use crate::validate;

/// Result of [`Tree::insert`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inserted<K> {
    /// `false` if the key was already present; the tree is then unchanged.
    pub inserted: bool,
    pub events: Vec<Event<K>>,
}

impl<K> Inserted<K> {
    /// Treats a duplicate key as an error.
    pub fn into_result(self) -> Result<Vec<Event<K>>, TreeError> {
        if self.inserted {
            Ok(self.events)
        } else {
            Err(TreeError::DuplicateKey)
        }
    }
}

/// Result of [`Tree::delete`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deleted<K> {
    /// `false` if the key was absent; the tree is then unchanged.
    pub deleted: bool,
    pub events: Vec<Event<K>>,
}

impl<K> Deleted<K> {
    /// Treats a missing key as an error.
    pub fn into_result(self) -> Result<Vec<Event<K>>, TreeError> {
        if self.deleted {
            Ok(self.events)
        } else {
            Err(TreeError::KeyNotFound)
        }
    }
}

/// Result of [`Tree::search`]. The events are the comparison path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Found<K> {
    pub found: bool,
    pub events: Vec<Event<K>>,
}

impl<K> Found<K> {
    /// Treats a missing key as an error.
    pub fn into_result(self) -> Result<Vec<Event<K>>, TreeError> {
        if self.found {
            Ok(self.events)
        } else {
            Err(TreeError::KeyNotFound)
        }
    }
}

/// An ordered set of keys balanced by one of the [`Strategy`] variants.
///
/// Mutating operations return the structural events they performed so a
/// caller can replay them, e.g. to animate the rebalancing.
#[derive(Debug)]
pub struct Tree<K> {
    store: NodeStore<K>,
    config: TreeConfig,
}

impl<K: Ord + Clone + Debug> Default for Tree<K> {
    fn default() -> Self {
        Tree::with_config(TreeConfig::default())
    }
}

impl<K: Ord + Clone + Debug> Tree<K> {
    /// Create a new empty tree
    pub fn new(strategy: Strategy) -> Self {
        Tree::with_config(TreeConfig::new(strategy))
    }

    pub fn with_config(config: TreeConfig) -> Self {
        Tree {
            store: NodeStore::new(),
            config,
        }
    }

    pub fn strategy(&self) -> Strategy {
        self.config.strategy
    }

    pub fn config(&self) -> &TreeConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.root.is_none()
    }

    /// Key held by the root node.
    pub fn root(&self) -> Option<&K> {
        self.store.root.map(|root| self.store.key(root))
    }

    /// Inserts `key`, rebalancing as the strategy requires. Inserting a key
    /// that is already present changes nothing and reports `inserted: false`.
    ///
    /// The only error is [`TreeError::InvariantViolation`], which means the
    /// engine itself is broken.
    pub fn insert(&mut self, key: K) -> Result<Inserted<K>, TreeError> {
        trace!(?key, strategy = %self.config.strategy, "insert");
        let mut rec = self.recorder();
        let inserted = match bst::insert_placement(&mut self.store, key, &mut rec) {
            Some(node) => {
                self.after_insert(node, &mut rec)?;
                self.verify()?;
                true
            }
            None => false,
        };
        trace!(inserted, events = rec.len(), len = self.len(), "insert done");
        Ok(Inserted {
            inserted,
            events: rec.into_events(),
        })
    }

    /// Inserts every key, returning how many were new.
    pub fn insert_all<I>(&mut self, keys: I) -> Result<usize, TreeError>
    where
        I: IntoIterator<Item = K>,
    {
        let mut count = 0;
        for key in keys {
            if self.insert(key)?.inserted {
                count += 1;
            }
        }
        Ok(count)
    }

    /// Deletes `key`. Deleting an absent key changes nothing and reports
    /// `deleted: false`.
    pub fn delete(&mut self, key: &K) -> Result<Deleted<K>, TreeError> {
        let mut rec = self.recorder();
        let deleted = self.remove_with(key, &mut rec)?.is_some();
        Ok(Deleted {
            deleted,
            events: rec.into_events(),
        })
    }

    /// Like [`Tree::delete`] but hands back the removed key instead of the trace.
    pub fn remove(&mut self, key: &K) -> Result<Option<K>, TreeError> {
        let mut rec = Recorder::new(false);
        self.remove_with(key, &mut rec)
    }

    fn remove_with(&mut self, key: &K, rec: &mut Recorder<K>) -> Result<Option<K>, TreeError> {
        trace!(?key, strategy = %self.config.strategy, "delete");
        let Some((removed, removal)) = bst::delete_by_key(&mut self.store, key, rec)? else {
            trace!(events = rec.len(), "delete missed");
            return Ok(None);
        };
        self.after_remove(removal, rec)?;
        self.verify()?;
        trace!(events = rec.len(), len = self.len(), "delete done");
        Ok(Some(removed))
    }

    /// Looks `key` up, recording the comparison path.
    pub fn search(&self, key: &K) -> Found<K> {
        let mut rec = self.recorder();
        let found = bst::search(&self.store, key, &mut rec).is_some();
        trace!(?key, found, events = rec.len(), "search");
        Found {
            found,
            events: rec.into_events(),
        }
    }

    pub fn contains(&self, key: &K) -> bool {
        self.find(key).is_some()
    }

    pub fn min(&self) -> Result<&K, TreeError> {
        let root = self.store.root.ok_or(TreeError::EmptyTree)?;
        Ok(self.store.key(bst::find_min(&self.store, root)))
    }

    pub fn max(&self) -> Result<&K, TreeError> {
        let root = self.store.root.ok_or(TreeError::EmptyTree)?;
        Ok(self.store.key(bst::find_max(&self.store, root)))
    }

    /// The next larger key after `key`, which must be in the tree.
    pub fn successor(&self, key: &K) -> Option<&K> {
        let node = self.find(key)?;
        bst::successor(&self.store, node).map(|next| self.store.key(next))
    }

    /// The next smaller key before `key`, which must be in the tree.
    pub fn predecessor(&self, key: &K) -> Option<&K> {
        let node = self.find(key)?;
        bst::predecessor(&self.store, node).map(|prev| self.store.key(prev))
    }

    /// Walks the tree in the given order. Fails on an empty tree; use
    /// [`Tree::iter`] when an empty walk is acceptable.
    pub fn traverse(&self, order: Order) -> Result<Traversal<'_, K>, TreeError> {
        if self.is_empty() {
            return Err(TreeError::EmptyTree);
        }
        Ok(Traversal::new(&self.store, order))
    }

    /// In-order iterator over the keys.
    pub fn iter(&self) -> Traversal<'_, K> {
        Traversal::new(&self.store, Order::In)
    }

    /// Number of nodes on the longest root-to-leaf path, 0 when empty.
    pub fn height(&self) -> usize {
        match self.config.strategy {
            Strategy::Avl => self.store.get_height(self.store.root),
            Strategy::None | Strategy::RedBlack => validate::depth(&self.store),
        }
    }

    pub fn clear(&mut self) {
        debug!(len = self.len(), "clearing tree");
        self.store.clear();
    }

    /// Runs every invariant check for this tree's strategy.
    pub fn validate(&self) -> Result<(), TreeError> {
        validate::check_bst(&self.store)?;
        match self.config.strategy {
            Strategy::None => Plain::verify(&self.store),
            Strategy::Avl => Avl::verify(&self.store),
            Strategy::RedBlack => RedBlack::verify(&self.store),
        }
    }

    fn verify(&self) -> Result<(), TreeError> {
        if self.config.verify {
            self.validate()
        } else {
            Ok(())
        }
    }

    fn find(&self, key: &K) -> Option<Index> {
        bst::search(&self.store, key, &mut Recorder::new(false))
    }

    fn recorder(&self) -> Recorder<K> {
        Recorder::new(self.config.record_events)
    }

    fn after_insert(&mut self, node: Index, rec: &mut Recorder<K>) -> Result<(), TreeError> {
        match self.config.strategy {
            Strategy::None => Plain::after_insert(&mut self.store, node, rec),
            Strategy::Avl => Avl::after_insert(&mut self.store, node, rec),
            Strategy::RedBlack => RedBlack::after_insert(&mut self.store, node, rec),
        }
    }

    fn after_remove(&mut self, removal: Removal, rec: &mut Recorder<K>) -> Result<(), TreeError> {
        match self.config.strategy {
            Strategy::None => Plain::after_remove(&mut self.store, removal, rec),
            Strategy::Avl => Avl::after_remove(&mut self.store, removal, rec),
            Strategy::RedBlack => RedBlack::after_remove(&mut self.store, removal, rec),
        }
    }
}

impl<'a, K: Ord + Clone + Debug> IntoIterator for &'a Tree<K> {
    type Item = &'a K;
    type IntoIter = Traversal<'a, K>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

// Sideways dump, one node per line:
//
// 20 black
// ├─ 10 black
// └─ 30 black
//    └─ 40 red
impl<K: Debug> fmt::Display for Tree<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.store.root {
            Some(root) => self.fmt_node(f, root, ""),
            None => write!(f, "∅"),
        }
    }
}

impl<K: Debug> Tree<K> {
    fn fmt_node(&self, f: &mut fmt::Formatter<'_>, node: Index, tab: &str) -> fmt::Result {
        let store = &self.store;
        write!(f, "{:?}", store.key(node))?;
        match self.config.strategy {
            Strategy::None => {}
            Strategy::Avl => write!(f, " h={}", store.get_height(Some(node)))?,
            Strategy::RedBlack => match store.get_color(Some(node)) {
                Color::Red => write!(f, " red")?,
                Color::Black => write!(f, " black")?,
            },
        }

        let left = store.get_left(node);
        let right = store.get_right(node);
        for (child, is_last) in [(left, right.is_none()), (right, true)] {
            let Some(child) = child else {
                continue;
            };
            let branch = if is_last { "└─" } else { "├─" };
            let child_tab = format!("{tab}{}  ", if is_last { " " } else { "│" });
            write!(f, "\n{tab}{branch} ")?;
            self.fmt_node(f, child, &child_tab)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::Direction;

    fn build(strategy: Strategy, keys: &[i32]) -> Tree<i32> {
        let mut tree = Tree::with_config(TreeConfig::new(strategy).verify(true));
        tree.insert_all(keys.iter().copied()).unwrap();
        tree
    }

    #[test]
    fn insert_reports_duplicates_without_mutation() {
        let mut tree = build(Strategy::RedBlack, &[5, 3, 8]);
        let outcome = tree.insert(3).unwrap();
        assert!(!outcome.inserted);
        assert!(outcome.events.iter().all(|event| event.is_compare()
            || matches!(event, Event::Descend { .. })));
        assert_eq!(tree.len(), 3);
        assert_eq!(outcome.into_result(), Err(TreeError::DuplicateKey));
    }

    #[test]
    fn delete_and_search_misses() {
        let mut tree = build(Strategy::Avl, &[2, 1, 3]);
        let outcome = tree.delete(&7).unwrap();
        assert!(!outcome.deleted);
        assert_eq!(outcome.into_result(), Err(TreeError::KeyNotFound));
        assert_eq!(tree.search(&7).into_result(), Err(TreeError::KeyNotFound));
        assert!(tree.search(&3).found);
        assert_eq!(tree.len(), 3);
    }

    #[test]
    fn empty_tree_errors() {
        let tree: Tree<i32> = Tree::new(Strategy::None);
        assert_eq!(tree.min(), Err(TreeError::EmptyTree));
        assert_eq!(tree.max(), Err(TreeError::EmptyTree));
        assert!(matches!(
            tree.traverse(Order::Level),
            Err(TreeError::EmptyTree)
        ));
        assert_eq!(tree.iter().next(), None);
        assert_eq!(tree.height(), 0);
        assert_eq!(tree.root(), None);
    }

    #[test]
    fn min_max_and_neighbours() {
        let tree = build(Strategy::RedBlack, &[50, 30, 70, 20, 40, 60, 80]);
        assert_eq!(tree.min(), Ok(&20));
        assert_eq!(tree.max(), Ok(&80));
        assert_eq!(tree.successor(&40), Some(&50));
        assert_eq!(tree.predecessor(&60), Some(&50));
        assert_eq!(tree.successor(&80), None);
        assert_eq!(tree.successor(&45), None);
    }

    #[test]
    fn remove_hands_back_the_key() {
        let mut tree = build(Strategy::Avl, &[4, 2, 6, 1, 3, 5, 7]);
        assert_eq!(tree.remove(&4).unwrap(), Some(4));
        assert_eq!(tree.remove(&4).unwrap(), None);
        assert_eq!(tree.root(), Some(&5));
        assert_eq!(tree.iter().copied().collect::<Vec<_>>(), vec![1, 2, 3, 5, 6, 7]);
    }

    #[test]
    fn recording_can_be_switched_off() {
        let mut tree = Tree::with_config(TreeConfig::new(Strategy::Avl).record_events(false));
        let outcome = tree.insert(1).unwrap();
        assert!(outcome.inserted);
        assert!(outcome.events.is_empty());
        assert!(tree.search(&1).events.is_empty());
    }

    #[test]
    fn avl_height_matches_measured_height() {
        let tree = build(Strategy::Avl, &(1..=100).collect::<Vec<_>>());
        assert_eq!(tree.height(), validate::depth(&tree.store));
        assert_eq!(tree.height(), 7);
    }

    #[test]
    fn plain_tree_degenerates_on_sorted_input() {
        let tree = build(Strategy::None, &[1, 2, 3, 4, 5]);
        assert_eq!(tree.height(), 5);
        assert_eq!(tree.root(), Some(&1));
    }

    #[test]
    fn red_black_root_insert_is_recolored() {
        let mut tree: Tree<i32> = Tree::new(Strategy::RedBlack);
        let events = tree.insert(1).unwrap().into_result().unwrap();
        assert_eq!(
            events,
            vec![
                Event::Relink { node: 1 },
                Event::Recolor {
                    node: 1,
                    color: Color::Black
                },
            ]
        );
    }

    #[test]
    fn avl_rotation_is_reported() {
        let mut tree = build(Strategy::Avl, &[10, 20]);
        let events = tree.insert(30).unwrap().events;
        assert!(events.contains(&Event::Rotate {
            axis: 10,
            direction: Direction::Left
        }));
    }

    #[test]
    fn clear_empties_the_tree() {
        let mut tree = build(Strategy::RedBlack, &[1, 2, 3]);
        tree.clear();
        assert!(tree.is_empty());
        assert_eq!(tree.len(), 0);
        assert!(tree.insert(2).unwrap().inserted);
    }

    #[test]
    fn display_draws_the_shape() {
        let tree = build(Strategy::RedBlack, &[20, 10, 30, 40]);
        assert_eq!(
            tree.to_string(),
            "20 black\n├─ 10 black\n└─ 30 black\n   └─ 40 red"
        );

        let tree = build(Strategy::Avl, &[2, 1]);
        assert_eq!(tree.to_string(), "2 h=2\n└─ 1 h=1");

        let empty: Tree<i32> = Tree::new(Strategy::None);
        assert_eq!(empty.to_string(), "∅");
    }

    #[test]
    fn into_iterator_walks_in_order() {
        let tree = build(Strategy::None, &[3, 1, 2]);
        let mut keys = Vec::new();
        for key in &tree {
            keys.push(*key);
        }
        assert_eq!(keys, vec![1, 2, 3]);
    }
}
