//! Binary search tree engine with pluggable balancing.
//!
//! A [`Tree`] keeps an ordered set of keys using one of three strategies: a
//! plain unbalanced BST, an AVL tree or a red-black tree. Nodes live in a
//! generational arena; child links own, parent links are plain indices used
//! only to walk back up during fix-up.
//!
//! Every insert, delete and search returns the structural events it performed
//! (comparisons, descents, rotations, recolors and relinks) in execution
//! order, so a visualizer can replay each step.
//!
//! ```
//! use balanced_search_tree::{Event, Order, Strategy, Tree};
//!
//! let mut tree = Tree::new(Strategy::Avl);
//! tree.insert(10).unwrap();
//! tree.insert(20).unwrap();
//! let outcome = tree.insert(30).unwrap();
//! assert!(outcome.events.iter().any(Event::is_rotate));
//! assert_eq!(tree.root(), Some(&20));
//!
//! let level: Vec<i32> = tree.traverse(Order::Level).unwrap().copied().collect();
//! assert_eq!(level, vec![20, 10, 30]);
//! ```

mod avl;
mod bst;
mod config;
mod error;
mod event;
mod node;
mod rb;
mod strategy;
mod traversal;
mod tree;
mod validate;

pub use config::TreeConfig;
pub use error::TreeError;
pub use event::{Direction, Event};
pub use node::Color;
pub use strategy::Strategy;
pub use traversal::{Order, Traversal};
pub use tree::{Deleted, Found, Inserted, Tree};
