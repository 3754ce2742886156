//! Depth-first and breadth-first walks over a tree.
//!
//! Each walk is a lazy iterator over borrowed keys. The depth-first orders keep
//! an explicit stack bounded by the tree height; level order keeps a queue
//! bounded by the widest level. None of them touch the tree.

use std::collections::VecDeque;
use std::fmt;

use generational_arena::Index;
use serde::{Deserialize, Serialize};

use crate::node::NodeStore;

#[derive(PartialEq, Eq, Copy, Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Order {
    Pre,
    In,
    Post,
    Level,
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Order::Pre => "pre-order",
            Order::In => "in-order",
            Order::Post => "post-order",
            Order::Level => "level-order",
        };
        f.write_str(name)
    }
}

enum Walk {
    Pre(Vec<Index>),
    In {
        stack: Vec<Index>,
        current: Option<Index>,
    },
    // The flag marks nodes whose children have already been scheduled.
    Post(Vec<(Index, bool)>),
    Level(VecDeque<Index>),
}

/// Iterator returned by `Tree::traverse` and `Tree::iter`.
pub struct Traversal<'a, K> {
    store: &'a NodeStore<K>,
    walk: Walk,
}

impl<'a, K> Traversal<'a, K> {
    pub(crate) fn new(store: &'a NodeStore<K>, order: Order) -> Self {
        let root = store.root;
        let walk = match order {
            Order::Pre => Walk::Pre(root.into_iter().collect()),
            Order::In => Walk::In {
                stack: Vec::new(),
                current: root,
            },
            Order::Post => Walk::Post(root.into_iter().map(|root| (root, false)).collect()),
            Order::Level => Walk::Level(root.into_iter().collect()),
        };
        Traversal { store, walk }
    }

    fn next_index(&mut self) -> Option<Index> {
        let store = self.store;
        match &mut self.walk {
            Walk::Pre(stack) => {
                let node = stack.pop()?;
                stack.extend(store.get_right(node));
                stack.extend(store.get_left(node));
                Some(node)
            }
            Walk::In { stack, current } => {
                while let Some(node) = *current {
                    stack.push(node);
                    *current = store.get_left(node);
                }
                let node = stack.pop()?;
                *current = store.get_right(node);
                Some(node)
            }
            Walk::Post(stack) => loop {
                let (node, expanded) = stack.pop()?;
                if expanded {
                    return Some(node);
                }
                stack.push((node, true));
                stack.extend(store.get_right(node).map(|right| (right, false)));
                stack.extend(store.get_left(node).map(|left| (left, false)));
            },
            Walk::Level(queue) => {
                let node = queue.pop_front()?;
                queue.extend(store.get_left(node));
                queue.extend(store.get_right(node));
                Some(node)
            }
        }
    }
}

impl<'a, K> Iterator for Traversal<'a, K> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.next_index()?;
        Some(self.store.key(node))
    }
}

impl<'a, K> fmt::Debug for Traversal<'a, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let order = match self.walk {
            Walk::Pre(_) => Order::Pre,
            Walk::In { .. } => Order::In,
            Walk::Post(_) => Order::Post,
            Walk::Level(_) => Order::Level,
        };
        f.debug_struct("Traversal").field("order", &order).finish()
    }
}
