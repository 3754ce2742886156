use std::collections::BTreeSet;

use balanced_search_tree::{Order, Strategy as Balancing, Tree, TreeConfig};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Insert(u16),
    Delete(u16),
}

fn balancing() -> impl Strategy<Value = Balancing> {
    prop_oneof![
        Just(Balancing::None),
        Just(Balancing::Avl),
        Just(Balancing::RedBlack),
    ]
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (0u16..128).prop_map(Op::Insert),
        2 => (0u16..128).prop_map(Op::Delete),
    ]
}

fn checked(strategy: Balancing) -> Tree<u16> {
    Tree::with_config(TreeConfig::new(strategy).verify(true))
}

fn in_order(tree: &Tree<u16>) -> Vec<u16> {
    tree.iter().copied().collect()
}

proptest! {
    #[test]
    fn invariants_hold_after_every_operation(
        strategy in balancing(),
        ops in prop::collection::vec(op(), 1..200)
    ) {
        let mut tree = checked(strategy);
        let mut model = BTreeSet::new();

        for op in ops {
            let before = tree.len();
            match op {
                Op::Insert(key) => {
                    let outcome = tree.insert(key).unwrap();
                    prop_assert_eq!(outcome.inserted, model.insert(key));
                    let expected = if outcome.inserted { before + 1 } else { before };
                    prop_assert_eq!(tree.len(), expected);
                }
                Op::Delete(key) => {
                    let outcome = tree.delete(&key).unwrap();
                    prop_assert_eq!(outcome.deleted, model.remove(&key));
                    let expected = if outcome.deleted { before - 1 } else { before };
                    prop_assert_eq!(tree.len(), expected);
                }
            }

            prop_assert!(tree.validate().is_ok(), "{:?}", tree.validate());
            let keys = in_order(&tree);
            prop_assert!(keys.windows(2).all(|pair| pair[0] < pair[1]));
            prop_assert_eq!(keys, model.iter().copied().collect::<Vec<_>>());
        }
    }

    #[test]
    fn insert_then_delete_round_trips(
        strategy in balancing(),
        keys in prop::collection::btree_set(0u16..512, 0..64),
        probe in 0u16..512
    ) {
        prop_assume!(!keys.contains(&probe));
        let mut tree = checked(strategy);
        tree.insert_all(keys.iter().copied()).unwrap();
        let before = in_order(&tree);

        prop_assert!(tree.insert(probe).unwrap().inserted);
        prop_assert!(tree.delete(&probe).unwrap().deleted);
        prop_assert_eq!(in_order(&tree), before);
        prop_assert_eq!(tree.len(), keys.len());
    }

    #[test]
    fn repeated_insert_and_absent_delete_change_nothing(
        strategy in balancing(),
        keys in prop::collection::vec(0u16..256, 1..64),
        absent in 256u16..512
    ) {
        let mut tree = checked(strategy);
        tree.insert_all(keys.iter().copied()).unwrap();
        let snapshot = (in_order(&tree), tree.to_string());

        for key in &keys {
            let outcome = tree.insert(*key).unwrap();
            prop_assert!(!outcome.inserted);
            prop_assert!(outcome.events.iter().all(|event| !event.is_rotate() && !event.is_recolor()));
        }
        prop_assert!(!tree.delete(&absent).unwrap().deleted);
        prop_assert_eq!((in_order(&tree), tree.to_string()), snapshot);
    }

    #[test]
    fn balanced_heights_stay_logarithmic(
        keys in prop::collection::vec(any::<u16>(), 1..300)
    ) {
        let mut avl = checked(Balancing::Avl);
        let mut rb = checked(Balancing::RedBlack);
        avl.insert_all(keys.iter().copied()).unwrap();
        rb.insert_all(keys.iter().copied()).unwrap();
        prop_assert_eq!(avl.len(), rb.len());
        let n = avl.len() as f64;

        // 1.44 log2(n + 2) for AVL, 2 log2(n + 1) for red-black
        prop_assert!(avl.height() as f64 <= 1.45 * (n + 2.0).log2());
        prop_assert!(rb.height() as f64 <= 2.0 * (n + 1.0).log2());
    }

    #[test]
    fn every_order_visits_every_key_once(
        strategy in balancing(),
        keys in prop::collection::btree_set(0u16..1024, 1..100)
    ) {
        let mut tree = checked(strategy);
        tree.insert_all(keys.iter().copied()).unwrap();
        for order in [Order::Pre, Order::In, Order::Post, Order::Level] {
            let mut seen: Vec<u16> = tree.traverse(order).unwrap().copied().collect();
            seen.sort_unstable();
            prop_assert_eq!(&seen, &keys.iter().copied().collect::<Vec<_>>());
        }
        prop_assert_eq!(tree.min().unwrap(), keys.iter().next().unwrap());
        prop_assert_eq!(tree.max().unwrap(), keys.iter().next_back().unwrap());
    }
}
