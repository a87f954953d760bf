use avl_tree::AvlTree;

use std::collections::BTreeSet;
use std::fmt::Debug;
use std::ops::ControlFlow;

use crate::{init_logging, Op};

/// Applies a set of operations to a tree and a set.
/// This way we can ensure that after a random smattering of inserts
/// and deletes we have the same keys in both.
fn do_ops<'a, K>(ops: &'a [Op<K>], tree: &mut AvlTree<'a, K>, set: &mut BTreeSet<K>)
where
    K: Ord + Clone + Debug,
{
    for op in ops {
        match op {
            Op::Insert(k) => {
                if set.insert(k.clone()) {
                    tree.insert(k).unwrap();
                }
            }
            Op::Remove(k) => {
                assert_eq!(tree.remove(k).cloned(), set.take(k));
            }
            Op::Iter => {
                assert!(tree.iter().eq(set.iter()));
            }
        }
        assert!(tree.height() <= max_height(set.len()));
    }
}

/// The tallest an AVL tree with `n` elements can be.
fn max_height(n: usize) -> usize {
    (1.4405 * ((n + 2) as f64).log2() - 0.3277 + 1e-9).floor() as usize
}

/// Inserts every distinct element of `xs` once.
fn tree_of<K: Ord>(xs: &[K]) -> AvlTree<'_, K> {
    let mut tree = AvlTree::ordered();
    for x in xs {
        if tree.find(x).is_none() {
            tree.insert(x).unwrap();
        }
    }
    tree
}

fn collect<K: Clone>(tree: &AvlTree<'_, K>) -> Vec<K> {
    let mut out = Vec::new();
    let result = tree.for_each(|x| {
        out.push(x.clone());
        ControlFlow::<()>::Continue(())
    });
    assert_eq!(result, ControlFlow::Continue(()));
    out
}

quickcheck::quickcheck! {
    fn fuzz_multiple_operations_i8(ops: Vec<Op<i8>>) -> bool {
        init_logging();
        let mut tree = AvlTree::ordered();
        let mut set = BTreeSet::new();

        do_ops(&ops, &mut tree, &mut set);
        tree.count() == set.len() && set.iter().all(|key| tree.find(key) == Some(key))
    }

    fn contains(xs: Vec<i8>) -> bool {
        let tree = tree_of(&xs);

        xs.iter().all(|x| tree.find(x) == Some(x))
    }

    fn contains_not(xs: Vec<i8>, nots: Vec<i8>) -> bool {
        let tree = tree_of(&xs);
        let added: BTreeSet<_> = xs.iter().copied().collect();
        let nots: BTreeSet<_> = nots.into_iter().collect();
        let mut nots = nots.difference(&added);

        nots.all(|x| tree.find(x).is_none())
    }

    fn with_deletions(xs: Vec<i8>, deletes: Vec<i8>) -> bool {
        let mut tree = tree_of(&xs);
        for delete in &deletes {
            tree.remove(delete);
        }

        let mut still_present = xs.clone();
        still_present.retain(|x| !deletes.contains(x));

        deletes.iter().all(|x| tree.find(x).is_none())
            && still_present.iter().all(|x| tree.find(x).is_some())
    }

    fn for_each_is_sorted_for_any_insertion_order(xs: Vec<i32>) -> bool {
        let tree = tree_of(&xs);
        let mut expected = xs.clone();
        expected.sort_unstable();
        expected.dedup();

        collect(&tree) == expected && tree.iter().copied().eq(expected.iter().copied())
    }

    fn count_after_inserts_and_removes(xs: Vec<u16>, removes: Vec<u16>) -> bool {
        let unique: BTreeSet<_> = xs.into_iter().collect();
        let mut tree = AvlTree::ordered();
        for x in &unique {
            tree.insert(x).unwrap();
        }

        let mut removed = 0;
        for r in &removes {
            if tree.remove(r).is_some() {
                removed += 1;
            }
        }

        tree.count() == unique.len() - removed
    }

    fn height_is_logarithmic(xs: Vec<u16>) -> bool {
        let tree = tree_of(&xs);

        tree.height() <= max_height(tree.count())
    }

    fn first_and_last_are_extremes(xs: Vec<i16>) -> bool {
        let tree = tree_of(&xs);

        tree.first() == xs.iter().min() && tree.last() == xs.iter().max()
    }
}

#[test]
fn insert_then_find_then_remove_round_trip() {
    let keys = [41, 7, 99, -3];
    let mut tree = AvlTree::ordered();

    for key in &keys {
        tree.insert(key).unwrap();
        let found = tree.find(key).unwrap();
        assert!(std::ptr::eq(found, key));
    }
    for key in &keys {
        assert!(std::ptr::eq(tree.remove(key).unwrap(), key));
        assert_eq!(tree.find(key), None);
    }
    assert!(tree.is_empty());
}

#[test]
fn rotation_scenarios_keep_height_two() {
    for keys in [[1, 2, 3], [3, 1, 2], [3, 2, 1], [1, 3, 2]] {
        let tree = tree_of(&keys);

        assert_eq!(tree.height(), 2);
        assert_eq!(collect(&tree), [1, 2, 3]);
    }
}

#[test]
fn removing_node_with_two_children() {
    let keys = [2, 1, 4, 3, 5];
    let mut tree = tree_of(&keys);

    assert_eq!(tree.remove(&2), Some(&2));

    assert_eq!(tree.find(&2), None);
    for key in &[1, 4, 3, 5] {
        assert_eq!(tree.find(key), Some(key));
    }
    assert_eq!(tree.height(), 3);
    assert_eq!(collect(&tree), [1, 3, 4, 5]);
}

#[test]
fn sequential_inserts_stay_shallow() {
    init_logging();
    let keys: Vec<u32> = (0..10_000).collect();
    let mut tree = tree_of(&keys);

    assert_eq!(tree.count(), keys.len());
    // 14 levels is the least that can hold 10,000 elements.
    assert!(tree.height() >= 14);
    assert!(tree.height() <= max_height(tree.count()));

    for key in keys.iter().filter(|k| *k % 2 == 0) {
        assert_eq!(tree.remove(key), Some(key));
    }

    assert_eq!(tree.count(), keys.len() / 2);
    assert!(tree.height() <= max_height(tree.count()));
    assert!(tree.iter().all(|k| k % 2 == 1));
}

#[test]
fn for_each_propagates_first_break() {
    let keys: Vec<i32> = (1..=20).collect();
    let tree = tree_of(&keys);
    let mut visited = 0;

    let result = tree.for_each(|k| {
        visited += 1;
        if *k == 13 {
            ControlFlow::Break("thirteen")
        } else {
            ControlFlow::Continue(())
        }
    });

    assert_eq!(result, ControlFlow::Break("thirteen"));
    assert_eq!(visited, 13);
}

#[test]
fn create_and_destroy_empty_tree() {
    let tree: AvlTree<'_, u8> = AvlTree::default();

    assert!(tree.is_empty());
    assert_eq!(tree.height(), 0);
    assert_eq!(tree.count(), 0);
    drop(tree);
}
