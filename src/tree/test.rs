use compare::{Compare, Natural};
use crate::error::Error;
use crate::key::{Identity, KeyOf};
use crate::node::{Color, Left, Link, Right, NIL};
use crate::{Map, Set};
use quickcheck::{quickcheck, Arbitrary, Gen, TestResult};
use simplelog::{Config, LevelFilter, TestLogger};
use std::collections::BTreeSet;
use super::Tree;

type IntTree = Tree<u32, Natural<u32>, Identity>;

fn init_logger() {
    let _ = TestLogger::init(LevelFilter::Trace, Config::default());
}

// Makes allocations on this thread fail once `n` more have succeeded.
fn fail_allocations_after(n: usize) { crate::node::FAIL_AFTER.with(|f| f.set(Some(n))); }

fn allocations_succeed() { crate::node::FAIL_AFTER.with(|f| f.set(None)); }

fn tree_of(keys: &[u32]) -> IntTree {
    let mut tree = Tree::new(compare::natural());
    for &key in keys { tree.insert(key).unwrap(); }
    tree
}

fn values<T: Clone, C, P>(tree: &Tree<T, C, P>) -> Vec<T> { tree.iter().cloned().collect() }

// Walks cursors from `begin` to `end`.
fn links<T, C, P>(tree: &Tree<T, C, P>) -> Vec<Link> {
    let mut links = vec![];
    let mut link = tree.begin();
    while link != tree.end() {
        links.push(link);
        link = tree.next(link);
    }
    links
}

fn nth<T, C, P>(tree: &Tree<T, C, P>, index: usize) -> Link {
    links(tree).get(index).cloned().unwrap_or(NIL)
}

// Returns the black height and the node count of the subtree at `link`, checking parent links
// throughout and, if `colors` is set, the coloring rules.
fn walk<T, C, P>(tree: &Tree<T, C, P>, link: Link, parent: Link, colors: bool) -> (usize, usize) {
    if link.is_nil() { return (1, 0); }

    let nodes = &tree.nodes;
    assert_eq!(nodes.parent(link), parent, "bad parent link at {:?}", link);

    let left = nodes.left(link);
    let right = nodes.right(link);

    if colors && nodes.is_red(link) {
        assert!(!nodes.is_red(left) && !nodes.is_red(right), "red {:?} has a red child", link);
    }

    let (left_height, left_count) = walk(tree, left, link, colors);
    let (right_height, right_count) = walk(tree, right, link, colors);

    if colors { assert_eq!(left_height, right_height, "black heights differ below {:?}", link); }

    let black = if nodes.is_red(link) { 0 } else { 1 };
    (left_height + black, left_count + right_count + 1)
}

fn check_links<T, C, P>(tree: &Tree<T, C, P>, colors: bool)
    where P: KeyOf<T>, C: Compare<P::Key> {

    if tree.root.is_nil() {
        assert_eq!(tree.leftmost, NIL);
        assert_eq!(tree.rightmost, NIL);
        assert_eq!(tree.len, 0);
        assert_eq!(tree.nodes.live_count(), 0);
        assert_eq!(tree.begin(), tree.end());
        return;
    }

    if colors { assert_eq!(tree.nodes.color(tree.root), Color::Black, "red root"); }

    let (_, count) = walk(tree, tree.root, NIL, colors);
    assert_eq!(count, tree.len);
    assert_eq!(tree.nodes.live_count(), tree.len);

    assert_eq!(tree.leftmost, tree.nodes.min(tree.root));
    assert_eq!(tree.rightmost, tree.nodes.max(tree.root));
    assert_eq!(tree.prev(tree.end()), tree.rightmost);

    let links = links(tree);
    assert_eq!(links.len(), tree.len);
    for pair in links.windows(2) {
        assert!(tree.cmp.compares_lt(tree.key(pair[0]), tree.key(pair[1])),
                "{:?} is not ordered before {:?}", pair[0], pair[1]);
        assert_eq!(tree.prev(pair[1]), pair[0]);
    }
}

fn check<T, C, P>(tree: &Tree<T, C, P>) where P: KeyOf<T>, C: Compare<P::Key> {
    check_links(tree, true);
}

/// An operation on a tree, mirrored on a `BTreeSet`.
#[derive(Clone, Debug)]
enum Op {
    /// Insert a key.
    Insert(u32),
    /// Insert a key, hinting at the cursor at index `n % (len + 1)`.
    InsertHint(usize, u32),
    /// Remove a key by lookup.
    Remove(u32),
    /// Erase through the cursor at index `n % len`.
    Erase(usize),
}

impl Arbitrary for Op {
    fn arbitrary(gen: &mut Gen) -> Op {
        // A narrow key space makes duplicates and successful removals common.
        let key = u32::from(u8::arbitrary(gen));

        match u8::arbitrary(gen) % 4 {
            0 => Op::Insert(key),
            1 => Op::InsertHint(usize::arbitrary(gen), key),
            2 => Op::Remove(key),
            _ => Op::Erase(usize::arbitrary(gen)),
        }
    }
}

impl Op {
    fn exec(self, tree: &mut IntTree, model: &mut BTreeSet<u32>) {
        match self {
            Op::Insert(key) => {
                let (link, inserted) = tree.insert(key).unwrap();
                assert_eq!(inserted, model.insert(key));
                assert_eq!(*tree.value(link), key);
            }
            Op::InsertHint(index, key) => {
                let hint = nth(tree, index % (tree.len() + 1));
                let link = tree.insert_hint(hint, key).unwrap();
                model.insert(key);
                assert_eq!(*tree.value(link), key);
            }
            Op::Remove(key) => {
                let link = tree.find(&key);
                if model.remove(&key) {
                    assert_eq!(tree.erase(link), Ok(key));
                } else {
                    assert!(link.is_nil());
                }
            }
            Op::Erase(index) => if !tree.is_empty() {
                let link = nth(tree, index % tree.len());
                let others: Vec<(Link, u32)> = links(tree).into_iter()
                    .filter(|&other| other != link)
                    .map(|other| (other, *tree.value(other)))
                    .collect();

                let key = tree.erase(link).unwrap();
                assert!(model.remove(&key));

                for (other, value) in others { assert_eq!(*tree.value(other), value); }
            },
        }
    }
}

#[test]
fn ops_preserve_invariants() {
    init_logger();

    fn test(ops: Vec<Op>) -> bool {
        let mut tree = Tree::new(compare::natural());
        let mut model = BTreeSet::new();

        for op in ops {
            op.exec(&mut tree, &mut model);
            check(&tree);
        }

        tree.iter().eq(model.iter())
    }

    quickcheck(test as fn(Vec<Op>) -> bool);
}

#[test]
fn erasing_everything_empties_the_tree() {
    init_logger();

    fn test(keys: Vec<u32>, picks: Vec<usize>) -> TestResult {
        if picks.is_empty() { return TestResult::discard(); }

        let mut tree = tree_of(&keys);
        let mut i = 0;

        while !tree.is_empty() {
            let link = nth(&tree, picks[i % picks.len()] % tree.len());
            tree.erase(link).unwrap();
            check(&tree);
            i += 1;
        }

        TestResult::from_bool(tree.root.is_nil() && tree.leftmost.is_nil()
            && tree.rightmost.is_nil() && tree.len() == 0)
    }

    quickcheck(test as fn(Vec<u32>, Vec<usize>) -> TestResult);
}

#[test]
fn bounds_agree_with_walk() {
    fn test(keys: Vec<u32>, key: u32) -> bool {
        let tree = tree_of(&keys);
        let links = links(&tree);

        let lower = links.iter().cloned().find(|&l| *tree.value(l) >= key).unwrap_or(NIL);
        let upper = links.iter().cloned().find(|&l| *tree.value(l) > key).unwrap_or(NIL);

        tree.lower_bound(&key) == lower && tree.upper_bound(&key) == upper
    }

    quickcheck(test as fn(Vec<u32>, u32) -> bool);
}

#[test]
fn scenario_balanced_insert() {
    init_logger();
    let tree = tree_of(&[50, 30, 70, 20, 40, 60, 80]);

    assert_eq!(values(&tree), [20, 30, 40, 50, 60, 70, 80]);
    assert_eq!(tree.nodes.color(tree.root), Color::Black);
    check(&tree);
}

#[test]
fn scenario_erase_minimum() {
    init_logger();
    let mut tree = tree_of(&[10, 20, 30]);

    let link = tree.find(&10);
    assert_eq!(tree.erase(link), Ok(10));
    assert_eq!(values(&tree), [20, 30]);
    check(&tree);
}

#[test]
fn scenario_find() {
    let tree = tree_of(&[5, 1, 9]);

    for key in &[1u32, 5, 9] { assert_eq!(tree.value(tree.find(key)), key); }
    assert_eq!(tree.find(&4), tree.end());
    assert_eq!(tree.find(&10), tree.end());
}

#[test]
fn scenario_equal_range() {
    let tree = tree_of(&[2, 4, 6]);

    for key in 0..8 {
        let (lower, upper) = tree.equal_range(&key);
        let count = tree.count(&key);
        assert!(count <= 1);

        if count == 1 {
            assert_eq!(*tree.value(lower), key);
            assert_eq!(tree.next(lower), upper);
        } else {
            assert_eq!(lower, upper);
        }
    }
}

#[test]
fn scenario_erase_whole_range() {
    init_logger();
    let mut tree = tree_of(&[3, 1, 4, 5, 9, 2, 6]);

    let (begin, end) = (tree.begin(), tree.end());
    assert_eq!(tree.erase_range(begin, end), Ok(7));
    assert!(tree.is_empty());
    check(&tree);

    tree.insert(8).unwrap();
    assert_eq!(values(&tree), [8]);
    check(&tree);
}

#[test]
fn duplicate_insert_returns_existing() {
    let mut tree: Tree<(u32, &str), Natural<u32>, crate::key::First> =
        Tree::new(compare::natural());

    let (first, inserted) = tree.insert((1, "a")).unwrap();
    assert!(inserted);

    let (again, inserted) = tree.insert((1, "b")).unwrap();
    assert!(!inserted);
    assert_eq!(again, first);
    assert_eq!(tree.len(), 1);
    assert_eq!(tree.value(first).1, "a");
}

#[test]
fn boundaries() {
    let mut tree = tree_of(&[]);
    assert_eq!(tree.begin(), tree.end());
    assert_eq!(tree.prev(tree.end()), tree.end());
    assert_eq!(tree.next(tree.end()), tree.end());

    for key in &[10, 20, 30] { tree.insert(*key).unwrap(); }
    assert!(tree.begin() != tree.end());
    assert_eq!(*tree.value(tree.prev(tree.end())), 30);
    assert_eq!(tree.prev(tree.begin()), tree.end());
    assert_eq!(tree.lower_bound(&0), tree.begin());
    assert_eq!(tree.upper_bound(&0), tree.begin());
    assert_eq!(tree.lower_bound(&31), tree.end());
    assert_eq!(tree.upper_bound(&30), tree.end());
}

#[test]
fn hinted_insert_at_every_position() {
    let mut tree = tree_of(&[10, 20, 30]);

    let hint = tree.find(&20);
    let link = tree.insert_hint(hint, 15).unwrap();
    assert_eq!(tree.next(link), hint);

    let begin = tree.begin();
    tree.insert_hint(begin, 5).unwrap();

    let end = tree.end();
    tree.insert_hint(end, 35).unwrap();

    // A wrong hint still inserts in order.
    let begin = tree.begin();
    tree.insert_hint(begin, 25).unwrap();

    // An equivalent key is not inserted again.
    let end = tree.end();
    assert_eq!(tree.insert_hint(end, 20), Ok(hint));

    assert_eq!(values(&tree), [5, 10, 15, 20, 25, 30, 35]);
    check(&tree);
}

#[test]
fn capacity_exceeded() {
    init_logger();
    let mut tree = tree_of(&[1, 2]);
    tree.set_max_len(2);

    assert_eq!(tree.insert(3), Err(Error::CapacityExceeded { max: 2 }));
    let end = tree.end();
    assert_eq!(tree.insert_hint(end, 3), Err(Error::CapacityExceeded { max: 2 }));

    // Duplicates are found without allocating.
    assert!(tree.insert(1).is_ok());

    assert_eq!(values(&tree), [1, 2]);
    check(&tree);

    tree.set_max_len(usize::MAX);
    assert!(tree.max_len() < usize::MAX);
    assert!(tree.insert(3).unwrap().1);
}

#[test]
fn erase_end_is_refused() {
    let mut tree = tree_of(&[1]);
    let end = tree.end();

    assert_eq!(tree.erase(end), Err(Error::InvalidCursor));
    assert_eq!(tree.len(), 1);
    check(&tree);
}

#[test]
fn erase_through_erased_link_is_refused() {
    init_logger();
    let mut tree = tree_of(&(0..16).collect::<Vec<_>>());
    let link = tree.find(&8);

    assert_eq!(tree.erase(link), Ok(8));
    assert_eq!(tree.erase(link), Err(Error::InvalidCursor));

    let end = tree.end();
    assert_eq!(tree.erase_range(link, end), Err(Error::InvalidCursor));

    assert_eq!(tree.len(), 15);
    assert_eq!(values(&tree), (0..16).filter(|&k| k != 8).collect::<Vec<_>>());
    check(&tree);
}

#[test]
fn erase_keeps_other_links() {
    let mut tree = tree_of(&(0..32).collect::<Vec<_>>());
    let before = links(&tree);

    tree.erase(before[tree.len() / 2]).unwrap();
    tree.erase(before[0]).unwrap();

    for (i, &link) in before.iter().enumerate() {
        if i != 0 && i != 16 { assert_eq!(*tree.value(link), i as u32); }
    }
    check(&tree);
}

#[test]
fn freed_slots_are_reused() {
    let mut tree = tree_of(&[1, 2, 3]);
    let link = tree.find(&2);

    tree.erase(link).unwrap();
    let (again, _) = tree.insert(7).unwrap();

    assert_eq!(again, link);
    assert_eq!(tree.nodes.live_count(), 3);
    check(&tree);
}

#[test]
fn copy_preserves_shape() {
    fn same_shape(a: &IntTree, la: Link, b: &IntTree, lb: Link) -> bool {
        if la.is_nil() || lb.is_nil() { return la.is_nil() && lb.is_nil(); }

        a.value(la) == b.value(lb)
            && a.nodes.color(la) == b.nodes.color(lb)
            && same_shape(a, a.nodes.left(la), b, b.nodes.left(lb))
            && same_shape(a, a.nodes.right(la), b, b.nodes.right(lb))
    }

    fn test(keys: Vec<u32>) -> bool {
        let tree = tree_of(&keys);
        let copy = tree.try_clone().unwrap();

        check(&copy);
        copy.len() == tree.len() && copy.max_len() == tree.max_len()
            && same_shape(&tree, tree.root, &copy, copy.root)
    }

    quickcheck(test as fn(Vec<u32>) -> bool);
}

#[test]
fn failed_copy_frees_partial_copy() {
    init_logger();
    let tree = tree_of(&(0..32).collect::<Vec<_>>());

    for n in [0, 1, 5, 16, 31] {
        fail_allocations_after(n);
        assert!(matches!(tree.try_clone(), Err(Error::Alloc(_))));

        let mut copy: IntTree = Tree::new(compare::natural());
        fail_allocations_after(n);
        assert!(matches!(copy.copy_subtree(&tree, tree.root, NIL), Err(Error::Alloc(_))));
        allocations_succeed();

        assert_eq!(copy.nodes.live_count(), 0);
        check(&copy);
    }

    let copy = tree.try_clone().unwrap();
    assert_eq!(values(&copy), values(&tree));
    check(&copy);
}

#[test]
fn failed_insert_leaves_tree_unchanged() {
    init_logger();
    let mut tree = tree_of(&[2, 4, 6]);
    let (root, leftmost, rightmost) = (tree.root, tree.leftmost, tree.rightmost);

    fail_allocations_after(0);
    assert!(matches!(tree.insert(1), Err(Error::Alloc(_))));
    assert!(matches!(tree.insert(7), Err(Error::Alloc(_))));
    let end = tree.end();
    assert!(matches!(tree.insert_hint(end, 8), Err(Error::Alloc(_))));
    assert_eq!(tree.insert(2).map(|(_, inserted)| inserted), Ok(false));
    allocations_succeed();

    assert_eq!(tree.len(), 3);
    assert_eq!(values(&tree), [2, 4, 6]);
    assert_eq!((tree.root, tree.leftmost, tree.rightmost), (root, leftmost, rightmost));
    check(&tree);

    // A free slot is available, so no storage needs reserving.
    let link = tree.find(&4);
    tree.erase(link).unwrap();
    fail_allocations_after(0);
    assert!(matches!(tree.insert(5), Err(Error::Alloc(_))));
    allocations_succeed();

    assert_eq!(values(&tree), [2, 6]);
    check(&tree);
}

#[test]
fn erase_partial_range() {
    init_logger();
    let mut tree = tree_of(&(0..10).collect::<Vec<_>>());
    let kept = tree.find(&8);

    let (first, last) = (tree.find(&3), tree.find(&7));
    assert_eq!(tree.erase_range(first, last), Ok(4));
    assert_eq!(values(&tree), [0, 1, 2, 7, 8, 9]);
    assert_eq!(*tree.value(kept), 8);
    check(&tree);

    let end = tree.end();
    let first = tree.find(&8);
    assert_eq!(tree.erase_range(first, end), Ok(2));
    assert_eq!(values(&tree), [0, 1, 2, 7]);
    check(&tree);

    let first = tree.find(&1);
    assert_eq!(tree.erase_range(first, first), Ok(0));
    assert_eq!(tree.len(), 4);
}

#[test]
fn erase_unreachable_range_is_refused() {
    init_logger();
    let mut tree = tree_of(&[10, 20, 30, 40]);

    let (first, last) = (tree.find(&30), tree.find(&10));
    assert_eq!(tree.erase_range(first, last), Err(Error::InvalidCursor));
    assert_eq!(values(&tree), [10, 20, 30, 40]);
    check(&tree);
}

#[test]
fn rotations_preserve_order() {
    let mut tree = tree_of(&(1..16).collect::<Vec<_>>());
    let expected = values(&tree);

    let root = tree.root;
    tree.rotate::<Left>(root);
    assert_eq!(tree.root, tree.nodes.parent(root));
    assert_eq!(values(&tree), expected);
    check_links(&tree, false);

    tree.rotate::<Right>(tree.root);
    assert_eq!(tree.root, root);
    assert_eq!(values(&tree), expected);
    check(&tree);

    // The leftmost node is a left child, so its parent can rotate right.
    let inner = tree.nodes.parent(tree.leftmost);
    tree.rotate::<Right>(inner);
    assert_eq!(values(&tree), expected);
    check_links(&tree, false);
}

#[test]
fn spans() {
    let tree = tree_of(&[1, 2, 3, 4, 5]);
    let (first, last) = (tree.find(&2), tree.find(&5));

    assert_eq!(tree.span(first, last).cloned().collect::<Vec<_>>(), [2, 3, 4]);
    assert_eq!(tree.span(first, last).rev().cloned().collect::<Vec<_>>(), [4, 3, 2]);
    assert_eq!(tree.span(first, tree.end()).count(), 4);
    assert_eq!(tree.span(last, last).count(), 0);
    assert_eq!(tree.span(tree.end(), tree.end()).count(), 0);

    // Reversed cursors run on to the maximum.
    let four = tree.find(&4);
    assert_eq!(tree.span(four, first).cloned().collect::<Vec<_>>(), [4, 5]);
}

#[test]
fn map_operations_keep_invariants() {
    init_logger();

    fn test(entries: Vec<(u8, u16)>, removals: Vec<u8>) -> bool {
        let mut map = Map::new();

        for (k, v) in entries {
            *map.entry(k).or_insert(0).unwrap() += u32::from(v);
            check(map.tree());
        }

        for k in removals {
            map.remove(&k);
            check(map.tree());
        }

        let copy = map.clone();
        check(copy.tree());
        copy == map
    }

    quickcheck(test as fn(Vec<(u8, u16)>, Vec<u8>) -> bool);
}

#[test]
fn set_operations_keep_invariants() {
    fn test(items: Vec<u8>, removals: Vec<u8>) -> bool {
        let mut set: Set<u8> = items.iter().cloned().collect();
        check(set.tree());

        for item in removals {
            set.take(&item);
            check(set.tree());
        }

        let model: BTreeSet<u8> = items.into_iter().collect();
        set.iter().all(|item| model.contains(item))
    }

    quickcheck(test as fn(Vec<u8>, Vec<u8>) -> bool);
}
