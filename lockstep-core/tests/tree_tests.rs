// Tests for the lockstep tree walker

use lockstep_core::tree::{BinaryTree, Node, same_tree, walk};
use std::sync::Arc;

fn tree(values: &[i64]) -> Arc<BinaryTree> {
    Arc::new(values.iter().copied().collect())
}

#[tokio::test]
async fn test_same_values_inserted_in_different_orders() {
    assert!(same_tree(tree(&[5, 3, 8, 1]), tree(&[1, 3, 5, 8])).await);
}

#[tokio::test]
async fn test_shuffled_trees_same_k_match_for_any_seed() {
    for seed in 0..16 {
        let a = Arc::new(BinaryTree::shuffled(4, seed).unwrap());
        let b = Arc::new(BinaryTree::shuffled(4, seed + 100).unwrap());
        assert!(same_tree(a, b).await, "seed {}", seed);
    }
}

#[tokio::test]
async fn test_different_k_never_match() {
    for k in 2..6 {
        let a = Arc::new(BinaryTree::shuffled(1, 9).unwrap());
        let b = Arc::new(BinaryTree::shuffled(k, 9).unwrap());
        assert!(!same_tree(a, b).await, "k {}", k);
    }
}

#[tokio::test]
async fn test_prefix_is_not_equal() {
    assert!(!same_tree(tree(&[1, 2, 3]), tree(&[1, 2])).await);
    assert!(!same_tree(tree(&[1, 2]), tree(&[1, 2, 3])).await);
}

#[tokio::test]
async fn test_empty_against_non_empty() {
    assert!(!same_tree(tree(&[]), tree(&[1])).await);
    assert!(!same_tree(tree(&[1]), tree(&[])).await);
    assert!(same_tree(tree(&[]), tree(&[])).await);
}

#[tokio::test]
async fn test_duplicates_count() {
    assert!(same_tree(tree(&[2, 2, 1]), tree(&[1, 2, 2])).await);
    assert!(!same_tree(tree(&[2, 2, 1]), tree(&[1, 1, 2])).await);
}

#[tokio::test]
async fn test_compares_shape_order_not_sorted_values() {
    // Same multiset, different in-order sequence.
    let a = Arc::new(BinaryTree::from_root(Node::new(
        Some(Node::leaf(2)),
        1,
        Some(Node::leaf(3)),
    )));
    let b = tree(&[1, 2, 3]);
    assert!(!same_tree(a, b).await);
}

#[tokio::test]
async fn test_walk_is_single_pass() {
    let mut values = walk(tree(&[3, 1, 2]));
    assert_eq!(values.next().await, Some(1));
    assert_eq!(values.next().await, Some(2));
    assert_eq!(values.next().await, Some(3));
    assert_eq!(values.next().await, None);
    assert_eq!(values.next().await, None);
}

#[tokio::test]
async fn test_dropping_walk_early_is_fine() {
    let big: Arc<BinaryTree> = Arc::new((0..1_000).collect());
    let mut values = walk(big.clone());
    assert_eq!(values.next().await, Some(0));
    drop(values);

    assert_eq!(walk(big).collect().await.len(), 1_000);
}
