//! Binary trees and a channel-based in-order walk for comparing them in lockstep.

use futures::Stream;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::debug;

/// Number of values in a [`BinaryTree::shuffled`] tree.
const SHUFFLED_LEN: i64 = 10;

/// Largest `k` magnitude [`BinaryTree::shuffled`] accepts.
pub const MAX_SCALE: i64 = i64::MAX / SHUFFLED_LEN;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub left: Option<Box<Node>>,
    pub value: i64,
    pub right: Option<Box<Node>>,
}

impl Node {
    pub fn leaf(value: i64) -> Self {
        Self {
            left: None,
            value,
            right: None,
        }
    }

    pub fn new(left: Option<Node>, value: i64, right: Option<Node>) -> Self {
        Self {
            left: left.map(Box::new),
            value,
            right: right.map(Box::new),
        }
    }
}

/// A binary tree owned through its root. Shape is up to the caller; the
/// insertion helpers build a binary search tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BinaryTree {
    root: Option<Box<Node>>,
}

impl BinaryTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_root(root: Node) -> Self {
        Self {
            root: Some(Box::new(root)),
        }
    }

    /// Random-shaped search tree holding `k, 2k, ..., 10k`, shuffled with a
    /// seeded generator so the same `(k, seed)` always gives the same shape.
    ///
    /// Returns `None` when `10k` does not fit in an `i64`; see [`MAX_SCALE`].
    pub fn shuffled(k: i64, seed: u64) -> Option<Self> {
        let mut values = (1..=SHUFFLED_LEN)
            .map(|i| i.checked_mul(k))
            .collect::<Option<Vec<i64>>>()?;
        let mut rng = StdRng::seed_from_u64(seed);
        values.shuffle(&mut rng);
        Some(values.into_iter().collect())
    }

    /// Search-tree insert: smaller values go left, everything else right.
    pub fn insert(&mut self, value: i64) {
        fn insert_at(slot: &mut Option<Box<Node>>, value: i64) {
            match slot {
                Some(node) if value < node.value => insert_at(&mut node.left, value),
                Some(node) => insert_at(&mut node.right, value),
                None => *slot = Some(Box::new(Node::leaf(value))),
            }
        }
        insert_at(&mut self.root, value);
    }

    pub fn root(&self) -> Option<&Node> {
        self.root.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn iter(&self) -> InOrder<'_> {
        let mut iter = InOrder { stack: Vec::new() };
        iter.push_left(self.root.as_deref());
        iter
    }
}

impl FromIterator<i64> for BinaryTree {
    fn from_iter<I: IntoIterator<Item = i64>>(iter: I) -> Self {
        let mut tree = BinaryTree::new();
        for value in iter {
            tree.insert(value);
        }
        tree
    }
}

/// Left subtree, node, right subtree. Uses an explicit stack so deep trees
/// don't recurse.
pub struct InOrder<'a> {
    stack: Vec<&'a Node>,
}

impl<'a> InOrder<'a> {
    fn push_left(&mut self, mut node: Option<&'a Node>) {
        while let Some(n) = node {
            self.stack.push(n);
            node = n.left.as_deref();
        }
    }
}

impl Iterator for InOrder<'_> {
    type Item = i64;

    fn next(&mut self) -> Option<i64> {
        let node = self.stack.pop()?;
        self.push_left(node.right.as_deref());
        Some(node.value)
    }
}

/// Receiving end of a [`walk`]. Yields each value once, then `None` forever.
pub struct TreeWalk {
    rx: mpsc::Receiver<i64>,
}

impl TreeWalk {
    pub async fn next(&mut self) -> Option<i64> {
        self.rx.recv().await
    }

    pub fn into_stream(self) -> impl Stream<Item = i64> {
        futures::stream::unfold(self, |mut walk| async move {
            walk.next().await.map(|value| (value, walk))
        })
    }

    pub async fn collect(mut self) -> Vec<i64> {
        let mut values = Vec::new();
        while let Some(value) = self.next().await {
            values.push(value);
        }
        values
    }
}

/// Spawn a producer that sends `tree`'s values in-order and closes the channel
/// when done. The channel holds one value, so the producer runs at most one
/// step ahead of the reader. Dropping the `TreeWalk` stops the producer.
///
/// Must be called from within a tokio runtime.
pub fn walk(tree: Arc<BinaryTree>) -> TreeWalk {
    let (tx, rx) = mpsc::channel(1);

    tokio::spawn(async move {
        for value in tree.iter() {
            if tx.send(value).await.is_err() {
                debug!("Tree walk receiver dropped, stopping early");
                return;
            }
        }
    });

    TreeWalk { rx }
}

/// True iff both trees hold the same in-order sequence. The two walks run
/// concurrently; the first mismatch or length difference ends the comparison.
pub async fn same_tree(left: Arc<BinaryTree>, right: Arc<BinaryTree>) -> bool {
    let mut left = walk(left);
    let mut right = walk(right);

    loop {
        match (left.next().await, right.next().await) {
            (Some(a), Some(b)) if a == b => continue,
            (None, None) => return true,
            _ => return false,
        }
    }
}
