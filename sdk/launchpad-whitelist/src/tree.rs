//! Whitelist Merkle tree.
//!
//! Levels are built bottom-up. A level with an odd node count pairs its last
//! node with itself, so every node below the root has a sibling and a proof
//! for `n > 1` leaves always holds `ceil(log2(n))` hashes.

use tracing::debug;

use crate::error::{Result, WhitelistError};
use crate::hash::{Node, PairOrder};
use crate::leaf::CanonicalEncode;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MerkleTree {
    /// `levels[0]` holds the leaves, the last level holds only the root.
    levels: Vec<Vec<Node>>,
    order: PairOrder,
}

impl MerkleTree {
    pub fn new(leaves: Vec<Node>) -> Result<Self> {
        Self::with_order(leaves, PairOrder::default())
    }

    pub fn with_order(leaves: Vec<Node>, order: PairOrder) -> Result<Self> {
        if leaves.is_empty() {
            return Err(WhitelistError::EmptyWhitelist);
        }

        let leaf_count = leaves.len();
        let mut levels = Vec::new();
        let mut current = leaves;

        while current.len() > 1 {
            let parents = parent_level(&current, order);
            levels.push(current);
            current = parents;
        }
        levels.push(current);

        let tree = Self { levels, order };
        debug!(
            leaf_count,
            depth = tree.depth(),
            ?order,
            root = %hex::encode(&tree.root()[..4]),
            "built whitelist merkle tree"
        );

        Ok(tree)
    }

    /// Hashes each entry's canonical encoding and builds over the results, in
    /// the given order.
    pub fn from_entries<E: CanonicalEncode>(entries: &[E], order: PairOrder) -> Result<Self> {
        let leaves = entries
            .iter()
            .map(|entry| entry.leaf_hash())
            .collect::<Result<Vec<_>>>()?;
        Self::with_order(leaves, order)
    }

    pub fn root(&self) -> Node {
        self.levels[self.levels.len() - 1][0]
    }

    pub fn levels(&self) -> &[Vec<Node>] {
        &self.levels
    }

    pub fn leaves(&self) -> &[Node] {
        &self.levels[0]
    }

    pub fn leaf_count(&self) -> usize {
        self.levels[0].len()
    }

    /// Number of levels below the root, which is also the proof length.
    pub fn depth(&self) -> usize {
        self.levels.len() - 1
    }

    pub fn order(&self) -> PairOrder {
        self.order
    }
}

fn parent_level(level: &[Node], order: PairOrder) -> Vec<Node> {
    level
        .chunks(2)
        .map(|pair| {
            let left = &pair[0];
            let right = pair.get(1).unwrap_or(left);
            order.combine(left, right)
        })
        .collect()
}
