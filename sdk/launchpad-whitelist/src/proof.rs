//! Inclusion proofs over a [`MerkleTree`].

use tracing::trace;

use crate::error::{Result, WhitelistError};
use crate::hash::{Node, PairOrder};
use crate::instruction::RegisterArgs;
use crate::tree::MerkleTree;

impl MerkleTree {
    /// Sibling hashes from the leaf at `index` up to, not including, the root.
    pub fn proof(&self, index: usize) -> Result<Vec<Node>> {
        let leaf_count = self.leaf_count();
        if index >= leaf_count {
            return Err(WhitelistError::IndexOutOfRange { index, leaf_count });
        }

        let levels = self.levels();
        let mut siblings = Vec::with_capacity(self.depth());
        let mut current = index;

        for level in &levels[..levels.len() - 1] {
            // the lone last node of an odd level was paired with itself
            let sibling = level.get(current ^ 1).unwrap_or(&level[current]);
            siblings.push(*sibling);
            current /= 2;
        }

        trace!(index, len = siblings.len(), "generated whitelist proof");
        Ok(siblings)
    }

    pub fn leaf_proof(&self, index: usize) -> Result<LeafProof> {
        let siblings = self.proof(index)?;
        Ok(LeafProof {
            index,
            leaf: self.leaves()[index],
            siblings,
            order: self.order(),
        })
    }
}

/// A leaf together with everything needed to fold it up to a root.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LeafProof {
    pub index: usize,
    pub leaf: Node,
    pub siblings: Vec<Node>,
    pub order: PairOrder,
}

impl LeafProof {
    pub fn root(&self) -> Node {
        reconstruct_root(self.leaf, &self.siblings, self.index, self.order)
    }

    pub fn verify(&self, root: &Node) -> bool {
        self.root() == *root
    }

    /// Arguments of the Merkle `register` instruction for this participant.
    pub fn into_register_args(self) -> Result<RegisterArgs> {
        let index = u32::try_from(self.index).map_err(|_| {
            WhitelistError::Encoding(format!("index {} does not fit in u32", self.index))
        })?;
        Ok(RegisterArgs {
            index,
            proofs: self.siblings,
        })
    }
}

/// Folds `leaf` with `proof`, placing the running hash left on even positions
/// and right on odd ones.
pub fn reconstruct_root(leaf: Node, proof: &[Node], index: usize, order: PairOrder) -> Node {
    let mut computed = leaf;
    let mut current = index;

    for sibling in proof {
        computed = if current % 2 == 0 {
            order.combine(&computed, sibling)
        } else {
            order.combine(sibling, &computed)
        };
        current /= 2;
    }

    computed
}

/// The check the launchpad program runs on `register`: a sorted-pair fold
/// that needs no index.
pub fn verify_proof(proof: &[Node], root: &Node, leaf: &Node) -> bool {
    let computed = proof
        .iter()
        .fold(*leaf, |acc, sibling| PairOrder::Sorted.combine(&acc, sibling));
    computed == *root
}
