//! Keccak-256 primitives shared by the Merkle and signature schemes.
//!
//! This is the pre-standard Keccak padding exposed by the Solana `keccak`
//! syscall wrapper, not SHA3-256.

use anchor_lang::solana_program::keccak;
use serde::{Deserialize, Serialize};

/// A 32-byte tree node: a leaf hash, an inner hash or the root.
pub type Node = [u8; 32];

/// How a parent hash orders its two children.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PairOrder {
    /// `keccak(min(a, b) || max(a, b))`, what the launchpad program folds with.
    #[default]
    Sorted,
    /// `keccak(left || right)` by tree position.
    Positional,
}

impl PairOrder {
    /// Parent of `left` (even position) and `right` (odd position).
    pub fn combine(self, left: &Node, right: &Node) -> Node {
        match self {
            PairOrder::Sorted if right < left => hash_pair(right, left),
            PairOrder::Sorted | PairOrder::Positional => hash_pair(left, right),
        }
    }
}

pub fn hash_leaf(bytes: &[u8]) -> Node {
    keccak::hash(bytes).to_bytes()
}

pub fn hash_pair(left: &Node, right: &Node) -> Node {
    keccak::hashv(&[left, right]).to_bytes()
}
