use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::hash::PairOrder;
use crate::leaf::WhitelistEntry;
use crate::tree::MerkleTree;

/// Whitelist strategy of a deployed launchpad program version.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WhitelistScheme {
    /// Root committed in the sale, `{index, proofs}` on register.
    #[default]
    Merkle,
    /// Authority key committed in the sale, `{whitelist_id, signature}` on register.
    Signature,
}

/// Per-deployment whitelist settings.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WhitelistConfig {
    pub scheme: WhitelistScheme,
    pub pair_order: PairOrder,
}

impl WhitelistConfig {
    pub fn build_tree(&self, entries: &[WhitelistEntry]) -> Result<MerkleTree> {
        crate::check_positions(entries)?;
        MerkleTree::from_entries(entries, self.pair_order)
    }
}
