//! Launchpad whitelist SDK.
//!
//! Off-chain half of the launchpad's registration whitelist. It produces the
//! values the on-chain program stores and recomputes, byte for byte:
//!
//! - Merkle scheme: the root committed in the sale configuration and the
//!   per-participant proof embedded in `register`.
//! - Signature scheme: the authority's Ed25519 signature over the whitelist
//!   message and the native verification instruction that accompanies it.

pub mod config;
pub mod error;
pub mod hash;
pub mod instruction;
pub mod leaf;
pub mod proof;
pub mod signature;
pub mod tree;

use anchor_lang::prelude::Pubkey;

pub use config::{WhitelistConfig, WhitelistScheme};
pub use error::{Result, WhitelistError};
pub use hash::{Node, PairOrder};
pub use instruction::{RegisterArgs, RegisterWithSignatureArgs};
pub use leaf::{entries_from_addresses, CanonicalEncode, WhitelistEntry, WhitelistMessage};
pub use proof::{reconstruct_root, verify_proof, LeafProof};
pub use signature::{
    new_ed25519_instruction, verify_whitelist_signature, SignedRegistration, WhitelistSigner,
};
pub use tree::MerkleTree;

/// Builds the whitelist tree the sale commits to. Entry `i` must carry
/// index `i`.
pub fn build_whitelist_tree(entries: &[WhitelistEntry]) -> Result<MerkleTree> {
    WhitelistConfig::default().build_tree(entries)
}

pub fn get_proof(tree: &MerkleTree, index: usize) -> Result<Vec<Node>> {
    tree.proof(index)
}

pub fn hash_whitelist_message(message: &WhitelistMessage) -> Result<Node> {
    message.leaf_hash()
}

pub fn sign_message(signer: &WhitelistSigner, hash: &Node) -> [u8; 64] {
    signer.sign_message(hash)
}

/// Signs a whitelist message with a 64-byte Solana keypair.
pub fn sign_whitelist(
    keypair: &[u8],
    launchpad: Pubkey,
    address: Pubkey,
    whitelist_id: u64,
) -> Result<[u8; 64]> {
    WhitelistSigner::from_keypair_bytes(keypair)?.sign_whitelist(launchpad, address, whitelist_id)
}

pub(crate) fn check_positions(entries: &[WhitelistEntry]) -> Result<()> {
    for (position, entry) in entries.iter().enumerate() {
        if usize::try_from(entry.index).ok() != Some(position) {
            return Err(WhitelistError::Encoding(format!(
                "entry at position {position} carries index {}",
                entry.index
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn whitelist(n: usize) -> Vec<WhitelistEntry> {
        let addresses: Vec<Pubkey> = (0..n).map(|_| Pubkey::new_unique()).collect();
        entries_from_addresses(&addresses).unwrap()
    }

    #[test]
    fn three_entries_prove_with_two_siblings() {
        let entries = whitelist(3);
        let tree = build_whitelist_tree(&entries).unwrap();

        let proof = get_proof(&tree, 0).unwrap();
        assert_eq!(proof.len(), 2);

        let leaf = entries[0].leaf_hash().unwrap();
        assert_eq!(reconstruct_root(leaf, &proof, 0, tree.order()), tree.root());
        assert!(verify_proof(&proof, &tree.root(), &leaf));
    }

    #[test]
    fn single_entry_root_is_leaf() {
        let entries = whitelist(1);
        let tree = build_whitelist_tree(&entries).unwrap();

        assert_eq!(tree.root(), entries[0].leaf_hash().unwrap());
        assert!(get_proof(&tree, 0).unwrap().is_empty());
    }

    #[test]
    fn proof_past_leaf_count_is_out_of_range() {
        let tree = build_whitelist_tree(&whitelist(3)).unwrap();
        assert_eq!(
            get_proof(&tree, 3).unwrap_err(),
            WhitelistError::IndexOutOfRange {
                index: 3,
                leaf_count: 3
            }
        );
    }

    #[test]
    fn empty_whitelist_is_rejected() {
        assert_eq!(build_whitelist_tree(&[]).unwrap_err(), WhitelistError::EmptyWhitelist);
    }

    #[test]
    fn misplaced_index_is_rejected() {
        let mut entries = whitelist(3);
        entries.swap(0, 1);
        assert!(matches!(build_whitelist_tree(&entries), Err(WhitelistError::Encoding(_))));
    }

    #[test]
    fn signature_scheme_round_trip() {
        let signer = WhitelistSigner::from_secret_bytes(&[3u8; 32]).unwrap();
        let mut keypair = [3u8; 32].to_vec();
        keypair.extend_from_slice(signer.pubkey().as_ref());

        let launchpad = Pubkey::new_unique();
        let address = Pubkey::new_unique();
        let signature = sign_whitelist(&keypair, launchpad, address, 42).unwrap();

        let hash = hash_whitelist_message(&WhitelistMessage::new(launchpad, address, 42)).unwrap();
        assert_eq!(sign_message(&signer, &hash), signature);
        verify_whitelist_signature(&signer.pubkey(), &hash, &signature).unwrap();

        let altered = hash_whitelist_message(&WhitelistMessage::new(launchpad, address, 41)).unwrap();
        assert!(verify_whitelist_signature(&signer.pubkey(), &altered, &signature).is_err());
    }

    #[test]
    fn sign_whitelist_rejects_malformed_keypair() {
        let err = sign_whitelist(&[0u8; 10], Pubkey::new_unique(), Pubkey::new_unique(), 1)
            .unwrap_err();
        assert!(matches!(err, WhitelistError::InvalidKeyMaterial(_)));
    }
}
