//! Canonical byte layouts of whitelist entries.
//!
//! Entries are Borsh-serialized in field order into a fixed scratch buffer
//! that is larger than any valid entry; the leaf hash covers the written span
//! only, never the trailing scratch bytes.

use anchor_lang::prelude::*;

use crate::error::{Result, WhitelistError};
use crate::hash::{hash_leaf, Node};

/// A value with a fixed canonical encoding that both the SDK and the
/// launchpad program hash.
pub trait CanonicalEncode: AnchorSerialize {
    /// Size of the scratch buffer the entry is serialized into.
    const SCRATCH_LEN: usize;

    fn encode(&self) -> Result<Vec<u8>> {
        let mut scratch = vec![0u8; Self::SCRATCH_LEN];
        let remaining = {
            let mut cursor: &mut [u8] = &mut scratch;
            self.serialize(&mut cursor)
                .map_err(|err| WhitelistError::Encoding(err.to_string()))?;
            cursor.len()
        };
        scratch.truncate(Self::SCRATCH_LEN - remaining);
        Ok(scratch)
    }

    fn leaf_hash(&self) -> Result<Node> {
        Ok(hash_leaf(&self.encode()?))
    }
}

/// One participant of a Merkle whitelist. `index` is the entry's position in
/// the ordered whitelist.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct WhitelistEntry {
    pub index: u32,
    pub address: Pubkey,
}

impl WhitelistEntry {
    pub const LEN: usize = 4 + 32;

    pub fn new(index: u32, address: Pubkey) -> Self {
        Self { index, address }
    }

    /// Builds an entry from unchecked input, e.g. a position in a host list
    /// and a raw key read from a file.
    pub fn try_new(index: usize, address: &[u8]) -> Result<Self> {
        let index = u32::try_from(index)
            .map_err(|_| WhitelistError::Encoding(format!("index {index} does not fit in u32")))?;
        Ok(Self {
            index,
            address: pubkey_from_slice(address, "address")?,
        })
    }
}

impl CanonicalEncode for WhitelistEntry {
    const SCRATCH_LEN: usize = 40;
}

/// Message attested by the whitelist authority in the signature scheme.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct WhitelistMessage {
    pub launchpad: Pubkey,
    pub address: Pubkey,
    pub whitelist_id: u64,
}

impl WhitelistMessage {
    pub const LEN: usize = 32 + 32 + 8;

    pub fn new(launchpad: Pubkey, address: Pubkey, whitelist_id: u64) -> Self {
        Self {
            launchpad,
            address,
            whitelist_id,
        }
    }

    pub fn try_new(launchpad: &[u8], address: &[u8], whitelist_id: u64) -> Result<Self> {
        Ok(Self {
            launchpad: pubkey_from_slice(launchpad, "launchpad")?,
            address: pubkey_from_slice(address, "address")?,
            whitelist_id,
        })
    }
}

impl CanonicalEncode for WhitelistMessage {
    const SCRATCH_LEN: usize = 80;
}

/// Assigns positional indexes to an ordered address list.
pub fn entries_from_addresses(addresses: &[Pubkey]) -> Result<Vec<WhitelistEntry>> {
    addresses
        .iter()
        .enumerate()
        .map(|(position, address)| {
            u32::try_from(position)
                .map(|index| WhitelistEntry::new(index, *address))
                .map_err(|_| {
                    WhitelistError::Encoding(format!("index {position} does not fit in u32"))
                })
        })
        .collect()
}

fn pubkey_from_slice(bytes: &[u8], field: &str) -> Result<Pubkey> {
    <[u8; 32]>::try_from(bytes)
        .map(Pubkey::new_from_array)
        .map_err(|_| {
            WhitelistError::Encoding(format!("{field} must be 32 bytes, got {}", bytes.len()))
        })
}
