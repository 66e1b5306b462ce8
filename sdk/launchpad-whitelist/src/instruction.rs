//! Argument payloads of the launchpad `register` instruction.
//!
//! Only the whitelist-bearing data is built here; account metas and
//! submission belong to the caller's instruction builder.

use anchor_lang::prelude::*;
use anchor_lang::solana_program::hash;

use crate::error::{Result, WhitelistError};
use crate::hash::Node;

pub const REGISTER: &str = "register";

/// Anchor instruction discriminator: `sha256("global:<name>")[..8]`.
pub fn sighash(name: &str) -> [u8; 8] {
    let preimage = format!("global:{name}");
    let mut discriminator = [0u8; 8];
    discriminator.copy_from_slice(&hash::hash(preimage.as_bytes()).to_bytes()[..8]);
    discriminator
}

/// `register` arguments of the Merkle whitelist program.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct RegisterArgs {
    pub index: u32,
    pub proofs: Vec<Node>,
}

/// `register` arguments of the signature whitelist program.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct RegisterWithSignatureArgs {
    pub whitelist_id: u64,
    pub signature: [u8; 64],
}

impl RegisterArgs {
    pub fn data(&self) -> Result<Vec<u8>> {
        instruction_data(REGISTER, self)
    }
}

impl RegisterWithSignatureArgs {
    pub fn data(&self) -> Result<Vec<u8>> {
        instruction_data(REGISTER, self)
    }
}

fn instruction_data<T: AnchorSerialize>(name: &str, args: &T) -> Result<Vec<u8>> {
    let mut data = sighash(name).to_vec();
    args.serialize(&mut data)
        .map_err(|err| WhitelistError::Encoding(err.to_string()))?;
    Ok(data)
}
