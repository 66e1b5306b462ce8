use anchor_lang::prelude::*;
use anchor_lang::solana_program::ed25519_program;
use anchor_lang::solana_program::keccak::hashv;
use anchor_lang::solana_program::sysvar::instructions::{
    load_current_index_checked, load_instruction_at_checked,
};
use bytemuck::{Pod, Zeroable};

declare_id!("2eptJytvDTU2qdwJX7zLo4t3B7J9maNiM3bpgXHu3Tkf");

/// Launchpad Whitelist Verifier
///
/// Registration-time whitelist checks for fixed-price launchpad sales.
/// The committed values live in a per-launchpad `WhitelistConfig` account
/// written by the sale admin; participants never supply them.
///
/// - Merkle: the config stores a keccak root; the participant submits
///   `{index, proofs}` and the leaf `keccak(index_le || user)` is folded
///   up to the root with sorted pairs.
/// - Signature: the config stores a whitelist authority that signs
///   `keccak(launchpad || user || whitelist_id_le)`; the transaction carries
///   the matching native Ed25519 verification instruction somewhere before
///   ours.

#[program]
pub mod launchpad_verifier {
    use super::*;

    /// Create the whitelist commitment of a launchpad
    pub fn initialize_whitelist(
        ctx: Context<InitializeWhitelist>,
        launchpad: Pubkey,
        merkle_root: [u8; 32],
        whitelist_authority: Pubkey,
    ) -> Result<()> {
        let config = &mut ctx.accounts.config;
        config.launchpad = launchpad;
        config.admin = ctx.accounts.admin.key();
        config.merkle_root = merkle_root;
        config.whitelist_authority = whitelist_authority;
        config.bump = ctx.bumps.config;

        msg!("Whitelist initialized for launchpad {}", launchpad);
        Ok(())
    }

    /// Replace the whitelist commitment. Proofs and signatures issued
    /// against the previous values stop verifying.
    pub fn set_whitelist(
        ctx: Context<SetWhitelist>,
        merkle_root: [u8; 32],
        whitelist_authority: Pubkey,
    ) -> Result<()> {
        let config = &mut ctx.accounts.config;
        config.merkle_root = merkle_root;
        config.whitelist_authority = whitelist_authority;

        msg!("Whitelist updated for launchpad {}", config.launchpad);
        Ok(())
    }

    /// Verify a whitelist Merkle proof for the signing user
    pub fn verify_whitelist_proof(
        ctx: Context<VerifyWhitelistProof>,
        index: u32,
        proofs: Vec<[u8; 32]>,
    ) -> Result<()> {
        let config = &ctx.accounts.config;
        let user = ctx.accounts.user.key();

        check_whitelist_proof(config, index, &user, &proofs)?;

        msg!("Whitelist proof verified for index {}", index);
        emit!(WhitelistProofVerified {
            user,
            launchpad: config.launchpad,
            index,
            timestamp: Clock::get()?.unix_timestamp,
        });

        Ok(())
    }

    /// Verify a whitelist authority signature for the signing user
    pub fn verify_whitelist_signature(
        ctx: Context<VerifyWhitelistSignature>,
        whitelist_id: u64,
        signature: [u8; 64],
    ) -> Result<()> {
        let config = &ctx.accounts.config;
        let user = ctx.accounts.user.key();

        check_whitelist_signature(
            config,
            &user,
            whitelist_id,
            &signature,
            &ctx.accounts.instructions,
        )?;

        msg!("Whitelist signature verified for id {}", whitelist_id);
        emit!(WhitelistSignatureVerified {
            user,
            launchpad: config.launchpad,
            whitelist_id,
            timestamp: Clock::get()?.unix_timestamp,
        });

        Ok(())
    }
}

// ============================================================================
// ACCOUNTS
// ============================================================================

#[derive(Accounts)]
#[instruction(launchpad: Pubkey)]
pub struct InitializeWhitelist<'info> {
    #[account(
        init,
        payer = admin,
        space = 8 + WhitelistConfig::SPACE,
        seeds = [WhitelistConfig::SEED, launchpad.as_ref()],
        bump
    )]
    pub config: Account<'info, WhitelistConfig>,

    #[account(mut)]
    pub admin: Signer<'info>,

    pub system_program: Program<'info, System>,
}

#[derive(Accounts)]
pub struct SetWhitelist<'info> {
    #[account(
        mut,
        seeds = [WhitelistConfig::SEED, config.launchpad.as_ref()],
        bump = config.bump,
        has_one = admin
    )]
    pub config: Account<'info, WhitelistConfig>,

    pub admin: Signer<'info>,
}

#[derive(Accounts)]
pub struct VerifyWhitelistProof<'info> {
    #[account(seeds = [WhitelistConfig::SEED, config.launchpad.as_ref()], bump = config.bump)]
    pub config: Account<'info, WhitelistConfig>,

    pub user: Signer<'info>,
}

#[derive(Accounts)]
pub struct VerifyWhitelistSignature<'info> {
    #[account(seeds = [WhitelistConfig::SEED, config.launchpad.as_ref()], bump = config.bump)]
    pub config: Account<'info, WhitelistConfig>,

    pub user: Signer<'info>,

    /// CHECK: Instructions sysvar
    #[account(address = anchor_lang::solana_program::sysvar::instructions::ID)]
    pub instructions: AccountInfo<'info>,
}

// ============================================================================
// STATE
// ============================================================================

#[account]
pub struct WhitelistConfig {
    pub launchpad: Pubkey,
    pub admin: Pubkey,
    pub merkle_root: [u8; 32],
    pub whitelist_authority: Pubkey,
    pub bump: u8,
}

impl WhitelistConfig {
    pub const SEED: &'static [u8] = b"whitelist_config";
    pub const SPACE: usize = 32 + 32 + 32 + 32 + 1;
}

/// Check `proofs` for `user` at `index` against the committed root
pub fn check_whitelist_proof(
    config: &WhitelistConfig,
    index: u32,
    user: &Pubkey,
    proofs: &[[u8; 32]],
) -> Result<()> {
    let leaf = whitelist_leaf(index, user);
    require!(
        verify_proof(proofs, config.merkle_root, leaf),
        VerifierError::NotWhitelisted
    );
    Ok(())
}

/// Check that an earlier instruction of the transaction is a native Ed25519
/// verification of `signature` by the committed authority over the
/// whitelist message of `user`.
pub fn check_whitelist_signature(
    config: &WhitelistConfig,
    user: &Pubkey,
    whitelist_id: u64,
    signature: &[u8; 64],
    instructions: &AccountInfo,
) -> Result<()> {
    let message = whitelist_message_hash(&config.launchpad, user, whitelist_id);
    let authority = config.whitelist_authority.to_bytes();

    let current_index = load_current_index_checked(instructions)?;
    let mut seen_ed25519 = false;

    for index in 0..current_index {
        let ix = load_instruction_at_checked(usize::from(index), instructions)?;
        if ix.program_id != ed25519_program::ID {
            continue;
        }
        seen_ed25519 = true;

        // multi-signature or cross-instruction layouts are not ours
        let Ok(payload) = parse_ed25519_instruction(&ix.data) else {
            continue;
        };
        if payload.public_key == authority
            && payload.signature == *signature
            && payload.message == message
        {
            return Ok(());
        }
    }

    if seen_ed25519 {
        err!(VerifierError::SignatureMismatch)
    } else {
        err!(VerifierError::MissingSignatureInstruction)
    }
}

// ============================================================================
// MERKLE
// ============================================================================

/// Leaf hash of a Merkle whitelist entry: keccak(index u32 LE || address)
pub fn whitelist_leaf(index: u32, address: &Pubkey) -> [u8; 32] {
    hashv(&[&index.to_le_bytes(), address.as_ref()]).to_bytes()
}

/// Returns true if `leaf` folds up to `root` through `proofs`.
///
/// Each pair is hashed in sorted order, so the fold needs no position bits.
pub fn verify_proof(proofs: &[[u8; 32]], root: [u8; 32], leaf: [u8; 32]) -> bool {
    let mut computed_hash = leaf;

    for proof in proofs {
        computed_hash = if computed_hash < *proof {
            hashv(&[&computed_hash, proof]).to_bytes()
        } else {
            hashv(&[proof, &computed_hash]).to_bytes()
        };
    }

    computed_hash == root
}

// ============================================================================
// SIGNATURE
// ============================================================================

/// Message signed by the whitelist authority:
/// keccak(launchpad || address || whitelist_id u64 LE)
pub fn whitelist_message_hash(launchpad: &Pubkey, address: &Pubkey, whitelist_id: u64) -> [u8; 32] {
    hashv(&[launchpad.as_ref(), address.as_ref(), &whitelist_id.to_le_bytes()]).to_bytes()
}

pub const SIGNATURE_OFFSETS_START: usize = 2;
pub const SIGNATURE_OFFSETS_SERIALIZED_SIZE: usize = 14;
pub const DATA_START: usize = SIGNATURE_OFFSETS_START + SIGNATURE_OFFSETS_SERIALIZED_SIZE;

/// Offsets record of the native Ed25519 program instruction
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Pod, Zeroable)]
#[repr(C)]
pub struct Ed25519SignatureOffsets {
    pub signature_offset: u16,
    pub signature_instruction_index: u16,
    pub public_key_offset: u16,
    pub public_key_instruction_index: u16,
    pub message_data_offset: u16,
    pub message_data_size: u16,
    pub message_instruction_index: u16,
}

/// Data carried inline by a single-signature Ed25519 instruction
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ed25519Payload {
    pub public_key: [u8; 32],
    pub signature: [u8; 64],
    pub message: Vec<u8>,
}

/// Parse an Ed25519 program instruction that verifies exactly one signature
/// whose key, signature and message all live in the instruction itself.
pub fn parse_ed25519_instruction(data: &[u8]) -> Result<Ed25519Payload> {
    require!(data.len() >= DATA_START, VerifierError::InvalidSignatureInstruction);
    require!(data[0] == 1, VerifierError::InvalidSignatureInstruction);

    let offsets: Ed25519SignatureOffsets =
        bytemuck::try_pod_read_unaligned(&data[SIGNATURE_OFFSETS_START..DATA_START])
            .map_err(|_| error!(VerifierError::InvalidSignatureInstruction))?;

    require!(
        offsets.signature_instruction_index == u16::MAX
            && offsets.public_key_instruction_index == u16::MAX
            && offsets.message_instruction_index == u16::MAX,
        VerifierError::InvalidSignatureInstruction
    );

    let public_key = read_array::<32>(data, offsets.public_key_offset)?;
    let signature = read_array::<64>(data, offsets.signature_offset)?;

    let start = usize::from(offsets.message_data_offset);
    let end = start + usize::from(offsets.message_data_size);
    let message = data
        .get(start..end)
        .ok_or_else(|| error!(VerifierError::InvalidSignatureInstruction))?
        .to_vec();

    Ok(Ed25519Payload {
        public_key,
        signature,
        message,
    })
}

fn read_array<const N: usize>(data: &[u8], offset: u16) -> Result<[u8; N]> {
    let start = usize::from(offset);
    data.get(start..start + N)
        .and_then(|bytes| bytes.try_into().ok())
        .ok_or_else(|| error!(VerifierError::InvalidSignatureInstruction))
}

// ============================================================================
// EVENTS
// ============================================================================

#[event]
pub struct WhitelistProofVerified {
    pub user: Pubkey,
    pub launchpad: Pubkey,
    pub index: u32,
    pub timestamp: i64,
}

#[event]
pub struct WhitelistSignatureVerified {
    pub user: Pubkey,
    pub launchpad: Pubkey,
    pub whitelist_id: u64,
    pub timestamp: i64,
}

// ============================================================================
// ERRORS
// ============================================================================

#[error_code]
pub enum VerifierError {
    #[msg("Not whitelisted")]
    NotWhitelisted,

    #[msg("No Ed25519 verification instruction precedes this instruction")]
    MissingSignatureInstruction,

    #[msg("Malformed Ed25519 verification instruction")]
    InvalidSignatureInstruction,

    #[msg("Whitelist signature does not match authority, user or message")]
    SignatureMismatch,
}
