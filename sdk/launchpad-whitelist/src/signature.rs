//! Signature-based whitelist.
//!
//! A whitelist authority signs `keccak(launchpad || address || whitelist_id)`
//! and the participant submits the signature together with a native Ed25519
//! program instruction carrying the same key, signature and message.

use std::fmt;

use anchor_lang::prelude::Pubkey;
use anchor_lang::solana_program::ed25519_program;
use anchor_lang::solana_program::instruction::Instruction;
use bytemuck::{Pod, Zeroable};
use ed25519_dalek::{
    Keypair, PublicKey, SecretKey, Signature, Signer as _, KEYPAIR_LENGTH, SECRET_KEY_LENGTH,
};
use tracing::debug;

use crate::error::{Result, WhitelistError};
use crate::hash::Node;
use crate::instruction::RegisterWithSignatureArgs;
use crate::leaf::{CanonicalEncode, WhitelistMessage};

pub const SIGNATURE_LEN: usize = 64;

/// Trusted key that attests whitelist membership.
pub struct WhitelistSigner {
    keypair: Keypair,
}

impl fmt::Debug for WhitelistSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WhitelistSigner")
            .field("pubkey", &self.pubkey())
            .finish_non_exhaustive()
    }
}

impl WhitelistSigner {
    /// From a 32-byte Ed25519 seed.
    pub fn from_secret_bytes(bytes: &[u8]) -> Result<Self> {
        let secret = SecretKey::from_bytes(bytes)
            .map_err(|_| WhitelistError::InvalidKeyMaterial("secret key must be 32 bytes"))?;
        let public = PublicKey::from(&secret);
        Ok(Self {
            keypair: Keypair { secret, public },
        })
    }

    /// From the 64-byte Solana keypair layout, `secret || public`.
    pub fn from_keypair_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != KEYPAIR_LENGTH {
            return Err(WhitelistError::InvalidKeyMaterial("keypair must be 64 bytes"));
        }

        let signer = Self::from_secret_bytes(&bytes[..SECRET_KEY_LENGTH])?;
        if signer.keypair.public.as_bytes()[..] != bytes[SECRET_KEY_LENGTH..] {
            return Err(WhitelistError::InvalidKeyMaterial(
                "public half does not match secret key",
            ));
        }

        Ok(signer)
    }

    pub fn pubkey(&self) -> Pubkey {
        Pubkey::new_from_array(self.keypair.public.to_bytes())
    }

    pub fn sign_message(&self, message: &Node) -> [u8; SIGNATURE_LEN] {
        self.keypair.sign(message).to_bytes()
    }

    pub fn sign_whitelist(
        &self,
        launchpad: Pubkey,
        address: Pubkey,
        whitelist_id: u64,
    ) -> Result<[u8; SIGNATURE_LEN]> {
        let message = WhitelistMessage::new(launchpad, address, whitelist_id).leaf_hash()?;
        Ok(self.sign_message(&message))
    }

    /// Everything a participant needs to register under the signature scheme.
    pub fn attest(
        &self,
        launchpad: Pubkey,
        address: Pubkey,
        whitelist_id: u64,
    ) -> Result<SignedRegistration> {
        let message = WhitelistMessage::new(launchpad, address, whitelist_id).leaf_hash()?;
        let signature = self.sign_message(&message);

        debug!(%launchpad, %address, whitelist_id, "signed whitelist registration");

        Ok(SignedRegistration {
            ed25519_instruction: new_ed25519_instruction(&self.pubkey(), &message, &signature),
            args: RegisterWithSignatureArgs {
                whitelist_id,
                signature,
            },
        })
    }
}

/// The Ed25519 verification instruction must appear earlier in the same
/// transaction than the `register` instruction built from `args`. Other
/// instructions, such as profile creation, may sit between them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignedRegistration {
    pub ed25519_instruction: Instruction,
    pub args: RegisterWithSignatureArgs,
}

pub fn verify_whitelist_signature(
    authority: &Pubkey,
    message: &Node,
    signature: &[u8; SIGNATURE_LEN],
) -> Result<()> {
    let public = PublicKey::from_bytes(authority.as_ref())
        .map_err(|_| WhitelistError::InvalidKeyMaterial("authority is not an ed25519 point"))?;
    let signature =
        Signature::try_from(&signature[..]).map_err(|_| WhitelistError::InvalidSignature)?;

    public
        .verify_strict(message, &signature)
        .map_err(|_| WhitelistError::InvalidSignature)
}

// ============================================================================
// NATIVE ED25519 INSTRUCTION
// ============================================================================

pub const SIGNATURE_OFFSETS_START: usize = 2;
pub const SIGNATURE_OFFSETS_SERIALIZED_SIZE: usize = 14;
pub const DATA_START: usize = SIGNATURE_OFFSETS_START + SIGNATURE_OFFSETS_SERIALIZED_SIZE;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Pod, Zeroable)]
#[repr(C)]
struct Ed25519SignatureOffsets {
    signature_offset: u16,
    signature_instruction_index: u16,
    public_key_offset: u16,
    public_key_instruction_index: u16,
    message_data_offset: u16,
    message_data_size: u16,
    message_instruction_index: u16,
}

/// Single-signature Ed25519 program instruction with key, signature and
/// message stored inline.
pub fn new_ed25519_instruction(
    pubkey: &Pubkey,
    message: &Node,
    signature: &[u8; SIGNATURE_LEN],
) -> Instruction {
    let public_key_offset = DATA_START;
    let signature_offset = public_key_offset + 32;
    let message_data_offset = signature_offset + SIGNATURE_LEN;

    let offsets = Ed25519SignatureOffsets {
        signature_offset: signature_offset as u16,
        signature_instruction_index: u16::MAX,
        public_key_offset: public_key_offset as u16,
        public_key_instruction_index: u16::MAX,
        message_data_offset: message_data_offset as u16,
        message_data_size: message.len() as u16,
        message_instruction_index: u16::MAX,
    };

    let mut data = Vec::with_capacity(message_data_offset + message.len());
    // one signature, one byte of padding
    data.extend_from_slice(&[1, 0]);
    data.extend_from_slice(bytemuck::bytes_of(&offsets));
    data.extend_from_slice(pubkey.as_ref());
    data.extend_from_slice(signature);
    data.extend_from_slice(message);

    Instruction {
        program_id: ed25519_program::ID,
        accounts: vec![],
        data,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signer() -> WhitelistSigner {
        WhitelistSigner::from_secret_bytes(&[7u8; 32]).unwrap()
    }

    #[test]
    fn sign_then_verify() {
        let signer = signer();
        let launchpad = Pubkey::new_unique();
        let address = Pubkey::new_unique();

        let signature = signer.sign_whitelist(launchpad, address, 42).unwrap();
        let message = WhitelistMessage::new(launchpad, address, 42).leaf_hash().unwrap();

        verify_whitelist_signature(&signer.pubkey(), &message, &signature).unwrap();
    }

    #[test]
    fn altered_fields_fail_verification() {
        let signer = signer();
        let launchpad = Pubkey::new_unique();
        let address = Pubkey::new_unique();
        let other = Pubkey::new_unique();
        let signature = signer.sign_whitelist(launchpad, address, 42).unwrap();

        for message in [
            WhitelistMessage::new(other, address, 42),
            WhitelistMessage::new(launchpad, other, 42),
            WhitelistMessage::new(launchpad, address, 43),
        ] {
            let hash = message.leaf_hash().unwrap();
            assert_eq!(
                verify_whitelist_signature(&signer.pubkey(), &hash, &signature),
                Err(WhitelistError::InvalidSignature)
            );
        }
    }

    #[test]
    fn wrong_authority_fails_verification() {
        let signature = signer().sign_message(&[1u8; 32]);
        let other = WhitelistSigner::from_secret_bytes(&[8u8; 32]).unwrap();

        assert_eq!(
            verify_whitelist_signature(&other.pubkey(), &[1u8; 32], &signature),
            Err(WhitelistError::InvalidSignature)
        );
    }

    #[test]
    fn keypair_bytes_round_trip() {
        let signer = signer();
        let mut bytes = [7u8; 32].to_vec();
        bytes.extend_from_slice(signer.pubkey().as_ref());

        let parsed = WhitelistSigner::from_keypair_bytes(&bytes).unwrap();
        assert_eq!(parsed.pubkey(), signer.pubkey());
    }

    #[test]
    fn malformed_key_material_is_rejected() {
        assert!(matches!(
            WhitelistSigner::from_secret_bytes(&[1u8; 31]),
            Err(WhitelistError::InvalidKeyMaterial(_))
        ));
        assert!(matches!(
            WhitelistSigner::from_keypair_bytes(&[1u8; 63]),
            Err(WhitelistError::InvalidKeyMaterial(_))
        ));

        let mut mismatched = [7u8; 32].to_vec();
        mismatched.extend_from_slice(&[0u8; 32]);
        assert!(matches!(
            WhitelistSigner::from_keypair_bytes(&mismatched),
            Err(WhitelistError::InvalidKeyMaterial(_))
        ));
    }

    #[test]
    fn debug_output_hides_secret() {
        let rendered = format!("{:?}", signer());
        assert!(rendered.contains(&signer().pubkey().to_string()));
        assert!(!rendered.contains("secret"));
    }

    #[test]
    fn ed25519_instruction_layout() {
        let signer = signer();
        let message = [5u8; 32];
        let signature = signer.sign_message(&message);
        let ix = new_ed25519_instruction(&signer.pubkey(), &message, &signature);

        assert_eq!(ix.program_id, ed25519_program::ID);
        assert!(ix.accounts.is_empty());
        assert_eq!(ix.data.len(), DATA_START + 32 + 64 + 32);
        assert_eq!(&ix.data[..2], &[1, 0]);
        // signature_offset, public_key_offset, message offset and size
        assert_eq!(&ix.data[2..4], &48u16.to_le_bytes());
        assert_eq!(&ix.data[4..6], &u16::MAX.to_le_bytes());
        assert_eq!(&ix.data[6..8], &16u16.to_le_bytes());
        assert_eq!(&ix.data[10..12], &112u16.to_le_bytes());
        assert_eq!(&ix.data[12..14], &32u16.to_le_bytes());
        assert_eq!(&ix.data[16..48], signer.pubkey().as_ref());
        assert_eq!(&ix.data[48..112], &signature);
        assert_eq!(&ix.data[112..], &message);
    }

    #[test]
    fn attest_matches_manual_signing() {
        let signer = signer();
        let launchpad = Pubkey::new_unique();
        let address = Pubkey::new_unique();

        let registration = signer.attest(launchpad, address, 9).unwrap();
        assert_eq!(registration.args.whitelist_id, 9);
        assert_eq!(
            registration.args.signature,
            signer.sign_whitelist(launchpad, address, 9).unwrap()
        );
    }
}
