// crates/sequoia-core/src/crypto.rs

use sha2::{Digest, Sha256};
use sha3::Keccak256;

use crate::types::{Hash32, Identity};

/// Hash `data` with any 32-byte-output digest.
pub fn digest_bytes<D: Digest>(data: &[u8]) -> Hash32 {
    let result = D::digest(data);
    let mut output = [0u8; 32];
    output.copy_from_slice(&result[..32]);
    output
}

/// Compute the Keccak-256 hash of the given bytes (pre-NIST padding, as used
/// by Ethereum tooling).
pub fn keccak256(data: &[u8]) -> Hash32 {
    digest_bytes::<Keccak256>(data)
}

/// Compute the SHA-256 hash of the given bytes.
pub fn hash_bytes(data: &[u8]) -> Hash32 {
    let mut hasher = Sha256::new();
    hasher.update(data);
    let result = hasher.finalize();
    let mut output = [0u8; 32];
    output.copy_from_slice(&result);
    output
}

/// Allowlist leaf for an identity: Keccak-256 over the 20 raw identity bytes.
pub fn identity_leaf(identity: &Identity) -> Hash32 {
    keccak256(identity.as_bytes())
}
