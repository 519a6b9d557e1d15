// crates/sequoia-core/src/merkle.rs
//
// Sorted-pair Merkle trees for presale allowlists.
//
// Compatibility contract: at every level the two child hashes are ordered
// lexicographically (byte-wise) before being concatenated and hashed, so a
// proof is just the list of sibling hashes with no left/right flags. Leaves
// are sorted the same way before the tree is built, and an unpaired last
// node is carried up to the next level unchanged. This is the layout produced
// by `merkletreejs` with `{ sort: true }` and accepted by OpenZeppelin's
// `MerkleProof.verify`.
//
// Keccak-256 is the default hash; any 32-byte `Digest` (e.g. SHA-256) can be
// substituted through the `*_with` functions and `MerkleTree::with_hasher`.

use std::marker::PhantomData;

use sha2::Digest;
use sha3::Keccak256;

use crate::crypto::{digest_bytes, identity_leaf};
use crate::error::SequoiaError;
use crate::types::{Hash32, Identity};

/// Hash two nodes in canonical (sorted) order.
pub fn hash_sorted_pair_with<D: Digest>(a: &Hash32, b: &Hash32) -> Hash32 {
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    let mut buf = [0u8; 64];
    buf[..32].copy_from_slice(lo);
    buf[32..].copy_from_slice(hi);
    digest_bytes::<D>(&buf)
}

/// Keccak-256 sorted-pair hash.
pub fn hash_sorted_pair(a: &Hash32, b: &Hash32) -> Hash32 {
    hash_sorted_pair_with::<Keccak256>(a, b)
}

/// Fold `leaf` with each sibling in `proof` and compare against `root`.
pub fn verify_with<D: Digest>(root: &Hash32, leaf: &Hash32, proof: &[Hash32]) -> bool {
    let computed = proof
        .iter()
        .fold(*leaf, |node, sibling| hash_sorted_pair_with::<D>(&node, sibling));
    &computed == root
}

/// Keccak-256 proof verification.
pub fn verify(root: &Hash32, leaf: &Hash32, proof: &[Hash32]) -> bool {
    verify_with::<Keccak256>(root, leaf, proof)
}

/// A fully materialised sorted-pair Merkle tree.
///
/// `layers[0]` holds the sorted leaves, the last layer holds the root.
#[derive(Debug, Clone)]
pub struct MerkleTree<D = Keccak256> {
    layers: Vec<Vec<Hash32>>,
    _hasher: PhantomData<D>,
}

impl MerkleTree<Keccak256> {
    /// Build a Keccak-256 tree over pre-hashed leaves.
    ///
    /// # Errors
    /// Returns `SequoiaError::InvalidConfig` if `leaves` is empty.
    pub fn new(leaves: Vec<Hash32>) -> Result<Self, SequoiaError> {
        Self::with_hasher(leaves)
    }

    /// Build a Keccak-256 tree whose leaves are `identity_leaf(id)`.
    pub fn from_identities(identities: &[Identity]) -> Result<Self, SequoiaError> {
        Self::new(identities.iter().map(identity_leaf).collect())
    }
}

impl<D: Digest> MerkleTree<D> {
    /// Build a tree with an explicit hasher.
    ///
    /// # Errors
    /// Returns `SequoiaError::InvalidConfig` if `leaves` is empty.
    pub fn with_hasher(mut leaves: Vec<Hash32>) -> Result<Self, SequoiaError> {
        if leaves.is_empty() {
            return Err(SequoiaError::InvalidConfig(
                "merkle tree needs at least one leaf".to_string(),
            ));
        }
        leaves.sort();

        let mut layers = vec![leaves];
        while let Some(current) = layers.last().filter(|layer| layer.len() > 1) {
            let next: Vec<Hash32> = current
                .chunks(2)
                .map(|pair| match pair {
                    [left, right] => hash_sorted_pair_with::<D>(left, right),
                    odd => odd[0],
                })
                .collect();
            layers.push(next);
        }

        Ok(Self {
            layers,
            _hasher: PhantomData,
        })
    }

    pub fn root(&self) -> Hash32 {
        // Construction guarantees at least one non-empty layer.
        self.layers
            .last()
            .and_then(|layer| layer.first())
            .copied()
            .unwrap_or([0u8; 32])
    }

    /// Sorted leaves.
    pub fn leaves(&self) -> &[Hash32] {
        &self.layers[0]
    }

    pub fn depth(&self) -> usize {
        self.layers.len() - 1
    }

    /// Sibling path for `leaf`, or `None` if the leaf is not in the tree.
    pub fn proof(&self, leaf: &Hash32) -> Option<Vec<Hash32>> {
        let mut index = self.layers[0].iter().position(|l| l == leaf)?;
        let mut proof = Vec::with_capacity(self.depth());
        for layer in &self.layers[..self.layers.len() - 1] {
            let sibling = if index % 2 == 1 { index - 1 } else { index + 1 };
            if let Some(node) = layer.get(sibling) {
                proof.push(*node);
            }
            index /= 2;
        }
        Some(proof)
    }

    /// Check a proof against this tree's root.
    pub fn verify(&self, leaf: &Hash32, proof: &[Hash32]) -> bool {
        verify_with::<D>(&self.root(), leaf, proof)
    }
}
