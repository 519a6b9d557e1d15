// crates/sequoia-cli/src/commands/merkle.rs
//
// `sequoia merkle {root, proof, verify}`: allowlist Merkle tooling.
//
// Allowlist files hold one hex identity per line. Blank lines and lines
// starting with `#` are ignored.

use std::fs;

use clap::Subcommand;

use sequoia_core::crypto::identity_leaf;
use sequoia_core::error::SequoiaError;
use sequoia_core::merkle;
use sequoia_core::types::{format_hash32, parse_hash32, Hash32, Identity};
use sequoia_core::MerkleTree;

use crate::output::format_json;

/// Merkle subcommands.
#[derive(Debug, Subcommand)]
pub enum MerkleCmd {
    /// Print the root of the sorted-pair tree over an allowlist.
    Root {
        /// Allowlist file, one hex identity per line.
        #[arg(long)]
        allowlist: String,
    },
    /// Print the inclusion proof for one identity as a JSON array.
    Proof {
        /// Allowlist file, one hex identity per line.
        #[arg(long)]
        allowlist: String,
        /// Identity to prove (hex).
        #[arg(long)]
        address: String,
    },
    /// Check a proof against a root without the allowlist.
    Verify {
        /// Expected root (hex).
        #[arg(long)]
        root: String,
        /// Identity the proof is for (hex).
        #[arg(long)]
        address: String,
        /// Proof elements (hex), comma separated, in bottom-up order.
        #[arg(long, value_delimiter = ',')]
        proof: Vec<String>,
    },
}

/// Run the merkle subcommand.
pub fn run(cmd: &MerkleCmd) -> Result<(), Box<dyn std::error::Error>> {
    match cmd {
        MerkleCmd::Root { allowlist } => {
            let identities = parse_allowlist(&fs::read_to_string(allowlist)?)?;
            let tree = MerkleTree::from_identities(&identities)?;
            tracing::info!(
                "Built allowlist tree: {} leaves, depth {}",
                tree.leaves().len(),
                tree.depth()
            );
            println!("{}", format_hash32(&tree.root()));
        }
        MerkleCmd::Proof {
            allowlist,
            address,
        } => {
            let identities = parse_allowlist(&fs::read_to_string(allowlist)?)?;
            let who: Identity = address.parse()?;
            let proof = proof_for(&identities, &who)?;
            let hex: Vec<String> = proof.iter().map(format_hash32).collect();
            println!("{}", format_json(&hex));
        }
        MerkleCmd::Verify {
            root,
            address,
            proof,
        } => {
            let root = parse_hash32(root)?;
            let who: Identity = address.parse()?;
            let proof = proof
                .iter()
                .map(|p| parse_hash32(p.trim()))
                .collect::<Result<Vec<Hash32>, _>>()?;
            let ok = merkle::verify(&root, &identity_leaf(&who), &proof);
            println!("{}", ok);
            if !ok {
                return Err(SequoiaError::NotWhitelisted(who).into());
            }
        }
    }

    Ok(())
}

/// Parse an allowlist file body.
pub fn parse_allowlist(contents: &str) -> Result<Vec<Identity>, SequoiaError> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::parse::<Identity>)
        .collect()
}

/// Build the tree over `identities` and return the proof for `who`.
pub fn proof_for(identities: &[Identity], who: &Identity) -> Result<Vec<Hash32>, SequoiaError> {
    let tree = MerkleTree::from_identities(identities)?;
    tree.proof(&identity_leaf(who))
        .ok_or(SequoiaError::NotWhitelisted(*who))
}
