//! deposit -> send -> withdraw against an in-memory vault

use std::path::Path;

use anyhow::{ensure, Context, Result};
use tracing::info;

use cloakroom_primitives::{Asset, Fr, Note, TokenContract, TokenId};
use cloakroom_vault::{
    AccountId, AssetCustody, NftLedger, PathBuilder, ProofGenerator, SendWitness,
    TransparentSetup, Vault, VaultConfig, VaultError, WithdrawWitness,
};

const DEMO_SEED: &[u8] = b"cloakroom-demo";

pub fn run(config: &VaultConfig, events_out: Option<&Path>) -> Result<()> {
    let setup = TransparentSetup::from_seed(DEMO_SEED, config.tree_height);
    let prover = setup.prover();
    let custodian = AccountId::from_label("vault");
    let alice = AccountId::from_label("alice");
    let bob = AccountId::from_label("bob");
    let nft = Asset::new(TokenContract(Fr::from_u64(0x721)), TokenId(Fr::from_u64(1)));

    let mut ledger = NftLedger::new(custodian);
    ledger.mint(nft, alice)?;
    ledger.approve(&alice, &nft, custodian)?;
    let mut vault = Vault::new(config.clone(), setup.verifier(), ledger)?;
    let mut rng = rand::thread_rng();

    // alice deposits
    let note = Note::random(nft, &mut rng);
    let leaf = vault.deposit(&alice, note.commitment(), nft.token_id, nft.token_contract)?;
    info!("alice deposited {} at leaf {}", nft, leaf);

    // alice hands the claim to bob through a fresh note
    let paths = PathBuilder::from_events(config.tree_height, vault.events())?;
    let (_, path) = paths.witness_path(&note)?;
    let bob_note = note.rekey(&mut rng);
    let witness = SendWitness {
        note,
        path,
        new_note: bob_note,
    };
    let statement = witness.statement();
    let proof = prover.prove_send(&statement, &witness)?;
    let leaf = vault.send(
        &proof,
        statement.root,
        statement.old_nullifier_hash,
        statement.new_commitment,
    )?;
    info!("sent to a new note at leaf {}", leaf);
    ensure!(vault.custody().in_custody(&nft), "asset left custody on send");

    // bob withdraws
    let paths = PathBuilder::from_events(config.tree_height, vault.events())?;
    let (_, path) = paths.witness_path(&bob_note)?;
    let witness = WithdrawWitness {
        note: bob_note,
        path,
    };
    let statement = witness.statement();
    let proof = prover.prove_withdraw(&statement, &witness)?;
    vault.withdraw(
        &bob,
        &proof,
        statement.root,
        statement.nullifier_hash,
        nft.token_id,
        nft.token_contract,
    )?;
    ensure!(
        vault.custody().owner_of(&nft) == Some(bob),
        "asset was not released to bob"
    );
    info!("bob withdrew {}", nft);

    // replay is refused
    match vault.withdraw(
        &bob,
        &proof,
        statement.root,
        statement.nullifier_hash,
        nft.token_id,
        nft.token_contract,
    ) {
        Err(VaultError::AlreadySpent(nh)) => info!("resubmission rejected, {} already spent", nh),
        other => anyhow::bail!("resubmitted withdraw was not rejected: {:?}", other),
    }

    println!("{}", serde_json::to_string_pretty(vault.events())?);
    if let Some(out) = events_out {
        std::fs::write(out, serde_json::to_vec_pretty(vault.events())?)
            .with_context(|| format!("writing event log {}", out.display()))?;
        info!("event log written to {}", out.display());
    }
    Ok(())
}
