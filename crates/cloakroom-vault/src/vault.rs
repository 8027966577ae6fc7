//! vault state machine
//!
//! executes deposit, send and withdraw against the accumulator, the nullifier
//! registry and the custody backend. every fallible check runs first; the
//! commit phase only performs mutations whose preconditions were just checked
//! under `&mut self`, so a rejected call leaves no trace.
//!
//! check order for spends: nullifier, root, proof, then capacity or custody.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use cloakroom_primitives::{
    Asset, Commitment, Fr, NullifierHash, Root, TokenContract, TokenId,
};
use cloakroom_tree::{LeafIndex, MerkleAccumulator};

use crate::config::VaultConfig;
use crate::custody::{AccountId, AssetCustody};
use crate::error::{ConfigError, Result, VaultError};
use crate::event::VaultEvent;
use crate::nullifier::NullifierRegistry;
use crate::verifier::{CircuitId, Proof, ProofVerifier, SendStatement, WithdrawStatement};

/// one recorded vault call, replayable through [`Vault::execute`]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "call", rename_all = "snake_case")]
pub enum VaultCall {
    Deposit {
        caller: AccountId,
        commitment: Commitment,
        token_id: TokenId,
        token_contract: TokenContract,
    },
    Send {
        proof: Proof,
        root: Root,
        old_nullifier_hash: NullifierHash,
        new_commitment: Commitment,
    },
    Withdraw {
        caller: AccountId,
        proof: Proof,
        root: Root,
        nullifier_hash: NullifierHash,
        token_id: TokenId,
        token_contract: TokenContract,
    },
}

/// result of a successful [`VaultCall`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    Deposited { leaf_index: LeafIndex },
    Sent { leaf_index: LeafIndex },
    Withdrawn,
}

pub struct Vault<V, C> {
    config: VaultConfig,
    tree: MerkleAccumulator,
    nullifiers: NullifierRegistry,
    verifier: V,
    custody: C,
    events: Vec<VaultEvent>,
    /// committed transitions so far
    sequence: u64,
}

fn rejected(op: &'static str) -> impl Fn(VaultError) -> VaultError {
    move |err| {
        warn!("{} rejected: {}", op, err);
        err
    }
}

impl<V: ProofVerifier, C: AssetCustody> Vault<V, C> {
    pub fn new(
        config: VaultConfig,
        verifier: V,
        custody: C,
    ) -> std::result::Result<Self, ConfigError> {
        config.validate()?;
        let tree = MerkleAccumulator::new(config.tree_height, config.root_history_size)?;
        info!(
            "vault ready: height {} ({} leaves), root window {}",
            config.tree_height,
            tree.capacity(),
            config.root_history_size
        );
        Ok(Self {
            config,
            tree,
            nullifiers: NullifierRegistry::new(),
            verifier,
            custody,
            events: Vec::new(),
            sequence: 0,
        })
    }

    /// lock `token_contract/token_id` from `caller` and append `commitment`
    pub fn deposit(
        &mut self,
        caller: &AccountId,
        commitment: Commitment,
        token_id: TokenId,
        token_contract: TokenContract,
    ) -> Result<LeafIndex> {
        let asset = Asset::new(token_contract, token_id);

        self.ensure_capacity().map_err(rejected("deposit"))?;
        self.custody
            .take_custody(caller, &asset)
            .map_err(VaultError::from)
            .map_err(rejected("deposit"))?;

        let leaf_index = self.append(commitment)?;
        self.sequence += 1;
        self.events.push(VaultEvent::Deposit {
            commitment,
            leaf_index,
        });

        info!("deposit {} at leaf {} ({})", commitment, leaf_index, asset);
        Ok(leaf_index)
    }

    /// spend one commitment into a new one; the asset stays in custody
    pub fn send(
        &mut self,
        proof: &Proof,
        root: Root,
        old_nullifier_hash: NullifierHash,
        new_commitment: Commitment,
    ) -> Result<LeafIndex> {
        let statement = SendStatement {
            root,
            old_nullifier_hash,
            new_commitment,
        };
        self.check_spend(
            CircuitId::Send,
            proof,
            &root,
            &old_nullifier_hash,
            &statement.public_inputs(),
        )
        .map_err(rejected("send"))?;
        self.ensure_capacity().map_err(rejected("send"))?;

        self.nullifiers.mark_spent(old_nullifier_hash, self.sequence)?;
        let leaf_index = self.append(new_commitment)?;
        self.sequence += 1;
        self.events.push(VaultEvent::Withdrawal {
            nullifier_hash: old_nullifier_hash,
        });
        self.events.push(VaultEvent::Deposit {
            commitment: new_commitment,
            leaf_index,
        });

        info!(
            "send spent {} into {} at leaf {}",
            old_nullifier_hash, new_commitment, leaf_index
        );
        Ok(leaf_index)
    }

    /// spend one commitment and release its asset to `caller`
    pub fn withdraw(
        &mut self,
        caller: &AccountId,
        proof: &Proof,
        root: Root,
        nullifier_hash: NullifierHash,
        token_id: TokenId,
        token_contract: TokenContract,
    ) -> Result<()> {
        let asset = Asset::new(token_contract, token_id);
        let statement = WithdrawStatement {
            root,
            nullifier_hash,
            asset,
        };
        self.check_spend(
            CircuitId::Withdraw,
            proof,
            &root,
            &nullifier_hash,
            &statement.public_inputs(),
        )
        .map_err(rejected("withdraw"))?;

        // last fallible step; the nullifier was checked unspent above
        self.custody
            .release_custody(&asset, caller)
            .map_err(VaultError::from)
            .map_err(rejected("withdraw"))?;
        self.nullifiers.mark_spent(nullifier_hash, self.sequence)?;
        self.sequence += 1;
        self.events.push(VaultEvent::Withdrawal { nullifier_hash });

        info!("withdraw {} released {} to {}", nullifier_hash, asset, caller);
        Ok(())
    }

    /// run one recorded call
    pub fn execute(&mut self, call: VaultCall) -> Result<Outcome> {
        match call {
            VaultCall::Deposit {
                caller,
                commitment,
                token_id,
                token_contract,
            } => self
                .deposit(&caller, commitment, token_id, token_contract)
                .map(|leaf_index| Outcome::Deposited { leaf_index }),
            VaultCall::Send {
                proof,
                root,
                old_nullifier_hash,
                new_commitment,
            } => self
                .send(&proof, root, old_nullifier_hash, new_commitment)
                .map(|leaf_index| Outcome::Sent { leaf_index }),
            VaultCall::Withdraw {
                caller,
                proof,
                root,
                nullifier_hash,
                token_id,
                token_contract,
            } => self
                .withdraw(&caller, &proof, root, nullifier_hash, token_id, token_contract)
                .map(|()| Outcome::Withdrawn),
        }
    }

    fn ensure_capacity(&self) -> Result<()> {
        if self.tree.is_full() {
            return Err(VaultError::TreeFull {
                capacity: self.tree.capacity(),
            });
        }
        Ok(())
    }

    /// append after `ensure_capacity`; the accumulator only fails when full
    fn append(&mut self, commitment: Commitment) -> Result<LeafIndex> {
        let capacity = self.tree.capacity();
        self.tree
            .append(commitment)
            .map_err(|_| VaultError::TreeFull { capacity })
    }

    fn check_spend(
        &self,
        circuit: CircuitId,
        proof: &Proof,
        root: &Root,
        nullifier_hash: &NullifierHash,
        public_inputs: &[Fr],
    ) -> Result<()> {
        self.nullifiers.ensure_unspent(nullifier_hash)?;
        if !self.tree.is_known_root(root) {
            return Err(VaultError::StaleOrUnknownRoot(*root));
        }
        debug!("verifying {} proof against root {}", circuit, root);
        if !self.verifier.verify(circuit, proof, public_inputs) {
            return Err(VaultError::ProofRejected(circuit));
        }
        Ok(())
    }

    pub fn is_known_root(&self, root: &Root) -> bool {
        self.tree.is_known_root(root)
    }

    pub fn is_spent(&self, nullifier_hash: &NullifierHash) -> bool {
        self.nullifiers.is_spent(nullifier_hash)
    }

    pub fn root(&self) -> Root {
        self.tree.root()
    }

    pub fn recent_roots(&self) -> impl Iterator<Item = Root> + '_ {
        self.tree.recent_roots()
    }

    pub fn leaf_count(&self) -> u64 {
        self.tree.len()
    }

    /// committed transitions so far
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    pub fn events(&self) -> &[VaultEvent] {
        &self.events
    }

    /// events from position `cursor` onwards, for incremental readers
    pub fn events_since(&self, cursor: usize) -> &[VaultEvent] {
        self.events.get(cursor..).unwrap_or(&[])
    }

    pub fn config(&self) -> &VaultConfig {
        &self.config
    }

    pub fn nullifiers(&self) -> &NullifierRegistry {
        &self.nullifiers
    }

    pub fn verifier(&self) -> &V {
        &self.verifier
    }

    pub fn custody(&self) -> &C {
        &self.custody
    }

    /// direct access to the custody backend, e.g. to mint or approve in tests
    pub fn custody_mut(&mut self) -> &mut C {
        &mut self.custody
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::custody::NftLedger;

    /// accepts any proof whose first byte is 1
    struct Flag;

    impl ProofVerifier for Flag {
        fn verify(&self, _: CircuitId, proof: &Proof, _: &[Fr]) -> bool {
            proof.as_bytes().first() == Some(&1)
        }
    }

    fn ok() -> Proof {
        Proof(vec![1])
    }

    fn bad() -> Proof {
        Proof(vec![0])
    }

    fn asset(id: u64) -> Asset {
        Asset::new(TokenContract(Fr::from_u64(0xc0)), TokenId(Fr::from_u64(id)))
    }

    fn setup(height: u8, window: usize) -> (Vault<Flag, NftLedger>, AccountId) {
        let alice = AccountId::from_label("alice");
        let vault_account = AccountId::from_label("vault");
        let mut ledger = NftLedger::new(vault_account);
        for id in 0..4 {
            ledger.mint(asset(id), alice).unwrap();
            ledger.approve(&alice, &asset(id), vault_account).unwrap();
        }
        let config = VaultConfig {
            tree_height: height,
            root_history_size: window,
        };
        (Vault::new(config, Flag, ledger).unwrap(), alice)
    }

    fn deposit(vault: &mut Vault<Flag, NftLedger>, who: &AccountId, id: u64) -> Result<LeafIndex> {
        let a = asset(id);
        vault.deposit(who, Commitment(Fr::from_u64(100 + id)), a.token_id, a.token_contract)
    }

    #[test]
    fn test_check_order_spent_before_root() {
        let (mut vault, alice) = setup(4, 30);
        deposit(&mut vault, &alice, 0).unwrap();
        let root = vault.root();
        let nh = NullifierHash(Fr::from_u64(7));
        vault
            .send(&ok(), root, nh, Commitment(Fr::from_u64(1)))
            .unwrap();

        // spent wins over unknown root and bad proof
        let unknown = Root(Fr::from_u64(12345));
        assert_eq!(
            vault.send(&bad(), unknown, nh, Commitment(Fr::from_u64(2))),
            Err(VaultError::AlreadySpent(nh))
        );
        // unknown root wins over bad proof
        let fresh = NullifierHash(Fr::from_u64(8));
        assert_eq!(
            vault.send(&bad(), unknown, fresh, Commitment(Fr::from_u64(2))),
            Err(VaultError::StaleOrUnknownRoot(unknown))
        );
        assert_eq!(
            vault.send(&bad(), vault.root(), fresh, Commitment(Fr::from_u64(2))),
            Err(VaultError::ProofRejected(CircuitId::Send))
        );
    }

    #[test]
    fn test_rejected_send_leaves_no_trace() {
        let (mut vault, alice) = setup(1, 30);
        deposit(&mut vault, &alice, 0).unwrap();
        deposit(&mut vault, &alice, 1).unwrap();
        let root = vault.root();
        let events = vault.events().len();
        let nh = NullifierHash(Fr::from_u64(7));

        assert_eq!(
            vault.send(&ok(), root, nh, Commitment(Fr::from_u64(1))),
            Err(VaultError::TreeFull { capacity: 2 })
        );
        assert!(!vault.is_spent(&nh));
        assert_eq!(vault.root(), root);
        assert_eq!(vault.events().len(), events);
        assert_eq!(vault.sequence(), 2);
    }

    #[test]
    fn test_execute_dispatches() {
        let (mut vault, alice) = setup(4, 30);
        let a = asset(2);
        let outcome = vault
            .execute(VaultCall::Deposit {
                caller: alice,
                commitment: Commitment(Fr::from_u64(9)),
                token_id: a.token_id,
                token_contract: a.token_contract,
            })
            .unwrap();
        assert_eq!(outcome, Outcome::Deposited { leaf_index: LeafIndex(0) });

        let outcome = vault
            .execute(VaultCall::Withdraw {
                caller: alice,
                proof: ok(),
                root: vault.root(),
                nullifier_hash: NullifierHash(Fr::from_u64(3)),
                token_id: a.token_id,
                token_contract: a.token_contract,
            })
            .unwrap();
        assert_eq!(outcome, Outcome::Withdrawn);
        assert_eq!(vault.custody().owner_of(&a), Some(alice));
        assert_eq!(vault.events_since(1).len(), 1);
        assert!(vault.events_since(5).is_empty());
    }

    #[test]
    fn test_send_changing_asset_rejected() {
        use crate::prover::SendWitness;
        use crate::transparent::{encode_unchecked_send, TransparentSetup};
        use cloakroom_primitives::Note;
        use cloakroom_tree::CommitmentIndex;

        let setup = TransparentSetup::from_seed(b"vault", 4);
        let alice = AccountId::from_label("alice");
        let vault_account = AccountId::from_label("vault");
        let nft = asset(1);
        let mut ledger = NftLedger::new(vault_account);
        ledger.mint(nft, alice).unwrap();
        ledger.approve(&alice, &nft, vault_account).unwrap();
        let config = VaultConfig {
            tree_height: 4,
            root_history_size: 30,
        };
        let mut vault = Vault::new(config, setup.verifier(), ledger).unwrap();

        let note = Note::new(Fr::from_u64(1), Fr::from_u64(2), nft);
        vault
            .deposit(&alice, note.commitment(), nft.token_id, nft.token_contract)
            .unwrap();
        let index = CommitmentIndex::from_commitments(4, [note.commitment()]).unwrap();

        // the new note claims a different token
        let witness = SendWitness {
            note,
            path: index.path(LeafIndex(0)).unwrap(),
            new_note: Note::new(Fr::from_u64(3), Fr::from_u64(4), asset(2)),
        };
        let statement = witness.statement();
        let proof = encode_unchecked_send(&setup, &witness);
        let root = vault.root();
        assert_eq!(statement.root, root);

        assert_eq!(
            vault.send(
                &proof,
                statement.root,
                statement.old_nullifier_hash,
                statement.new_commitment
            ),
            Err(VaultError::ProofRejected(CircuitId::Send))
        );
        assert!(!vault.is_spent(&note.nullifier_hash()));
        assert_eq!(vault.root(), root);
        assert_eq!(vault.leaf_count(), 1);
        assert_eq!(vault.events().len(), 1);
    }
}
