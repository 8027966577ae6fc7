//! asset custody
//!
//! the vault never moves assets itself; it asks an [`AssetCustody`] backend
//! to pull an asset in on deposit and push it out on withdraw. [`NftLedger`]
//! is an in-memory erc-721 style backend: the owner approves the custodian
//! for one token, then the vault takes it.

use core::fmt;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use cloakroom_primitives::Asset;

use crate::error::CustodyError;

/// account identifier (32 bytes, hex encoded)
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccountId(#[serde(with = "hex::serde")] pub [u8; 32]);

impl AccountId {
    /// deterministic account derived from a human readable label
    pub fn from_label(label: &str) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(b"cloakroom.account.v1");
        hasher.update(label.as_bytes());
        Self(*hasher.finalize().as_bytes())
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AccountId(0x{}..)", hex::encode(&self.0[..4]))
    }
}

pub trait AssetCustody {
    /// move `asset` from `from` into vault custody
    fn take_custody(&mut self, from: &AccountId, asset: &Asset) -> Result<(), CustodyError>;

    /// move `asset` out of vault custody to `to`
    fn release_custody(&mut self, asset: &Asset, to: &AccountId) -> Result<(), CustodyError>;

    fn in_custody(&self, asset: &Asset) -> bool;
}

/// in-memory non-fungible token ledger
#[derive(Clone, Debug)]
pub struct NftLedger {
    custodian: AccountId,
    owners: HashMap<Asset, AccountId>,
    approvals: HashMap<Asset, AccountId>,
}

impl NftLedger {
    pub fn new(custodian: AccountId) -> Self {
        Self {
            custodian,
            owners: HashMap::new(),
            approvals: HashMap::new(),
        }
    }

    pub fn custodian(&self) -> AccountId {
        self.custodian
    }

    pub fn mint(&mut self, asset: Asset, owner: AccountId) -> Result<(), CustodyError> {
        if self.owners.contains_key(&asset) {
            return Err(CustodyError::AlreadyMinted(asset));
        }
        self.owners.insert(asset, owner);
        Ok(())
    }

    pub fn owner_of(&self, asset: &Asset) -> Option<AccountId> {
        self.owners.get(asset).copied()
    }

    pub fn approved(&self, asset: &Asset) -> Option<AccountId> {
        self.approvals.get(asset).copied()
    }

    /// `owner` lets `spender` move `asset` once
    pub fn approve(
        &mut self,
        owner: &AccountId,
        asset: &Asset,
        spender: AccountId,
    ) -> Result<(), CustodyError> {
        self.ensure_owner(asset, owner)?;
        self.approvals.insert(*asset, spender);
        Ok(())
    }

    fn ensure_owner(&self, asset: &Asset, account: &AccountId) -> Result<(), CustodyError> {
        match self.owners.get(asset) {
            None => Err(CustodyError::UnknownAsset(*asset)),
            Some(owner) if owner != account => Err(CustodyError::NotOwner {
                asset: *asset,
                account: *account,
            }),
            Some(_) => Ok(()),
        }
    }
}

impl AssetCustody for NftLedger {
    fn take_custody(&mut self, from: &AccountId, asset: &Asset) -> Result<(), CustodyError> {
        self.ensure_owner(asset, from)?;
        if self.approvals.get(asset) != Some(&self.custodian) {
            return Err(CustodyError::NotApproved(*asset));
        }
        self.approvals.remove(asset);
        self.owners.insert(*asset, self.custodian);
        Ok(())
    }

    fn release_custody(&mut self, asset: &Asset, to: &AccountId) -> Result<(), CustodyError> {
        if !self.in_custody(asset) {
            return Err(CustodyError::NotInCustody(*asset));
        }
        self.approvals.remove(asset);
        self.owners.insert(*asset, *to);
        Ok(())
    }

    fn in_custody(&self, asset: &Asset) -> bool {
        self.owners.get(asset) == Some(&self.custodian)
    }
}
