//! Account - one connected identity, and the change detector that decides
//! when a provider key amounts to a new account.
//!
//! An [`Account`] is immutable and shared as `Rc<Account>`. Callers compare
//! accounts by allocation (`Rc::ptr_eq`): [`evaluate`] hands back the same
//! `Rc` whenever the provider key still matches, so pointer equality is a
//! cheap "did anything change" check.

use crate::core::chain::Chain;
use crate::core::identifiers::solana;
use crate::error::{WalletError, WalletResult};
use serde::{Serialize, Serializer};
use solana_pubkey::Pubkey;
use std::rc::Rc;
use std::str::FromStr;

/// Ed25519 public key backed by the SDK [`Pubkey`]. Text form is base58.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PublicKey(Pubkey);

impl PublicKey {
    pub const LEN: usize = 32;

    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(Pubkey::new_from_array(bytes))
    }

    pub fn from_slice(bytes: &[u8]) -> WalletResult<Self> {
        let bytes: [u8; 32] = bytes
            .try_into()
            .map_err(|_| WalletError::PublicKey(format!("expected {} bytes, got {}", Self::LEN, bytes.len())))?;
        Ok(Self::new(bytes))
    }

    pub fn from_base58(value: &str) -> WalletResult<Self> {
        let key = Pubkey::from_str(value).map_err(|e| WalletError::PublicKey(format!("base58: {e}")))?;
        Ok(Self(key))
    }

    pub fn to_base58(&self) -> String {
        self.0.to_string()
    }

    pub fn to_bytes(&self) -> [u8; 32] {
        self.0.to_bytes()
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_ref()
    }

    pub fn pubkey(&self) -> Pubkey {
        self.0
    }
}

impl From<Pubkey> for PublicKey {
    fn from(key: Pubkey) -> Self {
        Self(key)
    }
}

impl std::fmt::Display for PublicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_base58())
    }
}

impl std::fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PublicKey({})", self.to_base58())
    }
}

impl FromStr for PublicKey {
    type Err = WalletError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_base58(s)
    }
}

/// A connected identity: base58 address plus the raw key it encodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    address: String,
    #[serde(serialize_with = "serialize_key_bytes")]
    public_key: PublicKey,
    chains: Vec<Chain>,
    features: Vec<&'static str>,
}

fn serialize_key_bytes<S: Serializer>(key: &PublicKey, serializer: S) -> Result<S::Ok, S::Error> {
    key.as_bytes().serialize(serializer)
}

impl Account {
    pub fn new(public_key: PublicKey) -> Self {
        Self {
            address: public_key.to_base58(),
            public_key,
            chains: Chain::ALL.to_vec(),
            features: solana::ACCOUNT_FEATURES.to_vec(),
        }
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn public_key(&self) -> &[u8] {
        self.public_key.as_bytes()
    }

    pub fn key(&self) -> PublicKey {
        self.public_key
    }

    pub fn chains(&self) -> &[Chain] {
        &self.chains
    }

    pub fn features(&self) -> &[&'static str] {
        &self.features
    }

    fn matches(&self, address: &str, public_key: &PublicKey) -> bool {
        self.address == address && self.public_key.as_bytes() == public_key.as_bytes()
    }
}

/// Outcome of comparing the tracked account with the provider's key.
#[derive(Debug, Clone)]
pub struct Evaluation {
    pub next: Option<Rc<Account>>,
    pub changed: bool,
}

/// Decide the next account slot from the current one and the provider key.
///
/// - no key: the slot empties, and it is a change only if an account was held.
/// - key present: a change when nothing was held or the address or key bytes
///   differ. An unchanged key returns the *same* `Rc`.
pub fn evaluate(current: Option<&Rc<Account>>, provider_key: Option<&PublicKey>) -> Evaluation {
    let Some(key) = provider_key else {
        return Evaluation { next: None, changed: current.is_some() };
    };

    let address = key.to_base58();
    match current {
        Some(account) if account.matches(&address, key) => {
            Evaluation { next: Some(Rc::clone(account)), changed: false }
        }
        _ => Evaluation { next: Some(Rc::new(Account::new(*key))), changed: true },
    }
}
