//! Signing dispatcher - validation, single/batch normalization and
//! provider round trips for every feature entry point.
//!
//! Batches that are not provider-batched run strictly in input order: item
//! `i + 1` is not issued until item `i` has resolved.

use super::state::WalletState;
use super::types::*;
use crate::account::Account;
use crate::config::DisconnectPolicy;
use crate::core::chain::is_solana_chain;
use crate::error::{WalletError, WalletResult};
use crate::provider::{ConnectOptions, Provider, ProviderError, SignInInput, SignInOutput};
use crate::transaction::{Transaction, TransactionExt};
use std::rc::Rc;

impl<P: Provider + 'static> WalletState<P> {
    pub(crate) async fn connect(&self, input: ConnectInput) -> WalletResult<ConnectOutput> {
        if self.account().is_none() {
            let options = input.silent.then_some(ConnectOptions { only_if_trusted: true });
            tracing::debug!(silent = input.silent, "provider connect");
            self.provider.connect(options).await.map_err(WalletError::Connection)?;
        }
        // The provider's own event may race its return value; resolve from its state
        self.connected();
        Ok(ConnectOutput { accounts: self.accounts() })
    }

    pub(crate) async fn disconnect(&self) -> WalletResult<()> {
        tracing::debug!("provider disconnect");
        self.provider.disconnect().await.map_err(WalletError::Disconnection)?;
        if self.config.disconnect_policy == DisconnectPolicy::ClearImmediately {
            self.disconnected();
        }
        Ok(())
    }

    pub(crate) async fn sign_and_send_transaction(
        &self,
        inputs: Vec<SignAndSendTransactionInput>,
    ) -> WalletResult<Vec<SignAndSendTransactionOutput>> {
        self.require_account()?;
        let mut outputs = Vec::with_capacity(inputs.len());
        for input in inputs {
            outputs.push(self.sign_and_send_one(input).await?);
        }
        Ok(outputs)
    }

    async fn sign_and_send_one(&self, input: SignAndSendTransactionInput) -> WalletResult<SignAndSendTransactionOutput> {
        let account = self.require_account()?;
        check_account(&account, &input.account)?;
        check_chain(&input.chain)?;

        let transaction = Transaction::decode(&input.transaction)?;
        tracing::debug!(version = ?transaction.transaction_version(), chain = %input.chain, "provider signAndSendTransaction");
        let response = self
            .provider
            .sign_and_send_transaction(transaction, input.options)
            .await
            .map_err(WalletError::sign_transaction)?;

        let signature = bs58::decode(&response.signature)
            .into_vec()
            .map_err(|e| WalletError::SignatureEncoding(e.to_string()))?;
        Ok(SignAndSendTransactionOutput { signature })
    }

    pub(crate) async fn sign_transaction(
        &self,
        inputs: Vec<SignTransactionInput>,
    ) -> WalletResult<Vec<SignTransactionOutput>> {
        let account = self.require_account()?;
        match inputs.len() {
            0 => Ok(Vec::new()),
            1 => {
                let input = &inputs[0];
                check_account(&account, &input.account)?;
                if let Some(chain) = &input.chain {
                    check_chain(chain)?;
                }
                let transaction = Transaction::decode(&input.transaction)?;
                tracing::debug!(version = ?transaction.transaction_version(), "provider signTransaction");
                let signed = self
                    .provider
                    .sign_transaction(transaction)
                    .await
                    .map_err(WalletError::sign_transaction)?;
                Ok(vec![SignTransactionOutput { signed_transaction: signed.encode()? }])
            }
            count => {
                let mut chain: Option<&str> = None;
                for input in &inputs {
                    check_account(&account, &input.account)?;
                    if let Some(next) = input.chain.as_deref() {
                        check_chain(next)?;
                        match chain {
                            Some(first) if first != next => {
                                tracing::warn!(first, second = next, "conflicting chain in batch");
                                return Err(WalletError::ConflictingChain { first: first.into(), second: next.into() });
                            }
                            Some(_) => {}
                            None => chain = Some(next),
                        }
                    }
                }

                let transactions = inputs
                    .iter()
                    .map(|input| Transaction::decode(&input.transaction))
                    .collect::<Result<Vec<_>, _>>()?;
                tracing::debug!(count, "provider signAllTransactions");
                let signed = self
                    .provider
                    .sign_all_transactions(transactions)
                    .await
                    .map_err(WalletError::sign_transaction)?;
                if signed.len() != count {
                    return Err(WalletError::sign_transaction(ProviderError::new(format!(
                        "expected {count} signed transactions, got {}",
                        signed.len()
                    ))));
                }

                // Each output keeps the family of its own signed transaction
                signed
                    .iter()
                    .map(|tx| -> WalletResult<SignTransactionOutput> {
                        Ok(SignTransactionOutput { signed_transaction: tx.encode()? })
                    })
                    .collect()
            }
        }
    }

    pub(crate) async fn sign_message(&self, inputs: Vec<SignMessageInput>) -> WalletResult<Vec<SignMessageOutput>> {
        self.require_account()?;
        let mut outputs = Vec::with_capacity(inputs.len());
        for input in inputs {
            let account = self.require_account()?;
            check_account(&account, &input.account)?;
            tracing::debug!(len = input.message.len(), "provider signMessage");
            let response = self
                .provider
                .sign_message(&input.message)
                .await
                .map_err(WalletError::sign_message)?;
            outputs.push(SignMessageOutput { signed_message: input.message, signature: response.signature });
        }
        Ok(outputs)
    }

    /// No local validation: the provider owns sign-in, challenge included.
    pub(crate) async fn sign_in(&self, inputs: Vec<SignInInput>) -> WalletResult<Vec<SignInOutput>> {
        if inputs.len() <= 1 {
            let input = inputs.into_iter().next();
            tracing::debug!(has_input = input.is_some(), "provider signIn");
            return Ok(vec![self.provider.sign_in(input).await.map_err(WalletError::SignIn)?]);
        }

        let mut outputs = Vec::with_capacity(inputs.len());
        for input in inputs {
            tracing::debug!("provider signIn");
            outputs.push(self.provider.sign_in(Some(input)).await.map_err(WalletError::SignIn)?);
        }
        Ok(outputs)
    }

    fn require_account(&self) -> WalletResult<Rc<Account>> {
        self.account().ok_or_else(|| {
            tracing::warn!("signing requested while not connected");
            WalletError::NotConnected
        })
    }
}

fn check_account(tracked: &Rc<Account>, given: &Rc<Account>) -> WalletResult<()> {
    if Rc::ptr_eq(tracked, given) {
        Ok(())
    } else {
        tracing::warn!(given = given.address(), "invalid account");
        Err(WalletError::InvalidAccount)
    }
}

fn check_chain(chain: &str) -> WalletResult<()> {
    if is_solana_chain(chain) {
        Ok(())
    } else {
        tracing::warn!(chain, "invalid chain");
        Err(WalletError::InvalidChain(chain.into()))
    }
}
