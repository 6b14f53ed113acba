//! Signing Tests: validation, batching and response mapping
//!
//! These tests verify:
//! 1. Local validation fails before any provider round trip
//! 2. Transactions keep their encoding family through signing
//! 3. Provider failures are wrapped with their message and source
//! 4. Sign-in forwards inputs without local validation

mod common;

use cactus_standard::{
    Account, Commitment, ConnectInput, ProviderError, PublicKey, SendOptions, SignAndSendTransactionInput,
    SignInInput, SignMessageInput, SignTransactionInput, StandardWallet, Transaction, TransactionExt, TransactionVersion,
    WalletError,
};
use common::{legacy_transaction, signed_slots, v0_transaction, MockProvider, KEY_A, SIGNATURE};
use std::rc::Rc;

async fn connected() -> (Rc<MockProvider>, StandardWallet<MockProvider>, Rc<Account>) {
    let provider = MockProvider::new();
    let wallet = StandardWallet::new(Rc::clone(&provider));
    let output = wallet.features().connect.connect(ConnectInput::default()).await.expect("connect");
    let account = Rc::clone(&output.accounts[0]);
    (provider, wallet, account)
}

fn sign_input(account: &Rc<Account>, transaction: Vec<u8>, chain: Option<&str>) -> SignTransactionInput {
    SignTransactionInput { account: Rc::clone(account), transaction, chain: chain.map(String::from) }
}

fn send_input(account: &Rc<Account>, chain: &str, options: Option<SendOptions>) -> SignAndSendTransactionInput {
    SignAndSendTransactionInput {
        account: Rc::clone(account),
        transaction: legacy_transaction(),
        chain: chain.to_string(),
        options,
    }
}

/// Test: Every signing capability refuses to run without an account
#[tokio::test]
async fn signing_requires_connection() {
    let provider = MockProvider::new();
    let wallet = StandardWallet::new(Rc::clone(&provider));
    let stranger = Rc::new(Account::new(PublicKey::new(KEY_A)));
    let features = wallet.features();

    let err = features
        .sign_message
        .sign_message(vec![SignMessageInput { account: Rc::clone(&stranger), message: vec![1, 2, 3] }])
        .await
        .expect_err("not connected");
    assert!(matches!(err, WalletError::NotConnected));

    let err = features
        .sign_transaction
        .sign_transaction(vec![sign_input(&stranger, legacy_transaction(), None)])
        .await
        .expect_err("not connected");
    assert!(matches!(err, WalletError::NotConnected));

    let err = features
        .sign_and_send_transaction
        .sign_and_send_transaction(vec![send_input(&stranger, "solana:mainnet", None)])
        .await
        .expect_err("not connected");
    assert!(matches!(err, WalletError::NotConnected));
    assert!(err.is_validation());

    assert!(provider.calls().is_empty());
}

/// Test: An equal-looking account that is not the tracked one is rejected
#[tokio::test]
async fn foreign_account_is_invalid() {
    let (provider, wallet, account) = connected().await;
    let lookalike = Rc::new(Account::new(PublicKey::new(KEY_A)));
    assert_eq!(lookalike.address(), account.address());
    let features = wallet.features();

    let err = features
        .sign_message
        .sign_message(vec![SignMessageInput { account: Rc::clone(&lookalike), message: vec![1] }])
        .await
        .expect_err("invalid account");
    assert!(matches!(err, WalletError::InvalidAccount));

    let err = features
        .sign_transaction
        .sign_transaction(vec![sign_input(&lookalike, legacy_transaction(), None)])
        .await
        .expect_err("invalid account");
    assert!(matches!(err, WalletError::InvalidAccount));

    // Second item of a batch: nothing is signed
    let err = features
        .sign_transaction
        .sign_transaction(vec![
            sign_input(&account, legacy_transaction(), None),
            sign_input(&lookalike, v0_transaction(), None),
        ])
        .await
        .expect_err("invalid account");
    assert!(matches!(err, WalletError::InvalidAccount));

    let err = features
        .sign_and_send_transaction
        .sign_and_send_transaction(vec![send_input(&lookalike, "solana:mainnet", None)])
        .await
        .expect_err("invalid account");
    assert!(matches!(err, WalletError::InvalidAccount));
    assert!(err.is_validation());

    assert_eq!(provider.calls(), vec!["connect"]);
}

/// Test: Chains outside the solana set are rejected
#[tokio::test]
async fn unknown_chain_is_invalid() {
    let (provider, wallet, account) = connected().await;

    let err = wallet
        .features()
        .sign_transaction
        .sign_transaction(vec![sign_input(&account, legacy_transaction(), Some("ethereum:1"))])
        .await
        .expect_err("invalid chain");
    assert!(matches!(err, WalletError::InvalidChain(ref chain) if chain == "ethereum:1"));

    let err = wallet
        .features()
        .sign_and_send_transaction
        .sign_and_send_transaction(vec![send_input(&account, "solana:nowhere", None)])
        .await
        .expect_err("invalid chain");
    assert!(matches!(err, WalletError::InvalidChain(_)));
    assert_eq!(provider.calls(), vec!["connect"]);
}

/// Test: A batch naming two chains fails before the provider is called
#[tokio::test]
async fn conflicting_chains_fail_before_provider() {
    let (provider, wallet, account) = connected().await;

    let err = wallet
        .features()
        .sign_transaction
        .sign_transaction(vec![
            sign_input(&account, legacy_transaction(), Some("solana:mainnet")),
            sign_input(&account, legacy_transaction(), None),
            sign_input(&account, v0_transaction(), Some("solana:devnet")),
        ])
        .await
        .expect_err("conflicting chain");
    match err {
        WalletError::ConflictingChain { first, second } => {
            assert_eq!(first, "solana:mainnet");
            assert_eq!(second, "solana:devnet");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(provider.calls(), vec!["connect"]);
}

/// Test: A single transaction is signed alone and keeps its family
#[tokio::test]
async fn single_transaction_keeps_family() {
    let (provider, wallet, account) = connected().await;
    let feature = &wallet.features().sign_transaction;

    for (bytes, version) in [(legacy_transaction(), TransactionVersion::Legacy), (v0_transaction(), TransactionVersion::V0)] {
        let outputs = feature
            .sign_transaction(vec![sign_input(&account, bytes, Some("solana:devnet"))])
            .await
            .expect("sign");
        assert_eq!(outputs.len(), 1);
        let signed = Transaction::decode(&outputs[0].signed_transaction).expect("decode");
        assert_eq!(signed.transaction_version(), version);
        assert_eq!(signed.signatures, signed_slots());
    }
    assert_eq!(provider.calls(), vec!["connect", "signTransaction", "signTransaction"]);
}

/// Test: Several transactions go to the provider as one batch, in order
#[tokio::test]
async fn mixed_batch_is_signed_together_in_order() -> anyhow::Result<()> {
    let (provider, wallet, account) = connected().await;

    let outputs = wallet
        .features()
        .sign_transaction
        .sign_transaction(vec![
            sign_input(&account, legacy_transaction(), Some("solana:mainnet")),
            sign_input(&account, v0_transaction(), Some("solana:mainnet")),
            sign_input(&account, legacy_transaction(), None),
        ])
        .await?;

    let mut versions = Vec::new();
    for output in &outputs {
        let signed = Transaction::decode(&output.signed_transaction)?;
        assert_eq!(signed.signatures, signed_slots());
        versions.push(signed.transaction_version());
    }
    assert_eq!(versions, vec![TransactionVersion::Legacy, TransactionVersion::V0, TransactionVersion::Legacy]);
    assert_eq!(provider.calls(), vec!["connect", "signAllTransactions:3"]);
    Ok(())
}

/// Test: An empty batch is an empty answer
#[tokio::test]
async fn empty_batch_is_empty() {
    let (provider, wallet, _account) = connected().await;
    let outputs = wallet.features().sign_transaction.sign_transaction(Vec::new()).await.expect("empty");
    assert!(outputs.is_empty());
    assert_eq!(provider.calls(), vec!["connect"]);
}

/// Test: Undecodable payloads fail locally
#[tokio::test]
async fn malformed_transaction_is_rejected() {
    let (provider, wallet, account) = connected().await;
    let err = wallet
        .features()
        .sign_transaction
        .sign_transaction(vec![sign_input(&account, vec![1, 2], None)])
        .await
        .expect_err("malformed");
    assert!(matches!(err, WalletError::Transaction(_)));
    assert_eq!(provider.calls(), vec!["connect"]);
}

/// Test: Provider rejection is wrapped with its message and kept as source
#[tokio::test]
async fn sign_transaction_failure_is_wrapped() {
    let (provider, wallet, account) = connected().await;
    provider.fail("signTransaction", ProviderError::new("User rejected the request.").with_code(4001));

    let err = wallet
        .features()
        .sign_transaction
        .sign_transaction(vec![sign_input(&account, legacy_transaction(), None)])
        .await
        .expect_err("rejected");
    let source = std::error::Error::source(&err).expect("source").to_string();
    match err {
        WalletError::SignTransaction { message, source: provider_error } => {
            assert_eq!(message, "User rejected the request.");
            assert_eq!(provider_error.code, Some(4001));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(source, "User rejected the request.");
}

/// Test: Messages are echoed back next to their signatures, in order
#[tokio::test]
async fn sign_message_echoes_input() {
    let (provider, wallet, account) = connected().await;

    let outputs = wallet
        .features()
        .sign_message
        .sign_message(vec![
            SignMessageInput { account: Rc::clone(&account), message: vec![1, 2, 3] },
            SignMessageInput { account: Rc::clone(&account), message: b"hello".to_vec() },
        ])
        .await
        .expect("sign message");

    assert_eq!(outputs[0].signed_message, vec![1, 2, 3]);
    assert_eq!(outputs[0].signature, vec![9, 9, 9]);
    assert_eq!(outputs[1].signed_message, b"hello".to_vec());
    assert_eq!(provider.calls(), vec!["connect", "signMessage", "signMessage"]);
}

/// Test: Message signing failure carries the provider message
#[tokio::test]
async fn sign_message_failure_is_wrapped() {
    let (provider, wallet, account) = connected().await;
    provider.fail("signMessage", ProviderError::new("locked"));

    let err = wallet
        .features()
        .sign_message
        .sign_message(vec![SignMessageInput { account, message: vec![1] }])
        .await
        .expect_err("locked");
    assert!(matches!(err, WalletError::SignMessage { ref message, .. } if message == "locked"));
    assert_eq!(err.to_string(), "sign message failed: locked");
}

/// Test: Sign-and-send decodes the base58 signature and forwards options
#[tokio::test]
async fn sign_and_send_decodes_signature() -> anyhow::Result<()> {
    let (provider, wallet, account) = connected().await;
    let options = SendOptions {
        preflight_commitment: Some(Commitment::Confirmed),
        skip_preflight: Some(true),
        ..Default::default()
    };

    let outputs = wallet
        .features()
        .sign_and_send_transaction
        .sign_and_send_transaction(vec![
            send_input(&account, "solana:mainnet", Some(options)),
            send_input(&account, "solana:devnet", None),
        ])
        .await?;

    assert_eq!(outputs.len(), 2);
    assert_eq!(outputs[0].signature, SIGNATURE.to_vec());
    assert_eq!(provider.send_options(), vec![Some(options), None]);
    assert_eq!(provider.calls(), vec!["connect", "signAndSendTransaction", "signAndSendTransaction"]);
    Ok(())
}

/// Test: A signature that is not base58 is an encoding error
#[tokio::test]
async fn sign_and_send_rejects_bad_signature() {
    let (provider, wallet, account) = connected().await;
    provider.set_send_signature("0OIl");

    let err = wallet
        .features()
        .sign_and_send_transaction
        .sign_and_send_transaction(vec![send_input(&account, "solana:mainnet", None)])
        .await
        .expect_err("bad encoding");
    assert!(matches!(err, WalletError::SignatureEncoding(_)));
}

/// Test: A failing item stops the sequence; later items are never sent
#[tokio::test]
async fn sign_and_send_stops_at_first_failure() {
    let (provider, wallet, account) = connected().await;
    provider.fail("signAndSendTransaction", ProviderError::new("blockhash expired"));

    let err = wallet
        .features()
        .sign_and_send_transaction
        .sign_and_send_transaction(vec![
            send_input(&account, "solana:mainnet", None),
            send_input(&account, "solana:mainnet", None),
        ])
        .await
        .expect_err("expired");
    assert!(matches!(err, WalletError::SignTransaction { .. }));
    assert_eq!(provider.calls(), vec!["connect", "signAndSendTransaction"]);
}

/// Test: Zero or one sign-in input is one call; more are one call each
#[tokio::test]
async fn sign_in_forwards_inputs() {
    let provider = MockProvider::new();
    let wallet = StandardWallet::new(Rc::clone(&provider));
    let feature = &wallet.features().sign_in;

    let outputs = feature.sign_in(Vec::new()).await.expect("sign in");
    assert_eq!(outputs.len(), 1);
    assert_eq!(outputs[0].account.address, PublicKey::new(KEY_A).to_base58());

    let input = SignInInput { statement: Some("Sign in to Example".into()), ..Default::default() };
    let outputs = feature.sign_in(vec![input.clone()]).await.expect("sign in");
    assert_eq!(outputs[0].signed_message, b"Sign in to Example".to_vec());

    let outputs = feature
        .sign_in(vec![input.clone(), SignInInput::default()])
        .await
        .expect("sign in");
    assert_eq!(outputs.len(), 2);

    assert_eq!(
        provider.sign_in_inputs(),
        vec![None, Some(input.clone()), Some(input), Some(SignInInput::default())]
    );
}

/// Test: Sign-in failure keeps the provider error as source
#[tokio::test]
async fn sign_in_failure_is_wrapped() {
    let provider = MockProvider::new();
    provider.fail("signIn", ProviderError::new("domain mismatch"));
    let wallet = StandardWallet::new(Rc::clone(&provider));

    let err = wallet.features().sign_in.sign_in(Vec::new()).await.expect_err("mismatch");
    assert!(matches!(err, WalletError::SignIn(ref source) if source.message == "domain mismatch"));
}
