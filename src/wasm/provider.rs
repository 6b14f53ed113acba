//! Injected provider - the browser wallet object behind [`Provider`]
//!
//! The extension injects an object at `window.<key>`. Methods are looked up
//! with `Reflect`, promises awaited with `JsFuture`. Transactions cross the
//! boundary as wire bytes: the host supplies a function turning bytes into
//! the JS transaction type the extension expects, and results come back
//! through that object's own `serialize()`.

use super::log;
use crate::account::PublicKey;
use crate::provider::{
    ConnectOptions, Provider, ProviderError, ProviderEvent, ProviderListener, ProviderResult, SendOptions,
    SignAndSendResponse, SignInAccount, SignInInput, SignInOutput, SignMessageResponse,
};
use crate::transaction::{Transaction, TransactionExt};
use async_trait::async_trait;
use js_sys::{Array, Function, Object, Promise, Reflect, Uint8Array};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;

/// Default injection key.
pub const CACTUS_KEY: &str = "cactus";

struct Subscription {
    event: ProviderEvent,
    listener: ProviderListener,
    closure: Closure<dyn Fn()>,
}

pub struct InjectedProvider {
    object: Object,
    deserialize: Function,
    subscriptions: RefCell<Vec<Subscription>>,
}

impl InjectedProvider {
    /// Look for the provider at `window.<key>`. The object must flag itself
    /// with `isCactusWallet`.
    pub fn detect(key: &str, deserialize: Function) -> Option<Rc<Self>> {
        let window = web_sys::window()?;
        let value = Reflect::get(&window, &JsValue::from_str(key)).ok()?;
        if value.is_undefined() || value.is_null() {
            return None;
        }
        let flagged = Reflect::get(&value, &JsValue::from_str("isCactusWallet"))
            .map(|v| v.is_truthy())
            .unwrap_or(false);
        if !flagged {
            return None;
        }
        let object = value.dyn_into::<Object>().ok()?;
        log!("provider detected at window.{key}");
        Some(Rc::new(Self::new(object, deserialize)))
    }

    pub fn new(object: Object, deserialize: Function) -> Self {
        Self { object, deserialize, subscriptions: RefCell::new(Vec::new()) }
    }

    async fn call(&self, method: &str, args: &[JsValue]) -> ProviderResult<JsValue> {
        let function = Reflect::get(&self.object, &JsValue::from_str(method))
            .map_err(provider_error)?
            .dyn_into::<Function>()
            .map_err(|_| ProviderError::new(format!("provider method {method} is not a function")))?;
        let result = function
            .apply(&self.object, &args.iter().collect::<Array>())
            .map_err(provider_error)?;
        if result.has_type::<Promise>() {
            JsFuture::from(Promise::from(result)).await.map_err(provider_error)
        } else {
            Ok(result)
        }
    }

    fn call_sync(&self, method: &str, args: &[JsValue]) -> Result<JsValue, JsValue> {
        let function = Reflect::get(&self.object, &JsValue::from_str(method))?.dyn_into::<Function>()?;
        function.apply(&self.object, &args.iter().collect::<Array>())
    }

    fn to_js_transaction(&self, transaction: &Transaction) -> ProviderResult<JsValue> {
        let bytes = transaction
            .encode()
            .map_err(|e| ProviderError::new(format!("transaction encoding: {e}")))?;
        self.deserialize
            .call1(&JsValue::NULL, &Uint8Array::from(bytes.as_slice()))
            .map_err(provider_error)
    }
}

#[async_trait(?Send)]
impl Provider for InjectedProvider {
    fn public_key(&self) -> Option<PublicKey> {
        let value = Reflect::get(&self.object, &JsValue::from_str("publicKey")).ok()?;
        public_key_from_js(&value).ok()
    }

    async fn connect(&self, options: Option<ConnectOptions>) -> ProviderResult<PublicKey> {
        let args = match options {
            Some(options) => vec![to_js(&options)?],
            None => Vec::new(),
        };
        let result = self.call("connect", &args).await?;
        public_key_from_js(&get(&result, "publicKey")?)
    }

    async fn disconnect(&self) -> ProviderResult<()> {
        self.call("disconnect", &[]).await.map(|_| ())
    }

    async fn sign_transaction(&self, transaction: Transaction) -> ProviderResult<Transaction> {
        let js = self.to_js_transaction(&transaction)?;
        let signed = self.call("signTransaction", &[js]).await?;
        transaction_from_js(&signed)
    }

    async fn sign_all_transactions(&self, transactions: Vec<Transaction>) -> ProviderResult<Vec<Transaction>> {
        let batch = Array::new();
        for transaction in &transactions {
            batch.push(&self.to_js_transaction(transaction)?);
        }
        let signed = self.call("signAllTransactions", &[batch.into()]).await?;
        let signed = signed
            .dyn_into::<Array>()
            .map_err(|_| ProviderError::new("signAllTransactions did not return an array"))?;
        signed.iter().map(|tx| transaction_from_js(&tx)).collect()
    }

    async fn sign_and_send_transaction(
        &self,
        transaction: Transaction,
        options: Option<SendOptions>,
    ) -> ProviderResult<SignAndSendResponse> {
        let mut args = vec![self.to_js_transaction(&transaction)?];
        if let Some(options) = options {
            args.push(to_js(&options)?);
        }
        let result = self.call("signAndSendTransaction", &args).await?;
        let signature = get(&result, "signature")?
            .as_string()
            .ok_or_else(|| ProviderError::new("signature is not a string"))?;
        Ok(SignAndSendResponse { signature })
    }

    async fn sign_message(&self, message: &[u8]) -> ProviderResult<SignMessageResponse> {
        let result = self.call("signMessage", &[Uint8Array::from(message).into()]).await?;
        Ok(SignMessageResponse { signature: bytes_from_js(&get(&result, "signature")?) })
    }

    async fn sign_in(&self, input: Option<SignInInput>) -> ProviderResult<SignInOutput> {
        let args = match input {
            Some(input) => vec![to_js(&input)?],
            None => Vec::new(),
        };
        let result = self.call("signIn", &args).await?;
        let account = get(&result, "account")?;
        let public_key = get(&account, "publicKey")?;
        Ok(SignInOutput {
            account: SignInAccount {
                address: get(&account, "address")?.as_string().unwrap_or_default(),
                public_key: bytes_from_js(&public_key),
            },
            signed_message: bytes_from_js(&get(&result, "signedMessage")?),
            signature: bytes_from_js(&get(&result, "signature")?),
            signature_type: get(&result, "signatureType")?.as_string(),
        })
    }

    fn on(&self, event: ProviderEvent, listener: ProviderListener) {
        let callback = Rc::clone(&listener);
        let closure = Closure::<dyn Fn()>::new(move || callback());
        let name = JsValue::from_str(event.as_str());
        if let Err(e) = self.call_sync("on", &[name, closure.as_ref().clone()]) {
            tracing::warn!(event = event.as_str(), error = ?e, "provider.on failed");
            return;
        }
        self.subscriptions.borrow_mut().push(Subscription { event, listener, closure });
    }

    fn off(&self, event: ProviderEvent, listener: &ProviderListener) {
        let removed = {
            let mut subscriptions = self.subscriptions.borrow_mut();
            let index = subscriptions
                .iter()
                .position(|s| s.event == event && Rc::ptr_eq(&s.listener, listener));
            index.map(|i| subscriptions.remove(i))
        };
        if let Some(subscription) = removed {
            let name = JsValue::from_str(event.as_str());
            if let Err(e) = self.call_sync("off", &[name, subscription.closure.as_ref().clone()]) {
                tracing::warn!(event = event.as_str(), error = ?e, "provider.off failed");
            }
        }
    }
}

fn provider_error(value: JsValue) -> ProviderError {
    let message = Reflect::get(&value, &JsValue::from_str("message"))
        .ok()
        .and_then(|m| m.as_string())
        .or_else(|| value.as_string())
        .unwrap_or_else(|| format!("{value:?}"));
    let code = Reflect::get(&value, &JsValue::from_str("code")).ok().and_then(|c| c.as_f64());
    let error = ProviderError::new(message);
    match code {
        Some(code) => error.with_code(code as i64),
        None => error,
    }
}

fn to_js<T: serde::Serialize>(value: &T) -> ProviderResult<JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(|e| ProviderError::new(e.to_string()))
}

fn get(target: &JsValue, key: &str) -> ProviderResult<JsValue> {
    Reflect::get(target, &JsValue::from_str(key)).map_err(provider_error)
}

fn bytes_from_js(value: &JsValue) -> Vec<u8> {
    Uint8Array::new(value).to_vec()
}

/// Accepts a web3 `PublicKey` (via `toBytes()`) or a raw byte array.
fn public_key_from_js(value: &JsValue) -> ProviderResult<PublicKey> {
    if value.is_undefined() || value.is_null() {
        return Err(ProviderError::new("no public key"));
    }
    let bytes = match Reflect::get(value, &JsValue::from_str("toBytes")).ok().and_then(|f| f.dyn_into::<Function>().ok()) {
        Some(to_bytes) => to_bytes.call0(value).map_err(provider_error)?,
        None => value.clone(),
    };
    PublicKey::from_slice(&bytes_from_js(&bytes)).map_err(|e| ProviderError::new(e.to_string()))
}

/// Signed transactions may be partially signed; skip the JS-side checks.
fn transaction_from_js(value: &JsValue) -> ProviderResult<Transaction> {
    let serialize = get(value, "serialize")?
        .dyn_into::<Function>()
        .map_err(|_| ProviderError::new("signed transaction has no serialize()"))?;
    let config = Object::new();
    Reflect::set(&config, &JsValue::from_str("requireAllSignatures"), &JsValue::FALSE).map_err(provider_error)?;
    Reflect::set(&config, &JsValue::from_str("verifySignatures"), &JsValue::FALSE).map_err(provider_error)?;
    let bytes = serialize.call1(value, &config).map_err(provider_error)?;
    Transaction::decode(&bytes_from_js(&bytes)).map_err(|e| ProviderError::new(format!("signed transaction: {e}")))
}
