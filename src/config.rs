//! Wallet configuration - identity and behavior knobs chosen by the host

use crate::core::identifiers::{CACTUS_NAMESPACE, FEATURE_VERSION};
use crate::error::{WalletError, WalletResult};
use base64::Engine;

const ICON_PREFIXES: &[&str] = &[
    "data:image/svg+xml;base64,",
    "data:image/webp;base64,",
    "data:image/png;base64,",
    "data:image/gif;base64,",
];

const DEFAULT_ICON_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="108" height="108" viewBox="0 0 108 108"><rect width="108" height="108" rx="24" fill="#1f7a4d"/><path d="M48 88V30a6 6 0 0 1 12 0v58zM36 62V46a5 5 0 0 1 10 0v12h2v8H40a4 4 0 0 1-4-4zm36-8V42a5 5 0 0 1 10 0v14a4 4 0 0 1-4 4h-8v-8h2z" fill="#e8f5e9"/></svg>"##;

/// Wallet icon as a `data:` URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalletIcon(String);

impl WalletIcon {
    pub fn from_svg(svg: &str) -> Self {
        let encoded = base64::engine::general_purpose::STANDARD.encode(svg.as_bytes());
        Self(format!("{}{}", ICON_PREFIXES[0], encoded))
    }

    pub fn from_data_uri(uri: impl Into<String>) -> WalletResult<Self> {
        let uri = uri.into();
        let Some(prefix) = ICON_PREFIXES.iter().find(|p| uri.starts_with(*p)) else {
            return Err(WalletError::NotSupported(format!("icon must be a base64 image data URI: {uri:.32}")));
        };
        base64::engine::general_purpose::STANDARD
            .decode(&uri[prefix.len()..])
            .map_err(|e| WalletError::NotSupported(format!("icon base64: {e}")))?;
        Ok(Self(uri))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for WalletIcon {
    fn default() -> Self {
        Self::from_svg(DEFAULT_ICON_SVG)
    }
}

/// What `disconnect` does to the tracked account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisconnectPolicy {
    /// Leave the account until the provider emits `disconnect`.
    #[default]
    AwaitEvent,
    /// Clear the account (and notify) as soon as the provider call resolves.
    ClearImmediately,
}

impl DisconnectPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            DisconnectPolicy::AwaitEvent => "await-event",
            DisconnectPolicy::ClearImmediately => "clear-immediately",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "await-event" | "event" => Some(DisconnectPolicy::AwaitEvent),
            "clear-immediately" | "clear" | "immediate" => Some(DisconnectPolicy::ClearImmediately),
            _ => None,
        }
    }
}

/// Wallet configuration. Hosts construct this before wrapping a provider.
#[derive(Debug, Clone)]
pub struct WalletConfig {
    pub name: String,
    pub icon: WalletIcon,
    pub version: String,
    /// Feature identifier under which the raw provider is exposed.
    pub namespace: String,
    pub disconnect_policy: DisconnectPolicy,
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            name: "Cactus".into(),
            icon: WalletIcon::default(),
            version: FEATURE_VERSION.into(),
            namespace: CACTUS_NAMESPACE.into(),
            disconnect_policy: DisconnectPolicy::default(),
        }
    }
}

impl WalletConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), ..Default::default() }
    }
    pub fn with_icon(mut self, icon: WalletIcon) -> Self { self.icon = icon; self }
    pub fn with_version(mut self, v: impl Into<String>) -> Self { self.version = v.into(); self }
    pub fn with_namespace(mut self, ns: impl Into<String>) -> Self { self.namespace = ns.into(); self }
    pub fn with_disconnect_policy(mut self, policy: DisconnectPolicy) -> Self { self.disconnect_policy = policy; self }
}
