use once_cell::sync::Lazy;
use std::env;
use std::path::PathBuf;

use crate::infer::config::UpstreamConfig;

pub const DEFAULT_PORT: u16 = 3002;

pub static PORT: Lazy<u16> = Lazy::new(|| match env::var("PORT") {
    Ok(port) => port.trim().parse().expect("PORT must be a valid port number"),
    Err(env::VarError::NotPresent) => DEFAULT_PORT,
    Err(err) => panic!("Failed to read PORT: {}", err),
});

/// Directory served next to the API route. An empty value disables it.
pub static STATIC_ROOT: Lazy<Option<Box<str>>> = Lazy::new(|| {
    let root = env::var("STATIC_ROOT").unwrap_or_else(|_| ".".into());
    let root = root.trim();
    (!root.is_empty()).then(|| root.into())
});

pub fn validate() {
    // Trigger the lazy statics to force panics early
    let _ = *PORT;
    let _ = &*STATIC_ROOT;
}

#[derive(Debug, Clone)]
pub struct ProxyConfig {
    pub port: u16,
    pub static_root: Option<PathBuf>,
    pub upstream: UpstreamConfig,
}

impl ProxyConfig {
    pub fn from_env() -> Self {
        Self {
            port: *PORT,
            static_root: STATIC_ROOT.as_deref().map(PathBuf::from),
            upstream: UpstreamConfig::from_env(),
        }
    }
}
