use once_cell::sync::Lazy;
use std::env;

pub static BASE_URL: Lazy<Box<str>> = Lazy::new(|| {
    env::var("CHAT_BASE_URL")
        .unwrap_or_else(|_| "http://localhost:3002".into())
        .trim_end_matches('/')
        .into()
});

pub fn validate() {
    let _ = &*BASE_URL;
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: Box<str>,
}

impl ClientConfig {
    pub fn from_env() -> Self {
        Self {
            base_url: BASE_URL.clone(),
        }
    }
}
