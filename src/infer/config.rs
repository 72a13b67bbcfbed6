use once_cell::sync::Lazy;
use std::env;
use std::time::Duration;

pub const DEFAULT_API_ENDPOINT: &str = "https://ark.cn-beijing.volces.com/api/v3/chat/completions";
pub const DEFAULT_MODEL: &str = "deepseek-r1-250120";
pub const DEFAULT_TEMPERATURE: f32 = 0.6;
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

pub static API_KEY: Lazy<Box<str>> = Lazy::new(|| {
    env::var("VOLCENGINE_API_KEY")
        .expect("VOLCENGINE_API_KEY environment variable must be set")
        .trim()
        .into()
});

pub static API_ENDPOINT: Lazy<Box<str>> = Lazy::new(|| {
    env::var("VOLCENGINE_API_ENDPOINT")
        .unwrap_or_else(|_| DEFAULT_API_ENDPOINT.into())
        .into_boxed_str()
});

pub static MODEL: Lazy<Box<str>> = Lazy::new(|| {
    env::var("CHAT_MODEL")
        .unwrap_or_else(|_| DEFAULT_MODEL.into())
        .into_boxed_str()
});

pub static TEMPERATURE: Lazy<f32> = Lazy::new(|| match env::var("CHAT_TEMPERATURE") {
    Ok(value) => value
        .trim()
        .parse()
        .expect("CHAT_TEMPERATURE must be a number"),
    Err(_) => DEFAULT_TEMPERATURE,
});

pub static TIMEOUT: Lazy<Duration> = Lazy::new(|| {
    let secs = match env::var("UPSTREAM_TIMEOUT_SECS") {
        Ok(value) => value
            .trim()
            .parse()
            .expect("UPSTREAM_TIMEOUT_SECS must be a whole number of seconds"),
        Err(_) => DEFAULT_TIMEOUT_SECS,
    };
    Duration::from_secs(secs)
});

pub fn validate() {
    // Trigger the lazy statics to force panics early
    let _ = &*API_KEY;
    let _ = &*API_ENDPOINT;
    let _ = &*MODEL;
    let _ = *TEMPERATURE;
    let _ = *TIMEOUT;
}

/// Everything needed to reach the chat-completion API.
#[derive(Debug, Clone)]
pub struct UpstreamConfig {
    pub endpoint: Box<str>,
    pub api_key: Box<str>,
    pub model: Box<str>,
    pub temperature: f32,
    /// Bounds connecting and receiving the response head. The body stream
    /// itself has no idle timeout.
    pub timeout: Duration,
}

impl UpstreamConfig {
    pub fn from_env() -> Self {
        Self {
            endpoint: API_ENDPOINT.clone(),
            api_key: API_KEY.clone(),
            model: MODEL.clone(),
            temperature: *TEMPERATURE,
            timeout: *TIMEOUT,
        }
    }
}
