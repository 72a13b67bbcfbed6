#[cfg(feature = "chat-in")]
pub mod proxy;

#[cfg(feature = "chat-out")]
pub mod client;
