use coach_relay::{actuators::chat::back, config::proxy::ProxyConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    dotenvy::dotenv().ok();

    // Initialize logging
    coach_relay::init_logging();

    coach_relay::config::proxy::validate();
    coach_relay::infer::config::validate();

    back::serve(ProxyConfig::from_env()).await
}
