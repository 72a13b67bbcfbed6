use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

use coach_relay::{
    actuators::chat::front::{self, ChatSession, RelayApi, terminal::TerminalView},
    config::client::ClientConfig,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    dotenvy::dotenv().ok();

    // Initialize logging
    coach_relay::init_logging();

    coach_relay::config::client::validate();
    let api = RelayApi::new(&ClientConfig::from_env());
    tracing::info!("Chatting through {}", api.base_url());

    let (inputs, inputs_rx) = mpsc::channel(16);
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    if inputs.send(line).await.is_err() {
                        break;
                    }
                }
                Ok(None) => break,
                Err(error) => {
                    tracing::error!("Failed to read input: {}", error);
                    break;
                }
            }
        }
    });

    let session = ChatSession::new(TerminalView::new(std::io::stdout()));
    front::run(session, api, inputs_rx).await;
    Ok(())
}
