use tokio::sync::mpsc;

use crate::utf8::Utf8StreamDecoder;

pub mod api;
pub mod terminal;

pub use api::RelayApi;

/// Shown in place of the reply when the request fails.
pub const ERROR_REPLY: &str = "抱歉，发生了错误，请稍后再试。";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sender {
    User,
    Assistant,
}

/// Rendering surface of a chat session.
pub trait ChatView {
    /// Appends a finished message to the history.
    fn push_message(&mut self, sender: Sender, text: &str);

    /// Appends an empty assistant message that `render_reply` fills in.
    fn open_reply(&mut self);

    /// Replaces the open reply with `text`, the whole reply so far.
    fn render_reply(&mut self, text: &str);

    fn set_loading(&mut self, loading: bool);

    fn scroll_to_bottom(&mut self) {}
}

/// Single-flight guard of one chat session.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SessionState {
    pub awaiting_response: bool,
}

#[derive(Debug)]
pub enum ReplyEvent {
    Chunk(Vec<u8>),
    Finished,
    Failed(String),
}

pub struct ChatSession<V> {
    state: SessionState,
    view: V,
    reply: String,
    decoder: Utf8StreamDecoder,
}

impl<V: ChatView> ChatSession<V> {
    pub fn new(view: V) -> Self {
        Self {
            state: SessionState::default(),
            view,
            reply: String::new(),
            decoder: Utf8StreamDecoder::new(),
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_awaiting(&self) -> bool {
        self.state.awaiting_response
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn into_view(self) -> V {
        self.view
    }

    /// Starts a new exchange and returns the message to send, or `None`
    /// when the input is blank or a reply is still streaming.
    pub fn submit(&mut self, input: &str) -> Option<String> {
        let message = input.trim();
        if message.is_empty() {
            return None;
        }
        if self.state.awaiting_response {
            tracing::debug!("Ignoring input while a reply is still streaming");
            return None;
        }

        self.view.push_message(Sender::User, message);
        self.view.scroll_to_bottom();

        self.state.awaiting_response = true;
        self.view.set_loading(true);

        self.reply.clear();
        self.decoder = Utf8StreamDecoder::new();
        self.view.open_reply();
        self.view.scroll_to_bottom();

        Some(message.to_string())
    }

    pub fn apply(&mut self, event: ReplyEvent) {
        if !self.state.awaiting_response {
            tracing::debug!("Dropping reply event with no exchange in flight: {:?}", event);
            return;
        }

        match event {
            ReplyEvent::Chunk(bytes) => {
                let text = self.decoder.decode(&bytes);
                if !text.is_empty() {
                    self.reply.push_str(&text);
                    self.view.render_reply(&self.reply);
                    self.view.scroll_to_bottom();
                }
            }
            ReplyEvent::Finished => {
                let tail = self.decoder.finish();
                if !tail.is_empty() {
                    self.reply.push_str(&tail);
                    self.view.render_reply(&self.reply);
                }
                self.settle();
            }
            ReplyEvent::Failed(error) => {
                tracing::error!("API request error: {}", error);
                self.view.render_reply(ERROR_REPLY);
                self.settle();
            }
        }
    }

    fn settle(&mut self) {
        self.state.awaiting_response = false;
        self.view.set_loading(false);
        self.view.scroll_to_bottom();
    }
}

/// Drives a session from user input until the input channel closes and
/// the last reply has settled. Returns the session for inspection.
pub async fn run<V: ChatView>(
    mut session: ChatSession<V>,
    api: RelayApi,
    mut inputs: mpsc::Receiver<String>,
) -> ChatSession<V> {
    let (events_tx, mut events) = mpsc::unbounded_channel();
    let mut inputs_open = true;

    while inputs_open || session.is_awaiting() {
        tokio::select! {
            input = inputs.recv(), if inputs_open => match input {
                Some(input) => {
                    if let Some(message) = session.submit(&input) {
                        tokio::spawn(api.clone().stream_reply(message, events_tx.clone()));
                    }
                }
                None => inputs_open = false,
            },
            Some(event) = events.recv() => session.apply(event),
            else => break,
        }
    }

    session
}
