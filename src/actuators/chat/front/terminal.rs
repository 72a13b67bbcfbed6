use std::io::Write;

use super::{ChatView, Sender};

const USER_LABEL: &str = "你";
const COACH_LABEL: &str = "Coach";

/// Line-oriented [`ChatView`] for a terminal.
///
/// A terminal cannot rewrite what it already printed, so a reply that
/// grows is printed as the new suffix only. A reply that changes in any
/// other way (the error text replacing a partial answer) is printed again
/// in full on a fresh line.
pub struct TerminalView<W: Write> {
    out: W,
    shown: String,
}

impl<W: Write> TerminalView<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            shown: String::new(),
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn emit(&mut self, text: &str) {
        let result = self
            .out
            .write_all(text.as_bytes())
            .and_then(|_| self.out.flush());
        if let Err(error) = result {
            tracing::error!("Failed to write to terminal: {}", error);
        }
    }
}

impl<W: Write> ChatView for TerminalView<W> {
    fn push_message(&mut self, sender: Sender, text: &str) {
        self.emit(&format!("{}> {text}\n", label(sender)));
    }

    fn open_reply(&mut self) {
        self.shown.clear();
        self.emit(&format!("{}> ", label(Sender::Assistant)));
    }

    fn render_reply(&mut self, text: &str) {
        match text.strip_prefix(self.shown.as_str()) {
            Some(suffix) => self.emit(suffix),
            None => self.emit(&format!("\n{}> {text}", label(Sender::Assistant))),
        }
        self.shown = text.to_string();
    }

    fn set_loading(&mut self, loading: bool) {
        if !loading {
            self.emit("\n\n");
        }
    }
}

fn label(sender: Sender) -> &'static str {
    match sender {
        Sender::User => USER_LABEL,
        Sender::Assistant => COACH_LABEL,
    }
}
