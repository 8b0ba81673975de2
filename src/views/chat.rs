//! Chat window

use crate::conversation::{Role, Transcript};
use crate::core::Notice;

use super::{escape, placeholder};

/// Bubbles for every visible turn, then the pending notice if any
pub fn render(transcript: &Transcript, notice: Option<Notice>) -> String {
    let mut html = String::new();

    for message in transcript.visible() {
        match message.role {
            Role::User => html.push_str(&format!(
                "<div class=\"chat-bubble user-bubble\"><strong>You:</strong> {}</div>\n",
                escape(&message.content)
            )),
            Role::Assistant => html.push_str(&format!(
                "<div class=\"chat-bubble ai-bubble\">{}</div>\n",
                escape(&message.content)
            )),
            Role::System => {}
        }
    }

    if let Some(notice) = notice {
        html.push_str(&placeholder(notice.message()));
        html.push('\n');
    }

    html
}
