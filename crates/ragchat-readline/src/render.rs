//! Text rendering of the client state.
//!
//! Every function returns lines; the REPL decides when to print them.

use colored::Colorize;
use ragchat_application::{ChatApp, ServiceReport};
use ragchat_core::session::{Message, MessageRole};
use ragchat_core::transcript::{ERROR_REPLY, Transcript};
use ragchat_core::user::User;

use crate::command::COMMANDS;

pub fn banner() -> String {
    "=== ragchat ===".bright_magenta().bold().to_string()
}

pub fn identity(user: Option<&User>) -> Vec<String> {
    match user {
        Some(user) if !user.is_anonymous() => vec![format!(
            "Signed in as {} <{}>",
            user.display_name().bold(),
            user.email
        )],
        _ => vec!["Guest Mode".bright_black().to_string()],
    }
}

/// Welcome screen, with the sign-up pitch for guests.
pub fn home(is_anonymous: bool) -> Vec<String> {
    let mut lines = vec![String::new(), "Welcome".bold().to_string()];
    if is_anonymous {
        lines.push(String::new());
        lines.push("Unlock Full Features".magenta().bold().to_string());
        lines.push(
            "Create an account to save your conversations and access them from anywhere!"
                .magenta()
                .to_string(),
        );
        lines.push("Sign up with /register <email> <name>".bright_black().to_string());
    }
    lines.push(String::new());
    lines.push("Ask anything to start a new chat.".bright_black().to_string());
    lines
}

/// Session list, active row marked.
pub fn sidebar(app: &ChatApp) -> Vec<String> {
    let guest = app.auth().is_anonymous();
    let heading = if guest { "Your Chat (Guest)" } else { "Recent Chats" };
    let mut lines = vec![heading.to_uppercase().bright_black().bold().to_string()];

    let rows = app.session_rows();
    if rows.is_empty() {
        lines.push("  No chats yet".bright_black().to_string());
        lines.push("  Start a conversation!".bright_black().to_string());
    }
    for row in rows {
        let text = format!(
            "{:>3}. {} ({} messages)",
            row.number, row.session.title, row.session.message_count
        );
        if row.active {
            lines.push(format!("{} {}", "*".magenta(), text.magenta().bold()));
        } else {
            lines.push(format!("  {text}"));
        }
    }

    if guest {
        lines.push("Sign up to save chats: /register".magenta().to_string());
    }
    lines
}

pub fn message(message: &Message) -> Vec<String> {
    match message.role {
        MessageRole::User => vec![format!("> {}", message.content).green().to_string()],
        MessageRole::Assistant if message.loading => {
            vec!["Thinking...".bright_black().to_string()]
        }
        MessageRole::Assistant if message.content == ERROR_REPLY => {
            vec![message.content.red().to_string()]
        }
        MessageRole::Assistant => message
            .content
            .lines()
            .map(|line| line.bright_blue().to_string())
            .collect(),
    }
}

pub fn transcript(transcript: &Transcript) -> Vec<String> {
    if transcript.messages().is_empty() {
        return vec!["Start a conversation...".bright_black().to_string()];
    }
    transcript.messages().iter().flat_map(message).collect()
}

pub fn status(report: &ServiceReport) -> Vec<String> {
    [("service", &report.probe), ("health", &report.health)]
        .into_iter()
        .map(|(label, result)| match result {
            Ok(status) => format!(
                "{label}: {} ({})",
                status.status.green(),
                status.message
            ),
            Err(e) => format!("{label}: {}", e.user_message().red()),
        })
        .collect()
}

pub fn help() -> Vec<String> {
    COMMANDS
        .iter()
        .map(|(name, args, about)| {
            let usage = format!("{name} {args}");
            format!("  {:<28} {}", usage.trim_end().cyan(), about)
        })
        .collect()
}
