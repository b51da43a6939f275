//! Slash commands understood by the REPL.

use thiserror::Error;

/// Name, argument synopsis and help text of every command.
pub const COMMANDS: &[(&str, &str, &str)] = &[
    ("/home", "", "Go back to the homepage"),
    ("/new", "[text]", "Start a new chat, optionally sending text first"),
    ("/sessions", "", "List recent chats"),
    ("/open", "<n|id>", "Open a chat from the list"),
    ("/delete", "<n|id>", "Delete a chat"),
    ("/refresh", "", "Reload the chat list"),
    ("/whoami", "", "Show the current identity"),
    ("/login", "<email>", "Sign in (prompts for the password)"),
    ("/register", "<email> <name>", "Create an account and keep your guest chat"),
    ("/logout", "", "Sign out and continue as a new guest"),
    ("/status", "", "Check the chat service"),
    ("/help", "", "Show this help"),
    ("/quit", "", "Exit"),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Home,
    New(Option<String>),
    Sessions,
    Open(String),
    Delete(String),
    Refresh,
    WhoAmI,
    Login { email: String },
    Register { email: String, name: String },
    Logout,
    Status,
    Help,
    Quit,
    /// A line that is not a command: a prompt (chat) or a first message (home).
    Say(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("Unknown command '{0}'. Type /help for the list.")]
    Unknown(String),
    #[error("Usage: {0}")]
    Usage(String),
}

/// Parses one input line. Blank lines yield `Ok(None)`.
pub fn parse(line: &str) -> Result<Option<Command>, CommandError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    if line == "quit" || line == "exit" {
        return Ok(Some(Command::Quit));
    }
    if !line.starts_with('/') {
        return Ok(Some(Command::Say(line.to_string())));
    }

    let (name, rest) = match line.split_once(char::is_whitespace) {
        Some((name, rest)) => (name, rest.trim()),
        None => (line, ""),
    };

    let command = match name {
        "/home" => Command::Home,
        "/new" => Command::New((!rest.is_empty()).then(|| rest.to_string())),
        "/sessions" | "/ls" => Command::Sessions,
        "/open" => Command::Open(single_arg(name, rest)?),
        "/delete" | "/rm" => Command::Delete(single_arg(name, rest)?),
        "/refresh" => Command::Refresh,
        "/whoami" => Command::WhoAmI,
        "/login" => Command::Login {
            email: single_arg(name, rest)?,
        },
        "/register" => match rest.split_once(char::is_whitespace) {
            Some((email, name)) if !name.trim().is_empty() => Command::Register {
                email: email.to_string(),
                name: name.trim().to_string(),
            },
            _ => return Err(usage(name)),
        },
        "/logout" => Command::Logout,
        "/status" => Command::Status,
        "/help" | "/?" => Command::Help,
        "/quit" | "/exit" => Command::Quit,
        other => return Err(CommandError::Unknown(other.to_string())),
    };
    Ok(Some(command))
}

fn single_arg(name: &str, rest: &str) -> Result<String, CommandError> {
    if rest.is_empty() || rest.contains(char::is_whitespace) {
        Err(usage(name))
    } else {
        Ok(rest.to_string())
    }
}

fn usage(name: &str) -> CommandError {
    let synopsis = COMMANDS
        .iter()
        .find(|(command, _, _)| *command == name)
        .map(|(command, args, _)| format!("{command} {args}"))
        .unwrap_or_else(|| name.to_string());
    CommandError::Usage(synopsis.trim_end().to_string())
}
