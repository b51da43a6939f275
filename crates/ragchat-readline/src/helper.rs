use std::borrow::Cow::{self, Borrowed, Owned};

use colored::Colorize;
use ragchat_core::sidebar::SessionRow;
use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::{Hint, Hinter};
use rustyline::validate::Validator;
use rustyline::{Context, Helper};

use crate::command::COMMANDS;

/// Commands whose argument is a row number or session id.
const SESSION_COMMANDS: &[&str] = &["/open", "/delete"];

/// A chat the user can name after `/open` or `/delete`.
#[derive(Debug, Clone, PartialEq, Eq)]
struct SessionChoice {
    number: String,
    id: String,
    title: String,
}

/// Hint shown right of the cursor; only command names are accepted with
/// the right arrow, session titles are shown for reference.
pub struct LineHint {
    display: String,
    completion: Option<String>,
}

impl Hint for LineHint {
    fn display(&self) -> &str {
        &self.display
    }

    fn completion(&self) -> Option<&str> {
        self.completion.as_deref()
    }
}

/// rustyline helper: slash commands and the chats listed in the sidebar.
pub struct CliHelper {
    commands: Vec<String>,
    sessions: Vec<SessionChoice>,
}

impl CliHelper {
    pub fn new() -> Self {
        Self {
            commands: COMMANDS.iter().map(|(name, _, _)| name.to_string()).collect(),
            sessions: Vec::new(),
        }
    }

    /// Replaces the chats offered after `/open` and `/delete`.
    pub fn set_sessions(&mut self, rows: &[SessionRow<'_>]) {
        self.sessions = rows
            .iter()
            .map(|row| SessionChoice {
                number: row.number.to_string(),
                id: row.session.id.clone(),
                title: row.session.title.clone(),
            })
            .collect();
    }

    fn matching<'a>(&'a self, prefix: &'a str) -> impl Iterator<Item = &'a String> + 'a {
        self.commands.iter().filter(move |cmd| cmd.starts_with(prefix))
    }

    /// Splits `/open 2` into the argument and its byte offset, for session
    /// commands with a single argument being typed.
    fn session_argument(line: &str) -> Option<(usize, &str)> {
        let (command, argument) = line.split_once(' ')?;
        if !SESSION_COMMANDS.contains(&command) || argument.contains(' ') {
            return None;
        }
        Some((command.len() + 1, argument))
    }

    /// Row numbers match first; ids are offered when no number does.
    fn session_candidates(&self, argument: &str) -> Vec<Pair> {
        let by_number: Vec<Pair> = self
            .sessions
            .iter()
            .filter(|s| s.number.starts_with(argument))
            .map(|s| Pair {
                display: format!("{}  {}", s.number, s.title),
                replacement: s.number.clone(),
            })
            .collect();
        if !by_number.is_empty() {
            return by_number;
        }
        self.sessions
            .iter()
            .filter(|s| s.id.starts_with(argument))
            .map(|s| Pair {
                display: format!("{}  {}", s.id, s.title),
                replacement: s.id.clone(),
            })
            .collect()
    }
}

impl Helper for CliHelper {}

impl Completer for CliHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let line = &line[..pos];

        if let Some((start, argument)) = Self::session_argument(line) {
            return Ok((start, self.session_candidates(argument)));
        }
        if line.starts_with('/') && !line.contains(' ') {
            let candidates = self
                .matching(line)
                .map(|cmd| Pair {
                    display: cmd.clone(),
                    replacement: cmd.clone(),
                })
                .collect();
            Ok((0, candidates))
        } else {
            Ok((0, vec![]))
        }
    }
}

impl Highlighter for CliHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if !line.starts_with('/') {
            return Borrowed(line);
        }
        match line.split_once(' ') {
            Some((command, rest)) => Owned(format!("{} {}", command.bright_cyan(), rest)),
            None => Owned(line.bright_cyan().to_string()),
        }
    }

    fn highlight_hint<'h>(&self, hint: &'h str) -> Cow<'h, str> {
        Owned(hint.bright_black().to_string())
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

impl Hinter for CliHelper {
    type Hint = LineHint;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<LineHint> {
        let line = &line[..pos];

        if let Some((_, argument)) = Self::session_argument(line) {
            return self
                .sessions
                .iter()
                .find(|s| s.number == argument || s.id == argument)
                .map(|s| LineHint {
                    display: format!("  {}", s.title),
                    completion: None,
                });
        }
        if line.starts_with('/') && !line.contains(' ') {
            self.matching(line)
                .find(|cmd| cmd.len() > line.len())
                .map(|cmd| {
                    let rest = cmd[line.len()..].to_string();
                    LineHint {
                        display: rest.clone(),
                        completion: Some(rest),
                    }
                })
        } else {
            None
        }
    }
}

impl Validator for CliHelper {}

#[cfg(test)]
mod tests {
    use super::*;
    use ragchat_core::session::ChatSession;
    use rustyline::history::DefaultHistory;

    fn session(id: &str, title: &str) -> ChatSession {
        ChatSession {
            id: id.to_string(),
            title: title.to_string(),
            updated_at: None,
            message_count: 0,
        }
    }

    fn helper_with_sessions(sessions: &[ChatSession]) -> CliHelper {
        let rows: Vec<SessionRow<'_>> = sessions
            .iter()
            .enumerate()
            .map(|(i, session)| SessionRow {
                number: i + 1,
                session,
                active: false,
            })
            .collect();
        let mut helper = CliHelper::new();
        helper.set_sessions(&rows);
        helper
    }

    #[test]
    fn test_completes_command_prefix() {
        let helper = CliHelper::new();
        let history = DefaultHistory::new();
        let ctx = Context::new(&history);

        let (start, candidates) = helper.complete("/re", 3, &ctx).unwrap();
        let names: Vec<_> = candidates.iter().map(|p| p.replacement.as_str()).collect();
        assert_eq!(start, 0);
        assert_eq!(names, vec!["/refresh", "/register"]);

        let (_, none) = helper.complete("hello", 5, &ctx).unwrap();
        assert!(none.is_empty());
    }

    #[test]
    fn test_completes_session_numbers_after_open() {
        let sessions: Vec<_> = (0..11)
            .map(|i| session(&format!("s{i}"), &format!("Chat {i}")))
            .collect();
        let helper = helper_with_sessions(&sessions);
        let history = DefaultHistory::new();
        let ctx = Context::new(&history);

        let (start, candidates) = helper.complete("/open 1", 7, &ctx).unwrap();
        let numbers: Vec<_> = candidates.iter().map(|p| p.replacement.as_str()).collect();
        assert_eq!(start, 6);
        assert_eq!(numbers, vec!["1", "10", "11"]);
        assert_eq!(candidates[0].display, "1  Chat 0");
    }

    #[test]
    fn test_completes_session_ids_after_delete() {
        let sessions = [
            session("abc-123", "Rust"),
            session("abd-456", "Tokio"),
            session("xyz-789", "Serde"),
        ];
        let helper = helper_with_sessions(&sessions);
        let history = DefaultHistory::new();
        let ctx = Context::new(&history);

        let (start, candidates) = helper.complete("/delete ab", 10, &ctx).unwrap();
        let ids: Vec<_> = candidates.iter().map(|p| p.replacement.as_str()).collect();
        assert_eq!(start, 8);
        assert_eq!(ids, vec!["abc-123", "abd-456"]);

        let (_, none) = helper.complete("/login ab", 9, &ctx).unwrap();
        assert!(none.is_empty());
    }

    #[test]
    fn test_hint_completes_first_match() {
        let helper = CliHelper::new();
        let history = DefaultHistory::new();
        let ctx = Context::new(&history);

        let hint = helper.hint("/ses", 4, &ctx).unwrap();
        assert_eq!(hint.display(), "sions");
        assert_eq!(hint.completion(), Some("sions"));
        assert!(helper.hint("/open 1", 7, &ctx).is_none());
    }

    #[test]
    fn test_hint_shows_title_of_named_session() {
        let sessions = [session("abc-123", "Rust"), session("xyz-789", "Serde")];
        let helper = helper_with_sessions(&sessions);
        let history = DefaultHistory::new();
        let ctx = Context::new(&history);

        let hint = helper.hint("/open 2", 7, &ctx).unwrap();
        assert_eq!(hint.display(), "  Serde");
        assert_eq!(hint.completion(), None);

        let hint = helper.hint("/delete abc-123", 15, &ctx).unwrap();
        assert_eq!(hint.display(), "  Rust");
        assert!(helper.hint("/open 9", 7, &ctx).is_none());
    }
}
