//! Cached list of recent sessions shown next to the transcript.

use crate::session::ChatSession;

/// Upper bound on rows shown, whatever the backend returns.
pub const MAX_SESSIONS: usize = 10;

/// One selectable row, numbered from 1 for the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionRow<'a> {
    pub number: usize,
    pub session: &'a ChatSession,
    pub active: bool,
}

/// Sessions for one user at one refresh tick.
///
/// The list is reloaded whenever the user id or the refresh counter differs
/// from the key it was last loaded for.
#[derive(Debug)]
pub struct SessionList {
    sessions: Vec<ChatSession>,
    loaded_for: Option<(String, u64)>,
    limit: usize,
}

impl Default for SessionList {
    fn default() -> Self {
        Self::with_limit(MAX_SESSIONS)
    }
}

impl SessionList {
    /// `limit` is clamped to [`MAX_SESSIONS`].
    pub fn with_limit(limit: usize) -> Self {
        Self {
            sessions: Vec::new(),
            loaded_for: None,
            limit: limit.clamp(1, MAX_SESSIONS),
        }
    }

    pub fn needs_reload(&self, user_id: &str, refresh: u64) -> bool {
        match &self.loaded_for {
            Some((loaded_user, loaded_refresh)) => {
                loaded_user != user_id || *loaded_refresh != refresh
            }
            None => true,
        }
    }

    /// Stores a freshly fetched list, keeping only the newest `limit` entries.
    pub fn replace(&mut self, user_id: &str, refresh: u64, mut sessions: Vec<ChatSession>) {
        sessions.truncate(self.limit);
        self.sessions = sessions;
        self.loaded_for = Some((user_id.to_string(), refresh));
    }

    /// Records a failed load for `(user_id, refresh)` so it is not retried
    /// until the key changes. The previous rows survive unless they belong to
    /// another user.
    pub fn mark_failed(&mut self, user_id: &str, refresh: u64) {
        let same_user = matches!(&self.loaded_for, Some((loaded, _)) if loaded == user_id);
        if !same_user {
            self.sessions.clear();
        }
        self.loaded_for = Some((user_id.to_string(), refresh));
    }

    /// Forgets the cached list; the next check reloads it.
    pub fn invalidate(&mut self) {
        self.sessions.clear();
        self.loaded_for = None;
    }

    pub fn sessions(&self) -> &[ChatSession] {
        &self.sessions
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn rows<'a>(&'a self, active_session_id: Option<&str>) -> Vec<SessionRow<'a>> {
        self.sessions
            .iter()
            .enumerate()
            .map(|(idx, session)| SessionRow {
                number: idx + 1,
                session,
                active: active_session_id == Some(session.id.as_str()),
            })
            .collect()
    }

    /// Resolves a row number ("2") or a session id to a session id.
    pub fn resolve(&self, selector: &str) -> Option<&str> {
        let selector = selector.trim();
        if let Ok(number) = selector.parse::<usize>() {
            if let Some(session) = number.checked_sub(1).and_then(|i| self.sessions.get(i)) {
                return Some(&session.id);
            }
        }
        self.sessions
            .iter()
            .find(|s| s.id == selector)
            .map(|s| s.id.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sessions(n: usize) -> Vec<ChatSession> {
        (0..n)
            .map(|i| ChatSession {
                id: format!("s{i}"),
                title: format!("Chat {i}"),
                updated_at: None,
                message_count: i as u32,
            })
            .collect()
    }

    #[test]
    fn test_never_more_than_ten_rows() {
        let mut list = SessionList::default();
        list.replace("u1", 0, sessions(25));
        assert_eq!(list.sessions().len(), MAX_SESSIONS);
        assert_eq!(list.rows(None).len(), MAX_SESSIONS);
        assert_eq!(list.sessions()[0].id, "s0");

        let mut list = SessionList::with_limit(50);
        list.replace("u1", 0, sessions(25));
        assert_eq!(list.sessions().len(), MAX_SESSIONS);
    }

    #[test]
    fn test_reload_key_tracks_user_and_refresh() {
        let mut list = SessionList::default();
        assert!(list.needs_reload("u1", 0));

        list.replace("u1", 0, sessions(1));
        assert!(!list.needs_reload("u1", 0));
        assert!(list.needs_reload("u1", 1));
        assert!(list.needs_reload("u2", 0));

        list.invalidate();
        assert!(list.needs_reload("u1", 0));
        assert!(list.is_empty());
    }

    #[test]
    fn test_failed_reload_keeps_rows_of_same_user_only() {
        let mut list = SessionList::default();
        list.replace("u1", 0, sessions(2));

        list.mark_failed("u1", 1);
        assert_eq!(list.sessions().len(), 2);
        assert!(!list.needs_reload("u1", 1));

        list.mark_failed("u2", 1);
        assert!(list.is_empty());
        assert!(!list.needs_reload("u2", 1));
    }

    #[test]
    fn test_rows_highlight_active_session() {
        let mut list = SessionList::default();
        list.replace("u1", 0, sessions(3));

        let rows = list.rows(Some("s1"));
        assert_eq!(rows.iter().filter(|r| r.active).count(), 1);
        assert!(rows[1].active);
        assert_eq!(rows[1].number, 2);
    }

    #[test]
    fn test_resolve_by_number_or_id() {
        let mut list = SessionList::default();
        list.replace("u1", 0, sessions(3));

        assert_eq!(list.resolve("1"), Some("s0"));
        assert_eq!(list.resolve("s2"), Some("s2"));
        assert_eq!(list.resolve("0"), None);
        assert_eq!(list.resolve("9"), None);
        assert_eq!(list.resolve("unknown"), None);
    }
}
