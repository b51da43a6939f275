//! Guest identifiers.
//!
//! The backend treats any user id starting with `anon_` as a guest: guests
//! keep a single session that is wiped on "new chat" instead of a growing
//! list. The id itself is `anon_<unix millis>_<9 base-36 chars>`.

use rand::Rng;

pub const ANONYMOUS_ID_PREFIX: &str = "anon_";

const SUFFIX_LEN: usize = 9;
const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Generates a fresh guest identifier.
pub fn generate_anonymous_id() -> String {
    let millis = chrono::Utc::now().timestamp_millis();
    let mut rng = rand::thread_rng();
    let suffix: String = (0..SUFFIX_LEN)
        .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
        .collect();
    format!("{ANONYMOUS_ID_PREFIX}{millis}_{suffix}")
}

pub fn is_anonymous_id(id: &str) -> bool {
    id.starts_with(ANONYMOUS_ID_PREFIX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_id_format() {
        let id = generate_anonymous_id();
        assert!(is_anonymous_id(&id));

        let parts: Vec<&str> = id.split('_').collect();
        assert_eq!(parts.len(), 3);
        assert!(parts[1].parse::<i64>().is_ok());
        assert_eq!(parts[2].len(), SUFFIX_LEN);
        assert!(parts[2].bytes().all(|b| BASE36.contains(&b)));
    }

    #[test]
    fn test_generated_ids_differ() {
        assert_ne!(generate_anonymous_id(), generate_anonymous_id());
    }

    #[test]
    fn test_registered_ids_are_not_anonymous() {
        assert!(!is_anonymous_id("2b7e1f0c-0000-4000-8000-000000000000"));
    }
}
