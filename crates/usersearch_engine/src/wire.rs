use serde::Deserialize;
use usersearch_core::UserSummary;

use crate::{FailureKind, LookupError};

#[derive(Debug, Deserialize)]
struct WireUser {
    name: String,
    #[serde(default)]
    handle: Option<String>,
    #[serde(default)]
    account: Option<WireAccount>,
}

#[derive(Debug, Deserialize)]
struct WireAccount {
    #[serde(default)]
    id: Option<WireId>,
}

/// Backends disagree on whether account ids are strings or numbers.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum WireId {
    Text(String),
    Number(u64),
}

impl From<WireUser> for UserSummary {
    fn from(user: WireUser) -> Self {
        let account_id = user.account.and_then(|account| account.id).map(|id| match id {
            WireId::Text(text) => text,
            WireId::Number(number) => number.to_string(),
        });
        UserSummary {
            name: user.name,
            handle: user.handle,
            account_id,
        }
    }
}

/// Parse a search response body: a JSON array of `{ name, handle?, account?: { id? } }`.
pub fn parse_users(body: &[u8]) -> Result<Vec<UserSummary>, LookupError> {
    let users: Vec<WireUser> = serde_json::from_slice(body)
        .map_err(|err| LookupError::new(FailureKind::MalformedResponse, err.to_string()))?;
    Ok(users.into_iter().map(UserSummary::from).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_and_optional_fields() {
        let body = br#"[
            {"name": "Bobby"},
            {"name": "Ada", "handle": "ada", "account": {"id": "a-1"}},
            {"name": "Alan", "account": {"id": 36}},
            {"name": "Grace", "account": {}}
        ]"#;
        let users = parse_users(body).unwrap();
        assert_eq!(
            users,
            vec![
                UserSummary::new("Bobby"),
                UserSummary::new("Ada").with_handle("ada").with_account_id("a-1"),
                UserSummary::new("Alan").with_account_id("36"),
                UserSummary::new("Grace"),
            ]
        );
    }

    #[test]
    fn empty_array_is_a_valid_result() {
        assert!(parse_users(b"[]").unwrap().is_empty());
    }

    #[test]
    fn wrong_shape_is_malformed() {
        for body in [&b"{\"name\": \"x\"}"[..], b"[{\"handle\": \"x\"}]", b"not json", b""] {
            let err = parse_users(body).unwrap_err();
            assert_eq!(err.kind, FailureKind::MalformedResponse);
        }
    }
}
