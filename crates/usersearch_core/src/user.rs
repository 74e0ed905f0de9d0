/// One entry of a search result list.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UserSummary {
    pub name: String,
    pub handle: Option<String>,
    /// Account identifier used to derive an avatar URL. Not every backend
    /// record carries one.
    pub account_id: Option<String>,
}

/// What the presentation layer should draw next to a user row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Avatar {
    /// Render the avatar image for this account identifier.
    Account(String),
    /// No identifier available: render these initials instead.
    Initials(String),
}

impl UserSummary {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            handle: None,
            account_id: None,
        }
    }

    pub fn with_handle(mut self, handle: impl Into<String>) -> Self {
        self.handle = Some(handle.into());
        self
    }

    pub fn with_account_id(mut self, account_id: impl Into<String>) -> Self {
        self.account_id = Some(account_id.into());
        self
    }

    pub fn avatar(&self) -> Avatar {
        match self.account_id.as_deref().map(str::trim) {
            Some(id) if !id.is_empty() => Avatar::Account(id.to_string()),
            _ => Avatar::Initials(initials(&self.name)),
        }
    }
}

fn initials(name: &str) -> String {
    let letters: String = name
        .split_whitespace()
        .filter_map(|word| word.chars().next())
        .take(2)
        .flat_map(char::to_uppercase)
        .collect();
    if letters.is_empty() {
        "?".to_string()
    } else {
        letters
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn avatar_prefers_account_id() {
        let user = UserSummary::new("Ada Lovelace").with_account_id("42");
        assert_eq!(user.avatar(), Avatar::Account("42".to_string()));
    }

    #[test]
    fn avatar_falls_back_to_initials() {
        assert_eq!(
            UserSummary::new("ada byron lovelace").avatar(),
            Avatar::Initials("AB".to_string())
        );
        assert_eq!(
            UserSummary::new("Bobby").with_account_id("  ").avatar(),
            Avatar::Initials("B".to_string())
        );
        assert_eq!(UserSummary::new("").avatar(), Avatar::Initials("?".to_string()));
    }
}
