use crate::{Avatar, Generation, UserSummary};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchViewModel {
    pub query: String,
    pub status: SearchStatusView,
    pub panel_open: bool,
    pub generation: Generation,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SearchStatusView {
    #[default]
    Idle,
    Loading,
    Results(Vec<UserRowView>),
    /// Lookup succeeded with an empty list.
    NoMatches,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRowView {
    pub name: String,
    pub handle: Option<String>,
    pub avatar: Avatar,
}

impl From<&UserSummary> for UserRowView {
    fn from(user: &UserSummary) -> Self {
        Self {
            name: user.name.clone(),
            handle: user.handle.clone(),
            avatar: user.avatar(),
        }
    }
}
