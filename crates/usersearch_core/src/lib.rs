//! Usersearch core: pure search state machine and view-model helpers.
mod effect;
mod msg;
mod state;
mod update;
mod user;
mod view_model;

pub use effect::Effect;
pub use msg::Msg;
pub use state::{Generation, SearchModel, SearchState, Ticket};
pub use update::update;
pub use user::{Avatar, UserSummary};
pub use view_model::{SearchStatusView, SearchViewModel, UserRowView};
