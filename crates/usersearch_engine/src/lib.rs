//! Usersearch engine: debounce gate, lookup collaborators and effect execution.
mod coordinator;
mod debounce;
mod lookup;
mod sink;
mod types;
mod wire;

pub use coordinator::{CoordinatorSettings, SearchCoordinator};
pub use debounce::Debouncer;
pub use lookup::{LocalUserLookup, LookupSettings, ReqwestUserLookup, UserLookup};
pub use sink::{ChannelRenderSink, RenderSink};
pub use types::{FailureKind, LookupError};
pub use wire::parse_users;
