//! Host bridge: the command vocabulary, the host's data calls, and the
//! translation from one to session updates.

pub mod command;
pub mod dispatch;
pub mod fixture;
pub mod host;

pub use command::Command;
pub use dispatch::{fetch, FetchContext, Update};
pub use fixture::DirectoryBridge;
pub use host::{HostBridge, PointRecord};
