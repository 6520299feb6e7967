//! Local/remote synchronization of the site document.

mod coordinator;
#[cfg(test)]
pub(crate) mod mock_remote;
mod remote;

pub use coordinator::*;
pub use remote::*;
