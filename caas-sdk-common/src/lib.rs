//! CaaS SDK Common Types
//!
//! Wire types shared by the SDK client and applications embedding it.

pub mod protocol;
pub mod session;

pub use protocol::{headers, Endpoint};
pub use session::{RefreshRequest, SessionCreatePayload, SessionTokenBundle};
