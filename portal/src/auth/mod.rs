pub mod gate;
pub mod policy;
pub mod session;

pub use gate::{AuthorizedSession, role_gate};
pub use policy::{Decision, DenyReason, GateState, authorize};
