mod issue;
mod render;
mod roles;
mod verify;

pub use issue::{IssueParams, issue};
pub use render::{RenderParams, render};
pub use roles::{RolesParams, roles};
pub use verify::{VerifyParams, verify};
