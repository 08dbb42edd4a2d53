pub mod login;
pub mod permission;
pub mod principal;

pub use login::Login;
pub use permission::{Action, PermissionId, Resource};
pub use principal::Principal;
