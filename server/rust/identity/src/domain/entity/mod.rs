pub mod changes_log;
pub mod claims;
pub mod operation_log;
pub mod permissions_for_role;
pub mod provider;
pub mod tracked_entity;

pub use claims::Claims;
