pub mod audit_trail;
pub mod changes_log_recorder;
pub mod permission_guard;

pub use audit_trail::{AuditEntries, AuditTrail, Audited};
pub use changes_log_recorder::{ChangeSubject, ChangesLogError, ChangesLogRecorder};
pub use permission_guard::PermissionGuard;
