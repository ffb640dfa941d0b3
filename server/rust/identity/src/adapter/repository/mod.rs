pub mod changes_log_postgres;
pub mod in_memory;
pub mod operation_log_postgres;
pub mod permissions_for_role_postgres;
