mod create_admin;
mod init;
mod reset_db;

pub use create_admin::cmd_create_admin;
pub use init::cmd_init;
pub use reset_db::cmd_reset_db;
