mod db_dump;
mod logic;

pub use logic::{BackupOptions, perform_backup};
