mod db_restore;
mod logic;

pub use logic::{RestoreOptions, perform_restore};
