//! Platform paths for the data directory and the files kept in it.

pub mod paths;

pub use paths::{default_data_dir, expand_tilde, token_file, APP_DIR_NAME, TOKEN_FILE_NAME};
