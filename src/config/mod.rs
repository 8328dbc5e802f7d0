//! Configuration document and its persistence.
//!
//! The document lives in a single TOML file:
//!
//! - Linux: `~/.local/share/dd-checks-dev/config.toml`
//! - macOS: `~/Library/Application Support/dd-checks-dev/config.toml`
//! - Windows: `%APPDATA%\dd-checks-dev\config.toml`
//!
//! `DDEV_DATA_DIR` replaces the directory part.
//!
//! ## Loading
//!
//! The file is merged over [`schema::defaults`] one top-level key at a time.
//! A key present in the file replaces the entire default for that key.
//!
//! ## Writing
//!
//! Every write goes to a temp file in the same directory which is then
//! renamed over config.toml. The transient `repo_choice` key is stripped.
//!
//! ## Security
//!
//! config.toml holds the GitHub token and PyPI password in plain text. On
//! Unix it is written with 0600 permissions.

pub mod document;
pub mod path;
pub mod schema;
pub mod store;

pub use document::{ConfigDocument, Node, Scalar, Section};
pub use path::{DottedPath, get_path, set_path, set_value};
pub use schema::{
    APP_NAME, CONFIG_FILE_NAME, REPO_CHOICE_KEY, RepoChoice, SECRET_KEYS, defaults,
};
pub use store::{ConfigStore, DATA_DIR_ENV, default_config_path};
