//! Default schema for config.toml.
//!
//! ```toml
//! core = "~/dd/integrations-core"
//! extras = "~/dd/integrations-extras"
//!
//! [github]
//! user = ""
//! token = ""
//!
//! [pypi]
//! user = ""
//! pass = ""
//! ```

use std::path::PathBuf;

use super::document::{ConfigDocument, Section};

/// Application directory name under the platform data directory.
pub const APP_NAME: &str = "dd-checks-dev";

/// File name of the persisted document.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// In-memory-only key recording which integrations repo this invocation targets.
pub const REPO_CHOICE_KEY: &str = "repo_choice";

/// Dotted paths holding credentials, masked when the document is displayed.
pub const SECRET_KEYS: &[&str] = &["github.token", "pypi.pass"];

/// Which integrations repository a command works on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RepoChoice {
    #[default]
    Core,
    Extras,
}

impl RepoChoice {
    /// The top-level key holding this repository's checkout path.
    pub fn as_str(&self) -> &'static str {
        match self {
            RepoChoice::Core => "core",
            RepoChoice::Extras => "extras",
        }
    }
}

impl std::fmt::Display for RepoChoice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

fn default_repo_path(repo: &str) -> String {
    let relative = PathBuf::from("dd").join(repo);
    dirs::home_dir()
        .map(|home| home.join(&relative))
        .unwrap_or(relative)
        .to_string_lossy()
        .into_owned()
}

/// Build a fresh copy of the default document.
pub fn defaults() -> ConfigDocument {
    let root = Section::new()
        .with(
            RepoChoice::Core.as_str(),
            default_repo_path("integrations-core"),
        )
        .with(
            RepoChoice::Extras.as_str(),
            default_repo_path("integrations-extras"),
        )
        .with("github", Section::new().with("user", "").with("token", ""))
        .with("pypi", Section::new().with("user", "").with("pass", ""));

    ConfigDocument::from(root)
}
