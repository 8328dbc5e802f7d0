//! Persistence of the configuration document.
//!
//! [`ConfigStore`] owns the path of the backing `config.toml` and is the only
//! place the document touches the filesystem. Writes go through a temporary
//! file in the destination directory which is renamed over the destination,
//! so readers never see a partially written file.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::debug;

use super::document::ConfigDocument;
use super::schema::{APP_NAME, CONFIG_FILE_NAME, REPO_CHOICE_KEY, defaults};
use crate::{Error, Result};

/// Environment variable overriding the application data directory.
pub const DATA_DIR_ENV: &str = "DDEV_DATA_DIR";

/// Get the default location of config.toml.
///
/// Uses `$DDEV_DATA_DIR/config.toml` when the override is set, otherwise
/// `<user-data-dir>/dd-checks-dev/config.toml` (e.g.
/// `~/.local/share/dd-checks-dev/config.toml` on Linux).
pub fn default_config_path() -> Result<PathBuf> {
    if let Some(dir) = std::env::var_os(DATA_DIR_ENV) {
        return Ok(PathBuf::from(dir).join(CONFIG_FILE_NAME));
    }

    let data_dir = dirs::data_dir().ok_or(Error::NoDataDir)?;
    Ok(data_dir.join(APP_NAME).join(CONFIG_FILE_NAME))
}

/// File-backed configuration store.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    /// Create a store backed by the given file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Create a store backed by the platform default location.
    pub fn open_default() -> Result<Self> {
        let path = default_config_path()?;
        debug!(path = %path.display(), "resolved config path");
        Ok(Self::new(path))
    }

    /// Get the path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Check whether the backing file exists.
    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Load the document, shallow-merged over the defaults.
    ///
    /// Each top-level key in the file replaces the default value for that key
    /// wholesale. A file that defines `[github]` with only `user` therefore
    /// has no `github.token` after loading.
    ///
    /// # Errors
    /// Returns [`Error::Parse`] if the file exists but is not valid TOML, or
    /// [`Error::Io`] if it cannot be read. A missing file is not an error.
    pub fn load(&self) -> Result<ConfigDocument> {
        let mut config = defaults();

        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no config file, using defaults");
                return Ok(config);
            }
            Err(e) => return Err(e.into()),
        };

        let file = ConfigDocument::from_toml_str(&text).map_err(|source| Error::Parse {
            path: self.path.clone(),
            source,
        })?;

        for (key, node) in file.into_root() {
            config.insert(key, node);
        }

        debug!(path = %self.path.display(), "loaded config file");
        Ok(config)
    }

    /// Persist the document atomically.
    ///
    /// The transient `repo_choice` key is never written. The parent directory
    /// is created if missing. On Unix the file is created with 0600
    /// permissions since it may hold tokens.
    pub fn save(&self, config: &ConfigDocument) -> Result<()> {
        self.save_with(config, |_| Ok(()))
    }

    /// Like [`save`](Self::save), running `before_commit` on the fully
    /// written temp file right before it is renamed into place.
    pub(crate) fn save_with<F>(&self, config: &ConfigDocument, before_commit: F) -> Result<()>
    where
        F: FnOnce(&Path) -> io::Result<()>,
    {
        let mut config = config.clone();
        config.remove(REPO_CHOICE_KEY);
        let contents = config.to_toml_string()?;

        let parent = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(parent)?;

        // Dropping the temp file on any early return deletes it.
        let mut file = NamedTempFile::new_in(parent)?;
        file.write_all(contents.as_bytes())?;
        file.as_file().sync_all()?;

        before_commit(file.path())?;

        file.persist(&self.path).map_err(|e| Error::Io(e.error))?;

        debug!(path = %self.path.display(), "saved config file");
        Ok(())
    }

    /// Overwrite the file with the defaults and return them.
    pub fn restore(&self) -> Result<ConfigDocument> {
        let config = defaults();
        self.save(&config)?;
        Ok(config)
    }

    /// Rewrite the file with any new default keys filled in.
    ///
    /// Existing overrides are preserved. Running this twice in a row produces
    /// identical bytes.
    pub fn update(&self) -> Result<ConfigDocument> {
        let config = self.load()?;
        self.save(&config)?;
        Ok(config)
    }
}
