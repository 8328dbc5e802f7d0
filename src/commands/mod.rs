//! Command implementations for the ddev CLI.
//!
//! Each command takes the loaded [`Context`] and returns a result value that
//! implements [`Output`]; `main.rs` decides between JSON and human output.

use std::path::{Path, PathBuf};

use serde_json::json;

use crate::Result;
use crate::config::{
    ConfigDocument, ConfigStore, Node, REPO_CHOICE_KEY, RepoChoice, SECRET_KEYS, Scalar, get_path,
    path::get_scalar_mut, set_value,
};

/// Placeholder shown instead of a credential.
const MASK: &str = "*****";

/// Command results that can be serialized to JSON or formatted for humans.
pub trait Output {
    /// Serialize to JSON string.
    fn to_json(&self) -> String;

    /// Format for human-readable output.
    fn to_human(&self) -> String;
}

/// State shared by every command of one invocation.
#[derive(Debug)]
pub struct Context {
    pub store: ConfigStore,
    /// Loaded document, including the transient `repo_choice` key
    pub config: ConfigDocument,
    pub repo_choice: RepoChoice,
    /// Working root for repository commands
    pub root: PathBuf,
    /// Warnings for the user, printed unless `--quiet`
    pub warnings: Vec<String>,
}

impl Context {
    /// Load the config and resolve the repository root.
    ///
    /// The root is the configured path for `repo_choice`, or the current
    /// directory when `here` is set or the configured directory is missing.
    pub fn load(store: ConfigStore, repo_choice: RepoChoice, here: bool) -> Result<Self> {
        let mut warnings = Vec::new();

        if !store.exists() {
            warnings.push(
                "No config file found; using default settings. Please see `ddev config -h`."
                    .to_string(),
            );
        }

        let mut config = store.load()?;
        config.insert(REPO_CHOICE_KEY, repo_choice.as_str());

        let configured = config
            .get(repo_choice.as_str())
            .and_then(Node::as_scalar)
            .map(Scalar::to_string)
            .unwrap_or_default();

        let root = if !here && Path::new(&configured).is_dir() {
            PathBuf::from(&configured)
        } else {
            if !here {
                warnings.push(format!(
                    "`integrations-{}` directory `{}` does not exist, defaulting to the current location.",
                    repo_choice, configured
                ));
            }
            std::env::current_dir()?
        };

        Ok(Self {
            store,
            config,
            repo_choice,
            root,
            warnings,
        })
    }

    /// Replace the document, keeping the transient key.
    fn replace_config(&mut self, config: ConfigDocument) {
        self.config = config;
        self.config
            .insert(REPO_CHOICE_KEY, self.repo_choice.as_str());
    }

    /// The document as it would be persisted.
    fn persisted_view(&self) -> ConfigDocument {
        let mut config = self.config.clone();
        config.remove(REPO_CHOICE_KEY);
        config
    }
}

fn node_to_json(node: &Node) -> Result<serde_json::Value> {
    Ok(serde_json::to_value(node.to_toml())?)
}

fn document_to_json(config: &ConfigDocument) -> Result<serde_json::Value> {
    Ok(serde_json::to_value(config.root().to_toml())?)
}

/// TOML text of a document without the trailing newline.
fn document_to_text(config: &ConfigDocument) -> Result<String> {
    Ok(config.to_toml_string()?.trim_end().to_string())
}

// ==================== config ====================

/// Result of `ddev config` with or without `--update`/`--restore`.
#[derive(Debug)]
pub struct ConfigLocation {
    pub path: PathBuf,
    pub updated: bool,
    pub restored: bool,
    pub repo_choice: RepoChoice,
    pub root: PathBuf,
}

impl Output for ConfigLocation {
    fn to_json(&self) -> String {
        json!({
            "path": self.path,
            "updated": self.updated,
            "restored": self.restored,
            "repo_choice": self.repo_choice.as_str(),
            "root": self.root,
        })
        .to_string()
    }

    fn to_human(&self) -> String {
        let mut lines = Vec::new();
        if self.updated {
            lines.push("Settings were successfully updated.".to_string());
        }
        if self.restored {
            lines.push("Settings were successfully restored.".to_string());
        }
        if self.updated || self.restored {
            lines.push(format!("Settings location: `{}`", self.path.display()));
        } else {
            lines.push(format!("\"{}\"", self.path.display()));
        }
        lines.join("\n")
    }
}

/// Locate, update, and/or restore the config file.
///
/// Update runs before restore when both are requested.
pub fn config(ctx: &mut Context, update: bool, restore: bool) -> Result<ConfigLocation> {
    if update {
        let config = ctx.store.update()?;
        ctx.replace_config(config);
    }
    if restore {
        let config = ctx.store.restore()?;
        ctx.replace_config(config);
    }

    Ok(ConfigLocation {
        path: ctx.store.path().to_path_buf(),
        updated: update,
        restored: restore,
        repo_choice: ctx.repo_choice,
        root: ctx.root.clone(),
    })
}

// ==================== config set ====================

/// Result of `ddev config set`.
#[derive(Debug)]
pub struct ConfigSetResult {
    pub key: String,
    /// Only the path that was written
    pub changed: ConfigDocument,
    changed_json: serde_json::Value,
    changed_text: String,
}

impl Output for ConfigSetResult {
    fn to_json(&self) -> String {
        json!({
            "key": self.key,
            "changed": self.changed_json,
        })
        .to_string()
    }

    fn to_human(&self) -> String {
        format!("New setting:\n{}", self.changed_text)
    }
}

/// Assign a value and persist the document.
pub fn config_set(ctx: &mut Context, key: &str, value: &str) -> Result<ConfigSetResult> {
    let changed = set_value(&mut ctx.config, key, value)?;
    ctx.store.save(&ctx.config)?;
    ctx.config
        .insert(REPO_CHOICE_KEY, ctx.repo_choice.as_str());

    Ok(ConfigSetResult {
        key: key.to_string(),
        changed_json: document_to_json(&changed)?,
        changed_text: document_to_text(&changed)?,
        changed,
    })
}

// ==================== config get ====================

/// Result of `ddev config get`.
#[derive(Debug)]
pub struct ConfigGetResult {
    pub key: String,
    pub value: Node,
    value_json: serde_json::Value,
    value_text: String,
}

impl Output for ConfigGetResult {
    fn to_json(&self) -> String {
        json!({
            "key": self.key,
            "value": self.value_json,
        })
        .to_string()
    }

    fn to_human(&self) -> String {
        self.value_text.clone()
    }
}

/// Look up a single value or section.
pub fn config_get(ctx: &Context, key: &str) -> Result<ConfigGetResult> {
    let config = ctx.persisted_view();
    let value = get_path(&config, key)?.clone();
    let value_text = match &value {
        Node::Scalar(scalar) => scalar.to_string(),
        Node::Section(section) => document_to_text(&ConfigDocument::from(section.clone()))?,
    };

    Ok(ConfigGetResult {
        key: key.to_string(),
        value_json: node_to_json(&value)?,
        value_text,
        value,
    })
}

// ==================== config show ====================

/// Result of `ddev config show`.
#[derive(Debug)]
pub struct ConfigShowResult {
    pub path: PathBuf,
    pub config: ConfigDocument,
    pub masked: bool,
    config_json: serde_json::Value,
    config_text: String,
}

impl Output for ConfigShowResult {
    fn to_json(&self) -> String {
        json!({
            "path": self.path,
            "masked": self.masked,
            "config": self.config_json,
        })
        .to_string()
    }

    fn to_human(&self) -> String {
        self.config_text.clone()
    }
}

/// Replace non-empty credentials with a placeholder.
fn mask_secrets(config: &mut ConfigDocument) {
    for key in SECRET_KEYS {
        if let Some(scalar) = get_scalar_mut(config, key) {
            let is_empty = matches!(scalar, Scalar::String(s) if s.is_empty());
            if !is_empty {
                *scalar = Scalar::from(MASK);
            }
        }
    }
}

/// Show the whole document, masking credentials unless `all` is set.
pub fn config_show(ctx: &Context, all: bool) -> Result<ConfigShowResult> {
    let mut config = ctx.persisted_view();
    if !all {
        mask_secrets(&mut config);
    }

    Ok(ConfigShowResult {
        path: ctx.store.path().to_path_buf(),
        config_json: document_to_json(&config)?,
        config_text: document_to_text(&config)?,
        config,
        masked: !all,
    })
}
