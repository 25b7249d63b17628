//! Project discovery and account resolution.
//!
//! Orbit projects are marked by an `Orbit.toml` manifest at the project root.
//! The manifest names the account that owns the project; every scoped API
//! query runs on behalf of that account.

use std::path::{Path, PathBuf};

use color_eyre::eyre::{self, Context, bail};
use serde::Deserialize;
use tracing::debug;

/// Manifest file marking an Orbit project root.
pub const MANIFEST_FILE: &str = "Orbit.toml";

/// The account owning the current project.
///
/// Immutable for the lifetime of a command; all scoped queries use `name`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    /// Opaque account handle used by the Orbit API.
    pub name: String,
}

/// Parsed `Orbit.toml` manifest.
#[derive(Debug, Clone, Deserialize)]
pub struct Manifest {
    project: ProjectSection,
}

#[derive(Debug, Clone, Deserialize)]
struct ProjectSection {
    #[allow(dead_code)]
    name: String,
    owner: Option<String>,
}

impl Manifest {
    /// Load the manifest from a project root directory.
    ///
    /// # Errors
    /// Returns an error if the manifest cannot be read or parsed.
    pub fn load(project_dir: &Path) -> eyre::Result<Self> {
        let path = project_dir.join(MANIFEST_FILE);
        let contents = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        toml::from_str(&contents).with_context(|| format!("failed to parse {}", path.display()))
    }

    /// Resolve the account owning this project.
    ///
    /// # Errors
    /// Returns an error if the manifest does not name an owner.
    pub fn owner_account(&self) -> eyre::Result<Account> {
        match self.project.owner.as_deref() {
            Some(owner) if !owner.trim().is_empty() => Ok(Account {
                name: owner.trim().to_string(),
            }),
            _ => bail!(
                "no owner configured for this project, set `project.owner` in {MANIFEST_FILE}"
            ),
        }
    }
}

/// Walk up from `start` looking for the directory containing `Orbit.toml`.
///
/// # Errors
/// Returns an error if no manifest is found in `start` or any ancestor.
pub fn find_project_root(start: &Path) -> eyre::Result<PathBuf> {
    for dir in start.ancestors() {
        if dir.join(MANIFEST_FILE).is_file() {
            debug!(root = %dir.display(), "found project root");
            return Ok(dir.to_path_buf());
        }
    }
    bail!(
        "no {MANIFEST_FILE} found in {} or any parent directory, run this command inside an Orbit project",
        start.display()
    )
}

/// Resolve the owning account for the project containing the current directory.
///
/// # Errors
/// Returns an error if no project root is found or the manifest is invalid.
pub fn owner_account_for_cwd() -> eyre::Result<Account> {
    let cwd = std::env::current_dir().context("failed to read the current directory")?;
    let root = find_project_root(&cwd)?;
    Manifest::load(&root)?.owner_account()
}
