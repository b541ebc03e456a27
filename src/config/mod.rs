#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::domain::model::{DeployLayout, RemoteDescriptor, UnitKind};
use crate::utils::error::{DeployError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// A remote unit together with the port its dev server listens on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitDefinition {
    pub name: String,
    pub dev_port: u16,
}

impl UnitDefinition {
    pub fn new(name: &str, dev_port: u16) -> Self {
        Self {
            name: name.to_string(),
            dev_port,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildToolConfig {
    pub program: String,
    pub args: Vec<String>,
    pub configuration: String,
    pub skip_cache: bool,
}

impl Default for BuildToolConfig {
    fn default() -> Self {
        Self {
            program: "npx".to_string(),
            args: vec!["nx".to_string(), "build".to_string()],
            configuration: "production".to_string(),
            skip_cache: true,
        }
    }
}

/// Everything a deployment run needs. Missing TOML fields fall back to [`Default`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeployConfig {
    pub repo_name: String,
    pub site_origin: String,
    pub host: String,
    /// Build order and the dev-port table in one list.
    pub units: Vec<UnitDefinition>,
    pub dist_dir: PathBuf,
    pub staging_dir: PathBuf,
    pub entry_file: String,
    pub manifest_file: String,
    pub build: BuildToolConfig,
}

impl Default for DeployConfig {
    fn default() -> Self {
        Self {
            repo_name: "mfedemos".to_string(),
            site_origin: "https://hemantajax.github.io".to_string(),
            host: "mfeui".to_string(),
            units: vec![
                UnitDefinition::new("products", 4201),
                UnitDefinition::new("cart", 4202),
                UnitDefinition::new("profile", 4203),
                UnitDefinition::new("orders", 4204),
                UnitDefinition::new("analytics", 4205),
                UnitDefinition::new("notifications", 4206),
                UnitDefinition::new("messages", 4207),
                UnitDefinition::new("admin", 4208),
            ],
            dist_dir: PathBuf::from("dist"),
            staging_dir: PathBuf::from("dist/gh-pages"),
            entry_file: "remoteEntry.mjs".to_string(),
            manifest_file: "mf-manifest.json".to_string(),
            build: BuildToolConfig::default(),
        }
    }
}

impl DeployConfig {
    /// `/<repo_name>/`
    pub fn base_href(&self) -> String {
        format!("/{}/", self.repo_name)
    }

    /// Site origin joined with the base href, always ending in `/`.
    pub fn public_base_url(&self) -> String {
        format!("{}{}", self.site_origin.trim_end_matches('/'), self.base_href())
    }

    pub fn unit_names(&self) -> Vec<&str> {
        self.units.iter().map(|u| u.name.as_str()).collect()
    }

    pub fn port_map(&self) -> BTreeMap<u16, String> {
        self.units
            .iter()
            .map(|u| (u.dev_port, u.name.clone()))
            .collect()
    }

    pub fn remote_descriptors(&self) -> Vec<RemoteDescriptor> {
        let base = self.public_base_url();
        self.units
            .iter()
            .map(|u| RemoteDescriptor::new(&u.name, &base))
            .collect()
    }

    pub fn layout(&self, root: &Path) -> DeployLayout {
        DeployLayout::new(root, &self.dist_dir, &self.staging_dir)
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_path_segment("repo_name", &self.repo_name)?;
        validation::validate_url("site_origin", &self.site_origin)?;
        validation::validate_url("public_base_url", &self.public_base_url())?;
        validation::validate_unit_name("host", &self.host)?;
        validation::validate_non_empty_string("entry_file", &self.entry_file)?;
        validation::validate_non_empty_string("manifest_file", &self.manifest_file)?;
        validation::validate_non_empty_string("build.program", &self.build.program)?;
        validation::validate_path("dist_dir", &self.dist_dir.to_string_lossy())?;
        validation::validate_path("staging_dir", &self.staging_dir.to_string_lossy())?;

        if self.units.is_empty() {
            return Err(DeployError::MissingConfigError {
                field: "units".to_string(),
            });
        }

        for unit in &self.units {
            validation::validate_unit_name("units.name", &unit.name)?;
            validation::validate_range("units.dev_port", unit.dev_port, 1, u16::MAX)?;
        }
        validation::validate_unique("units.name", self.units.iter().map(|u| u.name.as_str()))?;
        validation::validate_unique("units.dev_port", self.units.iter().map(|u| u.dev_port))?;

        if self.units.iter().any(|u| u.name == self.host) {
            return Err(DeployError::ConfigValidationError {
                field: "host".to_string(),
                message: format!("'{}' is also declared as a remote unit", self.host),
            });
        }

        let layout = self.layout(Path::new(""));
        let kinds = self
            .units
            .iter()
            .map(|u| (u.name.as_str(), UnitKind::Remote))
            .chain(std::iter::once((self.host.as_str(), UnitKind::Host)));
        for (unit, kind) in kinds {
            if let Some(candidate) = layout.enclosing_candidates(unit, kind).first() {
                return Err(DeployError::ConfigValidationError {
                    field: "staging_dir".to_string(),
                    message: format!(
                        "build output {} for '{}' would contain its own staged copy",
                        candidate.display(),
                        unit
                    ),
                });
            }
        }

        Ok(())
    }
}

impl Validate for DeployConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
