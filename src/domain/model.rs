use serde::de::Error as _;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const REMOTES_KEY: &str = "remotes";
pub const LOCATOR_KEY: &str = "federationContainerName";

/// Where a remote unit is published.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteDescriptor {
    pub name: String,
    pub public_base_url: String,
}

impl RemoteDescriptor {
    pub fn new(name: &str, public_base_url: &str) -> Self {
        Self {
            name: name.to_string(),
            public_base_url: public_base_url.to_string(),
        }
    }

    pub fn public_url(&self) -> String {
        format!("{}{}/", self.public_base_url, self.name)
    }

    pub fn entry_url(&self, entry_file: &str) -> String {
        format!("{}{}", self.public_url(), entry_file)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitKind {
    Remote,
    Host,
}

/// One invocation of the external build tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildJob {
    pub unit: String,
    pub kind: UnitKind,
    pub program: String,
    pub args: Vec<String>,
    pub working_dir: PathBuf,
}

impl BuildJob {
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Filesystem locations of one run, resolved against the workspace root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployLayout {
    pub root: PathBuf,
    pub dist_dir: PathBuf,
    pub staging_dir: PathBuf,
}

impl DeployLayout {
    pub fn new(root: &Path, dist_dir: &Path, staging_dir: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
            dist_dir: root.join(dist_dir),
            staging_dir: root.join(staging_dir),
        }
    }

    /// Build tools disagree on whether apps land under `dist/apps/` or `dist/`.
    pub fn output_candidates(&self, unit: &str) -> [PathBuf; 2] {
        [
            self.dist_dir.join("apps").join(unit),
            self.dist_dir.join(unit),
        ]
    }

    /// Remotes go to their own folder under staging; the host is merged into it.
    pub fn stage_target(&self, unit: &str, kind: UnitKind) -> PathBuf {
        match kind {
            UnitKind::Remote => self.staging_dir.join(unit),
            UnitKind::Host => self.staging_dir.clone(),
        }
    }

    /// Candidates equal to or above the copy target. Copying one of them
    /// would walk into its own copy.
    pub fn enclosing_candidates(&self, unit: &str, kind: UnitKind) -> Vec<PathBuf> {
        let target = self.stage_target(unit, kind);
        self.output_candidates(unit)
            .into_iter()
            .filter(|candidate| target.starts_with(candidate))
            .collect()
    }

    pub fn manifest_locations(&self, host: &str, manifest_file: &str) -> Vec<PathBuf> {
        vec![
            self.dist_dir.join("apps").join(host).join(manifest_file),
            self.staging_dir.join(manifest_file),
        ]
    }
}

/// A module-federation manifest. Only `remotes[].federationContainerName` is
/// interpreted; every other key is carried through in its original order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Manifest(Map<String, Value>);

impl Manifest {
    pub fn parse(content: &str) -> serde_json::Result<Self> {
        Self::from_slice(content.as_bytes())
    }

    /// Invalid UTF-8 is reported as a JSON error like any other malformed input.
    pub fn from_slice(content: &[u8]) -> serde_json::Result<Self> {
        let manifest: Self = serde_json::from_slice(content)?;
        manifest.check_shape()?;
        Ok(manifest)
    }

    fn check_shape(&self) -> serde_json::Result<()> {
        let entries = match self.0.get(REMOTES_KEY) {
            None | Some(Value::Null) => return Ok(()),
            Some(Value::Array(entries)) => entries,
            Some(_) => return Err(serde_json::Error::custom("`remotes` must be an array")),
        };

        for (index, entry) in entries.iter().enumerate() {
            let entry = entry.as_object().ok_or_else(|| {
                serde_json::Error::custom(format!("remotes[{}] must be an object", index))
            })?;
            if let Some(locator) = entry.get(LOCATOR_KEY) {
                if !locator.is_string() {
                    return Err(serde_json::Error::custom(format!(
                        "remotes[{}].{} must be a string",
                        index, LOCATOR_KEY
                    )));
                }
            }
        }
        Ok(())
    }

    pub fn has_remotes(&self) -> bool {
        matches!(self.0.get(REMOTES_KEY), Some(Value::Array(_)))
    }

    pub fn locators(&self) -> Vec<&str> {
        self.0
            .get(REMOTES_KEY)
            .and_then(Value::as_array)
            .into_iter()
            .flatten()
            .filter_map(|entry| entry.get(LOCATOR_KEY).and_then(Value::as_str))
            .collect()
    }

    pub fn locators_mut(&mut self) -> impl Iterator<Item = &mut String> + '_ {
        self.0
            .get_mut(REMOTES_KEY)
            .and_then(Value::as_array_mut)
            .into_iter()
            .flatten()
            .filter_map(|entry| match entry.get_mut(LOCATOR_KEY) {
                Some(Value::String(locator)) => Some(locator),
                _ => None,
            })
    }

    pub fn to_pretty_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewrite {
    pub unit: String,
    pub from: String,
    pub to: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManifestOutcome {
    Missing,
    NoRemotes,
    Patched { rewrites: Vec<Rewrite> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestReport {
    pub path: PathBuf,
    pub outcome: ManifestOutcome,
}

/// Unit name to absolute entry URL, in unit order. Written as `remotes.json`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoutingTable(Map<String, Value>);

impl RoutingTable {
    pub fn insert(&mut self, unit: &str, url: String) {
        self.0.insert(unit.to_string(), Value::String(url));
    }

    pub fn get(&self, unit: &str) -> Option<&str> {
        self.0.get(unit).and_then(Value::as_str)
    }

    pub fn units(&self) -> impl Iterator<Item = &str> + '_ {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct DeploySummary {
    pub built: Vec<String>,
    pub staged: Vec<String>,
    pub skipped: Vec<String>,
    pub host_staged: bool,
    pub manifests: Vec<ManifestReport>,
    pub routing: RoutingTable,
    pub elapsed: Duration,
}
