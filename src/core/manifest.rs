//! Rewrites loopback remote locators in a federation manifest to their
//! public deployment URLs.

use crate::config::DeployConfig;
use crate::domain::model::{Manifest, ManifestOutcome, ManifestReport, RemoteDescriptor, Rewrite};
use crate::utils::error::{DeployError, Result};
use regex::Regex;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

fn loopback_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"localhost:(\d+)").expect("static regex"))
}

/// Returns the public URL for `locator` if it mentions `localhost:<port>` for a
/// mapped port. The whole digit run is the port, so `localhost:8080` never
/// matches port 80. The first mapped occurrence in the locator wins.
pub fn rewrite_locator(
    locator: &str,
    port_map: &BTreeMap<u16, String>,
    public_base_url: &str,
    entry_file: &str,
) -> Option<(String, String)> {
    loopback_pattern()
        .captures_iter(locator)
        .filter_map(|caps| caps[1].parse::<u16>().ok())
        .find_map(|port| port_map.get(&port))
        .map(|unit| {
            let url = RemoteDescriptor::new(unit, public_base_url).entry_url(entry_file);
            (unit.clone(), url)
        })
}

#[derive(Debug, Clone)]
pub struct ManifestRewriter {
    port_map: BTreeMap<u16, String>,
    public_base_url: String,
    entry_file: String,
}

impl ManifestRewriter {
    pub fn new(port_map: BTreeMap<u16, String>, public_base_url: &str, entry_file: &str) -> Self {
        Self {
            port_map,
            public_base_url: public_base_url.to_string(),
            entry_file: entry_file.to_string(),
        }
    }

    pub fn from_config(config: &DeployConfig) -> Self {
        Self::new(
            config.port_map(),
            &config.public_base_url(),
            &config.entry_file,
        )
    }

    /// Rewrites matching locators in place and reports each change.
    pub fn rewrite(&self, manifest: &mut Manifest) -> Vec<Rewrite> {
        let mut rewrites = Vec::new();
        for locator in manifest.locators_mut() {
            if let Some((unit, url)) =
                rewrite_locator(locator, &self.port_map, &self.public_base_url, &self.entry_file)
            {
                let from = std::mem::replace(locator, url.clone());
                rewrites.push(Rewrite { unit, from, to: url });
            }
        }
        rewrites
    }

    pub fn fix_file(&self, path: &Path) -> Result<ManifestOutcome> {
        if !path.exists() {
            tracing::info!("⚠️  Manifest not found: {}", path.display());
            return Ok(ManifestOutcome::Missing);
        }

        let content = std::fs::read(path)?;
        let mut manifest =
            Manifest::from_slice(&content).map_err(|source| DeployError::ManifestFormat {
                path: path.to_path_buf(),
                source,
            })?;

        if !manifest.has_remotes() {
            tracing::info!("Manifest has no remotes, leaving it as is: {}", path.display());
            return Ok(ManifestOutcome::NoRemotes);
        }

        let rewrites = self.rewrite(&mut manifest);
        for rewrite in &rewrites {
            tracing::info!(
                "✅ Fixed {} remote: {} -> {}",
                rewrite.unit,
                rewrite.from,
                rewrite.to
            );
        }

        std::fs::write(path, manifest.to_pretty_json()?)?;
        tracing::info!("✅ Updated manifest: {}", path.display());

        Ok(ManifestOutcome::Patched { rewrites })
    }

    /// Stops at the first malformed manifest; missing ones are reported and skipped.
    pub fn fix_all(&self, paths: &[PathBuf]) -> Result<Vec<ManifestReport>> {
        paths
            .iter()
            .map(|path| {
                self.fix_file(path).map(|outcome| ManifestReport {
                    path: path.clone(),
                    outcome,
                })
            })
            .collect()
    }
}
