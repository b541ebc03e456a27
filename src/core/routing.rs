use crate::domain::model::{RemoteDescriptor, RoutingTable};
use crate::utils::error::Result;
use std::fs;
use std::path::{Path, PathBuf};

pub const ROUTING_FILE: &str = "remotes.json";
pub const NOJEKYLL_FILE: &str = ".nojekyll";

pub fn build_routing_table(remotes: &[RemoteDescriptor], entry_file: &str) -> RoutingTable {
    let mut table = RoutingTable::default();
    for remote in remotes {
        table.insert(&remote.name, remote.entry_url(entry_file));
    }
    table
}

/// Writes `remotes.json`, which the host reads at startup to locate remotes.
pub fn write_routing_file(staging_dir: &Path, table: &RoutingTable) -> Result<PathBuf> {
    let path = staging_dir.join(ROUTING_FILE);
    fs::write(&path, serde_json::to_string_pretty(table)?)?;
    tracing::info!("✅ Created {} configuration", ROUTING_FILE);
    Ok(path)
}

/// Zero-byte marker so the static host serves files starting with `_`.
pub fn write_nojekyll(staging_dir: &Path) -> Result<PathBuf> {
    let path = staging_dir.join(NOJEKYLL_FILE);
    fs::write(&path, b"")?;
    tracing::info!("✅ Created {} file", NOJEKYLL_FILE);
    Ok(path)
}
