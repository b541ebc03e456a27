use crate::domain::model::{DeployLayout, UnitKind};
use crate::utils::error::Result;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageOutcome {
    Staged { from: PathBuf },
    Skipped,
}

/// Assembles build outputs into the staging directory.
#[derive(Debug, Clone)]
pub struct Stager {
    layout: DeployLayout,
}

impl Stager {
    pub fn new(layout: DeployLayout) -> Self {
        Self { layout }
    }

    pub fn staging_dir(&self) -> &Path {
        &self.layout.staging_dir
    }

    /// Removes any previous staging tree and recreates it empty.
    pub fn prepare(&self) -> Result<()> {
        let staging = &self.layout.staging_dir;
        if staging.exists() {
            tracing::debug!("Removing previous staging tree {}", staging.display());
            fs::remove_dir_all(staging)?;
        }
        fs::create_dir_all(staging)?;
        Ok(())
    }

    /// First existing candidate that does not enclose the copy target.
    fn find_output(&self, unit: &str, kind: UnitKind) -> Option<PathBuf> {
        let enclosing = self.layout.enclosing_candidates(unit, kind);
        self.layout
            .output_candidates(unit)
            .into_iter()
            .filter(|candidate| !enclosing.contains(candidate))
            .find(|candidate| candidate.is_dir())
    }

    /// Copies a remote's output to `<staging>/<unit>`. A missing output is a
    /// warning, not an error.
    pub fn stage_remote(&self, unit: &str) -> Result<StageOutcome> {
        let Some(source) = self.find_output(unit, UnitKind::Remote) else {
            let [apps, root] = self.layout.output_candidates(unit);
            tracing::warn!(
                "⚠️  {} build output not found in {} or {}",
                unit,
                apps.display(),
                root.display()
            );
            return Ok(StageOutcome::Skipped);
        };

        let target = self.layout.stage_target(unit, UnitKind::Remote);
        copy_dir_recursive(&source, &target)?;
        tracing::info!("✅ {} copied to {}", unit, target.display());
        Ok(StageOutcome::Staged { from: source })
    }

    /// Merges the host output into the staging root.
    pub fn stage_host(&self, host: &str) -> Result<StageOutcome> {
        let Some(source) = self.find_output(host, UnitKind::Host) else {
            tracing::error!("❌ Host build output not found for {}", host);
            return Ok(StageOutcome::Skipped);
        };

        let target = self.layout.stage_target(host, UnitKind::Host);
        copy_dir_recursive(&source, &target)?;
        tracing::info!("✅ Host copied to {}", target.display());
        Ok(StageOutcome::Staged { from: source })
    }
}

/// Recursively copy a directory. Symlinks are recreated, not followed, so
/// dangling or directory links survive the copy.
pub fn copy_dir_recursive(src: &Path, dst: &Path) -> Result<()> {
    fs::create_dir_all(dst)?;

    for entry in WalkDir::new(src).follow_links(false) {
        let entry = entry?;
        let rel_path = entry
            .path()
            .strip_prefix(src)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
        let dst_path = dst.join(rel_path);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&dst_path)?;
        } else if entry.file_type().is_symlink() {
            copy_symlink(entry.path(), &dst_path)?;
        } else {
            if let Some(parent) = dst_path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(entry.path(), &dst_path)?;
        }
    }

    Ok(())
}

#[cfg(unix)]
fn copy_symlink(src: &Path, dst: &Path) -> Result<()> {
    let target = fs::read_link(src)?;
    if dst.symlink_metadata().is_ok() {
        fs::remove_file(dst)?;
    }
    std::os::unix::fs::symlink(target, dst)?;
    Ok(())
}

#[cfg(not(unix))]
fn copy_symlink(src: &Path, _dst: &Path) -> Result<()> {
    tracing::warn!("Skipping symlink {}", src.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn layout(root: &Path) -> DeployLayout {
        DeployLayout::new(root, Path::new("dist"), Path::new("dist/gh-pages"))
    }

    fn write(path: &Path, content: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_prepare_clears_previous_run() {
        let dir = TempDir::new().unwrap();
        let stager = Stager::new(layout(dir.path()));
        write(&dir.path().join("dist/gh-pages/stale.txt"), "old");

        stager.prepare().unwrap();

        assert!(stager.staging_dir().is_dir());
        assert!(!stager.staging_dir().join("stale.txt").exists());
    }

    #[test]
    fn test_apps_location_preferred_over_root() {
        let dir = TempDir::new().unwrap();
        write(&dir.path().join("dist/apps/cart/remoteEntry.mjs"), "apps");
        write(&dir.path().join("dist/cart/remoteEntry.mjs"), "root");
        let stager = Stager::new(layout(dir.path()));
        stager.prepare().unwrap();

        let outcome = stager.stage_remote("cart").unwrap();

        assert_eq!(
            outcome,
            StageOutcome::Staged {
                from: dir.path().join("dist/apps/cart")
            }
        );
        let staged = fs::read_to_string(dir.path().join("dist/gh-pages/cart/remoteEntry.mjs"));
        assert_eq!(staged.unwrap(), "apps");
    }

    #[test]
    fn test_root_location_fallback_copies_nested_files() {
        let dir = TempDir::new().unwrap();
        write(&dir.path().join("dist/products/assets/logo.svg"), "<svg/>");
        let stager = Stager::new(layout(dir.path()));
        stager.prepare().unwrap();

        let outcome = stager.stage_remote("products").unwrap();

        assert!(matches!(outcome, StageOutcome::Staged { .. }));
        assert!(dir
            .path()
            .join("dist/gh-pages/products/assets/logo.svg")
            .exists());
    }

    #[test]
    fn test_missing_output_is_skipped() {
        let dir = TempDir::new().unwrap();
        let stager = Stager::new(layout(dir.path()));
        stager.prepare().unwrap();

        assert_eq!(stager.stage_remote("orders").unwrap(), StageOutcome::Skipped);
        assert!(!dir.path().join("dist/gh-pages/orders").exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinks_are_recreated() {
        use std::os::unix::fs::symlink;

        let dir = TempDir::new().unwrap();
        let out = dir.path().join("dist/apps/cart");
        write(&out.join("assets/logo.svg"), "<svg/>");
        symlink("assets", out.join("static")).unwrap();
        symlink("does-not-exist.js", out.join("dangling.js")).unwrap();
        let stager = Stager::new(layout(dir.path()));
        stager.prepare().unwrap();

        let outcome = stager.stage_remote("cart").unwrap();

        assert!(matches!(outcome, StageOutcome::Staged { .. }));
        let staged = dir.path().join("dist/gh-pages/cart");
        assert_eq!(
            fs::read_link(staged.join("static")).unwrap(),
            PathBuf::from("assets")
        );
        assert!(staged.join("static/logo.svg").exists());
        assert_eq!(
            fs::read_link(staged.join("dangling.js")).unwrap(),
            PathBuf::from("does-not-exist.js")
        );
    }

    #[test]
    fn test_candidate_enclosing_staging_dir_is_ignored() {
        let dir = TempDir::new().unwrap();
        let stager = Stager::new(layout(dir.path()));
        stager.prepare().unwrap();

        // dist/gh-pages is both the staging dir and the second candidate for "gh-pages".
        assert_eq!(stager.stage_remote("gh-pages").unwrap(), StageOutcome::Skipped);
        assert!(!dir.path().join("dist/gh-pages/gh-pages").exists());
    }

    #[test]
    fn test_host_is_merged_into_root() {
        let dir = TempDir::new().unwrap();
        write(&dir.path().join("dist/apps/mfeui/index.html"), "<html/>");
        let stager = Stager::new(layout(dir.path()));
        stager.prepare().unwrap();

        stager.stage_host("mfeui").unwrap();

        assert!(dir.path().join("dist/gh-pages/index.html").exists());
        assert!(!dir.path().join("dist/gh-pages/mfeui").exists());
    }
}
