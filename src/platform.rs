//! Host platform capabilities.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use walkdir::WalkDir;

/// Default preview cap on resource-constrained hosts
pub const DEFAULT_MAX_CACHED_PREVIEWS: usize = 32;

/// What the host platform offers the schematic subsystem.
pub trait Platform {
    /// Whether preview memory must be bounded (mobile, low-memory hosts).
    fn is_resource_constrained(&self) -> bool;

    /// How many previews may stay cached on a constrained host.
    fn max_cached_previews(&self) -> usize;

    /// Schematic files installed through an external distribution channel.
    fn workshop_content(&self) -> Vec<PathBuf>;
}

/// Platform profile read from settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlatformSettings {
    pub resource_constrained: bool,
    pub max_cached_previews: usize,
    /// Each subscribed item lives in its own folder below one of these
    pub workshop_dirs: Vec<PathBuf>,
}

impl Default for PlatformSettings {
    fn default() -> Self {
        Self {
            resource_constrained: false,
            max_cached_previews: DEFAULT_MAX_CACHED_PREVIEWS,
            workshop_dirs: Vec::new(),
        }
    }
}

impl Platform for PlatformSettings {
    fn is_resource_constrained(&self) -> bool {
        self.resource_constrained
    }

    fn max_cached_previews(&self) -> usize {
        self.max_cached_previews
    }

    fn workshop_content(&self) -> Vec<PathBuf> {
        let mut files = Vec::new();
        for dir in &self.workshop_dirs {
            for entry in WalkDir::new(dir)
                .follow_links(true)
                .into_iter()
                .filter_map(|e| e.ok())
            {
                if entry.file_type().is_file() {
                    files.push(entry.into_path());
                }
            }
        }
        files.sort();
        files
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_workshop_content_lists_files_recursively() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("1234")).unwrap();
        fs::create_dir_all(dir.path().join("5678/nested")).unwrap();
        fs::write(dir.path().join("1234/a.msch"), "{}").unwrap();
        fs::write(dir.path().join("5678/nested/b.msch"), "{}").unwrap();

        let platform = PlatformSettings {
            workshop_dirs: vec![dir.path().to_path_buf()],
            ..Default::default()
        };

        let files = platform.workshop_content();
        assert_eq!(files.len(), 2);
        assert!(files.iter().any(|f| f.ends_with("1234/a.msch")));
    }

    #[test]
    fn test_missing_workshop_dir_is_empty() {
        let platform = PlatformSettings {
            workshop_dirs: vec![PathBuf::from("/nonexistent/workshop")],
            ..Default::default()
        };
        assert!(platform.workshop_content().is_empty());
    }
}
