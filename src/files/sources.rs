/// Discovery of candidate schematic files
///
/// Three places can hold schematics:
/// - the local schematic directory (flat listing)
/// - workshop content reported by the platform (see `crate::platform`)
/// - a `schematics` folder inside each installed mod (recursive listing)
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Folder inside each mod that holds its schematics
pub const MOD_SCHEMATIC_FOLDER: &str = "schematics";

/// True when `path` ends in exactly `.{extension}` (case-sensitive)
pub fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension().and_then(|ext| ext.to_str()) == Some(extension)
}

/// Files directly inside `dir`, sorted. A missing directory is empty.
pub fn list_local(dir: &Path) -> Vec<PathBuf> {
    list_children(dir, |entry| entry.file_type().is_file())
}

/// A file shipped by a mod
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModFile {
    pub mod_name: String,
    pub path: PathBuf,
}

/// Lists files that installed mods ship in a given folder
pub trait ModSource {
    fn list_files(&self, folder: &str) -> Vec<ModFile>;
}

/// Mods installed as `<root>/<mod name>/...` directories
#[derive(Debug, Clone)]
pub struct ModDirectory {
    root: PathBuf,
}

impl ModDirectory {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl ModSource for ModDirectory {
    fn list_files(&self, folder: &str) -> Vec<ModFile> {
        let mut files = Vec::new();

        for mod_dir in list_children(&self.root, |entry| entry.file_type().is_dir()) {
            let Some(mod_name) = mod_dir.file_name().and_then(|n| n.to_str()) else {
                continue;
            };

            // Walk the directory tree recursively
            for entry in WalkDir::new(mod_dir.join(folder))
                .follow_links(true)
                .into_iter()
                .filter_map(|e| e.ok())
            {
                if !entry.file_type().is_file() {
                    continue;
                }
                files.push(ModFile {
                    mod_name: mod_name.to_string(),
                    path: entry.into_path(),
                });
            }
        }

        files.sort_by(|a, b| a.path.cmp(&b.path));
        files
    }
}

/// No mods installed
#[derive(Debug, Default, Clone, Copy)]
pub struct NoMods;

impl ModSource for NoMods {
    fn list_files(&self, _folder: &str) -> Vec<ModFile> {
        Vec::new()
    }
}

fn list_children(dir: &Path, keep: impl Fn(&DirEntry) -> bool) -> Vec<PathBuf> {
    WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|entry| keep(entry))
        .map(|entry| entry.into_path())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_extension_match_is_exact() {
        assert!(has_extension(Path::new("a/b.msch"), "msch"));
        assert!(!has_extension(Path::new("a/b.MSCH"), "msch"));
        assert!(!has_extension(Path::new("a/b.msch.bak"), "msch"));
        assert!(!has_extension(Path::new("a/msch"), "msch"));
    }

    #[test]
    fn test_local_listing_is_flat() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.msch"), "").unwrap();
        fs::write(dir.path().join("a.msch"), "").unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("nested/c.msch"), "").unwrap();

        let files = list_local(dir.path());

        assert_eq!(files, vec![dir.path().join("a.msch"), dir.path().join("b.msch")]);
        assert!(list_local(&dir.path().join("missing")).is_empty());
    }

    #[test]
    fn test_mod_directory_lists_schematic_folders() {
        let root = tempfile::tempdir().unwrap();
        fs::create_dir_all(root.path().join("alpha/schematics/defense")).unwrap();
        fs::create_dir_all(root.path().join("beta/sprites")).unwrap();
        fs::write(root.path().join("alpha/schematics/defense/wall.msch"), "").unwrap();
        fs::write(root.path().join("alpha/schematics/base.msch"), "").unwrap();
        fs::write(root.path().join("beta/sprites/wall.png"), "").unwrap();

        let files = ModDirectory::new(root.path()).list_files(MOD_SCHEMATIC_FOLDER);

        assert_eq!(files.len(), 2);
        assert!(files.iter().all(|f| f.mod_name == "alpha"));
        assert!(NoMods.list_files(MOD_SCHEMATIC_FOLDER).is_empty());
    }
}
