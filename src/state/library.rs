use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, error, info};

use super::data::{Schematic, SOURCE_TAG};
use crate::error::Error;
use crate::files::{has_extension, list_local, ModSource, NoMods, SchematicReader};
use crate::files::sources::MOD_SCHEMATIC_FOLDER;
use crate::platform::Platform;
use crate::state::settings::DEFAULT_EXTENSION;
use crate::world::{Grid, GridPos, RegionExtractor};

/// The SchematicStore owns every loaded schematic.
/// It reads them from the local schematic folder, from workshop content
/// and from each mod's `schematics` folder, and keeps them sorted by name.
pub struct SchematicStore {
    local_dir: PathBuf,
    extension: String,
    reader: Box<dyn SchematicReader>,
    platform: Box<dyn Platform>,
    mods: Box<dyn ModSource>,
    extractor: RegionExtractor,
    all: Vec<Arc<Schematic>>,
}

impl SchematicStore {
    /// Create an empty store. Nothing is read until [`reload`](Self::reload).
    pub fn new(
        local_dir: impl Into<PathBuf>,
        reader: Box<dyn SchematicReader>,
        platform: Box<dyn Platform>,
    ) -> Self {
        Self {
            local_dir: local_dir.into(),
            extension: DEFAULT_EXTENSION.to_string(),
            reader,
            platform,
            mods: Box::new(NoMods),
            extractor: RegionExtractor::default(),
            all: Vec::new(),
        }
    }

    pub fn with_mods(mut self, mods: Box<dyn ModSource>) -> Self {
        self.mods = mods;
        self
    }

    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    pub fn with_extractor(mut self, extractor: RegionExtractor) -> Self {
        self.extractor = extractor;
        self
    }

    pub fn local_dir(&self) -> &Path {
        &self.local_dir
    }

    /// Replace the collection with everything currently on disk.
    ///
    /// Broken files are logged and skipped. Returns the number of
    /// schematics loaded.
    pub fn reload(&mut self) -> usize {
        let mut loaded = Vec::new();

        for path in list_local(&self.local_dir) {
            if let Some(schematic) = self.load_candidate(&path) {
                loaded.push(schematic);
            }
        }

        for path in self.platform.workshop_content() {
            if let Some(schematic) = self.load_candidate(&path) {
                loaded.push(schematic);
            }
        }

        for file in self.mods.list_files(MOD_SCHEMATIC_FOLDER) {
            if let Some(schematic) = self.load_candidate(&file.path) {
                loaded.push(schematic.with_mod(file.mod_name));
            }
        }

        loaded.sort_by(|a, b| a.compare(b));
        self.all = loaded.into_iter().map(Arc::new).collect();

        info!(
            "Loaded {} schematics from {}",
            self.all.len(),
            self.local_dir.display()
        );
        self.all.len()
    }

    /// Every loaded schematic, sorted
    pub fn all(&self) -> &[Arc<Schematic>] {
        &self.all
    }

    /// Build a schematic from the structures between two corners.
    /// The result is not added to the store.
    pub fn create(&self, grid: &dyn Grid, from: GridPos, to: GridPos) -> Schematic {
        self.extractor.extract(grid, from, to)
    }

    /// Insert a schematic persisted elsewhere at its sorted position
    pub fn add(&mut self, schematic: Schematic) -> Arc<Schematic> {
        let index = self
            .all
            .partition_point(|existing| existing.compare(&schematic).is_le());
        let shared = Arc::new(schematic);
        self.all.insert(index, Arc::clone(&shared));
        shared
    }

    /// Read a single schematic file, tagging it with its source folder
    pub fn load_file(&self, path: &Path) -> Result<Schematic, Error> {
        let schematic = self.reader.read(path).map_err(|source| Error::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        match path.parent() {
            Some(parent) if !self.is_local_dir(parent) => {
                let source = parent
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned())
                    .unwrap_or_default();
                Ok(schematic.with_tag(SOURCE_TAG, source))
            }
            _ => Ok(schematic),
        }
    }

    pub fn len(&self) -> usize {
        self.all.len()
    }

    pub fn is_empty(&self) -> bool {
        self.all.is_empty()
    }

    fn load_candidate(&self, path: &Path) -> Option<Schematic> {
        if !has_extension(path, &self.extension) {
            debug!("Skipping {}: not a .{} file", path.display(), self.extension);
            return None;
        }

        match self.load_file(path) {
            Ok(schematic) => Some(schematic),
            Err(e) => {
                error!("{}", e);
                None
            }
        }
    }

    fn is_local_dir(&self, dir: &Path) -> bool {
        if dir == self.local_dir {
            return true;
        }
        match (dir.canonicalize(), self.local_dir.canonicalize()) {
            (Ok(a), Ok(b)) => a == b,
            _ => false,
        }
    }
}

impl std::fmt::Debug for SchematicStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchematicStore")
            .field("local_dir", &self.local_dir)
            .field("extension", &self.extension)
            .field("len", &self.all.len())
            .finish()
    }
}
