//! The schematic subsystem as a host sees it: one store, one preview cache.

use std::sync::Arc;

use crate::files::{JsonSchematicReader, ModDirectory};
use crate::preview::PreviewCache;
use crate::render::{Canvas, Renderer, SoftwareRenderer};
use crate::state::data::Schematic;
use crate::state::library::SchematicStore;
use crate::state::settings::Settings;
use crate::world::{BlockRegistry, Grid, GridPos, RegionExtractor};

/// Keeps the loaded schematics and their previews in step.
pub struct Schematics<R: Renderer> {
    store: SchematicStore,
    previews: PreviewCache<R>,
}

impl Schematics<SoftwareRenderer> {
    /// Wire up the bundled reader, platform, mod folder and renderer from settings.
    pub fn from_settings(settings: &Settings, registry: Box<dyn BlockRegistry>) -> Self {
        let reader = JsonSchematicReader::new(registry, settings.max_schematic_size);
        let mut store = SchematicStore::new(
            &settings.schematic_dir,
            Box::new(reader),
            Box::new(settings.platform.clone()),
        )
        .with_extension(settings.extension.clone())
        .with_extractor(RegionExtractor::new(settings.max_schematic_size));
        if let Some(mods_dir) = &settings.mods_dir {
            store = store.with_mods(Box::new(ModDirectory::new(mods_dir)));
        }

        let previews = PreviewCache::new(
            SoftwareRenderer::new(settings.max_texture_size),
            Box::new(settings.platform.clone()),
            settings.preview_settings(),
        );

        Self::new(store, previews)
    }
}

impl<R: Renderer> Schematics<R> {
    pub fn new(store: SchematicStore, previews: PreviewCache<R>) -> Self {
        Self { store, previews }
    }

    /// Reload every schematic from disk and drop all previews.
    pub fn reload(&mut self) -> usize {
        let loaded = self.store.reload();
        self.previews.clear();
        self.previews.prune();
        loaded
    }

    pub fn all(&self) -> &[Arc<Schematic>] {
        self.store.all()
    }

    pub fn create(&self, grid: &dyn Grid, from: GridPos, to: GridPos) -> Schematic {
        self.store.create(grid, from, to)
    }

    pub fn add(&mut self, schematic: Schematic) -> Arc<Schematic> {
        self.store.add(schematic)
    }

    pub fn get_preview(&mut self, schematic: &Arc<Schematic>) -> Arc<Canvas> {
        self.previews.get_preview(schematic)
    }

    pub fn store(&self) -> &SchematicStore {
        &self.store
    }

    pub fn previews(&self) -> &PreviewCache<R> {
        &self.previews
    }

    pub fn previews_mut(&mut self) -> &mut PreviewCache<R> {
        &mut self.previews
    }
}
