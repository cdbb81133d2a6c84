use indexmap::IndexMap;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Weak};
use std::time::{Duration, Instant};
use tracing::{debug, error};

use super::draw::{render_preview, PreviewLayout};
use super::placeholder::load_placeholder;
use crate::error::RenderError;
use crate::platform::Platform;
use crate::render::{Canvas, Renderer};
use crate::state::data::Schematic;
use crate::world::MAX_SCHEMATIC_SIZE;

/// Minimum time between two evictions on constrained platforms
pub const DEFAULT_EVICTION_INTERVAL: Duration = Duration::from_secs(2);

/// Tunables for the preview cache
#[derive(Debug, Clone, PartialEq)]
pub struct PreviewSettings {
    pub layout: PreviewLayout,
    /// Selection limit of the schematics this cache renders
    pub max_schematic_size: u32,
    pub eviction_interval: Duration,
    /// Image shown for schematics that cannot be rendered
    pub placeholder_path: Option<PathBuf>,
}

impl Default for PreviewSettings {
    fn default() -> Self {
        Self {
            layout: PreviewLayout::default(),
            max_schematic_size: MAX_SCHEMATIC_SIZE as u32,
            eviction_interval: DEFAULT_EVICTION_INTERVAL,
            placeholder_path: None,
        }
    }
}

/// Identity of a shared schematic.
///
/// Every entry keeps a `Weak` to its schematic, which keeps the allocation
/// (and so the address) reserved; a key can never be reused by a different
/// schematic while its entry exists.
type Key = usize;

fn key_of(schematic: &Arc<Schematic>) -> Key {
    Arc::as_ptr(schematic) as Key
}

struct CachedPreview {
    owner: Weak<Schematic>,
    canvas: Arc<Canvas>,
}

/// Lazily rendered previews, one per schematic instance
pub struct PreviewCache<R: Renderer> {
    renderer: R,
    platform: Box<dyn Platform>,
    settings: PreviewSettings,
    /// Insertion-ordered so eviction can drop the oldest entries first
    previews: IndexMap<Key, CachedPreview>,
    /// Schematics whose render failed; never retried
    errored: HashMap<Key, Weak<Schematic>>,
    /// Silhouette canvas shared by every render, allocated on first use
    shadow: Option<Canvas>,
    placeholder: Arc<Canvas>,
    last_clear: Option<Instant>,
}

impl<R: Renderer> std::fmt::Debug for PreviewCache<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreviewCache")
            .field("cached", &self.previews.len())
            .field("errored", &self.errored.len())
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl<R: Renderer> PreviewCache<R> {
    pub fn new(renderer: R, platform: Box<dyn Platform>, settings: PreviewSettings) -> Self {
        let placeholder = Arc::new(load_placeholder(settings.placeholder_path.as_deref()));
        Self {
            renderer,
            platform,
            settings,
            previews: IndexMap::new(),
            errored: HashMap::new(),
            shadow: None,
            placeholder,
            last_clear: None,
        }
    }

    /// Preview for a schematic, or the placeholder if it cannot be rendered.
    ///
    /// A schematic whose render failed once gets the placeholder for the
    /// rest of this cache's lifetime without another attempt.
    pub fn get_preview(&mut self, schematic: &Arc<Schematic>) -> Arc<Canvas> {
        if self.is_blacklisted(schematic) {
            return Arc::clone(&self.placeholder);
        }

        match self.get_buffer(schematic) {
            Ok(canvas) => canvas,
            Err(e) => {
                error!(
                    "Failed to get preview for schematic '{}' ({:?}): {}",
                    schematic.name(),
                    schematic.file(),
                    e
                );
                self.errored
                    .insert(key_of(schematic), Arc::downgrade(schematic));
                Arc::clone(&self.placeholder)
            }
        }
    }

    /// Cached preview canvas, rendering it on first request.
    ///
    /// Runs the eviction check first on every call.
    pub fn get_buffer(&mut self, schematic: &Arc<Schematic>) -> Result<Arc<Canvas>, RenderError> {
        self.evict_if_due();

        let key = key_of(schematic);
        if let Some(entry) = self.previews.get(&key) {
            return Ok(Arc::clone(&entry.canvas));
        }

        let mut shadow = match self.shadow.take() {
            Some(shadow) => shadow,
            None => {
                let size = self.settings.layout.shadow_size(self.settings.max_schematic_size);
                self.renderer.allocate(size, size)?
            }
        };
        let rendered = render_preview(&mut self.renderer, &mut shadow, schematic, self.settings.layout);
        self.shadow = Some(shadow);

        let canvas = Arc::new(rendered?);
        debug!(
            "Rendered {}x{} preview for '{}'",
            canvas.width(),
            canvas.height(),
            schematic.name()
        );
        self.previews.insert(
            key,
            CachedPreview {
                owner: Arc::downgrade(schematic),
                canvas: Arc::clone(&canvas),
            },
        );
        Ok(canvas)
    }

    /// Drop the oldest previews once the platform cap is exceeded.
    fn evict_if_due(&mut self) {
        if !self.platform.is_resource_constrained() {
            return;
        }

        let max = self.platform.max_cached_previews();
        let due = self
            .last_clear
            .map_or(true, |last| last.elapsed() > self.settings.eviction_interval);
        if !due || self.previews.len() <= max {
            return;
        }

        let excess = self.previews.len() - max;
        for (_, entry) in self.previews.drain(..excess) {
            self.renderer.release(&entry.canvas);
        }
        debug!("Evicted {} previews, {} remain", excess, self.previews.len());
        self.last_clear = Some(Instant::now());
    }

    /// Release every cached preview. Failures stay blacklisted.
    pub fn clear(&mut self) {
        for (_, entry) in self.previews.drain(..) {
            self.renderer.release(&entry.canvas);
        }
    }

    /// Forget previews and failures of schematics that no longer exist.
    pub fn prune(&mut self) {
        let dead: Vec<Key> = self
            .previews
            .iter()
            .filter(|(_, entry)| entry.owner.strong_count() == 0)
            .map(|(key, _)| *key)
            .collect();
        for key in dead {
            if let Some(entry) = self.previews.shift_remove(&key) {
                self.renderer.release(&entry.canvas);
            }
        }
        self.errored.retain(|_, owner| owner.strong_count() > 0);
    }

    pub fn contains(&self, schematic: &Arc<Schematic>) -> bool {
        self.previews.contains_key(&key_of(schematic))
    }

    pub fn is_blacklisted(&self, schematic: &Arc<Schematic>) -> bool {
        self.errored.contains_key(&key_of(schematic))
    }

    pub fn len(&self) -> usize {
        self.previews.len()
    }

    /// Number of schematics currently blacklisted
    pub fn failure_count(&self) -> usize {
        self.errored.len()
    }

    pub fn is_empty(&self) -> bool {
        self.previews.is_empty()
    }

    pub fn placeholder(&self) -> &Arc<Canvas> {
        &self.placeholder
    }

    pub fn settings(&self) -> &PreviewSettings {
        &self.settings
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }
}
