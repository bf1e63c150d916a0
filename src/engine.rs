// File: src/engine.rs
//! The color-assignment engine: one registry, two palettes, two caches.
//!
//! Every entry point is idempotent, so hosts may call them as often as their
//! (debounced) content or view notifications fire.
use crate::cache::{ColorCache, ForegroundMemo};
use crate::color_utils::{self, Rgb8};
use crate::config::Configuration;
use crate::generator::{self, Palette};
use crate::model::{ResolvedColor, TagPath, Theme};
use crate::optimizer;
use crate::registry::TagRegistry;
use crate::resolver;
use crate::storage::{CURRENT_VERSION, PersistedState, StateStore};
use crate::stylesheet::{self, StyleRule};
use anyhow::Result;

pub struct Engine<S: StateStore> {
    config: Configuration,
    registry: TagRegistry,
    light: Palette,
    dark: Palette,
    hue_offset: Option<u16>,
    resolved: ColorCache,
    foregrounds: ForegroundMemo,
    store: S,
}

impl<S: StateStore> Engine<S> {
    /// Builds an engine around existing state without touching the store.
    pub fn new(config: Configuration, registry: TagRegistry, store: S) -> Self {
        let config = config.sanitized();
        let (light, dark, hue_offset) = build_palettes(&config);
        Self {
            config,
            registry,
            light,
            dark,
            hue_offset,
            resolved: ColorCache::default(),
            foregrounds: ForegroundMemo::default(),
            store,
        }
    }

    /// Loads, migrates and sanitizes persisted state. Writes back exactly once
    /// when a migration ran; missing or corrupt state yields defaults.
    pub fn load(store: S) -> Result<Self> {
        let raw = store.load()?;
        let (state, migrated) = raw
            .and_then(PersistedState::from_raw)
            .unwrap_or_default();

        let engine = Self::new(state.settings, state.known_tags, store);
        if migrated {
            engine.persist();
        }
        Ok(engine)
    }

    /// Applies new settings and regenerates both palettes. The registry is
    /// untouched so tags keep their slots.
    pub fn configure(&mut self, config: Configuration) {
        self.config = config.sanitized();
        let (light, dark, hue_offset) = build_palettes(&self.config);
        self.light = light;
        self.dark = dark;
        self.hue_offset = hue_offset;
        self.resolved.clear();
        self.persist();
    }

    /// Registers unknown tags and their ancestors. Malformed entries are
    /// skipped. Returns whether the registry grew (and was persisted).
    pub fn ensure_tags_known<I, T>(&mut self, tags: I) -> bool
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let tags = crate::model::tag::parse_all(tags);
        let changed = self.registry.ensure(&tags);
        if changed {
            self.resolved.clear();
            self.persist();
        }
        changed
    }

    pub fn colors_for(&mut self, tag: &TagPath, theme: Theme) -> ResolvedColor {
        if let Some(hit) = self.resolved.get(tag, theme) {
            return hit.clone();
        }

        let palette = match theme {
            Theme::Light => &self.light,
            Theme::Dark => &self.dark,
        };
        let background = color_utils::to_rgb8(resolver::resolve_background(
            tag,
            &self.registry,
            palette,
        ));
        let color = self.color_pair(background);
        self.resolved.insert(tag.clone(), theme, color.clone());
        color
    }

    /// Rules for both themes, for every well-formed tag in `tags`.
    pub fn stylesheet<I, T>(&mut self, tags: I) -> String
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let mut tags = crate::model::tag::parse_all(tags);
        tags.sort();
        tags.dedup();

        let mut rules = Vec::with_capacity(tags.len() * Theme::ALL.len());
        for theme in Theme::ALL {
            for tag in &tags {
                let color = self.colors_for(tag, theme);
                rules.push(StyleRule {
                    tag: tag.clone(),
                    theme,
                    color,
                });
            }
        }
        stylesheet::render(&rules)
    }

    pub fn config(&self) -> &Configuration {
        &self.config
    }

    pub fn registry(&self) -> &TagRegistry {
        &self.registry
    }

    pub fn palette(&self, theme: Theme) -> &Palette {
        match theme {
            Theme::Light => &self.light,
            Theme::Dark => &self.dark,
        }
    }

    /// The rotation in use, `None` while a custom palette is active.
    pub fn hue_offset(&self) -> Option<u16> {
        self.hue_offset
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn snapshot(&self) -> PersistedState {
        PersistedState {
            version: CURRENT_VERSION,
            settings: self.config.clone(),
            known_tags: self.registry.clone(),
        }
    }

    fn color_pair(&mut self, background: Rgb8) -> ResolvedColor {
        let background_hex = color_utils::to_hex(background);
        let foreground = self.foregrounds.get_or_insert_with(&background_hex, || {
            color_utils::to_hex(resolver::resolve_foreground(background))
        });
        ResolvedColor {
            background: background_hex,
            foreground,
        }
    }

    // Fire-and-forget: a failed save never blocks color computation
    fn persist(&self) {
        if let Err(e) = self.store.save(&self.snapshot()) {
            tracing::warn!(error = %e, "failed to persist tag color state");
        }
    }
}

fn build_palettes(config: &Configuration) -> (Palette, Palette, Option<u16>) {
    if let Some(custom) = config.active_custom_colors()
        && let Some(palette) = Palette::from_rgb(&custom)
    {
        tracing::debug!(size = palette.len(), "using custom palette");
        return (palette.clone(), palette, None);
    }
    if config.enable_custom_colors {
        tracing::warn!("custom colors enabled but none are valid, generating a palette");
    }

    let params = config.palette_params();
    let offset = optimizer::find_offset(params);
    let light = generator::generate(params, Theme::Light, f64::from(offset), true, config.seed);
    let dark = generator::generate(params, Theme::Dark, f64::from(offset), true, config.seed);
    tracing::debug!(size = params.size, offset, seed = config.seed, "generated palettes");
    (light, dark, Some(offset))
}
