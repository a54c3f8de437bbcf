use crate::catalog::{Cuisine, FilterOutcome, RecipeCatalog, TimeBucket};
use crate::config::Settings;
use crate::layout::WheelLayout;
use crate::recipe::Recipe;
use crate::result::ResultCard;
use crate::spin::{ActiveSpin, FrameUpdate, RandomSource, SpinEngine, SpinError, resolve_index};
use serde::Serialize;
use serde_with::DeserializeFromStr;
use std::time::Duration;
use strum::{Display as StrumDisplay, EnumIter, EnumString};

/// What the wheel shows when the catalog changes under a running spin.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    DeserializeFromStr,
    EnumString,
    EnumIter,
    StrumDisplay,
)]
#[strum(ascii_case_insensitive, serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum LayoutPolicy {
    /// Slices are frozen from spin start until it settles.
    #[default]
    Snapshot,
    /// Slices follow the catalog every frame.
    Live,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpinOutcome {
    /// Cumulative degrees, as the engine recorded them.
    pub final_rotation: f64,
    pub index: usize,
    /// `None` when the pointer stopped on an empty slot.
    pub card: Option<ResultCard>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub rotation: f64,
    /// `None` while idle.
    pub progress: Option<f64>,
    /// Set on the one frame a spin settles.
    pub outcome: Option<SpinOutcome>,
}

/// Owns everything a host needs to show and spin the wheel: catalog,
/// layout, spin engine and random source. Hosts call [`Wheel::tick`] once
/// per frame and draw [`Wheel::display_layout`] at [`Frame::rotation`].
pub struct Wheel<R> {
    catalog: RecipeCatalog,
    settings: Settings,
    engine: SpinEngine,
    layout: WheelLayout,
    pinned: Option<WheelLayout>,
    rng: R,
}

impl<R: RandomSource> Wheel<R> {
    pub fn new(catalog: RecipeCatalog, settings: Settings, rng: R) -> Self {
        let layout = WheelLayout::from_settings(catalog.active(), &settings.wheel);
        Self {
            engine: SpinEngine::new(&settings.spin),
            catalog,
            settings,
            layout,
            pinned: None,
            rng,
        }
    }

    pub fn catalog(&self) -> &RecipeCatalog {
        &self.catalog
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn is_spinning(&self) -> bool {
        self.engine.is_spinning()
    }

    /// Rotation to draw while idle.
    pub fn rotation(&self) -> f64 {
        self.engine.last_rotation()
    }

    /// The layout to draw this frame: the pinned one during a snapshot spin,
    /// otherwise the live one.
    pub fn display_layout(&self) -> &WheelLayout {
        self.pinned.as_ref().unwrap_or(&self.layout)
    }

    pub fn spin(&mut self, now: Duration) -> Result<ActiveSpin, SpinError> {
        if self.engine.is_spinning() {
            return Err(SpinError::AlreadySpinning);
        }
        if self.layout.is_empty() {
            log::warn!("Spin ignored, the wheel has no recipes");
            return Err(SpinError::NoSlices);
        }

        let spin = self.engine.spin(now, &mut self.rng)?;
        if self.settings.spin.layout_policy == LayoutPolicy::Snapshot {
            self.pinned = Some(self.layout.clone());
        }
        Ok(spin)
    }

    pub fn tick(&mut self, now: Duration) -> Frame {
        match self.engine.tick(now) {
            FrameUpdate::Idle { rotation } => Frame {
                rotation,
                progress: None,
                outcome: None,
            },
            FrameUpdate::Spinning { rotation, progress } => Frame {
                rotation,
                progress: Some(progress),
                outcome: None,
            },
            FrameUpdate::Settled { rotation } => {
                let outcome = self.settle(rotation);
                Frame {
                    rotation,
                    progress: Some(1.0),
                    outcome,
                }
            }
        }
    }

    fn settle(&mut self, rotation: f64) -> Option<SpinOutcome> {
        let layout = self.pinned.take().unwrap_or_else(|| self.layout.clone());
        if layout.is_empty() {
            return None;
        }

        let index = resolve_index(
            rotation,
            layout.slot_count(),
            self.settings.spin.pointer_angle,
        );
        let recipes: Vec<Recipe> = layout.recipes().cloned().collect();
        let card = ResultCard::resolve(index, &recipes, &self.catalog);

        match &card {
            Some(card) => log::info!("Wheel settled on slot {}: {}", index, card.name),
            None => log::info!("Wheel settled on empty slot {}", index),
        }

        Some(SpinOutcome {
            final_rotation: rotation,
            index,
            card,
        })
    }

    pub fn apply_filter(&mut self, cuisine: Cuisine, time: TimeBucket) -> FilterOutcome {
        let outcome = self.catalog.apply_filter(cuisine, time);
        self.relayout();
        outcome
    }

    /// Swaps in a freshly loaded catalog, keeping the current filter.
    pub fn replace_catalog(&mut self, catalog: RecipeCatalog) -> FilterOutcome {
        let filter = self.catalog.filter().clone();
        self.catalog = catalog;
        let outcome = self.catalog.apply_filter(filter.cuisine, filter.time);
        self.relayout();
        outcome
    }

    /// Applies reloaded settings. Spin timing changes take effect from the
    /// next spin.
    pub fn reconfigure(&mut self, settings: Settings) {
        self.engine.reconfigure(&settings.spin);
        self.settings = settings;
        self.relayout();
    }

    fn relayout(&mut self) {
        self.layout = WheelLayout::from_settings(self.catalog.active(), &self.settings.wheel);
    }
}
