use crate::config::WheelSettings;
use crate::recipe::Recipe;
use palette::{LinSrgb, Srgba};
use serde::Serialize;
use serde_with::DeserializeFromStr;
use std::f64::consts::TAU;
use strum::{Display as StrumDisplay, EnumIter, EnumString};

pub const ELLIPSIS: char = '…';

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
#[strum(ascii_case_insensitive, serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum PaletteMode {
    /// Alternating black and white.
    #[default]
    TwoTone,
    Categorical,
}

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
#[strum(ascii_case_insensitive, serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum SlotMode {
    /// One slot per recipe, capped at `max_slots`.
    #[default]
    Fit,
    /// Always `max_slots` slots, leaving trailing slots empty when short.
    Fixed,
}

const fn rgb(r: u8, g: u8, b: u8) -> Srgba<f64> {
    Srgba::new(r as f64 / 255.0, g as f64 / 255.0, b as f64 / 255.0, 1.0)
}

static TWO_TONE: [Srgba<f64>; 2] = [rgb(0x00, 0x00, 0x00), rgb(0xFF, 0xFF, 0xFF)];

static CATEGORICAL: [Srgba<f64>; 8] = [
    rgb(0xE6, 0x39, 0x46),
    rgb(0xF4, 0xA2, 0x61),
    rgb(0xE9, 0xC4, 0x6A),
    rgb(0x2A, 0x9D, 0x8F),
    rgb(0x26, 0x46, 0x53),
    rgb(0x8E, 0x44, 0xAD),
    rgb(0x45, 0x7B, 0x9D),
    rgb(0xA8, 0xDA, 0xDC),
];

impl PaletteMode {
    pub fn colors(&self) -> &'static [Srgba<f64>] {
        match self {
            Self::TwoTone => &TWO_TONE,
            Self::Categorical => &CATEGORICAL,
        }
    }

    pub fn fill(&self, index: usize) -> Srgba<f64> {
        let colors = self.colors();
        colors[index % colors.len()]
    }
}

/// Gold on dark fills, black on light ones.
pub fn label_color(fill: Srgba<f64>) -> Srgba<f64> {
    let lin: LinSrgb<f64> = fill.color.into_linear();
    let luminance = 0.2126 * lin.red + 0.7152 * lin.green + 0.0722 * lin.blue;
    if luminance > 0.4 {
        rgb(0x00, 0x00, 0x00)
    } else {
        rgb(0xFF, 0xD7, 0x00)
    }
}

/// Truncates to at most `max_chars` characters, the last being an ellipsis
/// when anything was cut.
pub fn truncate_label(name: &str, max_chars: usize) -> String {
    if name.chars().count() <= max_chars {
        return name.to_string();
    }
    let mut label: String = name
        .chars()
        .take(max_chars.saturating_sub(1))
        .collect::<String>()
        .trim_end()
        .to_string();
    label.push(ELLIPSIS);
    label
}

/// No recipes means no slots in either mode.
pub fn slot_count_for(recipe_count: usize, max_slots: usize, mode: SlotMode) -> usize {
    if recipe_count == 0 {
        return 0;
    }
    match mode {
        SlotMode::Fit => recipe_count.min(max_slots),
        SlotMode::Fixed => max_slots,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WheelSlice {
    pub index: usize,
    /// Radians, unrotated frame, measured clockwise from east.
    pub start: f64,
    pub end: f64,
    pub fill: Srgba<f64>,
    pub text: Srgba<f64>,
    pub label: Option<String>,
    pub recipe: Option<Recipe>,
}

impl WheelSlice {
    pub fn span(&self) -> f64 {
        self.end - self.start
    }

    pub fn bisector(&self) -> f64 {
        (self.start + self.end) / 2.0
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct WheelLayout {
    pub slices: Vec<WheelSlice>,
}

impl WheelLayout {
    pub fn slot_count(&self) -> usize {
        self.slices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slices.is_empty()
    }

    /// Recipes in slot order. Filled slots always precede empty ones, so a
    /// recipe's position here is its slot index.
    pub fn recipes(&self) -> impl Iterator<Item = &Recipe> {
        self.slices.iter().filter_map(|s| s.recipe.as_ref())
    }

    /// Equal-angle layout of `slot_count` slices; slot `i` holds `recipes[i]`
    /// if there is one.
    pub fn compute(
        recipes: &[Recipe],
        slot_count: usize,
        palette: PaletteMode,
        label_max_chars: usize,
    ) -> Self {
        if slot_count == 0 {
            return Self::default();
        }

        let span = TAU / slot_count as f64;
        let slices = (0..slot_count)
            .map(|index| {
                let fill = palette.fill(index);
                let recipe = recipes.get(index).cloned();
                WheelSlice {
                    index,
                    start: index as f64 * span,
                    // last edge pinned to TAU so the spans sum exactly
                    end: if index + 1 == slot_count {
                        TAU
                    } else {
                        (index + 1) as f64 * span
                    },
                    fill,
                    text: label_color(fill),
                    label: recipe
                        .as_ref()
                        .map(|r| truncate_label(&r.name, label_max_chars)),
                    recipe,
                }
            })
            .collect();

        Self { slices }
    }

    pub fn from_settings(recipes: &[Recipe], settings: &WheelSettings) -> Self {
        let slot_count = slot_count_for(recipes.len(), settings.max_slots, settings.slot_mode);
        Self::compute(
            recipes,
            slot_count,
            settings.palette,
            settings.label_max_chars,
        )
    }
}
