use crate::layout::{WheelLayout, WheelSlice};
use palette::Srgba;
use serde::Serialize;
use serde_with::DeserializeFromStr;
use strum::{Display as StrumDisplay, EnumIter, EnumString};

pub const SURFACE_SIZE: f64 = 500.0;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Font {
    pub family: String,
    pub size: f64,
    pub bold: bool,
}

/// Drawing primitives the wheel needs. Angles are radians, clockwise from
/// east, in the surface's current (possibly rotated) frame.
pub trait Surface {
    type Error;

    /// Wipes everything back to transparent.
    fn clear(&mut self, width: f64, height: f64) -> Result<(), Self::Error>;
    fn save(&mut self) -> Result<(), Self::Error>;
    fn restore(&mut self) -> Result<(), Self::Error>;
    fn translate(&mut self, dx: f64, dy: f64);
    fn rotate(&mut self, radians: f64);
    fn fill_sector(
        &mut self,
        center: Point,
        radius: f64,
        start: f64,
        end: f64,
        color: Srgba<f64>,
    ) -> Result<(), Self::Error>;
    fn fill_circle(&mut self, center: Point, radius: f64, color: Srgba<f64>)
    -> Result<(), Self::Error>;
    fn stroke_circle(
        &mut self,
        center: Point,
        radius: f64,
        line_width: f64,
        color: Srgba<f64>,
    ) -> Result<(), Self::Error>;
    /// Text horizontally centered on `at`, with `at.y` as the baseline.
    fn fill_text(
        &mut self,
        text: &str,
        at: Point,
        font: &Font,
        color: Srgba<f64>,
    ) -> Result<(), Self::Error>;
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
#[strum(ascii_case_insensitive, serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum StyleKind {
    /// Full disc edge to edge.
    #[default]
    Classic,
    /// Slightly smaller disc with a hub over the center.
    Donut,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WheelStyle {
    pub size: f64,
    pub outer_radius: f64,
    /// Zero disables the hub.
    pub inner_radius: f64,
    pub label_radius: f64,
    pub label_baseline: f64,
    pub font: Font,
    pub hub_fill: Srgba<f64>,
    pub hub_border: Srgba<f64>,
    pub hub_border_width: f64,
}

impl WheelStyle {
    pub fn classic() -> Self {
        Self {
            size: SURFACE_SIZE,
            outer_radius: 250.0,
            inner_radius: 0.0,
            label_radius: 150.0,
            label_baseline: 6.0,
            font: Font {
                family: "Sans".to_string(),
                size: 18.0,
                bold: true,
            },
            hub_fill: Srgba::new(0.1, 0.1, 0.1, 1.0),
            hub_border: Srgba::new(1.0, 0.84, 0.0, 1.0),
            hub_border_width: 3.0,
        }
    }

    pub fn donut() -> Self {
        Self {
            outer_radius: 235.0,
            inner_radius: 60.0,
            label_radius: 150.0,
            font: Font {
                family: "Sans".to_string(),
                size: 16.0,
                bold: true,
            },
            ..Self::classic()
        }
    }

    pub fn for_kind(kind: StyleKind) -> Self {
        match kind {
            StyleKind::Classic => Self::classic(),
            StyleKind::Donut => Self::donut(),
        }
    }

    pub fn center(&self) -> Point {
        Point::new(self.size / 2.0, self.size / 2.0)
    }
}

impl Default for WheelStyle {
    fn default() -> Self {
        Self::classic()
    }
}

/// Runs `draw` between `save` and `restore`. The state is restored even
/// when `draw` fails, and the draw error is the one reported.
fn with_saved_state<S, F>(surface: &mut S, draw: F) -> Result<(), S::Error>
where
    S: Surface + ?Sized,
    F: FnOnce(&mut S) -> Result<(), S::Error>,
{
    surface.save()?;
    let drawn = draw(surface);
    let restored = surface.restore();
    drawn.and(restored)
}

struct SliceRenderer<'a> {
    slice: &'a WheelSlice,
    style: &'a WheelStyle,
}

impl<'a> SliceRenderer<'a> {
    fn new(slice: &'a WheelSlice, style: &'a WheelStyle) -> Self {
        Self { slice, style }
    }

    fn draw<S: Surface + ?Sized>(&self, surface: &mut S) -> Result<(), S::Error> {
        self.draw_sector(surface)?;
        self.draw_label(surface)
    }

    fn draw_sector<S: Surface + ?Sized>(&self, surface: &mut S) -> Result<(), S::Error> {
        surface.fill_sector(
            self.style.center(),
            self.style.outer_radius,
            self.slice.start,
            self.slice.end,
            self.slice.fill,
        )
    }

    fn draw_label<S: Surface + ?Sized>(&self, surface: &mut S) -> Result<(), S::Error> {
        let Some(label) = &self.slice.label else {
            return Ok(());
        };

        let center = self.style.center();
        with_saved_state(surface, |surface| {
            surface.translate(center.x, center.y);
            surface.rotate(self.slice.bisector());
            surface.fill_text(
                label,
                Point::new(self.style.label_radius, self.style.label_baseline),
                &self.style.font,
                self.slice.text,
            )
        })
    }
}

fn draw_hub<S: Surface + ?Sized>(surface: &mut S, style: &WheelStyle) -> Result<(), S::Error> {
    let center = style.center();
    surface.fill_circle(center, style.inner_radius, style.hub_fill)?;
    surface.stroke_circle(
        center,
        style.inner_radius,
        style.hub_border_width,
        style.hub_border,
    )
}

/// Draws `layout` turned clockwise by `rotation_degrees` around the surface
/// center. Slice geometry stays in the unrotated frame; the turn is applied
/// as a transform only.
pub fn render<S: Surface + ?Sized>(
    surface: &mut S,
    layout: &WheelLayout,
    rotation_degrees: f64,
    style: &WheelStyle,
) -> Result<(), S::Error> {
    surface.clear(style.size, style.size)?;

    let center = style.center();
    with_saved_state(surface, |surface| {
        surface.translate(center.x, center.y);
        surface.rotate(rotation_degrees.to_radians());
        surface.translate(-center.x, -center.y);

        for slice in &layout.slices {
            SliceRenderer::new(slice, style).draw(surface)?;
        }

        if style.inner_radius > 0.0 {
            draw_hub(surface, style)?;
        }
        Ok(())
    })
}
