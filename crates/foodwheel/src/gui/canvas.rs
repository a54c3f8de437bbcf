use crate::gui::theme::ThemeColors;
use cairo::Context;
use palette::Srgba;
use spinwheel::render::{Font, Point};
use spinwheel::{Surface, WheelLayout, WheelStyle};
use std::f64::consts::TAU;

/// Pointer triangle length, measured inward from the rim.
const POINTER_LENGTH: f64 = 28.0;
const POINTER_HALF_WIDTH: f64 = 14.0;

/// Cairo context wrapped as a wheel drawing surface.
pub struct CairoSurface<'a>(&'a Context);

impl<'a> CairoSurface<'a> {
    pub fn new(cr: &'a Context) -> Self {
        Self(cr)
    }

    fn set_source(&self, color: Srgba<f64>) {
        let (r, g, b, a) = color.into_components();
        self.0.set_source_rgba(r, g, b, a);
    }
}

impl Surface for CairoSurface<'_> {
    type Error = cairo::Error;

    fn clear(&mut self, _width: f64, _height: f64) -> Result<(), cairo::Error> {
        let cr = self.0;
        cr.save()?;
        cr.set_operator(cairo::Operator::Clear);
        cr.paint()?;
        cr.restore()
    }

    fn save(&mut self) -> Result<(), cairo::Error> {
        self.0.save()
    }

    fn restore(&mut self) -> Result<(), cairo::Error> {
        self.0.restore()
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        self.0.translate(dx, dy);
    }

    fn rotate(&mut self, radians: f64) {
        self.0.rotate(radians);
    }

    fn fill_sector(
        &mut self,
        center: Point,
        radius: f64,
        start: f64,
        end: f64,
        color: Srgba<f64>,
    ) -> Result<(), cairo::Error> {
        let cr = self.0;
        self.set_source(color);
        cr.new_path();
        cr.move_to(center.x, center.y);
        cr.arc(center.x, center.y, radius, start, end);
        cr.close_path();
        cr.fill()
    }

    fn fill_circle(
        &mut self,
        center: Point,
        radius: f64,
        color: Srgba<f64>,
    ) -> Result<(), cairo::Error> {
        self.set_source(color);
        self.0.new_path();
        self.0.arc(center.x, center.y, radius, 0.0, TAU);
        self.0.fill()
    }

    fn stroke_circle(
        &mut self,
        center: Point,
        radius: f64,
        line_width: f64,
        color: Srgba<f64>,
    ) -> Result<(), cairo::Error> {
        self.set_source(color);
        self.0.set_line_width(line_width);
        self.0.new_path();
        self.0.arc(center.x, center.y, radius, 0.0, TAU);
        self.0.stroke()
    }

    fn fill_text(
        &mut self,
        text: &str,
        at: Point,
        font: &Font,
        color: Srgba<f64>,
    ) -> Result<(), cairo::Error> {
        let cr = self.0;
        let weight = if font.bold {
            cairo::FontWeight::Bold
        } else {
            cairo::FontWeight::Normal
        };
        cr.select_font_face(&font.family, cairo::FontSlant::Normal, weight);
        cr.set_font_size(font.size);
        self.set_source(color);

        let ext = cr.text_extents(text)?;
        cr.move_to(at.x - ext.width() / 2.0 - ext.x_bearing(), at.y);
        cr.show_text(text)
    }
}

/// Fixed pointer at `pointer_angle` degrees clockwise from east, tip
/// pointing at the center. Drawn unrotated, on top of the wheel.
fn draw_pointer(
    cr: &Context,
    style: &WheelStyle,
    pointer_angle: f64,
    color: Srgba<f64>,
) -> Result<(), cairo::Error> {
    let center = style.center();
    let (r, g, b, a) = color.into_components();

    cr.save()?;
    cr.translate(center.x, center.y);
    cr.rotate(pointer_angle.to_radians());
    cr.set_source_rgba(r, g, b, a);
    cr.new_path();
    cr.move_to(style.outer_radius - POINTER_LENGTH, 0.0);
    cr.line_to(style.outer_radius + 4.0, -POINTER_HALF_WIDTH);
    cr.line_to(style.outer_radius + 4.0, POINTER_HALF_WIDTH);
    cr.close_path();
    cr.fill()?;
    cr.restore()
}

/// Draws the wheel scaled to fit a `width` x `height` area, then the pointer.
#[allow(clippy::too_many_arguments)]
pub fn draw_wheel(
    cr: &Context,
    width: i32,
    height: i32,
    layout: &WheelLayout,
    rotation: f64,
    pointer_angle: f64,
    style: &WheelStyle,
    colors: &ThemeColors,
) -> Result<(), cairo::Error> {
    let side = f64::from(width.min(height));
    if side <= 0.0 {
        return Ok(());
    }

    cr.save()?;
    cr.translate(
        (f64::from(width) - side) / 2.0,
        (f64::from(height) - side) / 2.0,
    );
    cr.scale(side / style.size, side / style.size);

    spinwheel::render(&mut CairoSurface::new(cr), layout, rotation, style)?;
    draw_pointer(cr, style, pointer_angle, colors.pointer)?;

    cr.restore()
}
