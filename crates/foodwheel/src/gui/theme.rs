use gtk::gdk;
use gtk::prelude::*;
use gtk4 as gtk;
use palette::Srgba;
use spinwheel::WheelStyle;

pub struct ThemeColors {
    pub pointer: Srgba<f64>,
    pub hub_fill: Srgba<f64>,
    pub hub_border: Srgba<f64>,
}

impl ThemeColors {
    pub fn from_context(context: &gtk::StyleContext) -> Self {
        let fallback = WheelStyle::default();
        Self {
            pointer: Self::lookup_color(
                context,
                "accent_bg_color",
                Srgba::new(0.85, 0.1, 0.1, 1.0),
                Some(1.0),
            ),
            hub_fill: Self::lookup_color(context, "theme_bg_color", fallback.hub_fill, Some(1.0)),
            hub_border: Self::lookup_color(
                context,
                "theme_selected_bg_color",
                fallback.hub_border,
                None,
            ),
        }
    }

    /// The wheel style for `kind`, with the hub recolored to the theme.
    pub fn apply(&self, mut style: WheelStyle) -> WheelStyle {
        style.hub_fill = self.hub_fill;
        style.hub_border = self.hub_border;
        style
    }

    fn lookup_color(
        context: &gtk::StyleContext,
        name: &str,
        fallback: Srgba<f64>,
        alpha_override: Option<f64>,
    ) -> Srgba<f64> {
        context
            .lookup_color(name)
            .map(|c| {
                Srgba::new(
                    f64::from(c.red()),
                    f64::from(c.green()),
                    f64::from(c.blue()),
                    alpha_override.unwrap_or(f64::from(c.alpha())),
                )
            })
            .unwrap_or(fallback)
    }
}

pub fn load_css() {
    let provider = gtk::CssProvider::new();
    let css_data = "
.foodwheel-canvas {
    background: none;
    background-color: transparent;
}
.result-card {
    padding: 12px;
    border-radius: 12px;
}
.result-title {
    font-size: 1.6em;
    font-weight: bold;
}
.result-stars {
    font-size: 1.2em;
}
.spin-button {
    font-size: 1.3em;
    font-weight: bold;
    padding: 8px 32px;
}
";
    provider.load_from_data(css_data);

    if let Some(display) = gdk::Display::default() {
        gtk::style_context_add_provider_for_display(
            &display,
            &provider,
            gtk::STYLE_PROVIDER_PRIORITY_APPLICATION,
        );
    }
}
