use crate::events::AppEvent;
use crate::gui::canvas;
use crate::gui::strings::{self, Strings};
use crate::gui::theme::{self, ThemeColors};
use gtk::prelude::*;
use gtk4 as gtk;
use rand::SeedableRng;
use rand::rngs::StdRng;
use relm4::prelude::*;
use spinwheel::config::{self, DataSettings};
use spinwheel::{
    CatalogOrigin, Cuisine, FilterOutcome, Language, RecipeCatalog, ResultCard, RngSource,
    SpinError, SpinOutcome, TimeBucket, Wheel, WheelStyle,
};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::{Duration, Instant};
use strum::IntoEnumIterator;

pub type FoodWheel = Wheel<RngSource<StdRng>>;

/// State read by the draw function and the frame tick callback.
struct Shared {
    wheel: RefCell<FoodWheel>,
    rotation: Cell<f64>,
    epoch: Instant,
}

impl Shared {
    fn now(&self) -> Duration {
        self.epoch.elapsed()
    }
}

enum Panel {
    Loading,
    Prompt,
    Result(ResultCard),
    EmptySlot,
}

pub struct AppModel {
    shared: Rc<Shared>,
    visible: bool,
    spinning: bool,
    language: Language,
    panel: Panel,
    no_match: bool,
    emoji: &'static str,
    emoji_rng: StdRng,
    origin: Option<CatalogOrigin>,
    cuisine_names: Vec<String>,
    cuisine_list: gtk::StringList,
    time_list: gtk::StringList,
    cuisine_dropdown: gtk::DropDown,
    time_dropdown: gtk::DropDown,
    drawing_area: gtk::DrawingArea,
    load_tx: async_channel::Sender<DataSettings>,
}

#[derive(Debug)]
pub enum AppMsg {
    Show,
    Hide,
    Spin,
    Settled(SpinOutcome),
    /// A dropdown changed; the handler reads its settled selection.
    CuisineSelected,
    TimeSelected,
    ToggleLanguage,
    Reload,
    ConfigReload,
    CatalogLoaded(Box<RecipeCatalog>, CatalogOrigin),
}

impl From<AppEvent> for AppMsg {
    fn from(event: AppEvent) -> Self {
        match event {
            AppEvent::Show => AppMsg::Show,
            AppEvent::Hide => AppMsg::Hide,
            AppEvent::Spin => AppMsg::Spin,
            AppEvent::Reload => AppMsg::Reload,
            AppEvent::ConfigReload => AppMsg::ConfigReload,
            AppEvent::CatalogLoaded(catalog, origin) => AppMsg::CatalogLoaded(catalog, origin),
        }
    }
}

/// Cuisine for a cuisine dropdown position, where 0 is "all".
/// `None` for a position with no entry, such as mid-rebuild.
fn cuisine_at(names: &[String], index: u32) -> Option<Cuisine> {
    match index {
        gtk::INVALID_LIST_POSITION => None,
        0 => Some(Cuisine::All),
        i => names
            .get(i as usize - 1)
            .map(|name| Cuisine::Named(name.clone())),
    }
}

fn cuisine_position(names: &[String], cuisine: &Cuisine) -> u32 {
    match cuisine {
        Cuisine::All => 0,
        Cuisine::Named(name) => names
            .iter()
            .position(|n| n == name)
            .map_or(0, |i| i as u32 + 1),
    }
}

fn time_at(index: u32) -> Option<TimeBucket> {
    TimeBucket::iter().nth(index as usize)
}

impl AppModel {
    fn strings(&self) -> &'static Strings {
        strings::strings(self.language)
    }

    fn card(&self) -> Option<&ResultCard> {
        match &self.panel {
            Panel::Result(card) => Some(card),
            _ => None,
        }
    }

    fn panel_title(&self) -> String {
        let s = self.strings();
        match &self.panel {
            Panel::Loading => s.loading.to_string(),
            Panel::Prompt => s.prompt.to_string(),
            Panel::Result(card) => format!("{} {}", self.emoji, card.name),
            Panel::EmptySlot => s.empty_slot.to_string(),
        }
    }

    fn panel_details(&self) -> String {
        self.card()
            .map(|card| self.strings().card_details(card))
            .unwrap_or_default()
    }

    fn panel_description(&self) -> String {
        self.card()
            .and_then(|card| card.description.clone())
            .unwrap_or_default()
    }

    fn panel_instructions(&self) -> String {
        self.card()
            .map(|card| self.strings().instructions(card).to_string())
            .unwrap_or_default()
    }

    fn origin_text(&self) -> String {
        self.origin
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_default()
    }

    fn time_labels(&self) -> Vec<&'static str> {
        let s = self.strings();
        TimeBucket::iter().map(|b| s.time_label(b)).collect()
    }

    /// Rebuilds both dropdown lists for the current language and catalog,
    /// keeping the active filter selected. The rebuild queues selection
    /// messages with transient positions; by the time they are handled the
    /// dropdowns show the filter again, so they resolve to no change.
    fn refresh_dropdowns(&mut self) {
        let filter = self.shared.wheel.borrow().catalog().filter().clone();
        self.cuisine_names = self
            .shared
            .wheel
            .borrow()
            .catalog()
            .cuisines()
            .into_iter()
            .map(str::to_string)
            .collect();

        let mut cuisines = vec![self.strings().all_cuisines];
        cuisines.extend(self.cuisine_names.iter().map(String::as_str));
        self.cuisine_list
            .splice(0, self.cuisine_list.n_items(), &cuisines);

        self.cuisine_dropdown
            .set_selected(cuisine_position(&self.cuisine_names, &filter.cuisine));

        let times = self.time_labels();
        self.time_list.splice(0, self.time_list.n_items(), &times);
        let time_index = TimeBucket::iter()
            .position(|b| b == filter.time)
            .unwrap_or(0);
        self.time_dropdown.set_selected(time_index as u32);
    }

    fn apply_language(&mut self, language: Language) {
        self.language = language;
        gtk::Widget::set_default_direction(match language {
            Language::En => gtk::TextDirection::Ltr,
            Language::Fa => gtk::TextDirection::Rtl,
        });
        self.refresh_dropdowns();
    }

    fn apply_filter(&mut self, cuisine: Cuisine, time: TimeBucket) {
        let current = self.shared.wheel.borrow().catalog().filter().clone();
        if current.cuisine == cuisine && current.time == time {
            return;
        }

        let outcome = self.shared.wheel.borrow_mut().apply_filter(cuisine, time);
        self.no_match = outcome == FilterOutcome::Reset;
        self.drawing_area.queue_draw();
    }

    fn request_catalog(&self, data: DataSettings) {
        if let Err(e) = self.load_tx.try_send(data) {
            log::error!("Failed to request a catalog load: {}", e);
        }
    }

    /// Re-reads the config file. Returns whether the data source changed.
    fn reload_config(&mut self) -> bool {
        let settings = match config::load_config() {
            Ok(settings) => settings,
            Err(e) => {
                log::error!("Failed to reload config: {}", e);
                return false;
            }
        };

        let data_changed = settings.data != self.shared.wheel.borrow().settings().data;
        let language = settings.ui.language;
        self.shared.wheel.borrow_mut().reconfigure(settings);
        self.apply_language(language);
        self.drawing_area.queue_draw();
        log::info!("Configuration reloaded");
        data_changed
    }

    fn start_ticking(&self, sender: &ComponentSender<Self>) {
        let shared = self.shared.clone();
        let sender = sender.clone();
        self.drawing_area.add_tick_callback(move |area, _clock| {
            let frame = shared.wheel.borrow_mut().tick(shared.now());
            shared.rotation.set(frame.rotation);
            area.queue_draw();

            match frame.outcome {
                Some(outcome) => {
                    sender.input(AppMsg::Settled(outcome));
                    glib::ControlFlow::Break
                }
                None if frame.progress.is_none() => glib::ControlFlow::Break,
                None => glib::ControlFlow::Continue,
            }
        });
    }
}

#[relm4::component(pub)]
impl SimpleComponent for AppModel {
    type Init = (
        FoodWheel,
        async_channel::Receiver<AppEvent>,
        async_channel::Sender<DataSettings>,
    );
    type Input = AppMsg;
    type Output = ();

    view! {
        #[root]
        #[name = "window"]
        gtk::ApplicationWindow {
            #[watch]
            set_title: Some(model.strings().title),
            set_default_width: 560,
            set_default_height: 940,
            #[watch]
            set_visible: model.visible,

            add_controller = gtk::EventControllerKey {
                connect_key_pressed[sender] => move |_, key, _, _| {
                    match key {
                        gtk::gdk::Key::Escape => {
                            sender.input(AppMsg::Hide);
                            glib::Propagation::Stop
                        }
                        gtk::gdk::Key::space | gtk::gdk::Key::Return => {
                            sender.input(AppMsg::Spin);
                            glib::Propagation::Stop
                        }
                        _ => glib::Propagation::Proceed,
                    }
                }
            },

            gtk::Box {
                set_orientation: gtk::Orientation::Vertical,
                set_spacing: 12,
                set_margin_top: 16,
                set_margin_bottom: 16,
                set_margin_start: 16,
                set_margin_end: 16,

                gtk::Label {
                    add_css_class: "title-1",
                    #[watch]
                    set_label: model.strings().title,
                },

                gtk::Box {
                    set_orientation: gtk::Orientation::Horizontal,
                    set_spacing: 8,
                    set_halign: gtk::Align::Center,

                    gtk::Label {
                        #[watch]
                        set_label: model.strings().cuisine,
                    },
                    #[local_ref]
                    cuisine_dropdown -> gtk::DropDown {
                        connect_selected_notify[sender] => move |_| {
                            sender.input(AppMsg::CuisineSelected);
                        }
                    },
                    gtk::Label {
                        #[watch]
                        set_label: model.strings().time,
                    },
                    #[local_ref]
                    time_dropdown -> gtk::DropDown {
                        connect_selected_notify[sender] => move |_| {
                            sender.input(AppMsg::TimeSelected);
                        }
                    },
                },

                #[local_ref]
                drawing_area -> gtk::DrawingArea {
                    set_content_width: 500,
                    set_content_height: 500,
                    set_halign: gtk::Align::Center,
                    add_css_class: "foodwheel-canvas",

                    add_controller = gtk::GestureClick {
                        connect_released[sender] => move |_, _, _, _| {
                            sender.input(AppMsg::Spin);
                        }
                    }
                },

                gtk::Button {
                    add_css_class: "spin-button",
                    set_halign: gtk::Align::Center,
                    #[watch]
                    set_label: model.strings().spin,
                    #[watch]
                    set_sensitive: !model.spinning,
                    connect_clicked => AppMsg::Spin,
                },

                gtk::Label {
                    add_css_class: "dim-label",
                    #[watch]
                    set_label: model.strings().no_match,
                    #[watch]
                    set_visible: model.no_match,
                },

                gtk::Box {
                    set_orientation: gtk::Orientation::Vertical,
                    set_spacing: 6,
                    add_css_class: "result-card",

                    gtk::Label {
                        add_css_class: "result-title",
                        set_wrap: true,
                        #[watch]
                        set_label: &model.panel_title(),
                    },
                    gtk::Label {
                        add_css_class: "result-stars",
                        set_xalign: 0.0,
                        #[watch]
                        set_label: &model.panel_details(),
                        #[watch]
                        set_visible: model.card().is_some(),
                    },
                    gtk::Label {
                        set_wrap: true,
                        set_xalign: 0.0,
                        #[watch]
                        set_label: &model.panel_description(),
                        #[watch]
                        set_visible: model.card().is_some_and(|c| c.description.is_some()),
                    },
                    gtk::Label {
                        set_wrap: true,
                        set_xalign: 0.0,
                        set_selectable: true,
                        #[watch]
                        set_label: &model.panel_instructions(),
                        #[watch]
                        set_visible: model.card().is_some(),
                    },
                },

                gtk::Box {
                    set_orientation: gtk::Orientation::Horizontal,

                    gtk::Label {
                        add_css_class: "dim-label",
                        set_hexpand: true,
                        set_xalign: 0.0,
                        #[watch]
                        set_label: &model.origin_text(),
                    },
                    gtk::Button {
                        #[watch]
                        set_label: model.strings().switch_language,
                        connect_clicked => AppMsg::ToggleLanguage,
                    },
                },
            }
        }
    }

    fn init(
        init: Self::Init,
        root: Self::Root,
        sender: ComponentSender<Self>,
    ) -> ComponentParts<Self> {
        let (wheel, rx, load_tx) = init;

        theme::load_css();

        let language = wheel.settings().ui.language;
        let rotation = wheel.rotation();
        let shared = Rc::new(Shared {
            wheel: RefCell::new(wheel),
            rotation: Cell::new(rotation),
            epoch: Instant::now(),
        });

        let cuisine_list = gtk::StringList::new(&[]);
        let time_list = gtk::StringList::new(&[]);
        let cuisine_dropdown = gtk::DropDown::new(Some(cuisine_list.clone()), None::<gtk::Expression>);
        let time_dropdown = gtk::DropDown::new(Some(time_list.clone()), None::<gtk::Expression>);

        let mut model = AppModel {
            shared,
            visible: true,
            spinning: false,
            language,
            panel: Panel::Loading,
            no_match: false,
            emoji: "🍽",
            emoji_rng: StdRng::from_os_rng(),
            origin: None,
            cuisine_names: Vec::new(),
            cuisine_list,
            time_list,
            cuisine_dropdown,
            time_dropdown,
            drawing_area: gtk::DrawingArea::new(),
            load_tx,
        };
        model.apply_language(language);

        let cuisine_dropdown = &model.cuisine_dropdown;
        let time_dropdown = &model.time_dropdown;
        let drawing_area = &model.drawing_area;
        let widgets = view_output!();

        let shared = model.shared.clone();
        model.drawing_area.set_draw_func(move |area, cr, width, height| {
            #[allow(deprecated)]
            let colors = ThemeColors::from_context(&area.style_context());
            let wheel = shared.wheel.borrow();
            let settings = wheel.settings();
            let style = colors.apply(WheelStyle::for_kind(settings.wheel.style));

            if let Err(e) = canvas::draw_wheel(
                cr,
                width,
                height,
                wheel.display_layout(),
                shared.rotation.get(),
                settings.spin.pointer_angle,
                &style,
                &colors,
            ) {
                log::error!("Drawing error: {}", e);
            }
        });

        let sender_clone = sender.clone();
        relm4::spawn(async move {
            while let Ok(event) = rx.recv().await {
                sender_clone.input(AppMsg::from(event));
            }
        });

        ComponentParts { model, widgets }
    }

    fn update(&mut self, msg: Self::Input, sender: ComponentSender<Self>) {
        match msg {
            AppMsg::Show => {
                self.visible = true;
            }
            AppMsg::Hide => {
                self.visible = false;
            }
            AppMsg::Spin => {
                self.visible = true;
                let result = {
                    let mut wheel = self.shared.wheel.borrow_mut();
                    wheel.spin(self.shared.now())
                };
                match result {
                    Ok(_) => {
                        self.spinning = true;
                        self.no_match = false;
                        self.panel = Panel::Prompt;
                        self.start_ticking(&sender);
                    }
                    Err(SpinError::AlreadySpinning) => log::debug!("Spin ignored, already spinning"),
                    Err(SpinError::NoSlices) => log::warn!("Spin ignored, no recipes loaded"),
                }
            }
            AppMsg::Settled(outcome) => {
                self.spinning = false;
                self.emoji = strings::random_food_emoji(&mut self.emoji_rng);
                self.panel = match outcome.card {
                    Some(card) => Panel::Result(card),
                    None => Panel::EmptySlot,
                };
                self.drawing_area.queue_draw();
            }
            AppMsg::CuisineSelected => {
                let selected = self.cuisine_dropdown.selected();
                if let Some(cuisine) = cuisine_at(&self.cuisine_names, selected) {
                    let time = self.shared.wheel.borrow().catalog().filter().time;
                    self.apply_filter(cuisine, time);
                }
            }
            AppMsg::TimeSelected => {
                if let Some(time) = time_at(self.time_dropdown.selected()) {
                    let cuisine = self.shared.wheel.borrow().catalog().filter().cuisine.clone();
                    self.apply_filter(cuisine, time);
                }
            }
            AppMsg::ToggleLanguage => {
                let next = match self.language {
                    Language::En => Language::Fa,
                    Language::Fa => Language::En,
                };
                self.apply_language(next);
            }
            AppMsg::ConfigReload => {
                if self.reload_config() {
                    let data = self.shared.wheel.borrow().settings().data.clone();
                    self.request_catalog(data);
                }
            }
            AppMsg::Reload => {
                self.reload_config();
                let data = self.shared.wheel.borrow().settings().data.clone();
                self.request_catalog(data);
            }
            AppMsg::CatalogLoaded(catalog, origin) => {
                let outcome = self.shared.wheel.borrow_mut().replace_catalog(*catalog);
                self.no_match = outcome == FilterOutcome::Reset;
                self.origin = Some(origin);
                if matches!(self.panel, Panel::Loading) {
                    self.panel = Panel::Prompt;
                }
                self.refresh_dropdowns();
                self.drawing_area.queue_draw();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names() -> Vec<String> {
        vec!["Iran".to_string(), "Italy".to_string()]
    }

    #[test]
    fn test_cuisine_positions() {
        let names = names();
        assert_eq!(cuisine_at(&names, 0), Some(Cuisine::All));
        assert_eq!(cuisine_at(&names, 2), Some(Cuisine::Named("Italy".into())));
        assert_eq!(cuisine_at(&names, 3), None);
        assert_eq!(cuisine_at(&names, gtk::INVALID_LIST_POSITION), None);

        assert_eq!(cuisine_position(&names, &Cuisine::All), 0);
        assert_eq!(cuisine_position(&names, &Cuisine::Named("Iran".into())), 1);
        // a cuisine the new catalog lacks falls back to "all"
        assert_eq!(cuisine_position(&names, &Cuisine::Named("Peru".into())), 0);
    }

    #[test]
    fn test_rebuild_positions_resolve_to_current_filter() {
        let names = names();
        let filter = Cuisine::Named("Italy".into());
        let restored = cuisine_position(&names, &filter);
        assert_eq!(cuisine_at(&names, restored), Some(filter));

        assert_eq!(time_at(0), Some(TimeBucket::All));
        assert_eq!(time_at(TimeBucket::iter().count() as u32), None);
        assert_eq!(time_at(gtk::INVALID_LIST_POSITION), None);
    }
}
