use foodwheel::gui::app::AppModel;
use foodwheel::sys::runtime;
use relm4::prelude::*;
use spinwheel::{RecipeCatalog, RngSource, Wheel, config};

fn main() {
    env_logger::init();

    let settings = config::load_or_default();

    let (tx, rx) = async_channel::bounded(32);
    let (load_tx, load_rx) = async_channel::unbounded();

    // Start Background Services
    runtime::start_background_services(tx, load_rx);
    if let Err(e) = load_tx.send_blocking(settings.data.clone()) {
        log::error!("Failed to request the initial catalog: {}", e);
    }

    // empty until the loader answers
    let wheel = Wheel::new(RecipeCatalog::default(), settings, RngSource::from_os());

    let app = RelmApp::new("org.foodwheel.FoodWheel");

    app.run::<AppModel>((wheel, rx, load_tx));
}
