use crate::events::AppEvent;
use async_channel::{Receiver, Sender};
use spinwheel::config::DataSettings;
use spinwheel::load_catalog;

/// Serves catalog load requests one at a time until either channel closes.
pub async fn run_loader(requests: Receiver<DataSettings>, tx: Sender<AppEvent>) {
    while let Ok(data) = requests.recv().await {
        let (catalog, origin) = load_catalog(&data).await;
        log::info!("Loaded {} recipes from {}", catalog.all().len(), origin);

        if tx
            .send(AppEvent::CatalogLoaded(Box::new(catalog), origin))
            .await
            .is_err()
        {
            break;
        }
    }
}
