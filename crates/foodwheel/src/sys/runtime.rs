use crate::events::AppEvent;
use async_channel::{Receiver, Sender};
use spinwheel::config::DataSettings;
use std::thread;
use tokio::runtime::Runtime;

/// Runs the control socket, config watcher and catalog loader on a Tokio
/// runtime in their own thread. Catalog loads are requested by sending the
/// data settings to use on `load_requests`.
pub fn start_background_services(tx: Sender<AppEvent>, load_requests: Receiver<DataSettings>) {
    thread::spawn(move || {
        let rt = Runtime::new().expect("Failed to create Tokio runtime");

        rt.block_on(async {
            {
                let tx = tx.clone();
                tokio::spawn(async move {
                    crate::sys::server::run_server(tx).await;
                });
            }

            {
                let tx = tx.clone();
                tokio::spawn(async move {
                    crate::sys::watcher::run_async_watcher(tx).await;
                });
            }

            {
                let tx = tx.clone();
                tokio::spawn(async move {
                    crate::sys::loader::run_loader(load_requests, tx).await;
                });
            }

            std::future::pending::<()>().await;
        });
    });
}
