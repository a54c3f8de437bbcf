use crate::events::AppEvent;
use async_channel::{Receiver, Sender};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use spinwheel::config::get_config_path;
use std::path::Path;
use std::time::Duration;

/// Editors tend to write a file in several steps; one reload per burst.
const SETTLE: Duration = Duration::from_millis(250);

fn is_config_change(event: &Event, config_path: &Path) -> bool {
    matches!(
        event.kind,
        EventKind::Modify(_) | EventKind::Create(_) | EventKind::Remove(_)
    ) && event.paths.iter().any(|p| p == config_path)
}

fn watch_dir(dir: &Path) -> notify::Result<(RecommendedWatcher, Receiver<notify::Result<Event>>)> {
    let (bridge_tx, bridge_rx) = async_channel::unbounded();
    let mut watcher = RecommendedWatcher::new(
        move |res| {
            let _ = bridge_tx.send_blocking(res);
        },
        notify::Config::default(),
    )?;
    // the directory, so replaced files are still seen
    watcher.watch(dir, RecursiveMode::NonRecursive)?;
    Ok((watcher, bridge_rx))
}

/// Sends `ConfigReload` after the config file changes and the burst of
/// file system events around the write has gone quiet.
pub async fn run_async_watcher(tx: Sender<AppEvent>) {
    let config_path = match get_config_path() {
        Ok(p) => p,
        Err(e) => {
            log::error!("Config watcher error: {}", e);
            return;
        }
    };
    let Some(config_dir) = config_path.parent() else {
        return;
    };

    if let Err(e) = fs_err::create_dir_all(config_dir) {
        log::error!("Failed to create config directory for watching: {}", e);
        return;
    }

    // the watcher stops when dropped
    let (_watcher, events) = match watch_dir(config_dir) {
        Ok(pair) => pair,
        Err(e) => {
            log::error!("Failed to watch {}: {}", config_dir.display(), e);
            return;
        }
    };

    while let Ok(res) = events.recv().await {
        match res {
            Ok(event) if is_config_change(&event, &config_path) => {
                tokio::time::sleep(SETTLE).await;
                while events.try_recv().is_ok() {}

                log::debug!("{} changed", config_path.display());
                if tx.send(AppEvent::ConfigReload).await.is_err() {
                    break;
                }
            }
            Ok(_) => {}
            Err(e) => log::error!("Watch error: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{CreateKind, ModifyKind};
    use std::path::PathBuf;

    #[test]
    fn test_only_config_file_changes_count() {
        let config = PathBuf::from("/home/u/.config/foodwheel/config.toml");

        let write = Event::new(EventKind::Modify(ModifyKind::Any)).add_path(config.clone());
        assert!(is_config_change(&write, &config));

        let sibling = Event::new(EventKind::Create(CreateKind::File))
            .add_path(PathBuf::from("/home/u/.config/foodwheel/config.toml~"));
        assert!(!is_config_change(&sibling, &config));

        let access = Event::new(EventKind::Access(notify::event::AccessKind::Any))
            .add_path(config.clone());
        assert!(!is_config_change(&access, &config));
    }
}
