use crate::events::AppEvent;
use async_channel::Sender;
use spinwheel::{ControlCommand, SOCKET_PATH};
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::net::UnixListener;

/// Forwards each recognized line from one client as an `AppEvent`.
async fn handle_client<S: AsyncRead + Unpin>(stream: S, tx: Sender<AppEvent>) {
    let mut lines = BufReader::new(stream).lines();

    while let Ok(Some(line)) = lines.next_line().await {
        let Some(command) = ControlCommand::parse_line(&line) else {
            log::warn!("Ignoring unknown control command {:?}", line.trim());
            continue;
        };
        log::debug!("Control command: {}", command);
        if tx.send(AppEvent::from(command)).await.is_err() {
            break;
        }
    }
}

pub async fn run_server(tx: Sender<AppEvent>) {
    // left behind by a previous run
    if fs_err::metadata(SOCKET_PATH).is_ok() {
        let _ = fs_err::remove_file(SOCKET_PATH);
    }

    let listener = match UnixListener::bind(SOCKET_PATH) {
        Ok(l) => l,
        Err(e) => {
            log::error!("Failed to bind {}: {}", SOCKET_PATH, e);
            return;
        }
    };
    log::info!("Listening for commands on {}", SOCKET_PATH);

    loop {
        match listener.accept().await {
            Ok((stream, _)) => {
                tokio::spawn(handle_client(stream, tx.clone()));
            }
            Err(e) => log::error!("Failed to accept connection: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_client_lines_become_events() {
        let (tx, rx) = async_channel::unbounded();
        let input: &[u8] = b"spin\nbogus\n  HIDE \nreload\n";

        handle_client(input, tx).await;

        let events: Vec<AppEvent> = std::iter::from_fn(|| rx.try_recv().ok()).collect();
        assert!(matches!(
            events.as_slice(),
            [AppEvent::Spin, AppEvent::Hide, AppEvent::Reload]
        ));
    }
}
