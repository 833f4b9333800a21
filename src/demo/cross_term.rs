use crossterm::event::Event;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Reads terminal events on a blocking thread until the receiver is dropped or
/// `cancellation_token` is cancelled.
pub fn receive_cross_term_events(cancellation_token: CancellationToken) -> mpsc::Receiver<Event> {

    let (sender, receiver) = mpsc::channel(10);
    tokio::task::spawn_blocking(move || {
        while !cancellation_token.is_cancelled() {
            match crossterm::event::poll(std::time::Duration::from_millis(100)) {
                Ok(false) => continue,
                Ok(true) => {}
                Err(_) => break,
            }
            let Ok(event) = crossterm::event::read() else {
                break;
            };
            if sender.blocking_send(event).is_err() {
                break;
            }
        }
    });
    receiver
}
