//! Terminal input: a dedicated thread turning crossterm events into
//! messages, plus the periodic tick

use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyEventKind};
use tokio::sync::mpsc::UnboundedSender;

use crate::ui::msg::Msg;

/// Tick period; also bounds how stale the notification expiry check
/// can get
pub const TICK_RATE: Duration = Duration::from_millis(250);

/// Spawn the blocking input reader. The thread exits when the
/// receiving side of the channel is dropped.
pub fn spawn_input_thread(tx: UnboundedSender<Msg>) {
    std::thread::spawn(move || {
        let mut last_tick = Instant::now();
        loop {
            let timeout = TICK_RATE.saturating_sub(last_tick.elapsed());
            match event::poll(timeout) {
                Ok(true) => match event::read() {
                    Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                        if tx.send(Msg::Key(key)).is_err() {
                            return;
                        }
                    }
                    // Resizes are handled implicitly: the next draw
                    // re-measures the terminal.
                    Ok(_) => {}
                    Err(e) => {
                        tracing::warn!(error = %e, "terminal input read failed");
                        return;
                    }
                },
                Ok(false) => {}
                Err(e) => {
                    tracing::warn!(error = %e, "terminal input poll failed");
                    return;
                }
            }

            if last_tick.elapsed() >= TICK_RATE {
                if tx.send(Msg::Tick).is_err() {
                    return;
                }
                last_tick = Instant::now();
            }
        }
    });
}
