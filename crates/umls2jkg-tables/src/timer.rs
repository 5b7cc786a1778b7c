//! Elapsed-time display for long table scans.
//!
//! Lazy scans give no per-row feedback until they finish, so a [`ScanTimer`]
//! keeps a spinner alive showing wall-clock elapsed time. The render loop
//! runs on its own thread, reads only the monotonic clock, and is stopped
//! and joined deterministically before the scan result is used — it is never
//! on the critical path for correctness.

use indicatif::{ProgressBar, ProgressStyle};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

const REFRESH_INTERVAL: Duration = Duration::from_millis(500);

pub struct ScanTimer {
    bar: ProgressBar,
    stop_tx: mpsc::Sender<()>,
    handle: Option<JoinHandle<()>>,
}

impl ScanTimer {
    /// Start the display thread with the given message.
    pub fn start(display_msg: String) -> Self {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::with_template("{spinner:.green} {msg}").expect("spinner template"),
        );
        bar.set_message(display_msg.clone());

        let (stop_tx, stop_rx) = mpsc::channel::<()>();
        let render = bar.clone();
        let handle = thread::spawn(move || {
            let start = Instant::now();
            loop {
                match stop_rx.recv_timeout(REFRESH_INTERVAL) {
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                    Err(RecvTimeoutError::Timeout) => {
                        render.set_message(format!(
                            "{display_msg} elapsed = {}",
                            fmt_elapsed(start.elapsed())
                        ));
                        render.tick();
                    }
                }
            }
        });

        Self {
            bar,
            stop_tx,
            handle: Some(handle),
        }
    }

    /// Signal the render thread, join it, and clear the spinner.
    pub fn stop(mut self) {
        self.halt();
    }

    fn halt(&mut self) {
        let _ = self.stop_tx.send(());
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
        self.bar.finish_and_clear();
    }
}

impl Drop for ScanTimer {
    fn drop(&mut self) {
        if self.handle.is_some() {
            self.halt();
        }
    }
}

fn fmt_elapsed(elapsed: Duration) -> String {
    let s = elapsed.as_secs();
    let (h, s) = (s / 3600, s % 3600);
    let (m, s) = (s / 60, s % 60);
    if h > 0 {
        format!("{h}:{m:02}:{s:02}")
    } else {
        format!("{m:02}:{s:02}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_elapsed_time() {
        assert_eq!(fmt_elapsed(Duration::from_secs(7)), "00:07");
        assert_eq!(fmt_elapsed(Duration::from_secs(125)), "02:05");
        assert_eq!(fmt_elapsed(Duration::from_secs(3700)), "1:01:40");
    }

    #[test]
    fn stop_joins_the_render_thread() {
        let timer = ScanTimer::start("working".to_string());
        thread::sleep(Duration::from_millis(20));
        timer.stop();
    }

    #[test]
    fn drop_without_stop_is_clean() {
        let _timer = ScanTimer::start("working".to_string());
    }
}
