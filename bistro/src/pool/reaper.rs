//! Background idle eviction.

use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{bounded, RecvTimeoutError, Sender};

use crate::error::Result;

/// A thread that runs `tick` every `interval` until stopped.
///
/// `tick` returning `false` ends the thread early, which happens once the
/// pool it serves is gone. Dropping the reaper stops and joins the thread.
pub(crate) struct Reaper {
    stop: Sender<()>,
    handle: Option<JoinHandle<()>>,
}

impl Reaper {
    pub(crate) fn spawn<F>(interval: Duration, mut tick: F) -> Result<Self>
    where
        F: FnMut() -> bool + Send + 'static,
    {
        let (stop, stopped) = bounded::<()>(1);
        let handle = thread::Builder::new()
            .name("bistro-reaper".into())
            .spawn(move || loop {
                match stopped.recv_timeout(interval) {
                    Err(RecvTimeoutError::Timeout) => {
                        if !tick() {
                            break;
                        }
                    }
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                }
            })?;

        log::debug!("Started reaper every {interval:?}");
        Ok(Self {
            stop,
            handle: Some(handle),
        })
    }
}

impl Drop for Reaper {
    fn drop(&mut self) {
        let _ = self.stop.try_send(());
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log::warn!("Reaper thread panicked");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_ticks_until_dropped() {
        let ticks = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&ticks);
        let reaper = Reaper::spawn(Duration::from_millis(5), move || {
            counter.fetch_add(1, Ordering::SeqCst);
            true
        })
        .unwrap();

        thread::sleep(Duration::from_millis(100));
        drop(reaper);
        let seen = ticks.load(Ordering::SeqCst);
        assert!(seen > 0);

        thread::sleep(Duration::from_millis(30));
        assert_eq!(ticks.load(Ordering::SeqCst), seen);
    }

    #[test]
    fn test_tick_false_ends_thread() {
        let ticks = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&ticks);
        let reaper = Reaper::spawn(Duration::from_millis(5), move || {
            counter.fetch_add(1, Ordering::SeqCst);
            false
        })
        .unwrap();

        thread::sleep(Duration::from_millis(60));
        assert_eq!(ticks.load(Ordering::SeqCst), 1);
        drop(reaper);
    }

    #[test]
    fn test_stop_is_prompt() {
        let reaper = Reaper::spawn(Duration::from_secs(3600), || true).unwrap();
        let started = std::time::Instant::now();
        drop(reaper);
        assert!(started.elapsed() < Duration::from_secs(5));
    }
}
