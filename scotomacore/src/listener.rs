//! Background pointer listener
//!
//! Polls the global pointer position on its own thread and pushes a sample
//! into the sample channel whenever the position changes. The thread does
//! nothing else, so the channel is the only state it shares.

use device_query::{DeviceQuery, DeviceState};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use crate::error::{Error, Result};
use crate::geometry::{device_to_physical, DisplayScale, Position, DEVICE_REPORTS_POINTS};
use crate::sampler::{Push, SampleSender};

/// Anything that can report the global pointer position.
pub trait PointerSource {
    fn position(&self) -> Position;
}

/// The real pointer, read through `device_query` and reported in physical
/// pixels.
pub struct DevicePointer {
    state: DeviceState,
    scale: DisplayScale,
}

impl DevicePointer {
    pub fn new(scale: DisplayScale) -> Self {
        Self {
            state: DeviceState::new(),
            scale,
        }
    }
}

impl PointerSource for DevicePointer {
    fn position(&self) -> Position {
        device_to_physical(self.state.get_mouse().coords, self.scale.get(), DEVICE_REPORTS_POINTS)
    }
}

/// Handle to the listener thread. Dropping it stops the thread.
pub struct PointerListener {
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl PointerListener {
    /// Start listening to the real pointer.
    pub fn spawn_device(sender: SampleSender, poll_interval: Duration, scale: DisplayScale) -> Result<Self> {
        Self::spawn(move || DevicePointer::new(scale), sender, poll_interval)
    }

    /// Start listening to the source built by `make_source`. The source is
    /// constructed on the listener thread.
    pub fn spawn<S, F>(make_source: F, sender: SampleSender, poll_interval: Duration) -> Result<Self>
    where
        S: PointerSource,
        F: FnOnce() -> S + Send + 'static,
    {
        let stop = Arc::new(AtomicBool::new(false));
        let stop_flag = Arc::clone(&stop);

        let handle = std::thread::Builder::new()
            .name("pointer-listener".into())
            .spawn(move || {
                let source = make_source();
                let mut last: Option<Position> = None;
                log::debug!("pointer listener running every {:?}", poll_interval);

                while !stop_flag.load(Ordering::Relaxed) {
                    let position = source.position();
                    if last != Some(position) {
                        last = Some(position);
                        match sender.push(position) {
                            Push::Queued => {}
                            Push::DroppedOldest => log::trace!("sample queue full, dropped oldest"),
                            Push::DroppedNewest => log::trace!("sample queue full, dropped newest"),
                            Push::Closed => break,
                        }
                    }
                    std::thread::sleep(poll_interval);
                }
                log::debug!("pointer listener stopped");
            })
            .map_err(Error::Listener)?;

        Ok(Self {
            stop,
            handle: Some(handle),
        })
    }

    pub fn stop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for PointerListener {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sampler::sample_channel;
    use std::sync::atomic::AtomicUsize;
    use std::time::Instant;

    /// Walks through a fixed path, repeating the last point forever.
    struct ScriptedPointer {
        path: Vec<Position>,
        calls: AtomicUsize,
    }

    impl PointerSource for ScriptedPointer {
        fn position(&self) -> Position {
            let i = self.calls.fetch_add(1, Ordering::Relaxed);
            self.path[i.min(self.path.len() - 1)]
        }
    }

    #[test]
    fn test_pushes_only_changes() {
        let (tx, rx) = sample_channel(64);
        let path = vec![
            Position::new(0, 0),
            Position::new(0, 0),
            Position::new(1, 0),
            Position::new(1, 0),
            Position::new(2, 5),
        ];
        let expected = vec![Position::new(0, 0), Position::new(1, 0), Position::new(2, 5)];

        let mut listener = PointerListener::spawn(
            move || ScriptedPointer { path, calls: AtomicUsize::new(0) },
            tx,
            Duration::from_millis(1),
        )
        .unwrap();

        let deadline = Instant::now() + Duration::from_secs(2);
        while rx.len() < expected.len() && Instant::now() < deadline {
            std::thread::sleep(Duration::from_millis(2));
        }
        // Let it spin on the repeated last point a little longer
        std::thread::sleep(Duration::from_millis(20));
        listener.stop();

        assert_eq!(rx.drain(), expected);
    }
}
