//! Pointer sample channel and streak promotion
//!
//! The listener thread pushes every observed pointer coordinate into a
//! bounded channel. When the channel is full the oldest sample is dropped
//! to make room, so a stalled UI thread costs at most `capacity` samples
//! of memory. The UI thread drains the channel each tick and promotes a
//! random fraction of the samples to streaks.

use crossbeam_channel::{bounded, Receiver, Sender, TryRecvError, TrySendError};
use rand::Rng;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::geometry::Position;
use crate::streak::StreakField;

/// Raw pointer coordinate as seen by the listener
pub type PointerSample = Position;

/// Result of pushing a sample
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Push {
    Queued,
    /// Queued after evicting the oldest sample
    DroppedOldest,
    /// Still full after the eviction attempt; this sample was dropped
    DroppedNewest,
    /// The receiving side is gone
    Closed,
}

/// Producer half, owned by the listener thread
#[derive(Clone)]
pub struct SampleSender {
    tx: Sender<PointerSample>,
    /// Used only to evict the oldest sample when full
    evict: Receiver<PointerSample>,
    dropped: Arc<AtomicU64>,
}

/// Consumer half, owned by the engine
pub struct SampleReceiver {
    rx: Receiver<PointerSample>,
    dropped: Arc<AtomicU64>,
}

/// Create a bounded drop-oldest sample channel.
pub fn sample_channel(capacity: usize) -> (SampleSender, SampleReceiver) {
    bounded_pair(capacity.max(1))
}

fn bounded_pair(capacity: usize) -> (SampleSender, SampleReceiver) {
    let (tx, rx) = bounded(capacity);
    let dropped = Arc::new(AtomicU64::new(0));
    (
        SampleSender {
            tx,
            evict: rx.clone(),
            dropped: Arc::clone(&dropped),
        },
        SampleReceiver { rx, dropped },
    )
}

impl SampleSender {
    pub fn push(&self, sample: PointerSample) -> Push {
        match self.tx.try_send(sample) {
            Ok(()) => Push::Queued,
            Err(TrySendError::Disconnected(_)) => Push::Closed,
            Err(TrySendError::Full(sample)) => {
                // The consumer may drain between these calls, in which case
                // nothing is evicted and nothing is lost.
                let evicted = self.evict.try_recv().is_ok();
                if evicted {
                    self.dropped.fetch_add(1, Ordering::Relaxed);
                }
                match self.tx.try_send(sample) {
                    Ok(()) if evicted => Push::DroppedOldest,
                    Ok(()) => Push::Queued,
                    Err(TrySendError::Disconnected(_)) => Push::Closed,
                    Err(TrySendError::Full(_)) => {
                        self.dropped.fetch_add(1, Ordering::Relaxed);
                        Push::DroppedNewest
                    }
                }
            }
        }
    }
}

impl SampleReceiver {
    /// Take every queued sample, oldest first.
    pub fn drain(&self) -> Vec<PointerSample> {
        let mut samples = Vec::with_capacity(self.rx.len());
        loop {
            match self.rx.try_recv() {
                Ok(sample) => samples.push(sample),
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        samples
    }

    pub fn len(&self) -> usize {
        self.rx.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }

    /// Samples lost because the channel was full, oldest or newest
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}

/// Thins drained samples into streaks so dense movement does not leave a
/// streak per pixel.
#[derive(Debug, Clone, Copy)]
pub struct Promoter {
    probability: f64,
}

impl Promoter {
    pub fn new(probability: f64) -> Self {
        Self {
            probability: probability.clamp(0.0, 1.0),
        }
    }

    /// Promote each sample with the configured probability. Returns the
    /// number of streaks created.
    pub fn promote(
        &self,
        samples: impl IntoIterator<Item = PointerSample>,
        field: &mut StreakField,
        rng: &mut impl Rng,
    ) -> usize {
        let mut created = 0;
        for sample in samples {
            if rng.gen_bool(self.probability) {
                field.add(sample);
                created += 1;
            }
        }
        created
    }
}
