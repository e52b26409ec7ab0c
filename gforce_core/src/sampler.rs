//! Background sensor sampling.
//!
//! A `Sampler` thread owns the `MotionSensor` and hands every read result to a
//! `SampleSink`. The sink is the only thing the producer side touches: it
//! never blocks, and everything it accepts lands in a bounded queue that the
//! pipeline drains on its own context through `SampleQueue`.
//!
//! A full queue evicts its oldest sample, so the newest always gets in. The
//! component-wise bounds of evicted samples are kept in an `EvictedSpan` and
//! handed to the consumer with the next drain, so no peak is lost.
//!
//! Each `Sampler` spawns exactly one thread, shut down and joined on drop.
use crossbeam_channel as xch;
use gforce_traits::clock::Clock;
use gforce_traits::{AccelerationSample, MotionSensor};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use crate::sensor_error::map_sensor_error;

// Retries when other producers refill the slot an eviction just freed.
const EVICT_ATTEMPTS: usize = 4;

/// What happened to one delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Queued,
    /// Error or non-finite payload; nothing recorded.
    Discarded,
    /// Queue was full; the oldest queued sample made room and went into the `EvictedSpan`.
    Displaced,
    /// The consumer is gone.
    Closed,
}

/// Component-wise bounds of the samples evicted since the consumer last looked.
///
/// Projecting onto a graph axis picks one component and maybe negates it, so
/// `lo` and `hi` together carry every peak the evicted samples had.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EvictedSpan {
    pub lo: AccelerationSample,
    pub hi: AccelerationSample,
    pub count: u64,
}

impl EvictedSpan {
    pub fn of(sample: AccelerationSample) -> Self {
        Self {
            lo: sample,
            hi: sample,
            count: 1,
        }
    }

    pub fn include(&mut self, s: AccelerationSample) {
        self.lo = AccelerationSample::new(self.lo.x.min(s.x), self.lo.y.min(s.y), self.lo.z.min(s.z));
        self.hi = AccelerationSample::new(self.hi.x.max(s.x), self.hi.y.max(s.y), self.hi.z.max(s.z));
        self.count = self.count.saturating_add(1);
    }
}

#[derive(Debug, Default)]
struct Shared {
    queued: AtomicU64,
    discarded: AtomicU64,
    evicted_total: AtomicU64,
    closed: AtomicBool,
    evicted: Mutex<Option<EvictedSpan>>,
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Producer half of the sample queue. Cheap to clone, safe to call from any thread.
#[derive(Debug, Clone)]
pub struct SampleSink {
    tx: xch::Sender<AccelerationSample>,
    // Used only to evict the oldest sample when the queue is full.
    rx: xch::Receiver<AccelerationSample>,
    shared: Arc<Shared>,
}

/// Consumer half of the sample queue. Dropping it closes every sink.
#[derive(Debug)]
pub struct SampleQueue {
    rx: xch::Receiver<AccelerationSample>,
    shared: Arc<Shared>,
}

impl SampleSink {
    /// Bounded queue of `capacity` samples.
    pub fn bounded(capacity: usize) -> (Self, SampleQueue) {
        let (tx, rx) = xch::bounded(capacity.max(1));
        let shared = Arc::new(Shared::default());
        let sink = Self {
            tx,
            rx: rx.clone(),
            shared: shared.clone(),
        };
        (sink, SampleQueue { rx, shared })
    }

    /// Hand over one sensor callback. O(1); never blocks.
    pub fn deliver(
        &self,
        result: Result<AccelerationSample, Box<dyn std::error::Error + Send + Sync>>,
    ) -> Delivery {
        match result {
            Ok(sample) => self.push(sample),
            Err(e) => {
                let err = map_sensor_error(&*e);
                tracing::debug!(error = %err, "sensor delivery discarded");
                self.shared.discarded.fetch_add(1, Ordering::Relaxed);
                Delivery::Discarded
            }
        }
    }

    /// Hand over one sample known to be good.
    pub fn push(&self, sample: AccelerationSample) -> Delivery {
        if self.shared.closed.load(Ordering::Relaxed) {
            return Delivery::Closed;
        }
        if !sample.is_finite() {
            tracing::debug!(?sample, "non-finite sample discarded");
            self.shared.discarded.fetch_add(1, Ordering::Relaxed);
            return Delivery::Discarded;
        }

        let mut pending = sample;
        let mut displaced = false;
        for _ in 0..EVICT_ATTEMPTS {
            match self.tx.try_send(pending) {
                Ok(()) => {
                    self.shared.queued.fetch_add(1, Ordering::Relaxed);
                    return if displaced {
                        Delivery::Displaced
                    } else {
                        Delivery::Queued
                    };
                }
                Err(xch::TrySendError::Full(s)) => {
                    pending = s;
                    if let Ok(oldest) = self.rx.try_recv() {
                        self.evict(oldest);
                        displaced = true;
                    }
                }
                Err(xch::TrySendError::Disconnected(_)) => return Delivery::Closed,
            }
        }
        // Other producers won every freed slot; keep at least this sample's peaks.
        self.evict(pending);
        Delivery::Displaced
    }

    fn evict(&self, sample: AccelerationSample) {
        tracing::trace!("sample queue full; evicting oldest");
        self.shared.evicted_total.fetch_add(1, Ordering::Relaxed);
        let mut span = lock(&self.shared.evicted);
        match span.as_mut() {
            Some(span) => span.include(sample),
            None => *span = Some(EvictedSpan::of(sample)),
        }
    }

    pub fn queued(&self) -> u64 {
        self.shared.queued.load(Ordering::Relaxed)
    }

    pub fn discarded(&self) -> u64 {
        self.shared.discarded.load(Ordering::Relaxed)
    }

    /// Samples evicted from a full queue so far.
    pub fn dropped(&self) -> u64 {
        self.shared.evicted_total.load(Ordering::Relaxed)
    }
}

impl SampleQueue {
    pub fn len(&self) -> usize {
        self.rx.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }

    pub fn try_recv(&self) -> Option<AccelerationSample> {
        self.rx.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<AccelerationSample> {
        self.rx.recv_timeout(timeout).ok()
    }

    /// Everything queued right now, oldest first. Samples pushed meanwhile
    /// wait for the next call, so a fast producer cannot keep this going.
    pub fn drain(&self) -> impl Iterator<Item = AccelerationSample> + '_ {
        let queued = self.rx.len();
        self.rx.try_iter().take(queued)
    }

    /// Bounds of the samples evicted since the last call, if any.
    pub fn take_evicted(&self) -> Option<EvictedSpan> {
        lock(&self.shared.evicted).take()
    }
}

impl Drop for SampleQueue {
    fn drop(&mut self) {
        self.shared.closed.store(true, Ordering::Relaxed);
    }
}

pub struct Sampler {
    last_ok: Arc<AtomicU64>,
    epoch: Instant,
    clock: Arc<dyn Clock + Send + Sync>,
    shutdown: Arc<AtomicBool>,
    join_handle: Option<std::thread::JoinHandle<()>>,
}

impl Sampler {
    /// Paced sampler: one read every `1/hz`, on top of whatever the read itself blocks for.
    pub fn spawn<S, C>(sensor: S, sink: SampleSink, hz: u32, timeout: Duration, clock: C) -> Self
    where
        S: MotionSensor + Send + 'static,
        C: Clock + Send + Sync + 'static,
    {
        let period = crate::util::period(hz);
        Self::spawn_inner(sensor, sink, Some(period), timeout, clock)
    }

    /// Event-driven sampler: `read(timeout)` is expected to block until the
    /// sensor has data, so no extra sleep is added.
    pub fn spawn_event<S, C>(sensor: S, sink: SampleSink, timeout: Duration, clock: C) -> Self
    where
        S: MotionSensor + Send + 'static,
        C: Clock + Send + Sync + 'static,
    {
        Self::spawn_inner(sensor, sink, None, timeout, clock)
    }

    fn spawn_inner<S, C>(
        mut sensor: S,
        sink: SampleSink,
        period: Option<Duration>,
        timeout: Duration,
        clock: C,
    ) -> Self
    where
        S: MotionSensor + Send + 'static,
        C: Clock + Send + Sync + 'static,
    {
        let shutdown = Arc::new(AtomicBool::new(false));
        let shutdown_clone = shutdown.clone();
        let last_ok = Arc::new(AtomicU64::new(0));
        let last_ok_clone = last_ok.clone();
        let clock: Arc<dyn Clock + Send + Sync> = Arc::new(clock);
        let thread_clock = clock.clone();
        let epoch = clock.now();

        let join_handle = std::thread::spawn(move || {
            tracing::debug!(paced = period.is_some(), "sampler thread started");
            loop {
                if shutdown_clone.load(Ordering::Relaxed) {
                    tracing::debug!("sampler thread received shutdown signal");
                    break;
                }

                let result = sensor.read(timeout);
                let ok = result.is_ok();
                if sink.deliver(result) == Delivery::Closed {
                    tracing::debug!("sample consumer disconnected, exiting thread");
                    break;
                }
                if ok {
                    last_ok_clone.store(thread_clock.ms_since(epoch), Ordering::Relaxed);
                }

                if shutdown_clone.load(Ordering::Relaxed) {
                    break;
                }
                if let Some(p) = period {
                    thread_clock.sleep(p);
                }
            }
            tracing::trace!("sampler thread exiting cleanly");
        });

        Self {
            last_ok,
            epoch,
            clock,
            shutdown,
            join_handle: Some(join_handle),
        }
    }

    /// Milliseconds since the last successful read, measured against `now_ms` on the sampler's epoch.
    pub fn stalled_for(&self, now_ms: u64) -> u64 {
        now_ms.saturating_sub(self.last_ok.load(Ordering::Relaxed))
    }

    /// Same as `stalled_for`, read off the sampler's own clock.
    pub fn stalled_for_now(&self) -> u64 {
        self.stalled_for(self.clock.ms_since(self.epoch))
    }

    pub fn is_running(&self) -> bool {
        self.join_handle
            .as_ref()
            .is_some_and(|h| !h.is_finished())
    }
}

impl Drop for Sampler {
    fn drop(&mut self) {
        self.shutdown.store(true, Ordering::Relaxed);
        // The thread exits after its current read returns (bounded by the read timeout).
        if let Some(handle) = self.join_handle.take() {
            match handle.join() {
                Ok(()) => tracing::trace!("sampler thread joined"),
                Err(e) => tracing::warn!(?e, "sampler thread panicked during shutdown"),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sink_discards_errors_and_non_finite() {
        let (sink, rx) = SampleSink::bounded(4);
        let err: Box<dyn std::error::Error + Send + Sync> = Box::new(std::io::Error::other("nack"));
        assert_eq!(sink.deliver(Err(err)), Delivery::Discarded);
        assert_eq!(
            sink.push(AccelerationSample::new(f64::INFINITY, 0.0, 0.0)),
            Delivery::Discarded
        );
        assert_eq!(sink.discarded(), 2);
        assert!(rx.try_recv().is_none());
    }

    #[test]
    fn full_queue_evicts_oldest_and_keeps_its_peaks() {
        let (sink, queue) = SampleSink::bounded(2);
        let peak = AccelerationSample::new(-1.5, 0.0, 2.5);
        let b = AccelerationSample::new(0.1, 0.0, 0.1);
        let c = AccelerationSample::new(0.2, 0.0, 0.3);
        assert_eq!(sink.push(peak), Delivery::Queued);
        assert_eq!(sink.push(b), Delivery::Queued);
        assert_eq!(sink.push(c), Delivery::Displaced);
        assert_eq!(sink.dropped(), 1);
        assert_eq!(queue.drain().collect::<Vec<_>>(), vec![b, c]);
        assert_eq!(queue.take_evicted(), Some(EvictedSpan::of(peak)));
        assert_eq!(queue.take_evicted(), None);
    }

    #[test]
    fn evicted_span_tracks_component_bounds() {
        let mut span = EvictedSpan::of(AccelerationSample::new(0.5, -1.0, 0.0));
        span.include(AccelerationSample::new(-0.25, -0.5, 1.5));
        span.include(AccelerationSample::new(0.0, -2.0, -0.75));
        assert_eq!(span.lo, AccelerationSample::new(-0.25, -2.0, -0.75));
        assert_eq!(span.hi, AccelerationSample::new(0.5, -0.5, 1.5));
        assert_eq!(span.count, 3);
    }

    #[test]
    fn stall_is_measured_on_the_injected_clock() {
        use gforce_traits::clock::test_clock::TestClock;

        let clock = TestClock::new();
        let (sink, _queue) = SampleSink::bounded(4);
        // Event mode never sleeps, so only this test moves the clock.
        let sampler = Sampler::spawn_event(
            crate::mocks::NoopSensor,
            sink,
            Duration::from_millis(1),
            clock.clone(),
        );
        clock.advance(Duration::from_millis(750));
        assert_eq!(sampler.stalled_for_now(), 750);
    }

    #[test]
    fn closed_when_receiver_gone() {
        let (sink, rx) = SampleSink::bounded(2);
        drop(rx);
        assert_eq!(sink.push(AccelerationSample::ZERO), Delivery::Closed);
    }
}
