//! Sampler thread lifecycle: threads exit on drop and never leak.

use gforce_core::mocks::{ConstantSensor, NoopSensor};
use gforce_core::sampler::{SampleSink, Sampler};
use gforce_core::AccelerationSample;
use gforce_traits::clock::MonotonicClock;
use std::time::Duration;

#[test]
fn sampler_thread_exits_on_drop() {
    let (sink, _queue) = SampleSink::bounded(8);
    let sampler = Sampler::spawn(
        NoopSensor,
        sink,
        10,
        Duration::from_millis(100),
        MonotonicClock::new(),
    );
    std::thread::sleep(Duration::from_millis(50));
    assert!(sampler.is_running());
    drop(sampler);
}

#[test]
fn multiple_samplers_dont_leak_threads() {
    let clock = MonotonicClock::new();
    for _ in 0..10 {
        let (sink, _queue) = SampleSink::bounded(8);
        let sampler = Sampler::spawn(NoopSensor, sink, 10, Duration::from_millis(50), clock);
        std::thread::sleep(Duration::from_millis(10));
        drop(sampler);
    }
}

#[test]
fn event_sampler_forwards_reads() {
    let (sink, queue) = SampleSink::bounded(4);
    let reading = AccelerationSample::new(0.1, 0.2, 0.3);
    let sampler = Sampler::spawn_event(
        ConstantSensor(reading),
        sink.clone(),
        Duration::from_millis(10),
        MonotonicClock::new(),
    );
    let got = queue.recv_timeout(Duration::from_secs(2)).unwrap();
    assert_eq!(got, reading);
    // An unpaced constant sensor outruns a queue nobody drains.
    std::thread::sleep(Duration::from_millis(20));
    drop(sampler);
    assert!(sink.dropped() > 0);
}

#[test]
fn errors_are_counted_not_forwarded() {
    let (sink, queue) = SampleSink::bounded(4);
    let sampler = Sampler::spawn(
        NoopSensor,
        sink.clone(),
        200,
        Duration::from_millis(5),
        MonotonicClock::new(),
    );
    std::thread::sleep(Duration::from_millis(60));
    drop(sampler);
    assert!(sink.discarded() > 0);
    assert!(queue.try_recv().is_none());
}

#[test]
fn sampler_exits_when_consumer_disconnects() {
    let (sink, queue) = SampleSink::bounded(1);
    let sampler = Sampler::spawn(
        ConstantSensor(AccelerationSample::ZERO),
        sink,
        100,
        Duration::from_millis(10),
        MonotonicClock::new(),
    );
    std::thread::sleep(Duration::from_millis(30));
    drop(queue);
    // The next delivery sees the closed queue and the thread stops by itself.
    let deadline = std::time::Instant::now() + Duration::from_secs(2);
    while sampler.is_running() && std::time::Instant::now() < deadline {
        std::thread::sleep(Duration::from_millis(5));
    }
    assert!(!sampler.is_running());
}

#[test]
fn sampler_shutdown_is_prompt() {
    let (sink, _queue) = SampleSink::bounded(8);
    let sampler = Sampler::spawn(
        NoopSensor,
        sink,
        10,
        Duration::from_millis(50),
        MonotonicClock::new(),
    );
    std::thread::sleep(Duration::from_millis(100));

    let start = std::time::Instant::now();
    drop(sampler);
    let shutdown_time = start.elapsed();

    // Worst case is one paced sleep (100 ms at 10 Hz) plus join.
    assert!(
        shutdown_time < Duration::from_millis(300),
        "Shutdown took {shutdown_time:?}, expected < 300ms"
    );
}
