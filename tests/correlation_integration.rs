// Entry/return correlation feeding the partial-capture classification path.
//
// Models a capture source that sees a kernel call as two events: the entry
// event carries the buffer descriptor (here, the payload length), the return
// event carries the first payload bytes. The correlation map bridges the two.

use std::time::Duration;

use httpcount::{Config, CorrelationMap, CounterKey, Engine, KeyDimension};

fn init_logs() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn entry_return_pair_counted_by_payload_length() {
    init_logs();

    let engine = Engine::new(Config {
        key_dimension: KeyDimension::PayloadLength,
        ..Config::default()
    })
    .unwrap();
    let map = CorrelationMap::default();

    // Entry event: thread 501 starts a copy of 512 payload bytes.
    map.record_entry(501, 512);

    // Return event for the same thread: first bytes of the copied payload.
    let declared_len = map.take(501).expect("entry was recorded") as usize;
    let counted = engine.classify_prefix(
        b"HTTP",
        declared_len,
        CounterKey::PayloadLength(declared_len as u16),
    );

    assert!(counted);
    assert_eq!(engine.counters().get(CounterKey::PayloadLength(512)), 1);
}

#[test]
fn return_without_entry_is_skipped() {
    init_logs();

    let engine = Engine::default();
    let map = CorrelationMap::default();

    // Return fires for a thread we never saw enter: no declared length, no
    // classification, no count.
    assert_eq!(map.take(777), None);
    assert!(engine.counters().is_empty());
}

#[test]
fn stale_entries_swept_without_breaking_live_ones() {
    init_logs();

    // Zero TTL makes every entry immediately sweepable.
    let map = CorrelationMap::new(64, Duration::ZERO);
    for tid in 0..10 {
        map.record_entry(tid, tid * 100);
    }
    assert_eq!(map.sweep(), 10);
    assert!(map.is_empty());

    // A fresh entry after the sweep still correlates.
    map.record_entry(11, 1100);
    assert_eq!(map.take(11), Some(1100));
}

#[test]
fn concurrent_entry_return_pairs_all_correlate() {
    init_logs();

    const THREADS: u64 = 8;
    const PER_THREAD: u64 = 500;

    let engine = Engine::new(Config {
        key_dimension: KeyDimension::PayloadLength,
        ..Config::default()
    })
    .unwrap();
    let map = CorrelationMap::new(8192, Duration::from_secs(60));

    std::thread::scope(|scope| {
        for t in 0..THREADS {
            let map = &map;
            let engine = &engine;
            scope.spawn(move || {
                for i in 0..PER_THREAD {
                    let tid = t * PER_THREAD + i;
                    map.record_entry(tid, 128);
                    let declared = map.take(tid).expect("own entry present") as usize;
                    engine.classify_prefix(
                        b"GET /",
                        declared,
                        CounterKey::PayloadLength(declared as u16),
                    );
                }
            });
        }
    });

    assert!(map.is_empty());
    assert_eq!(
        engine.counters().get(CounterKey::PayloadLength(128)),
        THREADS * PER_THREAD
    );
}
