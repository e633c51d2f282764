mod common;

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use callparser::{
    engine::CallbookSource,
    persist::{HitCache, MemoryHitCache},
    record::{CallbookRecord, Hit},
    runtime::{
        events::LookupEvent,
        handle::{spawn_lookup_service, RuntimeConfig, RuntimeError},
    },
    types::Correlation,
};

struct CountingCallbook {
    calls: Arc<AtomicUsize>,
}

impl CallbookSource for CountingCallbook {
    fn lookup(&self, call: &str) -> Option<Hit> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        (call == "W6OP").then(|| {
            Hit::from(CallbookRecord {
                call: call.to_string(),
                country: "United States".to_string(),
                dxcc: Some(291),
                county: "Santa Clara".to_string(),
                grid: "CM97".to_string(),
                lotw: true,
                ..CallbookRecord::default()
            })
        })
    }

    fn name(&self) -> &str {
        "counting"
    }
}

fn memory_cache() -> Option<Box<dyn HitCache>> {
    Some(Box::new(MemoryHitCache::new()))
}

#[tokio::test]
async fn second_lookup_is_served_from_cache() {
    let handle = spawn_lookup_service(
        common::fixture_engine(),
        memory_cache(),
        None,
        RuntimeConfig::default(),
    );
    let mut sub = handle.subscribe();

    let first = handle.lookup("kg4aa").await.expect("lookup");
    let second = handle
        .lookup_correlated(
            "KG4AA",
            Correlation {
                spot_id: 5,
                sequence: 6,
            },
        )
        .await
        .expect("lookup");

    assert_eq!(first.len(), 1);
    assert_eq!(second.len(), 1);
    assert_eq!(second[0].country, first[0].country);
    assert_eq!((second[0].spot_id, second[0].sequence), (5, 6));
    assert_eq!(handle.cache_len().await.expect("len"), Some(1));

    let e1 = sub.recv().await.expect("event");
    let e2 = sub.recv().await.expect("event");
    assert!(matches!(e1, LookupEvent::Resolved { cached: false, hits: 1, .. }));
    assert!(matches!(e2, LookupEvent::Resolved { cached: true, hits: 1, .. }));

    handle.shutdown().await.expect("shutdown");
}

#[tokio::test]
async fn empty_results_are_not_cached() {
    let handle = spawn_lookup_service(
        common::fixture_engine(),
        memory_cache(),
        None,
        RuntimeConfig::default(),
    );
    assert!(handle.lookup("VK9XABC").await.expect("lookup").is_empty());
    assert_eq!(handle.cache_len().await.expect("len"), Some(0));

    handle.lookup("TJ/W6OP").await.expect("lookup");
    assert_eq!(handle.cache_len().await.expect("len"), Some(1));

    let mut sub = handle.subscribe();
    handle.clear_cache().await.expect("clear");
    assert_eq!(handle.cache_len().await.expect("len"), Some(0));
    assert!(matches!(sub.recv().await.expect("event"), LookupEvent::CacheCleared));
}

#[tokio::test]
async fn no_cache_reports_none() {
    let handle = spawn_lookup_service(common::fixture_engine(), None, None, RuntimeConfig::default());
    assert_eq!(handle.cache_len().await.expect("len"), None);
    handle.clear_cache().await.expect("clear without cache");
}

#[tokio::test]
async fn batch_hits_keep_input_order_and_sequence() {
    let config = RuntimeConfig {
        workers: 3,
        batch_chunk: 1,
        ..RuntimeConfig::default()
    };
    let handle = spawn_lookup_service(common::fixture_engine(), None, None, config);
    let mut sub = handle.subscribe();

    let calls = vec![
        "KG4AA".to_string(),
        "W6 OP".to_string(),
        "TJ/W6OP".to_string(),
        "VK0M/MB5KET".to_string(),
        "W6OP/4".to_string(),
    ];
    let hits = handle.lookup_batch(calls).await.expect("batch");
    let seen: Vec<(u64, &str)> = hits.iter().map(|h| (h.sequence, h.country.as_str())).collect();
    assert_eq!(
        seen,
        vec![
            (0, "Guantanamo Bay"),
            (2, "Cameroon"),
            (3, "Macquarie I."),
            (4, "United States"),
        ]
    );

    match sub.recv().await.expect("event") {
        LookupEvent::BatchCompleted {
            calls,
            hits,
            truncated,
            ..
        } => {
            assert_eq!(calls, 5);
            assert_eq!(hits, 4);
            assert!(!truncated);
        }
        other => panic!("unexpected event {other:?}"),
    }
}

#[tokio::test]
async fn batch_is_capped() {
    let config = RuntimeConfig {
        max_batch_hits: 2,
        ..RuntimeConfig::default()
    };
    let handle = spawn_lookup_service(common::fixture_engine(), None, None, config);
    let mut sub = handle.subscribe();
    let calls = ["W3AA", "W4AA", "W6AA", "KH0AA"].map(String::from).to_vec();
    let hits = handle.lookup_batch(calls).await.expect("batch");
    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0].province, "DE;MD;PA");
    assert!(matches!(
        sub.recv().await.expect("event"),
        LookupEvent::BatchCompleted { truncated: true, hits: 2, .. }
    ));
}

#[tokio::test]
async fn callbook_answers_before_prefix_database() {
    let calls = Arc::new(AtomicUsize::new(0));
    let callbook = Arc::new(CountingCallbook {
        calls: Arc::clone(&calls),
    });
    let handle = spawn_lookup_service(
        common::fixture_engine(),
        None,
        Some(callbook),
        RuntimeConfig::default(),
    );

    let hits = handle.lookup("w6op").await.expect("lookup");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].county, "Santa Clara");
    assert_eq!(hits[0].grid, "CM97");
    assert!(hits[0].lotw);

    let hits = handle.lookup("KG4AA").await.expect("lookup");
    assert_eq!(hits[0].country, "Guantanamo Bay");
    assert_eq!(calls.load(Ordering::SeqCst), 2);

    assert!(handle.lookup("W6 OP").await.expect("lookup").is_empty());
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn callbook_can_be_disabled() {
    let calls = Arc::new(AtomicUsize::new(0));
    let callbook = Arc::new(CountingCallbook {
        calls: Arc::clone(&calls),
    });
    let config = RuntimeConfig {
        use_callbook: false,
        ..RuntimeConfig::default()
    };
    let handle = spawn_lookup_service(common::fixture_engine(), None, Some(callbook), config);
    let hits = handle.lookup("W6OP").await.expect("lookup");
    assert_eq!(hits[0].province, "CA");
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn commands_after_shutdown_fail() {
    let handle = spawn_lookup_service(common::fixture_engine(), None, None, RuntimeConfig::default());
    let other = handle.clone();
    handle.shutdown().await.expect("shutdown");
    assert!(matches!(
        other.lookup("KG4AA").await,
        Err(RuntimeError::ChannelClosed)
    ));
}
