use keepalive_monitor::services::keepalive::{
    ProbeOutcome, ProbeResult, StatusLog, STATUS_LOG_CAPACITY,
};

#[tokio::test]
async fn test_fourth_insert_evicts_oldest() {
    let log = StatusLog::new();
    for code in [200, 201, 202, 203] {
        log.record(ProbeOutcome::new("http://127.0.0.1:5000/", ProbeResult::Status(code)))
            .await;
    }

    let codes: Vec<_> = log
        .snapshot()
        .await
        .recent
        .into_iter()
        .map(|o| o.result)
        .collect();
    assert_eq!(
        codes,
        vec![ProbeResult::Status(203), ProbeResult::Status(202), ProbeResult::Status(201)]
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_writers_never_tear_snapshots() {
    let log = StatusLog::new();
    let mut writers = Vec::new();

    for writer in 0..2u16 {
        let log = log.clone();
        writers.push(tokio::spawn(async move {
            for i in 0..500u16 {
                let target = format!("http://writer-{}.local/", writer);
                log.record(ProbeOutcome::new(target, ProbeResult::Status(writer * 1000 + i)))
                    .await;
            }
        }));
    }

    let reader = {
        let log = log.clone();
        tokio::spawn(async move {
            for _ in 0..500 {
                let snapshot = log.snapshot().await;
                assert!(snapshot.recent.len() <= STATUS_LOG_CAPACITY);
                if let Some(first) = snapshot.recent.first() {
                    assert_eq!(snapshot.last_status.as_ref(), Some(&first.result));
                    assert_eq!(snapshot.last_ping, Some(first.timestamp));
                }
                for outcome in &snapshot.recent {
                    // Target and code always come from the same writer.
                    let ProbeResult::Status(code) = outcome.result else {
                        panic!("unexpected failure outcome");
                    };
                    assert_eq!(outcome.target, format!("http://writer-{}.local/", code / 1000));
                }
                tokio::task::yield_now().await;
            }
        })
    };

    for writer in writers {
        writer.await.unwrap();
    }
    reader.await.unwrap();

    assert_eq!(log.snapshot().await.recent.len(), STATUS_LOG_CAPACITY);
}
