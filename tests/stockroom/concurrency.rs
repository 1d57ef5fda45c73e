//! Concurrent writers over one document
//!
//! Independent `Stockroom` instances over the same path share the per-path
//! lock, so interleaved creates never lose an update or hand out an id twice.

use crate::common::*;
use std::collections::HashSet;
use std::sync::mpsc;
use std::sync::{Arc, Barrier};
use std::thread;
use stockroom::Outcome;

#[test]
fn concurrent_creates_get_distinct_ids() {
    let test = TestStockroom::new();
    const THREADS: usize = 8;
    const PER_THREAD: usize = 10;
    let barrier = Arc::new(Barrier::new(THREADS));

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let stockroom = test.reopen();
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                let cancel = CancellationToken::new();
                barrier.wait();
                (0..PER_THREAD)
                    .map(|i| {
                        stockroom
                            .categories()
                            .create(
                                NewCategory {
                                    name: format!("t{}-{}", t, i),
                                    description: String::new(),
                                },
                                &cancel,
                            )
                            .unwrap()
                            .id
                    })
                    .collect::<Vec<i64>>()
            })
        })
        .collect();

    let mut seen = HashSet::new();
    for handle in handles {
        for id in handle.join().unwrap() {
            assert!(seen.insert(id), "id {} handed out twice", id);
        }
    }

    let stored: Vec<i64> = test
        .stockroom
        .categories()
        .get_all()
        .unwrap()
        .iter()
        .map(|c| c.id)
        .collect();
    let expected: Vec<i64> = (1..=(THREADS * PER_THREAD) as i64).collect();
    let mut sorted = stored.clone();
    sorted.sort_unstable();
    assert_eq!(sorted, expected);
    assert_eq!(seen.len(), THREADS * PER_THREAD);
}

#[test]
fn readers_run_alongside_writers() {
    let test = TestStockroom::new();
    test.category("Seed");
    let barrier = Arc::new(Barrier::new(4));

    let writers: Vec<_> = (0..2)
        .map(|_| {
            let stockroom = test.reopen();
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                let cancel = CancellationToken::new();
                barrier.wait();
                for i in 0..10 {
                    stockroom
                        .products()
                        .create(
                            NewProduct {
                                name: format!("p{}", i),
                                description: String::new(),
                                price: 1.0,
                                quantity: i,
                                category_id: 1,
                            },
                            &cancel,
                        )
                        .unwrap();
                }
            })
        })
        .collect();

    let readers: Vec<_> = (0..2)
        .map(|_| {
            let stockroom = test.reopen();
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                for _ in 0..10 {
                    // every snapshot is a complete document
                    let products = stockroom.products().get_all().unwrap();
                    assert!(products.len() <= 20);
                }
            })
        })
        .collect();

    for handle in writers.into_iter().chain(readers) {
        handle.join().unwrap();
    }
    assert_eq!(test.stockroom.products().get_all().unwrap().len(), 20);
}

#[test]
fn blocked_writer_times_out() {
    let test = TestStockroom::new();
    let impatient = Stockroom::open(impatient_config(&test.path())).unwrap();

    let (held_tx, held_rx) = mpsc::channel();
    let (release_tx, release_rx) = mpsc::channel::<()>();
    let holder = {
        let store = Arc::clone(test.stockroom.store());
        thread::spawn(move || {
            store
                .mutate(&CancellationToken::new(), |_| {
                    held_tx.send(()).unwrap();
                    release_rx.recv().unwrap();
                    Ok(Outcome::Skip(()))
                })
                .unwrap();
        })
    };

    held_rx.recv().unwrap();
    let err = impatient
        .categories()
        .create(
            NewCategory {
                name: "Late".into(),
                description: String::new(),
            },
            &CancellationToken::new(),
        )
        .unwrap_err();
    assert!(matches!(err, StoreError::StorageUnavailable { .. }), "{:?}", err);

    release_tx.send(()).unwrap();
    holder.join().unwrap();

    // lock released, the same call now succeeds
    let created = impatient
        .categories()
        .create(
            NewCategory {
                name: "Late".into(),
                description: String::new(),
            },
            &CancellationToken::new(),
        )
        .unwrap();
    assert_eq!(created.id, 1);
}
