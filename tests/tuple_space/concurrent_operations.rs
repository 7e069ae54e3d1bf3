use std::collections::HashSet;

use crate::test_utils::{TestServer, TestUtils};

const RACERS: usize = 16;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_puts_on_same_key_have_one_winner() {
    let server = TestServer::start().await;
    let mut tasks = vec![];

    for i in 0..RACERS {
        let mut client = server.connect().await;

        tasks.push(tokio::spawn(async move {
            let value = format!("v{}", i);
            let reply = TestUtils::send_request(&mut client, &format!("PUT race {}", value)).await;
            (value, reply)
        }));
    }

    let mut winners = vec![];

    for task in tasks {
        let (value, reply) = task.await.unwrap();

        if reply == format!("OK (race, {}) added", value) {
            winners.push(value);
        } else {
            assert_eq!(reply, "ERR race already exists");
        }
    }

    assert_eq!(winners.len(), 1, "exactly one PUT should succeed");
    assert_eq!(server.space.read("race").await, Some(winners[0].clone()));
    assert_eq!(server.space.len().await, 1);
    assert_eq!(server.statistics.snapshot().errors, (RACERS - 1) as u64);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_gets_on_same_key_deliver_once() {
    let server = TestServer::start().await;
    let mut setup = server.connect().await;
    TestUtils::send_request_and_expect(&mut setup, "PUT prize gold", "OK (prize, gold) added")
        .await;

    let mut tasks = vec![];

    for _ in 0..RACERS {
        let mut client = server.connect().await;

        tasks.push(tokio::spawn(async move {
            TestUtils::send_request(&mut client, "GET prize").await
        }));
    }

    let mut replies = vec![];
    for task in tasks {
        replies.push(task.await.unwrap());
    }

    let removed = replies
        .iter()
        .filter(|reply| *reply == "OK (prize, gold) removed")
        .count();
    let missing = replies
        .iter()
        .filter(|reply| *reply == "ERR prize does not exist")
        .count();

    assert_eq!(removed, 1, "exactly one GET should receive the tuple");
    assert_eq!(missing, RACERS - 1);

    TestUtils::send_request_and_expect(&mut setup, "READ prize", "ERR prize does not exist").await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_clients_on_distinct_keys() {
    let server = TestServer::start().await;
    let mut tasks = vec![];

    for i in 0..RACERS {
        let mut client = server.connect().await;

        tasks.push(tokio::spawn(async move {
            let key = format!("key{}", i);

            TestUtils::send_request_and_expect(
                &mut client,
                &format!("PUT {} {}", key, i),
                &format!("OK ({}, {}) added", key, i),
            )
            .await;
            TestUtils::send_request_and_expect(
                &mut client,
                &format!("READ {}", key),
                &format!("OK ({}, {}) read", key, i),
            )
            .await;

            key
        }));
    }

    let mut keys = HashSet::new();
    for task in tasks {
        keys.insert(task.await.unwrap());
    }

    assert_eq!(keys.len(), RACERS);
    assert_eq!(server.space.len().await, RACERS);

    let snapshot = server.statistics.snapshot();
    assert_eq!(snapshot.puts, RACERS as u64);
    assert_eq!(snapshot.reads, RACERS as u64);
    assert_eq!(snapshot.errors, 0);
}
