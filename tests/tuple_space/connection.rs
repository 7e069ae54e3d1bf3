use std::sync::Arc;

use tokio::io::{duplex, AsyncWriteExt};
use tuple_space::{
    connection::handle_client_connection,
    frame::Frame,
    input::{read_frame, write_frame},
    statistics::{Statistics, StatisticsSnapshot},
    tuple_space::TupleSpace,
};

use crate::test_utils::{TestServer, TestUtils};

#[tokio::test]
async fn test_end_to_end_scenario() {
    let server = TestServer::start().await;
    let mut client = server.connect().await;

    TestUtils::send_request_and_expect(&mut client, "PUT a 1", "OK (a, 1) added").await;
    assert_eq!(server.space.read("a").await, Some("1".to_string()));

    TestUtils::send_request_and_expect(&mut client, "PUT a 2", "ERR a already exists").await;
    assert_eq!(server.space.read("a").await, Some("1".to_string()));

    TestUtils::send_request_and_expect(&mut client, "READ a", "OK (a, 1) read").await;
    assert_eq!(server.space.len().await, 1);

    TestUtils::send_request_and_expect(&mut client, "GET a", "OK (a, 1) removed").await;
    assert!(server.space.is_empty().await);

    TestUtils::send_request_and_expect(&mut client, "GET a", "ERR a does not exist").await;

    TestUtils::send_request_and_expect(&mut client, "FOO a", "ERR invalid command").await;
    assert_eq!(server.statistics.snapshot().errors, 3);

    // A bad command does not close the connection
    TestUtils::send_request_and_expect(&mut client, "PUT b two words", "OK (b, two words) added")
        .await;

    assert_eq!(
        server.statistics.snapshot(),
        StatisticsSnapshot {
            clients: 1,
            operations: 7,
            reads: 1,
            gets: 2,
            puts: 3,
            errors: 3,
        }
    );
}

#[tokio::test]
async fn test_read_is_non_destructive() {
    let server = TestServer::start().await;
    let mut client = server.connect().await;

    TestUtils::send_request_and_expect(&mut client, "PUT colour blue", "OK (colour, blue) added")
        .await;

    for _ in 0..5 {
        TestUtils::send_request_and_expect(&mut client, "READ colour", "OK (colour, blue) read")
            .await;
    }

    assert_eq!(server.space.len().await, 1);
}

#[tokio::test]
async fn test_payload_whitespace_is_trimmed() {
    let server = TestServer::start().await;
    let mut client = server.connect().await;

    TestUtils::send_request_and_expect(&mut client, "  PUT a 1 \r\n", "OK (a, 1) added").await;
    TestUtils::send_request_and_expect(&mut client, "READ a\n", "OK (a, 1) read").await;
}

#[tokio::test]
async fn test_partial_frame_is_treated_as_closed_connection() {
    let server = TestServer::start().await;
    let mut client = server.connect().await;

    // Declares 15 bytes but only sends 8 before closing the write side
    client.write_all(b"015PUT a").await.unwrap();
    client.shutdown().await.unwrap();

    TestUtils::expect_closed(&mut client).await;

    assert!(server.space.is_empty().await);
    let snapshot = server.statistics.snapshot();
    assert_eq!(snapshot.operations, 0);
    assert_eq!(snapshot.errors, 0);
}

#[tokio::test]
async fn test_invalid_header_closes_only_that_connection() {
    let server = TestServer::start().await;
    let mut healthy = server.connect().await;
    let mut broken = server.connect().await;

    TestUtils::send_request_and_expect(&mut healthy, "PUT a 1", "OK (a, 1) added").await;

    broken.write_all(b"xyzREAD a").await.unwrap();
    TestUtils::expect_closed(&mut broken).await;

    TestUtils::send_request_and_expect(&mut healthy, "READ a", "OK (a, 1) read").await;
    assert_eq!(server.statistics.snapshot().errors, 0);
}

#[tokio::test]
async fn test_requests_split_across_writes() {
    let server = TestServer::start().await;
    let mut client = server.connect().await;

    let encoded = Frame::new("PUT split value").encode().unwrap();

    for chunk in encoded.chunks(4) {
        client.write_all(chunk).await.unwrap();
        client.flush().await.unwrap();
        TestUtils::sleep_ms(5).await;
    }

    let reply = read_frame(&mut client).await.unwrap();
    assert_eq!(reply.text(), Ok("OK (split, value) added"));
}

#[tokio::test]
async fn test_handle_client_connection_over_in_memory_stream() {
    let space = Arc::new(TupleSpace::new());
    let statistics = Arc::new(Statistics::new());
    let (mut client, server_side) = duplex(4096);

    let handler = tokio::spawn(handle_client_connection(
        server_side,
        "in-memory".to_string(),
        Arc::clone(&space),
        Arc::clone(&statistics),
    ));

    write_frame(&mut client, &Frame::new("PUT k v")).await.unwrap();
    write_frame(&mut client, &Frame::new("GET k")).await.unwrap();

    assert_eq!(
        read_frame(&mut client).await.unwrap().text(),
        Ok("OK (k, v) added")
    );
    assert_eq!(
        read_frame(&mut client).await.unwrap().text(),
        Ok("OK (k, v) removed")
    );

    drop(client);
    handler.await.unwrap();

    assert!(space.is_empty().await);
    assert_eq!(statistics.snapshot().operations, 2);
}

#[tokio::test]
async fn test_put_at_frame_limit_is_rejected_without_inserting() {
    let server = TestServer::start().await;
    let mut client = server.connect().await;

    // A full 996-byte request whose "added" reply would need 1004 bytes
    let request = format!("PUT {} {}", "k".repeat(10), "v".repeat(981));
    assert_eq!(request.len(), 996);

    TestUtils::send_request_and_expect(&mut client, &request, "ERR reply too large").await;
    assert!(server.space.is_empty().await);

    // The connection stays usable
    TestUtils::send_request_and_expect(&mut client, "PUT a 1", "OK (a, 1) added").await;

    let snapshot = server.statistics.snapshot();
    assert_eq!(snapshot.puts, 2);
    assert_eq!(snapshot.errors, 1);
}

#[tokio::test]
async fn test_get_near_frame_limit_keeps_the_tuple() {
    let server = TestServer::start().await;
    let mut client = server.connect().await;

    // key + value = 982: "added" and "read" replies fit, "removed" needs 997 bytes
    let key = "k".repeat(10);
    let value = "v".repeat(972);

    TestUtils::send_request_and_expect(
        &mut client,
        &format!("PUT {} {}", key, value),
        &format!("OK ({}, {}) added", key, value),
    )
    .await;
    TestUtils::send_request_and_expect(
        &mut client,
        &format!("READ {}", key),
        &format!("OK ({}, {}) read", key, value),
    )
    .await;
    TestUtils::send_request_and_expect(
        &mut client,
        &format!("GET {}", key),
        "ERR reply too large",
    )
    .await;

    assert_eq!(server.space.read(&key).await, Some(value.clone()));

    // The refused tuple is still there for the next reader
    TestUtils::send_request_and_expect(
        &mut client,
        &format!("READ {}", key),
        &format!("OK ({}, {}) read", key, value),
    )
    .await;
}

#[tokio::test]
async fn test_error_reply_for_oversized_key_fits_in_a_frame() {
    let server = TestServer::start().await;
    let mut client = server.connect().await;

    let request = format!("READ {}", "k".repeat(991));

    TestUtils::send_request_and_expect(&mut client, &request, "ERR reply too large").await;
    TestUtils::send_request_and_expect(&mut client, "READ a", "ERR a does not exist").await;
}

#[tokio::test]
async fn test_invalid_utf8_payload_closes_only_that_connection() {
    let server = TestServer::start().await;
    let mut healthy = server.connect().await;
    let mut broken = server.connect().await;

    TestUtils::send_request_and_expect(&mut healthy, "PUT a 1", "OK (a, 1) added").await;

    // Well formed header, payload is not UTF-8
    broken.write_all(b"008GET\xff\xfe").await.unwrap();
    TestUtils::expect_closed(&mut broken).await;

    TestUtils::send_request_and_expect(&mut healthy, "GET a", "OK (a, 1) removed").await;

    let snapshot = server.statistics.snapshot();
    assert_eq!(snapshot.clients, 2);
    assert_eq!(snapshot.operations, 2);
    assert_eq!(snapshot.errors, 0);
}
