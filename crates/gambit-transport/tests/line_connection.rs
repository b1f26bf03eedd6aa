//! Integration tests for the newline-framed transport.
//!
//! An in-memory `tokio::io::duplex` pipe stands in for the TCP socket so
//! both ends of the connection run inside the test.

use std::time::Duration;

use gambit_transport::{Connection, LineConnection, TransportError};
use tokio::io::{AsyncReadExt, AsyncWriteExt};

#[tokio::test]
async fn test_send_writes_frames_verbatim() {
    let (local, mut remote) = tokio::io::duplex(1024);
    let conn = LineConnection::from_stream(local);

    conn.send(b"first\n").await.expect("send should succeed");
    conn.send(b"second\n").await.expect("send should succeed");

    let mut buf = vec![0u8; 13];
    remote.read_exact(&mut buf).await.unwrap();
    assert_eq!(&buf, b"first\nsecond\n");
}

#[tokio::test]
async fn test_recv_yields_frames_in_order() {
    let (local, mut remote) = tokio::io::duplex(1024);
    let conn = LineConnection::from_stream(local);

    remote.write_all(b"a\nbb\nccc\n").await.unwrap();

    for expected in [&b"a"[..], b"bb", b"ccc"] {
        let frame = conn.recv().await.expect("recv").expect("frame");
        assert_eq!(frame, expected);
    }
}

#[tokio::test]
async fn test_recv_returns_none_on_peer_close() {
    let (local, remote) = tokio::io::duplex(64);
    let conn = LineConnection::from_stream(local);

    drop(remote);

    let frame = conn.recv().await.expect("recv should not error");
    assert!(frame.is_none(), "should return None on end of stream");
}

#[tokio::test]
async fn test_close_is_idempotent_and_signals_eof() {
    let (local, mut remote) = tokio::io::duplex(64);
    let conn = LineConnection::from_stream(local);

    conn.close().await.expect("first close");
    conn.close().await.expect("second close is a no-op");
    assert!(conn.is_closed());

    let mut buf = Vec::new();
    let n = tokio::time::timeout(
        Duration::from_secs(1),
        remote.read_to_end(&mut buf),
    )
    .await
    .expect("peer should observe EOF")
    .unwrap();
    assert_eq!(n, 0);
}

#[tokio::test]
async fn test_send_after_close_fails() {
    let (local, _remote) = tokio::io::duplex(64);
    let conn = LineConnection::from_stream(local);

    conn.close().await.unwrap();
    let err = conn.send(b"late\n").await.unwrap_err();
    assert!(matches!(err, TransportError::ConnectionClosed(_)));
}

#[tokio::test]
async fn test_frame_limit_applies_per_connection() {
    let (local, mut remote) = tokio::io::duplex(1024);
    let conn = LineConnection::from_stream(local).with_max_frame_len(8);

    remote.write_all(b"way too long for eight\n").await.unwrap();

    let err = conn.recv().await.unwrap_err();
    assert!(matches!(err, TransportError::FrameTooLarge(8)));
}

#[tokio::test]
async fn test_connection_ids_are_unique() {
    let (a, _ra) = tokio::io::duplex(8);
    let (b, _rb) = tokio::io::duplex(8);
    let a = LineConnection::from_stream(a);
    let b = LineConnection::from_stream(b);
    assert_ne!(a.id(), b.id());
}
