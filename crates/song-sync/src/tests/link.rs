use crate::NotifyHub;

use std::{
    num::NonZeroUsize,
    time::{Duration, Instant},
};

use song_sync_core::{Frame, FrameAssembler};

fn hub(chunk_size: usize) -> NotifyHub {
    NotifyHub::new(
        NonZeroUsize::new(chunk_size).unwrap_or(song_sync_core::DEFAULT_CHUNK_SIZE),
        Duration::ZERO,
    )
}

/// WHAT: A hub with no clients reports unsubscribed and refuses to send
/// WHY: Export falls back to the debug channel in that case
#[tokio::test]
async fn given_no_client_when_sending_then_unsubscribed_and_error() {
    let hub = hub(16);

    assert!(!hub.is_subscribed());
    assert!(hub.send_chunked(b"<Project/>").await.is_err());
}

/// WHAT: A subscribed client receives begin, chunks and end in order
/// WHY: The receiver reassembles by sequence number and declared length
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_client_when_sending_then_frames_in_order() {
    // Given: A subscribed client
    let hub = hub(4);
    let mut rx = hub.subscribe();
    assert!(hub.is_subscribed());

    // When: Sending ten bytes in four-byte chunks
    let sent = hub.send_chunked(b"0123456789").await.unwrap();

    // Then: Begin, three chunks, end
    assert_eq!(sent, 5);
    let frames: Vec<Frame> = (0..sent)
        .map(|_| Frame::parse(&rx.try_recv().unwrap()).unwrap())
        .collect();
    assert_eq!(frames[0], Frame::Begin { total_len: 10 });
    assert_eq!(
        frames[3],
        Frame::Chunk {
            seq: 2,
            data: b"89".to_vec()
        }
    );
    assert_eq!(frames[4], Frame::End { chunk_count: 3 });

    let mut assembler = FrameAssembler::new();
    let mut payload = None;
    for frame in frames {
        payload = assembler.push(frame).unwrap().or(payload);
    }
    assert_eq!(payload.unwrap(), b"0123456789".to_vec());
}

/// WHAT: Pacing delays frames without changing them
/// WHY: Paced delivery keeps the link from dropping notifications
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_pacing_when_sending_then_frames_spaced() {
    // Given: Twenty milliseconds between frames
    let hub = NotifyHub::new(
        NonZeroUsize::new(2).unwrap_or(song_sync_core::DEFAULT_CHUNK_SIZE),
        Duration::from_millis(20),
    );
    let mut rx = hub.subscribe();
    let started = Instant::now();

    // When: Sending four frames
    let sent = hub.send_chunked(b"abcd").await.unwrap();

    // Then: Three gaps of pacing elapsed
    assert_eq!(sent, 4);
    assert!(started.elapsed() >= Duration::from_millis(60));
    assert!(matches!(
        Frame::parse(&rx.try_recv().unwrap()).unwrap(),
        Frame::Begin { total_len: 4 }
    ));
}
