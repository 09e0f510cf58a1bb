use crate::LineAccumulator;

/// WHAT: Bytes split across reads are joined into lines at CR or LF
/// WHY: Serial delivers a stream, not discrete frames
#[test]
fn given_split_stream_when_feeding_then_lines_complete_on_terminator() {
    // Given: An accumulator
    let mut acc = LineAccumulator::<256>::new();

    // When: Feeding a command split over two reads, then a CRLF pair
    let first = acc.feed(b"m uri=x;ti");
    let second = acc.feed(b"tle=Song\r\np1\n");

    // Then: Lines complete only at terminators and the empty CRLF gap is skipped
    assert!(first.is_empty());
    assert_eq!(
        second,
        vec![b"m uri=x;title=Song".to_vec(), b"p1".to_vec()]
    );
    assert!(acc.pending().is_empty());
}

/// WHAT: An unterminated flood is dispatched at capacity minus one
/// WHY: Overflowing input is forced out, never silently discarded
#[test]
fn given_unterminated_flood_when_feeding_then_forced_dispatch() {
    // Given: A small accumulator
    let mut acc = LineAccumulator::<8>::new();

    // When: Feeding ten bytes without a terminator, then a newline
    let forced = acc.feed(b"abcdefghij");
    let rest = acc.feed(b"\n");

    // Then: The first seven bytes were forced out, the remainder completes later
    assert_eq!(forced, vec![b"abcdefg".to_vec()]);
    assert_eq!(rest, vec![b"hij".to_vec()]);
}
