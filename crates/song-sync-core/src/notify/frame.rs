use crate::{CoreError, CoreResult, protocol::parse_u32_lenient};

use std::{iter, num::NonZeroUsize};

/// Payload bytes per chunk frame, sized to stay under the link MTU with headers.
pub const DEFAULT_CHUNK_SIZE: NonZeroUsize = match NonZeroUsize::new(140) {
    Some(size) => size,
    None => NonZeroUsize::MIN,
};

const BEGIN_TAG: &str = "XML_BEGIN";
const CHUNK_TAG: &str = "XML_CHUNK";
const END_TAG: &str = "XML_END";

/// One notification on the size-limited channel.
///
/// Wire format, ASCII header then raw bytes:
///
/// ```text
/// XML_BEGIN <total_len>
/// XML_CHUNK <seq> <payload bytes>
/// XML_END <chunk_count>
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    /// Announces a payload of `total_len` bytes.
    Begin {
        /// Payload length in bytes.
        total_len: usize,
    },
    /// One slice of the payload.
    Chunk {
        /// Zero-based sequence number.
        seq: u32,
        /// Payload bytes, at most the chunk size.
        data: Vec<u8>,
    },
    /// Closes the payload.
    End {
        /// Number of chunk frames sent.
        chunk_count: u32,
    },
}

impl Frame {
    /// Encode for the wire.
    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            Frame::Begin { total_len } => format!("{} {}", BEGIN_TAG, total_len).into_bytes(),
            Frame::Chunk { seq, data } => {
                let mut bytes = format!("{} {} ", CHUNK_TAG, seq).into_bytes();
                bytes.extend_from_slice(data);
                bytes
            }
            Frame::End { chunk_count } => format!("{} {}", END_TAG, chunk_count).into_bytes(),
        }
    }

    /// Decode a frame received from the wire.
    #[track_caller]
    pub fn parse(bytes: &[u8]) -> CoreResult<Frame> {
        let (tag, rest) = split_word(bytes);

        match tag {
            b"XML_BEGIN" => Ok(Frame::Begin {
                total_len: header_number(rest, BEGIN_TAG)? as usize,
            }),
            b"XML_CHUNK" => {
                let (seq, data) = split_word(rest);
                Ok(Frame::Chunk {
                    seq: header_number(seq, CHUNK_TAG)?,
                    data: data.to_vec(),
                })
            }
            b"XML_END" => Ok(Frame::End {
                chunk_count: header_number(rest, END_TAG)?,
            }),
            _ => Err(CoreError::invalid_frame(format!(
                "unknown frame tag {:?}",
                String::from_utf8_lossy(tag)
            ))),
        }
    }
}

/// Split `payload` into a `Begin`, `ceil(len / chunk_size)` chunks and an `End`.
///
/// Chunks cover the payload exactly once, in order.
pub fn encode_frames(payload: &[u8], chunk_size: NonZeroUsize) -> impl Iterator<Item = Frame> + '_ {
    let chunk_count = payload.len().div_ceil(chunk_size.get());

    iter::once(Frame::Begin {
        total_len: payload.len(),
    })
    .chain(
        payload
            .chunks(chunk_size.get())
            .zip(0u32..)
            .map(|(data, seq)| Frame::Chunk {
                seq,
                data: data.to_vec(),
            }),
    )
    .chain(iter::once(Frame::End {
        chunk_count: chunk_count as u32,
    }))
}

fn split_word(bytes: &[u8]) -> (&[u8], &[u8]) {
    match bytes.iter().position(|&b| b == b' ') {
        Some(i) => (&bytes[..i], &bytes[i + 1..]),
        None => (bytes, &bytes[bytes.len()..]),
    }
}

#[track_caller]
fn header_number(field: &[u8], tag: &str) -> CoreResult<u32> {
    if field.is_empty() || !field.iter().all(u8::is_ascii_digit) {
        return Err(CoreError::invalid_frame(format!(
            "{} header is not a number: {:?}",
            tag,
            String::from_utf8_lossy(field)
        )));
    }
    let digits = std::str::from_utf8(field).unwrap_or_default();
    Ok(parse_u32_lenient(digits))
}
