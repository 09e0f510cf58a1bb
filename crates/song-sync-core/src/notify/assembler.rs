use crate::{CoreError, CoreResult, notify::Frame};

/// Receiver-side reassembly of a framed payload.
///
/// The protocol has no retransmission; a lost, repeated or reordered frame
/// makes the whole payload invalid, and this is where that is detected.
#[derive(Debug, Default)]
pub struct FrameAssembler {
    expected_len: Option<usize>,
    next_seq: u32,
    buf: Vec<u8>,
}

impl FrameAssembler {
    /// Create an assembler waiting for a `Begin` frame.
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one frame. Returns the payload once a valid `End` arrives.
    ///
    /// On error the assembler resets and waits for the next `Begin`.
    #[track_caller]
    pub fn push(&mut self, frame: Frame) -> CoreResult<Option<Vec<u8>>> {
        let result = self.apply(frame);
        if result.is_err() {
            *self = Self::default();
        }
        result
    }

    #[track_caller]
    fn apply(&mut self, frame: Frame) -> CoreResult<Option<Vec<u8>>> {
        match frame {
            Frame::Begin { total_len } => {
                *self = Self {
                    expected_len: Some(total_len),
                    next_seq: 0,
                    buf: Vec::with_capacity(total_len),
                };
                Ok(None)
            }
            Frame::Chunk { seq, data } => {
                if self.expected_len.is_none() {
                    return Err(CoreError::invalid_frame(format!(
                        "chunk {} without begin",
                        seq
                    )));
                }
                if seq != self.next_seq {
                    return Err(CoreError::invalid_frame(format!(
                        "expected chunk {}, got {}",
                        self.next_seq, seq
                    )));
                }
                self.buf.extend_from_slice(&data);
                self.next_seq += 1;
                Ok(None)
            }
            Frame::End { chunk_count } => {
                let Some(expected_len) = self.expected_len else {
                    return Err(CoreError::invalid_frame("end without begin"));
                };
                if chunk_count != self.next_seq {
                    return Err(CoreError::invalid_frame(format!(
                        "end announces {} chunks, received {}",
                        chunk_count, self.next_seq
                    )));
                }
                if self.buf.len() != expected_len {
                    return Err(CoreError::invalid_frame(format!(
                        "begin announced {} bytes, received {}",
                        expected_len,
                        self.buf.len()
                    )));
                }
                let payload = std::mem::take(&mut self.buf);
                *self = Self::default();
                Ok(Some(payload))
            }
        }
    }
}
