mod assembler;
mod frame;

pub use {
    assembler::FrameAssembler,
    frame::{DEFAULT_CHUNK_SIZE, Frame, encode_frames},
};
