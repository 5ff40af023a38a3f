use thiserror::Error;

/// Errors raised while encoding or decoding a frame
#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("Unknown message tag {tag}")]
    UnknownTag { tag: u16 },

    #[error("Frame is {len} bytes, expected {expected}")]
    FrameLength { len: usize, expected: usize },

    #[error("Payload of {size} bytes does not fit in a frame (max {max})")]
    PayloadTooLarge { size: usize, max: usize },

    #[error("Payload codec error: {0}")]
    Codec(#[from] bincode::Error),
}

pub type ProtocolResult<T> = Result<T, ProtocolError>;
