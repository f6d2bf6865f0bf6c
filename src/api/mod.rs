//! API Module
//!
//! Chat completion wire types and streaming support.

pub mod completion;
pub mod streaming;

pub use completion::{
    ApiError, ChatMessage, ChatRequest, ChatResponse, Choice, ErrorEnvelope, ResponseMessage, Role,
};
pub use streaming::{
    parse_sse_line, SseLine, StreamAccumulator, StreamChoice, StreamChunk, StreamDelta,
};
