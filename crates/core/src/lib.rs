//! Provider-agnostic pieces of the chat pipeline: the prompt/response model,
//! the client seam, and the text pipeline that turns a raw reply into display
//! segments.

pub mod content;
pub mod llm;
