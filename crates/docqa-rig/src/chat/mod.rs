//! Question answering on top of the RAG service.

mod input;
mod service;

pub use input::ChatInput;
pub use service::{Answer, ChatService};
