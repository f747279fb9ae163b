//! NVC Command and Query Handlers
//!
//! ## Commands
//! - `ProcessMessage` - Classify the latest message, advance the stage, reply
//!
//! ## Queries
//! - `SummarizeConversation` - Extract the NVC statement from a history

mod process_message;
mod summarize_conversation;

pub use process_message::{
    ProcessMessageCommand, ProcessMessageError, ProcessMessageHandler, ProcessMessageResult,
    ProcessMessageSettings, ReplySource,
};
pub use summarize_conversation::{
    SummarizeConversationError, SummarizeConversationHandler, SummarizeConversationQuery,
    SummarizeConversationResult,
};
