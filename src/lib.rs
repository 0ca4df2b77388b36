pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod services;
pub mod view;

pub use config::Config;
pub use error::{SyncError, SyncResult};
pub use services::{
    ChatApi, ConversationStore, DisplayUnit, HttpChatApi, MessageRenderer, SubmitOutcome,
    SyncController,
};
pub use view::{TranscriptView, ViewEvent};
