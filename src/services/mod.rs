pub mod providers;
pub mod recommendation_parser;
pub mod renderer;
pub mod store;
pub mod sync;

pub use providers::{ChatApi, HttpChatApi};
pub use recommendation_parser::{ParseOutcome, RecommendationParser};
pub use renderer::{DisplayUnit, MessageRenderer};
pub use store::ConversationStore;
pub use sync::{SubmitOutcome, SyncController, SyncState};
