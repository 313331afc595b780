//! Conversation tracking: turns, per-session history, and the session store.

pub mod history;
pub mod session;
pub mod turn;

pub use history::{ConversationHistory, DEFAULT_MAX_TURNS};
pub use session::{Session, SessionHandle, SessionStore, spawn_prune_task};
pub use turn::Turn;
