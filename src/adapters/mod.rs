// Adapters layer: concrete implementations for external systems
// (filesystem storage, calendar outbox).

pub mod outbox;
pub mod storage;

pub use outbox::JsonOutbox;
pub use storage::LocalStorage;
