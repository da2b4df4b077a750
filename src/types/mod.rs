// Public modules
pub mod chat_request;
pub mod chat_response;
pub mod session_id;

// Re-exports
pub use chat_request::ChatRequest;
pub use chat_response::ChatResponse;
pub use session_id::SessionId;
