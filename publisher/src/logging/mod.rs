pub mod publisher;
pub mod retry;
