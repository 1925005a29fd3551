pub mod document;
pub mod export;
pub mod handlers;
pub mod render;
pub mod store;
