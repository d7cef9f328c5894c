pub mod access;
pub mod defaults;
pub mod handlers;
pub mod pg_store;
pub mod preview;
pub mod response;
pub mod service;
pub mod store;
pub mod validation;
