//! HTTP request handlers, one module per resource.

pub mod analytics;
pub mod attachment;
pub mod auth;
pub mod budget;
pub mod comment;
pub mod export;
pub mod project;
pub mod resource;
pub mod search;
pub mod timeline;
