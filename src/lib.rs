pub mod analysis;
pub mod api;
pub mod clock;
pub mod config;
pub mod error;
pub mod export;
pub mod governor;
pub mod models;
pub mod provider;
pub mod service;
pub mod storage;
pub mod stores;

pub use error::{KeywordError, KeywordResult};
pub use service::{KeywordService, ServiceSettings};
