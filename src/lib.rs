pub mod cli;
pub mod error;
pub mod models;
pub mod processors;
pub mod query;
pub mod readers;
pub mod server;
pub mod settings;
pub mod storage;
pub mod utils;

pub use error::{ProcessingError, Result};
