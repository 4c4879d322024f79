pub mod api;
pub mod app;
pub mod codegen;
pub mod config;
pub mod error;
pub mod models;
pub mod redirect;
pub mod service;
pub mod storage;

pub use error::{LinkError, LinkResult};
