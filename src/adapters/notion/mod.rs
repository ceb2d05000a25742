//! Notion data source integration
//!
//! - [`source`] - the [`RecordSource`] trait the sync engine depends on
//! - [`client`] - [`NotionClient`], the REST implementation
//! - [`models`] - wire request and response structures
//! - [`blocks`] - page body rendering

pub mod blocks;
pub mod client;
pub mod models;
pub mod source;

pub use client::NotionClient;
pub use source::{RecordPage, RecordSource};
