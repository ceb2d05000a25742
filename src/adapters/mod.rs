//! External system integrations for notion-diary.
//!
//! - [`notion`] - Notion data source ([`notion::RecordSource`] and its REST client)
//! - [`store`] - Exported document storage ([`store::ContentStore`])
//!
//! Both seams are traits, so the sync engine can be driven by in-memory
//! implementations in tests.

pub mod notion;
pub mod store;
