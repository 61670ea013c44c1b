#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

pub mod chat;
mod error;
#[cfg(any(test, feature = "test-utils"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-utils")))]
pub mod mock;
pub mod provider;
pub mod rag;

pub use error::{Error, Result};

/// Tracing target for the main library.
pub const TRACING_TARGET: &str = "docqa_rig";

/// Tracing target for ingestion progress.
pub const TRACING_TARGET_INGEST: &str = "docqa_rig::ingest";
