//! Core types for the lazsync partner API client.
//!
//! This crate provides the fundamental data structures used throughout lazsync:
//!
//! - [`Credentials`] - App key, app secret and home region
//! - [`Region`] - Region code with its REST gateway
//! - [`Envelope`] - Response envelope with a deferred `data` payload
//! - [`PageTask`] / [`PagePlan`] - Offset/limit page planning
//! - [`Collection`] - Paginated resource collections (orders, products)
//! - [`OrderRecord`] / [`ProductRecord`] - Normalized records

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/lazsync/lazsync/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod collection;
mod credentials;
mod envelope;
mod error;
mod page;
mod record;
mod region;

pub use collection::{Collection, CollectionParseError};
pub use credentials::Credentials;
pub use envelope::{Envelope, SuccessCodes};
pub use error::{ApplicationError, ConfigError, LazsyncError, PagePlanError, Result};
pub use page::{PagePlan, PageTask, plan_pages};
pub use record::{OrderRecord, ProductRecord, Records};
pub use region::Region;
