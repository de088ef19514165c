//! Signed API client and paginated fetching for lazsync.
//!
//! This crate provides the request and pagination pipeline:
//!
//! - [`Signer`] - HMAC-SHA256 request signing
//! - [`ApiClient`] - Signed GET/POST calls with single-use parameters
//! - [`discover_total`] / [`plan_pages`] - Total count probe and page planning
//! - [`WorkerPool`] - Fixed-size page fan-out with per-page outcomes
//! - [`page_stream`] - Streaming page fan-out
//! - [`harvest`] - Discover, plan and fan out in one call
//! - [`url::authorize_url`] / [`exchange_code`] - Seller authorization

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/lazsync/lazsync/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod client;
mod harvest;
mod pager;
mod pool;
mod request;
mod sign;
mod stream;
mod token;
pub mod url;

pub use client::{ApiClient, ApiError, ClientConfig};
pub use harvest::{
    DEFAULT_PAGE_SIZE, EmptyCountPolicy, Harvest, HarvestConfig, harvest,
};
pub use pager::{TotalCount, count_at_path, discover_total, plan_pages};
pub use pool::{
    CollectionFetcher, DEFAULT_WORKERS, FailurePolicy, PageFailure, PageFetcher, PageOutcome,
    PagePayload, PoolReport, WorkerPool,
};
pub use request::{ApiMethod, FileParams, MethodParseError, Params, RequestContext, SignedRequest};
pub use sign::{SIGN_METHOD, Signer, signing_string};
pub use stream::page_stream;
pub use token::{TOKEN_CREATE_PATH, TokenGrant, exchange_code};
