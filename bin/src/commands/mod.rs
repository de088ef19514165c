//! CLI command implementations.

pub(crate) mod auth_url;
pub(crate) mod call;
pub(crate) mod regions;
pub(crate) mod sync;
pub(crate) mod token;
