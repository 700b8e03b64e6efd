//! # bucket-clone
//!
//! Discover and clone every repository a Bitbucket account owns.
//!
//! This crate provides:
//! - A client for the Bitbucket Cloud 2.0 API that lists an account's
//!   repositories by following the cursor-paginated listing endpoint
//! - A clone dispatcher that shells out to `git` or `hg` based on the
//!   repository's ssh clone URL
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use bucket_clone::prelude::*;
//! use std::path::Path;
//!
//! let client = BitbucketClient::with_credentials(Credentials::new("reader", "app-password"));
//!
//! for repo in client.list_repositories("acme")? {
//!     let url = repo
//!         .ssh_clone_url()
//!         .ok_or_else(|| Error::MissingSshUrl(repo.full_name.clone()))?;
//!     clone_repository(url, Path::new("./mirror"))?;
//! }
//! # Ok::<(), bucket_clone::error::Error>(())
//! ```
//!
//! Listing is anonymous unless credentials are given; private repositories
//! need them. Cloning always goes through the ssh link, so the invoking
//! user's ssh agent does the authenticating there.

pub mod bitbucket;
pub mod clone;
pub mod error;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::bitbucket::{BitbucketClient, Credentials, Link, Page, RepoOps, Repository};
    pub use crate::clone::{CloneTool, clone_repository};
    pub use crate::error::{Error, Result};
}

pub use prelude::*;
