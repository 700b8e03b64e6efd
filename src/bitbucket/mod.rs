//! Bitbucket Cloud API integration for repository discovery.
//!
//! This module provides a client for the Bitbucket 2.0 REST API to list
//! every repository an account owns, following the server-supplied `next`
//! cursor until the listing is exhausted.
//!
//! # Example
//!
//! ```rust,no_run
//! use bucket_clone::bitbucket::{BitbucketClient, Credentials, RepoOps};
//!
//! let client = BitbucketClient::with_credentials(Credentials::new("reader", "app-password"));
//!
//! for repo in client.list_repositories("my-team")? {
//!     println!("{}: {:?}", repo.full_name, repo.ssh_clone_url());
//! }
//! # Ok::<(), bucket_clone::error::Error>(())
//! ```

mod client;
mod repos;

pub use client::{BitbucketClient, Credentials};
pub use repos::{Link, Page, RepoOps, Repository};
