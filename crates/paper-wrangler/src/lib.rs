//! Paper Wrangler
//!
//! Data-wrangling utilities for running a literature study over a
//! conference's accepted papers.
//!
//! # Features
//!
//! - **Bibliography conversion**: BibTeX to CSV, optionally flagging
//!   artifact-evaluation badges from per-category bibliographies
//! - **Reviewer assignment**: even, positional split of selected papers
//! - **Affiliations**: per-author affiliations from Crossref, keyed by DOI
//! - **Countries**: country inference for affiliations via a local model
//! - **Scraping**: title/author extraction from a conference program table
//!
//! # Example
//!
//! ```no_run
//! use paper_wrangler::{client::WranglerClient, config::Config, tools};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env()?;
//!     let client = WranglerClient::new(&config)?;
//!
//!     let summary = tools::fetch_affiliations(
//!         &client,
//!         "assigned.csv".as_ref(),
//!         "affiliations.csv".as_ref(),
//!     )
//!     .await?;
//!     println!("{} author rows", summary.rows);
//!     Ok(())
//! }
//! ```

pub mod artifacts;
pub mod bibtex;
pub mod client;
pub mod config;
pub mod error;
pub mod formatters;
pub mod models;
pub mod tools;

pub use client::WranglerClient;
pub use config::Config;
pub use error::{ClientError, ToolError};
