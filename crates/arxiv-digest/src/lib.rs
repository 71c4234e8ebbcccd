//! arXiv Digest view layer
//!
//! Client-side view-state synchronization for the arXiv digest paper browser.
//! Renders paper listings, drives the AI summary panel on each card, toggles
//! bookmarks and hands subscription checkout off to the payment processor.
//!
//! # Features
//!
//! - **Typed gateway**: every backend call returns a `GatewayError` taxonomy
//! - **Escaped rendering**: pure, deterministic card templates
//! - **Stale-safe**: list refreshes are last-request-wins, card fetches are
//!   guarded against duplicates
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use arxiv_digest::{App, Config};
//! use arxiv_digest::collab::{NoopCheckout, NoopLoginPrompt, NullSurface};
//! use arxiv_digest::store::MemoryStore;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env()?;
//!     let app = App::builder(config)
//!         .store(Arc::new(MemoryStore::new()))
//!         .login_prompt(Arc::new(NoopLoginPrompt))
//!         .checkout(Arc::new(NoopCheckout))
//!         .surface(Arc::new(NullSurface))
//!         .build()?;
//!
//!     app.start().await;
//!     println!("{}", app.render_page().await);
//!     Ok(())
//! }
//! ```

pub mod app;
pub mod collab;
pub mod config;
pub mod error;
pub mod gateway;
pub mod models;
pub mod render;
pub mod store;
pub mod view;

pub use app::{App, UiEvent};
pub use config::Config;
pub use error::{GatewayError, ViewError};
pub use gateway::FetchGateway;
