//! org-console - Administrative Console Core
//!
//! Console-side plumbing around the hierarchy reorganization engine:
//! configuration, the REST client for the hierarchy backend, the drag
//! session controller, a notification surface, and a mock backend for
//! development and contract tests.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use org_console::client::RestHierarchyClient;
//! use org_console::config::ConsoleConfig;
//! use org_console::notify::TracingNotifier;
//! use org_console::session::ConsoleSession;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let config = ConsoleConfig::from_env()?;
//! let client = RestHierarchyClient::new(&config)?;
//! let mut session = ConsoleSession::new(
//!     Arc::new(client),
//!     config.scope(),
//!     Arc::new(TracingNotifier),
//! );
//! session.load().await?;
//! # Ok(())
//! # }
//! ```

// Core error handling
pub mod error;

// Environment-driven configuration
pub mod config;

// REST client for the hierarchy backend contracts
pub mod client;

// Toast/notification surface
pub mod notify;

// Drag session controller wiring engine + client + notifier
pub mod session;

// In-memory hierarchy store: backs the mock server and engine tests
pub mod store;

// Mock REST backend (when enabled)
#[cfg(feature = "server")]
pub mod mock_rest_api;

pub use error::ConsoleError;
