//! Worksheet store collaborator.
//!
//! The authoritative roster is a flat, row-oriented remote workbook with no
//! schema enforcement. This module defines the contract the rest of the
//! crate consumes it through, plus the supporting pieces around that
//! contract:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  Application Layer (HTTP handlers, services)            │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Roster Cache (cache/) - TTL + change-signal refresh    │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Store Traits (worksheet.rs) - Abstract Interface       │
//! │  get_all_rows / clear / write_rows / append_rows        │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//!     ┌──────────────────────────────────────────────┐
//!     │              Local Worksheet                  │
//!     │                (in-memory)                    │
//!     └──────────────────────────────────────────────┘
//! ```
//!
//! Reads and the authorization handshake go through [`RetryPolicy`];
//! destructive writes never do. [`roster_fingerprint`] is the cheap
//! change-detection digest shared by the cache and the working copy.

#[cfg(not(feature = "local-store"))]
compile_error!("Enable at least one worksheet store backend feature.");

pub mod config;
pub mod error;
pub mod fingerprint;
#[cfg(feature = "local-store")]
pub mod local;
pub mod retry;
pub mod worksheet;

pub use config::{AppConfig, CacheSettings, RetrySettings, WorkbookSettings};
pub use error::{ErrorContext, StoreError, StoreResult};
pub use fingerprint::roster_fingerprint;
#[cfg(feature = "local-store")]
pub use local::{LocalWorkbook, LocalWorksheet};
pub use retry::RetryPolicy;
pub use worksheet::{WorkbookStore, WorksheetStore};
