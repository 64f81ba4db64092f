//! `equiptrack` - Equipment assignment inventory
//!
//! This library owns a collection of equipment assignment records (who holds
//! which device and accessories), mints their ids, filters them for display,
//! and mediates create-vs-update intent for a single edit form.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod cli;
pub mod config;
pub mod confirm;
pub mod error;
pub mod filter;
pub mod inventory;
pub mod loader;
pub mod logging;
pub mod record;
pub mod session;
pub mod store;
pub mod validation;

pub use config::Config;
pub use confirm::{AutoConfirm, Confirm};
pub use error::{Error, Result};
pub use filter::{FilterCriteria, ViewStats};
pub use inventory::Inventory;
pub use loader::{LoadState, SeedSource};
pub use logging::init_logging;
pub use record::{AssignmentRecord, Field, RecordFields, NOT_AVAILABLE};
pub use session::{EditIntent, EditSession};
pub use store::RecordStore;
