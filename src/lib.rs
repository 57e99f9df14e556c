//! # Mattergram
//!
//! A Rust library for converting Telegram chat exports into Mattermost
//! bulk-import archives.
//!
//! ## Overview
//!
//! Telegram Desktop's "Export Chat History" feature produces a `result.json`
//! plus media files. Mattergram turns that export into a ZIP archive the
//! Mattermost bulk importer accepts: reply chains become threads, Telegram's
//! span markup becomes Markdown, and referenced media files are packed
//! alongside the post data.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::path::Path;
//!
//! use mattergram::config::ImportConfig;
//! use mattergram::convert::{Converter, Destination};
//! use mattergram::report::TracingReporter;
//! use mattergram::{archive, export};
//!
//! fn main() -> mattergram::Result<()> {
//!     let input_dir = Path::new("my_export");
//!     let config = ImportConfig::load(&input_dir.join("config.toml"))?;
//!     let telegram = export::load_export(&input_dir.join("result.json"))?;
//!
//!     let reporter = TracingReporter;
//!     let destination = Destination::for_export(&telegram, &config)?;
//!     let conversion =
//!         Converter::new(&config, destination, &reporter)?.convert(&telegram.messages)?;
//!
//!     let lines = conversion.jsonl_lines()?;
//!     archive::write_archive(
//!         Path::new("mattermost_import.zip"),
//!         input_dir,
//!         &lines,
//!         &conversion.attachments,
//!         &reporter,
//!     )
//! }
//! ```
//!
//! ## Module Structure
//!
//! - [`export`] — Telegram export model and loading
//! - [`config`] — `config.toml` loading and validation
//! - [`identity`] — author and mention resolution
//! - [`markup`] — span markup to Markdown rendering
//! - [`threads`] — reply-chain resolution
//! - [`convert`] — the conversion pass ([`Converter`](convert::Converter))
//! - [`envelope`] — Mattermost import-file records
//! - [`archive`] — ZIP packaging
//! - [`convlog`] — optional plain-text conversation log
//! - [`report`] — diagnostic sink ([`Reporter`](report::Reporter))
//! - [`cli`] — CLI argument types
//! - [`error`] — unified error type ([`MigrateError`], [`Result`])

pub mod archive;
pub mod cli;
pub mod config;
pub mod convert;
pub mod convlog;
pub mod envelope;
pub mod error;
pub mod export;
pub mod identity;
pub mod markup;
pub mod report;
pub mod threads;

// Re-export the main types at the crate root for convenience
pub use error::{MigrateError, Result};

/// Convenient re-exports for common usage.
///
/// ```rust
/// use mattergram::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::{MigrateError, Result};

    pub use crate::config::{ChatType, ImportConfig, ImportTarget};
    pub use crate::convert::{Conversion, Converter, Destination};
    pub use crate::envelope::{Envelope, PostContent};
    pub use crate::export::{RawMessage, TelegramExport, load_export, validate_input_dir};
    pub use crate::identity::IdentityMap;
    pub use crate::report::{MemoryReporter, Reporter, TracingReporter};
    pub use crate::threads::ThreadMap;

    pub use crate::archive::{sanitize_filename, write_archive};
    pub use crate::convlog::write_conversation_log;
}
