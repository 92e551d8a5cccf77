//! `warden-console` — admin console orchestration over the Warden API.
//!
//! The console owns no ambient state: list containers, edit sessions, and
//! the authentication service are all explicit objects passed to whoever
//! needs them.

pub mod cli;
pub mod editor;
pub mod import;
pub mod reports;
pub mod state;

pub use editor::{CommitFailure, CommitOp, CommitOutcome, EditSession};
pub use import::ImportError;
pub use reports::ReportError;
pub use state::ListState;
