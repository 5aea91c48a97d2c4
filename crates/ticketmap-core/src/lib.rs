#![forbid(unsafe_code)]

//! Ticket hierarchy model + CSV loader (headless).
//!
//! The input is the tabular export of a ticket traversal: one row per ticket, with the
//! traversal depth and optionally the key of the ticket that linked to it. Everything in this
//! crate is synchronous and performs no network I/O.

pub mod classify;
pub mod config;
pub mod error;
pub mod loader;
pub mod model;
pub mod report;

pub use config::SiteConfig;
pub use error::{Error, Result};
pub use loader::{load_tickets, read_tickets, resolve_input_path};
pub use model::TicketRecord;
pub use report::Reporter;
