//! Business partner directory for Waypoint.
//!
//! This crate resolves free-text partner names to location records. Two
//! sources are supported:
//!
//! - [`StaticDirectory`] — an explicitly constructed in-memory table,
//!   seeded with development data.
//! - [`RemoteDirectory`] — an HTTP search endpoint exposing the same
//!   contract; network failures are indistinguishable from "not found".
//!
//! The caller picks a source once at startup via [`PartnerDirectory`];
//! the lookup contract is identical either way: a query either resolves
//! to a [`Partner`] or it doesn't.

mod directory;
mod record;

pub use directory::{PartnerDirectory, RemoteDirectory, StaticDirectory};
pub use record::Partner;
