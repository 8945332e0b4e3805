//! Sandboxed filesystem engine.
//!
//! Every client-supplied path goes through the [`Workdir`] resolver, which
//! confines it to the configured root before any filesystem call is made.
//! The remaining modules operate on resolved paths only: one-level
//! directory listing ([`lister`]), the mutating operations ([`ops`]), and
//! the atomic upload writer ([`upload`]).

pub mod error;
pub mod lister;
pub mod ops;
pub mod resolver;
pub mod upload;

pub use error::FsError;
pub use lister::{Entry, EntryKind};
pub use resolver::{Resolved, Workdir};
