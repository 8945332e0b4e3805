//! filedeck — a self-hosted web file manager over a sandboxed directory.
//!
//! The filesystem engine ([`fs`]) confines every client-supplied path to
//! the configured working directory and implements listing, mutation, and
//! upload operations on top of it. The HTTP layer ([`http`]) exposes the
//! engine under `/api/files` and serves the workdir itself as static
//! content for everything else.

pub mod config;
pub mod fs;
pub mod http;
