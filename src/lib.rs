//! Biblioteca - virtual bookshelf client
//!
//! A terminal client for a small book-list REST API: add a book, list the
//! shelf, delete an entry by position. Local state mirrors the server and is
//! resynchronized with a full re-fetch after every mutation; the server's
//! returned order is trusted as-is.

pub mod config;
pub mod controller;
pub mod error;
pub mod models;
pub mod remote;

pub use config::AppConfig;
pub use error::{ClientError, ClientResult};
