//! Data models for Biblioteca

pub mod book;

pub use book::Book;
