//! Persistence for issued certificates.
//!
//! [`models`] holds the documents as they are stored, [`storage`] holds the
//! store traits and their MongoDB and in-memory backends.

pub mod models;
pub mod storage;
