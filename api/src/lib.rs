//! Vouch API service.
//!
//! Issues internship completion certificates and lets anyone holding a
//! certificate's verification id check that it is genuine.
//!
//! # Configuration
//!
//! Storage defaults to MongoDB. See [`config::VouchApiConfig`] for the full set
//! of options, including the role catalog and the signer printed on every
//! certificate.
//!
//! # Services
//!
//! The HTTP handlers are thin wrappers around [`services::IssuanceService`]
//! and [`services::VerificationService`], which are usable on their own.

pub mod config;
pub mod server;
pub mod services;

pub(crate) mod context;
pub(crate) mod error;
pub(crate) mod handlers;
