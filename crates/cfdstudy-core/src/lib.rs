//! # cfdstudy-core
//!
//! Catalog model, configuration, and error handling shared by the
//! CFDSTUDY message tooling.

pub mod config;
pub mod error;
pub mod model;
