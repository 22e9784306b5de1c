//! # SmsFlow Infrastructure
//!
//! This crate implements the infrastructure layer for the SmsFlow
//! application. It provides the HTTP client against the SMS gateway
//! (token lifecycle, batched dispatch, account diagnostics) and the
//! MySQL repositories backing the host platform's storage.

/// Database module - MySQL repositories using SQLx
pub mod database;

/// Gateway module - token manager, dispatch client, diagnostics
pub mod gateway;
