//! Shared utilities and configuration for the SmsFlow server
//!
//! This crate provides functionality used across all server modules:
//! - Configuration structures loaded from the environment
//! - Phone number string utilities

pub mod config;
pub mod utils;
