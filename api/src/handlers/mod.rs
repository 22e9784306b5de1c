//! Response helpers shared by the routes

pub mod error;
