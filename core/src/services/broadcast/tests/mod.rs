//! Broadcast service tests
