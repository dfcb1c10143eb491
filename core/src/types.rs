//! Shared primitive types used across the loader.

/// Stable, unique customer identifier (UUID v4 string).
pub type CustomerId = String;

/// Stable, unique account identifier (UUID v4 string).
pub type AccountId = String;

/// Stable, unique transaction identifier (UUID v4 string).
pub type TransactionId = String;

/// Monetary value in integer cents. Never a binary float.
pub type Cents = i64;
