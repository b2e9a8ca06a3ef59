//! Shared types used across the codebase

use chrono::{DateTime, Utc};

/// Primary key of every table (`SERIAL` columns).
pub type DbId = i32;

/// Timestamps are stored as `TIMESTAMPTZ` and serialized as RFC 3339.
pub type Timestamp = DateTime<Utc>;
