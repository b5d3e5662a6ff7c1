//! Time scalars: `std::time::Duration` and the chrono date-times.
//!
//! All of these encode as JSON strings. Durations render as
//! `"secs.nanos"` with nanoseconds zero-padded to nine digits; date-times
//! with an offset render as RFC 3339, naive ones as
//! `%Y-%m-%dT%H:%M:%S%.f`. The matching text coercions live in
//! [`crate::convert`].

use chrono::{DateTime, FixedOffset, NaiveDateTime, Utc};
use std::time::Duration;

use super::impl_scalar;

impl_scalar!(
    Duration,
    DateTime<Utc>,
    DateTime<FixedOffset>,
    NaiveDateTime,
);
