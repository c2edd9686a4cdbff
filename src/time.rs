// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

//! Dataset timestamp conversion.
//!
//! A2D2 timestamps are unsigned microseconds since the Unix epoch. Message
//! headers carry split seconds/nanoseconds with 32-bit seconds, so any
//! timestamp at or after 4294967296000000 µs (Feb 7 2106 06:28:16 UTC)
//! cannot be represented and must be rejected before conversion.

use crate::msg::Time;

const ONE_THOUSAND: u64 = 1_000;
const ONE_MILLION: u64 = 1_000_000;

/// First unrepresentable timestamp in microseconds.
pub const TIMESTAMP_LIMIT: u64 = (u32::MAX as u64 + 1) * ONE_MILLION;

/// TAI-to-UTC offset at dataset record time (37 leap seconds), in µs.
const TAI_UTC_OFFSET: u64 = 37 * ONE_MILLION;

/// Whether a microsecond timestamp fits in a 32-bit seconds field.
pub fn valid_timestamp(time: u64) -> bool {
    (time / ONE_MILLION) <= u32::MAX as u64
}

/// Split a microsecond timestamp into seconds and nanoseconds.
///
/// The caller must have checked [`valid_timestamp`] first; out-of-range
/// input truncates the seconds component.
pub fn split_time(time: u64) -> Time {
    let secs = time / ONE_MILLION;
    let mu_secs = time - (secs * ONE_MILLION);
    Time {
        sec: secs as u32,
        nanosec: (mu_secs * ONE_THOUSAND) as u32,
    }
}

/// Shift a TAI microsecond timestamp to UTC.
pub fn tai_to_utc(mu_s: u64) -> u64 {
    mu_s - TAI_UTC_OFFSET
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_timestamp_boundary() {
        assert!(valid_timestamp(4294967295_000000));
        assert!(!valid_timestamp(4294967296_000000));
        assert_eq!(TIMESTAMP_LIMIT, 4294967296_000000);
    }

    #[test]
    fn test_valid_timestamp_small_values() {
        assert!(valid_timestamp(0));
        assert!(valid_timestamp(1));
        assert!(valid_timestamp(1_500_000));
    }

    #[test]
    fn test_split_time() {
        let t = split_time(1_500_000);
        assert_eq!(t.sec, 1);
        assert_eq!(t.nanosec, 500_000_000);
    }

    #[test]
    fn test_split_time_whole_seconds() {
        let t = split_time(3_000_000);
        assert_eq!(t.sec, 3);
        assert_eq!(t.nanosec, 0);
    }

    #[test]
    fn test_split_time_sub_second() {
        let t = split_time(999_999);
        assert_eq!(t.sec, 0);
        assert_eq!(t.nanosec, 999_999_000);
    }

    #[test]
    fn test_tai_to_utc() {
        assert_eq!(tai_to_utc(1_554_130_776_037_000), 1_554_130_776_000_000);
        assert_eq!(tai_to_utc(37_000_000), 0);
    }
}
