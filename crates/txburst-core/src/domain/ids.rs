//! RunId - run ごとの識別子（ULID）
//!
//! ULID なので連続する run のログが開始順に並び、調整なしで区別できます。

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ulid::Ulid;

/// Identifier of one dispatched run. Displayed as `run-<ulid>`.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RunId(Ulid);

impl RunId {
    /// Create a RunId whose timestamp part is `at`.
    pub fn at(at: DateTime<Utc>) -> Self {
        let timestamp_ms = at.timestamp_millis().max(0) as u64;
        Self(Ulid::from_parts(timestamp_ms, rand::random()))
    }

    pub fn from_ulid(ulid: Ulid) -> Self {
        Self(ulid)
    }

    pub fn as_ulid(&self) -> Ulid {
        self.0
    }
}

impl From<Ulid> for RunId {
    fn from(ulid: Ulid) -> Self {
        Self::from_ulid(ulid)
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "run-{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn run_ids_are_unique_for_the_same_instant() {
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        let id1 = RunId::at(at);
        let id2 = RunId::at(at);

        assert_ne!(id1, id2);

        // timestamp part comes from `at`
        let timestamp1 = (id1.as_ulid().0 >> 80) as u64;
        let timestamp2 = (id2.as_ulid().0 >> 80) as u64;
        assert_eq!(timestamp1, timestamp2);
        assert_eq!(timestamp1, at.timestamp_millis() as u64);
    }

    #[test]
    fn display_has_run_prefix() {
        let id = RunId::from_ulid(Ulid::nil());
        assert_eq!(id.to_string(), format!("run-{}", Ulid::nil()));
    }
}
