// SPDX-FileCopyrightText: 2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Time-zone lookup as consumed by zoned date-time patterns.
//!
//! The engine only needs three things from a zone source: an
//! ordinally-sorted identifier list (the longest-match parse relies on the
//! order), lookup by identifier, and a fixed-offset factory. The default
//! implementation is backed by jiff's bundled tzdb.

use std::fmt;
use std::sync::Arc;

use jiff::tz::{Offset, TimeZone};

/// A source of time zones for the `z` pattern character.
pub trait ZoneProvider: fmt::Debug + Send + Sync {
    /// Every known zone identifier, sorted by ordinal (byte) comparison.
    fn ids(&self) -> &[String];

    /// Look up a zone by its exact identifier.
    fn get(&self, id: &str) -> Option<TimeZone>;

    /// A fixed-offset zone.
    fn fixed(&self, offset: Offset) -> TimeZone {
        TimeZone::fixed(offset)
    }
}

/// The default provider, backed by `jiff::tz::db()`.
pub struct TzdbZoneProvider {
    ids: Vec<String>,
}

impl TzdbZoneProvider {
    /// Snapshot the identifier list of the bundled database. The list is
    /// collected and sorted once; lookups go straight to the database.
    #[must_use]
    pub fn new() -> Self {
        let mut ids: Vec<String> = jiff::tz::db().available().map(|id| id.to_string()).collect();
        ids.sort_unstable();
        tracing::debug!(zones = ids.len(), "snapshotted tzdb identifiers");
        Self { ids }
    }

    /// The provider wrapped for sharing between patterns.
    #[must_use]
    pub fn shared() -> Arc<dyn ZoneProvider> {
        Arc::new(Self::new())
    }
}

impl Default for TzdbZoneProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for TzdbZoneProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TzdbZoneProvider")
            .field("ids", &self.ids.len())
            .finish()
    }
}

impl ZoneProvider for TzdbZoneProvider {
    fn ids(&self) -> &[String] {
        &self.ids
    }

    fn get(&self, id: &str) -> Option<TimeZone> {
        jiff::tz::db().get(id).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_sorted_ordinally() {
        let provider = TzdbZoneProvider::new();
        let ids = provider.ids();
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn lookup_round_trips_through_ids() {
        let provider = TzdbZoneProvider::new();
        assert!(provider.ids().iter().any(|id| id == "Europe/London"));
        assert!(provider.get("Europe/London").is_some());
        assert!(provider.get("Nowhere/Special").is_none());
    }
}
