//! Per-collection logical clocks
//!
//! Each replicated collection carries one [`DataVersion`] record per side
//! (device and backend). The replication engine compares the two timestamps
//! to decide which side is authoritative; individual record stamps are never
//! compared.

use chrono::{DateTime, Duration, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The replicated collections, with their fixed wire ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Collection {
    Categories,
    Products,
    Stock,
    Sales,
    Customers,
    Catalog,
    StockOrders,
}

impl Collection {
    /// Wire id used by both clock stores.
    #[must_use]
    pub const fn id(self) -> i64 {
        match self {
            Self::Categories => 1,
            Self::Products => 2,
            Self::Stock => 3,
            Self::Sales => 4,
            Self::Customers => 5,
            Self::Catalog => 6,
            Self::StockOrders => 7,
        }
    }

    /// Human-readable collection tag.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Categories => "categories",
            Self::Products => "products",
            Self::Stock => "stock",
            Self::Sales => "sales",
            Self::Customers => "customers",
            Self::Catalog => "catalog",
            Self::StockOrders => "stock_orders",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// One logical-clock record per collection per side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataVersion {
    /// Fixed collection id (see [`Collection::id`])
    pub id: i64,
    /// Human-readable collection tag
    pub name: String,
    /// RFC 3339 instant of the most recent mutation applied on this side;
    /// empty means the collection was never written here
    pub timestamp: String,
}

impl DataVersion {
    /// The "never written" clock for a collection.
    ///
    /// A missing clock row reads as this value; it is a normal state, not an
    /// error, and compares older than every real stamp.
    #[must_use]
    pub fn empty(collection: Collection) -> Self {
        Self::at(collection, String::new())
    }

    /// Clock for a collection at a given stamp.
    #[must_use]
    pub fn at(collection: Collection, stamp: impl Into<String>) -> Self {
        Self {
            id: collection.id(),
            name: collection.tag().to_string(),
            timestamp: stamp.into(),
        }
    }

    /// Whether this clock has never advanced.
    #[must_use]
    pub fn is_epoch(&self) -> bool {
        self.timestamp.is_empty()
    }
}

/// Current UTC instant at millisecond precision with a `Z` suffix.
///
/// Fixed width and a fixed offset keep lexical order equal to temporal order,
/// which is what the clock comparison relies on.
#[must_use]
pub fn stamp_now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// A stamp strictly after `prev`, never behind the wall clock.
///
/// Two mutations inside the same millisecond must still advance the
/// collection clock, so when the wall clock has not moved past `prev` this
/// bumps `prev` by milliseconds instead. `prev` may be any valid RFC 3339
/// stamp, including one a pull copied verbatim from the backend at a
/// different precision or offset. Such a stamp can sort after the
/// millisecond form of the same instant (`'.' < 'Z'`), so the bump repeats
/// until the formatted result sorts after the raw input.
#[must_use]
pub fn stamp_after(prev: &str) -> String {
    let now = stamp_now();
    if now.as_str() > prev {
        return now;
    }
    let Ok(parsed) = DateTime::parse_from_rfc3339(prev) else {
        return now;
    };
    let mut instant = parsed.with_timezone(&Utc);
    loop {
        instant += Duration::milliseconds(1);
        let stamp = instant.to_rfc3339_opts(SecondsFormat::Millis, true);
        if stamp.as_str() > prev {
            return stamp;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn collection_wire_ids_are_fixed() {
        assert_eq!(Collection::Categories.id(), 1);
        assert_eq!(Collection::Products.id(), 2);
        assert_eq!(Collection::Stock.id(), 3);
        assert_eq!(Collection::Sales.id(), 4);
        assert_eq!(Collection::Customers.id(), 5);
        assert_eq!(Collection::Catalog.id(), 6);
        assert_eq!(Collection::StockOrders.id(), 7);
    }

    #[test]
    fn empty_version_is_epoch() {
        let version = DataVersion::empty(Collection::Sales);
        assert!(version.is_epoch());
        assert_eq!(version.id, 4);
        assert_eq!(version.name, "sales");
    }

    #[test]
    fn epoch_compares_older_than_any_stamp() {
        let epoch = DataVersion::empty(Collection::Catalog);
        assert!(stamp_now().as_str() > epoch.timestamp.as_str());
    }

    #[test]
    fn stamps_order_lexically() {
        let earlier = "2024-01-01T00:00:00.000Z";
        let later = "2024-01-02T10:00:00.000Z";
        assert!(later > earlier);
        assert!(stamp_now().as_str() > later);
    }

    #[test]
    fn stamp_after_strictly_advances() {
        let first = stamp_now();
        let second = stamp_after(&first);
        let third = stamp_after(&second);
        assert!(second > first);
        assert!(third > second);
    }

    #[test]
    fn stamp_after_outruns_a_future_clock() {
        // A stamp ahead of the wall clock still advances by a millisecond.
        let ahead = "2999-01-01T00:00:00.000Z".to_string();
        let next = stamp_after(&ahead);
        assert_eq!(next, "2999-01-01T00:00:00.001Z");
    }

    #[test]
    fn stamp_after_a_second_precision_stamp_sorts_after_it() {
        // A backend-written clock without a fractional part sorts after the
        // millisecond stamps of its own second, so the bump rolls into the
        // next second.
        let prev = "2999-01-01T00:00:00Z";
        let next = stamp_after(prev);
        assert!(next.as_str() > prev);
        assert_eq!(next, "2999-01-01T00:00:01.000Z");
    }

    #[test]
    fn stamp_after_a_numeric_offset_stamp_sorts_after_it() {
        let prev = "2999-01-01T00:00:00.000+00:00";
        let next = stamp_after(prev);
        assert!(next.as_str() > prev);
        assert_eq!(next, "2999-01-01T00:00:00.001Z");
    }

    #[test]
    fn stamp_after_epoch_uses_wall_clock() {
        let next = stamp_after("");
        assert!(!next.is_empty());
        assert!(next.ends_with('Z'));
    }
}
