//! Status-filter predicates shared by the idea board and the initiative list.
//!
//! Statuses are stored as text; each status enum implements [`StatusValue`]
//! so a filter can be parsed from a query string and compared against rows
//! that expose their status through [`HasStatus`].

/// An enumerated status column.
pub trait StatusValue: Copy + Eq + Sized + 'static {
    /// Every variant, in display order.
    const ALL: &'static [Self];

    fn as_str(self) -> &'static str;

    fn from_str_value(s: &str) -> Result<Self, String>;
}

/// A record with an enumerated status column.
pub trait HasStatus {
    fn status(&self) -> &str;
}

/// Query-string value meaning "no filter".
pub const FILTER_ALL: &str = "all";

/// Either every record or only the ones in one status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusFilter<S> {
    All,
    Only(S),
}

impl<S> Default for StatusFilter<S> {
    fn default() -> Self {
        StatusFilter::All
    }
}

impl<S: StatusValue> StatusFilter<S> {
    /// Parse `?status=`; a missing value or `"all"` means no filter.
    pub fn parse(raw: Option<&str>) -> Result<Self, String> {
        match raw {
            None | Some(FILTER_ALL) => Ok(StatusFilter::All),
            Some(value) => S::from_str_value(value).map(StatusFilter::Only),
        }
    }

    /// The status value to bind in SQL, if any.
    pub fn as_db_value(&self) -> Option<&'static str> {
        match self {
            StatusFilter::All => None,
            StatusFilter::Only(status) => Some(status.as_str()),
        }
    }

    pub fn matches<R: HasStatus>(&self, record: &R) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(status) => record.status() == status.as_str(),
        }
    }

    /// Keep matching records, preserving order.
    pub fn apply<'a, R: HasStatus>(&self, records: &'a [R]) -> Vec<&'a R> {
        records.iter().filter(|r| self.matches(*r)).collect()
    }
}

/// Records grouped by status.
///
/// Every input record lands in exactly one bucket; rows whose status text
/// does not parse go to `unrecognized` rather than being dropped.
#[derive(Debug)]
pub struct StatusPartition<'a, S, R> {
    pub buckets: Vec<(S, Vec<&'a R>)>,
    pub unrecognized: Vec<&'a R>,
}

impl<'a, S: StatusValue, R> StatusPartition<'a, S, R> {
    /// Records in one bucket.
    pub fn get(&self, status: S) -> &[&'a R] {
        self.buckets
            .iter()
            .find(|(s, _)| *s == status)
            .map(|(_, records)| records.as_slice())
            .unwrap_or(&[])
    }

    /// Number of records in one bucket.
    pub fn count(&self, status: S) -> usize {
        self.get(status).len()
    }

    /// Total records across all buckets, including unrecognized ones.
    pub fn total(&self) -> usize {
        self.buckets.iter().map(|(_, r)| r.len()).sum::<usize>() + self.unrecognized.len()
    }
}

/// Split `records` into one bucket per status variant.
pub fn partition_by_status<S: StatusValue, R: HasStatus>(
    records: &[R],
) -> StatusPartition<'_, S, R> {
    let mut buckets: Vec<(S, Vec<&R>)> = S::ALL.iter().map(|s| (*s, Vec::new())).collect();
    let mut unrecognized = Vec::new();

    for record in records {
        match S::from_str_value(record.status()) {
            Ok(status) => {
                if let Some((_, bucket)) = buckets.iter_mut().find(|(s, _)| *s == status) {
                    bucket.push(record);
                }
            }
            Err(_) => unrecognized.push(record),
        }
    }

    StatusPartition {
        buckets,
        unrecognized,
    }
}
