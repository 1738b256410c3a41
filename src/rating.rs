//! Per-key rating aggregation.
//!
//! For every user id the map phase produces a [`RatingRecord::UserInfo`]
//! and a [`RatingRecord::Rating`]. [`aggregate`] folds one key group into a
//! single [`OutputRecord`] and drops users rated at or below
//! [`RATING_THRESHOLD`].

use serde::{Deserialize, Serialize};
use std::fmt;

/// Ratings must be strictly greater than this to be emitted.
pub const RATING_THRESHOLD: f32 = 6.5;

/// Descriptive attributes of a user.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct UserInfo {
    pub first_name: String,
    pub last_name: String,
    pub country: String,
    pub city: String,
    pub faculty: String,
    pub department: String,
}

impl UserInfo {
    pub fn new(
        first_name: &str,
        last_name: &str,
        country: &str,
        city: &str,
        faculty: &str,
        department: &str,
    ) -> Self {
        Self {
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            country: country.to_string(),
            city: city.to_string(),
            faculty: faculty.to_string(),
            department: department.to_string(),
        }
    }
}

/// A value in a key group: either a user's information or their rating.
#[derive(Clone, Debug, PartialEq)]
pub enum RatingRecord {
    UserInfo(UserInfo),
    Rating(f32),
}

/// The merged view of one key group.
///
/// Any part may be missing; [`fmt::Display`] renders missing text as an
/// empty field and a missing rating as `0.0`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct OutputRecord {
    pub user: Option<UserInfo>,
    pub rating: Option<f32>,
}

impl OutputRecord {
    /// Whether this record passes the threshold filter.
    pub fn is_awesome(&self) -> bool {
        matches!(self.rating, Some(r) if r > RATING_THRESHOLD)
    }
}

impl fmt::Display for OutputRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.user {
            Some(u) => write!(
                f,
                "{}\t{}\t{}\t{}\t{}\t{}",
                u.first_name, u.last_name, u.country, u.city, u.faculty, u.department
            )?,
            None => f.write_str("\t\t\t\t\t")?,
        }
        match self.rating {
            // Debug keeps the fractional part, so 9.0 prints as "9.0"
            Some(r) => write!(f, "\t{:?}", r),
            None => f.write_str("\t0.0"),
        }
    }
}

/// Folds all values of one key group into an output record.
///
/// Values are scanned once in iteration order; a later `UserInfo` or
/// `Rating` replaces an earlier one. Returns [`None`] unless a rating was
/// seen and it is strictly greater than [`RATING_THRESHOLD`].
pub fn aggregate<I>(key: i64, values: I) -> Option<(i64, OutputRecord)>
where
    I: IntoIterator<Item = RatingRecord>,
{
    let record = values
        .into_iter()
        .fold(OutputRecord::default(), |mut acc, value| {
            match value {
                RatingRecord::UserInfo(user) => acc.user = Some(user),
                RatingRecord::Rating(rating) => acc.rating = Some(rating),
            }
            acc
        });

    record.is_awesome().then_some((key, record))
}
