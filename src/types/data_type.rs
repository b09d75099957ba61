//! Supported categories of portable data.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};
use thiserror::Error;

/// Closed set of data categories a portability job can move.
///
/// Jobs store the data type as its raw name (`"PHOTOS"`, `"CONTACTS"`, ...);
/// [`PortableDataType::parse`] re-validates that name every time it is used.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum PortableDataType {
    Calendar,
    Contacts,
    Mail,
    Photos,
    Tasks,
}

/// A stored data-type name that is not a member of [`PortableDataType`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown data type: {0:?}")]
pub struct UnknownDataType(pub String);

impl PortableDataType {
    /// Map a stored name onto the enumeration.
    ///
    /// Matching is exact: `"photos"` and `" PHOTOS"` are rejected.
    pub fn parse(raw: &str) -> Result<Self, UnknownDataType> {
        raw.parse()
            .map_err(|_| UnknownDataType(raw.to_string()))
    }

    /// Stored name of this data type.
    pub fn as_str(self) -> &'static str {
        self.into()
    }
}

impl From<PortableDataType> for String {
    fn from(value: PortableDataType) -> Self {
        value.as_str().to_string()
    }
}
