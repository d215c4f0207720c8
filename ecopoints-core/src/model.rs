//! Domain data structures for collection points and their categories.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Valid latitude range in degrees.
pub const MIN_LAT: f64 = -90.0;
/// Upper latitude bound in degrees.
pub const MAX_LAT: f64 = 90.0;
/// Valid longitude range in degrees.
pub const MIN_LNG: f64 = -180.0;
/// Upper longitude bound in degrees.
pub const MAX_LNG: f64 = 180.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
/// Kinds of collection points known to ecopoints.
///
/// Declaration order doubles as matching priority during classification.
pub enum CollectionType {
    /// Recyclable waste drop-off (ecoponto).
    #[serde(rename = "recyclable-waste")]
    Recyclable,
    /// Organic waste and composting yards.
    #[serde(rename = "organic-waste")]
    Organic,
    /// Batteries, chemicals and other hazardous waste.
    #[serde(rename = "hazardous-waste")]
    Hazardous,
    /// Recycling cooperatives and sorting centres.
    Cooperative,
    /// General voluntary drop-off point, also the classification fallback.
    #[serde(rename = "general-drop-off")]
    DropOff,
}

impl CollectionType {
    /// Every category in matching order.
    pub const ALL: [Self; 5] = [
        Self::Recyclable,
        Self::Organic,
        Self::Hazardous,
        Self::Cooperative,
        Self::DropOff,
    ];

    /// Category used when nothing more specific is known.
    pub const FALLBACK: Self = Self::DropOff;

    /// Canonical machine-readable name.
    #[must_use]
    pub fn slug(self) -> &'static str {
        match self {
            Self::Recyclable => "recyclable-waste",
            Self::Organic => "organic-waste",
            Self::Hazardous => "hazardous-waste",
            Self::Cooperative => "cooperative",
            Self::DropOff => "general-drop-off",
        }
    }

    /// Human-friendly label.
    #[must_use]
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Recyclable => "Recyclable waste",
            Self::Organic => "Organic waste / composting",
            Self::Hazardous => "Hazardous waste",
            Self::Cooperative => "Recycling cooperative",
            Self::DropOff => "General drop-off",
        }
    }

    /// Lower-case keywords that identify this category inside free text.
    #[must_use]
    pub fn keywords(self) -> &'static [&'static str] {
        match self {
            Self::Recyclable => &["recycl", "ecoponto"],
            Self::Organic => &["organic", "compost", "patio", "pátio"],
            Self::Hazardous => &["hazard", "battery", "batteries", "chemical"],
            Self::Cooperative => &["cooperativ", "triagem", "sorting"],
            Self::DropOff => &["drop", "pev", "ponto de entrega", "ponto_entrega", "voluntary"],
        }
    }

    /// Check whether any keyword of this category occurs in `haystack`.
    ///
    /// `haystack` must already be lower-cased.
    #[must_use]
    pub fn matches_keyword(self, haystack: &str) -> bool {
        self.keywords()
            .iter()
            .any(|keyword| haystack.contains(keyword))
    }
}

impl fmt::Display for CollectionType {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}", self.slug())
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown collection type: {0}")]
/// Returned when text does not name any [`CollectionType`].
pub struct UnknownCollectionType(pub String);

impl FromStr for CollectionType {
    type Err = UnknownCollectionType;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let needle = raw.trim().to_lowercase();
        if needle.is_empty() {
            return Err(UnknownCollectionType(raw.to_owned()));
        }

        Self::ALL
            .into_iter()
            .find(|kind| kind.slug() == needle)
            .or_else(|| {
                Self::ALL
                    .into_iter()
                    .find(|kind| kind.matches_keyword(&needle))
            })
            .ok_or_else(|| UnknownCollectionType(raw.to_owned()))
    }
}

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq)]
/// Errors raised when building a [`Coordinate`].
pub enum CoordinateError {
    /// Latitude outside [-90, 90] or not finite.
    #[error("Invalid latitude: {0}")]
    InvalidLatitude(f64),
    /// Longitude outside [-180, 180] or not finite.
    #[error("Invalid longitude: {0}")]
    InvalidLongitude(f64),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
/// WGS84 position stored latitude first.
pub struct Coordinate {
    lat: f64,
    lng: f64,
}

impl Coordinate {
    /// Build a validated coordinate.
    ///
    /// # Errors
    ///
    /// Returns a [`CoordinateError`] when either component is out of range.
    pub fn new(lat: f64, lng: f64) -> Result<Self, CoordinateError> {
        if !lat.is_finite() || !(MIN_LAT..=MAX_LAT).contains(&lat) {
            return Err(CoordinateError::InvalidLatitude(lat));
        }
        if !lng.is_finite() || !(MIN_LNG..=MAX_LNG).contains(&lng) {
            return Err(CoordinateError::InvalidLongitude(lng));
        }
        Ok(Self { lat, lng })
    }

    /// Build a coordinate from components known to be in range.
    pub(crate) const fn from_trusted(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Latitude in degrees.
    #[must_use]
    pub fn lat(self) -> f64 {
        self.lat
    }

    /// Longitude in degrees.
    #[must_use]
    pub fn lng(self) -> f64 {
        self.lng
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{:.5}, {:.5}", self.lat, self.lng)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
/// Identifier of a collection point as published by its document.
///
/// Synthesized ids embed the document name, but explicit `id` properties are
/// kept verbatim and may repeat across documents.
pub struct PointId(pub String);

impl fmt::Display for PointId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
/// Optional free-text metadata published with a point.
pub struct PointDetails {
    /// Street address.
    pub address: Option<String>,
    /// Opening hours as written by the data publisher.
    pub opening_hours: Option<String>,
    /// Accepted materials or specialty.
    pub materials: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
/// A single geo-located, categorized collection point.
pub struct CollectionPoint {
    /// Stable identifier.
    pub id: PointId,
    /// Display name.
    pub name: String,
    /// Position of the point.
    pub coordinate: Coordinate,
    /// Resolved category.
    pub category: CollectionType,
    /// Free-text metadata.
    pub details: PointDetails,
}

impl PartialEq for CollectionPoint {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for CollectionPoint {}

impl PartialOrd for CollectionPoint {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CollectionPoint {
    fn cmp(&self, other: &Self) -> Ordering {
        self.id.cmp(&other.id)
    }
}
