//! GeoJSON feature collection loader.
//!
//! The loader turns one raw document into typed [`CollectionPoint`]s. It does
//! no I/O: callers hand it text (or bytes) fetched by a
//! [`DocumentSource`](crate::ports::DocumentSource). Loading is all-or-nothing,
//! a single malformed geometry rejects the whole document.

use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::debug;

use crate::classify::{CATEGORY_KEYS, SCHEMA_HINTS, first_recognized, source_keyword};
use crate::model::{CollectionPoint, CollectionType, Coordinate, CoordinateError, PointDetails, PointId};

const NAME_KEYS: [&str; 7] = [
    "name",
    "Nome",
    "nome",
    "nm_ecoponto",
    "nm_patio_compostagem",
    "nm_local",
    "nm_cooperativa",
];
const ADDRESS_KEYS: [&str; 3] = ["nm_endereco", "address", "endereco"];
const OPENING_HOURS_KEYS: [&str; 3] = ["tx_atendimento", "tx_horario_atendimento", "opening_hours"];
const MATERIALS_KEYS: [&str; 4] = [
    "tx_recebimento_comum",
    "materiais",
    "tx_especialidade",
    "materials",
];

#[derive(thiserror::Error, Debug)]
/// The document or one of its features is malformed.
pub enum ParseError {
    /// The document is not valid JSON.
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// A feature entry is not a JSON object.
    #[error("Feature {index} is not an object")]
    InvalidFeature {
        /// Position of the feature in the collection.
        index: usize,
    },
    /// A feature has no geometry object.
    #[error("Feature {index} has no geometry")]
    MissingGeometry {
        /// Position of the feature in the collection.
        index: usize,
    },
    /// A feature's geometry is something other than a point.
    #[error("Feature {index} has unsupported geometry type {kind}")]
    NotAPoint {
        /// Position of the feature in the collection.
        index: usize,
        /// Geometry type found in the document.
        kind: String,
    },
    /// Coordinates are not a pair of numbers.
    #[error("Feature {index} coordinates are not a [longitude, latitude] pair")]
    InvalidCoordinates {
        /// Position of the feature in the collection.
        index: usize,
    },
    /// Coordinates are numeric but outside the valid range.
    #[error("Feature {index} is out of range: {source}")]
    OutOfRange {
        /// Position of the feature in the collection.
        index: usize,
        /// Offending component.
        #[source]
        source: CoordinateError,
    },
}

#[derive(thiserror::Error, Debug)]
/// Errors that abort loading a document.
pub enum LoadError {
    /// Document or feature is malformed.
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),
    /// Document is valid JSON but not a feature collection.
    #[error("Unsupported schema: {0}")]
    UnsupportedSchema(String),
}

/// Top level of a feature collection; everything but `type` and `features` is ignored.
#[derive(Debug, Deserialize)]
struct RawCollection {
    #[serde(rename = "type")]
    kind: Option<String>,
    features: Vec<Value>,
}

/// Load every point of a GeoJSON feature collection.
///
/// `source` is an optional identifier (usually the file name) used to infer
/// the default category and to synthesize ids for features that lack one.
///
/// # Errors
///
/// Returns [`LoadError::Parse`] when the text is not JSON or a feature's
/// geometry is missing or malformed, and [`LoadError::UnsupportedSchema`]
/// when the document is not a feature collection.
pub fn load(document: &str, source: Option<&str>) -> Result<Vec<CollectionPoint>, LoadError> {
    let root: Value = serde_json::from_str(document).map_err(ParseError::from)?;
    load_value(root, source)
}

/// Same as [`load`] for raw bytes.
///
/// # Errors
///
/// See [`load`].
pub fn load_bytes(document: &[u8], source: Option<&str>) -> Result<Vec<CollectionPoint>, LoadError> {
    let root: Value = serde_json::from_slice(document).map_err(ParseError::from)?;
    load_value(root, source)
}

fn load_value(root: Value, source: Option<&str>) -> Result<Vec<CollectionPoint>, LoadError> {
    if !root.is_object() {
        return Err(LoadError::UnsupportedSchema(
            "top level is not an object".to_owned(),
        ));
    }
    let collection: RawCollection = serde_json::from_value(root)
        .map_err(|err| LoadError::UnsupportedSchema(format!("not a feature collection: {err}")))?;

    if let Some(kind) = collection.kind.as_deref()
        && kind != "FeatureCollection"
    {
        return Err(LoadError::UnsupportedSchema(format!(
            "expected FeatureCollection, found {kind}"
        )));
    }

    let source_type = source_keyword(source);

    let points = collection
        .features
        .iter()
        .enumerate()
        .map(|(index, feature)| parse_feature(index, feature, source, source_type))
        .collect::<Result<Vec<_>, _>>()?;

    debug!(
        source = source.unwrap_or("<inline>"),
        points = points.len(),
        source_type = ?source_type,
        "loaded feature collection"
    );

    Ok(points)
}

fn parse_feature(
    index: usize,
    feature: &Value,
    source: Option<&str>,
    source_type: Option<CollectionType>,
) -> Result<CollectionPoint, ParseError> {
    let Value::Object(feature) = feature else {
        return Err(ParseError::InvalidFeature { index });
    };

    let coordinate = point_coordinate(index, feature.get("geometry"))?;
    let props = Properties(feature.get("properties").and_then(Value::as_object));

    // Name-field hints only stand in for a source name without a keyword.
    let fallback = source_type
        .or_else(|| props.schema_hint())
        .unwrap_or(CollectionType::FALLBACK);
    let category = first_recognized(props.texts(&CATEGORY_KEYS)).unwrap_or_else(|| {
        if let Some(raw) = props.text(&CATEGORY_KEYS) {
            debug!(index, raw, fallback = %fallback, "unrecognized category, using fallback");
        }
        fallback
    });

    let id = props
        .identifier("id")
        .or_else(|| feature.get("id").and_then(scalar_id))
        .unwrap_or_else(|| synthesize_id(source, index));

    let name = props
        .text(&NAME_KEYS)
        .map_or_else(|| category.display_name().to_owned(), str::to_owned);

    let details = PointDetails {
        address: props.text(&ADDRESS_KEYS).map(str::to_owned),
        opening_hours: props.text(&OPENING_HOURS_KEYS).map(str::to_owned),
        materials: props.text(&MATERIALS_KEYS).map(str::to_owned),
    };

    Ok(CollectionPoint {
        id,
        name,
        coordinate,
        category,
        details,
    })
}

/// Read a `Point` geometry; GeoJSON stores `[longitude, latitude]`.
fn point_coordinate(index: usize, geometry: Option<&Value>) -> Result<Coordinate, ParseError> {
    let Some(Value::Object(geometry)) = geometry else {
        return Err(ParseError::MissingGeometry { index });
    };

    if let Some(kind) = geometry.get("type") {
        match kind {
            Value::String(kind) if kind == "Point" => {}
            Value::String(kind) => {
                return Err(ParseError::NotAPoint {
                    index,
                    kind: kind.clone(),
                });
            }
            other => {
                return Err(ParseError::NotAPoint {
                    index,
                    kind: other.to_string(),
                });
            }
        }
    }

    let pair = geometry
        .get("coordinates")
        .and_then(Value::as_array)
        .map(Vec::as_slice);
    let Some([lng, lat]) = pair else {
        return Err(ParseError::InvalidCoordinates { index });
    };
    let (Some(lng), Some(lat)) = (lng.as_f64(), lat.as_f64()) else {
        return Err(ParseError::InvalidCoordinates { index });
    };

    Coordinate::new(lat, lng).map_err(|source| ParseError::OutOfRange { index, source })
}

fn synthesize_id(source: Option<&str>, index: usize) -> PointId {
    PointId(format!("{}#{index}", source.unwrap_or_default()))
}

fn scalar_id(value: &Value) -> Option<PointId> {
    match value {
        Value::String(id) if !id.trim().is_empty() => Some(PointId(id.trim().to_owned())),
        Value::Number(id) => Some(PointId(id.to_string())),
        _ => None,
    }
}

/// Read-only view over a feature's `properties` object.
struct Properties<'doc>(Option<&'doc Map<String, Value>>);

impl<'doc> Properties<'doc> {
    /// First non-blank string value among `keys`, trimmed.
    fn text(&self, keys: &[&str]) -> Option<&'doc str> {
        self.texts(keys).next()
    }

    /// Every non-blank string value among `keys`, trimmed, in key order.
    fn texts(&self, keys: &[&str]) -> impl Iterator<Item = &'doc str> {
        let props = self.0;
        keys.iter()
            .filter_map(move |key| props?.get(*key).and_then(Value::as_str))
            .map(str::trim)
            .filter(|value| !value.is_empty())
    }

    fn identifier(&self, key: &str) -> Option<PointId> {
        self.0?.get(key).and_then(scalar_id)
    }

    fn schema_hint(&self) -> Option<CollectionType> {
        SCHEMA_HINTS
            .iter()
            .find(|(key, _)| self.text(&[*key]).is_some())
            .map(|(_, kind)| *kind)
    }
}
