//! Category resolution for collection points.
//!
//! Classification happens in two tiers: a document-wide default inferred from
//! the source identifier, and a per-feature override read from the feature's
//! properties. Neither tier ever fails; unknown input falls back.

use crate::model::CollectionType;

/// Property keys holding an explicit category, in lookup order.
pub const CATEGORY_KEYS: [&str; 5] = ["type", "category", "tipo", "Tipo", "categoria"];

/// Dataset-specific name fields that imply the category of the feature.
pub const SCHEMA_HINTS: [(&str, CollectionType); 4] = [
    ("nm_ecoponto", CollectionType::Recyclable),
    ("nm_patio_compostagem", CollectionType::Organic),
    ("nm_local", CollectionType::DropOff),
    ("nm_cooperativa", CollectionType::Cooperative),
];

/// Category named by a source identifier, if any of its keywords occur in it.
///
/// The identifier is usually a file name such as `ecopontos_2024.geojson`.
/// Matching is a case-insensitive substring search over each category's
/// keywords, first hit wins.
#[must_use]
pub fn source_keyword(source: Option<&str>) -> Option<CollectionType> {
    let name = source?.to_lowercase();

    CollectionType::ALL
        .into_iter()
        .find(|kind| kind.matches_keyword(&name))
}

/// Infer the default category of a whole document from its source identifier.
///
/// Same as [`source_keyword`], yielding [`CollectionType::FALLBACK`] when no
/// keyword matches.
#[must_use]
pub fn infer_from_source(source: Option<&str>) -> CollectionType {
    source_keyword(source).unwrap_or(CollectionType::FALLBACK)
}

/// First value among `candidates` that names a category.
///
/// Blank and unrecognized values are skipped, so a category under a later key
/// still counts when an earlier key holds something else.
#[must_use]
pub fn first_recognized<I>(candidates: I) -> Option<CollectionType>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    candidates
        .into_iter()
        .find_map(|value| value.as_ref().parse().ok())
}

/// Resolve a raw category value against the enumeration.
///
/// `None`, blank, or unrecognized values return `fallback`.
#[must_use]
pub fn resolve_category(raw: Option<&str>, fallback: CollectionType) -> CollectionType {
    raw.and_then(|value| value.parse().ok()).unwrap_or(fallback)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_keywords_pick_category() {
        assert_eq!(
            infer_from_source(Some("recycling_points.geojson")),
            CollectionType::Recyclable
        );
        assert_eq!(
            infer_from_source(Some("ECOPONTOS.GEOJSON")),
            CollectionType::Recyclable
        );
        assert_eq!(
            infer_from_source(Some("patio_compostagem.geojson")),
            CollectionType::Organic
        );
        assert_eq!(
            infer_from_source(Some("Hazardous-Sites.json")),
            CollectionType::Hazardous
        );
        assert_eq!(
            infer_from_source(Some("cooperativas_de_triagem.geojson")),
            CollectionType::Cooperative
        );
        assert_eq!(
            infer_from_source(Some("ponto_entrega_voluntaria.geojson")),
            CollectionType::DropOff
        );
    }

    #[test]
    fn unmatched_source_uses_fallback() {
        assert_eq!(infer_from_source(Some("points.geojson")), CollectionType::DropOff);
        assert_eq!(infer_from_source(Some("")), CollectionType::DropOff);
        assert_eq!(infer_from_source(None), CollectionType::DropOff);
    }

    #[test]
    fn source_keyword_is_none_without_match() {
        assert_eq!(source_keyword(Some("points.geojson")), None);
        assert_eq!(source_keyword(None), None);
        assert_eq!(
            source_keyword(Some("ecopontos_2024.geojson")),
            Some(CollectionType::Recyclable)
        );
    }

    #[test]
    fn first_recognized_skips_unknown_values() {
        assert_eq!(
            first_recognized(["Feature", "", "organic"]),
            Some(CollectionType::Organic)
        );
        assert_eq!(first_recognized(["landfill", "Feature"]), None);
        assert_eq!(first_recognized(Vec::<&str>::new()), None);
    }

    #[test]
    fn explicit_value_overrides_fallback() {
        assert_eq!(
            resolve_category(Some("organic"), CollectionType::Recyclable),
            CollectionType::Organic
        );
        assert_eq!(
            resolve_category(Some("Hazardous-Waste"), CollectionType::DropOff),
            CollectionType::Hazardous
        );
        assert_eq!(
            resolve_category(Some("Pátio de Compostagem"), CollectionType::DropOff),
            CollectionType::Organic
        );
    }

    #[test]
    fn unknown_value_degrades_to_fallback() {
        for raw in [None, Some(""), Some("   "), Some("landfill")] {
            assert_eq!(
                resolve_category(raw, CollectionType::Cooperative),
                CollectionType::Cooperative,
                "{raw:?} should fall back"
            );
        }
    }
}
