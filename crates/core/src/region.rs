//! Administrative region model, payload normalisation and offline fallback.
//!
//! Regions form a two-level hierarchy: provinces at the top and
//! cities/regencies ("sub-regions") keyed by their parent province id. Both
//! levels share the same `{ id, name }` shape.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Model
// ---------------------------------------------------------------------------

/// A province or a city/regency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    pub id: String,
    pub name: String,
}

/// A city/regency scoped under a parent [`Region`].
pub type SubRegion = Region;

impl Region {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Longest region id accepted from clients.
pub const MAX_REGION_ID_LEN: usize = 32;

/// Region ids are ASCII letters and digits only, so they are safe to embed
/// in an upstream URL path.
pub fn validate_region_id(id: &str) -> Result<(), CoreError> {
    let valid = !id.is_empty()
        && id.len() <= MAX_REGION_ID_LEN
        && id.bytes().all(|b| b.is_ascii_alphanumeric());
    if valid {
        Ok(())
    } else {
        Err(CoreError::Validation(format!("Invalid region id: {id:?}")))
    }
}

// ---------------------------------------------------------------------------
// Offline fallback
// ---------------------------------------------------------------------------

/// The 38 Indonesian provinces served when the region API is unavailable.
pub const FALLBACK_REGIONS: &[(&str, &str)] = &[
    ("11", "ACEH"),
    ("12", "SUMATERA UTARA"),
    ("13", "SUMATERA BARAT"),
    ("14", "RIAU"),
    ("15", "JAMBI"),
    ("16", "SUMATERA SELATAN"),
    ("17", "BENGKULU"),
    ("18", "LAMPUNG"),
    ("19", "KEPULAUAN BANGKA BELITUNG"),
    ("21", "KEPULAUAN RIAU"),
    ("31", "DKI JAKARTA"),
    ("32", "JAWA BARAT"),
    ("33", "JAWA TENGAH"),
    ("34", "DAERAH ISTIMEWA YOGYAKARTA"),
    ("35", "JAWA TIMUR"),
    ("36", "BANTEN"),
    ("51", "BALI"),
    ("52", "NUSA TENGGARA BARAT"),
    ("53", "NUSA TENGGARA TIMUR"),
    ("61", "KALIMANTAN BARAT"),
    ("62", "KALIMANTAN TENGAH"),
    ("63", "KALIMANTAN SELATAN"),
    ("64", "KALIMANTAN TIMUR"),
    ("65", "KALIMANTAN UTARA"),
    ("71", "SULAWESI UTARA"),
    ("72", "SULAWESI TENGAH"),
    ("73", "SULAWESI SELATAN"),
    ("74", "SULAWESI TENGGARA"),
    ("75", "GORONTALO"),
    ("76", "SULAWESI BARAT"),
    ("81", "MALUKU"),
    ("82", "MALUKU UTARA"),
    ("91", "PAPUA"),
    ("92", "PAPUA BARAT"),
    ("93", "PAPUA SELATAN"),
    ("94", "PAPUA TENGAH"),
    ("95", "PAPUA PEGUNUNGAN"),
    ("96", "PAPUA BARAT DAYA"),
];

/// Build the fallback province list in its declared (id) order.
pub fn fallback_regions() -> Vec<Region> {
    FALLBACK_REGIONS
        .iter()
        .map(|(id, name)| Region::new(*id, *name))
        .collect()
}

// ---------------------------------------------------------------------------
// Payload normalisation
// ---------------------------------------------------------------------------

/// Normalise a region API payload into a list of [`Region`]s.
///
/// Accepts either `{ "data": [...] }` or a bare array. Each entry reads its
/// id from `id` (or `kode`) and its name from `nama` (or `name`). Ids may be
/// strings or numbers. Entries without any id are skipped; a missing name
/// becomes an empty string.
pub fn normalize_payload(payload: &serde_json::Value) -> Result<Vec<Region>, CoreError> {
    let items = match payload {
        serde_json::Value::Array(items) => items,
        serde_json::Value::Object(obj) => obj
            .get("data")
            .and_then(|data| data.as_array())
            .ok_or_else(|| {
                CoreError::Parse("expected a `data` array in region payload".to_string())
            })?,
        other => {
            return Err(CoreError::Parse(format!(
                "expected an array or object region payload, got {}",
                json_kind(other)
            )))
        }
    };

    let regions = items
        .iter()
        .filter_map(|item| {
            let obj = item.as_object()?;
            let id = ["id", "kode"]
                .iter()
                .find_map(|key| obj.get(*key).and_then(scalar_to_string))?;
            let name = ["nama", "name"]
                .iter()
                .find_map(|key| obj.get(*key).and_then(|v| v.as_str()))
                .unwrap_or_default()
                .to_string();
            Some(Region { id, name })
        })
        .collect();

    Ok(regions)
}

/// Render a JSON string or number as an id; anything else (including an
/// empty string) is treated as absent.
fn scalar_to_string(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) if !s.is_empty() => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

// ---------------------------------------------------------------------------
// Presentation helpers
// ---------------------------------------------------------------------------

/// Compare two display names the way a locale-aware collator would for the
/// region data set: case-insensitive first, raw code points as tie-break.
pub fn collate_names(a: &str, b: &str) -> Ordering {
    let primary = a
        .chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase));
    primary.then_with(|| a.cmp(b))
}

/// Return a copy of `regions` sorted by name. The input is left untouched.
pub fn sorted_by_name(regions: &[Region]) -> Vec<Region> {
    let mut sorted = regions.to_vec();
    sorted.sort_by(|a, b| collate_names(&a.name, &b.name));
    sorted
}

/// Look up a region's name by id, returning `""` when absent.
pub fn find_name<'a>(regions: &'a [Region], id: &str) -> &'a str {
    regions
        .iter()
        .find(|r| r.id == id)
        .map(|r| r.name.as_str())
        .unwrap_or("")
}

/// Case-insensitive substring match on the region name.
pub fn name_matches(region: &Region, keyword: &str) -> bool {
    region.name.to_lowercase().contains(&keyword.to_lowercase())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use serde_json::json;

    #[test]
    fn region_ids_are_alphanumeric() {
        assert!(validate_region_id("32").is_ok());
        assert!(validate_region_id("3273").is_ok());
        let long = "9".repeat(MAX_REGION_ID_LEN + 1);
        for bad in ["", "../provinsi", "32/..", "32.json", "3 2", "%2e%2e", long.as_str()] {
            assert_matches!(validate_region_id(bad), Err(CoreError::Validation(_)), "{bad}");
        }
    }

    #[test]
    fn wrapped_and_bare_payloads_normalise_identically() {
        let bare = json!([
            {"id": "11", "nama": "ACEH"},
            {"id": "12", "nama": "SUMATERA UTARA"}
        ]);
        let wrapped = json!({"data": [
            {"id": "11", "nama": "ACEH"},
            {"id": "12", "nama": "SUMATERA UTARA"}
        ]});

        let a = normalize_payload(&bare).unwrap();
        let b = normalize_payload(&wrapped).unwrap();
        assert_eq!(a, b);
        assert_eq!(a[1], Region::new("12", "SUMATERA UTARA"));
    }

    #[test]
    fn alternate_keys_and_numeric_ids_accepted() {
        let payload = json!([
            {"kode": 3201, "name": "KABUPATEN BOGOR"},
            {"id": "3273", "kode": "ignored", "nama": "KOTA BANDUNG"}
        ]);
        let regions = normalize_payload(&payload).unwrap();
        assert_eq!(regions[0], Region::new("3201", "KABUPATEN BOGOR"));
        assert_eq!(regions[1], Region::new("3273", "KOTA BANDUNG"));
    }

    #[test]
    fn entries_without_id_are_skipped() {
        let payload = json!([{"nama": "NO ID"}, {"id": "1"}, 42]);
        let regions = normalize_payload(&payload).unwrap();
        assert_eq!(regions, vec![Region::new("1", "")]);
    }

    #[test]
    fn unexpected_shapes_are_parse_errors() {
        assert_matches!(normalize_payload(&json!("nope")), Err(CoreError::Parse(_)));
        assert_matches!(normalize_payload(&json!({"rows": []})), Err(CoreError::Parse(_)));
        assert_matches!(normalize_payload(&json!(null)), Err(CoreError::Parse(_)));
    }

    #[test]
    fn fallback_has_38_provinces_with_unique_ids() {
        let regions = fallback_regions();
        assert_eq!(regions.len(), 38);
        let mut ids: Vec<_> = regions.iter().map(|r| r.id.clone()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 38);
    }

    #[test]
    fn sorted_fallback_matches_reference_ordering() {
        let names: Vec<String> = sorted_by_name(&fallback_regions())
            .into_iter()
            .map(|r| r.name)
            .collect();
        let expected = [
            "ACEH",
            "BALI",
            "BANTEN",
            "BENGKULU",
            "DAERAH ISTIMEWA YOGYAKARTA",
            "DKI JAKARTA",
            "GORONTALO",
            "JAMBI",
            "JAWA BARAT",
            "JAWA TENGAH",
            "JAWA TIMUR",
            "KALIMANTAN BARAT",
            "KALIMANTAN SELATAN",
            "KALIMANTAN TENGAH",
            "KALIMANTAN TIMUR",
            "KALIMANTAN UTARA",
            "KEPULAUAN BANGKA BELITUNG",
            "KEPULAUAN RIAU",
            "LAMPUNG",
            "MALUKU",
            "MALUKU UTARA",
            "NUSA TENGGARA BARAT",
            "NUSA TENGGARA TIMUR",
            "PAPUA",
            "PAPUA BARAT",
            "PAPUA BARAT DAYA",
            "PAPUA PEGUNUNGAN",
            "PAPUA SELATAN",
            "PAPUA TENGAH",
            "RIAU",
            "SULAWESI BARAT",
            "SULAWESI SELATAN",
            "SULAWESI TENGAH",
            "SULAWESI TENGGARA",
            "SULAWESI UTARA",
            "SUMATERA BARAT",
            "SUMATERA SELATAN",
            "SUMATERA UTARA",
        ];
        assert_eq!(names, expected);
    }

    #[test]
    fn sort_is_case_insensitive_and_leaves_input_untouched() {
        let input = vec![
            Region::new("1", "kota Zeta"),
            Region::new("2", "Kota alpha"),
            Region::new("3", "KOTA BETA"),
        ];
        let sorted = sorted_by_name(&input);
        let names: Vec<_> = sorted.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["Kota alpha", "KOTA BETA", "kota Zeta"]);
        assert_eq!(input[0].id, "1");
    }

    #[test]
    fn find_name_returns_empty_when_missing() {
        let regions = fallback_regions();
        assert_eq!(find_name(&regions, "32"), "JAWA BARAT");
        assert_eq!(find_name(&regions, "99"), "");
    }

    #[test]
    fn name_matching_ignores_case() {
        let region = Region::new("51", "BALI");
        assert!(name_matches(&region, "bal"));
        assert!(!name_matches(&region, "java"));
    }
}
