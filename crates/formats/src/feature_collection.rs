use foundation::GeoPoint;
use serde_json::{Map, Value};

/// One country-level data point with its ordered properties.
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    pub id: Option<String>,
    pub properties: Map<String, Value>,
    /// `None` for null or non-point geometries.
    pub position: Option<GeoPoint>,
}

impl Feature {
    pub fn has(&self, key: &str) -> bool {
        self.properties.contains_key(key)
    }

    /// Numeric value of `key`, coerced the way the source data is read in a browser:
    /// `null` and blank strings are 0, booleans are 0 or 1, numeric strings parse.
    /// `None` for a missing key, non-numeric text, arrays and objects.
    pub fn number(&self, key: &str) -> Option<f64> {
        match self.properties.get(key)? {
            Value::Number(n) => n.as_f64(),
            Value::Null => Some(0.0),
            Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            Value::String(s) if s.trim().is_empty() => Some(0.0),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            Value::Array(_) | Value::Object(_) => None,
        }
    }

    /// Display text of `key`.
    pub fn text(&self, key: &str) -> Option<String> {
        match self.properties.get(key)? {
            Value::String(s) => Some(s.clone()),
            Value::Null => None,
            other => Some(other.to_string()),
        }
    }
}

/// A loaded GeoJSON FeatureCollection.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub name: String,
    pub features: Vec<Feature>,
    /// blake3 hex digest of the source document.
    pub content_hash: String,
}

#[derive(Debug)]
pub enum DatasetError {
    InvalidJson(String),
    NotAFeatureCollection,
    InvalidFeature { index: usize, reason: String },
}

impl std::fmt::Display for DatasetError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DatasetError::InvalidJson(msg) => write!(f, "JSON parse error: {msg}"),
            DatasetError::NotAFeatureCollection => {
                write!(f, "expected GeoJSON FeatureCollection")
            }
            DatasetError::InvalidFeature { index, reason } => {
                write!(f, "invalid feature at index {index}: {reason}")
            }
        }
    }
}

impl std::error::Error for DatasetError {}

impl Dataset {
    pub fn from_geojson_bytes(name: impl Into<String>, bytes: &[u8]) -> Result<Self, DatasetError> {
        let value: Value =
            serde_json::from_slice(bytes).map_err(|e| DatasetError::InvalidJson(e.to_string()))?;
        let features = parse_features(&value)?;
        Ok(Self {
            name: name.into(),
            features,
            content_hash: blake3::hash(bytes).to_hex().to_string(),
        })
    }

    pub fn from_geojson_str(name: impl Into<String>, payload: &str) -> Result<Self, DatasetError> {
        Self::from_geojson_bytes(name, payload.as_bytes())
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn first(&self) -> Option<&Feature> {
        self.features.first()
    }
}

fn parse_features(value: &Value) -> Result<Vec<Feature>, DatasetError> {
    let obj = value.as_object().ok_or(DatasetError::NotAFeatureCollection)?;
    let ty = obj
        .get("type")
        .and_then(|v| v.as_str())
        .ok_or(DatasetError::NotAFeatureCollection)?;
    if ty != "FeatureCollection" {
        return Err(DatasetError::NotAFeatureCollection);
    }

    let features_val = obj
        .get("features")
        .and_then(|v| v.as_array())
        .ok_or(DatasetError::NotAFeatureCollection)?;

    let mut features = Vec::with_capacity(features_val.len());
    for (index, feat_val) in features_val.iter().enumerate() {
        let feat_obj = feat_val.as_object().ok_or(DatasetError::InvalidFeature {
            index,
            reason: "feature must be an object".to_string(),
        })?;

        let feat_type = feat_obj.get("type").and_then(|v| v.as_str()).ok_or(
            DatasetError::InvalidFeature {
                index,
                reason: "feature missing type".to_string(),
            },
        )?;
        if feat_type != "Feature" {
            return Err(DatasetError::InvalidFeature {
                index,
                reason: format!("unexpected feature type: {feat_type}"),
            });
        }

        let id = match feat_obj.get("id") {
            Some(Value::String(s)) => Some(s.clone()),
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        };

        let properties = feat_obj
            .get("properties")
            .and_then(|v| v.as_object())
            .cloned()
            .unwrap_or_default();

        let position = match feat_obj.get("geometry") {
            None | Some(Value::Null) => None,
            Some(geometry) => parse_point(geometry)
                .map_err(|reason| DatasetError::InvalidFeature { index, reason })?,
        };

        features.push(Feature {
            id,
            properties,
            position,
        });
    }

    Ok(features)
}

fn parse_point(geometry: &Value) -> Result<Option<GeoPoint>, String> {
    let obj = geometry
        .as_object()
        .ok_or_else(|| "geometry must be an object".to_string())?;
    let ty = obj
        .get("type")
        .and_then(|v| v.as_str())
        .ok_or_else(|| "geometry missing type".to_string())?;

    match ty {
        "Point" => {
            let coords = obj
                .get("coordinates")
                .and_then(|v| v.as_array())
                .ok_or_else(|| "point missing coordinates".to_string())?;
            let lon = coords.first().and_then(|v| v.as_f64());
            let lat = coords.get(1).and_then(|v| v.as_f64());
            match (lon, lat) {
                (Some(lon), Some(lat)) => Ok(Some(GeoPoint::new(lon, lat))),
                _ => Err("point coordinates must be [lon, lat]".to_string()),
            }
        }
        "MultiPoint" | "LineString" | "MultiLineString" | "Polygon" | "MultiPolygon"
        | "GeometryCollection" => Ok(None),
        other => Err(format!("unknown geometry type: {other}")),
    }
}

#[cfg(test)]
mod tests {
    use super::{Dataset, DatasetError};
    use foundation::GeoPoint;
    use pretty_assertions::assert_eq;

    const SAMPLE: &str = r#"{
      "type": "FeatureCollection",
      "features": [
        {"type": "Feature", "id": 7,
         "properties": {"perc_ren_2010": 12.5, "Country": "Norway", "perc_ren_2002": "10.25"},
         "geometry": {"type": "Point", "coordinates": [10.0, 61.0]}},
        {"type": "Feature",
         "properties": {"Country": "Nowhere"},
         "geometry": {"type": "Polygon", "coordinates": [[[0,0],[1,0],[1,1],[0,0]]]}},
        {"type": "Feature", "properties": {"Country": "Null Island"}, "geometry": null}
      ]
    }"#;

    #[test]
    fn parses_points_and_keeps_property_order() {
        let ds = Dataset::from_geojson_str("sample", SAMPLE).expect("parse");
        assert_eq!(ds.features.len(), 3);

        let first = &ds.features[0];
        assert_eq!(first.id.as_deref(), Some("7"));
        assert_eq!(first.position, Some(GeoPoint::new(10.0, 61.0)));
        let keys: Vec<&str> = first.properties.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["perc_ren_2010", "Country", "perc_ren_2002"]);
    }

    #[test]
    fn reads_numbers_and_numeric_strings() {
        let ds = Dataset::from_geojson_str("sample", SAMPLE).expect("parse");
        let first = &ds.features[0];
        assert_eq!(first.number("perc_ren_2010"), Some(12.5));
        assert_eq!(first.number("perc_ren_2002"), Some(10.25));
        assert_eq!(first.number("Country"), None);
        assert_eq!(first.number("perc_ren_1999"), None);
        assert_eq!(first.text("Country").as_deref(), Some("Norway"));
        assert!(first.has("perc_ren_2010"));
    }

    #[test]
    fn null_blank_and_boolean_values_coerce() {
        let ds = Dataset::from_geojson_str(
            "coerce",
            r#"{"type": "FeatureCollection", "features": [
                {"type": "Feature",
                 "properties": {"a": null, "b": "", "c": true, "d": false, "e": [1], "f": "n/a"},
                 "geometry": null}
            ]}"#,
        )
        .expect("parse");
        let f = &ds.features[0];
        assert_eq!(f.number("a"), Some(0.0));
        assert_eq!(f.number("b"), Some(0.0));
        assert_eq!(f.number("c"), Some(1.0));
        assert_eq!(f.number("d"), Some(0.0));
        assert_eq!(f.number("e"), None);
        assert_eq!(f.number("f"), None);
    }

    #[test]
    fn non_point_geometries_have_no_position() {
        let ds = Dataset::from_geojson_str("sample", SAMPLE).expect("parse");
        assert_eq!(ds.features[1].position, None);
        assert_eq!(ds.features[2].position, None);
    }

    #[test]
    fn content_hash_is_stable() {
        let a = Dataset::from_geojson_str("a", SAMPLE).expect("parse");
        let b = Dataset::from_geojson_str("b", SAMPLE).expect("parse");
        assert_eq!(a.content_hash, b.content_hash);
        assert_eq!(a.content_hash.len(), 64);
    }

    #[test]
    fn rejects_other_documents() {
        let err = Dataset::from_geojson_str("x", r#"{"type": "Feature"}"#).unwrap_err();
        assert!(matches!(err, DatasetError::NotAFeatureCollection));

        let err = Dataset::from_geojson_str("x", "not json").unwrap_err();
        assert!(matches!(err, DatasetError::InvalidJson(_)));
    }

    #[test]
    fn reports_index_of_bad_feature() {
        let payload = r#"{"type": "FeatureCollection", "features": [
            {"type": "Feature", "properties": {}, "geometry": null},
            {"type": "Feature", "properties": {}, "geometry": {"type": "Point", "coordinates": [1]}}
        ]}"#;
        match Dataset::from_geojson_str("x", payload) {
            Err(DatasetError::InvalidFeature { index, .. }) => assert_eq!(index, 1),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn empty_collection_is_valid() {
        let ds = Dataset::from_geojson_str("x", r#"{"type": "FeatureCollection", "features": []}"#)
            .expect("parse");
        assert!(ds.is_empty());
        assert!(ds.first().is_none());
    }
}
