use serde::{Deserialize, Serialize};

use crate::feature_collection::Dataset;

/// How year-indexed attribute names are spelled, e.g. `perc_ren_2004`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttributeSchema {
    /// Substring that marks an animatable attribute.
    pub marker: String,
    pub separator: char,
    /// Position of the year among the `separator`-split tokens.
    pub year_position: usize,
}

impl Default for AttributeSchema {
    fn default() -> Self {
        Self {
            marker: "perc_".to_string(),
            separator: '_',
            year_position: 2,
        }
    }
}

impl AttributeSchema {
    pub fn year_token<'a>(&self, attribute: &'a str) -> Option<&'a str> {
        attribute
            .split(self.separator)
            .nth(self.year_position)
            .filter(|t| !t.is_empty())
    }
}

/// Attribute names of the first feature that carry the schema marker, in document order.
pub fn extract_attributes(dataset: &Dataset, schema: &AttributeSchema) -> Vec<String> {
    let Some(first) = dataset.first() else {
        return Vec::new();
    };
    first
        .properties
        .keys()
        .filter(|k| k.contains(schema.marker.as_str()))
        .cloned()
        .collect()
}

/// The renewable and fossil attribute shown for one year.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributePair {
    pub year: Option<String>,
    pub renewable: Option<String>,
    pub fossil: Option<String>,
}

/// Ordered (renewable, fossil) attribute pairs, one per step of the sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributePairs {
    pairs: Vec<AttributePair>,
}

impl AttributePairs {
    /// Matches the two lists by year token. The renewable list drives the order when it
    /// has entries, otherwise the fossil list does. Keys without a year pair by position.
    pub fn build(
        renewable: Option<&[String]>,
        fossil: Option<&[String]>,
        schema: &AttributeSchema,
    ) -> Self {
        let renewable = renewable.unwrap_or(&[]);
        let fossil = fossil.unwrap_or(&[]);

        let pairs = if !renewable.is_empty() {
            renewable
                .iter()
                .enumerate()
                .map(|(pos, key)| AttributePair {
                    year: schema.year_token(key).map(str::to_string),
                    renewable: Some(key.clone()),
                    fossil: counterpart(key, pos, fossil, schema),
                })
                .collect()
        } else {
            fossil
                .iter()
                .map(|key| AttributePair {
                    year: schema.year_token(key).map(str::to_string),
                    renewable: None,
                    fossil: Some(key.clone()),
                })
                .collect()
        };

        Self { pairs }
    }

    pub fn from_pairs(pairs: Vec<AttributePair>) -> Self {
        Self { pairs }
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&AttributePair> {
        self.pairs.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &AttributePair> {
        self.pairs.iter()
    }
}

fn counterpart(
    key: &str,
    pos: usize,
    others: &[String],
    schema: &AttributeSchema,
) -> Option<String> {
    match schema.year_token(key) {
        Some(year) => others
            .iter()
            .find(|k| schema.year_token(k) == Some(year))
            .cloned(),
        None => others
            .get(pos)
            .filter(|k| schema.year_token(k).is_none())
            .cloned(),
    }
}

#[cfg(test)]
mod tests {
    use super::{AttributePair, AttributePairs, AttributeSchema, extract_attributes};
    use crate::feature_collection::Dataset;
    use pretty_assertions::assert_eq;

    fn keys(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn extracts_marked_keys_in_document_order() {
        let payload = r#"{"type": "FeatureCollection", "features": [
            {"type": "Feature",
             "properties": {"Country": "A", "perc_ren_2004": 1, "code": "AA", "perc_ren_2002": 2},
             "geometry": null},
            {"type": "Feature", "properties": {"Country": "B", "perc_ren_2009": 3}, "geometry": null}
        ]}"#;
        let ds = Dataset::from_geojson_str("x", payload).expect("parse");
        let attrs = extract_attributes(&ds, &AttributeSchema::default());
        assert_eq!(attrs, keys(&["perc_ren_2004", "perc_ren_2002"]));
    }

    #[test]
    fn empty_dataset_yields_no_attributes() {
        let ds = Dataset::from_geojson_str("x", r#"{"type": "FeatureCollection", "features": []}"#)
            .expect("parse");
        assert!(extract_attributes(&ds, &AttributeSchema::default()).is_empty());
    }

    #[test]
    fn year_token_is_third_field() {
        let schema = AttributeSchema::default();
        assert_eq!(schema.year_token("perc_ren_2004"), Some("2004"));
        assert_eq!(schema.year_token("perc_ff_2012"), Some("2012"));
        assert_eq!(schema.year_token("perc_ren"), None);
    }

    #[test]
    fn pairs_by_year_regardless_of_order() {
        let schema = AttributeSchema::default();
        let ren = keys(&["perc_ren_2002", "perc_ren_2003", "perc_ren_2004"]);
        let fos = keys(&["perc_ff_2004", "perc_ff_2002"]);
        let pairs = AttributePairs::build(Some(ren.as_slice()), Some(fos.as_slice()), &schema);

        assert_eq!(pairs.len(), 3);
        assert_eq!(
            pairs.get(0),
            Some(&AttributePair {
                year: Some("2002".to_string()),
                renewable: Some("perc_ren_2002".to_string()),
                fossil: Some("perc_ff_2002".to_string()),
            })
        );
        assert_eq!(pairs.get(1).and_then(|p| p.fossil.clone()), None);
        assert_eq!(
            pairs.get(2).and_then(|p| p.fossil.clone()).as_deref(),
            Some("perc_ff_2004")
        );
    }

    #[test]
    fn fossil_list_drives_when_renewable_is_missing() {
        let schema = AttributeSchema::default();
        let fos = keys(&["perc_ff_2002", "perc_ff_2003"]);
        let pairs = AttributePairs::build(None, Some(fos.as_slice()), &schema);
        assert_eq!(pairs.len(), 2);
        assert!(pairs.iter().all(|p| p.renewable.is_none()));
        assert_eq!(pairs.get(1).and_then(|p| p.year.clone()).as_deref(), Some("2003"));
    }

    #[test]
    fn keys_without_years_pair_by_position() {
        let schema = AttributeSchema::default();
        let ren = keys(&["perc_ren"]);
        let fos = keys(&["perc_ff"]);
        let pairs = AttributePairs::build(Some(ren.as_slice()), Some(fos.as_slice()), &schema);
        assert_eq!(pairs.get(0).and_then(|p| p.fossil.clone()).as_deref(), Some("perc_ff"));
        assert_eq!(pairs.get(0).and_then(|p| p.year.clone()), None);
    }

    #[test]
    fn nothing_loaded_gives_empty_pairs() {
        let pairs = AttributePairs::build(None, None, &AttributeSchema::default());
        assert!(pairs.is_empty());
        assert!(pairs.get(0).is_none());
    }
}
