use formats::{Dataset, DatasetSource, LoadError, fetch_dataset};
use tracing::{error, info};

/// Outcome of the joined dataset loads. A failed load leaves its slot empty.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct LoadedDatasets {
    pub renewable: Option<Dataset>,
    pub fossil: Option<Dataset>,
}

/// Fetches both datasets concurrently and returns once both have settled.
pub async fn load_both(
    renewable: &DatasetSource,
    fossil: &DatasetSource,
    http: &reqwest::Client,
) -> LoadedDatasets {
    let (ren, fos) = tokio::join!(
        fetch_dataset(renewable, http),
        fetch_dataset(fossil, http)
    );
    LoadedDatasets {
        renewable: settle("renewable", renewable, ren),
        fossil: settle("fossil", fossil, fos),
    }
}

fn settle(
    kind: &'static str,
    source: &DatasetSource,
    result: Result<Dataset, LoadError>,
) -> Option<Dataset> {
    match result {
        Ok(ds) => {
            info!(
                kind,
                source = %source,
                features = ds.features.len(),
                content_hash = %ds.content_hash,
                "dataset loaded"
            );
            Some(ds)
        }
        Err(err) => {
            error!(kind, source = %source, "dataset load failed: {err}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::load_both;
    use formats::DatasetSource;
    use std::io::Write;

    #[tokio::test]
    async fn one_failed_source_leaves_the_other_loaded() {
        let mut file = tempfile::NamedTempFile::new().expect("tempfile");
        write!(
            file,
            r#"{{"type": "FeatureCollection", "features": [
                {{"type": "Feature", "properties": {{"Country": "A", "perc_ren_2002": 4}},
                  "geometry": {{"type": "Point", "coordinates": [1.0, 2.0]}}}}
            ]}}"#
        )
        .expect("write");

        let loaded = load_both(
            &DatasetSource::File(file.path().to_path_buf()),
            &DatasetSource::parse("/missing/percentFosFuels.geojson"),
            &reqwest::Client::new(),
        )
        .await;

        assert_eq!(loaded.renewable.map(|d| d.features.len()), Some(1));
        assert!(loaded.fossil.is_none());
    }
}
