use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::annotation::Point;
use crate::error::{Error, Result};
use crate::store::AnnotationStore;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnnotationRecord {
    pub points: Vec<Point>,
    pub label: String,
}

/// On-disk form: `{ "annotations": [ { "points": [[x, y], ...], "label": ... } ] }`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnnotationDocument {
    pub annotations: Vec<AnnotationRecord>,
}

impl AnnotationDocument {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Serializes fully before touching `path`, so a failed encode writes nothing.
    pub fn write_to(&self, path: &Path) -> Result<()> {
        let data = self.to_json()?;
        std::fs::write(path, data).map_err(|source| Error::FileIo {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!(
            "saved {} annotations to {}",
            self.annotations.len(),
            path.display()
        );
        Ok(())
    }
}

pub fn export(store: &AnnotationStore) -> Result<AnnotationDocument> {
    if store.is_empty() {
        return Err(Error::NothingToExport);
    }
    let annotations = store
        .all()
        .iter()
        .map(|annotation| AnnotationRecord {
            points: annotation.polygon.points().to_vec(),
            label: annotation.label.clone(),
        })
        .collect();
    Ok(AnnotationDocument { annotations })
}

#[cfg(test)]
pub fn read_document(path: &Path) -> Result<AnnotationDocument> {
    let data = std::fs::read_to_string(path).map_err(|source| Error::FileIo {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(serde_json::from_str(&data)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::{Annotation, Polygon};

    fn store_with(labels: &[&str]) -> AnnotationStore {
        let mut store = AnnotationStore::default();
        for (i, label) in labels.iter().enumerate() {
            let o = i as f32 * 0.5;
            let points = vec![
                Point::new(o, 1.25),
                Point::new(o + 100.0, 1.25),
                Point::new(o + 100.0, 99.75),
            ];
            store.commit(Annotation {
                polygon: Polygon::new(points, 3).unwrap(),
                label: (*label).to_owned(),
            });
        }
        store
    }

    #[test]
    fn empty_store_exports_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");

        let result = export(&AnnotationStore::default()).and_then(|doc| doc.write_to(&path));
        assert!(matches!(result, Err(Error::NothingToExport)));
        assert!(!path.exists());
    }

    #[test]
    fn document_layout() {
        let doc = export(&store_with(&["Box"])).unwrap();
        let value: serde_json::Value = serde_json::from_str(&doc.to_json().unwrap()).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "annotations": [
                    { "points": [[0.0, 1.25], [100.0, 1.25], [100.0, 99.75]], "label": "Box" }
                ]
            })
        );
    }

    #[test]
    fn file_round_trip_keeps_order() {
        let store = store_with(&["Car", "Tree", "Car"]);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("annotations.json");

        export(&store).unwrap().write_to(&path).unwrap();
        let back = read_document(&path).unwrap();

        assert_eq!(back.annotations.len(), 3);
        for (record, annotation) in back.annotations.iter().zip(store.all()) {
            assert_eq!(record.label, annotation.label);
            assert_eq!(record.points, annotation.polygon.points());
        }
    }

    #[test]
    fn unwritable_destination_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.json");
        let err = export(&store_with(&["Box"]))
            .unwrap()
            .write_to(&path)
            .unwrap_err();
        assert!(matches!(err, Error::FileIo { .. }));
    }
}
