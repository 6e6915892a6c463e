//! Annotation records: one target region plus ordered distractor regions per image.
//!
//! On disk the record looks like
//! `{"target": {"points": [[x, y], ...], "description": ".."}, "distractors": [...]}`.
//! `distractors` is always written and may be missing on read.

use crate::error::Error;
use crate::types::{Polygon, Role};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// A polygon plus its free-text description.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Region {
    #[serde(rename = "points")]
    pub polygon: Polygon,
    pub description: String,
}

impl Region {
    pub fn new(polygon: Polygon, description: impl Into<String>) -> Self {
        Self { polygon, description: description.into() }
    }
}

/// Everything annotated on one image.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AnnotationSet {
    pub target: Region,
    pub distractors: Vec<Region>,
}

/// Shape accepted on read; every field optional so missing ones can be reported
/// as a malformed record instead of a generic parse failure.
#[derive(Deserialize)]
struct RawRecord {
    target: Option<RawRegion>,
    #[serde(default)]
    distractors: Vec<RawDistractor>,
}

#[derive(Deserialize)]
struct RawRegion {
    points: Option<Polygon>,
    description: Option<String>,
}

#[derive(Deserialize)]
struct RawDistractor {
    points: Polygon,
    #[serde(default)]
    description: String,
}

impl AnnotationSet {
    /// Assemble a set. Distractor order is kept as given.
    pub fn build(target: Region, distractors: Vec<Region>) -> Self {
        Self { target, distractors }
    }

    /// Parse a serialized record.
    pub fn from_json(text: &str) -> Result<Self, Error> {
        let raw: RawRecord =
            serde_json::from_str(text).map_err(|e| Error::MalformedRecord(e.to_string()))?;

        let target = raw
            .target
            .ok_or_else(|| Error::MalformedRecord("missing `target`".into()))?;
        let points = target
            .points
            .ok_or_else(|| Error::MalformedRecord("missing `target.points`".into()))?;
        let description = target
            .description
            .ok_or_else(|| Error::MalformedRecord("missing `target.description`".into()))?;

        let distractors = raw
            .distractors
            .into_iter()
            .map(|d| Region::new(d.points, d.description))
            .collect();

        Ok(Self::build(Region::new(points, description), distractors))
    }

    /// Serialize with a 4-space indent.
    pub fn to_json(&self) -> Result<String, Error> {
        let mut out = Vec::new();
        let fmt = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut out, fmt);
        self.serialize(&mut ser)?;
        // serde_json only ever writes UTF-8
        Ok(String::from_utf8_lossy(&out).into_owned())
    }

    pub fn load(path: &Path) -> Result<Self, Error> {
        let text = fs::read_to_string(path)?;
        let set = Self::from_json(&text)?;
        log::info!(
            "Annotations loaded from {} (target: {} pts, {} distractor(s))",
            path.display(),
            set.target.polygon.len(),
            set.distractors.len()
        );
        Ok(set)
    }

    pub fn save(&self, path: &Path) -> Result<(), Error> {
        fs::write(path, self.to_json()?)?;
        log::info!("Annotations saved to {}", path.display());
        Ok(())
    }

    /// Committed polygons with their roles, for drawing as background.
    pub fn overlays(&self) -> Vec<(&Polygon, Role)> {
        std::iter::once((&self.target.polygon, Role::Target))
            .chain(self.distractors.iter().map(|d| (&d.polygon, Role::Distractor)))
            .collect()
    }
}
