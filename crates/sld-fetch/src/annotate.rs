//! OCD-ID annotation of SLD GeoJSON.
//!
//! Joins each district feature against the Open Civic Data lookup tables
//! and rewrites its properties to `{ ocdid, type, state }`. The combined
//! national file is large, so features are streamed one at a time instead
//! of loading the whole collection.

use std::collections::HashMap;
use std::fmt;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use serde::de::{self, DeserializeSeed, IgnoredAny, MapAccess, SeqAccess, Visitor};
use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::jurisdictions::by_fips;
use crate::storage::replace_file;
use crate::types::{Chamber, SldError, SldResult};

/// Written before the first feature.
const COLLECTION_OPEN: &str = "{ \"type\": \"FeatureCollection\", \"features\": [\n";
/// Written between features.
const FEATURE_SEPARATOR: &str = "\n,\n";
/// Written after the last feature.
const COLLECTION_CLOSE: &str = "]}";

const ID_COLUMN: &str = "id";
const GEOID_COLUMN: &str = "census_geoid_14";

type Feature = Map<String, Value>;

/// Census GEOID → OCD-ID lookup for both chambers.
#[derive(Debug, Clone, Default)]
pub struct OcdIdIndex {
    sldu: HashMap<String, String>,
    sldl: HashMap<String, String>,
}

impl OcdIdIndex {
    /// Load both lookup tables from CSV files.
    pub fn from_paths(sldu_csv: &Path, sldl_csv: &Path) -> SldResult<Self> {
        let sldu = File::open(sldu_csv).map_err(|e| SldError::io(sldu_csv, e))?;
        let sldl = File::open(sldl_csv).map_err(|e| SldError::io(sldl_csv, e))?;
        Self::from_readers(sldu, sldl)
    }

    /// Load both lookup tables from CSV readers with a header row.
    pub fn from_readers<U: Read, L: Read>(sldu: U, sldl: L) -> SldResult<Self> {
        Ok(Self {
            sldu: load_table(sldu)?,
            sldl: load_table(sldl)?,
        })
    }

    /// Resolve a prefixed GEOID such as `sldu-06001`. Upper chamber rows
    /// take precedence over lower chamber rows.
    pub fn lookup(&self, geoid: &str) -> Option<&str> {
        self.sldu
            .get(geoid)
            .or_else(|| self.sldl.get(geoid))
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.sldu.len() + self.sldl.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn load_table<R: Read>(reader: R) -> SldResult<HashMap<String, String>> {
    let mut csv = csv::Reader::from_reader(reader);
    let headers = csv.headers()?.clone();

    let column = |name: &str| {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| SldError::MissingColumn(name.to_string()))
    };
    let id_col = column(ID_COLUMN)?;
    let geoid_col = column(GEOID_COLUMN)?;

    let mut table = HashMap::new();
    for record in csv.records() {
        let record = record?;
        if let (Some(geoid), Some(id)) = (record.get(geoid_col), record.get(id_col)) {
            // First row wins for duplicate GEOIDs.
            table
                .entry(geoid.to_string())
                .or_insert_with(|| id.to_string());
        }
    }
    Ok(table)
}

/// Counters for one annotation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AnnotateStats {
    pub features: usize,
    /// Features that received an OCD-ID.
    pub matched: usize,
}

/// Replace a feature's properties with `{ ocdid, type, state }`.
///
/// Returns whether an OCD-ID was found.
pub fn annotate_feature(feature: &mut Feature, index: &OcdIdIndex) -> SldResult<bool> {
    let props = feature
        .get("properties")
        .and_then(Value::as_object)
        .ok_or_else(|| SldError::GeoJson("feature has no properties object".to_string()))?;

    let chamber = if props.get("MTFCC").and_then(Value::as_str) == Some(Chamber::Upper.mtfcc()) {
        Chamber::Upper
    } else {
        Chamber::Lower
    };

    let ocdid = props
        .get("GEOID")
        .and_then(Value::as_str)
        .and_then(|geoid| index.lookup(&format!("{}-{geoid}", chamber.label())))
        .map(str::to_string);

    let statefp = props
        .get("STATEFP")
        .and_then(Value::as_str)
        .ok_or_else(|| SldError::GeoJson("feature has no STATEFP property".to_string()))?;
    let state = by_fips(statefp)
        .ok_or_else(|| SldError::UnknownFips(statefp.to_string()))?
        .abbr
        .to_ascii_lowercase();

    let matched = ocdid.is_some();
    feature.insert(
        "properties".to_string(),
        json!({
            "ocdid": ocdid,
            "type": chamber.label(),
            "state": state,
        }),
    );
    Ok(matched)
}

/// Stream a FeatureCollection from `input`, annotate each feature, and write
/// the rewritten collection to `output`.
pub fn annotate<R: Read, W: Write>(
    input: R,
    index: &OcdIdIndex,
    output: W,
) -> SldResult<AnnotateStats> {
    stream(input, index, output, Path::new("<output>"))
}

/// File-to-file wrapper around [`annotate`]. The output only appears once the
/// whole collection has been written; on failure an existing file at
/// `output` is left untouched.
pub fn annotate_file(
    geojson: &Path,
    index: &OcdIdIndex,
    output: &Path,
) -> SldResult<AnnotateStats> {
    let input = File::open(geojson).map_err(|e| SldError::io(geojson, e))?;
    replace_file(output, |out| {
        stream(BufReader::new(input), index, BufWriter::new(out), output)
    })
}

fn stream<R: Read, W: Write>(
    input: R,
    index: &OcdIdIndex,
    mut output: W,
    output_path: &Path,
) -> SldResult<AnnotateStats> {
    let mut stats = AnnotateStats::default();
    let mut failure: Option<SldError> = None;

    output
        .write_all(COLLECTION_OPEN.as_bytes())
        .map_err(|e| SldError::io(output_path, e))?;

    let mut on_feature = |mut feature: Feature| -> Result<(), String> {
        let step = annotate_feature(&mut feature, index).and_then(|matched| {
            if stats.features > 0 {
                output
                    .write_all(FEATURE_SEPARATOR.as_bytes())
                    .map_err(|e| SldError::io(output_path, e))?;
            }
            serde_json::to_writer(&mut output, &feature)?;
            Ok(matched)
        });

        match step {
            Ok(matched) => {
                stats.features += 1;
                stats.matched += usize::from(matched);
                Ok(())
            }
            Err(e) => {
                let msg = e.to_string();
                failure = Some(e);
                Err(msg)
            }
        }
    };

    let mut de = serde_json::Deserializer::from_reader(input);
    let parsed = CollectionSeed {
        on_feature: &mut on_feature,
    }
    .deserialize(&mut de)
    .and_then(|()| de.end());

    if let Some(e) = failure {
        return Err(e);
    }
    parsed.map_err(|e| SldError::GeoJson(e.to_string()))?;

    output
        .write_all(COLLECTION_CLOSE.as_bytes())
        .and_then(|()| output.flush())
        .map_err(|e| SldError::io(output_path, e))?;

    tracing::info!(
        features = stats.features,
        matched = stats.matched,
        "annotation complete"
    );
    Ok(stats)
}

/// Visits the top-level collection object, streaming its `features` array
/// and skipping every other member.
struct CollectionSeed<'a, F> {
    on_feature: &'a mut F,
}

impl<'de, F> DeserializeSeed<'de> for CollectionSeed<'_, F>
where
    F: FnMut(Feature) -> Result<(), String>,
{
    type Value = ();

    fn deserialize<D: de::Deserializer<'de>>(self, deserializer: D) -> Result<(), D::Error> {
        deserializer.deserialize_map(self)
    }
}

impl<'de, F> Visitor<'de> for CollectionSeed<'_, F>
where
    F: FnMut(Feature) -> Result<(), String>,
{
    type Value = ();

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a GeoJSON FeatureCollection object")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<(), A::Error> {
        let on_feature = self.on_feature;
        let mut saw_features = false;

        while let Some(key) = map.next_key::<String>()? {
            if key == "features" {
                map.next_value_seed(FeatureSeq {
                    on_feature: &mut *on_feature,
                })?;
                saw_features = true;
            } else {
                map.next_value::<IgnoredAny>()?;
            }
        }

        if !saw_features {
            return Err(de::Error::missing_field("features"));
        }
        Ok(())
    }
}

struct FeatureSeq<'a, F> {
    on_feature: &'a mut F,
}

impl<'de, F> DeserializeSeed<'de> for FeatureSeq<'_, F>
where
    F: FnMut(Feature) -> Result<(), String>,
{
    type Value = ();

    fn deserialize<D: de::Deserializer<'de>>(self, deserializer: D) -> Result<(), D::Error> {
        deserializer.deserialize_seq(self)
    }
}

impl<'de, F> Visitor<'de> for FeatureSeq<'_, F>
where
    F: FnMut(Feature) -> Result<(), String>,
{
    type Value = ();

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("an array of GeoJSON features")
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<(), A::Error> {
        while let Some(feature) = seq.next_element::<Feature>()? {
            (self.on_feature)(feature).map_err(de::Error::custom)?;
        }
        Ok(())
    }
}
