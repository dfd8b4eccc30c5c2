use std::{
    collections::HashMap,
    fs::File,
    path::{Path, PathBuf},
};

use csv::{ReaderBuilder, StringRecord, Trim};
use rayon::prelude::*;

use pcd_core::{
    pointcloud::point::{Normal, Point, PointCloud},
    scene::SceneInput,
};

use super::{Parser, ParserProvider};
use crate::error::ParseError;

/// Column order assumed for files without a header row.
const ATTRIBUTE_NAMES: [&str; 7] = ["x", "y", "z", "intensity", "nx", "ny", "nz"];

/// Header spellings accepted for each attribute, compared after
/// normalization.
const ALIASES: [(&str, &str); 4] = [
    ("normalx", "nx"),
    ("normaly", "ny"),
    ("normalz", "nz"),
    ("i", "intensity"),
];

pub struct CsvParserProvider {
    pub filenames: Vec<PathBuf>,
}

impl ParserProvider for CsvParserProvider {
    fn get_parser(&self) -> Box<dyn Parser> {
        Box::new(CsvParser {
            filenames: self.filenames.clone(),
        })
    }
}

/// Reads x/y/z rows, with optional intensity and normal columns, from one or
/// more delimited text files into a single point cloud.
pub struct CsvParser {
    pub filenames: Vec<PathBuf>,
}

impl Parser for CsvParser {
    fn parse(&self) -> Result<SceneInput, ParseError> {
        let per_file = self
            .filenames
            .par_iter()
            .map(|path| parse_file(path))
            .collect::<Result<Vec<_>, _>>()?;

        let points: Vec<Point> = per_file.into_iter().flatten().collect();
        log::debug!(
            "Read {} points from {} file(s)",
            points.len(),
            self.filenames.len()
        );

        Ok(SceneInput::from_point_cloud(PointCloud::new(points)))
    }
}

fn parse_file(path: &Path) -> Result<Vec<Point>, ParseError> {
    let file = File::open(path).map_err(|source| ParseError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(file);

    let mut records = reader.records();
    let Some(first) = records.next().transpose()? else {
        return Ok(Vec::new());
    };

    let has_headers = first
        .iter()
        .filter(|field| !field.is_empty())
        .any(|field| field.parse::<f64>().is_err());
    let field_mapping = create_field_mapping(&first, has_headers)?;

    let mut points = Vec::new();
    if !has_headers {
        points.push(parse_record(&first, &field_mapping)?);
    }
    for record in records {
        let record = record?;
        if record.iter().all(str::is_empty) {
            continue;
        }
        points.push(parse_record(&record, &field_mapping)?);
    }

    Ok(points)
}

fn normalize(name: &str) -> String {
    name.to_lowercase().replace(['_', '-'], "")
}

fn create_field_mapping(
    headers: &StringRecord,
    has_headers: bool,
) -> Result<HashMap<&'static str, usize>, ParseError> {
    let mut mapping = HashMap::new();

    if has_headers {
        for (index, header) in headers.iter().enumerate() {
            let normalized_header = normalize(header);
            let attribute = ATTRIBUTE_NAMES
                .iter()
                .copied()
                .find(|attr| normalize(attr) == normalized_header)
                .or_else(|| {
                    ALIASES
                        .iter()
                        .find(|(alias, _)| *alias == normalized_header)
                        .map(|(_, attr)| *attr)
                });
            if let Some(attr) = attribute {
                mapping.entry(attr).or_insert(index);
            }
        }
    } else {
        for (index, attr) in ATTRIBUTE_NAMES.iter().enumerate() {
            mapping.insert(*attr, index);
        }
    }

    for attr in ["x", "y", "z"] {
        if !mapping.contains_key(attr) {
            return Err(ParseError::MissingColumn(attr));
        }
    }

    Ok(mapping)
}

fn get_field_value<'a>(
    record: &'a StringRecord,
    field_mapping: &HashMap<&'static str, usize>,
    field_name: &str,
) -> Option<&'a str> {
    field_mapping
        .get(field_name)
        .and_then(|&index| record.get(index))
        .filter(|value| !value.is_empty())
}

fn parse_field(
    record: &StringRecord,
    field_mapping: &HashMap<&'static str, usize>,
    field_name: &'static str,
) -> Result<Option<f64>, ParseError> {
    get_field_value(record, field_mapping, field_name)
        .map(|value| {
            value
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| ParseError::InvalidValue {
                    field: field_name,
                    value: value.to_string(),
                    line: record.position().map(|p| p.line()).unwrap_or(0),
                })
        })
        .transpose()
}

fn parse_required(
    record: &StringRecord,
    field_mapping: &HashMap<&'static str, usize>,
    field_name: &'static str,
) -> Result<f64, ParseError> {
    parse_field(record, field_mapping, field_name)?.ok_or(ParseError::MissingColumn(field_name))
}

fn parse_record(
    record: &StringRecord,
    field_mapping: &HashMap<&'static str, usize>,
) -> Result<Point, ParseError> {
    let x = parse_required(record, field_mapping, "x")?;
    let y = parse_required(record, field_mapping, "y")?;
    let z = parse_required(record, field_mapping, "z")?;

    let mut point = Point::new(x, y, z);
    if let Some(intensity) = parse_field(record, field_mapping, "intensity")? {
        point = point.with_intensity(intensity);
    }

    // A normal is only taken when all three components are present.
    let nx = parse_field(record, field_mapping, "nx")?;
    let ny = parse_field(record, field_mapping, "ny")?;
    let nz = parse_field(record, field_mapping, "nz")?;
    if let (Some(nx), Some(ny), Some(nz)) = (nx, ny, nz) {
        point = point.with_normal(Normal::new(nx, ny, nz));
    }

    Ok(point)
}
