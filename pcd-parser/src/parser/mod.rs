use std::path::{Path, PathBuf};

use pcd_core::scene::SceneInput;

use crate::error::ParseError;

pub mod csv;
pub mod json;

pub trait ParserProvider {
    fn get_parser(&self) -> Box<dyn Parser>;
}

pub trait Parser {
    fn parse(&self) -> Result<SceneInput, ParseError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extension {
    Csv,
    Txt,
    Json,
}

pub fn get_extension(extension: &str) -> Result<Extension, ParseError> {
    match extension.to_ascii_lowercase().as_str() {
        "csv" => Ok(Extension::Csv),
        "txt" => Ok(Extension::Txt),
        "json" => Ok(Extension::Json),
        other => Err(ParseError::UnsupportedExtension(other.to_string())),
    }
}

/// Chooses a parser by file extension. Point files may be split over several
/// paths; a scene file is always a single path.
pub fn provider_for(path: &Path) -> Result<Box<dyn ParserProvider>, ParseError> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or_default();

    let provider: Box<dyn ParserProvider> = match get_extension(extension)? {
        Extension::Csv | Extension::Txt => Box::new(csv::CsvParserProvider {
            filenames: vec![path.to_path_buf()],
        }),
        Extension::Json => Box::new(json::JsonParserProvider {
            filename: PathBuf::from(path),
        }),
    };
    Ok(provider)
}

/// One parser over several point files whose points are concatenated in
/// input order. Every path must be a `.csv` or `.txt` file.
pub fn merged_provider(paths: &[PathBuf]) -> Result<Box<dyn ParserProvider>, ParseError> {
    for path in paths {
        let extension = path.extension().and_then(|e| e.to_str()).unwrap_or_default();
        match get_extension(extension)? {
            Extension::Csv | Extension::Txt => {}
            Extension::Json => {
                return Err(ParseError::UnsupportedExtension(format!(
                    "{} (scene files cannot be merged)",
                    path.display()
                )))
            }
        }
    }
    Ok(Box::new(csv::CsvParserProvider {
        filenames: paths.to_vec(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_extension() {
        assert_eq!(get_extension("csv").unwrap(), Extension::Csv);
        assert_eq!(get_extension("TXT").unwrap(), Extension::Txt);
        assert_eq!(get_extension("json").unwrap(), Extension::Json);
        assert!(matches!(
            get_extension("las"),
            Err(ParseError::UnsupportedExtension(ext)) if ext == "las"
        ));
    }

    #[test]
    fn test_provider_for_unknown_extension() {
        assert!(provider_for(Path::new("scan.laz")).is_err());
        assert!(provider_for(Path::new("no_extension")).is_err());
        assert!(provider_for(Path::new("scene.json")).is_ok());
    }

    #[test]
    fn test_merged_provider_accepts_point_files_only() {
        let points = [PathBuf::from("a.csv"), PathBuf::from("b.TXT")];
        assert!(merged_provider(&points).is_ok());

        let mixed = [PathBuf::from("a.csv"), PathBuf::from("scene.json")];
        assert!(matches!(
            merged_provider(&mixed),
            Err(ParseError::UnsupportedExtension(_))
        ));
    }
}
