use std::{fs::File, io::BufReader, path::PathBuf};

use pcd_core::scene::SceneInput;

use super::{Parser, ParserProvider};
use crate::error::ParseError;

/// Reads a scene file: the combined output of the recognition stages
/// (`ocr`, `yolo`, `qwenvl`, `depth`).
pub struct JsonParserProvider {
    pub filename: PathBuf,
}

impl ParserProvider for JsonParserProvider {
    fn get_parser(&self) -> Box<dyn Parser> {
        Box::new(JsonParser {
            filename: self.filename.clone(),
        })
    }
}

pub struct JsonParser {
    pub filename: PathBuf,
}

impl Parser for JsonParser {
    fn parse(&self) -> Result<SceneInput, ParseError> {
        let file = File::open(&self.filename).map_err(|source| ParseError::Io {
            path: self.filename.clone(),
            source,
        })?;

        let scene: SceneInput =
            serde_json::from_reader(BufReader::new(file)).map_err(|source| ParseError::Json {
                path: self.filename.clone(),
                source,
            })?;

        log::debug!(
            "{}: {} points, depth map {}, vision context {}",
            self.filename.display(),
            scene.point_cloud().map(|pc| pc.len()).unwrap_or(0),
            scene.depth_map().is_some(),
            scene.vision.is_some()
        );
        Ok(scene)
    }
}
