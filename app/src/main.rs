use std::ffi::OsStr;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::Local;
use clap::{Parser, ValueEnum};
use env_logger::Builder;
use glob::glob;
use log::LevelFilter;
use rayon::iter::{IntoParallelRefIterator as _, ParallelIterator as _};
use serde::Serialize;
use thiserror::Error;

use pcd_core::{
    config::{Config, FacadeAnalysis},
    error::CoreError,
    scene::{SceneInput, VisionContext},
};
use pcd_features::{run_pipeline, FeatureExtractor};
use pcd_parser::{merged_provider, provider_for, ParseError, Parser as _, ParserProvider};

#[derive(Parser, Debug)]
#[command(
    name = "pcd-massing",
    about = "Extracts building massing features from point clouds and scene files",
    author = "MIERUNE Inc.",
    version = "0.0.1"
)]
struct Cli {
    #[arg(short, long, required = true, num_args = 1.., value_name = "FILE")]
    input: Vec<String>,

    /// Output directory. Records go to stdout when omitted.
    #[arg(short, long, value_name = "DIR")]
    output: Option<PathBuf>,

    /// JSON file with extraction parameters; flags below override it.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    #[arg(long)]
    max_points: Option<usize>,

    #[arg(long)]
    voxel_size: Option<f64>,

    #[arg(long)]
    min_cluster_pts: Option<usize>,

    #[arg(long)]
    layer_height: Option<f64>,

    /// Expected number of buildings, used when the input carries no hint.
    #[arg(long)]
    building_count: Option<usize>,

    #[arg(long)]
    seed: Option<u64>,

    #[arg(long, value_enum)]
    facade_analysis: Option<FacadeAnalysisArg>,

    #[arg(long, default_value_t = num_cpus::get())]
    threads: usize,

    /// Emit the full pipeline result (encoder input, local encoding and
    /// refined parameters) instead of the feature record alone.
    #[arg(long)]
    with_encoding: bool,

    /// Treat all point files as one scene, written as `merged.features.json`.
    #[arg(long)]
    merge: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FacadeAnalysisArg {
    Placeholder,
    Projection,
}

impl From<FacadeAnalysisArg> for FacadeAnalysis {
    fn from(arg: FacadeAnalysisArg) -> Self {
        match arg {
            FacadeAnalysisArg::Placeholder => FacadeAnalysis::Placeholder,
            FacadeAnalysisArg::Projection => FacadeAnalysis::Projection,
        }
    }
}

#[derive(Debug, Error)]
enum AppError {
    #[error("invalid glob pattern: {0}")]
    Pattern(#[from] glob::PatternError),
    #[error("no input files matched")]
    NoInput,
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Config(#[from] CoreError),
    #[error("failed to read config {path}: {source}")]
    ConfigFile {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("{path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to serialize features: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("failed to build thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> AppError + '_ {
    move |source| AppError::Io {
        path: path.to_path_buf(),
        source,
    }
}

fn expand_globs(input_patterns: &[String]) -> Result<Vec<PathBuf>, AppError> {
    let mut paths = Vec::new();
    for pattern in input_patterns {
        if pattern.contains('*') || pattern.contains('?') || pattern.contains('[') {
            for entry in glob(pattern)? {
                match entry {
                    Ok(path) => paths.push(path),
                    Err(e) => log::warn!("Skipping unreadable path: {}", e),
                }
            }
        } else {
            paths.push(PathBuf::from(pattern));
        }
    }
    if paths.is_empty() {
        return Err(AppError::NoInput);
    }
    Ok(paths)
}

fn load_config(args: &Cli) -> Result<Config, AppError> {
    let mut config = match &args.config {
        Some(path) => {
            let file = File::open(path).map_err(io_error(path))?;
            serde_json::from_reader(BufReader::new(file)).map_err(|source| {
                AppError::ConfigFile {
                    path: path.clone(),
                    source,
                }
            })?
        }
        None => Config::default(),
    };

    if let Some(max_points) = args.max_points {
        config.max_points = max_points;
    }
    if let Some(voxel_size) = args.voxel_size {
        config.voxel_size = voxel_size;
    }
    if let Some(min_cluster_pts) = args.min_cluster_pts {
        config.min_cluster_pts = min_cluster_pts;
    }
    if let Some(layer_height) = args.layer_height {
        config.layer_height = layer_height;
    }
    if let Some(seed) = args.seed {
        config.seed = Some(seed);
    }
    if let Some(facade_analysis) = args.facade_analysis {
        config.facade_analysis = facade_analysis.into();
    }

    config.validate()?;
    Ok(config)
}

/// Fills in the building count unless the scene already states one.
fn apply_building_count(scene: &mut SceneInput, building_count: Option<usize>) {
    let Some(count) = building_count else {
        return;
    };
    if scene.expected_building_count().is_some() {
        return;
    }
    scene
        .vision
        .get_or_insert_with(VisionContext::default)
        .building_count = Some(count);
}

fn output_path(output_dir: &Path, input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(OsStr::to_str)
        .unwrap_or("output");
    output_dir.join(format!("{}.features.json", stem))
}

fn write_record<T: Serialize>(
    record: &T,
    input: &Path,
    output_dir: Option<&Path>,
) -> Result<(), AppError> {
    match output_dir {
        Some(dir) => {
            let path = output_path(dir, input);
            let file = File::create(&path).map_err(io_error(&path))?;
            let mut writer = BufWriter::new(file);
            serde_json::to_writer_pretty(&mut writer, record)?;
            writer.flush().map_err(io_error(&path))?;
            log::info!("wrote {:?}", path);
        }
        None => {
            let json = serde_json::to_string_pretty(record)?;
            let stdout = std::io::stdout();
            let mut lock = stdout.lock();
            writeln!(lock, "{}", json).map_err(io_error(input))?;
        }
    }
    Ok(())
}

fn process_file(
    path: &Path,
    extractor: &FeatureExtractor,
    args: &Cli,
) -> Result<(), AppError> {
    process(path, provider_for(path)?, extractor, args)
}

fn process_merged(
    paths: &[PathBuf],
    extractor: &FeatureExtractor,
    args: &Cli,
) -> Result<(), AppError> {
    process(Path::new("merged"), merged_provider(paths)?, extractor, args)
}

/// Parses one scene and writes its record, named after `path`.
fn process(
    path: &Path,
    provider: Box<dyn ParserProvider>,
    extractor: &FeatureExtractor,
    args: &Cli,
) -> Result<(), AppError> {
    let start = std::time::Instant::now();

    let mut scene = provider.get_parser().parse()?;
    apply_building_count(&mut scene, args.building_count);

    let output_dir = args.output.as_deref();
    if args.with_encoding {
        let result = run_pipeline(extractor, &scene);
        write_record(&result, path, output_dir)?;
    } else {
        let features = extractor.extract(&scene);
        write_record(&features, path, output_dir)?;
    }

    log::info!("processed {:?} in {:?}", path, start.elapsed());
    Ok(())
}

fn run(args: &Cli) -> Result<usize, AppError> {
    let config = load_config(args)?;
    log::info!("config: {:?}", config);

    let input_files = expand_globs(&args.input)?;
    log::info!("Expanded input files: {:?}", input_files);

    if let Some(output) = &args.output {
        fs::create_dir_all(output).map_err(io_error(output))?;
    }

    let extractor = FeatureExtractor::new(config)?;
    if args.merge {
        log::info!("merging {} point files into one scene", input_files.len());
        return match process_merged(&input_files, &extractor, args) {
            Ok(()) => Ok(0),
            Err(e) => {
                log::error!("Failed to process merged input: {}", e);
                Ok(1)
            }
        };
    }

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(args.threads)
        .build()?;

    let failures = pool.install(|| {
        input_files
            .par_iter()
            .filter_map(|path| match process_file(path, &extractor, args) {
                Ok(()) => None,
                Err(e) => {
                    log::error!("Failed to process {:?}: {}", path, e);
                    Some(path)
                }
            })
            .count()
    });

    Ok(failures)
}

fn main() {
    Builder::new()
        .format(|buf, record| {
            writeln!(
                buf,
                "{} [{}] - {}",
                Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.args()
            )
        })
        .filter(None, LevelFilter::Info)
        .parse_default_env()
        .init();

    let args = Cli::parse();

    log::info!("input files: {:?}", args.input);
    log::info!("output folder: {:?}", args.output);
    log::info!("threads: {}", args.threads);

    let start = std::time::Instant::now();
    log::info!("start processing...");

    match run(&args) {
        Ok(0) => {
            log::info!("Elapsed: {:?}", start.elapsed());
            log::info!("Finish processing");
        }
        Ok(failures) => {
            log::error!("{} file(s) failed", failures);
            std::process::exit(1);
        }
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli(extra: &[&str]) -> Cli {
        let mut argv = vec!["pcd-massing", "-i", "scan.csv"];
        argv.extend_from_slice(extra);
        Cli::parse_from(argv)
    }

    #[test]
    fn test_flags_override_defaults() {
        let args = cli(&[
            "--max-points",
            "500",
            "--layer-height",
            "4.0",
            "--seed",
            "7",
            "--facade-analysis",
            "projection",
        ]);
        let config = load_config(&args).unwrap();

        assert_eq!(config.max_points, 500);
        assert_eq!(config.layer_height, 4.0);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.facade_analysis, FacadeAnalysis::Projection);
        assert_eq!(config.voxel_size, Config::default().voxel_size);
    }

    #[test]
    fn test_invalid_flag_value_is_rejected() {
        let args = cli(&["--voxel-size", "0"]);
        assert!(matches!(load_config(&args), Err(AppError::Config(_))));
    }

    #[test]
    fn test_config_file_then_flags() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"min_cluster_pts": 25, "voxel_size": 0.1}"#).unwrap();

        let path_arg = path.to_str().unwrap();
        let args = cli(&["--config", path_arg, "--voxel-size", "0.2"]);
        let config = load_config(&args).unwrap();

        assert_eq!(config.min_cluster_pts, 25);
        assert_eq!(config.voxel_size, 0.2);
    }

    #[test]
    fn test_building_count_does_not_override_scene() {
        let mut scene = SceneInput::default();
        apply_building_count(&mut scene, Some(3));
        assert_eq!(scene.expected_building_count(), Some(3));

        apply_building_count(&mut scene, Some(5));
        assert_eq!(scene.expected_building_count(), Some(3));
    }

    #[test]
    fn test_output_path() {
        assert_eq!(
            output_path(Path::new("out"), Path::new("data/site_a.csv")),
            PathBuf::from("out/site_a.features.json")
        );
    }

    #[test]
    fn test_process_file_writes_record() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("blocks.csv");
        let mut content = String::from("x,y,z\n");
        for i in 0..40 {
            content.push_str(&format!("{},0,{}\n", i as f64 * 0.5, i % 4));
        }
        fs::write(&input, content).unwrap();

        let out = dir.path().join("out");
        fs::create_dir_all(&out).unwrap();
        let args = cli(&["-o", out.to_str().unwrap(), "--seed", "1"]);
        let extractor = FeatureExtractor::new(load_config(&args).unwrap()).unwrap();

        process_file(&input, &extractor, &args).unwrap();

        let written = fs::read_to_string(out.join("blocks.features.json")).unwrap();
        let value: serde_json::Value = serde_json::from_str(&written).unwrap();
        assert_eq!(value["pointCount"], 40);
    }

    #[test]
    fn test_merge_concatenates_point_files() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("part_a.csv");
        let second = dir.path().join("part_b.txt");
        fs::write(&first, "x,y,z\n0,0,0\n1,0,1\n").unwrap();
        fs::write(&second, "2,0,2\n3,0,3\n4,0,4\n").unwrap();

        let out = dir.path().join("out");
        fs::create_dir_all(&out).unwrap();
        let args = cli(&["-o", out.to_str().unwrap(), "--merge", "--seed", "1"]);
        let extractor = FeatureExtractor::new(load_config(&args).unwrap()).unwrap();

        process_merged(&[first, second], &extractor, &args).unwrap();

        let written = fs::read_to_string(out.join("merged.features.json")).unwrap();
        let value: serde_json::Value = serde_json::from_str(&written).unwrap();
        assert_eq!(value["pointCount"], 5);
    }

    #[test]
    fn test_merge_rejects_scene_files() {
        let args = cli(&["--merge"]);
        let extractor = FeatureExtractor::new(Config::default()).unwrap();
        let paths = [PathBuf::from("a.csv"), PathBuf::from("scene.json")];
        assert!(matches!(
            process_merged(&paths, &extractor, &args),
            Err(AppError::Parse(ParseError::UnsupportedExtension(_)))
        ));
    }

    #[test]
    fn test_unsupported_input() {
        let args = cli(&[]);
        let extractor = FeatureExtractor::new(Config::default()).unwrap();
        let result = process_file(Path::new("scan.laz"), &extractor, &args);
        assert!(matches!(
            result,
            Err(AppError::Parse(ParseError::UnsupportedExtension(_)))
        ));
    }
}
