use clap::{Parser, Subcommand};
use rust_oned::tools::{
    bench_limit_from_env, dataset_iter, dataset_root_from_env, load_rgb, reading_rate, smoke_from_env,
    to_grayscale,
};
use rust_oned::{BarcodeFormat, DecodeConfig, MultiFormatRowDecoder, RowScanner};
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Parser)]
#[command(name = "onedtool", version, about = "rust_oned CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Args, Clone)]
struct DecodeArgs {
    /// Restrict decoding to these formats (repeatable, e.g. `--format code-128`)
    #[arg(long = "format")]
    formats: Vec<BarcodeFormat>,
    /// Scan every row and retry on the rotated image
    #[arg(long)]
    try_harder: bool,
    /// Validate and strip the Code 39 check digit
    #[arg(long)]
    code39_check_digit: bool,
}

impl DecodeArgs {
    /// Flags layered over `ONED_*` environment preferences
    fn config(&self) -> DecodeConfig {
        let mut config = DecodeConfig::from_env();
        if !self.formats.is_empty() {
            config = config.with_formats(self.formats.iter().copied());
        }
        if self.try_harder {
            config = config.with_try_harder(true);
        }
        if self.code39_check_digit {
            config = config.with_code39_check_digit(true);
        }
        config
    }
}

#[derive(Subcommand)]
enum Command {
    /// Decode a barcode from a single image
    Decode {
        #[arg(long)]
        image: PathBuf,
        #[command(flatten)]
        args: DecodeArgs,
    },
    /// Compute reading rate on a labeled dataset
    ReadingRate {
        #[arg(long)]
        root: Option<PathBuf>,
        #[arg(long)]
        limit: Option<usize>,
        #[arg(long)]
        smoke: bool,
        #[command(flatten)]
        args: DecodeArgs,
    },
    /// Iterate a dataset and time one decode per image
    DatasetBench {
        #[arg(long)]
        root: Option<PathBuf>,
        #[arg(long)]
        limit: Option<usize>,
        #[arg(long)]
        smoke: bool,
        #[command(flatten)]
        args: DecodeArgs,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Decode { image, args } => decode_cmd(&image, &args.config()),
        Command::ReadingRate {
            root,
            limit,
            smoke,
            args,
        } => reading_rate_cmd(root, limit, smoke, &args.config()),
        Command::DatasetBench {
            root,
            limit,
            smoke,
            args,
        } => dataset_bench_cmd(root, limit, smoke, &args.config()),
    }
}

fn decode_cmd(image: &Path, config: &DecodeConfig) {
    let (pixels, width, height) = match load_rgb(image) {
        Ok(loaded) => loaded,
        Err(err) => {
            eprintln!("Failed to load image {}: {}", image.display(), err);
            return;
        }
    };

    println!("Image: {} ({}x{})", image.display(), width, height);
    let kinds = MultiFormatRowDecoder::new(Some(config)).kinds();
    println!("Decoders: {:?}", kinds);

    let gray = to_grayscale(&pixels, width, height);
    let start = Instant::now();
    let result = RowScanner::new(config.clone()).scan(&gray, width, height);
    let elapsed = start.elapsed();

    match result {
        Ok(barcode) => {
            println!("Format: {}", barcode.format);
            println!("Text: {}", barcode.text);
            println!("Row: {}", barcode.row);
            if let Some(id) = &barcode.metadata.symbology_identifier {
                println!("Symbology identifier: {}", id);
            }
            if let Some(orientation) = barcode.metadata.orientation {
                println!("Orientation: {}", orientation);
            }
            for (i, p) in barcode.points.iter().enumerate() {
                println!("  Point {}: ({:.1}, {:.1})", i, p.x, p.y);
            }
        }
        Err(err) => println!("No barcode: {}", err),
    }
    println!("Time: {:.2?}", elapsed);
}

fn reading_rate_cmd(root: Option<PathBuf>, limit: Option<usize>, smoke: bool, config: &DecodeConfig) {
    let root = root.unwrap_or_else(dataset_root_from_env);
    let limit = limit.or_else(bench_limit_from_env);
    let smoke = smoke || smoke_from_env();

    if !root.exists() {
        eprintln!("Dataset root not found: {}", root.display());
        return;
    }

    let images: Vec<PathBuf> = dataset_iter(&root, limit, smoke).collect();
    if images.is_empty() {
        println!("No images found under {}", root.display());
        return;
    }

    let start = Instant::now();
    let rate = reading_rate(images, config);
    let elapsed = start.elapsed();

    if rate.total == 0 {
        println!("No labeled images found under {}", root.display());
        return;
    }
    if rate.load_failures > 0 {
        println!("Skipped {} images that failed to load", rate.load_failures);
    }
    println!(
        "Reading rate: {}/{} = {:.2}% ({:.2?})",
        rate.decoded,
        rate.total,
        rate.percent(),
        elapsed
    );
}

fn dataset_bench_cmd(root: Option<PathBuf>, limit: Option<usize>, smoke: bool, config: &DecodeConfig) {
    let root = root.unwrap_or_else(dataset_root_from_env);
    let limit = limit.or_else(bench_limit_from_env);
    let smoke = smoke || smoke_from_env();

    if !root.exists() {
        eprintln!("Dataset root not found: {}", root.display());
        return;
    }

    let images: Vec<PathBuf> = dataset_iter(&root, limit, smoke).collect();
    if images.is_empty() {
        println!("No images found under {}", root.display());
        return;
    }

    let mut scanner = RowScanner::new(config.clone());
    let mut total_elapsed = std::time::Duration::default();

    for path in images {
        let (pixels, width, height) = match load_rgb(&path) {
            Ok(result) => result,
            Err(err) => {
                eprintln!("Failed to load {}: {}", path.display(), err);
                continue;
            }
        };

        let start = Instant::now();
        let gray = to_grayscale(&pixels, width, height);
        let result = scanner.scan(&gray, width, height);
        let elapsed = start.elapsed();
        total_elapsed += elapsed;

        let outcome = match result {
            Ok(barcode) => format!("{} {:?}", barcode.format, barcode.text),
            Err(err) => err.to_string(),
        };
        println!(
            "{}: {}x{} -> {} ({:.2?})",
            path.display(),
            width,
            height,
            outcome,
            elapsed
        );
    }

    println!("Total time: {:.2?}", total_elapsed);
}
