//! CLI tool for symboard - lays out a board and writes its previews
//!
//! Usage:
//!   board_cli <board.json>                          # Print layout JSON
//!   board_cli <board.json> --page Letter            # Named page size
//!   board_cli <board.json> --svg out.svg            # Write SVG preview
//!   board_cli <board.json> --pdf out.json           # Write pdfmake document
//!   board_cli <board.json> --images DIR             # Resolve relative image paths in DIR
//!   board_cli <board.json> --options options.json   # Layout/pdf/svg options

#![allow(clippy::exit)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::indexing_slicing)]

use std::env;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use symboard::error::{BoardError, Result};
use symboard::export::{export_board_pdf, ExportConfig, ImageResolver};
use symboard::layout::compute_layout;
use symboard::render::render_layout_svg;
use symboard::{page_by_name, Board};

const USAGE: &str = "Usage: board_cli <board.json> [--page A4] [--svg out.svg] [--pdf out.json] [--images DIR] [--options options.json]";

/// Warnings and errors from the library, printed to stderr
struct StderrLogger;

impl log::Log for StderrLogger {
    fn enabled(&self, metadata: &log::Metadata<'_>) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &log::Record<'_>) {
        if self.enabled(record.metadata()) {
            eprintln!("[{}] {}", record.level(), record.args());
        }
    }

    fn flush(&self) {}
}

static LOGGER: StderrLogger = StderrLogger;

/// Reads images from disk: `file://` URLs, absolute paths, or paths relative
/// to the images directory.
struct LocalImageResolver {
    base: PathBuf,
}

impl LocalImageResolver {
    fn path_for(&self, url: &str) -> Result<PathBuf> {
        if url.starts_with("http://") || url.starts_with("https://") {
            return Err(BoardError::ImageFetch {
                url: url.to_string(),
                reason: "remote images are not fetched by the CLI".to_string(),
            });
        }
        let path = Path::new(url.strip_prefix("file://").unwrap_or(url));
        Ok(if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base.join(path)
        })
    }
}

impl ImageResolver for LocalImageResolver {
    async fn resolve(&self, url: &str) -> Result<Vec<u8>> {
        let path = self.path_for(url)?;
        fs::read(&path).map_err(|e| BoardError::ImageFetch {
            url: url.to_string(),
            reason: format!("{}: {e}", path.display()),
        })
    }
}

#[derive(Default)]
struct Args {
    input: String,
    page: Option<String>,
    svg: Option<String>,
    pdf: Option<String>,
    images: Option<String>,
    options: Option<String>,
    verbose: bool,
}

fn parse_args() -> Args {
    let mut raw = env::args().skip(1);
    let mut args = Args::default();

    while let Some(arg) = raw.next() {
        if args.input.is_empty() && !arg.starts_with('-') {
            args.input = arg;
            continue;
        }
        let slot = match arg.as_str() {
            "--page" => &mut args.page,
            "--svg" => &mut args.svg,
            "--pdf" => &mut args.pdf,
            "--images" => &mut args.images,
            "--options" => &mut args.options,
            "-v" | "--verbose" => {
                args.verbose = true;
                continue;
            }
            "-h" | "--help" => {
                eprintln!("{USAGE}");
                std::process::exit(0);
            }
            _ => {
                eprintln!("Unexpected argument: {arg}\n{USAGE}");
                std::process::exit(1);
            }
        };
        match raw.next() {
            Some(value) => *slot = Some(value),
            None => {
                eprintln!("Missing value for {arg}\n{USAGE}");
                std::process::exit(1);
            }
        }
    }

    if args.input.is_empty() {
        eprintln!("{USAGE}");
        std::process::exit(1);
    }
    args
}

fn fail(context: &str, e: impl std::fmt::Display) -> ! {
    eprintln!("Error {context}: {e}");
    std::process::exit(1);
}

fn main() {
    let args = parse_args();

    log::set_logger(&LOGGER).expect("logger installed once");
    log::set_max_level(if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    });

    // Read input file
    let json = fs::read_to_string(&args.input)
        .unwrap_or_else(|e| fail(&format!("reading {}", args.input), e));
    let board = Board::from_json(&json).unwrap_or_else(|e| fail("parsing board", e));

    let page = page_by_name(args.page.as_deref().unwrap_or("A4"))
        .unwrap_or_else(|e| fail("selecting page", e));

    let config = match &args.options {
        Some(path) => {
            let text = fs::read_to_string(path)
                .unwrap_or_else(|e| fail(&format!("reading {path}"), e));
            ExportConfig::from_json(&text).unwrap_or_else(|e| fail("parsing options", e))
        }
        None => ExportConfig::default(),
    };

    let layout =
        compute_layout(&board, &page, &config.layout).unwrap_or_else(|e| fail("laying out board", e));

    if let Some(path) = &args.svg {
        let svg = render_layout_svg(&board, &layout, &config.svg_options());
        if let Err(e) = fs::write(path, svg) {
            fail(&format!("writing {path}"), e);
        }
        eprintln!("Written: {path}");
    }

    if let Some(path) = &args.pdf {
        let input_dir = Path::new(&args.input)
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        let resolver = LocalImageResolver {
            base: args.images.as_ref().map_or(input_dir, PathBuf::from),
        };
        let document = futures::executor::block_on(export_board_pdf(&board, &page, &config, &resolver))
            .unwrap_or_else(|e| fail("exporting PDF", e));
        let json = serde_json::to_string_pretty(&document)
            .unwrap_or_else(|e| fail("serializing PDF document", e));
        if let Err(e) = fs::write(path, json) {
            fail(&format!("writing {path}"), e);
        }
        eprintln!("Written: {path}");
    }

    let json = serde_json::to_string_pretty(&layout).unwrap_or_else(|e| fail("serializing layout", e));
    io::stdout().write_all(json.as_bytes()).unwrap();
    println!();
}
