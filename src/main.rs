use clap::{Args, Parser};
use envload::core::units::{DEFAULT_COOLING_BASE_TEMP, DEFAULT_HEATING_BASE_TEMP};
use envload::import::flat::import_flat;
use envload::import::hierarchical::import_hierarchical;
use envload::input::ingest_snapshot;
use envload::output::FileOutput;
use envload::read_weather_file::reduce_weather_data;
use envload::run_comparison;
use std::ffi::OsStr;
use std::fs;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::fmt::format::FmtSpan;

#[derive(Parser, Default, Debug)]
#[clap(author, version, about, long_about = None)]
struct EnvloadArgs {
    input_file: String,
    #[arg(long, short, help = "Path to weather file in .epw format")]
    epw_file: Option<String>,
    #[command(flatten)]
    import_choice: ImportChoice,
    #[arg(
        long,
        short,
        default_value = ".",
        help = "Directory to write result files into"
    )]
    out_dir: PathBuf,
    #[arg(
        long,
        default_value_t = DEFAULT_HEATING_BASE_TEMP,
        help = "Heating base temperature for weather reduction"
    )]
    heating_base_temp: f64,
    #[arg(
        long,
        default_value_t = DEFAULT_COOLING_BASE_TEMP,
        help = "Cooling base temperature for weather reduction"
    )]
    cooling_base_temp: f64,
    #[clap(long, default_value_t = false, help = "Whether to log out spans")]
    log_spans: bool,
}

#[derive(Args, Clone, Default, Debug)]
#[group(required = false, multiple = false)]
struct ImportChoice {
    #[arg(long, help = "Path to a flat single-building export in .csv format")]
    flat_import: Option<String>,
    #[arg(
        long,
        help = "Path to a hierarchical multi-building export in .csv format"
    )]
    hierarchical_import: Option<String>,
}

fn main() -> anyhow::Result<()> {
    let args = EnvloadArgs::parse();

    // set up basic tracing
    let tracing_subscriber = {
        let mut builder = tracing_subscriber::fmt::fmt().with_max_level(tracing::Level::DEBUG);

        if args.log_spans {
            builder = builder.with_span_events(FmtSpan::CLOSE);
        }

        builder.finish()
    };
    tracing::subscriber::set_global_default(tracing_subscriber)
        .expect("setting tracing subscriber failed");

    let input_file = args.input_file.as_str();
    let input_file_ext = Path::new(input_file).extension().and_then(OsStr::to_str);
    let input_file_stem = match input_file_ext {
        Some(ext) => &input_file[..(input_file.len() - ext.len() - 1)],
        None => input_file,
    };
    let input_file_name = Path::new(input_file_stem)
        .file_name()
        .and_then(OsStr::to_str)
        .unwrap_or(input_file_stem);

    let mut inputs = ingest_snapshot(BufReader::new(File::open(Path::new(input_file))?))?;

    if let Some(ref file) = args.epw_file {
        let source_name = Path::new(file).file_name().and_then(OsStr::to_str);
        inputs.climate = reduce_weather_data(
            BufReader::new(File::open(file)?),
            args.heating_base_temp,
            args.cooling_base_temp,
            source_name,
        )?;
    }

    match args.import_choice {
        ImportChoice {
            flat_import: Some(ref file),
            hierarchical_import: None,
        } => import_flat(BufReader::new(File::open(file)?))?.apply_to(&mut inputs),
        ImportChoice {
            flat_import: None,
            hierarchical_import: Some(ref file),
        } => import_hierarchical(BufReader::new(File::open(file)?))?.apply_to(&mut inputs),
        _ => {}
    }

    fs::create_dir_all(&args.out_dir)?;
    let file_output = FileOutput::new(args.out_dir.clone(), input_file_name.to_string());

    let results = run_comparison(&inputs, &file_output)?;

    debug!(
        "comparison results: {}",
        serde_json::to_string_pretty(&results)?
    );

    Ok(())
}
