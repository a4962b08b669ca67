//! Command-line interface for xsdtable

#[cfg(feature = "cli")]
use clap::{Parser, ValueEnum};

#[cfg(feature = "cli")]
use std::fs;
#[cfg(feature = "cli")]
use std::path::PathBuf;

#[cfg(feature = "cli")]
use xsdtable::{convert_file, Column, Config, Report};

#[cfg(feature = "cli")]
#[derive(Parser, Debug)]
#[command(name = "xsdtable")]
#[command(author, version, about = "Flatten an XSD schema into a tabular element report", long_about = None)]
struct Cli {
    /// Path to the XSD schema file
    #[arg(value_name = "XSD")]
    xsd: PathBuf,

    /// Comma-separated columns: name,schematype,type,length,multi,enum,kind,desc,mandatory,complex,simple,minoccurs,maxoccurs,nill
    #[arg(short, long)]
    columns: Option<String>,

    /// Indent element names by nesting depth
    #[arg(short, long)]
    indent: bool,

    /// Follow xs:import declarations
    #[arg(long)]
    imports: bool,

    /// Suffix marking request element names
    #[arg(long, value_name = "SUFFIX")]
    request_end_with: Option<String>,

    /// Suffix marking response element names
    #[arg(long, value_name = "SUFFIX")]
    response_end_with: Option<String>,

    /// Repeat the header row before every request element
    #[arg(long)]
    header_request: bool,

    /// Repeat the header row before every response element
    #[arg(long)]
    header_response: bool,

    /// JSON configuration file, overridden by the flags above
    #[arg(long, value_name = "JSON")]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Tsv)]
    format: Format,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print the namespace table of the schema
    #[arg(long)]
    namespaces: bool,
}

#[cfg(feature = "cli")]
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    /// Tab-separated values
    Tsv,
    /// Pretty-printed JSON
    Json,
}

#[cfg(feature = "cli")]
fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(feature = "cli")]
fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = build_config(&cli)?;
    let report = convert_file(&cli.xsd, &config)?;

    let rendered = match cli.format {
        Format::Tsv => report.to_tsv()?,
        Format::Json => report.to_json()?,
    };

    match &cli.output {
        Some(path) => {
            fs::write(path, &rendered)?;
            eprintln!("Saved {} elements to {}", report.element_rows().count(), path.display());
        }
        None => print!("{}", rendered),
    }

    if cli.namespaces {
        print_namespaces(&report);
    }

    Ok(())
}

#[cfg(feature = "cli")]
fn build_config(cli: &Cli) -> xsdtable::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::from_json_file(path)?,
        None => Config::new(),
    };

    if let Some(columns) = &cli.columns {
        config = config.with_columns(Column::parse_list(columns)?);
    }
    if cli.indent {
        config = config.with_indent_output(true);
    }
    if cli.imports {
        config = config.with_imports_enabled(true);
    }
    if let Some(suffix) = &cli.request_end_with {
        config = config.with_request_marker(suffix.as_str());
    }
    if let Some(suffix) = &cli.response_end_with {
        config = config.with_response_marker(suffix.as_str());
    }
    if cli.header_request {
        config = config.with_header_request(true);
    }
    if cli.header_response {
        config = config.with_header_response(true);
    }

    config.validate()?;
    Ok(config)
}

#[cfg(feature = "cli")]
fn print_namespaces(report: &Report) {
    println!();
    match &report.xsd_prefix {
        Some(prefix) => println!("Default XMLSchema prefix is '{}'", prefix),
        None => println!("XMLSchema is the default namespace"),
    }
    if let Some(uri) = report.namespaces.get_default_namespace() {
        println!("(default) - {}", uri);
    }
    for (prefix, uri) in report.namespaces.iter() {
        println!("{} - {}", prefix, uri);
    }
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("CLI feature not enabled. Rebuild with --features cli");
    std::process::exit(1);
}
