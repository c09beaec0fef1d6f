use clap::Parser as ClapParser;
use kakko::{config::ParserConfig, Error, KakkoResult, ParseError, Parsed, Parser};
use std::{io::Read, path::PathBuf};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(ClapParser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Template text to expand. Read from stdin when neither this nor --file is given.
    template: Option<String>,

    /// Read the template from a file
    #[arg(short, long, conflicts_with = "template")]
    file: Option<PathBuf>,

    /// Positional argument made available to operations (repeatable)
    #[arg(short, long = "arg")]
    args: Vec<String>,

    /// Path to config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// List registered opcodes and exit
    #[arg(short, long)]
    list: bool,

    /// Enable debug mode
    #[arg(short, long)]
    verbose: bool,
}

fn load_config(cli: &Cli) -> KakkoResult<ParserConfig> {
    match &cli.config {
        Some(path) => Ok(ParserConfig::from_file(path)?),
        // Default config
        None => Ok(ParserConfig::default()),
    }
}

fn read_template(cli: &Cli) -> KakkoResult<String> {
    if let Some(template) = &cli.template {
        return Ok(template.clone());
    }
    if let Some(path) = &cli.file {
        return std::fs::read_to_string(path)
            .map_err(|e| Error::internal(format!("Failed to read template file: {}", e)));
    }
    let mut buffer = String::new();
    std::io::stdin()
        .read_to_string(&mut buffer)
        .map_err(|e| Error::internal(format!("Failed to read stdin: {}", e)))?;
    Ok(buffer)
}

fn report(parsed: &Parsed) {
    print!("{}", parsed.text);
    if !parsed.text.ends_with('\n') {
        println!();
    }
    for error in &parsed.errors {
        eprintln!("{}", error);
    }
}

async fn run(cli: &Cli) -> KakkoResult<()> {
    let config = load_config(cli)?;
    info!("config loaded.");
    debug!("config: {:?}", config);

    let parser = Parser::new(config);

    if cli.list {
        for name in parser.registry().names() {
            println!("{}", name);
        }
        return Ok(());
    }

    let template = read_template(cli)?;
    debug!("Expanding {} bytes", template.len());

    match parser.parse_with_args(&template, cli.args.clone()).await {
        Ok(parsed) => {
            report(&parsed);
            Ok(())
        }
        Err(ParseError::NonConvergent {
            iterations,
            partial,
        }) => {
            report(&partial);
            Err(ParseError::NonConvergent {
                iterations,
                partial: Parsed::default(),
            }
            .into())
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(&cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
