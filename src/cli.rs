use anyhow::Result;
use clap::{Parser, Subcommand};
use ctools::clean::{self, CleanOptions, DEFAULT_EXTENSIONS, Extensions};
use ctools::sections::{self, DEFAULT_TARGETS};
use log::LevelFilter;
use std::path::PathBuf;

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Remove comments from C/C++ sources in place
    Strip(StripArgs),
    /// Summarise section sizes from a readelf section listing
    Sections(SectionsArgs),
}

#[derive(clap::Args)]
struct StripArgs {
    /// Directory to process
    directory: PathBuf,

    /// Do not write <file>.backup copies before rewriting
    #[arg(long)]
    no_backup: bool,

    /// Only process the directory itself, not its subdirectories
    #[arg(long)]
    no_recursive: bool,

    /// Log every file and backup
    #[arg(short, long)]
    verbose: bool,

    /// List the files that would be processed and stop
    #[arg(long)]
    dry_run: bool,

    /// Source extensions, e.g. `.c .h`
    #[arg(long, num_args = 1.., default_values_t = DEFAULT_EXTENSIONS.map(String::from))]
    extensions: Vec<String>,

    /// Process files on all cores
    #[arg(short = 'j', long)]
    parallel: bool,
}

#[derive(clap::Args)]
struct SectionsArgs {
    /// Output of `readelf -S`
    report: PathBuf,

    /// Binary image whose file size is reported as the code size
    #[arg(long)]
    binary: Option<PathBuf>,

    /// Sections to look for
    #[arg(long = "section", num_args = 1.., default_values_t = DEFAULT_TARGETS.map(String::from))]
    sections: Vec<String>,

    /// Print JSON instead of a table
    #[arg(long)]
    json: bool,

    #[arg(short, long)]
    verbose: bool,
}

fn init_logger(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .format_target(false)
        .init();
}

fn strip(args: StripArgs) -> Result<()> {
    let opts = CleanOptions {
        extensions: Extensions::new(&args.extensions),
        backup: !args.no_backup,
        recursive: !args.no_recursive,
        parallel: args.parallel,
    };

    if args.dry_run {
        let files = clean::plan(&args.directory, &opts)?;
        println!("Dry run, files that would be processed:");
        println!("{}", "-".repeat(50));
        for file in &files {
            println!("{}", file.display());
        }
        println!("\n{} files found", files.len());
        return Ok(());
    }

    if opts.backup {
        println!("Originals are kept as *{}", clean::BACKUP_SUFFIX);
    } else {
        println!("Backups disabled, files are modified in place");
    }

    let stats = clean::clean_directory(&args.directory, &opts)?;
    println!("{}", stats);
    Ok(())
}

fn section_sizes(args: SectionsArgs) -> Result<()> {
    let code_size = match &args.binary {
        Some(path) => Some(sections::file_size(path)?),
        None => None,
    };
    let report = sections::parse_section_sizes(&args.report, &args.sections)?;

    if args.json {
        let out = serde_json::json!({
            "code_size": code_size,
            "ram_size": report.total(),
            "sections": &report.sections,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    if let Some(size) = code_size {
        println!("code size = {}", size);
    }
    print!("{}", report);
    match report.total() {
        Some(total) => println!("ram size = {}", total),
        None => println!("ram size = overflow"),
    }
    Ok(())
}

pub fn cli() -> Result<()> {
    let args = Cli::parse();

    match args.command {
        Command::Strip(args) => {
            init_logger(args.verbose);
            strip(args)
        }
        Command::Sections(args) => {
            init_logger(args.verbose);
            section_sizes(args)
        }
    }
}
