use anyhow::Result;
use benzene_cli::report::{self, CheckReport};
use benzene_cli::{check_source, read_source};
use benzene_parse::{parse_str_with, tokenize, ParseOptions};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "benzene")]
#[command(about = "Benzene: parse and scope-check Benzene source files")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Dump the token stream
    Tokens {
        /// Path to source file
        file: PathBuf,

        /// Output format
        #[arg(long, value_enum, default_value_t = Format::Pretty)]
        format: Format,
    },

    /// Parse a source file and dump the syntax tree
    Parse {
        /// Path to source file
        file: PathBuf,

        /// Output format
        #[arg(long, value_enum, default_value_t = Format::Pretty)]
        format: Format,

        /// Log every captured top-level construct to stderr
        #[arg(long)]
        trace: bool,
    },

    /// Parse and resolve a source file, reporting all diagnostics
    Check {
        /// Path to source file
        file: PathBuf,

        /// Output format
        #[arg(long, value_enum, default_value_t = Format::Pretty)]
        format: Format,

        /// Log every captured top-level construct to stderr
        #[arg(long)]
        trace: bool,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Format {
    Pretty,
    Json,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let status = match cli.command {
        Commands::Tokens { file, format } => cmd_tokens(&file, format)?,
        Commands::Parse {
            file,
            format,
            trace,
        } => cmd_parse(&file, format, trace)?,
        Commands::Check {
            file,
            format,
            trace,
        } => cmd_check(&file, format, trace)?,
    };
    Ok(ExitCode::from(status))
}

fn options(trace: bool) -> ParseOptions {
    ParseOptions {
        trace,
        ..ParseOptions::default()
    }
}

fn print_diagnostics(diags: &benzene_ast::diag::Diagnostics, file: &Path) {
    let name = file.display().to_string();
    for line in report::render_all(diags, &name) {
        eprintln!("{line}");
    }
}

fn cmd_tokens(file: &Path, format: Format) -> Result<u8> {
    let src = read_source(file)?;
    let lexed = tokenize(&src);

    match format {
        Format::Pretty => {
            for token in &lexed.tokens {
                println!("{}", report::render_token(token));
            }
            print_diagnostics(&lexed.diagnostics, file);
        }
        Format::Json => println!("{}", serde_json::to_string_pretty(&lexed)?),
    }
    Ok(report::exit_status(&lexed.diagnostics))
}

fn cmd_parse(file: &Path, format: Format, trace: bool) -> Result<u8> {
    let src = read_source(file)?;
    let parsed = parse_str_with(&src, options(trace));

    match format {
        Format::Pretty => {
            println!("{:#?}", parsed.forest);
            print_diagnostics(&parsed.diagnostics, file);
            eprintln!("{}", report::summary(&parsed.diagnostics));
        }
        Format::Json => println!("{}", serde_json::to_string_pretty(&parsed)?),
    }
    Ok(report::exit_status(&parsed.diagnostics))
}

fn cmd_check(file: &Path, format: Format, trace: bool) -> Result<u8> {
    let src = read_source(file)?;
    let checked = check_source(&src, options(trace));

    match format {
        Format::Pretty => {
            print_diagnostics(&checked.diagnostics, file);
            eprintln!("{}", report::summary(&checked.diagnostics));
        }
        Format::Json => {
            let out = CheckReport::new(&checked.forest, &checked.symbols, &checked.diagnostics);
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
    }
    Ok(report::exit_status(&checked.diagnostics))
}
