use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::fs;
use std::path::PathBuf;

use idlc::compiler::{CompilationPipeline, CompilationState, CompilerOptions};
use idlc::lexer::{format_tokens, Lexer};
use idlc::parser::parse_source;

#[derive(Parser)]
#[command(name = "idlc")]
#[command(author, version, about = "The IDL compiler", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Options shared by the commands that run semantic analysis
#[derive(clap::Args)]
struct AnalysisArgs {
    /// The source files to compile together
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// JSON file with externally known type definitions
    #[arg(short, long)]
    external: Option<PathBuf>,

    /// Do not add the built-in core primitives to the external types
    #[arg(long)]
    no_core: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Check IDL source files for errors
    Check {
        #[command(flatten)]
        args: AnalysisArgs,
    },

    /// Compile IDL source files and write the built type map as JSON
    Build {
        #[command(flatten)]
        args: AnalysisArgs,

        /// Output file (stdout if omitted)
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,
    },

    /// Dump the tokens of a source file
    Tokens {
        /// The source file to tokenize
        input: PathBuf,
    },

    /// Dump the parsed source unit as JSON
    Ast {
        /// The source file to parse
        input: PathBuf,
    },
}

fn main() -> Result<()> {
    // Initialize logger before parsing CLI args
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    if cli.verbose {
        log::set_max_level(log::LevelFilter::Debug);
    }

    let result = match cli.command {
        Commands::Check { args } => check(args, cli.verbose),
        Commands::Build { args, output } => build(args, output, cli.verbose),
        Commands::Tokens { input } => tokens(input),
        Commands::Ast { input } => ast(input),
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}

/// Read every input and run the analysis pipeline over them
fn analyze(args: AnalysisArgs, verbose: bool) -> Result<idlc::CompilationResult> {
    let mut state = CompilationState::new();
    for input in &args.inputs {
        if verbose {
            println!("{}: Reading {:?}", "step".cyan().bold(), input);
        }
        state.add_file(input)?;
    }

    let options = CompilerOptions {
        include_core: !args.no_core,
        external: args.external,
    };

    if verbose {
        println!(
            "{}: Analyzing {} source unit(s)",
            "step".cyan().bold(),
            state.units.len()
        );
    }

    let pipeline = CompilationPipeline::new(state, options);
    Ok(pipeline.run()?)
}

fn check(args: AnalysisArgs, verbose: bool) -> Result<()> {
    log::info!("Checking {:?}", args.inputs);

    let result = analyze(args, verbose)?;
    if !result.is_success() {
        anyhow::bail!("{} error(s) found", result.diagnostics.len());
    }

    println!(
        "{}: No errors found ({} types built)",
        "success".green().bold(),
        result.built_types.len()
    );
    Ok(())
}

fn build(args: AnalysisArgs, output: Option<PathBuf>, verbose: bool) -> Result<()> {
    log::info!("Building {:?}", args.inputs);

    let result = analyze(args, verbose)?;
    if !result.is_success() {
        anyhow::bail!("{} error(s) found", result.diagnostics.len());
    }

    let json = serde_json::to_string_pretty(&result.built_types)?;
    match output {
        Some(path) => {
            fs::write(&path, json).with_context(|| format!("Failed to write {:?}", path))?;
            println!("{}: Created type map {:?}", "success".green().bold(), path);
        }
        None => println!("{}", json),
    }
    Ok(())
}

fn tokens(input: PathBuf) -> Result<()> {
    let source = fs::read_to_string(&input)
        .with_context(|| format!("Failed to read source file: {:?}", input))?;

    let (tokens, _) = Lexer::new(input.display().to_string(), &source).tokenize()?;
    println!("{}", "=== Tokens ===".blue().bold());
    println!("{}", format_tokens(&tokens));
    Ok(())
}

fn ast(input: PathBuf) -> Result<()> {
    let source = fs::read_to_string(&input)
        .with_context(|| format!("Failed to read source file: {:?}", input))?;

    let unit = parse_source(&input.display().to_string(), &source)?;
    println!("{}", serde_json::to_string_pretty(&unit)?);
    Ok(())
}
