//! Codegen Templates CLI
//!
//! Usage:
//!   codegen-templates render <TEMPLATE> [-c CONTEXT] [-p PARTIALS]... [--no-cleanup] [--strict]
//!   codegen-templates inspect <TEMPLATE>
//!   codegen-templates validate <TEMPLATE> -c CONTEXT
//!
//! A template path of `-` reads from stdin. Set `RUST_LOG` to see engine
//! logs on stderr.

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use codegen_templates::{
    check_expressions, parse_template, render_with_config, validate_context, PartialSet,
    RenderConfig, Registry, TemplateContext,
};

#[derive(Parser)]
#[command(name = "codegen-templates")]
#[command(about = "Render source-code templates from a JSON or TOML context")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render a template to stdout
    Render {
        /// Template file, or `-` for stdin
        template: PathBuf,

        /// Context file (JSON, or TOML when the extension is .toml)
        #[arg(short, long)]
        context: Option<PathBuf>,

        /// Partial set to register (TOML format, repeatable)
        #[arg(short, long = "partials", value_name = "FILE")]
        partials: Vec<PathBuf>,

        /// Skip blank-line normalisation
        #[arg(long)]
        no_cleanup: bool,

        /// Exit with an error if anything was left unresolved
        #[arg(long)]
        strict: bool,

        /// Log the text after each phase (needs RUST_LOG=debug)
        #[arg(long)]
        trace_phases: bool,
    },

    /// Print the inferred variables, dependencies and metadata as JSON
    Inspect {
        /// Template file, or `-` for stdin
        template: PathBuf,
    },

    /// Check a context against the variables a template uses
    Validate {
        /// Template file, or `-` for stdin
        template: PathBuf,

        /// Context file (JSON, or TOML when the extension is .toml)
        #[arg(short, long)]
        context: PathBuf,
    },
}

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "codegen_templates=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Render {
            template,
            context,
            partials,
            no_cleanup,
            strict,
            trace_phases,
        } => {
            let source = read_template(&template);
            let context = context.as_deref().map(load_context).unwrap_or_default();

            let mut registry = Registry::new();
            for path in &partials {
                match PartialSet::from_file(path) {
                    Ok(set) => {
                        registry.load_partials(&set);
                    }
                    Err(e) => fail(format!(
                        "loading partials '{}': {}",
                        path.display(),
                        e
                    )),
                }
            }

            let config = RenderConfig::new()
                .with_cleanup(!no_cleanup)
                .with_trace_phases(trace_phases);
            let out = render_with_config(&source, &context, &registry, config);

            print!("{}", out.output);
            for diagnostic in &out.diagnostics {
                eprintln!("warning: {}", diagnostic);
            }
            if strict && !out.is_clean() {
                fail(format!(
                    "{} unresolved token(s) in output",
                    out.diagnostics.len()
                ));
            }
        }

        Command::Inspect { template } => {
            let source = read_template(&template);
            let filename = template.display().to_string();

            for error in check_expressions(&source) {
                eprintln!("{}", error.format(&source, &filename));
            }

            let parsed = parse_template(&source);
            match serde_json::to_string_pretty(&parsed) {
                Ok(json) => println!("{}", json),
                Err(e) => fail(format!("serializing template: {}", e)),
            }
        }

        Command::Validate { template, context } => {
            let source = read_template(&template);
            let context = load_context(&context);

            let result = validate_context(&parse_template(&source), &context);
            for error in &result.errors {
                println!("error: {}", error);
            }
            for warning in &result.warnings {
                println!("warning: {}", warning);
            }

            if result.valid {
                println!("Context is valid");
            } else {
                process::exit(1);
            }
        }
    }
}

fn read_template(path: &Path) -> String {
    if path == Path::new("-") {
        let mut buffer = String::new();
        match io::stdin().read_to_string(&mut buffer) {
            Ok(_) => buffer,
            Err(e) => fail(format!("reading from stdin: {}", e)),
        }
    } else {
        match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => fail(format!("reading file '{}': {}", path.display(), e)),
        }
    }
}

fn load_context(path: &Path) -> TemplateContext {
    match TemplateContext::from_file(path) {
        Ok(context) => context,
        Err(e) => fail(format!("loading context '{}': {}", path.display(), e)),
    }
}

fn fail(message: String) -> ! {
    eprintln!("Error: {}", message);
    process::exit(1);
}
