use std::{
    io::{self, Write},
    path::{Path, PathBuf},
    process::ExitCode,
    time::Instant,
};

use anyhow::Context;
use clap::{Parser, Subcommand};
use coder::{
    annotation,
    driver::{
        self,
        config::Config,
        request::{self, Request},
        snippets,
        wrap::{self, MINTED_PREFIX},
    },
    factorial::{self, FIXTURE_INPUT},
    format::style_defs,
    lexer::Language,
    options::Options,
    style::StyleRegistry,
};
use owo_colors::OwoColorize;

#[derive(Parser, Debug)]
#[command(author, version, about = "Syntax highlighting for LaTeX documents", long_about = None)]
struct CoderArgs {
    /// The Coder.toml to use instead of the one found from the current
    /// directory.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Highlight a source file as a LaTeX verbatim block.
    Highlight {
        input: PathBuf,
        /// The language, guessed from the extension when absent.
        #[arg(short, long)]
        lang: Option<String>,
        #[arg(short, long)]
        style: Option<String>,
        /// Extra `key=value, flag` options.
        #[arg(short = 'O', long)]
        options: Option<String>,
        /// Write a standalone document.
        #[arg(short, long, default_value_t = false)]
        full: bool,
        /// The output file, stdout when absent.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Convert a snippets file into a `.pyg.tex` macro file.
    Snippets {
        input: PathBuf,
        /// Defaults to the input with a `.pyg.tex` extension.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Process a JSON highlighting request.
    Request {
        json: PathBuf,
        /// Overrides the output directory of the request.
        #[arg(short, long)]
        directory: Option<PathBuf>,
    },
    /// List the LaTeX annotations of a source file.
    Annotations {
        input: PathBuf,
        #[arg(short, long)]
        lang: Option<String>,
        /// Print the source without its annotations instead.
        #[arg(long, default_value_t = false)]
        strip: bool,
    },
    /// Print the LaTeX definitions of a style.
    Style {
        #[arg(default_value = "default")]
        name: String,
        #[arg(short, long, default_value = "PY")]
        prefix: String,
        /// List the available styles instead.
        #[arg(long, default_value_t = false)]
        list: bool,
    },
    /// Wrap TeX commands in minted output, in place.
    Wrap {
        file: PathBuf,
        wrapper: String,
        #[arg(required = true)]
        commands: Vec<String>,
        #[arg(short, long, default_value = MINTED_PREFIX)]
        prefix: String,
    },
    /// Print the factorial line of the fixture programs.
    Factorial {
        #[arg(default_value_t = FIXTURE_INPUT, allow_negative_numbers = true)]
        n: i32,
        #[arg(long, default_value_t = false)]
        iterative: bool,
    },
}

fn status(verb: &str, message: impl std::fmt::Display) {
    eprintln!("{:>12} {message}", verb.green().bold());
}

fn load_config(explicit: Option<&Path>) -> anyhow::Result<Config> {
    let cwd = std::env::current_dir()?;
    Config::discover(explicit, &cwd).context("failed to load the configuration")
}

fn write_output(output: Option<&Path>, contents: &str) -> anyhow::Result<()> {
    match output {
        Some(path) => std::fs::write(path, contents)
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(contents.as_bytes())?;
            stdout.flush()?;
        }
    }
    Ok(())
}

fn run(args: CoderArgs) -> anyhow::Result<ExitCode> {
    let config = load_config(args.config.as_deref())?;

    match args.command {
        Command::Highlight {
            input,
            lang,
            style,
            options,
            full,
            output,
        } => {
            let mut base = config.apply_defaults(&Options::default())?;
            if let Some(line) = options {
                base = base.parse_opts(&line)?;
            }
            let detect = lang.is_none();
            if let Some(lang) = lang {
                base.lang = lang;
            }
            if let Some(style) = style {
                base.style = style;
            }
            let highlighted = driver::highlight_file(&input, &base, &config, detect, full)
                .with_context(|| format!("failed to highlight {}", input.display()))?;
            write_output(output.as_deref(), &highlighted)?;
            if let Some(output) = output {
                status("Highlighted", output.display());
            }
        }
        Command::Snippets { input, output } => {
            let output = output.unwrap_or_else(|| input.with_extension("pyg.tex"));
            let report = snippets::convert_file(&input, &output, &config)?;
            status(
                "Converted",
                format!("{} snippets into {}", report.converted, output.display()),
            );
            if !report.diagnostics.is_empty() {
                let path = input.display().to_string();
                for diagnostic in &report.diagnostics {
                    diagnostic
                        .report(&path)
                        .eprint((path.as_str(), ariadne::Source::from(report.source.clone())))?;
                }
                return Ok(ExitCode::FAILURE);
            }
        }
        Command::Request { json, directory } => {
            let mut request = Request::from_file(&json)?;
            if directory.is_some() {
                request.directory = directory;
            }
            let cwd = std::env::current_dir()?;
            let outcome = request::process(&request, &config, &cwd)?;
            let mut stdout = io::stdout().lock();
            for command in &outcome.commands {
                writeln!(stdout, "{command}")?;
            }
            stdout.flush()?;
            if let Some(code_file) = &outcome.code_file {
                let verb = if outcome.cached { "Cached" } else { "Pygmentized" };
                status(verb, code_file.display());
            }
        }
        Command::Annotations { input, lang, strip } => {
            let language = match lang {
                Some(lang) => lang.parse::<Language>()?,
                None => Language::from_path(&input)?,
            };
            let text = std::fs::read_to_string(&input)
                .with_context(|| format!("failed to read {}", input.display()))?;
            if strip {
                write_output(None, &annotation::strip(language, &text))?;
            } else {
                let mut stdout = io::stdout().lock();
                for found in annotation::extract(language, &text) {
                    let title = found.title.as_deref().unwrap_or("-");
                    writeln!(stdout, "{}:{}: {title}", input.display(), found.line)?;
                    writeln!(stdout, "{}", found.body)?;
                }
            }
        }
        Command::Style { name, prefix, list } => {
            let registry = StyleRegistry::from_config(&config)?;
            if list {
                for name in registry.names() {
                    println!("{name}");
                }
            } else {
                write_output(None, &style_defs(registry.get(&name)?, &prefix))?;
            }
        }
        Command::Wrap {
            file,
            wrapper,
            commands,
            prefix,
        } => {
            let count = wrap::wrap_file(&file, &prefix, &wrapper, &commands)?;
            status("Wrapped", format!("{count} commands in {}", file.display()));
        }
        Command::Factorial { n, iterative } => {
            let value = if iterative {
                factorial::iterative(n)?
            } else {
                factorial::recursive(n)?
            };
            println!("{}", factorial::report(n, value));
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn main() -> ExitCode {
    let start_time = Instant::now();
    coder::init_tracing();

    let args = CoderArgs::parse();
    tracing::debug!("running with {:?}", args);

    let code = match run(args) {
        Ok(code) => code,
        Err(error) => {
            eprintln!("{} {error:#}", "error:".red().bold());
            ExitCode::FAILURE
        }
    };

    tracing::debug!("done in {:?}", start_time.elapsed());
    code
}
