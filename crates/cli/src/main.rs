//! inkbridge CLI entry point.
//!
//! This binary is the composition root. Responsibilities:
//!
//! 1. **Parse configuration** — load `inkbridge.toml` from the project
//!    directory and apply command-line overrides.
//! 2. **Wire logging** — configure `tracing-subscriber` from `RUST_LOG`
//!    (default `info`), optionally with the JSON formatter.
//! 3. **Construct infrastructure** — build the `BinaryLocator`, `Compiler`,
//!    and an `ArtifactValidator` over the JSON story engine.
//! 4. **Dispatch** — run one subcommand and map its result to an exit code.

mod config;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::{Arg, ArgAction, ArgMatches, Command};
use integration::{ArtifactValidator, LocatorConfig, Platform, StoryArtifact, ValidationOutcome};
use story_json::JsonStoryEngine;
use toolchain::{paths, state_files, templates, BinaryLocator, Compiler};
use tracing_subscriber::EnvFilter;

use crate::config::ProjectConfig;

fn cli() -> Command {
    Command::new("inkbridge")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Locate the ink compiler, compile stories, and validate compiled artifacts")
        .subcommand_required(true)
        .arg(
            Arg::new("project")
                .long("project")
                .global(true)
                .default_value(".")
                .value_parser(clap::value_parser!(PathBuf))
                .help("Project directory holding inkbridge.toml"),
        )
        .arg(
            Arg::new("log-json")
                .long("log-json")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Emit logs as JSON lines"),
        )
        .subcommand(
            Command::new("locate")
                .about("Find the compiler, hide it from asset indexing, and print its path")
                .arg(
                    Arg::new("root")
                        .long("root")
                        .value_parser(clap::value_parser!(PathBuf))
                        .help("Search root (overrides compiler.search_root)"),
                )
                .arg(
                    Arg::new("name")
                        .long("name")
                        .help("Executable name (overrides compiler.custom_name)"),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Print the full resolution report as JSON"),
                ),
        )
        .subcommand(
            Command::new("compile")
                .about("Compile a .ink source file to JSON")
                .arg(
                    Arg::new("source")
                        .required(true)
                        .value_parser(clap::value_parser!(PathBuf)),
                )
                .arg(
                    Arg::new("output")
                        .short('o')
                        .long("output")
                        .value_parser(clap::value_parser!(PathBuf))
                        .help("Output path (defaults to the source path with a .json extension)"),
                ),
        )
        .subcommand(
            Command::new("validate")
                .about("Check that a compiled story (and optionally a saved state) loads")
                .arg(
                    Arg::new("story")
                        .required(true)
                        .value_parser(clap::value_parser!(PathBuf)),
                )
                .arg(
                    Arg::new("state")
                        .long("state")
                        .value_parser(clap::value_parser!(PathBuf)),
                ),
        )
        .subcommand(
            Command::new("new")
                .about("Create a new story file from the configured template")
                .arg(
                    Arg::new("dir")
                        .default_value(".")
                        .value_parser(clap::value_parser!(PathBuf)),
                )
                .arg(
                    Arg::new("template")
                        .long("template")
                        .value_parser(clap::value_parser!(PathBuf)),
                ),
        )
        .subcommand(
            Command::new("save-state")
                .about("Write the initial state of a compiled story to a new state file")
                .arg(
                    Arg::new("story")
                        .required(true)
                        .value_parser(clap::value_parser!(PathBuf)),
                )
                .arg(
                    Arg::new("dir")
                        .long("dir")
                        .value_parser(clap::value_parser!(PathBuf))
                        .help("Target directory (overrides state.directory)"),
                )
                .arg(
                    Arg::new("name")
                        .long("name")
                        .default_value(state_files::DEFAULT_STATE_STEM),
                ),
        )
}

fn init_logging(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn main() -> ExitCode {
    let matches = cli().get_matches();
    init_logging(matches.get_flag("log-json"));

    match run(&matches) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(matches: &ArgMatches) -> anyhow::Result<ExitCode> {
    let project = path_arg(matches, "project").unwrap_or_else(|| PathBuf::from("."));
    let config = ProjectConfig::load(&project)?;

    match matches.subcommand() {
        Some(("locate", args)) => locate(&project, &config, args),
        Some(("compile", args)) => compile(&project, &config, args),
        Some(("validate", args)) => validate(args),
        Some(("new", args)) => new_story(&project, &config, args),
        Some(("save-state", args)) => save_state(&project, &config, args),
        _ => unreachable!("subcommand_required is set"),
    }
}

fn path_arg(args: &ArgMatches, id: &str) -> Option<PathBuf> {
    args.get_one::<PathBuf>(id).cloned()
}

fn required_path(args: &ArgMatches, id: &str) -> anyhow::Result<PathBuf> {
    path_arg(args, id).with_context(|| format!("missing <{id}>"))
}

fn locator_for(
    project: &Path,
    config: &ProjectConfig,
    args: Option<&ArgMatches>,
) -> anyhow::Result<BinaryLocator> {
    let root = args
        .and_then(|a| path_arg(a, "root"))
        .unwrap_or_else(|| project.join(&config.compiler.search_root));
    let name = args
        .and_then(|a| a.get_one::<String>("name").cloned())
        .or_else(|| config.compiler.custom_name.clone());
    let locator_config = LocatorConfig::for_platform(root, Platform::current(), name.as_deref())?;
    Ok(BinaryLocator::new(locator_config))
}

fn locate(project: &Path, config: &ProjectConfig, args: &ArgMatches) -> anyhow::Result<ExitCode> {
    let resolved = locator_for(project, config, Some(args))?.resolve()?;
    if args.get_flag("json") {
        println!("{}", serde_json::to_string_pretty(&resolved)?);
    } else {
        println!("{}", resolved.path.display());
    }
    Ok(ExitCode::SUCCESS)
}

fn compile(project: &Path, config: &ProjectConfig, args: &ArgMatches) -> anyhow::Result<ExitCode> {
    let source = required_path(args, "source")?;
    let output = path_arg(args, "output").unwrap_or_else(|| source.with_extension("json"));

    let resolved = locator_for(project, config, None)?.resolve()?;
    let report = Compiler::new(resolved.path).compile(&source, &output)?;
    for message in &report.messages {
        println!("{:?}: {}", message.kind, message.text);
    }
    if !report.succeeded() {
        return Ok(ExitCode::FAILURE);
    }

    let json = std::fs::read_to_string(&output)
        .with_context(|| format!("reading compiled story {}", output.display()))?;
    let outcome = ArtifactValidator::new(JsonStoryEngine).validate_story(&json);
    Ok(report_outcome(&output, &outcome))
}

fn validate(args: &ArgMatches) -> anyhow::Result<ExitCode> {
    let story_path = required_path(args, "story")?;
    let story = std::fs::read_to_string(&story_path)
        .with_context(|| format!("reading {}", story_path.display()))?;
    let validator = ArtifactValidator::new(JsonStoryEngine);

    let outcome = match path_arg(args, "state") {
        Some(state_path) => {
            let state = std::fs::read_to_string(&state_path)
                .with_context(|| format!("reading {}", state_path.display()))?;
            validator.check_story_state(&story, &state)
        }
        None => validator.validate_story(&story),
    };
    Ok(report_outcome(&story_path, &outcome))
}

fn report_outcome(path: &Path, outcome: &ValidationOutcome) -> ExitCode {
    println!("{}: {outcome}", path.display());
    if outcome.is_valid() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn new_story(project: &Path, config: &ProjectConfig, args: &ArgMatches) -> anyhow::Result<ExitCode> {
    let dir = path_arg(args, "dir").unwrap_or_else(|| PathBuf::from("."));
    let template = path_arg(args, "template").unwrap_or_else(|| project.join(&config.templates.path));
    let created = templates::create_story_file(&dir, &template)?;
    println!("{}", project_display(&created.path, project));
    Ok(ExitCode::SUCCESS)
}

fn save_state(project: &Path, config: &ProjectConfig, args: &ArgMatches) -> anyhow::Result<ExitCode> {
    let story_path = required_path(args, "story")?;
    let json = std::fs::read_to_string(&story_path)
        .with_context(|| format!("reading {}", story_path.display()))?;
    let story = ArtifactValidator::new(JsonStoryEngine)
        .load_story(&json)
        .with_context(|| format!("{} is not a valid compiled story", story_path.display()))?;

    let dir = path_arg(args, "dir").unwrap_or_else(|| project.join(&config.state.directory));
    let stem = args
        .get_one::<String>("name")
        .map_or(state_files::DEFAULT_STATE_STEM, String::as_str);
    let path = state_files::save_state_file(&dir, stem, &story.save_state()?)?;
    println!("{}", project_display(&path, project));
    Ok(ExitCode::SUCCESS)
}

/// Formats `path` relative to the project with forward slashes, or in full
/// when it lies outside the project.
fn project_display(path: &Path, project: &Path) -> String {
    let canonical = |p: &Path| std::fs::canonicalize(p).unwrap_or_else(|_| p.to_path_buf());
    paths::to_project_relative(&canonical(path), &canonical(project))
        .unwrap_or_else(|| path.display().to_string())
}
