//! Main CLI application

use crate::config::{parse_config_auto, parse_config_file, validate_config, Config};
use crate::error::MkrunError;
use crate::runner::{
    interpolate_map, Context, Registry, Runner, ShellExecutor, Task, Verbosity,
};
use clap::{Arg, ArgAction, ArgMatches, Command};
use clap_complete::Shell;
use std::collections::HashMap;
use std::path::PathBuf;

/// CLI application
pub struct App {
    /// The clap command
    command: Command,
    /// Parsed configuration
    config: Config,
    /// Config file path (None when running on the built-in registry)
    config_path: Option<PathBuf>,
}

impl App {
    /// Create a new app with automatic config discovery
    pub fn new() -> Result<Self, MkrunError> {
        let (config, config_path) = parse_config_auto()?;
        validate_config(&config)?;

        let command = build_command(&config);

        Ok(App {
            command,
            config,
            config_path,
        })
    }

    /// Create app with a specific config file
    pub fn with_config_file(path: PathBuf) -> Result<Self, MkrunError> {
        let config = parse_config_file(&path)?;
        validate_config(&config)?;

        let command = build_command(&config);

        Ok(App {
            command,
            config,
            config_path: Some(path),
        })
    }

    /// Run the application with command line arguments
    pub fn run(mut self) -> Result<(), MkrunError> {
        let matches = self.command.clone().get_matches();

        if let Some(shell) = matches.get_one::<Shell>("completions") {
            let mut cmd = self.command;
            let name = cmd.get_name().to_string();
            clap_complete::generate(*shell, &mut cmd, name, &mut std::io::stdout());
            return Ok(());
        }

        let registry = Registry::from_config(&self.config);

        if matches.get_flag("list") {
            print_task_list(&registry);
            return Ok(());
        }

        // Handle global flags first
        let verbosity = get_verbosity(&matches);

        // Check if a task was specified
        let task_name = match matches.subcommand() {
            Some((name, _)) => name.to_string(),
            None => {
                // No task specified, show help
                self.command.print_help()?;
                println!();
                return Ok(());
            }
        };

        // Load .env before building the invocation context
        load_dotenv(self.config_path.as_deref());

        let ctx = build_context(&self.config, self.config_path.as_deref(), verbosity)?;

        let mut executor = ShellExecutor;
        Runner::new(&registry).run(&[task_name], &ctx, &mut executor)
    }
}

/// Build the invocation context: config-level env exported before any task,
/// working directory anchored at the config file like make anchors at the
/// Makefile.
fn build_context(
    config: &Config,
    config_path: Option<&std::path::Path>,
    verbosity: Verbosity,
) -> Result<Context, MkrunError> {
    let vars = interpolate_map(&config.env, &HashMap::new())?;

    let mut ctx = Context::new().with_vars(vars).with_verbosity(verbosity);

    if let Some(dir) = config_path.and_then(|p| p.parent()) {
        if !dir.as_os_str().is_empty() {
            ctx = ctx.with_working_dir(dir.to_path_buf());
        }
    }

    if let Some(interpreter) = &config.interpreter {
        ctx = ctx.with_interpreter(interpreter.clone());
    }

    Ok(ctx)
}

/// Load a .env file next to the config file (or from the current directory
/// when running on the built-in registry)
fn load_dotenv(config_path: Option<&std::path::Path>) {
    match config_path.and_then(|p| p.parent()) {
        Some(dir) if !dir.as_os_str().is_empty() => {
            let _ = dotenvy::from_path(dir.join(".env"));
        }
        _ => {
            let _ = dotenvy::dotenv();
        }
    }
}

/// Build the clap command from configuration
fn build_command(config: &Config) -> Command {
    let mut cmd = Command::new(config.name.clone().unwrap_or_else(|| "mkrun".to_string()))
        .version(env!("CARGO_PKG_VERSION"))
        .about(config.usage.clone().unwrap_or_else(|| {
            "A Makefile-style task runner".to_string()
        }))
        // Unknown names must reach the registry lookup so they fail as
        // an undefined task, not a clap usage error
        .allow_external_subcommands(true)
        .arg(
            Arg::new("file")
                .short('f')
                .long("file")
                .value_name("FILE")
                .help("Path to mkrun.yml config file")
                .global(true),
        )
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .help("Only print command output and errors")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("silent")
                .short('s')
                .long("silent")
                .help("Print no output")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Print verbose output")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("list")
                .short('l')
                .long("list")
                .help("List available tasks")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("completions")
                .long("completions")
                .value_name("SHELL")
                .help("Generate shell completions")
                .value_parser(clap::value_parser!(Shell)),
        );

    // Add subcommands for each task
    for (task_name, task) in &config.tasks {
        // Skip private tasks
        if task.private {
            continue;
        }

        let mut task_cmd = Command::new(task_name.clone())
            .about(task.usage.clone().unwrap_or_default());

        if let Some(desc) = &task.description {
            task_cmd = task_cmd.long_about(desc.clone());
        }

        cmd = cmd.subcommand(task_cmd);
    }

    cmd
}

/// Get verbosity level from matches
fn get_verbosity(matches: &ArgMatches) -> Verbosity {
    if matches.get_flag("silent") {
        Verbosity::Silent
    } else if matches.get_flag("quiet") {
        Verbosity::Quiet
    } else if matches.get_flag("verbose") {
        Verbosity::Verbose
    } else {
        Verbosity::Normal
    }
}

/// Print the task table, sorted by name
fn print_task_list(registry: &Registry) {
    let visible: Vec<(&str, &Task)> = registry
        .names()
        .into_iter()
        .filter_map(|name| registry.get(name).map(|task| (name, task)))
        .filter(|(_, task)| !task.private)
        .collect();

    let width = visible.iter().map(|(name, _)| name.len()).max().unwrap_or(0);

    for (name, task) in visible {
        let usage = task.usage.as_deref().unwrap_or("");
        println!("{:<width$}  {}", name, usage, width = width);
    }
}

/// Run the CLI application with provided arguments
pub fn run() -> Result<(), MkrunError> {
    // Check if --file flag is provided first
    let args: Vec<String> = std::env::args().collect();
    let file_path = extract_file_arg(&args);

    let app = if let Some(path) = file_path {
        App::with_config_file(path)?
    } else {
        App::new()?
    };

    app.run()
}

/// Extract --file argument before clap parsing.
///
/// Must accept every form clap accepts for the `file` arg, or the pre-parse
/// silently falls through to config discovery and the wrong registry runs.
fn extract_file_arg(args: &[String]) -> Option<PathBuf> {
    for i in 0..args.len() {
        let arg = &args[i];

        if (arg == "--file" || arg == "-f") && i + 1 < args.len() {
            return Some(PathBuf::from(&args[i + 1]));
        }
        if let Some(path) = arg.strip_prefix("--file=") {
            return Some(PathBuf::from(path));
        }
        // Short form with attached value: -f=PATH or -fPATH
        if let Some(rest) = arg.strip_prefix("-f") {
            if !rest.is_empty() {
                let path = rest.strip_prefix('=').unwrap_or(rest);
                return Some(PathBuf::from(path));
            }
        }
    }
    None
}
