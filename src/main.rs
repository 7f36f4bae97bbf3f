use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use std::io::{BufRead, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use dirmap_cli::EngineKind;
use dirmap_cli::PrefixRemapper;
use dirmap_cli::config::{
	CONFIG_FILE_NAME, INIT_TEMPLATE, MergedConfig, build_remapper, discover_configs,
	load_merged_config, merge_configs, user_config_path,
};
use dirmap_cli::deep::{DeepOptions, Value};

#[derive(Parser)]
#[command(name = "dirmap")]
#[command(
	author,
	version,
	about = "Remap filesystem paths from one directory layout to another"
)]
#[command(arg_required_else_help = true)]
struct Cli {
	#[command(subcommand)]
	command: Option<Commands>,

	/// Mapping spec, e.g. "/src:/dst;/old,/new" (repeatable, applied after config files)
	#[arg(short, long = "map", value_name = "SPEC", global = true)]
	maps: Vec<String>,

	/// Match engine to use: scan, trie or regex
	#[arg(short, long, value_name = "ENGINE", global = true)]
	engine: Option<EngineKind>,

	/// Ignore .dirmap.toml files
	#[arg(long, global = true)]
	no_config: bool,

	/// Increase log verbosity (-v debug, -vv trace)
	#[arg(short, long, action = ArgAction::Count, global = true)]
	verbose: u8,

	/// Read paths from stdin, one per line
	#[arg(long)]
	stdin: bool,

	/// Create a template .dirmap.toml in the current directory
	#[arg(long)]
	init: bool,

	/// Overwrite existing .dirmap.toml when using --init
	#[arg(long, requires = "init")]
	force: bool,

	/// Paths to remap
	#[arg(value_name = "PATH")]
	paths: Vec<String>,
}

#[derive(Subcommand)]
enum Commands {
	/// Configuration management commands
	Config {
		#[command(subcommand)]
		action: ConfigAction,
	},
	/// Remap every path string inside a JSON document
	Json {
		/// Also remap object keys
		#[arg(long)]
		keys: bool,

		/// JSON file to read (defaults to stdin)
		file: Option<PathBuf>,
	},
}

#[derive(Subcommand)]
enum ConfigAction {
	/// Display every config file in the cascade and its mappings
	Show,
	/// Check all config files for errors without remapping anything
	Validate,
}

fn main() -> ExitCode {
	match run() {
		Ok(code) => code,
		Err(e) => {
			eprintln!("error: {e:?}");
			ExitCode::FAILURE
		}
	}
}

fn run() -> Result<ExitCode> {
	let cli = Cli::parse();
	init_tracing(cli.verbose);

	// Handle --init
	if cli.init {
		return handle_init(cli.force);
	}

	// Handle subcommands
	if let Some(ref command) = cli.command {
		return match command {
			Commands::Config { action } => match action {
				ConfigAction::Show => handle_config_show(),
				ConfigAction::Validate => handle_config_validate(),
			},
			Commands::Json { keys, file } => handle_json(&cli, *keys, file.as_deref()),
		};
	}

	handle_remap(&cli)
}

/// Install the stderr logger. `RUST_LOG` wins over `-v`.
fn init_tracing(verbose: u8) {
	let default_level = match verbose {
		0 => "warn",
		1 => "debug",
		_ => "trace",
	};
	let filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

	tracing_subscriber::registry()
		.with(fmt::layer().with_writer(std::io::stderr))
		.with(filter)
		.init();
}

fn load_remapper(cli: &Cli) -> Result<PrefixRemapper> {
	let merged = if cli.no_config {
		MergedConfig::default()
	} else {
		let cwd = std::env::current_dir().context("Failed to get current directory")?;
		load_merged_config(&cwd).context("Failed to load configuration")?
	};

	build_remapper(&merged, &cli.maps, cli.engine).context("Failed to build mappings")
}

fn handle_remap(cli: &Cli) -> Result<ExitCode> {
	let remapper = load_remapper(cli)?;
	let stdout = std::io::stdout();
	let mut out = stdout.lock();

	for path in &cli.paths {
		write_remapped(&remapper, path, &mut out)?;
	}

	if cli.stdin {
		for line in std::io::stdin().lock().lines() {
			let line = line.context("Failed to read from stdin")?;
			if line.is_empty() {
				continue;
			}
			write_remapped(&remapper, &line, &mut out)?;
		}
	}

	Ok(ExitCode::SUCCESS)
}

fn write_remapped(remapper: &PrefixRemapper, path: &str, out: &mut impl Write) -> Result<()> {
	let remapped = remapper
		.remap(path)
		.with_context(|| format!("Failed to remap {path}"))?;
	writeln!(out, "{remapped}").context("Failed to write output")
}

fn handle_json(cli: &Cli, keys: bool, file: Option<&Path>) -> Result<ExitCode> {
	let remapper = load_remapper(cli)?;

	let content = match file {
		Some(path) => std::fs::read_to_string(path)
			.with_context(|| format!("Failed to read {}", path.display()))?,
		None => {
			let mut buf = String::new();
			std::io::stdin()
				.read_to_string(&mut buf)
				.context("Failed to read from stdin")?;
			buf
		}
	};

	let json: serde_json::Value = serde_json::from_str(&content)
		.map_err(dirmap_cli::DirmapError::from)
		.context("Failed to parse JSON input")?;
	let remapped = remapper
		.deep_remap(&Value::from(&json), DeepOptions { dict_keys: keys })
		.context("Failed to remap JSON document")?;

	let pretty = serde_json::to_string_pretty(&remapped.to_json())
		.context("Failed to serialize JSON output")?;
	println!("{}", pretty);
	Ok(ExitCode::SUCCESS)
}

fn handle_init(force: bool) -> Result<ExitCode> {
	let config_path = PathBuf::from(CONFIG_FILE_NAME);

	if config_path.exists() && !force {
		anyhow::bail!("{CONFIG_FILE_NAME} already exists. Use --force to overwrite.");
	}

	std::fs::write(&config_path, INIT_TEMPLATE)
		.with_context(|| format!("Failed to write {}", config_path.display()))?;

	println!("Created {CONFIG_FILE_NAME}");
	Ok(ExitCode::SUCCESS)
}

fn handle_config_show() -> Result<ExitCode> {
	let cwd = std::env::current_dir().context("Failed to get current directory")?;
	let configs = discover_configs(&cwd).context("Failed to discover config files")?;

	if configs.is_empty() {
		println!("No configuration files found.");
		return Ok(ExitCode::SUCCESS);
	}

	println!("Configuration files (in cascade order):\n");

	for loaded in &configs {
		let config = &loaded.config;
		println!("# Source: {}", loaded.path.display());
		println!("# root: {}", config.root);
		if let Some(ref env_var) = config.root_config_lookup_disable_env_var {
			println!("# root-config-lookup-disable-env-var: {}", env_var);
		}
		if let Some(ref separator) = config.separator {
			println!("# separator: {}", separator);
		}
		if let Some(engine) = config.engine {
			println!("# engine: {}", engine);
		}
		println!("# mappings: {}", config.mapping_count());
		println!();

		if let Some(ref map) = config.map {
			println!("  map: {}", map);
		}
		for entry in &config.mappings {
			println!("  {} -> {}", entry.source, entry.destination);
		}
		for candidates in &config.existing {
			println!("  existing: {}", candidates.join(", "));
		}
		println!();
	}

	// Show user config path
	if let Ok(user_path) = user_config_path() {
		println!("User config path: {}", user_path.display());
		if user_path.exists() {
			println!("  (exists)");
		} else {
			println!("  (not found)");
		}
	}

	Ok(ExitCode::SUCCESS)
}

fn handle_config_validate() -> Result<ExitCode> {
	let cwd = std::env::current_dir().context("Failed to get current directory")?;

	match discover_configs(&cwd).and_then(|configs| merge_configs(&configs).map(|_| configs)) {
		Ok(configs) => {
			if configs.is_empty() {
				println!("No configuration files found.");
			} else {
				println!("All configuration files are valid:");
				for loaded in &configs {
					println!(
						"  {} ({} mappings)",
						loaded.path.display(),
						loaded.config.mapping_count()
					);
				}
			}
			Ok(ExitCode::SUCCESS)
		}
		Err(e) => {
			eprintln!("Configuration error: {}", e);
			Ok(ExitCode::FAILURE)
		}
	}
}
