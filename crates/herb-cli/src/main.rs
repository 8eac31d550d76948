//! Main entry point for the herb pre-order client.
//!
//! Opens the order form for a route, either a new order (`/order`) or an
//! existing one (`/order/{id}`), and lets the user fill it in from the
//! terminal. The backend is selected in the configuration file.

use clap::Parser;
use herb_config::Config;
use herb_form::FormController;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::BufReader;

mod factory_registry;
mod render;
mod route;
mod shell;

use route::Route;
use shell::Shell;

/// Command-line arguments for the order client.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
	/// Path to configuration file
	#[arg(short, long, default_value = "config.toml", env = "HERB_CONFIG")]
	config: PathBuf,

	/// Page to open: `/order`, `/order/{id}` or a full order link
	#[arg(short, long, default_value = "/order")]
	route: String,

	/// Identifier of an existing order, shorthand for `--route /order/{id}`
	#[arg(short, long, conflicts_with = "route")]
	order_id: Option<String>,

	/// Log level (trace, debug, info, warn, error)
	#[arg(short, long, default_value = "info")]
	log_level: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	let args = Args::parse();

	// Initialize tracing with env filter
	use tracing_subscriber::{fmt, EnvFilter};

	let env_filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

	// Logs go to stderr so they do not interleave with the form on stdout.
	fmt()
		.with_env_filter(env_filter)
		.with_target(true)
		.with_writer(std::io::stderr)
		.init();

	let config_path = args.config.to_string_lossy();
	let config = Config::from_file(&config_path).await?;
	tracing::info!(
		path = %config_path,
		backend = %config.backend.primary,
		flow = ?config.form.flow,
		"Loaded configuration"
	);

	let route = match args.order_id {
		Some(order_id) => Route::ExistingOrder(order_id),
		None => Route::parse(&args.route)?,
	};
	if route == Route::Home {
		println!("{}", config.messages.under_construction);
		return Ok(());
	}

	let api = Arc::new(factory_registry::build_backend(&config.backend)?);
	let mut form = FormController::from_config(api, &config, route.order_id());
	form.initialize().await?;

	let mut shell = Shell::new(form, std::io::stdout());
	shell.run(BufReader::new(tokio::io::stdin())).await?;

	tracing::info!(state = %shell.state(), "Session ended");
	Ok(())
}
