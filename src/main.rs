use clap::{Parser, Subcommand};
use portfolio_behaviors::form::Field;
use portfolio_behaviors::{config, output};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once; called exactly once at startup
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "portfolio-behaviors")]
#[command(about = "Configuration and form-rule tools for the portfolio page behaviors")]
#[command(long_about = "\
Configuration and form-rule tools for the portfolio page behaviors

The behaviors themselves run in the browser as WebAssembly. A page whose
markup differs from the stock portfolio embeds an override:

  <script type=\"application/json\" id=\"behavior-config\">
    { \"theme\": { \"storage_key\": \"jane-theme\" } }
  </script>

Draft the override as TOML, check it here, then embed the same keys as JSON.

Run 'portfolio-behaviors gen-config' to print a documented config.")]
#[command(version = version_string())]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print a stock config with all options documented
    GenConfig,
    /// Load and validate a TOML config, then print the effective settings
    CheckConfig {
        /// Config file to check
        path: PathBuf,
    },
    /// Run the contact form rules against the given values
    Validate {
        #[arg(long, default_value = "")]
        name: String,
        #[arg(long, default_value = "")]
        email: String,
        #[arg(long, default_value = "")]
        message: String,
    },
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
        Command::CheckConfig { path } => {
            let config = config::load_config(&path)?;
            tracing::debug!(path = %path.display(), "config loaded");
            output::print_config_summary(&config, &path);
            println!("==> Config is valid");
        }
        Command::Validate {
            name,
            email,
            message,
        } => {
            let results: Vec<_> = Field::ALL
                .into_iter()
                .zip([&name, &email, &message])
                .map(|(field, value)| (field, field.validate(value)))
                .collect();
            output::print_validation(&results);
            if results.iter().any(|(_, r)| r.is_err()) {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}
