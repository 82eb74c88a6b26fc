//! Operator CLI for calling and managing camera presets.
//!
//! Usage:
//!   preset-caller list                      - List presets in camera order
//!   preset-caller groups                    - List presets grouped by name prefix
//!   preset-caller call <id>                 - Move to a preset
//!   preset-caller add <id> [--name N]       - Store the current position
//!   preset-caller delete <id>               - Clear a preset slot
//!   preset-caller wb-manual <cb> <cr>       - Manual white balance gains
//!   preset-caller wb-indoor                 - Indoor white balance
//!
//! Connection settings come from CAMERA_ADDR, CAMERA_USER, CAMERA_PASS and
//! CAMERA_PORT; `--addr`, `--user` and `--port` override them.

mod config;
mod render;

use anyhow::{Context, Result};
use camera_client::PresetId;
use clap::{Parser, Subcommand};
use config::CallerConfig;
use tracing::info;

#[derive(Parser)]
#[command(name = "preset-caller")]
#[command(about = "Call and manage presets on a CGI PTZ camera", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Camera IPv4 address
    #[arg(long, global = true)]
    addr: Option<String>,

    /// Camera user
    #[arg(long, global = true)]
    user: Option<String>,

    /// Camera HTTP port
    #[arg(long, global = true)]
    port: Option<u16>,

    /// Print list/groups output as JSON
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List presets in the order the camera reports them
    List,

    /// List presets grouped by the prefix before '_'
    Groups,

    /// Move the camera to a preset
    Call { id: PresetId },

    /// Store the current position as a preset
    Add {
        id: PresetId,

        /// Preset name (defaults to Preset<id>)
        #[arg(long, default_value = "")]
        name: String,

        /// Do not store a thumbnail with the preset
        #[arg(long)]
        no_thumbnail: bool,
    },

    /// Clear a preset slot
    Delete { id: PresetId },

    /// Set manual white balance gains
    WbManual {
        #[arg(allow_negative_numbers = true)]
        cb_gain: i32,
        #[arg(allow_negative_numbers = true)]
        cr_gain: i32,
    },

    /// Set indoor white balance
    WbIndoor,
}

#[tokio::main]
async fn main() -> Result<()> {
    telemetry::init_with_service("preset-caller");

    let cli = Cli::parse();

    let mut config = CallerConfig::from_env()?;
    if let Some(addr) = cli.addr {
        config.camera_addr = addr;
    }
    if let Some(user) = cli.user {
        config.username = user;
    }
    if let Some(port) = cli.port {
        config.port = port;
    }

    let client = config.build_client()?;
    info!(camera = %client.address(), port = client.port(), "camera client ready");

    match cli.command {
        Commands::List => {
            let presets = client
                .list_presets()
                .await
                .context("failed to fetch presets")?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&presets)?);
            } else {
                print!("{}", render::render_presets(&presets));
            }
        }
        Commands::Groups => {
            let groups = client
                .grouped_presets()
                .await
                .context("failed to fetch presets")?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&groups)?);
            } else {
                print!("{}", render::render_groups(&groups));
            }
        }
        Commands::Call { id } => {
            client
                .call_preset(id)
                .await
                .with_context(|| format!("failed to call preset {id}"))?;
        }
        Commands::Add {
            id,
            name,
            no_thumbnail,
        } => {
            client
                .add_preset(id, &name, !no_thumbnail)
                .await
                .with_context(|| format!("failed to store preset {id}"))?;
        }
        Commands::Delete { id } => {
            client
                .delete_preset(id)
                .await
                .with_context(|| format!("failed to clear preset {id}"))?;
        }
        Commands::WbManual { cb_gain, cr_gain } => {
            client
                .set_white_balance(cb_gain, cr_gain)
                .await
                .context("failed to set white balance")?;
        }
        Commands::WbIndoor => {
            client
                .set_white_balance_indoor()
                .await
                .context("failed to set white balance")?;
        }
    }

    Ok(())
}
