// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Cryo CLI
//!
//! Developer tooling for Cryo scene and shader records. Results are written to
//! stdout as JSON; logs go to stderr (`RUST_LOG` controls verbosity).
#![allow(clippy::print_stdout)]

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use cryo_shaders::LogoVariant;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser, Debug)]
#[command(name = "cryo", author, version, about = "Cryo scene and shader tooling")]
struct Cli {
    /// Directory holding `prefs.json` (defaults to the platform config dir)
    #[arg(long, global = true)]
    config_dir: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Decode and structurally validate a scene (.json or .cbor)
    Validate {
        /// Scene file
        scene: PathBuf,
    },
    /// Apply a delta to a scene and print the resulting scene
    Apply {
        /// Scene file
        scene: PathBuf,
        /// Delta file
        delta: PathBuf,
        /// Timestamp the delta is applied at (defaults to now, in ms)
        #[arg(long)]
        at: Option<u64>,
    },
    /// Patch one uniform of a shader program and print the program
    PatchUniform {
        /// Shader program file
        shader: PathBuf,
        /// Uniform name
        name: String,
        /// Partial uniform as JSON, e.g. '{"value_float":0.7}'
        patch: String,
    },
    /// Print a bundled logo shader preset
    Preset {
        /// Logo variant (simple | ice)
        variant: LogoVariant,
    },
    /// Load logo shader sources and print the completed program
    Fetch {
        /// Logo variant (simple | ice)
        variant: LogoVariant,
        /// Base URL or path the shader files live under
        #[arg(long)]
        base: Option<String>,
        /// Read sources from this directory instead of over HTTP
        #[arg(long)]
        local: Option<PathBuf>,
    },
    /// Show or update saved tool preferences
    Prefs {
        /// Base URL logo shaders are fetched from
        #[arg(long)]
        shader_base_url: Option<String>,
        /// Directory to read shaders from instead of HTTP
        #[arg(long)]
        local_shader_dir: Option<PathBuf>,
        /// HTTP request timeout in milliseconds
        #[arg(long)]
        timeout_ms: Option<u64>,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let output = commands::run(cli).await?;
    println!("{output}");
    Ok(())
}
