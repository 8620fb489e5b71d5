// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Command line utility for interacting with TKey signer and random applications

use std::{net::SocketAddr, path::PathBuf, time::Duration};

use clap::Parser;
use log::{debug, info, LevelFilter};

use tkey::{
    connect,
    proto::{prelude::*, Generation},
    transport::{SimApp, SimOptions, Transport},
    verify, ConnectOptions, DeviceHandle, Target,
};

mod helpers;
use helpers::*;

/// TKey command line utility
#[derive(Clone, PartialEq, Debug, Parser)]
struct Options {
    /// Device connection target
    #[clap(long, value_enum, default_value = "tcp")]
    target: Target,

    /// TCP bridge address
    #[clap(long, default_value = tkey::transport::TcpTransport::DEFAULT_ADDR)]
    addr: SocketAddr,

    /// Protocol generation of the loaded application
    #[clap(long, value_parser = parse_generation, default_value = "tk1")]
    generation: Generation,

    /// Seed for simulated device CDI and entropy
    #[clap(long, default_value = "0")]
    sim_seed: u64,

    /// Simulated touch delay in milliseconds
    #[clap(long, default_value = "0")]
    sim_touch_ms: u64,

    /// Request timeout in seconds
    #[clap(long, default_value = "2")]
    timeout_s: usize,

    /// Touch confirmation timeout in seconds
    #[clap(long, default_value = "30")]
    user_timeout_s: usize,

    /// Subcommand to execute
    #[clap(subcommand)]
    cmd: Actions,

    /// Enable verbose logging
    #[clap(long, default_value = "info")]
    log_level: LevelFilter,
}

#[derive(Clone, PartialEq, Debug, Parser)]
#[non_exhaustive]
enum Actions {
    /// Fetch application name and version
    NameVersion {
        /// Application to query
        #[clap(long, value_enum, default_value = "signer")]
        app: SimApp,
    },

    /// Fetch signer public key
    Pubkey,

    /// Fetch unique device identifier
    Udi,

    /// Sign a message (requires touch confirmation)
    Sign {
        /// File containing the message
        #[clap(long, group = "message")]
        file: Option<PathBuf>,

        /// Hex encoded message
        #[clap(long, group = "message")]
        hex: Option<HexData>,
    },

    /// Fetch random bytes
    Random {
        /// Number of bytes to fetch
        #[clap(long, default_value = "32")]
        bytes: usize,
    },
}

impl Actions {
    /// Application required to service the action
    fn app(&self) -> SimApp {
        match self {
            Actions::NameVersion { app } => *app,
            Actions::Random { .. } => SimApp::Random,
            _ => SimApp::Signer,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse command line arguments
    let args = Options::parse();

    // Setup logging
    simplelog::SimpleLogger::init(args.log_level, simplelog::Config::default())?;

    debug!("Using target: {} ({})", args.target, args.generation.name);

    // Connect to device
    let opts = ConnectOptions {
        target: args.target,
        addr: args.addr,
        sim: SimOptions {
            generation: args.generation,
            app: args.cmd.app(),
            seed: args.sim_seed,
            touch_delay: Duration::from_millis(args.sim_touch_ms),
        },
    };

    let t = connect(&opts)
        .await?
        .with_generation(args.generation)
        .with_timeouts(args.timeout_s, args.user_timeout_s);

    // Execute command
    execute(t, args.cmd).await?;

    Ok(())
}

/// Execute a command with the provided transport
async fn execute<T: Transport>(t: DeviceHandle<T>, cmd: Actions) -> anyhow::Result<()> {
    debug!("Executing command: {:?}", cmd);

    match cmd {
        Actions::NameVersion { app } => {
            let nv = match app {
                SimApp::Signer => t.name_version::<SignerCmd>().await?,
                SimApp::Random => t.name_version::<RandomCmd>().await?,
            };

            info!("name / version: {}", nv);
        }
        Actions::Pubkey => {
            let k = t.public_key().await?;

            info!("public key: {}", hex::encode(k.as_bytes()));
        }
        Actions::Udi => {
            let udi = t.udi().await?;

            info!("udi: {}", hex::encode(udi));
        }
        Actions::Sign { file, hex } => {
            let message = match (file, hex) {
                (Some(f), _) => std::fs::read(f)?,
                (None, Some(h)) => h.0,
                (None, None) => return Err(anyhow::anyhow!("--file or --hex message required")),
            };

            info!("signing {} byte message, touch device to confirm", message.len());

            let public_key = t.public_key().await?;
            let signature = t.sign(&message).await?;

            verify(&public_key, &message, &signature)?;

            info!("public key: {}", hex::encode(public_key.as_bytes()));
            info!("signature: {}", hex::encode(signature));
        }
        Actions::Random { bytes } => {
            let r = t.random(bytes).await?;

            info!("random: {}", hex::encode(r));
        }
    }

    Ok(())
}
