// Copyright (c) 2022-2023 The MobileCoin Foundation

//! TKey Signer and Random Application Host Library (and CLI)
//!
//! Provides a [DeviceHandle] for issuing commands to device applications
//! over a [Transport], with connections via a TCP bridged device or an
//! in-process simulated device.

use std::net::SocketAddr;

/// Re-export transports for consumer use
pub mod transport;
use transport::*;

#[cfg(feature = "transport_sim")]
mod sim;

/// Re-export `tkey-proto` for consumers
pub use tkey_proto::{self as proto};

mod handle;
pub use handle::{verify, DeviceHandle};

mod error;
pub use error::Error;

/// Device connection target
#[derive(Copy, Clone, Debug, PartialEq, clap::ValueEnum, strum::Display)]
#[non_exhaustive]
pub enum Target {
    /// TCP bridged device
    Tcp,
    /// In-process simulated device
    Sim,
}

/// Connection options
#[derive(Clone, Debug, PartialEq)]
pub struct ConnectOptions {
    /// Connection target
    pub target: Target,
    /// Bridge address for TCP devices
    pub addr: SocketAddr,
    /// Simulated device options
    #[cfg(feature = "transport_sim")]
    pub sim: SimOptions,
}

/// Generic device handle (abstract over transport types)
pub type GenericHandle = DeviceHandle<GenericTransport>;

impl GenericHandle {
    /// Create a new generic device handle
    pub fn new(d: impl Into<GenericTransport>) -> Self {
        Self::from(d.into())
    }
}

/// Connect to a device using the provided options
pub async fn connect(opts: &ConnectOptions) -> Result<GenericHandle, Error> {
    let t = match opts.target {
        #[cfg(feature = "transport_tcp")]
        Target::Tcp => GenericTransport::from(TcpTransport::connect(opts.addr).await?),
        #[cfg(feature = "transport_sim")]
        Target::Sim => GenericTransport::from(SimDevice::spawn(opts.sim.clone())),
        #[allow(unreachable_patterns)]
        _ => panic!("Transport {} unavailable", opts.target),
    };

    Ok(GenericHandle::new(t))
}
