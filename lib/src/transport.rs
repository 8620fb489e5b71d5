// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Byte transports for TKey devices, and a generic wrapper hiding transport types

use std::net::SocketAddr;

use async_trait::async_trait;
use log::debug;
use strum::Display;
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::TcpStream,
};

#[cfg(feature = "transport_sim")]
pub use crate::sim::{SimApp, SimDevice, SimOptions};

use crate::Error;

/// Frame transport, moving raw bytes to and from a device
#[async_trait]
pub trait Transport: Send {
    /// Write a complete frame
    async fn send(&mut self, frame: &[u8]) -> Result<(), Error>;

    /// Read exactly `buff.len()` bytes
    async fn recv(&mut self, buff: &mut [u8]) -> Result<(), Error>;
}

/// TCP bridged device (serial port exposed via a TCP bridge)
pub struct TcpTransport {
    s: TcpStream,
}

impl TcpTransport {
    /// Default bridge address
    pub const DEFAULT_ADDR: &'static str = "127.0.0.1:9999";

    /// Connect to a bridged device
    pub async fn connect(addr: SocketAddr) -> Result<Self, Error> {
        debug!("Connecting to {}", addr);

        let s = TcpStream::connect(addr).await?;
        s.set_nodelay(true)?;

        Ok(Self { s })
    }
}

#[async_trait]
impl Transport for TcpTransport {
    async fn send(&mut self, frame: &[u8]) -> Result<(), Error> {
        self.s.write_all(frame).await?;
        Ok(())
    }

    async fn recv(&mut self, buff: &mut [u8]) -> Result<(), Error> {
        self.s.read_exact(buff).await?;
        Ok(())
    }
}

/// Generic TKey device (abstract over transport types)
#[derive(Display)]
#[non_exhaustive]
pub enum GenericTransport {
    #[cfg(feature = "transport_tcp")]
    Tcp(TcpTransport),
    #[cfg(feature = "transport_sim")]
    Sim(SimDevice),
}

/// Convert a TCP transport into a generic transport
#[cfg(feature = "transport_tcp")]
impl From<TcpTransport> for GenericTransport {
    fn from(t: TcpTransport) -> Self {
        Self::Tcp(t)
    }
}

/// Convert a simulated device into a generic transport
#[cfg(feature = "transport_sim")]
impl From<SimDevice> for GenericTransport {
    fn from(t: SimDevice) -> Self {
        Self::Sim(t)
    }
}

/// Implementation of [Transport] for [GenericTransport], dispatching to the wrapped transport
#[async_trait]
impl Transport for GenericTransport {
    async fn send(&mut self, frame: &[u8]) -> Result<(), Error> {
        match self {
            #[cfg(feature = "transport_tcp")]
            Self::Tcp(t) => t.send(frame).await,
            #[cfg(feature = "transport_sim")]
            Self::Sim(t) => t.send(frame).await,
            #[cfg(not(any(feature = "transport_tcp", feature = "transport_sim")))]
            _ => unreachable!("no transports enabled"),
        }
    }

    async fn recv(&mut self, buff: &mut [u8]) -> Result<(), Error> {
        match self {
            #[cfg(feature = "transport_tcp")]
            Self::Tcp(t) => t.recv(buff).await,
            #[cfg(feature = "transport_sim")]
            Self::Sim(t) => t.recv(buff).await,
            #[cfg(not(any(feature = "transport_tcp", feature = "transport_sim")))]
            _ => unreachable!("no transports enabled"),
        }
    }
}
