// Copyright (c) 2022-2023 The MobileCoin Foundation

#![allow(unused)]

use std::{net::SocketAddr, str::FromStr, time::Duration};

use log::{debug, LevelFilter};
use portpicker::pick_unused_port;
use simplelog::SimpleLogger;
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::TcpListener,
};

use tkey::{
    proto::Generation,
    transport::{SimApp, SimDevice, SimOptions, TcpTransport},
    DeviceHandle,
};

/// Setup logging, level overridable via `LOG_LEVEL`
pub fn setup() {
    let log_level = match std::env::var("LOG_LEVEL").map(|v| LevelFilter::from_str(&v)) {
        Ok(Ok(l)) => l,
        _ => LevelFilter::Debug,
    };

    let _ = SimpleLogger::init(log_level, simplelog::Config::default());
}

/// Simulated device options for a generation and app
pub fn options(generation: Generation, app: SimApp) -> SimOptions {
    SimOptions {
        generation,
        app,
        seed: 7,
        touch_delay: Duration::from_millis(10),
    }
}

/// Spawn a simulated device and connect a handle
pub fn sim(opts: &SimOptions) -> DeviceHandle<SimDevice> {
    setup();

    DeviceHandle::from(SimDevice::spawn(opts.clone())).with_generation(opts.generation)
}

/// Spawn a simulated device behind a TCP bridge and connect a handle
pub async fn tcp(opts: &SimOptions) -> DeviceHandle<TcpTransport> {
    setup();

    let port = pick_unused_port().unwrap();
    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    let listener = TcpListener::bind(addr).await.unwrap();

    let (input, mut output) = SimDevice::spawn(opts.clone()).into_parts();

    tokio::spawn(async move {
        let (s, peer) = listener.accept().await.unwrap();
        debug!("Bridge connection from {}", peer);

        let (mut r, mut w) = s.into_split();

        // Device to host
        tokio::spawn(async move {
            while let Some(b) = output.recv().await {
                if w.write_all(&[b]).await.is_err() {
                    break;
                }
            }
        });

        // Host to device
        let mut buff = [0u8; 256];
        loop {
            let n = match r.read(&mut buff).await {
                Ok(0) | Err(_) => break,
                Ok(n) => n,
            };

            for b in &buff[..n] {
                if input.send(*b).is_err() {
                    return;
                }
            }
        }
    });

    let t = TcpTransport::connect(addr).await.unwrap();

    DeviceHandle::from(t).with_generation(opts.generation)
}
