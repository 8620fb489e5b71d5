// Copyright (c) 2022-2023 The MobileCoin Foundation

//! In-process simulated device
//!
//! Runs the device [Dispatcher] and a selected application on a worker
//! thread, bridged to the async host via byte channels. The CDI and entropy
//! stream are derived from a seed so runs are reproducible.

use std::{
    sync::mpsc::{self, Receiver, Sender},
    thread::JoinHandle,
    time::Duration,
};

use async_trait::async_trait;
use log::{debug, info};
use rand::{rngs::StdRng, RngCore, SeedableRng};
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};

use tkey_core::engine::{
    App, ByteIo, Dispatcher, Driver, EntropySource, RandomApp, Signer, MAX_MESSAGE_SIZE,
};
use tkey_proto::Generation;

use crate::{transport::Transport, Error};

/// Application loaded on the simulated device
#[derive(Copy, Clone, Debug, PartialEq, clap::ValueEnum, strum::Display)]
pub enum SimApp {
    /// ed25519 signer
    Signer,
    /// Random bytes
    Random,
}

/// Simulated device configuration
#[derive(Clone, Debug, PartialEq)]
pub struct SimOptions {
    /// Protocol generation
    pub generation: Generation,
    /// Loaded application
    pub app: SimApp,
    /// Seed for CDI and entropy derivation
    pub seed: u64,
    /// Delay before simulated touch confirmation
    pub touch_delay: Duration,
}

impl Default for SimOptions {
    fn default() -> Self {
        Self {
            generation: Generation::TK1,
            app: SimApp::Signer,
            seed: 0,
            touch_delay: Duration::from_millis(0),
        }
    }
}

impl SimOptions {
    /// Compute the CDI the simulated device derives from the configured seed
    pub fn cdi(&self) -> [u8; 32] {
        let mut cdi = [0u8; 32];
        StdRng::seed_from_u64(self.seed).fill_bytes(&mut cdi);
        cdi
    }

    /// Compute the simulated unique device identifier
    pub fn udi(&self) -> [u8; 8] {
        let mut udi = [0u8; 8];
        udi[..2].copy_from_slice(&[0x00, 0x01]);
        udi[4..].copy_from_slice(&(self.seed as u32).to_be_bytes());
        udi
    }
}

/// Handle to a simulated device
pub struct SimDevice {
    input: Sender<u8>,
    output: UnboundedReceiver<u8>,
    _worker: JoinHandle<()>,
}

impl SimDevice {
    /// Spawn a simulated device
    pub fn spawn(opts: SimOptions) -> Self {
        let (input, rx) = mpsc::channel();
        let (tx, output) = unbounded_channel();

        info!(
            "Starting simulated {} device ({}, seed: {})",
            opts.app, opts.generation.name, opts.seed
        );

        let worker = std::thread::spawn(move || {
            let io = ChannelIo {
                rx,
                tx,
                closed: false,
            };
            let mut d = Dispatcher::new(io, opts.generation);

            match opts.app {
                SimApp::Signer => {
                    let drv = SimDriver {
                        cdi: opts.cdi(),
                        udi: opts.udi(),
                        touch_delay: opts.touch_delay,
                    };
                    let mut app = Signer::<_, MAX_MESSAGE_SIZE>::new(drv);
                    serve(&mut d, &mut app);
                }
                SimApp::Random => {
                    let entropy = SimEntropy(StdRng::seed_from_u64(!opts.seed));
                    let mut app: RandomApp<_> = RandomApp::new(&opts.cdi(), entropy);
                    serve(&mut d, &mut app);
                }
            }

            debug!("Simulated device exited");
        });

        Self {
            input,
            output,
            _worker: worker,
        }
    }

    /// Split into raw byte channels, for bridging to other transports
    pub fn into_parts(self) -> (Sender<u8>, UnboundedReceiver<u8>) {
        (self.input, self.output)
    }
}

#[async_trait]
impl Transport for SimDevice {
    async fn send(&mut self, frame: &[u8]) -> Result<(), Error> {
        for b in frame {
            self.input.send(*b).map_err(|_| Error::Closed)?;
        }
        Ok(())
    }

    async fn recv(&mut self, buff: &mut [u8]) -> Result<(), Error> {
        for b in buff.iter_mut() {
            *b = self.output.recv().await.ok_or(Error::Closed)?;
        }
        Ok(())
    }
}

/// Run the dispatcher until the host side of the link is dropped
fn serve<A: App>(d: &mut Dispatcher<ChannelIo>, app: &mut A) {
    loop {
        let r = d.step(app);

        if d.io().closed {
            break;
        }

        if let Err(e) = r {
            debug!("Frame rejected: {}", e);
        }
    }
}

/// Device side of the simulated link
struct ChannelIo {
    rx: Receiver<u8>,
    tx: UnboundedSender<u8>,
    closed: bool,
}

impl ByteIo for ChannelIo {
    fn read_byte(&mut self) -> u8 {
        match self.rx.recv() {
            Ok(b) => b,
            Err(_) => {
                // Invalid header byte, halts any frame in progress
                self.closed = true;
                0xff
            }
        }
    }

    fn write_byte(&mut self, b: u8) {
        // Host may have gone away, replies are discarded
        let _ = self.tx.send(b);
    }
}

/// Simulated platform driver
struct SimDriver {
    cdi: [u8; 32],
    udi: [u8; 8],
    touch_delay: Duration,
}

impl Driver for SimDriver {
    fn cdi(&self) -> [u8; 32] {
        self.cdi
    }

    fn udi(&self) -> [u8; 8] {
        self.udi
    }

    fn wait_for_confirmation(&mut self) {
        info!("Simulated touch in {:?}", self.touch_delay);
        std::thread::sleep(self.touch_delay);
    }
}

/// Seeded entropy source
struct SimEntropy(StdRng);

impl EntropySource for SimEntropy {
    fn entropy_word(&mut self) -> u32 {
        self.0.next_u32()
    }
}
