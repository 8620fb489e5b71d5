// Copyright (c) 2022-2023 The MobileCoin Foundation

//! TKey memory map and application constants

#![allow(unused)]

use tkey_core::{engine::MAX_MESSAGE_SIZE, platform::LED_BLUE, proto::Generation};

/// Protocol generation served by the firmware
pub const GENERATION: Generation = Generation::TK1;

/// Maximum message size for the signer
pub const MESSAGE_SIZE: usize = MAX_MESSAGE_SIZE;

/// LED colour while idle
pub const LED_IDLE: u32 = LED_BLUE;

/// TRNG
pub const TRNG_BASE: usize = 0xc000_0000;
pub const TRNG_STATUS: usize = TRNG_BASE + 0x24;
pub const TRNG_ENTROPY: usize = TRNG_BASE + 0x80;

/// UART
pub const UART_BASE: usize = 0xc300_0000;
pub const UART_RX_STATUS: usize = UART_BASE + 0x80;
pub const UART_RX_DATA: usize = UART_BASE + 0x84;
pub const UART_TX_STATUS: usize = UART_BASE + 0x100;
pub const UART_TX_DATA: usize = UART_BASE + 0x104;

/// Touch sensor
pub const TOUCH_BASE: usize = 0xc400_0000;
pub const TOUCH_STATUS: usize = TOUCH_BASE + 0x24;

/// TK1 system registers
pub const TK1_BASE: usize = 0xff00_0000;
pub const TK1_NAME0: usize = TK1_BASE;
pub const TK1_NAME1: usize = TK1_BASE + 0x04;
pub const TK1_VERSION: usize = TK1_BASE + 0x08;
pub const TK1_LED: usize = TK1_BASE + 0x24;
pub const TK1_UDI: usize = TK1_BASE + 0x48;
pub const TK1_CDI: usize = TK1_BASE + 0x80;
