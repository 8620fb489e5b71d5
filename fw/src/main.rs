// Copyright (c) 2022-2023 The MobileCoin Foundation

//! TKey firmware entry point, binding the platform peripherals to the
//! signer (or with `--features random`, the random) application.

#![no_std]
#![no_main]

use core::panic::PanicInfo;

use tkey_core::{
    engine::Dispatcher,
    platform::{Mmio, Register, Touch, Trng, Uart, Words, LED_GREEN, LED_RED},
};

mod consts;
use consts::*;

/// Bind `N` consecutive registers from `base`
///
/// # Safety
/// `base` must address `N` valid device registers.
unsafe fn words<const N: usize>(base: usize) -> Words<Mmio, N> {
    Words(core::array::from_fn(|i| Mmio::new(base + i * 4)))
}

#[no_mangle]
pub extern "C" fn main() -> ! {
    // Safety: addresses are fixed by the TK1 memory map
    let (uart, led) = unsafe {
        (
            Uart {
                rx_status: Mmio::new(UART_RX_STATUS),
                rx_data: Mmio::new(UART_RX_DATA),
                tx_status: Mmio::new(UART_TX_STATUS),
                tx_data: Mmio::new(UART_TX_DATA),
            },
            Mmio::new(TK1_LED),
        )
    };

    led.write(LED_IDLE);

    let mut dispatcher = Dispatcher::new(uart, GENERATION);

    #[cfg(not(feature = "random"))]
    {
        use tkey_core::{engine::Signer, platform::TkDriver};

        let drv = unsafe {
            TkDriver {
                cdi: words(TK1_CDI),
                udi: words(TK1_UDI),
                touch: Touch {
                    status: Mmio::new(TOUCH_STATUS),
                    led: Mmio::new(TK1_LED),
                    colour: LED_GREEN,
                },
            }
        };

        let mut app = Signer::<_, MESSAGE_SIZE>::new(drv);
        dispatcher.run(&mut app)
    }

    #[cfg(feature = "random")]
    {
        use tkey_core::engine::RandomApp;

        let (cdi, trng) = unsafe {
            (
                words::<8>(TK1_CDI).bytes::<32>(),
                Trng {
                    status: Mmio::new(TRNG_STATUS),
                    entropy: Mmio::new(TRNG_ENTROPY),
                },
            )
        };

        let mut app: RandomApp<_> = RandomApp::new(&cdi, trng);
        dispatcher.run(&mut app)
    }
}

/// Halt with the LED lit red
#[panic_handler]
fn panic(_info: &PanicInfo) -> ! {
    // Safety: LED register address is fixed by the TK1 memory map
    unsafe { Mmio::new(TK1_LED) }.write(LED_RED);

    loop {}
}
