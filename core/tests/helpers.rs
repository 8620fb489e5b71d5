#![allow(unused)]

use std::collections::VecDeque;

use log::{debug, trace};

use tkey_core::{
    engine::{App, ByteIo, Dispatcher, Driver, EntropySource, Error},
    proto::prelude::*,
};

pub const CDI: [u8; 32] = [
    0x9e, 0x3c, 0x1a, 0x52, 0x07, 0xd4, 0x68, 0x21, 0x4b, 0x90, 0xee, 0x13, 0x7a, 0x35, 0xc8, 0x06,
    0xf1, 0x2d, 0x84, 0x5f, 0xa0, 0x3e, 0x67, 0xb9, 0x0c, 0xd2, 0x41, 0x98, 0x1f, 0x76, 0xe5, 0x2a,
];

pub const UDI: [u8; 8] = [0x00, 0x01, 0x33, 0x37, 0x00, 0x00, 0x00, 0x2a];

/// In-memory byte link
#[derive(Default)]
pub struct TestLink {
    pub rx: VecDeque<u8>,
    pub tx: Vec<u8>,
}

impl ByteIo for TestLink {
    fn read_byte(&mut self) -> u8 {
        self.rx.pop_front().expect("dispatcher read past end of input")
    }

    fn write_byte(&mut self, b: u8) {
        self.tx.push(b);
    }
}

/// Driver with a fixed CDI, counting touch confirmations
#[derive(Default)]
pub struct TestDriver {
    pub confirmations: usize,
}

impl Driver for TestDriver {
    fn cdi(&self) -> [u8; 32] {
        CDI
    }

    fn udi(&self) -> [u8; 8] {
        UDI
    }

    fn wait_for_confirmation(&mut self) {
        debug!("touch confirmed");
        self.confirmations += 1;
    }
}

/// Entropy source replaying a counter
pub struct TestEntropy(pub u32);

impl EntropySource for TestEntropy {
    fn entropy_word(&mut self) -> u32 {
        let v = self.0;
        self.0 = self.0.wrapping_add(0x9e37_79b9);
        v
    }
}

/// Decoded reply frame
#[derive(Clone, PartialEq, Debug)]
pub struct TestReply {
    pub header: FrameHeader,
    pub code: u8,
    pub body: Vec<u8>,
}

/// Host side of a dispatcher under test
pub struct TestHost {
    pub dispatcher: Dispatcher<TestLink>,
    id: u8,
}

impl TestHost {
    pub fn new(gen: Generation) -> Self {
        Self {
            dispatcher: Dispatcher::new(TestLink::default(), gen),
            id: 0,
        }
    }

    pub fn generation(&self) -> Generation {
        *self.dispatcher.generation()
    }

    /// Send a command frame and collect the reply, if any
    pub fn exchange<A: App, B: encdec::Encode<Error = ProtoError>>(
        &mut self,
        app: &mut A,
        cmd: A::Cmd,
        class: LengthClass,
        body: &B,
    ) -> (Result<(), Error>, Option<TestReply>) {
        let gen = self.generation();
        let op = A::Cmd::opcode(&gen, cmd).expect("command not available in generation");

        self.id = (self.id + 1) & 0x03;

        let mut buff = [0u8; FRAME_MAX];
        let n = encode_frame(
            &mut buff,
            &gen.lengths,
            self.id,
            Endpoint::Software,
            Status::Ok,
            class,
            op.req,
            body,
        )
        .expect("command encode failed");

        self.raw(app, &buff[..n])
    }

    /// Send raw frame bytes and collect the reply, if any
    pub fn raw<A: App>(&mut self, app: &mut A, frame: &[u8]) -> (Result<(), Error>, Option<TestReply>) {
        let gen = self.generation();

        trace!("tx: {:02x?}", frame);

        let link = self.dispatcher.io();
        link.rx.extend(frame.iter());
        link.tx.clear();

        let r = self.dispatcher.step(app);

        let link = self.dispatcher.io();
        assert!(link.rx.is_empty(), "frame not fully consumed");

        if link.tx.is_empty() {
            return (r, None);
        }

        trace!("rx: {:02x?}", link.tx);

        let reply = decode_reply(&link.tx, &gen.lengths).expect("reply decode failed");
        assert_eq!(link.tx.len(), 1 + reply.header.len, "reply length mismatch");

        let reply = TestReply {
            header: reply.header,
            code: reply.code,
            body: reply.body.to_vec(),
        };

        (r, Some(reply))
    }
}

/// Initialise logging for tests
pub fn setup() {
    let _ = simplelog::SimpleLogger::init(log::LevelFilter::Debug, Default::default());
}
