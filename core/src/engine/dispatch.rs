// Copyright (c) 2022-2023 The MobileCoin Foundation

use tkey_proto::{
    decode_header,
    prelude::{encode_frame, Empty, StatusResp, FRAME_MAX},
    AppCommand, Endpoint, FrameHeader, Generation, LengthClass, Opcode, Status,
};

use super::{App, ByteIo, Error, Request};

/// Command loop over a blocking byte link
///
/// Reads one frame at a time, resolves the opcode against the [App] command
/// table for the active [Generation], and writes exactly one reply per
/// accepted command. Frames with malformed headers or addressed to other
/// endpoints are dropped, frames addressed to the firmware are answered with
/// a minimal `NOK` frame so the caller is not left waiting.
pub struct Dispatcher<IO: ByteIo> {
    io: IO,
    gen: Generation,
    buff: [u8; FRAME_MAX],
}

impl<IO: ByteIo> Dispatcher<IO> {
    /// Create a dispatcher over the provided link
    pub fn new(io: IO, gen: Generation) -> Self {
        Self {
            io,
            gen,
            buff: [0u8; FRAME_MAX],
        }
    }

    /// Fetch the active protocol generation
    pub fn generation(&self) -> &Generation {
        &self.gen
    }

    /// Fetch the underlying link
    pub fn io(&mut self) -> &mut IO {
        &mut self.io
    }

    /// Run the command loop
    pub fn run<A: App>(&mut self, app: &mut A) -> ! {
        loop {
            if let Err(_e) = self.step(app) {
                #[cfg(feature = "log")]
                log::warn!("frame rejected: {:?}", _e);
            }
        }
    }

    /// Receive and handle a single frame
    ///
    /// Errors report why a frame was rejected, the reply (if any) has
    /// already been written.
    #[cfg_attr(feature = "noinline", inline(never))]
    pub fn step<A: App>(&mut self, app: &mut A) -> Result<(), Error> {
        let header = match decode_header(self.io.read_byte(), &self.gen.lengths) {
            Ok(h) => h,
            // Payload length unknown, resynchronise on the next byte
            Err(_) => return Err(Error::MalformedHeader),
        };

        // Payload must carry an opcode and fit the frame buffer
        if header.len == 0 || header.len > self.buff.len() {
            for _ in 0..header.len {
                self.io.read_byte();
            }
            return Err(Error::MalformedHeader);
        }

        self.io.read(&mut self.buff[..header.len]);

        #[cfg(feature = "log")]
        log::debug!("rx: {:?}", header);

        match header.endpoint {
            Endpoint::Software => (),
            Endpoint::Firmware => {
                self.reply(&header, Status::Bad, LengthClass::Len1, 0x00, &Empty)?;
                return Err(Error::WrongEndpoint);
            }
            _ => return Err(Error::WrongEndpoint),
        }

        let op: Opcode<A::Cmd> = match A::Cmd::lookup(&self.gen, self.buff[0]) {
            Some(op) => op,
            None => {
                let code = self.gen.unknown_rsp;
                self.reply(&header, Status::Ok, LengthClass::Len1, code, &Empty)?;
                return Err(Error::UnknownCommand);
            }
        };

        let r = match op.req_class {
            Some(c) if c != header.class => Err(Error::InvalidLength),
            _ => {
                let req = Request {
                    gen: &self.gen,
                    header,
                    body: &self.buff[1..header.len],
                };
                app.update(op.cmd, &req)
            }
        };

        match r {
            Ok(output) => self.reply(&header, Status::Ok, op.rsp_class, op.rsp, &output),
            Err(e) if e.is_precondition() => {
                #[cfg(feature = "log")]
                log::debug!("{:?} failed: {:?}", op.cmd, e);

                let body = StatusResp {
                    status: Status::Bad,
                };
                self.reply(&header, Status::Bad, op.rsp_class, op.rsp, &body)?;

                Err(e)
            }
            Err(e) => Err(e),
        }
    }

    /// Encode and write a reply frame echoing the request id and endpoint
    fn reply<B>(
        &mut self,
        req: &FrameHeader,
        status: Status,
        class: LengthClass,
        code: u8,
        body: &B,
    ) -> Result<(), Error>
    where
        B: encdec::Encode<Error = tkey_proto::ProtoError>,
    {
        let n = encode_frame(
            &mut self.buff,
            &self.gen.lengths,
            req.id,
            req.endpoint,
            status,
            class,
            code,
            body,
        )?;

        self.io.write(&self.buff[..n]);

        Ok(())
    }
}
