// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Handle for connected TKey devices
//!
//! This provides methods for interacting with the signer and random
//! applications and is generic over [Transport] types

use std::{
    sync::{
        atomic::{AtomicU8, Ordering},
        Arc,
    },
    time::Duration,
};

use ed25519_dalek::{Signature, Verifier, VerifyingKey};
use encdec::{Decode, DecodeOwned, Encode};
use log::{debug, trace};
use tokio::sync::Mutex;

use tkey_core::engine::MAX_MESSAGE_SIZE;
use tkey_proto::{
    decode_reply_header,
    prelude::{
        encode_frame, Empty, NameVersion, PublicKeyResp, RandomCmd, RandomReq, RandomResp,
        SetSizeReq, SignDataReq, SignatureResp, SignerCmd, UdiResp, FRAME_MAX,
    },
    AppCommand, Endpoint, Generation, LengthClass, ProtoError, Status,
};

use crate::{transport::Transport, Error};

/// Handle for a connected TKey device.
///
/// This is generic over [Transport] types to support different
/// underlying connections
#[derive(Clone)]
pub struct DeviceHandle<T: Transport> {
    /// Transport for communication
    t: Arc<Mutex<T>>,
    /// Protocol generation of the loaded application
    gen: Generation,
    /// Rolling frame id
    id: Arc<AtomicU8>,
    /// Maximum message size accepted by the signer
    max_message: usize,
    /// Timeout for user touch confirmation
    user_timeout_s: usize,
    /// Timeout for frame requests
    request_timeout_s: usize,
}

/// Create a [DeviceHandle] wrapper from a type implementing [Transport]
impl<T: Transport> From<T> for DeviceHandle<T> {
    fn from(t: T) -> Self {
        Self {
            t: Arc::new(Mutex::new(t)),
            gen: Generation::TK1,
            id: Arc::new(AtomicU8::new(0)),
            max_message: MAX_MESSAGE_SIZE,
            user_timeout_s: 30,
            request_timeout_s: 2,
        }
    }
}

impl<T: Transport> DeviceHandle<T> {
    /// Set the protocol generation
    pub fn with_generation(mut self, gen: Generation) -> Self {
        self.gen = gen;
        self
    }

    /// Set request and user confirmation timeouts
    pub fn with_timeouts(mut self, request_timeout_s: usize, user_timeout_s: usize) -> Self {
        self.request_timeout_s = request_timeout_s;
        self.user_timeout_s = user_timeout_s;
        self
    }

    /// Set the maximum message size for signing
    pub fn with_max_message(mut self, max_message: usize) -> Self {
        self.max_message = max_message;
        self
    }

    /// Fetch the active protocol generation
    pub fn generation(&self) -> &Generation {
        &self.gen
    }

    /// Helper to fetch user interaction timeout
    fn user_timeout(&self) -> Duration {
        Duration::from_secs(self.user_timeout_s as u64)
    }

    /// Helper to fetch frame request timeout
    fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_s as u64)
    }

    /// Fetch application name and version
    pub async fn name_version<C: AppCommand>(&self) -> Result<NameVersion, Error> {
        debug!("Requesting name / version");

        let resp = self
            .request(
                C::GET_NAME_VERSION,
                LengthClass::Len1,
                &Empty,
                self.request_timeout(),
            )
            .await?;

        let (nv, _) = NameVersion::decode_owned(&resp)?;

        Ok(nv)
    }

    /// Fetch the signer public key
    pub async fn public_key(&self) -> Result<VerifyingKey, Error> {
        debug!("Requesting public key");

        let resp = self
            .request(
                SignerCmd::GetPublicKey,
                LengthClass::Len1,
                &Empty,
                self.request_timeout(),
            )
            .await?;

        let (r, _) = PublicKeyResp::decode_owned(&resp)?;

        VerifyingKey::from_bytes(&r.public_key).map_err(|_| Error::InvalidKey)
    }

    /// Fetch the unique device identifier
    pub async fn udi(&self) -> Result<[u8; 8], Error> {
        debug!("Requesting UDI");

        let resp = self
            .request(
                SignerCmd::GetUdi,
                LengthClass::Len1,
                &Empty,
                self.request_timeout(),
            )
            .await?;

        let (r, _) = UdiResp::decode_owned(&resp)?;

        Ok(r.udi)
    }

    /// Sign a message, streaming it to the device in chunks
    ///
    /// The final chunk blocks on touch confirmation, so is subject to the
    /// user timeout.
    pub async fn sign(&self, message: &[u8]) -> Result<[u8; 64], Error> {
        if message.is_empty() || message.len() > self.max_message {
            return Err(Error::MessageSize(message.len(), self.max_message));
        }

        debug!("Signing {} byte message", message.len());

        let req = SetSizeReq {
            size: message.len() as u32,
        };
        self.request(
            SignerCmd::SetSize,
            LengthClass::Len32,
            &req,
            self.request_timeout(),
        )
        .await?;

        let chunk_max = self.gen.chunk_max();
        let n = (message.len() + chunk_max - 1) / chunk_max;

        for (i, data) in message.chunks(chunk_max).enumerate() {
            let timeout = match i + 1 == n {
                true => {
                    debug!("Awaiting touch confirmation");
                    self.user_timeout()
                }
                false => self.request_timeout(),
            };

            trace!("Sending chunk {}/{}", i + 1, n);

            let r = self
                .request(
                    SignerCmd::SignData,
                    LengthClass::LenMax,
                    &SignDataReq { data },
                    timeout,
                )
                .await;

            match r {
                Err(Error::RequestTimeout) if i + 1 == n => return Err(Error::UserTimeout),
                Err(e) => return Err(e),
                Ok(_) => (),
            }
        }

        let resp = self
            .request(
                SignerCmd::GetSignature,
                LengthClass::Len1,
                &Empty,
                self.request_timeout(),
            )
            .await?;

        let (r, _) = SignatureResp::decode_owned(&resp)?;

        Ok(r.signature)
    }

    /// Sign a message and verify the signature against the device public key
    pub async fn sign_verified(&self, message: &[u8]) -> Result<(VerifyingKey, [u8; 64]), Error> {
        let public_key = self.public_key().await?;
        let signature = self.sign(message).await?;

        verify(&public_key, message, &signature)?;

        Ok((public_key, signature))
    }

    /// Fetch `n` random bytes, issuing as many requests as required
    pub async fn random(&self, n: usize) -> Result<Vec<u8>, Error> {
        debug!("Requesting {} random bytes", n);

        // Count is a single byte on the wire
        let chunk_max = self.gen.random_max().min(u8::MAX as usize);
        let mut out = Vec::with_capacity(n);

        while out.len() < n {
            let len = (n - out.len()).min(chunk_max);

            let resp = self
                .request(
                    RandomCmd::GetRandom,
                    LengthClass::Len4,
                    &RandomReq { len: len as u8 },
                    self.request_timeout(),
                )
                .await?;

            let (r, _) = RandomResp::decode(&resp)?;
            if r.data.len() < len {
                return Err(Error::UnexpectedResponse);
            }

            out.extend_from_slice(&r.data[..len]);
        }

        Ok(out)
    }

    /// Issue a command frame and await the matching reply, returning the
    /// body following the response code
    async fn request<C: AppCommand, B: Encode<Error = ProtoError>>(
        &self,
        cmd: C,
        class: LengthClass,
        body: &B,
        timeout: Duration,
    ) -> Result<Vec<u8>, Error> {
        let op = C::opcode(&self.gen, cmd).ok_or(Error::Unsupported(self.gen.name))?;
        let id = self.id.fetch_add(1, Ordering::Relaxed) & 0x03;

        let mut buff = [0u8; FRAME_MAX];
        let n = encode_frame(
            &mut buff,
            &self.gen.lengths,
            id,
            Endpoint::Software,
            Status::Ok,
            class,
            op.req,
            body,
        )?;

        debug!("Request {:?} (id: {}, {} bytes)", cmd, id, n);
        trace!("tx: {:02x?}", &buff[..n]);

        let mut t = self.t.lock().await;
        t.send(&buff[..n]).await?;

        let header = tokio::time::timeout(timeout, async {
            t.recv(&mut buff[..1]).await?;
            let header = decode_reply_header(buff[0], &self.gen.lengths)?;
            t.recv(&mut buff[1..][..header.len]).await?;
            Ok::<_, Error>(header)
        })
        .await??;

        drop(t);

        let payload = &buff[1..][..header.len];
        trace!("rx: {:02x?}", payload);

        if header.id != id || header.endpoint != Endpoint::Software {
            return Err(Error::UnexpectedResponse);
        }

        let code = payload[0];
        if code != op.rsp {
            return match code == self.gen.unknown_rsp {
                true => Err(Error::UnknownCommand),
                false => Err(Error::UnexpectedResponse),
            };
        }

        if header.status != Status::Ok {
            debug!("Request {:?} failed", cmd);
            return Err(Error::Status(header.status));
        }

        Ok(payload[1..].to_vec())
    }
}

/// Verify a signature returned by the device
pub fn verify(public_key: &VerifyingKey, message: &[u8], signature: &[u8; 64]) -> Result<(), Error> {
    let signature = Signature::from_bytes(signature);

    public_key
        .verify(message, &signature)
        .map_err(|_| Error::InvalidSignature)
}
