//! Prelude to simplify downstream use of protocol objects
//!

pub use crate::{
    frame::{decode_reply, encode_frame, Empty, Reply, FRAME_MAX},
    generation::{AppCommand, Generation, Opcode},
    header::{
        decode_header, decode_reply_header, encode_header, Endpoint, FrameHeader, LengthClass,
        LengthTable, Status,
    },
    name_version::NameVersion,
    random::{RandomCmd, RandomReq, RandomResp},
    signer::{
        PublicKeyResp, SetSizeReq, SignDataReq, SignatureResp, SignerCmd, StatusResp, UdiResp,
    },
    ProtoError,
};
