// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Protocol generations
//!
//! Length tables and opcode numbering changed between device generations,
//! a [Generation] bundles these so the codec and applications can be
//! parameterised without touching the framing logic.

use crate::{
    header::{LengthClass, LengthTable},
    random::RandomCmd,
    signer::SignerCmd,
};

/// Opcode table entry, binding an application command to its wire codes
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct Opcode<C> {
    /// Application command
    pub cmd: C,
    /// Request opcode (first payload byte of the command frame)
    pub req: u8,
    /// Response code (first payload byte of the reply frame)
    pub rsp: u8,
    /// Required request length class, `None` accepts any length
    pub req_class: Option<LengthClass>,
    /// Reply length class
    pub rsp_class: LengthClass,
}

/// Closed per-application command set
pub trait AppCommand: Copy + PartialEq + core::fmt::Debug + 'static {
    /// Name / version query, common to all applications
    const GET_NAME_VERSION: Self;

    /// Fetch the opcode table for this application in a given generation
    fn table(gen: &Generation) -> &'static [Opcode<Self>];

    /// Resolve a request opcode to a table entry
    fn lookup(gen: &Generation, req: u8) -> Option<Opcode<Self>> {
        Self::table(gen).iter().find(|o| o.req == req).copied()
    }

    /// Resolve a command to its table entry
    fn opcode(gen: &Generation, cmd: Self) -> Option<Opcode<Self>> {
        Self::table(gen).iter().find(|o| o.cmd == cmd).copied()
    }
}

/// Protocol generation configuration
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct Generation {
    /// Generation name
    pub name: &'static str,
    /// Length class table
    pub lengths: LengthTable,
    /// Signer application opcodes
    pub signer: &'static [Opcode<SignerCmd>],
    /// Random application opcodes
    pub random: &'static [Opcode<RandomCmd>],
    /// Response code for unknown commands
    pub unknown_rsp: u8,
}

impl Generation {
    /// Early generation with echoed response codes
    pub const MTA1: Generation = Generation {
        name: "mta1",
        lengths: LengthTable::LEN_128,
        signer: MTA1_SIGNER,
        random: TK1_RANDOM,
        unknown_rsp: 0xff,
    };

    /// Request / response paired opcodes with 128 byte frames
    pub const TK1: Generation = Generation {
        name: "tk1",
        lengths: LengthTable::LEN_128,
        signer: TK1_SIGNER,
        random: TK1_RANDOM,
        unknown_rsp: 0xff,
    };

    /// Request / response paired opcodes with 512 byte frames
    pub const TK1_512: Generation = Generation {
        name: "tk1-512",
        lengths: LengthTable::LEN_512,
        signer: TK1_SIGNER,
        random: TK1_RANDOM,
        unknown_rsp: 0xff,
    };

    /// All known generations
    pub const ALL: [Generation; 3] = [Self::MTA1, Self::TK1, Self::TK1_512];

    /// Look up a generation by name
    pub fn by_name(name: &str) -> Option<Generation> {
        Self::ALL.iter().find(|g| g.name == name).copied()
    }

    /// Largest frame payload
    pub fn frame_max(&self) -> usize {
        self.lengths.max()
    }

    /// Message bytes carried per sign-data frame (payload less opcode)
    pub fn chunk_max(&self) -> usize {
        self.frame_max() - 1
    }

    /// Random bytes carried per reply (payload less response code and status)
    pub fn random_max(&self) -> usize {
        self.frame_max() - 2
    }
}

const fn op<C>(
    cmd: C,
    req: u8,
    rsp: u8,
    req_class: Option<LengthClass>,
    rsp_class: LengthClass,
) -> Opcode<C> {
    Opcode {
        cmd,
        req,
        rsp,
        req_class,
        rsp_class,
    }
}

use LengthClass::*;

const MTA1_SIGNER: &[Opcode<SignerCmd>] = &[
    op(SignerCmd::GetPublicKey, 0x01, 0x01, None, LenMax),
    op(SignerCmd::SetSize, 0x02, 0x02, Some(Len32), Len4),
    op(SignerCmd::SignData, 0x03, 0x03, Some(LenMax), Len4),
    op(SignerCmd::GetSignature, 0x04, 0x04, None, LenMax),
    op(SignerCmd::GetNameVersion, 0x05, 0x05, None, Len32),
];

const TK1_SIGNER: &[Opcode<SignerCmd>] = &[
    op(SignerCmd::GetPublicKey, 0x01, 0x02, None, LenMax),
    op(SignerCmd::SetSize, 0x03, 0x04, Some(Len32), Len4),
    op(SignerCmd::SignData, 0x05, 0x06, Some(LenMax), Len4),
    op(SignerCmd::GetSignature, 0x07, 0x08, None, LenMax),
    op(SignerCmd::GetNameVersion, 0x09, 0x0a, None, Len32),
    op(SignerCmd::GetUdi, 0x0b, 0x0c, None, Len32),
];

const TK1_RANDOM: &[Opcode<RandomCmd>] = &[
    op(RandomCmd::GetNameVersion, 0x01, 0x02, None, Len32),
    op(RandomCmd::GetRandom, 0x03, 0x04, Some(Len4), LenMax),
];

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn opcode_lookup() {
        let g = Generation::TK1;

        let o = SignerCmd::lookup(&g, 0x05).unwrap();
        assert_eq!(o.cmd, SignerCmd::SignData);
        assert_eq!(o.rsp, 0x06);

        let o = SignerCmd::opcode(&g, SignerCmd::GetSignature).unwrap();
        assert_eq!(o.req, 0x07);

        assert!(SignerCmd::lookup(&g, 0x42).is_none());

        // Renumbered between generations
        let o = SignerCmd::lookup(&Generation::MTA1, 0x05).unwrap();
        assert_eq!(o.cmd, SignerCmd::GetNameVersion);
        assert!(SignerCmd::opcode(&Generation::MTA1, SignerCmd::GetUdi).is_none());
    }

    #[test]
    fn opcode_tables_unique() {
        for g in Generation::ALL {
            for (i, a) in g.signer.iter().enumerate() {
                for b in &g.signer[i + 1..] {
                    assert_ne!(a.req, b.req, "{} duplicate signer opcode", g.name);
                    assert_ne!(a.cmd, b.cmd, "{} duplicate signer command", g.name);
                }
            }
        }
    }

    #[test]
    fn replies_fit_frames() {
        for g in Generation::ALL {
            // Response code + status + signature
            assert!(1 + 1 + 64 <= g.frame_max());
            assert_eq!(g.chunk_max(), g.frame_max() - 1);

            assert_eq!(Generation::by_name(g.name), Some(g));
        }
    }
}
