// Copyright (c) 2022-2023 The MobileCoin Foundation

use tkey::proto::Generation;

/// Variable length hex encoded data
#[derive(Clone, PartialEq, Debug)]
pub struct HexData(pub Vec<u8>);

impl std::str::FromStr for HexData {
    type Err = hex::FromHexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim_start_matches("0x");
        hex::decode(s).map(HexData)
    }
}

impl AsRef<[u8]> for HexData {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl std::fmt::Display for HexData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", hex::encode(&self.0))
    }
}

/// Parse a protocol generation by name
pub fn parse_generation(s: &str) -> Result<Generation, String> {
    Generation::by_name(s).ok_or_else(|| {
        let names: Vec<_> = Generation::ALL.iter().map(|g| g.name).collect();
        format!("unknown generation '{}' (expected one of: {})", s, names.join(", "))
    })
}
