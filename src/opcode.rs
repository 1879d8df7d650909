use num_derive::FromPrimitive;

use crate::bimap::{reject_unknown, Bimap};
use crate::error::DnsError;

#[allow(dead_code)]
#[derive(FromPrimitive, Copy, Clone, PartialEq, Debug)]
pub enum Opcode {
    // Opcode 0: standard query
    Query = 0,
    // Opcode 1: inverse query (obsoleted by RFC 3425)
    IQuery = 1,
    // Opcode 2: server status request
    Status = 2,
    // 3 reserved for future use
    // Opcode 4: notify of zone change (RFC 1996)
    Zone = 4,
    // Opcode 5: dynamic update to DNS records (RFC 2136)
    Update = 5,
    // Opcode 6: DNS Stateful Operations (RFC 8490)
    DSO = 6,
    // 7-15 reserved for future use
}

impl Opcode {
    pub fn from_u8(value: u8) -> Option<Opcode> {
        num::FromPrimitive::from_u8(value)
    }

    pub fn to_u8(self) -> u8 {
        self as u8
    }

    fn bimap() -> Bimap {
        Bimap::new(
            "OPCODE",
            &[
                (0, "QUERY"),
                (1, "IQUERY"),
                (2, "STATUS"),
                (4, "NOTIFY"),
                (5, "UPDATE"),
            ],
            reject_unknown,
        )
    }

    pub fn name_of(code: u16) -> Result<String, DnsError> {
        Self::bimap().name_of(code)
    }

    pub fn code_of(name: &str) -> Result<u16, DnsError> {
        Self::bimap().code_of(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_lookup_matches_dig_output() {
        assert_eq!(Opcode::name_of(0).unwrap(), "QUERY");
        assert_eq!(Opcode::code_of("UPDATE").unwrap(), 5);
    }
}
