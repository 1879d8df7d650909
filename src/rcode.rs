use num_derive::FromPrimitive;

use crate::bimap::{reject_unknown, Bimap};
use crate::error::DnsError;

#[allow(dead_code)]
#[derive(FromPrimitive, Clone, Copy, PartialEq, Debug)]
pub enum RCode {
    NoError = 0,
    FormError = 1,
    ServFail = 2,
    NXDomain = 3,
    NotImp = 4,
    Refused = 5,
    YXDomain = 6,
    YXRRSet = 7,
    NXRRSet = 8,
    NotAuth = 9,
    NotZone = 10,
    DSOTypeNI = 11,
}

impl RCode {
    pub fn from_u8(value: u8) -> Option<RCode> {
        num::FromPrimitive::from_u8(value)
    }

    pub fn to_u8(self) -> u8 {
        self as u8
    }

    fn bimap() -> Bimap {
        Bimap::new(
            "RCODE",
            &[
                (0, "NOERROR"),
                (1, "FORMERR"),
                (2, "SERVFAIL"),
                (3, "NXDOMAIN"),
                (4, "NOTIMP"),
                (5, "REFUSED"),
                (6, "YXDOMAIN"),
                (7, "YXRRSET"),
                (8, "NXRRSET"),
                (9, "NOTAUTH"),
                (10, "NOTZONE"),
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
        assert_eq!(RCode::name_of(3).unwrap(), "NXDOMAIN");
        assert_eq!(RCode::code_of("REFUSED").unwrap(), 5);
    }
}
