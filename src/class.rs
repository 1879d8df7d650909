// DNS CLASS, plus the OPT pseudo-record's reinterpretation of the class
// field as a UDP payload size (RFC 6891), carried as its own variant per
// the teacher's `DnsClass::EdnsPayloadSize`.

use crate::bimap::{reject_unknown, Bimap};
use crate::error::DnsError;

#[allow(dead_code)]
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum DnsClass {
    IN,
    CS,
    CH,
    HS,
    NONE,
    ANY,
    /// Only meaningful on an OPT record: the sender's UDP payload size.
    EdnsPayloadSize(u16),
}

impl DnsClass {
    pub fn from_u16(class: u16) -> DnsClass {
        match class {
            1 => DnsClass::IN,
            2 => DnsClass::CS,
            3 => DnsClass::CH,
            4 => DnsClass::HS,
            254 => DnsClass::NONE,
            255 => DnsClass::ANY,
            other => DnsClass::EdnsPayloadSize(other),
        }
    }

    pub fn to_u16(self) -> u16 {
        match self {
            DnsClass::IN => 1,
            DnsClass::CS => 2,
            DnsClass::CH => 3,
            DnsClass::HS => 4,
            DnsClass::NONE => 254,
            DnsClass::ANY => 255,
            DnsClass::EdnsPayloadSize(payload) => payload,
        }
    }

    fn bimap() -> Bimap {
        Bimap::new(
            "CLASS",
            &[(1, "IN"), (2, "CS"), (3, "CH"), (4, "HS"), (254, "NONE"), (255, "ANY")],
            reject_unknown,
        )
    }

    /// Text name for a *non-EDNS* class value, used in zone/dig parsing.
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
    fn known_classes_round_trip() {
        assert_eq!(DnsClass::from_u16(1), DnsClass::IN);
        assert_eq!(DnsClass::IN.to_u16(), 1);
        assert_eq!(DnsClass::code_of("IN").unwrap(), 1);
    }

    #[test]
    fn unknown_class_value_becomes_edns_payload_size() {
        assert_eq!(DnsClass::from_u16(4096), DnsClass::EdnsPayloadSize(4096));
        assert_eq!(DnsClass::EdnsPayloadSize(4096).to_u16(), 4096);
    }
}
