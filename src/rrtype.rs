// The RR TYPE enumeration. Mirrors IANA's registry; values copied from the
// teacher's own `DnsRRType` (itself generated from the IANA list), extended
// with the Bimap-backed text name lookup the zone/dig parsers and `to_zone`
// rendering need, including the QTYPE `TYPEn` fallback for unassigned codes.

use num_derive::FromPrimitive;

use crate::bimap::{unknown_qtype, Bimap};
use crate::error::DnsError;

#[allow(dead_code)]
#[derive(FromPrimitive, Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum RrType {
    A = 1,
    NS = 2,
    MD = 3,
    MF = 4,
    CNAME = 5,
    SOA = 6,
    MB = 7,
    MG = 8,
    MR = 9,
    NULL = 10,
    WKS = 11,
    PTR = 12,
    HINFO = 13,
    MINFO = 14,
    MX = 15,
    TXT = 16,
    RP = 17,
    AFSDB = 18,
    X25 = 19,
    ISDN = 20,
    RT = 21,
    NSAP = 22,
    NSAPPTR = 23,
    SIG = 24,
    KEY = 25,
    PX = 26,
    GPOS = 27,
    AAAA = 28,
    LOC = 29,
    NXT = 30,
    EID = 31,
    NIMLOC = 32,
    SRV = 33,
    ATMA = 34,
    NAPTR = 35,
    KX = 36,
    CERT = 37,
    A6 = 38,
    DNAME = 39,
    SINK = 40,
    OPT = 41,
    APL = 42,
    DS = 43,
    SSHFP = 44,
    IPSECKEY = 45,
    RRSIG = 46,
    NSEC = 47,
    DNSKEY = 48,
    DHCID = 49,
    NSEC3 = 50,
    NSEC3PARAM = 51,
    TLSA = 52,
    SMIMEA = 53,
    HIP = 55,
    NINFO = 56,
    RKEY = 57,
    TALINK = 58,
    CDS = 59,
    CDNSKEY = 60,
    OPENPGPKEY = 61,
    CSYNC = 62,
    ZONEMD = 63,
    SVCB = 64,
    HTTPS = 65,
    SPF = 99,
    EUI48 = 108,
    EUI64 = 109,
    TKEY = 249,
    TSIG = 250,
    IXFR = 251,
    AXFR = 252,
    MAILB = 253,
    MAILA = 254,
    ANY = 255,
    URI = 256,
    CAA = 257,
    AVC = 258,
    DOA = 259,
    AMTRELAY = 260,
    TA = 32768,
    DLV = 32769,
}

impl RrType {
    pub fn to_u16(self) -> u16 {
        self as u16
    }

    pub fn from_u16(value: u16) -> Option<RrType> {
        num::FromPrimitive::from_u16(value)
    }

    fn bimap() -> Bimap {
        Bimap::new(
            "QTYPE",
            &[
                (1, "A"),
                (2, "NS"),
                (5, "CNAME"),
                (6, "SOA"),
                (10, "NULL"),
                (12, "PTR"),
                (13, "HINFO"),
                (15, "MX"),
                (16, "TXT"),
                (17, "RP"),
                (18, "AFSDB"),
                (24, "SIG"),
                (25, "KEY"),
                (28, "AAAA"),
                (29, "LOC"),
                (33, "SRV"),
                (35, "NAPTR"),
                (36, "KX"),
                (37, "CERT"),
                (38, "A6"),
                (39, "DNAME"),
                (41, "OPT"),
                (42, "APL"),
                (43, "DS"),
                (44, "SSHFP"),
                (45, "IPSECKEY"),
                (46, "RRSIG"),
                (47, "NSEC"),
                (48, "DNSKEY"),
                (49, "DHCID"),
                (50, "NSEC3"),
                (51, "NSEC3PARAM"),
                (52, "TLSA"),
                (59, "CDS"),
                (60, "CDNSKEY"),
                (61, "OPENPGPKEY"),
                (62, "CSYNC"),
                (63, "ZONEMD"),
                (64, "SVCB"),
                (65, "HTTPS"),
                (99, "SPF"),
                (108, "EUI48"),
                (109, "EUI64"),
                (249, "TKEY"),
                (250, "TSIG"),
                (251, "IXFR"),
                (252, "AXFR"),
                (255, "ANY"),
                (256, "URI"),
                (257, "CAA"),
                (32768, "TA"),
                (32769, "DLV"),
            ],
            unknown_qtype,
        )
    }

    /// Text name used in zone/dig output; unassigned codes render as `TYPEn`.
    pub fn name_of(code: u16) -> Result<String, DnsError> {
        Self::bimap().name_of(code)
    }

    /// Parses a zone/dig text name back into a numeric QTYPE, including
    /// `TYPEn` for unassigned codes.
    pub fn code_of(name: &str) -> Result<u16, DnsError> {
        Self::bimap().code_of(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_types_round_trip_through_from_u16() {
        assert_eq!(RrType::from_u16(1), Some(RrType::A));
        assert_eq!(RrType::from_u16(65535), None);
    }

    #[test]
    fn name_lookup_round_trips() {
        assert_eq!(RrType::name_of(15).unwrap(), "MX");
        assert_eq!(RrType::code_of("MX").unwrap(), 15);
    }

    #[test]
    fn unassigned_type_uses_typen_fallback() {
        assert_eq!(RrType::name_of(1234).unwrap(), "TYPE1234");
        assert_eq!(RrType::code_of("TYPE1234").unwrap(), 1234);
    }
}
