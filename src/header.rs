// Fixed 12-byte message header: id, bitmap, and four section counts. The
// bitmap is exposed only through named, range-checked accessors per the
// redesign note in spec.md 9 ("do not leak the raw u16 beyond pack/parse");
// unlike the teacher's `DnsFlags` (which rejects a set Z bit outright) this
// preserves `z` as an ordinary field, following the original reference
// implementation, since the distilled spec never asks for that rejection.

use rand::random;

use crate::buffer::Buffer;
use crate::error::DnsError;
use crate::opcode::Opcode;
use crate::rcode::RCode;

#[derive(Clone, Debug)]
pub struct Header {
    pub id: u16,
    pub qr: bool,
    opcode: Opcode,
    pub aa: bool,
    pub tc: bool,
    pub rd: bool,
    pub ra: bool,
    pub z: bool,
    pub ad: bool,
    pub cd: bool,
    rcode: RCode,
    pub qdcount: u16,
    pub ancount: u16,
    pub nscount: u16,
    pub arcount: u16,
}

impl Header {
    pub fn new() -> Header {
        Header {
            id: random(),
            qr: false,
            opcode: Opcode::Query,
            aa: false,
            tc: false,
            rd: true,
            ra: false,
            z: false,
            ad: false,
            cd: false,
            rcode: RCode::NoError,
            qdcount: 0,
            ancount: 0,
            nscount: 0,
            arcount: 0,
        }
    }

    pub fn opcode(&self) -> Opcode {
        self.opcode
    }

    /// Set the opcode from its raw 4-bit wire value; fails with a range
    /// error if the value doesn't fit in 4 bits, and with an enumeration
    /// error if it fits but names no known opcode.
    pub fn set_opcode_raw(&mut self, value: u8) -> Result<(), DnsError> {
        if value > 0b1111 {
            return Err(DnsError::range("opcode", value as i64, 4));
        }
        self.opcode = Opcode::from_u8(value).ok_or(DnsError::Enum {
            name: "OPCODE",
            key: value.to_string(),
        })?;
        Ok(())
    }

    pub fn set_opcode(&mut self, opcode: Opcode) {
        self.opcode = opcode;
    }

    pub fn rcode(&self) -> RCode {
        self.rcode
    }

    pub fn set_rcode_raw(&mut self, value: u8) -> Result<(), DnsError> {
        if value > 0b1111 {
            return Err(DnsError::range("rcode", value as i64, 4));
        }
        self.rcode = RCode::from_u8(value).ok_or(DnsError::Enum {
            name: "RCODE",
            key: value.to_string(),
        })?;
        Ok(())
    }

    pub fn set_rcode(&mut self, rcode: RCode) {
        self.rcode = rcode;
    }

    fn bitmap(&self) -> u16 {
        let mut bitmap: u16 = 0;
        if self.qr {
            bitmap |= 1 << 15;
        }
        bitmap |= (self.opcode.to_u8() as u16 & 0b1111) << 11;
        if self.aa {
            bitmap |= 1 << 10;
        }
        if self.tc {
            bitmap |= 1 << 9;
        }
        if self.rd {
            bitmap |= 1 << 8;
        }
        if self.ra {
            bitmap |= 1 << 7;
        }
        if self.z {
            bitmap |= 1 << 6;
        }
        if self.ad {
            bitmap |= 1 << 5;
        }
        if self.cd {
            bitmap |= 1 << 4;
        }
        bitmap |= self.rcode.to_u8() as u16 & 0b1111;
        bitmap
    }

    fn from_bitmap(id: u16, bitmap: u16, counts: (u16, u16, u16, u16)) -> Result<Header, DnsError> {
        let opcode_val = ((bitmap >> 11) & 0b1111) as u8;
        let rcode_val = (bitmap & 0b1111) as u8;
        let opcode = Opcode::from_u8(opcode_val).ok_or(DnsError::Enum {
            name: "OPCODE",
            key: opcode_val.to_string(),
        })?;
        let rcode = RCode::from_u8(rcode_val).ok_or(DnsError::Enum {
            name: "RCODE",
            key: rcode_val.to_string(),
        })?;
        Ok(Header {
            id,
            qr: (bitmap >> 15) & 1 == 1,
            opcode,
            aa: (bitmap >> 10) & 1 == 1,
            tc: (bitmap >> 9) & 1 == 1,
            rd: (bitmap >> 8) & 1 == 1,
            ra: (bitmap >> 7) & 1 == 1,
            z: (bitmap >> 6) & 1 == 1,
            ad: (bitmap >> 5) & 1 == 1,
            cd: (bitmap >> 4) & 1 == 1,
            rcode,
            qdcount: counts.0,
            ancount: counts.1,
            nscount: counts.2,
            arcount: counts.3,
        })
    }

    pub fn parse(buffer: &mut Buffer) -> Result<Header, DnsError> {
        let id = buffer.get_u16()?;
        let bitmap = buffer.get_u16()?;
        let qdcount = buffer.get_u16()?;
        let ancount = buffer.get_u16()?;
        let nscount = buffer.get_u16()?;
        let arcount = buffer.get_u16()?;
        Header::from_bitmap(id, bitmap, (qdcount, ancount, nscount, arcount))
    }

    pub fn pack(&self, buffer: &mut Buffer) {
        buffer.pack_u16(self.id);
        buffer.pack_u16(self.bitmap());
        buffer.pack_u16(self.qdcount);
        buffer.pack_u16(self.ancount);
        buffer.pack_u16(self.nscount);
        buffer.pack_u16(self.arcount);
    }

    pub fn flags_text(&self) -> String {
        let mut flags = Vec::new();
        if self.qr {
            flags.push("qr");
        }
        if self.aa {
            flags.push("aa");
        }
        if self.tc {
            flags.push("tc");
        }
        if self.rd {
            flags.push("rd");
        }
        if self.ra {
            flags.push("ra");
        }
        if self.ad {
            flags.push("ad");
        }
        if self.cd {
            flags.push("cd");
        }
        flags.join(" ")
    }
}

impl Default for Header {
    fn default() -> Self {
        Header::new()
    }
}

/// Equality deliberately excludes `id`, per spec.md 3, for test convenience
/// (so a parsed reply can be compared against a freshly-built expectation
/// without needing to know the randomly chosen query id).
impl PartialEq for Header {
    fn eq(&self, other: &Self) -> bool {
        self.qr == other.qr
            && self.opcode == other.opcode
            && self.aa == other.aa
            && self.tc == other.tc
            && self.rd == other.rd
            && self.ra == other.ra
            && self.z == other.z
            && self.ad == other.ad
            && self.cd == other.cd
            && self.rcode == other.rcode
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bitmap_round_trips() {
        let mut h = Header::new();
        h.qr = true;
        h.set_opcode(Opcode::Update);
        h.aa = true;
        h.ad = true;
        h.set_rcode(RCode::NXDomain);

        let mut buf = Buffer::new();
        h.pack(&mut buf);
        let mut read = Buffer::from_bytes(buf.as_slice());
        let parsed = Header::parse(&mut read).unwrap();
        assert_eq!(h, parsed);
        assert_eq!(parsed.id, h.id);
    }

    #[test]
    fn default_has_rd_set_and_random_id() {
        let a = Header::new();
        assert!(a.rd);
        assert!(!a.qr);
        // Not guaranteed distinct, but astronomically likely; catches a
        // broken RNG/seed that always hands back the same id (or 0).
        let ids: Vec<u16> = (0..16).map(|_| Header::new().id).collect();
        assert!(ids.iter().any(|&id| id != ids[0]));
    }

    #[test]
    fn equality_ignores_id() {
        let mut a = Header::new();
        let mut b = Header::new();
        a.id = 1;
        b.id = 2;
        assert_eq!(a, b);
    }

    #[test]
    fn set_opcode_raw_rejects_out_of_range() {
        let mut h = Header::new();
        assert!(h.set_opcode_raw(0b1_0000).is_err());
    }
}
