// Resource record: owner name, type/class/ttl, and RDATA. Grounded on the
// teacher's `protocol/rr.rs` `DnsResourceRecord` shape and the reference
// `RR` class's `rdlength` backpatching and OPT special-casing.

use crate::class::DnsClass;
use crate::error::DnsError;
use crate::label::{DnsLabel, NameBuffer};
use crate::rdata::RData;
use crate::rrtype::RrType;

#[derive(Clone, Debug)]
pub struct ResourceRecord {
    pub name: DnsLabel,
    pub rclass: u16,
    pub ttl: u32,
    pub rdata: RData,
}

impl ResourceRecord {
    pub fn new(name: DnsLabel, rclass: u16, ttl: u32, rdata: RData) -> ResourceRecord {
        ResourceRecord { name, rclass, ttl, rdata }
    }

    pub fn rtype(&self) -> u16 {
        self.rdata.rtype()
    }

    pub fn is_opt(&self) -> bool {
        self.rtype() == RrType::OPT.to_u16()
    }

    /// For an OPT pseudo-record, the sender's advertised UDP payload size
    /// (the CLASS field reinterpreted per RFC6891 6.1.2).
    pub fn edns_payload_size(&self) -> Option<u16> {
        self.is_opt().then_some(self.rclass)
    }

    /// For an OPT pseudo-record, the extended RCODE/version/DO bit packed
    /// into the TTL field.
    pub fn edns_ttl_fields(&self) -> Option<(u8, u8, bool)> {
        if !self.is_opt() {
            return None;
        }
        let extended_rcode = (self.ttl >> 24) as u8;
        let version = (self.ttl >> 16) as u8;
        let do_bit = (self.ttl >> 15) & 0x1 != 0;
        Some((extended_rcode, version, do_bit))
    }

    pub fn new_opt(payload_size: u16, extended_rcode: u8, version: u8, do_bit: bool, options: Vec<crate::rdata::EdnsOption>) -> ResourceRecord {
        let ttl = ((extended_rcode as u32) << 24) | ((version as u32) << 16) | ((do_bit as u32) << 15);
        ResourceRecord {
            name: DnsLabel::root(),
            rclass: payload_size,
            ttl,
            rdata: RData::Opt(options),
        }
    }

    pub fn parse(buffer: &mut NameBuffer) -> Result<ResourceRecord, DnsError> {
        let name = buffer.decode_name()?;
        let rtype = buffer.buffer.get_u16()?;
        let rclass = buffer.buffer.get_u16()?;
        let ttl = buffer.buffer.get_u32()?;
        let rdlength = buffer.buffer.get_u16()? as usize;
        let rdata = RData::parse(buffer, rtype, rdlength)?;
        Ok(ResourceRecord { name, rclass, ttl, rdata })
    }

    pub fn pack(&self, buffer: &mut NameBuffer) -> Result<(), DnsError> {
        buffer.encode_name(&self.name)?;
        buffer.buffer.pack_u16(self.rdata.rtype());
        buffer.buffer.pack_u16(self.rclass);
        buffer.buffer.pack_u32(self.ttl);
        let rdlength_ptr = buffer.buffer.offset();
        buffer.buffer.pack_u16(0);
        let rdata_start = buffer.buffer.offset();
        self.rdata.pack(buffer)?;
        let rdlength = buffer.buffer.offset() - rdata_start;
        buffer.buffer.update_u16(rdlength_ptr, rdlength as u16)?;
        Ok(())
    }

    /// Zone/`dig` style text rendering: `name ttl class type rdata`, except
    /// an OPT pseudo-record, which renders as the `;; OPT PSEUDOSECTION`
    /// block instead of a normal RR line.
    pub fn to_zone(&self) -> Result<String, DnsError> {
        if self.is_opt() {
            return Ok(self.opt_pseudosection_zone());
        }
        Ok(format!(
            "{:<30} {:<7} {:<7} {:<7} {}",
            self.name,
            self.ttl,
            DnsClass::name_of(self.rclass).unwrap_or_else(|_| "CLASS?".to_string()),
            RrType::name_of(self.rtype())?,
            self.rdata.to_zone()
        ))
    }

    fn opt_pseudosection_zone(&self) -> String {
        let (_extended_rcode, version, do_bit) = self.edns_ttl_fields().unwrap_or((0, 0, false));
        let udp = self.edns_payload_size().unwrap_or(0);
        let flags = if do_bit { "do" } else { "" };
        let mut lines = vec![
            ";; OPT PSEUDOSECTION".to_string(),
            format!("; EDNS: version: {}, flags: {}; udp: {}", version, flags, udp),
        ];
        if let RData::Opt(options) = &self.rdata {
            for option in options {
                let hex: String = option.data.iter().map(|b| format!("{:02x}", b)).collect();
                lines.push(format!("; EDNS: code: {}; data: {}", option.code, hex));
            }
        }
        lines.join("\n")
    }
}

/// OPT records compare by every field (including TTL, since the EDNS flags
/// live there); ordinary records ignore TTL, matching `Message` equality's
/// "answers may differ in TTL alone" contract.
impl PartialEq for ResourceRecord {
    fn eq(&self, other: &Self) -> bool {
        if self.name != other.name || self.rclass != other.rclass || self.rdata != other.rdata {
            return false;
        }
        if self.is_opt() || other.is_opt() {
            return self.ttl == other.ttl;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pack_parse_round_trip_backpatches_rdlength() {
        let rr = ResourceRecord::new(
            DnsLabel::parse_text("example.com"),
            DnsClass::IN.to_u16(),
            3600,
            RData::A("93.184.216.34".parse().unwrap()),
        );
        let mut buf = NameBuffer::new();
        rr.pack(&mut buf).unwrap();
        let mut read = NameBuffer::from_bytes(buf.buffer.as_slice());
        let parsed = ResourceRecord::parse(&mut read).unwrap();
        assert_eq!(parsed, rr);
    }

    #[test]
    fn equality_ignores_ttl_for_ordinary_records() {
        let a = ResourceRecord::new(DnsLabel::parse_text("example.com"), 1, 60, RData::A("1.1.1.1".parse().unwrap()));
        let b = ResourceRecord::new(DnsLabel::parse_text("example.com"), 1, 3600, RData::A("1.1.1.1".parse().unwrap()));
        assert_eq!(a, b);
    }

    #[test]
    fn opt_pseudo_record_exposes_edns_fields() {
        let rr = ResourceRecord::new_opt(4096, 0, 0, true, vec![]);
        assert_eq!(rr.edns_payload_size(), Some(4096));
        assert_eq!(rr.edns_ttl_fields(), Some((0, 0, true)));
    }

    #[test]
    fn opt_record_renders_pseudosection_zone_text() {
        let rr = ResourceRecord::new_opt(4096, 0, 0, true, vec![crate::rdata::EdnsOption { code: 8, data: vec![0x00, 0x01] }]);
        let text = rr.to_zone().unwrap();
        assert_eq!(
            text,
            ";; OPT PSEUDOSECTION\n; EDNS: version: 0, flags: do; udp: 4096\n; EDNS: code: 8; data: 0001"
        );
    }

    #[test]
    fn opt_equality_includes_ttl() {
        let a = ResourceRecord::new_opt(4096, 0, 0, true, vec![]);
        let b = ResourceRecord::new_opt(4096, 0, 0, false, vec![]);
        assert_ne!(a, b);
    }
}
