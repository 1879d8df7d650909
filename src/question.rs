// `Question`: `qname.encode_name(); u16 qtype; u16 qclass`.

use crate::class::DnsClass;
use crate::error::DnsError;
use crate::label::{DnsLabel, NameBuffer};
use crate::rrtype::RrType;

#[derive(Clone, Debug, PartialEq)]
pub struct Question {
    pub qname: DnsLabel,
    pub qtype: u16,
    pub qclass: u16,
}

impl Question {
    pub fn new(qname: DnsLabel, qtype: u16, qclass: u16) -> Question {
        Question {
            qname,
            qtype,
            qclass,
        }
    }

    pub fn parse(buffer: &mut NameBuffer) -> Result<Question, DnsError> {
        let qname = buffer.decode_name()?;
        let qtype = buffer.buffer.get_u16()?;
        let qclass = buffer.buffer.get_u16()?;
        Ok(Question {
            qname,
            qtype,
            qclass,
        })
    }

    pub fn pack(&self, buffer: &mut NameBuffer) -> Result<(), DnsError> {
        buffer.encode_name(&self.qname)?;
        buffer.buffer.pack_u16(self.qtype);
        buffer.buffer.pack_u16(self.qclass);
        Ok(())
    }

    pub fn to_zone(&self) -> String {
        let qtype_name = RrType::name_of(self.qtype).unwrap_or_else(|_| self.qtype.to_string());
        let qclass_name = DnsClass::name_of(self.qclass).unwrap_or_else(|_| self.qclass.to_string());
        format!(";{:<30} {:<7} {}", self.qname.to_string(), qclass_name, qtype_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::label::NameBuffer;

    #[test]
    fn pack_and_parse_round_trip() {
        let q = Question::new(DnsLabel::parse_text("www.google.com"), RrType::A as u16, DnsClass::IN.to_u16());
        let mut buf = NameBuffer::new();
        q.pack(&mut buf).unwrap();
        buf.buffer.seek(0).unwrap();
        let parsed = Question::parse(&mut buf).unwrap();
        assert_eq!(q, parsed);
    }
}
