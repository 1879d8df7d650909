// The top-level DNS message: header plus four sections. Grounded on the
// teacher's `dns.rs`/`protocol/mod.rs` pack/parse orchestration and the
// reference `Message` class's `question`/`reply`/`reply_zone` convenience
// constructors and `add_question`/`add_answer`/`add_authority`/
// `add_additional` builders.

use crate::class::DnsClass;
use crate::error::DnsError;
use crate::header::Header;
use crate::label::{DnsLabel, NameBuffer};
use crate::opcode::Opcode;
use crate::question::Question;
use crate::rcode::RCode;
use crate::rdata::RData;
use crate::rr::ResourceRecord;
use crate::rrtype::RrType;

#[derive(Clone, Debug)]
pub struct Message {
    pub header: Header,
    pub questions: Vec<Question>,
    pub answers: Vec<ResourceRecord>,
    pub authorities: Vec<ResourceRecord>,
    pub additionals: Vec<ResourceRecord>,
}

impl Message {
    pub fn new() -> Message {
        Message {
            header: Header::new(),
            questions: Vec::new(),
            answers: Vec::new(),
            authorities: Vec::new(),
            additionals: Vec::new(),
        }
    }

    /// Builds a standard recursive query for `qname`/`qtype`/`qclass`.
    pub fn question(qname: &str, qtype: u16, qclass: u16) -> Message {
        let mut message = Message::new();
        message.header.set_opcode_raw(Opcode::Query.to_u8()).unwrap();
        message.add_question(DnsLabel::parse_text(qname), qtype, qclass);
        message
    }

    /// Builds the skeleton of a reply to `self`: same id/opcode, `qr` set,
    /// questions copied forward, no answers yet.
    pub fn reply(&self) -> Message {
        let mut reply = Message::new();
        reply.header.id = self.header.id;
        reply.header.set_opcode_raw(self.header.opcode().to_u8()).unwrap();
        reply.header.qr = true;
        reply.header.rd = self.header.rd;
        reply.questions = self.questions.clone();
        reply.header.qdcount = reply.questions.len() as u16;
        reply
    }

    /// Builds an authoritative NOERROR reply carrying one answer RR per
    /// `name ttl class type rdata` zone-style line in `records`, used by
    /// tests that assemble expected responses from zone text.
    pub fn reply_zone(&self, qname: &str, qtype: u16, qclass: u16, ttl: u32, rdata: RData) -> Message {
        let mut reply = self.reply();
        reply.header.set_rcode(RCode::NoError);
        reply.add_answer(DnsLabel::parse_text(qname), qclass, ttl, rdata);
        let _ = qtype;
        reply
    }

    pub fn add_question(&mut self, qname: DnsLabel, qtype: u16, qclass: u16) {
        self.questions.push(Question::new(qname, qtype, qclass));
        self.header.qdcount = self.questions.len() as u16;
    }

    pub fn add_answer(&mut self, name: DnsLabel, rclass: u16, ttl: u32, rdata: RData) {
        self.answers.push(ResourceRecord::new(name, rclass, ttl, rdata));
        self.header.ancount = self.answers.len() as u16;
    }

    pub fn add_authority(&mut self, name: DnsLabel, rclass: u16, ttl: u32, rdata: RData) {
        self.authorities.push(ResourceRecord::new(name, rclass, ttl, rdata));
        self.header.nscount = self.authorities.len() as u16;
    }

    pub fn add_additional(&mut self, name: DnsLabel, rclass: u16, ttl: u32, rdata: RData) {
        self.additionals.push(ResourceRecord::new(name, rclass, ttl, rdata));
        self.header.arcount = self.additionals.len() as u16;
    }

    /// Attaches an EDNS(0) OPT pseudo-record to the additional section,
    /// replacing any that's already there.
    pub fn set_edns(&mut self, payload_size: u16, do_bit: bool, options: Vec<crate::rdata::EdnsOption>) {
        self.additionals.retain(|rr| !rr.is_opt());
        self.additionals.push(ResourceRecord::new_opt(payload_size, 0, 0, do_bit, options));
        self.header.arcount = self.additionals.len() as u16;
    }

    pub fn parse(bytes: &[u8]) -> Result<Message, DnsError> {
        let mut buffer = NameBuffer::from_bytes(bytes);
        let header = Header::parse(&mut buffer.buffer)?;

        let mut questions = Vec::with_capacity(header.qdcount as usize);
        for _ in 0..header.qdcount {
            questions.push(Question::parse(&mut buffer)?);
        }

        let mut answers = Vec::with_capacity(header.ancount as usize);
        for _ in 0..header.ancount {
            answers.push(ResourceRecord::parse(&mut buffer)?);
        }

        let mut authorities = Vec::with_capacity(header.nscount as usize);
        for _ in 0..header.nscount {
            authorities.push(ResourceRecord::parse(&mut buffer)?);
        }

        let mut additionals = Vec::with_capacity(header.arcount as usize);
        for _ in 0..header.arcount {
            additionals.push(ResourceRecord::parse(&mut buffer)?);
        }

        Ok(Message { header, questions, answers, authorities, additionals })
    }

    pub fn pack(&self) -> Result<Vec<u8>, DnsError> {
        let mut buffer = NameBuffer::new();
        let mut header = self.header.clone();
        header.qdcount = self.questions.len() as u16;
        header.ancount = self.answers.len() as u16;
        header.nscount = self.authorities.len() as u16;
        header.arcount = self.additionals.len() as u16;
        header.pack(&mut buffer.buffer)?;

        for question in &self.questions {
            question.pack(&mut buffer)?;
        }
        for rr in &self.answers {
            rr.pack(&mut buffer)?;
        }
        for rr in &self.authorities {
            rr.pack(&mut buffer)?;
        }
        for rr in &self.additionals {
            rr.pack(&mut buffer)?;
        }
        Ok(buffer.buffer.into_bytes())
    }

    /// Renders the `dig`-style textual sections (`;; QUESTION SECTION:` etc).
    pub fn to_zone(&self) -> Result<String, DnsError> {
        let mut out = String::new();
        out.push_str(&format!(
            ";; ->>HEADER<<- opcode: {}, status: {}, id: {}\n",
            Opcode::name_of(self.header.opcode().to_u8() as u16).unwrap_or_else(|_| "?".to_string()),
            RCode::name_of(self.header.rcode().to_u8() as u16).unwrap_or_else(|_| "?".to_string()),
            self.header.id
        ));
        out.push_str(&format!(";; flags: {}\n", self.header.flags_text()));

        out.push_str(";; QUESTION SECTION:\n");
        for q in &self.questions {
            out.push_str(&q.to_zone());
            out.push('\n');
        }
        out.push_str(";; ANSWER SECTION:\n");
        for rr in &self.answers {
            out.push_str(&rr.to_zone()?);
            out.push('\n');
        }
        out.push_str(";; AUTHORITY SECTION:\n");
        for rr in &self.authorities {
            out.push_str(&rr.to_zone()?);
            out.push('\n');
        }
        out.push_str(";; ADDITIONAL SECTION:\n");
        for rr in &self.additionals {
            out.push_str(&rr.to_zone()?);
            out.push('\n');
        }
        Ok(out)
    }
}

impl Default for Message {
    fn default() -> Self {
        Message::new()
    }
}

/// Matches up the two sides by a coarse sort key (name/rtype/rdata), then
/// compares matched pairs with `ResourceRecord::eq`, since the key alone
/// can't tell OPT records with differing ttl apart.
fn records_match(a: &[ResourceRecord], b: &[ResourceRecord]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let key = |rr: &&ResourceRecord| format!("{}|{}|{:?}", rr.name, rr.rtype(), rr.rdata);
    let mut a_sorted: Vec<&ResourceRecord> = a.iter().collect();
    let mut b_sorted: Vec<&ResourceRecord> = b.iter().collect();
    a_sorted.sort_by_key(key);
    b_sorted.sort_by_key(key);
    a_sorted.iter().zip(b_sorted.iter()).all(|(x, y)| x == y)
}

/// Equality ignores header `id` (per `Header`) and section ordering, since
/// two servers may legitimately answer with the same records in different
/// order, but otherwise must match exactly, including OPT-record ttl (per
/// `ResourceRecord`'s asymmetric equality).
impl PartialEq for Message {
    fn eq(&self, other: &Self) -> bool {
        self.header == other.header
            && self.questions == other.questions
            && records_match(&self.answers, &other.answers)
            && records_match(&self.authorities, &other.authorities)
            && records_match(&self.additionals, &other.additionals)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_round_trips_through_wire_bytes() {
        let message = Message::question("example.com", RrType::A.to_u16(), DnsClass::IN.to_u16());
        let bytes = message.pack().unwrap();
        let parsed = Message::parse(&bytes).unwrap();
        assert_eq!(parsed, message);
        assert_eq!(parsed.header.qdcount, 1);
    }

    #[test]
    fn reply_copies_id_and_questions() {
        let query = Message::question("example.com", RrType::A.to_u16(), DnsClass::IN.to_u16());
        let mut reply = query.reply();
        reply.add_answer(DnsLabel::parse_text("example.com"), DnsClass::IN.to_u16(), 300, RData::A("93.184.216.34".parse().unwrap()));
        assert_eq!(reply.header.id, query.header.id);
        assert!(reply.header.qr);
        assert_eq!(reply.questions, query.questions);
    }

    #[test]
    fn equality_ignores_answer_ordering() {
        let mut a = Message::new();
        a.add_answer(DnsLabel::parse_text("a.example.com"), 1, 60, RData::A("1.1.1.1".parse().unwrap()));
        a.add_answer(DnsLabel::parse_text("b.example.com"), 1, 60, RData::A("2.2.2.2".parse().unwrap()));

        let mut b = Message::new();
        b.add_answer(DnsLabel::parse_text("b.example.com"), 1, 60, RData::A("2.2.2.2".parse().unwrap()));
        b.add_answer(DnsLabel::parse_text("a.example.com"), 1, 60, RData::A("1.1.1.1".parse().unwrap()));

        assert_eq!(a, b);
    }

    #[test]
    fn equality_distinguishes_opt_records_differing_only_in_ttl() {
        let mut a = Message::new();
        a.additionals.push(ResourceRecord::new_opt(4096, 0, 0, true, vec![]));
        a.header.arcount = 1;

        let mut b = Message::new();
        b.additionals.push(ResourceRecord::new_opt(4096, 0, 0, false, vec![]));
        b.header.arcount = 1;

        assert_ne!(a, b);
    }

    #[test]
    fn set_edns_replaces_existing_opt_record() {
        let mut message = Message::new();
        message.set_edns(4096, true, vec![]);
        message.set_edns(1232, false, vec![]);
        let opts: Vec<_> = message.additionals.iter().filter(|rr| rr.is_opt()).collect();
        assert_eq!(opts.len(), 1);
        assert_eq!(opts[0].edns_payload_size(), Some(1232));
    }
}
