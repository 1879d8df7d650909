// Parser for `dig +qr`-style textual output. Grounded on the reference
// `DigParser`: scans `dig`'s banner/section comments to drive a small state
// machine, deferring each record's fields until a full `Message` is ready to
// emit at the next `Sending:`/`Got answer:` boundary (or end of input).
//
// One deliberate correction from the reference: the header's opcode line
// (`opcode: QUERY`) is resolved through the OPCODE table, not QTYPE/QR as the
// original does — `QUERY`/`UPDATE`/`NOTIFY` are opcode names, not type names,
// and resolving them as QTYPE happened to work only because a few opcode and
// type names coincide.

use crate::class::DnsClass;
use crate::error::DnsError;
use crate::header::Header;
use crate::label::DnsLabel;
use crate::lexer::{Lexer, Token};
use crate::message::Message;
use crate::opcode::Opcode;
use crate::rcode::RCode;
use crate::rdata::RData;
use crate::rr::ResourceRecord;
use crate::rrtype::RrType;

#[derive(Clone, Copy, PartialEq)]
enum Section {
    None,
    Question,
    Answer,
    Authority,
    Additional,
}

struct Pending {
    message: Message,
    questions: Vec<Vec<String>>,
    answers: Vec<Vec<String>>,
    authorities: Vec<Vec<String>>,
    additionals: Vec<Vec<String>>,
}

impl Pending {
    fn new() -> Pending {
        Pending {
            message: Message::new(),
            questions: Vec::new(),
            answers: Vec::new(),
            authorities: Vec::new(),
            additionals: Vec::new(),
        }
    }
}

/// Parses one or more `dig +qr` transcripts out of `dig`'s textual output.
/// Records that fail to parse (an unrecognized name/class/type, a field
/// count short of what that record needs) are silently skipped rather than
/// failing the whole message, matching the reference parser's behavior of
/// tolerating RR types it doesn't understand.
pub struct DigParser<'a> {
    lexer: Lexer<'a>,
    current: Option<Pending>,
    section: Section,
    paren: bool,
    pending_rr: Vec<String>,
    done: bool,
}

impl<'a> DigParser<'a> {
    pub fn new(text: &'a str) -> DigParser<'a> {
        DigParser {
            lexer: Lexer::new(text),
            current: None,
            section: Section::None,
            paren: false,
            pending_rr: Vec::new(),
            done: false,
        }
    }

    fn push_pending_rr(&mut self) {
        let rr = std::mem::take(&mut self.pending_rr);
        if let Some(pending) = self.current.as_mut() {
            match self.section {
                Section::Answer => pending.answers.push(rr),
                Section::Authority => pending.authorities.push(rr),
                Section::Additional => pending.additionals.push(rr),
                Section::Question | Section::None => {}
            }
        }
    }

    fn finalize_current(&mut self) -> Option<Result<Message, DnsError>> {
        let pending = self.current.take()?;
        Some(Ok(build_message(pending)))
    }
}

impl<'a> Iterator for DigParser<'a> {
    type Item = Result<Message, DnsError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        loop {
            match self.lexer.next() {
                None => {
                    self.done = true;
                    if !self.pending_rr.is_empty() {
                        self.push_pending_rr();
                    }
                    return self.finalize_current();
                }
                Some(Token::Newline) => {
                    if !self.paren && !self.pending_rr.is_empty() {
                        self.push_pending_rr();
                    }
                }
                Some(Token::Space) => {}
                Some(Token::Atom(val)) => match val.as_str() {
                    "(" => self.paren = true,
                    ")" => self.paren = false,
                    _ => self.pending_rr.push(val),
                },
                Some(Token::Comment(val)) => {
                    if val.contains("Sending:") || val.contains("Got answer:") {
                        let emit = self.finalize_current();
                        self.current = Some(Pending::new());
                        self.section = Section::None;
                        if emit.is_some() {
                            return emit;
                        }
                    } else if val.starts_with("; ->>HEADER<<-") {
                        let line2 = match self.lexer.next() {
                            Some(Token::Newline) => match self.lexer.next() {
                                Some(Token::Comment(v)) => v,
                                _ => return Some(Err(DnsError::parse("expected flags line after header banner", 0))),
                            },
                            _ => return Some(Err(DnsError::parse("expected newline after header banner", 0))),
                        };
                        match parse_header(&val, &line2) {
                            Ok(header) => {
                                if let Some(pending) = self.current.as_mut() {
                                    pending.message.header = header;
                                }
                            }
                            Err(e) => return Some(Err(e)),
                        }
                    } else if val.starts_with("; QUESTION") {
                        self.section = Section::Question;
                    } else if val.starts_with("; ANSWER") {
                        self.section = Section::Answer;
                    } else if val.starts_with("; AUTHORITY") {
                        self.section = Section::Authority;
                    } else if val.starts_with("; ADDITIONAL") {
                        self.section = Section::Additional;
                    } else if val.starts_with(';') || val.trim_start().starts_with("<<>>") {
                        // stray banner/meta line, ignored
                    } else if self.current.is_some() && self.section == Section::Question {
                        let fields: Vec<String> = val.split_whitespace().map(str::to_string).collect();
                        if let Some(pending) = self.current.as_mut() {
                            pending.questions.push(fields);
                        }
                    }
                }
            }
        }
    }
}

/// Parses the two-line `;; ->>HEADER<<- ...` / `;; flags: ...` block.
/// `l1`/`l2` are the comment token values with the leading `;` already
/// stripped by the lexer, so `l1` starts with a single `;`.
fn parse_header(l1: &str, l2: &str) -> Result<Header, DnsError> {
    let words: Vec<&str> = l1.split_whitespace().collect();
    if words.len() < 8 {
        return Err(DnsError::parse("malformed dig header line", 0));
    }
    let opcode_name = words[3].trim_end_matches(',');
    let status_name = words[5].trim_end_matches(',');
    let id: u16 = words[7].parse().map_err(|_| DnsError::parse("invalid dig header id", 0))?;

    let mut header = Header::new();
    header.id = id;
    header.set_opcode_raw(Opcode::code_of(opcode_name)? as u8)?;
    header.set_rcode_raw(RCode::code_of(status_name)? as u8)?;

    let flags = l2.splitn(3, ';').nth(1).unwrap_or("");
    header.qr = flags.contains("qr");
    header.aa = flags.contains("aa");
    header.tc = flags.contains("tc");
    header.rd = flags.contains("rd");
    header.ra = flags.contains("ra");

    Ok(header)
}

fn build_message(pending: Pending) -> Message {
    let mut message = pending.message;

    for fields in &pending.questions {
        if let Some((qname, qclass, qtype)) = build_question(fields) {
            message.add_question(qname, qtype, qclass);
        }
    }
    for fields in &pending.answers {
        if let Ok(rr) = build_rr(fields) {
            message.answers.push(rr);
        }
    }
    for fields in &pending.authorities {
        if let Ok(rr) = build_rr(fields) {
            message.authorities.push(rr);
        }
    }
    for fields in &pending.additionals {
        if let Ok(rr) = build_rr(fields) {
            message.additionals.push(rr);
        }
    }
    message.header.qdcount = message.questions.len() as u16;
    message.header.ancount = message.answers.len() as u16;
    message.header.nscount = message.authorities.len() as u16;
    message.header.arcount = message.additionals.len() as u16;
    message
}

fn build_question(fields: &[String]) -> Option<(DnsLabel, u16, u16)> {
    if fields.len() < 3 {
        return None;
    }
    let qname = DnsLabel::parse_text(&fields[0]);
    let qclass = DnsClass::code_of(&fields[1]).ok()?;
    let qtype = RrType::code_of(&fields[2]).ok()?;
    Some((qname, qclass, qtype))
}

fn build_rr(fields: &[String]) -> Result<ResourceRecord, DnsError> {
    if fields.len() < 4 {
        return Err(DnsError::parse("dig answer line needs at least 4 fields", 0));
    }
    let name = DnsLabel::parse_text(&fields[0]);
    let ttl: u32 = fields[1].parse().map_err(|_| DnsError::parse("invalid dig answer ttl", 0))?;
    let rclass = DnsClass::code_of(&fields[2])?;
    let rtype = RrType::code_of(&fields[3])?;
    let rdata = RData::from_zone(rtype, &fields[4..])?;
    Ok(ResourceRecord::new(name, rclass, ttl, rdata))
}

#[cfg(test)]
mod tests {
    use super::*;

    const DIG_OUTPUT: &str = "\
; <<>> DiG 9.16.1 <<>> www.google.com
;; global options: +cmd
;; Got answer:
;; ->>HEADER<<- opcode: QUERY, status: NOERROR, id: 12345
;; flags: qr rd ra; QUERY: 1, ANSWER: 1, AUTHORITY: 0, ADDITIONAL: 0

;; QUESTION SECTION:
;www.google.com.\t\t\tIN\tA

;; ANSWER SECTION:
www.google.com.\t\t300\tIN\tA\t142.250.80.100

;; Query time: 20 msec
";

    #[test]
    fn parses_header_question_and_answer() {
        let messages: Vec<_> = DigParser::new(DIG_OUTPUT).collect();
        assert_eq!(messages.len(), 1);
        let message = messages[0].as_ref().unwrap();
        assert_eq!(message.header.id, 12345);
        assert!(message.header.qr);
        assert!(message.header.rd);
        assert!(message.header.ra);
        assert_eq!(message.header.rcode(), RCode::NoError);
        assert_eq!(message.questions.len(), 1);
        assert_eq!(message.answers.len(), 1);
        assert_eq!(message.answers[0].ttl, 300);
        assert_eq!(message.answers[0].rdata, RData::A("142.250.80.100".parse().unwrap()));
    }

    #[test]
    fn sending_and_got_answer_pair_yields_two_messages() {
        let text = format!(
            "\
;; Sending:\n;; ->>HEADER<<- opcode: QUERY, status: NOERROR, id: 1\n;; flags: rd; QUERY: 1, ANSWER: 0, AUTHORITY: 0, ADDITIONAL: 0\n\n;; QUESTION SECTION:\n;example.com.\t\tIN\tA\n\n{}",
            DIG_OUTPUT
        );
        let messages: Vec<Result<Message, DnsError>> = DigParser::new(&text).collect();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].as_ref().unwrap().header.id, 1);
        assert_eq!(messages[1].as_ref().unwrap().header.id, 12345);
    }
}
