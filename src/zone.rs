// Zone-file parser. Grounded on the reference `ZoneParser`: a `$ORIGIN`/`$TTL`
// aware state machine driven by `lexer::Lexer` tokens, yielding one
// `ResourceRecord` per logical line (a "line" may span several physical
// lines inside `( ... )`).

use crate::class::DnsClass;
use crate::error::DnsError;
use crate::label::DnsLabel;
use crate::lexer::{Lexer, Token};
use crate::rdata::RData;
use crate::rr::ResourceRecord;
use crate::rrtype::RrType;

const SECONDS_PER_UNIT: &[(char, u32)] = &[('s', 1), ('m', 60), ('h', 3600), ('d', 86400), ('w', 604800)];

/// Parses a zone-file time value: a bare integer, or an integer followed by
/// one of `s`/`m`/`h`/`d`/`w` (seconds/minutes/hours/days/weeks).
pub fn parse_time(text: &str) -> Result<u32, DnsError> {
    let lower = text.to_ascii_lowercase();
    let last = lower.chars().last().ok_or_else(|| DnsError::parse("empty time value", 0))?;
    if let Some((_, unit)) = SECONDS_PER_UNIT.iter().find(|(suffix, _)| *suffix == last) {
        let digits = &lower[..lower.len() - 1];
        let value: u32 = digits.parse().map_err(|_| DnsError::parse(format!("invalid time value '{}'", text), 0))?;
        Ok(value.saturating_mul(*unit))
    } else {
        lower.parse().map_err(|_| DnsError::parse(format!("invalid time value '{}'", text), 0))
    }
}

#[derive(PartialEq, Clone, Copy)]
enum Prev {
    Newline,
    Other,
}

/// Parses RFC 1035 zone-file text into `ResourceRecord`s. Implements
/// `Iterator` rather than returning a `Vec` up front, matching the
/// reference parser's generator-based `parse()`.
pub struct ZoneParser<'a> {
    lexer: Lexer<'a>,
    origin: DnsLabel,
    ttl: u32,
    label: DnsLabel,
    prev: Prev,
    pending: Vec<String>,
    paren: bool,
    pushback: Option<Token>,
    done: bool,
}

impl<'a> ZoneParser<'a> {
    pub fn new(zone: &'a str, origin: &str, ttl: u32) -> ZoneParser<'a> {
        let origin = DnsLabel::parse_text(origin);
        ZoneParser {
            lexer: Lexer::new(zone),
            label: origin.clone(),
            origin,
            ttl,
            prev: Prev::Other,
            pending: Vec::new(),
            paren: false,
            pushback: None,
            done: false,
        }
    }

    fn next_token(&mut self) -> Option<Token> {
        self.pushback.take().or_else(|| self.lexer.next())
    }

    /// Consumes tokens up to and including the next atom, skipping
    /// intervening space, for `$ORIGIN`/`$TTL` directive arguments.
    fn expect_atom(&mut self) -> Result<String, DnsError> {
        loop {
            match self.next_token() {
                Some(Token::Space) => continue,
                Some(Token::Atom(val)) => return Ok(val),
                Some(other) => {
                    self.pushback = Some(other);
                    return Err(DnsError::parse("expected a value after directive", 0));
                }
                None => return Err(DnsError::parse("unexpected end of zone data after directive", 0)),
            }
        }
    }

    fn parse_label(&mut self, token: &str) -> DnsLabel {
        let label = if token.ends_with('.') {
            DnsLabel::parse_text(token)
        } else if token == "@" {
            self.origin.clone()
        } else if token.is_empty() {
            self.label.clone()
        } else {
            self.origin.add(token)
        };
        self.label = label.clone();
        label
    }

    fn parse_rr(&mut self, mut rr: Vec<String>) -> Result<ResourceRecord, DnsError> {
        if rr.is_empty() {
            return Err(DnsError::parse("empty zone record", 0));
        }
        let owner = rr.remove(0);
        let name = self.parse_label(&owner);

        let ttl = match rr.first() {
            Some(tok) if !tok.is_empty() && tok.chars().all(|c| c.is_ascii_digit()) => {
                rr.remove(0).parse().map_err(|_| DnsError::parse("invalid zone record ttl", 0))?
            }
            _ => self.ttl,
        };

        let rclass = match rr.first().map(String::as_str) {
            Some("IN") | Some("CH") | Some("HS") => DnsClass::code_of(&rr.remove(0))?,
            _ => DnsClass::IN.to_u16(),
        };

        if rr.is_empty() {
            return Err(DnsError::parse("zone record missing type", 0));
        }
        let rtype_name = rr.remove(0);
        let rtype = RrType::code_of(&rtype_name)?;
        let rdata = RData::from_zone(rtype, &rr)?;

        Ok(ResourceRecord::new(name, rclass, ttl, rdata))
    }
}

impl<'a> Iterator for ZoneParser<'a> {
    type Item = Result<ResourceRecord, DnsError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        loop {
            match self.next_token() {
                None => {
                    self.done = true;
                    if self.pending.is_empty() {
                        return None;
                    }
                    let rr = std::mem::take(&mut self.pending);
                    return Some(self.parse_rr(rr));
                }
                Some(Token::Newline) => {
                    let had_pending = !self.paren && !self.pending.is_empty();
                    self.prev = Prev::Newline;
                    if had_pending {
                        let rr = std::mem::take(&mut self.pending);
                        return Some(self.parse_rr(rr));
                    }
                }
                Some(Token::Space) => {
                    if self.prev == Prev::Newline && !self.paren {
                        self.pending.push(String::new());
                    }
                    self.prev = Prev::Other;
                }
                Some(Token::Comment(_)) => {
                    self.prev = Prev::Other;
                }
                Some(Token::Atom(val)) => {
                    self.prev = Prev::Other;
                    match val.as_str() {
                        "(" => self.paren = true,
                        ")" => self.paren = false,
                        "$ORIGIN" => match self.expect_atom() {
                            Ok(text) => {
                                self.origin = DnsLabel::parse_text(&text);
                                self.label = self.origin.clone();
                            }
                            Err(e) => return Some(Err(e)),
                        },
                        "$TTL" => match self.expect_atom() {
                            Ok(text) => match parse_time(&text) {
                                Ok(value) => self.ttl = value,
                                Err(e) => return Some(Err(e)),
                            },
                            Err(e) => return Some(Err(e)),
                        },
                        _ => self.pending.push(val),
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_time_understands_suffixes() {
        assert_eq!(parse_time("3600").unwrap(), 3600);
        assert_eq!(parse_time("1h").unwrap(), 3600);
        assert_eq!(parse_time("2d").unwrap(), 172800);
        assert_eq!(parse_time("1W").unwrap(), 604800);
    }

    #[test]
    fn parses_simple_a_record() {
        let records: Vec<_> = ZoneParser::new("www IN A 93.184.216.34\n", "example.com.", 3600).collect();
        assert_eq!(records.len(), 1);
        let rr = records[0].as_ref().unwrap();
        assert_eq!(rr.name.to_string(), "www.example.com.");
        assert_eq!(rr.ttl, 3600);
        assert_eq!(rr.rdata, RData::A("93.184.216.34".parse().unwrap()));
    }

    #[test]
    fn origin_and_ttl_directives_apply_to_following_records() {
        let zone = "$ORIGIN example.com.\n$TTL 1h\nwww IN A 93.184.216.34\n";
        let records: Vec<_> = ZoneParser::new(zone, "", 0).collect();
        let rr = records[0].as_ref().unwrap();
        assert_eq!(rr.name.to_string(), "www.example.com.");
        assert_eq!(rr.ttl, 3600);
    }

    #[test]
    fn blank_owner_inherits_previous_record_name() {
        let zone = "www IN A 1.1.1.1\n  IN A 2.2.2.2\n";
        let records: Vec<_> = ZoneParser::new(zone, "example.com.", 300).collect();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].as_ref().unwrap().name, records[1].as_ref().unwrap().name);
    }

    #[test]
    fn parenthesized_record_spans_multiple_lines() {
        let zone = "example.com. 3600 IN SOA ns1.example.com. hostmaster.example.com. (\n  2024010100\n  3600\n  600\n  604800\n  86400\n)\n";
        let records: Vec<_> = ZoneParser::new(zone, "example.com.", 0).collect();
        assert_eq!(records.len(), 1);
        assert!(records[0].is_ok());
    }

    #[test]
    fn at_sign_refers_to_current_origin() {
        let zone = "@ IN NS ns1.example.com.\n";
        let records: Vec<_> = ZoneParser::new(zone, "example.com.", 300).collect();
        assert_eq!(records[0].as_ref().unwrap().name.to_string(), "example.com.");
    }
}
