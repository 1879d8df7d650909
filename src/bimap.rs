// Bidirectional int<->name registry for the DNS enumerations (QTYPE, CLASS,
// RCODE, OPCODE, QR). Ported from the reference `Bimap`: a missing key
// either synthesizes a value through a callback (QTYPE's `TYPEn` fallback)
// or raises through it (every other enumeration, which just wants an error).

use std::collections::HashMap;

use crate::error::DnsError;

pub enum MissingKey<'a> {
    Forward(u16),
    Reverse(&'a str),
}

pub struct Bimap {
    name: &'static str,
    forward: HashMap<u16, &'static str>,
    reverse: HashMap<&'static str, u16>,
    on_missing: fn(&'static str, MissingKey) -> Result<EitherNameOrCode, DnsError>,
}

pub enum EitherNameOrCode {
    Name(String),
    Code(u16),
}

impl Bimap {
    pub fn new(
        name: &'static str,
        entries: &[(u16, &'static str)],
        on_missing: fn(&'static str, MissingKey) -> Result<EitherNameOrCode, DnsError>,
    ) -> Bimap {
        let mut forward = HashMap::new();
        let mut reverse = HashMap::new();
        for &(code, label) in entries {
            forward.insert(code, label);
            reverse.insert(label, code);
        }
        Bimap {
            name,
            forward,
            reverse,
            on_missing,
        }
    }

    pub fn name_of(&self, code: u16) -> Result<String, DnsError> {
        match self.forward.get(&code) {
            Some(label) => Ok((*label).to_string()),
            None => match (self.on_missing)(self.name, MissingKey::Forward(code))? {
                EitherNameOrCode::Name(label) => Ok(label),
                EitherNameOrCode::Code(_) => Err(DnsError::Enum {
                    name: self.name,
                    key: code.to_string(),
                }),
            },
        }
    }

    pub fn code_of(&self, label: &str) -> Result<u16, DnsError> {
        match self.reverse.get(label) {
            Some(code) => Ok(*code),
            None => match (self.on_missing)(self.name, MissingKey::Reverse(label))? {
                EitherNameOrCode::Code(code) => Ok(code),
                EitherNameOrCode::Name(_) => Err(DnsError::Enum {
                    name: self.name,
                    key: label.to_string(),
                }),
            },
        }
    }
}

/// The fallback used by QTYPE: unknown numeric codes round-trip as `TYPEn`;
/// unknown `TYPEn` text parses back to the numeric code it names.
pub fn unknown_qtype(name: &'static str, key: MissingKey) -> Result<EitherNameOrCode, DnsError> {
    match key {
        MissingKey::Forward(code) => Ok(EitherNameOrCode::Name(format!("TYPE{}", code))),
        MissingKey::Reverse(label) => {
            if let Some(rest) = label.strip_prefix("TYPE") {
                if let Ok(code) = rest.parse::<u16>() {
                    return Ok(EitherNameOrCode::Code(code));
                }
            }
            Err(DnsError::Enum {
                name,
                key: label.to_string(),
            })
        }
    }
}

/// The fallback used by CLASS/RCODE/OPCODE/QR: any unknown key is a hard
/// enumeration error, never synthesized.
pub fn reject_unknown(name: &'static str, key: MissingKey) -> Result<EitherNameOrCode, DnsError> {
    let key_text = match key {
        MissingKey::Forward(code) => code.to_string(),
        MissingKey::Reverse(label) => label.to_string(),
    };
    Err(DnsError::Enum {
        name,
        key: key_text,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_entries_round_trip() {
        let map = Bimap::new("TEST", &[(1, "A"), (2, "B")], reject_unknown);
        assert_eq!(map.name_of(1).unwrap(), "A");
        assert_eq!(map.code_of("B").unwrap(), 2);
    }

    #[test]
    fn unknown_qtype_synthesizes_typen() {
        let map = Bimap::new("QTYPE", &[(1, "A")], unknown_qtype);
        assert_eq!(map.name_of(999).unwrap(), "TYPE999");
        assert_eq!(map.code_of("TYPE999").unwrap(), 999);
        assert!(map.code_of("NOTATYPE").is_err());
    }

    #[test]
    fn unknown_class_is_an_error() {
        let map = Bimap::new("CLASS", &[(1, "IN")], reject_unknown);
        assert!(map.name_of(77).is_err());
        assert!(map.code_of("BOGUS").is_err());
    }
}
