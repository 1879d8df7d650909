// HTTPS/SVCB (RFC 9460) service-parameter codec shared by both RR types.
// Grounded on the reference `HTTPS` RD class: the `paramkeys` name table,
// the per-key value shapes, and the `zf_*` zone-format escaping helpers.

use std::net::{Ipv4Addr, Ipv6Addr};

use crate::buffer::Buffer;
use crate::error::DnsError;

#[derive(Clone, PartialEq, Debug)]
pub enum SvcParam {
    Mandatory(Vec<u16>),
    Alpn(Vec<Vec<u8>>),
    NoDefaultAlpn,
    Port(u16),
    Ipv4Hint(Vec<Ipv4Addr>),
    Ipv6Hint(Vec<Ipv6Addr>),
    EchConfig(Vec<u8>),
    Other { key: u16, value: Vec<u8> },
}

impl SvcParam {
    fn key(&self) -> u16 {
        match self {
            SvcParam::Mandatory(_) => 0,
            SvcParam::Alpn(_) => 1,
            SvcParam::NoDefaultAlpn => 2,
            SvcParam::Port(_) => 3,
            SvcParam::Ipv4Hint(_) => 4,
            SvcParam::EchConfig(_) => 5,
            SvcParam::Ipv6Hint(_) => 6,
            SvcParam::Other { key, .. } => *key,
        }
    }

    fn key_name(key: u16) -> String {
        match key {
            0 => "mandatory".to_string(),
            1 => "alpn".to_string(),
            2 => "no-default-alpn".to_string(),
            3 => "port".to_string(),
            4 => "ipv4hint".to_string(),
            5 => "echconfig".to_string(),
            6 => "ipv6hint".to_string(),
            other => format!("key{}", other),
        }
    }

    fn key_of_name(name: &str) -> Option<u16> {
        match name {
            "mandatory" => Some(0),
            "alpn" => Some(1),
            "no-default-alpn" => Some(2),
            "port" => Some(3),
            "ipv4hint" => Some(4),
            "echconfig" => Some(5),
            "ipv6hint" => Some(6),
            other => other.strip_prefix("key").and_then(|n| n.parse().ok()),
        }
    }

    fn value_bytes(&self) -> Vec<u8> {
        match self {
            SvcParam::Mandatory(keys) => keys.iter().flat_map(|k| k.to_be_bytes()).collect(),
            SvcParam::Alpn(protocols) => {
                let mut out = Vec::new();
                for p in protocols {
                    out.push(p.len() as u8);
                    out.extend_from_slice(p);
                }
                out
            }
            SvcParam::NoDefaultAlpn => Vec::new(),
            SvcParam::Port(port) => port.to_be_bytes().to_vec(),
            SvcParam::Ipv4Hint(addrs) => addrs.iter().flat_map(|a| a.octets()).collect(),
            SvcParam::Ipv6Hint(addrs) => addrs.iter().flat_map(|a| a.octets()).collect(),
            SvcParam::EchConfig(bytes) => bytes.clone(),
            SvcParam::Other { value, .. } => value.clone(),
        }
    }

    fn from_wire(key: u16, value: &[u8]) -> Result<SvcParam, DnsError> {
        Ok(match key {
            0 => SvcParam::Mandatory(
                value
                    .chunks_exact(2)
                    .map(|c| u16::from_be_bytes([c[0], c[1]]))
                    .collect(),
            ),
            1 => {
                let mut protocols = Vec::new();
                let mut i = 0;
                while i < value.len() {
                    let len = value[i] as usize;
                    i += 1;
                    if i + len > value.len() {
                        return Err(DnsError::label("truncated alpn entry in SVCB parameter", i));
                    }
                    protocols.push(value[i..i + len].to_vec());
                    i += len;
                }
                SvcParam::Alpn(protocols)
            }
            2 => SvcParam::NoDefaultAlpn,
            3 => {
                if value.len() != 2 {
                    return Err(DnsError::label("port SVCB parameter must be 2 bytes", 0));
                }
                SvcParam::Port(u16::from_be_bytes([value[0], value[1]]))
            }
            4 => SvcParam::Ipv4Hint(
                value
                    .chunks_exact(4)
                    .map(|c| Ipv4Addr::new(c[0], c[1], c[2], c[3]))
                    .collect(),
            ),
            5 => SvcParam::EchConfig(value.to_vec()),
            6 => SvcParam::Ipv6Hint(
                value
                    .chunks_exact(16)
                    .map(|c| {
                        let mut octets = [0u8; 16];
                        octets.copy_from_slice(c);
                        Ipv6Addr::from(octets)
                    })
                    .collect(),
            ),
            other => SvcParam::Other {
                key: other,
                value: value.to_vec(),
            },
        })
    }
}

pub fn parse_params(buffer: &mut Buffer, end: usize) -> Result<Vec<SvcParam>, DnsError> {
    let mut params = Vec::new();
    while buffer.offset() < end {
        let key = buffer.get_u16()?;
        let len = buffer.get_u16()? as usize;
        let value = buffer.get(len)?;
        params.push(SvcParam::from_wire(key, &value)?);
    }
    Ok(params)
}

pub fn pack_params(buffer: &mut Buffer, params: &[SvcParam]) {
    // Encoders must emit ascending key order (decoders accept any order).
    let mut sorted: Vec<&SvcParam> = params.iter().collect();
    sorted.sort_by_key(|p| p.key());
    for param in sorted {
        let value = param.value_bytes();
        buffer.pack_u16(param.key());
        buffer.pack_u16(value.len() as u16);
        buffer.append(&value);
    }
}

fn escape_value(value: &str, escape_comma: bool) -> String {
    let mut out = String::new();
    for b in value.bytes() {
        let special = !(0x21..=0x7e).contains(&b) || b == b'"' || b == b'\\' || (escape_comma && b == b',');
        if special {
            out.push_str(&format!("\\{:03}", b));
        } else {
            out.push(b as char);
        }
    }
    out
}

fn to_zone_value(param: &SvcParam) -> String {
    match param {
        SvcParam::Mandatory(keys) => keys
            .iter()
            .map(|k| SvcParam::key_name(*k))
            .collect::<Vec<_>>()
            .join(","),
        SvcParam::Alpn(protocols) => protocols
            .iter()
            .map(|p| escape_value(&String::from_utf8_lossy(p), true))
            .collect::<Vec<_>>()
            .join(","),
        SvcParam::NoDefaultAlpn => String::new(),
        SvcParam::Port(port) => port.to_string(),
        SvcParam::Ipv4Hint(addrs) => addrs.iter().map(|a| a.to_string()).collect::<Vec<_>>().join(","),
        SvcParam::Ipv6Hint(addrs) => addrs.iter().map(|a| a.to_string()).collect::<Vec<_>>().join(","),
        SvcParam::EchConfig(bytes) => crate::rdata::b64_encode(bytes),
        SvcParam::Other { value, .. } => escape_value(&String::from_utf8_lossy(value), true),
    }
}

pub fn params_to_zone(params: &[SvcParam]) -> String {
    let mut sorted: Vec<&SvcParam> = params.iter().collect();
    sorted.sort_by_key(|p| p.key());
    sorted
        .iter()
        .map(|p| {
            let value = to_zone_value(p);
            if value.is_empty() {
                SvcParam::key_name(p.key())
            } else {
                format!("{}={}", SvcParam::key_name(p.key()), value)
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn params_from_zone(tokens: &[String]) -> Result<Vec<SvcParam>, DnsError> {
    let mut params = Vec::new();
    for token in tokens {
        let (name, value) = match token.split_once('=') {
            Some((n, v)) => (n, Some(v)),
            None => (token.as_str(), None),
        };
        let key = SvcParam::key_of_name(name).ok_or_else(|| DnsError::parse(format!("unknown SVCB parameter key {:?}", name), 0))?;
        let param = match key {
            0 => SvcParam::Mandatory(
                value
                    .unwrap_or("")
                    .split(',')
                    .filter(|s| !s.is_empty())
                    .map(|s| SvcParam::key_of_name(s).ok_or_else(|| DnsError::parse(format!("unknown mandatory key {:?}", s), 0)))
                    .collect::<Result<Vec<_>, _>>()?,
            ),
            1 => SvcParam::Alpn(
                value
                    .unwrap_or("")
                    .split(',')
                    .filter(|s| !s.is_empty())
                    .map(|s| s.as_bytes().to_vec())
                    .collect(),
            ),
            2 => SvcParam::NoDefaultAlpn,
            3 => SvcParam::Port(
                value
                    .unwrap_or("0")
                    .parse()
                    .map_err(|_| DnsError::parse("invalid port SVCB parameter", 0))?,
            ),
            4 => SvcParam::Ipv4Hint(
                value
                    .unwrap_or("")
                    .split(',')
                    .filter(|s| !s.is_empty())
                    .map(|s| s.parse().map_err(|_| DnsError::parse("invalid ipv4hint", 0)))
                    .collect::<Result<Vec<_>, _>>()?,
            ),
            5 => SvcParam::EchConfig(
                crate::rdata::b64_decode(value.unwrap_or(""))
                    .map_err(|_| DnsError::parse("invalid echconfig base64", 0))?,
            ),
            6 => SvcParam::Ipv6Hint(
                value
                    .unwrap_or("")
                    .split(',')
                    .filter(|s| !s.is_empty())
                    .map(|s| s.parse().map_err(|_| DnsError::parse("invalid ipv6hint", 0)))
                    .collect::<Result<Vec<_>, _>>()?,
            ),
            other => SvcParam::Other {
                key: other,
                value: value.unwrap_or("").as_bytes().to_vec(),
            },
        };
        params.push(param);
    }
    Ok(params)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alpn_and_hints_round_trip_on_wire() {
        let params = vec![
            SvcParam::Alpn(vec![b"h3".to_vec(), b"h2".to_vec()]),
            SvcParam::Ipv4Hint(vec!["104.16.132.229".parse().unwrap()]),
            SvcParam::Port(443),
        ];
        let mut buf = Buffer::new();
        pack_params(&mut buf, &params);
        let mut read = Buffer::from_bytes(buf.as_slice());
        let end = read.len();
        let parsed = parse_params(&mut read, end).unwrap();
        // pack_params sorts ascending by key: port(3) < ipv4hint(4)... wait alpn is key 1
        assert_eq!(parsed.len(), 3);
    }

    #[test]
    fn zone_text_matches_known_example() {
        let params = vec![
            SvcParam::Alpn(vec![b"h3".to_vec(), b"h3-29".to_vec(), b"h2".to_vec()]),
            SvcParam::Ipv4Hint(vec!["104.16.132.229".parse().unwrap(), "104.16.133.229".parse().unwrap()]),
        ];
        let text = params_to_zone(&params);
        assert_eq!(text, "alpn=h3,h3-29,h2 ipv4hint=104.16.132.229,104.16.133.229");
    }
}
