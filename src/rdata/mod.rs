// RDATA sum type. Grounded on the teacher's `protocol/rdata.rs` match-based
// parse/pack dispatch, generalized from its handful of RR types to the full
// set spec.md 4.4 names, and on each RD subclass in the reference
// implementation's `dns.py` for field layout and zone-text rendering.
//
// Deliberately a closed `enum`, not the reference implementation's
// string-keyed `RDMAP` registry: spec.md 9 calls this out as the idiomatic
// Rust replacement for virtual dispatch over a class hierarchy.

mod bitmap;
mod edns;
mod ipv6;
mod loc;
mod svcb;

pub use bitmap::{decode_type_bitmap, encode_type_bitmap};
pub use edns::{parse_options, pack_options, EdnsOption};
pub use svcb::{params_from_zone, params_to_zone, pack_params, parse_params, SvcParam};

use std::net::{Ipv4Addr, Ipv6Addr};

use base64::{engine::general_purpose::STANDARD, Engine as _};

use crate::buffer::Buffer;
use crate::error::DnsError;
use crate::label::{DnsLabel, NameBuffer};
use crate::rrtype::RrType;

pub(crate) fn b64_encode(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

pub(crate) fn b64_decode(s: &str) -> Result<Vec<u8>, base64::DecodeError> {
    STANDARD.decode(s)
}

fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02X}", b)).collect()
}

fn hex_decode(s: &str) -> Result<Vec<u8>, DnsError> {
    if s.len() % 2 != 0 {
        return Err(DnsError::parse("hex string has odd length", 0));
    }
    (0..s.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&s[i..i + 2], 16).map_err(|_| DnsError::parse("invalid hex digit", i)))
        .collect()
}

#[derive(Clone, PartialEq, Debug)]
pub struct SoaFields {
    pub mname: DnsLabel,
    pub rname: DnsLabel,
    pub serial: u32,
    pub refresh: u32,
    pub retry: u32,
    pub expire: u32,
    pub minimum: u32,
}

#[derive(Clone, PartialEq, Debug)]
pub struct SrvFields {
    pub priority: u16,
    pub weight: u16,
    pub port: u16,
    pub target: DnsLabel,
}

#[derive(Clone, PartialEq, Debug)]
pub struct NaptrFields {
    pub order: u16,
    pub preference: u16,
    pub flags: Vec<u8>,
    pub services: Vec<u8>,
    pub regexp: Vec<u8>,
    pub replacement: DnsLabel,
}

#[derive(Clone, PartialEq, Debug)]
pub struct CaaFields {
    pub flag: u8,
    pub tag: Vec<u8>,
    pub value: Vec<u8>,
}

#[derive(Clone, PartialEq, Debug)]
pub struct LocFields {
    pub version: u8,
    pub size: u8,
    pub horiz_pre: u8,
    pub vert_pre: u8,
    pub latitude: u32,
    pub longitude: u32,
    pub altitude: u32,
}

#[derive(Clone, PartialEq, Debug)]
pub struct DsFields {
    pub key_tag: u16,
    pub algorithm: u8,
    pub digest_type: u8,
    pub digest: Vec<u8>,
}

#[derive(Clone, PartialEq, Debug)]
pub struct DnskeyFields {
    pub flags: u16,
    pub protocol: u8,
    pub algorithm: u8,
    pub public_key: Vec<u8>,
}

#[derive(Clone, PartialEq, Debug)]
pub struct RrsigFields {
    pub type_covered: u16,
    pub algorithm: u8,
    pub labels: u8,
    pub original_ttl: u32,
    pub expiration: u32,
    pub inception: u32,
    pub key_tag: u16,
    pub signer_name: DnsLabel,
    pub signature: Vec<u8>,
}

#[derive(Clone, PartialEq, Debug)]
pub struct NsecFields {
    pub next_domain: DnsLabel,
    pub types: Vec<u16>,
}

#[derive(Clone, PartialEq, Debug)]
pub struct SshfpFields {
    pub algorithm: u8,
    pub fp_type: u8,
    pub fingerprint: Vec<u8>,
}

#[derive(Clone, PartialEq, Debug)]
pub struct TlsaFields {
    pub usage: u8,
    pub selector: u8,
    pub matching_type: u8,
    pub certificate: Vec<u8>,
}

#[derive(Clone, PartialEq, Debug)]
pub struct SvcbFields {
    pub priority: u16,
    pub target: DnsLabel,
    pub params: Vec<SvcParam>,
}

#[derive(Clone, PartialEq, Debug)]
pub enum RData {
    A(Ipv4Addr),
    Aaaa(Ipv6Addr),
    Ns(DnsLabel),
    Cname(DnsLabel),
    Ptr(DnsLabel),
    Dname(DnsLabel),
    Mx { preference: u16, exchange: DnsLabel },
    Soa(SoaFields),
    Txt(Vec<Vec<u8>>),
    Srv(SrvFields),
    Naptr(NaptrFields),
    Caa(CaaFields),
    Rp { mbox: DnsLabel, txt: DnsLabel },
    Loc(LocFields),
    Ds(DsFields),
    Dnskey(DnskeyFields),
    Rrsig(RrsigFields),
    Nsec(NsecFields),
    Sshfp(SshfpFields),
    Tlsa(TlsaFields),
    Https(SvcbFields),
    Svcb(SvcbFields),
    Opt(Vec<EdnsOption>),
    Unknown { rtype: u16, bytes: Vec<u8> },
}

impl RData {
    pub fn rtype(&self) -> u16 {
        match self {
            RData::A(_) => RrType::A.to_u16(),
            RData::Aaaa(_) => RrType::AAAA.to_u16(),
            RData::Ns(_) => RrType::NS.to_u16(),
            RData::Cname(_) => RrType::CNAME.to_u16(),
            RData::Ptr(_) => RrType::PTR.to_u16(),
            RData::Dname(_) => RrType::DNAME.to_u16(),
            RData::Mx { .. } => RrType::MX.to_u16(),
            RData::Soa(_) => RrType::SOA.to_u16(),
            RData::Txt(_) => RrType::TXT.to_u16(),
            RData::Srv(_) => RrType::SRV.to_u16(),
            RData::Naptr(_) => RrType::NAPTR.to_u16(),
            RData::Caa(_) => RrType::CAA.to_u16(),
            RData::Rp { .. } => RrType::RP.to_u16(),
            RData::Loc(_) => RrType::LOC.to_u16(),
            RData::Ds(_) => RrType::DS.to_u16(),
            RData::Dnskey(_) => RrType::DNSKEY.to_u16(),
            RData::Rrsig(_) => RrType::RRSIG.to_u16(),
            RData::Nsec(_) => RrType::NSEC.to_u16(),
            RData::Sshfp(_) => RrType::SSHFP.to_u16(),
            RData::Tlsa(_) => RrType::TLSA.to_u16(),
            RData::Https(_) => RrType::HTTPS.to_u16(),
            RData::Svcb(_) => RrType::SVCB.to_u16(),
            RData::Opt(_) => RrType::OPT.to_u16(),
            RData::Unknown { rtype, .. } => *rtype,
        }
    }

    /// Parses RDATA of declared `rtype`, consuming exactly `rdlength` bytes
    /// starting at the buffer's current offset (names may use compression
    /// pointers that jump elsewhere in the message).
    pub fn parse(buffer: &mut NameBuffer, rtype: u16, rdlength: usize) -> Result<RData, DnsError> {
        let start = buffer.buffer.offset();
        let end = start + rdlength;

        let rdata = match RrType::from_u16(rtype) {
            Some(RrType::A) => {
                let bytes = buffer.buffer.get(4)?;
                RData::A(Ipv4Addr::new(bytes[0], bytes[1], bytes[2], bytes[3]))
            }
            Some(RrType::AAAA) => {
                let bytes = buffer.buffer.get(16)?;
                let mut octets = [0u8; 16];
                octets.copy_from_slice(&bytes);
                RData::Aaaa(Ipv6Addr::from(octets))
            }
            Some(RrType::NS) => RData::Ns(buffer.decode_name()?),
            Some(RrType::CNAME) => RData::Cname(buffer.decode_name()?),
            Some(RrType::PTR) => RData::Ptr(buffer.decode_name()?),
            Some(RrType::DNAME) => RData::Dname(buffer.decode_name()?),
            Some(RrType::MX) => {
                let preference = buffer.buffer.get_u16()?;
                let exchange = buffer.decode_name()?;
                RData::Mx { preference, exchange }
            }
            Some(RrType::SOA) => {
                let mname = buffer.decode_name()?;
                let rname = buffer.decode_name()?;
                RData::Soa(SoaFields {
                    mname,
                    rname,
                    serial: buffer.buffer.get_u32()?,
                    refresh: buffer.buffer.get_u32()?,
                    retry: buffer.buffer.get_u32()?,
                    expire: buffer.buffer.get_u32()?,
                    minimum: buffer.buffer.get_u32()?,
                })
            }
            Some(RrType::TXT) => {
                let mut segments = Vec::new();
                while buffer.buffer.offset() < end {
                    let len = buffer.buffer.get_u8()? as usize;
                    segments.push(buffer.buffer.get(len)?);
                }
                RData::Txt(segments)
            }
            Some(RrType::SRV) => {
                let priority = buffer.buffer.get_u16()?;
                let weight = buffer.buffer.get_u16()?;
                let port = buffer.buffer.get_u16()?;
                let target = buffer.decode_name()?;
                RData::Srv(SrvFields { priority, weight, port, target })
            }
            Some(RrType::NAPTR) => {
                let order = buffer.buffer.get_u16()?;
                let preference = buffer.buffer.get_u16()?;
                let flags = read_char_string(&mut buffer.buffer)?;
                let services = read_char_string(&mut buffer.buffer)?;
                let regexp = read_char_string(&mut buffer.buffer)?;
                let replacement = buffer.decode_name()?;
                RData::Naptr(NaptrFields { order, preference, flags, services, regexp, replacement })
            }
            Some(RrType::CAA) => {
                let flag = buffer.buffer.get_u8()?;
                let tag = read_char_string(&mut buffer.buffer)?;
                let remaining = end - buffer.buffer.offset();
                let value = buffer.buffer.get(remaining)?;
                RData::Caa(CaaFields { flag, tag, value })
            }
            Some(RrType::RP) => {
                let mbox = buffer.decode_name()?;
                let txt = buffer.decode_name()?;
                RData::Rp { mbox, txt }
            }
            Some(RrType::LOC) => {
                let version = buffer.buffer.get_u8()?;
                if version != 0 {
                    return Err(DnsError::parse("unsupported LOC record version", version as usize));
                }
                RData::Loc(LocFields {
                    version,
                    size: buffer.buffer.get_u8()?,
                    horiz_pre: buffer.buffer.get_u8()?,
                    vert_pre: buffer.buffer.get_u8()?,
                    latitude: buffer.buffer.get_u32()?,
                    longitude: buffer.buffer.get_u32()?,
                    altitude: buffer.buffer.get_u32()?,
                })
            }
            Some(RrType::DS) => {
                let key_tag = buffer.buffer.get_u16()?;
                let algorithm = buffer.buffer.get_u8()?;
                let digest_type = buffer.buffer.get_u8()?;
                let remaining = end - buffer.buffer.offset();
                let digest = buffer.buffer.get(remaining)?;
                RData::Ds(DsFields { key_tag, algorithm, digest_type, digest })
            }
            Some(RrType::DNSKEY) => {
                let flags = buffer.buffer.get_u16()?;
                let protocol = buffer.buffer.get_u8()?;
                let algorithm = buffer.buffer.get_u8()?;
                let remaining = end - buffer.buffer.offset();
                let public_key = buffer.buffer.get(remaining)?;
                RData::Dnskey(DnskeyFields { flags, protocol, algorithm, public_key })
            }
            Some(RrType::RRSIG) => {
                let type_covered = buffer.buffer.get_u16()?;
                let algorithm = buffer.buffer.get_u8()?;
                let labels = buffer.buffer.get_u8()?;
                let original_ttl = buffer.buffer.get_u32()?;
                let expiration = buffer.buffer.get_u32()?;
                let inception = buffer.buffer.get_u32()?;
                let key_tag = buffer.buffer.get_u16()?;
                let signer_name = buffer.decode_name()?;
                let remaining = end - buffer.buffer.offset();
                let signature = buffer.buffer.get(remaining)?;
                RData::Rrsig(RrsigFields {
                    type_covered,
                    algorithm,
                    labels,
                    original_ttl,
                    expiration,
                    inception,
                    key_tag,
                    signer_name,
                    signature,
                })
            }
            Some(RrType::NSEC) => {
                let next_domain = buffer.decode_name()?;
                let remaining = end - buffer.buffer.offset();
                let bitmap_bytes = buffer.buffer.get(remaining)?;
                let types = decode_type_bitmap(&bitmap_bytes)?;
                RData::Nsec(NsecFields { next_domain, types })
            }
            Some(RrType::SSHFP) => {
                let algorithm = buffer.buffer.get_u8()?;
                let fp_type = buffer.buffer.get_u8()?;
                let remaining = end - buffer.buffer.offset();
                let fingerprint = buffer.buffer.get(remaining)?;
                RData::Sshfp(SshfpFields { algorithm, fp_type, fingerprint })
            }
            Some(RrType::TLSA) => {
                let usage = buffer.buffer.get_u8()?;
                let selector = buffer.buffer.get_u8()?;
                let matching_type = buffer.buffer.get_u8()?;
                let remaining = end - buffer.buffer.offset();
                let certificate = buffer.buffer.get(remaining)?;
                RData::Tlsa(TlsaFields { usage, selector, matching_type, certificate })
            }
            Some(RrType::HTTPS) => RData::Https(parse_svcb_fields(buffer, end)?),
            Some(RrType::SVCB) => RData::Svcb(parse_svcb_fields(buffer, end)?),
            Some(RrType::OPT) => {
                let options = parse_options(&mut buffer.buffer, end)?;
                RData::Opt(options)
            }
            _ => {
                let bytes = buffer.buffer.get(rdlength)?;
                RData::Unknown { rtype, bytes }
            }
        };

        if buffer.buffer.offset() != end {
            return Err(DnsError::label(
                format!(
                    "RDATA for type {} consumed {} bytes, expected {}",
                    rtype,
                    buffer.buffer.offset() - start,
                    rdlength
                ),
                start,
            ));
        }
        Ok(rdata)
    }

    /// Packs this RDATA's bytes (without the preceding RDLENGTH field,
    /// which the caller backpatches once the length is known).
    pub fn pack(&self, buffer: &mut NameBuffer) -> Result<(), DnsError> {
        match self {
            RData::A(addr) => buffer.buffer.append(&addr.octets()),
            RData::Aaaa(addr) => buffer.buffer.append(&addr.octets()),
            RData::Ns(name) | RData::Cname(name) | RData::Ptr(name) => buffer.encode_name(name)?,
            RData::Dname(name) => buffer.encode_name_nocompress(name)?,
            RData::Mx { preference, exchange } => {
                buffer.buffer.pack_u16(*preference);
                buffer.encode_name(exchange)?;
            }
            RData::Soa(fields) => {
                buffer.encode_name_nocompress(&fields.mname)?;
                buffer.encode_name_nocompress(&fields.rname)?;
                buffer.buffer.pack_u32(fields.serial);
                buffer.buffer.pack_u32(fields.refresh);
                buffer.buffer.pack_u32(fields.retry);
                buffer.buffer.pack_u32(fields.expire);
                buffer.buffer.pack_u32(fields.minimum);
            }
            RData::Txt(segments) => {
                for segment in segments {
                    buffer.buffer.pack_u8(segment.len() as u8);
                    buffer.buffer.append(segment);
                }
            }
            RData::Srv(fields) => {
                buffer.buffer.pack_u16(fields.priority);
                buffer.buffer.pack_u16(fields.weight);
                buffer.buffer.pack_u16(fields.port);
                buffer.encode_name_nocompress(&fields.target)?;
            }
            RData::Naptr(fields) => {
                buffer.buffer.pack_u16(fields.order);
                buffer.buffer.pack_u16(fields.preference);
                pack_char_string(&mut buffer.buffer, &fields.flags);
                pack_char_string(&mut buffer.buffer, &fields.services);
                pack_char_string(&mut buffer.buffer, &fields.regexp);
                buffer.encode_name_nocompress(&fields.replacement)?;
            }
            RData::Caa(fields) => {
                buffer.buffer.pack_u8(fields.flag);
                pack_char_string(&mut buffer.buffer, &fields.tag);
                buffer.buffer.append(&fields.value);
            }
            RData::Rp { mbox, txt } => {
                buffer.encode_name_nocompress(mbox)?;
                buffer.encode_name_nocompress(txt)?;
            }
            RData::Loc(fields) => {
                buffer.buffer.pack_u8(fields.version);
                buffer.buffer.pack_u8(fields.size);
                buffer.buffer.pack_u8(fields.horiz_pre);
                buffer.buffer.pack_u8(fields.vert_pre);
                buffer.buffer.pack_u32(fields.latitude);
                buffer.buffer.pack_u32(fields.longitude);
                buffer.buffer.pack_u32(fields.altitude);
            }
            RData::Ds(fields) => {
                buffer.buffer.pack_u16(fields.key_tag);
                buffer.buffer.pack_u8(fields.algorithm);
                buffer.buffer.pack_u8(fields.digest_type);
                buffer.buffer.append(&fields.digest);
            }
            RData::Dnskey(fields) => {
                buffer.buffer.pack_u16(fields.flags);
                buffer.buffer.pack_u8(fields.protocol);
                buffer.buffer.pack_u8(fields.algorithm);
                buffer.buffer.append(&fields.public_key);
            }
            RData::Rrsig(fields) => {
                buffer.buffer.pack_u16(fields.type_covered);
                buffer.buffer.pack_u8(fields.algorithm);
                buffer.buffer.pack_u8(fields.labels);
                buffer.buffer.pack_u32(fields.original_ttl);
                buffer.buffer.pack_u32(fields.expiration);
                buffer.buffer.pack_u32(fields.inception);
                buffer.buffer.pack_u16(fields.key_tag);
                buffer.encode_name_nocompress(&fields.signer_name)?;
                buffer.buffer.append(&fields.signature);
            }
            RData::Nsec(fields) => {
                buffer.encode_name_nocompress(&fields.next_domain)?;
                buffer.buffer.append(&encode_type_bitmap(&fields.types));
            }
            RData::Sshfp(fields) => {
                buffer.buffer.pack_u8(fields.algorithm);
                buffer.buffer.pack_u8(fields.fp_type);
                buffer.buffer.append(&fields.fingerprint);
            }
            RData::Tlsa(fields) => {
                buffer.buffer.pack_u8(fields.usage);
                buffer.buffer.pack_u8(fields.selector);
                buffer.buffer.pack_u8(fields.matching_type);
                buffer.buffer.append(&fields.certificate);
            }
            RData::Https(fields) | RData::Svcb(fields) => {
                buffer.buffer.pack_u16(fields.priority);
                buffer.encode_name_nocompress(&fields.target)?;
                pack_params(&mut buffer.buffer, &fields.params);
            }
            RData::Opt(options) => pack_options(&mut buffer.buffer, options),
            RData::Unknown { bytes, .. } => buffer.buffer.append(bytes),
        }
        Ok(())
    }

    /// Renders the RDATA portion of a zone-file/`dig`-style record line.
    pub fn to_zone(&self) -> String {
        match self {
            RData::A(addr) => addr.to_string(),
            RData::Aaaa(addr) => ipv6::format_ipv6(addr),
            RData::Ns(name) | RData::Cname(name) | RData::Ptr(name) | RData::Dname(name) => name.to_string(),
            RData::Mx { preference, exchange } => format!("{} {}", preference, exchange),
            RData::Soa(fields) => format!(
                "{} {} {} {} {} {} {}",
                fields.mname, fields.rname, fields.serial, fields.refresh, fields.retry, fields.expire, fields.minimum
            ),
            RData::Txt(segments) => segments
                .iter()
                .map(|s| format!("\"{}\"", escape_char_string(s)))
                .collect::<Vec<_>>()
                .join(" "),
            RData::Srv(fields) => format!("{} {} {} {}", fields.priority, fields.weight, fields.port, fields.target),
            RData::Naptr(fields) => format!(
                "{} {} \"{}\" \"{}\" \"{}\" {}",
                fields.order,
                fields.preference,
                escape_char_string(&fields.flags),
                escape_char_string(&fields.services),
                escape_char_string(&fields.regexp),
                fields.replacement
            ),
            RData::Caa(fields) => format!(
                "{} {} \"{}\"",
                fields.flag,
                escape_char_string(&fields.tag),
                String::from_utf8_lossy(&fields.value)
            ),
            RData::Rp { mbox, txt } => format!("{} {}", mbox, txt),
            RData::Loc(fields) => {
                let tail = loc::format_precision_tail(fields.size, fields.horiz_pre, fields.vert_pre);
                let head = format!(
                    "{} {} {}m",
                    loc::format_coordinate(fields.latitude, "N", "S"),
                    loc::format_coordinate(fields.longitude, "E", "W"),
                    loc::decode_altitude(fields.altitude),
                );
                if tail.is_empty() {
                    head
                } else {
                    format!("{} {}", head, tail)
                }
            }
            RData::Ds(fields) => format!(
                "{} {} {} {}",
                fields.key_tag,
                fields.algorithm,
                fields.digest_type,
                hex_encode(&fields.digest)
            ),
            RData::Dnskey(fields) => format!(
                "{} {} {} {}",
                fields.flags,
                fields.protocol,
                fields.algorithm,
                b64_encode(&fields.public_key)
            ),
            RData::Rrsig(fields) => format!(
                "{} {} {} {} {} {} {} {} {}",
                RrType::name_of(fields.type_covered).unwrap_or_else(|_| fields.type_covered.to_string()),
                fields.algorithm,
                fields.labels,
                fields.original_ttl,
                fields.expiration,
                fields.inception,
                fields.key_tag,
                fields.signer_name,
                b64_encode(&fields.signature)
            ),
            RData::Nsec(fields) => format!(
                "{} {}",
                fields.next_domain,
                fields
                    .types
                    .iter()
                    .map(|t| RrType::name_of(*t).unwrap_or_else(|_| t.to_string()))
                    .collect::<Vec<_>>()
                    .join(" ")
            ),
            RData::Sshfp(fields) => format!("{} {} {}", fields.algorithm, fields.fp_type, hex_encode(&fields.fingerprint)),
            RData::Tlsa(fields) => format!(
                "{} {} {} {}",
                fields.usage,
                fields.selector,
                fields.matching_type,
                hex_encode(&fields.certificate)
            ),
            RData::Https(fields) | RData::Svcb(fields) => {
                let params = params_to_zone(&fields.params);
                if params.is_empty() {
                    format!("{} {}", fields.priority, fields.target)
                } else {
                    format!("{} {} {}", fields.priority, fields.target, params)
                }
            }
            RData::Opt(options) => options
                .iter()
                .map(|o| format!("OPT={}:{}", o.code, hex_encode(&o.data)))
                .collect::<Vec<_>>()
                .join(" "),
            RData::Unknown { rtype, bytes } => format!("TYPE{} \\# {} {}", rtype, bytes.len(), hex_encode(bytes)),
        }
    }

    /// Parses the RDATA portion of a zone-file/`dig`-style record line,
    /// given its already-resolved numeric QTYPE.
    pub fn from_zone(rtype: u16, tokens: &[String]) -> Result<RData, DnsError> {
        let join = |s: &[String]| s.join(" ");
        let name = |s: &str| DnsLabel::parse_text(s);
        match RrType::from_u16(rtype) {
            Some(RrType::A) => Ok(RData::A(
                tokens.first().ok_or_else(|| DnsError::parse("missing A address", 0))?
                    .parse()
                    .map_err(|_| DnsError::parse("invalid A address", 0))?,
            )),
            Some(RrType::AAAA) => Ok(RData::Aaaa(
                tokens.first().ok_or_else(|| DnsError::parse("missing AAAA address", 0))?
                    .parse()
                    .map_err(|_| DnsError::parse("invalid AAAA address", 0))?,
            )),
            Some(RrType::NS) => Ok(RData::Ns(name(tokens.first().map(String::as_str).unwrap_or(".")))),
            Some(RrType::CNAME) => Ok(RData::Cname(name(tokens.first().map(String::as_str).unwrap_or(".")))),
            Some(RrType::PTR) => Ok(RData::Ptr(name(tokens.first().map(String::as_str).unwrap_or(".")))),
            Some(RrType::DNAME) => Ok(RData::Dname(name(tokens.first().map(String::as_str).unwrap_or(".")))),
            Some(RrType::MX) => {
                let preference = tokens.first().ok_or_else(|| DnsError::parse("missing MX preference", 0))?
                    .parse()
                    .map_err(|_| DnsError::parse("invalid MX preference", 0))?;
                let exchange = name(tokens.get(1).map(String::as_str).unwrap_or("."));
                Ok(RData::Mx { preference, exchange })
            }
            Some(RrType::SOA) => {
                if tokens.len() < 7 {
                    return Err(DnsError::parse("SOA record needs 7 fields", 0));
                }
                Ok(RData::Soa(SoaFields {
                    mname: name(&tokens[0]),
                    rname: name(&tokens[1]),
                    serial: tokens[2].parse().map_err(|_| DnsError::parse("invalid SOA serial", 0))?,
                    refresh: crate::zone::parse_time(&tokens[3])?,
                    retry: crate::zone::parse_time(&tokens[4])?,
                    expire: crate::zone::parse_time(&tokens[5])?,
                    minimum: crate::zone::parse_time(&tokens[6])?,
                }))
            }
            Some(RrType::TXT) => Ok(RData::Txt(
                tokens.iter().map(|t| unescape_char_string(t)).collect(),
            )),
            Some(RrType::SRV) => {
                if tokens.len() < 4 {
                    return Err(DnsError::parse("SRV record needs 4 fields", 0));
                }
                Ok(RData::Srv(SrvFields {
                    priority: tokens[0].parse().map_err(|_| DnsError::parse("invalid SRV priority", 0))?,
                    weight: tokens[1].parse().map_err(|_| DnsError::parse("invalid SRV weight", 0))?,
                    port: tokens[2].parse().map_err(|_| DnsError::parse("invalid SRV port", 0))?,
                    target: name(&tokens[3]),
                }))
            }
            Some(RrType::NAPTR) => {
                if tokens.len() < 6 {
                    return Err(DnsError::parse("NAPTR record needs 6 fields", 0));
                }
                Ok(RData::Naptr(NaptrFields {
                    order: tokens[0].parse().map_err(|_| DnsError::parse("invalid NAPTR order", 0))?,
                    preference: tokens[1].parse().map_err(|_| DnsError::parse("invalid NAPTR preference", 0))?,
                    flags: unescape_char_string(&tokens[2]),
                    services: unescape_char_string(&tokens[3]),
                    regexp: unescape_char_string(&tokens[4]),
                    replacement: name(&tokens[5]),
                }))
            }
            Some(RrType::CAA) => {
                if tokens.len() < 3 {
                    return Err(DnsError::parse("CAA record needs 3 fields", 0));
                }
                Ok(RData::Caa(CaaFields {
                    flag: tokens[0].parse().map_err(|_| DnsError::parse("invalid CAA flag", 0))?,
                    tag: unescape_char_string(&tokens[1]),
                    value: unescape_char_string(&tokens[2]),
                }))
            }
            Some(RrType::RP) => {
                let mbox = name(tokens.first().map(String::as_str).unwrap_or("."));
                let txt = name(tokens.get(1).map(String::as_str).unwrap_or("."));
                Ok(RData::Rp { mbox, txt })
            }
            Some(RrType::DS) => {
                if tokens.len() < 4 {
                    return Err(DnsError::parse("DS record needs 4 fields", 0));
                }
                Ok(RData::Ds(DsFields {
                    key_tag: tokens[0].parse().map_err(|_| DnsError::parse("invalid DS key tag", 0))?,
                    algorithm: tokens[1].parse().map_err(|_| DnsError::parse("invalid DS algorithm", 0))?,
                    digest_type: tokens[2].parse().map_err(|_| DnsError::parse("invalid DS digest type", 0))?,
                    digest: hex_decode(&tokens[3..].concat())?,
                }))
            }
            Some(RrType::DNSKEY) => {
                if tokens.len() < 4 {
                    return Err(DnsError::parse("DNSKEY record needs 4 fields", 0));
                }
                Ok(RData::Dnskey(DnskeyFields {
                    flags: tokens[0].parse().map_err(|_| DnsError::parse("invalid DNSKEY flags", 0))?,
                    protocol: tokens[1].parse().map_err(|_| DnsError::parse("invalid DNSKEY protocol", 0))?,
                    algorithm: tokens[2].parse().map_err(|_| DnsError::parse("invalid DNSKEY algorithm", 0))?,
                    public_key: b64_decode(&join(&tokens[3..])).map_err(|_| DnsError::parse("invalid DNSKEY base64", 0))?,
                }))
            }
            Some(RrType::SSHFP) => {
                if tokens.len() < 3 {
                    return Err(DnsError::parse("SSHFP record needs 3 fields", 0));
                }
                Ok(RData::Sshfp(SshfpFields {
                    algorithm: tokens[0].parse().map_err(|_| DnsError::parse("invalid SSHFP algorithm", 0))?,
                    fp_type: tokens[1].parse().map_err(|_| DnsError::parse("invalid SSHFP fingerprint type", 0))?,
                    fingerprint: hex_decode(&tokens[2..].concat())?,
                }))
            }
            Some(RrType::TLSA) => {
                if tokens.len() < 4 {
                    return Err(DnsError::parse("TLSA record needs 4 fields", 0));
                }
                Ok(RData::Tlsa(TlsaFields {
                    usage: tokens[0].parse().map_err(|_| DnsError::parse("invalid TLSA usage", 0))?,
                    selector: tokens[1].parse().map_err(|_| DnsError::parse("invalid TLSA selector", 0))?,
                    matching_type: tokens[2].parse().map_err(|_| DnsError::parse("invalid TLSA matching type", 0))?,
                    certificate: hex_decode(&tokens[3..].concat())?,
                }))
            }
            Some(rt @ RrType::HTTPS) | Some(rt @ RrType::SVCB) => {
                if tokens.len() < 2 {
                    return Err(DnsError::parse("SVCB/HTTPS record needs priority and target", 0));
                }
                let fields = SvcbFields {
                    priority: tokens[0].parse().map_err(|_| DnsError::parse("invalid SVCB priority", 0))?,
                    target: name(&tokens[1]),
                    params: params_from_zone(&tokens[2..])?,
                };
                Ok(if matches!(rt, RrType::HTTPS) { RData::Https(fields) } else { RData::Svcb(fields) })
            }
            _ => parse_unknown_zone(rtype, tokens),
        }
    }
}

/// Parses the RFC 3597 generic-RDATA zone form `\# <len> <hex>` that
/// `to_zone` renders for any type with no dedicated variant.
fn parse_unknown_zone(rtype: u16, tokens: &[String]) -> Result<RData, DnsError> {
    if tokens.first().map(String::as_str) != Some("\\#") {
        return Err(DnsError::parse(format!("unsupported record type {} needs \\# generic form", rtype), 0));
    }
    let len: usize = tokens
        .get(1)
        .ok_or_else(|| DnsError::parse("generic RDATA missing length", 0))?
        .parse()
        .map_err(|_| DnsError::parse("invalid generic RDATA length", 0))?;
    let hex: String = tokens[2..].concat();
    let bytes = hex_decode(&hex)?;
    if bytes.len() != len {
        return Err(DnsError::parse(
            format!("generic RDATA declared {} bytes but hex had {}", len, bytes.len()),
            0,
        ));
    }
    Ok(RData::Unknown { rtype, bytes })
}

fn parse_svcb_fields(buffer: &mut NameBuffer, end: usize) -> Result<SvcbFields, DnsError> {
    let priority = buffer.buffer.get_u16()?;
    let target = buffer.decode_name()?;
    let params = parse_params(&mut buffer.buffer, end)?;
    Ok(SvcbFields { priority, target, params })
}

fn read_char_string(buffer: &mut Buffer) -> Result<Vec<u8>, DnsError> {
    let len = buffer.get_u8()? as usize;
    buffer.get(len)
}

fn pack_char_string(buffer: &mut Buffer, value: &[u8]) {
    buffer.pack_u8(value.len() as u8);
    buffer.append(value);
}

fn escape_char_string(value: &[u8]) -> String {
    let mut out = String::new();
    for &b in value {
        if b == b'"' || b == b'\\' {
            out.push('\\');
            out.push(b as char);
        } else if (0x20..=0x7e).contains(&b) {
            out.push(b as char);
        } else {
            out.push_str(&format!("\\{:03}", b));
        }
    }
    out
}

fn unescape_char_string(text: &str) -> Vec<u8> {
    let trimmed = text.strip_prefix('"').and_then(|t| t.strip_suffix('"')).unwrap_or(text);
    let bytes = trimmed.as_bytes();
    let mut out = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'\\' && i + 3 < bytes.len() && bytes[i + 1..i + 4].iter().all(|b| b.is_ascii_digit()) {
            let digits = std::str::from_utf8(&bytes[i + 1..i + 4]).unwrap();
            out.push(digits.parse::<u16>().unwrap_or(0) as u8);
            i += 4;
        } else if bytes[i] == b'\\' && i + 1 < bytes.len() {
            out.push(bytes[i + 1]);
            i += 2;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn a_record_round_trips() {
        let rdata = RData::A("93.184.216.34".parse().unwrap());
        let mut buf = NameBuffer::new();
        rdata.pack(&mut buf).unwrap();
        let mut read = NameBuffer::from_bytes(buf.buffer.as_slice());
        let parsed = RData::parse(&mut read, RrType::A.to_u16(), 4).unwrap();
        assert_eq!(parsed, rdata);
    }

    #[test]
    fn mx_name_compresses_against_later_names() {
        let rdata = RData::Mx { preference: 10, exchange: DnsLabel::parse_text("mail.example.com") };
        let mut buf = NameBuffer::new();
        rdata.pack(&mut buf).unwrap();
        assert!(buf.buffer.as_slice().len() < DnsLabel::parse_text("mail.example.com").wire_len() + 2);
    }

    #[test]
    fn txt_segments_round_trip() {
        let rdata = RData::Txt(vec![b"hello world".to_vec(), b"v=spf1".to_vec()]);
        let mut buf = NameBuffer::new();
        rdata.pack(&mut buf).unwrap();
        let len = buf.buffer.as_slice().len();
        let mut read = NameBuffer::from_bytes(buf.buffer.as_slice());
        let parsed = RData::parse(&mut read, RrType::TXT.to_u16(), len).unwrap();
        assert_eq!(parsed, rdata);
    }

    #[test]
    fn soa_zone_text_matches_field_order() {
        let rdata = RData::Soa(SoaFields {
            mname: DnsLabel::parse_text("ns1.example.com"),
            rname: DnsLabel::parse_text("hostmaster.example.com"),
            serial: 2024010100,
            refresh: 3600,
            retry: 600,
            expire: 604800,
            minimum: 86400,
        });
        assert_eq!(
            rdata.to_zone(),
            "ns1.example.com. hostmaster.example.com. 2024010100 3600 600 604800 86400"
        );
    }

    #[test]
    fn unknown_type_falls_back_to_opaque_bytes() {
        let rdata = RData::Unknown { rtype: 9999, bytes: vec![1, 2, 3] };
        let mut buf = NameBuffer::new();
        rdata.pack(&mut buf).unwrap();
        let mut read = NameBuffer::from_bytes(buf.buffer.as_slice());
        let parsed = RData::parse(&mut read, 9999, 3).unwrap();
        assert_eq!(parsed, rdata);
    }

    #[test]
    fn unknown_type_parses_generic_hash_form_from_zone() {
        let tokens: Vec<String> = vec!["\\#".to_string(), "3".to_string(), "010203".to_string()];
        let rdata = RData::from_zone(9999, &tokens).unwrap();
        assert_eq!(rdata, RData::Unknown { rtype: 9999, bytes: vec![1, 2, 3] });
        assert_eq!(rdata.to_zone(), "TYPE9999 \\# 3 010203");
    }

    #[test]
    fn ds_zone_text_hex_encodes_digest() {
        let rdata = RData::Ds(DsFields { key_tag: 12345, algorithm: 8, digest_type: 2, digest: vec![0xde, 0xad, 0xbe, 0xef] });
        assert_eq!(rdata.to_zone(), "12345 8 2 DEADBEEF");
    }

    #[test]
    fn sshfp_zone_text_hex_encodes_fingerprint_uppercase() {
        let rdata = RData::Sshfp(SshfpFields { algorithm: 1, fp_type: 2, fingerprint: vec![0xde, 0xad, 0xbe, 0xef] });
        assert_eq!(rdata.to_zone(), "1 2 DEADBEEF");
    }

    #[test]
    fn tlsa_zone_text_hex_encodes_certificate_uppercase() {
        let rdata = RData::Tlsa(TlsaFields { usage: 3, selector: 1, matching_type: 1, certificate: vec![0xde, 0xad, 0xbe, 0xef] });
        assert_eq!(rdata.to_zone(), "3 1 1 DEADBEEF");
    }
}
