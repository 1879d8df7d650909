// Domain name value type and its compression-aware wire codec. Grounded on
// the teacher's `names.rs`/`protocol/names.rs` (decode-side bounds checking)
// and the reference `DNSLabel`/`DNSBuffer` (escape handling, the encode-side
// compression cache `protocol/names.rs` never had).

use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::buffer::Buffer;
use crate::error::DnsError;

const MAX_NAME_LEN: usize = 253;
const MAX_LABEL_LEN: usize = 63;
const MAX_POINTER_OFFSET: usize = 1 << 14;

/// An ordered sequence of label components, each 1-63 raw bytes. Equality
/// and hashing are case-insensitive on ASCII, matching the reference
/// implementation.
#[derive(Clone, Debug)]
pub struct DnsLabel(Vec<Vec<u8>>);

impl DnsLabel {
    pub fn root() -> DnsLabel {
        DnsLabel(Vec::new())
    }

    pub fn from_components(components: Vec<Vec<u8>>) -> DnsLabel {
        DnsLabel(components)
    }

    pub fn components(&self) -> &[Vec<u8>] {
        &self.0
    }

    /// Prepend `name`'s components ahead of this label's, e.g.
    /// `origin.add("www")` turns `example.com.` into `www.example.com.`.
    pub fn add(&self, name: &str) -> DnsLabel {
        let mut new = DnsLabel::parse_text(name).0;
        new.extend(self.0.iter().cloned());
        DnsLabel(new)
    }

    /// Wire length: one length byte plus the component bytes per label,
    /// plus the terminating zero byte.
    pub fn wire_len(&self) -> usize {
        self.0.iter().map(|c| c.len() + 1).sum::<usize>() + 1
    }

    /// Length of the dotted textual form (sum of component lengths plus one
    /// separator between each), the quantity the 253-byte name-length limit
    /// is measured against.
    pub fn text_len(&self) -> usize {
        if self.0.is_empty() {
            return 0;
        }
        self.0.iter().map(|c| c.len()).sum::<usize>() + self.0.len() - 1
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    fn lowercase_key(&self) -> Vec<Vec<u8>> {
        self.0
            .iter()
            .map(|c| c.to_ascii_lowercase())
            .collect()
    }

    /// Parse a zone-file style text form: trailing `.` is optional, `\DDD`
    /// is a decimal byte escape, `\` escapes the following literal
    /// character (so an embedded `.` can appear inside a component).
    pub fn parse_text(text: &str) -> DnsLabel {
        if text.is_empty() || text == "." {
            return DnsLabel::root();
        }
        let bytes = text.as_bytes();
        let mut components: Vec<Vec<u8>> = Vec::new();
        let mut current: Vec<u8> = Vec::new();
        let mut i = 0;
        while i < bytes.len() {
            match bytes[i] {
                b'.' => {
                    components.push(std::mem::take(&mut current));
                    i += 1;
                }
                b'\\' if i + 3 < bytes.len() && bytes[i + 1..i + 4].iter().all(|b| b.is_ascii_digit()) => {
                    let digits = std::str::from_utf8(&bytes[i + 1..i + 4]).unwrap();
                    let value: u16 = digits.parse().unwrap_or(0);
                    current.push(value as u8);
                    i += 4;
                }
                b'\\' if i + 1 < bytes.len() => {
                    current.push(bytes[i + 1]);
                    i += 2;
                }
                other => {
                    current.push(other);
                    i += 1;
                }
            }
        }
        if !current.is_empty() || (!bytes.is_empty() && bytes[bytes.len() - 1] != b'.') {
            components.push(current);
        }
        DnsLabel(components)
    }

    fn decode_component(component: &[u8]) -> String {
        let mut out = String::new();
        for &b in component {
            if b == b'.' || b == b'\\' {
                out.push('\\');
                out.push(b as char);
            } else if (0x21..=0x7e).contains(&b) {
                out.push(b as char);
            } else {
                out.push_str(&format!("\\{:03}", b));
            }
        }
        out
    }

    /// IDNA rendering: components that are already printable ASCII render
    /// as-is; this crate does not carry a Unicode IDNA transcoder (none of
    /// the example repos in the retrieval pack depend on one), so `idna()`
    /// is a best-effort passthrough documented as a known limitation.
    pub fn idna(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for DnsLabel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, ".");
        }
        for component in &self.0 {
            write!(f, "{}.", DnsLabel::decode_component(component))?;
        }
        Ok(())
    }
}

impl From<&str> for DnsLabel {
    fn from(text: &str) -> DnsLabel {
        DnsLabel::parse_text(text)
    }
}

impl PartialEq for DnsLabel {
    fn eq(&self, other: &Self) -> bool {
        self.lowercase_key() == other.lowercase_key()
    }
}
impl Eq for DnsLabel {}

impl Hash for DnsLabel {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.lowercase_key().hash(state);
    }
}

impl PartialOrd for DnsLabel {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for DnsLabel {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.lowercase_key().cmp(&other.lowercase_key())
    }
}

/// Wraps a `Buffer` with the name-compression cache used while packing (or,
/// on the decode side, only the ephemeral recursion-detection bookkeeping).
/// One `NameBuffer` is scoped to a single `Message::pack`/`parse` call; it
/// is never shared across calls.
pub struct NameBuffer {
    pub buffer: Buffer,
    names: HashMap<Vec<Vec<u8>>, usize>,
}

impl NameBuffer {
    pub fn new() -> NameBuffer {
        NameBuffer {
            buffer: Buffer::new(),
            names: HashMap::new(),
        }
    }

    pub fn from_bytes(data: &[u8]) -> NameBuffer {
        NameBuffer {
            buffer: Buffer::from_bytes(data),
            names: HashMap::new(),
        }
    }

    pub fn decode_name(&mut self) -> Result<DnsLabel, DnsError> {
        self.decode_name_from(None)
    }

    fn decode_name_from(&mut self, last: Option<usize>) -> Result<DnsLabel, DnsError> {
        let mut components: Vec<Vec<u8>> = Vec::new();
        loop {
            let offset = self.buffer.offset();
            let len_byte = self.buffer.get_u8()?;
            match (len_byte >> 6) & 0b11 {
                0b11 => {
                    let second = self.buffer.get_u8()?;
                    let pointer =
                        (((len_byte & 0b0011_1111) as usize) << 8) | second as usize;
                    let save = self.buffer.offset();
                    if last == Some(save) {
                        return Err(DnsError::label(
                            "compression pointer references itself",
                            offset,
                        ));
                    }
                    if pointer >= save {
                        return Err(DnsError::label(
                            "compression pointer does not point strictly backward",
                            offset,
                        ));
                    }
                    self.buffer.seek(pointer)?;
                    let mut rest = self.decode_name_from(Some(save))?.0;
                    self.buffer.seek(save)?;
                    components.append(&mut rest);
                    break;
                }
                0b00 => {
                    if len_byte == 0 {
                        break;
                    }
                    let len = len_byte as usize;
                    let bytes = self.buffer.get(len)?;
                    if std::str::from_utf8(&bytes).is_err() {
                        return Err(DnsError::label("label component was not valid UTF-8", offset));
                    }
                    components.push(bytes);
                }
                _ => {
                    return Err(DnsError::label(
                        "unsupported or invalid label length/pointer type",
                        offset,
                    ));
                }
            }
        }
        Ok(DnsLabel(components))
    }

    pub fn encode_name(&mut self, label: &DnsLabel) -> Result<(), DnsError> {
        self.encode_name_impl(label, true)
    }

    /// Used where the containing RDATA's byte layout must not reference the
    /// compression cache (RRSIG signer name, SRV/HTTPS/SVCB target, NSEC
    /// owner name).
    pub fn encode_name_nocompress(&mut self, label: &DnsLabel) -> Result<(), DnsError> {
        self.encode_name_impl(label, false)
    }

    fn encode_name_impl(&mut self, label: &DnsLabel, compress: bool) -> Result<(), DnsError> {
        if label.text_len() > MAX_NAME_LEN {
            return Err(DnsError::label(
                format!("name longer than {} bytes", MAX_NAME_LEN),
                self.buffer.offset(),
            ));
        }
        let mut remaining = label.0.clone();
        loop {
            if remaining.is_empty() {
                self.buffer.pack_u8(0);
                return Ok(());
            }
            let key: Vec<Vec<u8>> = remaining
                .iter()
                .map(|c| c.to_ascii_lowercase())
                .collect();
            if compress {
                if let Some(&ptr) = self.names.get(&key) {
                    let pointer = 0xC000u16 | (ptr as u16 & 0x3fff);
                    self.buffer.pack_u16(pointer);
                    return Ok(());
                }
                if self.buffer.offset() < MAX_POINTER_OFFSET {
                    self.names.insert(key, self.buffer.offset());
                }
            }
            let component = remaining.remove(0);
            if component.len() > MAX_LABEL_LEN {
                return Err(DnsError::label(
                    format!("label component longer than {} bytes", MAX_LABEL_LEN),
                    self.buffer.offset(),
                ));
            }
            self.buffer.pack_u8(component.len() as u8);
            self.buffer.append(&component);
        }
    }
}

impl Default for NameBuffer {
    fn default() -> Self {
        NameBuffer::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_follows_rfc1035_example() {
        // From RFC1035 4.1.4: the classic f.isi.arpa / foo.f.isi.arpa example.
        let mut packet = vec![0x00u8; 93];
        packet[20] = 1;
        packet[21] = b'f';
        packet[22] = 3;
        packet[23..26].copy_from_slice(b"isi");
        packet[26] = 4;
        packet[27..31].copy_from_slice(b"arpa");
        packet[31] = 0;

        packet[40] = 3;
        packet[41..44].copy_from_slice(b"foo");
        packet[44] = 0b1100_0000;
        packet[45] = 20;

        packet[64] = 0b1100_0000;
        packet[65] = 26;

        packet[92] = 0;

        let mut buf = NameBuffer::from_bytes(&packet);
        buf.buffer.seek(20).unwrap();
        let label = buf.decode_name().unwrap();
        assert_eq!(label.to_string(), "f.isi.arpa.");
        assert_eq!(buf.buffer.offset(), 32);

        buf.buffer.seek(40).unwrap();
        let label = buf.decode_name().unwrap();
        assert_eq!(label.to_string(), "foo.f.isi.arpa.");
        assert_eq!(buf.buffer.offset(), 46);

        buf.buffer.seek(64).unwrap();
        let label = buf.decode_name().unwrap();
        assert_eq!(label.to_string(), "arpa.");
        assert_eq!(buf.buffer.offset(), 66);

        buf.buffer.seek(92).unwrap();
        let label = buf.decode_name().unwrap();
        assert!(label.is_root());
        assert_eq!(buf.buffer.offset(), 93);
    }

    #[test]
    fn forward_pointer_is_rejected() {
        let packet = [0b1100_0000u8, 0x05, 0x00, 0x00, 0x00, 0x00];
        let mut buf = NameBuffer::from_bytes(&packet);
        assert!(buf.decode_name().is_err());
    }

    #[test]
    fn self_referential_pointer_is_rejected() {
        // Byte 0 is a pointer to offset 0, i.e. itself.
        let packet = [0b1100_0000u8, 0x00];
        let mut buf = NameBuffer::from_bytes(&packet);
        assert!(buf.decode_name().is_err());
    }

    #[test]
    fn encode_compresses_repeated_suffix() {
        let mut buf = NameBuffer::new();
        buf.encode_name(&DnsLabel::parse_text("www.example.com")).unwrap();
        let second_start = buf.buffer.offset();
        buf.encode_name(&DnsLabel::parse_text("mail.example.com")).unwrap();
        let bytes = buf.buffer.as_slice();
        // The second name should end in a 2-byte pointer back into "example.com".
        assert_eq!(bytes[bytes.len() - 2] & 0b1100_0000, 0b1100_0000);
        assert!(bytes.len() - second_start < DnsLabel::parse_text("mail.example.com").wire_len());
    }

    #[test]
    fn compressed_and_uncompressed_decode_identically() {
        let mut buf = NameBuffer::new();
        buf.encode_name(&DnsLabel::parse_text("www.example.com")).unwrap();
        buf.encode_name(&DnsLabel::parse_text("mail.example.com")).unwrap();
        buf.buffer.seek(0).unwrap();
        let first = buf.decode_name().unwrap();
        let second = buf.decode_name().unwrap();
        assert_eq!(first.to_string(), "www.example.com.");
        assert_eq!(second.to_string(), "mail.example.com.");
    }

    #[test]
    fn embedded_dot_in_component_round_trips() {
        let label = DnsLabel::from_components(vec![b"a.aa".to_vec(), b"b.bb".to_vec(), b"c.cc".to_vec()]);
        let text = label.to_string();
        let reparsed = DnsLabel::parse_text(&text);
        assert_eq!(label, reparsed);
    }

    #[test]
    fn case_insensitive_equality() {
        assert_eq!(DnsLabel::parse_text("WWW.Example.COM"), DnsLabel::parse_text("www.example.com"));
    }

    #[test]
    fn oversized_component_is_rejected_on_encode() {
        let mut buf = NameBuffer::new();
        let huge = vec![b'a'; 64];
        let label = DnsLabel::from_components(vec![huge]);
        assert!(buf.encode_name(&label).is_err());
    }
}
