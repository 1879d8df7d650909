// EDNS(0) OPT pseudo-record option list (RFC 6891 6.1.2). The OPT RR's own
// CLASS/TTL reinterpretation (payload size, extended RCODE, version, DO bit)
// lives on `ResourceRecord`/`DnsClass::EdnsPayloadSize`; this module only
// covers the RDATA, which is a sequence of `{code, length, data}` options.

use crate::buffer::Buffer;
use crate::error::DnsError;

#[derive(Clone, PartialEq, Debug)]
pub struct EdnsOption {
    pub code: u16,
    pub data: Vec<u8>,
}

pub fn parse_options(buffer: &mut Buffer, end: usize) -> Result<Vec<EdnsOption>, DnsError> {
    let mut options = Vec::new();
    while buffer.offset() < end {
        let code = buffer.get_u16()?;
        let len = buffer.get_u16()? as usize;
        let data = buffer.get(len)?;
        options.push(EdnsOption { code, data });
    }
    Ok(options)
}

pub fn pack_options(buffer: &mut Buffer, options: &[EdnsOption]) {
    for option in options {
        buffer.pack_u16(option.code);
        buffer.pack_u16(option.data.len() as u16);
        buffer.append(&option.data);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn options_round_trip() {
        let options = vec![
            EdnsOption { code: 8, data: vec![0x00, 0x01, 0x00, 0x00] },
            EdnsOption { code: 10, data: vec![] },
        ];
        let mut buf = Buffer::new();
        pack_options(&mut buf, &options);
        let mut read = Buffer::from_bytes(buf.as_slice());
        let end = read.len();
        let parsed = parse_options(&mut read, end).unwrap();
        assert_eq!(parsed, options);
    }
}
