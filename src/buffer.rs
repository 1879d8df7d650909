// Growable byte buffer with a read/write cursor, modeled on the reference
// implementation's `Buffer`: `get`/`pack`/`unpack` advance the cursor,
// `update` backpatches bytes already written without moving it.

use crate::error::DnsError;

#[derive(Clone, Debug, Default)]
pub struct Buffer {
    data: Vec<u8>,
    offset: usize,
}

impl Buffer {
    pub fn new() -> Buffer {
        Buffer {
            data: Vec::new(),
            offset: 0,
        }
    }

    pub fn from_bytes(data: &[u8]) -> Buffer {
        Buffer {
            data: data.to_vec(),
            offset: 0,
        }
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.offset
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    pub fn hex(&self) -> String {
        self.data.iter().map(|b| format!("{:02x}", b)).collect()
    }

    pub fn seek(&mut self, offset: usize) -> Result<(), DnsError> {
        if offset > self.data.len() {
            return Err(DnsError::buffer(
                "seek past end of buffer",
                self.offset,
                self.remaining(),
                offset,
            ));
        }
        self.offset = offset;
        Ok(())
    }

    /// Read `n` bytes from the cursor and advance it.
    pub fn get(&mut self, n: usize) -> Result<Vec<u8>, DnsError> {
        if n > self.remaining() {
            return Err(DnsError::buffer(
                "short read",
                self.offset,
                self.remaining(),
                n,
            ));
        }
        let bytes = self.data[self.offset..self.offset + n].to_vec();
        self.offset += n;
        Ok(bytes)
    }

    /// Read 1 byte and advance the cursor.
    pub fn get_u8(&mut self) -> Result<u8, DnsError> {
        Ok(self.get(1)?[0])
    }

    /// Read a big-endian u16 and advance the cursor.
    pub fn get_u16(&mut self) -> Result<u16, DnsError> {
        let b = self.get(2)?;
        Ok(((b[0] as u16) << 8) | (b[1] as u16))
    }

    /// Read a big-endian u32 and advance the cursor.
    pub fn get_u32(&mut self) -> Result<u32, DnsError> {
        let b = self.get(4)?;
        Ok(((b[0] as u32) << 24) | ((b[1] as u32) << 16) | ((b[2] as u32) << 8) | (b[3] as u32))
    }

    /// Append a byte, advancing the cursor to the new end.
    pub fn append(&mut self, bytes: &[u8]) {
        self.data.extend_from_slice(bytes);
        self.offset = self.data.len();
    }

    pub fn pack_u8(&mut self, value: u8) {
        self.append(&[value]);
    }

    pub fn pack_u16(&mut self, value: u16) {
        self.append(&value.to_be_bytes());
    }

    pub fn pack_u32(&mut self, value: u32) {
        self.append(&value.to_be_bytes());
    }

    /// Overwrite `fmt.len()` bytes starting at `ptr` without moving the
    /// cursor. Used to backpatch RDLENGTH after packing a variable-length
    /// RDATA.
    pub fn update(&mut self, ptr: usize, bytes: &[u8]) -> Result<(), DnsError> {
        if ptr + bytes.len() > self.data.len() {
            return Err(DnsError::buffer(
                "update past end of buffer",
                self.offset,
                self.remaining(),
                ptr + bytes.len(),
            ));
        }
        self.data[ptr..ptr + bytes.len()].copy_from_slice(bytes);
        Ok(())
    }

    pub fn update_u16(&mut self, ptr: usize, value: u16) -> Result<(), DnsError> {
        self.update(ptr, &value.to_be_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pack_and_get_round_trips() {
        let mut buf = Buffer::new();
        buf.pack_u8(1);
        buf.pack_u16(2);
        buf.pack_u32(3);
        assert_eq!(buf.hex(), "0100020000000003");

        let mut read = Buffer::from_bytes(buf.as_slice());
        assert_eq!(read.get_u8().unwrap(), 1);
        assert_eq!(read.get_u16().unwrap(), 2);
        assert_eq!(read.get_u32().unwrap(), 3);
        assert_eq!(read.remaining(), 0);
    }

    #[test]
    fn short_read_is_a_buffer_error() {
        let mut buf = Buffer::from_bytes(&[0x01]);
        assert!(buf.get_u16().is_err());
    }

    #[test]
    fn update_does_not_move_cursor() {
        let mut buf = Buffer::new();
        buf.pack_u16(0);
        buf.append(b"hello");
        let offset_before = buf.offset();
        buf.update_u16(0, 5).unwrap();
        assert_eq!(buf.offset(), offset_before);
        assert_eq!(buf.as_slice(), &[0x00, 0x05, b'h', b'e', b'l', b'l', b'o']);
    }

    #[test]
    fn update_past_end_is_an_error() {
        let mut buf = Buffer::from_bytes(&[0x00, 0x00]);
        assert!(buf.update(1, &[0x01, 0x02]).is_err());
    }
}
