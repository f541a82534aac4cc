use std::io::Cursor;

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};

/// A fixed-size block of bytes holding typed values at arbitrary offsets.
/// Integers are stored big-endian; strings are length-prefixed byte runs.
pub struct Page {
    buffer: Vec<u8>,
}

impl Page {
    pub fn new(block_size: usize) -> Self {
        Page {
            buffer: vec![0; block_size],
        }
    }

    pub fn get_int(&self, offset: usize) -> i32 {
        let mut cursor = Cursor::new(&self.buffer[offset..offset + 4]);
        cursor.read_i32::<BigEndian>().unwrap()
    }

    pub fn set_int(&mut self, offset: usize, n: i32) {
        let mut cursor = Cursor::new(&mut self.buffer[offset..offset + 4]);
        cursor.write_i32::<BigEndian>(n).unwrap();
    }

    pub fn get_bytes(&self, offset: usize) -> Vec<u8> {
        let length = self.get_int(offset) as usize;
        let start = offset + 4;
        self.buffer[start..start + length].to_vec()
    }

    pub fn set_bytes(&mut self, offset: usize, bytes: &[u8]) {
        self.set_int(offset, bytes.len() as i32);
        let start = offset + 4;
        self.buffer[start..start + bytes.len()].copy_from_slice(bytes);
    }

    pub fn get_string(&self, offset: usize) -> String {
        let bytes = self.get_bytes(offset);
        String::from_utf8_lossy(&bytes).to_string()
    }

    pub fn set_string(&mut self, offset: usize, s: &str) {
        self.set_bytes(offset, s.as_bytes());
    }

    pub fn contents(&self) -> &[u8] {
        &self.buffer
    }

    pub fn contents_mut(&mut self) -> &mut [u8] {
        &mut self.buffer
    }

    /// Bytes needed to store a string of `str_len` bytes, including the prefix.
    pub fn max_length(str_len: usize) -> usize {
        4 + str_len
    }
}
