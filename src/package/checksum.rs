use crate::core::MagnetResult;
use md5::{Digest, Md5};
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

/// Writer that hashes everything written through it
pub struct HashingWriter<W> {
    inner: W,
    hasher: Md5,
}

impl<W: Write> HashingWriter<W> {
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            hasher: Md5::new(),
        }
    }

    /// Flush the inner writer and return the hex digest of the bytes written
    pub fn finish(mut self) -> io::Result<String> {
        self.inner.flush()?;
        Ok(hex::encode(self.hasher.finalize()))
    }
}

impl<W: Write> Write for HashingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let written = self.inner.write(buf)?;
        self.hasher.update(&buf[..written]);
        Ok(written)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

/// Calculate the hex MD5 of a file
pub fn file_checksum(path: &Path) -> MagnetResult<String> {
    let mut file = File::open(path)?;
    let mut writer = HashingWriter::new(io::sink());
    io::copy(&mut file, &mut writer)?;
    Ok(writer.finish()?)
}

/// Compare a declared checksum against a computed one
pub fn checksums_match(expected: &str, actual: &str) -> bool {
    expected.trim().eq_ignore_ascii_case(actual)
}
