use std::io::{self, Read, Write};

/// read one `<decimal-length>:<payload>` frame, returning the payload as a
/// UTF-8 string
///
/// mirrors the original's byte-at-a-time length scan rather than leaning
/// on a delimiter-aware reader, since the length prefix has no fixed width.
pub fn read_frame<R: Read>(reader: &mut R) -> io::Result<String> {
    let mut len_buf = Vec::with_capacity(10);
    let mut byte = [0u8; 1];
    loop {
        let n = reader.read(&mut byte)?;
        if n == 0 {
            return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "eof before frame length"));
        }
        if byte[0] == b':' {
            break;
        }
        len_buf.push(byte[0]);
        if len_buf.len() > 10 {
            return Err(io::Error::new(io::ErrorKind::InvalidData, "frame length prefix too long"));
        }
    }
    let len: usize = std::str::from_utf8(&len_buf)
        .ok()
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidData, "malformed frame length"))?;

    let mut payload = vec![0u8; len];
    reader.read_exact(&mut payload)?;
    String::from_utf8(payload).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

/// write `payload` as a `<len>:<payload>` frame and flush immediately —
/// the host reads this process's stdout as a blocking pipe
pub fn write_frame<W: Write>(writer: &mut W, payload: &str) -> io::Result<()> {
    write!(writer, "{}:{}", payload.len(), payload)?;
    writer.flush()
}
