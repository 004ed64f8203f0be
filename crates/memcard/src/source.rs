use std::convert::Infallible;
use std::io::{self, Read, Seek, SeekFrom};

/// Random-access view over a memory-card image.
pub trait CardSource {
    type Error;

    /// Total image length in bytes.
    fn len(&self) -> u64;

    /// Fills `buf` with the bytes starting at `offset`.
    fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> Result<(), Self::Error>;
}

/// An image that is already in memory. Reading cannot fail.
#[derive(Clone, Copy, Debug)]
pub struct SliceSource<'data> {
    data: &'data [u8],
}

impl<'data> SliceSource<'data> {
    pub fn new(data: &'data [u8]) -> Self {
        Self { data }
    }
}

impl CardSource for SliceSource<'_> {
    type Error = Infallible;

    fn len(&self) -> u64 {
        self.data.len() as u64
    }

    /// Bytes past the end of the image read as zero.
    fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> Result<(), Self::Error> {
        buf.fill(0);
        let Ok(start) = usize::try_from(offset) else {
            return Ok(());
        };
        if let Some(available) = self.data.get(start..) {
            let count = available.len().min(buf.len());
            buf[..count].copy_from_slice(&available[..count]);
        }
        Ok(())
    }
}

/// A seekable reader such as an open card file. The length is taken once
/// when the source is created.
#[derive(Debug)]
pub struct ReaderSource<R> {
    inner: R,
    len: u64,
}

impl<R: Read + Seek> ReaderSource<R> {
    pub fn new(mut inner: R) -> io::Result<Self> {
        let len = inner.seek(SeekFrom::End(0))?;
        Ok(Self { inner, len })
    }
}

impl<R: Read + Seek> CardSource for ReaderSource<R> {
    type Error = io::Error;

    fn len(&self) -> u64 {
        self.len
    }

    fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> io::Result<()> {
        self.inner.seek(SeekFrom::Start(offset))?;
        self.inner.read_exact(buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn slice_reads_past_end_as_zero() {
        let data = [1u8, 2, 3, 4];
        let mut source = SliceSource::new(&data);
        let mut buf = [0xAAu8; 4];
        source.read_at(2, &mut buf).unwrap();
        assert_eq!(buf, [3, 4, 0, 0]);

        source.read_at(100, &mut buf).unwrap();
        assert_eq!(buf, [0; 4]);
    }

    #[test]
    fn reader_reports_length_and_reads_at_offset() {
        let mut source = ReaderSource::new(Cursor::new(vec![0u8, 1, 2, 3, 4, 5])).unwrap();
        assert_eq!(source.len(), 6);

        let mut buf = [0u8; 2];
        source.read_at(3, &mut buf).unwrap();
        assert_eq!(buf, [3, 4]);
    }

    #[test]
    fn reader_short_read_is_an_error() {
        let mut source = ReaderSource::new(Cursor::new(vec![0u8; 4])).unwrap();
        let mut buf = [0u8; 8];
        let err = source.read_at(0, &mut buf).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }
}
