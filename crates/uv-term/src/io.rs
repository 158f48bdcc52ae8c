//! `Sink`/`Source`: the external-interface traits the renderer and the
//! input decoder are built against (`spec.md` §6).

use std::io;

/// Anything the renderer can write a frame's worth of bytes to in one call.
pub trait Sink {
    fn write_all(&mut self, bytes: &[u8]) -> io::Result<()>;
}

impl<W: io::Write> Sink for W {
    fn write_all(&mut self, bytes: &[u8]) -> io::Result<()> {
        io::Write::write_all(self, bytes)
    }
}

/// Anything the input decoder can pull unbuffered terminal bytes from.
pub trait Source {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize>;
}

impl<R: io::Read> Source for R {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        io::Read::read(self, buf)
    }
}
