//! Where frames come from and where they go. The stack only ever sees these two traits, so it
//! can be driven by a TAP device or by anything else that moves whole Ethernet frames.
use std::io;

#[cfg(target_os = "linux")]
mod tap;

/// Delivers one whole frame per call.
pub trait FrameSource {
    /// Reads the next frame into `buf` and returns its length. `Ok(0)` means the source is
    /// closed.
    fn recv(&mut self, buf: &mut [u8]) -> io::Result<usize>;
}

/// Accepts one whole frame per call.
pub trait FrameSink {
    /// Writes `frame` and returns how many bytes were accepted.
    fn send(&mut self, frame: &[u8]) -> io::Result<usize>;
}

impl<T: FrameSource + ?Sized> FrameSource for &mut T {
    fn recv(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        (**self).recv(buf)
    }
}

impl<T: FrameSink + ?Sized> FrameSink for &mut T {
    fn send(&mut self, frame: &[u8]) -> io::Result<usize> {
        (**self).send(frame)
    }
}
