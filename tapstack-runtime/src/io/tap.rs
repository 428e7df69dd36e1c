use crate::io::{FrameSink, FrameSource};
use ::tap::BoundTap;
use std::io;

impl FrameSource for BoundTap {
    fn recv(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        BoundTap::recv(self, buf)
    }
}

impl FrameSink for BoundTap {
    fn send(&mut self, frame: &[u8]) -> io::Result<usize> {
        BoundTap::send(self, frame)
    }
}
