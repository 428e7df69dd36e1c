use crate::device::NetworkDevice;
use crate::errors::Error;
use crate::io::FrameSink;
use crate::log::{Direction, Header, HeaderLog};
use std::io;
use tapstack_packets::{EthernetFrame, MacAddr};
use tracing::debug;

/// Last stop for every outgoing frame.
pub struct FrameTransmitter<S> {
    sink: S,
}

impl<S: FrameSink> FrameTransmitter<S> {
    pub fn new(sink: S) -> Self {
        FrameTransmitter { sink }
    }

    /// Stamps the Ethernet header (our MAC as source) and writes the header plus `length` payload
    /// bytes to the sink in a single call. Failed or short writes are returned, never retried.
    pub fn send<L: HeaderLog>(
        &mut self,
        device: &NetworkDevice,
        frame: &mut EthernetFrame,
        ether_type: u16,
        length: usize,
        dest: MacAddr,
        log: &mut L,
    ) -> Result<usize, Error> {
        frame.finalize(ether_type, dest, device.mac());
        log.log(Header::Ethernet(&*frame), Direction::Outgoing);

        let bytes = frame.wire_bytes(length)?;
        let written = self.sink.send(bytes)?;
        if written != bytes.len() {
            return Err(Error::Io(io::Error::new(
                io::ErrorKind::WriteZero,
                format!("wrote {} of {} frame bytes", written, bytes.len()),
            )));
        }
        debug!("sent {} byte frame to {}", written, dest);
        Ok(written)
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn into_inner(self) -> S {
        self.sink
    }
}
