use crate::device::NetworkDevice;
use crate::errors::{Error, Reports};
use crate::io::FrameSink;
use crate::log::HeaderLog;
use crate::transmit::FrameTransmitter;
use tapstack_packets::{EthernetFrame, MacAddr};

/// Everything a protocol handler borrows from the stack while it handles one frame.
pub struct Context<'a, S, L> {
    pub device: &'a NetworkDevice,
    pub transmitter: &'a mut FrameTransmitter<S>,
    pub log: &'a mut L,
    pub reports: &'a mut Reports,
}

impl<'a, S: FrameSink, L: HeaderLog> Context<'a, S, L> {
    pub fn transmit(
        &mut self,
        frame: &mut EthernetFrame,
        ether_type: u16,
        length: usize,
        dest: MacAddr,
    ) -> Result<usize, Error> {
        self.transmitter
            .send(self.device, frame, ether_type, length, dest, self.log)
    }
}
