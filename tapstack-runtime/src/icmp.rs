use crate::errors::{Error, Reports};
use std::convert::TryFrom;
use tapstack_packets::{IcmpMessage, IcmpType, Ipv4Packet};
use tracing::debug;

/// Turns echo requests into echo replies. Everything else passes through untouched.
#[derive(Clone, Copy, Debug, Default)]
pub struct IcmpHandler;

impl IcmpHandler {
    pub fn new() -> Self {
        IcmpHandler
    }

    /// Rewrites the ICMP message inside `packet` in place and hands the packet back. The message
    /// length comes from the IP total length minus the header length. A message type other than
    /// echo request is reported and left as it was.
    pub fn handle(&self, packet: Ipv4Packet, reports: &mut Reports) -> Result<Ipv4Packet, Error> {
        let mut msg = IcmpMessage::try_from(packet)?;
        match msg.msg_type() {
            IcmpType::EchoRequest => {
                debug!(
                    "echo request id {} seq {}, {} bytes",
                    msg.identifier(),
                    msg.sequence(),
                    msg.len()
                );
                to_reply(&mut msg);
            }
            other => reports.report(Error::UnhandledIcmpType(u8::from(other))),
        }
        Ok(msg.packet())
    }
}

/// Echo reply with a checksum over the whole message, data included.
pub fn to_reply(msg: &mut IcmpMessage) -> u16 {
    msg.set_msg_type(IcmpType::EchoReply);
    msg.fill_checksum()
}
