use crate::config::TargetPolicy;
use crate::context::Context;
use crate::errors::Error;
use crate::icmp::IcmpHandler;
use crate::io::FrameSink;
use crate::log::{Direction, Header, HeaderLog};
use std::convert::TryFrom;
use tapstack_packets::{
    EthernetFrame, IpProtocol, Ipv4Packet, IPV4_ETHER_TYPE, IPV4_MIN_HEADER_LEN,
};
use tracing::debug;

/// Validates incoming IPv4 headers, hands ICMP to the `IcmpHandler` and sends the result back to
/// whoever delivered the frame.
pub struct IpProcessor {
    policy: TargetPolicy,
    icmp: IcmpHandler,
}

impl IpProcessor {
    pub fn new(policy: TargetPolicy) -> Self {
        IpProcessor {
            policy,
            icmp: IcmpHandler::new(),
        }
    }

    /// Checks run in a fixed order and the first failure drops the packet: version, header
    /// length, ttl, then the header checksum. No ICMP errors are generated.
    ///
    /// Returns the number of bytes written for the reply.
    pub fn incoming<S: FrameSink, L: HeaderLog>(
        &mut self,
        cx: &mut Context<'_, S, L>,
        frame: EthernetFrame,
    ) -> Result<usize, Error> {
        let packet = Ipv4Packet::try_from(frame)?;
        cx.log.log(Header::Ip(&packet), Direction::Incoming);

        if packet.version() != 4 {
            return Err(Error::WrongVersion(packet.version()));
        }
        if packet.header_len() < IPV4_MIN_HEADER_LEN {
            return Err(Error::HeaderTooShort(packet.ihl()));
        }
        if packet.ttl() == 0 {
            return Err(Error::TtlExpired(packet.src_addr()));
        }
        let residue = packet.header_checksum()?;
        if residue != 0 {
            return Err(Error::ChecksumMismatch(residue));
        }

        let dest = packet.dest_addr();
        if dest != cx.device.ip() {
            let not_for_us = Error::NotForUs {
                layer: "IP packet",
                target: dest,
            };
            match self.policy {
                TargetPolicy::Strict => return Err(not_for_us),
                TargetPolicy::Permissive => cx.reports.report(not_for_us),
            }
        }

        match packet.protocol() {
            IpProtocol::ICMP => {
                let packet = self.icmp.handle(packet, cx.reports)?;
                self.reply(cx, packet)
            }
            other => Err(Error::UnsupportedIpProtocol(u8::from(other))),
        }
    }

    /// Sends `packet` back where it came from: our address as source, the old source as
    /// destination, a fresh header checksum, and the frame's Ethernet source as next hop.
    pub fn reply<S: FrameSink, L: HeaderLog>(
        &self,
        cx: &mut Context<'_, S, L>,
        mut packet: Ipv4Packet,
    ) -> Result<usize, Error> {
        let requester = packet.src_addr();
        packet.set_dest_addr(requester);
        packet.set_src_addr(cx.device.ip());
        packet.fill_checksum()?;
        let length = usize::from(packet.total_len());
        cx.log.log(Header::Ip(&packet), Direction::Outgoing);

        let mut frame = EthernetFrame::try_from(packet)?;
        let next_hop = frame.src_mac();
        debug!("replying to {} via {}", requester, next_hop);
        cx.transmit(&mut frame, IPV4_ETHER_TYPE, length, next_hop)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::NetworkDevice;
    use crate::errors::{ErrorKind, Reports};
    use crate::log::NullHeaderLog;
    use crate::transmit::FrameTransmitter;
    use crate::utils::test::frame_collectors::CollectingSink;
    use crate::utils::test::frame_generators::{echo_request, refill_ip_checksum};
    use crossbeam::crossbeam_channel::Receiver;
    use std::net::Ipv4Addr;
    use tapstack_packets::{IcmpMessage, IcmpType, MacAddr};

    const DEVICE_IP: Ipv4Addr = Ipv4Addr::new(10, 0, 0, 4);
    const PEER_IP: Ipv4Addr = Ipv4Addr::new(10, 0, 0, 5);
    const PEER_MAC: MacAddr = MacAddr {
        bytes: [0xaa, 0xbb, 0xcc, 0xdd, 0xee, 0xff],
    };

    fn run(
        policy: TargetPolicy,
        frame: Vec<u8>,
    ) -> (Result<usize, Error>, Reports, Receiver<Vec<u8>>) {
        let device = NetworkDevice::new(DEVICE_IP, MacAddr::new([0, 0x0c, 0x29, 0x6d, 0x50, 0x25]));
        let (sink, frames) = CollectingSink::new();
        let mut transmitter = FrameTransmitter::new(sink);
        let mut reports = Reports::new();
        let result = {
            let mut cx = Context {
                device: &device,
                transmitter: &mut transmitter,
                log: &mut NullHeaderLog,
                reports: &mut reports,
            };
            IpProcessor::new(policy).incoming(&mut cx, EthernetFrame::from_buffer(frame).unwrap())
        };
        (result, reports, frames)
    }

    fn ping(dest: Ipv4Addr, data: &[u8]) -> Vec<u8> {
        echo_request(PEER_MAC, PEER_IP, dest, 7, 3, data)
    }

    #[test]
    fn echo_is_answered() {
        let (result, reports, frames) = run(TargetPolicy::Permissive, ping(DEVICE_IP, b"ping!"));
        assert_eq!(result.unwrap(), 14 + 20 + 8 + 5);
        assert!(reports.is_empty());

        let reply = EthernetFrame::from_buffer(frames.try_recv().unwrap()).unwrap();
        assert_eq!(reply.dest_mac(), PEER_MAC);
        assert_eq!(reply.ether_type(), IPV4_ETHER_TYPE);
        let packet = Ipv4Packet::try_from(reply).unwrap();
        assert_eq!(packet.src_addr(), DEVICE_IP);
        assert_eq!(packet.dest_addr(), PEER_IP);
        assert!(packet.validate_checksum().unwrap());

        let msg = IcmpMessage::try_from(packet).unwrap();
        assert_eq!(msg.msg_type(), IcmpType::EchoReply);
        assert_eq!(msg.data(), b"ping!");
        assert!(msg.verify_checksum());
    }

    #[test]
    fn large_packets_keep_full_length() {
        let data = vec![0x5a; 400];
        let (result, _, frames) = run(TargetPolicy::Permissive, ping(DEVICE_IP, &data));
        assert_eq!(result.unwrap(), 14 + 20 + 8 + 400);
        let reply = frames.try_recv().unwrap();
        assert_eq!(reply.len(), 14 + 20 + 8 + 400);
    }

    #[test]
    fn validation_order() {
        // Every check fails at once; version is reported first
        let mut frame = ping(DEVICE_IP, b"");
        frame[14] = 0x63;
        frame[14 + 8] = 0;
        frame[14 + 10] ^= 0xff;
        let (result, _, frames) = run(TargetPolicy::Permissive, frame.clone());
        assert_eq!(result.unwrap_err().kind(), ErrorKind::WrongVersion);

        frame[14] = 0x43;
        let (result, _, _) = run(TargetPolicy::Permissive, frame.clone());
        assert_eq!(result.unwrap_err().kind(), ErrorKind::HeaderTooShort);

        frame[14] = 0x45;
        let (result, _, _) = run(TargetPolicy::Permissive, frame.clone());
        assert_eq!(result.unwrap_err().kind(), ErrorKind::TtlExpired);

        frame[14 + 8] = 64;
        let (result, _, _) = run(TargetPolicy::Permissive, frame);
        assert_eq!(result.unwrap_err().kind(), ErrorKind::ChecksumMismatch);

        assert!(frames.try_recv().is_err());
    }

    #[test]
    fn ttl_zero_is_dropped_even_with_valid_checksum() {
        let mut frame = ping(DEVICE_IP, b"x");
        frame[14 + 8] = 0;
        refill_ip_checksum(&mut frame);
        let (result, _, frames) = run(TargetPolicy::Permissive, frame);
        assert_eq!(result.unwrap_err().kind(), ErrorKind::TtlExpired);
        assert!(frames.try_recv().is_err());
    }

    #[test]
    fn non_icmp_is_unsupported() {
        let mut frame = ping(DEVICE_IP, b"");
        frame[14 + 9] = 17;
        refill_ip_checksum(&mut frame);
        let (result, _, frames) = run(TargetPolicy::Permissive, frame);
        assert_eq!(result.unwrap_err().kind(), ErrorKind::UnsupportedProtocol);
        assert!(frames.try_recv().is_err());
    }

    #[test]
    fn unhandled_icmp_still_gets_ip_reply() {
        let mut frame = ping(DEVICE_IP, b"");
        frame[14 + 20] = 13;
        let (result, reports, frames) = run(TargetPolicy::Permissive, frame);
        assert!(result.is_ok());
        assert!(reports.contains(ErrorKind::UnhandledIcmpType));

        let reply = Ipv4Packet::try_from(
            EthernetFrame::from_buffer(frames.try_recv().unwrap()).unwrap(),
        )
        .unwrap();
        assert_eq!(reply.dest_addr(), PEER_IP);
        assert_eq!(reply.payload().unwrap()[0], 13);
    }

    #[test]
    fn destination_policy() {
        let other = Ipv4Addr::new(10, 0, 0, 200);

        let (result, reports, frames) = run(TargetPolicy::Permissive, ping(other, b""));
        assert!(result.is_ok());
        assert_eq!(reports.kinds(), vec![ErrorKind::NotForUs]);
        assert!(frames.try_recv().is_ok());

        let (result, _, frames) = run(TargetPolicy::Strict, ping(other, b""));
        assert_eq!(result.unwrap_err().kind(), ErrorKind::NotForUs);
        assert!(frames.try_recv().is_err());
    }

    #[test]
    fn options_are_covered_by_checksums() {
        let mut frame = ping(DEVICE_IP, b"opt");
        // Grow the header by one word of NOPs
        for _ in 0..4 {
            frame.insert(14 + 20, 1);
        }
        frame[14] = 0x46;
        let total_len = u16::from_be_bytes([frame[16], frame[17]]) + 4;
        frame[16..18].copy_from_slice(&total_len.to_be_bytes());
        refill_ip_checksum(&mut frame);

        let (result, _, frames) = run(TargetPolicy::Permissive, frame);
        assert_eq!(result.unwrap(), 14 + 24 + 8 + 3);
        let packet = Ipv4Packet::try_from(
            EthernetFrame::from_buffer(frames.try_recv().unwrap()).unwrap(),
        )
        .unwrap();
        assert!(packet.validate_checksum().unwrap());
        assert_eq!(IcmpMessage::try_from(packet).unwrap().data(), b"opt");
    }

    #[test]
    fn header_longer_than_frame_is_truncated() {
        let mut frame = ping(DEVICE_IP, b"");
        frame[14] = 0x4f;
        let (result, _, _) = run(TargetPolicy::Permissive, frame);
        assert_eq!(result.unwrap_err().kind(), ErrorKind::Truncated);
    }
}
