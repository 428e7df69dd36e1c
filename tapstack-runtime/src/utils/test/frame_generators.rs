use std::net::Ipv4Addr;
use tapstack_packets::{
    internet_checksum, ArpOp, ArpPacket, IcmpType, MacAddr, ARP_ETHER_TYPE, ETHERNET_HEADER_LEN,
    ICMP_HEADER_LEN, IPV4_ETHER_TYPE, IPV4_MIN_HEADER_LEN,
};

/// Broadcast ARP request, as a host on the link would send it asking who has `target_ip`.
pub fn arp_request(sender_ip: Ipv4Addr, sender_mac: MacAddr, target_ip: Ipv4Addr) -> Vec<u8> {
    let mut packet = ArpPacket::new();
    packet.set_hardware_type(1);
    packet.set_protocol_type(IPV4_ETHER_TYPE);
    packet.set_opcode(ArpOp::Request as u16);
    packet.set_sender_mac(sender_mac);
    packet.set_sender_ip(sender_ip);
    packet.set_target_mac(MacAddr::default());
    packet.set_target_ip(target_ip);

    let mut frame = packet.frame();
    frame.finalize(ARP_ETHER_TYPE, MacAddr::BROADCAST, sender_mac);
    frame.data
}

/// Ethernet frame holding an IPv4 (ttl 64, no options) ICMP echo request with valid checksums.
pub fn echo_request(
    src_mac: MacAddr,
    src_ip: Ipv4Addr,
    dest_ip: Ipv4Addr,
    identifier: u16,
    sequence: u16,
    data: &[u8],
) -> Vec<u8> {
    let total_len = (IPV4_MIN_HEADER_LEN + ICMP_HEADER_LEN + data.len()) as u16;

    let mut frame = Vec::with_capacity(ETHERNET_HEADER_LEN + total_len as usize);
    frame.extend_from_slice(&[0x00, 0x0c, 0x29, 0x6d, 0x50, 0x25]);
    frame.extend_from_slice(&src_mac.bytes);
    frame.extend_from_slice(&IPV4_ETHER_TYPE.to_be_bytes());

    frame.extend_from_slice(&[0x45, 0x00]);
    frame.extend_from_slice(&total_len.to_be_bytes());
    frame.extend_from_slice(&[0x1c, 0x46, 0x40, 0x00, 64, 1, 0, 0]);
    frame.extend_from_slice(&src_ip.octets());
    frame.extend_from_slice(&dest_ip.octets());

    let icmp_start = frame.len();
    frame.extend_from_slice(&[u8::from(IcmpType::EchoRequest), 0, 0, 0]);
    frame.extend_from_slice(&identifier.to_be_bytes());
    frame.extend_from_slice(&sequence.to_be_bytes());
    frame.extend_from_slice(data);
    let icmp_checksum = internet_checksum(&frame[icmp_start..]);
    frame[icmp_start + 2..icmp_start + 4].copy_from_slice(&icmp_checksum.to_be_bytes());

    refill_ip_checksum(&mut frame);
    frame
}

/// Recomputes the header checksum of the IPv4 packet in an Ethernet frame after a test has
/// edited its header.
pub fn refill_ip_checksum(frame: &mut [u8]) {
    let start = ETHERNET_HEADER_LEN;
    let end = start + ((frame[start] & 0x0f) as usize) * 4;
    frame[start + 10] = 0;
    frame[start + 11] = 0;
    let checksum = internet_checksum(&frame[start..end]);
    frame[start + 10..start + 12].copy_from_slice(&checksum.to_be_bytes());
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::convert::TryFrom;
    use tapstack_packets::{EthernetFrame, IcmpMessage, Ipv4Packet};

    #[test]
    fn echo_request_is_valid() {
        let frame = echo_request(
            MacAddr::new([1, 2, 3, 4, 5, 6]),
            Ipv4Addr::new(10, 0, 0, 5),
            Ipv4Addr::new(10, 0, 0, 4),
            1,
            2,
            b"abc",
        );
        assert_eq!(frame.len(), 14 + 20 + 8 + 3);

        let packet = Ipv4Packet::try_from(EthernetFrame::from_buffer(frame).unwrap()).unwrap();
        assert!(packet.validate_checksum().unwrap());
        assert_eq!(packet.ttl(), 64);
        let msg = IcmpMessage::try_from(packet).unwrap();
        assert_eq!(msg.msg_type(), IcmpType::EchoRequest);
        assert!(msg.verify_checksum());
    }

    #[test]
    fn arp_request_is_broadcast() {
        let sender = MacAddr::new([1, 2, 3, 4, 5, 6]);
        let frame = EthernetFrame::from_buffer(arp_request(
            Ipv4Addr::new(10, 0, 0, 5),
            sender,
            Ipv4Addr::new(10, 0, 0, 4),
        ))
        .unwrap();
        assert_eq!(frame.dest_mac(), MacAddr::BROADCAST);
        assert_eq!(frame.src_mac(), sender);
        assert_eq!(frame.payload().len(), 28);
    }
}
