use crate::*;
use std::convert::TryFrom;
use std::net::Ipv4Addr;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ArpOp {
    Request = 1,
    Reply = 2,
}

pub enum ArpHardwareType {
    Ethernet = 1,
}

/// Fixed part: hardware type, protocol type, address lengths, opcode
pub const ARP_HEADER_LEN: usize = 8;
/// Sender MAC, sender IP, target MAC, target IP for Ethernet/IPv4
pub const ARP_IPV4_LEN: usize = 20;

pub const ARP_ETHERNET_ADDR_LEN: u8 = 6;
pub const ARP_IPV4_ADDR_LEN: u8 = 4;

const HARDWARE_TYPE_OFFSET: usize = 0;
const PROTOCOL_TYPE_OFFSET: usize = 2;
const HARDWARE_ADDR_LEN_OFFSET: usize = 4;
const PROTOCOL_ADDR_LEN_OFFSET: usize = 5;
const OPCODE_OFFSET: usize = 6;

const SENDER_MAC_RANGE: (usize, usize) = (8, 14);
const SENDER_IP_RANGE: (usize, usize) = (14, 18);
const TARGET_MAC_RANGE: (usize, usize) = (18, 24);
const TARGET_IP_RANGE: (usize, usize) = (24, 28);

///
/// EthernetFrame wrapper with getters/setters for the packet structure described in RFC 826
/// https://tools.ietf.org/html/rfc826
///
/// Address accessors use the Ethernet/IPv4 layout (6 byte hardware addresses, 4 byte protocol
/// addresses). Check `hardware_addr_len` and `protocol_addr_len` before trusting them.
///
#[derive(Clone, Debug)]
pub struct ArpPacket {
    frame: EthernetFrame,
}

impl Packet for ArpPacket {}

impl ArpPacket {
    ///
    /// Constructs a zeroed Ethernet/IPv4 ARP packet with the address lengths already filled in.
    ///
    pub fn new() -> Self {
        let mut frame = EthernetFrame::empty(ARP_HEADER_LEN + ARP_IPV4_LEN);
        frame.set_ether_type(ARP_ETHER_TYPE);

        let mut arp_packet = ArpPacket { frame };
        arp_packet.set_hardware_addr_len(ARP_ETHERNET_ADDR_LEN);
        arp_packet.set_protocol_addr_len(ARP_IPV4_ADDR_LEN);
        arp_packet
    }

    /// Bytes a reply occupies after the Ethernet header.
    pub const fn wire_len() -> usize {
        ARP_HEADER_LEN + ARP_IPV4_LEN
    }

    pub fn hardware_type(&self) -> u16 {
        read_u16(self.frame.payload(), HARDWARE_TYPE_OFFSET)
    }

    pub fn protocol_type(&self) -> u16 {
        read_u16(self.frame.payload(), PROTOCOL_TYPE_OFFSET)
    }

    pub fn hardware_addr_len(&self) -> u8 {
        self.frame.payload()[HARDWARE_ADDR_LEN_OFFSET]
    }

    pub fn protocol_addr_len(&self) -> u8 {
        self.frame.payload()[PROTOCOL_ADDR_LEN_OFFSET]
    }

    pub fn opcode(&self) -> u16 {
        read_u16(self.frame.payload(), OPCODE_OFFSET)
    }

    pub fn sender_mac(&self) -> MacAddr {
        MacAddr::from_slice(self.arp_data(SENDER_MAC_RANGE))
    }

    pub fn sender_ip(&self) -> Ipv4Addr {
        ipv4_from(self.arp_data(SENDER_IP_RANGE))
    }

    pub fn target_mac(&self) -> MacAddr {
        MacAddr::from_slice(self.arp_data(TARGET_MAC_RANGE))
    }

    pub fn target_ip(&self) -> Ipv4Addr {
        ipv4_from(self.arp_data(TARGET_IP_RANGE))
    }

    pub fn set_hardware_type(&mut self, htype: u16) {
        write_u16(self.frame.payload_mut(), HARDWARE_TYPE_OFFSET, htype);
    }

    pub fn set_protocol_type(&mut self, ptype: u16) {
        write_u16(self.frame.payload_mut(), PROTOCOL_TYPE_OFFSET, ptype);
    }

    pub fn set_hardware_addr_len(&mut self, len: u8) {
        self.frame.payload_mut()[HARDWARE_ADDR_LEN_OFFSET] = len;
    }

    pub fn set_protocol_addr_len(&mut self, len: u8) {
        self.frame.payload_mut()[PROTOCOL_ADDR_LEN_OFFSET] = len;
    }

    pub fn set_opcode(&mut self, code: u16) {
        write_u16(self.frame.payload_mut(), OPCODE_OFFSET, code);
    }

    pub fn set_sender_mac(&mut self, addr: MacAddr) {
        self.set_arp_data(&addr.bytes, SENDER_MAC_RANGE);
    }

    pub fn set_sender_ip(&mut self, addr: Ipv4Addr) {
        self.set_arp_data(&addr.octets(), SENDER_IP_RANGE);
    }

    pub fn set_target_mac(&mut self, addr: MacAddr) {
        self.set_arp_data(&addr.bytes, TARGET_MAC_RANGE);
    }

    pub fn set_target_ip(&mut self, addr: Ipv4Addr) {
        self.set_arp_data(&addr.octets(), TARGET_IP_RANGE);
    }

    pub fn frame_ref(&self) -> &EthernetFrame {
        &self.frame
    }

    // Move ownership of the frame back to the caller
    pub fn frame(self) -> EthernetFrame {
        self.frame
    }

    fn arp_data(&self, (start, end): (usize, usize)) -> &[u8] {
        &self.frame.payload()[start..end]
    }

    fn set_arp_data(&mut self, bytes: &[u8], (start, end): (usize, usize)) {
        self.frame.payload_mut()[start..end].copy_from_slice(bytes);
    }
}

impl Default for ArpPacket {
    fn default() -> Self {
        ArpPacket::new()
    }
}

fn ipv4_from(bytes: &[u8]) -> Ipv4Addr {
    Ipv4Addr::new(bytes[0], bytes[1], bytes[2], bytes[3])
}

impl TryFrom<EthernetFrame> for ArpPacket {
    type Error = PacketError;

    ///
    /// Decorates the given EthernetFrame with ArpPacket getters/setters.
    /// Validates
    /// - The frame has an ARP ether type
    /// - The payload is long enough for the Ethernet/IPv4 layout. Anything past it (minimum frame
    ///   padding) is ignored.
    ///
    fn try_from(frame: EthernetFrame) -> Result<Self, Self::Error> {
        if frame.ether_type() != ARP_ETHER_TYPE {
            return Err(PacketError::WrongEtherType {
                expected: ARP_ETHER_TYPE,
                actual: frame.ether_type(),
            });
        }

        let payload_len = frame.payload().len();
        if payload_len < ArpPacket::wire_len() {
            return Err(PacketError::truncated(
                "ARP packet",
                ArpPacket::wire_len(),
                payload_len,
            ));
        }

        Ok(ArpPacket { frame })
    }
}
