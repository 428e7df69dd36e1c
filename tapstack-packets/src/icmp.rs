use crate::*;
use std::convert::TryFrom;

/// Type, code, checksum, and the 4 type-specific bytes every ICMP message carries
pub const ICMP_HEADER_LEN: usize = 8;

const TYPE_OFFSET: usize = 0;
const CODE_OFFSET: usize = 1;
const CHECKSUM_OFFSET: usize = 2;
const IDENTIFIER_OFFSET: usize = 4;
const SEQUENCE_OFFSET: usize = 6;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum IcmpType {
    EchoReply,
    EchoRequest,
    Other(u8),
}

impl From<u8> for IcmpType {
    fn from(msg_type: u8) -> Self {
        match msg_type {
            0 => IcmpType::EchoReply,
            8 => IcmpType::EchoRequest,
            other => IcmpType::Other(other),
        }
    }
}

impl From<IcmpType> for u8 {
    fn from(msg_type: IcmpType) -> Self {
        match msg_type {
            IcmpType::EchoReply => 0,
            IcmpType::EchoRequest => 8,
            IcmpType::Other(other) => other,
        }
    }
}

/// An ICMP message carried by an IPv4 packet. The message spans from the end of the IP header
/// to the end of the IP total length, both checked when the message is built.
#[derive(Clone, Debug)]
pub struct IcmpMessage {
    packet: Ipv4Packet,
    offset: usize,
    len: usize,
}

impl Packet for IcmpMessage {}

impl IcmpMessage {
    /// Bytes covered by the message: header plus echo identifier, sequence and data.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn bytes(&self) -> &[u8] {
        &self.packet.data[self.offset..self.offset + self.len]
    }

    fn bytes_mut(&mut self) -> &mut [u8] {
        &mut self.packet.data[self.offset..self.offset + self.len]
    }

    pub fn msg_type(&self) -> IcmpType {
        IcmpType::from(self.bytes()[TYPE_OFFSET])
    }

    pub fn set_msg_type(&mut self, msg_type: IcmpType) {
        self.bytes_mut()[TYPE_OFFSET] = u8::from(msg_type);
    }

    pub fn code(&self) -> u8 {
        self.bytes()[CODE_OFFSET]
    }

    pub fn checksum(&self) -> u16 {
        read_u16(self.bytes(), CHECKSUM_OFFSET)
    }

    pub fn set_checksum(&mut self, checksum: u16) {
        write_u16(self.bytes_mut(), CHECKSUM_OFFSET, checksum);
    }

    pub fn identifier(&self) -> u16 {
        read_u16(self.bytes(), IDENTIFIER_OFFSET)
    }

    pub fn sequence(&self) -> u16 {
        read_u16(self.bytes(), SEQUENCE_OFFSET)
    }

    pub fn data(&self) -> &[u8] {
        &self.bytes()[ICMP_HEADER_LEN..]
    }

    pub fn verify_checksum(&self) -> bool {
        internet_checksum(self.bytes()) == 0
    }

    /// Zeroes the checksum field and recomputes it over the whole message.
    pub fn fill_checksum(&mut self) -> u16 {
        self.set_checksum(0);
        let checksum = internet_checksum(self.bytes());
        self.set_checksum(checksum);
        checksum
    }

    // Move ownership of the enclosing packet back to the caller
    pub fn packet(self) -> Ipv4Packet {
        self.packet
    }
}

impl TryFrom<Ipv4Packet> for IcmpMessage {
    type Error = PacketError;

    fn try_from(packet: Ipv4Packet) -> Result<Self, Self::Error> {
        let (offset, len) = packet.payload_span()?;
        if len < ICMP_HEADER_LEN {
            return Err(PacketError::truncated("ICMP message", ICMP_HEADER_LEN, len));
        }
        Ok(IcmpMessage {
            packet,
            offset,
            len,
        })
    }
}
