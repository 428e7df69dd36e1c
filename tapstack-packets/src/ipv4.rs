use crate::*;
use std::convert::TryFrom;
use std::net::Ipv4Addr;

/// Smallest legal header, in bytes (IHL of 5 words)
pub const IPV4_MIN_HEADER_LEN: usize = 20;

const TOTAL_LEN_OFFSET: usize = 2;
const IDENTIFICATION_OFFSET: usize = 4;
const FLAGS_FRAGMENT_OFFSET: usize = 6;
const TTL_OFFSET: usize = 8;
const PROTOCOL_OFFSET: usize = 9;
const CHECKSUM_OFFSET: usize = 10;
const SRC_ADDR_RANGE: (usize, usize) = (12, 16);
const DEST_ADDR_RANGE: (usize, usize) = (16, 20);

/// View of an IPv4 header inside a frame buffer.
///
/// Construction only guarantees the fixed 20 byte header is present. The version, IHL, TTL and
/// checksum are left for the caller to validate in whatever order it needs; the accessors that
/// depend on the IHL or the total length check their spans and return `PacketError::Truncated`.
#[derive(Clone, Debug)]
pub struct Ipv4Packet {
    pub data: PacketData,
    pub layer2_offset: Option<usize>,
    pub layer3_offset: usize,
}

impl Packet for Ipv4Packet {}

impl Ipv4Packet {
    pub fn new(
        data: PacketData,
        layer2_offset: Option<usize>,
        layer3_offset: usize,
    ) -> Result<Ipv4Packet, PacketError> {
        // Header of Ethernet Frame: 14 bytes
        // Header of IPv4 Frame: 20 bytes
        if data.len() < layer3_offset + IPV4_MIN_HEADER_LEN {
            return Err(PacketError::truncated(
                "IPv4 header",
                layer3_offset + IPV4_MIN_HEADER_LEN,
                data.len(),
            ));
        }

        Ok(Ipv4Packet {
            data,
            layer2_offset,
            layer3_offset,
        })
    }

    fn header_byte(&self, offset: usize) -> u8 {
        self.data[self.layer3_offset + offset]
    }

    fn header_u16(&self, offset: usize) -> u16 {
        read_u16(&self.data, self.layer3_offset + offset)
    }

    fn set_header_u16(&mut self, offset: usize, value: u16) {
        write_u16(&mut self.data, self.layer3_offset + offset, value);
    }

    fn addr(&self, (start, end): (usize, usize)) -> Ipv4Addr {
        let b = &self.data[self.layer3_offset + start..self.layer3_offset + end];
        Ipv4Addr::new(b[0], b[1], b[2], b[3])
    }

    fn set_addr(&mut self, (start, end): (usize, usize), addr: Ipv4Addr) {
        self.data[self.layer3_offset + start..self.layer3_offset + end]
            .copy_from_slice(&addr.octets());
    }

    /// High nibble of the first byte
    pub fn version(&self) -> u8 {
        (self.header_byte(0) & 0xF0) >> 4
    }

    /// Low nibble of the first byte: the header length in 32bit words
    pub fn ihl(&self) -> u8 {
        self.header_byte(0) & 0x0F
    }

    pub fn header_len(&self) -> usize {
        usize::from(self.ihl()) * 4
    }

    pub fn tos(&self) -> u8 {
        self.header_byte(1)
    }

    pub fn dscp(&self) -> u8 {
        self.tos() >> 2
    }

    pub fn ecn(&self) -> u8 {
        self.tos() & 0x03
    }

    pub fn total_len(&self) -> u16 {
        self.header_u16(TOTAL_LEN_OFFSET)
    }

    pub fn set_total_len(&mut self, total_len: u16) {
        self.set_header_u16(TOTAL_LEN_OFFSET, total_len);
    }

    pub fn identification(&self) -> u16 {
        self.header_u16(IDENTIFICATION_OFFSET)
    }

    /// The 3 flag bits, reserved bit first
    pub fn flags(&self) -> u8 {
        (self.header_byte(FLAGS_FRAGMENT_OFFSET) & 0xE0) >> 5
    }

    /// Returns tuple of (Don't Fragment, More Fragments)
    pub fn fragment_flags(&self) -> (bool, bool) {
        let df = (self.header_byte(FLAGS_FRAGMENT_OFFSET) & 0x40) != 0;
        let mf = (self.header_byte(FLAGS_FRAGMENT_OFFSET) & 0x20) != 0;
        (df, mf)
    }

    pub fn fragment_offset(&self) -> u16 {
        self.header_u16(FLAGS_FRAGMENT_OFFSET) & 0x1FFF
    }

    pub fn ttl(&self) -> u8 {
        self.header_byte(TTL_OFFSET)
    }

    pub fn set_ttl(&mut self, ttl: u8) {
        self.data[self.layer3_offset + TTL_OFFSET] = ttl;
    }

    pub fn protocol(&self) -> IpProtocol {
        IpProtocol::from(self.header_byte(PROTOCOL_OFFSET))
    }

    pub fn checksum(&self) -> u16 {
        self.header_u16(CHECKSUM_OFFSET)
    }

    pub fn set_checksum(&mut self, checksum: u16) {
        self.set_header_u16(CHECKSUM_OFFSET, checksum);
    }

    pub fn src_addr(&self) -> Ipv4Addr {
        self.addr(SRC_ADDR_RANGE)
    }

    pub fn set_src_addr(&mut self, addr: Ipv4Addr) {
        self.set_addr(SRC_ADDR_RANGE, addr);
    }

    pub fn dest_addr(&self) -> Ipv4Addr {
        self.addr(DEST_ADDR_RANGE)
    }

    pub fn set_dest_addr(&mut self, addr: Ipv4Addr) {
        self.set_addr(DEST_ADDR_RANGE, addr);
    }

    /// The `ihl * 4` bytes the header claims, checked against the buffer.
    pub fn header(&self) -> Result<&[u8], PacketError> {
        let end = self.layer3_offset + self.header_len();
        if end > self.data.len() {
            return Err(PacketError::truncated("IPv4 header", end, self.data.len()));
        }
        Ok(&self.data[self.layer3_offset..end])
    }

    /// Sums the header as transmitted, checksum field included. Zero means intact.
    pub fn header_checksum(&self) -> Result<u16, PacketError> {
        Ok(internet_checksum(self.header()?))
    }

    pub fn validate_checksum(&self) -> Result<bool, PacketError> {
        Ok(self.header_checksum()? == 0)
    }

    /// Zeroes the checksum field, recomputes it over the header and writes it back.
    pub fn fill_checksum(&mut self) -> Result<u16, PacketError> {
        self.set_checksum(0);
        let checksum = self.header_checksum()?;
        self.set_checksum(checksum);
        Ok(checksum)
    }

    /// Offset of the first payload byte and the payload length implied by
    /// the IHL and total length fields, checked against the buffer.
    pub fn payload_span(&self) -> Result<(usize, usize), PacketError> {
        let header_len = self.header_len();
        let total_len = usize::from(self.total_len());
        if total_len < header_len {
            return Err(PacketError::truncated("IPv4 packet", header_len, total_len));
        }
        let end = self.layer3_offset + total_len;
        if end > self.data.len() {
            return Err(PacketError::truncated("IPv4 packet", end, self.data.len()));
        }
        Ok((self.layer3_offset + header_len, total_len - header_len))
    }

    pub fn payload(&self) -> Result<&[u8], PacketError> {
        let (start, len) = self.payload_span()?;
        Ok(&self.data[start..start + len])
    }
}

/// Ipv4Packets are considered the same if they have the same data from the layer 3
/// header and onward. This function does not consider the data before the start of
/// the IPv4 header.
impl PartialEq for Ipv4Packet {
    fn eq(&self, other: &Self) -> bool {
        self.data[self.layer3_offset..] == other.data[other.layer3_offset..]
    }
}

impl Eq for Ipv4Packet {}

impl TryFrom<EthernetFrame> for Ipv4Packet {
    type Error = PacketError;

    fn try_from(frame: EthernetFrame) -> Result<Self, Self::Error> {
        if frame.ether_type() != IPV4_ETHER_TYPE {
            return Err(PacketError::WrongEtherType {
                expected: IPV4_ETHER_TYPE,
                actual: frame.ether_type(),
            });
        }
        Ipv4Packet::new(frame.data, Some(0), frame.payload_offset)
    }
}

impl TryFrom<Ipv4Packet> for EthernetFrame {
    type Error = PacketError;

    fn try_from(packet: Ipv4Packet) -> Result<Self, Self::Error> {
        match packet.layer2_offset {
            Some(0) => EthernetFrame::from_buffer(packet.data),
            Some(layer2_offset) => EthernetFrame::from_buffer(packet.data[layer2_offset..].to_vec()),
            None => Err(PacketError::truncated(
                "Ethernet frame",
                ETHERNET_HEADER_LEN,
                0,
            )),
        }
    }
}
