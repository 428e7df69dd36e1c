use crate::*;
use std::convert::TryFrom;

const DEST_MAC_RANGE: (usize, usize) = (0, 6);
const SRC_MAC_RANGE: (usize, usize) = (6, 12);
const ETHER_TYPE_OFFSET: usize = 12;

/// Which upper layer an Ethernet frame carries, decided by its EtherType.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum EtherKind {
    Arp,
    Ipv4,
    Unsupported(u16),
}

impl From<u16> for EtherKind {
    fn from(ether_type: u16) -> Self {
        match ether_type {
            ARP_ETHER_TYPE => EtherKind::Arp,
            IPV4_ETHER_TYPE => EtherKind::Ipv4,
            other => EtherKind::Unsupported(other),
        }
    }
}

#[derive(Clone, Debug)]
pub struct EthernetFrame {
    pub data: PacketData,
    pub payload_offset: usize,
}

impl Packet for EthernetFrame {}

impl EthernetFrame {
    pub fn from_buffer(frame: PacketData) -> Result<EthernetFrame, PacketError> {
        // Ethernet II frames must be at least the header, which is 14bytes
        // 0                    6                    12                      14
        // |---6 byte Dest_MAC--|---6 byte Src_MAC---|--2 Byte EtherType---|
        if frame.len() < ETHERNET_HEADER_LEN {
            return Err(PacketError::truncated(
                "Ethernet frame",
                ETHERNET_HEADER_LEN,
                frame.len(),
            ));
        }

        Ok(EthernetFrame {
            data: frame,
            payload_offset: ETHERNET_HEADER_LEN,
        })
    }

    /// Returns a frame with a zeroed header and a zeroed payload of `payload_len` bytes.
    pub fn empty(payload_len: usize) -> EthernetFrame {
        EthernetFrame {
            data: vec![0; ETHERNET_HEADER_LEN + payload_len],
            payload_offset: ETHERNET_HEADER_LEN,
        }
    }

    pub fn dest_mac(&self) -> MacAddr {
        let (start, end) = DEST_MAC_RANGE;
        MacAddr::from_slice(&self.data[start..end])
    }

    pub fn src_mac(&self) -> MacAddr {
        let (start, end) = SRC_MAC_RANGE;
        MacAddr::from_slice(&self.data[start..end])
    }

    pub fn set_dest_mac(&mut self, mac: MacAddr) {
        let (start, end) = DEST_MAC_RANGE;
        self.data[start..end].copy_from_slice(&mac.bytes);
    }

    pub fn set_src_mac(&mut self, mac: MacAddr) {
        let (start, end) = SRC_MAC_RANGE;
        self.data[start..end].copy_from_slice(&mac.bytes);
    }

    /// EtherType in host order.
    pub fn ether_type(&self) -> u16 {
        read_u16(&self.data, ETHER_TYPE_OFFSET)
    }

    pub fn set_ether_type(&mut self, ether_type: u16) {
        write_u16(&mut self.data, ETHER_TYPE_OFFSET, ether_type);
    }

    pub fn kind(&self) -> EtherKind {
        EtherKind::from(self.ether_type())
    }

    pub fn payload(&self) -> &[u8] {
        &self.data[self.payload_offset..]
    }

    pub fn payload_mut(&mut self) -> &mut [u8] {
        &mut self.data[self.payload_offset..]
    }

    /// Stamps the header of an outgoing frame. The payload is left alone.
    pub fn finalize(&mut self, ether_type: u16, dest: MacAddr, src: MacAddr) {
        self.set_ether_type(ether_type);
        self.set_dest_mac(dest);
        self.set_src_mac(src);
    }

    /// The header plus the first `payload_len` payload bytes, i.e. what goes
    /// on the wire for a reply of that length.
    pub fn wire_bytes(&self, payload_len: usize) -> Result<&[u8], PacketError> {
        let needed = self.payload_offset + payload_len;
        if needed > self.data.len() {
            return Err(PacketError::truncated(
                "Ethernet frame",
                needed,
                self.data.len(),
            ));
        }
        Ok(&self.data[..needed])
    }
}

impl TryFrom<PacketData> for EthernetFrame {
    type Error = PacketError;

    fn try_from(data: PacketData) -> Result<Self, Self::Error> {
        EthernetFrame::from_buffer(data)
    }
}

/// EthernetFrames are considered the same if they carry the same bytes.
impl PartialEq for EthernetFrame {
    fn eq(&self, other: &Self) -> bool {
        self.data == other.data
    }
}

impl Eq for EthernetFrame {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::vec::Vec;

    #[test]
    fn ethernet_frame() {
        let data: Vec<u8> = vec![0xde, 0xad, 0xbe, 0xef, 0xff, 0xff, 1, 2, 3, 4, 5, 6, 0, 0];
        let frame = EthernetFrame::from_buffer(data).unwrap();
        assert_eq!(
            frame.dest_mac(),
            MacAddr::new([0xde, 0xad, 0xbe, 0xef, 0xff, 0xff])
        );
        assert_eq!(frame.src_mac(), MacAddr::new([1, 2, 3, 4, 5, 6]));
        assert_eq!(frame.ether_type(), 0);
        assert_eq!(frame.payload().len(), 0);
    }

    #[test]
    fn invalid_data_length() {
        let data: Vec<u8> = vec![0xde, 0xad, 0xbe, 0xef, 0xff, 0xff, 1, 2, 3, 4, 5, 6];
        assert_eq!(
            EthernetFrame::from_buffer(data).unwrap_err(),
            PacketError::Truncated {
                layer: "Ethernet frame",
                needed: 14,
                actual: 12
            }
        );
    }

    #[test]
    fn ether_type_is_big_endian() {
        let data: Vec<u8> = vec![
            0xde, 0xad, 0xbe, 0xef, 0xff, 0xff, 1, 2, 3, 4, 5, 6, 0x08, 0x06,
        ];
        let mut frame = EthernetFrame::from_buffer(data).unwrap();
        assert_eq!(frame.ether_type(), ARP_ETHER_TYPE);
        assert_eq!(frame.kind(), EtherKind::Arp);

        frame.set_ether_type(IPV4_ETHER_TYPE);
        assert_eq!(&frame.data[12..14], &[0x08, 0x00]);
        assert_eq!(frame.kind(), EtherKind::Ipv4);

        frame.set_ether_type(0x86dd);
        assert_eq!(frame.kind(), EtherKind::Unsupported(0x86dd));
    }

    #[test]
    fn finalize_leaves_payload() {
        let mut frame = EthernetFrame::empty(4);
        frame.payload_mut().copy_from_slice(&[9, 8, 7, 6]);
        let dest = MacAddr::new([0xaa, 0xbb, 0xcc, 0xdd, 0xee, 0xff]);
        let src = MacAddr::new([0x00, 0x0c, 0x29, 0x6d, 0x50, 0x25]);

        frame.finalize(ARP_ETHER_TYPE, dest, src);

        assert_eq!(frame.dest_mac(), dest);
        assert_eq!(frame.src_mac(), src);
        assert_eq!(frame.ether_type(), ARP_ETHER_TYPE);
        assert_eq!(frame.payload(), &[9, 8, 7, 6]);
    }

    #[test]
    fn wire_bytes_checks_capacity() {
        let frame = EthernetFrame::empty(10);
        assert_eq!(frame.wire_bytes(4).unwrap().len(), 18);
        assert_eq!(frame.wire_bytes(10).unwrap().len(), 24);
        assert!(frame.wire_bytes(11).is_err());
    }
}
