use crate::log::{Direction, Header};
use std::io::{self, Write};
use tapstack_packets::{ArpPacket, EthernetFrame, Ipv4Packet};

const SEPARATOR: &str = "-------------------------------------------------";

/// Writes one complete record for `header`: a title line, one `Label : value` line per field,
/// then a dashed separator.
pub fn write_record<W: Write>(
    writer: &mut W,
    header: Header<'_>,
    direction: Direction,
) -> io::Result<()> {
    let direction = match direction {
        Direction::Incoming => "Incoming",
        Direction::Outgoing => "Outgoing",
    };
    match header {
        Header::Ethernet(frame) => {
            writeln!(writer, "{} Ethernet Header:\n", direction)?;
            write_ethernet(writer, frame)?;
        }
        Header::Arp(packet) => {
            writeln!(writer, "{} ARP Header:\n", direction)?;
            write_arp(writer, packet)?;
        }
        Header::Ip(packet) => {
            writeln!(writer, "{} IP Header:\n", direction)?;
            write_ip(writer, packet)?;
        }
    }
    writeln!(writer, "\n{}\n", SEPARATOR)
}

fn write_ethernet<W: Write>(writer: &mut W, frame: &EthernetFrame) -> io::Result<()> {
    writeln!(writer, "Destination Mac      : {}", frame.dest_mac())?;
    writeln!(writer, "Source Mac           : {}", frame.src_mac())?;
    writeln!(writer, "Payload type         : {:#06x}", frame.ether_type())
}

fn write_arp<W: Write>(writer: &mut W, packet: &ArpPacket) -> io::Result<()> {
    writeln!(writer, "Opcode               : {}", packet.opcode())?;
    writeln!(writer, "Source IP            : {}", packet.sender_ip())?;
    writeln!(writer, "Destination IP       : {}", packet.target_ip())?;
    writeln!(writer, "Source MAC           : {}", packet.sender_mac())?;
    writeln!(writer, "Destination MAC      : {}", packet.target_mac())
}

fn write_ip<W: Write>(writer: &mut W, packet: &Ipv4Packet) -> io::Result<()> {
    writeln!(writer, "Header Length        : {}", packet.ihl())?;
    writeln!(writer, "Version              : {}", packet.version())?;
    writeln!(writer, "tos                  : {}", packet.tos())?;
    writeln!(writer, "totalLength          : {}", packet.total_len())?;
    writeln!(writer, "ID                   : {}", packet.identification())?;
    writeln!(writer, "flags                : {}", packet.flags())?;
    writeln!(writer, "fragmentOffset       : {}", packet.fragment_offset())?;
    writeln!(writer, "ttl                  : {}", packet.ttl())?;
    writeln!(writer, "protocol             : {}", u8::from(packet.protocol()))?;
    writeln!(writer, "checksum             : {:#06x}", packet.checksum())?;
    writeln!(writer, "Sender Address       : {}", packet.src_addr())?;
    writeln!(writer, "Destination Address  : {}", packet.dest_addr())
}
