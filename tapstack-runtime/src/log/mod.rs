//! Header logs record every header the stack reads or writes, one record per header, in a
//! human readable layout. The core hands a `Header` and a `Direction` to a `HeaderLog` and never
//! formats text itself; where the records end up is up to the implementation.
use tapstack_packets::{ArpPacket, EthernetFrame, Ipv4Packet};

mod format;
pub use self::format::*;

mod text_log;
pub use self::text_log::*;

mod file_log;
pub use self::file_log::*;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Direction {
    Incoming,
    Outgoing,
}

/// A borrowed view of the header being logged.
#[derive(Clone, Copy, Debug)]
pub enum Header<'a> {
    Ethernet(&'a EthernetFrame),
    Arp(&'a ArpPacket),
    Ip(&'a Ipv4Packet),
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum HeaderKind {
    Ethernet,
    Arp,
    Ip,
}

impl<'a> Header<'a> {
    pub fn kind(&self) -> HeaderKind {
        match self {
            Header::Ethernet(_) => HeaderKind::Ethernet,
            Header::Arp(_) => HeaderKind::Arp,
            Header::Ip(_) => HeaderKind::Ip,
        }
    }
}

/// Destination for header records. Logging must not fail a frame, so implementations deal with
/// their own write errors.
pub trait HeaderLog {
    fn log(&mut self, header: Header<'_>, direction: Direction);
}

/// Drops every record.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullHeaderLog;

impl HeaderLog for NullHeaderLog {
    fn log(&mut self, _header: Header<'_>, _direction: Direction) {}
}

impl<L: HeaderLog + ?Sized> HeaderLog for Box<L> {
    fn log(&mut self, header: Header<'_>, direction: Direction) {
        (**self).log(header, direction)
    }
}
