use failure::Fail;
use std::io;
use std::net::Ipv4Addr;
use tapstack_packets::PacketError;
use tracing::{info, warn};

/// Everything that can stop a frame or be reported while handling one.
#[derive(Debug, Fail)]
pub enum Error {
    #[fail(display = "{}", _0)]
    Packet(#[cause] PacketError),

    #[fail(display = "ignoring frame with ether type {:#06x}", _0)]
    UnsupportedEtherType(u16),

    #[fail(
        display = "ARP hardware type {} (address length {}) is not Ethernet",
        hardware_type, addr_len
    )]
    UnsupportedHardware { hardware_type: u16, addr_len: u8 },

    #[fail(
        display = "ARP protocol type {:#06x} (address length {}) is not IPv4",
        protocol_type, addr_len
    )]
    UnsupportedArpProtocol { protocol_type: u16, addr_len: u8 },

    #[fail(display = "IP protocol {} is not supported", _0)]
    UnsupportedIpProtocol(u8),

    #[fail(display = "IP version {} is not 4", _0)]
    WrongVersion(u8),

    #[fail(display = "IP header length of {} words is below the minimum of 5", _0)]
    HeaderTooShort(u8),

    #[fail(display = "IP packet from {} arrived with ttl 0", _0)]
    TtlExpired(Ipv4Addr),

    #[fail(display = "IP header checksum does not verify (residue {:#06x})", _0)]
    ChecksumMismatch(u16),

    #[fail(display = "ARP opcode {} is not handled", _0)]
    UnhandledOpcode(u16),

    #[fail(display = "ICMP type {} is not handled", _0)]
    UnhandledIcmpType(u8),

    #[fail(display = "ARP cache is full, not recording {}", _0)]
    CacheFull(Ipv4Addr),

    #[fail(display = "{} is addressed to {}, not to us", layer, target)]
    NotForUs { layer: &'static str, target: Ipv4Addr },

    #[fail(display = "frame I/O failed: {}", _0)]
    Io(#[cause] io::Error),
}

/// Copyable classification of an `Error`, for matching and counting.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ErrorKind {
    Truncated,
    UnsupportedEtherType,
    UnsupportedHardware,
    UnsupportedProtocol,
    WrongVersion,
    HeaderTooShort,
    TtlExpired,
    ChecksumMismatch,
    UnhandledOpcode,
    UnhandledIcmpType,
    CacheFull,
    NotForUs,
    Io,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Packet(_) => ErrorKind::Truncated,
            Error::UnsupportedEtherType(_) => ErrorKind::UnsupportedEtherType,
            Error::UnsupportedHardware { .. } => ErrorKind::UnsupportedHardware,
            Error::UnsupportedArpProtocol { .. } | Error::UnsupportedIpProtocol(_) => {
                ErrorKind::UnsupportedProtocol
            }
            Error::WrongVersion(_) => ErrorKind::WrongVersion,
            Error::HeaderTooShort(_) => ErrorKind::HeaderTooShort,
            Error::TtlExpired(_) => ErrorKind::TtlExpired,
            Error::ChecksumMismatch(_) => ErrorKind::ChecksumMismatch,
            Error::UnhandledOpcode(_) => ErrorKind::UnhandledOpcode,
            Error::UnhandledIcmpType(_) => ErrorKind::UnhandledIcmpType,
            Error::CacheFull(_) => ErrorKind::CacheFull,
            Error::NotForUs { .. } => ErrorKind::NotForUs,
            Error::Io(_) => ErrorKind::Io,
        }
    }
}

impl From<PacketError> for Error {
    fn from(err: PacketError) -> Self {
        match err {
            // A frame that is not the type we promoted it to is one we do not handle
            PacketError::WrongEtherType { actual, .. } => Error::UnsupportedEtherType(actual),
            err => Error::Packet(err),
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::Io(err)
    }
}

/// Non-fatal conditions noticed while a frame was handled. The frame was still processed.
#[derive(Debug, Default)]
pub struct Reports {
    errors: Vec<Error>,
}

impl Reports {
    pub fn new() -> Self {
        Reports::default()
    }

    pub fn report(&mut self, err: Error) {
        match err.kind() {
            ErrorKind::NotForUs => info!("{}", err),
            _ => warn!("{}", err),
        }
        self.errors.push(err);
    }

    pub fn contains(&self, kind: ErrorKind) -> bool {
        self.errors.iter().any(|err| err.kind() == kind)
    }

    pub fn kinds(&self) -> Vec<ErrorKind> {
        self.errors.iter().map(Error::kind).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Error> {
        self.errors.iter()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}
