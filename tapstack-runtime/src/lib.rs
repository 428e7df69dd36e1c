//! The protocol core of tapstack: a user-space host that answers ARP requests and ICMP echo
//! requests on a virtual Ethernet link. Frames come in through a `FrameSource`, are classified by
//! EtherType, handled by the ARP resolver or the IPv4 processor, and any reply leaves through the
//! `FrameTransmitter` to a `FrameSink`. Everything runs on the caller's thread, one frame at a time.

/// ARP cache and the resolver that answers requests for the device's address.
pub mod arp;

/// Classifiers decide which handler a frame is dispatched to.
pub mod classifier;

pub mod config;

mod context;
pub use self::context::Context;

pub mod device;

/// Error types and the non-fatal reports gathered while a frame is handled.
pub mod errors;

pub mod icmp;

/// Frame source and sink traits, and their TAP device implementations.
pub mod io;

pub mod ipv4;

/// Header logs: human readable records of every header in and out.
pub mod log;

/// The composition root. Owns the components and drives frames through them.
pub mod stack;

pub mod transmit;

/// Utility module
pub mod utils;

pub use self::config::{StackConfig, TargetPolicy};
pub use self::errors::{Error, ErrorKind, Reports};
pub use self::stack::{Handled, Outcome, Stack};
