//! Wire formats understood by tapstack: Ethernet II, ARP for Ethernet/IPv4,
//! the IPv4 header and ICMP. Every type owns a single frame buffer and keeps
//! byte offsets into it, so a frame can be promoted layer by layer with
//! `TryFrom`, rewritten in place, and demoted back to the Ethernet frame that
//! goes out on the wire.
mod types;
pub use self::types::*;

mod error;
pub use self::error::*;

mod checksum;
pub use self::checksum::*;

mod ethernet;
pub use self::ethernet::*;

mod arp;
pub use self::arp::*;

mod ipv4;
pub use self::ipv4::*;

mod icmp;
pub use self::icmp::*;
