use crate::arp::ArpCache;
use crate::config::TargetPolicy;
use crate::context::Context;
use crate::errors::Error;
use crate::io::FrameSink;
use crate::log::{Direction, Header, HeaderLog};
use std::convert::TryFrom;
use tapstack_packets::{
    ArpHardwareType, ArpOp, ArpPacket, EthernetFrame, ARP_ETHERNET_ADDR_LEN, ARP_ETHER_TYPE,
    ARP_IPV4_ADDR_LEN, IPV4_ETHER_TYPE,
};
use tracing::debug;

/// How an incoming ARP packet changed the cache.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CacheUpdate {
    /// An entry for the sender already existed and now holds the packet's MAC.
    Updated,
    Inserted,
    /// The sender was new and there was no room for it.
    Full,
    /// The sender was new but the packet was not for us, so nothing was recorded.
    Skipped,
}

/// Answers ARP requests for the device and learns sender addresses along the way.
pub struct ArpResolver {
    cache: ArpCache,
    policy: TargetPolicy,
}

impl ArpResolver {
    pub fn new(policy: TargetPolicy) -> Self {
        ArpResolver {
            cache: ArpCache::new(),
            policy,
        }
    }

    pub fn cache(&self) -> &ArpCache {
        &self.cache
    }

    pub fn cache_mut(&mut self) -> &mut ArpCache {
        &mut self.cache
    }

    ///
    /// Follows the packet reception algorithm of RFC 826: https://tools.ietf.org/html/rfc826
    ///
    /// ?Do I have the hardware type in ar$hrd? (and is ar$hln 6)
    /// ?Do I speak the protocol in ar$pro? (and is ar$pln 4)
    ///     Merge_flag := update the sender's entry if one exists
    ///     ?Am I the target protocol address?
    ///         No, strict: drop here.
    ///         No, permissive: report it and carry on as if we were.
    ///     If Merge_flag is false, insert the sender. A full cache is reported, not fatal.
    ///     ?Is the opcode ares_op$REQUEST?
    ///         Yes: reply. No: drop.
    ///
    /// Returns how the cache changed and, if a reply went out, how many bytes were written.
    ///
    pub fn handle_incoming<S: FrameSink, L: HeaderLog>(
        &mut self,
        cx: &mut Context<'_, S, L>,
        frame: EthernetFrame,
    ) -> Result<(CacheUpdate, usize), Error> {
        let packet = ArpPacket::try_from(frame)?;
        cx.log.log(Header::Arp(&packet), Direction::Incoming);

        if packet.hardware_type() != ArpHardwareType::Ethernet as u16
            || packet.hardware_addr_len() != ARP_ETHERNET_ADDR_LEN
        {
            return Err(Error::UnsupportedHardware {
                hardware_type: packet.hardware_type(),
                addr_len: packet.hardware_addr_len(),
            });
        }
        if packet.protocol_type() != IPV4_ETHER_TYPE
            || packet.protocol_addr_len() != ARP_IPV4_ADDR_LEN
        {
            return Err(Error::UnsupportedArpProtocol {
                protocol_type: packet.protocol_type(),
                addr_len: packet.protocol_addr_len(),
            });
        }

        let hardware_type = packet.hardware_type();
        let sender_ip = packet.sender_ip();
        let sender_mac = packet.sender_mac();
        let merged = self.cache.update(hardware_type, sender_ip, sender_mac);

        let target = packet.target_ip();
        if target != cx.device.ip() {
            let not_for_us = Error::NotForUs {
                layer: "ARP packet",
                target,
            };
            match self.policy {
                TargetPolicy::Strict => return Err(not_for_us),
                TargetPolicy::Permissive => cx.reports.report(not_for_us),
            }
        }

        let update = if merged {
            CacheUpdate::Updated
        } else {
            match self.cache.insert(hardware_type, sender_ip, sender_mac) {
                Ok(()) => CacheUpdate::Inserted,
                Err(err) => {
                    cx.reports.report(err);
                    CacheUpdate::Full
                }
            }
        };
        debug!("ARP from {} ({}): {:?}", sender_ip, sender_mac, update);

        if packet.opcode() != ArpOp::Request as u16 {
            return Err(Error::UnhandledOpcode(packet.opcode()));
        }
        let written = self.reply(cx, packet)?;
        Ok((update, written))
    }

    /// Turns the request into a reply in place and sends it back to the requester.
    pub fn reply<S: FrameSink, L: HeaderLog>(
        &self,
        cx: &mut Context<'_, S, L>,
        mut packet: ArpPacket,
    ) -> Result<usize, Error> {
        let requester_ip = packet.sender_ip();
        let requester_mac = packet.sender_mac();

        packet.set_target_ip(requester_ip);
        packet.set_target_mac(requester_mac);
        packet.set_sender_ip(cx.device.ip());
        packet.set_sender_mac(cx.device.mac());
        packet.set_opcode(ArpOp::Reply as u16);
        cx.log.log(Header::Arp(&packet), Direction::Outgoing);

        let mut frame = packet.frame();
        cx.transmit(
            &mut frame,
            ARP_ETHER_TYPE,
            ArpPacket::wire_len(),
            requester_mac,
        )
    }
}
