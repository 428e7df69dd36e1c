use crate::device::NetworkDevice;
use std::net::Ipv4Addr;
use tapstack_packets::MacAddr;

pub const DEFAULT_IP: Ipv4Addr = Ipv4Addr::new(10, 0, 0, 4);
pub const DEFAULT_MAC: MacAddr = MacAddr {
    bytes: [0x00, 0x0c, 0x29, 0x6d, 0x50, 0x25],
};

/// What to do with ARP requests and IP packets whose target address is not ours.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TargetPolicy {
    /// Report the mismatch and answer anyway.
    Permissive,
    /// Report the mismatch and drop the packet.
    Strict,
}

impl Default for TargetPolicy {
    fn default() -> Self {
        TargetPolicy::Permissive
    }
}

/// Identity of the emulated host plus the knobs the core exposes.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StackConfig {
    pub ip: Ipv4Addr,
    pub mac: MacAddr,
    pub target_policy: TargetPolicy,
}

impl Default for StackConfig {
    fn default() -> Self {
        StackConfig {
            ip: DEFAULT_IP,
            mac: DEFAULT_MAC,
            target_policy: TargetPolicy::default(),
        }
    }
}

impl StackConfig {
    pub fn new() -> Self {
        StackConfig::default()
    }

    pub fn ip(self, ip: Ipv4Addr) -> Self {
        StackConfig { ip, ..self }
    }

    pub fn mac(self, mac: MacAddr) -> Self {
        StackConfig { mac, ..self }
    }

    pub fn target_policy(self, target_policy: TargetPolicy) -> Self {
        StackConfig {
            target_policy,
            ..self
        }
    }

    pub fn device(&self) -> NetworkDevice {
        NetworkDevice::new(self.ip, self.mac)
    }
}
