use std::net::Ipv4Addr;
use tapstack_packets::MacAddr;

/// The host this stack pretends to be. Fixed for the life of the process.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct NetworkDevice {
    ip: Ipv4Addr,
    mac: MacAddr,
}

impl NetworkDevice {
    pub fn new(ip: Ipv4Addr, mac: MacAddr) -> Self {
        NetworkDevice { ip, mac }
    }

    pub fn ip(&self) -> Ipv4Addr {
        self.ip
    }

    pub fn mac(&self) -> MacAddr {
        self.mac
    }
}
