use crate::errors::Error;
use std::net::Ipv4Addr;
use tapstack_packets::MacAddr;

pub const ARP_CACHE_LEN: usize = 32;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ArpState {
    Free,
    Resolved,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ArpCacheEntry {
    pub hardware_type: u16,
    pub source_ip: Ipv4Addr,
    pub source_mac: MacAddr,
    pub state: ArpState,
}

const FREE_ENTRY: ArpCacheEntry = ArpCacheEntry {
    hardware_type: 0,
    source_ip: Ipv4Addr::UNSPECIFIED,
    source_mac: MacAddr { bytes: [0; 6] },
    state: ArpState::Free,
};

/// Fixed-size translation table keyed on (hardware type, sender IP). Entries go from Free to
/// Resolved once and then only have their MAC refreshed; nothing ages out and nothing is
/// compacted.
#[derive(Clone, Debug)]
pub struct ArpCache {
    entries: [ArpCacheEntry; ARP_CACHE_LEN],
}

impl Default for ArpCache {
    fn default() -> Self {
        ArpCache::new()
    }
}

impl ArpCache {
    pub fn new() -> Self {
        ArpCache {
            entries: [FREE_ENTRY; ARP_CACHE_LEN],
        }
    }

    /// Overwrites the MAC of the first Resolved entry for this key. Returns whether one existed.
    pub fn update(&mut self, hardware_type: u16, source_ip: Ipv4Addr, source_mac: MacAddr) -> bool {
        match self.entries.iter_mut().find(|entry| {
            entry.state == ArpState::Resolved
                && entry.hardware_type == hardware_type
                && entry.source_ip == source_ip
        }) {
            Some(entry) => {
                entry.source_mac = source_mac;
                true
            }
            None => false,
        }
    }

    /// Claims the first Free entry. Does not look for an existing entry with the same key; call
    /// `update` first.
    pub fn insert(
        &mut self,
        hardware_type: u16,
        source_ip: Ipv4Addr,
        source_mac: MacAddr,
    ) -> Result<(), Error> {
        match self
            .entries
            .iter_mut()
            .find(|entry| entry.state == ArpState::Free)
        {
            Some(entry) => {
                *entry = ArpCacheEntry {
                    hardware_type,
                    source_ip,
                    source_mac,
                    state: ArpState::Resolved,
                };
                Ok(())
            }
            None => Err(Error::CacheFull(source_ip)),
        }
    }

    pub fn lookup(&self, hardware_type: u16, ip: Ipv4Addr) -> Option<MacAddr> {
        self.resolved()
            .find(|entry| entry.hardware_type == hardware_type && entry.source_ip == ip)
            .map(|entry| entry.source_mac)
    }

    pub fn entries(&self) -> &[ArpCacheEntry] {
        &self.entries
    }

    pub fn resolved(&self) -> impl Iterator<Item = &ArpCacheEntry> {
        self.entries
            .iter()
            .filter(|entry| entry.state == ArpState::Resolved)
    }

    pub fn len(&self) -> usize {
        self.resolved().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_full(&self) -> bool {
        self.len() == ARP_CACHE_LEN
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;

    const ETHERNET: u16 = 1;

    fn mac(last: u8) -> MacAddr {
        MacAddr::new([0xaa, 0xbb, 0xcc, 0xdd, 0xee, last])
    }

    #[test]
    fn starts_free() {
        let cache = ArpCache::new();
        assert!(cache.is_empty());
        assert_eq!(cache.entries().len(), ARP_CACHE_LEN);
        assert!(cache.entries().iter().all(|e| e.state == ArpState::Free));
    }

    #[test]
    fn update_misses_until_inserted() {
        let mut cache = ArpCache::new();
        let ip = Ipv4Addr::new(10, 0, 0, 5);
        assert!(!cache.update(ETHERNET, ip, mac(1)));
        cache.insert(ETHERNET, ip, mac(1)).unwrap();
        assert!(cache.update(ETHERNET, ip, mac(2)));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.lookup(ETHERNET, ip), Some(mac(2)));
    }

    #[test]
    fn key_includes_hardware_type() {
        let mut cache = ArpCache::new();
        let ip = Ipv4Addr::new(10, 0, 0, 5);
        cache.insert(ETHERNET, ip, mac(1)).unwrap();
        assert!(!cache.update(6, ip, mac(2)));
        assert_eq!(cache.lookup(6, ip), None);
        assert_eq!(cache.lookup(ETHERNET, ip), Some(mac(1)));
    }

    #[test]
    fn saturation() {
        let mut cache = ArpCache::new();
        for i in 0..ARP_CACHE_LEN as u8 {
            cache
                .insert(ETHERNET, Ipv4Addr::new(10, 0, 1, i), mac(i))
                .unwrap();
        }
        assert!(cache.is_full());
        let before = cache.entries().to_vec();

        let err = cache
            .insert(ETHERNET, Ipv4Addr::new(10, 0, 2, 1), mac(0xff))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::CacheFull);
        assert_eq!(cache.entries(), &before[..]);
        assert_eq!(cache.lookup(ETHERNET, Ipv4Addr::new(10, 0, 2, 1)), None);
    }
}
