#![allow(non_camel_case_types)]

use libc;

/// `_IOW('T', 202, int)` from `linux/if_tun.h`
pub(crate) const TUNSETIFF: libc::c_ulong = 0x4004_54ca;

pub(crate) const SIOCGIFFLAGS: libc::c_ulong = 0x8913;
pub(crate) const SIOCSIFFLAGS: libc::c_ulong = 0x8914;

/// Ethernet frames, as opposed to `IFF_TUN` raw IP packets.
pub(crate) const IFF_TAP: libc::c_short = 0x0002;
/// Do not prepend the 4 byte packet information header to frames.
pub(crate) const IFF_NO_PI: libc::c_short = 0x1000;

pub(crate) const TUN_CLONE_DEVICE: &[u8] = b"/dev/net/tun\0";

#[repr(C)]
#[derive(Clone, Copy)]
pub(crate) struct ifmap {
    pub(crate) mem_start: libc::c_ulong,
    pub(crate) mem_end: libc::c_ulong,
    pub(crate) base_addr: libc::c_ushort,
    pub(crate) irq: libc::c_uchar,
    pub(crate) dma: libc::c_uchar,
    pub(crate) port: libc::c_uchar,
}

#[repr(C)]
pub(crate) union ifru {
    pub(crate) ifru_addr: libc::sockaddr,
    pub(crate) ifru_hwaddr: libc::sockaddr,
    pub(crate) ifru_flags: libc::c_short,
    pub(crate) ifru_ivalue: libc::c_int,
    pub(crate) ifru_mtu: libc::c_int,
    pub(crate) ifru_map: ifmap,
}

#[repr(C)]
pub(crate) union ifrn {
    pub(crate) ifrn_name: [libc::c_char; libc::IFNAMSIZ],
}

#[repr(C)]
pub(crate) struct ifreq {
    pub(crate) ifr_ifrn: ifrn,
    pub(crate) ifr_ifru: ifru,
}
