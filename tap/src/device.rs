#![deny(missing_docs)]

use crate::linux;
use libc;
use std::{
    ffi::CStr,
    io,
    mem::{self, MaybeUninit},
    os::unix::io::{AsRawFd, RawFd},
    ptr,
};

/// An open handle on the TUN/TAP clone device that has not been attached to an interface yet.
pub struct Tap {
    fd: libc::c_int,
}

/// A TAP interface attached to this process. At this phase of the device's lifecycle, frames can
/// be read from and written to it.
pub struct BoundTap {
    fd: libc::c_int,
    name: String,
}

impl Tap {
    /// Opens the TUN/TAP clone device.
    pub fn new() -> io::Result<Self> {
        // This block must be marked as unsafe because it uses FFI with C code. We believe the code
        // in this block to be safe because it passes a NUL-terminated static path and does not
        // interact with any other memory owned by Rust code.
        let fd = unsafe {
            // Resources:
            // https://www.kernel.org/doc/Documentation/networking/tuntap.txt
            let fd = libc::open(
                linux::TUN_CLONE_DEVICE.as_ptr() as *const libc::c_char,
                libc::O_RDWR | libc::O_CLOEXEC,
            );
            if fd < 0 {
                return Err(io::Error::last_os_error());
            }
            fd
        };
        Ok(Self { fd })
    }

    /// Creates (or attaches to) the TAP interface called `iface`, in Ethernet mode without the
    /// packet information prefix. An empty name lets the kernel pick one; read it back with
    /// `BoundTap::name`. This function consumes the `Tap` instance, as the file descriptor is now
    /// tied to one interface.
    pub fn attach(self, iface: impl AsRef<CStr>) -> io::Result<BoundTap> {
        let requested = iface.as_ref().to_bytes();
        if requested.len() >= libc::IFNAMSIZ {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "interface name is too long",
            ));
        }

        // This block is marked as unsafe because it uses FFI, however, we believe it to be safe
        // because 1) the name copy is bounded by the length check above, and 2) the ifreq lives
        // on this stack frame for the whole ioctl call.
        let name = unsafe {
            let mut ifr: linux::ifreq = MaybeUninit::zeroed().assume_init();
            ptr::copy_nonoverlapping(
                requested.as_ptr() as *const libc::c_char,
                ifr.ifr_ifrn.ifrn_name.as_mut_ptr(),
                requested.len(),
            );
            ifr.ifr_ifru.ifru_flags = linux::IFF_TAP | linux::IFF_NO_PI;

            // ioctl(TUNSETIFF) creates the interface and writes the final name back
            let err = libc::ioctl(self.fd, linux::TUNSETIFF, &mut ifr);
            if err < 0 {
                return Err(io::Error::last_os_error());
            }
            CStr::from_ptr(ifr.ifr_ifrn.ifrn_name.as_ptr())
                .to_string_lossy()
                .into_owned()
        };
        let fd = self.fd;
        // The descriptor now belongs to the BoundTap; make sure `self` does not close it.
        mem::forget(self);
        Ok(BoundTap { fd, name })
    }
}

impl BoundTap {
    /// The name the kernel gave the interface.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Sets IFF_UP on the interface. Needs CAP_NET_ADMIN.
    pub fn set_up(&self) -> io::Result<()> {
        // Interface flags are read and written through any socket; a throwaway UDP socket is the
        // conventional choice. The socket is closed on every path out of this block.
        unsafe {
            let sock = libc::socket(libc::AF_INET, libc::SOCK_DGRAM, 0);
            if sock < 0 {
                return Err(io::Error::last_os_error());
            }

            let mut ifr: linux::ifreq = MaybeUninit::zeroed().assume_init();
            let name = self.name.as_bytes();
            ptr::copy_nonoverlapping(
                name.as_ptr() as *const libc::c_char,
                ifr.ifr_ifrn.ifrn_name.as_mut_ptr(),
                name.len().min(libc::IFNAMSIZ - 1),
            );

            // Resources:
            // man 7 netdevice
            if libc::ioctl(sock, linux::SIOCGIFFLAGS, &mut ifr) < 0 {
                let err = io::Error::last_os_error();
                libc::close(sock);
                return Err(err);
            }
            ifr.ifr_ifru.ifru_flags |= libc::IFF_UP as libc::c_short;
            if libc::ioctl(sock, linux::SIOCSIFFLAGS, &mut ifr) < 0 {
                let err = io::Error::last_os_error();
                libc::close(sock);
                return Err(err);
            }
            libc::close(sock);
        }
        Ok(())
    }

    /// Duplicates the descriptor, so frames can be read through one handle and written through
    /// the other. Both handles refer to the same interface queue.
    pub fn try_clone(&self) -> io::Result<BoundTap> {
        // fcntl(F_DUPFD_CLOEXEC) only takes integers, no Rust memory is lent to C.
        let fd = unsafe { libc::fcntl(self.fd, libc::F_DUPFD_CLOEXEC, 0) };
        if fd < 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(BoundTap {
            fd,
            name: self.name.clone(),
        })
    }

    /// Configures the device's non-blocking status.
    pub fn set_nonblocking(&mut self, nonblocking: bool) -> io::Result<()> {
        // See the socket flag handling in `set_up`; fcntl failures are reported, and no Rust
        // memory is lent to C.
        unsafe {
            let flags = libc::fcntl(self.fd, libc::F_GETFL);
            if flags < 0 {
                return Err(io::Error::last_os_error());
            }
            let new_flags = if nonblocking {
                flags | libc::O_NONBLOCK
            } else {
                flags & (!libc::O_NONBLOCK)
            };
            if libc::fcntl(self.fd, libc::F_SETFL, new_flags) < 0 {
                return Err(io::Error::last_os_error());
            }
        }
        Ok(())
    }

    /// Writes one frame to the interface.
    pub fn send(&mut self, frame: &[u8]) -> io::Result<usize> {
        // This block is marked as unsafe because it uses FFI. We believe this code to be safe,
        // because it safely borrows the Rust-owned frame and passes its length along.
        let bytes = unsafe { libc::write(self.fd, frame.as_ptr() as *const _, frame.len()) };
        if bytes < 0 {
            Err(io::Error::last_os_error())
        } else {
            Ok(bytes as usize)
        }
    }

    /// Reads one frame from the interface, blocking until one arrives unless the device is
    /// non-blocking. Frames longer than `frame` are cut short by the kernel.
    pub fn recv(&mut self, frame: &mut [u8]) -> io::Result<usize> {
        // Note comment in `send` call.
        let bytes = unsafe { libc::read(self.fd, frame.as_mut_ptr() as *mut _, frame.len()) };
        if bytes < 0 {
            Err(io::Error::last_os_error())
        } else {
            Ok(bytes as usize)
        }
    }
}

impl AsRawFd for BoundTap {
    fn as_raw_fd(&self) -> RawFd {
        self.fd
    }
}

impl Drop for Tap {
    fn drop(&mut self) {
        unsafe {
            libc::close(self.fd);
        }
    }
}

impl Drop for BoundTap {
    fn drop(&mut self) {
        unsafe {
            libc::close(self.fd);
        }
    }
}
