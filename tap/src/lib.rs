//! Thin, safe wrapper around a Linux TAP device: a kernel pseudo-interface that hands whole
//! Ethernet frames to user space and accepts whole frames back.
#![cfg(target_os = "linux")]
mod linux;
mod device;

pub use device::{BoundTap, Tap};
