//! # What are they for?
//!
//! Classifiers look at a frame by reference, without modifying it, and decide which group it
//! belongs to. The stack uses the class to pick the protocol handler the frame is dispatched to.
mod ether_type;
pub use self::ether_type::*;

/// Used by the stack to determine the kind of frame we have. Classifier::Class is then matched
/// on to send the frame down the appropriate path.
pub trait Classifier {
    type Packet: Send + Clone;
    type Class: Sized;

    fn classify(&self, packet: &Self::Packet) -> Self::Class;
}
