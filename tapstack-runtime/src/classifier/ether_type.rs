use crate::classifier::Classifier;
use tapstack_packets::{EtherKind, EthernetFrame};

/// Sorts frames by their EtherType.
#[derive(Clone, Copy, Debug, Default)]
pub struct ByEtherType {}

impl ByEtherType {
    pub fn new() -> Self {
        ByEtherType {}
    }
}

impl Classifier for ByEtherType {
    type Packet = EthernetFrame;
    type Class = EtherKind;

    fn classify(&self, frame: &Self::Packet) -> Self::Class {
        frame.kind()
    }
}
