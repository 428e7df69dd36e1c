use failure::Fail;

/// Reasons a buffer cannot be viewed as a given header.
#[derive(Clone, Debug, Eq, Fail, PartialEq)]
pub enum PacketError {
    #[fail(
        display = "{} is truncated: need {} bytes, have {}",
        layer, needed, actual
    )]
    Truncated {
        layer: &'static str,
        needed: usize,
        actual: usize,
    },

    #[fail(
        display = "frame has ether type {:#06x}, expected {:#06x}",
        actual, expected
    )]
    WrongEtherType { expected: u16, actual: u16 },
}

impl PacketError {
    pub(crate) fn truncated(layer: &'static str, needed: usize, actual: usize) -> Self {
        PacketError::Truncated {
            layer,
            needed,
            actual,
        }
    }
}
