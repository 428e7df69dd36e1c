/// RFC 1071 Internet checksum.
///
/// The bytes are summed as big-endian 16-bit words into a 32-bit
/// accumulator; an odd trailing byte counts as the high byte of a final
/// word. Carries above bit 15 are folded back in until none remain and the
/// complement of the low 16 bits is returned. Running it over a header whose
/// checksum field is already correct yields 0.
pub fn internet_checksum(data: &[u8]) -> u16 {
    let mut chunks = data.chunks_exact(2);
    let mut sum = chunks.by_ref().fold(0u32, |acc, word| {
        acc.wrapping_add(u32::from(u16::from_be_bytes([word[0], word[1]])))
    });
    if let [odd] = chunks.remainder() {
        sum = sum.wrapping_add(u32::from(*odd) << 8);
    }
    while sum >> 16 != 0 {
        sum = (sum & 0xffff) + (sum >> 16);
    }
    !(sum as u16)
}
