//! Random document identifiers.

/// Generates a random version 4 UUID in its canonical hyphenated form.
///
/// The output is 36 lowercase characters grouped 8-4-4-4-12. The version nibble is
/// fixed to `4` and the variant nibble is one of `8`, `9`, `a` or `b`. Bytes come
/// from the thread-local generator of `rand`, so successive calls are independent.
pub fn generate_uuid_v4() -> String {
    let mut bytes: [u8; 16] = rand::random();

    bytes[6] = (bytes[6] & 0x0f) | 0x40; // version 4
    bytes[8] = (bytes[8] & 0x3f) | 0x80; // RFC 4122 variant

    let hex: String = bytes.iter().map(|byte| format!("{:02x}", byte)).collect();
    format!(
        "{}-{}-{}-{}-{}",
        &hex[0..8],
        &hex[8..12],
        &hex[12..16],
        &hex[16..20],
        &hex[20..32]
    )
}
