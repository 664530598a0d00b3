//! Helpers for HCI wire byte order.
//!
//! Multi-octet HCI header fields are transmitted little-endian. Keeping the
//! conversions here scopes the Clippy expectations to one place so the packet
//! code can stay explicit about endianness.

/// Serialise a `u16` in HCI byte order (little-endian).
///
/// # Examples
///
/// ```
/// use hciframe::byte_order::write_hci_u16;
///
/// assert_eq!(write_hci_u16(0x0C03), [0x03, 0x0C]);
/// ```
#[must_use]
pub fn write_hci_u16(value: u16) -> [u8; 2] {
    #[expect(
        clippy::little_endian_bytes,
        reason = "HCI header fields are little-endian on the wire."
    )]
    value.to_le_bytes()
}

/// Parse an HCI-order `u16` from its on-wire representation.
///
/// # Examples
///
/// ```
/// use hciframe::byte_order::read_hci_u16;
///
/// assert_eq!(read_hci_u16([0x03, 0x0C]), 0x0C03);
/// ```
#[must_use]
pub fn read_hci_u16(bytes: [u8; 2]) -> u16 {
    #[expect(
        clippy::little_endian_bytes,
        reason = "HCI header fields are little-endian on the wire."
    )]
    u16::from_le_bytes(bytes)
}
