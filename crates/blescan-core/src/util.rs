//! Utility functions for blescan-core.

use btleplug::platform::PeripheralId;

/// The address CoreBluetooth reports for every peripheral.
const ZERO_ADDRESS: &str = "00:00:00:00:00:00";

/// Format a peripheral ID as a string.
///
/// On macOS, peripheral IDs are UUIDs. On other platforms they wrap the
/// Bluetooth address.
pub fn format_peripheral_id(id: &PeripheralId) -> String {
    format!("{:?}", id)
        .trim_start_matches("PeripheralId(")
        .trim_end_matches(')')
        .to_string()
}

/// Create an identifier string from an address and peripheral ID.
///
/// On macOS where addresses are 00:00:00:00:00:00, uses the peripheral ID.
/// On other platforms, uses the Bluetooth address.
pub fn create_identifier(address: &str, peripheral_id: &PeripheralId) -> String {
    if is_zero_address(address) {
        format_peripheral_id(peripheral_id)
    } else {
        address.to_string()
    }
}

/// True for the placeholder address macOS hands out.
pub fn is_zero_address(address: &str) -> bool {
    address == ZERO_ADDRESS
}

#[cfg(test)]
mod tests {
    use super::*;

    // PeripheralId cannot be built portably in tests, so only the address
    // helpers are covered here.

    #[test]
    fn test_zero_address_detection() {
        assert!(is_zero_address("00:00:00:00:00:00"));
        assert!(!is_zero_address("AA:BB:CC:DD:EE:FF"));
    }
}
