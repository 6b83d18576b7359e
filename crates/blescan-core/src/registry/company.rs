//! Bluetooth SIG company identifier table.
//!
//! Company identifiers tag manufacturer-specific advertisement payloads. Only
//! the vendors commonly seen around desks and homes are listed.

use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::LazyLock;

/// Apple's company identifier (0x004C).
pub const APPLE: u16 = 76;
/// Microsoft's company identifier (0x0006).
pub const MICROSOFT: u16 = 6;
/// Samsung's company identifier (0x0075).
pub const SAMSUNG: u16 = 117;
/// Google's company identifier (0x00E0).
pub const GOOGLE: u16 = 224;
/// Xiaomi's company identifier (0x0157).
pub const XIAOMI: u16 = 343;

const COMPANY_ENTRIES: &[(u16, &str)] = &[
    (0, "Ericsson Technology Licensing"),
    (1, "Nokia Mobile Phones"),
    (2, "Intel Corp."),
    (3, "IBM Corp."),
    (4, "Toshiba Corp."),
    (5, "3Com"),
    (MICROSOFT, "Microsoft"),
    (7, "Lucent"),
    (8, "Motorola"),
    (9, "Infineon Technologies AG"),
    (10, "Qualcomm Technologies International, Ltd."),
    (15, "Broadcom Corporation"),
    (29, "Texas Instruments Inc."),
    (48, "Hewlett-Packard Company"),
    (57, "AVM Berlin"),
    (69, "Aruba Networks"),
    (APPLE, "Apple, Inc."),
    (89, "BlackBerry Limited"),
    (SAMSUNG, "Samsung Electronics Co. Ltd."),
    (GOOGLE, "Google"),
    (XIAOMI, "Xiaomi Inc."),
    (2050, "Amazon.com Services, Inc."),
];

static COMPANY_TABLE: LazyLock<HashMap<u16, &'static str>> =
    LazyLock::new(|| COMPANY_ENTRIES.iter().copied().collect());

/// Look up a company identifier, returning `None` when it is not listed.
///
/// Identifiers above `u16::MAX` cannot be assigned and always miss.
pub fn lookup_company(company_id: u32) -> Option<&'static str> {
    let id = u16::try_from(company_id).ok()?;
    COMPANY_TABLE.get(&id).copied()
}

/// Company name for an identifier, or a label that keeps the identifier so
/// distinct unknown companies stay distinguishable.
///
/// ```
/// use blescan_core::registry::company_name;
///
/// assert_eq!(company_name(76), "Apple, Inc.");
/// assert_eq!(company_name(99999), "Unknown company (ID: 99999)");
/// ```
pub fn company_name(company_id: u32) -> Cow<'static, str> {
    match lookup_company(company_id) {
        Some(name) => Cow::Borrowed(name),
        None => Cow::Owned(format!("Unknown company (ID: {})", company_id)),
    }
}
