//! MAC address OUI (first three octets) to manufacturer table.

use std::collections::HashMap;
use std::sync::LazyLock;

/// OUI prefixes as six upper-case hex digits.
///
/// `00:50:F2` appears under both Microsoft and Intel in common OUI cheat
/// sheets; the later Intel entry wins, as it would in a map built in order.
const OUI_ENTRIES: &[(&str, &str)] = &[
    ("000000", "Xerox"),
    ("0001C8", "Hewlett Packard"),
    ("000C29", "VMware"),
    ("001B63", "Apple"),
    ("00A040", "Apple"),
    ("28E02C", "Apple"),
    ("2C5490", "Apple"),
    ("3CAB8E", "Apple"),
    ("4025C2", "Apple"),
    ("509EA7", "Apple"),
    ("68AB1E", "Apple"),
    ("6C2483", "Apple"),
    ("7CFA4E", "Apple"),
    ("84F3EB", "Apple"),
    ("8C2937", "Apple"),
    ("90B21F", "Apple"),
    ("A4C361", "Apple"),
    ("B8E856", "Apple"),
    ("C82A14", "Apple"),
    ("D023DB", "Apple"),
    ("E4C63D", "Apple"),
    ("E8802E", "Apple"),
    ("EC8892", "Apple"),
    ("F01C13", "Apple"),
    ("F40E22", "Apple"),
    ("0050F2", "Microsoft"),
    ("00155D", "Microsoft"),
    ("001DD8", "Microsoft"),
    ("0017FA", "Microsoft"),
    ("7C1E52", "Microsoft"),
    ("000272", "Intel"),
    ("001B77", "Intel"),
    ("0050F2", "Intel"),
    ("24F5AA", "Intel"),
    ("34E6AD", "Intel"),
    ("7085C2", "Intel"),
    ("001377", "Samsung"),
    ("002454", "Samsung"),
    ("00374A", "Samsung"),
    ("003EE1", "Samsung"),
    ("74DA38", "Samsung"),
    ("C869CD", "Samsung"),
    ("E84E06", "Samsung"),
    ("F09FC2", "Samsung"),
    ("000F86", "Huawei"),
    ("001E10", "Huawei"),
    ("003048", "Huawei"),
    ("00664C", "Huawei"),
    ("001CF0", "LG Electronics"),
    ("001E75", "LG Electronics"),
    ("002140", "LG Electronics"),
    ("0021D1", "LG Electronics"),
    ("00E04C", "Realtek"),
    ("52540E", "Realtek"),
    ("9CEB2E", "Realtek"),
    ("B0359E", "Realtek"),
];

static OUI_TABLE: LazyLock<HashMap<&'static str, &'static str>> =
    LazyLock::new(|| OUI_ENTRIES.iter().copied().collect());

/// Normalize an address to its OUI key: separators removed, upper-cased,
/// first six hex digits.
///
/// Returns `None` when fewer than six hex digits remain.
pub fn oui_key(address: &str) -> Option<String> {
    let digits: String = address
        .chars()
        .filter(|c| *c != ':' && *c != '-')
        .take(6)
        .map(|c| c.to_ascii_uppercase())
        .collect();

    (digits.len() == 6 && digits.chars().all(|c| c.is_ascii_hexdigit())).then_some(digits)
}

/// Look up the manufacturer for a MAC address.
///
/// Accepts `:` or `-` separated addresses in either case.
///
/// ```
/// use blescan_core::registry::lookup_oui;
///
/// assert_eq!(lookup_oui("a4:c3:61:12:34:56"), Some("Apple"));
/// assert_eq!(lookup_oui("00-15-5D-00-00-01"), Some("Microsoft"));
/// assert_eq!(lookup_oui("12:34:56:78:9A:BC"), None);
/// ```
pub fn lookup_oui(address: &str) -> Option<&'static str> {
    let key = oui_key(address)?;
    OUI_TABLE.get(key.as_str()).copied()
}
