//! Mapping between display column headers and row field keys

/// Curated header → key overrides. Lookups use the lower-cased header.
const OVERRIDES: &[(&str, &str)] = &[
    ("device type", "deviceType"),
    ("network access", "networkAccess"),
    ("address type", "addressType"),
    ("ip address", "ipAddress"),
    ("mac address", "macAddress"),
    ("switch port", "switchPort"),
    ("room/system name", "roomName"),
    ("codec model", "codecModel"),
    ("serial number", "serialNumber"),
    ("firmware version", "firmwareVersion"),
    ("license type", "licenseType"),
    ("provisioning status", "status"),
    ("model #", "model"),
    ("serial #", "serial"),
    ("connected device", "device"),
    ("cable id", "cableId"),
    ("room", "room"),
    ("equipment id", "equipmentId"),
    ("mfg", "mfg"),
    ("ip id", "ipId"),
];

/// Convert a display header (e.g. "IP Address") to its field key ("ipAddress").
///
/// Headers outside the curated table fall back to the lower-cased header
/// with everything except `a-z` and `0-9` removed. The fallback is flat,
/// not camelCase: "Device Label #" becomes "devicelabel".
pub fn field_key(header: &str) -> String {
    let lower = header.to_lowercase();
    if let Some((_, key)) = OVERRIDES.iter().find(|(h, _)| *h == lower) {
        return (*key).to_string();
    }
    lower
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::reference::EQUIPMENT_HEADERS;

    #[test]
    fn test_equipment_headers_map_to_camel_case() {
        let keys: Vec<String> = EQUIPMENT_HEADERS.iter().map(|h| field_key(h)).collect();
        assert_eq!(
            keys,
            vec![
                "room",
                "equipmentId",
                "mfg",
                "model",
                "serial",
                "ipAddress",
                "macAddress",
                "ipId",
                "switchPort",
                "firmwareVersion",
                "notes",
            ]
        );
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        assert_eq!(field_key("IP ADDRESS"), "ipAddress");
        assert_eq!(field_key("model #"), "model");
    }

    #[test]
    fn test_fallback_strips_punctuation_without_camel_case() {
        assert_eq!(field_key("Rack Unit / Slot #"), "rackunitslot");
        assert_eq!(field_key("Power (W)"), "powerw");
        assert_eq!(field_key(""), "");
    }

    #[test]
    fn test_idempotent_on_equipment_keys() {
        for header in EQUIPMENT_HEADERS {
            let once = field_key(header);
            // camelCase keys are not in the override table, so only the
            // already-flat ones are fixed points of the sanitizer
            if once.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()) {
                assert_eq!(field_key(&once), once);
            }
            assert_eq!(field_key(header), once);
        }
    }
}
