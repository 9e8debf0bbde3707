//! AIS Ship Types
//!
//! Lookup of the ship and cargo type codes carried in AIS static data
//! (ITU-R M.1371, message 5). Each code has a descriptive string and
//! belongs to a coarse category used for filtering.
//!
//! | Codes  | Category  |
//! |--------|-----------|
//! | 30     | Fishing   |
//! | 31-35  | Special (towing, dredging, diving, military) |
//! | 40-49  | Passenger (high speed craft) |
//! | 50-59  | Special (pilot, SAR, tug, tender, ...) |
//! | 60-69  | Passenger |
//! | 70-79  | Cargo     |
//! | 80-89  | Tanker    |
//! | other  | Unknown   |
//!
//! Wing in ground, sailing, pleasure craft and "other type" codes keep their
//! descriptive string but fall in the Unknown category.
//!
//! Anything else, including 0 ("not available"), is `Unknown`. Buoys,
//! net beacons and other non-vessel transmitters usually end up there.

/// Category and type string for codes outside the table
pub const UNKNOWN: &str = "Unknown";

/// Descriptive string for an AIS ship type code
pub fn ship_type_string(code: i32) -> &'static str {
    match code {
        20 => "Wing in ground (WIG), all ships of this type",
        21 => "Wing in ground (WIG), Hazardous category A",
        22 => "Wing in ground (WIG), Hazardous category B",
        23 => "Wing in ground (WIG), Hazardous category C",
        24 => "Wing in ground (WIG), Hazardous category D",
        25..=29 => "Wing in ground (WIG), Reserved for future use",
        30 => "Fishing",
        31 => "Towing",
        32 => "Towing: length exceeds 200m or breadth exceeds 25m",
        33 => "Dredging or underwater ops",
        34 => "Diving ops",
        35 => "Military ops",
        36 => "Sailing",
        37 => "Pleasure Craft",
        38 | 39 => "Reserved",
        40 => "High speed craft (HSC), all ships of this type",
        41 => "High speed craft (HSC), Hazardous category A",
        42 => "High speed craft (HSC), Hazardous category B",
        43 => "High speed craft (HSC), Hazardous category C",
        44 => "High speed craft (HSC), Hazardous category D",
        45..=48 => "High speed craft (HSC), Reserved for future use",
        49 => "High speed craft (HSC), No additional information",
        50 => "Pilot Vessel",
        51 => "Search and Rescue vessel",
        52 => "Tug",
        53 => "Port Tender",
        54 => "Anti-pollution equipment",
        55 => "Law Enforcement",
        56 | 57 => "Spare - Local Vessel",
        58 => "Medical Transport",
        59 => "Noncombatant ship according to RR Resolution No. 18",
        60 => "Passenger, all ships of this type",
        61 => "Passenger, Hazardous category A",
        62 => "Passenger, Hazardous category B",
        63 => "Passenger, Hazardous category C",
        64 => "Passenger, Hazardous category D",
        65..=68 => "Passenger, Reserved for future use",
        69 => "Passenger, No additional information",
        70 => "Cargo, all ships of this type",
        71 => "Cargo, Hazardous category A",
        72 => "Cargo, Hazardous category B",
        73 => "Cargo, Hazardous category C",
        74 => "Cargo, Hazardous category D",
        75..=78 => "Cargo, Reserved for future use",
        79 => "Cargo, No additional information",
        80 => "Tanker, all ships of this type",
        81 => "Tanker, Hazardous category A",
        82 => "Tanker, Hazardous category B",
        83 => "Tanker, Hazardous category C",
        84 => "Tanker, Hazardous category D",
        85..=88 => "Tanker, Reserved for future use",
        89 => "Tanker, No additional information",
        90 => "Other Type, all ships of this type",
        91 => "Other Type, Hazardous category A",
        92 => "Other Type, Hazardous category B",
        93 => "Other Type, Hazardous category C",
        94 => "Other Type, Hazardous category D",
        95..=98 => "Other Type, Reserved for future use",
        99 => "Other Type, no additional information",
        _ => UNKNOWN,
    }
}

/// Coarse category for an AIS ship type code
pub fn ship_category(code: i32) -> &'static str {
    match code {
        30 => "Fishing",
        31..=35 | 50..=59 => "Special",
        40..=49 | 60..=69 => "Passenger",
        70..=79 => "Cargo",
        80..=89 => "Tanker",
        _ => UNKNOWN,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_ship_types() {
        assert_eq!(ship_type_string(30), "Fishing");
        assert_eq!(ship_type_string(52), "Tug");
        assert_eq!(ship_type_string(60), "Passenger, all ships of this type");
        assert_eq!(ship_type_string(70), "Cargo, all ships of this type");
        assert_eq!(ship_type_string(80), "Tanker, all ships of this type");
        assert_eq!(ship_type_string(37), "Pleasure Craft");
    }

    #[test]
    fn test_unknown_ship_type() {
        assert_eq!(ship_type_string(0), "Unknown");
        assert_eq!(ship_type_string(999), "Unknown");
        assert_eq!(ship_type_string(-1), "Unknown");
        assert_eq!(ship_type_string(15), "Unknown");
    }

    #[test]
    fn test_ship_categories() {
        assert_eq!(ship_category(30), "Fishing");
        assert_eq!(ship_category(52), "Special");
        assert_eq!(ship_category(60), "Passenger");
        assert_eq!(ship_category(70), "Cargo");
        assert_eq!(ship_category(80), "Tanker");
        assert_eq!(ship_category(41), "Passenger");
        assert_eq!(ship_category(35), "Special");
        assert_eq!(ship_category(89), "Tanker");
    }

    #[test]
    fn test_leisure_and_other_types_are_unknown() {
        for code in [20, 29, 36, 37, 38, 39, 90, 95, 99] {
            assert_ne!(ship_type_string(code), UNKNOWN, "code {}", code);
            assert_eq!(ship_category(code), UNKNOWN, "code {}", code);
        }
    }

    #[test]
    fn test_unknown_category() {
        assert_eq!(ship_category(0), "Unknown");
        assert_eq!(ship_category(1), "Unknown");
        assert_eq!(ship_category(100), "Unknown");
        assert_eq!(ship_category(-7), "Unknown");
    }

    #[test]
    fn test_categorised_codes_have_a_type_string() {
        for code in -5..=120 {
            if ship_category(code) != UNKNOWN {
                assert_ne!(ship_type_string(code), UNKNOWN, "code {}", code);
            }
        }
    }
}
