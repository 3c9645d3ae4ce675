//! ZIP code to state lookup
//!
//! Ranges follow USPS ZIP code prefix assignments. Single ZIP codes that
//! belong to a different state than their surrounding range are listed
//! first and win.

/// `(first, last, state)` inclusive ranges over the five-digit ZIP value
const EXCEPTIONS: &[(u32, u32, &str)] = &[
    (501, 501, "NY"),
    (544, 544, "NY"),
    (5501, 5544, "MA"),
    (6390, 6390, "NY"),
    (73301, 73301, "TX"),
    (83414, 83414, "WY"),
];

const RANGES: &[(u32, u32, &str)] = &[
    (600, 999, "PR"),
    (1000, 2799, "MA"),
    (2800, 2999, "RI"),
    (3000, 3899, "NH"),
    (3900, 4999, "ME"),
    (5000, 5999, "VT"),
    (6000, 6999, "CT"),
    (7000, 8999, "NJ"),
    (10000, 14999, "NY"),
    (15000, 19699, "PA"),
    (19700, 19999, "DE"),
    (20000, 20099, "DC"),
    (20100, 20199, "VA"),
    (20200, 20599, "DC"),
    (20600, 21999, "MD"),
    (22000, 24699, "VA"),
    (24700, 26999, "WV"),
    (27000, 28999, "NC"),
    (29000, 29999, "SC"),
    (30000, 31999, "GA"),
    (32000, 34999, "FL"),
    (35000, 36999, "AL"),
    (37000, 38599, "TN"),
    (38600, 39799, "MS"),
    (39800, 39999, "GA"),
    (40000, 42999, "KY"),
    (43000, 45999, "OH"),
    (46000, 47999, "IN"),
    (48000, 49999, "MI"),
    (50000, 52999, "IA"),
    (53000, 54999, "WI"),
    (55000, 56799, "MN"),
    (56900, 56999, "DC"),
    (57000, 57999, "SD"),
    (58000, 58999, "ND"),
    (59000, 59999, "MT"),
    (60000, 62999, "IL"),
    (63000, 65999, "MO"),
    (66000, 67999, "KS"),
    (68000, 69999, "NE"),
    (70000, 71599, "LA"),
    (71600, 72999, "AR"),
    (73000, 74999, "OK"),
    (75000, 79999, "TX"),
    (80000, 81999, "CO"),
    (82000, 83199, "WY"),
    (83200, 83999, "ID"),
    (84000, 84999, "UT"),
    (85000, 86999, "AZ"),
    (87000, 88499, "NM"),
    (88500, 88599, "TX"),
    (88900, 89999, "NV"),
    (90000, 96699, "CA"),
    (96700, 96999, "HI"),
    (97000, 97999, "OR"),
    (98000, 99499, "WA"),
    (99500, 99999, "AK"),
];

/// State or territory abbreviation for a five-digit ZIP code
///
/// `None` for malformed input or unassigned prefixes. Territories such as
/// `PR` are returned as-is; callers filter them against the states they
/// accept.
pub fn state_for_zip(zip: &str) -> Option<&'static str> {
    let zip = zip.trim();
    if zip.len() != 5 || !zip.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let value: u32 = zip.parse().ok()?;

    EXCEPTIONS
        .iter()
        .chain(RANGES.iter())
        .find(|(first, last, _)| (*first..=*last).contains(&value))
        .map(|(_, _, state)| *state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_common_prefixes() {
        assert_eq!(state_for_zip("62701"), Some("IL"));
        assert_eq!(state_for_zip("94043"), Some("CA"));
        assert_eq!(state_for_zip("10001"), Some("NY"));
        assert_eq!(state_for_zip("20500"), Some("DC"));
        assert_eq!(state_for_zip("99501"), Some("AK"));
        assert_eq!(state_for_zip(" 35203 "), Some("AL"));
    }

    #[test]
    fn test_exceptions_win_over_ranges() {
        assert_eq!(state_for_zip("06390"), Some("NY"));
        assert_eq!(state_for_zip("05501"), Some("MA"));
        assert_eq!(state_for_zip("05601"), Some("VT"));
        assert_eq!(state_for_zip("73301"), Some("TX"));
    }

    #[test]
    fn test_unknown_or_malformed() {
        assert_eq!(state_for_zip("00100"), None);
        assert_eq!(state_for_zip("88700"), None);
        assert_eq!(state_for_zip("6270"), None);
        assert_eq!(state_for_zip("62701-1234"), None);
        assert_eq!(state_for_zip(""), None);
    }

    #[test]
    fn test_territory_is_reported() {
        assert_eq!(state_for_zip("00901"), Some("PR"));
    }
}
