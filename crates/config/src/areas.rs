//! Hurghada service areas
//!
//! The booking form offers this fixed list plus an "Other" sentinel that
//! switches the area input to free text.

/// Sentinel that forces free-text area entry
pub const OTHER_AREA: &str = "Other";

const SERVICE_AREAS: &[&str] = &[
    "El Kawther",
    "El Mamsha",
    "Sheraton Road",
    "Arabia / Arabella",
    "El Helal",
    "Intercontinental",
    "Magawish",
    "Sahl Hasheesh",
    "Makadi Bay",
    "El Gouna",
    "Soma Bay",
    OTHER_AREA,
];

/// All selectable areas, ending with the "Other" sentinel
pub fn service_areas() -> &'static [&'static str] {
    SERVICE_AREAS
}

/// Default area pre-selected in forms
pub fn default_area() -> &'static str {
    SERVICE_AREAS[0]
}

/// Check if the given selection is the free-text sentinel
pub fn is_other(area: &str) -> bool {
    area.eq_ignore_ascii_case(OTHER_AREA)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_area_list() {
        assert_eq!(default_area(), "El Kawther");
        assert_eq!(*service_areas().last().unwrap(), OTHER_AREA);
        assert!(service_areas().contains(&"Sahl Hasheesh"));
    }

    #[test]
    fn test_other_sentinel() {
        assert!(is_other("Other"));
        assert!(is_other("other"));
        assert!(!is_other("El Gouna"));
    }
}
