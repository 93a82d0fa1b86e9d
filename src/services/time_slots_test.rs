#[cfg(test)]
mod time_slots_tests {
    use crate::services::time_slots::{intervals_overlap, to_minutes};

    #[test]
    fn test_to_minutes_standard_format() {
        assert_eq!(to_minutes("00:00"), 0);
        assert_eq!(to_minutes("09:00"), 540);
        assert_eq!(to_minutes("09:30"), 570);
        assert_eq!(to_minutes("23:59"), 1439);
    }

    #[test]
    fn test_to_minutes_lenient_parsing() {
        // Missing or non-numeric components default to zero. This leniency
        // is part of the contract; the assertions pin it down.
        assert_eq!(to_minutes(""), 0);
        assert_eq!(to_minutes("9"), 540);
        assert_eq!(to_minutes("9:"), 540);
        assert_eq!(to_minutes(":30"), 30);
        assert_eq!(to_minutes("abc:30"), 30);
        assert_eq!(to_minutes("10:xx"), 600);
        assert_eq!(to_minutes("garbage"), 0);
    }

    #[test]
    fn test_to_minutes_ignores_surrounding_whitespace() {
        assert_eq!(to_minutes(" 9 : 30 "), 570);
    }

    #[test]
    fn test_overlap_basic() {
        // Partial overlap both directions
        assert!(intervals_overlap(540, 600, 570, 630));
        assert!(intervals_overlap(570, 630, 540, 600));

        // Containment
        assert!(intervals_overlap(540, 660, 570, 600));
        assert!(intervals_overlap(570, 600, 540, 660));

        // Identical
        assert!(intervals_overlap(540, 600, 540, 600));
    }

    #[test]
    fn test_overlap_half_open_boundaries() {
        // [09:00,10:00) and [10:00,11:00) are adjacent, not overlapping
        assert!(!intervals_overlap(540, 600, 600, 660));
        assert!(!intervals_overlap(600, 660, 540, 600));

        // Disjoint with a gap
        assert!(!intervals_overlap(540, 600, 660, 720));
    }

    #[test]
    fn test_overlap_degenerate_intervals() {
        // A zero-length interval strictly inside another still trips the
        // raw rule; sitting on a boundary does not
        assert!(intervals_overlap(600, 600, 540, 660));
        assert!(!intervals_overlap(600, 600, 540, 600));

        // Inverted interval follows the same raw rule: e1 <= s2 fails and
        // s1 >= e2 fails, so the pair still counts as overlapping
        assert!(intervals_overlap(660, 600, 540, 720));
    }
}
