//! Unit tests for the identifier newtypes

use core_kernel::{CustomerId, InstallmentId, ObservationId, OrderId};

mod record_ids {
    use super::*;

    #[test]
    fn test_display_carries_the_prefix() {
        assert_eq!(OrderId::new(175).to_string(), "ORD-175");
        assert_eq!(InstallmentId::new(31).to_string(), "ABO-31");
        assert_eq!(ObservationId::new(9).to_string(), "BCV-9");
    }

    #[test]
    fn test_parse_accepts_prefixed_and_bare_forms() {
        assert_eq!("ORD-175".parse::<OrderId>().unwrap(), OrderId::new(175));
        assert_eq!("175".parse::<OrderId>().unwrap(), OrderId::new(175));
        assert!("ORD-abc".parse::<OrderId>().is_err());
    }

    #[test]
    fn test_ids_order_by_raw_value() {
        let mut ids = vec![OrderId::new(30), OrderId::new(2), OrderId::new(17)];
        ids.sort();
        assert_eq!(ids, vec![OrderId::new(2), OrderId::new(17), OrderId::new(30)]);
    }

    #[test]
    fn test_serde_is_transparent() {
        let json = serde_json::to_string(&OrderId::new(175)).unwrap();
        assert_eq!(json, "175");

        let back: OrderId = serde_json::from_str("175").unwrap();
        assert_eq!(back, OrderId::new(175));
    }
}

mod customer_ids {
    use super::*;

    #[test]
    fn test_entry_variants_normalize_to_one_customer() {
        let canonical = CustomerId::new("V-12345678");
        assert_eq!(CustomerId::new(" v-12345678 "), canonical);
        assert_eq!(CustomerId::new("v-12345678"), canonical);
    }

    #[test]
    fn test_distinct_prefixes_stay_distinct() {
        // Cedula vs company RIF.
        assert_ne!(CustomerId::new("V-12345678"), CustomerId::new("J-12345678"));
    }
}
