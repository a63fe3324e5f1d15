//! Tests for settlement and line item identifiers

use core_kernel::{LineItemId, SettlementId};

mod settlement_id_tests {
    use super::*;

    #[test]
    fn test_new_generates_unique_ids() {
        assert_ne!(SettlementId::new(), SettlementId::new());
    }

    #[test]
    fn test_new_v7_is_time_ordered() {
        let first = SettlementId::new_v7();
        std::thread::sleep(std::time::Duration::from_millis(2));
        let second = SettlementId::new_v7();
        assert!(first.as_uuid() < second.as_uuid());
    }

    #[test]
    fn test_display_round_trips_through_from_str() {
        let id = SettlementId::new();
        let shown = id.to_string();
        assert!(shown.starts_with("STL-"));
        assert_eq!(shown.parse::<SettlementId>().unwrap(), id);
    }

    #[test]
    fn test_from_str_accepts_bare_uuid() {
        let id = SettlementId::new();
        let parsed: SettlementId = id.as_uuid().to_string().parse().unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn test_from_str_rejects_garbage() {
        assert!("STL-not-a-uuid".parse::<SettlementId>().is_err());
    }

    #[test]
    fn test_serializes_as_bare_uuid() {
        let id = SettlementId::new();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", id.as_uuid()));
    }
}

mod line_item_id_tests {
    use super::*;

    #[test]
    fn test_display_prefix() {
        assert!(LineItemId::new().to_string().starts_with("LI-"));
    }

    #[test]
    fn test_other_prefix_is_rejected() {
        let settlement = SettlementId::new().to_string();
        assert!(settlement.parse::<LineItemId>().is_err());
    }
}
