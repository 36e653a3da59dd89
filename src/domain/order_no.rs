use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Human-facing order number: `ORD-<UTC second stamp>-<id prefix>`.
///
/// The suffix comes from the order's own surrogate id, so two orders can
/// only share a number if their UUID prefixes collide within the same
/// second; the unique index on `order_no` backstops that case.
pub fn generate(order_id: Uuid, at: DateTime<Utc>) -> String {
    let stamp = at.format("%Y%m%d%H%M%S");
    let simple = order_id.simple().to_string();
    format!("ORD-{}-{}", stamp, simple[..8].to_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn format_is_stamp_plus_id_prefix() {
        let at = Utc.with_ymd_and_hms(2025, 6, 10, 12, 30, 45).unwrap();
        let id = Uuid::parse_str("a1b2c3d4-0000-4000-8000-000000000000").unwrap();
        assert_eq!(generate(id, at), "ORD-20250610123045-A1B2C3D4");
    }

    #[test]
    fn distinct_orders_get_distinct_numbers() {
        let at = Utc::now();
        let a = generate(Uuid::new_v4(), at);
        let b = generate(Uuid::new_v4(), at);
        assert_ne!(a, b);
    }
}
