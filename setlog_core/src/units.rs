//! Weight unit conversion and display formatting.
//!
//! Kilograms are the canonical storage unit. Pounds exist only at the input
//! and display boundaries, each with its own rounding rule:
//! - storage: lb -> kg rounded to 2 decimals
//! - display: kg -> lb rounded to a whole number
//!
//! The two roundings are independent, so a value entered in lb, stored as kg
//! and redisplayed in lb may differ from the input by up to 1 lb. That
//! asymmetry is part of the contract, not a bug to fix.

const KG_PER_LB: f64 = 0.453592;
const LB_PER_KG: f64 = 2.20462;

/// Convert pounds to kilograms, rounded to 2 decimals (storage precision)
pub fn lbs_to_kg(lbs: f64) -> f64 {
    (lbs * KG_PER_LB * 100.0).round() / 100.0
}

/// Convert kilograms to a whole-number pound value for display
pub fn kg_to_lbs_display(kg: f64) -> i64 {
    (kg * LB_PER_KG).round() as i64
}

/// Format a stored kilogram value for display.
///
/// Metric shows kg rounded to 1 decimal (no trailing `.0`) with a `kg`
/// suffix; imperial shows the whole-number lb value with an `lb` suffix.
pub fn display_weight(kg: f64, use_metric: bool) -> String {
    if use_metric {
        let tenths = (kg * 10.0).round() as i64;
        if tenths % 10 == 0 {
            format!("{}kg", tenths / 10)
        } else {
            format!("{:.1}kg", tenths as f64 / 10.0)
        }
    } else {
        format!("{}lb", kg_to_lbs_display(kg))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lbs_to_kg_storage_rounding() {
        // 22 lb = 9.979024 kg, stored at 2 decimals
        assert_eq!(lbs_to_kg(22.0), 9.98);
        assert_eq!(lbs_to_kg(0.0), 0.0);
        assert_eq!(lbs_to_kg(45.0), 20.41);
    }

    #[test]
    fn test_kg_to_lbs_whole_number() {
        assert_eq!(kg_to_lbs_display(60.0), 132);
        assert_eq!(kg_to_lbs_display(9.98), 22);
        assert_eq!(kg_to_lbs_display(0.0), 0);
    }

    #[test]
    fn test_display_metric() {
        assert_eq!(display_weight(60.0, true), "60kg");
        assert_eq!(display_weight(62.5, true), "62.5kg");
        assert_eq!(display_weight(62.55, true), "62.6kg");
    }

    #[test]
    fn test_display_imperial_round_trip_whole_pounds() {
        // Whole-pound inputs survive the storage rounding
        assert_eq!(display_weight(lbs_to_kg(22.0), false), "22lb");
        assert_eq!(display_weight(lbs_to_kg(135.0), false), "135lb");
    }

    #[test]
    fn test_fractional_pounds_need_not_round_trip() {
        // 22.3 lb -> 10.12 kg -> 22 lb: the display drops the fraction.
        // Assert the specific rounding rule rather than exact round-trip.
        let kg = lbs_to_kg(22.3);
        assert_eq!(kg, 10.12);
        assert_eq!(display_weight(kg, false), "22lb");
    }
}
