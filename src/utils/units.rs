//! Conversions between the stored tenths encoding and display units.
//!
//! Raw observations keep the integer tenths they were ingested with; these
//! helpers are applied only when values are read back or aggregated.

/// Tenths of a degree Celsius to degrees Celsius.
pub fn tenths_to_celsius(tenths: Option<i32>) -> Option<f64> {
    tenths.map(|v| f64::from(v) / 10.0)
}

/// Tenths of a millimetre to millimetres.
pub fn tenths_to_mm(tenths: Option<i32>) -> Option<f64> {
    tenths.map(|v| f64::from(v) / 10.0)
}

/// Mean of tenths-of-°C values to degrees Celsius.
pub fn mean_tenths_to_celsius(mean: Option<f64>) -> Option<f64> {
    mean.map(|v| v / 10.0)
}

/// Summed tenths of a millimetre to centimetres (tenths -> mm -> cm).
pub fn tenths_mm_sum_to_cm(sum: Option<i64>) -> Option<f64> {
    sum.map(|v| v as f64 / 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_temperature_conversion() {
        assert_eq!(tenths_to_celsius(Some(223)), Some(22.3));
        assert_eq!(tenths_to_celsius(Some(-50)), Some(-5.0));
        assert_eq!(tenths_to_celsius(Some(0)), Some(0.0));
        assert_eq!(tenths_to_celsius(None), None);
    }

    #[test]
    fn test_precipitation_conversion() {
        assert_eq!(tenths_to_mm(Some(123)), Some(12.3));
        assert_eq!(tenths_to_mm(None), None);
    }

    #[test]
    fn test_aggregate_conversions() {
        assert_eq!(mean_tenths_to_celsius(Some(150.0)), Some(15.0));
        assert_eq!(mean_tenths_to_celsius(None), None);

        // 20 tenths of a mm = 2 mm = 0.2 cm
        assert_eq!(tenths_mm_sum_to_cm(Some(20)), Some(0.2));
        assert_eq!(tenths_mm_sum_to_cm(Some(0)), Some(0.0));
        assert_eq!(tenths_mm_sum_to_cm(None), None);
    }

    #[test]
    fn test_conversions_match_division() {
        for v in [-9998, -1, 1, 7, 99, 1234, 40000] {
            assert_eq!(tenths_to_celsius(Some(v)), Some(v as f64 / 10.0));
            assert_eq!(tenths_mm_sum_to_cm(Some(v as i64)), Some(v as f64 / 100.0));
        }
    }
}
