use crate::curve;
use crate::error::Error;
use crate::model::{Category, RigProfile};

/// Anchor tables below are resampled onto the canonical grid at selector
/// construction. Amplitudes are dB relative to 1 kHz.
pub type Anchor = (f64, f64);

/// In-ear preference target for the IEC 60318-4 ("711") coupler. Public so
/// callers can render or cross-check the reference shape.
pub const TARGET_IE_711: &[Anchor] = &[
    (20.0, 9.4),
    (40.0, 8.9),
    (60.0, 8.1),
    (100.0, 6.6),
    (200.0, 3.8),
    (400.0, 1.4),
    (630.0, 0.6),
    (1000.0, 0.0),
    (1600.0, 1.9),
    (2500.0, 6.2),
    (3150.0, 8.1),
    (4000.0, 7.4),
    (5000.0, 4.6),
    (6300.0, 2.1),
    (8000.0, 0.5),
    (10000.0, -1.1),
    (12500.0, -2.7),
    (16000.0, -5.3),
    (20000.0, -7.5),
];

/// In-ear target re-derived for the B&K 5128 head simulator; the pinna gain
/// sits higher and the treble shelf differs from the 711 coupler.
const TARGET_IE_5128: &[Anchor] = &[
    (20.0, 8.8),
    (40.0, 8.3),
    (60.0, 7.6),
    (100.0, 6.2),
    (200.0, 3.5),
    (400.0, 1.2),
    (630.0, 0.5),
    (1000.0, 0.0),
    (1600.0, 2.3),
    (2500.0, 6.9),
    (3150.0, 8.9),
    (4000.0, 8.6),
    (5000.0, 5.8),
    (6300.0, 3.0),
    (8000.0, 1.6),
    (10000.0, 0.2),
    (12500.0, -1.9),
    (16000.0, -4.4),
    (20000.0, -6.8),
];

/// Over-ear preference target for GRAS-style ear simulators.
const TARGET_OE_GRAS: &[Anchor] = &[
    (20.0, 4.6),
    (40.0, 4.2),
    (60.0, 3.5),
    (100.0, 2.4),
    (200.0, 0.9),
    (400.0, 0.1),
    (630.0, -0.2),
    (1000.0, 0.0),
    (1600.0, 1.6),
    (2500.0, 5.2),
    (3150.0, 6.5),
    (4000.0, 5.7),
    (5000.0, 3.3),
    (6300.0, 1.0),
    (8000.0, -1.0),
    (10000.0, -2.6),
    (12500.0, -4.3),
    (16000.0, -6.9),
    (20000.0, -9.2),
];

/// Over-ear target variant for anthropometric-pinna couplers; the ear-gain
/// region measures hotter, so the reference curve rises with it.
const TARGET_OE_ANTHRO: &[Anchor] = &[
    (20.0, 4.6),
    (40.0, 4.2),
    (60.0, 3.5),
    (100.0, 2.4),
    (200.0, 0.9),
    (400.0, 0.1),
    (630.0, -0.2),
    (1000.0, 0.0),
    (1600.0, 2.0),
    (2500.0, 6.0),
    (3150.0, 7.4),
    (4000.0, 6.8),
    (5000.0, 4.3),
    (6300.0, 1.9),
    (8000.0, -0.2),
    (10000.0, -1.8),
    (12500.0, -3.6),
    (16000.0, -6.2),
    (20000.0, -8.6),
];

/// Fixed difference curve expressing 5128 raw data in the 711 reference
/// frame. Subtracted from the measured curve before scoring.
const COMP_5128_TO_711: &[Anchor] = &[
    (20.0, 0.8),
    (100.0, 0.3),
    (500.0, 0.0),
    (1000.0, 0.0),
    (2000.0, -1.5),
    (3000.0, -2.8),
    (4000.0, -1.9),
    (6000.0, 1.2),
    (8000.0, 2.4),
    (10000.0, 1.0),
    (16000.0, -1.8),
    (20000.0, -3.0),
];

/// Collapse the many vendor spellings of coupler models into rig families.
pub fn normalize_rig_id(raw: &str) -> &'static str {
    let lower = raw.to_lowercase();
    if lower.contains("5128") || lower.contains("4620") {
        "5128"
    } else if lower.contains("gras") || lower.contains("43ag") || lower.contains("kemar") {
        "gras"
    } else {
        "711"
    }
}

/// Built-in rig table for known sources; anything unlisted measures on the
/// default 711 coupler.
pub fn builtin_rig(source_id: &str) -> RigProfile {
    match source_id {
        "superreview" | "den-fi" => RigProfile {
            rig_id: "5128".to_string(),
            pinna_type: "anthropometric".to_string(),
        },
        _ => RigProfile::default(),
    }
}

/// Holds every target and compensation curve pre-resampled onto one grid.
pub struct TargetSelector {
    grid_len: usize,
    comp_5128: Vec<f64>,
    ie_711: Vec<f64>,
    ie_5128: Vec<f64>,
    oe_gras: Vec<f64>,
    oe_anthro: Vec<f64>,
}

impl TargetSelector {
    pub fn new(grid: &[f64]) -> Result<Self, Error> {
        Ok(TargetSelector {
            grid_len: grid.len(),
            comp_5128: curve::standardize(COMP_5128_TO_711, grid)?,
            ie_711: curve::standardize(TARGET_IE_711, grid)?,
            ie_5128: curve::standardize(TARGET_IE_5128, grid)?,
            oe_gras: curve::standardize(TARGET_OE_GRAS, grid)?,
            oe_anthro: curve::standardize(TARGET_OE_ANTHRO, grid)?,
        })
    }

    /// Apply rig compensation and pick the reference target.
    ///
    /// Target choice is a pure function of (category, rig family, pinna);
    /// unknown combinations fall back to the category's generic target.
    pub fn select(
        &self,
        standardized: &[f64],
        category: Category,
        rig: &RigProfile,
    ) -> (Vec<f64>, &[f64]) {
        debug_assert_eq!(standardized.len(), self.grid_len);
        let family = normalize_rig_id(&rig.rig_id);

        let adjusted: Vec<f64> = if family == "5128" {
            standardized
                .iter()
                .zip(self.comp_5128.iter())
                .map(|(a, c)| a - c)
                .collect()
        } else {
            standardized.to_vec()
        };

        let target: &[f64] = match (category, family) {
            (Category::InEar, "5128") | (Category::Wireless, "5128") => &self.ie_5128,
            (Category::InEar, _) | (Category::Wireless, _) => &self.ie_711,
            (Category::OverEar, "gras") if rig.pinna_type == "anthropometric" => &self.oe_anthro,
            (Category::OverEar, _) => &self.oe_gras,
        };

        (adjusted, target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::log_grid;

    #[test]
    fn test_normalize_rig_id() {
        assert_eq!(normalize_rig_id("711"), "711");
        assert_eq!(normalize_rig_id("IEC 60318-4"), "711");
        assert_eq!(normalize_rig_id("B&K 5128"), "5128");
        assert_eq!(normalize_rig_id("GRAS 43AG"), "gras");
        assert_eq!(normalize_rig_id("KEMAR"), "gras");
    }

    #[test]
    fn test_711_rig_passes_curve_through() {
        let grid = log_grid(50);
        let selector = TargetSelector::new(&grid).unwrap();
        let flat = vec![1.0; 50];
        let (adjusted, _) = selector.select(&flat, Category::InEar, &RigProfile::default());
        assert_eq!(adjusted, flat);
    }

    #[test]
    fn test_5128_rig_is_compensated() {
        let grid = log_grid(50);
        let selector = TargetSelector::new(&grid).unwrap();
        let flat = vec![0.0; 50];
        let rig = RigProfile {
            rig_id: "5128".to_string(),
            pinna_type: "standard".to_string(),
        };
        let (adjusted, target) = selector.select(&flat, Category::InEar, &rig);
        // Compensation is non-trivial somewhere in the treble.
        assert!(adjusted.iter().any(|v| v.abs() > 0.5));
        assert_eq!(target.len(), 50);
    }

    #[test]
    fn test_pinna_selects_over_ear_variant() {
        let grid = log_grid(50);
        let selector = TargetSelector::new(&grid).unwrap();
        let flat = vec![0.0; 50];
        let standard = RigProfile {
            rig_id: "gras".to_string(),
            pinna_type: "standard".to_string(),
        };
        let anthro = RigProfile {
            rig_id: "gras".to_string(),
            pinna_type: "anthropometric".to_string(),
        };
        let (_, t_standard) = selector.select(&flat, Category::OverEar, &standard);
        let (_, t_anthro) = selector.select(&flat, Category::OverEar, &anthro);
        assert_ne!(t_standard, t_anthro);
    }

    #[test]
    fn test_wireless_falls_back_to_in_ear_target() {
        let grid = log_grid(50);
        let selector = TargetSelector::new(&grid).unwrap();
        let flat = vec![0.0; 50];
        let (_, t_wireless) = selector.select(&flat, Category::Wireless, &RigProfile::default());
        let (_, t_in_ear) = selector.select(&flat, Category::InEar, &RigProfile::default());
        assert_eq!(t_wireless, t_in_ear);
    }
}
