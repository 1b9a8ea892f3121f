//! Payload accuracy catalog and delivery accuracy statistics.
//!
//! The catalog is static data built once on first access and never mutated.

use std::collections::HashMap;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::enums::PayloadType;
use crate::types::Vector3D;

/// Expected accuracy and capabilities of one payload type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayloadAccuracySpec {
    pub payload_type: PayloadType,
    /// Circular error probable (meters).
    pub cep: f64,
    /// Spherical error probable (meters).
    pub sep: f64,
    /// Maximum range (meters).
    pub max_range: f64,
    pub terminal_guidance: bool,
    pub all_weather: bool,
    pub night_capable: bool,
    pub moving_target_capable: bool,
    pub space_capable: bool,
}

impl PayloadAccuracySpec {
    /// Entry returned for payload types without a catalog row.
    pub fn generic(payload_type: PayloadType) -> Self {
        Self {
            payload_type,
            cep: 10.0,
            sep: 15.0,
            max_range: 1_000e3,
            terminal_guidance: false,
            all_weather: false,
            night_capable: false,
            moving_target_capable: false,
            space_capable: false,
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn entry(
    payload_type: PayloadType,
    cep: f64,
    sep: f64,
    max_range: f64,
    terminal_guidance: bool,
    all_weather: bool,
    moving_target_capable: bool,
    space_capable: bool,
) -> (PayloadType, PayloadAccuracySpec) {
    let spec = PayloadAccuracySpec {
        payload_type: payload_type.clone(),
        cep,
        sep,
        max_range,
        terminal_guidance,
        all_weather,
        night_capable: true,
        moving_target_capable,
        space_capable,
    };
    (payload_type, spec)
}

/// The full catalog, keyed by payload type.
pub fn catalog() -> &'static HashMap<PayloadType, PayloadAccuracySpec> {
    static CATALOG: OnceLock<HashMap<PayloadType, PayloadAccuracySpec>> = OnceLock::new();
    CATALOG.get_or_init(|| {
        HashMap::from([
            // Unguided after boost: wide CEP, no terminal homing
            entry(PayloadType::Ballistic, 300.0, 400.0, 10_000e3, false, true, false, true),
            // GPS/INS with terminal seeker
            entry(PayloadType::Cruise, 3.0, 5.0, 2_500e3, true, true, true, false),
            entry(PayloadType::Hypersonic, 5.0, 8.0, 5_000e3, true, true, true, true),
            // Hit-to-kill
            entry(PayloadType::OrbitalKv, 0.5, 1.0, 1_000e3, true, true, true, true),
            entry(PayloadType::Reentry, 100.0, 150.0, 15_000e3, true, true, false, true),
            // Weather limited
            entry(PayloadType::Drone, 1.0, 2.0, 500e3, true, false, true, false),
            entry(PayloadType::Robot, 0.1, 0.2, 100e3, true, false, true, false),
        ])
    })
}

/// Accuracy specification for a payload type. Never fails: unknown types get
/// the generic entry (CEP 10 m, SEP 15 m, 1000 km range).
pub fn accuracy_spec(payload_type: &PayloadType) -> PayloadAccuracySpec {
    catalog()
        .get(payload_type)
        .cloned()
        .unwrap_or_else(|| PayloadAccuracySpec::generic(payload_type.clone()))
}

/// Delivery accuracy statistics computed from a set of impact points.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeliveryAccuracy {
    /// Median radial error (meters).
    pub cep: f64,
    /// Spherical error probable, approximated as 1.2 x CEP (meters).
    pub sep: f64,
    pub max_error: f64,
    pub mean_error: f64,
    pub std_deviation: f64,
    /// Mean error vector (systematic offset).
    pub bias: Vector3D,
    /// 0.0 - 1.0, falls as the spread grows.
    pub confidence: f64,
    pub samples: usize,
}

impl DeliveryAccuracy {
    /// Statistics of `impacts` relative to `target`. Non-finite impacts are ignored.
    pub fn from_impacts(target: Vector3D, impacts: &[Vector3D]) -> DeliveryAccuracy {
        let offsets: Vec<Vector3D> = impacts
            .iter()
            .filter(|p| p.is_finite())
            .map(|p| *p - target)
            .collect();
        let n = offsets.len();
        if n == 0 {
            return DeliveryAccuracy::default();
        }

        let mut errors: Vec<f64> = offsets.iter().map(|d| d.magnitude()).collect();
        let bias = offsets
            .iter()
            .fold(Vector3D::ZERO, |acc, d| acc + *d)
            .scale(1.0 / n as f64);
        let mean_error = errors.iter().sum::<f64>() / n as f64;
        let max_error = errors.iter().cloned().fold(0.0, f64::max);
        let variance = errors
            .iter()
            .map(|e| (e - mean_error) * (e - mean_error))
            .sum::<f64>()
            / n as f64;
        let std_deviation = variance.sqrt();

        errors.sort_by(|a, b| a.total_cmp(b));
        let cep = errors[n / 2];

        DeliveryAccuracy {
            cep,
            sep: cep * 1.2,
            max_error,
            mean_error,
            std_deviation,
            bias,
            confidence: (1.0 - std_deviation / 100.0).max(0.0),
            samples: n,
        }
    }
}
