use opencv::core::Scalar;

use crate::registry::Registry;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Authorized(String),
    NotRegistered(String),
    NoPlate,
}

impl Verdict {
    pub fn judge(detected: Option<&str>, registry: &Registry) -> Self {
        match detected {
            Some(plate) if registry.contains(plate) => Verdict::Authorized(plate.to_string()),
            Some(plate) => Verdict::NotRegistered(plate.to_string()),
            None => Verdict::NoPlate,
        }
    }

    pub fn message(&self) -> String {
        match self {
            Verdict::Authorized(plate) => format!("AUTHORIZED: {plate}"),
            Verdict::NotRegistered(plate) => format!("NOT REGISTERED: {plate}"),
            Verdict::NoPlate => "No plate detected".to_string(),
        }
    }

    /// BGR color of the overlay.
    pub fn color(&self) -> Scalar {
        match self {
            Verdict::Authorized(_) => Scalar::new(0.0, 255.0, 0.0, 0.0),
            Verdict::NotRegistered(_) | Verdict::NoPlate => Scalar::new(0.0, 0.0, 255.0, 0.0),
        }
    }

    pub fn font_scale(&self) -> f64 {
        match self {
            Verdict::NoPlate => 0.7,
            _ => 1.0,
        }
    }
}
