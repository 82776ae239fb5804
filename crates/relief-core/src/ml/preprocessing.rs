//! Categorical label encoders and the feature scaler persisted with the model.

use ndarray::{Array1, ArrayView1};
use serde::{Deserialize, Serialize};

use super::{check_shape, MlError, MlResult};

/// Maps a categorical value to its index in a sorted class list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LabelEncoder {
    classes: Vec<String>,
}

impl LabelEncoder {
    /// Build from a class list; the list must be sorted and free of duplicates
    pub fn new(column: &str, classes: Vec<String>) -> MlResult<Self> {
        let encoder = Self { classes };
        encoder.validate(column)?;
        Ok(encoder)
    }

    fn validate(&self, column: &str) -> MlResult<()> {
        if self.classes.is_empty() {
            return Err(MlError::InvalidArtifact(format!("encoder {column} has no classes")));
        }
        if self.classes.windows(2).any(|w| w[0] >= w[1]) {
            return Err(MlError::InvalidArtifact(format!(
                "encoder {column} classes must be sorted and unique"
            )));
        }
        Ok(())
    }

    /// Integer code for `label`
    pub fn encode(&self, column: &str, label: &str) -> MlResult<usize> {
        self.classes
            .binary_search_by(|c| c.as_str().cmp(label))
            .map_err(|_| MlError::UnseenLabel {
                column: column.to_string(),
                label: label.to_string(),
            })
    }

    /// Known classes
    pub fn classes(&self) -> &[String] {
        &self.classes
    }
}

/// The four categorical encoders the population model was trained with
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelEncoders {
    /// Region names
    #[serde(rename = "District")]
    pub district: LabelEncoder,
    /// Disaster display names
    #[serde(rename = "EventType")]
    pub event_type: LabelEncoder,
    /// Altitude zones
    #[serde(rename = "AltitudeZone")]
    pub altitude_zone: LabelEncoder,
    /// Terrain classifications
    #[serde(rename = "ZoneType")]
    pub zone_type: LabelEncoder,
}

impl LabelEncoders {
    /// Validate every column
    pub fn validate(&self) -> MlResult<()> {
        self.district.validate("District")?;
        self.event_type.validate("EventType")?;
        self.altitude_zone.validate("AltitudeZone")?;
        self.zone_type.validate("ZoneType")
    }

    /// Encode a region name
    pub fn district(&self, label: &str) -> MlResult<usize> {
        self.district.encode("District", label)
    }

    /// Encode a disaster display name
    pub fn event_type(&self, label: &str) -> MlResult<usize> {
        self.event_type.encode("EventType", label)
    }

    /// Encode an altitude zone
    pub fn altitude_zone(&self, label: &str) -> MlResult<usize> {
        self.altitude_zone.encode("AltitudeZone", label)
    }

    /// Encode a terrain classification
    pub fn zone_type(&self, label: &str) -> MlResult<usize> {
        self.zone_type.encode("ZoneType", label)
    }
}

/// Per-feature standardization `(x - mean) / scale`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    /// Per-feature mean
    pub mean: Vec<f64>,
    /// Per-feature standard deviation
    pub scale: Vec<f64>,
}

impl StandardScaler {
    /// Check lengths and values
    pub fn validate(&self, n_features: usize) -> MlResult<()> {
        if self.mean.len() != n_features || self.scale.len() != n_features {
            return Err(MlError::InvalidArtifact(format!(
                "scaler has {} means and {} scales, expected {n_features}",
                self.mean.len(),
                self.scale.len()
            )));
        }
        if self.mean.iter().chain(&self.scale).any(|v| !v.is_finite()) {
            return Err(MlError::InvalidArtifact("scaler contains non-finite values".into()));
        }
        Ok(())
    }

    /// Standardize a feature vector. Zero scales are treated as one.
    pub fn transform(&self, features: ArrayView1<'_, f64>) -> MlResult<Array1<f64>> {
        check_shape(self.mean.len(), features)?;
        let mean = ArrayView1::from(self.mean.as_slice());
        let scale = Array1::from_iter(self.scale.iter().map(|&s| if s == 0.0 { 1.0 } else { s }));
        Ok((&features - &mean) / &scale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    fn classes(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_encode_is_sorted_index() {
        let enc = LabelEncoder::new("EventType", classes(&["Avalanche", "Earthquake", "Flash Flood", "Flood"])).unwrap();
        assert_eq!(enc.encode("EventType", "Flash Flood").unwrap(), 2);
        assert!(matches!(
            enc.encode("EventType", "Tsunami"),
            Err(MlError::UnseenLabel { .. })
        ));
    }

    #[test]
    fn test_unsorted_classes_rejected() {
        assert!(LabelEncoder::new("District", classes(&["Nainital", "Dehradun"])).is_err());
        assert!(LabelEncoder::new("District", classes(&["A", "A"])).is_err());
        assert!(LabelEncoder::new("District", Vec::new()).is_err());
    }

    #[test]
    fn test_encoders_json_layout() {
        let json = r#"{
            "District": ["Dehradun", "Nainital"],
            "EventType": ["Flood"],
            "AltitudeZone": ["Low Altitude"],
            "ZoneType": ["Plains"]
        }"#;
        let encoders: LabelEncoders = serde_json::from_str(json).unwrap();
        encoders.validate().unwrap();
        assert_eq!(encoders.district("Nainital").unwrap(), 1);
        assert_eq!(encoders.zone_type("Plains").unwrap(), 0);
    }

    #[test]
    fn test_scaler_transform() {
        let scaler = StandardScaler {
            mean: vec![10.0, 0.0],
            scale: vec![2.0, 0.0],
        };
        scaler.validate(2).unwrap();
        let out = scaler.transform(array![14.0, 3.0].view()).unwrap();
        assert_relative_eq!(out[0], 2.0);
        assert_relative_eq!(out[1], 3.0);
        assert!(scaler.validate(3).is_err());
    }
}
