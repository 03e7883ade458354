use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One named line or scatter of points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Curve {
    pub label: String,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}

/// Plot-ready data: curves plus title and axis labels. Rendering is left to
/// whatever consumes the JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub curves: Vec<Curve>,
}

impl Series {
    pub fn new(title: impl Into<String>, x_label: &str, y_label: &str) -> Self {
        Self {
            title: title.into(),
            x_label: x_label.to_string(),
            y_label: y_label.to_string(),
            curves: Vec::new(),
        }
    }

    pub fn with_curve(mut self, label: &str, x: Vec<f64>, y: Vec<f64>) -> Self {
        self.curves.push(Curve {
            label: label.to_string(),
            x,
            y,
        });
        self
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        Ok(serde_json::from_str(&std::fs::read_to_string(path)?)?)
    }
}
