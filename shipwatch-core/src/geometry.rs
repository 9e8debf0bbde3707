//! Zone Geofencing
//!
//! Zones are closed polygons in GeoJSON order: every vertex is a
//! `[longitude, latitude]` pair. A vessel is inside a zone when the
//! ray-casting test passes for its current position.
//!
//! # Example
//!
//! ```rust,ignore
//! use shipwatch_core::geometry::{point_in_polygon, Zone};
//!
//! let zone = Zone::new("harbour", "Harbour", vec![
//!     [10.0, 60.0], [20.0, 60.0], [20.0, 70.0], [10.0, 70.0], [10.0, 60.0],
//! ]);
//!
//! let ring = zone.ring()?;
//! assert!(point_in_polygon(65.0, 15.0, &ring));
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Minimum number of distinct vertices for a usable ring
pub const MIN_DISTINCT_VERTICES: usize = 3;

/// Reasons a zone cannot be used for geofencing
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ZoneError {
    #[error("zone '{0}' has no polygon")]
    MissingPolygon(String),
    #[error("zone '{id}' polygon has {found} distinct vertices, need at least 3")]
    TooFewVertices { id: String, found: usize },
    #[error("zone '{id}' polygon has a non-finite coordinate at vertex {index}")]
    InvalidCoordinate { id: String, index: usize },
}

/// A named geofence polygon
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    pub id: String,

    #[serde(default)]
    pub name: String,

    /// `[longitude, latitude]` vertices, normally closed (first == last)
    #[serde(default)]
    pub polygon: Vec<[f64; 2]>,
}

impl Zone {
    pub fn new(id: impl Into<String>, name: impl Into<String>, polygon: Vec<[f64; 2]>) -> Self {
        Zone {
            id: id.into(),
            name: name.into(),
            polygon,
        }
    }

    /// Name for display, falling back to the id
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            &self.id
        } else {
            &self.name
        }
    }

    /// Validate the polygon and return it as a closed ring.
    ///
    /// An open ring is closed by repeating its first vertex.
    pub fn ring(&self) -> Result<Vec<[f64; 2]>, ZoneError> {
        if self.polygon.is_empty() {
            return Err(ZoneError::MissingPolygon(self.id.clone()));
        }

        if let Some(index) = self
            .polygon
            .iter()
            .position(|v| !v[0].is_finite() || !v[1].is_finite())
        {
            return Err(ZoneError::InvalidCoordinate {
                id: self.id.clone(),
                index,
            });
        }

        let found = distinct_vertices(&self.polygon);
        if found < MIN_DISTINCT_VERTICES {
            return Err(ZoneError::TooFewVertices {
                id: self.id.clone(),
                found,
            });
        }

        let mut ring = self.polygon.clone();
        if ring.first() != ring.last() {
            ring.push(ring[0]);
        }
        Ok(ring)
    }
}

fn distinct_vertices(polygon: &[[f64; 2]]) -> usize {
    let mut seen: Vec<[f64; 2]> = Vec::with_capacity(polygon.len());
    for v in polygon {
        if !seen.contains(v) {
            seen.push(*v);
        }
    }
    seen.len()
}

/// Ray-casting point-in-polygon test.
///
/// `ring` holds `[longitude, latitude]` vertices. Points exactly on an edge
/// or vertex get whatever the strict comparisons produce.
pub fn point_in_polygon(lat: f64, lon: f64, ring: &[[f64; 2]]) -> bool {
    let n = ring.len();
    if n == 0 {
        return false;
    }

    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let [lon_i, lat_i] = ring[i];
        let [lon_j, lat_j] = ring[j];

        if (lat_i > lat) != (lat_j > lat) {
            let crossing = lon_j + (lon_i - lon_j) * (lat - lat_j) / (lat_i - lat_j);
            if lon < crossing {
                inside = !inside;
            }
        }
        j = i;
    }

    inside
}
