use std::str::FromStr;

use super::error::DomainError;
use super::record::Coordinates;

/// Geographic filter given by two opposite corners
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    south_west: Coordinates,
    north_east: Coordinates,
}

impl BoundingBox {
    /// Build a box from any two opposite corners (latitude, longitude)
    pub fn from_corners(a: Coordinates, b: Coordinates) -> Result<Self, DomainError> {
        let south = a.latitude().min(b.latitude());
        let north = a.latitude().max(b.latitude());
        let west = a.longitude().min(b.longitude());
        let east = a.longitude().max(b.longitude());

        if south == north || west == east {
            return Err(DomainError::InvalidBoundingBox(
                "corners must span a non-zero area".to_string(),
            ));
        }

        Ok(Self {
            south_west: Coordinates::new(south, west)?,
            north_east: Coordinates::new(north, east)?,
        })
    }

    pub fn south_west(&self) -> Coordinates {
        self.south_west
    }

    pub fn north_east(&self) -> Coordinates {
        self.north_east
    }

    /// Check whether a point lies inside the box, edges included
    pub fn contains(&self, point: &Coordinates) -> bool {
        (self.south_west.latitude()..=self.north_east.latitude()).contains(&point.latitude())
            && (self.south_west.longitude()..=self.north_east.longitude())
                .contains(&point.longitude())
    }

    /// Upstream `locations` value: south-west then north-east, longitude first
    pub fn to_locations_param(&self) -> String {
        format!(
            "{:?},{:?},{:?},{:?}",
            self.south_west.longitude(),
            self.south_west.latitude(),
            self.north_east.longitude(),
            self.north_east.latitude()
        )
    }
}

impl FromStr for BoundingBox {
    type Err = DomainError;

    /// Parse `lat1,lon1,lat2,lon2`
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let parts = value
            .split(',')
            .map(|part| {
                part.trim().parse::<f64>().map_err(|_| {
                    DomainError::InvalidBoundingBox(format!("'{}' is not a number", part.trim()))
                })
            })
            .collect::<Result<Vec<f64>, _>>()?;

        let [lat1, lon1, lat2, lon2] = parts[..] else {
            return Err(DomainError::InvalidBoundingBox(format!(
                "expected 4 values (lat1,lon1,lat2,lon2), got {}",
                parts.len()
            )));
        };

        Self::from_corners(Coordinates::new(lat1, lon1)?, Coordinates::new(lat2, lon2)?)
    }
}
