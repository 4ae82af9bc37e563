use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::error::AerogenTypesError;

const EPSG_WGS84: u32 = 4326;
const EPSG_UTM_NORTH_BASE: u32 = 32600;
const EPSG_UTM_SOUTH_BASE: u32 = 32700;

/// Coordinate reference system identified by an EPSG code.
///
/// Only the systems the flight line generator works with are supported: geographic WGS84 and the 120 WGS84 UTM
/// zones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Crs {
    /// Geographic WGS84 (EPSG:4326). Points store longitude as `x` and latitude as `y`.
    Wgs84,
    /// WGS84 / UTM zone (EPSG:326zz for the northern and EPSG:327zz for the southern hemisphere).
    Utm {
        /// Zone number, `1..=60`.
        zone: u8,
        /// Whether the zone is on the northern hemisphere.
        north: bool,
    },
}

impl Crs {
    /// Creates a UTM CRS, checking that the zone number is valid.
    pub fn utm(zone: u8, north: bool) -> Result<Self, AerogenTypesError> {
        if !(1..=60).contains(&zone) {
            return Err(AerogenTypesError::Conversion(format!(
                "UTM zone {zone} is out of range 1..=60"
            )));
        }

        Ok(Self::Utm { zone, north })
    }

    /// Looks up a CRS by its EPSG code.
    pub fn from_epsg(code: u32) -> Result<Self, AerogenTypesError> {
        match code {
            EPSG_WGS84 => Ok(Self::Wgs84),
            c if c > EPSG_UTM_NORTH_BASE && c <= EPSG_UTM_NORTH_BASE + 60 => {
                Self::utm((c - EPSG_UTM_NORTH_BASE) as u8, true)
            }
            c if c > EPSG_UTM_SOUTH_BASE && c <= EPSG_UTM_SOUTH_BASE + 60 => {
                Self::utm((c - EPSG_UTM_SOUTH_BASE) as u8, false)
            }
            _ => Err(AerogenTypesError::UnsupportedCrs(code)),
        }
    }

    /// EPSG code of the CRS.
    pub fn epsg(&self) -> u32 {
        match self {
            Self::Wgs84 => EPSG_WGS84,
            Self::Utm { zone, north: true } => EPSG_UTM_NORTH_BASE + *zone as u32,
            Self::Utm { zone, north: false } => EPSG_UTM_SOUTH_BASE + *zone as u32,
        }
    }

    /// Whether coordinates in this CRS are longitude/latitude degrees rather than projected meters.
    pub fn is_geographic(&self) -> bool {
        matches!(self, Self::Wgs84)
    }

    /// Operator definition understood by the `geodesy` crate, or `None` for geographic systems that need no
    /// projection.
    pub fn geodesy_definition(&self) -> Option<String> {
        match self {
            Self::Wgs84 => None,
            Self::Utm { zone, north: true } => Some(format!("utm zone={zone}")),
            Self::Utm { zone, north: false } => Some(format!("utm zone={zone} south")),
        }
    }
}

impl Display for Crs {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "EPSG:{}", self.epsg())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn epsg_codes() {
        assert_eq!(Crs::Wgs84.epsg(), 4326);
        assert_eq!(Crs::utm(32, true).unwrap().epsg(), 32632);
        assert_eq!(Crs::utm(32, false).unwrap().epsg(), 32732);
        assert_eq!(Crs::utm(1, true).unwrap().epsg(), 32601);
        assert_eq!(Crs::utm(60, false).unwrap().to_string(), "EPSG:32760");
    }

    #[test]
    fn from_epsg() {
        assert_eq!(Crs::from_epsg(4326).unwrap(), Crs::Wgs84);
        assert_eq!(
            Crs::from_epsg(32633).unwrap(),
            Crs::Utm {
                zone: 33,
                north: true
            }
        );
        assert_eq!(
            Crs::from_epsg(32718).unwrap(),
            Crs::Utm {
                zone: 18,
                north: false
            }
        );
        assert_matches!(Crs::from_epsg(3857), Err(AerogenTypesError::UnsupportedCrs(3857)));
        assert_matches!(Crs::from_epsg(32600), Err(AerogenTypesError::UnsupportedCrs(_)));
        assert_matches!(Crs::from_epsg(32661), Err(AerogenTypesError::UnsupportedCrs(_)));
    }

    #[test]
    fn invalid_zone() {
        assert_matches!(Crs::utm(0, true), Err(AerogenTypesError::Conversion(_)));
        assert_matches!(Crs::utm(61, true), Err(AerogenTypesError::Conversion(_)));
    }

    #[test]
    fn geodesy_definition() {
        assert_eq!(Crs::Wgs84.geodesy_definition(), None);
        assert_eq!(
            Crs::utm(32, true).unwrap().geodesy_definition().as_deref(),
            Some("utm zone=32")
        );
        assert_eq!(
            Crs::utm(32, false).unwrap().geodesy_definition().as_deref(),
            Some("utm zone=32 south")
        );
    }
}
