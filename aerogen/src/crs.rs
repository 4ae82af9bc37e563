//! Detection of the survey CRS from header metadata.

use aerogen_types::geo::Crs;

use crate::error::AerogenError;
use crate::metadata::SurveyMetadata;

const UTM_HINT: &str = "UTM";

/// Derives the UTM CRS implied by the header of a layout file.
///
/// Only the `UTM` projection hint is recognised. The zone is `floor((central_meridian + 180) / 6) mod 60 + 1` and the
/// EPSG code is `326zz` on the northern and `327zz` on the southern hemisphere. A missing hemisphere is treated as
/// northern.
///
/// The result is computed on every call, it is never cached.
pub fn detect_crs(metadata: &SurveyMetadata) -> Result<Crs, AerogenError> {
    let hint = metadata.projection_hint.as_deref().map(str::trim);
    if hint != Some(UTM_HINT) {
        return Err(AerogenError::CrsUndetectable(match hint {
            Some(hint) => format!("unsupported projection '{hint}'"),
            None => "projection is not declared".to_string(),
        }));
    }

    let central_meridian = metadata.central_meridian.ok_or_else(|| {
        AerogenError::CrsUndetectable(
            "cannot determine UTM zone: central meridian is not declared".to_string(),
        )
    })?;

    let zone = utm_zone(central_meridian);
    let north = metadata.northern_hemisphere.unwrap_or_else(|| {
        log::warn!("Hemisphere is not declared, assuming northern hemisphere");
        true
    });

    Ok(Crs::utm(zone, north)?)
}

/// UTM zone containing the given meridian.
pub fn utm_zone(meridian: i32) -> u8 {
    ((meridian as i64 + 180).div_euclid(6).rem_euclid(60) + 1) as u8
}
