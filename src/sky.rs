//! Spherical geometry helpers for proximity matching.
//!
//! Positions are equatorial coordinates in degrees (`ra ∈ [0, 360)`,
//! `dec ∈ [-90, 90]`). Separations use the haversine formulation, which stays
//! numerically stable at the sub-arcsecond scales association works at.

/// Arcseconds per degree.
pub const ARCSEC_PER_DEG: f64 = 3600.0;

/// Convert an angle in arcseconds to degrees.
pub fn arcsec_to_deg(arcsec: f64) -> f64 {
    arcsec / ARCSEC_PER_DEG
}

/// Great-circle angular separation between two sky positions, in degrees.
pub fn angular_separation_deg(ra1: f64, dec1: f64, ra2: f64, dec2: f64) -> f64 {
    let (ra1, dec1) = (ra1.to_radians(), dec1.to_radians());
    let (ra2, dec2) = (ra2.to_radians(), dec2.to_radians());

    let sin_ddec = ((dec2 - dec1) / 2.0).sin();
    let sin_dra = ((ra2 - ra1) / 2.0).sin();
    let h = sin_ddec * sin_ddec + dec1.cos() * dec2.cos() * sin_dra * sin_dra;

    // Clamp guards against rounding pushing the argument past 1 for
    // near-antipodal points.
    (2.0 * h.sqrt().min(1.0).asin()).to_degrees()
}

/// Great-circle angular separation between two sky positions, in arcseconds.
pub fn angular_separation_arcsec(ra1: f64, dec1: f64, ra2: f64, dec2: f64) -> f64 {
    angular_separation_deg(ra1, dec1, ra2, dec2) * ARCSEC_PER_DEG
}
