//! Classical orbital elements with validated setters and derived ellipse geometry.

use std::fmt;
use std::str::FromStr;

use glam::{DQuat, DVec2, DVec3};

use crate::error::ValidationError;

/// Smallest ellipse resolution that still yields a non-degenerate polygon.
pub const MIN_ELLIPSE_RESOLUTION: u32 = 3;

/// Largest accepted ellipse resolution.
pub const MAX_ELLIPSE_RESOLUTION: u32 = 1 << 16;

/// The parameter set describing one orbit around a focus fixed at the plane origin.
///
/// Fields are private: every edit goes through a setter that validates the new
/// value and refreshes the derived geometry. A rejected edit leaves the record
/// untouched.
#[derive(Clone, Debug, PartialEq)]
pub struct OrbitalElements {
    semi_major_axis: f64,
    eccentricity: f64,
    /// Degrees.
    inclination: f64,
    /// Degrees.
    longitude_ascending_node: f64,
    /// Degrees.
    argument_periapsis: f64,
    ellipse_resolution: u32,

    linear_eccentricity: f64,
    semi_minor_axis: f64,
}

impl Default for OrbitalElements {
    fn default() -> Self {
        let mut elements = Self {
            semi_major_axis: 2.0,
            eccentricity: 0.5,
            inclination: 0.0,
            longitude_ascending_node: 0.0,
            argument_periapsis: 0.0,
            ellipse_resolution: 128,
            linear_eccentricity: 0.0,
            semi_minor_axis: 0.0,
        };
        elements.recompute_derived();
        elements
    }
}

impl OrbitalElements {
    /// Construct an in-plane orbit with zero orientation angles.
    pub fn new(
        semi_major_axis: f64,
        eccentricity: f64,
        ellipse_resolution: u32,
    ) -> Result<Self, ValidationError> {
        let mut elements = Self::default();
        elements.set_semi_major_axis(semi_major_axis)?;
        elements.set_eccentricity(eccentricity)?;
        elements.set_ellipse_resolution(ellipse_resolution as f64)?;
        Ok(elements)
    }

    pub fn semi_major_axis(&self) -> f64 {
        self.semi_major_axis
    }

    pub fn eccentricity(&self) -> f64 {
        self.eccentricity
    }

    pub fn inclination(&self) -> f64 {
        self.inclination
    }

    pub fn longitude_ascending_node(&self) -> f64 {
        self.longitude_ascending_node
    }

    pub fn argument_periapsis(&self) -> f64 {
        self.argument_periapsis
    }

    pub fn ellipse_resolution(&self) -> u32 {
        self.ellipse_resolution
    }

    /// Distance from the geometric center to the focus: `a * e`.
    pub fn linear_eccentricity(&self) -> f64 {
        self.linear_eccentricity
    }

    /// `sqrt(a² − c²)` where `c` is the linear eccentricity.
    pub fn semi_minor_axis(&self) -> f64 {
        self.semi_minor_axis
    }

    /// Offset of the ellipse's geometric center from the focus at the origin.
    pub fn center_offset(&self) -> DVec2 {
        DVec2::new(-self.linear_eccentricity, 0.0)
    }

    /// Closest approach distance from the focus.
    pub fn periapsis_distance(&self) -> f64 {
        self.semi_major_axis - self.linear_eccentricity
    }

    /// Farthest distance from the focus.
    pub fn apoapsis_distance(&self) -> f64 {
        self.semi_major_axis + self.linear_eccentricity
    }

    pub fn set_semi_major_axis(&mut self, value: f64) -> Result<(), ValidationError> {
        if !value.is_finite() || value <= 0.0 {
            return Err(ValidationError::SemiMajorAxis(value));
        }
        self.semi_major_axis = value;
        self.recompute_derived();
        Ok(())
    }

    pub fn set_eccentricity(&mut self, value: f64) -> Result<(), ValidationError> {
        if !(0.0..1.0).contains(&value) {
            return Err(ValidationError::Eccentricity(value));
        }
        self.eccentricity = value;
        self.recompute_derived();
        Ok(())
    }

    pub fn set_inclination(&mut self, degrees: f64) -> Result<(), ValidationError> {
        self.inclination = finite_angle("inclination", degrees)?;
        Ok(())
    }

    pub fn set_longitude_ascending_node(&mut self, degrees: f64) -> Result<(), ValidationError> {
        self.longitude_ascending_node = finite_angle("longitudeOfAscendingNode", degrees)?;
        Ok(())
    }

    pub fn set_argument_periapsis(&mut self, degrees: f64) -> Result<(), ValidationError> {
        self.argument_periapsis = finite_angle("argumentOfPeriapsis", degrees)?;
        Ok(())
    }

    /// Set the sample count. Control surfaces deliver floats, so the value is
    /// rounded to the nearest integer before range checking.
    pub fn set_ellipse_resolution(&mut self, value: f64) -> Result<(), ValidationError> {
        let rounded = value.round();
        if !rounded.is_finite()
            || rounded < MIN_ELLIPSE_RESOLUTION as f64
            || rounded > MAX_ELLIPSE_RESOLUTION as f64
        {
            return Err(ValidationError::Resolution(value));
        }
        self.ellipse_resolution = rounded as u32;
        Ok(())
    }

    /// Rotation taking the orbital plane (x toward periapsis, z along the
    /// orbit normal) into the reference frame: `Rz(Ω) · Rx(i) · Rz(ω)`.
    pub fn plane_rotation(&self) -> DQuat {
        DQuat::from_rotation_z(self.longitude_ascending_node.to_radians())
            * DQuat::from_rotation_x(self.inclination.to_radians())
            * DQuat::from_rotation_z(self.argument_periapsis.to_radians())
    }

    /// Lift a plane-local point into the reference frame.
    pub fn to_world(&self, plane_point: DVec2) -> DVec3 {
        self.plane_rotation() * plane_point.extend(0.0)
    }

    fn recompute_derived(&mut self) {
        self.linear_eccentricity = self.semi_major_axis * self.eccentricity;
        self.semi_minor_axis = (self.semi_major_axis * self.semi_major_axis
            - self.linear_eccentricity * self.linear_eccentricity)
            .sqrt();
    }
}

fn finite_angle(field: &'static str, degrees: f64) -> Result<f64, ValidationError> {
    if degrees.is_finite() {
        Ok(degrees)
    } else {
        Err(ValidationError::NonFinite {
            field,
            value: degrees,
        })
    }
}

/// Every value a control surface may edit, by name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ElementField {
    SemiMajorAxis,
    Eccentricity,
    Inclination,
    LongitudeOfAscendingNode,
    ArgumentOfPeriapsis,
    /// Orbital phase as a fraction of one period; drives the time controller
    /// into manual mode.
    Phase,
    EllipseResolution,
    /// Playback speed in phase per second.
    Speed,
}

impl ElementField {
    pub const ALL: [ElementField; 8] = [
        ElementField::SemiMajorAxis,
        ElementField::Eccentricity,
        ElementField::Inclination,
        ElementField::LongitudeOfAscendingNode,
        ElementField::ArgumentOfPeriapsis,
        ElementField::Phase,
        ElementField::EllipseResolution,
        ElementField::Speed,
    ];

    /// The control-surface name of this field.
    pub fn name(self) -> &'static str {
        match self {
            ElementField::SemiMajorAxis => "semiMajorAxis",
            ElementField::Eccentricity => "eccentricity",
            ElementField::Inclination => "inclination",
            ElementField::LongitudeOfAscendingNode => "longitudeOfAscendingNode",
            ElementField::ArgumentOfPeriapsis => "argumentOfPeriapsis",
            ElementField::Phase => "phase",
            ElementField::EllipseResolution => "ellipseResolution",
            ElementField::Speed => "speed",
        }
    }

    /// Whether an edit to this field changes the sampled ellipse.
    pub fn reshapes_orbit(self) -> bool {
        matches!(
            self,
            ElementField::SemiMajorAxis
                | ElementField::Eccentricity
                | ElementField::EllipseResolution
        )
    }
}

impl fmt::Display for ElementField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ElementField {
    type Err = ValidationError;

    /// Accepts the camelCase control-surface names plus snake_case aliases.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let field = match s {
            "semiMajorAxis" | "semi_major_axis" => ElementField::SemiMajorAxis,
            "eccentricity" => ElementField::Eccentricity,
            "inclination" => ElementField::Inclination,
            "longitudeOfAscendingNode" | "longitude_ascending_node" => {
                ElementField::LongitudeOfAscendingNode
            }
            "argumentOfPeriapsis" | "argument_periapsis" => ElementField::ArgumentOfPeriapsis,
            "phase" | "time" => ElementField::Phase,
            "ellipseResolution" | "ellipse_resolution" => ElementField::EllipseResolution,
            "speed" => ElementField::Speed,
            other => return Err(ValidationError::UnknownField(other.to_string())),
        };
        Ok(field)
    }
}
