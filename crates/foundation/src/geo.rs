//! Geographic positions in decimal degrees and their degrees-minutes-seconds
//! display form.

use crate::math::Geodetic;

/// A point on the globe in decimal degrees.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LonLat {
    pub lon: f64,
    pub lat: f64,
}

impl LonLat {
    pub const fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    pub fn from_geodetic(geo: Geodetic) -> Self {
        Self::new(geo.lon_deg(), geo.lat_deg())
    }

    pub fn to_geodetic(self, alt_m: f64) -> Geodetic {
        Geodetic::from_degrees(self.lon, self.lat, alt_m)
    }

    pub fn is_finite(self) -> bool {
        self.lon.is_finite() && self.lat.is_finite()
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Axis {
    Lon,
    Lat,
}

/// Whole degrees, minutes and seconds of an angle. Each component is
/// truncated, so converting back loses less than one arc-second.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Dms {
    pub negative: bool,
    pub degrees: u32,
    pub minutes: u32,
    pub seconds: u32,
}

impl Dms {
    pub fn from_degrees(value: f64) -> Self {
        let absolute = value.abs();
        let degrees = absolute.floor();
        let minutes_full = (absolute - degrees) * 60.0;
        let minutes = minutes_full.floor();
        let seconds = ((minutes_full - minutes) * 60.0).floor();

        Self {
            negative: value < 0.0,
            degrees: degrees as u32,
            minutes: minutes as u32,
            seconds: seconds as u32,
        }
    }

    pub fn to_degrees(self) -> f64 {
        let magnitude =
            self.degrees as f64 + self.minutes as f64 / 60.0 + self.seconds as f64 / 3600.0;
        if self.negative { -magnitude } else { magnitude }
    }

    pub fn cardinal(self, axis: Axis) -> char {
        match (axis, self.negative) {
            (Axis::Lon, false) => 'E',
            (Axis::Lon, true) => 'W',
            (Axis::Lat, false) => 'N',
            (Axis::Lat, true) => 'S',
        }
    }

    /// Popup label, e.g. `37° 27′ 45″ N`.
    pub fn format(self, axis: Axis) -> String {
        format!(
            "{}° {}′ {}″ {}",
            self.degrees,
            self.minutes,
            self.seconds,
            self.cardinal(axis)
        )
    }

    /// Parses the popup label form as well as ASCII variants such as
    /// `126 26' 20" E` or `-37 27 45`. A trailing `S`/`W` makes the angle negative.
    pub fn parse(s: &str) -> Option<Self> {
        let trimmed = s.trim();
        let (body, south_or_west) = match trimmed.chars().last()? {
            'N' | 'n' | 'E' | 'e' => (&trimmed[..trimmed.len() - 1], false),
            'S' | 's' | 'W' | 'w' => (&trimmed[..trimmed.len() - 1], true),
            _ => (trimmed, false),
        };

        let mut parts = body
            .split(|c: char| c.is_whitespace() || matches!(c, '°' | '′' | '″' | '\'' | '"'))
            .filter(|p| !p.is_empty());

        let first = parts.next()?;
        let (sign_negative, first) = match first.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, first),
        };
        let degrees = first.parse::<u32>().ok()?;
        let minutes = parts.next().map(str::parse::<u32>).transpose().ok()?.unwrap_or(0);
        let seconds = parts.next().map(str::parse::<u32>).transpose().ok()?.unwrap_or(0);
        if parts.next().is_some() || minutes >= 60 || seconds >= 60 {
            return None;
        }

        Some(Self {
            negative: sign_negative || south_or_west,
            degrees,
            minutes,
            seconds,
        })
    }
}

/// Formatted longitude/latitude pair shown in overlay popups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DmsLabel {
    pub lon: String,
    pub lat: String,
}

pub fn dms_label(position: LonLat) -> DmsLabel {
    DmsLabel {
        lon: Dms::from_degrees(position.lon).format(Axis::Lon),
        lat: Dms::from_degrees(position.lat).format(Axis::Lat),
    }
}
