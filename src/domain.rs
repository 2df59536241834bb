use serde::{Deserialize, Serialize};

pub const MAX_LATITUDE: f64 = 90.0;
pub const MAX_LONGITUDE: f64 = 180.0;

/// GeoJSON geometry type written when a driver's record is first inserted.
pub const POINT: &str = "Point";

/// Availability reported by a driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Busy,
    Free,
    Offline,
}

impl Status {
    /// Parses the single-letter wire code. Codes are case-sensitive.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "B" => Some(Self::Busy),
            "F" => Some(Self::Free),
            "O" => Some(Self::Offline),
            _ => None,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::Busy => "B",
            Self::Free => "F",
            Self::Offline => "O",
        }
    }
}

/// A position on the globe, in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// Reasons a location update is refused before it reaches the store.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ValidationError {
    #[error("query string is malformed: {0}")]
    MalformedQuery(String),
    #[error("driver id is empty")]
    MissingDriverId,
    #[error("status is empty")]
    MissingStatus,
    #[error("latitude `{0}` is not a number")]
    InvalidLatitude(String),
    #[error("longitude `{0}` is not a number")]
    InvalidLongitude(String),
    #[error("latitude {0} is outside [-90, 90]")]
    LatitudeOutOfRange(f64),
    #[error("longitude {0} is outside [-180, 180]")]
    LongitudeOutOfRange(f64),
    #[error("status `{0}` is not one of B, F, O")]
    UnknownStatus(String),
}

/// A validated position and status report from a driver.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationUpdate {
    pub driver_id: String,
    pub status: Status,
    pub coordinates: Coordinates,
}

impl LocationUpdate {
    /// Validates the raw query values of a location update.
    ///
    /// Presence and number parsing are checked first, then coordinate bounds (inclusive), then
    /// the status code. The first failing check is reported.
    pub fn parse(
        driver_id: &str,
        lat: &str,
        lon: &str,
        status: &str,
    ) -> Result<Self, ValidationError> {
        if driver_id.is_empty() {
            return Err(ValidationError::MissingDriverId)
        }
        let latitude =
            parse_degrees(lat).ok_or_else(|| ValidationError::InvalidLatitude(lat.to_string()))?;
        let longitude =
            parse_degrees(lon).ok_or_else(|| ValidationError::InvalidLongitude(lon.to_string()))?;
        if status.is_empty() {
            return Err(ValidationError::MissingStatus)
        }

        if !(-MAX_LATITUDE..=MAX_LATITUDE).contains(&latitude) {
            return Err(ValidationError::LatitudeOutOfRange(latitude))
        }
        if !(-MAX_LONGITUDE..=MAX_LONGITUDE).contains(&longitude) {
            return Err(ValidationError::LongitudeOutOfRange(longitude))
        }

        let status = Status::from_code(status)
            .ok_or_else(|| ValidationError::UnknownStatus(status.to_string()))?;

        Ok(Self {
            driver_id: driver_id.to_string(),
            status,
            coordinates: Coordinates { latitude, longitude },
        })
    }
}

/// Reads the longest decimal number at the start of `raw`, after leading whitespace, and ignores
/// whatever follows it: `"12abc"` is 12 and `" 1.5e1x"` is 15. Input with no leading digits has
/// no value. Infinities from overflowing exponents are left for the range check to reject.
fn parse_degrees(raw: &str) -> Option<f64> {
    let number = raw.trim_start();
    let bytes = number.as_bytes();

    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let integer_digits = leading_digits(&bytes[end..]);
    end += integer_digits;
    let mut fraction_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        fraction_digits = leading_digits(&bytes[end + 1..]);
        end += 1 + fraction_digits;
    }
    if integer_digits + fraction_digits == 0 {
        return None
    }

    // The exponent only counts when at least one digit follows the marker.
    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exponent_end = end + 1;
        if matches!(bytes.get(exponent_end), Some(b'+' | b'-')) {
            exponent_end += 1;
        }
        let exponent_digits = leading_digits(&bytes[exponent_end..]);
        if exponent_digits > 0 {
            end = exponent_end + exponent_digits;
        }
    }

    number[..end].parse().ok()
}

fn leading_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|byte| byte.is_ascii_digit()).count()
}

/// Stored shape of a driver's location, one document per driver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriverLocationRecord {
    #[serde(rename = "userID")]
    pub driver_id: String,

    /// Raw status code. Status-only updates store whatever the client sent.
    pub status: String,

    pub location: GeoPoint,
}

/// GeoJSON point. `coordinates` is ordered `[longitude, latitude]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    pub coordinates: Vec<f64>,
}

impl GeoPoint {
    pub fn new(coordinates: Coordinates) -> Self {
        Self {
            kind: Some(POINT.to_string()),
            coordinates: vec![coordinates.longitude, coordinates.latitude],
        }
    }

    /// Returns `None` when the stored array has fewer than two entries.
    pub fn coordinates(&self) -> Option<Coordinates> {
        match self.coordinates.as_slice() {
            [longitude, latitude, ..] => {
                Some(Coordinates { latitude: *latitude, longitude: *longitude })
            }
            _ => None,
        }
    }
}
