//! Static country → timezone table.
//!
//! One canonical timezone per ISO 3166-1 alpha-2 code.  Countries spanning
//! several zones carry a separate *business timezone*: the zone where most of
//! their commercial activity happens.  Sub-national zones are not modelled.

use std::collections::HashMap;
use std::sync::LazyLock;

use st_core::OffsetHours;

/// Timezone facts for one country.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CountryTimezoneEntry {
    /// Upper-case ISO 3166-1 alpha-2 code.
    pub code: &'static str,
    /// Human-readable country name.
    pub name: &'static str,
    /// Canonical IANA timezone.
    pub timezone: &'static str,
    /// Nominal UTC offset in hours, ignoring daylight saving.
    pub offset_hours: OffsetHours,
    /// IANA timezone used for business hours.
    pub business_timezone: &'static str,
}

const fn entry(
    code: &'static str,
    name: &'static str,
    timezone: &'static str,
    offset_hours: OffsetHours,
    business_timezone: &'static str,
) -> CountryTimezoneEntry {
    CountryTimezoneEntry {
        code,
        name,
        timezone,
        offset_hours,
        business_timezone,
    }
}

/// Every supported country, sorted by code.
pub static COUNTRY_TIMEZONES: &[CountryTimezoneEntry] = &[
    entry("AE", "United Arab Emirates", "Asia/Dubai", 4.0, "Asia/Dubai"),
    entry("AR", "Argentina", "America/Argentina/Buenos_Aires", -3.0, "America/Argentina/Buenos_Aires"),
    entry("AT", "Austria", "Europe/Vienna", 1.0, "Europe/Vienna"),
    entry("AU", "Australia", "Australia/Sydney", 10.0, "Australia/Sydney"),
    entry("BE", "Belgium", "Europe/Brussels", 1.0, "Europe/Brussels"),
    entry("BR", "Brazil", "America/Sao_Paulo", -3.0, "America/Sao_Paulo"),
    entry("CA", "Canada", "America/Toronto", -5.0, "America/Toronto"),
    entry("CH", "Switzerland", "Europe/Zurich", 1.0, "Europe/Zurich"),
    entry("CL", "Chile", "America/Santiago", -4.0, "America/Santiago"),
    entry("CN", "China", "Asia/Shanghai", 8.0, "Asia/Shanghai"),
    entry("CO", "Colombia", "America/Bogota", -5.0, "America/Bogota"),
    entry("CZ", "Czech Republic", "Europe/Prague", 1.0, "Europe/Prague"),
    entry("DE", "Germany", "Europe/Berlin", 1.0, "Europe/Berlin"),
    entry("DK", "Denmark", "Europe/Copenhagen", 1.0, "Europe/Copenhagen"),
    entry("EG", "Egypt", "Africa/Cairo", 2.0, "Africa/Cairo"),
    entry("ES", "Spain", "Europe/Madrid", 1.0, "Europe/Madrid"),
    entry("FI", "Finland", "Europe/Helsinki", 2.0, "Europe/Helsinki"),
    entry("FR", "France", "Europe/Paris", 1.0, "Europe/Paris"),
    entry("GB", "United Kingdom", "Europe/London", 0.0, "Europe/London"),
    entry("GR", "Greece", "Europe/Athens", 2.0, "Europe/Athens"),
    entry("HK", "Hong Kong", "Asia/Hong_Kong", 8.0, "Asia/Hong_Kong"),
    entry("ID", "Indonesia", "Asia/Jakarta", 7.0, "Asia/Jakarta"),
    entry("IE", "Ireland", "Europe/Dublin", 0.0, "Europe/Dublin"),
    entry("IL", "Israel", "Asia/Jerusalem", 2.0, "Asia/Jerusalem"),
    entry("IN", "India", "Asia/Kolkata", 5.5, "Asia/Kolkata"),
    entry("IT", "Italy", "Europe/Rome", 1.0, "Europe/Rome"),
    entry("JP", "Japan", "Asia/Tokyo", 9.0, "Asia/Tokyo"),
    entry("KE", "Kenya", "Africa/Nairobi", 3.0, "Africa/Nairobi"),
    entry("KR", "South Korea", "Asia/Seoul", 9.0, "Asia/Seoul"),
    entry("MX", "Mexico", "America/Mexico_City", -6.0, "America/Mexico_City"),
    entry("MY", "Malaysia", "Asia/Kuala_Lumpur", 8.0, "Asia/Kuala_Lumpur"),
    entry("NG", "Nigeria", "Africa/Lagos", 1.0, "Africa/Lagos"),
    entry("NL", "Netherlands", "Europe/Amsterdam", 1.0, "Europe/Amsterdam"),
    entry("NO", "Norway", "Europe/Oslo", 1.0, "Europe/Oslo"),
    entry("NP", "Nepal", "Asia/Kathmandu", 5.75, "Asia/Kathmandu"),
    entry("NZ", "New Zealand", "Pacific/Auckland", 12.0, "Pacific/Auckland"),
    entry("PE", "Peru", "America/Lima", -5.0, "America/Lima"),
    entry("PH", "Philippines", "Asia/Manila", 8.0, "Asia/Manila"),
    entry("PK", "Pakistan", "Asia/Karachi", 5.0, "Asia/Karachi"),
    entry("PL", "Poland", "Europe/Warsaw", 1.0, "Europe/Warsaw"),
    entry("PT", "Portugal", "Europe/Lisbon", 0.0, "Europe/Lisbon"),
    entry("RU", "Russia", "Europe/Moscow", 3.0, "Europe/Moscow"),
    entry("SA", "Saudi Arabia", "Asia/Riyadh", 3.0, "Asia/Riyadh"),
    entry("SE", "Sweden", "Europe/Stockholm", 1.0, "Europe/Stockholm"),
    entry("SG", "Singapore", "Asia/Singapore", 8.0, "Asia/Singapore"),
    entry("TH", "Thailand", "Asia/Bangkok", 7.0, "Asia/Bangkok"),
    entry("TR", "Turkey", "Europe/Istanbul", 3.0, "Europe/Istanbul"),
    entry("US", "United States", "America/New_York", -5.0, "America/Chicago"),
    entry("VN", "Vietnam", "Asia/Ho_Chi_Minh", 7.0, "Asia/Ho_Chi_Minh"),
    entry("ZA", "South Africa", "Africa/Johannesburg", 2.0, "Africa/Johannesburg"),
];

static BY_CODE: LazyLock<HashMap<&'static str, &'static CountryTimezoneEntry>> =
    LazyLock::new(|| COUNTRY_TIMEZONES.iter().map(|e| (e.code, e)).collect());

/// Look up a country by code, ignoring case and surrounding whitespace.
pub fn lookup(code: &str) -> Option<&'static CountryTimezoneEntry> {
    let code = code.trim();
    if code.len() != 2 {
        return None;
    }
    BY_CODE.get(code.to_ascii_uppercase().as_str()).copied()
}

/// Return `true` if `code` looks like an ISO 3166-1 alpha-2 code.
pub fn is_valid_code(code: &str) -> bool {
    let code = code.trim();
    code.len() == 2 && code.chars().all(|c| c.is_ascii_alphabetic())
}

/// Canonical upper-case form of a country code.
pub fn canonical_code(code: &str) -> String {
    code.trim().to_ascii_uppercase()
}
