use crate::error::{Error, Kind};
use regex::Regex;
use std::sync::OnceLock;

const IDENTITY_RE: &str = r"^(?:([0-9]{4})_([0-9]{2})_([0-9]{2})|([0-9]{4})([0-9]{2})([0-9]{2}))_([0-9]{6})_(\w+)$";

fn identity_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(IDENTITY_RE).expect("identity regex is valid"))
}

/// Parse a migration identity into its version and name.
///
/// Identities are timestamp-derived, `YYYY_MM_DD_NNNNNN_{name}` (or `YYYYMMDD_NNNNNN_{name}`),
/// the version is the concatenation of the timestamp digits.
///
/// ```
/// let (version, name) =
///     mortise_core::parse_identity("2025_11_14_000001_add_vehicle_type_to_claims").unwrap();
/// assert_eq!(20251114000001, version);
/// assert_eq!("add_vehicle_type_to_claims", name);
/// ```
pub fn parse_identity(identity: &str) -> Result<(i64, String), Error> {
    let captures = identity_re()
        .captures(identity)
        .ok_or_else(|| Error::new(Kind::InvalidName(identity.into()), None))?;

    // groups 1-3 hold the underscored date, 4-6 the compact one, only one side matches
    let part = |i: usize| {
        captures
            .get(i)
            .or_else(|| captures.get(i + 3))
            .map(|m| m.as_str())
            .unwrap_or_default()
    };
    let (month, day) = (part(2), part(3));

    let valid_month = matches!(month.parse::<u8>(), Ok(1..=12));
    let valid_day = matches!(day.parse::<u8>(), Ok(1..=31));
    if !valid_month || !valid_day {
        return Err(Error::new(Kind::InvalidVersion(identity.into()), None));
    }

    let sequence = captures.get(7).map(|m| m.as_str()).unwrap_or_default();
    let version = format!("{}{}{}{}", part(1), month, day, sequence)
        .parse::<i64>()
        .map_err(|_| Error::new(Kind::InvalidVersion(identity.into()), None))?;

    let name = captures.get(8).map(|m| m.as_str()).unwrap_or_default();
    Ok((version, name.to_string()))
}

/// Render the canonical identity of a version and name, the inverse of [`parse_identity`].
pub fn format_identity(version: i64, name: &str) -> String {
    let digits = format!("{:014}", version);
    format!(
        "{}_{}_{}_{}_{}",
        &digits[0..4],
        &digits[4..6],
        &digits[6..8],
        &digits[8..],
        name
    )
}
