//! Embedded table of states and territories.
//!
//! `JURISDICTIONS` is the fetch set: the 50 states and the District of
//! Columbia in name order, followed by Puerto Rico. `OUTLYING_TERRITORIES`
//! only takes part in FIPS lookups.

use crate::types::{Chamber, Jurisdiction, SldError, SldResult};

const fn j(name: &'static str, abbr: &'static str, fips: &'static str) -> Jurisdiction {
    Jurisdiction { name, abbr, fips }
}

/// Number of jurisdictions in the fetch set.
pub const JURISDICTION_COUNT: usize = 52;

/// States, DC, and Puerto Rico, in enumeration order.
pub static JURISDICTIONS: [Jurisdiction; JURISDICTION_COUNT] = [
    j("Alabama", "AL", "01"),
    j("Alaska", "AK", "02"),
    j("Arizona", "AZ", "04"),
    j("Arkansas", "AR", "05"),
    j("California", "CA", "06"),
    j("Colorado", "CO", "08"),
    j("Connecticut", "CT", "09"),
    j("Delaware", "DE", "10"),
    j("District of Columbia", "DC", "11"),
    j("Florida", "FL", "12"),
    j("Georgia", "GA", "13"),
    j("Hawaii", "HI", "15"),
    j("Idaho", "ID", "16"),
    j("Illinois", "IL", "17"),
    j("Indiana", "IN", "18"),
    j("Iowa", "IA", "19"),
    j("Kansas", "KS", "20"),
    j("Kentucky", "KY", "21"),
    j("Louisiana", "LA", "22"),
    j("Maine", "ME", "23"),
    j("Maryland", "MD", "24"),
    j("Massachusetts", "MA", "25"),
    j("Michigan", "MI", "26"),
    j("Minnesota", "MN", "27"),
    j("Mississippi", "MS", "28"),
    j("Missouri", "MO", "29"),
    j("Montana", "MT", "30"),
    j("Nebraska", "NE", "31"),
    j("Nevada", "NV", "32"),
    j("New Hampshire", "NH", "33"),
    j("New Jersey", "NJ", "34"),
    j("New Mexico", "NM", "35"),
    j("New York", "NY", "36"),
    j("North Carolina", "NC", "37"),
    j("North Dakota", "ND", "38"),
    j("Ohio", "OH", "39"),
    j("Oklahoma", "OK", "40"),
    j("Oregon", "OR", "41"),
    j("Pennsylvania", "PA", "42"),
    j("Rhode Island", "RI", "44"),
    j("South Carolina", "SC", "45"),
    j("South Dakota", "SD", "46"),
    j("Tennessee", "TN", "47"),
    j("Texas", "TX", "48"),
    j("Utah", "UT", "49"),
    j("Vermont", "VT", "50"),
    j("Virginia", "VA", "51"),
    j("Washington", "WA", "53"),
    j("West Virginia", "WV", "54"),
    j("Wisconsin", "WI", "55"),
    j("Wyoming", "WY", "56"),
    j("Puerto Rico", "PR", "72"),
];

/// Territories without SLD archives, kept for FIPS lookups.
pub static OUTLYING_TERRITORIES: [Jurisdiction; 4] = [
    j("American Samoa", "AS", "60"),
    j("Guam", "GU", "66"),
    j("Northern Mariana Islands", "MP", "69"),
    j("Virgin Islands", "VI", "78"),
];

/// Look up any known state or territory by FIPS code.
pub fn by_fips(fips: &str) -> Option<&'static Jurisdiction> {
    JURISDICTIONS
        .iter()
        .chain(OUTLYING_TERRITORIES.iter())
        .find(|j| j.fips == fips)
}

/// Nebraska's legislature is unicameral and DC has a single council; the host
/// publishes no lower-chamber archive for either.
const NO_LOWER_CHAMBER: [&str; 2] = ["11", "31"];

/// Whether the host publishes an archive for this pair.
pub fn has_archive(jurisdiction: &Jurisdiction, chamber: Chamber) -> bool {
    chamber == Chamber::Upper || !NO_LOWER_CHAMBER.contains(&jurisdiction.fips)
}

/// Resolve a user-supplied name, USPS abbreviation, or FIPS code to a
/// jurisdiction in the fetch set.
pub fn find(query: &str) -> SldResult<&'static Jurisdiction> {
    let q = query.trim();
    let padded;
    let fips = if q.len() == 1 && q.bytes().all(|b| b.is_ascii_digit()) {
        padded = format!("0{q}");
        padded.as_str()
    } else {
        q
    };

    JURISDICTIONS
        .iter()
        .find(|j| {
            j.fips == fips || j.abbr.eq_ignore_ascii_case(q) || j.name.eq_ignore_ascii_case(q)
        })
        .ok_or_else(|| SldError::UnknownJurisdiction(query.to_string()))
}

/// Resolve several queries, keeping table order and dropping duplicates.
pub fn select<S: AsRef<str>>(queries: &[S]) -> SldResult<Vec<Jurisdiction>> {
    if queries.is_empty() {
        return Ok(JURISDICTIONS.to_vec());
    }

    let mut wanted = Vec::with_capacity(queries.len());
    for q in queries {
        wanted.push(find(q.as_ref())?.fips);
    }

    Ok(JURISDICTIONS
        .iter()
        .filter(|j| wanted.contains(&j.fips))
        .copied()
        .collect())
}
