//! `sld-fetch jurisdictions` — list the embedded jurisdiction table.

use anyhow::Result;

use sld_fetch::JURISDICTIONS;

use crate::output::print_json;

pub fn run(json: bool) -> Result<()> {
    if json {
        return print_json(&JURISDICTIONS[..]);
    }

    println!("FIPS  ABBR  NAME");
    for j in JURISDICTIONS.iter() {
        println!("{:<4}  {:<4}  {}", j.fips, j.abbr, j.name);
    }
    Ok(())
}
