// Shared test fixtures: a small slice of the real roster and ZIP table

use chrono::{TimeZone, Utc};

use crate::district::ZipRow;
use crate::entities::{RecordKind, RosterRow, VoteRecord};

#[allow(clippy::too_many_arguments)]
pub fn roster_row(
    id: &str,
    full_name: &str,
    first: &str,
    last: &str,
    chamber: &str,
    state: &str,
    district: &str,
    party: &str,
) -> RosterRow {
    RosterRow {
        full_name: full_name.to_string(),
        first_name: first.to_string(),
        last_name: last.to_string(),
        bioguide_id: id.to_string(),
        chamber: chamber.to_string(),
        state: state.to_string(),
        district: district.to_string(),
        party: party.to_string(),
        ..RosterRow::default()
    }
}

pub fn sample_roster() -> Vec<RosterRow> {
    let mut klobuchar = roster_row("K000367", "Amy Klobuchar", "Amy", "Klobuchar", "sen", "MN", "", "Democrat");
    klobuchar.birthday = "1960-05-25".to_string();
    klobuchar.phone = "202-224-3244".to_string();
    klobuchar.url = "https://www.klobuchar.senate.gov".to_string();

    let mut sanders = roster_row("S000033", "Bernard Sanders", "Bernard", "Sanders", "sen", "VT", "", "Independent");
    sanders.nickname = "Bernie".to_string();
    sanders.birthday = "1941-09-08".to_string();

    let mut cruz = roster_row("C001098", "Ted Cruz", "Rafael", "Cruz", "sen", "TX", "", " republican ");
    cruz.nickname = "Ted".to_string();

    vec![
        klobuchar,
        roster_row("S001203", "Tina Smith", "Tina", "Smith", "sen", "MN", "", "Democrat"),
        roster_row("O000173", "Ilhan Omar", "Ilhan", "Omar", "rep", "MN", "5", "Democrat"),
        sanders,
        roster_row("W000800", "Peter Welch", "Peter", "Welch", "sen", "VT", "", "Democrat"),
        roster_row("B001318", "Becca Balint", "Becca", "Balint", "rep", "VT", "0", "Democrat"),
        roster_row("F000479", "John Fetterman", "John", "Fetterman", "sen", "PA", "", "Democrat"),
        roster_row("C000127", "Maria Cantwell", "Maria", "Cantwell", "sen", "WA", "", "Democrat"),
        roster_row("W000802", "Sheldon Whitehouse", "Sheldon", "Whitehouse", "sen", "RI", "", "Democrat"),
        cruz,
    ]
}

pub fn zip_row(zip: &str, state: &str, cd: &str) -> ZipRow {
    ZipRow {
        zip: zip.to_string(),
        state_abbr: state.to_string(),
        cd: cd.to_string(),
    }
}

pub fn sample_zip_rows() -> Vec<ZipRow> {
    vec![
        zip_row("55401", "MN", "5"),
        zip_row("05401", "VT", "0"),
        zip_row("15201", "PA", "12"),
        zip_row("00601", "PR", "0"),
    ]
}

pub fn record(id: &str, kind: RecordKind, details: &str, names: &[&str]) -> VoteRecord {
    let timestamp = Utc
        .with_ymd_and_hms(2025, 3, 1, 0, 0, 0)
        .single()
        .expect("valid fixture timestamp");
    VoteRecord::new(id, kind, details, names, timestamp)
}
