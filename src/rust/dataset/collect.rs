use std::path::Path;

use log::info;

use super::{write_records, DatasetError, FaqRecord};

const SEED: &[(&str, &str)] = &[
    ("What courses are offered?", "courses"),
    ("Which courses are available?", "courses"),
    ("Do you offer B.Tech programs?", "courses"),
    ("Is MBA available at this college?", "courses"),
    ("What programs can I study here?", "courses"),
    ("What is the admission process?", "admission"),
    ("How do I get admission?", "admission"),
    ("Is there an entrance exam for admission?", "admission"),
    ("When do admissions open?", "admission"),
    ("What documents are needed to apply?", "admission"),
    ("What is the fee structure?", "fees"),
    ("How much is the annual fee?", "fees"),
    ("What are the tuition fees?", "fees"),
    ("Can the fees be paid in installments?", "fees"),
    ("How much does the course cost?", "fees"),
    ("Is hostel facility available?", "hostel"),
    ("Does the college provide hostel accommodation?", "hostel"),
    ("Are there separate hostels for girls?", "hostel"),
    ("Can I stay in the campus hostel?", "hostel"),
    ("Is mess food provided in the hostel?", "hostel"),
    ("What are the college timings?", "timings"),
    ("When does the college start in the morning?", "timings"),
    ("What time do classes end?", "timings"),
    ("What are the working hours of the college?", "timings"),
    ("Is the college open on saturday?", "timings"),
    ("What are the placement opportunities?", "placements"),
    ("Which companies visit for placements?", "placements"),
    ("What is the placement percentage?", "placements"),
    ("What is the highest package offered in placements?", "placements"),
    ("Does the college help with campus recruitment?", "placements"),
];

/// The built-in seed dataset: a handful of questions per intent.
pub fn seed_records() -> Vec<FaqRecord> {
    SEED.iter()
        .map(|(question, intent)| FaqRecord::new(*question, *intent))
        .collect()
}

/// Writes the seed dataset to `dest`, replacing whatever was there.
pub fn collect(dest: &Path) -> Result<usize, DatasetError> {
    let records = seed_records();
    write_records(dest, &records)?;
    info!("Seed data ({} rows) saved to {:?}", records.len(), dest);
    Ok(records.len())
}

/// Seeds `dest` only when no raw dataset exists yet. Returns the number of
/// rows written, or `None` when an existing file was kept untouched.
pub fn collect_if_missing(dest: &Path) -> Result<Option<usize>, DatasetError> {
    if dest.exists() {
        info!("Raw dataset present at {:?}", dest);
        return Ok(None);
    }
    collect(dest).map(Some)
}
