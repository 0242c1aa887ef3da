#![allow(dead_code)]

use rand::Rng;
use std::fs::File;
use std::io::Error;
use std::path::Path;

pub const HEADER: [&str; 6] = ["id", "amount", "description", "payer", "involved", "timestamp"];

pub fn roster(size: usize) -> Vec<String> {
    (1..=size).map(|i| format!("p{}", i)).collect()
}

/// Writes `rows` expenses of 3.00 paid by `p1` and split with `p2`.
pub fn generate_csv(path: &Path, rows: usize) -> Result<(), Error> {
    let file = File::create(path)?;
    let mut wtr = csv::WriterBuilder::new().from_writer(file);

    wtr.write_record(HEADER)?;

    for i in 1..=rows {
        let id = i.to_string();
        wtr.write_record([
            id.as_str(),
            "3.00",
            "coffee",
            "p1",
            "p1;p2",
            "2024-05-01T08:00:00Z",
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Writes `rows` random expenses over a roster of `members` participants.
///
/// Amounts are whole cents; every row involves at least one participant.
pub fn generate_random_csv(path: &Path, rows: usize, members: usize) -> Result<(), Error> {
    let names = roster(members);
    let file = File::create(path)?;
    let mut wtr = csv::WriterBuilder::new().from_writer(file);
    let mut rng = rand::thread_rng();

    wtr.write_record(HEADER)?;

    for i in 1..=rows {
        let cents: u64 = rng.gen_range(1..=100_000);
        let payer = &names[rng.gen_range(0..members)];
        let mut involved: Vec<&str> = names
            .iter()
            .filter(|_| rng.gen_bool(0.6))
            .map(String::as_str)
            .collect();
        if involved.is_empty() {
            involved.push(payer);
        }
        let minute = i % 60;

        wtr.write_record([
            i.to_string(),
            format!("{}.{:02}", cents / 100, cents % 100),
            format!("expense {}", i),
            payer.clone(),
            involved.join(";"),
            format!("2024-05-01T12:{:02}:00Z", minute),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
