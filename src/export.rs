use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use csv::WriterBuilder;
use tracing::info;

use crate::assign::Assignment;
use crate::error::FileError;

pub const ASSIGNMENT_HEADER: [&str; 2] = ["Person", "Assigned Item"];

/// Writes the final assignment as a two-column CSV.
pub fn write_assignments<P: AsRef<Path>>(
    path: P,
    assignment: &Assignment,
    delimiter: u8,
) -> Result<(), FileError> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|source| FileError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    write_assignments_to(file, assignment, delimiter)?;
    info!(path = %path.display(), people = assignment.len(), "assignments saved");
    Ok(())
}

pub fn write_assignments_to<W: Write>(
    writer: W,
    assignment: &Assignment,
    delimiter: u8,
) -> Result<(), FileError> {
    let mut wtr = WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(writer);

    wtr.write_record(ASSIGNMENT_HEADER)?;
    for (person, item) in assignment {
        wtr.write_record([person.as_str(), item.as_str()])?;
    }

    wtr.flush().map_err(csv::Error::from)?;
    Ok(())
}

/// Saves a rendered text report.
pub fn write_report<P: AsRef<Path>>(path: P, report: &str) -> Result<(), FileError> {
    let path = path.as_ref();
    fs::write(path, report).map_err(|source| FileError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    info!(path = %path.display(), "report saved");
    Ok(())
}
