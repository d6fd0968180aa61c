//! Presence and size of the window dataset files.

use qoe_io::{FlowTableReader, IoError, WindowCatalog};
use tracing::{info, instrument, warn};

use crate::report::{thousands, CheckRecord, Detail};

pub(crate) const CHECK_NAME: &str = "Datasets";

fn describe(reader: &FlowTableReader) -> Result<(u64, usize), IoError> {
    let bytes = reader.file_size()?;
    let table = reader.read()?;
    Ok((bytes / 1024, table.n_rows()))
}

/// Check every catalog file exists and report its size and row count.
///
/// Passes iff every listed file exists. A file that exists but cannot be
/// read is reported as a failing line without failing the check.
#[instrument(skip_all, fields(n_windows = catalog.len()))]
pub fn validate_datasets(catalog: &WindowCatalog) -> CheckRecord {
    let mut record = CheckRecord::new(CHECK_NAME);

    for (size, path) in catalog.iter() {
        if !path.exists() {
            warn!(size, path = %path.display(), "dataset missing");
            record.push(Detail::fail(format!("{size}s: Missing - {}", path.display())));
            continue;
        }
        match describe(&FlowTableReader::new(path)) {
            Ok((kb, rows)) => {
                info!(size, kb, rows, "dataset present");
                record.push(Detail::pass(format!(
                    "{size}s: {} KB, {} rows",
                    thousands(kb),
                    thousands(rows as u64)
                )));
            }
            Err(e) => {
                warn!(size, error = %e, "dataset unreadable");
                record.note_failure(format!("{size}s: Unreadable - {e}"));
            }
        }
    }
    record
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{Mark, Status};

    #[test]
    fn all_present() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = WindowCatalog::rooted_at(dir.path());
        for (_, path) in catalog.iter() {
            std::fs::write(path, "ping,exp_id\n1,a\n2,b\n").unwrap();
        }
        let record = validate_datasets(&catalog);
        assert_eq!(record.status, Status::Passed);
        assert_eq!(record.details.len(), 4);
        assert_eq!(record.details[0].message, "3s: 0 KB, 2 rows");
    }

    #[test]
    fn one_missing_fails() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = WindowCatalog::rooted_at(dir.path());
        for (size, path) in catalog.iter() {
            if size != 15 {
                std::fs::write(path, "ping\n1\n").unwrap();
            }
        }
        let record = validate_datasets(&catalog);
        assert_eq!(record.status, Status::Failed);
        assert!(record.details[3].message.starts_with("15s: Missing - "));
    }

    #[test]
    fn unreadable_file_is_noted_but_present() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ragged.csv");
        std::fs::write(&path, "a,b\n1\n").unwrap();
        let catalog = WindowCatalog::empty().with_window(3, path);
        let record = validate_datasets(&catalog);
        assert_eq!(record.status, Status::Passed);
        assert_eq!(record.details[0].mark, Some(Mark::Fail));
    }

    #[test]
    fn size_reported_in_whole_kilobytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("big.csv");
        let mut body = String::from("value\n");
        while body.len() < 3 * 1024 {
            body.push_str("123456789\n");
        }
        std::fs::write(&path, &body).unwrap();
        let catalog = WindowCatalog::empty().with_window(5, path);
        let record = validate_datasets(&catalog);
        let expected = format!("5s: {} KB, {} rows", body.len() / 1024, body.lines().count() - 1);
        assert_eq!(record.details[0].message, expected);
    }
}
