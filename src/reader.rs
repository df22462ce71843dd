use crate::request::FlightName;
use crate::time::Time;
use std::fs;
use std::io;
use std::path::Path;
use std::sync::Arc;
use tabled::Tabled;

/// One fully described takeoff request line:
/// `name aircraft destination H:MM passengers`.
#[derive(Debug, Clone, Tabled)]
pub struct Record {
    pub name: FlightName,
    pub aircraft: Arc<str>,
    pub destination: Arc<str>,
    pub requested_at: Time,
    pub passengers: u64,
}

/// Name plus passenger count, for passenger-only prioritization.
#[derive(Debug, Clone)]
pub struct Manifest {
    pub name: FlightName,
    pub passengers: u64,
}

/// First field of every line; anything after the name is ignored.
pub fn read_names(path: &Path) -> io::Result<Vec<FlightName>> {
    parse_names(&fs::read_to_string(path)?)
}

/// Fields 1 and 5 of every line.
pub fn read_manifests(path: &Path) -> io::Result<Vec<Manifest>> {
    parse_manifests(&fs::read_to_string(path)?)
}

/// Fields 1 through 5 of every line; trailing extras are ignored.
pub fn read_records(path: &Path) -> io::Result<Vec<Record>> {
    parse_records(&fs::read_to_string(path)?)
}

fn malformed(line_no: usize, reason: &str) -> io::Error {
    io::Error::new(
        io::ErrorKind::InvalidData,
        format!("line {}: {}", line_no, reason),
    )
}

fn parse_names(data: &str) -> io::Result<Vec<FlightName>> {
    let mut names = Vec::new();
    for (i, line) in data.lines().enumerate() {
        let name = line
            .split_whitespace()
            .next()
            .ok_or_else(|| malformed(i + 1, "missing flight name"))?;
        names.push(Arc::from(name));
    }
    Ok(names)
}

fn parse_manifests(data: &str) -> io::Result<Vec<Manifest>> {
    let mut manifests = Vec::new();
    for (i, line) in data.lines().enumerate() {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < 5 {
            return Err(malformed(i + 1, "expected 5 fields"));
        }
        let passengers = fields[4]
            .parse()
            .map_err(|_| malformed(i + 1, "bad passenger count"))?;
        manifests.push(Manifest {
            name: Arc::from(fields[0]),
            passengers,
        });
    }
    Ok(manifests)
}

fn parse_records(data: &str) -> io::Result<Vec<Record>> {
    let mut records = Vec::new();
    for (i, line) in data.lines().enumerate() {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < 5 {
            return Err(malformed(i + 1, "expected 5 fields"));
        }
        let requested_at =
            Time::parse(fields[3]).ok_or_else(|| malformed(i + 1, "bad request time"))?;
        let passengers = fields[4]
            .parse()
            .map_err(|_| malformed(i + 1, "bad passenger count"))?;
        records.push(Record {
            name: Arc::from(fields[0]),
            aircraft: Arc::from(fields[1]),
            destination: Arc::from(fields[2]),
            requested_at,
            passengers,
        });
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCENARIO: &str = "\
AS1021 B738 LAX 1:00 158
DL2204 A321 ATL 1:05 190
QX0112 DH8D GEG 1:05 52";

    #[test]
    fn test_names_take_the_first_field_only() {
        let names = parse_names(SCENARIO).unwrap();
        assert_eq!(names, vec!["AS1021".into(), "DL2204".into(), "QX0112".into()]);
    }

    #[test]
    fn test_names_accept_bare_name_lines() {
        let names = parse_names("AS1021\nDL2204").unwrap();
        assert_eq!(names.len(), 2);
    }

    #[test]
    fn test_names_reject_blank_lines() {
        let err = parse_names("AS1021\n\nDL2204").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn test_manifests_pick_name_and_count() {
        let manifests = parse_manifests(SCENARIO).unwrap();
        assert_eq!(manifests[1].name, "DL2204".into());
        assert_eq!(manifests[1].passengers, 190);
    }

    #[test]
    fn test_manifests_need_five_fields() {
        let err = parse_manifests("AS1021 B738 LAX 158").unwrap_err();
        assert!(err.to_string().contains("expected 5 fields"));
    }

    #[test]
    fn test_records_parse_every_field() {
        let records = parse_records(SCENARIO).unwrap();
        assert_eq!(records[0].name, "AS1021".into());
        assert_eq!(records[0].aircraft, "B738".into());
        assert_eq!(records[0].destination, "LAX".into());
        assert_eq!(records[0].requested_at, Time(60));
        assert_eq!(records[0].passengers, 158);
    }

    #[test]
    fn test_records_reject_bad_time() {
        let err = parse_records("AS1021 B738 LAX 100 158").unwrap_err();
        assert!(err.to_string().contains("line 1: bad request time"));
    }

    #[test]
    fn test_records_reject_bad_count() {
        let err = parse_records("AS1021 B738 LAX 1:00 lots").unwrap_err();
        assert!(err.to_string().contains("bad passenger count"));
    }

    #[test]
    fn test_extra_trailing_fields_are_ignored() {
        let records = parse_records("AS1021 B738 LAX 1:00 158 heavy").unwrap();
        assert_eq!(records[0].passengers, 158);
    }
}
