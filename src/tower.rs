use crate::heap::MinHeap;
use crate::reader;
use crate::reader::{Manifest, Record};
use crate::request::{FlightName, Request};
use crate::time::{takeoff_duration, Time};
use serde::Serialize;
use std::io;
use std::path::Path;
use std::str::FromStr;

/// Which prioritization scheme the runway runs under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Policy {
    /// First come, first served.
    Arrival,
    /// Fullest flight first, ties by arrival.
    Fullest,
    /// Fullest flight first under a simulated clock: the runway releases
    /// queued flights whenever the next request is still in the future.
    Clocked,
}

impl FromStr for Policy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1" | "arrival" => Ok(Policy::Arrival),
            "2" | "fullest" => Ok(Policy::Fullest),
            "3" | "clocked" => Ok(Policy::Clocked),
            other => Err(format!(
                "unknown policy '{}', expected 1 (arrival), 2 (fullest) or 3 (clocked)",
                other
            )),
        }
    }
}

impl std::fmt::Display for Policy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Policy::Arrival => write!(f, "arrival"),
            Policy::Fullest => write!(f, "fullest"),
            Policy::Clocked => write!(f, "clocked"),
        }
    }
}

/// One released takeoff, in departure order. `released_at` is only present
/// under the clocked policy.
#[derive(Debug, Clone, Serialize)]
pub struct Departure {
    pub name: FlightName,
    pub passengers: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub released_at: Option<Time>,
}

/// Reads the request file with the layout the policy expects and runs it.
pub fn run(path: &Path, policy: Policy) -> io::Result<Vec<Departure>> {
    Ok(match policy {
        Policy::Arrival => run_arrival(reader::read_names(path)?),
        Policy::Fullest => run_fullest(reader::read_manifests(path)?),
        Policy::Clocked => run_clocked(reader::read_records(path)?),
    })
}

/// FIFO baseline: constant keys degenerate the heap into arrival order.
pub fn run_arrival(names: Vec<FlightName>) -> Vec<Departure> {
    let mut queue = MinHeap::new();
    for (i, name) in names.into_iter().enumerate() {
        queue.push(Request::in_arrival_order(name, i as u64 + 1));
    }
    drain(queue)
}

/// Fullest flight first; equal passenger counts leave in arrival order.
pub fn run_fullest(manifests: Vec<Manifest>) -> Vec<Departure> {
    let mut queue = MinHeap::new();
    for (i, manifest) in manifests.into_iter().enumerate() {
        queue.push(Request::fullest_first(
            manifest.name,
            i as u64 + 1,
            manifest.passengers,
        ));
    }
    drain(queue)
}

/// Time-driven admission control over a single non-preemptible runway.
///
/// For each request: while its request time is still ahead of the clock,
/// release the queue minimum (which may push the clock *past* the request
/// time; the condition is only re-checked afterwards), or fast-forward an
/// idle runway straight to the request time. Then admit the request. The
/// backlog drains unconditionally once the stream ends.
pub fn run_clocked(records: Vec<Record>) -> Vec<Departure> {
    let mut clock = Time(0);
    let mut queue = MinHeap::new();
    let mut departures = Vec::new();

    for (i, record) in records.into_iter().enumerate() {
        while record.requested_at > clock {
            match queue.pop() {
                Some(request) => clock = release(request, clock, &mut departures),
                None => clock = record.requested_at,
            }
        }
        queue.push(Request::fullest_first(
            record.name,
            i as u64 + 1,
            record.passengers,
        ));
    }

    while let Some(request) = queue.pop() {
        clock = release(request, clock, &mut departures);
    }
    departures
}

/// Clears the flight for takeoff and returns the clock at the end of its
/// takeoff roll.
fn release(request: Request, clock: Time, departures: &mut Vec<Departure>) -> Time {
    let released_at = clock + takeoff_duration(request.passengers);
    departures.push(Departure {
        name: request.name,
        passengers: request.passengers,
        released_at: Some(released_at),
    });
    released_at
}

fn drain(mut queue: MinHeap<Request>) -> Vec<Departure> {
    let mut departures = Vec::new();
    while let Some(request) = queue.pop() {
        departures.push(Departure {
            name: request.name,
            passengers: request.passengers,
            released_at: None,
        });
    }
    departures
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn name(s: &str) -> FlightName {
        Arc::from(s)
    }

    fn record(n: &str, requested_at: &str, passengers: u64) -> Record {
        Record {
            name: name(n),
            aircraft: name("B738"),
            destination: name("LAX"),
            requested_at: Time::parse(requested_at).unwrap(),
            passengers,
        }
    }

    fn names(departures: &[Departure]) -> Vec<&str> {
        departures.iter().map(|d| d.name.as_ref()).collect()
    }

    #[test]
    fn test_arrival_is_fifo() {
        let departures = run_arrival(vec![name("AS1021"), name("DL2204"), name("QX0112")]);
        assert_eq!(names(&departures), vec!["AS1021", "DL2204", "QX0112"]);
        assert!(departures.iter().all(|d| d.released_at.is_none()));
    }

    #[test]
    fn test_fullest_orders_by_count_then_arrival() {
        let manifests = vec![
            Manifest { name: name("A"), passengers: 3 },
            Manifest { name: name("B"), passengers: 5 },
            Manifest { name: name("C"), passengers: 5 },
        ];
        let departures = run_fullest(manifests);
        assert_eq!(names(&departures), vec!["B", "C", "A"]);
        assert_eq!(departures[0].passengers, 5);
        assert_eq!(departures[2].passengers, 3);
    }

    #[test]
    fn test_clocked_two_flight_scenario() {
        // F1 admitted at an idle runway at 1:00; F2's 1:05 request forces
        // F1 out first (one-minute roll), then the backlog drains.
        let departures = run_clocked(vec![record("F1", "1:00", 10), record("F2", "1:05", 50)]);
        assert_eq!(names(&departures), vec!["F1", "F2"]);
        assert_eq!(departures[0].released_at, Some(Time(61)));
        assert_eq!(departures[1].released_at, Some(Time(66)));
    }

    #[test]
    fn test_clocked_release_may_overshoot_next_request() {
        // F1's roll runs to 2:24, well past F2's 1:05 request; F2 is still
        // admitted afterwards and departs from the overshot clock.
        let departures = run_clocked(vec![record("F1", "1:00", 10_000), record("F2", "1:05", 5)]);
        assert_eq!(names(&departures), vec!["F1", "F2"]);
        assert_eq!(departures[0].released_at, Some(Time(144)));
        assert_eq!(departures[1].released_at, Some(Time(145)));
    }

    #[test]
    fn test_clocked_backlog_prefers_fuller_flights() {
        // All three requests land at 1:00 before anything is released, so
        // the drain order is pure passenger priority.
        let departures = run_clocked(vec![
            record("QX0112", "1:00", 52),
            record("DL2204", "1:00", 190),
            record("AS1021", "1:00", 158),
        ]);
        assert_eq!(names(&departures), vec!["DL2204", "AS1021", "QX0112"]);
    }

    #[test]
    fn test_clocked_empty_stream_releases_nothing() {
        assert!(run_clocked(Vec::new()).is_empty());
    }

    #[test]
    fn test_policy_selector_parses_digits_and_names() {
        assert_eq!("1".parse::<Policy>(), Ok(Policy::Arrival));
        assert_eq!("2".parse::<Policy>(), Ok(Policy::Fullest));
        assert_eq!("3".parse::<Policy>(), Ok(Policy::Clocked));
        assert_eq!("clocked".parse::<Policy>(), Ok(Policy::Clocked));
        assert!("4".parse::<Policy>().is_err());
    }
}
