//! Simulation output records
//!
//! One record per step, streamed as tab-separated text:
//!
//! ```text
//! Prev_Theta1  Prev_Theta2  Start_Theta1  Start_Theta2  End_Theta1  End_Theta2  Torque1  Torque2
//! ```
//!
//! Angles are printed with 6 decimals, torques with 2. The header line is
//! descriptive only; readers skip it without parsing.

use std::fmt;
use std::io::{BufRead, Write};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::SimError;
use crate::dynamics::JointState;
use crate::Vec2;

/// Header line of the record stream
pub const HEADER: &str =
    "Prev_Theta1\tPrev_Theta2\tStart_Theta1\tStart_Theta2\tEnd_Theta1\tEnd_Theta2\tTorque1\tTorque2";

/// Number of numeric fields in a record line
pub const RECORD_FIELDS: usize = 8;

/// One simulation step
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulationRecord {
    /// Start angles of the previous step [rad]
    pub prev_theta1: f64,
    pub prev_theta2: f64,
    /// Angles before this step's update [rad]
    pub start_theta1: f64,
    pub start_theta2: f64,
    /// Angles after this step's update [rad]
    pub end_theta1: f64,
    pub end_theta2: f64,
    /// Total torque applied during this step [N·m]
    pub tau1: f64,
    pub tau2: f64,
}

impl SimulationRecord {
    pub fn new(prev_theta: &Vec2, start: &JointState, end: &JointState, torque: &Vec2) -> Self {
        Self {
            prev_theta1: prev_theta.x,
            prev_theta2: prev_theta.y,
            start_theta1: start.theta.x,
            start_theta2: start.theta.y,
            end_theta1: end.theta.x,
            end_theta2: end.theta.y,
            tau1: torque.x,
            tau2: torque.y,
        }
    }

    pub fn prev_theta(&self) -> Vec2 {
        Vec2::new(self.prev_theta1, self.prev_theta2)
    }

    pub fn start_theta(&self) -> Vec2 {
        Vec2::new(self.start_theta1, self.start_theta2)
    }

    pub fn end_theta(&self) -> Vec2 {
        Vec2::new(self.end_theta1, self.end_theta2)
    }

    pub fn torque(&self) -> Vec2 {
        Vec2::new(self.tau1, self.tau2)
    }

    /// The six angle fields in stream order
    pub fn angles(&self) -> [f64; 6] {
        [
            self.prev_theta1,
            self.prev_theta2,
            self.start_theta1,
            self.start_theta2,
            self.end_theta1,
            self.end_theta2,
        ]
    }
}

impl fmt::Display for SimulationRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:.6}\t{:.6}\t{:.6}\t{:.6}\t{:.6}\t{:.6}\t{:.2}\t{:.2}",
            self.prev_theta1,
            self.prev_theta2,
            self.start_theta1,
            self.start_theta2,
            self.end_theta1,
            self.end_theta2,
            self.tau1,
            self.tau2,
        )
    }
}

/// Record line parse errors
#[derive(Debug, Error, PartialEq)]
pub enum RecordParseError {
    #[error("expected 8 fields, found {found}")]
    MissingFields { found: usize },
    #[error("field {field} is not a number: {value:?}")]
    InvalidNumber { field: usize, value: String },
}

impl FromStr for SimulationRecord {
    type Err = RecordParseError;

    /// Parse one data line; fields beyond the eighth are ignored
    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut values = [0.0; RECORD_FIELDS];
        let mut found = 0;

        for (i, token) in line.split_whitespace().take(RECORD_FIELDS).enumerate() {
            values[i] = token.parse().map_err(|_| RecordParseError::InvalidNumber {
                field: i,
                value: token.to_string(),
            })?;
            found += 1;
        }

        if found < RECORD_FIELDS {
            return Err(RecordParseError::MissingFields { found });
        }

        let [prev_theta1, prev_theta2, start_theta1, start_theta2, end_theta1, end_theta2, tau1, tau2] =
            values;

        Ok(Self {
            prev_theta1,
            prev_theta2,
            start_theta1,
            start_theta2,
            end_theta1,
            end_theta2,
            tau1,
            tau2,
        })
    }
}

/// Read a record stream
///
/// The first line is skipped unconditionally. Blank and malformed lines are
/// skipped.
pub fn read_records<R: BufRead>(reader: R) -> std::io::Result<Vec<SimulationRecord>> {
    read_records_limited(reader, usize::MAX)
}

/// Read at most `limit` records from a stream
///
/// Lines that are not valid UTF-8 count as malformed. Only I/O errors from
/// the reader are returned.
pub fn read_records_limited<R: BufRead>(
    mut reader: R,
    limit: usize,
) -> std::io::Result<Vec<SimulationRecord>> {
    let mut records = Vec::new();
    let mut buf = Vec::new();
    let mut line_no = 0usize;

    loop {
        if records.len() >= limit {
            break;
        }

        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        line_no += 1;
        if line_no == 1 {
            continue;
        }

        let line = match std::str::from_utf8(&buf) {
            Ok(line) => line,
            Err(e) => {
                tracing::debug!(line = line_no, "skipping non-UTF-8 record: {}", e);
                continue;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        match line.parse::<SimulationRecord>() {
            Ok(record) => records.push(record),
            Err(e) => tracing::debug!(line = line_no, "skipping malformed record: {}", e),
        }
    }

    Ok(records)
}

/// Consumer of simulation records
pub trait RecordSink {
    fn emit(&mut self, record: &SimulationRecord) -> Result<(), SimError>;
}

/// Writes the record stream to any `Write`
///
/// The header is written before the first record (or by [`RecordWriter::begin`]),
/// and the writer is flushed after every record.
#[derive(Debug)]
pub struct RecordWriter<W: Write> {
    inner: W,
    header_written: bool,
}

impl<W: Write> RecordWriter<W> {
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            header_written: false,
        }
    }

    /// Write the header if it has not been written yet
    pub fn begin(&mut self) -> std::io::Result<()> {
        if !self.header_written {
            writeln!(self.inner, "{}", HEADER)?;
            self.header_written = true;
        }
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> RecordSink for RecordWriter<W> {
    fn emit(&mut self, record: &SimulationRecord) -> Result<(), SimError> {
        self.begin()?;
        writeln!(self.inner, "{}", record)?;
        self.inner.flush()?;
        Ok(())
    }
}

/// In-memory record history
///
/// With a capacity, records past it are dropped.
#[derive(Debug, Clone, Default)]
pub struct SimHistory {
    records: Vec<SimulationRecord>,
    capacity: Option<usize>,
}

impl SimHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            records: Vec::with_capacity(capacity),
            capacity: Some(capacity),
        }
    }

    pub fn records(&self) -> &[SimulationRecord] {
        &self.records
    }

    pub fn last(&self) -> Option<&SimulationRecord> {
        self.records.last()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn into_records(self) -> Vec<SimulationRecord> {
        self.records
    }
}

impl RecordSink for SimHistory {
    fn emit(&mut self, record: &SimulationRecord) -> Result<(), SimError> {
        if self.capacity.map_or(true, |cap| self.records.len() < cap) {
            self.records.push(*record);
        }
        Ok(())
    }
}

impl<S: RecordSink + ?Sized> RecordSink for &mut S {
    fn emit(&mut self, record: &SimulationRecord) -> Result<(), SimError> {
        (**self).emit(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::io::Cursor;

    fn sample() -> SimulationRecord {
        SimulationRecord {
            prev_theta1: 0.5235987755982988,
            prev_theta2: 0.5235987755982988,
            start_theta1: 0.5235987755982988,
            start_theta2: 0.5235987755982988,
            end_theta1: 0.519754,
            end_theta2: -0.0000004,
            tau1: -38.442438,
            tau2: -37.216,
        }
    }

    #[test]
    fn test_record_format() {
        let line = sample().to_string();

        assert_eq!(
            line,
            "0.523599\t0.523599\t0.523599\t0.523599\t0.519754\t-0.000000\t-38.44\t-37.22"
        );
    }

    #[test]
    fn test_header_has_eight_columns() {
        assert_eq!(HEADER.split('\t').count(), RECORD_FIELDS);
        assert!(HEADER.parse::<SimulationRecord>().is_err());
    }

    #[test]
    fn test_parse_round_trip_to_precision() {
        let original = sample();
        let parsed: SimulationRecord = original.to_string().parse().unwrap();

        for (a, b) in original.angles().iter().zip(parsed.angles().iter()) {
            assert_relative_eq!(a, b, epsilon = 5e-7);
        }
        assert_relative_eq!(original.tau1, parsed.tau1, epsilon = 5e-3);
        assert_relative_eq!(original.tau2, parsed.tau2, epsilon = 5e-3);
    }

    #[test]
    fn test_parse_missing_fields() {
        let err = "0.1\t0.2\t0.3".parse::<SimulationRecord>().unwrap_err();
        assert_eq!(err, RecordParseError::MissingFields { found: 3 });
    }

    #[test]
    fn test_parse_non_numeric() {
        let err = "0.1\t0.2\tx\t0.4\t0.5\t0.6\t1.0\t2.0"
            .parse::<SimulationRecord>()
            .unwrap_err();
        assert_eq!(
            err,
            RecordParseError::InvalidNumber {
                field: 2,
                value: "x".to_string()
            }
        );
    }

    #[test]
    fn test_parse_ignores_extra_fields() {
        let record: SimulationRecord = "1 2 3 4 5 6 7 8 9".parse().unwrap();
        assert_eq!(record.tau2, 8.0);
    }

    #[test]
    fn test_reader_skips_header_and_malformed() {
        let text = format!(
            "{}\n{}\n\ngarbage line\n1\t2\n{}\n",
            HEADER,
            sample(),
            "0.1\t0.2\t0.3\t0.4\t0.5\t0.6\t7.00\t8.00"
        );

        let records = read_records(Cursor::new(text)).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[1].tau1, 7.0);
    }

    #[test]
    fn test_reader_skips_invalid_utf8_line() {
        let mut bytes = format!("{}\n{}\n", HEADER, sample()).into_bytes();
        bytes.extend_from_slice(b"\xff\xfe garbage\n");
        bytes.extend_from_slice(b"0.1\t0.2\t0.3\t0.4\t0.5\t0.6\t7.00\t8.00\r\n");

        let records = read_records(Cursor::new(bytes)).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[1].tau2, 8.0);
    }

    #[test]
    fn test_reader_propagates_io_errors() {
        struct Failing;

        impl std::io::Read for Failing {
            fn read(&mut self, _: &mut [u8]) -> std::io::Result<usize> {
                Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "gone"))
            }
        }

        let result = read_records(std::io::BufReader::new(Failing));

        assert_eq!(result.unwrap_err().kind(), std::io::ErrorKind::BrokenPipe);
    }

    #[test]
    fn test_reader_skips_first_line_even_if_numeric() {
        let text = "1 2 3 4 5 6 7 8\n9 10 11 12 13 14 15 16\n";
        let records = read_records(Cursor::new(text)).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].prev_theta1, 9.0);
    }

    #[test]
    fn test_reader_limit() {
        let mut text = String::from(HEADER);
        for _ in 0..10 {
            text.push('\n');
            text.push_str(&sample().to_string());
        }

        let records = read_records_limited(Cursor::new(text), 4).unwrap();
        assert_eq!(records.len(), 4);
    }

    #[test]
    fn test_writer_emits_header_once() {
        let mut writer = RecordWriter::new(Vec::new());
        writer.emit(&sample()).unwrap();
        writer.emit(&sample()).unwrap();

        let out = String::from_utf8(writer.into_inner()).unwrap();
        let lines: Vec<&str> = out.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], HEADER);
        assert_eq!(lines[1], sample().to_string());
    }

    #[test]
    fn test_history_capacity() {
        let mut history = SimHistory::with_capacity(2);
        for _ in 0..5 {
            history.emit(&sample()).unwrap();
        }

        assert_eq!(history.len(), 2);
    }
}
