//! Result sinks.
//!
//! The enumerator hands every conflict-free combination to a
//! [`ResultSink`]. Emission may block (a socket with backpressure); the
//! enumerator does not advance its counter until `emit` returns. An `Err`
//! ends the walk; nothing is retried.

use std::io::Write;

use crate::error::SinkError;
use crate::models::{Combination, Schedule};

/// Consumer of conflict-free combinations.
pub trait ResultSink {
    /// Accepts one combination. The combination borrows the candidate
    /// lists; copy whatever must outlive the call.
    fn emit(&mut self, combination: &Combination<'_>) -> Result<(), SinkError>;
}

impl<F> ResultSink for F
where
    F: FnMut(&Combination<'_>) -> Result<(), SinkError>,
{
    fn emit(&mut self, combination: &Combination<'_>) -> Result<(), SinkError> {
        self(combination)
    }
}

/// Keeps owned copies of every emission.
#[derive(Debug, Clone, Default)]
pub struct CollectSink {
    /// Emitted timetables, in emission order.
    pub schedules: Vec<Schedule>,
}

impl CollectSink {
    /// Creates an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of collected timetables.
    pub fn len(&self) -> usize {
        self.schedules.len()
    }

    /// Whether nothing was collected.
    pub fn is_empty(&self) -> bool {
        self.schedules.is_empty()
    }

    /// Index vectors of the collected timetables.
    pub fn index_vectors(&self) -> Vec<Vec<usize>> {
        self.schedules.iter().map(|s| s.indexes.clone()).collect()
    }

    /// Consumes the sink, returning the timetables.
    pub fn into_schedules(self) -> Vec<Schedule> {
        self.schedules
    }
}

impl ResultSink for CollectSink {
    fn emit(&mut self, combination: &Combination<'_>) -> Result<(), SinkError> {
        self.schedules.push(combination.to_schedule());
        Ok(())
    }
}

/// Counts emissions without keeping them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CountingSink {
    pub count: u64,
}

impl ResultSink for CountingSink {
    fn emit(&mut self, _combination: &Combination<'_>) -> Result<(), SinkError> {
        self.count += 1;
        Ok(())
    }
}

/// Writes each emission as one JSON document per line.
///
/// The line holds the selected sections as an array, the shape the
/// websocket front end streams to browsers.
#[derive(Debug)]
pub struct JsonLinesSink<W: Write> {
    writer: W,
}

impl<W: Write> JsonLinesSink<W> {
    /// Wraps a writer.
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Returns the writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> ResultSink for JsonLinesSink<W> {
    fn emit(&mut self, combination: &Combination<'_>) -> Result<(), SinkError> {
        serde_json::to_writer(&mut self.writer, &combination.sections)?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HourConvention;
    use crate::models::{Category, MeetingInterval, Section};

    fn lists() -> Vec<Section> {
        vec![Section::new("STAT260", Category::PrimaryLecture)
            .with_interval(
                MeetingInterval::parse("TWF", "11:30 am - 12:20 pm", HourConvention::Standard)
                    .unwrap(),
            )
            .with_identifier("20001")
            .with_display_code("A01")]
    }

    #[test]
    fn test_collect_sink() {
        let sections = lists();
        let candidate: Vec<&[Section]> = vec![sections.as_slice()];
        let mut sink = CollectSink::new();
        sink.emit(&Combination::select(&candidate, &[0])).unwrap();

        assert_eq!(sink.len(), 1);
        assert_eq!(sink.index_vectors(), vec![vec![0]]);
        assert_eq!(sink.into_schedules()[0].sections[0].identifiers, vec!["20001"]);
    }

    #[test]
    fn test_counting_sink() {
        let sections = lists();
        let candidate: Vec<&[Section]> = vec![sections.as_slice()];
        let mut sink = CountingSink::default();
        sink.emit(&Combination::select(&candidate, &[0])).unwrap();
        sink.emit(&Combination::select(&candidate, &[0])).unwrap();
        assert_eq!(sink.count, 2);
    }

    #[test]
    fn test_closure_sink() {
        let sections = lists();
        let candidate: Vec<&[Section]> = vec![sections.as_slice()];
        let mut seen = 0;
        {
            let mut sink = |_: &Combination<'_>| -> Result<(), SinkError> {
                seen += 1;
                Ok(())
            };
            sink.emit(&Combination::select(&candidate, &[0])).unwrap();
        }
        assert_eq!(seen, 1);

        let mut closed = |_: &Combination<'_>| -> Result<(), SinkError> { Err(SinkError::Closed) };
        assert_eq!(
            closed.emit(&Combination::select(&candidate, &[0])),
            Err(SinkError::Closed)
        );
    }

    #[test]
    fn test_json_lines_sink() {
        let sections = lists();
        let candidate: Vec<&[Section]> = vec![sections.as_slice()];
        let mut sink = JsonLinesSink::new(Vec::new());
        sink.emit(&Combination::select(&candidate, &[0])).unwrap();
        sink.emit(&Combination::select(&candidate, &[0])).unwrap();

        let out = String::from_utf8(sink.into_inner()).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        let value: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(value[0]["course"], "STAT260");
        assert_eq!(value[0]["display_codes"][0], "A01");
    }

    #[test]
    fn test_json_lines_sink_write_failure() {
        struct Broken;
        impl Write for Broken {
            fn write(&mut self, _: &[u8]) -> std::io::Result<usize> {
                Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "peer gone"))
            }
            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        let sections = lists();
        let candidate: Vec<&[Section]> = vec![sections.as_slice()];
        let mut sink = JsonLinesSink::new(Broken);
        assert!(matches!(
            sink.emit(&Combination::select(&candidate, &[0])),
            Err(SinkError::Write(_))
        ));
    }
}
