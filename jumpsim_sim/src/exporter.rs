//! JSON exporter for sample-path inspection.
//!
//! Exports one sample path as a list of query frames for offline plotting.

use jumpsim_env::RunId;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// A single query point along a sample path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryFrame {
    /// Simulated time of the query
    pub time: f64,

    /// Observation, encoded as a number (1/0 for yes/no observations)
    pub observation: f64,

    /// Shocks fired since the previous frame
    pub events: usize,
}

/// Complete sample-path export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrajectoryExport {
    /// Scenario name
    pub scenario: String,

    /// Seed used
    pub seed: u64,

    /// Path that was sampled
    pub path: RunId,

    /// Simulated time covered
    pub duration: f64,

    /// All frames
    pub frames: Vec<TrajectoryFrame>,

    /// Total shocks fired across all frames
    pub total_events: usize,
}

impl TrajectoryExport {
    /// Creates a new export container.
    pub fn new(scenario: &str, seed: u64, path: RunId) -> Self {
        Self {
            scenario: scenario.to_string(),
            seed,
            path,
            duration: 0.0,
            frames: Vec::new(),
            total_events: 0,
        }
    }

    /// Adds a frame.
    pub fn add_frame(&mut self, frame: TrajectoryFrame) {
        self.duration = frame.time;
        self.total_events += frame.events;
        self.frames.push(frame);
    }

    /// Writes to a JSON file.
    pub fn write_to_file<P: AsRef<Path>>(&self, path: P) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        let mut file = File::create(path)?;
        file.write_all(json.as_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_frame_tracks_totals() {
        let mut export = TrajectoryExport::new("fixed_step", 42, RunId(0));
        export.add_frame(TrajectoryFrame {
            time: 0.5,
            observation: 1.0,
            events: 2,
        });
        export.add_frame(TrajectoryFrame {
            time: 1.0,
            observation: 0.0,
            events: 1,
        });

        assert_eq!(export.frames.len(), 2);
        assert_eq!(export.duration, 1.0);
        assert_eq!(export.total_events, 3);
    }

    #[test]
    fn test_write_and_read_back() {
        let mut export = TrajectoryExport::new("queue_idle", 7, RunId(0));
        export.add_frame(TrajectoryFrame {
            time: 0.1,
            observation: 3.0,
            events: 0,
        });

        let path = std::env::temp_dir().join(format!("jumpsim_export_{}.json", std::process::id()));
        export.write_to_file(&path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let back: TrajectoryExport = serde_json::from_str(&text).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(back.scenario, "queue_idle");
        assert_eq!(back.path, RunId(0));
        assert_eq!(back.frames, export.frames);
    }
}
