//! Run statistics, surfaced by the CLI's `-s` flag.

/// Counters accumulated over a single optimization run.
#[derive(Debug, Clone, Copy, Default)]
pub struct Stats {
    /// Gate count before optimization.
    pub initial_gates: usize,
    /// Gate count after optimization.
    pub final_gates: usize,
    /// Number of windows extracted.
    pub windows_extracted: usize,
    /// Number of candidates that passed feasibility and were synthesized.
    pub candidates_synthesized: usize,
    /// Number of synthesized candidates actually spliced into the graph.
    pub candidates_applied: usize,
    /// Number of candidates discarded on revalidation (stale MFFC/TFO).
    pub candidates_rejected: usize,
    /// Wall-clock time spent in [`crate::run`], from window extraction
    /// through the final splice.
    pub wall_time: std::time::Duration,
}

impl Stats {
    /// Net gates removed (positive) or added (negative) by the run.
    #[must_use]
    pub fn gates_saved(&self) -> i64 {
        self.initial_gates as i64 - self.final_gates as i64
    }
}

impl std::fmt::Display for Stats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "initial gates:         {}", self.initial_gates)?;
        writeln!(f, "final gates:           {}", self.final_gates)?;
        writeln!(f, "gates saved:           {}", self.gates_saved())?;
        writeln!(f, "windows extracted:     {}", self.windows_extracted)?;
        writeln!(f, "candidates synthesized:{}", self.candidates_synthesized)?;
        writeln!(f, "candidates applied:    {}", self.candidates_applied)?;
        writeln!(f, "candidates rejected:   {}", self.candidates_rejected)?;
        write!(f, "wall time:             {:.3}s", self.wall_time.as_secs_f64())
    }
}
