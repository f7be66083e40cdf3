//! Output formatting for solver results

use aoc_runner::{RunSummary, SolverResult};
use std::fmt::Write as _;
use std::time::{Duration, Instant};

/// Prints results and the closing summary of a run
pub struct OutputFormatter {
    start_time: Instant,
}

impl OutputFormatter {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
        }
    }

    /// Print one result of a multi-solver run, preceded by its logs
    pub fn print_result(&self, result: &SolverResult) {
        print!("{}", format_result(result));
    }

    /// Print the outcome of a single-solver run; returns the exit code
    pub fn print_single(&self, result: &SolverResult) -> i32 {
        println!("Duration: {:.3}s", result.duration.as_secs_f64());
        match &result.correct_answer {
            Some(correct) if result.incorrect() => {
                eprintln!("Incorrect answer: {}. Correct is: {}", result.answer, correct);
                2
            }
            Some(_) => {
                println!("Answer is still correct: {}", result.answer);
                0
            }
            None => {
                println!("{}", result.answer);
                0
            }
        }
    }

    /// Print the slowest result and the final verdict
    pub fn print_summary(&self, summary: &RunSummary) {
        print!("{}", format_summary(summary, self.start_time.elapsed()));
    }
}

fn prefix(result: &SolverResult) -> String {
    let id = &result.id;
    format!("{} {:>2} {} {}:", id.year, id.day, id.part, id.backend)
}

fn format_result(result: &SolverResult) -> String {
    let prefix = prefix(result);
    let mut out = String::new();
    if let Some(logs) = result.logs.as_deref()
        && !logs.is_empty()
    {
        writeln!(out, "{prefix}  LOGS:").ok();
        for line in logs {
            writeln!(out, "    {line}").ok();
        }
    }
    write!(out, "{prefix} {:.3}s: ", result.duration.as_secs_f64()).ok();
    match &result.correct_answer {
        Some(correct) if result.incorrect() => {
            writeln!(
                out,
                "FAIL: Incorrect answer: {}. Correct is: {}",
                result.answer, correct
            )
            .ok();
        }
        _ => {
            writeln!(out, "PASS").ok();
        }
    }
    out
}

fn format_summary(summary: &RunSummary, elapsed: Duration) -> String {
    let mut out = String::new();
    if let Some(slowest) = summary.slowest() {
        let id = &slowest.id;
        writeln!(
            out,
            "Slowest: {} {:>2} {}: {:.3}s",
            id.year,
            id.day,
            id.part,
            slowest.duration.as_secs_f64()
        )
        .ok();
    }
    let verdict = match summary.all_passed() {
        None => "No answers known.",
        Some(true) => "Finished with all passing.",
        Some(false) => "Finished with failures.",
    };
    writeln!(out, "{verdict} Duration {:.3}s", elapsed.as_secs_f64()).ok();
    out
}
