//! User-facing console lines.
//! Colored prefixes are used only when stdout is a TTY; everything else goes
//! through `tracing`.

use owo_colors::OwoColorize;

use crate::report::{Action, Report};

fn is_tty() -> bool {
    atty::is(atty::Stream::Stdout)
}

pub fn print_info(msg: &str) {
    if is_tty() {
        println!("{} {}", "info:".cyan().bold(), msg);
    } else {
        println!("info: {}", msg);
    }
}

pub fn print_warn(msg: &str) {
    if is_tty() {
        eprintln!("{} {}", "warn:".yellow().bold(), msg);
    } else {
        eprintln!("warn: {}", msg);
    }
}

pub fn print_error(msg: &str) {
    if is_tty() {
        eprintln!("{} {}", "error:".red().bold(), msg);
    } else {
        eprintln!("error: {}", msg);
    }
}

pub fn print_success(msg: &str) {
    if is_tty() {
        println!("{} {}", "ok:".green().bold(), msg);
    } else {
        println!("ok: {}", msg);
    }
}

/// Render the end-of-run tally, one `action: count` line per action seen.
pub fn summary_lines(report: &Report) -> Vec<String> {
    const ORDER: [Action; 8] = [
        Action::Expanded,
        Action::Deleted,
        Action::Pruned,
        Action::Moved,
        Action::Renamed,
        Action::Written,
        Action::Skipped,
        Action::Failed,
    ];
    ORDER
        .iter()
        .filter_map(|a| match report.count(*a) {
            0 => None,
            n => Some(format!("{a}: {n}")),
        })
        .collect()
}

/// Print the tally; ends with a success or warning line depending on failures.
pub fn print_summary(report: &Report) {
    if report.is_empty() {
        print_success("Nothing to do; tree already tidy.");
        return;
    }
    for line in summary_lines(report) {
        println!("{line}");
    }
    let failed = report.count(Action::Failed);
    if failed > 0 {
        print_warn(&format!("{failed} item(s) failed; see the log for details."));
    } else {
        print_success(&format!("{} change(s) applied.", report.changes()));
    }
}
