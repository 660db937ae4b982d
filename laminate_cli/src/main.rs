//! # Laminate CLI
//!
//! Runs one homogenization on a stack file and writes the text report.
//!
//! ```text
//! laminate_cli [STACK_JSON] [REPORT_TXT]
//! ```
//!
//! Without a stack file a built-in glass/epoxy [0/90/90/0] cross-ply is
//! analyzed. The report goes to stdout and, when `REPORT_TXT` is given, to
//! that file. Set `RUST_LOG=debug` to trace the pipeline stages.

use std::env;
use std::path::Path;
use std::process::ExitCode;
use std::time::Instant;

use laminate_core::calculations::homogenization::{calculate, StageTiming};
use laminate_core::materials::CompositeSystem;
use laminate_core::report::{format_timings, render_report};
use laminate_core::stack::{PlyRecord, StackFile};
use laminate_core::{load_stack, save_report, LaminateError};

fn demo_stack() -> StackFile {
    let mut stack = StackFile::new("Demo cross-ply [0/90/90/0]", "");
    let glass = CompositeSystem::GlassEpoxy.material();
    for (i, angle) in [0.0, 90.0, 90.0, 0.0].iter().enumerate() {
        stack.push_ply(PlyRecord::new(format!("P{}", i + 1), *angle, 0.25, glass).with_proportion(25.0));
    }
    stack
}

fn run(stack_path: Option<&str>, report_path: Option<&str>) -> Result<(), LaminateError> {
    let start = Instant::now();
    let stack = match stack_path {
        Some(path) => load_stack(Path::new(path))?,
        None => {
            println!("No stack file given. Running built-in demo...");
            println!();
            demo_stack()
        }
    };
    let read_time = start.elapsed().as_secs_f64();

    let mut result = calculate(&stack.to_input())?;
    result.timings.insert(
        0,
        StageTiming {
            stage: "read input".to_string(),
            seconds: read_time,
        },
    );

    let report = render_report(&stack, &result);
    println!("{}", report);

    // The saved report cannot time its own write; it is listed here and in
    // the JSON output instead.
    if let Some(path) = report_path {
        let start = Instant::now();
        save_report(&report, Path::new(path))?;
        result.timings.push(StageTiming {
            stage: "write report".to_string(),
            seconds: start.elapsed().as_secs_f64(),
        });
        log::info!("report written to {}", path);
        println!("Report written to {}", path);
        print!("{}", format_timings(&result.timings));
    }

    println!();
    println!("JSON Output (for API use):");
    if let Ok(json) = serde_json::to_string_pretty(&result) {
        println!("{}", json);
    }

    // A, B and D were reported; the missing constants still fail the run
    match result.extraction_error {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

fn main() -> ExitCode {
    env_logger::init();

    let args: Vec<String> = env::args().skip(1).collect();
    if args.iter().any(|a| a == "-h" || a == "--help") || args.len() > 2 {
        eprintln!("Usage: laminate_cli [STACK_JSON] [REPORT_TXT]");
        return ExitCode::from(2);
    }

    match run(args.first().map(String::as_str), args.get(1).map(String::as_str)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            if let Ok(json) = serde_json::to_string_pretty(&e) {
                eprintln!();
                eprintln!("Error JSON:");
                eprintln!("{}", json);
            }
            ExitCode::FAILURE
        }
    }
}
