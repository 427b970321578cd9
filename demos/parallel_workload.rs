//! Multi-threaded demo workload.
//!
//! Runs a few instrumented busy functions serially and on worker threads
//! while one trace session is open, then prints where the timeline landed.
//! Open the output in `chrome://tracing` or https://ui.perfetto.dev/
//!
//! ```bash
//! cargo run --example parallel-workload -- --output trace.json
//! ```

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use scope_trace::TraceSession;

#[derive(Parser)]
#[command(
    name = "parallel-workload",
    about = "Demo workload exercising the scope tracer across threads"
)]
struct Args {
    /// Trace destination
    #[arg(short, long, default_value = "results.json")]
    output: PathBuf,

    /// Iterations per busy function
    #[arg(long, default_value = "1000")]
    iterations: u64,
}

fn count_up(iterations: u64) -> u64 {
    scope_trace::profile_function!();
    let mut acc = 0u64;
    for i in 0..iterations {
        acc = acc.wrapping_add(std::hint::black_box(i));
    }
    acc
}

fn sum_of_roots(iterations: u64) -> f64 {
    scope_trace::profile_function!();
    let mut acc = 0.0f64;
    for i in 0..iterations {
        acc += std::hint::black_box(i as f64).sqrt();
    }
    acc
}

fn shifted_count(iterations: u64, offset: u64) -> u64 {
    scope_trace::profile_function!();
    let mut acc = 0u64;
    for i in 0..iterations {
        acc = acc.wrapping_add(std::hint::black_box(i + offset));
    }
    acc
}

fn run_workload(iterations: u64) {
    scope_trace::profile_function!();

    count_up(iterations);
    sum_of_roots(iterations);
    shifted_count(iterations, 2);

    // the same functions again, interleaved across worker threads
    let workers = [
        std::thread::spawn(move || {
            sum_of_roots(iterations);
        }),
        std::thread::spawn(move || {
            count_up(iterations);
        }),
        std::thread::spawn(move || {
            shifted_count(iterations, 3);
        }),
    ];
    for worker in workers {
        let _ = worker.join();
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let session = TraceSession::global();
    session.begin_at("parallel-workload", &args.output)?;
    run_workload(args.iterations);
    session.end()?;

    println!(
        "wrote trace to {} - open it in chrome://tracing",
        args.output.display()
    );
    Ok(())
}
