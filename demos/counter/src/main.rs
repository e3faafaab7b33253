//! Counter - Minimal hookstore example
//!
//! Two unrelated "components" share one reducer store through the global
//! registry. A producer task sends actions over a channel, the main loop
//! dispatches them, and every mounted component re-renders with the new
//! count. A watch stream logs each `(state, action)` pair on the side.
//!
//! Run with `--verbose` (or `RUST_LOG=debug`) to see the registry's update
//! tracing.

use std::time::Duration;

use clap::Parser;
use hookstore::global;
use hookstore::prelude::*;
use hookstore::Result;
use tokio::sync::mpsc;
use tokio_stream::StreamExt;

#[derive(Parser, Debug)]
#[command(name = "counter")]
#[command(about = "Share a counter between components through a named store")]
struct Args {
    /// Number of increments the producer sends
    #[arg(short, long, default_value_t = 5)]
    steps: u32,

    /// Milliseconds between increments
    #[arg(long, default_value_t = 50)]
    interval_ms: u64,

    /// Only trace stores whose names match these comma-separated globs
    #[arg(long, value_name = "PATTERNS")]
    trace: Option<String>,

    /// Enable verbose logging to stderr
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Debug)]
enum CounterAction {
    Increment(i64),
    Decrement(i64),
    Reset,
}

fn reducer(count: &i64, action: &CounterAction) -> i64 {
    match action {
        CounterAction::Increment(by) => count + by,
        CounterAction::Decrement(by) => count - by,
        CounterAction::Reset => 0,
    }
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    StoreRegistry::init_global(RegistryConfig::new(args.trace.as_deref(), None));

    let Some(counter) = global::create_store_with_reducer("counter", 0, reducer) else {
        tracing::error!("a store named `counter` already exists");
        return Ok(());
    };

    // Components look the store up by name; neither holds the handle above.
    let header = global::use_store::<i64, CounterAction, _>("counter", |count: &i64| {
        println!("[header] count = {count}");
    })?;
    let footer = global::use_store::<i64, CounterAction, _>(&counter, |count: &i64| {
        println!("[footer] {}", if *count % 2 == 0 { "even" } else { "odd" });
    })?;

    let mut updates = counter.watch();
    let watcher = tokio::spawn(async move {
        while let Some((count, action)) = updates.next().await {
            tracing::info!(count, ?action, "counter updated");
        }
    });

    let (action_tx, mut action_rx) = mpsc::unbounded_channel::<CounterAction>();
    let steps = args.steps;
    let interval = Duration::from_millis(args.interval_ms);
    tokio::spawn(async move {
        for step in 1..=steps {
            let action = if step % 3 == 0 {
                CounterAction::Decrement(1)
            } else {
                CounterAction::Increment(i64::from(step))
            };
            if action_tx.send(action).is_err() {
                break;
            }
            tokio::time::sleep(interval).await;
        }
    });

    while let Some(action) = action_rx.recv().await {
        counter.dispatch(action);
    }

    // The footer stops rendering; the header still sees the reset.
    drop(footer);
    global::dispatch_directly::<i64, CounterAction>("counter", CounterAction::Reset)?;

    tracing::info!(
        header = header.state(),
        total = global::read_only_store::<i64, CounterAction>("counter")?,
        "done"
    );

    // The store lives in the global registry, so the watch never ends on its own
    watcher.abort();
    Ok(())
}
