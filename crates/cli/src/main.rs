#![deny(warnings)]

use anyhow::Context;
use circbuf_core::config::{
    resolve_capacity, resolve_output, DemoConfig, Env, OutputFormat, StdEnv, ENV_OUTPUT,
};
use circbuf_core::RingBuffer;
use clap::Parser;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "circbuf")]
#[command(about = "Fixed-capacity ring buffer demonstration")]
struct Args {
    /// Capacity of the compared buffers [env: CIRCBUF_CAPACITY] [default: 100]
    #[arg(long)]
    capacity: Option<usize>,

    /// text or json
    #[arg(long, env = ENV_OUTPUT)]
    output: Option<String>,

    #[arg(long, default_value = "info")]
    log_level: String,
}

#[derive(Serialize)]
struct BufferSnapshot<'a> {
    label: &'a str,
    capacity: usize,
    len: usize,
    items: Vec<i64>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(&args.log_level)?;

    let env = StdEnv;
    let cfg = build_config(args, &env)?;

    tracing::info!(
        capacity = cfg.capacity.get(),
        output = %cfg.output,
        "config loaded"
    );

    compare_filled(&cfg)?;
    walkthrough(cfg.output)?;

    Ok(())
}

/// Fill two equally sized buffers through indexed writes and compare them.
fn compare_filled(cfg: &DemoConfig) -> anyhow::Result<()> {
    let capacity = cfg.capacity.get();
    let mut a = RingBuffer::from_elem(capacity, 0i64);
    let mut b = RingBuffer::from_elem(capacity, 0i64);
    for i in 0..capacity {
        let v = i64::try_from(i).context("capacity does not fit in i64")?;
        a[i] = v;
        b[i] = v + 1;
    }

    report(cfg.output, "a", &a)?;
    report(cfg.output, "b", &b)?;

    let equal = a == b;
    tracing::info!(equal, "compared filled buffers");
    match cfg.output {
        OutputFormat::Text => println!("a == b: {equal}"),
        OutputFormat::Json => println!("{}", serde_json::json!({ "equal": equal })),
    }
    Ok(())
}

fn walkthrough(output: OutputFormat) -> anyhow::Result<()> {
    let mut buf = RingBuffer::with_capacity(5);
    for v in 1..=5 {
        buf.push_back(v).context("push into empty buffer")?;
    }
    report(output, "filled", &buf)?;

    let evicted = buf.push_back(6).context("push into full buffer")?;
    tracing::debug!(?evicted, "push_back on full buffer");
    report(output, "push_back(6)", &buf)?;

    buf.rotate(2);
    report(output, "rotate(2)", &buf)?;

    buf.pop_front();
    buf.insert(1, 42).context("insert after pop")?;
    report(output, "pop_front + insert(1, 42)", &buf)?;

    buf.erase(0, 2);
    report(output, "erase(0, 2)", &buf)?;

    buf.set_capacity(8);
    buf.resize(6, 0).context("resize within new capacity")?;
    report(output, "set_capacity(8) + resize(6, 0)", &buf)?;

    buf.set_capacity(2);
    report(output, "set_capacity(2)", &buf)?;

    Ok(())
}

fn report(output: OutputFormat, label: &str, buf: &RingBuffer<i64>) -> anyhow::Result<()> {
    match output {
        OutputFormat::Text => println!(
            "{label}: capacity={} len={} {:?}",
            buf.capacity(),
            buf.len(),
            buf
        ),
        OutputFormat::Json => {
            let snapshot = BufferSnapshot {
                label,
                capacity: buf.capacity(),
                len: buf.len(),
                items: buf.to_vec(),
            };
            let line = serde_json::to_string(&snapshot)
                .with_context(|| format!("failed to serialize snapshot {label}"))?;
            println!("{line}");
        }
    }
    Ok(())
}

fn init_tracing(level: &str) -> anyhow::Result<()> {
    let filter = EnvFilter::builder()
        .with_default_directive(
            level
                .parse()
                .with_context(|| format!("invalid --log-level: {level}"))?,
        )
        .from_env_lossy();

    tracing_subscriber::fmt().with_env_filter(filter).init();
    Ok(())
}

fn build_config(args: Args, env: &impl Env) -> anyhow::Result<DemoConfig> {
    let capacity = resolve_capacity(args.capacity, env)?;
    let output = resolve_output(args.output, env)?;
    Ok(DemoConfig { capacity, output })
}
