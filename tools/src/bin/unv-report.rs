use anyhow::Context as _;
use anyhow::Result;
use std::io;
use std::time::Instant;

const USAGE: &str = "Usage: unv-report [options] [in.unv] <in.unv";

fn main() -> Result<()> {
    let mut options = getopts::Options::new();
    options.optopt("t", "trace", "emit a chrome trace", "FILE");
    options.optflag("v", "verbose", "print element types and length scale");

    let matches = unv_tools::parse_args(options, USAGE, 1)?;
    let _chrome_trace_guard = unv_tools::init_tracing(matches.opt_str("t"));

    let start = Instant::now();
    let mesh = unv_tools::read_mesh(matches.free.first())?;
    eprintln!("read mesh in {:?}", start.elapsed());

    let stdout = io::stdout();
    let stdout = stdout.lock();
    let stdout = io::BufWriter::new(stdout);
    unv_tools::write_report(stdout, &mesh, matches.opt_present("v"))
        .context("failed to print report")?;

    Ok(())
}
