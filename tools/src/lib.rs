use anyhow::Context as _;
use anyhow::Result;
use itertools::Itertools as _;
use std::env;
use std::io;
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::layer::SubscriberExt as _;
use tracing_subscriber::util::SubscriberInitExt as _;
use tracing_subscriber::Registry;
use tracing_tree::HierarchicalLayer;
use unv::GroupKind;
use unv::Mesh;

/// Parses the command line, printing the usage and exiting on `-h`.
///
/// At most `max_free` positional arguments are accepted.
pub fn parse_args(
    mut options: getopts::Options,
    usage: &str,
    max_free: usize,
) -> Result<getopts::Matches> {
    options.optflag("h", "help", "print this help menu");
    let matches = options.parse(env::args().skip(1))?;

    if matches.opt_present("h") {
        eprintln!("{}", options.usage(usage));
        std::process::exit(0);
    }

    if matches.free.len() > max_free {
        anyhow::bail!("too many arguments\n\n{}", options.usage(usage));
    }

    Ok(matches)
}

/// Installs the diagnostic subscriber: `LOG` filters events, and a chrome
/// trace is written to `trace_file` when given.
///
/// The returned guard flushes the trace when dropped.
pub fn init_tracing(trace_file: Option<String>) -> Option<tracing_chrome::FlushGuard> {
    let registry = Registry::default().with(EnvFilter::from_env("LOG")).with(
        HierarchicalLayer::new(4)
            .with_targets(true)
            .with_bracketed_fields(true),
    );
    match trace_file {
        Some(filename) => {
            let (chrome_layer, guard) = tracing_chrome::ChromeLayerBuilder::new()
                .file(filename)
                .build();
            registry.with(chrome_layer).init();
            Some(guard)
        }
        None => {
            registry.init();
            None
        }
    }
}

/// Reads the mesh at `filename`, or from standard input.
pub fn read_mesh(filename: Option<&String>) -> Result<Mesh> {
    Ok(match filename {
        Some(filename) => unv::read(filename).context("failed to read mesh file")?,
        None => {
            let stdin = io::stdin();
            let stdin = stdin.lock();
            Mesh::from_reader(stdin).context("failed to read mesh from stdin")?
        }
    })
}

/// Writes a summary of `mesh`, one item per line.
pub fn write_report(mut w: impl io::Write, mesh: &Mesh, verbose: bool) -> io::Result<()> {
    match mesh.units() {
        Some(units) => writeln!(w, "units: {units}")?,
        None => writeln!(w, "units: none")?,
    }
    if verbose {
        let length_scale = mesh.units().map_or(1.0, |units| units.length_scale());
        writeln!(w, "length scale: {length_scale}")?;
    }

    writeln!(w, "vertices: {}", mesh.vertex_count())?;
    writeln!(w, "elements: {}", mesh.element_count())?;
    if verbose {
        for (element_type, count) in mesh.element_type_counts().into_iter().sorted() {
            writeln!(w, "  {element_type}: {count}")?;
        }
    }

    let groups = mesh.groups().unwrap_or_default();
    writeln!(w, "groups: {}", groups.len())?;
    for group in groups {
        writeln!(
            w,
            "group {}: {}, {} members",
            group.name(),
            group.kind(),
            group.len(),
        )?;
        if verbose && group.kind() == GroupKind::Element {
            writeln!(w, "  types: {}", group.element_types().iter().join(", "))?;
        }
    }

    Ok(())
}
