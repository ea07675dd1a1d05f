use std::{
    io::Read,
    path::{Path, PathBuf},
    process::ExitCode,
    time::Instant,
};

use anyhow::{Context, Result};
use bloomish::{
    AddressHash, ContentHash,
    checker::{self, Report},
    intern::Interner,
};
use bumpalo::Bump;
use clap::Parser;
use log::{debug, error, info};
use typed_arena::Arena;

use arguments::CliArgs;

mod arguments;
mod logging;

/// cli entrypoint
fn main() -> ExitCode {
    let args = CliArgs::parse();

    if let Err(e) = logging::init(args.log_level(), args.color, args.error_limit) {
        eprintln!("{}: error: {e}", env!("CARGO_BIN_NAME"));
        return ExitCode::FAILURE;
    }

    match try_main(&args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

/// Checks every input and returns `true` if none of them had diagnostics.
fn try_main(args: &CliArgs) -> Result<bool> {
    let strings = Bump::new();
    let atoms = Arena::new();
    let mut interner = Interner::new(&atoms, &strings);

    let stdin = [PathBuf::from("-")];
    let inputs = if args.files.is_empty() {
        &stdin[..]
    } else {
        &args.files[..]
    };

    let mut clean = true;
    for path in inputs {
        let name = display_name(path);
        let source = read_input(path).with_context(|| format!("cannot read {name}"))?;

        let it = Instant::now();
        let report = if args.deterministic {
            checker::check_source::<ContentHash>(&source, &mut interner)
        } else {
            checker::check_source::<AddressHash>(&source, &mut interner)
        }
        .with_context(|| name.clone())?;
        let elapsed = it.elapsed();

        report_diagnostics(&name, &report);
        clean &= report.is_clean();

        if args.stats {
            info!(
                "{name}: {} declarations, {} references, {} fast hits, {} exact lookups",
                report.declarations,
                report.references,
                report.stats.fast_hits,
                report.stats.exact_lookups
            );
        }

        if args.print_timing {
            info!(
                "{name}: check time: {}ms",
                elapsed.as_micros() as f64 / 1000f64
            );
        }
    }

    debug!("interned {} names", interner.len());
    Ok(clean)
}

fn report_diagnostics(name: &str, report: &Report) {
    for diagnostic in &report.diagnostics {
        error!("{name}:{}: {diagnostic}", diagnostic.line());
    }
}

fn display_name(path: &Path) -> String {
    if path == Path::new("-") {
        String::from("<stdin>")
    } else {
        path.display().to_string()
    }
}

fn read_input(path: &Path) -> std::io::Result<String> {
    if path == Path::new("-") {
        let mut source = String::new();
        std::io::stdin().read_to_string(&mut source)?;
        Ok(source)
    } else {
        std::fs::read_to_string(path)
    }
}
