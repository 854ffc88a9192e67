//! Cadence: the scheduling core of a high-level synthesis compiler.
mod cmdline;
mod report;

use cadence_frontend::Workspace;
use cadence_ir::{self as ir, Printer};
use cadence_opt::passes::{Scheduler, SchedulerConfig};
use cadence_utils::{CadenceResult, Error};
use cmdline::Opts;
use report::Report;
use std::io::Write;

fn main() -> CadenceResult<()> {
    let opts: Opts = argh::from_env();

    // Configure logging.
    env_logger::Builder::new()
        .format_timestamp(None)
        .filter_level(opts.log_level)
        .target(env_logger::Target::Stderr)
        .init();

    let ws = Workspace::construct(&opts.file)?;
    let source = ws.source_name();
    let ctx: ir::Context = ir::from_ast::ast_to_ir(ws)?;

    let mut out = opts.output.get_write()?;
    if opts.dump_ir {
        Printer::write_context(&ctx, &mut out)?;
        return Ok(());
    }

    let config = SchedulerConfig::default().with_max_func_unit(opts.max_func_unit);
    let sched = Scheduler::new(config).schedule_context(&ctx)?;
    let report = Report::new(source, &ctx, &sched)?;
    serde_json::to_writer_pretty(&mut out, &report).map_err(Error::misc)?;
    writeln!(out)?;
    Ok(())
}
