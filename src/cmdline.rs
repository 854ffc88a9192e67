use argh::FromArgs;
use cadence_opt::analysis::MAX_FUNC_UNIT;
use cadence_utils::OutputFile;
use std::path::PathBuf;

#[derive(FromArgs)]
#[argh(help_triggers("-h", "--help"))]
/// Cadence: schedule the operations of a lowered program onto clock cycles
pub struct Opts {
    /// input program description (JSON), stdin when absent
    #[argh(positional)]
    pub file: Option<PathBuf>,

    /// output file, default is stdout
    #[argh(
        option,
        short = 'o',
        long = "output",
        default = "OutputFile::Stdout"
    )]
    pub output: OutputFile,

    /// number of instances of every shared function unit
    #[argh(option, long = "max-func-unit", default = "MAX_FUNC_UNIT")]
    pub max_func_unit: usize,

    /// log level for debugging the scheduler
    #[argh(option, long = "log", default = "log::LevelFilter::Warn")]
    pub log_level: log::LevelFilter,

    /// print the lowered IR instead of the schedule
    #[argh(switch, long = "dump-ir")]
    pub dump_ir: bool,
}
