pub mod analyze;
pub mod hints;
pub mod run;

use super::args::{Cli, Command};
use crate::exit_codes;

pub(crate) async fn dispatch(cli: Cli) -> anyhow::Result<i32> {
    match cli.cmd {
        Command::Run(args) => run::run(args).await,
        Command::Analyze(args) => analyze::show(args),
        Command::ShowHints(args) => hints::show(args),
        Command::Version => {
            println!("hintprobe {}", env!("CARGO_PKG_VERSION"));
            Ok(exit_codes::SUCCESS)
        }
    }
}
