//! Edit command: the interactive paragraph editor.

use std::fs::File;
use std::io::{self, BufReader, IsTerminal};
use std::num::NonZeroUsize;

use anyhow::Context;
use camino::Utf8PathBuf;
use clap::Args;
use paraedit_core::config::Config;
use paraedit_core::format::FormatMode;
use paraedit_core::session::{ReportStyle, Session, SessionSettings};
use tracing::{debug, instrument};

use crate::console::{ReadlineConsole, StreamConsole};

/// Arguments for the `edit` subcommand.
#[derive(Args, Debug, Default)]
pub struct EditArgs {
    /// Read commands from FILE instead of standard input
    #[arg(long, value_name = "FILE")]
    pub script: Option<Utf8PathBuf>,

    /// Start in FIX mode with this width (overrides `fix_width`)
    #[arg(long, value_name = "WIDTH")]
    pub fix: Option<NonZeroUsize>,
}

impl EditArgs {
    fn settings(&self, global_json: bool, config: &Config) -> SessionSettings {
        let mut settings = SessionSettings::from(config);
        if let Some(width) = self.fix {
            settings.format = FormatMode::Fix(width);
        }
        if global_json {
            settings.report_style = ReportStyle::Json;
        }
        settings
    }
}

/// Run an editing session until `EXIT` or end of input.
///
/// Input comes from `--script`, else an interactive terminal with line
/// editing, else piped stdin.
#[instrument(name = "cmd_edit", skip_all, fields(script = ?args.script))]
pub fn cmd_edit(args: EditArgs, global_json: bool, config: &Config) -> anyhow::Result<()> {
    let settings = args.settings(global_json, config);
    debug!(?settings, "executing edit command");
    let mut session = Session::new(settings);

    let outcome = if let Some(ref path) = args.script {
        let file = File::open(path).with_context(|| format!("failed to open script {path}"))?;
        let mut console = StreamConsole::new(BufReader::new(file), io::stdout().lock());
        session.run(&mut console)
    } else if io::stdin().is_terminal() {
        let mut console = ReadlineConsole::new().context("failed to open terminal")?;
        session.run(&mut console)
    } else {
        let mut console = StreamConsole::new(io::stdin().lock(), io::stdout().lock());
        session.run(&mut console)
    };
    outcome.context("editing session failed")?;

    debug!(paragraphs = session.store().len(), "edit command finished");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fix_flag_overrides_config() {
        let config = Config {
            fix_width: NonZeroUsize::new(40),
            ..Config::default()
        };
        let args = EditArgs {
            fix: NonZeroUsize::new(12),
            ..EditArgs::default()
        };
        let settings = args.settings(false, &config);
        assert_eq!(settings.format, FormatMode::Fix(NonZeroUsize::new(12).unwrap()));
        assert_eq!(settings.report_style, ReportStyle::Text);
    }

    #[test]
    fn json_flag_selects_json_index() {
        let settings = EditArgs::default().settings(true, &Config::default());
        assert_eq!(settings.format, FormatMode::Raw);
        assert_eq!(settings.report_style, ReportStyle::Json);
    }

    #[test]
    fn missing_script_is_an_error() {
        let args = EditArgs {
            script: Some(Utf8PathBuf::from("/nonexistent/paraedit/script.txt")),
            ..EditArgs::default()
        };
        let err = cmd_edit(args, false, &Config::default()).unwrap_err();
        assert!(err.to_string().contains("failed to open script"));
    }
}
