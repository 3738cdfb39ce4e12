//! Command dispatch

use std::io;
use std::path::Path;
use std::rc::Rc;

use clap::CommandFactory;
use clap_complete::generate;
use futures::executor::block_on;
use tracing::{debug, instrument};

use crate::application::services::{current_state, InitReport};
use crate::application::ApplicationError;
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::{global_config_path, Settings};
use crate::domain::ToggleState;
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::traits::{Clock, DocumentPort, Event, FixedClock, SystemClock};
use crate::infrastructure::{load_snapshot, Snapshot};

/// Execute the parsed CLI command.
pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let Some(command) = &cli.command else {
        return Err(CliError::Usage("no command given, see `coursenav --help`".into()));
    };
    match command {
        Commands::Render { snapshot, html } => cmd_render(cli, snapshot, *html),
        Commands::Toggle { snapshot, times } => cmd_toggle(cli, snapshot, *times),
        Commands::Config { command } => cmd_config(cli, command),
        Commands::Completion { shell } => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(*shell, &mut cmd, name, &mut io::stdout());
            Ok(())
        }
    }
}

fn load_settings(cli: &Cli) -> CliResult<Settings> {
    Ok(Settings::load(cli.config.as_deref())?)
}

/// Container for one snapshot; a pinned `now` replaces the wall clock.
fn container_for(settings: Settings, snapshot: &Snapshot) -> ServiceContainer {
    let clock: Rc<dyn Clock> = match snapshot.now {
        Some(now) => Rc::new(FixedClock(now)),
        None => Rc::new(SystemClock),
    };
    ServiceContainer::with_clock(settings, clock)
}

fn build_menu(cli: &Cli, path: &Path) -> CliResult<(ServiceContainer, InitReport)> {
    let settings = load_settings(cli)?;
    let snapshot = load_snapshot(path)?;
    let container = container_for(settings, &snapshot);
    let menu = container.menu_service();
    let report = block_on(menu.init_with(snapshot.input))?;
    debug!(?report, "init finished");
    for diagnostic in &report.diagnostics {
        output::warning(diagnostic);
    }
    Ok((container, report))
}

#[instrument(skip(cli))]
fn cmd_render(cli: &Cli, snapshot: &Path, html: bool) -> CliResult<()> {
    let (container, report) = build_menu(cli, snapshot)?;
    if html {
        output::info(&container.document.to_html());
        return Ok(());
    }
    output::info(&container.document.to_tree());
    output::detail(&format!(
        "{} entries, {} headers, {} diagnostics",
        report.entries_placed(),
        report.headers_placed(),
        report.diagnostics.len()
    ));
    Ok(())
}

#[instrument(skip(cli))]
fn cmd_toggle(cli: &Cli, snapshot: &Path, times: u32) -> CliResult<()> {
    if times == 0 {
        return Err(CliError::InvalidArgs("--times must be at least 1".into()));
    }
    let (container, report) = build_menu(cli, snapshot)?;
    let states = click_past_label(&container, &report, times)?;
    for (click, state) in states.iter().enumerate() {
        output::action(&format!("click {}", click + 1), &format!("{state:?}"));
    }
    output::info(&container.document.to_tree());
    Ok(())
}

/// Click the past group label `times` times; returns the state after each click.
fn click_past_label(
    container: &ServiceContainer,
    report: &InitReport,
    times: u32,
) -> CliResult<Vec<ToggleState>> {
    let key = &container.settings.past_group.key;
    let node = report
        .past
        .label
        .ok_or_else(|| ApplicationError::AnchorNotFound(key.clone()))?;
    let doc = container.document.as_ref();
    let states = (0..times)
        .map(|_| {
            doc.dispatch(node, &Event::click());
            current_state(doc, node)
        })
        .collect();
    Ok(states)
}

fn cmd_config(cli: &Cli, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            let settings = load_settings(cli)?;
            output::info(&settings.to_toml()?);
        }
        ConfigCommands::Path => match global_config_path() {
            Some(path) => {
                let marker = if path.exists() { "" } else { " (not present)" };
                output::info(&format!("{}{}", path.display(), marker));
            }
            None => output::warning("no config directory available on this platform"),
        },
    }
    Ok(())
}
