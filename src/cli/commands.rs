//! Command dispatch

use std::io::{self, Write};
use std::path::Path;

use clap::CommandFactory;
use tracing::{debug, instrument};

use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::output;
use crate::cli::{CliError, CliResult};
use crate::config::{global_config_path, Settings};
use crate::domain::ConfigTree;
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::InfraError;
use crate::tree_traits::TreeNodeConvert;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    match &cli.command {
        Some(Commands::Resolve {
            file,
            no_attributes,
        }) => cmd_resolve(&build_container(cli)?, file, !no_attributes),
        Some(Commands::Check { file }) => cmd_check(&build_container(cli)?, file),
        Some(Commands::Show { file, path }) => cmd_show(&build_container(cli)?, file, path),
        Some(Commands::Config { command }) => cmd_config(cli, command),
        Some(Commands::Completion { shell }) => {
            write_completion(*shell, &mut io::stdout());
            Ok(())
        }
        None => Err(CliError::Usage(
            "no command given, see --help".to_string(),
        )),
    }
}

/// Settings are loaded only by commands that read them.
fn build_container(cli: &Cli) -> CliResult<ServiceContainer> {
    let settings = Settings::load(cli.config.as_deref())?;
    Ok(ServiceContainer::new(settings))
}

fn write_completion(shell: clap_complete::Shell, out: &mut dyn Write) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    clap_complete::generate(shell, &mut cmd, name, out);
}

fn resolve_tree(container: &ServiceContainer, file: &Path) -> CliResult<ConfigTree> {
    if !container.fs.exists(file) {
        return Err(InfraError::io(
            format!("open {}", file.display()),
            io::Error::new(io::ErrorKind::NotFound, "no such file"),
        )
        .into());
    }
    if !container.fs.is_file(file) {
        return Err(CliError::InvalidArgs(format!(
            "not a file: {}",
            file.display()
        )));
    }
    let traversal = container.traversal();
    debug!("traversal order: {:?}", traversal.order());
    Ok(container.resolve_service.resolve(file, &traversal)?)
}

#[instrument(skip(container))]
fn cmd_resolve(container: &ServiceContainer, file: &Path, cli_attributes: bool) -> CliResult<()> {
    let tree = resolve_tree(container, file)?;
    let show_attributes = cli_attributes && container.settings.output.show_attributes;
    output::info(&tree.to_tree_string(show_attributes));
    Ok(())
}

#[instrument(skip(container))]
fn cmd_check(container: &ServiceContainer, file: &Path) -> CliResult<()> {
    let tree = resolve_tree(container, file)?;
    let linked = tree.iter().filter(|(_, n)| n.base().is_some()).count();
    output::success(&format!(
        "{}: {} nodes, {} inheriting",
        file.display(),
        tree.len(),
        linked
    ));
    Ok(())
}

#[instrument(skip(container))]
fn cmd_show(container: &ServiceContainer, file: &Path, path: &str) -> CliResult<()> {
    let tree = resolve_tree(container, file)?;
    let idx = tree
        .find(path)
        .ok_or_else(|| CliError::InvalidArgs(format!("no node at path: {}", path)))?;

    output::header(&tree.label(idx));
    for (name, (value, origin)) in tree.effective_attributes(idx) {
        if origin == idx {
            output::detail(&format!("{}: {}", name, value));
        } else {
            let from = tree
                .get_node(origin)
                .map(|n| n.path_string())
                .unwrap_or_default();
            output::inherited(&format!("{}: {}", name, value), &from);
        }
    }
    Ok(())
}

fn cmd_config(cli: &Cli, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            let settings = Settings::load(cli.config.as_deref())?;
            output::info(&settings.to_toml()?);
        }
        ConfigCommands::Path => {
            match global_config_path() {
                Some(path) => output::action("global", &path.display()),
                None => output::warning("no global config directory on this platform"),
            }
            if let Some(path) = &cli.config {
                output::action("explicit", &path.display());
            }
        }
    }
    Ok(())
}
