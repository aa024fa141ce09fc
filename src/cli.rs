//! Clap adapter, compiled only with the `clap` feature (on by default).
//!
//! [`Cli`] parses the command line. [`Cli::overrides`] turns the flags into
//! dotted settings overrides and [`ConfigArgs::into_action`] turns the
//! `config` subcommand into a [`ConfigAction`]. Everything past that point
//! is clap-free.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::types::{BlockOrder, ConfigAction, OutputStyle};

/// Merge an overlay HCL document into a base document.
#[derive(Debug, Parser)]
#[command(name = "hcloverlay", version)]
pub struct Cli {
    /// Base document to patch.
    #[arg(long, global = true)]
    pub base: Option<PathBuf>,

    /// Overlay document with overrides and additions.
    #[arg(long, global = true)]
    pub overlay: Option<PathBuf>,

    /// Write the merged document to this file instead of stdout.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Output layout.
    #[arg(long, value_enum)]
    pub style: Option<OutputStyle>,

    /// Order of merged resource and data blocks.
    #[arg(long, value_enum)]
    pub order: Option<BlockOrder>,

    /// Extra settings file, layered above the discovered ones.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// More log output (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Inspect or generate settings.
    Config(ConfigArgs),
}

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: Option<ConfigSubcommand>,
}

#[derive(Debug, Subcommand)]
pub enum ConfigSubcommand {
    /// Show all resolved settings.
    List,
    /// Generate a commented sample settings file.
    Gen {
        /// Write to a file instead of stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

impl ConfigArgs {
    /// Bare `config` and `config list` both map to `ConfigAction::List`.
    pub fn into_action(self) -> ConfigAction {
        match self.action {
            None | Some(ConfigSubcommand::List) => ConfigAction::List,
            Some(ConfigSubcommand::Gen { output }) => ConfigAction::Gen { output },
        }
    }
}

impl Cli {
    /// The flags that were given, as dotted settings overrides.
    pub fn overrides(&self) -> Vec<(&'static str, String)> {
        let mut out = Vec::new();
        if let Some(p) = &self.base {
            out.push(("base", p.display().to_string()));
        }
        if let Some(p) = &self.overlay {
            out.push(("overlay", p.display().to_string()));
        }
        if let Some(p) = &self.output {
            out.push(("output.path", p.display().to_string()));
        }
        if let Some(style) = self.style {
            out.push(("output.style", keyword(style)));
        }
        if let Some(order) = self.order {
            out.push(("merge.order", keyword(order)));
        }
        out
    }
}

fn keyword<T: clap::ValueEnum>(value: T) -> String {
    value
        .to_possible_value()
        .map(|v| v.get_name().to_string())
        .unwrap_or_default()
}
