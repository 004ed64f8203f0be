use std::io::Write;
use std::path::{Path, PathBuf};

use argh::FromArgs;
use bytesize::ByteSize;
use colored::Colorize;
use memcard::Locator;

use crate::info::{format_modified, CardInfo};
use crate::{resolve_config, CardLibrary, Config, Error};

#[derive(FromArgs, Debug)]
/// List the saves on PS2 memory-card images and manage a card library.
pub struct Args {
    /// path to an mcsaves.toml configuration file
    #[argh(option, short = 'c')]
    pub config: Option<PathBuf>,
    /// print the per-slot scan trace to stderr
    #[argh(switch, short = 'v')]
    pub verbose: bool,
    #[argh(subcommand)]
    pub command: Command,
}

#[derive(FromArgs, Debug)]
#[argh(subcommand)]
pub enum Command {
    Saves(SavesArgs),
    Info(InfoArgs),
    Cards(CardsArgs),
    Import(ImportArgs),
    Create(CreateArgs),
    Export(ExportArgs),
    Delete(DeleteArgs),
}

#[derive(FromArgs, Debug)]
/// List the saves stored on a memory card.
#[argh(subcommand, name = "saves")]
pub struct SavesArgs {
    /// memory card image
    #[argh(positional)]
    pub card: PathBuf,
    /// directory locator: heuristic, superblock or auto
    #[argh(option)]
    pub locator: Option<Locator>,
    /// print name|size|isDirectory records
    #[argh(switch)]
    pub records: bool,
    /// print the decoded entries as JSON
    #[argh(switch)]
    pub json: bool,
}

#[derive(FromArgs, Debug)]
/// Show size, modification time and superblock of a memory card.
#[argh(subcommand, name = "info")]
pub struct InfoArgs {
    /// memory card image
    #[argh(positional)]
    pub card: PathBuf,
}

#[derive(FromArgs, Debug)]
/// List the memory cards in the library.
#[argh(subcommand, name = "cards")]
pub struct CardsArgs {
    /// library directory (defaults to library.dir from the config)
    #[argh(option)]
    pub dir: Option<PathBuf>,
}

#[derive(FromArgs, Debug)]
/// Copy memory cards into the library.
#[argh(subcommand, name = "import")]
pub struct ImportArgs {
    /// card files (.ps2) to import
    #[argh(positional)]
    pub files: Vec<PathBuf>,
    /// library directory (defaults to library.dir from the config)
    #[argh(option)]
    pub dir: Option<PathBuf>,
}

#[derive(FromArgs, Debug)]
/// Create a blank 8 MiB memory card in the library.
#[argh(subcommand, name = "create")]
pub struct CreateArgs {
    /// card file name (defaults to the first free slot, Mcd001.ps2 or Mcd002.ps2)
    #[argh(positional)]
    pub name: Option<String>,
    /// library directory (defaults to library.dir from the config)
    #[argh(option)]
    pub dir: Option<PathBuf>,
}

#[derive(FromArgs, Debug)]
/// Copy a memory card out of the library.
#[argh(subcommand, name = "export")]
pub struct ExportArgs {
    /// card file name inside the library
    #[argh(positional)]
    pub name: String,
    /// destination directory
    #[argh(positional)]
    pub destination: PathBuf,
    /// replace an existing file at the destination
    #[argh(switch)]
    pub force: bool,
    /// library directory (defaults to library.dir from the config)
    #[argh(option)]
    pub dir: Option<PathBuf>,
}

#[derive(FromArgs, Debug)]
/// Delete a memory card from the library.
#[argh(subcommand, name = "delete")]
pub struct DeleteArgs {
    /// card file name inside the library
    #[argh(positional)]
    pub name: String,
    /// library directory (defaults to library.dir from the config)
    #[argh(option)]
    pub dir: Option<PathBuf>,
}

pub fn run<W: Write>(args: Args, out: &mut W) -> Result<(), Error> {
    let config = resolve_config(args.config.as_deref())?;

    match args.command {
        Command::Saves(cmd) => saves(cmd, &config, out),
        Command::Info(cmd) => info(&cmd.card, out),
        Command::Cards(cmd) => cards(&library(cmd.dir, &config), out),
        Command::Import(cmd) => import(&library(cmd.dir, &config), &cmd.files, out),
        Command::Create(cmd) => {
            let path = library(cmd.dir, &config).create(cmd.name.as_deref())?;
            writeln!(out, "Memory card created: {}", path.display())?;
            Ok(())
        }
        Command::Export(cmd) => {
            let destination = library(cmd.dir, &config).export(
                &cmd.name,
                &cmd.destination,
                cmd.force,
            )?;
            writeln!(
                out,
                "Memory card exported successfully: {}",
                destination.display()
            )?;
            Ok(())
        }
        Command::Delete(cmd) => {
            library(cmd.dir, &config).delete(&cmd.name)?;
            writeln!(out, "Memory card deleted: {}", cmd.name)?;
            Ok(())
        }
    }
}

fn library(dir: Option<PathBuf>, config: &Config) -> CardLibrary {
    CardLibrary::new(dir.unwrap_or_else(|| config.library.dir.clone()))
}

/// `--json` takes precedence over `--records`.
fn saves<W: Write>(cmd: SavesArgs, config: &Config, out: &mut W) -> Result<(), Error> {
    let mut options = config.scan.clone();
    if let Some(locator) = cmd.locator {
        options.locator = locator;
    }

    if !cmd.card.is_file() {
        return Err(Error::MissingCard(cmd.card.display().to_string()));
    }
    let entries = memcard::parse_file(&cmd.card, &options)?;

    if cmd.json {
        let json = serde_json::to_string_pretty(&entries)
            .map_err(|e| Error::SerializeError(e.to_string()))?;
        writeln!(out, "{json}")?;
        return Ok(());
    }

    if entries.is_empty() {
        writeln!(out, "{}", "No saves found".dimmed())?;
        return Ok(());
    }

    for entry in &entries {
        if cmd.records {
            writeln!(out, "{}", entry.to_record())?;
        } else if entry.is_directory() {
            writeln!(out, "{}", entry.display_label().bold())?;
        } else {
            writeln!(out, "{}", entry.display_label())?;
        }
    }
    Ok(())
}

fn info<W: Write>(card: &Path, out: &mut W) -> Result<(), Error> {
    let info = CardInfo::read(card)?;
    for line in info.lines() {
        writeln!(out, "{line}")?;
    }
    Ok(())
}

fn cards<W: Write>(library: &CardLibrary, out: &mut W) -> Result<(), Error> {
    let cards = library.cards()?;
    if cards.is_empty() {
        writeln!(
            out,
            "{} {}",
            "No memory cards found in".dimmed(),
            library.dir().display().to_string().dimmed()
        )?;
        return Ok(());
    }

    for card in cards {
        let modified = card
            .modified
            .map(format_modified)
            .unwrap_or_else(|| "unknown".to_string());
        writeln!(
            out,
            "{}  {}  {}",
            card.name.green(),
            ByteSize::b(card.size),
            modified.dimmed()
        )?;
    }
    Ok(())
}

/// Imports every file it can; the ones that fail are reported together.
fn import<W: Write>(library: &CardLibrary, files: &[PathBuf], out: &mut W) -> Result<(), Error> {
    if files.is_empty() {
        return Err(Error::ImportError(Vec::new()));
    }

    let mut failed = Vec::new();
    for file in files {
        match library.import(file) {
            Ok(destination) => {
                let name = destination
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned())
                    .unwrap_or_default();
                writeln!(out, "+ {} {}", "Imported", name.green())?;
            }
            Err(err) => {
                writeln!(
                    out,
                    "{} {}",
                    file.display().to_string().dimmed(),
                    format!("skipped: {err}").dimmed()
                )?;
                failed.push(file.display().to_string());
            }
        }
    }

    if failed.is_empty() {
        Ok(())
    } else {
        Err(Error::ImportError(failed))
    }
}
