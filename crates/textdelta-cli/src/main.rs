use anyhow::{Context, Result, bail};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::{env, fs, process};
use textdelta_config::Config;
use textdelta_engine::{
    ChangeSetBuilder, CleanupPolicy, Selection, apply_lines_with, apply_with, remap, reverse,
};

const USAGE: &str = "\
Usage:
  textdelta diff SOURCE MODIFIED [--policy none|semantic|efficiency]
  textdelta lines SOURCE MODIFIED
  textdelta check SOURCE MODIFIED [--policy none|semantic|efficiency]
  textdelta remap SOURCE MODIFIED START END [--policy none|semantic|efficiency]";

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Diff {
        files: Files,
        policy: Option<CleanupPolicy>,
    },
    Lines {
        files: Files,
    },
    Check {
        files: Files,
        policy: Option<CleanupPolicy>,
    },
    Remap {
        files: Files,
        selection: Selection,
        policy: Option<CleanupPolicy>,
    },
}

#[derive(Debug, PartialEq, Eq)]
struct Files {
    source: PathBuf,
    modified: PathBuf,
}

impl Files {
    fn read(&self) -> Result<(String, String)> {
        Ok((read_text(&self.source)?, read_text(&self.modified)?))
    }
}

fn read_text(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn parse_args(args: &[String]) -> Result<Command> {
    let mut positional = Vec::new();
    let mut policy = None;

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if arg == "--policy" {
            let Some(value) = iter.next() else {
                bail!("--policy needs a value");
            };
            policy = Some(value.parse::<CleanupPolicy>()?);
        } else {
            positional.push(arg.as_str());
        }
    }

    let Some((&name, rest)) = positional.split_first() else {
        bail!("No command given");
    };

    let files = |rest: &[&str]| Files {
        source: PathBuf::from(rest[0]),
        modified: PathBuf::from(rest[1]),
    };

    let command = match (name, rest.len()) {
        ("diff", 2) => Command::Diff {
            files: files(rest),
            policy,
        },
        ("lines", 2) => {
            if policy.is_some() {
                bail!("lines does not take --policy");
            }
            Command::Lines { files: files(rest) }
        }
        ("check", 2) => Command::Check {
            files: files(rest),
            policy,
        },
        ("remap", 4) => {
            let start = rest[2]
                .parse()
                .with_context(|| format!("Invalid START offset '{}'", rest[2]))?;
            let end = rest[3]
                .parse()
                .with_context(|| format!("Invalid END offset '{}'", rest[3]))?;
            Command::Remap {
                files: files(rest),
                selection: Selection::new(start, end)?,
                policy,
            }
        }
        ("diff" | "lines" | "check" | "remap", _) => {
            bail!("Wrong number of arguments for {name}")
        }
        _ => bail!("Unknown command '{name}'"),
    };
    Ok(command)
}

fn run(command: &Command, config: &Config, out: &mut impl Write) -> Result<()> {
    let builder = ChangeSetBuilder::new(config.diff_engine());
    let policy_or_default = |policy: &Option<CleanupPolicy>| policy.unwrap_or(config.diff.cleanup);

    match command {
        Command::Diff { files, policy } => {
            let (source, modified) = files.read()?;
            let changes =
                builder.build_character_changes(&source, &modified, policy_or_default(policy));
            for change in &changes {
                writeln!(out, "{change}")?;
            }
        }
        Command::Lines { files } => {
            let (source, modified) = files.read()?;
            for change in builder.build_line_changes(&source, &modified) {
                writeln!(out, "{change}")?;
            }
        }
        Command::Check { files, policy } => {
            let (source, modified) = files.read()?;
            let policy = policy_or_default(policy);
            let validation = config.validation();

            let changes = builder.build_character_changes(&source, &modified, policy);
            let patched = apply_with(&source, &changes, validation)
                .context("Failed to apply changes to source")?;
            if patched != modified {
                bail!("Applying changes did not reproduce {}", files.modified.display());
            }
            let undo = reverse(&changes)?;
            let restored = apply_with(&modified, &undo, validation)
                .context("Failed to apply reversed changes")?;
            if restored != source {
                bail!("Reversed changes did not restore {}", files.source.display());
            }

            let lines = builder.build_line_changes(&source, &modified);
            let patched = apply_lines_with(&source, &lines, validation)
                .context("Failed to apply line changes to source")?;
            if patched != modified {
                bail!("Applying line changes did not reproduce {}", files.modified.display());
            }

            writeln!(
                out,
                "ok: {} character changes ({policy}), {} line changes",
                changes.len(),
                lines.len()
            )?;
        }
        Command::Remap {
            files,
            selection,
            policy,
        } => {
            let (source, modified) = files.read()?;
            let changes =
                builder.build_character_changes(&source, &modified, policy_or_default(policy));
            let remapped = remap(*selection, &changes)?;
            writeln!(out, "{selection} -> {remapped}")?;
        }
    }
    Ok(())
}

fn load_config() -> Config {
    match Config::load() {
        Ok(Some(config)) => {
            log::debug!("Loaded config from {}", Config::config_path().display());
            config
        }
        Ok(None) => Config::default(),
        Err(e) => {
            log::warn!("{e}; using defaults");
            Config::default()
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    let command = match parse_args(&args) {
        Ok(command) => command,
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!("{USAGE}");
            process::exit(2);
        }
    };

    let config = load_config();
    let stdout = io::stdout();
    run(&command, &config, &mut stdout.lock())
}
