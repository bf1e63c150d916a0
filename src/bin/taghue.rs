// File: src/bin/taghue.rs
// Small host around the engine: tags in, colors out.
use anyhow::{Context, Result, bail};
use crossterm::{
    queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
};
use std::io::{self, Read, Write};
use std::path::PathBuf;
use taghue::color_utils;
use taghue::{Configuration, Engine, FileStore, ResolvedColor, TagPath, Theme};
use tracing_subscriber::EnvFilter;

enum Command {
    Css,
    Show,
    Preview,
}

struct Args {
    command: Command,
    config: Option<PathBuf>,
    data_dir: Option<PathBuf>,
    tags: Vec<String>,
}

const USAGE: &str = "Usage: taghue [--config <file.toml>] [--data-dir <dir>] <css|show|preview> [TAG...]
Tags are read from stdin when none are given on the command line.";

fn parse_args() -> Result<Args> {
    let mut config = None;
    let mut data_dir = None;
    let mut command = None;
    let mut tags = Vec::new();

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => config = Some(PathBuf::from(args.next().context("--config needs a path")?)),
            "--data-dir" => {
                data_dir = Some(PathBuf::from(args.next().context("--data-dir needs a path")?))
            }
            "-h" | "--help" => {
                println!("{}", USAGE);
                std::process::exit(0);
            }
            "css" if command.is_none() => command = Some(Command::Css),
            "show" if command.is_none() => command = Some(Command::Show),
            "preview" if command.is_none() => command = Some(Command::Preview),
            _ if command.is_none() => bail!("unknown command `{}`\n{}", arg, USAGE),
            _ => tags.push(arg),
        }
    }

    let Some(command) = command else {
        bail!("{}", USAGE);
    };
    Ok(Args {
        command,
        config,
        data_dir,
        tags,
    })
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args = parse_args()?;

    let store = match args.data_dir {
        Some(dir) => FileStore::at(dir.join("state.json")),
        None => FileStore::default_location().context("no data directory available")?,
    };
    let mut engine = Engine::load(store)?;

    if let Some(path) = args.config {
        let config = Configuration::load(&path)?;
        if &config != engine.config() {
            engine.configure(config);
        }
    }

    let mut raw_tags = args.tags;
    if raw_tags.is_empty() {
        let mut input = String::new();
        io::stdin().read_to_string(&mut input)?;
        raw_tags = input.split_whitespace().map(str::to_string).collect();
    }

    engine.ensure_tags_known(&raw_tags);
    let mut tags: Vec<TagPath> = taghue::model::tag::parse_all(&raw_tags);
    tags.sort();
    tags.dedup();

    let mut stdout = io::stdout().lock();
    match args.command {
        Command::Css => {
            write!(stdout, "{}", engine.stylesheet(&raw_tags))?;
        }
        Command::Show => {
            for tag in &tags {
                for theme in Theme::ALL {
                    let c = engine.colors_for(tag, theme);
                    writeln!(stdout, "{}\t{}\t{}\t{}", tag, theme, c.background, c.foreground)?;
                }
            }
        }
        Command::Preview => {
            for tag in &tags {
                for theme in Theme::ALL {
                    let c = engine.colors_for(tag, theme);
                    chip(&mut stdout, &format!(" #{} ", tag), &c)?;
                    queue!(stdout, Print("  "))?;
                }
                queue!(stdout, Print("\n"))?;
            }
        }
    }
    stdout.flush()?;
    Ok(())
}

fn chip<W: Write>(out: &mut W, label: &str, color: &ResolvedColor) -> Result<()> {
    let background = term_color(&color.background)?;
    let foreground = term_color(&color.foreground)?;
    queue!(
        out,
        SetBackgroundColor(background),
        SetForegroundColor(foreground),
        Print(label),
        ResetColor
    )?;
    Ok(())
}

fn term_color(hex: &str) -> Result<Color> {
    let rgb = color_utils::parse_hex(hex)?;
    Ok(Color::Rgb {
        r: rgb.red,
        g: rgb.green,
        b: rgb.blue,
    })
}
