use std::{
    io::Write,
    path::{Path, PathBuf},
};

use anyhow::Context;
use bitfont::BitmapFont;
use clap::{Parser, Subcommand};
use tracing::{event, Level};

mod code_point;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Print a font's metadata and page usage
    Info {
        #[arg(value_name = "FONT")]
        font: PathBuf,
    },
    /// Draw a single glyph
    Glyph {
        #[arg(value_name = "FONT")]
        font: PathBuf,
        /// U+XXXX, 0xXXXX, decimal, or the character itself
        #[arg(value_name = "CODE_POINT")]
        code_point: String,
        /// Do not substitute the fallback glyph
        #[arg(long)]
        raw: bool,
    },
    /// Measure the width of a line of text in pixels
    Measure {
        #[arg(value_name = "FONT")]
        font: PathBuf,
        text: String,
    },
    /// Pack the materialized pages densely, leaving out unused mask bits
    Mask {
        #[arg(value_name = "FONT")]
        font: PathBuf,
        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,
    },
    /// Materialize every page of the code point space
    Unmask {
        #[arg(value_name = "FONT")]
        font: PathBuf,
        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,
    },
    /// Drop pages whose glyphs are all empty
    DropEmpty {
        #[arg(value_name = "FONT")]
        font: PathBuf,
        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,
    },
}

fn load(path: &Path) -> anyhow::Result<BitmapFont> {
    BitmapFont::load_from_file(path).with_context(|| format!("loading {}", path.display()))
}

fn save(font: &BitmapFont, path: &Path) -> anyhow::Result<()> {
    font.write_to_file(path)
        .with_context(|| format!("writing {}", path.display()))
}

fn write_info(out: &mut impl Write, font: &BitmapFont) -> std::io::Result<()> {
    writeln!(out, "name:         {}", font.name())?;
    writeln!(out, "family:       {}", font.family())?;
    writeln!(out, "variant:      {}", font.variant())?;
    writeln!(out, "qualified:    {}", font.qualified_name())?;
    writeln!(
        out,
        "glyph size:   {}x{} ({})",
        font.glyph_fixed_width(),
        font.glyph_height(),
        if font.is_fixed_width() {
            "fixed width"
        } else {
            "variable width"
        }
    )?;
    writeln!(
        out,
        "glyph widths: {}..={}",
        font.min_glyph_width(),
        font.max_glyph_width()
    )?;
    writeln!(out, "spacing:      {}", font.glyph_spacing())?;
    writeln!(
        out,
        "baseline:     {} (mean line {}, x-height {})",
        font.baseline(),
        font.mean_line(),
        font.x_height()
    )?;
    writeln!(out, "glyphs:       {}", font.glyph_count())?;
    writeln!(
        out,
        "pages:        {}",
        font.directory()
            .materialized_pages()
            .iter()
            .map(|page| format!("U+{:04X}", bitfont::directory::first_code_point_of(*page)))
            .collect::<Vec<_>>()
            .join(" ")
    )?;
    match font.fallback_index() {
        Some(slot) => writeln!(out, "fallback:     U+{:04X}", font.index_to_code_point(slot)),
        None => writeln!(out, "fallback:     none"),
    }
}

fn print_glyph(font: &BitmapFont, code_point: u32, raw: bool) -> anyhow::Result<()> {
    let glyph = if raw {
        font.raw_glyph(code_point)
            .with_context(|| format!("U+{:04X} has no glyph slot", code_point))?
    } else {
        font.glyph(code_point)
    };
    if let Some(slot) = font.glyph_index(code_point).filter(|_| !raw) {
        let drawn = font.index_to_code_point(slot);
        if drawn != code_point {
            eprintln!("U+{:04X} is drawn with U+{:04X}", code_point, drawn);
        }
    }
    println!("width {}", glyph.width());
    for y in 0..glyph.height() as usize {
        let line: String = (0..glyph.width() as usize)
            .map(|x| if glyph.pixel(x, y) { '#' } else { '.' })
            .collect();
        println!("{}", line);
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(if cli.verbose {
            Level::DEBUG
        } else {
            Level::INFO
        })
        .pretty()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Command::Info { font } => write_info(&mut std::io::stdout().lock(), &load(&font)?)?,
        Command::Glyph {
            font,
            code_point: input,
            raw,
        } => {
            let code_point = code_point::parse(&input)?;
            print_glyph(&load(&font)?, code_point, raw)?;
        }
        Command::Measure { font, text } => {
            println!("{}", load(&font)?.width_of_str(&text));
        }
        Command::Mask { font, output } => {
            let source = load(&font)?;
            let masked = source.masked_character_set()?;
            event!(
                Level::INFO,
                before = source.glyph_count(),
                after = masked.glyph_count(),
                "masked character set"
            );
            save(&masked, &output)?;
        }
        Command::Unmask { font, output } => {
            let unmasked = load(&font)?.unmasked_character_set()?;
            save(&unmasked, &output)?;
        }
        Command::DropEmpty { font, output } => {
            let mut font = load(&font)?.try_clone()?;
            let dropped = font.drop_empty_pages()?;
            event!(Level::INFO, dropped, "dropped empty pages");
            save(&font, &output)?;
        }
    }
    Ok(())
}
