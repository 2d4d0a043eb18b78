//! Command-line interface for langbase.
//!
//! Every subcommand runs against a [`Runtime`] and reports an exit status;
//! the binary then exits through the runtime's shutdown sequence.

use crate::config::LogLevel;
use crate::runtime::Runtime;
use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use langbase_casing::Locale;
use langbase_names::MAX_CODE_POINT;
use langbase_names::encode::{encode, parse_unicode_data};
use langbase_shutdown::ProcessHost;
use std::io::Write;
use std::path::PathBuf;

/// langbase - Unicode names, special casing, and shutdown sequencing
#[derive(Parser, Debug)]
#[command(name = "langbase")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file to use instead of ~/.config/langbase/config.yaml
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Set log level (overrides config and RUST_LOG)
    #[arg(long, global = true, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the names of code points (U+0041, 0x41, or 41)
    Name {
        #[arg(required = true, value_name = "CODEPOINT")]
        code_points: Vec<String>,
    },

    /// Find the code point with a character name
    Lookup {
        /// Name words; joined with single spaces
        #[arg(required = true, value_name = "NAME")]
        name: Vec<String>,
    },

    /// Lowercase text
    Lower {
        text: String,

        /// Locale tag (defaults to the configured locale)
        #[arg(long)]
        locale: Option<String>,
    },

    /// Uppercase text
    Upper {
        text: String,

        /// Locale tag (defaults to the configured locale)
        #[arg(long)]
        locale: Option<String>,
    },

    /// Build a compressed name resource from UnicodeData.txt
    EncodeNames {
        #[arg(value_name = "UNICODE_DATA")]
        unicode_data: PathBuf,

        #[arg(value_name = "OUT")]
        out: PathBuf,
    },
}

/// Run `command`, writing results to `out`. Returns the exit status.
///
/// # Errors
///
/// I/O failures and unloadable name resources.
pub fn run<H: ProcessHost>(
    runtime: &Runtime<H>,
    command: &Commands,
    out: &mut impl Write,
) -> Result<i32> {
    match command {
        Commands::Name { code_points } => {
            let mut status = 0;
            for arg in code_points {
                let code_point = parse_code_point(arg)?;
                match runtime.name_of(code_point)? {
                    Some(name) => writeln!(out, "U+{:04X}\t{}", code_point, name)?,
                    None => {
                        writeln!(out, "U+{:04X}\t<unassigned>", code_point)?;
                        status = 1;
                    }
                }
            }
            Ok(status)
        }
        Commands::Lookup { name } => {
            let name = name.join(" ");
            match runtime.code_point_of(&name)? {
                Some(code_point) => {
                    writeln!(out, "U+{:04X}", code_point)?;
                    Ok(0)
                }
                None => {
                    writeln!(out, "no character named '{}'", name)?;
                    Ok(1)
                }
            }
        }
        Commands::Lower { text, locale } => {
            let locale = locale.as_deref().map(Locale::new);
            writeln!(out, "{}", runtime.to_lowercase(text, locale.as_ref()))?;
            Ok(0)
        }
        Commands::Upper { text, locale } => {
            let locale = locale.as_deref().map(Locale::new);
            writeln!(out, "{}", runtime.to_uppercase(text, locale.as_ref()))?;
            Ok(0)
        }
        Commands::EncodeNames { unicode_data, out: path } => {
            let text = std::fs::read_to_string(unicode_data)
                .with_context(|| format!("Failed to read {:?}", unicode_data))?;
            let entries = parse_unicode_data(&text)?;
            let bytes = encode(entries.iter().map(|(cp, name)| (*cp, name.as_str())))?;
            std::fs::write(path, &bytes)
                .with_context(|| format!("Failed to write {:?}", path))?;
            log::info!("Encoded {} names into {} bytes", entries.len(), bytes.len());
            writeln!(
                out,
                "wrote {} names ({} bytes) to {}",
                entries.len(),
                bytes.len(),
                path.display()
            )?;
            Ok(0)
        }
    }
}

/// Parse `U+0041`, `0x41`, or bare hex `41`.
pub fn parse_code_point(arg: &str) -> Result<u32> {
    let trimmed = arg.trim();
    let digits = ["U+", "u+", "0x", "0X"]
        .iter()
        .find_map(|prefix| trimmed.strip_prefix(prefix))
        .unwrap_or(trimmed);
    let code_point = u32::from_str_radix(digits, 16)
        .with_context(|| format!("'{}' is not a hexadecimal code point", arg))?;
    if code_point > MAX_CODE_POINT {
        bail!("U+{:X} is outside the Unicode code space", code_point);
    }
    Ok(code_point)
}
