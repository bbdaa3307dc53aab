use std::fs;
use std::io::{self, Read, Write};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::Value;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::{
    DecodeOptions, Expression, decode_with_options, encode, from_str_with_options,
    to_string_pretty,
};

#[derive(Parser)]
#[command(name = "expr-json")]
#[command(about = "A CLI for checking and converting encoded expression trees")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        match &self.command {
            Commands::Convert { input, output, .. } | Commands::Validate { input, output, .. } => {
                let reader = get_reader(input)
                    .with_context(|| format!("Failed to open input file: {input}"))?;
                let writer = get_writer(output)
                    .with_context(|| format!("Failed to create output file: {output}"))?;
                self.run_with_io(reader, writer)
            }
        }
    }

    /// Run CLI with provided readers and writers for testing
    pub fn run_with_io<R: Read, W: Write>(&self, reader: R, writer: W) -> Result<()> {
        match &self.command {
            Commands::Convert {
                from,
                to,
                pretty,
                decode,
                ..
            } => self.run_convert_with_io(reader, writer, from, to, *pretty, &decode.options()),

            Commands::Validate { decode, .. } => {
                self.run_validate_with_io(reader, writer, &decode.options())
            }
        }
    }

    /// Whether the selected command asked for verbose output.
    pub fn verbose(&self) -> bool {
        match &self.command {
            Commands::Convert { verbose, .. } | Commands::Validate { verbose, .. } => *verbose,
        }
    }

    /// Install a stderr log subscriber. `RUST_LOG` takes precedence over the
    /// verbosity flag.
    pub fn setup_logging(&self) {
        let default_level = if self.verbose() { "debug" } else { "warn" };
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(default_level));
        // A subscriber may already be installed when embedded; that's fine.
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .try_init();
    }

    fn run_convert_with_io<R: Read, W: Write>(
        &self,
        reader: R,
        writer: W,
        from: &Format,
        to: &Format,
        pretty: bool,
        options: &DecodeOptions,
    ) -> Result<()> {
        let expression = from.read_expression(reader, options).with_context(|| {
            format!(
                "Failed to decode input as {} format",
                format!("{from:?}").to_lowercase()
            )
        })?;

        to.write_expression(writer, &expression, pretty)
            .with_context(|| {
                format!(
                    "Failed to write output as {} format",
                    format!("{to:?}").to_lowercase()
                )
            })?;

        info!(?from, ?to, tag = %expression.tag(), "converted expression");
        Ok(())
    }

    fn run_validate_with_io<R: Read, W: Write>(
        &self,
        reader: R,
        writer: W,
        options: &DecodeOptions,
    ) -> Result<()> {
        let expression = Format::Json
            .read_expression(reader, options)
            .with_context(|| "Failed to decode input as an expression tree")?;

        let mut rendering = expression.render();
        rendering.push('\n');
        write_text_output(writer, &rendering)?;

        info!(tag = %expression.tag(), strict = options.strict, "validated expression");
        Ok(())
    }
}

/// Decoder flags shared by every subcommand.
#[derive(clap::Args, Clone, Debug)]
pub struct DecodeArgs {
    /// Reject absent or mistyped fields instead of defaulting them
    #[arg(long)]
    pub strict: bool,
    /// Maximum nesting depth accepted in the input
    #[arg(long, default_value_t = crate::decode::DEFAULT_MAX_DEPTH)]
    pub max_depth: usize,
}

impl Default for DecodeArgs {
    fn default() -> Self {
        let options = DecodeOptions::default();
        Self {
            strict: options.strict,
            max_depth: options.max_depth,
        }
    }
}

impl DecodeArgs {
    pub fn options(&self) -> DecodeOptions {
        DecodeOptions {
            strict: self.strict,
            max_depth: self.max_depth,
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Convert an encoded expression tree between formats
    ///
    /// Formats:
    ///   json - JSON text
    ///   yaml - YAML text with the same layout
    Convert {
        /// Input file (use - for stdin)
        #[arg(short, long, default_value = "-")]
        input: String,
        /// Output file (use - for stdout)
        #[arg(short, long, default_value = "-")]
        output: String,
        /// Input format: json, yaml
        #[arg(short = 'f', long, default_value = "json")]
        from: Format,
        /// Output format: json, yaml
        #[arg(short = 't', long, default_value = "json")]
        to: Format,
        /// Indent JSON output
        #[arg(long)]
        pretty: bool,
        #[command(flatten)]
        decode: DecodeArgs,
        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },
    /// Decode a JSON expression tree and print its canonical rendering
    Validate {
        /// Input file (use - for stdin)
        #[arg(short, long, default_value = "-")]
        input: String,
        /// Output file (use - for stdout)
        #[arg(short, long, default_value = "-")]
        output: String,
        #[command(flatten)]
        decode: DecodeArgs,
        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },
}

#[derive(Clone, Debug)]
pub enum Format {
    Json,
    Yaml,
}

impl std::str::FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(Format::Json),
            "yaml" | "yml" => Ok(Format::Yaml),
            _ => Err(format!(
                "Invalid format: '{s}'. Supported formats: json, yaml/yml"
            )),
        }
    }
}

impl Format {
    pub fn read_expression<R: Read>(
        &self,
        reader: R,
        options: &DecodeOptions,
    ) -> Result<Expression> {
        let input_text = read_text_input(reader)?;
        debug!(format = ?self, strict = options.strict, "decoding input");
        match self {
            Format::Json => Ok(from_str_with_options(&input_text, options)?),
            Format::Yaml => {
                let value: Value = serde_yaml::from_str(&input_text)?;
                Ok(decode_with_options(&value, options)?)
            }
        }
    }

    pub fn write_expression<W: Write>(
        &self,
        writer: W,
        expression: &Expression,
        pretty: bool,
    ) -> Result<()> {
        let mut text = match self {
            Format::Json if pretty => to_string_pretty(expression),
            Format::Json => serde_json::to_string(&encode(expression))?,
            Format::Yaml => serde_yaml::to_string(expression)?,
        };
        if !text.ends_with('\n') {
            text.push('\n');
        }
        write_text_output(writer, &text)
    }
}

/// Read text input from reader
fn read_text_input<R: Read>(mut reader: R) -> Result<String> {
    let mut buffer = String::new();
    reader.read_to_string(&mut buffer)?;
    Ok(buffer)
}

/// Write text output to writer
fn write_text_output<W: Write>(mut writer: W, content: &str) -> Result<()> {
    writer.write_all(content.as_bytes())?;
    Ok(())
}

/// Helper function to get reader from file path (or stdin if "-")
fn get_reader(path: &str) -> Result<Box<dyn Read>> {
    if path == "-" {
        Ok(Box::new(io::stdin()))
    } else {
        Ok(Box::new(fs::File::open(path)?))
    }
}

/// Helper function to get writer from file path (or stdout if "-")
fn get_writer(path: &str) -> Result<Box<dyn Write>> {
    if path == "-" {
        Ok(Box::new(io::stdout()))
    } else {
        Ok(Box::new(fs::File::create(path)?))
    }
}
