use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use jsonschema_form_core::{
    compute_basic_schema, compute_complex_schema, find_matching_schema, AllOfStrategy,
    DraftCompiler, SchemaDraft, TransformOptions, Transformer,
};
use serde_json::Value;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::level_filters::LevelFilter;

#[derive(Parser)]
#[command(name = "jsonschema-form")]
#[command(about = "Prepare JSON Schemas and their data for generic form editors")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging (sets log level to debug)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Co-transform a schema and, optionally, a data instance
    Transform {
        /// Input JSON Schema file
        schema: PathBuf,

        /// Data instance to transform alongside the schema
        #[arg(long)]
        instance: Option<PathBuf>,

        /// Output file (defaults to stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Options file (kebab-case JSON); flags below override it
        #[arg(long)]
        config: Option<PathBuf>,

        /// Name of the discriminator field
        #[arg(long)]
        discriminator_key: Option<String>,

        /// Name of the field wrapped primitives are stored in
        #[arg(long)]
        value_key: Option<String>,

        /// Draft used to validate instances against alternatives
        #[arg(long, value_enum)]
        draft: Option<DraftArg>,

        /// Handling of allOf with several entries
        #[arg(long, value_enum)]
        all_of: Option<AllOfArg>,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Pretty)]
        format: OutputFormat,
    },

    /// Print the first schema alternative an instance validates against
    Match {
        /// Input JSON Schema file
        schema: PathBuf,

        /// Data instance file
        instance: PathBuf,

        /// Draft used for validation
        #[arg(long, value_enum, default_value_t = DraftArg::Draft7)]
        draft: DraftArg,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Pretty)]
        format: OutputFormat,
    },

    /// Print the part of a schema the basic or the complex editor handles
    Split {
        /// Input JSON Schema file
        schema: PathBuf,

        /// Which editor's fields to keep
        #[arg(long, value_enum)]
        part: Part,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Pretty)]
        format: OutputFormat,
    },
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
enum DraftArg {
    #[value(name = "draft4")]
    Draft4,
    #[value(name = "draft6")]
    Draft6,
    #[value(name = "draft7")]
    Draft7,
    #[value(name = "draft2019-09")]
    Draft201909,
    #[value(name = "draft2020-12")]
    Draft202012,
}

impl From<DraftArg> for SchemaDraft {
    fn from(val: DraftArg) -> Self {
        match val {
            DraftArg::Draft4 => SchemaDraft::Draft4,
            DraftArg::Draft6 => SchemaDraft::Draft6,
            DraftArg::Draft7 => SchemaDraft::Draft7,
            DraftArg::Draft201909 => SchemaDraft::Draft201909,
            DraftArg::Draft202012 => SchemaDraft::Draft202012,
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
enum AllOfArg {
    Merge,
    Preserve,
}

impl From<AllOfArg> for AllOfStrategy {
    fn from(val: AllOfArg) -> Self {
        match val {
            AllOfArg::Merge => AllOfStrategy::Merge,
            AllOfArg::Preserve => AllOfStrategy::Preserve,
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
enum Part {
    Basic,
    Complex,
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
enum OutputFormat {
    Pretty,
    Compact,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout stays clean for JSON
    let log_level = if cli.verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Transform {
            schema,
            instance,
            output,
            config,
            discriminator_key,
            value_key,
            draft,
            all_of,
            format,
        } => {
            let schema = read_json(&schema, "schema")?;
            let instance = instance
                .map(|path| read_json(&path, "instance"))
                .transpose()?;

            let mut options = match config {
                Some(path) => {
                    let file = File::open(&path).with_context(|| {
                        format!("Failed to open config file: {}", path.display())
                    })?;
                    serde_json::from_reader::<_, TransformOptions>(BufReader::new(file))
                        .with_context(|| format!("Failed to parse config from: {}", path.display()))?
                }
                None => TransformOptions::default(),
            };
            if let Some(key) = discriminator_key {
                options.discriminator_key = key;
            }
            if let Some(key) = value_key {
                options.value_key = key;
            }
            if let Some(draft) = draft {
                options.draft = draft.into();
            }
            if let Some(all_of) = all_of {
                options.all_of = all_of.into();
            }
            options.validate()?;

            let result = Transformer::new(options)
                .transform(&schema, instance.as_ref())
                .map_err(|e| anyhow::Error::from(e).context("Transformation failed"))?;

            write_json(&result, output.as_ref(), format)?;
        }
        Commands::Match {
            schema,
            instance,
            draft,
            format,
        } => {
            let schema = read_json(&schema, "schema")?;
            let instance = read_json(&instance, "instance")?;
            let compiler = DraftCompiler::new(draft.into());

            let matched = find_matching_schema(&instance, &schema, &compiler)
                .map_err(|e| anyhow::Error::from(e).context("Matching failed"))?;
            match matched {
                Some(alternative) => write_json(alternative, None, format)?,
                None => bail!("no matching schema"),
            }
        }
        Commands::Split {
            schema,
            part,
            format,
        } => {
            let schema = read_json(&schema, "schema")?;
            let subset = match part {
                Part::Basic => compute_basic_schema(&schema),
                Part::Complex => compute_complex_schema(&schema),
            };
            write_json(&subset, None, format)?;
        }
    }

    Ok(())
}

fn read_json(path: &Path, what: &str) -> Result<Value> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open {what} file: {}", path.display()))?;
    let reader = BufReader::new(file);
    serde_json::from_reader(reader)
        .with_context(|| format!("Failed to parse {what} from: {}", path.display()))
}

fn write_json<T: serde::Serialize>(
    val: &T,
    path: Option<&PathBuf>,
    format: OutputFormat,
) -> Result<()> {
    let mut writer: Box<dyn Write> = if let Some(p) = path {
        let file = File::create(p)
            .with_context(|| format!("Failed to create output file: {}", p.display()))?;
        Box::new(BufWriter::new(file))
    } else {
        Box::new(BufWriter::new(io::stdout()))
    };

    match format {
        OutputFormat::Pretty => {
            serde_json::to_writer_pretty(&mut writer, val).context("Failed to write JSON")?;
        }
        OutputFormat::Compact => {
            serde_json::to_writer(&mut writer, val).context("Failed to write JSON")?;
        }
    }

    writeln!(writer).context("Failed to write trailing newline")?;
    writer.flush().context("Failed to flush output")?;

    Ok(())
}
