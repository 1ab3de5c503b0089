use std::io::{BufRead, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use rdl_generator::config::Config;
use rdl_generator::descriptor::{
    default_output_file_name, default_table_name, parse_field_list, parse_parameter_list,
};
use rdl_generator::extract::{extract_procedure, ExtractedProcedure};
use rdl_generator::files::read_text_with_fallback;
use rdl_generator::inspect::ReportSummary;
use rdl_generator::{generate_report, GenerateOptions, ReportDescriptor};

#[derive(Parser)]
#[command(name = "rdl-generator")]
#[command(author, version, about = "Generate report definitions for stored procedures")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a report definition from a procedure description
    Generate {
        /// Stored procedure name
        #[arg(short, long)]
        procedure: Option<String>,

        /// Procedure parameters, e.g. "ownerid:integer, p_refcur:refcursor"
        #[arg(long)]
        parameters: Option<String>,

        #[command(flatten)]
        report: ReportArgs,
    },

    /// Generate a report definition from procedure source text
    Extract {
        /// Procedure source file (reads stdin when omitted)
        #[arg(short, long)]
        sql: Option<PathBuf>,

        /// Print what was detected without writing a report
        #[arg(long)]
        dry_run: bool,

        #[command(flatten)]
        report: ReportArgs,
    },

    /// Summarise an existing report definition
    Inspect {
        /// Path to the .rdl file
        file: PathBuf,
    },
}

#[derive(Args)]
struct ReportArgs {
    /// Result fields, e.g. "region, total:System.Decimal"
    /// (for extract, used only when no fields are detected)
    #[arg(short, long)]
    fields: Option<String>,

    /// Name of the report table (defaults to the procedure name, title-cased)
    #[arg(short, long)]
    table: Option<String>,

    /// Connection string for the data source (keeps the template's when omitted)
    #[arg(short, long)]
    connection: Option<String>,

    /// Template file (overrides the config file; defaults to the built-in template)
    #[arg(long)]
    template: Option<PathBuf>,

    /// Output path for the .rdl file (defaults to <procedure>.rdl)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Config file (defaults to rdlgen.toml when present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Never prompt; use defaults for missing values
    #[arg(long)]
    no_prompt: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

/// Line-based prompts on stderr/stdin
struct Prompter {
    enabled: bool,
}

impl Prompter {
    /// Ask for a value; an empty answer or end of input yields the default.
    fn ask(&self, label: &str, default: Option<&str>) -> Result<Option<String>> {
        if !self.enabled {
            return Ok(default.map(str::to_string));
        }

        let mut stderr = std::io::stderr();
        match default {
            Some(default) => write!(stderr, "{} [{}]: ", label, default)?,
            None => write!(stderr, "{}: ", label)?,
        }
        stderr.flush()?;

        let mut line = String::new();
        std::io::stdin()
            .lock()
            .read_line(&mut line)
            .context("Failed to read from stdin")?;
        let answer = line.trim();
        if answer.is_empty() {
            Ok(default.map(str::to_string))
        } else {
            Ok(Some(answer.to_string()))
        }
    }

    /// Use the flag value when given, otherwise ask.
    fn value_or_ask(
        &self,
        value: Option<String>,
        label: &str,
        default: Option<&str>,
    ) -> Result<Option<String>> {
        match value {
            Some(value) => Ok(Some(value)),
            None => self.ask(label, default),
        }
    }
}

/// Settings, template and output path shared by `generate` and `extract`
fn generate_options(report: &ReportArgs, output_path: PathBuf) -> Result<GenerateOptions> {
    let config = Config::load(report.config.as_deref())?;
    Ok(GenerateOptions {
        template_path: report.template.clone().or(config.template.path),
        output_path,
        settings: config.render,
    })
}

/// Table name, connection string and output path, from flags or prompts
fn finish_descriptor(
    mut descriptor: ReportDescriptor,
    report: &mut ReportArgs,
    prompter: &Prompter,
) -> Result<(ReportDescriptor, PathBuf)> {
    let suggested_table = default_table_name(&descriptor.procedure_name);
    descriptor.table_name = prompter
        .value_or_ask(report.table.take(), "Table name", Some(suggested_table.as_str()))?
        .unwrap_or(suggested_table);

    descriptor.connection_string = prompter
        .value_or_ask(
            report.connection.take(),
            "Connection string (empty keeps the template's)",
            None,
        )?
        .filter(|c| !c.is_empty());

    let suggested_output = default_output_file_name(&descriptor.procedure_name);
    let output = match report.output.take() {
        Some(output) => output,
        None => PathBuf::from(
            prompter
                .ask("Output file", Some(suggested_output.as_str()))?
                .unwrap_or(suggested_output),
        ),
    };

    Ok((descriptor, output))
}

fn run_generate(
    procedure: Option<String>,
    parameters: Option<String>,
    mut report: ReportArgs,
) -> Result<()> {
    let prompter = Prompter {
        enabled: !report.no_prompt,
    };

    let Some(procedure) = prompter
        .value_or_ask(procedure, "Stored procedure name", None)?
        .filter(|p| !p.trim().is_empty())
    else {
        bail!("A stored procedure name is required");
    };

    let mut descriptor = ReportDescriptor::new(procedure.trim());
    if let Some(parameters) = prompter.value_or_ask(
        parameters,
        "Parameters (name:type, comma separated)",
        None,
    )? {
        descriptor.parameters = parse_parameter_list(&parameters)?;
    }
    if let Some(fields) = prompter.value_or_ask(
        report.fields.take(),
        "Fields (name or name:type, comma separated)",
        None,
    )? {
        descriptor.fields = parse_field_list(&fields)?;
    }

    let (descriptor, output) = finish_descriptor(descriptor, &mut report, &prompter)?;
    let options = generate_options(&report, output)?;
    let output_path = generate_report(&options, &descriptor)?;
    println!("{}", output_path.display());
    Ok(())
}

fn read_procedure_source(sql: Option<&Path>) -> Result<String> {
    match sql {
        Some(path) => Ok(read_text_with_fallback(path)?),
        None => {
            let mut source = String::new();
            std::io::stdin()
                .read_to_string(&mut source)
                .context("Failed to read procedure source from stdin")?;
            Ok(source)
        }
    }
}

fn print_extraction(extracted: &ExtractedProcedure) {
    println!("Procedure:   {}", extracted.procedure_name);
    let parameters: Vec<String> = extracted
        .parameters
        .iter()
        .map(|p| format!("{}:{}", p.name, p.data_type))
        .collect();
    println!("Parameters:  {}", parameters.join(", "));
    println!("Fields:      {}", extracted.fields.join(", "));
    println!("Table:       {}", extracted.default_table_name());
}

fn run_extract(sql: Option<PathBuf>, dry_run: bool, mut report: ReportArgs) -> Result<()> {
    let source = read_procedure_source(sql.as_deref())?;
    let extracted = extract_procedure(&source);

    if dry_run {
        print_extraction(&extracted);
        return Ok(());
    }

    // Source read from stdin leaves nothing to answer prompts with
    let prompter = Prompter {
        enabled: !report.no_prompt && sql.is_some(),
    };

    let needs_manual_fields = extracted.needs_manual_fields();
    let mut descriptor = extracted.into_descriptor(None, None);
    if needs_manual_fields {
        match prompter.value_or_ask(
            report.fields.take(),
            "Fields (name or name:type, comma separated)",
            None,
        )? {
            Some(fields) => descriptor.fields = parse_field_list(&fields)?,
            None => tracing::warn!("Generating a report without fields"),
        }
    }

    let (descriptor, output) = finish_descriptor(descriptor, &mut report, &prompter)?;
    let options = generate_options(&report, output)?;
    let output_path = generate_report(&options, &descriptor)?;
    println!("{}", output_path.display());
    Ok(())
}

fn run_inspect(file: &Path) -> Result<()> {
    let xml = read_text_with_fallback(file)?;
    let summary = ReportSummary::from_xml(&xml)
        .with_context(|| format!("Failed to parse report definition {}", file.display()))?;
    println!("{}", summary);
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            procedure,
            parameters,
            report,
        } => {
            init_logging(report.verbose);
            run_generate(procedure, parameters, report)
        }
        Commands::Extract {
            sql,
            dry_run,
            report,
        } => {
            init_logging(report.verbose);
            run_extract(sql, dry_run, report)
        }
        Commands::Inspect { file } => {
            init_logging(false);
            run_inspect(&file)
        }
    }
}
