//! Interactive registration session.
//!
//! Reads commands line by line, prompts for each form field when a project is
//! entered, and reports every outcome back on the output. Failures are printed
//! as `Error: <message>` and the session carries on; only I/O errors end it.

use std::io::{self, BufRead, Write};

use anyhow::Result;
use chrono::NaiveDate;

use crate::config::{AppConfig, SummaryFormat};
use crate::form::{FieldSpec, FormBuilder, DATE_FORMAT, PROJECT_FORM};
use crate::models::ProjectSummary;
use crate::registry::ProjectRegistry;
use crate::render;

const PROMPT: &str = "> ";

const HELP: &str = "\
Commands:
  new                          Register a project (prompts for each field)
  complete <code> <YYYY-MM-DD> Record the actual completion date
  cancel <code>                Cancel a project as of today
  show <code>                  Show a project summary
  list                         List registered projects
  portfolio                    Totals across all projects
  fields                       List the registration form fields
  help                         Show this help
  quit                         End the session
";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

pub struct Session<R, W> {
    input: R,
    output: W,
    registry: ProjectRegistry,
    config: AppConfig,
}

impl<R: BufRead, W: Write> Session<R, W> {
    pub fn new(input: R, output: W, config: AppConfig) -> Self {
        Self {
            input,
            output,
            registry: ProjectRegistry::new(),
            config,
        }
    }

    pub fn registry(&self) -> &ProjectRegistry {
        &self.registry
    }

    pub fn into_parts(self) -> (ProjectRegistry, W) {
        (self.registry, self.output)
    }

    /// Run until `quit` or end of input.
    pub fn run(&mut self) -> Result<()> {
        tracing::info!("Session started");
        writeln!(self.output, "Project ledger. Type 'help' for commands.")?;

        loop {
            write!(self.output, "{}", PROMPT)?;
            self.output.flush()?;

            let Some(line) = read_line(&mut self.input)? else {
                break;
            };

            if self.execute(&line)? == Flow::Quit {
                break;
            }
        }

        tracing::info!(
            "Session ended with {} registered project(s)",
            self.registry.len()
        );
        Ok(())
    }

    fn execute(&mut self, line: &str) -> Result<Flow> {
        let mut parts = line.split_whitespace();
        let Some(command) = parts.next() else {
            return Ok(Flow::Continue);
        };
        let args: Vec<&str> = parts.collect();

        match (command, args.as_slice()) {
            ("new", []) => self.register()?,
            ("complete", [code, date]) => self.complete(code, date)?,
            ("cancel", [code]) => self.cancel(code)?,
            ("show", [code]) => self.show(code)?,
            ("list", []) => {
                write!(self.output, "{}", render::render_list(self.registry.iter()))?;
            }
            ("portfolio", []) => self.portfolio()?,
            ("fields", []) => {
                for (i, spec) in PROJECT_FORM.iter().enumerate() {
                    writeln!(self.output, "{:>2}. {}", i + 1, spec.label)?;
                }
            }
            ("help", _) => write!(self.output, "{}", HELP)?,
            ("quit" | "exit", _) => return Ok(Flow::Quit),
            ("new" | "complete" | "cancel" | "show" | "list" | "portfolio" | "fields", _) => {
                self.error(format!("Wrong arguments for '{}'. Type 'help' for usage.", command))?;
            }
            _ => {
                self.error(format!(
                    "Unknown command '{}'. Type 'help' for a list of commands.",
                    command
                ))?;
            }
        }

        Ok(Flow::Continue)
    }

    fn register(&mut self) -> Result<()> {
        let input = &mut self.input;
        let output = &mut self.output;

        let collected = FormBuilder::default().try_collect(|spec: &FieldSpec| -> io::Result<String> {
            write!(output, "{}: ", spec.label)?;
            output.flush()?;
            read_line(&mut *input)?.ok_or_else(|| {
                io::Error::new(io::ErrorKind::UnexpectedEof, "input ended during form entry")
            })
        })?;

        let create_input = match collected.and_then(|values| values.into_create_input()) {
            Ok(create_input) => create_input,
            Err(e) => return self.error(e),
        };

        match self.registry.register(create_input) {
            Ok(project) => {
                let code = project.project_code().to_string();
                writeln!(self.output, "Project {} registered.", code)?;
            }
            Err(e) => self.error(e)?,
        }
        Ok(())
    }

    fn complete(&mut self, code: &str, date: &str) -> Result<()> {
        let Ok(date) = NaiveDate::parse_from_str(date, DATE_FORMAT) else {
            return self.error(format!("Invalid date '{}' (expected YYYY-MM-DD)", date));
        };

        match self
            .registry
            .complete(code, date, self.config.completion_policy)
        {
            Ok(project) => {
                let verdict = project.evaluate_estimate_accuracy();
                writeln!(
                    self.output,
                    "Project {} completed on {}. Estimate: {}",
                    code,
                    date,
                    verdict.as_str()
                )?;
            }
            Err(e) => self.error(e)?,
        }
        Ok(())
    }

    fn cancel(&mut self, code: &str) -> Result<()> {
        match self.registry.cancel(code) {
            Ok(_) => writeln!(self.output, "Project {} cancelled.", code)?,
            Err(e) => self.error(e)?,
        }
        Ok(())
    }

    fn show(&mut self, code: &str) -> Result<()> {
        let Some(summary) = self.registry.get(code).map(|p| p.summarize()) else {
            return self.error(format!("Project not found: {}", code));
        };
        let text = format_summary(&summary, self.config.summary_format)?;
        write!(self.output, "{}", text)?;
        Ok(())
    }

    fn portfolio(&mut self) -> Result<()> {
        let portfolio = self.registry.portfolio();
        match self.config.summary_format {
            SummaryFormat::Text => write!(self.output, "{}", render::render_portfolio(&portfolio))?,
            SummaryFormat::Json => {
                writeln!(self.output, "{}", serde_json::to_string_pretty(&portfolio)?)?
            }
        }
        Ok(())
    }

    fn error(&mut self, e: impl std::fmt::Display) -> Result<()> {
        tracing::debug!("Reporting error to user: {}", e);
        writeln!(self.output, "Error: {}", e)?;
        Ok(())
    }
}

/// Render a summary in the configured format, newline-terminated.
pub fn format_summary(summary: &ProjectSummary, format: SummaryFormat) -> Result<String> {
    Ok(match format {
        SummaryFormat::Text => render::render_summary(summary),
        SummaryFormat::Json => format!("{}\n", serde_json::to_string_pretty(summary)?),
    })
}

/// Next line without its terminator, or `None` at end of input.
fn read_line<R: BufRead>(input: &mut R) -> io::Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    let trimmed = line.trim_end_matches(['\n', '\r']).len();
    line.truncate(trimmed);
    Ok(Some(line))
}
