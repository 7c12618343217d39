use std::fs::File;
use std::path::PathBuf;
use std::sync::Mutex;

use clap::{ArgAction, Parser};
use color_eyre::eyre::{Result, WrapErr, eyre};
use tracing_subscriber::EnvFilter;

use formui::{
    ConfigProvider, DirectoryProvider, FormRequest, FormSession, FormUI, OutputDestination, OutputOptions,
    SubmissionPolicy, SubmitOutcome, UiOptions, emit,
};

#[derive(Debug, Parser)]
#[command(
    name = "formui",
    version,
    about = "Render declarative form configurations as interactive TUIs"
)]
struct Cli {
    /// Directory holding one configuration document per form kind
    #[arg(long = "config-dir", value_name = "DIR", default_value = "forms")]
    config_dir: PathBuf,

    /// URL-style query string, e.g. "?form=audit&lang=de&role=admin"
    #[arg(short = 'q', long = "query", value_name = "QS")]
    query: Option<String>,

    /// Form kind to load (overrides the query string)
    #[arg(long = "form", value_name = "KIND")]
    form: Option<String>,

    /// Language code used to pick the title (overrides the query string)
    #[arg(long = "lang", value_name = "CODE")]
    lang: Option<String>,

    /// Advisory role used to hide restricted fields (overrides the query string)
    #[arg(long = "role", value_name = "ROLE")]
    role: Option<String>,

    /// Print the mounted page as HTML and exit
    #[arg(long = "html", conflicts_with = "submit")]
    html: bool,

    /// Pre-fill a field before rendering; repeatable
    #[arg(long = "set", value_name = "ID=VALUE", action = ArgAction::Append, value_parser = parse_assignment)]
    set: Vec<(String, String)>,

    /// Submit without opening the terminal UI and print the snapshot
    #[arg(long = "submit")]
    submit: bool,

    /// Leave hidden dependent fields out of validation and the snapshot
    #[arg(long = "exclude-hidden")]
    exclude_hidden: bool,

    /// Snapshot destinations ("-" writes to stdout). Accepts multiple values per flag use.
    #[arg(short = 'o', long = "output", value_name = "DEST", num_args = 1.., action = ArgAction::Append)]
    outputs: Vec<String>,

    /// Emit compact JSON rather than pretty formatting
    #[arg(long = "no-pretty")]
    no_pretty: bool,

    /// Log filter used when RUST_LOG is not set
    #[arg(long = "log-level", value_name = "FILTER", default_value = "info")]
    log_level: String,

    /// Write logs to this file (the terminal UI otherwise discards them)
    #[arg(long = "log-file", value_name = "PATH")]
    log_file: Option<PathBuf>,
}

impl Cli {
    fn request(&self) -> FormRequest {
        let mut request = self
            .query
            .as_deref()
            .map(FormRequest::from_query)
            .unwrap_or_default();
        if let Some(kind) = &self.form {
            request.kind = kind.clone();
        }
        if let Some(lang) = &self.lang {
            request.language = lang.clone();
        }
        if let Some(role) = &self.role {
            request.role = role.clone();
        }
        request
    }

    fn headless(&self) -> bool {
        self.html || self.submit
    }

    fn output_options(&self) -> OutputOptions {
        let destinations = if self.outputs.is_empty() {
            vec![OutputDestination::Stdout]
        } else {
            self.outputs
                .iter()
                .map(|dest| match dest.as_str() {
                    "-" => OutputDestination::Stdout,
                    path => OutputDestination::file(path),
                })
                .collect()
        };
        OutputOptions::new()
            .with_pretty(!self.no_pretty)
            .with_destinations(destinations)
    }
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    init_tracing(&cli)?;

    let request = cli.request();
    let policy = if cli.exclude_hidden {
        SubmissionPolicy::ExcludeHidden
    } else {
        SubmissionPolicy::IncludeHidden
    };

    let provider = DirectoryProvider::new(&cli.config_dir);
    let config = provider
        .load(&request.kind)
        .wrap_err_with(|| format!("could not load form '{}'", request.kind))?;
    let mut session = FormSession::mount_with_policy(config, &request, policy)
        .wrap_err("form configuration is inconsistent")?;

    for (id, value) in &cli.set {
        session
            .input(id, value)
            .wrap_err_with(|| format!("cannot set field '{id}'"))?;
        if session.value(id) != Some(value.as_str()) {
            return Err(eyre!("field '{id}' does not accept the value '{value}'"));
        }
    }

    if cli.html {
        print!("{}", session.page().to_html());
        return Ok(());
    }

    if cli.submit {
        return match session.submit()? {
            SubmitOutcome::Accepted(snapshot) => {
                emit(&snapshot, &cli.output_options()).map_err(|err| eyre!("{err:#}"))
            }
            SubmitOutcome::Rejected { invalid } => {
                for control in &invalid {
                    eprintln!("{}: {:?}", control.name, control.reason);
                }
                Err(eyre!(
                    "{}",
                    session.validation_message().unwrap_or_default()
                ))
            }
        };
    }

    FormUI::new(session)
        .with_options(UiOptions::default())
        .with_output(cli.output_options())
        .run()
        .map_err(|err| eyre!("{err:#}"))?;
    Ok(())
}

fn init_tracing(cli: &Cli) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&cli.log_level))
        .wrap_err("invalid log filter")?;
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if let Some(path) = &cli.log_file {
        let file = File::create(path)
            .wrap_err_with(|| format!("failed to create log file {}", path.display()))?;
        builder.with_ansi(false).with_writer(Mutex::new(file)).init();
    } else if cli.headless() {
        builder.with_writer(std::io::stderr).init();
    } else {
        builder.with_writer(std::io::sink).init();
    }
    Ok(())
}

fn parse_assignment(raw: &str) -> std::result::Result<(String, String), String> {
    let (id, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected ID=VALUE, got '{raw}'"))?;
    if id.is_empty() {
        return Err("field id must not be empty".to_string());
    }
    Ok((id.to_string(), value.to_string()))
}
