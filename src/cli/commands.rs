use clap::{Parser, Subcommand, ValueEnum};
use genai::adapter::AdapterKind;

/// Validate business ideas with a language model
#[derive(Parser, Debug)]
#[command(
    name = "ideaforge",
    about = "Validate business ideas with a language model",
    version,
    long_about = "ideaforge turns a one-line business idea into a market snapshot, a feature \
                  roadmap and an agile sprint plan. It runs as an HTTP service or as a one-shot \
                  command, and talks to any provider supported by genai (OpenAI, Anthropic, \
                  Gemini, Groq, xAI, Ollama)."
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, global = true, value_name = "LEVEL", help = "Set logging level")]
    pub log_level: Option<String>,

    #[arg(short = 'v', long, global = true, help = "Enable debug logging")]
    pub verbose: bool,

    #[arg(
        short = 'q',
        long,
        global = true,
        conflicts_with = "verbose",
        help = "Quiet mode - suppress non-error output"
    )]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(
        about = "Run the HTTP service",
        long_about = "Serves POST /api/validate-idea, GET /api/ideas/{id} and GET /health.\n\n\
                      Examples:\n  \
                      ideaforge serve\n  \
                      ideaforge serve --bind 127.0.0.1 --port 8080"
    )]
    Serve(ServeArgs),

    #[command(
        about = "Validate one idea and print the report",
        long_about = "Runs the market, roadmap and sprint stages for a single idea and prints \
                      the resulting record.\n\n\
                      Examples:\n  \
                      ideaforge validate \"AI-powered food delivery optimization platform\"\n  \
                      ideaforge validate \"Pet sitting marketplace\" --worklab lab-3 --pretty\n  \
                      ideaforge validate \"Invoice bot\" --format human --backend ollama --model llama3.2"
    )]
    Validate(ValidateArgs),
}

#[derive(Parser, Debug, Clone)]
pub struct ServeArgs {
    #[arg(long, value_name = "ADDR", help = "Address to bind (overrides IDEAFORGE_BIND)")]
    pub bind: Option<String>,

    #[arg(short = 'p', long, help = "Port to listen on (overrides IDEAFORGE_PORT)")]
    pub port: Option<u16>,
}

#[derive(Parser, Debug, Clone)]
pub struct ValidateArgs {
    #[arg(value_name = "IDEA", help = "Business idea to validate")]
    pub idea: String,

    #[arg(short = 'w', long, value_name = "TAG", help = "Worklab tag stored with the record")]
    pub worklab: Option<String>,

    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "json",
        help = "Output format"
    )]
    pub format: OutputFormatArg,

    #[arg(long, help = "Indent JSON output")]
    pub pretty: bool,

    #[arg(
        short = 'b',
        long,
        value_parser = parse_adapter_kind,
        help = "Provider to use (overrides IDEAFORGE_PROVIDER)"
    )]
    pub backend: Option<AdapterKind>,

    #[arg(
        short = 'm',
        long,
        value_name = "MODEL",
        help = "Model name (overrides IDEAFORGE_MODEL)"
    )]
    pub model: Option<String>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormatArg {
    Json,
    Human,
}

impl From<OutputFormatArg> for super::output::OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Json => super::output::OutputFormat::Json,
            OutputFormatArg::Human => super::output::OutputFormat::Human,
        }
    }
}

fn parse_adapter_kind(s: &str) -> Result<AdapterKind, String> {
    AdapterKind::from_lower_str(&s.to_lowercase()).ok_or_else(|| {
        format!(
            "Invalid provider: {}. Valid options: openai, anthropic, gemini, groq, xai, ollama",
            s
        )
    })
}
