use std::path::PathBuf;

use clap::Parser;
use clap_complete::Shell;

#[derive(Parser, Debug)]
#[command(name = "persona-desk")]
#[command(version)]
#[command(about = "Ask an expert persona your question through an LLM, plus a character-count and BMI panel")]
pub struct Args {
    /// Answer one question in the terminal instead of starting the web UI
    #[arg(long, value_name = "QUESTION")]
    pub ask: Option<String>,

    /// Persona label for --ask ("culinary expert" or "working engineer")
    #[arg(long, default_value = "culinary expert")]
    pub persona: String,

    /// Chat model identifier [default: gpt-4o-mini]
    #[arg(long)]
    pub model: Option<String>,

    /// Sampling temperature [default: 0.7]
    #[arg(long)]
    pub temperature: Option<f32>,

    /// Chat-completion API base URL [default: https://api.openai.com/v1]
    #[arg(long, value_name = "URL")]
    pub base_url: Option<String>,

    /// Address the web UI binds to [default: 127.0.0.1]
    #[arg(long)]
    pub host: Option<String>,

    /// Port for the web UI server [default: 8501]
    #[arg(long)]
    pub port: Option<u16>,

    /// Give up on the completion call after this many seconds (unbounded if unset)
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// TOML settings file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Environment file holding OPENAI_API_KEY [default: ./.env]
    #[arg(long, value_name = "PATH")]
    pub env_file: Option<PathBuf>,

    /// Do not try to open a browser when the server starts
    #[arg(long)]
    pub no_browser: bool,

    /// Print shell completions and exit
    #[arg(long, value_enum, value_name = "SHELL")]
    pub completions: Option<Shell>,
}
