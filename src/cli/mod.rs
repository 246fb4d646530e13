use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    // --- History Store Args ---
    /// History store type (file, memory)
    #[arg(long, env = "HISTORY_TYPE", default_value = "file")]
    pub history_type: String,

    /// Directory holding the history slot file.
    #[arg(long, env = "HISTORY_DIR", default_value = ".")]
    pub history_dir: String,

    /// Name of the storage slot the transcript is kept under.
    #[arg(long, env = "HISTORY_KEY", default_value = "chat-memories")]
    pub history_key: String,

    // --- Response Provider Args ---
    /// Response provider (stub, ollama)
    #[arg(long, env = "PROVIDER", default_value = "stub")]
    pub provider: String,

    /// Base URL for the provider API (e.g., http://localhost:11434 for Ollama)
    #[arg(long, env = "PROVIDER_BASE_URL")] // No default, let the provider pick one
    pub provider_base_url: Option<String>,

    /// Model name for the provider (e.g., llama3)
    #[arg(long, env = "PROVIDER_MODEL")]
    pub provider_model: Option<String>,

    /// Delay before the stub provider answers, in milliseconds.
    #[arg(long, env = "STUB_DELAY_MS", default_value = "1200")]
    pub stub_delay_ms: u64,

    /// Give up on a response after this many milliseconds.
    #[arg(long, env = "RESPONSE_TIMEOUT_MS", default_value = "30000")]
    pub response_timeout_ms: u64,

    // --- General App Args ---
    /// Path or http(s) URL of the prompt context loaded at startup.
    #[arg(long, env = "PROMPT_PATH", default_value = "prompt.txt")]
    pub prompt_path: String,

    /// Directory exported conversations are written to.
    #[arg(long, env = "EXPORT_DIR", default_value = ".")]
    pub export_dir: String,

    /// Enable debug logging/output
    #[arg(long, env = "DEBUG", default_value = "false")]
    pub debug: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let args = Args::try_parse_from(["chat-memory"]).unwrap();
        assert_eq!(args.history_type, "file");
        assert_eq!(args.history_key, "chat-memories");
        assert_eq!(args.provider, "stub");
        assert_eq!(args.stub_delay_ms, 1200);
        assert_eq!(args.response_timeout_ms, 30_000);
        assert_eq!(args.prompt_path, "prompt.txt");
    }

    #[test]
    fn flags_override_defaults() {
        let args = Args::try_parse_from([
            "chat-memory",
            "--history-type",
            "memory",
            "--provider",
            "ollama",
            "--provider-model",
            "llama3",
            "--response-timeout-ms",
            "500",
        ]).unwrap();
        assert_eq!(args.history_type, "memory");
        assert_eq!(args.provider, "ollama");
        assert_eq!(args.provider_model.as_deref(), Some("llama3"));
        assert_eq!(args.response_timeout_ms, 500);
    }
}
