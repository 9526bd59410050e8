//! Copyflow CLI — entry point.
//!
//! # Commands
//!
//! - `copyflow serve` — run the HTTP API
//! - `copyflow status` — show configuration and provider status
//! - `copyflow onboard` — write a default config
//! - `copyflow topics -t TAG...` — one-shot topic ideas
//! - `copyflow script TOPIC` — one-shot video script
//! - `copyflow copy CONTENT` — one-shot platform copy

mod generate;
mod helpers;
mod onboard;
mod serve;
mod status;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};

// ─────────────────────────────────────────────
// CLI definition
// ─────────────────────────────────────────────

/// ✍️ Copyflow — content ideas and copy for short-video platforms
#[derive(Parser, Debug)]
#[command(name = "copyflow", version, about, long_about = None)]
struct Cli {
    /// Config file (default: ~/.copyflow/config.json)
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the HTTP API
    Serve {
        /// Listen address (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Listen port (overrides config)
        #[arg(short, long)]
        port: Option<u16>,

        /// Enable debug logging
        #[arg(long, default_value_t = false)]
        logs: bool,
    },

    /// Show configuration and provider status
    Status,

    /// Write a default configuration file
    Onboard,

    /// Generate topic ideas from tags
    Topics {
        /// Tag to seed the ideas with (repeatable)
        #[arg(short, long = "tag", required = true)]
        tags: Vec<String>,

        /// Target platform, e.g. 抖音, 小红书, 微博, B站
        #[arg(long)]
        platform: Option<String>,

        #[command(flatten)]
        output: GenerationArgs,
    },

    /// Write a video script for a topic
    Script {
        topic: String,

        /// Target platform, e.g. 抖音, 小红书, 微博, B站
        #[arg(long)]
        platform: Option<String>,

        /// Video length, e.g. 15秒, 60秒, 3分钟
        #[arg(long)]
        duration: Option<String>,

        #[command(flatten)]
        output: GenerationArgs,
    },

    /// Write platform copy for a piece of content
    Copy {
        content: String,

        /// Target platform, e.g. 抖音, 小红书, 微博, B站
        #[arg(long)]
        platform: Option<String>,

        /// Tone, e.g. 活泼有趣, 专业严谨, 幽默搞笑
        #[arg(long)]
        style: Option<String>,

        #[command(flatten)]
        output: GenerationArgs,
    },
}

/// Options shared by the one-shot generation commands.
#[derive(Args, Debug, Clone, Default)]
pub struct GenerationArgs {
    /// Model id, e.g. deepseek-chat
    #[arg(long)]
    pub model: Option<String>,

    /// Provider id, e.g. deepseek
    #[arg(long)]
    pub provider: Option<String>,

    /// Print the raw JSON answer
    #[arg(long, default_value_t = false)]
    pub json: bool,

    /// Enable debug logging
    #[arg(long, default_value_t = false)]
    pub logs: bool,
}

// ─────────────────────────────────────────────
// Entrypoint
// ─────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config_path: Option<PathBuf> = cli.config.as_deref().map(helpers::expand_tilde);
    let config_path = config_path.as_deref();

    match cli.command {
        Commands::Serve { host, port, logs } => {
            init_logging(logs, "info");
            serve::run(config_path, host, port).await
        }
        Commands::Status => status::run(config_path),
        Commands::Onboard => onboard::run(config_path),
        Commands::Topics {
            tags,
            platform,
            output,
        } => {
            init_logging(output.logs, "warn");
            generate::topics(config_path, tags, platform, &output).await
        }
        Commands::Script {
            topic,
            platform,
            duration,
            output,
        } => {
            init_logging(output.logs, "warn");
            generate::script(config_path, topic, platform, duration, &output).await
        }
        Commands::Copy {
            content,
            platform,
            style,
            output,
        } => {
            init_logging(output.logs, "warn");
            generate::copy(config_path, content, platform, style, &output).await
        }
    }
}

/// Initialize tracing/logging.
///
/// `--logs` forces debug output for Copyflow's own crates; otherwise
/// `RUST_LOG` is honored, falling back to `default_level`.
fn init_logging(verbose: bool, default_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("copyflow=debug,info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_topics_with_repeated_tags() {
        let cli = Cli::try_parse_from([
            "copyflow", "topics", "-t", "美食", "--tag", "旅游", "--platform", "小红书", "--json",
        ])
        .unwrap();

        match cli.command {
            Commands::Topics {
                tags,
                platform,
                output,
            } => {
                assert_eq!(tags, vec!["美食", "旅游"]);
                assert_eq!(platform.as_deref(), Some("小红书"));
                assert!(output.json);
                assert!(output.model.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn parse_topics_requires_a_tag() {
        assert!(Cli::try_parse_from(["copyflow", "topics"]).is_err());
    }

    #[test]
    fn parse_script_with_model_and_global_config() {
        let cli = Cli::try_parse_from([
            "copyflow", "script", "手冲咖啡入门", "--model", "gpt-4", "--config", "/tmp/c.json",
        ])
        .unwrap();

        assert_eq!(cli.config.as_deref(), Some("/tmp/c.json"));
        match cli.command {
            Commands::Script { topic, output, .. } => {
                assert_eq!(topic, "手冲咖啡入门");
                assert_eq!(output.model.as_deref(), Some("gpt-4"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn parse_serve_overrides() {
        let cli = Cli::try_parse_from(["copyflow", "serve", "-p", "8080", "--logs"]).unwrap();
        match cli.command {
            Commands::Serve { host, port, logs } => {
                assert!(host.is_none());
                assert_eq!(port, Some(8080));
                assert!(logs);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
