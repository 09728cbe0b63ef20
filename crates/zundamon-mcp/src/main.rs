//! hello-zundamon MCP server entry point.

use std::sync::Arc;
use std::time::Duration;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

use zundamon_mcp::config::{resolve_log_file, resolve_people_policy, ServerConfig};
use zundamon_mcp::handlers::build_registry;
use zundamon_mcp::resources::ResourceRegistry;
use zundamon_mcp::session::{Session, ShutdownReason};
use zundamon_mcp::tools::ToolRegistry;
use zundamon_mcp::types::InitializeResult;

/// How long shutdown waits on blocking threads. A pending stdin read never
/// finishes on its own, so the process must not wait for it.
const SHUTDOWN_GRACE: Duration = Duration::from_millis(200);

#[derive(Parser)]
#[command(
    name = "zundamon-mcp",
    about = "Zundamon's minimal MCP server: a greeting resource and a zunda-mochi calculator over stdio",
    version
)]
struct Cli {
    /// Log level (trace, debug, info, warn, error).
    #[arg(long, default_value = "info", global = true)]
    log_level: String,

    /// Diagnostic log file (default: ./zundamon_mcp.log, or $ZUNDAMON_LOG_FILE).
    #[arg(long, global = true)]
    log_file: Option<String>,

    /// Only log to stderr.
    #[arg(long, global = true)]
    no_log_file: bool,

    /// Reject invalid `people` values instead of treating them as 1.
    #[arg(long, global = true)]
    strict: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start MCP server over stdio (default).
    Serve,

    /// Print server capabilities as JSON.
    Info,

    /// Generate shell completion scripts.
    ///
    /// Examples:
    ///   zundamon-mcp completions bash > ~/.local/share/bash-completion/completions/zundamon-mcp
    ///   zundamon-mcp completions zsh > ~/.zfunc/_zundamon-mcp
    Completions {
        /// Shell type (bash, zsh, fish, powershell, elvish).
        shell: Shell,
    },

    /// Launch interactive REPL mode.
    Repl,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = ServerConfig {
        log_level: cli.log_level.clone(),
        log_file: resolve_log_file(cli.log_file.as_deref(), cli.no_log_file),
        people_policy: resolve_people_policy(cli.strict),
    };

    zundamon_mcp::logging::init(&config.log_level, config.log_file.as_deref())?;

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => {
            let runtime = tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()?;
            let outcome = runtime.block_on(serve(&config));
            runtime.shutdown_timeout(SHUTDOWN_GRACE);
            outcome?;
        }

        Commands::Info => {
            let registry = build_registry(config.people_policy)?;
            let options = InitializeResult::new(registry.server_capabilities());
            let tools = ToolRegistry::list_tools();
            let resources = ResourceRegistry::list_resources();
            let info = serde_json::json!({
                "server": options.server_info,
                "protocol_version": options.protocol_version,
                "capabilities": options.capabilities,
                "methods": registry.kinds().map(|k| k.method()).collect::<Vec<_>>(),
                "tools": tools.iter().map(|t| &t.name).collect::<Vec<_>>(),
                "resources": resources.iter().map(|r| &r.uri).collect::<Vec<_>>(),
            });
            println!("{}", serde_json::to_string_pretty(&info)?);
        }

        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "zundamon-mcp", &mut std::io::stdout());
        }

        Commands::Repl => {
            zundamon_mcp::repl::run(config.people_policy)?;
        }
    }

    Ok(())
}

async fn serve(config: &ServerConfig) -> anyhow::Result<()> {
    tracing::info!("=== hello-zundamon MCP server starting ===");
    tracing::info!(
        "Version {}, argument policy {:?}",
        env!("CARGO_PKG_VERSION"),
        config.people_policy
    );

    let registry = match build_registry(config.people_policy) {
        Ok(registry) => Arc::new(registry),
        Err(e) => {
            tracing::error!("Server initialization failed: {e}");
            return Err(e.into());
        }
    };

    let mut session = Session::stdio(registry);
    match session.run().await {
        Ok(ShutdownReason::EndOfStream) => tracing::info!("Client disconnected"),
        Ok(ShutdownReason::Interrupted) => tracing::info!("Server interrupted"),
        Err(e) => {
            tracing::error!("Server error: {e}");
            return Err(e.into());
        }
    }

    tracing::info!("Session {}", session.state());
    Ok(())
}
