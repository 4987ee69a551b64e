//! otto - planner-driven workplace assistant

mod config;
mod console;

use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;

use otto_ai::{ChatClient, ChatEndpoint, ContentSafetyClient};
use otto_bot::{
    ActionPlanner, ActionSpec, App, ContentSafetyModerator, DirectoryHandle, Moderator,
    TurnContext, default_actions,
};

/// otto - workplace assistant over Microsoft Graph
#[derive(Parser, Debug)]
#[command(name = "otto")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Completion provider (openai, azure)
    #[arg(short, long)]
    provider: Option<String>,

    /// Run a single message instead of the interactive prompt
    #[arg(short, long)]
    message: Option<String>,

    /// Config file path (default: ~/.config/otto/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Plan-continuation retry budget
    #[arg(long)]
    max_retries: Option<u32>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Initialize config file
    #[arg(long)]
    init_config: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Setup tracing
    if args.verbose {
        tracing_subscriber::fmt()
            .with_env_filter("otto=debug")
            .init();
    }

    // Initialize config and exit
    if args.init_config {
        match config::Config::init() {
            Ok(path) => {
                println!("Config file created at: {}", path.display());
                println!("\nExample config:\n{}", config::example_config());
            }
            Err(e) => {
                eprintln!("Error creating config: {}", e);
                std::process::exit(1);
            }
        }
        return Ok(());
    }

    // Load config file (CLI args take precedence)
    let cfg = match args.config {
        Some(ref path) => config::Config::load_from(path),
        None => config::Config::load(),
    };

    let provider = args
        .provider
        .or(cfg.provider.clone())
        .unwrap_or_else(|| "openai".to_string());

    let endpoint = build_endpoint(&provider, &cfg);
    let client = ChatClient::new(endpoint)?;

    // Wire the app: actions share one directory handle, filled on sign-in
    let directory = DirectoryHandle::new();
    let actions = default_actions(directory.clone());
    let specs: Vec<ActionSpec> = actions
        .iter()
        .map(|a| ActionSpec {
            name: a.name().to_string(),
            description: a.description().to_string(),
            parameters: a.parameters_schema(),
        })
        .collect();
    let planner = Arc::new(ActionPlanner::new(client, specs));

    let mut builder = App::builder()
        .planner(planner)
        .actions(actions)
        .directory(directory)
        .moderator(build_moderator(&cfg)?);
    if let Some(max_retries) = args.max_retries.or(cfg.max_retries) {
        builder = builder.max_retries(max_retries);
    }
    let app = builder.build()?;

    let sink = Arc::new(console::ConsoleSink);
    let conversation_id = uuid::Uuid::new_v4().to_string();

    // Sign in with the configured Graph token, if any
    match cfg.graph_token() {
        Some(token) => {
            let ctx = TurnContext::message(&conversation_id, "", sink.clone());
            app.handle_sign_in(&ctx, &token).await?;
        }
        None => {
            eprintln!("Warning: no Graph token configured; directory lookups will fail.");
            eprintln!("Set graph.token in the config file or the GRAPH_TOKEN env var.");
        }
    }

    // Non-interactive mode
    if let Some(message) = args.message {
        let ctx = TurnContext::message(&conversation_id, message, sink);
        app.run(&ctx).await?;
        return Ok(());
    }

    run_interactive(&app, &conversation_id, sink).await
}

fn build_endpoint(provider: &str, cfg: &config::Config) -> ChatEndpoint {
    match provider {
        "azure" => {
            let (Some(endpoint), Some(deployment)) =
                (cfg.azure_endpoint(), cfg.azure_deployment())
            else {
                eprintln!("Error: Azure OpenAI endpoint and deployment are required");
                eprintln!("Set them in the config file or via AZURE_OPENAI_ENDPOINT / AZURE_OPENAI_DEPLOYMENT");
                std::process::exit(1);
            };
            let Some(api_key) = cfg.azure_api_key() else {
                eprintln!("Error: no Azure OpenAI API key found");
                eprintln!("Set azure.api_key in the config file or export AZURE_OPENAI_API_KEY");
                std::process::exit(1);
            };
            ChatEndpoint::Azure {
                endpoint,
                deployment,
                api_key,
                api_version: ChatEndpoint::AZURE_API_VERSION.to_string(),
            }
        }
        _ => {
            let Some(api_key) = cfg.openai_api_key() else {
                eprintln!("Error: no OpenAI API key found");
                eprintln!("Set openai.api_key in the config file or export OPENAI_API_KEY");
                std::process::exit(1);
            };
            ChatEndpoint::OpenAi {
                base_url: cfg
                    .openai
                    .base_url
                    .clone()
                    .unwrap_or_else(|| "https://api.openai.com/v1".to_string()),
                api_key,
                model: cfg
                    .openai
                    .model
                    .clone()
                    .unwrap_or_else(|| "gpt-4o-mini".to_string()),
            }
        }
    }
}

fn build_moderator(cfg: &config::Config) -> anyhow::Result<Arc<dyn Moderator>> {
    match (cfg.content_safety_endpoint(), cfg.content_safety_api_key()) {
        (Some(endpoint), Some(api_key)) => {
            let client = ContentSafetyClient::new(endpoint, api_key)?;
            Ok(Arc::new(ContentSafetyModerator::new(client)))
        }
        _ => {
            tracing::debug!("content safety not configured, moderation disabled");
            Ok(Arc::new(otto_bot::NoopModerator))
        }
    }
}

async fn run_interactive(
    app: &App,
    conversation_id: &str,
    sink: Arc<console::ConsoleSink>,
) -> anyhow::Result<()> {
    use std::io::{self, Write};

    if std::io::IsTerminal::is_terminal(&std::io::stderr()) {
        eprintln!("otto (conversation {})", &conversation_id[..8]);
        eprintln!("Type /reset to start over, or exit with Ctrl-D.");
        eprintln!();
    }

    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            // EOF
            break;
        }

        let input = input.trim();
        if input.is_empty() {
            continue;
        }
        if input == "exit" || input == "quit" {
            break;
        }

        let ctx = TurnContext::message(conversation_id, input, sink.clone());
        if let Err(e) = app.run(&ctx).await {
            eprintln!("Error: {}", e);
        }

        println!();
    }

    Ok(())
}
