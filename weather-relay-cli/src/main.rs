use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

use commands::{run_ask, run_card, run_invoke, run_serve, run_weather};

/// Question sent by `ask` when none is given
const DEFAULT_QUESTION: &str = "What is the weather in San Francisco?";

#[derive(Parser, Debug)]
#[command(name = "weather-relay", version)]
#[command(about = "Weather agent over A2A, and an orchestrator that calls it")]
struct Cli {
    /// Emit logs as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Serve the weather agent over A2A
    Serve {
        /// Bind host (overrides WEATHER_AGENT_HOST)
        #[arg(long)]
        host: Option<String>,
        /// Bind port (overrides WEATHER_AGENT_PORT)
        #[arg(long)]
        port: Option<u16>,
        /// URL advertised in the agent card (overrides WEATHER_AGENT_PUBLIC_URL)
        #[arg(long)]
        public_url: Option<String>,
    },
    /// Ask the orchestrator, which consults the remote weather agent
    Ask {
        /// Question for the orchestrator
        #[arg(default_value = DEFAULT_QUESTION)]
        question: String,
        /// Weather agent base URL (overrides WEATHER_AGENT_URL)
        #[arg(long)]
        agent_url: Option<String>,
    },
    /// Fetch and print the weather agent's card
    Card {
        /// Weather agent base URL (overrides WEATHER_AGENT_URL)
        #[arg(long)]
        agent_url: Option<String>,
    },
    /// Run the weather agent in-process, without A2A
    Invoke {
        /// Question for the weather agent
        query: String,
    },
    /// Run the get_weather tool directly
    Weather {
        /// City name
        city: String,
    },
}

fn init_tracing(json: bool) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(env_filter);

    let _ = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
}

#[tokio::main]
async fn main() {
    // A missing .env file is fine; variables may come from the environment.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    init_tracing(cli.json);

    let result = match cli.command {
        Commands::Serve {
            host,
            port,
            public_url,
        } => run_serve(host, port, public_url).await,
        Commands::Ask {
            question,
            agent_url,
        } => run_ask(&question, agent_url).await,
        Commands::Card { agent_url } => run_card(agent_url).await,
        Commands::Invoke { query } => run_invoke(&query).await,
        Commands::Weather { city } => {
            run_weather(&city);
            Ok(())
        }
    };

    if let Err(e) = result {
        tracing::error!(error = %e, "Command failed");
        std::process::exit(1);
    }
}
