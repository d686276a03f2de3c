use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use serde_json::json;

use todo_api::auth;
use todo_api::config;
use todo_api::database::models::todo::TodoStatus;
use todo_api::database::DatabaseManager;
use todo_api::AppState;

#[derive(Parser)]
#[command(name = "todo-admin")]
#[command(about = "Administrative commands for the Todo API database")]
#[command(version)]
struct Cli {
    #[arg(long, global = true, help = "Output in JSON format")]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Apply pending database migrations")]
    Migrate,

    #[command(about = "Person management")]
    Person {
        #[command(subcommand)]
        cmd: PersonCommands,
    },

    #[command(about = "Issue a bearer token for a person")]
    Token {
        #[arg(help = "Person entity_id")]
        person_id: String,
    },

    #[command(about = "List a person's todos")]
    Todos {
        #[arg(help = "Person entity_id")]
        person_id: String,

        #[arg(long, default_value = "all", help = "all, pending or completed")]
        status: String,
    },

    #[command(about = "Show every saved version of a todo")]
    History {
        #[arg(help = "Todo entity_id")]
        entity_id: String,
    },
}

#[derive(Subcommand)]
enum PersonCommands {
    #[command(about = "Create a person")]
    Create {
        #[arg(long)]
        first_name: String,

        #[arg(long)]
        last_name: String,
    },

    #[command(about = "Show an active person")]
    Show { person_id: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        match std::env::var("CLI_VERBOSE").as_deref() {
            Ok("true") | Ok("1") => eprintln!("Error: {e:?}"),
            _ => eprintln!("Error: {e}"),
        }
        std::process::exit(1);
    }

    Ok(())
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let manager = DatabaseManager::connect(&config::config().database)
        .await
        .context("failed to connect to PostgreSQL")?;
    let state = AppState::postgres(manager.pool());

    match cli.command {
        Commands::Migrate => {
            manager.migrate().await?;
            println!("Migrations applied");
        }
        Commands::Person { cmd: PersonCommands::Create { first_name, last_name } } => {
            let person = state.people.create(&first_name, &last_name).await?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&person)?);
            } else {
                println!("{}", person.versioning.entity_id);
            }
        }
        Commands::Person { cmd: PersonCommands::Show { person_id } } => {
            let Some(person) = state.people.get_by_id(&person_id).await? else {
                bail!("person {} not found or inactive", person_id);
            };
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&person)?);
            } else {
                println!("{} {} ({})", person.first_name, person.last_name, person.versioning.entity_id);
            }
        }
        Commands::Token { person_id } => {
            if state.people.get_by_id(&person_id).await?.is_none() {
                bail!("person {} not found or inactive", person_id);
            }
            let token = auth::issue_token(&person_id)?;
            if cli.json {
                println!("{}", json!({ "person_id": person_id, "token": token }));
            } else {
                println!("{}", token);
            }
        }
        Commands::Todos { person_id, status } => {
            let status: TodoStatus = status.parse().map_err(anyhow::Error::msg)?;
            let todos = state.todos.list(&person_id, status).await?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&todos)?);
            } else {
                for todo in todos {
                    let mark = if todo.is_completed { "x" } else { " " };
                    println!("[{}] {}  {}", mark, todo.versioning.entity_id, todo.title);
                }
            }
        }
        Commands::History { entity_id } => {
            let versions = state.todos.history(&entity_id).await?;
            if versions.is_empty() {
                bail!("todo {} has no saved versions", entity_id);
            }
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&versions)?);
            } else {
                for todo in versions {
                    let v = &todo.versioning;
                    println!(
                        "{}  {}  by {}  completed={} active={}  {}",
                        v.changed_on.to_rfc3339(),
                        v.version,
                        v.changed_by_id.as_deref().unwrap_or("-"),
                        todo.is_completed,
                        todo.active,
                        todo.title
                    );
                }
            }
        }
    }

    manager.close().await;
    Ok(())
}
