use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::json;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use threadsmith::cli::{read_topics, Commands};
use threadsmith::domain::KEY_LOG_LEVEL;
use threadsmith::{
    ChatClient, ConfigMap, ContentFormatter, EnvironmentResolver, MockChatClient,
    OpenAiChatClient, DEFAULT_THREAD_TEMPLATE,
};

#[derive(Parser)]
#[command(name = "threadsmith")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use an offline mock instead of the chat completions API
    #[arg(long, global = true)]
    mock: bool,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // The final level depends on the resolved config, so resolution logs
    // through a scoped subscriber.
    let (environment, config) = tracing::subscriber::with_default(
        subscriber(bootstrap_level(cli.verbose)),
        || EnvironmentResolver::from_process().load(),
    );

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        log_level(&config)
    };
    tracing::subscriber::set_global_default(subscriber(level))?;

    info!("Environment: {}", environment);

    match cli.command {
        Commands::Config => {
            let report = json!({
                "environment": environment,
                "config": config,
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
        }

        Commands::ImagePrompt {
            topic,
            title,
            subtitle,
        } => {
            println!(
                "{}",
                ContentFormatter::build_image_prompt(&topic, &title, &subtitle)
            );
        }

        Commands::Ping => {
            let client = build_client(cli.mock)?;
            if client.test_connection().await {
                println!("Connection OK (model: {})", client.model_name());
            } else {
                println!("Connection failed (model: {})", client.model_name());
                return Ok(ExitCode::FAILURE);
            }
        }

        Commands::Thread {
            topic,
            template,
            image,
        } => {
            let template = load_template(template.as_deref()).await?;
            let formatter = ContentFormatter::new(build_client(cli.mock)?);

            let thread = match formatter.generate_thread(&topic, &template).await {
                Ok(thread) => thread,
                Err(e) => {
                    eprintln!("Thread generation failed [{}]: {}", e.category(), e);
                    return Ok(ExitCode::FAILURE);
                }
            };

            println!("Thread for \"{}\" ({} posts):\n", topic, thread.len());
            for segment in thread.segments() {
                println!("{}\n", segment);
            }

            if image {
                match formatter.extract_cover_title(&thread).await {
                    Ok(title) => {
                        println!("Main title: {}", title.main_title());
                        println!("Subtitle:   {}", title.subtitle());
                        println!();
                        println!(
                            "{}",
                            ContentFormatter::build_image_prompt(
                                &topic,
                                title.main_title(),
                                title.subtitle()
                            )
                        );
                    }
                    Err(e) => {
                        eprintln!("Cover title extraction failed [{}]: {}", e.category(), e);
                        return Ok(ExitCode::FAILURE);
                    }
                }
            }
        }

        Commands::Batch {
            topics_file,
            template,
        } => {
            let topics = read_topics(&topics_file)
                .await
                .with_context(|| format!("failed to read topics from {topics_file}"))?;
            if topics.is_empty() {
                println!("No topics to process.");
                return Ok(ExitCode::SUCCESS);
            }

            let template = load_template(template.as_deref()).await?;
            let formatter = ContentFormatter::new(build_client(cli.mock)?);

            let progress_bar = ProgressBar::new(topics.len() as u64);
            progress_bar.set_style(
                ProgressStyle::default_bar()
                    .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
                    .progress_chars("#>-"),
            );

            let mut succeeded = 0usize;
            for topic in &topics {
                progress_bar.set_message(topic.clone());
                match formatter.generate_thread(topic, &template).await {
                    Ok(thread) => {
                        succeeded += 1;
                        let line = json!({ "topic": topic, "thread": thread });
                        progress_bar.println(line.to_string());
                    }
                    Err(e) => {
                        progress_bar.println(format!(
                            "Failed \"{}\" [{}]: {}",
                            topic,
                            e.category(),
                            e
                        ));
                    }
                }
                progress_bar.inc(1);
            }
            progress_bar.finish_and_clear();

            println!("{}/{} topics succeeded", succeeded, topics.len());
            if succeeded < topics.len() {
                return Ok(ExitCode::FAILURE);
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn build_client(mock: bool) -> Result<Arc<dyn ChatClient>> {
    if mock {
        info!("Using mock chat client");
        return Ok(Arc::new(MockChatClient::new()));
    }
    let client = OpenAiChatClient::from_env().context("failed to configure chat client")?;
    Ok(Arc::new(client))
}

async fn load_template(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("failed to read template {path}")),
        None => Ok(DEFAULT_THREAD_TEMPLATE.to_string()),
    }
}

fn subscriber(level: Level) -> FmtSubscriber {
    FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish()
}

fn bootstrap_level(verbose: bool) -> Level {
    if verbose {
        Level::DEBUG
    } else {
        Level::WARN
    }
}

fn log_level(config: &ConfigMap) -> Level {
    match config
        .get_str(KEY_LOG_LEVEL)
        .map(str::to_uppercase)
        .as_deref()
    {
        Some("DEBUG") => Level::DEBUG,
        Some("WARNING") | Some("WARN") => Level::WARN,
        Some("ERROR") => Level::ERROR,
        _ => Level::INFO,
    }
}
