use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

use pivotalclient::models::{Activity, Integration, Membership, Story};
use pivotalclient::{Config, Record, TrackerClient};

#[derive(Parser, Debug)]
#[command(name = "pivotalclient")]
#[command(version)]
#[command(about = "Read stories, memberships and integrations from Pivotal Tracker")]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Project id (overrides PIVOTAL_PROJECT_ID)
    #[arg(long, global = true)]
    project_id: Option<u64>,

    /// Account id (overrides PIVOTAL_ACCOUNT_ID)
    #[arg(long, global = true)]
    account_id: Option<u64>,

    /// API root (overrides PIVOTAL_API_ROOT)
    #[arg(long, global = true)]
    api_root: Option<String>,

    /// Output format (json, text)
    #[arg(short, long, global = true, default_value = "json")]
    format: String,

    /// Output file (defaults to stdout)
    #[arg(short, long, global = true)]
    output: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Search the project's stories
    Stories {
        /// Tracker search filter, e.g. "state:started"
        #[arg(long, conflicts_with = "label", required_unless_present = "label")]
        filter: Option<String>,

        /// Stories carrying this label
        #[arg(long)]
        label: Option<String>,
    },
    /// Show a single story
    Story { story_id: u64 },
    /// Show a story's activity feed
    Activity { story_id: u64 },
    /// List project memberships, or account memberships with --account
    Memberships {
        #[arg(long)]
        account: bool,
    },
    /// List the project's integrations
    Integrations,
    /// Show a single integration
    Integration { integration_id: u64 },
    /// Unlinked stories of one integration, or of all of them
    IntegrationStories { integration_id: Option<u64> },
}

#[derive(Debug, Clone, Copy)]
enum ResourceKind {
    Story,
    Activity,
    Membership,
    Integration,
    IntegrationStory,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("pivotalclient=info".parse()?)
                .add_directive("reqwest=warn".parse()?),
        )
        .init();

    // Load environment variables
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let mut config = Config::from_env()?;
    if let Some(project_id) = args.project_id {
        config = config.with_project_id(project_id);
    }
    if let Some(account_id) = args.account_id {
        config = config.with_account_id(account_id);
    }
    if let Some(ref api_root) = args.api_root {
        config = config.with_api_root(api_root.clone());
    }

    let client = TrackerClient::new(config)?;

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    spinner.set_message("Fetching from Pivotal Tracker...");
    spinner.enable_steady_tick(Duration::from_millis(100));

    let result = run(&client, &args.command).await;
    spinner.finish_and_clear();
    let (kind, records) = result?;

    output_records(kind, &records, &args)?;

    Ok(())
}

async fn run(client: &TrackerClient, command: &Command) -> pivotalclient::Result<(ResourceKind, Vec<Record>)> {
    let fetched = match command {
        Command::Stories { filter, label } => {
            let stories = match (filter, label) {
                (Some(filter), _) => client.get_stories_by_filter(filter).await?,
                (None, Some(label)) => client.get_stories_by_label(label).await?,
                (None, None) => Vec::new(),
            };
            (ResourceKind::Story, stories)
        }
        Command::Story { story_id } => {
            (ResourceKind::Story, vec![client.get_story(*story_id).await?])
        }
        Command::Activity { story_id } => (
            ResourceKind::Activity,
            client.get_story_activities(*story_id).await?,
        ),
        Command::Memberships { account } => {
            let memberships = if *account {
                client.get_account_memberships().await?
            } else {
                client.get_project_memberships().await?
            };
            (ResourceKind::Membership, memberships)
        }
        Command::Integrations => (ResourceKind::Integration, client.get_integrations().await?),
        Command::Integration { integration_id } => (
            ResourceKind::Integration,
            vec![client.get_integration(*integration_id).await?],
        ),
        Command::IntegrationStories { integration_id } => {
            let stories = match integration_id {
                Some(id) => client.get_integration_stories(*id).await?,
                None => client.get_all_integration_stories().await?,
            };
            (ResourceKind::IntegrationStory, stories)
        }
    };

    Ok(fetched)
}

fn output_records(kind: ResourceKind, records: &[Record], args: &Args) -> anyhow::Result<()> {
    let output = match args.format.as_str() {
        "text" => format_text(kind, records),
        _ => serde_json::to_string_pretty(records)?,
    };

    if let Some(ref path) = args.output {
        std::fs::write(path, &output)?;
        tracing::info!("Output written to: {}", path);
    } else {
        println!("{}", output);
    }

    Ok(())
}

fn format_text(kind: ResourceKind, records: &[Record]) -> String {
    let mut output = String::new();

    for record in records {
        let line = match kind {
            ResourceKind::Story => record.decode::<Story>().ok().map(|story| {
                format!(
                    "#{} [{}] {}{}",
                    story.id,
                    story.current_state.as_deref().unwrap_or("-"),
                    story.name,
                    story
                        .estimate
                        .map(|e| format!(" ({} pts)", e))
                        .unwrap_or_default()
                )
            }),
            ResourceKind::Activity => record.decode::<Activity>().ok().map(|activity| {
                format!(
                    "{} {}",
                    activity
                        .occurred_at
                        .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                        .unwrap_or_else(|| "-".to_string()),
                    activity.message.unwrap_or_default()
                )
            }),
            ResourceKind::Membership => record.decode::<Membership>().ok().map(|membership| {
                format!(
                    "{} {}{}",
                    membership.id,
                    membership.display_name(),
                    membership
                        .role
                        .as_ref()
                        .map(|r| format!(" ({})", r))
                        .unwrap_or_default()
                )
            }),
            ResourceKind::Integration => record.decode::<Integration>().ok().map(|integration| {
                format!(
                    "{} {} {}",
                    integration.id,
                    integration.kind.as_deref().unwrap_or("integration"),
                    integration.name.unwrap_or_default()
                )
            }),
            ResourceKind::IntegrationStory => None,
        };

        output.push_str(&line.unwrap_or_else(|| format_record(record)));
        output.push('\n');
    }

    output.push_str(&format!("\n{} records\n", records.len()));
    output
}

fn format_record(record: &Record) -> String {
    let id = record
        .get("external_id")
        .or_else(|| record.get("id"))
        .map(|v| v.as_str().map(str::to_string).unwrap_or_else(|| v.to_string()))
        .unwrap_or_else(|| "-".to_string());
    let name = record.str_field("name").unwrap_or_default();
    format!("{} {}", id, name)
}
