//! `whatisdev`: drive the glossary moderation and voting workflow from a
//! terminal.
//!
//! Stands in for the web front end: list and moderate pending definitions,
//! manage your own submissions, vote on definitions, browse a term page.
//! The API base URL and bearer token come from the environment (see
//! `config.rs`).

mod config;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use dialoguer::{theme::ColorfulTheme, Confirm};
use glossary_client::{Definition, DefinitionPatch, GlossaryClient, NewUser, VoteValue};
use glossary_workflow::{
    Contributions, DefinitionDraft, DefinitionGateway, ModerationQueue, Session, SessionContext,
    StatusFilter, VotePanel, WorkflowError,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;

#[derive(Parser)]
#[command(
    name = "whatisdev",
    about = "Moderation and voting CLI for the WhatIsDev glossary",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Log in and print a token to export as GLOSSARY_TOKEN
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Create an account and print a token to export as GLOSSARY_TOKEN
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Revoke the current token server-side
    Logout,
    /// Show the account behind the current token
    Whoami,
    /// List definitions awaiting moderation
    Pending,
    /// Approve a pending definition
    Approve { id: i64 },
    /// Reject a pending definition, deleting it
    Reject {
        id: i64,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// List your own definitions with per-status counts
    Mine {
        /// all, approved, or pending
        #[arg(long, default_value = "all")]
        filter: StatusFilter,
    },
    /// Submit a new definition for a term
    Submit {
        #[arg(long)]
        term_id: i64,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        explanation: String,
        #[arg(long)]
        code_example: Option<String>,
        #[arg(long)]
        demo_url: Option<String>,
    },
    /// Edit one of your own definitions
    Edit {
        id: i64,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        explanation: Option<String>,
        #[arg(long)]
        code_example: Option<String>,
        #[arg(long)]
        demo_url: Option<String>,
    },
    /// Vote on a definition
    Vote {
        id: i64,
        #[arg(value_enum)]
        direction: Direction,
    },
    /// Show a term and its approved definitions
    Term { slug: String },
    /// Browse the terms index
    Terms {
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        category_id: Option<i64>,
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// List the glossary categories
    Categories,
}

#[derive(Clone, Copy, ValueEnum)]
enum Direction {
    Up,
    Down,
}

impl From<Direction> for VoteValue {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::Up => Self::Up,
            Direction::Down => Self::Down,
        }
    }
}

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    if let Err(err) = run(cli).await {
        if requires_login(&err) {
            eprintln!(
                "{}",
                "Session missing or expired. Run `whatisdev login` and export GLOSSARY_TOKEN."
                    .yellow()
            );
        }
        eprintln!("{} {err:#}", "Error:".red().bold());
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = Config::from_env().context("Failed to load configuration")?;

    match cli.command {
        Command::Login { email, password } => login(&config, &email, &password).await,
        Command::Register {
            name,
            email,
            password,
        } => register(&config, name, email, password).await,
        Command::Logout => logout(&config).await,
        Command::Whoami => whoami(&config).await,
        Command::Pending => pending(&config).await,
        Command::Approve { id } => approve(&config, id).await,
        Command::Reject { id, yes } => reject(&config, id, yes).await,
        Command::Mine { filter } => mine(&config, filter).await,
        Command::Submit {
            term_id,
            title,
            explanation,
            code_example,
            demo_url,
        } => {
            let mut draft = DefinitionDraft::new(term_id, explanation);
            if let Some(title) = title {
                draft = draft.with_title(title);
            }
            if let Some(code_example) = code_example {
                draft = draft.with_code_example(code_example);
            }
            if let Some(demo_url) = demo_url {
                draft = draft.with_demo_url(demo_url);
            }
            submit(&config, draft).await
        }
        Command::Edit {
            id,
            title,
            explanation,
            code_example,
            demo_url,
        } => {
            let patch = DefinitionPatch {
                title,
                explanation,
                code_example,
                demo_url,
            };
            edit(&config, id, patch).await
        }
        Command::Vote { id, direction } => vote(&config, id, direction.into()).await,
        Command::Term { slug } => term(&config, &slug).await,
        Command::Terms {
            search,
            category_id,
            page,
        } => terms(&config, search.as_deref(), category_id, page).await,
        Command::Categories => categories(&config).await,
    }
}

// =============================================================================
// Commands
// =============================================================================

async fn login(config: &Config, email: &str, password: &str) -> Result<()> {
    let client = GlossaryClient::new(&config.api_url);
    let auth = client.login(email, password).await?;
    println!(
        "{} Logged in as {} ({})",
        "✓".green().bold(),
        auth.user.name.cyan(),
        if auth.user.is_admin { "admin" } else { "member" }
    );
    println!();
    println!("Export the token for subsequent commands:");
    println!("  export GLOSSARY_TOKEN={}", auth.token);
    Ok(())
}

async fn register(config: &Config, name: String, email: String, password: String) -> Result<()> {
    let client = GlossaryClient::new(&config.api_url);
    let new_user = NewUser {
        name,
        email,
        password_confirmation: password.clone(),
        password,
    };
    let auth = client.register(&new_user).await?;
    println!(
        "{} Welcome, {}! Export the token for subsequent commands:",
        "✓".green().bold(),
        auth.user.name.cyan()
    );
    println!("  export GLOSSARY_TOKEN={}", auth.token);
    Ok(())
}

async fn logout(config: &Config) -> Result<()> {
    let (client, _) = authenticated(config).await?;
    client.logout().await?;
    println!("{} Token revoked. Unset GLOSSARY_TOKEN.", "✓".green().bold());
    Ok(())
}

async fn whoami(config: &Config) -> Result<()> {
    let (client, _) = authenticated(config).await?;
    let user = client.current_user().await?;
    println!(
        "{} ({})",
        user.name.cyan().bold(),
        if user.is_admin { "admin" } else { "member" }
    );
    if let Some(email) = user.email {
        println!("  {email}");
    }
    Ok(())
}

async fn pending(config: &Config) -> Result<()> {
    let (client, mut session) = authenticated(config).await?;
    let mut queue = ModerationQueue::new(gateway(client));
    queue.refresh(&mut session).await?;

    if queue.is_empty() {
        println!("{}", "No definitions awaiting moderation.".green());
        return Ok(());
    }

    println!(
        "{}",
        format!("{} definition(s) awaiting approval", queue.len()).bold()
    );
    println!();
    for definition in queue.items() {
        print_definition(definition);
    }
    Ok(())
}

async fn approve(config: &Config, id: i64) -> Result<()> {
    let (client, mut session) = authenticated(config).await?;
    let mut queue = ModerationQueue::new(gateway(client));
    queue.refresh(&mut session).await?;

    let approved = queue.approve(&mut session, id).await?;
    println!(
        "{} Approved \"{}\". It is now live on its term page.",
        "✓".green().bold(),
        approved.display_title()
    );
    Ok(())
}

async fn reject(config: &Config, id: i64, yes: bool) -> Result<()> {
    let (client, mut session) = authenticated(config).await?;
    let mut queue = ModerationQueue::new(gateway(client));
    queue.refresh(&mut session).await?;

    if !yes {
        let confirmed = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(format!("Reject definition {id}? This deletes it."))
            .default(false)
            .interact()?;
        if !confirmed {
            println!("Cancelled.");
            return Ok(());
        }
    }

    queue.reject(&mut session, id).await?;
    println!("{} Definition {id} rejected and deleted.", "✗".red().bold());
    Ok(())
}

async fn mine(config: &Config, filter: StatusFilter) -> Result<()> {
    let (client, mut session) = authenticated(config).await?;
    let mut contributions = Contributions::new(gateway(client));
    contributions.refresh(&mut session).await?;
    contributions.set_filter(filter);

    let counts = contributions.counts();
    println!(
        "{}  {}  {}",
        format!("All ({})", counts.all).bold(),
        format!("Approved ({})", counts.approved).green(),
        format!("Pending ({})", counts.pending).yellow()
    );
    println!();
    for definition in contributions.visible() {
        print_definition(definition);
    }
    Ok(())
}

async fn submit(config: &Config, draft: DefinitionDraft) -> Result<()> {
    let (client, mut session) = authenticated(config).await?;
    let mut contributions = Contributions::new(gateway(client));
    let created = contributions.submit(&mut session, draft).await?;
    println!(
        "{} Definition {} submitted for review (pending approval).",
        "✓".green().bold(),
        created.id
    );
    Ok(())
}

async fn vote(config: &Config, id: i64, value: VoteValue) -> Result<()> {
    let (client, mut session) = authenticated(config).await?;
    let mut panel = VotePanel::new(gateway(client));
    let receipt = panel.cast(&mut session, id, value).await?;

    let vote_label = match receipt.my_vote {
        Some(VoteValue::Up) => "+1".green().to_string(),
        Some(VoteValue::Down) => "-1".red().to_string(),
        None => "removed".dimmed().to_string(),
    };
    println!(
        "Your vote: {}   Score: {}",
        vote_label,
        receipt.score.to_string().cyan().bold()
    );
    Ok(())
}

async fn edit(config: &Config, id: i64, patch: DefinitionPatch) -> Result<()> {
    let (client, _) = authenticated(config).await?;
    let updated = client.update_definition(id, &patch).await?;
    println!(
        "{} Definition {} updated.",
        "✓".green().bold(),
        updated.id
    );
    Ok(())
}

async fn term(config: &Config, slug: &str) -> Result<()> {
    let client = client_for(config);
    let term = client.term_by_slug(slug).await?;

    println!("{}", term.title.cyan().bold());
    if let Some(category) = &term.category {
        println!("  [{}]", category.name);
    }
    if let Some(description) = &term.description_short {
        println!("  {description}");
    }
    println!();
    println!(
        "{}",
        format!("Definitions ({})", term.approved_definitions.len()).bold()
    );
    for definition in &term.approved_definitions {
        print_definition(definition);
    }

    // Viewing the page counts as a view of each listed definition.
    let ids: Vec<i64> = term.approved_definitions.iter().map(|d| d.id).collect();
    if !ids.is_empty() {
        let _ = client.record_views(slug, &ids).await;
    }
    Ok(())
}

async fn terms(
    config: &Config,
    search: Option<&str>,
    category_id: Option<i64>,
    page: u32,
) -> Result<()> {
    let client = client_for(config);
    let terms = client.terms(search, category_id, page).await?;

    println!(
        "{}",
        format!(
            "{} term(s), page {} of {}",
            terms.total, terms.current_page, terms.last_page
        )
        .bold()
    );
    for term in &terms.data {
        let category = term
            .category
            .as_ref()
            .map(|c| format!(" [{}]", c.name))
            .unwrap_or_default();
        println!("  {}{}", term.title.cyan(), category.dimmed());
        println!("    /terms/{}", term.slug);
        if let Some(description) = &term.description_short {
            println!("    {description}");
        }
    }
    if terms.has_more() {
        println!();
        println!("{}", format!("More: --page {}", terms.current_page + 1).dimmed());
    }
    Ok(())
}

async fn categories(config: &Config) -> Result<()> {
    let client = client_for(config);
    for category in client.categories().await? {
        println!("  {}", category.name.cyan());
        if let Some(description) = category.description {
            println!("    {description}");
        }
    }
    Ok(())
}

// =============================================================================
// Helpers
// =============================================================================

fn client_for(config: &Config) -> GlossaryClient {
    let mut client = GlossaryClient::new(&config.api_url);
    if let Some(token) = &config.token {
        client.set_token(token);
    }
    client
}

/// A client plus an established session context. Fetches the account behind
/// the token once, so the workflow gets an explicit session instead of a
/// bare credential.
async fn authenticated(config: &Config) -> Result<(GlossaryClient, SessionContext)> {
    let token = config
        .token
        .clone()
        .ok_or(WorkflowError::AuthRequired)?;
    let client = client_for(config);
    let user = client.current_user().await?;
    let session = SessionContext::signed_in(Session { token, user });
    Ok((client, session))
}

fn gateway(client: GlossaryClient) -> Arc<dyn DefinitionGateway> {
    Arc::new(client)
}

fn requires_login(err: &anyhow::Error) -> bool {
    if let Some(workflow) = err.downcast_ref::<WorkflowError>() {
        return workflow.requires_login();
    }
    matches!(
        err.downcast_ref::<glossary_client::GlossaryError>(),
        Some(glossary_client::GlossaryError::AuthRequired)
    )
}

fn print_definition(definition: &Definition) {
    let status = if definition.is_approved {
        "approved".green()
    } else {
        "pending".yellow()
    };
    println!(
        "  #{} {} [{}]",
        definition.id,
        definition.display_title().bold(),
        status
    );
    if let Some(user) = &definition.user {
        println!("     by {}", user.name);
    }
    println!("     {}", definition.explanation);
    if definition.code_example.is_some() {
        println!("     {}", "(has code example)".dimmed());
    }
    if let Some(demo_url) = &definition.demo_url {
        println!("     demo: {demo_url}");
    }
    println!(
        "     ▲ {}  ▼ {}  score {}  {} views",
        definition.up_votes(),
        definition.down_votes(),
        definition.score,
        definition.views_count
    );
    println!();
}
