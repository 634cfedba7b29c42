//! Wizard CLI
//!
//! Runs the package wizard in a terminal. Options are picked by number,
//! free-text answers are typed as-is.
//!
//! Usage:
//!   cargo run --bin wizard_cli -- --lang ar
//!   cargo run --bin wizard_cli -- --config config/wizard.yaml --no-delay
//!   cargo run --bin wizard_cli -- --json          # JSON lines: transcript, final snapshot, handoff
//!
//! Commands at the prompt:
//!   :lang <fr|ar|en>   switch language (restarts the session)
//!   :restart           start over
//!   :quit              leave

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use tokio::io::{AsyncBufReadExt, BufReader};
use uuid::Uuid;

use manasik_wizard::{
    Delays, EngineOptions, EntryContent, HandoffTarget, LabelKey, LabelTable, Language,
    PacedSession, Role, SessionSnapshot, SessionWatcher, WizardConfig, WizardEngine,
};

/// Interactive Omra package wizard
#[derive(Parser, Debug)]
#[command(name = "wizard_cli")]
#[command(about = "Configure an Omra package and get a WhatsApp handoff link")]
struct Args {
    /// Session language (fr, ar, en)
    #[arg(long, short = 'l')]
    lang: Option<Language>,

    /// Config file (defaults to $WIZARD_CONFIG, then config/wizard.yaml)
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// Print transcript lines as JSON
    #[arg(long)]
    json: bool,

    /// Deliver assistant lines without typing delays
    #[arg(long)]
    no_delay: bool,
}

/// Transcript lines already written to the terminal
struct Printed {
    session_id: Uuid,
    count: usize,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => {
            let mut config = WizardConfig::load(path)
                .with_context(|| format!("loading {}", path.display()))?;
            config.apply_overrides(|key| std::env::var(key).ok())?;
            config
        }
        None => WizardConfig::from_env()?,
    };
    if args.no_delay {
        config.delays = Delays::NONE;
    }

    let catalog = config.catalog().context("loading catalog")?;
    let target = config.handoff_target()?;
    let labels = Arc::new(LabelTable::builtin());
    let language = args.lang.unwrap_or(config.default_language);

    let engine = WizardEngine::with_options(
        Arc::new(catalog),
        labels.clone(),
        language,
        EngineOptions::paced(&config),
    );
    let mut session = PacedSession::new(engine);
    let mut watcher = session.subscribe();
    let mut printed = Printed {
        session_id: Uuid::nil(),
        count: 0,
    };

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        drain(&session, &mut watcher, &mut printed, args.json).await;
        let snapshot = session.snapshot();

        if snapshot.state.is_terminal() {
            if args.json {
                println!("{}", serde_json::to_string(&snapshot)?);
            }
            match session.handoff(&target).await {
                Ok(handoff) if args.json => println!("{}", serde_json::to_string(&handoff)?),
                Ok(handoff) => println!(
                    "\n{} {}\n",
                    labels.get(LabelKey::BookWhatsApp, snapshot.language).green().bold(),
                    handoff.url
                ),
                Err(e) => eprintln!("{} {}", "ERROR:".red().bold(), e),
            }
            if !args.json {
                println!("{}", ":restart  :lang <fr|ar|en>  :quit".dimmed());
            }
        } else if !args.json {
            print_choices(&session, &snapshot, &labels).await;
        }

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let input = line.trim();

        match input.split_once(' ').unwrap_or((input, "")) {
            (":quit", _) | (":q", _) => break,
            (":restart", _) => session.restart().await,
            (":lang", tag) => match tag.trim().parse::<Language>() {
                Ok(language) => {
                    session.set_language(language).await;
                }
                Err(e) => eprintln!("{} {}", "ERROR:".red().bold(), e),
            },
            _ if snapshot.state.is_free_text() => {
                if !session.submit_text(input).await? {
                    eprintln!("{}", "(empty answer ignored)".dimmed());
                }
            }
            _ if snapshot.state.is_selectable() => {
                let options = session.options().await;
                let chosen = input
                    .parse::<usize>()
                    .ok()
                    .and_then(|n| n.checked_sub(1))
                    .and_then(|i| options.get(i))
                    .map(|o| o.id.clone())
                    .unwrap_or_else(|| input.to_string());

                if let Err(e) = session.select(&chosen).await {
                    eprintln!("{} {}", "ERROR:".red().bold(), e);
                }
            }
            _ => {}
        }
    }

    Ok(())
}

/// Print transcript lines as they are delivered, until the session is ready
async fn drain(session: &PacedSession, watcher: &mut SessionWatcher, printed: &mut Printed, json: bool) {
    loop {
        let snapshot = watcher.borrow_and_update().clone();

        if snapshot.session_id != printed.session_id {
            if printed.count > 0 && !json {
                println!("{}", "────────────────────────────".dimmed());
            }
            printed.session_id = snapshot.session_id;
            printed.count = 0;
        }

        for entry in snapshot.transcript.iter().skip(printed.count) {
            if json {
                match serde_json::to_string(entry) {
                    Ok(line) => println!("{}", line),
                    Err(e) => eprintln!("{} {}", "ERROR:".red().bold(), e),
                }
                continue;
            }
            match (&entry.role, &entry.content) {
                (Role::Visitor, EntryContent::Text(text)) => println!("{} {}", ">".dimmed(), text),
                (Role::Assistant, EntryContent::Text(text)) => println!("{}", text.cyan()),
                (_, EntryContent::Summary(_)) => print_summary(session).await,
            }
        }
        printed.count = snapshot.transcript.len();

        if snapshot.ready || watcher.changed().await.is_err() {
            break;
        }
    }
}

async fn print_summary(session: &PacedSession) {
    let Some(card) = session.query(|engine| engine.summary_card()).await else {
        return;
    };

    println!();
    println!("{}  {}", card.title.bold(), format!("[{}]", card.badge).yellow());
    for (caption, value) in &card.rows {
        println!("  {:<24} {}", caption.dimmed(), value);
    }
    println!(
        "  {} ({}): {}",
        card.budget_caption.dimmed(),
        card.per_person,
        card.price.green().bold()
    );
    println!("  {}", card.services_caption.dimmed());
    for service in &card.services {
        println!("    • {}", service);
    }
    println!("  {}", card.note.italic());
}

async fn print_choices(session: &PacedSession, snapshot: &SessionSnapshot, labels: &LabelTable) {
    let lang = snapshot.language;
    println!(
        "{}",
        format!(
            "[{} {}%  {} {}]",
            labels.get(LabelKey::Progression, lang),
            snapshot.progress,
            labels.get(LabelKey::Level, lang),
            snapshot.level
        )
        .dimmed()
    );

    if snapshot.state.is_free_text() {
        if let Some(hint) = session.query(|engine| engine.placeholder()).await {
            println!("{}", format!("({})", hint).dimmed());
        }
        return;
    }

    println!("{}", labels.get(LabelKey::ChooseOption, lang).bold());
    for (i, option) in session.options().await.iter().enumerate() {
        let mut line = format!("  {}. {}", i + 1, option.label);
        if let Some(glyph) = &option.glyph {
            line = format!("{} {}", line, glyph);
        }
        if let Some(stars) = option.stars {
            line = format!("{} {}", line, "★".repeat(stars as usize).yellow());
        }
        if let Some(price) = option.price {
            line = format!(
                "{}  {}",
                line,
                manasik_wizard::format_price(price).green()
            );
        }
        println!("{}", line);
        if let Some(description) = &option.description {
            println!("     {}", description.dimmed());
        }
    }
}
