//! missive - templated Slack messages from the terminal
//!
//! ```bash
//! # Save a template that replies in a thread copied from a permalink
//! missive templates create --name standup --channel C0123 --thread p1700000000000100 "Standup by {user} on {date}"
//!
//! # Send it
//! missive send standup
//!
//! # Share templates
//! missive export --force
//! missive import ~/Downloads/slack-templates.json --overwrite
//! ```

mod commands;
mod notify;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use missive_core::MissiveConfig;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::commands::{App, TemplateChanges};
use crate::notify::{Notifier, TerminalNotifier};

#[derive(Parser)]
#[command(name = "missive")]
#[command(about = "Compose, store and send templated Slack messages", long_about = None)]
#[command(version)]
struct Cli {
    /// Config file (default: <config dir>/missive/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Send a stored template
    Send {
        /// Template name
        template: String,
    },

    /// Send an ad-hoc message
    Post {
        /// Channel ID
        #[arg(long)]
        channel: String,

        /// Thread timestamp or permalink id (p1700000000000100)
        #[arg(long)]
        thread: Option<String>,

        /// Message text; {date}, {time}, {datetime} and {user} are expanded
        message: String,
    },

    /// List channels the token can see
    Channels,

    /// Manage stored templates
    #[command(subcommand)]
    Templates(TemplateCommand),

    /// Merge templates from a JSON file
    Import {
        /// File to read (default: ~/Downloads/slack-templates.json)
        path: Option<PathBuf>,

        /// Replace existing templates that share a name
        #[arg(long)]
        overwrite: bool,
    },

    /// Write all templates to a JSON file
    Export {
        /// File to write (default: ~/Downloads/slack-templates.json)
        path: Option<PathBuf>,

        /// Overwrite the file if it exists
        #[arg(short, long)]
        force: bool,

        /// Open the containing folder afterwards
        #[arg(long)]
        reveal: bool,
    },

    /// Print the canonical form of a thread timestamp
    Normalize {
        /// Timestamp or permalink id
        ts: String,
    },
}

#[derive(Subcommand)]
enum TemplateCommand {
    /// List templates
    List,

    /// Print one template as JSON
    Show {
        name: String,
    },

    /// Create a template
    Create {
        #[arg(long)]
        name: String,

        /// Channel ID
        #[arg(long)]
        channel: String,

        /// Thread timestamp or permalink id
        #[arg(long)]
        thread: Option<String>,

        /// Message body
        content: String,
    },

    /// Change an existing template
    Edit {
        /// Current template name
        name: String,

        /// New name
        #[arg(long = "name")]
        new_name: Option<String>,

        #[arg(long)]
        channel: Option<String>,

        #[arg(long, conflicts_with = "no_thread")]
        thread: Option<String>,

        /// Post top-level instead of in a thread
        #[arg(long)]
        no_thread: bool,

        #[arg(long)]
        content: Option<String>,
    },

    /// Delete a template
    Delete {
        name: String,
    },
}

fn init_tracing(level: &str, verbose: bool) {
    let default_level = if verbose { "debug" } else { level };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let notifier: Arc<dyn Notifier> = Arc::new(TerminalNotifier);

    let config = match MissiveConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            notifier.failure(e.title(), Some(&e.to_string()));
            std::process::exit(2);
        }
    };
    init_tracing(&config.logging.level, cli.verbose);
    debug!("Templates stored at {:?}", config.storage.templates_path);

    let app = App::new(config, notifier);
    if let Err(e) = run(&app, cli.command).await {
        debug!("Command failed: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(app: &App, command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Send { template } => {
            let slack = app.slack()?;
            app.send(&slack, &template).await
        }
        Commands::Post {
            channel,
            thread,
            message,
        } => {
            let slack = app.slack()?;
            app.post(&slack, &channel, thread.as_deref(), &message).await
        }
        Commands::Channels => {
            let slack = app.slack()?;
            app.channels(&slack).await
        }
        Commands::Templates(command) => run_templates(app, command).await,
        Commands::Import { path, overwrite } => app.import(path.as_deref(), overwrite),
        Commands::Export {
            path,
            force,
            reveal,
        } => app.export(path.as_deref(), force, reveal).await,
        Commands::Normalize { ts } => app.normalize(&ts),
    }
}

async fn run_templates(app: &App, command: TemplateCommand) -> anyhow::Result<()> {
    match command {
        TemplateCommand::List => app.list_templates(),
        TemplateCommand::Show { name } => app.show_template(&name),
        TemplateCommand::Create {
            name,
            channel,
            thread,
            content,
        } => {
            let slack = app.slack()?;
            app.create_template(&slack, &name, &channel, thread.as_deref(), &content)
                .await
        }
        TemplateCommand::Edit {
            name,
            new_name,
            channel,
            thread,
            no_thread,
            content,
        } => {
            let slack = app.slack()?;
            let changes = TemplateChanges {
                name: new_name,
                content,
                channel,
                thread,
                clear_thread: no_thread,
            };
            app.edit_template(&slack, &name, changes).await
        }
        TemplateCommand::Delete { name } => app.delete_template(&name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_import() {
        let cli = Cli::try_parse_from(["missive", "import", "t.json", "--overwrite"]).unwrap();
        match cli.command {
            Commands::Import { path, overwrite } => {
                assert_eq!(path, Some(PathBuf::from("t.json")));
                assert!(overwrite);
            }
            _ => panic!("expected import"),
        }
    }

    #[test]
    fn test_parse_edit() {
        let cli = Cli::try_parse_from([
            "missive", "templates", "edit", "old", "--name", "new", "--no-thread",
        ])
        .unwrap();
        match cli.command {
            Commands::Templates(TemplateCommand::Edit {
                name,
                new_name,
                no_thread,
                thread,
                ..
            }) => {
                assert_eq!(name, "old");
                assert_eq!(new_name.as_deref(), Some("new"));
                assert!(no_thread);
                assert!(thread.is_none());
            }
            _ => panic!("expected templates edit"),
        }
    }

    #[test]
    fn test_thread_flags_conflict() {
        assert!(Cli::try_parse_from([
            "missive", "templates", "edit", "old", "--thread", "1.2", "--no-thread",
        ])
        .is_err());
    }

    #[test]
    fn test_parse_post() {
        let cli = Cli::try_parse_from([
            "missive", "post", "--channel", "C1", "--thread", "p1700000000000100", "hi {user}",
        ])
        .unwrap();
        match cli.command {
            Commands::Post {
                channel,
                thread,
                message,
            } => {
                assert_eq!(channel, "C1");
                assert_eq!(thread.as_deref(), Some("p1700000000000100"));
                assert_eq!(message, "hi {user}");
            }
            _ => panic!("expected post"),
        }
    }
}
