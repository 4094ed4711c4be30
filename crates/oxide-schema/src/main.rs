//! oxide-schema CLI
//!
//! Renders table definitions to DDL and reconciles them with a live
//! MySQL or MariaDB database.

use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use tracing::{error, info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use oxide_schema::{MySqlConnection, SchemaDefinition};
use oxide_schema_core::prelude::{
    Connection, MySqlDialect, ReconcileOutcome, Reconciler, SchemaContext, TableSpec,
};

/// Declarative table definitions for MySQL.
#[derive(Parser)]
#[command(name = "oxide-schema")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Database URL (mysql:// or mariadb://).
    #[arg(short, long, env = "DATABASE_URL")]
    database: Option<String>,

    /// Schema definition file.
    #[arg(short = 'f', long, default_value = "schema.json")]
    definition: PathBuf,

    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the CREATE TABLE statement of every table.
    Render {
        /// Schema to qualify tables with (no database needed when given).
        #[arg(short, long)]
        schema: Option<String>,
    },

    /// Create missing tables.
    Sync {
        /// Also alter existing tables that differ from the definition.
        #[arg(short, long)]
        update: bool,
    },

    /// Print the statements `sync --update` would run.
    Diff,

    /// Check that the database is reachable.
    Ping,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .without_time()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match &cli.command {
        Commands::Ping => {
            let mut connection = connect(&cli)?;
            connection.ping()?;
            info!(engine = %connection.engine(), "Database is reachable");
            connection.close()?;
        }

        Commands::Render { schema } => {
            let definition = load(&cli)?;
            let tables = definition.to_specs()?;
            let context = match schema.as_ref().or(definition.schema.as_ref()) {
                Some(name) => SchemaContext::new(name.as_str())?,
                None => {
                    let mut connection = connect(&cli)?;
                    SchemaContext::from_connection(&mut connection, &MySqlDialect)?
                }
            };
            for table in &tables {
                println!("{}", table.render(&context)?);
            }
        }

        Commands::Sync { update } => {
            let definition = load(&cli)?;
            let tables = definition.to_specs()?;
            let mut reconciler = reconciler(&cli, &definition)?;

            let mut failures = 0_usize;
            for (table, table_definition) in tables.iter().zip(&definition.tables) {
                let previous = table_definition.previous_name.as_deref();
                let result = sync_table(&mut reconciler, table, previous, *update);
                if let Err(e) = &result {
                    error!(table = %table.name(), error = %e, "Reconciliation failed");
                }
                if ReconcileOutcome::of(&result) == ReconcileOutcome::Failed {
                    failures += 1;
                }
            }

            reconciler.into_inner().close()?;
            if failures > 0 {
                bail!("{failures} of {} tables failed to reconcile", tables.len());
            }
        }

        Commands::Diff => {
            let definition = load(&cli)?;
            let tables = definition.to_specs()?;
            let mut reconciler = reconciler(&cli, &definition)?;

            for (table, table_definition) in tables.iter().zip(&definition.tables) {
                let previous = table_definition.previous_name.as_deref();
                let previous = renamed_from(&mut reconciler, table, previous)?;
                match reconciler.plan(table, previous)? {
                    None => println!("{}", table.render(reconciler.context())?),
                    Some(diff) => {
                        for warning in &diff.warnings {
                            warn!(table = %table.name(), warning = ?warning, "Not applied by sync");
                        }
                        for sql in diff.statements(reconciler.context(), reconciler.dialect())? {
                            println!("{sql}");
                        }
                    }
                }
            }

            reconciler.into_inner().close()?;
        }
    }

    Ok(())
}

fn load(cli: &Cli) -> anyhow::Result<SchemaDefinition> {
    SchemaDefinition::load(&cli.definition)
        .with_context(|| format!("loading {}", cli.definition.display()))
}

fn connect(cli: &Cli) -> anyhow::Result<MySqlConnection> {
    let Some(url) = cli.database.as_deref() else {
        bail!("no database URL given; pass --database or set DATABASE_URL");
    };
    Ok(MySqlConnection::connect(url)?)
}

fn reconciler(
    cli: &Cli,
    definition: &SchemaDefinition,
) -> anyhow::Result<Reconciler<MySqlConnection>> {
    let mut connection = connect(cli)?;
    let context = match &definition.schema {
        Some(name) => SchemaContext::new(name.as_str())?,
        None => SchemaContext::from_connection(&mut connection, &MySqlDialect)?,
    };
    info!(schema = %context.schema(), "Reconciling schema");
    Ok(Reconciler::new(connection, context))
}

/// Returns the previous name of a renamed table while that table still exists.
fn renamed_from<'a>(
    reconciler: &mut Reconciler<MySqlConnection>,
    table: &TableSpec,
    previous: Option<&'a str>,
) -> oxide_schema_core::Result<Option<&'a str>> {
    match previous.filter(|p| *p != table.name()) {
        Some(previous) if reconciler.table_exists(previous)? => Ok(Some(previous)),
        _ => Ok(None),
    }
}

fn sync_table(
    reconciler: &mut Reconciler<MySqlConnection>,
    table: &TableSpec,
    previous: Option<&str>,
    update: bool,
) -> oxide_schema_core::Result<ReconcileOutcome> {
    if let Some(previous) = renamed_from(reconciler, table, previous)? {
        return reconciler.update(&table.to_update(previous));
    }
    if update {
        reconciler.add_or_update(table)
    } else {
        reconciler.add_or_pass(table)
    }
}
