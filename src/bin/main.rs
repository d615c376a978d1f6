use std::path::PathBuf;

use anyhow::Result;
use authors_books_api::config::resolve_config_path;
use authors_books_api::db::schema::UserCreate;
use authors_books_api::{AuthExtractor, Role, ServiceConfig, build_app};
use clap::{Args, Parser, Subcommand};
use tracing::{Level, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "authors-books-api")]
#[command(about = "REST API for authors and their books")]
struct Cli {
    /// Path to a JSON configuration file
    #[arg(long, global = true, env = "BOOKS_API_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Overrides shared by every subcommand that touches the database.
#[derive(Args)]
struct DbArgs {
    #[arg(long)]
    db_url: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Bind address, e.g. 0.0.0.0:3000
        #[arg(long)]
        bind: Option<String>,
        #[command(flatten)]
        db: DbArgs,
        /// Secret used to sign identity tokens
        #[arg(long, env = "JWT_SECRET", hide_env_values = true)]
        jwt_secret: Option<String>,
        /// Lifetime of issued tokens in hours
        #[arg(long)]
        token_ttl_hours: Option<i64>,
        /// Require the admin role for delete routes
        #[arg(long, default_value_t = false)]
        admin_deletes: bool,
    },
    /// Initialize the database
    Init {
        #[command(flatten)]
        db: DbArgs,
    },
    /// Create a user account
    CreateUser {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        name: Option<String>,
        /// admin or user
        #[arg(long, default_value = "user")]
        role: String,
        #[command(flatten)]
        db: DbArgs,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("authors_books_api=info".parse()?)
                .add_directive("surrealdb=warn".parse()?),
        )
        .with_max_level(Level::INFO)
        .init();

    let cli = Cli::parse();
    let config_path = resolve_config_path(cli.config);
    if let Some(path) = &config_path {
        info!("Loading configuration from {}", path.display());
    }
    let mut config = ServiceConfig::load(config_path.as_deref())?;

    match cli.command {
        Commands::Serve {
            bind,
            db,
            jwt_secret,
            token_ttl_hours,
            admin_deletes,
        } => {
            apply_db_args(&mut config, db);
            if let Some(bind) = bind {
                config.bind = bind;
            }
            if let Some(secret) = jwt_secret {
                config.auth.jwt_secret = secret;
            }
            if let Some(hours) = token_ttl_hours {
                config.auth.token_ttl_hours = hours;
            }
            if admin_deletes {
                config.auth.admin_deletes = true;
            }

            if config.auth.jwt_secret.trim().is_empty() {
                anyhow::bail!("Refusing to start without a JWT secret (set JWT_SECRET or --jwt-secret)");
            }

            info!("Using database url: {}", config.database.url);
            if config.auth.admin_deletes {
                info!("Delete routes require the admin role");
            }

            let app = build_app(&config).await?;
            let listener = tokio::net::TcpListener::bind(&config.bind).await?;
            info!("Server listening on http://{}", config.bind);

            axum::serve(listener, app).await?;
        }
        Commands::Init { db } => {
            apply_db_args(&mut config, db);
            info!("Using database url for initialization: {}", config.database.url);

            info!("Initializing database...");
            let db = authors_books_api::create_connection(config.database.clone()).await?;
            authors_books_api::ensure_schema(&db).await?;
            info!("Database initialized successfully");
        }
        Commands::CreateUser {
            email,
            password,
            name,
            role,
            db,
        } => {
            apply_db_args(&mut config, db);
            let role = Role::parse(&role)
                .ok_or_else(|| anyhow::anyhow!("Unknown role '{}' (expected admin or user)", role))?;

            let conn = authors_books_api::create_connection(config.database.clone()).await?;
            authors_books_api::ensure_schema(&conn).await?;

            // Token settings are irrelevant here; only the credential store is used
            let auth = AuthExtractor::new(config.auth.clone(), conn);
            let user = auth
                .user_store()
                .create_user(&UserCreate {
                    name,
                    email,
                    password,
                    role,
                })
                .await?;

            println!("User created successfully!");
            println!();
            println!("  Id:    {}", user.uid);
            println!("  Email: {}", user.email);
            println!("  Role:  {}", user.role);
            if let Some(n) = &user.name {
                println!("  Name:  {}", n);
            }
        }
    }

    Ok(())
}

fn apply_db_args(config: &mut ServiceConfig, args: DbArgs) {
    if let Some(url) = args.db_url {
        config.database.url = url;
    }
}
