//! railcat - Command Line Entry Point
//!
//! Operator tooling around the permission codec: decode a stored mask,
//! encode a grant, or inspect what a bearer token allows.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, warn};

use railcat_server::auth::{self, jwt::validate_access_token, AuthUser};
use railcat_server::config::Config;
use railcat_server::permissions::PermissionCodec;

#[derive(Parser)]
#[command(name = "railcat", version, about = "railcat permission tooling")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Decode a permission mask into permission names.
    Decode {
        /// Encoded mask as stored in the `permissions` claim.
        #[arg(allow_negative_numbers = true)]
        mask: i64,
    },

    /// Encode permission names into a mask.
    Encode {
        /// Permission names (e.g. `ADD_CONTENT VERIFY_CONTENT`).
        names: Vec<String>,
    },

    /// List registered permissions and their bits.
    List,

    /// Validate a token against `TOKEN_SECRET` and list its permissions.
    InspectToken {
        /// Token, with or without the `Bearer ` prefix.
        token: String,
    },
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "railcat=info,railcat_server=info".into());
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if std::env::var("LOG_FORMAT").is_ok_and(|f| f.eq_ignore_ascii_case("json")) {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    let codec = PermissionCodec::default();

    match cli.command {
        Command::Decode { mask } => {
            for bit in codec.unregistered_bits(Some(mask))? {
                warn!(bit, "Mask sets a bit with no registered permission");
            }
            for name in codec.decode(Some(mask))? {
                println!("{name}");
            }
        }
        Command::List => {
            for entry in codec.registry().iter() {
                println!("{}\t{}", entry.bit(), entry.name());
            }
        }
        Command::Encode { names } => {
            let mask = codec.encode(&names)?;
            println!("{mask}");
        }
        Command::InspectToken { token } => {
            let config = Config::from_env()?;
            let token = auth::bearer_token(Some(&token))
                .unwrap_or(token.as_str())
                .to_string();
            let claims = validate_access_token(&token, &config.token_secret)
                .context("token rejected")?;
            let user = AuthUser::try_from(claims)
                .context("token carries a malformed permissions claim")?;
            let granted = user.granted(&codec)?;
            info!(user_id = %user.id, "Token accepted");

            let report = serde_json::json!({
                "sub": user.id,
                "username": user.username,
                "permissions": user.permissions,
                "granted": granted,
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    Ok(())
}
