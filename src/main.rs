use anyhow::{Context, Result};
use base64::{Engine, engine::general_purpose::STANDARD};
use clap::{Parser, Subcommand, ValueEnum};
use serde_json::json;

mod auth;

use notelock::{
    KdfParams, Scheme, decrypt_payload, derive_root_credential_async,
    derive_root_credential_with_nonce_async, encrypt_payload, migrate_payload,
};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SchemeArg {
    /// PBKDF2-HMAC-SHA256 + AES-256-GCM (v1 envelopes)
    Legacy,
    /// Argon2id + XChaCha20-Poly1305 (v2 envelopes)
    Current,
}

impl From<SchemeArg> for Scheme {
    fn from(arg: SchemeArg) -> Self {
        match arg {
            SchemeArg::Legacy => Scheme::Legacy,
            SchemeArg::Current => Scheme::Current,
        }
    }
}

#[derive(Debug, clap::Args)]
struct KdfArgs {
    /// PBKDF2 iteration count (legacy scheme, default: 100000)
    #[arg(long)]
    iterations: Option<u32>,

    /// Argon2id operation limit (current scheme, default: 5)
    #[arg(long = "ops-limit")]
    ops_limit: Option<u32>,

    /// Argon2id memory limit in KiB (current scheme, default: 65536)
    #[arg(long = "mem-limit")]
    mem_limit_kib: Option<u32>,
}

impl KdfArgs {
    fn to_params(&self, scheme: Scheme) -> KdfParams {
        match KdfParams::default_for(scheme) {
            KdfParams::Pbkdf2 { iterations } => KdfParams::Pbkdf2 {
                iterations: self.iterations.unwrap_or(iterations),
            },
            KdfParams::Argon2id {
                ops_limit,
                mem_limit_kib,
            } => KdfParams::Argon2id {
                ops_limit: self.ops_limit.unwrap_or(ops_limit),
                mem_limit_kib: self.mem_limit_kib.unwrap_or(mem_limit_kib),
            },
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "notelock")]
#[command(
    version,
    about = "Derives account credentials and encrypts note payloads into portable envelopes."
)]
struct Cli {
    /// Crypto scheme for derivation and encryption
    #[arg(long, global = true, value_enum, default_value_t = SchemeArg::Current)]
    scheme: SchemeArg,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Derives a fresh root credential for a new account
    #[command(arg_required_else_help = true)]
    Register {
        identifier: String,
        #[command(flatten)]
        kdf: KdfArgs,
    },

    /// Re-derives a root credential from a known account nonce
    #[command(arg_required_else_help = true)]
    Login {
        identifier: String,
        /// Account nonce from registration (hex)
        nonce: String,
        #[command(flatten)]
        kdf: KdfArgs,
    },

    /// Encrypts a text payload under a master key
    #[command(arg_required_else_help = true)]
    Encrypt {
        /// Master key, base64 (first half of the derivation output)
        #[arg(long, env = "NOTELOCK_KEY")]
        key: String,
        plaintext: String,
    },

    /// Decrypts an envelope under a master key
    #[command(arg_required_else_help = true)]
    Decrypt {
        /// Master key, base64 (first half of the derivation output)
        #[arg(long, env = "NOTELOCK_KEY")]
        key: String,
        envelope: String,
    },

    /// Re-encrypts a legacy envelope under the current scheme
    #[command(arg_required_else_help = true)]
    Migrate {
        /// Master key, base64 (first half of the derivation output)
        #[arg(long, env = "NOTELOCK_KEY")]
        key: String,
        envelope: String,
    },
}

fn decode_key(key: &str) -> Result<Vec<u8>> {
    STANDARD.decode(key).context("master key is not valid base64")
}

fn print_credential(cred: &notelock::RootCredential) -> Result<()> {
    // Deliberate output of the derivation result; the caller asked for it.
    let out = json!({
        "nonce": cred.nonce(),
        "master_key": STANDARD.encode(cred.master_key()),
        "server_password": STANDARD.encode(cred.server_password()),
    });
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();
    let scheme = Scheme::from(args.scheme);

    match args.command {
        Commands::Register { identifier, kdf } => {
            let password = auth::read_new_password_with_confirmation()?;
            let params = kdf.to_params(scheme);
            let cred = derive_root_credential_async(&identifier, &password, params).await?;
            print_credential(&cred)?;
        }
        Commands::Login {
            identifier,
            nonce,
            kdf,
        } => {
            let password = auth::read_password()?;
            let params = kdf.to_params(scheme);
            let cred =
                derive_root_credential_with_nonce_async(&identifier, &password, &nonce, params)
                    .await?;
            print_credential(&cred)?;
        }
        Commands::Encrypt { key, plaintext } => {
            let key = decode_key(&key)?;
            let envelope = encrypt_payload(&plaintext, &key, scheme)?;
            println!("{envelope}");
        }
        Commands::Decrypt { key, envelope } => {
            let key = decode_key(&key)?;
            let plaintext = decrypt_payload(&envelope, &key)?;
            println!("{}", &*plaintext);
        }
        Commands::Migrate { key, envelope } => {
            let key = decode_key(&key)?;
            let migrated = migrate_payload(&envelope, &key)?;
            println!("{migrated}");
        }
    }

    Ok(())
}
