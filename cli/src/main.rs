// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # phantom-link
//!
//! Entry point for the `phantom-link` binary. Parses CLI arguments,
//! initializes logging, and runs one deep-link operation:
//!
//! - `keygen`         generate a connection keypair
//! - `connect`        print a connect link
//! - `sign`           print a signTransaction link
//! - `decode-connect` decrypt a connect redirect
//! - `decode-sign`    decrypt a sign redirect
//! - `version`        print build version information
//!
//! Results go to stdout, logs to stderr.

mod cli;
mod logging;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;

use phantom_deeplink::crypto::base58;
use phantom_deeplink::deeplink::decode_public_key;
use phantom_deeplink::{
    parse_connect_response, parse_sign_response, Cluster, ConnectResult, ConnectionKeypair,
    DeepLinkBuilder, DeepLinkConfig, SignResult, WalletSession,
};

use cli::{Commands, LinkArgs, OutputFormat, PhantomLinkCli};
use logging::LogFormat;

fn main() -> Result<()> {
    let cli = PhantomLinkCli::parse();
    logging::init_logging(LogFormat::from_str_lossy(&cli.log_format), cli.verbose);
    let output = cli.output;

    match cli.command {
        Commands::Keygen => keygen(output),
        Commands::Connect(args) => connect(args, output),
        Commands::Sign(args) => sign(args, output),
        Commands::DecodeConnect(args) => decode_connect(args, output),
        Commands::DecodeSign(args) => decode_sign(args, output),
        Commands::Version => {
            print_version();
            Ok(())
        }
    }
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct KeypairOutput {
    public_key: String,
    secret_key: String,
}

#[derive(Serialize)]
struct LinkOutput {
    link: String,
    /// Only set when the command generated a keypair on the caller's behalf.
    #[serde(skip_serializing_if = "Option::is_none")]
    secret_key: Option<String>,
}

#[derive(Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
enum ResponseOutput {
    Connected {
        phantom_encryption_public_key: String,
        public_key: String,
        session: String,
    },
    Signed {
        transaction: String,
    },
    Sent {
        signature: String,
    },
    Error {
        code: String,
        message: String,
    },
}

impl From<ConnectResult> for ResponseOutput {
    fn from(result: ConnectResult) -> Self {
        match result {
            ConnectResult::Success(session) => ResponseOutput::Connected {
                phantom_encryption_public_key: session.phantom_encryption_public_key_base58(),
                public_key: session.public_key,
                session: session.session,
            },
            ConnectResult::Error { code, message } => ResponseOutput::Error { code, message },
        }
    }
}

impl From<SignResult> for ResponseOutput {
    fn from(result: SignResult) -> Self {
        match result {
            SignResult::Signed { transaction } => ResponseOutput::Signed { transaction },
            SignResult::Sent { signature } => ResponseOutput::Sent { signature },
            SignResult::Error { code, message } => ResponseOutput::Error { code, message },
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("failed to serialize output")?;
    println!("{json}");
    Ok(())
}

fn print_response(response: ResponseOutput, output: OutputFormat) -> Result<()> {
    if output == OutputFormat::Json {
        return print_json(&response);
    }
    match response {
        ResponseOutput::Connected {
            phantom_encryption_public_key,
            public_key,
            session,
        } => {
            println!("phantom_encryption_public_key: {phantom_encryption_public_key}");
            println!("public_key:                    {public_key}");
            println!("session:                       {session}");
        }
        ResponseOutput::Signed { transaction } => println!("transaction: {transaction}"),
        ResponseOutput::Sent { signature } => println!("signature: {signature}"),
        ResponseOutput::Error { code, message } => println!("wallet error {code}: {message}"),
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

fn builder(link: LinkArgs, app_url: String) -> DeepLinkBuilder {
    let cluster = Cluster::parse_known(&link.cluster).unwrap_or_else(|| {
        let fallback = Cluster::default();
        tracing::warn!(requested = %link.cluster, %fallback, "unknown cluster, using fallback");
        fallback
    });
    DeepLinkBuilder::new(
        DeepLinkConfig::new(link.redirect_scheme, app_url)
            .with_api_version(link.api_version)
            .with_cluster(cluster),
    )
}

fn load_keypair(secret_key: &str) -> Result<ConnectionKeypair> {
    ConnectionKeypair::from_base58(secret_key).context("invalid connection secret key")
}

fn keygen(output: OutputFormat) -> Result<()> {
    let keypair = ConnectionKeypair::generate();
    let out = KeypairOutput {
        public_key: keypair.public_key_base58(),
        secret_key: keypair.secret_key_base58(),
    };
    match output {
        OutputFormat::Json => print_json(&out),
        OutputFormat::Text => {
            println!("public_key: {}", out.public_key);
            println!("secret_key: {}", out.secret_key);
            Ok(())
        }
    }
}

fn connect(args: cli::ConnectArgs, output: OutputFormat) -> Result<()> {
    let (keypair, generated) = match &args.secret_key {
        Some(secret) => (load_keypair(secret)?, false),
        None => (ConnectionKeypair::generate(), true),
    };
    let builder = builder(args.link, args.app_url);
    let link = builder
        .login_link(&keypair)
        .context("failed to build connect link")?;

    tracing::info!(public_key = %keypair.public_key_base58(), "connect link ready");

    let out = LinkOutput {
        link,
        secret_key: generated.then(|| keypair.secret_key_base58()),
    };
    match output {
        OutputFormat::Json => print_json(&out),
        OutputFormat::Text => {
            if let Some(secret) = &out.secret_key {
                eprintln!("generated secret key (keep it for the sign step): {secret}");
            }
            println!("{}", out.link);
            Ok(())
        }
    }
}

fn sign(args: cli::SignArgs, output: OutputFormat) -> Result<()> {
    let keypair = load_keypair(&args.secret_key)?;
    let session = WalletSession {
        phantom_encryption_public_key: decode_public_key(&args.phantom_public_key)
            .context("invalid phantom encryption public key")?,
        public_key: String::new(),
        session: args.session,
    };
    let transaction =
        base58::decode(&args.transaction).context("transaction is not valid base58")?;

    let builder = builder(args.link, String::new());
    let link = builder
        .sign_transaction_link(&transaction, &session, &keypair)
        .context("failed to build signTransaction link")?;

    match output {
        OutputFormat::Json => print_json(&LinkOutput {
            link,
            secret_key: None,
        }),
        OutputFormat::Text => {
            println!("{link}");
            Ok(())
        }
    }
}

fn decode_connect(args: cli::DecodeConnectArgs, output: OutputFormat) -> Result<()> {
    let keypair = load_keypair(&args.secret_key)?;
    let result =
        parse_connect_response(&args.url, &keypair).context("failed to read connect response")?;
    print_response(result.into(), output)
}

fn decode_sign(args: cli::DecodeSignArgs, output: OutputFormat) -> Result<()> {
    let keypair = load_keypair(&args.secret_key)?;
    let phantom_key = decode_public_key(&args.phantom_public_key)
        .context("invalid phantom encryption public key")?;
    let shared_secret = keypair
        .shared_secret_with(&phantom_key)
        .context("key exchange with wallet failed")?;
    let result =
        parse_sign_response(&args.url, &shared_secret).context("failed to read sign response")?;
    print_response(result.into(), output)
}

/// Prints version information.
fn print_version() {
    println!("phantom-link {}", env!("CARGO_PKG_VERSION"));
    println!("api          {}", phantom_deeplink::config::DEFAULT_API_VERSION);
    println!("kex          {}", phantom_deeplink::config::KEY_EXCHANGE_ALGORITHM);
    println!("cipher       {}", phantom_deeplink::config::SYMMETRIC_ALGORITHM);
    println!("rustc        {}", rustc_version());
}

/// Returns the Rust compiler version used to build this binary.
fn rustc_version() -> &'static str {
    option_env!("RUSTC_VERSION").unwrap_or("unknown")
}
