//! # CLI Interface
//!
//! Defines the command-line argument structure for `phantom-link` using
//! `clap` derive. Every dapp setting can also come from a `PHANTOM_*`
//! environment variable so scripts need not repeat them.

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Build and read Phantom wallet deep links.
///
/// Generates dapp encryption keys, prints connect and signTransaction links,
/// and decrypts the redirects the wallet sends back.
#[derive(Parser, Debug)]
#[command(
    name = "phantom-link",
    about = "Build and read Phantom wallet deep links",
    version,
    propagate_version = true
)]
pub struct PhantomLinkCli {
    /// Log output format: pretty or json.
    #[arg(long, global = true, env = "PHANTOM_LOG_FORMAT", default_value = "pretty")]
    pub log_format: String,

    /// Log link assembly and response parsing at debug level.
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// How results are printed on stdout.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    pub output: OutputFormat,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate a fresh X25519 connection keypair.
    Keygen,
    /// Print a connect (login) link.
    Connect(ConnectArgs),
    /// Print a signTransaction link carrying an encrypted transaction.
    Sign(SignArgs),
    /// Decrypt the redirect Phantom opens after a connect request.
    DecodeConnect(DecodeConnectArgs),
    /// Decrypt the redirect Phantom opens after a signing request.
    DecodeSign(DecodeSignArgs),
    /// Print version information and exit.
    Version,
}

/// Settings shared by every link the dapp builds.
#[derive(Args, Debug, Clone)]
pub struct LinkArgs {
    /// URL scheme Phantom redirects back to, without `://`.
    #[arg(long, env = "PHANTOM_REDIRECT_SCHEME")]
    pub redirect_scheme: String,

    /// Phantom universal-link API version.
    #[arg(long, env = "PHANTOM_API_VERSION", default_value = "v1")]
    pub api_version: String,

    /// Solana cluster: mainnet-beta, devnet or testnet. Unknown names mean mainnet-beta.
    #[arg(long, env = "PHANTOM_CLUSTER", default_value = "mainnet-beta")]
    pub cluster: String,
}

/// Arguments for the `connect` subcommand.
#[derive(Args, Debug)]
pub struct ConnectArgs {
    #[command(flatten)]
    pub link: LinkArgs,

    /// Dapp metadata URL shown by the wallet.
    #[arg(long, env = "PHANTOM_APP_URL")]
    pub app_url: String,

    /// Base58 connection secret key. A new keypair is generated when omitted.
    ///
    /// Prefer the environment variable over the flag so the key stays out of
    /// shell history.
    #[arg(long, env = "PHANTOM_DAPP_SECRET_KEY", hide_env_values = true)]
    pub secret_key: Option<String>,
}

/// Arguments for the `sign` subcommand.
#[derive(Args, Debug)]
pub struct SignArgs {
    #[command(flatten)]
    pub link: LinkArgs,

    /// Base58 connection secret key used for the connect request.
    #[arg(long, env = "PHANTOM_DAPP_SECRET_KEY", hide_env_values = true)]
    pub secret_key: String,

    /// Phantom's base58 encryption public key from the connect response.
    #[arg(long)]
    pub phantom_public_key: String,

    /// Session token from the connect response.
    #[arg(long)]
    pub session: String,

    /// Base58 serialized transaction.
    #[arg(long)]
    pub transaction: String,
}

/// Arguments for the `decode-connect` subcommand.
#[derive(Args, Debug)]
pub struct DecodeConnectArgs {
    /// Full redirect URL as received from the wallet.
    pub url: String,

    /// Base58 connection secret key used for the connect request.
    #[arg(long, env = "PHANTOM_DAPP_SECRET_KEY", hide_env_values = true)]
    pub secret_key: String,
}

/// Arguments for the `decode-sign` subcommand.
#[derive(Args, Debug)]
pub struct DecodeSignArgs {
    /// Full redirect URL as received from the wallet.
    pub url: String,

    /// Base58 connection secret key used for the connect request.
    #[arg(long, env = "PHANTOM_DAPP_SECRET_KEY", hide_env_values = true)]
    pub secret_key: String,

    /// Phantom's base58 encryption public key from the connect response.
    #[arg(long)]
    pub phantom_public_key: String,
}
