#![forbid(unsafe_code)]

//! Vltava CLI — NIA operations (identify, notifications, sign, verify).

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process;
use std::time::Duration;

use vltava_client::{HttpTransport, Settings, TokenExchangeClient};
use vltava_keys::{loader, Credential};
use vltava_message::{NotifikaceMessage, ZtotozneniMessage};
use vltava_wsse::{BinarySignature, MemorySignature, SamlToken, SamlTokenSignature};

#[derive(Parser)]
#[command(
    name = "vltava",
    about = "Vltava — WS-Trust/WS-Security client for the Czech National Identity Authority",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Look up a citizen's pseudonym by name and birth date
    Identify {
        /// Given name
        #[arg(long)]
        first_name: String,

        /// Family name
        #[arg(long)]
        last_name: String,

        /// Birth date as YYYY-MM-DD
        #[arg(long)]
        birth_date: String,

        /// Credential certificate (PEM)
        #[arg(long)]
        cert: PathBuf,

        /// Credential private key (PEM)
        #[arg(short = 'k', long)]
        key: PathBuf,

        /// Passphrase for an encrypted private key
        #[arg(long)]
        password: Option<String>,

        /// Identity provider STS endpoint
        #[arg(long)]
        identity_url: String,

        /// Federation provider STS endpoint
        #[arg(long)]
        federation_url: String,

        /// Public submission service endpoint
        #[arg(long)]
        public_url: String,

        /// Transport timeout in seconds
        #[arg(long, default_value_t = 10)]
        timeout: u64,
    },

    /// Poll identity-change notifications
    Notifications {
        /// Resume after this notification id
        #[arg(long)]
        last_id: Option<String>,

        /// Credential certificate (PEM)
        #[arg(long)]
        cert: PathBuf,

        /// Credential private key (PEM)
        #[arg(short = 'k', long)]
        key: PathBuf,

        /// Passphrase for an encrypted private key
        #[arg(long)]
        password: Option<String>,

        /// Identity provider STS endpoint
        #[arg(long)]
        identity_url: String,

        /// Federation provider STS endpoint
        #[arg(long)]
        federation_url: String,

        /// Public submission service endpoint
        #[arg(long)]
        public_url: String,

        /// Transport timeout in seconds
        #[arg(long, default_value_t = 10)]
        timeout: u64,
    },

    /// Sign a SOAP envelope file
    Sign {
        /// Input envelope file
        file: PathBuf,

        /// Credential certificate (PEM, certificate bindings)
        #[arg(long)]
        cert: Option<PathBuf>,

        /// Credential private key (PEM, certificate bindings)
        #[arg(short = 'k', long)]
        key: Option<PathBuf>,

        /// Passphrase for an encrypted private key
        #[arg(long)]
        password: Option<String>,

        /// Key binding: binary, memory or saml
        #[arg(long, default_value = "binary")]
        binding: String,

        /// Assertion file supplying the proof key (saml binding)
        #[arg(long)]
        assertion: Option<PathBuf>,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Verify a signed SOAP envelope
    Verify {
        /// Input signed envelope file
        file: PathBuf,

        /// RSA key (PEM, private or public)
        #[arg(short = 'k', long)]
        key: Option<PathBuf>,

        /// Raw HMAC key (binary file)
        #[arg(long = "hmac-key")]
        hmac_key: Option<PathBuf>,

        /// Assertion file supplying the HMAC proof key
        #[arg(long)]
        assertion: Option<PathBuf>,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Identify {
            first_name,
            last_name,
            birth_date,
            cert,
            key,
            password,
            identity_url,
            federation_url,
            public_url,
            timeout,
        } => run_identify(
            &first_name,
            &last_name,
            &birth_date,
            &cert,
            &key,
            password.as_deref(),
            identity_url,
            federation_url,
            public_url,
            timeout,
        ),
        Commands::Notifications {
            last_id,
            cert,
            key,
            password,
            identity_url,
            federation_url,
            public_url,
            timeout,
        } => run_notifications(
            last_id,
            &cert,
            &key,
            password.as_deref(),
            identity_url,
            federation_url,
            public_url,
            timeout,
        ),
        Commands::Sign {
            file,
            cert,
            key,
            password,
            binding,
            assertion,
            output,
        } => run_sign(
            &file,
            cert.as_deref(),
            key.as_deref(),
            password.as_deref(),
            &binding,
            assertion.as_deref(),
            output.as_deref(),
        ),
        Commands::Verify {
            file,
            key,
            hmac_key,
            assertion,
        } => run_verify(&file, key.as_deref(), hmac_key.as_deref(), assertion.as_deref()),
    };

    if let Err(err) = result {
        eprintln!("Error: {err}");
        process::exit(1);
    }
}

type CliResult = Result<(), Box<dyn std::error::Error>>;

#[allow(clippy::too_many_arguments)]
fn run_identify(
    first_name: &str,
    last_name: &str,
    birth_date: &str,
    cert: &std::path::Path,
    key: &std::path::Path,
    password: Option<&str>,
    identity_url: String,
    federation_url: String,
    public_url: String,
    timeout: u64,
) -> CliResult {
    let birth_date = chrono::NaiveDate::parse_from_str(birth_date, "%Y-%m-%d")
        .map_err(|e| format!("invalid birth date: {e}"))?;
    let client = build_client(
        cert,
        key,
        password,
        identity_url,
        federation_url,
        public_url,
        timeout,
    )?;
    let message = ZtotozneniMessage::new(first_name, last_name, birth_date);
    let pseudonym = client.fetch(&message)?;
    println!("{pseudonym}");
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn run_notifications(
    last_id: Option<String>,
    cert: &std::path::Path,
    key: &std::path::Path,
    password: Option<&str>,
    identity_url: String,
    federation_url: String,
    public_url: String,
    timeout: u64,
) -> CliResult {
    let client = build_client(
        cert,
        key,
        password,
        identity_url,
        federation_url,
        public_url,
        timeout,
    )?;
    let message = NotifikaceMessage::new(last_id);
    let result = client.fetch(&message)?;
    for notification in &result.notifications {
        println!(
            "{}\t{}\t{}",
            notification.id, notification.pseudonym, notification.source
        );
    }
    if let Some(last_id) = &result.last_id {
        eprintln!("last id: {last_id}");
    }
    if result.more_notifications {
        eprintln!("more notifications available");
    }
    Ok(())
}

fn run_sign(
    file: &std::path::Path,
    cert: Option<&std::path::Path>,
    key: Option<&std::path::Path>,
    password: Option<&str>,
    binding: &str,
    assertion: Option<&std::path::Path>,
    output: Option<&std::path::Path>,
) -> CliResult {
    let envelope = std::fs::read_to_string(file)?;
    let signed = match binding {
        "binary" | "memory" => {
            let (cert, key) = match (cert, key) {
                (Some(cert), Some(key)) => (cert, key),
                _ => return Err("certificate bindings need --cert and --key".into()),
            };
            let credential =
                Credential::from_pem(&std::fs::read(cert)?, &std::fs::read(key)?, password)?;
            if binding == "binary" {
                BinarySignature::new(&credential).apply(&envelope)?
            } else {
                MemorySignature::new(&credential).apply(&envelope)?
            }
        }
        "saml" => {
            let assertion =
                assertion.ok_or("the saml binding needs --assertion")?;
            let token = SamlToken::from_assertion(&std::fs::read_to_string(assertion)?)?;
            SamlTokenSignature::new(token).apply(&envelope)?
        }
        other => return Err(format!("unknown binding: {other}").into()),
    };

    match output {
        Some(path) => std::fs::write(path, signed)?,
        None => println!("{signed}"),
    }
    Ok(())
}

fn run_verify(
    file: &std::path::Path,
    key: Option<&std::path::Path>,
    hmac_key: Option<&std::path::Path>,
    assertion: Option<&std::path::Path>,
) -> CliResult {
    let envelope = std::fs::read_to_string(file)?;
    let verification_key = if let Some(path) = key {
        let pem = std::fs::read(path)?;
        let loaded = loader::load_rsa_private_pem(&pem)
            .or_else(|_| loader::load_rsa_public_pem(&pem))?;
        loaded.to_verification_key()
    } else if let Some(path) = hmac_key {
        loader::load_hmac(&std::fs::read(path)?).to_verification_key()
    } else if let Some(path) = assertion {
        let token = SamlToken::from_assertion(&std::fs::read_to_string(path)?)?;
        loader::load_hmac(token.secret()).to_verification_key()
    } else {
        return Err("verify needs --key, --hmac-key or --assertion".into());
    };

    vltava_wsse::verify_envelope(&envelope, &verification_key)?;
    println!("OK");
    Ok(())
}

fn build_client(
    cert: &std::path::Path,
    key: &std::path::Path,
    password: Option<&str>,
    identity_url: String,
    federation_url: String,
    public_url: String,
    timeout: u64,
) -> Result<TokenExchangeClient<HttpTransport>, Box<dyn std::error::Error>> {
    let settings = Settings::new(identity_url, federation_url, public_url)
        .with_transport_timeout(Duration::from_secs(timeout));
    let credential = Credential::from_pem(&std::fs::read(cert)?, &std::fs::read(key)?, password)?;
    let transport = HttpTransport::new(settings.transport_timeout)?;
    Ok(TokenExchangeClient::new(settings, credential, transport))
}
