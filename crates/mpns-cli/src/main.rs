//! # mpns-send
//!
//! Sends a test toast to an MPNS channel and prints the outcome.
//!
//! Authenticated (`https`) channels need client certificate material,
//! configured in `~/.mpns/settings.json` or via the environment:
//!
//! - `MPNS_CERT`: certificate file
//! - `MPNS_KEY`: private key file
//! - `MPNS_CA`: certificate authority or intermediate chain file

use anyhow::{Context, Result, bail};
use clap::Parser;
use mpns_core::{Toast, TransportOptions};
use mpns_push::MpnsClient;

const TEST_TITLE: &str = "Hi.";
const TEST_MESSAGE: &str = "This is a test.";

/// MPNS test toaster.
#[derive(Parser, Debug)]
#[command(
    name = "mpns-send",
    about = "Send a toast to a Microsoft Push Notification Service channel",
    after_help = "Authenticated push channels are supported with these environment variables:\n    \
                  MPNS_CERT: Point to a certificate file.\n    \
                  MPNS_CA:   Point to a certificate authority or intermediate chain file.\n    \
                  MPNS_KEY:  Point to a private key file."
)]
struct Cli {
    /// Push channel URI issued to the device.
    push_uri: String,

    /// Toast title (first line).
    title: Option<String>,

    /// Toast message (remaining words).
    message: Vec<String>,

    /// Forward proxy URL (overrides settings).
    #[arg(long)]
    proxy: Option<String>,
}

impl Cli {
    fn toast(&self) -> Toast {
        let title = self.title.clone().unwrap_or_else(|| TEST_TITLE.to_string());
        let message = if self.message.is_empty() {
            TEST_MESSAGE.to_string()
        } else {
            self.message.join(" ")
        };
        Toast::new(title).with_text2(message)
    }
}

/// Check the URI shape and, for `https`, that authentication is configured.
/// Returns the names of the active TLS options to report.
fn check_channel(uri: &str, options: &TransportOptions) -> Result<Vec<&'static str>> {
    if !uri.starts_with("http") {
        bail!("The first parameter must be a URI.");
    }
    if uri.starts_with("https") {
        if !options.tls.has_identity() {
            bail!(
                "Authenticated push channels are not supported unless MPNS_CERT and MPNS_KEY are set."
            );
        }
        return Ok(options.tls.active());
    }
    Ok(Vec::new())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let settings = mpns_settings::load_settings().context("Failed to load settings")?;
    mpns_core::logging::init_subscriber(&settings.logging.level);

    let mut options = settings
        .transport
        .load_options()
        .context("Failed to load TLS material")?;
    if cli.proxy.is_some() {
        options.proxy.clone_from(&cli.proxy);
    }

    let active = check_channel(&cli.push_uri, &options)?;
    if cli.push_uri.starts_with("https") {
        println!("Authenticated push notification channel.");
        for key in active {
            println!("SSL option: {key}");
        }
    }

    println!("Sending a toast...");
    tracing::debug!(proxy = ?options.proxy, "mpns-send starting");
    let client = MpnsClient::new(options);
    let delivery = client
        .send(&cli.push_uri, &cli.toast().into())
        .context("Invalid toast")?;

    match delivery.await {
        Ok(outcome) => {
            println!("OK.");
            println!("{}", serde_json::to_string_pretty(&outcome)?);
            Ok(())
        }
        Err(err) => {
            eprintln!("{}", serde_json::to_string_pretty(&err.outcome)?);
            Err(anyhow::Error::new(err)
                .context("There was a problem with the toast or push channel."))
        }
    }
}
