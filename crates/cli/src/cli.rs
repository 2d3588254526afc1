use std::net::SocketAddr;

use clap::Parser;
use relay::{CallbackToken, Namespace, DEFAULT_BACKEND_DOMAIN};

#[derive(Parser, Debug)]
#[command(
    name = "workflow-monitor",
    version,
    about = "Relays pipeline lifecycle events to the pipeline manager backend"
)]
pub struct Cli {
    /// Backend namespace: dev, test or prod (case-insensitive). Any other
    /// value is used verbatim as the backend host label.
    #[arg(long)]
    pub namespace: Namespace,

    /// Token used to authenticate against the backend, sent as
    /// `Authorization: Basic <token>`
    #[arg(long, alias = "callback_token")]
    pub callback_token: CallbackToken,

    /// Address to accept pipeline events on
    #[arg(long, default_value = listener::DEFAULT_LISTEN_ADDR)]
    pub listen: SocketAddr,

    /// Domain under which the namespaced backend hosts live
    #[arg(long, default_value = DEFAULT_BACKEND_DOMAIN)]
    pub backend_domain: String,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, default_value = "debug")]
    pub log_level: String,
}
