//! Serve command implementation

use crate::config::Config;
use clap::Args;
use std::net::SocketAddr;

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Address to listen on, overriding `server.bind`
    #[arg(short, long)]
    pub bind: Option<SocketAddr>,
}

impl ServeArgs {
    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let pipeline = super::build_pipeline(config)?;
        let bind = self.bind.unwrap_or(config.server.bind);
        crate::server::serve(pipeline, bind).await
    }
}
