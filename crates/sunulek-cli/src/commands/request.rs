//! Raw request command implementation.

use anyhow::{Context, Result};
use clap::Args;

use sunulek_core::{Method, OutboundRequest};

use crate::cli::ApiArgs;
use crate::output;
use crate::session;

#[derive(Args, Debug)]
pub struct RequestArgs {
    /// HTTP method (GET, POST, PUT, PATCH, DELETE)
    pub method: String,

    /// Path relative to the API base, e.g. /favorites/
    pub path: String,

    /// JSON request body
    #[arg(long)]
    pub json: Option<String>,

    /// Query parameter as KEY=VALUE (repeatable)
    #[arg(long = "query", value_name = "KEY=VALUE", value_parser = parse_pair)]
    pub query: Vec<(String, String)>,
}

fn parse_pair(s: &str) -> std::result::Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{}'", s))?;
    Ok((key.to_string(), value.to_string()))
}

pub async fn run(args: RequestArgs, api: &ApiArgs) -> Result<()> {
    let method: Method = args.method.parse().context("Invalid HTTP method")?;

    let mut request = OutboundRequest::new(method, args.path);
    for (key, value) in args.query {
        request = request.query(key, value);
    }
    if let Some(body) = &args.json {
        let body: serde_json::Value = serde_json::from_str(body).context("Invalid JSON body")?;
        request = request.json_value(body);
    }

    let client = session::connect(api)?;
    let response = client.request(request).await.context("Request failed")?;

    output::note(&format!("HTTP {}", response.status()));
    if response.is_empty() {
        return Ok(());
    }

    match response.json::<serde_json::Value>() {
        Ok(value) => output::json_pretty(&value)?,
        Err(_) => println!("{}", response.text()),
    }

    Ok(())
}
