/// otfetch - fetch one OpenTox resource and summarize the response
/// This file is part of the outermost layer (Frameworks & Drivers)

use clap::Parser;
use opentox_client::{AuthToken, ClientConfig, ClientFactory, RdfFormat, Vri};
use std::path::PathBuf;
use std::process::ExitCode;
use std::str::FromStr;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Fetch one OpenTox resource and print its status and a summary of its body
#[derive(Parser, Debug)]
#[command(name = "otfetch", version)]
struct Args {
    /// URI of the resource; http:// is assumed when no scheme is given
    uri: String,

    /// Request text/uri-list and print the URIs it contains
    #[arg(long, conflicts_with = "format")]
    uri_list: bool,

    /// RDF serialization of the body (RDF/XML, TTL, N-TRIPLE, N3)
    #[arg(long, value_parser = RdfFormat::from_str)]
    format: Option<RdfFormat>,

    /// Authentication token, sent as the subjectid header
    #[arg(long)]
    token: Option<String>,

    /// Client configuration file; environment defaults when absent
    #[arg(long)]
    config: Option<PathBuf>,
}

fn run(args: Args) -> anyhow::Result<()> {
    let config = match &args.config {
        Some(path) => ClientConfig::from_file(path)?,
        None => ClientConfig::from_env()?,
    };

    let vri = Vri::new(&args.uri)?;
    tracing::info!("Fetching {} ({:?})", vri, vri.opentox_type());

    let factory = ClientFactory::new(config)?;
    let token = args.token.map(AuthToken::new);
    let mut client = factory.get_client(vri)?;
    client.authorize(token.as_ref())?;
    if let Some(format) = args.format {
        client.set_media_type(format.media_type());
    }

    if args.uri_list {
        let uris = client.response_uri_list()?;
        println!("status: {}", client.response_code()?);
        println!(
            "content-type: {}",
            client.response_content_type()?.unwrap_or_default()
        );
        let mut uris: Vec<String> = uris.iter().map(|u| u.to_string()).collect();
        uris.sort();
        for uri in uris {
            println!("{}", uri);
        }
    } else {
        let model = client.response_ont_model(args.format)?;
        println!("status: {}", client.response_code()?);
        println!(
            "content-type: {}",
            client.response_content_type()?.unwrap_or_default()
        );
        println!("triples: {}", model.len());
    }

    client.close();
    Ok(())
}

fn main() -> ExitCode {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "opentox_client=info,otfetch=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Usage errors exit with code 2
    let args = Args::parse();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{:#}", e);
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    fn args(list: &[&str]) -> Result<Args, clap::Error> {
        Args::try_parse_from(std::iter::once("otfetch").chain(list.iter().copied()))
    }

    #[test]
    fn test_parse_full_command_line() {
        let parsed = args(&["http://host/dataset/1", "--format", "TTL", "--token", "abc"]).unwrap();
        assert_eq!(parsed.uri, "http://host/dataset/1");
        assert_eq!(parsed.format, Some(RdfFormat::Turtle));
        assert_eq!(parsed.token.as_deref(), Some("abc"));
        assert!(!parsed.uri_list);
    }

    #[test]
    fn test_uri_list_conflicts_with_format() {
        let err = args(&["http://h/d", "--uri-list", "--format", "TTL"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ArgumentConflict);

        let parsed = args(&["http://h/d", "--uri-list"]).unwrap();
        assert!(parsed.uri_list);
        assert_eq!(parsed.format, None);
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!(args(&[]).is_err());
        assert!(args(&["a", "b"]).is_err());
        assert!(args(&["a", "--format"]).is_err());
        assert_eq!(
            args(&["a", "--format", "JSON"]).unwrap_err().kind(),
            ErrorKind::ValueValidation
        );
        assert!(args(&["a", "--verbose"]).is_err());
    }
}
