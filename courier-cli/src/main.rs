use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use courier_core::config::Config;
use courier_core::core_attachment::OutgoingAttachment;
use courier_core::core_crypto::ReceiverCertificate;
use courier_core::core_discovery::{
    EndpointDetailProvider, PeppolEndpointProvider, SmpEndpoint, StaticSmpCatalog,
};
use courier_core::core_ident::{
    DocTypeId, ParticipantId, ProcessId, TransportProfile, DEFAULT_DOCTYPE_SCHEME,
    DEFAULT_PARTICIPANT_SCHEME, DEFAULT_PROCESS_SCHEME,
};
use courier_core::logging::{init_logging_with_config, LogConfig, LogLevel};
use courier_core::UserMessageBuilder;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

mod transport;

use transport::FileDumpTransport;

#[derive(Parser, Debug)]
#[command(name = "courier")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Set the log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Enable JSON formatted logging
    #[arg(long)]
    json_logs: bool,

    /// Configuration file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Resolve the receiver's access point through a static SMP catalog
    Resolve {
        /// Receiver participant, as scheme::value
        #[arg(long)]
        receiver: String,

        /// Document type, as scheme::value
        #[arg(long)]
        doc_type: String,

        /// Process, as scheme::value
        #[arg(long)]
        process: String,

        /// Static SMP catalog file (TOML)
        #[arg(long)]
        catalog: PathBuf,

        /// Transport profile identifier
        #[arg(long, default_value = "peppol-transport-as4-v2_0")]
        transport_profile: String,
    },

    /// Run the full send pipeline, dumping the assembled message to disk
    Send {
        /// Receiver participant, as scheme::value
        #[arg(long)]
        receiver: String,

        /// Sender participant, as scheme::value
        #[arg(long)]
        sender: Option<String>,

        /// Document type, as scheme::value
        #[arg(long)]
        doc_type: String,

        /// Process, as scheme::value
        #[arg(long)]
        process: String,

        /// Payload file carried as the primary MIME part
        #[arg(long)]
        payload: String,

        /// Media type of the payload
        #[arg(long, default_value = "application/xml")]
        mime_type: String,

        /// Auxiliary attachment files, in wire order
        #[arg(long = "attach")]
        attachments: Vec<String>,

        /// Static SMP catalog file (TOML); alternative to --url/--cert
        #[arg(long)]
        catalog: Option<PathBuf>,

        /// Pre-resolved destination URL; requires --cert
        #[arg(long)]
        url: Option<String>,

        /// Pre-resolved receiver certificate file (PEM or base64 DER)
        #[arg(long)]
        cert: Option<PathBuf>,

        /// Directory the assembled message is dumped into
        #[arg(long, default_value = "out")]
        out_dir: PathBuf,
    },
}

/// One endpoint entry in the static SMP catalog file
#[derive(Debug, Deserialize)]
struct CatalogEntry {
    receiver: String,
    doc_type: String,
    process: String,
    transport_profile: String,
    url: String,
    certificate: String,
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    endpoint: Vec<CatalogEntry>,
}

/// Parse a scheme::value identifier, falling back to the given default
/// scheme when no separator is present
fn split_identifier<'a>(input: &'a str, default_scheme: &'a str) -> (&'a str, &'a str) {
    match input.split_once("::") {
        Some((scheme, value)) => (scheme, value),
        None => (default_scheme, input),
    }
}

fn parse_participant(input: &str) -> ParticipantId {
    let (scheme, value) = split_identifier(input, DEFAULT_PARTICIPANT_SCHEME);
    ParticipantId::new(scheme, value)
}

fn parse_doc_type(input: &str) -> DocTypeId {
    let (scheme, value) = split_identifier(input, DEFAULT_DOCTYPE_SCHEME);
    DocTypeId::new(scheme, value)
}

fn parse_process(input: &str) -> ProcessId {
    let (scheme, value) = split_identifier(input, DEFAULT_PROCESS_SCHEME);
    ProcessId::new(scheme, value)
}

fn load_catalog(path: &Path) -> Result<StaticSmpCatalog> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("reading catalog {}", path.display()))?;
    let file: CatalogFile = toml::from_str(&contents)
        .with_context(|| format!("parsing catalog {}", path.display()))?;

    let mut catalog = StaticSmpCatalog::new();
    for entry in file.endpoint {
        catalog.insert_endpoint(
            parse_participant(&entry.receiver),
            parse_doc_type(&entry.doc_type),
            parse_process(&entry.process),
            SmpEndpoint {
                transport_profile: entry.transport_profile,
                address: Some(entry.url),
                certificate_b64: Some(entry.certificate),
            },
        );
    }
    Ok(catalog)
}

/// Read a certificate from a PEM file or a bare base64 DER file
fn load_certificate(path: &Path) -> Result<ReceiverCertificate> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("reading certificate {}", path.display()))?;
    let body: String = contents
        .lines()
        .filter(|line| !line.starts_with("-----"))
        .collect();
    ReceiverCertificate::from_base64(&body)
        .with_context(|| format!("decoding certificate {}", path.display()))
}

fn payload_attachment(path: &str, mime_type: &str) -> Result<OutgoingAttachment> {
    let expanded = shellexpand::tilde(path).into_owned();
    let path = PathBuf::from(expanded);
    if !path.exists() {
        bail!("payload file {} does not exist", path.display());
    }
    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "payload".to_string());
    Ok(OutgoingAttachment::builder()
        .file(path)
        .mime_type(mime_type)
        .filename(filename)
        .build()?)
}

async fn run_resolve(
    receiver: String,
    doc_type: String,
    process: String,
    catalog: PathBuf,
    transport_profile: String,
) -> Result<()> {
    let catalog = Arc::new(load_catalog(&catalog)?);
    let mut provider = PeppolEndpointProvider::new(catalog)
        .with_transport_profile(TransportProfile::from_id(&transport_profile));

    provider
        .init(
            &parse_doc_type(&doc_type),
            &parse_process(&process),
            &parse_participant(&receiver),
        )
        .await?;

    let url = provider.receiver_endpoint_url()?;
    let certificate = provider.receiver_certificate()?;
    let subject_cn = certificate.subject_common_name()?;

    println!("endpoint URL : {}", url);
    println!("subject CN   : {}", subject_cn);
    println!("certificate  : {} bytes DER", certificate.der().len());
    Ok(())
}

#[allow(clippy::too_many_arguments)]
async fn run_send(
    receiver: String,
    sender: Option<String>,
    doc_type: String,
    process: String,
    payload: String,
    mime_type: String,
    attachments: Vec<String>,
    catalog: Option<PathBuf>,
    url: Option<String>,
    cert: Option<PathBuf>,
    out_dir: PathBuf,
) -> Result<()> {
    let transport = Arc::new(FileDumpTransport::new(out_dir));

    let mut builder = UserMessageBuilder::new()
        .receiver_participant_id(parse_participant(&receiver))
        .document_type_id(parse_doc_type(&doc_type))
        .process_id(parse_process(&process))
        .payload(payload_attachment(&payload, &mime_type)?)
        .transport(transport.clone());

    if let Some(sender) = sender {
        builder = builder.sender_participant_id(parse_participant(&sender));
    }

    for attachment in &attachments {
        builder = builder.add_attachment(payload_attachment(
            attachment,
            "application/octet-stream",
        )?);
    }

    builder = match (catalog, url, cert) {
        (Some(catalog), None, None) => builder.smp_client(Arc::new(load_catalog(&catalog)?)),
        (None, Some(url), Some(cert)) => {
            builder.receiver_endpoint_details(load_certificate(&cert)?, url)
        }
        _ => bail!("either --catalog or both --url and --cert must be given"),
    };

    if !builder.is_every_required_field_set() {
        bail!("not every required field is set");
    }

    let signal = builder.send().await?;

    info!("Send finished");
    println!(
        "signal       : {}",
        if signal.is_receipt() { "receipt" } else { "error" }
    );
    if let Some(sending_time) = builder.effective_sending_date_time() {
        println!("sent at      : {}", sending_time.to_rfc3339());
    }
    if let Some(url) = builder.resolved_endpoint_url() {
        println!("endpoint URL : {}", url);
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = LogLevel::from_str(&args.log_level).unwrap_or_else(|| {
        eprintln!("Invalid log level '{}', using 'info'", args.log_level);
        LogLevel::Info
    });
    let log_config = LogConfig::new(log_level).json_format(args.json_logs);
    init_logging_with_config(log_config)?;

    let config = match &args.config {
        Some(path) => Config::from_file(path)?,
        None => Config::from_env()?,
    };
    if config.metrics.enabled {
        courier_core::metrics::init_metrics();
    }

    match args.command {
        Command::Resolve {
            receiver,
            doc_type,
            process,
            catalog,
            transport_profile,
        } => run_resolve(receiver, doc_type, process, catalog, transport_profile).await,
        Command::Send {
            receiver,
            sender,
            doc_type,
            process,
            payload,
            mime_type,
            attachments,
            catalog,
            url,
            cert,
            out_dir,
        } => {
            run_send(
                receiver,
                sender,
                doc_type,
                process,
                payload,
                mime_type,
                attachments,
                catalog,
                url,
                cert,
                out_dir,
            )
            .await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_identifier_on_first_separator() {
        let (scheme, value) = split_identifier(
            "busdox-docid-qns::urn:ubl:Invoice-2::Invoice",
            "default",
        );
        assert_eq!(scheme, "busdox-docid-qns");
        assert_eq!(value, "urn:ubl:Invoice-2::Invoice");
    }

    #[test]
    fn test_split_identifier_falls_back_to_default_scheme() {
        let (scheme, value) = split_identifier("0088:1234", "iso6523-actorid-upis");
        assert_eq!(scheme, "iso6523-actorid-upis");
        assert_eq!(value, "0088:1234");
    }

    #[test]
    fn test_load_catalog() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(
            &mut file,
            br#"
            [[endpoint]]
            receiver = "iso6523-actorid-upis::0088:1234"
            doc_type = "busdox-docid-qns::urn:example:doc"
            process = "cenbii-procid-ubl::urn:example:proc"
            transport_profile = "peppol-transport-as4-v2_0"
            url = "https://ap.example/as4"
            certificate = "AAAA"
            "#,
        )
        .unwrap();

        let catalog = load_catalog(file.path()).unwrap();
        assert_eq!(catalog.len(), 1);
    }
}
