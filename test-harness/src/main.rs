//! End-to-end send harness
//!
//! Drives the full send pipeline in-process: a constant endpoint provider
//! with a freshly generated receiver certificate, a recording mock
//! transport, and assertions over what reached the transport. Exits
//! non-zero when any expectation fails.

use anyhow::{ensure, Result};
use clap::Parser;
use courier_core::core_attachment::OutgoingAttachment;
use courier_core::core_ident::{DocTypeId, ParticipantId, ProcessId};
use courier_core::logging::{init_logging_with_config, LogConfig, LogLevel};
use courier_core::test_utils::{receiver_certificate, MockTransport};
use courier_core::UserMessageBuilder;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "test-harness")]
#[command(about = "Courier end-to-end send harness", long_about = None)]
struct Args {
    /// Subject CN of the generated receiver certificate
    #[arg(long, default_value = "POP000306")]
    receiver_cn: String,

    /// Destination URL the mock transport should observe
    #[arg(long, default_value = "https://ap.example/as4")]
    url: String,

    /// Set the log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = LogLevel::from_str(&args.log_level).unwrap_or(LogLevel::Info);
    init_logging_with_config(LogConfig::new(log_level))?;

    println!("courier end-to-end send harness");
    println!("receiver CN : {}", args.receiver_cn);
    println!("endpoint    : {}", args.url);
    println!();

    let transport = Arc::new(MockTransport::new());
    let payload_bytes = b"<Invoice><ID>harness-42</ID></Invoice>".to_vec();

    let mut builder = UserMessageBuilder::new()
        .receiver_participant_id(ParticipantId::with_default_scheme("0088:1234567890"))
        .sender_participant_id(ParticipantId::with_default_scheme("0088:7654321098"))
        .document_type_id(DocTypeId::with_default_scheme(
            "urn:oasis:names:specification:ubl:schema:xsd:Invoice-2::Invoice",
        ))
        .process_id(ProcessId::with_default_scheme(
            "urn:fdc:peppol.eu:2017:poacc:billing:01:1.0",
        ))
        .payload(
            OutgoingAttachment::builder()
                .data(payload_bytes.clone())
                .mime_type("application/xml")
                .filename("invoice.xml")
                .build()?,
        )
        .receiver_endpoint_details(receiver_certificate(&args.receiver_cn), args.url.clone())
        .transport(transport.clone());

    ensure!(
        builder.is_every_required_field_set(),
        "builder readiness check failed"
    );

    let signal = builder.send().await?;

    // Assert on what the transport observed
    let sends = transport.sends();
    ensure!(signal.is_receipt(), "expected a receipt signal");
    ensure!(
        sends.len() == 1,
        "expected exactly one transport invocation, got {}",
        sends.len()
    );
    let send = &sends[0];
    ensure!(
        send.destination_url == args.url,
        "destination URL mismatch: {}",
        send.destination_url
    );
    ensure!(
        send.part_bytes.len() == 1 && send.part_bytes[0] == payload_bytes,
        "payload bytes did not round-trip"
    );
    ensure!(
        send.to_party_id.as_deref() == Some(args.receiver_cn.as_str()),
        "receiver party id was not derived from the certificate CN"
    );
    ensure!(
        builder.effective_sending_date_time().is_some(),
        "effective sending time was not recorded"
    );
    for path in &send.part_paths {
        ensure!(
            !path.exists(),
            "temporary part file survived the send: {}",
            path.display()
        );
    }

    println!("message id  : {}", send.message_id);
    println!("to party    : {}", send.to_party_id.as_deref().unwrap_or("-"));
    println!(
        "sent at     : {}",
        builder
            .effective_sending_date_time()
            .map(|dt| dt.to_rfc3339())
            .unwrap_or_default()
    );
    println!();
    println!("all checks passed");
    Ok(())
}
