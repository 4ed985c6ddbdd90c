//! Builder lifecycle: readiness gates, override events, observer
//! containment and resource release

use super::{doc_type, payload, process, receiver, smp_endpoint};
use crate::core_send::{SendError, UserMessageBuilder};
use crate::test_utils::{receiver_certificate, MockSmpClient, MockTransport};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

fn ready_builder(transport: Arc<MockTransport>) -> UserMessageBuilder {
    UserMessageBuilder::new()
        .receiver_participant_id(receiver())
        .document_type_id(doc_type())
        .process_id(process())
        .payload(payload(b"<Invoice/>"))
        .receiver_endpoint_details(
            receiver_certificate("POP000306"),
            "https://ap.example/as4",
        )
        .transport(transport)
}

#[test]
fn test_readiness_requires_each_field() {
    let transport = Arc::new(MockTransport::new());

    assert!(ready_builder(transport.clone()).is_every_required_field_set());

    let missing_payload = UserMessageBuilder::new()
        .receiver_participant_id(receiver())
        .document_type_id(doc_type())
        .process_id(process())
        .receiver_endpoint_details(receiver_certificate("X"), "https://ap.example/as4");
    assert!(!missing_payload.is_every_required_field_set());

    let missing_receiver = UserMessageBuilder::new()
        .document_type_id(doc_type())
        .process_id(process())
        .payload(payload(b"x"))
        .receiver_endpoint_details(receiver_certificate("X"), "https://ap.example/as4");
    assert!(!missing_receiver.is_every_required_field_set());

    let missing_doc_type = UserMessageBuilder::new()
        .receiver_participant_id(receiver())
        .process_id(process())
        .payload(payload(b"x"))
        .receiver_endpoint_details(receiver_certificate("X"), "https://ap.example/as4");
    assert!(!missing_doc_type.is_every_required_field_set());

    let missing_process = UserMessageBuilder::new()
        .receiver_participant_id(receiver())
        .document_type_id(doc_type())
        .payload(payload(b"x"))
        .receiver_endpoint_details(receiver_certificate("X"), "https://ap.example/as4");
    assert!(!missing_process.is_every_required_field_set());

    let missing_provider = UserMessageBuilder::new()
        .receiver_participant_id(receiver())
        .document_type_id(doc_type())
        .process_id(process())
        .payload(payload(b"x"));
    assert!(!missing_provider.is_every_required_field_set());
}

#[tokio::test]
async fn test_unready_builder_aborts_before_any_network_call() {
    let smp = Arc::new(MockSmpClient::new());
    let transport = Arc::new(MockTransport::new());

    // No payload set
    let mut builder = UserMessageBuilder::new()
        .receiver_participant_id(receiver())
        .document_type_id(doc_type())
        .process_id(process())
        .smp_client(smp.clone())
        .transport(transport.clone());

    let err = builder.send().await.unwrap_err();
    assert!(matches!(err, SendError::Configuration(_)));
    assert_eq!(smp.total_lookup_count(), 0);
    assert_eq!(transport.send_count(), 0);
}

#[tokio::test]
async fn test_discovery_failure_never_reaches_transport() {
    // SMP answers with no endpoint for the tuple
    let smp = Arc::new(MockSmpClient::new());
    let transport = Arc::new(MockTransport::new());

    let mut builder = UserMessageBuilder::new()
        .receiver_participant_id(receiver())
        .document_type_id(doc_type())
        .process_id(process())
        .payload(payload(b"<Invoice/>"))
        .smp_client(smp.clone())
        .transport(transport.clone());

    let err = builder.send().await.unwrap_err();
    assert!(matches!(err, SendError::Discovery(_)));
    assert_eq!(smp.total_lookup_count(), 1);
    assert_eq!(transport.send_count(), 0);
}

#[test]
fn test_field_overrides_are_recorded_as_events() {
    let builder = UserMessageBuilder::new()
        .receiver_participant_id(receiver())
        .receiver_participant_id(receiver())
        .document_type_id(doc_type())
        .process_id(process())
        .process_id(process());

    let overridden: Vec<&str> = builder
        .field_overrides()
        .iter()
        .map(|o| o.field)
        .collect();
    assert_eq!(overridden, vec!["receiver_participant_id", "process_id"]);
}

#[tokio::test]
async fn test_sending_time_observers_compose_and_builder_records() {
    let transport = Arc::new(MockTransport::new());
    let first_seen = Arc::new(Mutex::new(None));
    let second_seen = Arc::new(Mutex::new(None));

    let mut builder = {
        let first_seen = first_seen.clone();
        let second_seen = second_seen.clone();
        ready_builder(transport)
            .sending_time_observer(move |dt| {
                *first_seen.lock().unwrap() = Some(*dt);
                Ok(())
            })
            .sending_time_observer(move |dt| {
                *second_seen.lock().unwrap() = Some(*dt);
                Ok(())
            })
    };

    assert!(builder.effective_sending_date_time().is_none());
    builder.send().await.unwrap();

    // Both observers ran and saw the same timestamp the builder recorded
    let recorded = builder.effective_sending_date_time().unwrap();
    assert_eq!(*first_seen.lock().unwrap(), Some(recorded));
    assert_eq!(*second_seen.lock().unwrap(), Some(recorded));
}

#[tokio::test]
async fn test_failing_observers_do_not_abort_the_send() {
    let transport = Arc::new(MockTransport::new());
    let later_ran = Arc::new(AtomicUsize::new(0));

    let mut builder = {
        let later_ran = later_ran.clone();
        ready_builder(transport.clone())
            .certificate_observer(|_| Err(anyhow::anyhow!("certificate observer failure")))
            .certificate_observer(move |_| {
                later_ran.fetch_add(1, Ordering::SeqCst);
                Ok(())
            })
            .endpoint_url_observer(|_| Err(anyhow::anyhow!("url observer failure")))
            .sending_time_observer(|_| Err(anyhow::anyhow!("sending time observer failure")))
    };

    let signal = builder.send().await.unwrap();
    assert!(signal.is_receipt());
    assert_eq!(transport.send_count(), 1);
    assert_eq!(later_ran.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_certificate_and_url_observers_see_resolved_values() {
    let smp = Arc::new(
        MockSmpClient::new().with_endpoint(smp_endpoint("POP000306", "https://ap.example/as4")),
    );
    let transport = Arc::new(MockTransport::new());
    let seen_cn = Arc::new(Mutex::new(None));
    let seen_url = Arc::new(Mutex::new(None));

    let mut builder = {
        let seen_cn = seen_cn.clone();
        let seen_url = seen_url.clone();
        UserMessageBuilder::new()
            .receiver_participant_id(receiver())
            .document_type_id(doc_type())
            .process_id(process())
            .payload(payload(b"<Invoice/>"))
            .smp_client(smp)
            .transport(transport)
            .certificate_observer(move |cert| {
                *seen_cn.lock().unwrap() = Some(cert.subject_common_name()?);
                Ok(())
            })
            .endpoint_url_observer(move |url| {
                *seen_url.lock().unwrap() = Some(url.to_string());
                Ok(())
            })
    };

    builder.send().await.unwrap();
    assert_eq!(seen_cn.lock().unwrap().as_deref(), Some("POP000306"));
    assert_eq!(
        seen_url.lock().unwrap().as_deref(),
        Some("https://ap.example/as4")
    );
}

#[tokio::test]
async fn test_temp_resources_released_after_success() {
    let transport = Arc::new(MockTransport::new());
    let mut builder = ready_builder(transport.clone());

    builder.send().await.unwrap();

    let sends = transport.sends();
    assert_eq!(sends.len(), 1);
    // Spilled part files are gone once the send returns
    for path in &sends[0].part_paths {
        assert!(!path.exists(), "temp file survived the send: {:?}", path);
    }
}

#[tokio::test]
async fn test_temp_resources_released_when_transport_fails() {
    let transport = Arc::new(MockTransport::new().failing());
    let mut builder = ready_builder(transport.clone());

    let err = builder.send().await.unwrap_err();
    assert!(matches!(err, SendError::Transport(_)));

    let sends = transport.sends();
    assert_eq!(sends.len(), 1);
    for path in &sends[0].part_paths {
        assert!(!path.exists(), "temp file survived the failure: {:?}", path);
    }
}

#[tokio::test]
async fn test_missing_transport_is_a_configuration_error() {
    let mut builder = UserMessageBuilder::new()
        .receiver_participant_id(receiver())
        .document_type_id(doc_type())
        .process_id(process())
        .payload(payload(b"x"))
        .receiver_endpoint_details(receiver_certificate("X"), "https://ap.example/as4");

    let err = builder.send().await.unwrap_err();
    assert!(matches!(err, SendError::Configuration(_)));
}
