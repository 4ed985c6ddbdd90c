//! User message builder
//!
//! Stateful, single-use configuration object for one outbound message.
//! Fields may be set in any order; the terminal [`send`] runs the fixed
//! pipeline: readiness check, one-shot endpoint discovery, attachment
//! packaging through a scoped resource helper, transport hand-off.
//!
//! [`send`]: UserMessageBuilder::send

use super::errors::{SendError, SendResult};
use super::observers::ObserverList;
use super::transport::{
    As4Transport, DefaultIncomingAttachmentFactory, DefaultIncomingProfileSelector,
    DefaultPmodeResolver, IncomingAttachmentFactory, IncomingConfig, IncomingProfileSelector,
    PmodeResolver, RetryCallback, RetryEvent, SendHandles, SendHooks, SignalConsumer,
    SignalMessage, WireDumper,
};
use crate::core_attachment::{OutgoingAttachment, PackagedPart, ResourceScope};
use crate::core_crypto::{CryptParams, CryptoConfig, ReceiverCertificate, SigningParams};
use crate::core_discovery::{
    ConstantEndpointProvider, EndpointDetailProvider, PeppolEndpointProvider,
    ServiceMetadataProvider,
};
use crate::core_ident::{DocTypeId, ParticipantId, ProcessId};
use crate::core_message::constants::{
    DEFAULT_INITIATOR_ROLE, DEFAULT_RESPONDER_ROLE, PEPPOL_AGREEMENT_REF, PEPPOL_PARTY_ID_TYPE,
    PROPERTY_FINAL_RECIPIENT, PROPERTY_ORIGINAL_SENDER,
};
use crate::core_message::{MessageProperty, PartyInfo, Service, UserMessage};
use crate::metrics;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, warn};

/// A setter overwrote an already-set field (last-write-wins)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldOverride {
    pub field: &'static str,
}

/// Profile-specific default values applied at construction
#[derive(Debug, Clone)]
pub struct ProfileDefaults {
    pub agreement_ref: Option<String>,
    pub from_party_id_type: Option<String>,
    pub to_party_id_type: Option<String>,
    pub from_role: String,
    pub to_role: String,
}

impl ProfileDefaults {
    /// Defaults for sending over the Peppol network
    pub fn peppol() -> Self {
        Self {
            agreement_ref: Some(PEPPOL_AGREEMENT_REF.to_string()),
            from_party_id_type: Some(PEPPOL_PARTY_ID_TYPE.to_string()),
            to_party_id_type: Some(PEPPOL_PARTY_ID_TYPE.to_string()),
            from_role: DEFAULT_INITIATOR_ROLE.to_string(),
            to_role: DEFAULT_RESPONDER_ROLE.to_string(),
        }
    }

    /// Defaults for generic BDXR-based networks
    pub fn bdxr() -> Self {
        Self {
            agreement_ref: None,
            from_party_id_type: None,
            to_party_id_type: None,
            from_role: DEFAULT_INITIATOR_ROLE.to_string(),
            to_role: DEFAULT_RESPONDER_ROLE.to_string(),
        }
    }
}

/// Protocol-agnostic message configuration
///
/// The generic base layer under the identifier-level setters: whatever ends
/// up in the ebMS3 header lives here, and `document_type_id`/`process_id`
/// write their canonical encodings into `action`/`service`.
#[derive(Debug, Clone)]
struct MessageConfig {
    action: Option<String>,
    service: Option<Service>,
    agreement_ref: Option<String>,
    conversation_id: Option<String>,
    from_party_id: Option<String>,
    from_party_id_type: Option<String>,
    from_role: String,
    to_party_id: Option<String>,
    to_party_id_type: Option<String>,
    to_role: String,
    properties: Vec<MessageProperty>,
}

impl MessageConfig {
    fn from_defaults(defaults: &ProfileDefaults) -> Self {
        Self {
            action: None,
            service: None,
            agreement_ref: defaults.agreement_ref.clone(),
            conversation_id: None,
            from_party_id: None,
            from_party_id_type: defaults.from_party_id_type.clone(),
            from_role: defaults.from_role.clone(),
            to_party_id: None,
            to_party_id_type: defaults.to_party_id_type.clone(),
            to_role: defaults.to_role.clone(),
            properties: Vec::new(),
        }
    }

    fn set_property(&mut self, name: &str, value: String) {
        if let Some(existing) = self.properties.iter_mut().find(|p| p.name == name) {
            existing.value = value;
        } else {
            self.properties.push(MessageProperty {
                name: name.to_string(),
                value,
            });
        }
    }

    /// Complete and validate the fields outside discovery scope
    fn finish_fields(
        &mut self,
        receiver: &ParticipantId,
        sender: Option<&ParticipantId>,
    ) -> SendResult<()> {
        self.set_property(PROPERTY_FINAL_RECIPIENT, receiver.uri_encoded());
        if let Some(sender) = sender {
            self.set_property(PROPERTY_ORIGINAL_SENDER, sender.uri_encoded());
        }

        if self.action.is_none() {
            return Err(SendError::Configuration(
                "the field 'action' is not set".to_string(),
            ));
        }
        if self.service.is_none() {
            return Err(SendError::Configuration(
                "the field 'service' is not set".to_string(),
            ));
        }
        if self.from_role.is_empty() || self.to_role.is_empty() {
            return Err(SendError::Configuration(
                "party roles must be non-empty".to_string(),
            ));
        }
        Ok(())
    }

    fn to_user_message(&self) -> SendResult<UserMessage> {
        let action = self.action.clone().ok_or_else(|| {
            SendError::Configuration("the field 'action' is not set".to_string())
        })?;
        let service = self.service.clone().ok_or_else(|| {
            SendError::Configuration("the field 'service' is not set".to_string())
        })?;

        Ok(UserMessage::new(
            self.conversation_id.clone(),
            self.agreement_ref.clone(),
            action,
            service,
            PartyInfo {
                id: self.from_party_id.clone(),
                id_type: self.from_party_id_type.clone(),
                role: self.from_role.clone(),
            },
            PartyInfo {
                id: self.to_party_id.clone(),
                id_type: self.to_party_id_type.clone(),
                role: self.to_role.clone(),
            },
            self.properties.clone(),
        ))
    }
}

/// Builder for one outbound user message
///
/// Single-use: configure, then call [`send`](Self::send) once. A second
/// send on the same instance is unsupported; the discovery provider's
/// idempotence makes it reuse the first resolution rather than fail.
/// Not meant for concurrent mutation from multiple threads.
pub struct UserMessageBuilder {
    receiver_id: Option<ParticipantId>,
    sender_id: Option<ParticipantId>,
    doc_type_id: Option<DocTypeId>,
    process_id: Option<ProcessId>,
    payload: Option<OutgoingAttachment>,
    attachments: Vec<OutgoingAttachment>,
    endpoint_provider: Option<Box<dyn EndpointDetailProvider>>,
    transport: Option<Arc<dyn As4Transport>>,
    pmode_resolver: Arc<dyn PmodeResolver>,
    attachment_factory: Arc<dyn IncomingAttachmentFactory>,
    profile_selector: Arc<dyn IncomingProfileSelector>,
    signing_params: SigningParams,
    crypt_params: CryptParams,
    hooks: SendHooks,
    locale: String,
    message: MessageConfig,

    certificate_observers: ObserverList<ReceiverCertificate>,
    endpoint_url_observers: ObserverList<str>,
    sending_time_observers: ObserverList<DateTime<Utc>>,

    // Status fields, populated as the pipeline runs
    resolved_certificate: Option<ReceiverCertificate>,
    resolved_endpoint_url: Option<String>,
    effective_sending_time: Option<DateTime<Utc>>,
    field_overrides: Vec<FieldOverride>,
}

impl UserMessageBuilder {
    /// Create a builder with Peppol profile defaults
    pub fn new() -> Self {
        Self::with_defaults(ProfileDefaults::peppol())
    }

    /// Create a builder with explicit profile defaults
    pub fn with_defaults(defaults: ProfileDefaults) -> Self {
        Self {
            receiver_id: None,
            sender_id: None,
            doc_type_id: None,
            process_id: None,
            payload: None,
            attachments: Vec::new(),
            endpoint_provider: None,
            transport: None,
            pmode_resolver: Arc::new(DefaultPmodeResolver),
            attachment_factory: Arc::new(DefaultIncomingAttachmentFactory),
            profile_selector: Arc::new(DefaultIncomingProfileSelector),
            signing_params: SigningParams::default(),
            crypt_params: CryptParams::default(),
            hooks: SendHooks::default(),
            locale: "en".to_string(),
            message: MessageConfig::from_defaults(&defaults),
            certificate_observers: ObserverList::new("certificate"),
            endpoint_url_observers: ObserverList::new("endpoint-url"),
            sending_time_observers: ObserverList::new("sending-time"),
            resolved_certificate: None,
            resolved_endpoint_url: None,
            effective_sending_time: None,
            field_overrides: Vec::new(),
        }
    }

    fn note_override(&mut self, field: &'static str, occupied: bool) {
        if occupied {
            warn!("An existing {} is overridden", field);
            self.field_overrides.push(FieldOverride { field });
        }
    }

    /// Set the receiver participant; ends up in the `finalRecipient`
    /// message property
    pub fn receiver_participant_id(mut self, receiver: ParticipantId) -> Self {
        self.note_override("receiver_participant_id", self.receiver_id.is_some());
        self.receiver_id = Some(receiver);
        self
    }

    /// Set the sender participant; ends up in the `originalSender` message
    /// property
    pub fn sender_participant_id(mut self, sender: ParticipantId) -> Self {
        self.note_override("sender_participant_id", self.sender_id.is_some());
        self.sender_id = Some(sender);
        self
    }

    /// Set the document type; also writes the canonical encoding into the
    /// message `action` field
    pub fn document_type_id(mut self, doc_type: DocTypeId) -> Self {
        self.note_override("document_type_id", self.doc_type_id.is_some());
        self.message.action = Some(doc_type.uri_encoded());
        self.doc_type_id = Some(doc_type);
        self
    }

    /// Set the process; also writes scheme and value into the message
    /// `service` field
    pub fn process_id(mut self, process: ProcessId) -> Self {
        self.note_override("process_id", self.process_id.is_some());
        self.message.service = Some(Service {
            scheme: Some(process.scheme().to_string()),
            value: process.value().to_string(),
        });
        self.process_id = Some(process);
        self
    }

    /// Set the primary payload, carried as the first MIME part
    pub fn payload(mut self, payload: OutgoingAttachment) -> Self {
        self.note_override("payload", self.payload.is_some());
        self.payload = Some(payload);
        self
    }

    /// Append an auxiliary attachment; insertion order is wire order
    pub fn add_attachment(mut self, attachment: OutgoingAttachment) -> Self {
        self.attachments.push(attachment);
        self
    }

    /// Set the endpoint detail provider
    pub fn endpoint_detail_provider(
        mut self,
        provider: impl EndpointDetailProvider + 'static,
    ) -> Self {
        self.note_override("endpoint_detail_provider", self.endpoint_provider.is_some());
        self.endpoint_provider = Some(Box::new(provider));
        self
    }

    /// Shortcut: discover through a Peppol SMP client
    pub fn smp_client(self, client: Arc<dyn ServiceMetadataProvider>) -> Self {
        self.endpoint_detail_provider(PeppolEndpointProvider::new(client))
    }

    /// Shortcut: use externally resolved endpoint details
    pub fn receiver_endpoint_details(
        self,
        certificate: ReceiverCertificate,
        endpoint_url: impl Into<String>,
    ) -> Self {
        self.endpoint_detail_provider(ConstantEndpointProvider::new(certificate, endpoint_url))
    }

    /// Set the transport collaborator performing the actual exchange
    pub fn transport(mut self, transport: Arc<dyn As4Transport>) -> Self {
        self.note_override("transport", self.transport.is_some());
        self.transport = Some(transport);
        self
    }

    pub fn pmode_resolver(mut self, resolver: Arc<dyn PmodeResolver>) -> Self {
        self.pmode_resolver = resolver;
        self
    }

    pub fn incoming_attachment_factory(
        mut self,
        factory: Arc<dyn IncomingAttachmentFactory>,
    ) -> Self {
        self.attachment_factory = factory;
        self
    }

    pub fn incoming_profile_selector(
        mut self,
        selector: Arc<dyn IncomingProfileSelector>,
    ) -> Self {
        self.profile_selector = selector;
        self
    }

    pub fn signing_params(mut self, params: SigningParams) -> Self {
        self.signing_params = params;
        self
    }

    pub fn crypt_params(mut self, params: CryptParams) -> Self {
        self.crypt_params = params;
        self
    }

    pub fn conversation_id(mut self, conversation_id: impl Into<String>) -> Self {
        self.message.conversation_id = Some(conversation_id.into());
        self
    }

    pub fn agreement_ref(mut self, agreement_ref: impl Into<String>) -> Self {
        self.message.agreement_ref = Some(agreement_ref.into());
        self
    }

    /// Set the sending party identifier placed in the `from` party
    pub fn from_party_id(mut self, party_id: impl Into<String>) -> Self {
        self.message.from_party_id = Some(party_id.into());
        self
    }

    pub fn locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = locale.into();
        self
    }

    pub fn retry_callback(mut self, callback: impl Fn(&RetryEvent) + Send + Sync + 'static) -> Self {
        self.hooks.retry_callback = Some(Box::new(callback) as RetryCallback);
        self
    }

    pub fn outgoing_dumper(mut self, dumper: impl Fn(&[u8]) + Send + Sync + 'static) -> Self {
        self.hooks.outgoing_dumper = Some(Box::new(dumper) as WireDumper);
        self
    }

    pub fn incoming_dumper(mut self, dumper: impl Fn(&[u8]) + Send + Sync + 'static) -> Self {
        self.hooks.incoming_dumper = Some(Box::new(dumper) as WireDumper);
        self
    }

    pub fn signal_consumer(
        mut self,
        consumer: impl Fn(&SignalMessage) -> anyhow::Result<()> + Send + Sync + 'static,
    ) -> Self {
        self.hooks.signal_consumer = Some(Box::new(consumer) as SignalConsumer);
        self
    }

    /// Observe the certificate resolved by discovery; failures are contained
    pub fn certificate_observer(
        mut self,
        observer: impl Fn(&ReceiverCertificate) -> anyhow::Result<()> + Send + Sync + 'static,
    ) -> Self {
        self.certificate_observers.register(observer);
        self
    }

    /// Observe the endpoint URL resolved by discovery; failures are contained
    pub fn endpoint_url_observer(
        mut self,
        observer: impl Fn(&str) -> anyhow::Result<()> + Send + Sync + 'static,
    ) -> Self {
        self.endpoint_url_observers.register(observer);
        self
    }

    /// Observe the effective sending time; failures are contained
    pub fn sending_time_observer(
        mut self,
        observer: impl Fn(&DateTime<Utc>) -> anyhow::Result<()> + Send + Sync + 'static,
    ) -> Self {
        self.sending_time_observers.register(observer);
        self
    }

    /// Overrides recorded by last-write-wins setters
    pub fn field_overrides(&self) -> &[FieldOverride] {
        &self.field_overrides
    }

    /// The effective sending time; `None` until a send stamped the message
    pub fn effective_sending_date_time(&self) -> Option<DateTime<Utc>> {
        self.effective_sending_time
    }

    /// The certificate resolved by discovery; `None` before `send`
    pub fn resolved_certificate(&self) -> Option<&ReceiverCertificate> {
        self.resolved_certificate.as_ref()
    }

    /// The endpoint URL resolved by discovery; `None` before `send`
    pub fn resolved_endpoint_url(&self) -> Option<&str> {
        self.resolved_endpoint_url.as_deref()
    }

    /// Whether the discovery-specific subset of fields is ready
    fn is_endpoint_detail_provider_usable(&self) -> bool {
        if self.receiver_id.is_none() {
            warn!("The field 'receiver_participant_id' is not set");
            return false;
        }
        if self.doc_type_id.is_none() {
            warn!("The field 'document_type_id' is not set");
            return false;
        }
        if self.process_id.is_none() {
            warn!("The field 'process_id' is not set");
            return false;
        }
        if self.endpoint_provider.is_none() {
            warn!("The field 'endpoint_detail_provider' is not set");
            return false;
        }
        true
    }

    /// Whether every required field is set
    ///
    /// Pure predicate; logs a warning per missing field and never fails. A
    /// caller driving a send must treat `false` as "abort before any
    /// network or crypto work begins".
    pub fn is_every_required_field_set(&self) -> bool {
        let mut ready = self.is_endpoint_detail_provider_usable();
        if self.payload.is_none() {
            warn!("The field 'payload' is not set");
            ready = false;
        }
        ready
    }

    /// Run discovery and complete the message fields
    ///
    /// Invoked once per send attempt, before any packaging or transport
    /// work. Failure short-circuits the send.
    pub(crate) async fn finish_fields(&mut self) -> SendResult<()> {
        if !self.is_endpoint_detail_provider_usable() {
            error!("At least one mandatory field for endpoint discovery is not set and therefore the message cannot be sent");
            return Err(SendError::Configuration(
                "endpoint discovery fields incomplete".to_string(),
            ));
        }
        let (Some(doc_type), Some(process), Some(receiver)) = (
            self.doc_type_id.clone(),
            self.process_id.clone(),
            self.receiver_id.clone(),
        ) else {
            return Err(SendError::Configuration(
                "endpoint discovery fields incomplete".to_string(),
            ));
        };
        let Some(provider) = self.endpoint_provider.as_mut() else {
            return Err(SendError::Configuration(
                "the field 'endpoint_detail_provider' is not set".to_string(),
            ));
        };

        // e.g. SMP lookup; resolves at most once per provider instance
        provider.init(&doc_type, &process, &receiver).await?;

        let certificate = provider.receiver_certificate()?;
        self.certificate_observers.notify(&certificate);

        let endpoint_url = provider.receiver_endpoint_url()?;
        self.endpoint_url_observers.notify(&endpoint_url);

        // The receiver party id comes from the certificate subject CN
        let to_party_id = certificate.subject_common_name()?;
        self.message.to_party_id = Some(to_party_id);

        self.resolved_certificate = Some(certificate);
        self.resolved_endpoint_url = Some(endpoint_url);

        // Base layer last
        self.message.finish_fields(&receiver, self.sender_id.as_ref())
    }

    /// Package attachments and hand off to the transport collaborator
    async fn main_send(&mut self) -> SendResult<SignalMessage> {
        let Some(transport) = self.transport.clone() else {
            return Err(SendError::Configuration(
                "the field 'transport' is not set".to_string(),
            ));
        };
        let Some(destination_url) = self.resolved_endpoint_url.clone() else {
            return Err(SendError::Configuration(
                "endpoint URL not resolved".to_string(),
            ));
        };
        let Some(receiver_certificate) = self.resolved_certificate.clone() else {
            return Err(SendError::Configuration(
                "receiver certificate not resolved".to_string(),
            ));
        };

        // Temporary files live exactly as long as this send
        let mut scope = ResourceScope::new();
        let result = self
            .package_and_send(transport, destination_url, receiver_certificate, &mut scope)
            .await;
        scope.close();
        result
    }

    async fn package_and_send(
        &mut self,
        transport: Arc<dyn As4Transport>,
        destination_url: String,
        receiver_certificate: ReceiverCertificate,
        scope: &mut ResourceScope,
    ) -> SendResult<SignalMessage> {
        let mut message = self.message.to_user_message()?;

        // Stamp the effective sending time, remember it on this instance and
        // notify all registered observers in order
        let sending_time = message.ensure_sending_date_time();
        self.effective_sending_time = Some(sending_time);
        self.sending_time_observers.notify(&sending_time);

        // Primary payload first, auxiliary attachments in insertion order
        let payload = self.payload.as_ref().ok_or_else(|| {
            SendError::Configuration("the field 'payload' is not set".to_string())
        })?;
        message.add_part(PackagedPart::package(payload, scope)?);
        for attachment in &self.attachments {
            message.add_part(PackagedPart::package(attachment, scope)?);
        }

        let crypto = CryptoConfig::assemble(
            self.signing_params.clone(),
            self.crypt_params.clone(),
            receiver_certificate,
        );
        let incoming = IncomingConfig {
            attachment_factory: self.attachment_factory.clone(),
            profile_selector: self.profile_selector.clone(),
            security: crypto.incoming_security(),
        };
        let handles = SendHandles {
            crypto: &crypto,
            pmode_resolver: self.pmode_resolver.as_ref(),
            incoming: &incoming,
            locale: &self.locale,
            hooks: &self.hooks,
        };

        let signal = transport
            .send_and_await_signal(&message, &destination_url, handles)
            .await?;
        Ok(signal)
    }

    /// Trigger the send
    ///
    /// Validates readiness, runs discovery, packages the attachments and
    /// performs the transport round trip. All failures surface as
    /// [`SendError`]; temporary resources are released on every exit path.
    pub async fn send(&mut self) -> SendResult<SignalMessage> {
        let started = Instant::now();
        let result = self.send_inner().await;
        metrics::send_duration(started.elapsed().as_secs_f64());
        match &result {
            Ok(_) => metrics::send_result("sent"),
            Err(e) => metrics::send_result(e.metric_label()),
        }
        result
    }

    async fn send_inner(&mut self) -> SendResult<SignalMessage> {
        if !self.is_every_required_field_set() {
            return Err(SendError::Configuration(
                "at least one required field is not set".to_string(),
            ));
        }
        self.finish_fields().await?;
        self.main_send().await
    }
}

impl Default for UserMessageBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for UserMessageBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserMessageBuilder")
            .field("receiver_id", &self.receiver_id)
            .field("doc_type_id", &self.doc_type_id)
            .field("process_id", &self.process_id)
            .field("payload", &self.payload.is_some())
            .field("attachments", &self.attachments.len())
            .field("endpoint_provider", &self.endpoint_provider.is_some())
            .field("transport", &self.transport.is_some())
            .field("effective_sending_time", &self.effective_sending_time)
            .finish_non_exhaustive()
    }
}
