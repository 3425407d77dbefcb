use super::reply;
use crate::model::step::millis;
use crate::repository::journal::JournalService;
use crate::repository::metrics::MetricsService;
use crate::repository::resolver::{Resolution, ResolverService};
use rootwalk_proto::buffer::{BytePacketBuffer, HEADER_SIZE};
use rootwalk_proto::packet::header::Header;
use rootwalk_proto::packet::question::Question;
use rootwalk_server::prelude::Message;
use std::sync::Arc;

pub(crate) struct DnsHandler {
    resolver: Arc<dyn ResolverService + Send + Sync>,
    journal: Arc<dyn JournalService + Send + Sync>,
    metrics: Arc<MetricsService>,
}

impl DnsHandler {
    pub fn new(
        resolver: Arc<dyn ResolverService + Send + Sync>,
        journal: Arc<dyn JournalService + Send + Sync>,
        metrics: Arc<MetricsService>,
    ) -> Self {
        Self {
            resolver,
            journal,
            metrics,
        }
    }

    /// The question starts right behind the fixed header. A datagram whose
    /// question does not decode inside the received octets is noise.
    fn question(message: &Message) -> Option<Question> {
        if message.size < HEADER_SIZE {
            return None;
        }
        let mut buffer = BytePacketBuffer::new(message.buffer);
        Header::read(&mut buffer).ok()?;
        let question = Question::read(&mut buffer).ok()?;
        if buffer.pos() > message.size {
            return None;
        }
        Some(question)
    }

    fn report(&self, timestamp: &str, client: &str, domain: &str, resolution: &Resolution) {
        if let Err(error) = self.journal.record_summary(
            timestamp,
            client,
            domain,
            resolution.address,
            resolution.elapsed,
        ) {
            tracing::error!("unable to append summary row: {error}");
        }
        if let Err(error) = self.journal.record_steps(timestamp, &resolution.steps) {
            tracing::error!("unable to append step rows: {error}");
        }

        let snapshot = self.metrics.record(
            resolution.address.is_some(),
            resolution.elapsed,
            resolution.from_cache,
        );
        if let Err(error) = self.journal.record_metrics(&snapshot) {
            tracing::error!("unable to rewrite metrics: {error}");
        }
    }
}

#[async_trait::async_trait]
impl rootwalk_server::Handler for DnsHandler {
    #[tracing::instrument(skip_all, fields(origin = ?message.address, qname = tracing::field::Empty))]
    async fn handle(&self, message: Message) -> Option<Message> {
        let question = match Self::question(&message) {
            Some(found) => found,
            None => {
                tracing::debug!("undecodable question, dropping datagram");
                return None;
            }
        };
        tracing::Span::current().record("qname", question.name.as_str());

        let client = message.address.ip().to_string();
        let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
        tracing::info!("{client} asked for {}", question.name);

        let resolution = self.resolver.resolve(&question.name).await;

        let request = &message.buffer[..message.size];
        let reply = match resolution.address {
            Some(addr) => reply::success(request, &question.name, addr),
            None => reply::failure(request),
        };
        let reply = match reply {
            Ok(buffer) => buffer,
            Err(error) => {
                tracing::warn!("unable to build reply: {error}");
                return None;
            }
        };

        self.report(&timestamp, &client, &question.name, &resolution);

        tracing::info!(
            "{} -> {} ({:.2} ms)",
            question.name,
            resolution
                .address
                .map(|addr| addr.to_string())
                .unwrap_or_else(|| "FAIL".into()),
            millis(resolution.elapsed),
        );

        Some(Message {
            address: message.address,
            buffer: reply.buf,
            size: reply.pos,
        })
    }
}
