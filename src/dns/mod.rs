use clap::Args;
use rootwalk_server::UdpServer;
use std::sync::Arc;

pub(crate) mod config;
pub(crate) mod handler;
pub(crate) mod reply;

/// Starts the resolver frontend, the core of the machine
#[derive(Args, Debug)]
pub struct Command;

impl Command {
    pub async fn run(&self, config: crate::config::Config) {
        tracing::info!("preparing resolver");
        let cache = Arc::new(config.cache.build());
        let transport = Arc::new(config.transport.build());
        let resolver = config.resolver.build(cache, transport);
        let journal = config
            .journal
            .build()
            .expect("unable to prepare csv journal");
        let metrics = crate::repository::metrics::MetricsService::default();

        let handler = handler::DnsHandler::new(
            Arc::new(resolver),
            Arc::new(journal),
            Arc::new(metrics),
        );

        let address = config.dns.address();
        tracing::info!("starting dns server on {address:?}");
        UdpServer::new(address, handler)
            .run()
            .await
            .expect("unable to run udp server")
    }
}
