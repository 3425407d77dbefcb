use crate::model::step::{CacheStatus, ResolutionMode, ResponseType, Stage, Step};
use crate::repository::cache::MemoryCacheService;
use crate::repository::transport::{Exchange, ExchangeService};
use futures::future::BoxFuture;
use futures::FutureExt;
use rootwalk_proto::packet::record::Record;
use rootwalk_proto::packet::DnsPacket;
use std::collections::{HashSet, VecDeque};
use std::net::Ipv4Addr;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// The 13 IANA root servers, IPv4 only, in the order they are tried.
pub const ROOT_SERVERS: [Ipv4Addr; 13] = [
    Ipv4Addr::new(198, 41, 0, 4),
    Ipv4Addr::new(170, 247, 170, 2),
    Ipv4Addr::new(192, 33, 4, 12),
    Ipv4Addr::new(199, 7, 91, 13),
    Ipv4Addr::new(192, 203, 230, 10),
    Ipv4Addr::new(192, 5, 5, 241),
    Ipv4Addr::new(192, 112, 36, 4),
    Ipv4Addr::new(198, 97, 190, 53),
    Ipv4Addr::new(192, 36, 148, 17),
    Ipv4Addr::new(192, 58, 128, 30),
    Ipv4Addr::new(193, 0, 14, 129),
    Ipv4Addr::new(199, 7, 83, 42),
    Ipv4Addr::new(202, 12, 27, 33),
];

#[derive(Debug, serde::Deserialize)]
pub struct Config {
    /// how many nested lookups a glueless delegation may spawn
    #[serde(default = "Config::default_max_depth")]
    max_depth: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_depth: Self::default_max_depth(),
        }
    }
}

impl Config {
    fn default_max_depth() -> usize {
        8
    }
}

impl Config {
    pub fn build(
        self,
        cache: Arc<MemoryCacheService>,
        transport: Arc<dyn ExchangeService + Send + Sync>,
    ) -> IterativeResolver {
        IterativeResolver {
            cache,
            transport,
            max_depth: self.max_depth,
        }
    }
}

/// Outcome of one client query.
#[derive(Debug)]
pub struct Resolution {
    pub address: Option<Ipv4Addr>,
    pub elapsed: Duration,
    pub steps: Vec<Step>,
    pub from_cache: bool,
}

#[async_trait::async_trait]
pub trait ResolverService {
    async fn resolve(&self, qname: &str) -> Resolution;
}

pub struct IterativeResolver {
    cache: Arc<MemoryCacheService>,
    transport: Arc<dyn ExchangeService + Send + Sync>,
    max_depth: usize,
}

/// Flattens a received datagram into its three record sections. A datagram
/// that does not parse, or whose section counts disagree with the octets it
/// actually contains, carries no usable data and yields empty sections.
fn sections(exchange: Exchange) -> (Vec<Record>, Vec<Record>, Vec<Record>) {
    let Exchange {
        mut buffer, size, ..
    } = exchange;
    match DnsPacket::read(&mut buffer) {
        Ok(packet) if buffer.pos() == size => (packet.answers, packet.authorities, packet.resources),
        Ok(_) => {
            tracing::debug!("response has trailing octets, ignoring it");
            (Vec::new(), Vec::new(), Vec::new())
        }
        Err(error) => {
            tracing::debug!("unusable response: {error}");
            (Vec::new(), Vec::new(), Vec::new())
        }
    }
}

fn first_address(records: &[Record]) -> Option<Ipv4Addr> {
    records.iter().find_map(|record| match record {
        Record::A { addr, .. } => Some(*addr),
        _ => None,
    })
}

impl IterativeResolver {
    /// One full walk for `qname`, appending every contact to `steps`.
    /// Glueless delegations recurse through the same function with a fresh
    /// frontier and visited set but the shared trace, bounded by `depth`.
    fn resolve_inner<'a>(
        &'a self,
        qname: &'a str,
        depth: usize,
        steps: &'a mut Vec<Step>,
    ) -> BoxFuture<'a, (Option<Ipv4Addr>, bool)> {
        async move {
            let started = Instant::now();

            if let Some(addr) = self.cache.address(qname).await {
                tracing::debug!("{qname} answered from cache");
                steps.push(Step {
                    domain: qname.to_string(),
                    mode: ResolutionMode::Cached,
                    server: "cache".into(),
                    stage: Stage::Cache,
                    response: ResponseType::Answer,
                    rtt: Some(Duration::ZERO),
                    total: Some(started.elapsed()),
                    cache_status: CacheStatus::Hit,
                });
                return (Some(addr), true);
            }

            let mut frontier = VecDeque::from(ROOT_SERVERS);
            let mut visited: HashSet<Ipv4Addr> = HashSet::new();

            while let Some(server) = frontier.pop_front() {
                if !visited.insert(server) {
                    continue;
                }

                let stage = if ROOT_SERVERS.contains(&server) {
                    Stage::Root
                } else {
                    Stage::TldAuth
                };

                let query = match DnsPacket::query(rand::random(), qname).create_buffer() {
                    Ok(buffer) => buffer,
                    Err(error) => {
                        // no server will do better against an unencodable name
                        tracing::debug!("unable to encode query for {qname}: {error}");
                        return (None, false);
                    }
                };
                let reply = self
                    .transport
                    .exchange(server, &query.buf[..query.pos()])
                    .await;

                let rtt = reply.as_ref().map(|exchange| exchange.rtt);
                let (answers, authorities, resources) = match reply {
                    Some(exchange) => sections(exchange),
                    None => (Vec::new(), Vec::new(), Vec::new()),
                };

                let answer = first_address(&answers);
                let response = if answer.is_some() {
                    ResponseType::Answer
                } else if rtt.is_none() {
                    ResponseType::NoResponse
                } else {
                    ResponseType::Referral
                };

                steps.push(Step {
                    domain: qname.to_string(),
                    mode: ResolutionMode::Iterative,
                    server: server.to_string(),
                    stage,
                    response,
                    rtt,
                    total: None,
                    cache_status: CacheStatus::Miss,
                });

                // Case 1: a final answer
                if let Some(addr) = answer {
                    if let Some(last) = steps.last_mut() {
                        last.total = Some(started.elapsed());
                    }
                    self.cache.store_address(qname, addr).await;
                    return (Some(addr), false);
                }

                // Case 2: a referral with glue; glued servers jump the queue
                let glue: Vec<Ipv4Addr> = resources
                    .iter()
                    .filter_map(|record| match record {
                        Record::A { addr, .. } => Some(*addr),
                        _ => None,
                    })
                    .collect();
                if !glue.is_empty() {
                    for addr in &glue {
                        self.cache.store_glue(&server.to_string(), *addr).await;
                    }
                    for addr in glue.into_iter().rev() {
                        frontier.push_front(addr);
                    }
                    continue;
                }

                // Case 3: a glueless referral; the first nameserver that
                // resolves at all leads the frontier
                let hosts: Vec<String> = authorities
                    .iter()
                    .filter_map(|record| match record {
                        Record::NS { host, .. } => Some(host.clone()),
                        _ => None,
                    })
                    .collect();
                if !hosts.is_empty() {
                    self.cache.store_nameservers(qname, hosts.clone()).await;
                    for host in &hosts {
                        let found = match self.cache.glue(host).await {
                            Some(addr) => Some(addr),
                            None if depth < self.max_depth => {
                                self.resolve_inner(host, depth + 1, steps).await.0
                            }
                            None => {
                                tracing::warn!(
                                    "not resolving {host}: depth bound of {} reached",
                                    self.max_depth
                                );
                                None
                            }
                        };
                        if let Some(addr) = found {
                            frontier.push_front(addr);
                            break;
                        }
                    }
                }
            }

            (None, false)
        }
        .boxed()
    }
}

#[async_trait::async_trait]
impl ResolverService for IterativeResolver {
    #[tracing::instrument(skip(self))]
    async fn resolve(&self, qname: &str) -> Resolution {
        let started = Instant::now();
        let mut steps = Vec::new();
        let (address, from_cache) = self.resolve_inner(qname, 0, &mut steps).await;
        Resolution {
            address,
            elapsed: started.elapsed(),
            steps,
            from_cache,
        }
    }
}

#[cfg(test)]
pub use mock::MockResolverService;
