use moka::future::Cache;
use std::net::Ipv4Addr;
use std::ops::Add;
use std::time::{Duration, SystemTime};

#[derive(Debug, serde::Deserialize)]
pub struct Config {
    #[serde(default = "Config::default_size")]
    size: u64,
    /// seconds an entry stays valid, whatever its record said on the wire
    #[serde(default = "Config::default_ttl")]
    ttl: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            size: Self::default_size(),
            ttl: Self::default_ttl(),
        }
    }
}

impl Config {
    fn default_size() -> u64 {
        1000
    }

    fn default_ttl() -> u64 {
        300
    }
}

impl Config {
    pub fn build(self) -> MemoryCacheService {
        MemoryCacheService::new(self.size, Duration::from_secs(self.ttl))
    }
}

/// Cache keys are case-insensitive and never carry the trailing dot of an
/// absolute name.
fn canonical(name: &str) -> String {
    name.trim_end_matches('.').to_lowercase()
}

/// Three independent TTL-bounded stores: resolved addresses, nameserver sets
/// per zone, and glue addresses. Entries expire lazily: a read past the
/// deadline evicts and misses.
pub struct MemoryCacheService {
    ttl: Duration,
    addresses: Cache<String, (SystemTime, Ipv4Addr)>,
    nameservers: Cache<String, (SystemTime, Vec<String>)>,
    glue: Cache<String, (SystemTime, Ipv4Addr)>,
}

impl MemoryCacheService {
    fn new(size: u64, ttl: Duration) -> Self {
        Self {
            ttl,
            addresses: Cache::new(size),
            nameservers: Cache::new(size),
            glue: Cache::new(size),
        }
    }

    fn deadline(&self) -> SystemTime {
        SystemTime::now().add(self.ttl)
    }

    async fn fetch<V>(store: &Cache<String, (SystemTime, V)>, key: String) -> Option<V>
    where
        V: Clone + Send + Sync + 'static,
    {
        let (deadline, value) = store.get(&key)?;
        if deadline.duration_since(SystemTime::now()).is_ok() {
            Some(value)
        } else {
            tracing::debug!("{key} found but expired");
            store.invalidate(&key).await;
            None
        }
    }

    #[tracing::instrument(skip(self))]
    pub async fn address(&self, qname: &str) -> Option<Ipv4Addr> {
        Self::fetch(&self.addresses, canonical(qname)).await
    }

    #[tracing::instrument(skip(self))]
    pub async fn store_address(&self, qname: &str, addr: Ipv4Addr) {
        self.addresses
            .insert(canonical(qname), (self.deadline(), addr))
            .await;
    }

    #[allow(dead_code)]
    pub async fn nameservers(&self, zone: &str) -> Option<Vec<String>> {
        Self::fetch(&self.nameservers, canonical(zone)).await
    }

    #[tracing::instrument(skip(self, hosts))]
    pub async fn store_nameservers(&self, zone: &str, hosts: Vec<String>) {
        self.nameservers
            .insert(canonical(zone), (self.deadline(), hosts))
            .await;
    }

    #[tracing::instrument(skip(self))]
    pub async fn glue(&self, key: &str) -> Option<Ipv4Addr> {
        Self::fetch(&self.glue, canonical(key)).await
    }

    #[tracing::instrument(skip(self))]
    pub async fn store_glue(&self, key: &str, addr: Ipv4Addr) {
        self.glue
            .insert(canonical(key), (self.deadline(), addr))
            .await;
    }
}
