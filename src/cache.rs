use std::fmt;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::lookup::IpRecord;

#[derive(Debug)]
pub enum CacheError {
    Storage(sled::Error),
    Encode(serde_json::Error),
}

impl fmt::Display for CacheError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheError::Storage(e) => write!(f, "cache storage error: {e}"),
            CacheError::Encode(e) => write!(f, "cache encode error: {e}"),
        }
    }
}

impl From<sled::Error> for CacheError {
    fn from(e: sled::Error) -> Self {
        CacheError::Storage(e)
    }
}

impl From<serde_json::Error> for CacheError {
    fn from(e: serde_json::Error) -> Self {
        CacheError::Encode(e)
    }
}

#[derive(Serialize, Deserialize)]
struct CachedRecord {
    expires_at: i64,
    record: IpRecord,
}

/// On-disk cache of lookup results keyed by address. Entries expire after
/// a fixed TTL; expired or undecodable entries are removed on read.
pub struct LookupCache {
    db: sled::Db,
    ttl: Duration,
}

impl LookupCache {
    pub fn open(path: &Path, ttl: Duration) -> Result<Self, CacheError> {
        let db = sled::open(path)?;
        Ok(Self { db, ttl })
    }

    pub fn get(&self, ip: &str) -> Result<Option<IpRecord>, CacheError> {
        let Some(bytes) = self.db.get(ip)? else {
            return Ok(None);
        };
        let cached: CachedRecord = match serde_json::from_slice(&bytes) {
            Ok(cached) => cached,
            Err(e) => {
                warn!("dropping undecodable cache entry for {ip}: {e}");
                self.db.remove(ip)?;
                return Ok(None);
            }
        };
        if cached.expires_at <= chrono::Utc::now().timestamp() {
            self.db.remove(ip)?;
            return Ok(None);
        }
        Ok(Some(cached.record))
    }

    pub fn put(&self, ip: &str, record: &IpRecord) -> Result<(), CacheError> {
        // clamp so an oversized configured TTL cannot wrap the expiry negative
        let ttl = i64::try_from(self.ttl.as_secs()).unwrap_or(i64::MAX);
        let cached = CachedRecord {
            expires_at: chrono::Utc::now().timestamp().saturating_add(ttl),
            record: record.clone(),
        };
        let bytes = serde_json::to_vec(&cached)?;
        self.db.insert(ip, bytes)?;
        Ok(())
    }
}
