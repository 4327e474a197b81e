//! Result persistence keyed by session id.
//!
//! An in-process map is the primary store; every write also goes through to
//! Redis (when configured) so results survive restarts and can be shared
//! between replicas. Reads check memory first and fall through to Redis,
//! backfilling memory on a hit. Redis failures degrade gracefully: the
//! service keeps working, it only loses durability.
//!
//! Key schema: `quiz:v1:result:{session_id}` — JSON-serialized
//! `AnalysisResult`, TTL from `RESULT_TTL_SECS`.

use std::collections::HashMap;

use tokio::sync::RwLock;
use tracing::warn;

use quiz_common::redis::RedisCache;

use crate::model::AnalysisResult;

const KEY_PREFIX: &str = "quiz:v1:";

pub struct ResultStore {
    memory: RwLock<HashMap<String, AnalysisResult>>,
    redis: RedisCache,
    ttl_secs: u64,
}

impl ResultStore {
    pub fn new(redis: RedisCache, ttl_secs: u64) -> Self {
        Self {
            memory: RwLock::new(HashMap::new()),
            redis,
            ttl_secs,
        }
    }

    /// Store a completed analysis under its session id.
    pub async fn put(&self, result: &AnalysisResult) {
        {
            let mut memory = self.memory.write().await;
            memory.insert(result.session_id.clone(), result.clone());
        }

        match serde_json::to_string(result) {
            Ok(json) => {
                self.redis
                    .set_with_ttl(&result_key(&result.session_id), &json, self.ttl_secs)
                    .await;
            }
            Err(e) => {
                warn!(error = %e, session_id = %result.session_id, "result serialization failed, not persisted");
            }
        }
    }

    /// Fetch a result by session id.
    pub async fn get(&self, session_id: &str) -> Option<AnalysisResult> {
        {
            let memory = self.memory.read().await;
            if let Some(result) = memory.get(session_id) {
                return Some(result.clone());
            }
        }

        let json = self.redis.get(&result_key(session_id)).await?;
        let result: AnalysisResult = serde_json::from_str(&json)
            .inspect_err(|e| warn!(error = %e, session_id, "stored result deserialization failed"))
            .ok()?;

        let mut memory = self.memory.write().await;
        memory.insert(session_id.to_string(), result.clone());
        Some(result)
    }
}

fn result_key(session_id: &str) -> String {
    format!("{KEY_PREFIX}result:{session_id}")
}
