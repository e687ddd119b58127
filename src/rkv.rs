use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Serialize;
use tracing::debug;

use crate::client::{Client, FieldMap};
use crate::config::{Endpoint, Properties, RkvConfig};
use crate::context::ThreadContext;
use crate::error::{RkvError, RkvResult};
use crate::retry::RetryingTransport;
use crate::transport::{PreparedRequest, ReqwestTransport, Transport};

pub const NAME: &str = "rkv";

#[derive(Serialize)]
struct KvBody<'a> {
    key: &'a str,
    value: String,
}

/// Benchmark client for the rkv HTTP key-value store.
#[derive(Clone)]
pub struct RkvClient {
    endpoint: Endpoint,
    transport: RetryingTransport,
}

impl RkvClient {
    pub fn new(config: RkvConfig) -> RkvResult<Self> {
        let transport = ReqwestTransport::new(&config)?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    pub fn from_properties(props: &Properties) -> RkvResult<Self> {
        Self::new(RkvConfig::from_properties(props)?)
    }

    pub fn with_transport(config: RkvConfig, transport: Arc<dyn Transport>) -> Self {
        Self {
            endpoint: config.endpoint,
            transport: RetryingTransport::new(transport, config.retry),
        }
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    async fn exchange(
        &self,
        ctx: &ThreadContext,
        request: PreparedRequest,
        expected: StatusCode,
    ) -> RkvResult<()> {
        let reply = self.transport.execute(ctx, &request).await?;
        if reply.status != expected {
            debug!(
                method = %request.method,
                url = %request.url,
                status = %reply.status,
                "unexpected status"
            );
            return Err(RkvError::Protocol {
                expected,
                actual: reply.status,
            });
        }
        Ok(())
    }

    async fn read_record(
        &self,
        ctx: &ThreadContext,
        key: &str,
        fields: &[String],
    ) -> RkvResult<FieldMap> {
        let request = PreparedRequest::get(self.endpoint.key_url(key));
        self.exchange(ctx, request, StatusCode::ACCEPTED).await?;

        Ok(fields
            .iter()
            .map(|field| (field.clone(), Vec::new()))
            .collect())
    }

    async fn write_record(
        &self,
        ctx: &ThreadContext,
        key: &str,
        values: &FieldMap,
    ) -> RkvResult<()> {
        let body = serde_json::to_vec(&KvBody {
            key,
            value: render_values(values),
        })?;
        let request = PreparedRequest::post_json(self.endpoint.kv_url(), body);
        self.exchange(ctx, request, StatusCode::CREATED).await
    }

    async fn delete_record(&self, ctx: &ThreadContext, key: &str) -> RkvResult<()> {
        let request = PreparedRequest::delete(self.endpoint.key_url(key));
        self.exchange(ctx, request, StatusCode::ACCEPTED).await
    }
}

/// Flattens a field map into the single string the store keeps per key,
/// e.g. `map[f1:[118 49] f2:[]]`. Field boundaries do not survive a round
/// trip through the store.
pub fn render_values(values: &FieldMap) -> String {
    let mut out = String::from("map[");
    for (i, (field, bytes)) in values.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        out.push_str(field);
        out.push_str(":[");
        for (j, byte) in bytes.iter().enumerate() {
            if j > 0 {
                out.push(' ');
            }
            out.push_str(&byte.to_string());
        }
        out.push(']');
    }
    out.push(']');
    out
}

#[async_trait]
impl Client for RkvClient {
    fn init_thread(
        &self,
        ctx: ThreadContext,
        thread_id: usize,
        thread_count: usize,
    ) -> ThreadContext {
        ctx.for_thread(thread_id, thread_count)
    }

    fn cleanup_thread(&self, _ctx: &ThreadContext) {}

    async fn read(
        &self,
        ctx: &ThreadContext,
        _table: &str,
        key: &str,
        fields: &[String],
    ) -> Result<FieldMap> {
        Ok(self.read_record(ctx, key, fields).await?)
    }

    async fn scan(
        &self,
        _ctx: &ThreadContext,
        _table: &str,
        _start_key: &str,
        _count: usize,
        _fields: &[String],
    ) -> Result<Vec<FieldMap>> {
        Err(RkvError::Unsupported { operation: "scan" }.into())
    }

    async fn update(
        &self,
        ctx: &ThreadContext,
        _table: &str,
        key: &str,
        values: &FieldMap,
    ) -> Result<()> {
        Ok(self.write_record(ctx, key, values).await?)
    }

    async fn insert(
        &self,
        ctx: &ThreadContext,
        _table: &str,
        key: &str,
        values: &FieldMap,
    ) -> Result<()> {
        Ok(self.write_record(ctx, key, values).await?)
    }

    async fn delete(&self, ctx: &ThreadContext, _table: &str, key: &str) -> Result<()> {
        Ok(self.delete_record(ctx, key).await?)
    }

    async fn close(&self) -> Result<()> {
        Ok(())
    }
}
