use std::collections::BTreeMap;

use anyhow::Result;
use async_trait::async_trait;

use crate::context::ThreadContext;

/// Field name to raw value, as exchanged with the benchmark harness.
pub type FieldMap = BTreeMap<String, Vec<u8>>;

#[async_trait]
pub trait Client: Send + Sync + 'static {
    /// Prepare the context a worker passes to every later call
    fn init_thread(&self, ctx: ThreadContext, thread_id: usize, thread_count: usize)
        -> ThreadContext;

    /// Release whatever `init_thread` set up
    fn cleanup_thread(&self, ctx: &ThreadContext);

    /// Read a single record by key
    async fn read(
        &self,
        ctx: &ThreadContext,
        table: &str,
        key: &str,
        fields: &[String],
    ) -> Result<FieldMap>;

    /// Scan records starting from a key
    async fn scan(
        &self,
        ctx: &ThreadContext,
        table: &str,
        start_key: &str,
        count: usize,
        fields: &[String],
    ) -> Result<Vec<FieldMap>>;

    /// Update an existing record
    async fn update(
        &self,
        ctx: &ThreadContext,
        table: &str,
        key: &str,
        values: &FieldMap,
    ) -> Result<()>;

    /// Insert a new record
    async fn insert(
        &self,
        ctx: &ThreadContext,
        table: &str,
        key: &str,
        values: &FieldMap,
    ) -> Result<()>;

    /// Delete a record
    async fn delete(&self, ctx: &ThreadContext, table: &str, key: &str) -> Result<()>;

    /// Close the database once all workers are done
    async fn close(&self) -> Result<()>;
}
