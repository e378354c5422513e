use anyhow::Result;

use crate::crawler::models::ListingRecord;

/// Write the whole result set as a pretty-printed (2-space) JSON array.
/// Single one-shot write; no incremental flushing.
pub async fn write_records(path: &str, records: &[ListingRecord]) -> Result<()> {
    let json = serde_json::to_string_pretty(records)?;
    tokio::fs::write(path, json).await?;
    Ok(())
}
