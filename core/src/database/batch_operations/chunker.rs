use std::slice::Chunks;

use crate::database::batch_operations::BulkUpsertError;

/// Splits records into consecutive chunks of at most `chunk_size`, preserving order.
///
/// An empty slice yields no chunks. A zero chunk size is rejected.
pub fn split_records<T>(records: &[T], chunk_size: usize) -> Result<Chunks<'_, T>, BulkUpsertError> {
    if chunk_size == 0 {
        return Err(BulkUpsertError::InvalidChunkSize(chunk_size));
    }

    Ok(records.chunks(chunk_size))
}
