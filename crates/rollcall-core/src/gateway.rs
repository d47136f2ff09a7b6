//! Object store gateway: candidate uploads and folder listings.

use crate::service::{ObjectStore, ServiceError};
use crate::types::object_key;

pub struct ObjectGateway<S> {
    store: S,
}

impl<S: ObjectStore> ObjectGateway<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Upload `data` as `{folder}/{filename}` and return the key.
    ///
    /// Transport failures are logged and reported as `None`.
    pub async fn upload(
        &self,
        data: Vec<u8>,
        filename: &str,
        bucket: &str,
        folder: &str,
    ) -> Option<String> {
        let key = object_key(folder, filename);
        let size = data.len();
        match self.store.put_object(bucket, &key, data).await {
            Ok(()) => {
                tracing::info!(bucket, key = %key, size, "uploaded image");
                Some(key)
            }
            Err(e) => {
                tracing::error!(error = %e, bucket, key = %key, "upload failed");
                None
            }
        }
    }

    /// All object keys under `{folder}/`, in listing order.
    pub async fn list(&self, bucket: &str, folder: &str) -> Result<Vec<String>, ServiceError> {
        let prefix = format!("{}/", folder.trim_end_matches('/'));
        let keys = self.store.list_objects(bucket, &prefix).await?;
        tracing::debug!(bucket, prefix = %prefix, count = keys.len(), "listed objects");
        Ok(keys)
    }
}
