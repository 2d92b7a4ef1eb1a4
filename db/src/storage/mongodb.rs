use async_trait::async_trait;
use bson::Bson;
use futures::TryStreamExt;
use mongodb::{
    Client, Database, IndexModel,
    bson::doc,
    error::{ErrorKind, WriteFailure},
    options::{FindOptions, IndexOptions},
};
use tracing::{debug, info};
use vouch_common::params::PaginationParams;

use crate::{
    models::DbCertificate,
    storage::{CertificateFilter, CertificateStore, Storage, StoreError},
};

const DUPLICATE_KEY: i32 = 11000;

#[derive(Debug)]
pub struct MongoDBStorage(Client);

impl MongoDBStorage {
    pub async fn new(uri: &str) -> Result<Self, mongodb::error::Error> {
        let client = Client::with_uri_str(uri).await?;
        Ok(Self(client))
    }

    fn get_db(&self) -> Database {
        self
            .0
            .default_database()
            .unwrap_or_else(|| self.0.database("certificate_db"))
    }

    /// Create the indexes the store relies on. Safe to run on every start.
    pub async fn migrate(&self) -> Result<(), StoreError> {
        let index = IndexModel::builder()
            .keys(doc! { "verification_id": 1 })
            .options(
                IndexOptions::builder()
                    .name("verification_id_unique".to_string())
                    .unique(true)
                    .build(),
            )
            .build();

        self.get_db()
            .collection::<DbCertificate>(MONGODB_COLLECTION_CERTIFICATES)
            .create_index(index)
            .await?;

        info!("Ensured unique verification_id index");
        Ok(())
    }
}

pub const MONGODB_COLLECTION_CERTIFICATES: &str = "certificates";

fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    matches!(
        err.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(e)) if e.code == DUPLICATE_KEY
    )
}

#[async_trait]
impl Storage for MongoDBStorage {
    async fn ping(&self) -> Result<(), StoreError> {
        self.get_db().run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }
}

#[async_trait]
impl CertificateStore for MongoDBStorage {
    async fn create(&self, cert: DbCertificate) -> Result<DbCertificate, StoreError> {
        let collection = self
            .get_db()
            .collection::<DbCertificate>(MONGODB_COLLECTION_CERTIFICATES);

        match collection.insert_one(&cert).await {
            Ok(_) => {
                debug!(verification_id = %cert.verification_id, "Inserted certificate");
                Ok(cert)
            }
            Err(e) if is_duplicate_key(&e) => {
                Err(StoreError::DuplicateVerificationId(cert.verification_id))
            }
            Err(e) => Err(StoreError::MongoDB(e)),
        }
    }

    async fn list(
        &self,
        filter: CertificateFilter,
        pagination: PaginationParams,
    ) -> Result<Vec<DbCertificate>, StoreError> {
        let collection = self
            .get_db()
            .collection::<DbCertificate>(MONGODB_COLLECTION_CERTIFICATES);

        let find_options = FindOptions::builder()
            .sort(doc! { "created_at": 1, "_id": 1 })
            .skip(pagination.offset())
            .limit(pagination.limit() as i64);

        let mut filter_doc = doc! {};
        if let Some(ids) = filter.id {
            let ids: Vec<Bson> = ids.into_iter().map(Bson::from).collect();
            filter_doc.insert("_id", doc! { "$in": ids });
        }
        if let Some(vids) = filter.verification_id {
            let vids: Vec<String> = vids.iter().map(ToString::to_string).collect();
            filter_doc.insert("verification_id", doc! { "$in": vids });
        }
        if let Some(role) = filter.role {
            filter_doc.insert("role", role);
        }

        collection
            .find(filter_doc)
            .with_options(find_options.build())
            .await?
            .try_collect()
            .await
            .map_err(StoreError::MongoDB)
    }
}
