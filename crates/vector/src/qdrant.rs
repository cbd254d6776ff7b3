//! Qdrant-backed [`MemoryIndex`].

use async_trait::async_trait;
use companion_chat_core::{MemoryEntry, MemoryFilter, MemoryHit};
use qdrant_client::Qdrant;
use qdrant_client::qdrant::point_id::PointIdOptions;
use qdrant_client::qdrant::{
    Condition, CreateCollectionBuilder, CreateFieldIndexCollectionBuilder, Distance, FieldType,
    Filter, PointId, PointStruct, SearchPointsBuilder, UpsertPointsBuilder, VectorParamsBuilder,
};
use tracing::{debug, info};

use crate::MemoryIndex;
use crate::error::IndexError;
use crate::payload::{entry_payload, split_payload};

pub const DEFAULT_COLLECTION: &str = "skyrim-memory";

/// Payload fields every query filters on.
const KEYWORD_FIELDS: [&str; 3] = ["user_id", "companion_id", "kind"];

/// Connection settings for the vector collection.
#[derive(Debug, Clone)]
pub struct QdrantConfig {
    pub url: String,
    pub api_key: Option<String>,
    pub collection: String,
    pub dimension: u64,
}

pub struct QdrantIndex {
    client: Qdrant,
    collection: String,
    dimension: u64,
}

impl QdrantIndex {
    /// Build the client. No request is made until [`MemoryIndex::ensure_ready`].
    pub fn connect(config: QdrantConfig) -> Result<Self, IndexError> {
        debug!(url = %config.url, collection = %config.collection, "Connecting to Qdrant");
        let client = Qdrant::from_url(&config.url).api_key(config.api_key).build()?;
        Ok(Self { client, collection: config.collection, dimension: config.dimension })
    }

    #[must_use]
    pub fn collection(&self) -> &str {
        &self.collection
    }

    fn check_dimension(&self, embedding: &[f32]) -> Result<(), IndexError> {
        if u64::try_from(embedding.len()).ok() == Some(self.dimension) {
            Ok(())
        } else {
            Err(IndexError::DimensionMismatch { expected: self.dimension, got: embedding.len() })
        }
    }
}

fn to_filter(filter: &MemoryFilter) -> Filter {
    Filter::must(
        filter
            .conditions
            .iter()
            .map(|(key, value)| Condition::matches(key.as_str(), value.clone()))
            .collect::<Vec<_>>(),
    )
}

fn point_id_string(id: Option<PointId>) -> String {
    match id.and_then(|p| p.point_id_options) {
        Some(PointIdOptions::Uuid(uuid)) => uuid,
        Some(PointIdOptions::Num(num)) => num.to_string(),
        None => String::new(),
    }
}

#[async_trait]
impl MemoryIndex for QdrantIndex {
    async fn ensure_ready(&self) -> Result<(), IndexError> {
        if self.client.collection_exists(&self.collection).await? {
            debug!(collection = %self.collection, "Collection already exists");
            return Ok(());
        }

        info!(collection = %self.collection, dimension = self.dimension, "Creating collection");
        self.client
            .create_collection(
                CreateCollectionBuilder::new(&self.collection)
                    .vectors_config(VectorParamsBuilder::new(self.dimension, Distance::Cosine)),
            )
            .await?;

        for field in KEYWORD_FIELDS {
            self.client
                .create_field_index(CreateFieldIndexCollectionBuilder::new(
                    &self.collection,
                    field,
                    FieldType::Keyword,
                ))
                .await?;
        }
        Ok(())
    }

    async fn upsert(&self, entries: Vec<MemoryEntry>) -> Result<(), IndexError> {
        if entries.is_empty() {
            return Ok(());
        }
        let mut points = Vec::with_capacity(entries.len());
        for entry in entries {
            self.check_dimension(&entry.embedding)?;
            let payload = entry_payload(entry.document, entry.metadata);
            points.push(PointStruct::new(entry.id, entry.embedding, payload));
        }

        let count = points.len();
        self.client
            .upsert_points(UpsertPointsBuilder::new(&self.collection, points).wait(true))
            .await?;
        debug!(count, collection = %self.collection, "Upserted memory points");
        Ok(())
    }

    async fn query(
        &self,
        embedding: &[f32],
        filter: &MemoryFilter,
        top_k: u64,
    ) -> Result<Vec<MemoryHit>, IndexError> {
        self.check_dimension(embedding)?;
        if top_k == 0 {
            return Ok(Vec::new());
        }

        let response = self
            .client
            .search_points(
                SearchPointsBuilder::new(&self.collection, embedding.to_vec(), top_k)
                    .filter(to_filter(filter))
                    .with_payload(true),
            )
            .await?;

        Ok(response
            .result
            .into_iter()
            .map(|point| {
                let (content, metadata) = split_payload(point.payload);
                MemoryHit {
                    id: point_id_string(point.id),
                    content,
                    metadata,
                    distance: 1.0 - point.score,
                }
            })
            .collect())
    }
}
