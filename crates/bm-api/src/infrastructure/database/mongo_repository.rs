use crate::application::ports::repositories::{
    Filter, FindOptions, Projection, Repository, Sort, SortDirection, UpdateOptions,
};
use crate::domain::entities::Entity;
use crate::shared::AppError;
use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::oid::ObjectId;
use mongodb::bson::{doc, Bson, DateTime as BsonDateTime, Document};
use mongodb::options::{self, ReturnDocument};
use mongodb::{Collection, Database};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

/// Binds an entity to its MongoDB collection and stored document layout.
pub trait MongoModel: Entity {
    const COLLECTION: &'static str;

    type Document: Serialize + DeserializeOwned + Send + Sync + Unpin;

    /// Builds the document to insert, including its `_id` and timestamps.
    fn new_document(id: ObjectId, input: Self::Create, now: BsonDateTime) -> Self::Document;

    fn from_document(document: Self::Document) -> Result<Self, AppError>;

    /// Builds the update operators for `patch`.
    fn update_document(patch: &Self::Patch, now: BsonDateTime) -> Result<Document, AppError>;
}

pub struct MongoRepository<T: MongoModel> {
    database: Database,
    collection: Collection<T::Document>,
}

impl<T: MongoModel> MongoRepository<T> {
    pub fn new(database: &Database) -> Self {
        Self {
            database: database.clone(),
            collection: database.collection::<T::Document>(T::COLLECTION),
        }
    }

    pub fn collection_name(&self) -> &str {
        self.collection.name()
    }
}

/// Maps a filter field onto its stored name; `id` is the store's `_id`.
fn stored_field(field: &str) -> &str {
    if field == "id" {
        "_id"
    } else {
        field
    }
}

pub(crate) fn filter_to_document(filter: &Filter) -> Document {
    match filter {
        Filter::All => Document::new(),
        Filter::Id(id) => match ObjectId::parse_str(id) {
            Ok(object_id) => doc! { "_id": object_id },
            Err(_) => doc! { "_id": { "$in": [] } },
        },
        Filter::Contains { field, needle } => {
            let field = stored_field(field);
            doc! {
                field: {
                    "$regex": regex::escape(needle),
                    "$options": "i",
                }
            }
        }
        Filter::Or(filters) => {
            let clauses: Vec<Bson> = filters
                .iter()
                .map(|filter| Bson::Document(filter_to_document(filter)))
                .collect();
            doc! { "$or": clauses }
        }
    }
}

pub(crate) fn sort_to_document(sort: &Sort) -> Document {
    let direction = match sort.direction {
        SortDirection::Ascending => 1,
        SortDirection::Descending => -1,
    };
    let field = stored_field(&sort.field);
    doc! { field: direction }
}

pub(crate) fn projection_to_document(projection: &Projection) -> Document {
    let mut document = Document::new();
    for field in &projection.fields {
        document.insert(stored_field(field), 1);
    }
    document
}

fn find_options(options: &FindOptions) -> Result<options::FindOptions, AppError> {
    let mut find = options::FindOptions::default();
    find.sort = options.sort.as_ref().map(sort_to_document);
    find.skip = options.skip;
    find.limit = options
        .limit
        .map(i64::try_from)
        .transpose()
        .map_err(|err| AppError::validation(format!("limit out of range: {err}")))?;
    Ok(find)
}

/// Converts a stored document into the JSON shape the API exposes: `_id`
/// becomes a hex `id`, dates become RFC 3339 strings.
pub(crate) fn document_to_json(document: Document) -> Value {
    let mut object = Map::new();
    for (key, value) in document {
        if key == "_id" {
            object.insert("id".to_string(), bson_to_json(value));
        } else {
            object.insert(key, bson_to_json(value));
        }
    }
    Value::Object(object)
}

fn bson_to_json(value: Bson) -> Value {
    match value {
        Bson::ObjectId(id) => Value::String(id.to_hex()),
        Bson::DateTime(date) => date
            .try_to_rfc3339_string()
            .map(Value::String)
            .unwrap_or(Value::Null),
        Bson::Document(document) => document_to_json(document),
        Bson::Array(items) => Value::Array(items.into_iter().map(bson_to_json).collect()),
        other => other.into_relaxed_extjson(),
    }
}

#[async_trait]
impl<T: MongoModel> Repository<T> for MongoRepository<T> {
    async fn create(&self, input: T::Create) -> Result<T, AppError> {
        let document = T::new_document(ObjectId::new(), input, BsonDateTime::now());
        self.collection.insert_one(&document).await?;
        T::from_document(document)
    }

    async fn find_one(&self, filter: &Filter, options: &FindOptions) -> Result<Option<T>, AppError> {
        let mut find_one = options::FindOneOptions::default();
        find_one.sort = options.sort.as_ref().map(sort_to_document);
        find_one.skip = options.skip;

        self.collection
            .find_one(filter_to_document(filter))
            .with_options(find_one)
            .await?
            .map(T::from_document)
            .transpose()
    }

    async fn find_all(&self, filter: &Filter, options: &FindOptions) -> Result<Vec<T>, AppError> {
        let documents: Vec<T::Document> = self
            .collection
            .find(filter_to_document(filter))
            .with_options(find_options(options)?)
            .await?
            .try_collect()
            .await?;

        documents.into_iter().map(T::from_document).collect()
    }

    async fn find_projected(
        &self,
        filter: &Filter,
        projection: &Projection,
        options: &FindOptions,
    ) -> Result<Vec<Value>, AppError> {
        let mut find = find_options(options)?;
        find.projection = Some(projection_to_document(projection));

        let documents: Vec<Document> = self
            .collection
            .clone_with_type::<Document>()
            .find(filter_to_document(filter))
            .with_options(find)
            .await?
            .try_collect()
            .await?;

        Ok(documents.into_iter().map(document_to_json).collect())
    }

    async fn find_one_and_update(
        &self,
        filter: &Filter,
        patch: &T::Patch,
        options: &UpdateOptions,
    ) -> Result<Option<T>, AppError> {
        let update = T::update_document(patch, BsonDateTime::now())?;
        let return_document = if options.return_new {
            ReturnDocument::After
        } else {
            ReturnDocument::Before
        };

        self.collection
            .find_one_and_update(filter_to_document(filter), update)
            .return_document(return_document)
            .await?
            .map(T::from_document)
            .transpose()
    }

    async fn find_one_and_delete(&self, filter: &Filter) -> Result<Option<T>, AppError> {
        self.collection
            .find_one_and_delete(filter_to_document(filter))
            .await?
            .map(T::from_document)
            .transpose()
    }

    async fn count(&self, filter: &Filter) -> Result<u64, AppError> {
        Ok(self
            .collection
            .count_documents(filter_to_document(filter))
            .await?)
    }

    async fn delete_many(&self, filter: &Filter) -> Result<u64, AppError> {
        let result = self
            .collection
            .delete_many(filter_to_document(filter))
            .await?;
        Ok(result.deleted_count)
    }

    async fn ping(&self) -> Result<(), AppError> {
        bm_core::db::check_ready(&self.database)
            .await
            .map_err(|err| AppError::Database(err.to_string()))
    }
}
