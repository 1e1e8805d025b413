use crate::application::ports::repositories::{
    Filter, FindOptions, Projection, Repository, Sort, SortDirection, UpdateOptions,
};
use crate::domain::entities::Entity;
use crate::shared::AppError;
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, Utc};
use mongodb::bson::oid::ObjectId;
use serde_json::{Map, Value};
use std::cmp::Ordering;
use tokio::sync::RwLock;

/// Process-local repository with the same filter semantics as the MongoDB
/// one. Records keep insertion order unless a sort is given.
pub struct MemoryRepository<T: Entity> {
    records: RwLock<Vec<T>>,
}

impl<T: Entity> Default for MemoryRepository<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Entity> MemoryRepository<T> {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
        }
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn matches<T: Entity>(record: &T, json: &Value, filter: &Filter) -> bool {
    match filter {
        Filter::All => true,
        Filter::Id(id) => record.id().eq_ignore_ascii_case(id),
        Filter::Contains { field, needle } => match json.get(field.as_str()) {
            Some(Value::String(value)) => contains_ignore_case(value, needle),
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(Value::as_str)
                .any(|item| contains_ignore_case(item, needle)),
            _ => false,
        },
        Filter::Or(filters) => filters.iter().any(|filter| matches(record, json, filter)),
    }
}

fn compare_values(left: Option<&Value>, right: Option<&Value>) -> Ordering {
    match (left, right) {
        (Some(Value::String(a)), Some(Value::String(b))) => {
            match (
                DateTime::<FixedOffset>::parse_from_rfc3339(a),
                DateTime::<FixedOffset>::parse_from_rfc3339(b),
            ) {
                (Ok(a), Ok(b)) => a.cmp(&b),
                _ => a.cmp(b),
            }
        }
        (Some(Value::Number(a)), Some(Value::Number(b))) => a
            .as_f64()
            .partial_cmp(&b.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(Value::Bool(a)), Some(Value::Bool(b))) => a.cmp(b),
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        _ => Ordering::Equal,
    }
}

fn sort_rows<T>(rows: &mut [(T, Value)], sort: &Sort) {
    rows.sort_by(|(_, a), (_, b)| {
        let ordering = compare_values(a.get(sort.field.as_str()), b.get(sort.field.as_str()));
        match sort.direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    });
}

fn project(value: Value, projection: &Projection) -> Value {
    if projection.fields.is_empty() {
        return value;
    }
    match value {
        Value::Object(object) => Value::Object(
            object
                .into_iter()
                .filter(|(key, _)| key == "id" || projection.fields.iter().any(|f| f == key))
                .collect::<Map<String, Value>>(),
        ),
        other => other,
    }
}

impl<T: Entity> MemoryRepository<T> {
    /// Matching records paired with their JSON form, sorted and windowed.
    async fn select(&self, filter: &Filter, options: &FindOptions) -> Result<Vec<(T, Value)>, AppError> {
        let records = self.records.read().await;
        let mut rows = Vec::new();
        for record in records.iter() {
            let json = serde_json::to_value(record)?;
            if matches(record, &json, filter) {
                rows.push((record.clone(), json));
            }
        }
        drop(records);

        if let Some(sort) = &options.sort {
            sort_rows(&mut rows, sort);
        }

        let skip = usize::try_from(options.skip.unwrap_or(0)).unwrap_or(usize::MAX);
        let limit = options
            .limit
            .map(|limit| usize::try_from(limit).unwrap_or(usize::MAX))
            .unwrap_or(usize::MAX);

        Ok(rows.into_iter().skip(skip).take(limit).collect())
    }

    fn position(records: &[T], filter: &Filter) -> Result<Option<usize>, AppError> {
        for (index, record) in records.iter().enumerate() {
            let json = serde_json::to_value(record)?;
            if matches(record, &json, filter) {
                return Ok(Some(index));
            }
        }
        Ok(None)
    }
}

#[async_trait]
impl<T: Entity> Repository<T> for MemoryRepository<T> {
    async fn create(&self, input: T::Create) -> Result<T, AppError> {
        let record = T::create(ObjectId::new().to_hex(), input, Utc::now())?;
        self.records.write().await.push(record.clone());
        Ok(record)
    }

    async fn find_one(&self, filter: &Filter, options: &FindOptions) -> Result<Option<T>, AppError> {
        let options = FindOptions {
            limit: Some(1),
            ..options.clone()
        };
        Ok(self
            .select(filter, &options)
            .await?
            .into_iter()
            .next()
            .map(|(record, _)| record))
    }

    async fn find_all(&self, filter: &Filter, options: &FindOptions) -> Result<Vec<T>, AppError> {
        Ok(self
            .select(filter, options)
            .await?
            .into_iter()
            .map(|(record, _)| record)
            .collect())
    }

    async fn find_projected(
        &self,
        filter: &Filter,
        projection: &Projection,
        options: &FindOptions,
    ) -> Result<Vec<Value>, AppError> {
        Ok(self
            .select(filter, options)
            .await?
            .into_iter()
            .map(|(_, json)| project(json, projection))
            .collect())
    }

    async fn find_one_and_update(
        &self,
        filter: &Filter,
        patch: &T::Patch,
        options: &UpdateOptions,
    ) -> Result<Option<T>, AppError> {
        let mut records = self.records.write().await;
        let Some(index) = Self::position(&records, filter)? else {
            return Ok(None);
        };

        let record = &mut records[index];
        let before = record.clone();
        record.apply(patch, Utc::now());

        Ok(Some(if options.return_new {
            record.clone()
        } else {
            before
        }))
    }

    async fn find_one_and_delete(&self, filter: &Filter) -> Result<Option<T>, AppError> {
        let mut records = self.records.write().await;
        let index = Self::position(&records, filter)?;
        Ok(index.map(|index| records.remove(index)))
    }

    async fn count(&self, filter: &Filter) -> Result<u64, AppError> {
        let rows = self.select(filter, &FindOptions::default()).await?;
        Ok(rows.len() as u64)
    }

    async fn delete_many(&self, filter: &Filter) -> Result<u64, AppError> {
        let mut records = self.records.write().await;
        let mut doomed = Vec::with_capacity(records.len());
        for record in records.iter() {
            let json = serde_json::to_value(record)?;
            doomed.push(matches(record, &json, filter));
        }

        let removed = doomed.iter().filter(|hit| **hit).count() as u64;
        let mut doomed = doomed.into_iter();
        records.retain(|_| !doomed.next().unwrap_or(false));
        Ok(removed)
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}
