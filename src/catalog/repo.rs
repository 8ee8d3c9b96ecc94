use std::collections::HashMap;

use anyhow::Context;
use async_trait::async_trait;
use serde::Serialize;
use sqlx::{FromRow, PgPool};

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct TrainerClass {
    pub id: String,
    #[serde(skip_serializing)]
    pub trainer_id: String,
    pub name: String,
    pub price: i32,
    /// Time-slot labels such as `"13:30–15:00"`.
    pub schedule: Vec<String>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Trainer {
    pub id: String,
    pub name: String,
    pub specialty: Option<String>,
    pub image_url: Option<String>,
    #[sqlx(skip)]
    pub classes: Vec<TrainerClass>,
}

/// Read-only reference data: trainers and the admin dashboard link.
#[async_trait]
pub trait Catalog: Send + Sync {
    async fn list_trainers(&self) -> anyhow::Result<Vec<Trainer>>;
    /// Most recently registered dashboard link, if any.
    async fn dashboard_link(&self) -> anyhow::Result<Option<String>>;
}

/// Attaches each class to its trainer, keeping trainer order.
pub fn group_classes(mut trainers: Vec<Trainer>, classes: Vec<TrainerClass>) -> Vec<Trainer> {
    let index: HashMap<String, usize> = trainers
        .iter()
        .enumerate()
        .map(|(i, t)| (t.id.clone(), i))
        .collect();
    for class in classes {
        if let Some(&i) = index.get(&class.trainer_id) {
            trainers[i].classes.push(class);
        }
    }
    trainers
}

#[derive(Clone)]
pub struct PgCatalog {
    db: PgPool,
}

impl PgCatalog {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl Catalog for PgCatalog {
    async fn list_trainers(&self) -> anyhow::Result<Vec<Trainer>> {
        let trainers = sqlx::query_as::<_, Trainer>(
            r#"
            SELECT id, name, specialty, image_url
            FROM trainers
            ORDER BY name ASC
            "#,
        )
        .fetch_all(&self.db)
        .await
        .context("list trainers")?;

        let classes = sqlx::query_as::<_, TrainerClass>(
            r#"
            SELECT id, trainer_id, name, price, schedule
            FROM trainer_classes
            ORDER BY trainer_id, name
            "#,
        )
        .fetch_all(&self.db)
        .await
        .context("list trainer classes")?;

        Ok(group_classes(trainers, classes))
    }

    async fn dashboard_link(&self) -> anyhow::Result<Option<String>> {
        let link = sqlx::query_scalar::<_, String>(
            r#"
            SELECT link
            FROM dashboard_links
            ORDER BY created_at DESC
            LIMIT 1
            "#,
        )
        .fetch_optional(&self.db)
        .await
        .context("latest dashboard link")?;
        Ok(link)
    }
}
