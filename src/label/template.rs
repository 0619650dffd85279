//! Saved label templates.
//!
//! At most one template is the default. Marking a template as default clears
//! the flag on every other template in the same write.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

use super::settings::LabelSettings;
use crate::error::{LabelkitError, Result};
use crate::storage::{SettingsStore, SettingsStoreExt};

const STORE_KEY: &str = "label_templates";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelTemplate {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub config: LabelSettings,
    #[serde(default)]
    pub is_default: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields a caller supplies when creating or updating a template.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TemplateInput {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub config: LabelSettings,
    #[serde(default)]
    pub is_default: bool,
}

/// The template collection, persisted as one document.
pub struct TemplateStore {
    store: Arc<dyn SettingsStore>,
    templates: Vec<LabelTemplate>,
}

impl TemplateStore {
    /// Load the collection from `store`, starting empty when nothing is saved.
    pub fn load(store: Arc<dyn SettingsStore>) -> Result<Self> {
        let templates = store.load::<Vec<LabelTemplate>>(STORE_KEY)?.unwrap_or_default();
        Ok(Self { store, templates })
    }

    pub fn list(&self) -> &[LabelTemplate] {
        &self.templates
    }

    pub fn get(&self, id: &str) -> Option<&LabelTemplate> {
        self.templates.iter().find(|t| t.id == id)
    }

    pub fn default_template(&self) -> Option<&LabelTemplate> {
        self.templates.iter().find(|t| t.is_default)
    }

    /// Create a template. The first template in an empty collection becomes
    /// the default.
    pub fn create(&mut self, input: TemplateInput) -> Result<LabelTemplate> {
        validate(&input)?;
        let now = Utc::now();
        let make_default = input.is_default || self.templates.is_empty();
        let template = LabelTemplate {
            id: uuid::Uuid::new_v4().to_string(),
            name: input.name.trim().to_string(),
            description: input.description,
            config: input.config,
            is_default: false,
            created_at: now,
            updated_at: now,
        };
        let id = template.id.clone();
        self.templates.push(template);
        if make_default {
            self.mark_default(&id, now);
        }
        self.persist()?;
        info!(id = %id, "created label template");
        self.get(&id)
            .cloned()
            .ok_or_else(|| LabelkitError::NotFound(format!("template {id}")))
    }

    pub fn update(&mut self, id: &str, input: TemplateInput) -> Result<LabelTemplate> {
        validate(&input)?;
        let now = Utc::now();
        let template = self
            .templates
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| LabelkitError::NotFound(format!("template {id}")))?;
        template.name = input.name.trim().to_string();
        template.description = input.description;
        template.config = input.config;
        template.updated_at = now;
        if input.is_default {
            self.mark_default(id, now);
        }
        self.persist()?;
        self.get(id)
            .cloned()
            .ok_or_else(|| LabelkitError::NotFound(format!("template {id}")))
    }

    /// Delete a template. Deleting the default leaves no default.
    pub fn delete(&mut self, id: &str) -> Result<LabelTemplate> {
        let idx = self
            .templates
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| LabelkitError::NotFound(format!("template {id}")))?;
        let removed = self.templates.remove(idx);
        self.persist()?;
        Ok(removed)
    }

    /// Make `id` the only default template.
    pub fn set_default(&mut self, id: &str) -> Result<&LabelTemplate> {
        if self.get(id).is_none() {
            return Err(LabelkitError::NotFound(format!("template {id}")));
        }
        self.mark_default(id, Utc::now());
        self.persist()?;
        self.default_template()
            .ok_or_else(|| LabelkitError::NotFound(format!("template {id}")))
    }

    fn mark_default(&mut self, id: &str, now: DateTime<Utc>) {
        for t in &mut self.templates {
            let should_be_default = t.id == id;
            if t.is_default != should_be_default {
                t.is_default = should_be_default;
                t.updated_at = now;
            }
        }
    }

    fn persist(&self) -> Result<()> {
        self.store.save(STORE_KEY, &self.templates)
    }
}

fn validate(input: &TemplateInput) -> Result<()> {
    if input.name.trim().is_empty() {
        return Err(LabelkitError::InvalidInput("template name is required".into()));
    }
    input.config.validate()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn input(name: &str) -> TemplateInput {
        TemplateInput {
            name: name.into(),
            ..Default::default()
        }
    }

    fn store() -> TemplateStore {
        TemplateStore::load(Arc::new(MemoryStore::new())).unwrap()
    }

    fn default_count(s: &TemplateStore) -> usize {
        s.list().iter().filter(|t| t.is_default).count()
    }

    #[test]
    fn test_first_template_is_default() {
        let mut s = store();
        let first = s.create(input("Shelf")).unwrap();
        let second = s.create(input("Jar")).unwrap();
        assert!(first.is_default);
        assert!(!second.is_default);
        assert_eq!(default_count(&s), 1);
    }

    #[test]
    fn test_set_default_is_exclusive() {
        let mut s = store();
        let a = s.create(input("A")).unwrap();
        let b = s.create(input("B")).unwrap();
        let c = s.create(input("C")).unwrap();

        let chosen = s.set_default(&c.id).unwrap();
        assert_eq!(chosen.id, c.id);
        assert_eq!(default_count(&s), 1);
        assert!(!s.get(&a.id).unwrap().is_default);

        s.set_default(&b.id).unwrap();
        assert_eq!(default_count(&s), 1);
        assert_eq!(s.default_template().unwrap().id, b.id);
    }

    #[test]
    fn test_create_as_default_clears_others() {
        let mut s = store();
        s.create(input("A")).unwrap();
        let b = s
            .create(TemplateInput {
                is_default: true,
                ..input("B")
            })
            .unwrap();
        assert!(b.is_default);
        assert_eq!(default_count(&s), 1);
    }

    #[test]
    fn test_update_and_delete() {
        let mut s = store();
        let a = s.create(input("A")).unwrap();
        let updated = s
            .update(
                &a.id,
                TemplateInput {
                    description: "small jars".into(),
                    ..input("A2")
                },
            )
            .unwrap();
        assert_eq!(updated.name, "A2");
        assert_eq!(updated.description, "small jars");
        assert!(updated.updated_at >= a.updated_at);

        s.delete(&a.id).unwrap();
        assert!(s.list().is_empty());
        assert!(s.default_template().is_none());
        assert!(matches!(s.delete(&a.id), Err(LabelkitError::NotFound(_))));
    }

    #[test]
    fn test_validation() {
        let mut s = store();
        assert!(s.create(input("  ")).is_err());
        assert!(s.set_default("missing").is_err());
    }

    #[test]
    fn test_persisted_across_loads() {
        let backing: Arc<dyn SettingsStore> = Arc::new(MemoryStore::new());
        let mut s = TemplateStore::load(backing.clone()).unwrap();
        let a = s.create(input("A")).unwrap();
        let b = s.create(input("B")).unwrap();
        s.set_default(&b.id).unwrap();

        let reloaded = TemplateStore::load(backing).unwrap();
        assert_eq!(reloaded.list().len(), 2);
        assert_eq!(reloaded.default_template().unwrap().id, b.id);
        assert!(!reloaded.get(&a.id).unwrap().is_default);
    }
}
