use refgraph_core::catalog::RecordingCatalog;
use refgraph_core::commands::Outcome;
use refgraph_core::versions::{first_versions, last_versions};
use refgraph_core::{
    apply, create_item, Appstructs, Command, Content, EngineConfig, Environment, FieldValue,
    ItemHandle, Oid, RecordingSink, ResourceType, Result, Sheet, Transaction,
};

/// Committed content plus recording collaborators
#[allow(dead_code)]
pub struct Harness {
    pub config: EngineConfig,
    pub events: RecordingSink,
    pub catalog: RecordingCatalog,
    pub content: Content,
}

#[allow(dead_code)]
impl Harness {
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            config,
            events: RecordingSink::new(),
            catalog: RecordingCatalog::new(),
            content: Content::new(),
        }
    }

    pub fn root(&self) -> Oid {
        self.content.root()
    }

    /// Run `f` in a transaction; commit on success, discard on error
    pub fn run<T, F>(&mut self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Transaction<'_>) -> Result<T>,
    {
        let mut tx = Transaction::begin(
            self.content.clone(),
            Environment::new(&self.config, &mut self.events, &mut self.catalog),
        );
        let value = f(&mut tx)?;
        let (content, _changelog) = tx.commit();
        self.content = content;
        Ok(value)
    }

    /// Apply a command through the functional boundary
    pub fn apply(&mut self, cmd: Command) -> Result<Outcome> {
        let applied = apply(
            self.content.clone(),
            cmd,
            Environment::new(&self.config, &mut self.events, &mut self.catalog),
        )?;
        self.content = applied.content;
        Ok(applied.outcome)
    }

    pub fn item(&mut self, name: &str, item_type: ResourceType, version: Appstructs) -> ItemHandle {
        let root = self.root();
        self.run(|tx| create_item(tx, root, Some(name), item_type, &Appstructs::new(), &version))
            .unwrap()
    }

    pub fn paragraph(&mut self, name: &str, text: &str) -> ItemHandle {
        self.item(
            name,
            ResourceType::Paragraph,
            sheet(Sheet::Paragraph, &[("text", text_value(text))]),
        )
    }

    pub fn document(&mut self, name: &str, elements: &[Oid]) -> ItemHandle {
        self.item(
            name,
            ResourceType::Document,
            sheet(
                Sheet::Document,
                &[("title", text_value(name)), ("elements", refs(elements))],
            ),
        )
    }

    pub fn first(&self, item: Oid) -> Vec<Oid> {
        first_versions(&self.content, item, &self.config.versions.first_tag)
    }

    pub fn last(&self, item: Oid) -> Vec<Oid> {
        last_versions(&self.content, item, &self.config.versions.last_tag)
    }
}

#[allow(dead_code)]
pub fn refs(oids: &[Oid]) -> FieldValue {
    FieldValue::References(oids.to_vec())
}

#[allow(dead_code)]
pub fn text_value(text: &str) -> FieldValue {
    FieldValue::Value(serde_json::Value::String(text.to_string()))
}

/// Appstructs holding one sheet
#[allow(dead_code)]
pub fn sheet(sheet: Sheet, fields: &[(&str, FieldValue)]) -> Appstructs {
    let data = fields
        .iter()
        .map(|(field, value)| (field.to_string(), value.clone()))
        .collect();
    let mut appstructs = Appstructs::new();
    appstructs.insert(sheet, data);
    appstructs
}

#[allow(dead_code)]
pub fn oids(raw: &[u64]) -> Vec<Oid> {
    raw.iter().copied().map(Oid::new).collect()
}
