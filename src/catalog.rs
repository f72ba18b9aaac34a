use crate::{ast, compile_map, options::MapConventions, TranslationResult};
use linked_hash_map::LinkedHashMap;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum Error {
    #[error("duplicate index definition name: {0}")]
    DuplicateIndexDefinition(String),
    #[error("index '{name}' failed to compile: {diagnostic}")]
    IndexCompilationFailed { name: String, diagnostic: String },
}

/// A named index definition: the map expression describing how each document
/// is projected into index fields.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexDefinition {
    pub name: String,
    pub map: ast::Expression,
}

/// The translated pipeline for one index definition.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledIndex {
    pub name: String,
    pub result: TranslationResult,
}

/// Explicit, statically enumerated registry of index definitions. Iteration
/// follows registration order; duplicate names are rejected at registration
/// time.
#[derive(Debug, Default)]
pub struct Catalog {
    definitions: LinkedHashMap<String, IndexDefinition>,
}

impl Catalog {
    pub fn new() -> Catalog {
        Catalog::default()
    }

    pub fn register(&mut self, definition: IndexDefinition) -> Result<()> {
        if self.definitions.contains_key(&definition.name) {
            return Err(Error::DuplicateIndexDefinition(definition.name));
        }
        self.definitions
            .insert(definition.name.clone(), definition);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&IndexDefinition> {
        self.definitions.get(name)
    }

    pub fn definitions(&self) -> impl Iterator<Item = &IndexDefinition> {
        self.definitions.values()
    }

    /// Compiles every registered definition with the provided conventions.
    /// Fails atomically on the first definition whose map cannot be
    /// translated; no partial list is returned.
    pub fn compile_all(&self, conventions: &MapConventions) -> Result<Vec<CompiledIndex>> {
        let mut compiled = Vec::with_capacity(self.definitions.len());
        for definition in self.definitions.values() {
            let result = compile_map(definition.map.clone(), conventions);
            if !result.success {
                return Err(Error::IndexCompilationFailed {
                    name: definition.name.clone(),
                    diagnostic: result.diagnostic.unwrap_or_default(),
                });
            }
            compiled.push(CompiledIndex {
                name: definition.name.clone(),
                result,
            });
        }
        Ok(compiled)
    }
}
