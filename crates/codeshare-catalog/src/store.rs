//! Code-block types, the store trait, and the in-memory catalog.

use std::path::Path;

use async_trait::async_trait;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::CatalogError;

/// A starter exercise: a template the room starts from and its solution.
///
/// Serialized with the field names browser clients already expect
/// (`_id`, `initialTemplate`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeBlock {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub initial_template: String,
    pub solution: String,
}

/// A code block as written in a catalog file.
///
/// `_id` is optional. A block that carries one keeps it across restarts;
/// one without is given a fresh id at load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCodeBlock {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub initial_template: String,
    pub solution: String,
}

/// Read-only lookup of code blocks.
#[async_trait]
pub trait CodeBlockStore: Send + Sync + 'static {
    /// All code blocks, in catalog order.
    async fn list(&self) -> Result<Vec<CodeBlock>, CatalogError>;

    /// One code block by id.
    ///
    /// # Errors
    /// [`CatalogError::NotFound`] if no block has this id;
    /// [`CatalogError::Storage`] if the store itself failed.
    async fn get(&self, id: &str) -> Result<CodeBlock, CatalogError>;
}

/// An immutable, in-memory catalog.
#[derive(Debug, Clone, Default)]
pub struct MemoryCatalog {
    blocks: Vec<CodeBlock>,
}

impl MemoryCatalog {
    /// Builds a catalog, assigning a fresh id to each block without one.
    pub fn from_blocks(blocks: Vec<NewCodeBlock>) -> Self {
        let blocks = blocks
            .into_iter()
            .map(|b| CodeBlock {
                id: b.id.unwrap_or_else(generate_id),
                name: b.name,
                initial_template: b.initial_template,
                solution: b.solution,
            })
            .collect();
        Self { blocks }
    }

    /// Loads a JSON array of [`NewCodeBlock`]s from disk.
    pub fn from_json_file(path: &Path) -> Result<Self, CatalogError> {
        let raw = std::fs::read(path).map_err(|source| CatalogError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let blocks: Vec<NewCodeBlock> = serde_json::from_slice(&raw)?;
        tracing::info!(path = %path.display(), blocks = blocks.len(), "catalog loaded");
        Ok(Self::from_blocks(blocks))
    }

    /// The four starter exercises shipped with the server.
    pub fn seeded() -> Self {
        Self::from_blocks(vec![
            NewCodeBlock {
                id: None,
                name: "Async Case".into(),
                initial_template: "async function example() {\n  // your code here\n}".into(),
                solution: "async function example() {\n  try {\n    let result = await Promise.resolve('Success');\n    return result;\n  } catch (err) {\n    throw err;\n  }\n}".into(),
            },
            NewCodeBlock {
                id: None,
                name: "Callback Hell".into(),
                initial_template: "function callbackHell() {\n  // your code here\n}".into(),
                solution: "function callbackHell() {\n  setTimeout(() => {\n    console.log('Solved');\n  }, 1000);\n}".into(),
            },
            NewCodeBlock {
                id: None,
                name: "Promise Chain".into(),
                initial_template: "function promiseChain() {\n  // your code here\n}".into(),
                solution: "function promiseChain() {\n  Promise.resolve()\n    .then(() => console.log('Solved'));\n}".into(),
            },
            NewCodeBlock {
                id: None,
                name: "Event Loop Demo".into(),
                initial_template: "function eventLoopDemo() {\n  // your code here\n}".into(),
                solution: "function eventLoopDemo() {\n  console.log('Start');\n  setTimeout(() => {\n    console.log('End');\n  }, 0);\n  console.log('Middle');\n}".into(),
            },
        ])
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

#[async_trait]
impl CodeBlockStore for MemoryCatalog {
    async fn list(&self) -> Result<Vec<CodeBlock>, CatalogError> {
        Ok(self.blocks.clone())
    }

    async fn get(&self, id: &str) -> Result<CodeBlock, CatalogError> {
        self.blocks
            .iter()
            .find(|b| b.id == id)
            .cloned()
            .ok_or_else(|| CatalogError::NotFound(id.to_owned()))
    }
}

/// A random 24-character lowercase hex id (96 bits).
fn generate_id() -> String {
    let bytes: [u8; 12] = rand::rng().random();
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}
