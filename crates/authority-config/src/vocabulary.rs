//! Controlled-vocabulary file loading.
//!
//! One CSV per vocabulary under the configured vocabularies directory,
//! named `<name>.csv`. Columns:
//!
//! - `id`: durable node identifier (the authority key)
//! - `parent`: id of the parent node, blank for a top concept
//! - `label`: display string
//! - `value`: stored value; defaults to `label` when blank
//! - `synonyms`: semicolon-separated aliases
//! - `entity`: linked entity type; read from the first row that sets it

use std::collections::BTreeMap;
use std::path::Path;

use csv::ReaderBuilder;

use crate::error::{ConfigError, Result};

/// One node of a vocabulary tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VocabularyNode {
    pub id: String,
    pub parent: Option<String>,
    pub label: String,
    pub value: String,
    pub synonyms: Vec<String>,
}

/// A loaded vocabulary: the node table plus the parent/child index.
#[derive(Debug, Clone)]
pub struct VocabularyFile {
    /// Vocabulary name (file stem).
    pub name: String,
    /// Linked entity type, if the file declares one.
    pub entity: Option<String>,
    nodes: BTreeMap<String, VocabularyNode>,
    /// Ids in file order, for stable enumeration and paging.
    order: Vec<String>,
    children: BTreeMap<String, Vec<String>>,
    top: Vec<String>,
}

impl VocabularyFile {
    /// Load `<name>.csv` and build the hierarchy index.
    pub fn load(path: &Path) -> Result<Self> {
        let name = path
            .file_stem()
            .and_then(|v| v.to_str())
            .unwrap_or("")
            .to_string();
        if name.is_empty() {
            return Err(ConfigError::InvalidVocabulary {
                path: path.to_path_buf(),
                message: "vocabulary file has no usable name".to_string(),
            });
        }

        let rows = read_csv_rows(path)?;

        let mut nodes: BTreeMap<String, VocabularyNode> = BTreeMap::new();
        let mut order: Vec<String> = Vec::new();
        let mut entity: Option<String> = None;

        for row in &rows {
            let id = get_field(row, "id");
            if id.is_empty() {
                return Err(ConfigError::InvalidVocabulary {
                    path: path.to_path_buf(),
                    message: "row with empty id".to_string(),
                });
            }
            if nodes.contains_key(&id) {
                return Err(ConfigError::InvalidVocabulary {
                    path: path.to_path_buf(),
                    message: format!("duplicate id: {id}"),
                });
            }

            let label = get_field(row, "label");
            if label.is_empty() {
                return Err(ConfigError::InvalidVocabulary {
                    path: path.to_path_buf(),
                    message: format!("node {id} has an empty label"),
                });
            }
            let value = match get_field(row, "value") {
                v if v.is_empty() => label.clone(),
                v => v,
            };
            let parent = get_optional(row, "parent");
            if entity.is_none() {
                entity = get_optional(row, "entity");
            }

            order.push(id.clone());
            nodes.insert(
                id.clone(),
                VocabularyNode {
                    id,
                    parent,
                    label,
                    value,
                    synonyms: parse_synonyms(&get_field(row, "synonyms")),
                },
            );
        }

        let mut children: BTreeMap<String, Vec<String>> = BTreeMap::new();
        let mut top: Vec<String> = Vec::new();
        for id in &order {
            let node = &nodes[id];
            match &node.parent {
                Some(parent) => {
                    if !nodes.contains_key(parent) {
                        return Err(ConfigError::InvalidVocabulary {
                            path: path.to_path_buf(),
                            message: format!("node {id} references unknown parent {parent}"),
                        });
                    }
                    children.entry(parent.clone()).or_default().push(id.clone());
                }
                None => top.push(id.clone()),
            }
        }

        tracing::debug!(vocabulary = %name, nodes = order.len(), "loaded vocabulary");
        Ok(Self {
            name,
            entity,
            nodes,
            order,
            children,
            top,
        })
    }

    /// Look up a node by id.
    pub fn get(&self, id: &str) -> Option<&VocabularyNode> {
        self.nodes.get(id)
    }

    /// All nodes in file order.
    pub fn nodes(&self) -> impl Iterator<Item = &VocabularyNode> {
        self.order.iter().filter_map(|id| self.nodes.get(id))
    }

    /// Ids of the parentless top concepts, in file order.
    pub fn top_ids(&self) -> &[String] {
        &self.top
    }

    /// Ids of the children of `id`, in file order.
    pub fn children_of(&self, id: &str) -> &[String] {
        self.children.get(id).map_or(&[], Vec::as_slice)
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// True when the vocabulary holds no nodes.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// Parse semicolon-separated synonyms.
fn parse_synonyms(raw: &str) -> Vec<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }
    trimmed
        .split(';')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn read_csv_rows(path: &Path) -> Result<Vec<BTreeMap<String, String>>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .map_err(|e| ConfigError::Csv {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    let headers = reader
        .headers()
        .map_err(|e| ConfigError::Csv {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?
        .clone();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| ConfigError::Csv {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let mut row = BTreeMap::new();
        for (idx, value) in record.iter().enumerate() {
            let key = headers
                .get(idx)
                .unwrap_or("")
                .trim_matches('\u{feff}')
                .to_string();
            row.insert(key, value.trim().to_string());
        }
        rows.push(row);
    }
    Ok(rows)
}

fn get_field(row: &BTreeMap<String, String>, key: &str) -> String {
    row.get(key).cloned().unwrap_or_default()
}

fn get_optional(row: &BTreeMap<String, String>, key: &str) -> Option<String> {
    row.get(key).filter(|v| !v.is_empty()).cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn fixture(name: &str) -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("tests/fixtures/vocabularies")
            .join(name)
    }

    #[test]
    fn loads_hierarchy() {
        let vocab = VocabularyFile::load(&fixture("srsc.csv")).expect("load srsc");
        assert_eq!(vocab.name, "srsc");
        assert_eq!(vocab.entity.as_deref(), Some("Subject"));

        let water = vocab.get("SCB14").expect("water node");
        assert_eq!(water.label, "Water");
        assert_eq!(water.value, "Water");
        assert!(water.synonyms.contains(&"Hydrology".to_string()));

        assert_eq!(vocab.top_ids(), ["SCB1", "SCB2"]);
        assert_eq!(vocab.children_of("SCB1"), ["SCB14", "SCB15"]);
        assert!(vocab.children_of("SCB14").is_empty());
    }

    #[test]
    fn value_defaults_to_label() {
        let vocab = VocabularyFile::load(&fixture("srsc.csv")).expect("load srsc");
        let node = vocab.get("SCB2").expect("top node");
        assert_eq!(node.value, node.label);
    }

    #[test]
    fn synonym_splitting() {
        assert_eq!(parse_synonyms("a; b ;;c"), vec!["a", "b", "c"]);
        assert!(parse_synonyms("  ").is_empty());
    }
}
