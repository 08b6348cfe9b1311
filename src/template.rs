use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use crate::block::{Block, BlockContent, BlockType, RawBlock};
use crate::error::{DesignerError, DesignerResult};
use crate::page::Page;
use crate::validator::validate_content;

const BUILTIN_CATALOG: &str = include_str!("../templates/catalog.yaml");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateCategory {
    Intro,
    Columns,
    Content,
    Quiz,
    Media,
    Contact,
}

impl TemplateCategory {
    pub const ALL: [TemplateCategory; 6] = [
        TemplateCategory::Intro,
        TemplateCategory::Columns,
        TemplateCategory::Content,
        TemplateCategory::Quiz,
        TemplateCategory::Media,
        TemplateCategory::Contact,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            TemplateCategory::Intro => "Intro",
            TemplateCategory::Columns => "Columns",
            TemplateCategory::Content => "Content",
            TemplateCategory::Quiz => "Quiz",
            TemplateCategory::Media => "Media",
            TemplateCategory::Contact => "Contact",
        }
    }
}

impl fmt::Display for TemplateCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Category selector; `All` applies no filter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(TemplateCategory),
}

impl FromStr for CategoryFilter {
    type Err = DesignerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("all") {
            return Ok(CategoryFilter::All);
        }
        TemplateCategory::ALL
            .iter()
            .find(|c| c.label().eq_ignore_ascii_case(s))
            .map(|c| CategoryFilter::Only(*c))
            .ok_or_else(|| DesignerError::ValueOutOfRange {
                property: "category".to_string(),
                value: s.to_string(),
                range: std::iter::once("All")
                    .chain(TemplateCategory::ALL.iter().map(|c| c.label()))
                    .collect::<Vec<_>>()
                    .join(", "),
            })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateFilter {
    pub category: CategoryFilter,
    /// Case-insensitive substring of the template name
    pub search: Option<String>,
}

impl TemplateFilter {
    pub fn matches(&self, template: &Template) -> bool {
        let category_ok = match self.category {
            CategoryFilter::All => true,
            CategoryFilter::Only(c) => template.category == c,
        };
        let search_ok = match self.search.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(needle) => template
                .name
                .to_lowercase()
                .contains(&needle.to_lowercase()),
        };
        category_ok && search_ok
    }
}

/// One block definition inside a template; carries no id
#[derive(Debug, Clone, PartialEq)]
pub struct Blueprint {
    pub content: BlockContent,
}

impl Blueprint {
    pub fn block_type(&self) -> BlockType {
        self.content.block_type()
    }
}

/// Immutable, named block-sequence blueprint
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    pub id: String,
    pub name: String,
    pub category: TemplateCategory,
    pub description: String,
    pub blueprint: Vec<Blueprint>,
}

impl Template {
    /// Append fresh copies of the blueprint to `page`, returning the new page.
    /// Ids never collide with the page's existing blocks; nested lists are
    /// deep copies so later edits never reach back into the catalog.
    pub fn instantiate(&self, page: &Page) -> Page {
        let mut out = page.clone();
        for entry in &self.blueprint {
            let id = out.fresh_block_id();
            out.blocks.push(Block::new(id, entry.content.clone()));
        }
        out
    }
}

#[derive(Deserialize)]
struct CatalogFile {
    templates: Vec<RawTemplate>,
}

#[derive(Deserialize)]
struct RawTemplate {
    id: String,
    name: String,
    category: TemplateCategory,
    #[serde(default)]
    description: String,
    blocks: Vec<RawBlock>,
}

/// Read-only library of templates, in catalog order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TemplateCatalog {
    templates: Vec<Template>,
}

impl TemplateCatalog {
    /// The catalog shipped with the crate, parsed once and shared
    pub fn builtin() -> &'static TemplateCatalog {
        static CATALOG: OnceLock<TemplateCatalog> = OnceLock::new();
        CATALOG.get_or_init(|| {
            TemplateCatalog::from_yaml(BUILTIN_CATALOG).expect("built-in template catalog is valid")
        })
    }

    pub fn from_yaml(yaml: &str) -> DesignerResult<Self> {
        let file: CatalogFile = serde_yaml::from_str(yaml)?;
        let mut seen = HashSet::new();
        let mut templates = Vec::with_capacity(file.templates.len());
        for raw in file.templates {
            if !seen.insert(raw.id.clone()) {
                return Err(DesignerError::ValidationError(format!(
                    "duplicate template id '{}'",
                    raw.id
                )));
            }
            let mut blueprint = Vec::with_capacity(raw.blocks.len());
            for block in raw.blocks {
                let content = block.into_content()?;
                validate_content(&content)?;
                blueprint.push(Blueprint { content });
            }
            templates.push(Template {
                id: raw.id,
                name: raw.name,
                category: raw.category,
                description: raw.description,
                blueprint,
            });
        }
        Ok(Self { templates })
    }

    pub fn templates(&self) -> &[Template] {
        &self.templates
    }

    pub fn get(&self, id: &str) -> DesignerResult<&Template> {
        self.templates
            .iter()
            .find(|t| t.id == id)
            .ok_or_else(|| DesignerError::TemplateNotFound { id: id.to_string() })
    }

    pub fn list_templates(&self, filter: &TemplateFilter) -> Vec<&Template> {
        self.templates.iter().filter(|t| filter.matches(t)).collect()
    }

    /// Categories that have at least one template, in category order
    pub fn categories(&self) -> Vec<TemplateCategory> {
        TemplateCategory::ALL
            .iter()
            .copied()
            .filter(|c| self.templates.iter().any(|t| t.category == *c))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog_loads() {
        let catalog = TemplateCatalog::builtin();
        assert!(catalog.templates().len() >= 10);
        assert_eq!(catalog.categories(), TemplateCategory::ALL.to_vec());
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let catalog = TemplateCatalog::builtin();
        let filter = TemplateFilter {
            search: Some("hero".to_string()),
            ..Default::default()
        };
        let found = catalog.list_templates(&filter);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, "intro-hero");
    }

    #[test]
    fn test_category_filter() {
        let catalog = TemplateCatalog::builtin();
        let filter = TemplateFilter {
            category: CategoryFilter::Only(TemplateCategory::Quiz),
            search: None,
        };
        let found = catalog.list_templates(&filter);
        assert!(!found.is_empty());
        assert!(found.iter().all(|t| t.category == TemplateCategory::Quiz));
        assert_eq!(
            catalog.list_templates(&TemplateFilter::default()).len(),
            catalog.templates().len()
        );
    }

    #[test]
    fn test_parse_category_filter() {
        assert_eq!("All".parse::<CategoryFilter>().unwrap(), CategoryFilter::All);
        assert_eq!(
            "contact".parse::<CategoryFilter>().unwrap(),
            CategoryFilter::Only(TemplateCategory::Contact)
        );
        assert!("footer".parse::<CategoryFilter>().is_err());
    }

    #[test]
    fn test_unknown_template() {
        assert!(matches!(
            TemplateCatalog::builtin().get("nope"),
            Err(DesignerError::TemplateNotFound { .. })
        ));
    }

    #[test]
    fn test_catalog_rejects_unknown_block_type() {
        let yaml = "templates:\n  - id: bad\n    name: Bad\n    category: intro\n    blocks:\n      - type: carousel\n";
        assert!(matches!(
            TemplateCatalog::from_yaml(yaml),
            Err(DesignerError::InvalidBlockType { .. })
        ));
    }

    #[test]
    fn test_catalog_rejects_duplicate_ids() {
        let yaml = "templates:\n  - id: a\n    name: A\n    category: intro\n    blocks: []\n  - id: a\n    name: B\n    category: intro\n    blocks: []\n";
        assert!(TemplateCatalog::from_yaml(yaml).is_err());
    }
}
