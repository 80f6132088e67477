use super::error::ClassifyError;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq)]
pub struct Category {
    pub label: String,
    pub description: Option<String>,
}

impl Category {
    pub fn new<S: Into<String>>(label: S) -> Self {
        Self {
            label: label.into(),
            description: None,
        }
    }

    pub fn with_description<S: Into<String>>(mut self, description: S) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Ordered, de-duplicated labels a reply may be mapped onto. Never fewer than two.
///
/// The first category is the fallback when a reply matches nothing.
#[derive(Debug, Clone, PartialEq)]
pub struct CategorySet {
    categories: Vec<Category>,
    duplicates: Vec<String>,
}

impl CategorySet {
    pub fn new<I, S>(labels: I) -> crate::Result<Self, ClassifyError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::from_categories(labels.into_iter().map(Category::new))
    }

    /// Repeated labels keep the position of their first occurrence and the description of their
    /// last. They are reported through [`CategorySet::duplicate_labels`].
    pub fn from_categories<I>(categories: I) -> crate::Result<Self, ClassifyError>
    where
        I: IntoIterator<Item = Category>,
    {
        let mut merged: Vec<Category> = Vec::new();
        let mut positions: HashMap<String, usize> = HashMap::new();
        let mut duplicates: Vec<String> = Vec::new();

        for category in categories {
            if category.label.trim().is_empty() {
                return Err(ClassifyError::configuration(
                    "category labels must not be empty",
                ));
            }
            match positions.get(&category.label) {
                Some(&position) => {
                    if !duplicates.contains(&category.label) {
                        duplicates.push(category.label.clone());
                    }
                    if category.description.is_some() {
                        merged[position].description = category.description;
                    }
                }
                None => {
                    positions.insert(category.label.clone(), merged.len());
                    merged.push(category);
                }
            }
        }

        if merged.len() < 2 {
            return Err(ClassifyError::configuration(format!(
                "at least 2 distinct categories are required, got {}",
                merged.len()
            )));
        }
        if !duplicates.is_empty() {
            crate::warn!(
                "duplicate category labels were merged, each keeping the position of its first occurrence and the last description given: {}",
                duplicates.join(", ")
            );
        }

        Ok(Self {
            categories: merged,
            duplicates,
        })
    }

    /// Attaches descriptions by label. Labels that are not in the set are ignored.
    pub fn with_descriptions(mut self, descriptions: &HashMap<String, String>) -> Self {
        for category in &mut self.categories {
            if let Some(description) = descriptions.get(&category.label) {
                category.description = Some(description.clone());
            }
        }
        self
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.categories.iter().map(|c| c.label.as_str())
    }

    pub fn fallback(&self) -> &str {
        &self.categories[0].label
    }

    pub fn contains(&self, label: &str) -> bool {
        self.categories.iter().any(|c| c.label == label)
    }

    pub fn has_descriptions(&self) -> bool {
        self.categories.iter().any(|c| c.description.is_some())
    }

    pub fn duplicate_labels(&self) -> &[String] {
        &self.duplicates
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}
