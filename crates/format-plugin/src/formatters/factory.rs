use std::collections::BTreeMap;
use thiserror::Error;

use super::FormatterCreator;

#[derive(Debug, Error)]
#[error("formatter type {type_name} provided by multiple assets: [{}]", .sources.join(", "))]
pub struct DuplicateBackendError {
  pub type_name: String,
  /// Sorted.
  pub sources: Vec<String>,
}

#[derive(Debug, Error)]
#[error("formatters [{}] not recognized -- known formatters are [{}]", .type_names.join(", "), .known_types.join(", "))]
pub struct UnknownFormatterError {
  /// Sorted.
  pub type_names: Vec<String>,
  /// In registration order.
  pub known_types: Vec<String>,
}

/// The formatters available to a run, in registration order.
pub struct FormatterFactory {
  creators: Vec<Box<dyn FormatterCreator>>,
}

impl FormatterFactory {
  pub fn new(creators: Vec<Box<dyn FormatterCreator>>) -> Result<Self, DuplicateBackendError> {
    let mut sources_by_name: BTreeMap<&str, Vec<String>> = BTreeMap::new();
    for creator in &creators {
      sources_by_name.entry(creator.type_name()).or_default().push(creator.source().to_string());
    }
    for (type_name, mut sources) in sources_by_name {
      if sources.len() > 1 {
        sources.sort();
        return Err(DuplicateBackendError {
          type_name: type_name.to_string(),
          sources,
        });
      }
    }
    Ok(FormatterFactory { creators })
  }

  /// Gets the formatter names in registration order.
  pub fn types(&self) -> Vec<&str> {
    self.creators.iter().map(|creator| creator.type_name()).collect()
  }

  pub fn creators(&self) -> impl Iterator<Item = &dyn FormatterCreator> {
    self.creators.iter().map(|creator| creator.as_ref())
  }

  pub fn get(&self, type_name: &str) -> Option<&dyn FormatterCreator> {
    self.creators().find(|creator| creator.type_name() == type_name)
  }

  /// Errors with every provided name that isn't a registered formatter.
  pub fn ensure_known<'a>(&self, type_names: impl Iterator<Item = &'a str>) -> Result<(), UnknownFormatterError> {
    let mut unknown = type_names.filter(|name| self.get(name).is_none()).map(|name| name.to_string()).collect::<Vec<_>>();
    if unknown.is_empty() {
      return Ok(());
    }
    unknown.sort();
    Err(UnknownFormatterError {
      type_names: unknown,
      known_types: self.types().into_iter().map(|name| name.to_string()).collect(),
    })
  }
}
